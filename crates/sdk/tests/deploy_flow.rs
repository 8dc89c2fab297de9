//! End-to-end deploy flow: construct, sign, validate, round-trip as JSON.

use casper_sdk::keys::{Ed25519KeyPair, KeyPair, KeyTag, Secp256k1KeyPair};
use casper_sdk::types::CLValue;
use casper_sdk::{
    Deploy, DeployParams, RuntimeArgs, TimeDiff, Timestamp, make_deploy, new_stored_contract_by_name,
    new_transfer, standard_payment,
};
use primitive_types::U512;

fn sender() -> KeyPair {
    KeyPair::Ed25519(Ed25519KeyPair::from_seed(&[3u8; 32]))
}

fn transfer_deploy(sender: &KeyPair) -> Deploy {
    let target = KeyPair::Secp256k1(Secp256k1KeyPair::from_raw_bytes(&[5u8; 32]).unwrap());
    let params = DeployParams::new(sender.public_key(), "casper-test")
        .with_timestamp(Timestamp::parse("2021-09-21T14:58:41.048Z").unwrap())
        .with_ttl(TimeDiff::from_minutes(30));
    make_deploy(
        params,
        standard_payment(U512::from(10_000_000_000u64)),
        new_transfer(U512::from(2_500_000_000u64), &target.public_key(), Some(1), None),
    )
    .unwrap()
}

#[test]
fn transfer_deploy_signs_and_validates() {
    let sender = sender();
    let mut deploy = transfer_deploy(&sender);
    assert!(deploy.approvals.is_empty());

    deploy.sign(&sender).unwrap();
    let cosigner = KeyPair::Secp256k1(Secp256k1KeyPair::from_raw_bytes(&[9u8; 32]).unwrap());
    deploy.sign(&cosigner).unwrap();

    deploy.validate().unwrap();
    assert_eq!(deploy.approvals.len(), 2);
    assert_eq!(deploy.approvals[0].signer.tag(), KeyTag::Ed25519);
    assert_eq!(deploy.approvals[1].signer.tag(), KeyTag::Secp256k1);
}

#[test]
fn signed_deploy_freezes_arguments() {
    let sender = sender();
    let mut deploy = transfer_deploy(&sender);
    deploy.sign(&sender).unwrap();
    assert!(deploy.set_session_arg("amount", CLValue::U64(1)).is_err());
}

#[test]
fn deploy_json_uses_the_node_field_names() {
    let sender = sender();
    let mut deploy = transfer_deploy(&sender);
    deploy.sign(&sender).unwrap();

    let json = serde_json::to_value(&deploy).unwrap();
    let object = json.as_object().unwrap();
    for field in ["hash", "header", "payment", "session", "approvals"] {
        assert!(object.contains_key(field), "missing field `{field}`");
    }
    let header = json["header"].as_object().unwrap();
    for field in [
        "account",
        "timestamp",
        "ttl",
        "gas_price",
        "body_hash",
        "dependencies",
        "chain_name",
    ] {
        assert!(header.contains_key(field), "missing header field `{field}`");
    }
    assert!(json["payment"]["ModuleBytes"].is_object());
    assert!(json["session"]["Transfer"].is_object());
    assert!(json["approvals"][0]["signer"].is_string());
    assert!(json["approvals"][0]["signature"].is_string());

    let restored: Deploy = serde_json::from_value(json).unwrap();
    assert_eq!(restored, deploy);
    restored.validate().unwrap();
}

#[test]
fn stored_contract_deploy_round_trips_through_json() {
    let sender = sender();
    let mut args = RuntimeArgs::new();
    args.insert("recipient", CLValue::String("alice".into()));
    args.insert("amount", CLValue::U512(U512::from(123_456_789u64)));

    let params = DeployParams::new(sender.public_key(), "casper-test")
        .with_timestamp(Timestamp::parse("2021-09-21T14:58:41.048Z").unwrap());
    let mut deploy = make_deploy(
        params,
        standard_payment(U512::from(3_000_000_000u64)),
        new_stored_contract_by_name("cep18", "transfer", args),
    )
    .unwrap();
    deploy.sign(&sender).unwrap();

    let encoded = serde_json::to_string(&deploy).unwrap();
    let restored: Deploy = serde_json::from_str(&encoded).unwrap();
    assert_eq!(restored, deploy);
    restored.validate().unwrap();

    // argument order must survive the round trip, the hash depends on it
    let names: Vec<&str> = restored
        .session
        .args()
        .iter()
        .map(|arg| arg.name())
        .collect();
    assert_eq!(names, vec!["recipient", "amount"]);
}
