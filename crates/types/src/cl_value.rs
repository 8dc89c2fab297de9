//! Typed values with their canonical byte form.

use casper_sdk_codec::{
    Error as CodecError, FromBytes, ToBytes, U32_SERIALIZED_LENGTH, safe_split_at,
};
use primitive_types::{U128, U256, U512};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser::SerializeStruct};
use serde_json::{Value as JsonValue, json};
use thiserror::Error;

use crate::cl_type::CLType;
use crate::key::Key;
use crate::public_key::PublicKey;
use crate::uref::URef;

/// A decoded payload that cannot populate the caller-supplied descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("type mismatch: expected {expected}, found {found}")]
pub struct TypeMismatch {
    pub expected: String,
    pub found: String,
}

impl TypeMismatch {
    pub fn new<E: ToString, F: ToString>(expected: E, found: F) -> TypeMismatch {
        TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

/// Failure while encoding or decoding a [`CLValue`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CLValueError {
    #[error(transparent)]
    Serialization(#[from] CodecError),
    #[error(transparent)]
    Type(#[from] TypeMismatch),
}

/// An ordered map value with declared key and value types.
///
/// Entries keep their insertion order; the codec never sorts, and the order
/// is part of whatever hash the surrounding bytes feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CLMap {
    key_type: CLType,
    value_type: CLType,
    entries: Vec<(CLValue, CLValue)>,
}

impl CLMap {
    pub fn new(key_type: CLType, value_type: CLType) -> CLMap {
        CLMap {
            key_type,
            value_type,
            entries: Vec::new(),
        }
    }

    /// Inserts an entry, replacing the value in place if the key is already
    /// present. Both sides must conform to the declared types.
    pub fn insert(&mut self, key: CLValue, value: CLValue) -> Result<(), TypeMismatch> {
        if key.cl_type() != self.key_type {
            return Err(TypeMismatch::new(&self.key_type, key.cl_type()));
        }
        if value.cl_type() != self.value_type {
            return Err(TypeMismatch::new(&self.value_type, value.cl_type()));
        }
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
        Ok(())
    }

    pub fn key_type(&self) -> &CLType {
        &self.key_type
    }

    pub fn value_type(&self) -> &CLType {
        &self.value_type
    }

    pub fn entries(&self) -> &[(CLValue, CLValue)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A typed value: one arm per [`CLType`] tag, payload exactly as the tag
/// demands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CLValue {
    Bool(bool),
    I32(i32),
    I64(i64),
    U8(u8),
    U32(u32),
    U64(u64),
    U128(U128),
    U256(U256),
    U512(U512),
    Unit,
    String(String),
    Key(Key),
    URef(URef),
    /// An optional; the inner type is recorded even when the value is
    /// absent, so the type descriptor can still be emitted.
    Option {
        inner_type: CLType,
        value: Option<Box<CLValue>>,
    },
    /// A homogeneous list; every item matches `element_type`.
    List {
        element_type: CLType,
        items: Vec<CLValue>,
    },
    /// A fixed-length byte string; the declared length is the payload length.
    ByteArray(Vec<u8>),
    /// A success-or-error sum; each side carries its own inner type.
    Result {
        ok_type: CLType,
        err_type: CLType,
        value: Result<Box<CLValue>, Box<CLValue>>,
    },
    Map(CLMap),
    Tuple1(Box<CLValue>),
    Tuple2(Box<(CLValue, CLValue)>),
    Tuple3(Box<(CLValue, CLValue, CLValue)>),
    /// Opaque bytes the SDK passes through without interpretation.
    Any(Vec<u8>),
    PublicKey(PublicKey),
}

impl CLValue {
    /// The descriptor for this value, derived from the payload.
    pub fn cl_type(&self) -> CLType {
        match self {
            CLValue::Bool(_) => CLType::Bool,
            CLValue::I32(_) => CLType::I32,
            CLValue::I64(_) => CLType::I64,
            CLValue::U8(_) => CLType::U8,
            CLValue::U32(_) => CLType::U32,
            CLValue::U64(_) => CLType::U64,
            CLValue::U128(_) => CLType::U128,
            CLValue::U256(_) => CLType::U256,
            CLValue::U512(_) => CLType::U512,
            CLValue::Unit => CLType::Unit,
            CLValue::String(_) => CLType::String,
            CLValue::Key(_) => CLType::Key,
            CLValue::URef(_) => CLType::URef,
            CLValue::Option { inner_type, .. } => CLType::option(inner_type.clone()),
            CLValue::List { element_type, .. } => CLType::list(element_type.clone()),
            CLValue::ByteArray(bytes) => CLType::ByteArray(bytes.len() as u32),
            CLValue::Result {
                ok_type, err_type, ..
            } => CLType::result(ok_type.clone(), err_type.clone()),
            CLValue::Map(map) => CLType::map(map.key_type.clone(), map.value_type.clone()),
            CLValue::Tuple1(t1) => CLType::Tuple1([Box::new(t1.cl_type())]),
            CLValue::Tuple2(pair) => {
                CLType::Tuple2([Box::new(pair.0.cl_type()), Box::new(pair.1.cl_type())])
            }
            CLValue::Tuple3(triple) => CLType::Tuple3([
                Box::new(triple.0.cl_type()),
                Box::new(triple.1.cl_type()),
                Box::new(triple.2.cl_type()),
            ]),
            CLValue::Any(_) => CLType::Any,
            CLValue::PublicKey(_) => CLType::PublicKey,
        }
    }

    /// A present optional; the inner type is taken from the value.
    pub fn option_some(value: CLValue) -> CLValue {
        CLValue::Option {
            inner_type: value.cl_type(),
            value: Some(Box::new(value)),
        }
    }

    /// An absent optional carrying the inner type for descriptor emission.
    pub fn option_none(inner_type: CLType) -> CLValue {
        CLValue::Option {
            inner_type,
            value: None,
        }
    }

    /// A homogeneous list; every item must match `element_type`.
    pub fn list(element_type: CLType, items: Vec<CLValue>) -> Result<CLValue, TypeMismatch> {
        for item in &items {
            if item.cl_type() != element_type {
                return Err(TypeMismatch::new(&element_type, item.cl_type()));
            }
        }
        Ok(CLValue::List {
            element_type,
            items,
        })
    }

    pub fn byte_array<T: Into<Vec<u8>>>(bytes: T) -> CLValue {
        CLValue::ByteArray(bytes.into())
    }

    pub fn result_ok(ok: CLValue, err_type: CLType) -> CLValue {
        CLValue::Result {
            ok_type: ok.cl_type(),
            err_type,
            value: Ok(Box::new(ok)),
        }
    }

    pub fn result_err(ok_type: CLType, err: CLValue) -> CLValue {
        CLValue::Result {
            ok_type,
            err_type: err.cl_type(),
            value: Err(Box::new(err)),
        }
    }

    pub fn tuple1(t1: CLValue) -> CLValue {
        CLValue::Tuple1(Box::new(t1))
    }

    pub fn tuple2(t1: CLValue, t2: CLValue) -> CLValue {
        CLValue::Tuple2(Box::new((t1, t2)))
    }

    pub fn tuple3(t1: CLValue, t2: CLValue, t3: CLValue) -> CLValue {
        CLValue::Tuple3(Box::new((t1, t2, t3)))
    }

    /// Decodes a value of the given type from the front of `bytes`,
    /// returning the remainder.
    pub fn from_bytes<'a>(
        cl_type: &CLType,
        bytes: &'a [u8],
    ) -> Result<(CLValue, &'a [u8]), CLValueError> {
        let result = match cl_type {
            CLType::Bool => {
                let (value, remainder) = bool::from_bytes(bytes)?;
                (CLValue::Bool(value), remainder)
            }
            CLType::I32 => {
                let (value, remainder) = i32::from_bytes(bytes)?;
                (CLValue::I32(value), remainder)
            }
            CLType::I64 => {
                let (value, remainder) = i64::from_bytes(bytes)?;
                (CLValue::I64(value), remainder)
            }
            CLType::U8 => {
                let (value, remainder) = u8::from_bytes(bytes)?;
                (CLValue::U8(value), remainder)
            }
            CLType::U32 => {
                let (value, remainder) = u32::from_bytes(bytes)?;
                (CLValue::U32(value), remainder)
            }
            CLType::U64 => {
                let (value, remainder) = u64::from_bytes(bytes)?;
                (CLValue::U64(value), remainder)
            }
            CLType::U128 => {
                check_magnitude(cl_type, bytes, 16)?;
                let (value, remainder) = U128::from_bytes(bytes)?;
                (CLValue::U128(value), remainder)
            }
            CLType::U256 => {
                check_magnitude(cl_type, bytes, 32)?;
                let (value, remainder) = U256::from_bytes(bytes)?;
                (CLValue::U256(value), remainder)
            }
            CLType::U512 => {
                check_magnitude(cl_type, bytes, 64)?;
                let (value, remainder) = U512::from_bytes(bytes)?;
                (CLValue::U512(value), remainder)
            }
            CLType::Unit => (CLValue::Unit, bytes),
            CLType::String => {
                let (value, remainder) = String::from_bytes(bytes)?;
                (CLValue::String(value), remainder)
            }
            CLType::Key => {
                let (value, remainder) = Key::from_bytes(bytes)?;
                (CLValue::Key(value), remainder)
            }
            CLType::URef => {
                let (value, remainder) = URef::from_bytes(bytes)?;
                (CLValue::URef(value), remainder)
            }
            CLType::Option(inner_type) => {
                let (tag, remainder) = u8::from_bytes(bytes)?;
                match tag {
                    0 => (CLValue::option_none((**inner_type).clone()), remainder),
                    1 => {
                        let (inner, remainder) = CLValue::from_bytes(inner_type, remainder)?;
                        (CLValue::option_some(inner), remainder)
                    }
                    _ => return Err(CodecError::Formatting.into()),
                }
            }
            CLType::List(element_type) => {
                let (count, mut remainder) = u32::from_bytes(bytes)?;
                let mut items = Vec::new();
                for _ in 0..count {
                    let (item, rest) = CLValue::from_bytes(element_type, remainder)?;
                    items.push(item);
                    remainder = rest;
                }
                (
                    CLValue::List {
                        element_type: (**element_type).clone(),
                        items,
                    },
                    remainder,
                )
            }
            CLType::ByteArray(length) => {
                let (raw, remainder) = safe_split_at(bytes, *length as usize)?;
                (CLValue::ByteArray(raw.to_vec()), remainder)
            }
            CLType::Result { ok, err } => {
                let (tag, remainder) = u8::from_bytes(bytes)?;
                match tag {
                    1 => {
                        let (inner, remainder) = CLValue::from_bytes(ok, remainder)?;
                        (CLValue::result_ok(inner, (**err).clone()), remainder)
                    }
                    0 => {
                        let (inner, remainder) = CLValue::from_bytes(err, remainder)?;
                        (CLValue::result_err((**ok).clone(), inner), remainder)
                    }
                    _ => return Err(CodecError::Formatting.into()),
                }
            }
            CLType::Map { key, value } => {
                let (count, mut remainder) = u32::from_bytes(bytes)?;
                let mut map = CLMap::new((**key).clone(), (**value).clone());
                for _ in 0..count {
                    let (entry_key, rest) = CLValue::from_bytes(key, remainder)?;
                    let (entry_value, rest) = CLValue::from_bytes(value, rest)?;
                    map.insert(entry_key, entry_value)?;
                    remainder = rest;
                }
                (CLValue::Map(map), remainder)
            }
            CLType::Tuple1([t1]) => {
                let (v1, remainder) = CLValue::from_bytes(t1, bytes)?;
                (CLValue::tuple1(v1), remainder)
            }
            CLType::Tuple2([t1, t2]) => {
                let (v1, remainder) = CLValue::from_bytes(t1, bytes)?;
                let (v2, remainder) = CLValue::from_bytes(t2, remainder)?;
                (CLValue::tuple2(v1, v2), remainder)
            }
            CLType::Tuple3([t1, t2, t3]) => {
                let (v1, remainder) = CLValue::from_bytes(t1, bytes)?;
                let (v2, remainder) = CLValue::from_bytes(t2, remainder)?;
                let (v3, remainder) = CLValue::from_bytes(t3, remainder)?;
                (CLValue::tuple3(v1, v2, v3), remainder)
            }
            CLType::Any => (CLValue::Any(bytes.to_vec()), &bytes[bytes.len()..]),
            CLType::PublicKey => {
                let (value, remainder) = PublicKey::from_bytes(bytes)?;
                (CLValue::PublicKey(value), remainder)
            }
        };
        Ok(result)
    }

    /// Decodes a value that must consume the whole input.
    pub fn parse(cl_type: &CLType, bytes: &[u8]) -> Result<CLValue, CLValueError> {
        let (value, remainder) = CLValue::from_bytes(cl_type, bytes)?;
        if remainder.is_empty() {
            Ok(value)
        } else {
            Err(CodecError::LeftOverBytes.into())
        }
    }

    /// The named-argument form:
    /// `u32 len(value_bytes) ∥ value_bytes ∥ type_descriptor_bytes`.
    ///
    /// The length prefix lets a reader skip values whose type it does not
    /// understand.
    pub fn to_bytes_with_type(&self) -> Result<Vec<u8>, CLValueError> {
        let value_bytes = self.to_bytes()?;
        let cl_type = self.cl_type();
        let mut result =
            Vec::with_capacity(U32_SERIALIZED_LENGTH + value_bytes.len() + cl_type.serialized_length());
        (value_bytes.len() as u32).write_bytes(&mut result)?;
        result.extend_from_slice(&value_bytes);
        cl_type.write_bytes(&mut result)?;
        Ok(result)
    }

    /// Parses the named-argument form, returning the remainder after the
    /// type descriptor.
    pub fn from_bytes_with_type(bytes: &[u8]) -> Result<(CLValue, &[u8]), CLValueError> {
        let (length, remainder) = u32::from_bytes(bytes)?;
        let (value_bytes, remainder) = safe_split_at(remainder, length as usize)?;
        let (cl_type, remainder) = CLType::from_bytes(remainder)?;
        let value = CLValue::parse(&cl_type, value_bytes)?;
        Ok((value, remainder))
    }

    /// Best-effort JSON rendering of the decoded value.
    ///
    /// Informational only; round-trip fidelity relies on the byte form.
    pub fn parsed_json(&self) -> JsonValue {
        match self {
            CLValue::Bool(value) => json!(value),
            CLValue::I32(value) => json!(value),
            CLValue::I64(value) => json!(value),
            CLValue::U8(value) => json!(value),
            CLValue::U32(value) => json!(value),
            CLValue::U64(value) => json!(value),
            CLValue::U128(value) => json!(value.to_string()),
            CLValue::U256(value) => json!(value.to_string()),
            CLValue::U512(value) => json!(value.to_string()),
            CLValue::Unit => JsonValue::Null,
            CLValue::String(value) => json!(value),
            CLValue::Key(key) => json!(key.to_formatted_string()),
            CLValue::URef(uref) => json!(uref.to_formatted_string()),
            CLValue::Option { value, .. } => match value {
                Some(inner) => inner.parsed_json(),
                None => JsonValue::Null,
            },
            CLValue::List { items, .. } => {
                JsonValue::Array(items.iter().map(CLValue::parsed_json).collect())
            }
            CLValue::ByteArray(bytes) => json!(hex::encode(bytes)),
            CLValue::Result { value, .. } => match value {
                Ok(inner) => json!({ "Ok": inner.parsed_json() }),
                Err(inner) => json!({ "Err": inner.parsed_json() }),
            },
            CLValue::Map(map) => JsonValue::Array(
                map.entries
                    .iter()
                    .map(|(key, value)| {
                        json!({ "key": key.parsed_json(), "value": value.parsed_json() })
                    })
                    .collect(),
            ),
            CLValue::Tuple1(t1) => JsonValue::Array(vec![t1.parsed_json()]),
            CLValue::Tuple2(pair) => {
                JsonValue::Array(vec![pair.0.parsed_json(), pair.1.parsed_json()])
            }
            CLValue::Tuple3(triple) => JsonValue::Array(vec![
                triple.0.parsed_json(),
                triple.1.parsed_json(),
                triple.2.parsed_json(),
            ]),
            CLValue::Any(_) => JsonValue::Null,
            CLValue::PublicKey(key) => json!(key.to_hex()),
        }
    }
}

fn check_magnitude(cl_type: &CLType, bytes: &[u8], width: usize) -> Result<(), CLValueError> {
    match bytes.first() {
        Some(&length) if usize::from(length) > width => Err(TypeMismatch::new(
            cl_type,
            format!("integer of {length} magnitude bytes"),
        )
        .into()),
        _ => Ok(()),
    }
}

impl ToBytes for CLValue {
    fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut result = Vec::with_capacity(self.serialized_length());
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        match self {
            CLValue::Bool(value) => value.serialized_length(),
            CLValue::I32(value) => value.serialized_length(),
            CLValue::I64(value) => value.serialized_length(),
            CLValue::U8(value) => value.serialized_length(),
            CLValue::U32(value) => value.serialized_length(),
            CLValue::U64(value) => value.serialized_length(),
            CLValue::U128(value) => value.serialized_length(),
            CLValue::U256(value) => value.serialized_length(),
            CLValue::U512(value) => value.serialized_length(),
            CLValue::Unit => 0,
            CLValue::String(value) => value.serialized_length(),
            CLValue::Key(key) => key.serialized_length(),
            CLValue::URef(uref) => uref.serialized_length(),
            CLValue::Option { value, .. } => {
                1 + value.as_ref().map_or(0, |inner| inner.serialized_length())
            }
            CLValue::List { items, .. } => {
                U32_SERIALIZED_LENGTH
                    + items.iter().map(CLValue::serialized_length).sum::<usize>()
            }
            CLValue::ByteArray(bytes) => bytes.len(),
            CLValue::Result { value, .. } => {
                1 + match value {
                    Ok(inner) => inner.serialized_length(),
                    Err(inner) => inner.serialized_length(),
                }
            }
            CLValue::Map(map) => {
                U32_SERIALIZED_LENGTH
                    + map
                        .entries
                        .iter()
                        .map(|(key, value)| key.serialized_length() + value.serialized_length())
                        .sum::<usize>()
            }
            CLValue::Tuple1(t1) => t1.serialized_length(),
            CLValue::Tuple2(pair) => pair.0.serialized_length() + pair.1.serialized_length(),
            CLValue::Tuple3(triple) => {
                triple.0.serialized_length()
                    + triple.1.serialized_length()
                    + triple.2.serialized_length()
            }
            CLValue::Any(bytes) => bytes.len(),
            CLValue::PublicKey(key) => key.serialized_length(),
        }
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CodecError> {
        match self {
            CLValue::Bool(value) => value.write_bytes(writer),
            CLValue::I32(value) => value.write_bytes(writer),
            CLValue::I64(value) => value.write_bytes(writer),
            CLValue::U8(value) => value.write_bytes(writer),
            CLValue::U32(value) => value.write_bytes(writer),
            CLValue::U64(value) => value.write_bytes(writer),
            CLValue::U128(value) => value.write_bytes(writer),
            CLValue::U256(value) => value.write_bytes(writer),
            CLValue::U512(value) => value.write_bytes(writer),
            CLValue::Unit => Ok(()),
            CLValue::String(value) => value.write_bytes(writer),
            CLValue::Key(key) => key.write_bytes(writer),
            CLValue::URef(uref) => uref.write_bytes(writer),
            CLValue::Option { value, .. } => {
                match value {
                    None => writer.push(0),
                    Some(inner) => {
                        writer.push(1);
                        inner.write_bytes(writer)?;
                    }
                }
                Ok(())
            }
            CLValue::List { items, .. } => {
                (items.len() as u32).write_bytes(writer)?;
                for item in items {
                    item.write_bytes(writer)?;
                }
                Ok(())
            }
            CLValue::ByteArray(bytes) => {
                writer.extend_from_slice(bytes);
                Ok(())
            }
            CLValue::Result { value, .. } => {
                match value {
                    Ok(inner) => {
                        writer.push(1);
                        inner.write_bytes(writer)?;
                    }
                    Err(inner) => {
                        writer.push(0);
                        inner.write_bytes(writer)?;
                    }
                }
                Ok(())
            }
            CLValue::Map(map) => {
                (map.entries.len() as u32).write_bytes(writer)?;
                for (key, value) in &map.entries {
                    key.write_bytes(writer)?;
                    value.write_bytes(writer)?;
                }
                Ok(())
            }
            CLValue::Tuple1(t1) => t1.write_bytes(writer),
            CLValue::Tuple2(pair) => {
                pair.0.write_bytes(writer)?;
                pair.1.write_bytes(writer)
            }
            CLValue::Tuple3(triple) => {
                triple.0.write_bytes(writer)?;
                triple.1.write_bytes(writer)?;
                triple.2.write_bytes(writer)
            }
            CLValue::Any(bytes) => {
                writer.extend_from_slice(bytes);
                Ok(())
            }
            CLValue::PublicKey(key) => key.write_bytes(writer),
        }
    }
}

macro_rules! impl_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for CLValue {
                fn from(value: $t) -> CLValue {
                    CLValue::$variant(value)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u32 => U32,
    u64 => U64,
    U128 => U128,
    U256 => U256,
    U512 => U512,
    String => String,
    Key => Key,
    URef => URef,
    PublicKey => PublicKey,
}

impl From<&str> for CLValue {
    fn from(value: &str) -> CLValue {
        CLValue::String(value.to_owned())
    }
}

impl Serialize for CLValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let bytes = self
            .to_bytes()
            .map_err(|err| serde::ser::Error::custom(err.to_string()))?;
        let mut state = serializer.serialize_struct("CLValue", 3)?;
        state.serialize_field("cl_type", &self.cl_type())?;
        state.serialize_field("bytes", &hex::encode(bytes))?;
        state.serialize_field("parsed", &self.parsed_json())?;
        state.end()
    }
}

#[derive(Deserialize)]
struct CLValueShim {
    cl_type: CLType,
    bytes: String,
    #[serde(default)]
    #[allow(dead_code)]
    parsed: JsonValue,
}

impl<'de> Deserialize<'de> for CLValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let shim = CLValueShim::deserialize(deserializer)?;
        let raw = hex::decode(&shim.bytes).map_err(de::Error::custom)?;
        CLValue::parse(&shim.cl_type, &raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::public_key::KeyTag;
    use crate::uref::AccessRights;

    fn address() -> [u8; 32] {
        hex::decode("4c61453f1bdf1f3c4b20b47b2fcfedabcc9e3afb29f8bb5983b7184e6a4497e5")
            .unwrap()
            .try_into()
            .unwrap()
    }

    fn string_map() -> CLValue {
        let mut map = CLMap::new(CLType::String, CLType::String);
        map.insert("test".into(), "test".into()).unwrap();
        CLValue::Map(map)
    }

    fn vector_cases() -> Vec<(CLValue, &'static str)> {
        vec![
            (CLValue::Bool(true), "01"),
            (CLValue::I32(7), "07000000"),
            (CLValue::I64(7), "0700000000000000"),
            (CLValue::U8(7), "07"),
            (CLValue::U32(7), "07000000"),
            (CLValue::U64(1024), "0004000000000000"),
            (CLValue::U128(U128::from(7u64)), "0107"),
            (CLValue::U256(U256::from(7u64)), "0107"),
            (CLValue::U512(U512::from(7u64)), "0107"),
            (CLValue::Unit, ""),
            (
                CLValue::String("Hello, World!".into()),
                "0d00000048656c6c6f2c20576f726c6421",
            ),
            (
                CLValue::Key(Key::Account(address())),
                "004c61453f1bdf1f3c4b20b47b2fcfedabcc9e3afb29f8bb5983b7184e6a4497e5",
            ),
            (
                CLValue::Key(Key::Hash(address())),
                "014c61453f1bdf1f3c4b20b47b2fcfedabcc9e3afb29f8bb5983b7184e6a4497e5",
            ),
            (
                CLValue::Key(Key::URef(URef::new(address(), AccessRights::READ_ADD_WRITE))),
                "024c61453f1bdf1f3c4b20b47b2fcfedabcc9e3afb29f8bb5983b7184e6a4497e507",
            ),
            (
                CLValue::Key(Key::Transfer(address())),
                "034c61453f1bdf1f3c4b20b47b2fcfedabcc9e3afb29f8bb5983b7184e6a4497e5",
            ),
            (
                CLValue::Key(Key::DeployInfo(address())),
                "044c61453f1bdf1f3c4b20b47b2fcfedabcc9e3afb29f8bb5983b7184e6a4497e5",
            ),
            (CLValue::Key(Key::EraId(1024)), "050004000000000000"),
            (
                CLValue::Key(Key::Balance(address())),
                "064c61453f1bdf1f3c4b20b47b2fcfedabcc9e3afb29f8bb5983b7184e6a4497e5",
            ),
            (
                CLValue::Key(Key::Bid(address())),
                "074c61453f1bdf1f3c4b20b47b2fcfedabcc9e3afb29f8bb5983b7184e6a4497e5",
            ),
            (
                CLValue::Key(Key::Withdraw(address())),
                "084c61453f1bdf1f3c4b20b47b2fcfedabcc9e3afb29f8bb5983b7184e6a4497e5",
            ),
            (CLValue::option_none(CLType::U64), "00"),
            (
                CLValue::option_some(CLValue::U64(7)),
                "010700000000000000",
            ),
            (
                CLValue::URef(URef::new(address(), AccessRights::READ_ADD_WRITE)),
                "4c61453f1bdf1f3c4b20b47b2fcfedabcc9e3afb29f8bb5983b7184e6a4497e507",
            ),
            (
                CLValue::list(CLType::U32, Vec::new()).unwrap(),
                "00000000",
            ),
            (
                CLValue::list(
                    CLType::U32,
                    vec![CLValue::U32(1), CLValue::U32(2), CLValue::U32(3)],
                )
                .unwrap(),
                "03000000010000000200000003000000",
            ),
            (
                CLValue::byte_array(hex::decode("010000000200000003000000").unwrap()),
                "010000000200000003000000",
            ),
            (
                CLValue::result_ok(CLValue::U64(314), CLType::String),
                "013a01000000000000",
            ),
            (
                CLValue::result_err(CLType::U64, CLValue::String("Uh oh".into())),
                "00050000005568206f68",
            ),
            (string_map(), "0100000004000000746573740400000074657374"),
            (CLValue::tuple1(CLValue::U32(1)), "01000000"),
            (
                CLValue::tuple2(CLValue::U32(1), CLValue::String("Hello, World!".into())),
                "010000000d00000048656c6c6f2c20576f726c6421",
            ),
            (
                CLValue::tuple3(
                    CLValue::U32(1),
                    CLValue::String("Hello, World!".into()),
                    CLValue::Bool(true),
                ),
                "010000000d00000048656c6c6f2c20576f726c642101",
            ),
        ]
    }

    #[test]
    fn test_encoding_vectors() {
        for (value, expected_hex) in vector_cases() {
            let encoded = value.to_bytes().unwrap();
            assert_eq!(
                hex::encode(&encoded),
                expected_hex,
                "encoding mismatch for {:?}",
                value.cl_type()
            );
            assert_eq!(encoded.len(), value.serialized_length());
        }
    }

    #[test]
    fn test_decoding_vectors() {
        for (value, expected_hex) in vector_cases() {
            let bytes = hex::decode(expected_hex).unwrap();
            let decoded = CLValue::parse(&value.cl_type(), &bytes)
                .unwrap_or_else(|err| panic!("decoding {:?} failed: {err}", value.cl_type()));
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn test_named_arg_form_round_trip() {
        for (value, _) in vector_cases() {
            let with_type = value.to_bytes_with_type().unwrap();
            let (decoded, remainder) = CLValue::from_bytes_with_type(&with_type).unwrap();
            assert_eq!(decoded, value);
            assert!(remainder.is_empty());
        }
    }

    #[test]
    fn test_named_arg_form_layout() {
        // length prefix, payload, then descriptor
        let value = CLValue::U512(U512::from(10_000_000u64));
        assert_eq!(
            hex::encode(value.to_bytes_with_type().unwrap()),
            "040000000380969808"
        );
    }

    #[test]
    fn test_named_arg_length_prefix_lets_readers_skip() {
        let mut bytes = CLValue::U32(7).to_bytes_with_type().unwrap();
        bytes.extend_from_slice(&[0xaa, 0xbb]);
        let (decoded, remainder) = CLValue::from_bytes_with_type(&bytes).unwrap();
        assert_eq!(decoded, CLValue::U32(7));
        assert_eq!(remainder, &[0xaa, 0xbb]);
    }

    #[test]
    fn test_named_arg_length_prefix_must_match() {
        // prefix claims 5 value bytes but the U32 payload only has 4
        let mut bytes = CLValue::U32(7).to_bytes_with_type().unwrap();
        bytes[0] = 5;
        bytes.insert(8, 0);
        assert!(CLValue::from_bytes_with_type(&bytes).is_err());
    }

    #[test]
    fn test_list_rejects_heterogeneous_items() {
        let err = CLValue::list(CLType::U32, vec![CLValue::U32(1), CLValue::U64(2)]).unwrap_err();
        assert_eq!(err, TypeMismatch::new("U32", "U64"));
    }

    #[test]
    fn test_map_rejects_nonconforming_entries() {
        let mut map = CLMap::new(CLType::String, CLType::U64);
        map.insert("a".into(), CLValue::U64(1)).unwrap();
        assert!(map.insert(CLValue::U64(1), CLValue::U64(1)).is_err());
        assert!(map.insert("b".into(), CLValue::Bool(true)).is_err());
    }

    #[test]
    fn test_map_insert_replaces_in_place() {
        let mut map = CLMap::new(CLType::String, CLType::U64);
        map.insert("a".into(), CLValue::U64(1)).unwrap();
        map.insert("b".into(), CLValue::U64(2)).unwrap();
        map.insert("a".into(), CLValue::U64(3)).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.entries()[0], ("a".into(), CLValue::U64(3)));
        assert_eq!(map.entries()[1], ("b".into(), CLValue::U64(2)));
    }

    #[test]
    fn test_map_preserves_insertion_order_in_bytes() {
        let mut forward = CLMap::new(CLType::String, CLType::U64);
        forward.insert("a".into(), CLValue::U64(1)).unwrap();
        forward.insert("b".into(), CLValue::U64(2)).unwrap();
        let mut reverse = CLMap::new(CLType::String, CLType::U64);
        reverse.insert("b".into(), CLValue::U64(2)).unwrap();
        reverse.insert("a".into(), CLValue::U64(1)).unwrap();
        assert_ne!(
            CLValue::Map(forward).to_bytes().unwrap(),
            CLValue::Map(reverse).to_bytes().unwrap()
        );
    }

    #[test]
    fn test_oversized_magnitude_is_a_type_mismatch() {
        let mut bytes = vec![65u8];
        bytes.extend_from_slice(&[1; 65]);
        match CLValue::parse(&CLType::U512, &bytes) {
            Err(CLValueError::Type(_)) => {}
            other => panic!("expected type mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_public_key_value_round_trip() {
        let key = PublicKey::new(
            KeyTag::Ed25519,
            hex::decode("272a2fe949347aa893fdcbb99bfeb4c57e348c5359a45363514c4e15364e5136")
                .unwrap(),
        )
        .unwrap();
        let value = CLValue::PublicKey(key);
        let encoded = value.to_bytes().unwrap();
        assert_eq!(encoded.len(), 33);
        assert_eq!(CLValue::parse(&CLType::PublicKey, &encoded).unwrap(), value);
    }

    #[test]
    fn test_json_form() {
        let value = CLValue::option_some(CLValue::U64(7));
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "cl_type": {"Option": "U64"},
                "bytes": "010700000000000000",
                "parsed": 7
            })
        );
        let back: CLValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_json_parsed_field_is_ignored_on_input() {
        let back: CLValue = serde_json::from_str(
            "{\"cl_type\":\"U64\",\"bytes\":\"0700000000000000\",\"parsed\":\"nonsense\"}",
        )
        .unwrap();
        assert_eq!(back, CLValue::U64(7));
    }

    #[test]
    fn test_json_big_ints_parse_as_decimal_strings() {
        let value = CLValue::U512(U512::from(2_500_000_000u64));
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["parsed"], serde_json::json!("2500000000"));
    }

    #[test]
    fn test_deterministic_encoding() {
        for (value, _) in vector_cases() {
            assert_eq!(value.to_bytes().unwrap(), value.to_bytes().unwrap());
        }
    }
}
