//! Unforgeable references into the global state.

use core::fmt;
use core::str::FromStr;

use casper_sdk_codec::{Error as CodecError, FromBytes, ToBytes, safe_split_at};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

/// Serialized length of a [`URef`]: 32 address bytes plus the rights byte.
pub const UREF_SERIALIZED_LENGTH: usize = 33;

const FORMATTED_PREFIX: &str = "uref-";

/// Access rights attached to a [`URef`], a bitmask over read/write/add.
///
/// Any OR of the three bits is legal, including none.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccessRights(u8);

impl AccessRights {
    pub const NONE: AccessRights = AccessRights(0);
    pub const READ: AccessRights = AccessRights(1);
    pub const WRITE: AccessRights = AccessRights(2);
    pub const ADD: AccessRights = AccessRights(4);
    pub const READ_WRITE: AccessRights = AccessRights(1 | 2);
    pub const READ_ADD: AccessRights = AccessRights(1 | 4);
    pub const ADD_WRITE: AccessRights = AccessRights(4 | 2);
    pub const READ_ADD_WRITE: AccessRights = AccessRights(1 | 4 | 2);

    /// Builds access rights from a raw bitmask, rejecting unknown bits.
    pub fn from_bits(bits: u8) -> Option<AccessRights> {
        if bits & !0b111 == 0 {
            Some(AccessRights(bits))
        } else {
            None
        }
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_readable(self) -> bool {
        self.0 & Self::READ.0 != 0
    }

    pub fn is_writeable(self) -> bool {
        self.0 & Self::WRITE.0 != 0
    }

    pub fn is_addable(self) -> bool {
        self.0 & Self::ADD.0 != 0
    }
}

impl fmt::Display for AccessRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03o}", self.0)
    }
}

/// A 32-byte address into the global state plus the holder's access rights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct URef {
    address: [u8; 32],
    access_rights: AccessRights,
}

/// Failure to parse a `uref-` formatted string.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FromStrError {
    #[error("formatted uref must start with `uref-`")]
    MissingPrefix,
    #[error("formatted uref has no access-rights suffix")]
    MissingSuffix,
    #[error("invalid hex in uref address")]
    InvalidAddress,
    #[error("invalid access-rights suffix")]
    InvalidAccessRights,
}

impl URef {
    pub const fn new(address: [u8; 32], access_rights: AccessRights) -> URef {
        URef {
            address,
            access_rights,
        }
    }

    pub fn address(&self) -> &[u8; 32] {
        &self.address
    }

    pub fn access_rights(&self) -> AccessRights {
        self.access_rights
    }

    /// Formats as `uref-<64 hex digits>-<3 octal digits>`.
    pub fn to_formatted_string(&self) -> String {
        format!(
            "{}{}-{}",
            FORMATTED_PREFIX,
            hex::encode(self.address),
            self.access_rights
        )
    }

    /// Parses the `uref-`-prefixed formatted string.
    pub fn from_formatted_string(input: &str) -> Result<URef, FromStrError> {
        let rest = input
            .strip_prefix(FORMATTED_PREFIX)
            .ok_or(FromStrError::MissingPrefix)?;
        let (address_hex, rights) = rest.rsplit_once('-').ok_or(FromStrError::MissingSuffix)?;

        let decoded = hex::decode(address_hex).map_err(|_| FromStrError::InvalidAddress)?;
        let address: [u8; 32] = decoded
            .try_into()
            .map_err(|_| FromStrError::InvalidAddress)?;

        let bits =
            u8::from_str_radix(rights, 8).map_err(|_| FromStrError::InvalidAccessRights)?;
        let access_rights =
            AccessRights::from_bits(bits).ok_or(FromStrError::InvalidAccessRights)?;

        Ok(URef::new(address, access_rights))
    }
}

impl fmt::Display for URef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_formatted_string())
    }
}

impl FromStr for URef {
    type Err = FromStrError;

    fn from_str(input: &str) -> Result<URef, FromStrError> {
        URef::from_formatted_string(input)
    }
}

impl ToBytes for URef {
    fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut result = Vec::with_capacity(UREF_SERIALIZED_LENGTH);
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        UREF_SERIALIZED_LENGTH
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CodecError> {
        writer.extend_from_slice(&self.address);
        writer.push(self.access_rights.bits());
        Ok(())
    }
}

impl FromBytes for URef {
    fn from_bytes(bytes: &[u8]) -> Result<(URef, &[u8]), CodecError> {
        let (address, remainder) = <[u8; 32]>::from_bytes(bytes)?;
        let (bits, remainder) = safe_split_at(remainder, 1)?;
        let access_rights = AccessRights::from_bits(bits[0]).ok_or(CodecError::Formatting)?;
        Ok((URef::new(address, access_rights), remainder))
    }
}

impl Serialize for URef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_formatted_string())
    }
}

impl<'de> Deserialize<'de> for URef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let formatted = String::deserialize(deserializer)?;
        URef::from_formatted_string(&formatted).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casper_sdk_codec::deserialize;

    fn test_uref() -> URef {
        let address =
            hex::decode("4c61453f1bdf1f3c4b20b47b2fcfedabcc9e3afb29f8bb5983b7184e6a4497e5")
                .unwrap()
                .try_into()
                .unwrap();
        URef::new(address, AccessRights::READ_ADD_WRITE)
    }

    #[test]
    fn test_wire_form_is_address_then_rights() {
        let encoded = test_uref().to_bytes().unwrap();
        assert_eq!(
            hex::encode(&encoded),
            "4c61453f1bdf1f3c4b20b47b2fcfedabcc9e3afb29f8bb5983b7184e6a4497e507"
        );
        assert_eq!(deserialize::<URef>(&encoded).unwrap(), test_uref());
    }

    #[test]
    fn test_formatted_string_round_trip() {
        let uref = test_uref();
        let formatted = uref.to_formatted_string();
        assert_eq!(
            formatted,
            "uref-4c61453f1bdf1f3c4b20b47b2fcfedabcc9e3afb29f8bb5983b7184e6a4497e5-007"
        );
        assert_eq!(URef::from_formatted_string(&formatted).unwrap(), uref);
    }

    #[test]
    fn test_formatted_string_errors() {
        assert_eq!(
            URef::from_formatted_string("ref-00-007").unwrap_err(),
            FromStrError::MissingPrefix
        );
        assert_eq!(
            URef::from_formatted_string("uref-0011").unwrap_err(),
            FromStrError::MissingSuffix
        );
        assert_eq!(
            URef::from_formatted_string("uref-0011-007").unwrap_err(),
            FromStrError::InvalidAddress
        );
        let formatted = format!("uref-{}-009", "00".repeat(32));
        assert_eq!(
            URef::from_formatted_string(&formatted).unwrap_err(),
            FromStrError::InvalidAccessRights
        );
    }

    #[test]
    fn test_access_rights_combinations() {
        assert!(AccessRights::READ_ADD_WRITE.is_readable());
        assert!(AccessRights::READ_ADD_WRITE.is_writeable());
        assert!(AccessRights::READ_ADD_WRITE.is_addable());
        assert!(!AccessRights::NONE.is_readable());
        assert_eq!(AccessRights::from_bits(0b111), Some(AccessRights::READ_ADD_WRITE));
        assert_eq!(AccessRights::from_bits(0b1000), None);
    }

    #[test]
    fn test_rights_render_as_octal() {
        assert_eq!(AccessRights::READ_ADD_WRITE.to_string(), "007");
        assert_eq!(AccessRights::NONE.to_string(), "000");
        assert_eq!(AccessRights::ADD.to_string(), "004");
    }

    #[test]
    fn test_decode_rejects_unknown_rights_bits() {
        let mut encoded = test_uref().to_bytes().unwrap();
        *encoded.last_mut().unwrap() = 0b1111;
        assert_eq!(deserialize::<URef>(&encoded).unwrap_err(), CodecError::Formatting);
    }
}
