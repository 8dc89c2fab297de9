//! Length-prefixed byte blob.

use core::fmt;
use core::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{Error, FromBytes, ToBytes, U32_SERIALIZED_LENGTH, safe_split_at};

/// A variable-length byte string: `u32` count, then the raw bytes.
///
/// This is distinct from `Vec<u8>` only to pin the wire form and to render
/// as lowercase hex in JSON.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bytes(Vec<u8>);

impl Bytes {
    pub fn new() -> Self {
        Bytes(Vec::new())
    }

    pub fn inner_bytes(&self) -> &Vec<u8> {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bytes(0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(value: Vec<u8>) -> Self {
        Bytes(value)
    }
}

impl From<&[u8]> for Bytes {
    fn from(value: &[u8]) -> Self {
        Bytes(value.to_vec())
    }
}

impl From<Bytes> for Vec<u8> {
    fn from(value: Bytes) -> Self {
        value.0
    }
}

impl Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl ToBytes for Bytes {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut result = Vec::with_capacity(self.serialized_length());
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        U32_SERIALIZED_LENGTH + self.0.len()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        (self.0.len() as u32).write_bytes(writer)?;
        writer.extend_from_slice(&self.0);
        Ok(())
    }
}

impl FromBytes for Bytes {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (count, remainder) = u32::from_bytes(bytes)?;
        let (raw, remainder) = safe_split_at(remainder, count as usize)?;
        Ok((Bytes(raw.to_vec()), remainder))
    }
}

impl Serialize for Bytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&hex::encode(&self.0))
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let text = String::deserialize(deserializer)?;
            let raw = hex::decode(&text).map_err(de::Error::custom)?;
            Ok(Bytes(raw))
        } else {
            let raw = Vec::<u8>::deserialize(deserializer)?;
            Ok(Bytes(raw))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deserialize;

    #[test]
    fn test_wire_form_is_length_prefixed() {
        let bytes = Bytes::from(vec![10, 20, 30]);
        assert_eq!(bytes.to_bytes().unwrap(), vec![3, 0, 0, 0, 10, 20, 30]);
        assert_eq!(deserialize::<Bytes>(&[3, 0, 0, 0, 10, 20, 30]).unwrap(), bytes);
    }

    #[test]
    fn test_empty_is_a_bare_zero_count() {
        assert_eq!(Bytes::new().to_bytes().unwrap(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_json_is_lowercase_hex() {
        let bytes = Bytes::from(vec![0xab, 0x01]);
        assert_eq!(serde_json::to_string(&bytes).unwrap(), "\"ab01\"");
        let back: Bytes = serde_json::from_str("\"ab01\"").unwrap();
        assert_eq!(back, bytes);
    }

    #[test]
    fn test_json_rejects_bad_hex() {
        assert!(serde_json::from_str::<Bytes>("\"abc\"").is_err());
        assert!(serde_json::from_str::<Bytes>("\"zz\"").is_err());
    }
}
