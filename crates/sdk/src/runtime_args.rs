//! Named runtime arguments for executable deploy items.

use casper_sdk_codec::{Error as CodecError, FromBytes, ToBytes, U32_SERIALIZED_LENGTH};
use casper_sdk_types::{CLValue, CLValueError};
use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeSeq};

/// A single `(name, value)` argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedArg {
    name: String,
    value: CLValue,
}

impl NamedArg {
    pub fn new<N: Into<String>>(name: N, value: CLValue) -> NamedArg {
        NamedArg {
            name: name.into(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &CLValue {
        &self.value
    }
}

// CLValue encoding only fails through the codec; a type error cannot occur
// when writing an already-constructed value.
fn flatten(error: CLValueError) -> CodecError {
    match error {
        CLValueError::Serialization(codec) => codec,
        CLValueError::Type(_) => CodecError::Formatting,
    }
}

impl ToBytes for NamedArg {
    fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut result = Vec::with_capacity(self.serialized_length());
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        self.name.serialized_length()
            + U32_SERIALIZED_LENGTH
            + self.value.serialized_length()
            + self.value.cl_type().serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CodecError> {
        self.name.write_bytes(writer)?;
        let value_with_type = self.value.to_bytes_with_type().map_err(flatten)?;
        writer.extend_from_slice(&value_with_type);
        Ok(())
    }
}

impl FromBytes for NamedArg {
    fn from_bytes(bytes: &[u8]) -> Result<(NamedArg, &[u8]), CodecError> {
        let (name, remainder) = String::from_bytes(bytes)?;
        let (value, remainder) = CLValue::from_bytes_with_type(remainder).map_err(flatten)?;
        Ok((NamedArg { name, value }, remainder))
    }
}

/// An ordered sequence of named arguments.
///
/// Order is significant: it enters the deploy hash, so two deploys identical
/// except for argument insertion order hash differently. Names are unique;
/// re-inserting a name replaces its value but keeps its original position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuntimeArgs {
    args: Vec<NamedArg>,
}

impl RuntimeArgs {
    pub fn new() -> RuntimeArgs {
        RuntimeArgs::default()
    }

    /// Inserts an argument, replacing the value in place if the name is
    /// already present and appending otherwise.
    pub fn insert<N, V>(&mut self, name: N, value: V)
    where
        N: Into<String>,
        V: Into<CLValue>,
    {
        let name = name.into();
        let value = value.into();
        match self.args.iter_mut().find(|arg| arg.name == name) {
            Some(existing) => existing.value = value,
            None => self.args.push(NamedArg { name, value }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CLValue> {
        self.args
            .iter()
            .find(|arg| arg.name == name)
            .map(|arg| &arg.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedArg> {
        self.args.iter()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

impl FromIterator<(String, CLValue)> for RuntimeArgs {
    fn from_iter<I: IntoIterator<Item = (String, CLValue)>>(iter: I) -> RuntimeArgs {
        let mut args = RuntimeArgs::new();
        for (name, value) in iter {
            args.insert(name, value);
        }
        args
    }
}

impl ToBytes for RuntimeArgs {
    fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut result = Vec::with_capacity(self.serialized_length());
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        U32_SERIALIZED_LENGTH
            + self
                .args
                .iter()
                .map(NamedArg::serialized_length)
                .sum::<usize>()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CodecError> {
        (self.args.len() as u32).write_bytes(writer)?;
        for arg in &self.args {
            arg.write_bytes(writer)?;
        }
        Ok(())
    }
}

impl FromBytes for RuntimeArgs {
    fn from_bytes(bytes: &[u8]) -> Result<(RuntimeArgs, &[u8]), CodecError> {
        let (count, mut remainder) = u32::from_bytes(bytes)?;
        let mut args = Vec::new();
        for _ in 0..count {
            let (arg, rest) = NamedArg::from_bytes(remainder)?;
            args.push(arg);
            remainder = rest;
        }
        Ok((RuntimeArgs { args }, remainder))
    }
}

// Runtime args travel in deploy JSON as an array of `[name, value]` pairs.
impl Serialize for RuntimeArgs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.args.len()))?;
        for arg in &self.args {
            seq.serialize_element(&(&arg.name, &arg.value))?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for RuntimeArgs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs = Vec::<(String, CLValue)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitive_types::U512;

    #[test]
    fn test_named_arg_wire_form() {
        let arg = NamedArg::new("amount", CLValue::U512(U512::from(10_000_000u64)));
        let encoded = arg.to_bytes().unwrap();
        assert_eq!(
            encoded,
            vec![6, 0, 0, 0, 97, 109, 111, 117, 110, 116, 4, 0, 0, 0, 3, 128, 150, 152, 8]
        );
        assert_eq!(encoded.len(), arg.serialized_length());
        let (decoded, remainder) = NamedArg::from_bytes(&encoded).unwrap();
        assert_eq!(decoded, arg);
        assert!(remainder.is_empty());
    }

    #[test]
    fn test_args_wire_form_is_count_then_args_in_order() {
        let mut args = RuntimeArgs::new();
        args.insert("amount", CLValue::U512(U512::from(10_000u64)));
        let encoded = args.to_bytes().unwrap();
        assert_eq!(
            hex::encode(&encoded),
            "0100000006000000616d6f756e740300000002102708"
        );
        let (decoded, _) = RuntimeArgs::from_bytes(&encoded).unwrap();
        assert_eq!(decoded, args);
    }

    #[test]
    fn test_insert_replaces_value_but_keeps_position() {
        let mut args = RuntimeArgs::new();
        args.insert("first", CLValue::U64(1));
        args.insert("second", CLValue::U64(2));
        args.insert("first", CLValue::U64(3));
        assert_eq!(args.len(), 2);
        let names: Vec<&str> = args.iter().map(NamedArg::name).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(args.get("first"), Some(&CLValue::U64(3)));
    }

    #[test]
    fn test_insertion_order_changes_the_bytes() {
        let mut forward = RuntimeArgs::new();
        forward.insert("a", CLValue::U64(1));
        forward.insert("b", CLValue::U64(2));
        let mut reverse = RuntimeArgs::new();
        reverse.insert("b", CLValue::U64(2));
        reverse.insert("a", CLValue::U64(1));
        assert_ne!(forward.to_bytes().unwrap(), reverse.to_bytes().unwrap());
    }

    #[test]
    fn test_json_is_an_array_of_pairs() {
        let mut args = RuntimeArgs::new();
        args.insert("amount", CLValue::U512(U512::from(10_000u64)));
        let json = serde_json::to_value(&args).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                ["amount", {"cl_type": "U512", "bytes": "021027", "parsed": "10000"}]
            ])
        );
        let back: RuntimeArgs = serde_json::from_value(json).unwrap();
        assert_eq!(back, args);
    }
}
