//! Type descriptors for [`CLValue`](crate::CLValue)s.

use core::fmt;

use casper_sdk_codec::{
    Error as CodecError, FromBytes, ToBytes, U8_SERIALIZED_LENGTH, U32_SERIALIZED_LENGTH,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

const BOOL_TAG: u8 = 0;
const I32_TAG: u8 = 1;
const I64_TAG: u8 = 2;
const U8_TAG: u8 = 3;
const U32_TAG: u8 = 4;
const U64_TAG: u8 = 5;
const U128_TAG: u8 = 6;
const U256_TAG: u8 = 7;
const U512_TAG: u8 = 8;
const UNIT_TAG: u8 = 9;
const STRING_TAG: u8 = 10;
const KEY_TAG: u8 = 11;
const UREF_TAG: u8 = 12;
const OPTION_TAG: u8 = 13;
const LIST_TAG: u8 = 14;
const BYTE_ARRAY_TAG: u8 = 15;
const RESULT_TAG: u8 = 16;
const MAP_TAG: u8 = 17;
const TUPLE1_TAG: u8 = 18;
const TUPLE2_TAG: u8 = 19;
const TUPLE3_TAG: u8 = 20;
const ANY_TAG: u8 = 21;
const PUBLIC_KEY_TAG: u8 = 22;

/// The closed set of shapes a [`CLValue`](crate::CLValue) can take.
///
/// The one-byte tags are stable on the wire; compound descriptors follow
/// their tag with the inner descriptors (recursively), and `ByteArray` with
/// its u32 length.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CLType {
    Bool,
    I32,
    I64,
    U8,
    U32,
    U64,
    U128,
    U256,
    U512,
    Unit,
    String,
    Key,
    URef,
    Option(Box<CLType>),
    List(Box<CLType>),
    ByteArray(u32),
    Result { ok: Box<CLType>, err: Box<CLType> },
    Map { key: Box<CLType>, value: Box<CLType> },
    Tuple1([Box<CLType>; 1]),
    Tuple2([Box<CLType>; 2]),
    Tuple3([Box<CLType>; 3]),
    Any,
    PublicKey,
}

impl CLType {
    /// The wire tag of this descriptor.
    pub fn tag(&self) -> u8 {
        match self {
            CLType::Bool => BOOL_TAG,
            CLType::I32 => I32_TAG,
            CLType::I64 => I64_TAG,
            CLType::U8 => U8_TAG,
            CLType::U32 => U32_TAG,
            CLType::U64 => U64_TAG,
            CLType::U128 => U128_TAG,
            CLType::U256 => U256_TAG,
            CLType::U512 => U512_TAG,
            CLType::Unit => UNIT_TAG,
            CLType::String => STRING_TAG,
            CLType::Key => KEY_TAG,
            CLType::URef => UREF_TAG,
            CLType::Option(_) => OPTION_TAG,
            CLType::List(_) => LIST_TAG,
            CLType::ByteArray(_) => BYTE_ARRAY_TAG,
            CLType::Result { .. } => RESULT_TAG,
            CLType::Map { .. } => MAP_TAG,
            CLType::Tuple1(_) => TUPLE1_TAG,
            CLType::Tuple2(_) => TUPLE2_TAG,
            CLType::Tuple3(_) => TUPLE3_TAG,
            CLType::Any => ANY_TAG,
            CLType::PublicKey => PUBLIC_KEY_TAG,
        }
    }

    /// Convenience constructor for `Option(inner)`.
    pub fn option(inner: CLType) -> CLType {
        CLType::Option(Box::new(inner))
    }

    /// Convenience constructor for `List(inner)`.
    pub fn list(inner: CLType) -> CLType {
        CLType::List(Box::new(inner))
    }

    /// Convenience constructor for `Result(ok, err)`.
    pub fn result(ok: CLType, err: CLType) -> CLType {
        CLType::Result {
            ok: Box::new(ok),
            err: Box::new(err),
        }
    }

    /// Convenience constructor for `Map(key, value)`.
    pub fn map(key: CLType, value: CLType) -> CLType {
        CLType::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }
}

impl fmt::Display for CLType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CLType::Option(inner) => write!(f, "Option<{inner}>"),
            CLType::List(inner) => write!(f, "List<{inner}>"),
            CLType::ByteArray(length) => write!(f, "ByteArray({length})"),
            CLType::Result { ok, err } => write!(f, "Result<{ok}, {err}>"),
            CLType::Map { key, value } => write!(f, "Map<{key}, {value}>"),
            CLType::Tuple1([t1]) => write!(f, "Tuple1<{t1}>"),
            CLType::Tuple2([t1, t2]) => write!(f, "Tuple2<{t1}, {t2}>"),
            CLType::Tuple3([t1, t2, t3]) => write!(f, "Tuple3<{t1}, {t2}, {t3}>"),
            simple => f.write_str(simple_name(simple)),
        }
    }
}

fn simple_name(cl_type: &CLType) -> &'static str {
    match cl_type {
        CLType::Bool => "Bool",
        CLType::I32 => "I32",
        CLType::I64 => "I64",
        CLType::U8 => "U8",
        CLType::U32 => "U32",
        CLType::U64 => "U64",
        CLType::U128 => "U128",
        CLType::U256 => "U256",
        CLType::U512 => "U512",
        CLType::Unit => "Unit",
        CLType::String => "String",
        CLType::Key => "Key",
        CLType::URef => "URef",
        CLType::Any => "Any",
        CLType::PublicKey => "PublicKey",
        _ => "",
    }
}

fn simple_from_name(name: &str) -> Option<CLType> {
    let cl_type = match name {
        "Bool" => CLType::Bool,
        "I32" => CLType::I32,
        "I64" => CLType::I64,
        "U8" => CLType::U8,
        "U32" => CLType::U32,
        "U64" => CLType::U64,
        "U128" => CLType::U128,
        "U256" => CLType::U256,
        "U512" => CLType::U512,
        "Unit" => CLType::Unit,
        "String" => CLType::String,
        "Key" => CLType::Key,
        "URef" => CLType::URef,
        "Any" => CLType::Any,
        "PublicKey" => CLType::PublicKey,
        _ => return None,
    };
    Some(cl_type)
}

impl ToBytes for CLType {
    fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut result = Vec::with_capacity(self.serialized_length());
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        U8_SERIALIZED_LENGTH
            + match self {
                CLType::Option(inner) | CLType::List(inner) => inner.serialized_length(),
                CLType::ByteArray(_) => U32_SERIALIZED_LENGTH,
                CLType::Result { ok, err } => ok.serialized_length() + err.serialized_length(),
                CLType::Map { key, value } => key.serialized_length() + value.serialized_length(),
                CLType::Tuple1(types) => types.iter().map(|t| t.serialized_length()).sum(),
                CLType::Tuple2(types) => types.iter().map(|t| t.serialized_length()).sum(),
                CLType::Tuple3(types) => types.iter().map(|t| t.serialized_length()).sum(),
                _ => 0,
            }
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CodecError> {
        writer.push(self.tag());
        match self {
            CLType::Option(inner) | CLType::List(inner) => inner.write_bytes(writer)?,
            CLType::ByteArray(length) => length.write_bytes(writer)?,
            CLType::Result { ok, err } => {
                ok.write_bytes(writer)?;
                err.write_bytes(writer)?;
            }
            CLType::Map { key, value } => {
                key.write_bytes(writer)?;
                value.write_bytes(writer)?;
            }
            CLType::Tuple1(types) => {
                for cl_type in types {
                    cl_type.write_bytes(writer)?;
                }
            }
            CLType::Tuple2(types) => {
                for cl_type in types {
                    cl_type.write_bytes(writer)?;
                }
            }
            CLType::Tuple3(types) => {
                for cl_type in types {
                    cl_type.write_bytes(writer)?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl FromBytes for CLType {
    fn from_bytes(bytes: &[u8]) -> Result<(CLType, &[u8]), CodecError> {
        let (tag, remainder) = u8::from_bytes(bytes)?;
        match tag {
            BOOL_TAG => Ok((CLType::Bool, remainder)),
            I32_TAG => Ok((CLType::I32, remainder)),
            I64_TAG => Ok((CLType::I64, remainder)),
            U8_TAG => Ok((CLType::U8, remainder)),
            U32_TAG => Ok((CLType::U32, remainder)),
            U64_TAG => Ok((CLType::U64, remainder)),
            U128_TAG => Ok((CLType::U128, remainder)),
            U256_TAG => Ok((CLType::U256, remainder)),
            U512_TAG => Ok((CLType::U512, remainder)),
            UNIT_TAG => Ok((CLType::Unit, remainder)),
            STRING_TAG => Ok((CLType::String, remainder)),
            KEY_TAG => Ok((CLType::Key, remainder)),
            UREF_TAG => Ok((CLType::URef, remainder)),
            OPTION_TAG => {
                let (inner, remainder) = CLType::from_bytes(remainder)?;
                Ok((CLType::option(inner), remainder))
            }
            LIST_TAG => {
                let (inner, remainder) = CLType::from_bytes(remainder)?;
                Ok((CLType::list(inner), remainder))
            }
            BYTE_ARRAY_TAG => {
                let (length, remainder) = u32::from_bytes(remainder)?;
                Ok((CLType::ByteArray(length), remainder))
            }
            RESULT_TAG => {
                let (ok, remainder) = CLType::from_bytes(remainder)?;
                let (err, remainder) = CLType::from_bytes(remainder)?;
                Ok((CLType::result(ok, err), remainder))
            }
            MAP_TAG => {
                let (key, remainder) = CLType::from_bytes(remainder)?;
                let (value, remainder) = CLType::from_bytes(remainder)?;
                Ok((CLType::map(key, value), remainder))
            }
            TUPLE1_TAG => {
                let (t1, remainder) = CLType::from_bytes(remainder)?;
                Ok((CLType::Tuple1([Box::new(t1)]), remainder))
            }
            TUPLE2_TAG => {
                let (t1, remainder) = CLType::from_bytes(remainder)?;
                let (t2, remainder) = CLType::from_bytes(remainder)?;
                Ok((CLType::Tuple2([Box::new(t1), Box::new(t2)]), remainder))
            }
            TUPLE3_TAG => {
                let (t1, remainder) = CLType::from_bytes(remainder)?;
                let (t2, remainder) = CLType::from_bytes(remainder)?;
                let (t3, remainder) = CLType::from_bytes(remainder)?;
                Ok((
                    CLType::Tuple3([Box::new(t1), Box::new(t2), Box::new(t3)]),
                    remainder,
                ))
            }
            ANY_TAG => Ok((CLType::Any, remainder)),
            PUBLIC_KEY_TAG => Ok((CLType::PublicKey, remainder)),
            _ => Err(CodecError::Formatting),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ResultShim {
    ok: CLType,
    err: CLType,
}

#[derive(Serialize, Deserialize)]
struct MapShim {
    key: CLType,
    value: CLType,
}

impl Serialize for CLType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CLType::Option(inner) => {
                serializer.serialize_newtype_variant("CLType", OPTION_TAG as u32, "Option", inner)
            }
            CLType::List(inner) => {
                serializer.serialize_newtype_variant("CLType", LIST_TAG as u32, "List", inner)
            }
            CLType::ByteArray(length) => serializer.serialize_newtype_variant(
                "CLType",
                BYTE_ARRAY_TAG as u32,
                "ByteArray",
                length,
            ),
            CLType::Result { ok, err } => serializer.serialize_newtype_variant(
                "CLType",
                RESULT_TAG as u32,
                "Result",
                &ResultShim {
                    ok: (**ok).clone(),
                    err: (**err).clone(),
                },
            ),
            CLType::Map { key, value } => serializer.serialize_newtype_variant(
                "CLType",
                MAP_TAG as u32,
                "Map",
                &MapShim {
                    key: (**key).clone(),
                    value: (**value).clone(),
                },
            ),
            CLType::Tuple1(types) => {
                serializer.serialize_newtype_variant("CLType", TUPLE1_TAG as u32, "Tuple1", types)
            }
            CLType::Tuple2(types) => {
                serializer.serialize_newtype_variant("CLType", TUPLE2_TAG as u32, "Tuple2", types)
            }
            CLType::Tuple3(types) => {
                serializer.serialize_newtype_variant("CLType", TUPLE3_TAG as u32, "Tuple3", types)
            }
            simple => serializer.serialize_str(simple_name(simple)),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CLTypeShim {
    Simple(String),
    Option {
        #[serde(rename = "Option")]
        inner: Box<CLType>,
    },
    List {
        #[serde(rename = "List")]
        inner: Box<CLType>,
    },
    ByteArray {
        #[serde(rename = "ByteArray")]
        length: u32,
    },
    Result {
        #[serde(rename = "Result")]
        inner: ResultShim,
    },
    Map {
        #[serde(rename = "Map")]
        inner: MapShim,
    },
    Tuple1 {
        #[serde(rename = "Tuple1")]
        types: [Box<CLType>; 1],
    },
    Tuple2 {
        #[serde(rename = "Tuple2")]
        types: [Box<CLType>; 2],
    },
    Tuple3 {
        #[serde(rename = "Tuple3")]
        types: [Box<CLType>; 3],
    },
}

impl<'de> Deserialize<'de> for CLType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let shim = CLTypeShim::deserialize(deserializer)?;
        let cl_type = match shim {
            CLTypeShim::Simple(name) => simple_from_name(&name)
                .ok_or_else(|| de::Error::custom(format!("unknown cl_type `{name}`")))?,
            CLTypeShim::Option { inner } => CLType::Option(inner),
            CLTypeShim::List { inner } => CLType::List(inner),
            CLTypeShim::ByteArray { length } => CLType::ByteArray(length),
            CLTypeShim::Result { inner } => CLType::result(inner.ok, inner.err),
            CLTypeShim::Map { inner } => CLType::map(inner.key, inner.value),
            CLTypeShim::Tuple1 { types } => CLType::Tuple1(types),
            CLTypeShim::Tuple2 { types } => CLType::Tuple2(types),
            CLTypeShim::Tuple3 { types } => CLType::Tuple3(types),
        };
        Ok(cl_type)
    }
}
