//! Canonical binary codec for the Casper wire format.
//!
//! Everything that crosses the wire — runtime arguments, deploy headers, the
//! preimages of the body and deploy hashes — is produced by the traits in this
//! crate, so the encoding must be byte-exact and deterministic. The format is
//! little-endian throughout and length-prefixed (u32) for variable-length
//! data.

mod bigint;
mod bytes;

pub use bytes::Bytes;

use thiserror::Error;

/// Serialized length of a `u8` / tag byte.
pub const U8_SERIALIZED_LENGTH: usize = 1;
/// Serialized length of a `u32` / length prefix.
pub const U32_SERIALIZED_LENGTH: usize = 4;
/// Serialized length of a `u64`.
pub const U64_SERIALIZED_LENGTH: usize = 8;
/// Serialized length of an `Option` discriminant or `bool`.
pub const BOOL_SERIALIZED_LENGTH: usize = 1;

/// Decoding failure.
///
/// The codec never panics on malformed input; every failure is one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The input ended before the declared length was read.
    #[error("unexpected end of input while decoding")]
    EarlyEndOfStream,
    /// A byte that has no valid interpretation: a bool outside {0, 1}, an
    /// unknown discriminant, invalid UTF-8, or a big-integer length byte
    /// exceeding the type's width.
    #[error("malformed encoding")]
    Formatting,
    /// Input remained after an all-at-once decode consumed its value.
    #[error("trailing bytes after decoded value")]
    LeftOverBytes,
}

/// Types that serialize to the canonical byte form.
pub trait ToBytes {
    /// Returns the canonical byte form.
    fn to_bytes(&self) -> Result<Vec<u8>, Error>;

    /// Exact length of [`Self::to_bytes`], computed without allocating.
    fn serialized_length(&self) -> usize;

    /// Appends the canonical byte form to `writer`.
    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        writer.extend_from_slice(&self.to_bytes()?);
        Ok(())
    }
}

/// Types that deserialize from the canonical byte form.
///
/// Decoders consume exactly their declared length and hand back the
/// remainder; the caller tracks offsets.
pub trait FromBytes: Sized {
    /// Decodes a value from the front of `bytes`, returning it together with
    /// the unconsumed remainder.
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error>;
}

/// Serializes `value` into a fresh buffer.
pub fn serialize<T: ToBytes>(value: &T) -> Result<Vec<u8>, Error> {
    value.to_bytes()
}

/// Deserializes a value that must consume the whole input.
pub fn deserialize<T: FromBytes>(bytes: &[u8]) -> Result<T, Error> {
    let (value, remainder) = T::from_bytes(bytes)?;
    if remainder.is_empty() {
        Ok(value)
    } else {
        Err(Error::LeftOverBytes)
    }
}

/// Allocates a buffer sized for `value`'s serialized form.
pub fn allocate_buffer<T: ToBytes>(value: &T) -> Result<Vec<u8>, Error> {
    Ok(Vec::with_capacity(value.serialized_length()))
}

/// Splits off `count` bytes, or fails if the input is too short.
pub fn safe_split_at(bytes: &[u8], count: usize) -> Result<(&[u8], &[u8]), Error> {
    if count > bytes.len() {
        Err(Error::EarlyEndOfStream)
    } else {
        Ok(bytes.split_at(count))
    }
}

fn read_array<const N: usize>(bytes: &[u8]) -> Result<([u8; N], &[u8]), Error> {
    let (head, remainder) = safe_split_at(bytes, N)?;
    let mut array = [0u8; N];
    array.copy_from_slice(head);
    Ok((array, remainder))
}

impl ToBytes for bool {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(vec![*self as u8])
    }

    fn serialized_length(&self) -> usize {
        BOOL_SERIALIZED_LENGTH
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        writer.push(*self as u8);
        Ok(())
    }
}

impl FromBytes for bool {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        match bytes.split_first() {
            None => Err(Error::EarlyEndOfStream),
            Some((&0, remainder)) => Ok((false, remainder)),
            Some((&1, remainder)) => Ok((true, remainder)),
            Some(_) => Err(Error::Formatting),
        }
    }
}

impl ToBytes for u8 {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(vec![*self])
    }

    fn serialized_length(&self) -> usize {
        U8_SERIALIZED_LENGTH
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        writer.push(*self);
        Ok(())
    }
}

impl FromBytes for u8 {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        match bytes.split_first() {
            Some((byte, remainder)) => Ok((*byte, remainder)),
            None => Err(Error::EarlyEndOfStream),
        }
    }
}

macro_rules! impl_fixed_width_int {
    ($($t:ty),*) => {
        $(
            impl ToBytes for $t {
                fn to_bytes(&self) -> Result<Vec<u8>, Error> {
                    Ok(self.to_le_bytes().to_vec())
                }

                fn serialized_length(&self) -> usize {
                    size_of::<$t>()
                }

                fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
                    writer.extend_from_slice(&self.to_le_bytes());
                    Ok(())
                }
            }

            impl FromBytes for $t {
                fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
                    let (array, remainder) = read_array(bytes)?;
                    Ok((<$t>::from_le_bytes(array), remainder))
                }
            }
        )*
    };
}

impl_fixed_width_int!(i8, i32, u32, i64, u64);

impl ToBytes for () {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(Vec::new())
    }

    fn serialized_length(&self) -> usize {
        0
    }

    fn write_bytes(&self, _writer: &mut Vec<u8>) -> Result<(), Error> {
        Ok(())
    }
}

impl FromBytes for () {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        Ok(((), bytes))
    }
}

impl ToBytes for str {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut result = Vec::with_capacity(self.serialized_length());
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        U32_SERIALIZED_LENGTH + self.len()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        (self.len() as u32).write_bytes(writer)?;
        writer.extend_from_slice(self.as_bytes());
        Ok(())
    }
}

impl ToBytes for &str {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        (**self).to_bytes()
    }

    fn serialized_length(&self) -> usize {
        (**self).serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        (**self).write_bytes(writer)
    }
}

impl ToBytes for String {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        self.as_str().to_bytes()
    }

    fn serialized_length(&self) -> usize {
        self.as_str().serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        self.as_str().write_bytes(writer)
    }
}

impl FromBytes for String {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (length, remainder) = u32::from_bytes(bytes)?;
        let (raw, remainder) = safe_split_at(remainder, length as usize)?;
        let string = core::str::from_utf8(raw).map_err(|_| Error::Formatting)?;
        Ok((string.to_owned(), remainder))
    }
}

impl<T: ToBytes> ToBytes for Option<T> {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut result = Vec::with_capacity(self.serialized_length());
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        BOOL_SERIALIZED_LENGTH
            + match self {
                Some(value) => value.serialized_length(),
                None => 0,
            }
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        match self {
            None => writer.push(0),
            Some(value) => {
                writer.push(1);
                value.write_bytes(writer)?;
            }
        }
        Ok(())
    }
}

impl<T: FromBytes> FromBytes for Option<T> {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (tag, remainder) = u8::from_bytes(bytes)?;
        match tag {
            0 => Ok((None, remainder)),
            1 => {
                let (value, remainder) = T::from_bytes(remainder)?;
                Ok((Some(value), remainder))
            }
            _ => Err(Error::Formatting),
        }
    }
}

impl<T: ToBytes> ToBytes for Vec<T> {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut result = Vec::with_capacity(self.serialized_length());
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        U32_SERIALIZED_LENGTH
            + self
                .iter()
                .map(ToBytes::serialized_length)
                .sum::<usize>()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        (self.len() as u32).write_bytes(writer)?;
        for item in self {
            item.write_bytes(writer)?;
        }
        Ok(())
    }
}

impl<T: FromBytes> FromBytes for Vec<T> {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (count, mut remainder) = u32::from_bytes(bytes)?;
        let mut result = Vec::new();
        for _ in 0..count {
            let (item, rest) = T::from_bytes(remainder)?;
            result.push(item);
            remainder = rest;
        }
        Ok((result, remainder))
    }
}

impl<const N: usize> ToBytes for [u8; N] {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(self.to_vec())
    }

    fn serialized_length(&self) -> usize {
        N
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        writer.extend_from_slice(self);
        Ok(())
    }
}

impl<const N: usize> FromBytes for [u8; N] {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        read_array(bytes)
    }
}

macro_rules! impl_tuple {
    ($(($($name:ident),+)),* $(,)?) => {
        $(
            #[allow(non_snake_case)]
            impl<$($name: ToBytes),+> ToBytes for ($($name,)+) {
                fn to_bytes(&self) -> Result<Vec<u8>, Error> {
                    let mut result = Vec::with_capacity(self.serialized_length());
                    self.write_bytes(&mut result)?;
                    Ok(result)
                }

                fn serialized_length(&self) -> usize {
                    let ($($name,)+) = self;
                    0 $(+ $name.serialized_length())+
                }

                fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
                    let ($($name,)+) = self;
                    $($name.write_bytes(writer)?;)+
                    Ok(())
                }
            }

            #[allow(non_snake_case)]
            impl<$($name: FromBytes),+> FromBytes for ($($name,)+) {
                fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
                    let remainder = bytes;
                    $(let ($name, remainder) = $name::from_bytes(remainder)?;)+
                    Ok((($($name,)+), remainder))
                }
            }
        )*
    };
}

impl_tuple!((T1), (T1, T2), (T1, T2, T3));

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip<T>(value: T)
    where
        T: ToBytes + FromBytes + PartialEq + core::fmt::Debug,
    {
        let encoded = value.to_bytes().expect("should encode");
        assert_eq!(encoded.len(), value.serialized_length());
        let decoded: T = deserialize(&encoded).expect("should decode");
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_primitive_round_trips() {
        round_trip(true);
        round_trip(false);
        round_trip(7u8);
        round_trip(-7i8);
        round_trip(7i32);
        round_trip(i32::MIN);
        round_trip(7u32);
        round_trip(7i64);
        round_trip(1024u64);
        round_trip(u64::MAX);
        round_trip(());
        round_trip(String::from("Hello, World!"));
        round_trip(String::new());
    }

    #[test]
    fn test_little_endian_layout() {
        assert_eq!(1024u64.to_bytes().unwrap(), hex::decode("0004000000000000").unwrap());
        assert_eq!(7u32.to_bytes().unwrap(), hex::decode("07000000").unwrap());
    }

    #[test]
    fn test_string_layout() {
        let encoded = "Hello, World!".to_bytes().unwrap();
        assert_eq!(hex::encode(encoded), "0d00000048656c6c6f2c20576f726c6421");
    }

    #[test]
    fn test_string_rejects_invalid_utf8() {
        // length prefix 2, then an orphaned continuation byte
        let bytes = [2, 0, 0, 0, 0x80, 0x80];
        assert_eq!(String::from_bytes(&bytes).unwrap_err(), Error::Formatting);
    }

    #[test]
    fn test_bool_rejects_other_bytes() {
        assert_eq!(bool::from_bytes(&[2]).unwrap_err(), Error::Formatting);
        assert_eq!(bool::from_bytes(&[]).unwrap_err(), Error::EarlyEndOfStream);
    }

    #[test]
    fn test_option_round_trips() {
        round_trip(Some(7u64));
        round_trip(Option::<u64>::None);
        assert_eq!(Some(7u64).to_bytes().unwrap(), hex::decode("010700000000000000").unwrap());
        assert_eq!(Option::<u64>::None.to_bytes().unwrap(), vec![0]);
    }

    #[test]
    fn test_vec_round_trips() {
        round_trip(vec![1u32, 2, 3]);
        round_trip(Vec::<u32>::new());
        assert_eq!(
            hex::encode(vec![1u32, 2, 3].to_bytes().unwrap()),
            "03000000010000000200000003000000"
        );
    }

    #[test]
    fn test_fixed_array_has_no_prefix() {
        let array = [1u8, 2, 3, 4];
        assert_eq!(array.to_bytes().unwrap(), vec![1, 2, 3, 4]);
        round_trip(array);
    }

    #[test]
    fn test_tuples_concatenate() {
        round_trip((1u32,));
        round_trip((1u32, String::from("Hello, World!")));
        round_trip((1u32, String::from("Hello, World!"), true));
        assert_eq!(
            hex::encode((1u32, String::from("Hello, World!"), true).to_bytes().unwrap()),
            "010000000d00000048656c6c6f2c20576f726c642101"
        );
    }

    #[test]
    fn test_length_prefix_exceeding_input_is_early_end() {
        // declares 10 bytes, supplies 2
        let bytes = [10, 0, 0, 0, 1, 2];
        assert_eq!(String::from_bytes(&bytes).unwrap_err(), Error::EarlyEndOfStream);
        assert_eq!(Vec::<u8>::from_bytes(&bytes).unwrap_err(), Error::EarlyEndOfStream);
    }

    #[test]
    fn test_deserialize_rejects_trailing_bytes() {
        let mut encoded = 7u32.to_bytes().unwrap();
        encoded.push(0xff);
        assert_eq!(deserialize::<u32>(&encoded).unwrap_err(), Error::LeftOverBytes);
    }

    #[test]
    fn test_from_bytes_returns_remainder() {
        let bytes = [7, 0, 0, 0, 0xaa, 0xbb];
        let (value, remainder) = u32::from_bytes(&bytes).unwrap();
        assert_eq!(value, 7);
        assert_eq!(remainder, &[0xaa, 0xbb]);
    }
}
