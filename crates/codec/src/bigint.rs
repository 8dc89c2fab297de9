//! Arbitrary-width unsigned integers on the wire.
//!
//! The legacy on-chain form: one length byte holding the minimal byte count
//! of the magnitude, then that many magnitude bytes least-significant first.
//! Zero is the single byte `0x00`. Encoders must not emit leading zero
//! magnitude bytes; decoders accept any length up to the type's width.

use primitive_types::{U128, U256, U512};

use crate::{Error, FromBytes, ToBytes, U8_SERIALIZED_LENGTH, safe_split_at};

macro_rules! impl_big_uint {
    ($t:ty, $width:expr) => {
        impl ToBytes for $t {
            fn to_bytes(&self) -> Result<Vec<u8>, Error> {
                let mut result = Vec::with_capacity(self.serialized_length());
                self.write_bytes(&mut result)?;
                Ok(result)
            }

            fn serialized_length(&self) -> usize {
                U8_SERIALIZED_LENGTH + (self.bits() + 7) / 8
            }

            fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
                let length = (self.bits() + 7) / 8;
                let mut buffer = [0u8; $width];
                self.to_little_endian(&mut buffer);
                writer.push(length as u8);
                writer.extend_from_slice(&buffer[..length]);
                Ok(())
            }
        }

        impl FromBytes for $t {
            fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
                let (length, remainder) = u8::from_bytes(bytes)?;
                if usize::from(length) > $width {
                    return Err(Error::Formatting);
                }
                let (magnitude, remainder) = safe_split_at(remainder, usize::from(length))?;
                Ok((<$t>::from_little_endian(magnitude), remainder))
            }
        }
    };
}

impl_big_uint!(U128, 16);
impl_big_uint!(U256, 32);
impl_big_uint!(U512, 64);
