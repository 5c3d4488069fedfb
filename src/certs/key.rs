// SPDX-License-Identifier: Apache-2.0

use crate::{device::Curve, util::ReadExt};

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::io::{Error, ErrorKind, Result};

const DER_BIT_STRING: u8 = 0x03;
const SEC1_UNCOMPRESSED: u8 = 0x04;

/// A public key as exported by the chip after key generation.
///
/// The chip wraps the uncompressed SEC1 point in a DER BIT STRING, e.g.
/// `03 42 00 04 X Y` for NIST P-256.
///
/// Serializes as the BIT STRING bytes, which are parsed again on the way in.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct PublicKey {
    curve: Curve,
    encoded: Vec<u8>,
}

impl PublicKey {
    /// Parse the chip's BIT STRING encoding of a public key.
    pub fn from_bit_string(bytes: &[u8]) -> Result<Self> {
        let mut reader = bytes;
        let body = reader.expect_tlv(DER_BIT_STRING)?;

        if !reader.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("{} trailing bytes after public key", reader.len()),
            ));
        }

        let (&unused_bits, point) = body
            .split_first()
            .ok_or_else(|| Error::new(ErrorKind::InvalidData, "empty BIT STRING"))?;

        if unused_bits != 0 {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("BIT STRING has {unused_bits} unused bits"),
            ));
        }

        if point.first() != Some(&SEC1_UNCOMPRESSED) {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "public key is not an uncompressed SEC1 point",
            ));
        }

        let curve = match point.len() {
            65 => Curve::NistP256,
            97 => Curve::NistP384,
            len => {
                return Err(Error::new(
                    ErrorKind::InvalidData,
                    format!("unexpected public key length {len}"),
                ))
            }
        };

        Ok(Self {
            curve,
            encoded: bytes.to_vec(),
        })
    }

    /// The curve the key lives on.
    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// The uncompressed SEC1 point (`04 X Y`).
    pub fn sec1(&self) -> &[u8] {
        // Tag, length and unused-bits bytes.
        &self.encoded[3..]
    }

    /// The BIT STRING exactly as exported by the chip.
    pub fn as_bit_string(&self) -> &[u8] {
        &self.encoded
    }
}

impl TryFrom<Vec<u8>> for PublicKey {
    type Error = Error;

    fn try_from(value: Vec<u8>) -> Result<Self> {
        Self::from_bit_string(&value)
    }
}

impl From<PublicKey> for Vec<u8> {
    fn from(key: PublicKey) -> Self {
        key.encoded
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} {}", self.curve, hex::encode(self.sec1()))
    }
}
