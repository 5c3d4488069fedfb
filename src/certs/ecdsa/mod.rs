// SPDX-License-Identifier: Apache-2.0

use crate::util::ReadExt;

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::io::{Error, ErrorKind, Result};

const DER_INTEGER: u8 = 0x02;
const DER_SEQUENCE: u8 = 0x30;

/// Largest scalar this crate handles (P-384).
const MAX_SCALAR_LEN: usize = 48;

#[derive(Clone, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "SignatureScalars")]
/// ECDSA signature.
///
/// `r` and `s` are kept as unsigned big-endian integers without leading
/// zero bytes.
pub struct Signature {
    r: Vec<u8>,

    s: Vec<u8>,
}

/// Wire form of [`Signature`], validated through [`Signature::new`] on the
/// way in.
#[derive(Deserialize)]
struct SignatureScalars {
    r: Vec<u8>,
    s: Vec<u8>,
}

impl TryFrom<SignatureScalars> for Signature {
    type Error = Error;

    fn try_from(value: SignatureScalars) -> Result<Self> {
        Self::new(&value.r, &value.s)
    }
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

fn scalar(name: &str, bytes: &[u8]) -> Result<Vec<u8>> {
    let value = strip_leading_zeros(bytes);

    if value.is_empty() {
        return Err(Error::new(
            ErrorKind::InvalidData,
            format!("signature component {name} is zero"),
        ));
    }

    if value.len() > MAX_SCALAR_LEN {
        return Err(Error::new(
            ErrorKind::InvalidData,
            format!("signature component {name} is {} bytes long", value.len()),
        ));
    }

    Ok(value.to_vec())
}

fn integer_from_der(name: &str, der: &[u8]) -> Result<Vec<u8>> {
    match der.first() {
        None => Err(Error::new(
            ErrorKind::InvalidData,
            format!("signature component {name} is empty"),
        )),
        Some(b) if b & 0x80 != 0 => Err(Error::new(
            ErrorKind::InvalidData,
            format!("signature component {name} is negative"),
        )),
        Some(_) => scalar(name, der),
    }
}

fn integer_to_der(value: &[u8], out: &mut Vec<u8>) {
    let pad = matches!(value.first(), Some(b) if b & 0x80 != 0);
    out.push(DER_INTEGER);
    out.push((value.len() + pad as usize) as u8);
    if pad {
        out.push(0);
    }
    out.extend_from_slice(value);
}

impl Signature {
    /// Creates a new signature from big-endian `r` and `s`. Leading zero
    /// bytes are dropped.
    pub fn new(r: &[u8], s: &[u8]) -> Result<Self> {
        Ok(Self {
            r: scalar("r", r)?,
            s: scalar("s", s)?,
        })
    }

    /// Parse a signature as emitted by the chip: `r` and `s` as two DER
    /// INTEGERs, without the enclosing SEQUENCE.
    pub fn from_chip_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = bytes;

        let r = integer_from_der("r", &reader.expect_tlv(DER_INTEGER)?)?;
        let s = integer_from_der("s", &reader.expect_tlv(DER_INTEGER)?)?;

        if !reader.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("{} trailing bytes after signature", reader.len()),
            ));
        }

        Ok(Self { r, s })
    }

    /// Parse a DER `ECDSA-Sig-Value` (`SEQUENCE { r INTEGER, s INTEGER }`).
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let mut reader = der;
        let body = reader.expect_tlv(DER_SEQUENCE)?;

        if !reader.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "trailing bytes after signature",
            ));
        }

        Self::from_chip_bytes(&body)
    }

    /// Returns the signature's `r` component
    pub fn r(&self) -> &[u8] {
        &self.r
    }

    /// Returns the signature's `s` component
    pub fn s(&self) -> &[u8] {
        &self.s
    }

    /// Encode as the chip does: two DER INTEGERs back to back.
    pub fn to_chip_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.r.len() + self.s.len() + 6);
        integer_to_der(&self.r, &mut out);
        integer_to_der(&self.s, &mut out);
        out
    }

    /// Encode as a DER `ECDSA-Sig-Value`.
    pub fn to_der(&self) -> Vec<u8> {
        let body = self.to_chip_bytes();
        let mut out = Vec::with_capacity(body.len() + 2);
        out.push(DER_SEQUENCE);
        out.push(body.len() as u8);
        out.extend_from_slice(&body);
        out
    }

    /// `r || s`, each left-padded to `field_len` bytes.
    pub fn to_fixed(&self, field_len: usize) -> Result<Vec<u8>> {
        if self.r.len() > field_len || self.s.len() > field_len {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("signature does not fit a {field_len} byte field"),
            ));
        }

        let mut out = vec![0u8; field_len * 2];
        out[field_len - self.r.len()..field_len].copy_from_slice(&self.r);
        out[field_len * 2 - self.s.len()..].copy_from_slice(&self.s);
        Ok(out)
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Signature {{ r:{}, s:{} }}",
            hex::encode(&self.r),
            hex::encode(&self.s)
        )
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            r#"Signature:
  R:{}
  S:{}"#,
            hex::encode(&self.r),
            hex::encode(&self.s)
        )
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = Error;

    /// Parses the chip's signature encoding.
    #[inline]
    fn try_from(value: &[u8]) -> Result<Self> {
        Self::from_chip_bytes(value)
    }
}

#[cfg(feature = "crypto_nossl")]
impl TryFrom<&Signature> for p256::ecdsa::Signature {
    type Error = Error;

    #[inline]
    fn try_from(signature: &Signature) -> Result<Self> {
        let fixed = signature.to_fixed(32)?;

        p256::ecdsa::Signature::from_slice(&fixed).map_err(|e| {
            Error::new(
                ErrorKind::InvalidData,
                format!("failed to deserialize signature from scalars: {e:?}"),
            )
        })
    }
}

#[cfg(feature = "openssl")]
impl TryFrom<&Signature> for openssl::ecdsa::EcdsaSig {
    type Error = Error;

    #[inline]
    fn try_from(value: &Signature) -> Result<Self> {
        let r = openssl::bn::BigNum::from_slice(&value.r)?;
        let s = openssl::bn::BigNum::from_slice(&value.s)?;
        Ok(openssl::ecdsa::EcdsaSig::from_private_components(r, s)?)
    }
}
