// SPDX-License-Identifier: Apache-2.0

use byteorder::ReadBytesExt;
use std::io::{Error, ErrorKind, Read, Result};

/// A tag-length-value entry with a single byte length.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tlv {
    pub tag: u8,
    pub value: Vec<u8>,
}

pub trait ReadExt: Read {
    /// Read the next TLV entry. Returns `Ok(None)` on a clean end of input.
    ///
    /// Lengths of `0x80` and above are DER long-form markers and rejected;
    /// nothing the chip emits for these structures needs them.
    fn read_tlv(&mut self) -> Result<Option<Tlv>>
    where
        Self: Sized,
    {
        let tag = match self.read_u8() {
            Ok(tag) => tag,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        };

        let len = self.read_u8()? as usize;
        if len >= 0x80 {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("long-form length {len:#04x} in TLV {tag:#04x}"),
            ));
        }

        let mut value = vec![0u8; len];
        self.read_exact(&mut value)?;

        Ok(Some(Tlv { tag, value }))
    }

    /// Read a TLV entry that must be present and carry `tag`.
    fn expect_tlv(&mut self, tag: u8) -> Result<Vec<u8>>
    where
        Self: Sized,
    {
        match self.read_tlv()? {
            Some(tlv) if tlv.tag == tag => Ok(tlv.value),
            Some(tlv) => Err(Error::new(
                ErrorKind::InvalidData,
                format!("expected tag {tag:#04x}, found {:#04x}", tlv.tag),
            )),
            None => Err(Error::new(
                ErrorKind::UnexpectedEof,
                format!("missing TLV {tag:#04x}"),
            )),
        }
    }
}

impl<R> ReadExt for R where R: Read {}
