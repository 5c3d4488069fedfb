// SPDX-License-Identifier: Apache-2.0

use super::types::{Curve, KeyUsage, LifeCycleState};
use crate::{error::MetadataError, util::ReadExt};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const METADATA_TAG: u8 = 0x20;

const TAG_LCSO: u8 = 0xC0;
const TAG_VERSION: u8 = 0xC1;
const TAG_MAX_SIZE: u8 = 0xC4;
const TAG_USED_SIZE: u8 = 0xC5;
const TAG_CHANGE: u8 = 0xD0;
const TAG_READ: u8 = 0xD1;
const TAG_EXECUTE: u8 = 0xD3;
const TAG_ALGORITHM: u8 = 0xE0;
const TAG_KEY_USAGE: u8 = 0xE1;
const TAG_DATA_OBJECT_TYPE: u8 = 0xE8;

/// Decoded metadata of a data object or key slot.
///
/// Access conditions are kept as the raw condition bytes (e.g. `[0x00]`
/// for "always", `[0xFF]` for "never").
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct Metadata {
    /// Life cycle state of the object.
    pub lcso: Option<LifeCycleState>,

    /// Version information.
    pub version: Option<u16>,

    /// Maximum size of the object in bytes.
    pub max_size: Option<u16>,

    /// Number of bytes currently used by the object.
    pub used_size: Option<u16>,

    /// Access condition for writing the object.
    pub change: Option<Vec<u8>>,

    /// Access condition for reading the object.
    pub read: Option<Vec<u8>>,

    /// Access condition for using the object in a command.
    pub execute: Option<Vec<u8>>,

    /// Algorithm of a key object.
    pub algorithm: Option<Curve>,

    /// Allowed usages of a key object.
    pub key_usage: Option<KeyUsage>,

    /// Data object type.
    pub data_object_type: Option<u8>,

    /// Entries this crate does not interpret, keyed by tag.
    pub other: BTreeMap<u8, Vec<u8>>,
}

fn be_size(tag: u8, value: &[u8]) -> Result<u16, MetadataError> {
    match *value {
        [b] => Ok(b as u16),
        [hi, lo] => Ok(u16::from_be_bytes([hi, lo])),
        _ => Err(MetadataError::InvalidLength {
            tag,
            len: value.len(),
        }),
    }
}

fn single_byte(tag: u8, value: &[u8]) -> Result<u8, MetadataError> {
    match *value {
        [b] => Ok(b),
        _ => Err(MetadataError::InvalidLength {
            tag,
            len: value.len(),
        }),
    }
}

fn set_once<T>(slot: &mut Option<T>, tag: u8, value: T) -> Result<(), MetadataError> {
    if slot.is_some() {
        return Err(MetadataError::Duplicate(tag));
    }

    *slot = Some(value);
    Ok(())
}

impl Metadata {
    /// Decode metadata as returned by the chip's read-metadata command.
    ///
    /// Bytes after the declared outer length are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MetadataError> {
        let (&tag, rest) = bytes.split_first().ok_or(MetadataError::Truncated)?;
        if tag != METADATA_TAG {
            return Err(MetadataError::InvalidTag(tag));
        }

        let (&len, rest) = rest.split_first().ok_or(MetadataError::Truncated)?;
        let mut body = rest
            .get(..len as usize)
            .ok_or(MetadataError::Truncated)?;

        let mut metadata = Metadata::default();

        while let Some(tlv) = body.read_tlv().map_err(|_| MetadataError::Truncated)? {
            let (tag, value) = (tlv.tag, tlv.value);

            match tag {
                TAG_LCSO => set_once(&mut metadata.lcso, tag, single_byte(tag, &value)?.into())?,
                TAG_VERSION => match *value {
                    [hi, lo] => set_once(&mut metadata.version, tag, u16::from_be_bytes([hi, lo]))?,
                    _ => {
                        return Err(MetadataError::InvalidLength {
                            tag,
                            len: value.len(),
                        })
                    }
                },
                TAG_MAX_SIZE => set_once(&mut metadata.max_size, tag, be_size(tag, &value)?)?,
                TAG_USED_SIZE => set_once(&mut metadata.used_size, tag, be_size(tag, &value)?)?,
                TAG_CHANGE => set_once(&mut metadata.change, tag, value)?,
                TAG_READ => set_once(&mut metadata.read, tag, value)?,
                TAG_EXECUTE => set_once(&mut metadata.execute, tag, value)?,
                TAG_ALGORITHM if value == [Curve::NistP256 as u8] => {
                    set_once(&mut metadata.algorithm, tag, Curve::NistP256)?
                }
                TAG_ALGORITHM if value == [Curve::NistP384 as u8] => {
                    set_once(&mut metadata.algorithm, tag, Curve::NistP384)?
                }
                TAG_KEY_USAGE => set_once(
                    &mut metadata.key_usage,
                    tag,
                    KeyUsage::from_bits_retain(single_byte(tag, &value)?),
                )?,
                TAG_DATA_OBJECT_TYPE => set_once(
                    &mut metadata.data_object_type,
                    tag,
                    single_byte(tag, &value)?,
                )?,
                // Unknown tags, and algorithms other than the curves above.
                _ => {
                    if metadata.other.insert(tag, value).is_some() {
                        return Err(MetadataError::Duplicate(tag));
                    }
                }
            }
        }

        Ok(metadata)
    }
}
