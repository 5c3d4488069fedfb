// SPDX-License-Identifier: Apache-2.0

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Identifier of a data object on the chip.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct ObjectId(pub u16);

impl ObjectId {
    /// Global life cycle status.
    pub const GLOBAL_LIFE_CYCLE_STATUS: ObjectId = ObjectId(0xE0C0);

    /// Coprocessor unique identifier.
    pub const COPROCESSOR_UID: ObjectId = ObjectId(0xE0C2);

    /// End-device certificate provisioned by Infineon.
    pub const DEVICE_CERT_IFX: ObjectId = ObjectId(0xE0E0);

    /// First project-specific device certificate.
    pub const DEVICE_CERT_1: ObjectId = ObjectId(0xE0E1);

    /// Second project-specific device certificate.
    pub const DEVICE_CERT_2: ObjectId = ObjectId(0xE0E2);

    /// Third project-specific device certificate.
    pub const DEVICE_CERT_3: ObjectId = ObjectId(0xE0E3);

    /// First root CA public key certificate (trust anchor).
    pub const TRUST_ANCHOR_1: ObjectId = ObjectId(0xE0E8);

    /// Second trust anchor.
    pub const TRUST_ANCHOR_2: ObjectId = ObjectId(0xE0EF);

    /// Object id `0` is never a valid object.
    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#06X}", self.0)
    }
}

/// Identifier of a private key slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct KeyId(pub u16);

impl KeyId {
    /// Device private key 1, usually paired with [`ObjectId::DEVICE_CERT_IFX`].
    pub const E0F0: KeyId = KeyId(0xE0F0);

    /// Device private key 2.
    pub const E0F1: KeyId = KeyId(0xE0F1);

    /// Device private key 3.
    pub const E0F2: KeyId = KeyId(0xE0F2);

    /// Device private key 4.
    pub const E0F3: KeyId = KeyId(0xE0F3);

    /// Volatile session context.
    pub const SESSION_BASED: KeyId = KeyId(0xE100);
}

impl std::fmt::Display for KeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#06X}", self.0)
    }
}

/// Elliptic curves the chip generates keys on.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[repr(u8)]
pub enum Curve {
    /// NIST P-256.
    NistP256 = 0x03,

    /// NIST P-384.
    NistP384 = 0x04,
}

impl Curve {
    /// Byte length of one coordinate (and of `r` or `s` in a signature).
    pub fn field_len(&self) -> usize {
        match self {
            Curve::NistP256 => 32,
            Curve::NistP384 => 48,
        }
    }
}

bitflags! {
    /// Allowed usages of a generated key.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct KeyUsage: u8 {
        /// Authentication.
        const AUTHENTICATION = 0x01;
        /// Encryption.
        const ENCRYPTION = 0x02;
        /// Signing.
        const SIGN = 0x10;
        /// Key agreement.
        const KEY_AGREEMENT = 0x20;
    }
}

/// Life cycle state of the chip or of an object.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum LifeCycleState {
    /// Creation state.
    Creation,

    /// Initialization state.
    Initialization,

    /// Operational state.
    Operational,

    /// Termination state.
    Termination,

    /// A value outside the defined states.
    Other(u8),
}

impl From<u8> for LifeCycleState {
    fn from(value: u8) -> Self {
        match value {
            0x01 => LifeCycleState::Creation,
            0x03 => LifeCycleState::Initialization,
            0x07 => LifeCycleState::Operational,
            0x0F => LifeCycleState::Termination,
            other => LifeCycleState::Other(other),
        }
    }
}

impl std::fmt::Display for LifeCycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifeCycleState::Creation => write!(f, "creation"),
            LifeCycleState::Initialization => write!(f, "initialization"),
            LifeCycleState::Operational => write!(f, "operational"),
            LifeCycleState::Termination => write!(f, "termination"),
            LifeCycleState::Other(value) => write!(f, "unknown ({value:#04x})"),
        }
    }
}
