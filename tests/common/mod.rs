// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

pub const CHIP_CERT_DER: &[u8] = include_bytes!("../certs_data/chip.der");
pub const CHIP_KEY: &[u8; 32] = include_bytes!("../certs_data/chip_key.bin");
pub const TEST_CA_DER: &[u8] = include_bytes!("../certs_data/test_ca.der");
pub const TEST_CA_PEM: &[u8] = include_bytes!("../certs_data/test_ca.pem");

/// Metadata of a certificate object: operational, 1728 bytes max, read
/// always, change never.
pub const CERT_METADATA: [u8; 15] = [
    0x20, 0x0D, 0xC0, 0x01, 0x07, 0xC4, 0x02, 0x06, 0xC0, 0xD0, 0x01, 0xFF, 0xD1, 0x01, 0x00,
];

/// Wrap a DER certificate the way the chip stores a TLS identity.
pub fn tls_envelope(cert: &[u8]) -> Vec<u8> {
    let cert_len = cert.len() as u32;
    let chain_len = cert_len + 3;
    let value_len = chain_len + 3;

    let mut out = vec![0xC0];
    out.extend_from_slice(&(value_len as u16).to_be_bytes());
    out.extend_from_slice(&chain_len.to_be_bytes()[1..]);
    out.extend_from_slice(&cert_len.to_be_bytes()[1..]);
    out.extend_from_slice(cert);
    out
}

#[cfg(any(feature = "openssl", feature = "crypto_nossl"))]
mod mock;

#[cfg(any(feature = "openssl", feature = "crypto_nossl"))]
pub use mock::{backend, MockDevice};
