// SPDX-License-Identifier: Apache-2.0

//! Certificates, keys and signatures produced by the secure element.

pub mod envelope;

/// ECDSA signatures.
pub mod ecdsa;

/// Public keys exported by the chip.
pub mod key;

#[cfg(any(feature = "openssl", feature = "crypto_nossl"))]
/// Built-in vendor CA certificates.
pub mod builtin;

#[cfg(feature = "openssl")]
mod cert;

#[cfg(feature = "crypto_nossl")]
mod cert_nossl;

#[cfg(feature = "openssl")]
pub use cert::Certificate;

#[cfg(feature = "crypto_nossl")]
pub use cert_nossl::Certificate;

pub use envelope::{normalize, CertificateTag, NormalizedCertificate, RawObject};

#[cfg(any(feature = "openssl", feature = "crypto_nossl"))]
use std::io::Result;

#[cfg(any(feature = "openssl", feature = "crypto_nossl"))]
/// An interface for types that may contain entities such as
/// signatures that must be verified.
pub trait Verifiable {
    /// An output type for successful verification.
    type Output;

    /// Self-verifies signatures.
    fn verify(self) -> Result<Self::Output>;
}
