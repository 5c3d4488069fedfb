// SPDX-License-Identifier: Apache-2.0

//! The `optiga` crate is a host-side toolbox for the Infineon OPTIGA(TM)
//! Trust X secure element.
//!
//! ## Scope
//!
//! The chip is reached through a vendor driver stack (host library,
//! I2C transport, platform abstraction layer). That stack is not part of
//! this crate: it is represented by the [`Device`](crate::device::Device)
//! trait, which a binding to the real driver implements.
//!
//! On top of it the crate provides:
//!
//! 1. An explicit [`Session`](crate::session::Session) handle for an open
//!    application on the chip
//! 2. Unwrapping of certificate data objects into plain DER
//!    ([`certs::normalize`])
//! 3. Decoding of object metadata, exported public keys and chip signatures
//! 4. The [`toolbox`] flows: export the device certificate, generate keys,
//!    sign digests and authenticate the chip against its CA
//!
//! ## Cryptographic Verification
//!
//! X.509 parsing, PEM encoding and signature verification require one of
//! the `openssl` or `crypto_nossl` features. With `openssl`, OpenSSL is
//! used. With `crypto_nossl` (the default), pure-Rust libraries (`x509-cert`,
//! `p256`, `sha2`) are used instead. The two are mutually exclusive, and
//! enabling both at the same time leads to a compiler error.
//!
//! ## Logging
//!
//! Sessions and toolbox flows report progress through the [`log`] facade.
//! No logger is installed by this crate.

#![deny(clippy::all)]
#![deny(missing_docs)]
#![allow(unknown_lints)]
#![allow(clippy::unreadable_literal)]

#[cfg(all(feature = "openssl", feature = "crypto_nossl"))]
compile_error!(
    "feature \"openssl\" and feature \"crypto_nossl\" cannot be enabled at the same time"
);

pub mod certs;

pub mod device;

/// Error module.
pub mod error;

pub mod session;

pub mod toolbox;

mod util;
