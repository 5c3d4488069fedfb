// SPDX-License-Identifier: Apache-2.0

//! # Device
//!
//! The secure element is reached through a vendor driver stack (host
//! library, I2C transport, platform abstraction layer) that this crate does
//! not implement. [`Device`] is the seam: implement it on top of whatever
//! binding talks to the chip, then hand it to a
//! [`Session`](crate::session::Session).
//!
//! All methods use the fill-a-buffer convention of the chip's host library:
//! the caller provides a buffer and the device returns how many bytes it
//! wrote.

mod metadata;
mod types;

pub use metadata::Metadata;
pub use types::*;

use crate::error::{Error, Indeterminate};

/// Commands of the secure element used by this crate.
pub trait Device {
    /// Open the application on the chip. Must succeed before any other
    /// command is issued.
    fn open_application(&mut self) -> Result<(), Indeterminate<Error>>;

    /// Close the application and release the transport.
    fn close_application(&mut self) -> Result<(), Indeterminate<Error>>;

    /// Read data object `oid` starting at `offset` into `buf`.
    fn read_data(
        &mut self,
        oid: ObjectId,
        offset: u16,
        buf: &mut [u8],
    ) -> Result<usize, Indeterminate<Error>>;

    /// Read the metadata of data object `oid` into `buf`.
    fn read_metadata(&mut self, oid: ObjectId, buf: &mut [u8])
        -> Result<usize, Indeterminate<Error>>;

    /// Generate a key pair on `curve`, store the private key in `key_id` and
    /// write the public key into `public_key` (DER BIT STRING encoding).
    fn generate_keypair(
        &mut self,
        curve: Curve,
        usage: KeyUsage,
        key_id: KeyId,
        public_key: &mut [u8],
    ) -> Result<usize, Indeterminate<Error>>;

    /// Sign a prehashed `digest` with the private key in `key_id`. The
    /// signature is written as two DER INTEGERs (`r` then `s`) without the
    /// enclosing SEQUENCE.
    fn ecdsa_sign(
        &mut self,
        digest: &[u8],
        key_id: KeyId,
        signature: &mut [u8],
    ) -> Result<usize, Indeterminate<Error>>;
}

impl<D: Device + ?Sized> Device for &mut D {
    fn open_application(&mut self) -> Result<(), Indeterminate<Error>> {
        (**self).open_application()
    }

    fn close_application(&mut self) -> Result<(), Indeterminate<Error>> {
        (**self).close_application()
    }

    fn read_data(
        &mut self,
        oid: ObjectId,
        offset: u16,
        buf: &mut [u8],
    ) -> Result<usize, Indeterminate<Error>> {
        (**self).read_data(oid, offset, buf)
    }

    fn read_metadata(
        &mut self,
        oid: ObjectId,
        buf: &mut [u8],
    ) -> Result<usize, Indeterminate<Error>> {
        (**self).read_metadata(oid, buf)
    }

    fn generate_keypair(
        &mut self,
        curve: Curve,
        usage: KeyUsage,
        key_id: KeyId,
        public_key: &mut [u8],
    ) -> Result<usize, Indeterminate<Error>> {
        (**self).generate_keypair(curve, usage, key_id, public_key)
    }

    fn ecdsa_sign(
        &mut self,
        digest: &[u8],
        key_id: KeyId,
        signature: &mut [u8],
    ) -> Result<usize, Indeterminate<Error>> {
        (**self).ecdsa_sign(digest, key_id, signature)
    }
}
