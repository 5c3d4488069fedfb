// SPDX-License-Identifier: Apache-2.0

//! An open application on the secure element.
//!
//! The chip's host library keeps the transport context and an "application
//! open" flag in globals. Here both live in a [`Session`] value that owns
//! the [`Device`]; commands borrow the session mutably, so only one command
//! is ever in flight per chip.

use crate::{
    certs::{self, ecdsa::Signature, key::PublicKey, NormalizedCertificate, RawObject},
    device::{Curve, Device, KeyId, KeyUsage, Metadata, ObjectId},
    error::UserApiError,
    util::hexdump,
};

use log::{debug, info, warn};

/// Buffer size for metadata reads.
const METADATA_CAPACITY: usize = 64;

/// Buffer size for exported public keys (fits a P-384 BIT STRING).
const PUBLIC_KEY_CAPACITY: usize = 100;

/// Buffer size for signatures (two P-384 scalars plus DER overhead).
const SIGNATURE_CAPACITY: usize = 0x60 + 6;

/// A handle to an open application on the secure element.
pub struct Session<D: Device> {
    device: Option<D>,
}

fn check_len(reported: usize, capacity: usize) -> Result<usize, UserApiError> {
    if reported > capacity {
        return Err(UserApiError::BufferOverflow { reported, capacity });
    }

    Ok(reported)
}

impl<D: Device> Session<D> {
    /// Open the application on the chip and wrap the device in a session.
    pub fn open(mut device: D) -> Result<Self, UserApiError> {
        device.open_application().map_err(|e| {
            warn!("failed to open OPTIGA application: {e}");
            e
        })?;

        info!("OPTIGA application opened");

        Ok(Self {
            device: Some(device),
        })
    }

    /// Close the application and hand the device back.
    ///
    /// On failure the device is returned alongside the error, so the caller
    /// can retry or reset it.
    pub fn close(mut self) -> Result<D, (D, UserApiError)> {
        let mut device = self.take_device();

        match device.close_application() {
            Ok(()) => {
                info!("OPTIGA application closed");
                Ok(device)
            }
            Err(e) => {
                warn!("failed to close OPTIGA application: {e}");
                Err((device, e.into()))
            }
        }
    }

    fn take_device(&mut self) -> D {
        match self.device.take() {
            Some(device) => device,
            None => unreachable!("device is only taken when the session ends"),
        }
    }

    fn device(&mut self) -> &mut D {
        match self.device.as_mut() {
            Some(device) => device,
            None => unreachable!("device is only taken when the session ends"),
        }
    }

    /// Read up to [`RawObject::CAPACITY`] bytes of data object `oid`,
    /// starting at `offset`.
    pub fn read_object(&mut self, oid: ObjectId, offset: u16) -> Result<RawObject, UserApiError> {
        if !oid.is_valid() {
            return Err(UserApiError::InvalidArgument("object id must not be zero"));
        }

        let mut buf = vec![0u8; RawObject::CAPACITY];
        let len = self.device().read_data(oid, offset, &mut buf)?;
        buf.truncate(check_len(len, RawObject::CAPACITY)?);

        debug!("read {len} bytes from object {oid}:{}", hexdump(&buf));

        RawObject::new(buf).ok_or(UserApiError::BufferOverflow {
            reported: len,
            capacity: RawObject::CAPACITY,
        })
    }

    /// Read and decode the metadata of data object `oid`.
    pub fn read_metadata(&mut self, oid: ObjectId) -> Result<Metadata, UserApiError> {
        if !oid.is_valid() {
            return Err(UserApiError::InvalidArgument("object id must not be zero"));
        }

        let mut buf = [0u8; METADATA_CAPACITY];
        let len = self.device().read_metadata(oid, &mut buf)?;
        let len = check_len(len, METADATA_CAPACITY)?;

        debug!("read {len} bytes of metadata for object {oid}");

        Ok(Metadata::from_bytes(&buf[..len])?)
    }

    /// Read a certificate data object and unwrap it to plain DER.
    pub fn chip_certificate(&mut self, oid: ObjectId) -> Result<NormalizedCertificate, UserApiError> {
        let raw = self.read_object(oid, 0)?;
        let tag = raw.tag();

        let cert = certs::normalize(raw).map_err(|e| {
            warn!("certificate object {oid} has tag {tag:?}: {e}");
            e
        })?;

        debug!("certificate object {oid} holds {} DER bytes", cert.len());
        Ok(cert)
    }

    /// Generate a key pair in slot `key_id` and return its public key.
    pub fn generate_keypair(
        &mut self,
        curve: Curve,
        usage: KeyUsage,
        key_id: KeyId,
    ) -> Result<PublicKey, UserApiError> {
        let mut buf = [0u8; PUBLIC_KEY_CAPACITY];
        let len = self
            .device()
            .generate_keypair(curve, usage, key_id, &mut buf)?;
        let len = check_len(len, PUBLIC_KEY_CAPACITY)?;

        let key = PublicKey::from_bit_string(&buf[..len])
            .map_err(|e| UserApiError::CryptoError(e.to_string()))?;

        if key.curve() != curve {
            return Err(UserApiError::CryptoError(format!(
                "requested a {curve:?} key, chip exported a {:?} key",
                key.curve()
            )));
        }

        info!("generated {curve:?} key pair in slot {key_id}");
        Ok(key)
    }

    /// Sign a prehashed `digest` with the private key in `key_id`.
    pub fn sign(&mut self, digest: &[u8], key_id: KeyId) -> Result<Signature, UserApiError> {
        if digest.is_empty() {
            return Err(UserApiError::InvalidArgument("digest must not be empty"));
        }

        let mut buf = [0u8; SIGNATURE_CAPACITY];
        let len = self.device().ecdsa_sign(digest, key_id, &mut buf).map_err(|e| {
            warn!("failed to sign with key {key_id}: {e}");
            e
        })?;
        let len = check_len(len, SIGNATURE_CAPACITY)?;

        let signature = Signature::from_chip_bytes(&buf[..len])
            .map_err(|e| UserApiError::CryptoError(e.to_string()))?;

        debug!("signed {} byte digest with key {key_id}", digest.len());
        Ok(signature)
    }
}

impl<D: Device> Drop for Session<D> {
    fn drop(&mut self) {
        if let Some(mut device) = self.device.take() {
            if let Err(e) = device.close_application() {
                warn!("failed to close OPTIGA application: {e}");
            }
        }
    }
}
