// SPDX-License-Identifier: Apache-2.0

//! Ready-made flows on top of a [`Session`]: export the chip certificate,
//! generate and export a key, sign a digest, dump an object with its
//! metadata, and authenticate the chip against a CA.

use crate::{
    certs::{ecdsa::Signature, key::PublicKey, RawObject},
    device::{Curve, Device, KeyId, KeyUsage, Metadata, ObjectId},
    error::UserApiError,
    session::Session,
};

#[cfg(any(feature = "openssl", feature = "crypto_nossl"))]
use crate::certs::{Certificate, Verifiable};

use log::info;
use std::io::Write;

#[cfg(any(feature = "openssl", feature = "crypto_nossl"))]
use std::{fs::File, path::Path};

#[cfg(any(feature = "openssl", feature = "crypto_nossl"))]
fn crypto_error(e: std::io::Error) -> UserApiError {
    UserApiError::CryptoError(e.to_string())
}

/// Read the certificate in `oid`, unwrap it and parse it as X.509.
#[cfg(any(feature = "openssl", feature = "crypto_nossl"))]
pub fn chip_certificate<D: Device>(
    session: &mut Session<D>,
    oid: ObjectId,
) -> Result<Certificate, UserApiError> {
    let der = session.chip_certificate(oid)?;
    Certificate::from_der(&der).map_err(crypto_error)
}

/// Write the certificate in `oid` to `out` as PEM. Returns the parsed
/// certificate.
#[cfg(any(feature = "openssl", feature = "crypto_nossl"))]
pub fn save_chip_cert<D: Device, W: Write>(
    session: &mut Session<D>,
    oid: ObjectId,
    out: &mut W,
) -> Result<Certificate, UserApiError> {
    let cert = chip_certificate(session, oid)?;
    out.write_all(&cert.to_pem().map_err(crypto_error)?)?;

    info!("saved certificate from object {oid} as PEM");
    Ok(cert)
}

/// Write the certificate in `oid` to the file at `path` as PEM.
#[cfg(any(feature = "openssl", feature = "crypto_nossl"))]
pub fn save_chip_cert_to_file<D: Device, P: AsRef<Path>>(
    session: &mut Session<D>,
    oid: ObjectId,
    path: P,
) -> Result<Certificate, UserApiError> {
    let mut file = File::create(path.as_ref())?;
    let cert = save_chip_cert(session, oid, &mut file)?;
    file.flush()?;
    Ok(cert)
}

/// Generate a signing key pair in `key_id` and write the exported public key
/// (the chip's BIT STRING encoding) to `out`.
pub fn genkey<D: Device, W: Write>(
    session: &mut Session<D>,
    curve: Curve,
    key_id: KeyId,
    out: &mut W,
) -> Result<PublicKey, UserApiError> {
    let key = session.generate_keypair(curve, KeyUsage::SIGN, key_id)?;
    out.write_all(key.as_bit_string())?;

    info!("exported public key {key}");
    Ok(key)
}

/// Sign a prehashed `digest` with the private key in `key_id`.
pub fn sign<D: Device>(
    session: &mut Session<D>,
    digest: &[u8],
    key_id: KeyId,
) -> Result<Signature, UserApiError> {
    let signature = session.sign(digest, key_id)?;

    info!("successfully signed with key {key_id}");
    Ok(signature)
}

/// Read data object `oid` and its metadata.
pub fn read_data_and_metadata<D: Device>(
    session: &mut Session<D>,
    oid: ObjectId,
) -> Result<(RawObject, Metadata), UserApiError> {
    let data = session.read_object(oid, 0)?;
    let metadata = session.read_metadata(oid)?;

    info!("reading data & metadata of object {oid} complete");
    Ok((data, metadata))
}

/// One-way authentication of the chip.
///
/// The certificate in `cert_oid` must be issued by `ca`, and the chip must
/// prove possession of the matching private key in `key_id` by signing the
/// SHA-256 digest of `challenge`. Returns the verified chip certificate.
///
/// `challenge` should be fresh random bytes chosen by the verifier.
#[cfg(any(feature = "openssl", feature = "crypto_nossl"))]
pub fn authenticate_chip<D: Device>(
    session: &mut Session<D>,
    ca: &Certificate,
    cert_oid: ObjectId,
    key_id: KeyId,
    challenge: &[u8],
) -> Result<Certificate, UserApiError> {
    if challenge.is_empty() {
        return Err(UserApiError::InvalidArgument("challenge must not be empty"));
    }

    let cert = chip_certificate(session, cert_oid)?;
    (ca, &cert).verify().map_err(crypto_error)?;

    let digest = sha256(challenge);
    let signature = session.sign(&digest, key_id)?;
    cert.verify_prehash(&digest, &signature)
        .map_err(crypto_error)?;

    info!("chip authenticated with certificate {cert_oid} and key {key_id}");
    Ok(cert)
}

#[cfg(feature = "openssl")]
fn sha256(data: &[u8]) -> Vec<u8> {
    openssl::sha::sha256(data).to_vec()
}

#[cfg(feature = "crypto_nossl")]
fn sha256(data: &[u8]) -> Vec<u8> {
    use sha2::{Digest, Sha256};
    Sha256::digest(data).to_vec()
}
