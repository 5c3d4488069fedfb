// SPDX-License-Identifier: Apache-2.0

use super::{ecdsa::Signature, Verifiable};

use der::{Decode, DecodePem, Encode};
use p256::ecdsa::{signature::hazmat::PrehashVerifier, VerifyingKey};
use sha2::{Digest, Sha256, Sha384};
use spki::ObjectIdentifier;
use std::convert::TryFrom;
use std::io;
use std::io::{ErrorKind, Result};
use x509_cert::der; // re-export of der crate
use x509_cert::spki; // re-export of spki crate

/// An X.509 certificate, backed by pure-Rust crates.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Certificate(x509_cert::Certificate);

const ECDSA_WITH_SHA256_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.2");
const ECDSA_WITH_SHA384_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.3");

/// Verify if the public key of one Certificate signs another Certificate.
impl Verifiable for (&Certificate, &Certificate) {
    type Output = ();

    fn verify(self) -> Result<Self::Output> {
        let signer = self.0;
        let signee = &self.1 .0;

        let message = signee.tbs_certificate.to_der().map_err(|e| {
            io_error_other(format!("failed to encode tbs_certificate as DER: {e:?}"))
        })?;

        let algorithm = signee.signature_algorithm.oid;
        let prehash = if algorithm == ECDSA_WITH_SHA256_OID {
            Sha256::digest(&message).to_vec()
        } else if algorithm == ECDSA_WITH_SHA384_OID {
            Sha384::digest(&message).to_vec()
        } else {
            return Err(io_error_other(format!(
                "unsupported signature algorithm: {:?}",
                signee.signature_algorithm
            )));
        };

        let signature_der = signee
            .signature
            .as_bytes()
            .ok_or_else(|| io_error_other("signature BIT STRING has unused bits"))?;

        let signature = p256::ecdsa::Signature::from_der(signature_der)
            .map_err(|e| io_error_other(format!("invalid ECDSA signature: {e:?}")))?;

        signer
            .verifying_key()?
            .verify_prehash(&prehash, &signature)
            .map_err(|e| {
                io_error_other(format!(
                    "Signer certificate does not sign signee certificate: {e}"
                ))
            })
    }
}

impl Certificate {
    /// Gets a reference to the X509 certificate inside
    pub fn cert(&self) -> &x509_cert::Certificate {
        &self.0
    }

    /// Create a Certificate from a PEM-encoded X509 structure.
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        let cert = x509_cert::Certificate::from_pem(pem)
            .map_err(|e| io::Error::new(ErrorKind::InvalidData, format!("invalid PEM: {}", e)))?;
        Ok(Self(cert))
    }

    /// Serialize a Certificate struct to PEM.
    pub fn to_pem(&self) -> Result<Vec<u8>> {
        use der::EncodePem;
        Ok(self
            .0
            .to_pem(der::pem::LineEnding::LF)
            .map_err(|e| io_error_other(format!("PEM-encoding failed: {}", e)))?
            .into_bytes())
    }

    /// Create a Certificate from a DER-encoded X509 structure.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let cert = x509_cert::Certificate::from_der(der)
            .map_err(|e| io::Error::new(ErrorKind::InvalidData, format!("invalid DER: {}", e)))?;
        Ok(Self(cert))
    }

    /// Serialize a Certificate struct to DER.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.0
            .to_der()
            .map_err(|e| io_error_other(format!("DER-encoding failed: {e:?}")))
    }

    /// Retrieve the public key in SEC1 encoding.
    pub fn public_key_sec1(&self) -> Result<Vec<u8>> {
        Ok(self
            .0
            .tbs_certificate
            .subject_public_key_info
            .subject_public_key
            .raw_bytes()
            .to_vec())
    }

    /// Check that `signature` over the prehashed `digest` was made with the
    /// private key matching this certificate.
    pub fn verify_prehash(&self, digest: &[u8], signature: &Signature) -> Result<()> {
        let signature = p256::ecdsa::Signature::try_from(signature)?;

        self.verifying_key()?
            .verify_prehash(digest, &signature)
            .map_err(|e| {
                io_error_other(format!(
                    "Signature does not match certificate public key: {e}"
                ))
            })
    }

    fn verifying_key(&self) -> Result<VerifyingKey> {
        VerifyingKey::from_sec1_bytes(&self.public_key_sec1()?)
            .map_err(|e| io_error_other(format!("unsupported or invalid P-256 public key: {e}")))
    }
}

fn io_error_other<S: Into<String>>(error: S) -> io::Error {
    io::Error::new(ErrorKind::Other, error.into())
}

impl From<x509_cert::Certificate> for Certificate {
    fn from(value: x509_cert::Certificate) -> Self {
        Self(value)
    }
}

impl From<Certificate> for x509_cert::Certificate {
    fn from(Certificate(cert): Certificate) -> Self {
        cert
    }
}
