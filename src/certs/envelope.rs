// SPDX-License-Identifier: Apache-2.0

//! Unwrapping of certificate data objects.
//!
//! A certificate data object on the chip starts with a tag byte that tells
//! how the certificate is stored:
//!
//! | Tag    | Contents                                                    |
//! |--------|-------------------------------------------------------------|
//! | `0x30` | A plain DER X.509 certificate.                              |
//! | `0xC0` | A TLS handshake "Certificate" message wrapping the chain.   |
//! | `0xC2` | A USB Type-C authentication certificate chain.              |
//!
//! [`normalize`] turns the first two into plain DER and rejects the rest.

use crate::error::CertFormatError;

use std::ops::Deref;

/// DER `SEQUENCE` tag, first byte of every X.509 certificate.
const DER_SEQUENCE: u8 = 0x30;

/// Tag (1), value length (2), chain length (3), first certificate length (3).
///
/// Only a single embedded certificate is assumed; the chain length fields are
/// skipped, not interpreted.
pub const TLS_ENVELOPE_HEADER_LEN: usize = 9;

/// Classification of the first byte of a certificate data object.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CertificateTag {
    /// `0x30`: a DER certificate, usable as is.
    DerCertificate,

    /// `0xC0`: TLS certificate chain envelope.
    TlsCertificateChainEnvelope,

    /// `0xC2`: USB Type-C certificate chain. Not supported.
    UsbTypeCEnvelope,

    /// Anything else.
    Unknown(u8),
}

impl From<u8> for CertificateTag {
    fn from(tag: u8) -> Self {
        match tag {
            DER_SEQUENCE => CertificateTag::DerCertificate,
            0xC0 => CertificateTag::TlsCertificateChainEnvelope,
            0xC2 => CertificateTag::UsbTypeCEnvelope,
            other => CertificateTag::Unknown(other),
        }
    }
}

impl From<CertificateTag> for u8 {
    fn from(tag: CertificateTag) -> Self {
        match tag {
            CertificateTag::DerCertificate => DER_SEQUENCE,
            CertificateTag::TlsCertificateChainEnvelope => 0xC0,
            CertificateTag::UsbTypeCEnvelope => 0xC2,
            CertificateTag::Unknown(other) => other,
        }
    }
}

/// Bytes of a data object exactly as returned by the chip.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawObject(Vec<u8>);

impl RawObject {
    /// Largest object this crate reads in one go.
    pub const CAPACITY: usize = 512;

    /// Wrap bytes read from the chip. Returns `None` if they exceed
    /// [`RawObject::CAPACITY`].
    pub fn new(bytes: Vec<u8>) -> Option<Self> {
        if bytes.len() > Self::CAPACITY {
            return None;
        }

        Some(Self(bytes))
    }

    /// The leading tag, if the object is not empty.
    pub fn tag(&self) -> Option<CertificateTag> {
        self.0.first().map(|&b| b.into())
    }

    /// Consume the object and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for RawObject {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for RawObject {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A DER certificate extracted from a data object. Always starts with `0x30`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NormalizedCertificate(Vec<u8>);

impl NormalizedCertificate {
    /// Consume the certificate and return its DER bytes.
    pub fn into_der(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for NormalizedCertificate {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for NormalizedCertificate {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<NormalizedCertificate> for RawObject {
    /// A normalized certificate is never longer than the object it came from.
    fn from(cert: NormalizedCertificate) -> Self {
        RawObject(cert.0)
    }
}

/// Turn a certificate data object into a plain DER certificate.
///
/// DER objects are returned unchanged. TLS envelopes lose their fixed
/// [`TLS_ENVELOPE_HEADER_LEN`] byte header; if the envelope holds more than
/// one certificate, everything after the header is returned as-is. No ASN.1
/// validation beyond the leading tag is done.
pub fn normalize(raw: RawObject) -> Result<NormalizedCertificate, CertFormatError> {
    let tag = raw.tag().ok_or(CertFormatError::UnsupportedFormat(None))?;

    match tag {
        CertificateTag::DerCertificate => Ok(NormalizedCertificate(raw.into_bytes())),
        CertificateTag::TlsCertificateChainEnvelope => {
            let len = raw.len();

            match raw.get(TLS_ENVELOPE_HEADER_LEN..) {
                Some(cert) if cert.first() == Some(&DER_SEQUENCE) => {
                    Ok(NormalizedCertificate(cert.to_vec()))
                }
                _ => Err(CertFormatError::MalformedEnvelope { len }),
            }
        }
        CertificateTag::UsbTypeCEnvelope | CertificateTag::Unknown(_) => {
            Err(CertFormatError::UnsupportedFormat(Some(tag.into())))
        }
    }
}
