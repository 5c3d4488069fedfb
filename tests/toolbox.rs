// SPDX-License-Identifier: Apache-2.0

#![cfg(any(feature = "openssl", feature = "crypto_nossl"))]

mod common;

use common::*;
use optiga::{
    certs::{builtin::trust_x, Certificate},
    device::{Curve, KeyId, LifeCycleState, ObjectId},
    error::{CertFormatError, Error, Indeterminate, UserApiError},
    session::Session,
    toolbox,
};

use std::fs;

const CHALLENGE: &[u8] = b"fresh verifier nonce";

fn test_ca() -> Certificate {
    Certificate::from_der(TEST_CA_DER).unwrap()
}

#[test]
fn save_der_certificate_as_pem() {
    let mut session = Session::open(MockDevice::with_chip_cert(CHIP_CERT_DER.to_vec())).unwrap();

    let mut pem = Vec::new();
    let cert = toolbox::save_chip_cert(&mut session, ObjectId::DEVICE_CERT_IFX, &mut pem).unwrap();

    assert!(pem.starts_with(b"-----BEGIN CERTIFICATE-----\n"));
    assert_eq!(Certificate::from_pem(&pem).unwrap(), cert);
    assert_eq!(cert.to_der().unwrap(), CHIP_CERT_DER);
}

#[test]
fn save_enveloped_certificate_as_pem() {
    let device = MockDevice::with_chip_cert(tls_envelope(CHIP_CERT_DER));
    let mut session = Session::open(device).unwrap();

    let mut pem = Vec::new();
    let cert = toolbox::save_chip_cert(&mut session, ObjectId::DEVICE_CERT_IFX, &mut pem).unwrap();

    assert_eq!(cert.to_der().unwrap(), CHIP_CERT_DER);
}

#[test]
fn save_certificate_to_file() {
    let mut session = Session::open(MockDevice::with_chip_cert(CHIP_CERT_DER.to_vec())).unwrap();

    let path = std::env::temp_dir().join(format!("optiga-chip-cert-{}.pem", std::process::id()));
    toolbox::save_chip_cert_to_file(&mut session, ObjectId::DEVICE_CERT_IFX, &path).unwrap();

    let pem = fs::read(&path).unwrap();
    fs::remove_file(&path).unwrap();

    let cert = Certificate::from_pem(&pem).unwrap();
    assert_eq!(cert.to_der().unwrap(), CHIP_CERT_DER);
}

#[test]
fn usb_type_c_object_is_not_a_certificate() {
    let mut device = MockDevice::default();
    device
        .objects
        .insert(ObjectId::DEVICE_CERT_1, vec![0xC2, 0x00, 0x10, 0x30, 0x82]);
    let mut session = Session::open(device).unwrap();

    let mut out = Vec::new();
    match toolbox::save_chip_cert(&mut session, ObjectId::DEVICE_CERT_1, &mut out) {
        Err(UserApiError::FormatError(CertFormatError::UnsupportedFormat(Some(0xC2)))) => {}
        other => panic!("unexpected {:?}", other.err()),
    }
    assert!(out.is_empty());
}

#[test]
fn missing_object_reports_device_error() {
    let mut session = Session::open(MockDevice::default()).unwrap();

    assert!(matches!(
        toolbox::chip_certificate(&mut session, ObjectId::DEVICE_CERT_3),
        Err(UserApiError::DeviceError(Indeterminate::Known(Error::InvalidOid)))
    ));
}

#[test]
fn genkey_exports_bit_string() {
    let mut session = Session::open(MockDevice::default()).unwrap();

    let mut out = Vec::new();
    let key = toolbox::genkey(&mut session, Curve::NistP256, KeyId::E0F1, &mut out).unwrap();

    assert_eq!(out.len(), 68);
    assert_eq!(&out[..4], &[0x03, 0x42, 0x00, 0x04]);
    assert_eq!(key.as_bit_string(), &out[..]);
    assert_eq!(key.sec1(), &out[3..]);
    assert_eq!(key.curve(), Curve::NistP256);
}

#[test]
fn genkey_on_unsupported_curve() {
    let mut session = Session::open(MockDevice::default()).unwrap();

    let mut out = Vec::new();
    assert!(matches!(
        toolbox::genkey(&mut session, Curve::NistP384, KeyId::E0F1, &mut out),
        Err(UserApiError::DeviceError(Indeterminate::Known(
            Error::InvalidParameterInDataField
        )))
    ));
    assert!(out.is_empty());
}

#[test]
fn signature_verifies_against_chip_certificate() {
    let mut session = Session::open(MockDevice::with_chip_cert(CHIP_CERT_DER.to_vec())).unwrap();
    let digest = [0xA5u8; 32];

    let signature = toolbox::sign(&mut session, &digest, KeyId::E0F0).unwrap();

    let cert = Certificate::from_der(CHIP_CERT_DER).unwrap();
    cert.verify_prehash(&digest, &signature).unwrap();
    assert!(cert.verify_prehash(&[0x5Au8; 32], &signature).is_err());
}

#[test]
fn signature_verifies_against_generated_key() {
    let mut session = Session::open(MockDevice::default()).unwrap();
    let digest = [0x3Cu8; 32];

    let mut out = Vec::new();
    let key = toolbox::genkey(&mut session, Curve::NistP256, KeyId::E0F2, &mut out).unwrap();
    let signature = toolbox::sign(&mut session, &digest, KeyId::E0F2).unwrap();

    let fixed = signature.to_fixed(Curve::NistP256.field_len()).unwrap();
    assert!(backend::verify_prehash(key.sec1(), &digest, &fixed));
}

#[test]
fn data_and_metadata() {
    let mut session = Session::open(MockDevice::with_chip_cert(CHIP_CERT_DER.to_vec())).unwrap();

    let (data, metadata) =
        toolbox::read_data_and_metadata(&mut session, ObjectId::DEVICE_CERT_IFX).unwrap();

    assert_eq!(&data[..], CHIP_CERT_DER);
    assert_eq!(metadata.lcso, Some(LifeCycleState::Operational));
    assert_eq!(metadata.max_size, Some(1728));
    assert_eq!(metadata.change.as_deref(), Some(&[0xFF][..]));
    assert_eq!(metadata.read.as_deref(), Some(&[0x00][..]));
    assert!(metadata.other.is_empty());
}

#[test]
fn authenticate_with_issuing_ca() {
    let mut session = Session::open(MockDevice::with_chip_cert(tls_envelope(CHIP_CERT_DER))).unwrap();

    let cert = toolbox::authenticate_chip(
        &mut session,
        &test_ca(),
        ObjectId::DEVICE_CERT_IFX,
        KeyId::E0F0,
        CHALLENGE,
    )
    .unwrap();

    assert_eq!(cert.to_der().unwrap(), CHIP_CERT_DER);
}

#[test]
fn authenticate_with_foreign_ca() {
    let mut session = Session::open(MockDevice::with_chip_cert(CHIP_CERT_DER.to_vec())).unwrap();
    let ca = trust_x::ca().unwrap();

    assert!(matches!(
        toolbox::authenticate_chip(
            &mut session,
            &ca,
            ObjectId::DEVICE_CERT_IFX,
            KeyId::E0F0,
            CHALLENGE,
        ),
        Err(UserApiError::CryptoError(_))
    ));
}

#[test]
fn authenticate_with_wrong_key() {
    let mut session = Session::open(MockDevice::with_chip_cert(CHIP_CERT_DER.to_vec())).unwrap();

    let mut out = Vec::new();
    toolbox::genkey(&mut session, Curve::NistP256, KeyId::E0F1, &mut out).unwrap();

    assert!(matches!(
        toolbox::authenticate_chip(
            &mut session,
            &test_ca(),
            ObjectId::DEVICE_CERT_IFX,
            KeyId::E0F1,
            CHALLENGE,
        ),
        Err(UserApiError::CryptoError(_))
    ));
}

#[test]
fn authenticate_without_challenge() {
    let mut session = Session::open(MockDevice::with_chip_cert(CHIP_CERT_DER.to_vec())).unwrap();

    assert!(matches!(
        toolbox::authenticate_chip(
            &mut session,
            &test_ca(),
            ObjectId::DEVICE_CERT_IFX,
            KeyId::E0F0,
            &[],
        ),
        Err(UserApiError::InvalidArgument(_))
    ));
}

#[test]
fn session_closes_on_drop() {
    let mut device = MockDevice::with_chip_cert(CHIP_CERT_DER.to_vec());
    {
        let mut session = Session::open(&mut device).unwrap();
        toolbox::chip_certificate(&mut session, ObjectId::DEVICE_CERT_IFX).unwrap();
    }

    assert!(!device.open);
    assert_eq!((device.opened, device.closed), (1, 1));
}

#[test]
fn explicit_close_returns_device() {
    let session = Session::open(MockDevice::default()).unwrap();
    let device = session.close().unwrap();

    assert!(!device.open);
    assert_eq!(device.closed, 1);
}
