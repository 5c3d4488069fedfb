// SPDX-License-Identifier: Apache-2.0

use super::{CERT_METADATA, CHIP_KEY};

use optiga::{
    certs::ecdsa::Signature,
    device::{Curve, Device, KeyId, KeyUsage, ObjectId},
    error::{Error, Indeterminate},
};

use std::collections::HashMap;

/// Deterministic private scalar for keys generated by the mock.
fn generated_scalar(key_id: KeyId) -> [u8; 32] {
    let mut scalar = [0x5Au8; 32];
    scalar[30..].copy_from_slice(&key_id.0.to_be_bytes());
    scalar
}

/// An in-memory secure element.
#[derive(Debug, Default)]
pub struct MockDevice {
    pub open: bool,
    pub opened: usize,
    pub closed: usize,
    pub objects: HashMap<ObjectId, Vec<u8>>,
    pub metadata: HashMap<ObjectId, Vec<u8>>,
    pub keys: HashMap<KeyId, [u8; 32]>,
}

impl MockDevice {
    /// A chip with the test device certificate in `DEVICE_CERT_IFX` (stored
    /// as `cert_object`) and its private key in `E0F0`.
    pub fn with_chip_cert(cert_object: Vec<u8>) -> Self {
        let mut device = MockDevice::default();
        device
            .objects
            .insert(ObjectId::DEVICE_CERT_IFX, cert_object);
        device
            .metadata
            .insert(ObjectId::DEVICE_CERT_IFX, CERT_METADATA.to_vec());
        device.keys.insert(KeyId::E0F0, *CHIP_KEY);
        device
    }

    fn ensure_open(&self) -> Result<(), Indeterminate<Error>> {
        match self.open {
            true => Ok(()),
            false => Err(Error::CommandOutOfSequence.into()),
        }
    }
}

fn copy_out(src: &[u8], buf: &mut [u8]) -> Result<usize, Indeterminate<Error>> {
    if src.len() > buf.len() {
        return Err(Error::InsufficientMemory.into());
    }

    buf[..src.len()].copy_from_slice(src);
    Ok(src.len())
}

impl Device for MockDevice {
    fn open_application(&mut self) -> Result<(), Indeterminate<Error>> {
        self.open = true;
        self.opened += 1;
        Ok(())
    }

    fn close_application(&mut self) -> Result<(), Indeterminate<Error>> {
        self.ensure_open()?;
        self.open = false;
        self.closed += 1;
        Ok(())
    }

    fn read_data(
        &mut self,
        oid: ObjectId,
        offset: u16,
        buf: &mut [u8],
    ) -> Result<usize, Indeterminate<Error>> {
        self.ensure_open()?;

        let data = self.objects.get(&oid).ok_or(Error::InvalidOid)?;
        let data = data
            .get(offset as usize..)
            .ok_or(Error::DataObjectBoundaryExceeded)?;
        let len = data.len().min(buf.len());

        buf[..len].copy_from_slice(&data[..len]);
        Ok(len)
    }

    fn read_metadata(
        &mut self,
        oid: ObjectId,
        buf: &mut [u8],
    ) -> Result<usize, Indeterminate<Error>> {
        self.ensure_open()?;

        let metadata = self.metadata.get(&oid).ok_or(Error::InvalidOid)?;
        copy_out(metadata, buf)
    }

    fn generate_keypair(
        &mut self,
        curve: Curve,
        _usage: KeyUsage,
        key_id: KeyId,
        public_key: &mut [u8],
    ) -> Result<usize, Indeterminate<Error>> {
        self.ensure_open()?;

        if curve != Curve::NistP256 {
            return Err(Error::InvalidParameterInDataField.into());
        }

        let scalar = generated_scalar(key_id);
        let point = backend::public_point(&scalar);
        self.keys.insert(key_id, scalar);

        let mut encoded = vec![0x03, (point.len() + 1) as u8, 0x00];
        encoded.extend_from_slice(&point);
        copy_out(&encoded, public_key)
    }

    fn ecdsa_sign(
        &mut self,
        digest: &[u8],
        key_id: KeyId,
        signature: &mut [u8],
    ) -> Result<usize, Indeterminate<Error>> {
        self.ensure_open()?;

        let scalar = self
            .keys
            .get(&key_id)
            .ok_or(Error::AccessConditionsNotSatisfied)?;
        let (r, s) = backend::sign_prehash(scalar, digest);
        let sig = Signature::new(&r, &s).map_err(Error::IoError)?;

        copy_out(&sig.to_chip_bytes(), signature)
    }
}

#[cfg(feature = "crypto_nossl")]
pub mod backend {
    use p256::ecdsa::{
        signature::hazmat::{PrehashSigner, PrehashVerifier},
        Signature, SigningKey, VerifyingKey,
    };

    pub fn public_point(scalar: &[u8; 32]) -> Vec<u8> {
        let key = SigningKey::from_slice(scalar).unwrap();
        key.verifying_key()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec()
    }

    pub fn sign_prehash(scalar: &[u8; 32], digest: &[u8]) -> (Vec<u8>, Vec<u8>) {
        let key = SigningKey::from_slice(scalar).unwrap();
        let sig: Signature = key.sign_prehash(digest).unwrap();
        let (r, s) = sig.split_bytes();
        (r.to_vec(), s.to_vec())
    }

    pub fn verify_prehash(point: &[u8], digest: &[u8], r_s: &[u8]) -> bool {
        let key = VerifyingKey::from_sec1_bytes(point).unwrap();
        let sig = Signature::from_slice(r_s).unwrap();
        key.verify_prehash(digest, &sig).is_ok()
    }
}

#[cfg(feature = "openssl")]
pub mod backend {
    use openssl::{
        bn::{BigNum, BigNumContext},
        ec::{EcGroup, EcKey, EcPoint, PointConversionForm},
        ecdsa::EcdsaSig,
        nid::Nid,
        pkey::Private,
    };

    fn group() -> EcGroup {
        EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).unwrap()
    }

    fn private_key(scalar: &[u8; 32]) -> EcKey<Private> {
        let group = group();
        let d = BigNum::from_slice(scalar).unwrap();
        let ctx = BigNumContext::new().unwrap();
        let mut q = EcPoint::new(&group).unwrap();
        q.mul_generator(&group, &d, &ctx).unwrap();
        EcKey::from_private_components(&group, &d, &q).unwrap()
    }

    pub fn public_point(scalar: &[u8; 32]) -> Vec<u8> {
        let group = group();
        let mut ctx = BigNumContext::new().unwrap();
        private_key(scalar)
            .public_key()
            .to_bytes(&group, PointConversionForm::UNCOMPRESSED, &mut ctx)
            .unwrap()
    }

    pub fn sign_prehash(scalar: &[u8; 32], digest: &[u8]) -> (Vec<u8>, Vec<u8>) {
        let sig = EcdsaSig::sign(digest, &private_key(scalar)).unwrap();
        (sig.r().to_vec(), sig.s().to_vec())
    }

    pub fn verify_prehash(point: &[u8], digest: &[u8], r_s: &[u8]) -> bool {
        let group = group();
        let mut ctx = BigNumContext::new().unwrap();
        let q = EcPoint::from_bytes(&group, point, &mut ctx).unwrap();
        let key = EcKey::from_public_key(&group, &q).unwrap();
        let (r, s) = r_s.split_at(r_s.len() / 2);
        let sig = EcdsaSig::from_private_components(
            BigNum::from_slice(r).unwrap(),
            BigNum::from_slice(s).unwrap(),
        )
        .unwrap();
        sig.verify(digest, &key).unwrap()
    }
}
