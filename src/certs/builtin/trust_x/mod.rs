// SPDX-License-Identifier: Apache-2.0

use super::*;

/// The public "Infineon OPTIGA(TM) Trust X CA 101" certificate (PEM-encoded).
///
/// Issues the end-device certificates provisioned into
/// [`ObjectId::DEVICE_CERT_IFX`](crate::device::ObjectId::DEVICE_CERT_IFX).
pub const CA_101: &[u8] = include_bytes!("ca_101.pem");

/// Get the Trust X CA 101 Certificate.
pub fn ca() -> Result<Certificate> {
    Certificate::from_pem(CA_101)
}

mod tests {
    #[test]
    fn ca_parses() {
        use super::*;

        let ca = ca().unwrap();
        let der = ca.to_der().unwrap();

        assert_eq!(der.len(), 636);
        assert_eq!(&der[..4], &[0x30, 0x82, 0x02, 0x78]);
    }

    #[test]
    fn ca_public_key_is_p256() {
        use super::*;

        let key = ca().unwrap().public_key_sec1().unwrap();

        assert_eq!(key.len(), 65);
        assert_eq!(&key[..3], &[0x04, 0x60, 0xd7]);
    }

    #[test]
    fn ca_is_not_self_signed() {
        use super::*;

        // Issued by the OPTIGA ECC Root CA, not by itself.
        let ca = ca().unwrap();
        assert!((&ca, &ca).verify().is_err());
    }
}
