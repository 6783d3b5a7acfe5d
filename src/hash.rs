//! The hash dispatcher: maps a [`MessageDigest`] tag to a one-shot
//! digest and to the `{PK_RSA, md_alg}` signature OID the certificate
//! and CSR assemblers put in `signatureAlgorithm`.

use crate::oid::{self, Oid};
use alloc::vec::Vec;
use digest::Digest;
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};

/// Hash algorithms this crate can dispatch. Limited to the RSA
/// signature-algorithm family mbedtls's `x509write` supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageDigest {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl MessageDigest {
    /// One-shot digest of `data`. Never longer than 64 bytes (SHA-512).
    pub fn hash(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha1 => Sha1::digest(data).to_vec(),
            Self::Sha224 => Sha224::digest(data).to_vec(),
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Sha384 => Sha384::digest(data).to_vec(),
            Self::Sha512 => Sha512::digest(data).to_vec(),
        }
    }

    /// The `sha*WithRSAEncryption` OID for this digest; there is no
    /// separate `PK_RSA` parameter since this crate is RSA-only.
    pub fn signature_oid(self) -> Oid {
        match self {
            Self::Sha1 => oid::sig_alg::SHA1_WITH_RSA,
            Self::Sha224 => oid::sig_alg::SHA224_WITH_RSA,
            Self::Sha256 => oid::sig_alg::SHA256_WITH_RSA,
            Self::Sha384 => oid::sig_alg::SHA384_WITH_RSA,
            Self::Sha512 => oid::sig_alg::SHA512_WITH_RSA,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha1_matches_known_digest() {
        let digest = MessageDigest::Sha1.hash(b"abc");
        pretty_assertions::assert_eq!(
            digest,
            hex(&[
                0xa9, 0x99, 0x3e, 0x36, 0x47, 0x06, 0x81, 0x6a, 0xba, 0x3e, 0x25, 0x71, 0x78, 0x50,
                0xc2, 0x6c, 0x9c, 0xd0, 0xd8, 0x9d
            ])
        );
    }

    fn hex(bytes: &[u8]) -> Vec<u8> {
        bytes.to_vec()
    }

    #[test]
    fn each_variant_has_a_distinct_oid() {
        let oids = [
            MessageDigest::Sha1.signature_oid(),
            MessageDigest::Sha224.signature_oid(),
            MessageDigest::Sha256.signature_oid(),
            MessageDigest::Sha384.signature_oid(),
            MessageDigest::Sha512.signature_oid(),
        ];
        for (i, a) in oids.iter().enumerate() {
            for (j, b) in oids.iter().enumerate() {
                pretty_assertions::assert_eq!(i == j, a == b);
            }
        }
    }
}
