//! The certificate assembler: builds an X.509 v3 `TBSCertificate`,
//! hashes and signs it, and splices the signature into the final
//! `Certificate`.

use crate::error::Result;
use crate::extensions::ExtensionStore;
use crate::hash::MessageDigest;
use crate::keys::write_subject_public_key_info;
use crate::name::DistinguishedName;
use crate::pem::{self, PemLabel};
use crate::sign;
use crate::time::Validity;
use crate::writer::{tag, ReverseWriter};
use alloc::string::String;
use alloc::vec::Vec;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};

/// Scratch capacity for `TBSCertificate` staging, per §5 of the design
/// this crate follows.
const TBS_SCRATCH_CAPACITY: usize = 2048;

/// X.509 version, fixed at v3 (the only version this crate emits).
const VERSION_V3: i64 = 2;

/// Builds an X.509 v3 `Certificate`.
///
/// `issuer_key` signs the certificate; `subject_key` is the public key
/// carried in the `SubjectPublicKeyInfo`. For a self-signed certificate
/// both point at the same key pair.
pub struct CertificateBuilder<'a> {
    serial: BigUint,
    issuer: DistinguishedName,
    subject: DistinguishedName,
    issuer_key: &'a RsaPrivateKey,
    subject_key: RsaPublicKey,
    validity: Validity,
    digest: MessageDigest,
    extensions: ExtensionStore,
}

impl<'a> CertificateBuilder<'a> {
    pub fn new(
        serial: BigUint,
        validity: Validity,
        issuer_key: &'a RsaPrivateKey,
        subject_key: RsaPublicKey,
        digest: MessageDigest,
    ) -> Self {
        Self {
            serial,
            issuer: DistinguishedName::default(),
            subject: DistinguishedName::default(),
            issuer_key,
            subject_key,
            validity,
            digest,
            extensions: ExtensionStore::default(),
        }
    }

    /// Idempotent: re-parsing replaces the prior issuer `DistinguishedName`
    /// rather than appending to it.
    pub fn set_issuer_name(&mut self, name: &str) -> Result<()> {
        self.issuer = DistinguishedName::parse(name)?;
        Ok(())
    }

    /// Idempotent, same as [`Self::set_issuer_name`].
    pub fn set_subject_name(&mut self, name: &str) -> Result<()> {
        self.subject = DistinguishedName::parse(name)?;
        Ok(())
    }

    pub fn extensions_mut(&mut self) -> &mut ExtensionStore {
        &mut self.extensions
    }

    fn build_tbs(&self) -> Result<Vec<u8>> {
        let mut w = ReverseWriter::with_capacity(TBS_SCRATCH_CAPACITY);

        // 1. extensions, `[3] EXPLICIT SEQUENCE OF Extension`.
        let extensions_len = if self.extensions.is_empty() {
            0
        } else {
            let seq_len = self.extensions.write(&mut w)?;
            w.wrap(tag::context_constructed(3), seq_len)?
        };

        // 2. subjectPublicKeyInfo
        let spki_len =
            write_subject_public_key_info(&mut w, self.subject_key.n(), self.subject_key.e())?;
        // 3. subject
        let subject_len = self.subject.write(&mut w)?;
        // 4. validity
        let validity_len = self.validity.write(&mut w)?;
        // 5. issuer
        let issuer_len = self.issuer.write(&mut w)?;
        // 6. signature AlgorithmIdentifier
        let sig_alg_len = w.write_algorithm_identifier(self.digest.signature_oid())?;
        // 7. serialNumber
        let serial_len = w.write_big_uint(&self.serial)?;
        // 8. version, `[0] EXPLICIT INTEGER` = 2
        let version_inner = w.write_int(VERSION_V3)?;
        let version_len = w.wrap(tag::context_constructed(0), version_inner)?;

        w.wrap(
            tag::SEQUENCE,
            extensions_len
                + spki_len
                + subject_len
                + validity_len
                + issuer_len
                + sig_alg_len
                + serial_len
                + version_len,
        )?;
        Ok(w.finished().to_vec())
    }

    /// Assembles, hashes, and signs the certificate with `issuer_key`,
    /// returning the DER bytes of the completed `Certificate`.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        tracing::debug!(
            subject_attrs = self.subject.len(),
            issuer_attrs = self.issuer.len(),
            extensions = self.extensions.len(),
            "assembling certificate TBS"
        );
        let tbs = self.build_tbs()?;
        let hash = self.digest.hash(&tbs);
        let signature = sign::sign(self.issuer_key, self.digest, &hash)?;
        tracing::trace!(signature_len = signature.len(), "signed certificate TBS");

        let mut w = ReverseWriter::with_capacity(tbs.len() + signature.len() + 128);
        let sig_len = w.write_bit_string(&signature, signature.len() * 8)?;
        let alg_len = w.write_algorithm_identifier(self.digest.signature_oid())?;
        let tbs_len = w.prepend_bytes(&tbs)?;
        w.wrap(tag::SEQUENCE, tbs_len + alg_len + sig_len)?;
        Ok(w.finished().to_vec())
    }

    /// [`Self::to_der`], PEM-wrapped.
    pub fn to_pem(&self) -> Result<String> {
        Ok(pem::encode(&self.to_der()?, PemLabel::Certificate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder<'a>(key: &'a RsaPrivateKey) -> CertificateBuilder<'a> {
        CertificateBuilder::new(
            BigUint::from(1u32),
            Validity::new("20200101000000Z", "20301231235959Z").unwrap(),
            key,
            key.to_public_key(),
            MessageDigest::Sha256,
        )
    }

    #[test]
    fn self_signed_cert_has_version_2_and_serial_1() {
        let key = crate::test_support::test_key();
        let mut cert = builder(key);
        cert.set_issuer_name("CN=root").unwrap();
        cert.set_subject_name("CN=root").unwrap();
        let der = cert.to_der().unwrap();

        pretty_assertions::assert_eq!(der[0], tag::SEQUENCE);
        // version tag `[0] EXPLICIT INTEGER` = 2 appears right after the
        // TBS SEQUENCE header, before anything else in the TBS.
        assert!(der
            .windows(5)
            .any(|w| w == [tag::context_constructed(0), 0x03, 0x02, 0x01, 0x02]));
        assert!(der.windows(3).any(|w| w == [0x02, 0x01, 0x01])); // serial = 1
    }

    #[test]
    fn basic_constraints_ca_round_trips() {
        let key = crate::test_support::test_key();
        let mut cert = builder(key);
        cert.set_issuer_name("CN=root").unwrap();
        cert.set_subject_name("CN=root").unwrap();
        cert.extensions_mut()
            .set_basic_constraints(true, Some(0), true)
            .unwrap();
        let der = cert.to_der().unwrap();

        // extnValue OCTET STRING wraps the CA/pathLen=0 BasicConstraints
        // value from extensions::tests::basic_constraints_ca_with_pathlen.
        assert!(der
            .windows(8)
            .any(|w| w == [0x30, 0x06, 0x01, 0x01, 0xFF, 0x02, 0x01, 0x00]));
    }

    #[test]
    fn ski_over_same_key_matches_aki() {
        let key = crate::test_support::test_key();
        let pubkey_der = crate::keys::public_key_pkcs1_der(&key.to_public_key()).unwrap();

        let mut cert = builder(key);
        cert.set_issuer_name("CN=root").unwrap();
        cert.set_subject_name("CN=root").unwrap();
        cert.extensions_mut()
            .set_subject_key_identifier(&pubkey_der, false)
            .unwrap();
        cert.extensions_mut()
            .set_authority_key_identifier(&pubkey_der, false)
            .unwrap();

        let (_, ski) = cert
            .extensions_mut()
            .get(crate::oid::extension::SUBJECT_KEY_IDENTIFIER)
            .unwrap();
        let ski = ski.to_vec();
        let (_, aki) = cert
            .extensions_mut()
            .get(crate::oid::extension::AUTHORITY_KEY_IDENTIFIER)
            .unwrap();
        // AKI wraps the same 20-byte SHA-1 digest inside `SEQUENCE { [0]
        // OCTET STRING }`; SKI wraps it directly in `OCTET STRING`.
        pretty_assertions::assert_eq!(ski.len(), 22); // tag + len + 20-byte digest
        assert!(aki.ends_with(&ski[2..]));
    }

    #[test]
    fn signature_verifies_against_subject_key() {
        use rsa::pkcs1v15::VerifyingKey;
        use rsa::signature::Verifier;

        let key = crate::test_support::test_key();
        let mut cert = builder(key);
        cert.set_issuer_name("CN=root").unwrap();
        cert.set_subject_name("CN=root").unwrap();
        let der = cert.to_der().unwrap();

        // Walk the outer SEQUENCE by hand to split tbsCertificate from
        // the trailing signatureAlgorithm/signatureValue, re-deriving
        // the hash the way an independent verifier would.
        let (tbs_start, tbs_end) = {
            let mut pos = 1;
            pos += if der[pos] & 0x80 != 0 {
                1 + (der[pos] & 0x7F) as usize
            } else {
                1
            };
            let tbs_tag_pos = pos;
            let (len, header) = read_length(&der[tbs_tag_pos + 1..]);
            (tbs_tag_pos, tbs_tag_pos + 1 + header + len)
        };
        let tbs = &der[tbs_start..tbs_end];
        let hash = MessageDigest::Sha256.hash(tbs);

        let sig_start = der.len() - key.size();
        let signature = &der[sig_start..];
        let verifying_key: VerifyingKey<sha2::Sha256> = VerifyingKey::new(key.to_public_key());
        let signature = rsa::pkcs1v15::Signature::try_from(signature).unwrap();
        verifying_key.verify(&hash, &signature).unwrap();
    }

    fn read_length(bytes: &[u8]) -> (usize, usize) {
        if bytes[0] & 0x80 == 0 {
            (bytes[0] as usize, 1)
        } else {
            let n = (bytes[0] & 0x7F) as usize;
            let mut len = 0usize;
            for &b in &bytes[1..1 + n] {
                len = (len << 8) | b as usize;
            }
            (len, 1 + n)
        }
    }
}
