//! The CSR assembler: builds `CertificationRequestInfo`, hashes and
//! signs it, and splices the signature into the final
//! `CertificationRequest`.

use crate::error::Result;
use crate::extensions::ExtensionStore;
use crate::hash::MessageDigest;
use crate::keys::write_subject_public_key_info;
use crate::name::DistinguishedName;
use crate::oid;
use crate::pem::{self, PemLabel};
use crate::sign;
use crate::writer::{tag, ReverseWriter};
use alloc::string::String;
use alloc::vec::Vec;
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;

/// Scratch capacity for `CertificationRequestInfo` staging, per §5 of
/// the design this crate follows.
const TBS_SCRATCH_CAPACITY: usize = 2048;

/// Builds a PKCS#10 Certification Request for `key`.
pub struct CertificationRequestBuilder<'a> {
    subject: DistinguishedName,
    key: &'a RsaPrivateKey,
    digest: MessageDigest,
    extensions: ExtensionStore,
}

impl<'a> CertificationRequestBuilder<'a> {
    pub fn new(key: &'a RsaPrivateKey, digest: MessageDigest) -> Self {
        Self {
            subject: DistinguishedName::default(),
            key,
            digest,
            extensions: ExtensionStore::default(),
        }
    }

    /// Parses and (re)sets the subject name. Idempotent: re-parsing
    /// replaces the prior `DistinguishedName` rather than appending to
    /// it.
    pub fn set_subject_name(&mut self, name: &str) -> Result<()> {
        self.subject = DistinguishedName::parse(name)?;
        Ok(())
    }

    pub fn extensions_mut(&mut self) -> &mut ExtensionStore {
        &mut self.extensions
    }

    fn build_tbs(&self) -> Result<Vec<u8>> {
        let mut w = ReverseWriter::with_capacity(TBS_SCRATCH_CAPACITY);

        // 1. attributes [0] IMPLICIT, carrying `extensionRequest` when
        //    the caller set any extensions, or empty otherwise.
        let attrs_len = if self.extensions.is_empty() {
            w.wrap(tag::context_constructed(0), 0)?
        } else {
            let ext_seq_len = self.extensions.write(&mut w)?;
            let set_len = w.wrap(tag::SET, ext_seq_len)?;
            let oid_len = w.write_oid(oid::extension::EXTENSION_REQUEST)?;
            let attribute_len = w.wrap(tag::SEQUENCE, set_len + oid_len)?;
            w.wrap(tag::context_constructed(0), attribute_len)?
        };

        // 2. subjectPKInfo
        let spki_len = write_subject_public_key_info(&mut w, self.key.n(), self.key.e())?;
        // 3. subject
        let subject_len = self.subject.write(&mut w)?;
        // 4. version = 0
        let version_len = w.write_int(0)?;

        w.wrap(
            tag::SEQUENCE,
            attrs_len + spki_len + subject_len + version_len,
        )?;
        Ok(w.finished().to_vec())
    }

    /// Assembles, hashes, and signs the request, returning the DER
    /// bytes of the completed `CertificationRequest`.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        tracing::debug!(subject_attrs = self.subject.len(), "assembling CSR TBS");
        let tbs = self.build_tbs()?;
        let hash = self.digest.hash(&tbs);
        let signature = sign::sign(self.key, self.digest, &hash)?;
        tracing::trace!(signature_len = signature.len(), "signed CSR TBS");

        let mut w = ReverseWriter::with_capacity(tbs.len() + signature.len() + 128);
        let sig_len = w.write_bit_string(&signature, signature.len() * 8)?;
        let alg_len = w.write_algorithm_identifier(self.digest.signature_oid())?;
        let tbs_len = w.prepend_bytes(&tbs)?;
        w.wrap(tag::SEQUENCE, tbs_len + alg_len + sig_len)?;
        Ok(w.finished().to_vec())
    }

    /// [`Self::to_der`], PEM-wrapped.
    pub fn to_pem(&self) -> Result<String> {
        Ok(pem::encode(&self.to_der()?, PemLabel::CertificateRequest))
    }
}
