//! The extension store: a keyed `OID -> (critical, DER value)` set,
//! plus constructors for the five extensions this crate knows how to
//! build (BasicConstraints, KeyUsage, NsCertType, SubjectKeyIdentifier,
//! AuthorityKeyIdentifier).

use crate::error::{PathLenTooLargeSnafu, Result};
use crate::oid;
use crate::writer::{tag, ReverseWriter};
use alloc::vec::Vec;
use sha1::{Digest, Sha1};
use snafu::ensure;

/// One stored extension: a plain `{oid, critical, value}` record. The
/// original C source packs the critical flag into the first byte of
/// the stored value to save an allocation; a `Vec`-based store has no
/// such pressure, so the flag gets its own field.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ExtensionEntry {
    oid: Vec<u8>,
    critical: bool,
    value: Vec<u8>,
}

/// Insertion-ordered, OID-keyed set of extensions. A handful of entries
/// per certificate in practice, so a linear scan is the right
/// trade-off over a map — and, unlike a map, it preserves insertion
/// order, which is semantically meaningful here (see
/// [`ExtensionStore::write`]).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtensionStore {
    entries: Vec<ExtensionEntry>,
}

impl ExtensionStore {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Finds the entry for `oid` and overwrites its critical flag and
    /// value, or appends a new entry if none exists yet.
    pub fn set(&mut self, oid: impl Into<Vec<u8>>, critical: bool, value: impl Into<Vec<u8>>) {
        let oid = oid.into();
        let value = value.into();
        match self.entries.iter_mut().find(|e| e.oid == oid) {
            Some(entry) => {
                entry.critical = critical;
                entry.value = value;
            }
            None => self.entries.push(ExtensionEntry {
                oid,
                critical,
                value,
            }),
        }
    }

    /// Looks up a stored extension's `(critical, value)` pair by OID,
    /// mainly for tests that re-parse an assembled structure.
    pub fn get(&self, oid: &[u8]) -> Option<(bool, &[u8])> {
        self.entries
            .iter()
            .find(|e| e.oid == oid)
            .map(|e| (e.critical, e.value.as_slice()))
    }

    /// `SEQUENCE OF Extension`, each `Extension ::= SEQUENCE { extnID
    /// OID, critical BOOLEAN DEFAULT FALSE, extnValue OCTET STRING }`.
    ///
    /// Iterated in reverse of insertion order: the reverse-write
    /// convention means the *last* primitive written ends up *first*
    /// in the finished document, so walking the store back-to-front
    /// here is what makes the finished `SEQUENCE OF Extension` come out
    /// in insertion order.
    pub(crate) fn write(&self, w: &mut ReverseWriter) -> Result<usize> {
        let mut len = 0;
        for entry in self.entries.iter().rev() {
            len += write_extension_entry(w, entry)?;
        }
        w.wrap(tag::SEQUENCE, len)
    }

    /// `BasicConstraints ::= SEQUENCE { cA BOOLEAN DEFAULT FALSE,
    /// pathLenConstraint INTEGER OPTIONAL }`. Unlike the original, which
    /// always emits this extension non-critical (an RFC 5280 §4.2.1.9
    /// conformance gap for CA certificates), `critical` is an explicit
    /// parameter here.
    pub fn set_basic_constraints(
        &mut self,
        is_ca: bool,
        max_pathlen: Option<i32>,
        critical: bool,
    ) -> Result<()> {
        let mut w = ReverseWriter::with_capacity(16);
        let mut len = 0;
        if is_ca {
            if let Some(pathlen) = max_pathlen {
                ensure!(
                    (0..=127).contains(&pathlen),
                    PathLenTooLargeSnafu {
                        max_pathlen: pathlen
                    }
                );
                len += w.write_int(pathlen as i64)?;
            }
            len += w.write_bool(true)?;
        }
        w.wrap(tag::SEQUENCE, len)?;
        self.set(
            oid::extension::BASIC_CONSTRAINTS,
            critical,
            w.finished().to_vec(),
        );
        Ok(())
    }

    /// `KeyUsage ::= BIT STRING`, one octet, 7 meaningful bits (bit 7,
    /// decipherOnly, is never set by this helper since the original
    /// only ever passed a single input byte covering the first 7 KU
    /// bits).
    pub fn set_key_usage(&mut self, usage: u8, critical: bool) -> Result<()> {
        let mut w = ReverseWriter::with_capacity(8);
        w.write_bit_string(&[usage], 7)?;
        self.set(oid::extension::KEY_USAGE, critical, w.finished().to_vec());
        Ok(())
    }

    /// Netscape `nsCertType ::= BIT STRING`, one octet, all 8 bits
    /// meaningful.
    pub fn set_ns_cert_type(&mut self, flags: u8, critical: bool) -> Result<()> {
        let mut w = ReverseWriter::with_capacity(8);
        w.write_bit_string(&[flags], 8)?;
        self.set(oid::extension::NS_CERT_TYPE, critical, w.finished().to_vec());
        Ok(())
    }

    /// `subjectKeyIdentifier ::= OCTET STRING`, SHA-1 over the DER
    /// encoding of `public_key_der` (a PKCS#1 `RSAPublicKey`, i.e. the
    /// output of [`crate::keys::public_key_pkcs1_der`]).
    pub fn set_subject_key_identifier(
        &mut self,
        public_key_der: &[u8],
        critical: bool,
    ) -> Result<()> {
        let digest = Sha1::digest(public_key_der);
        let mut w = ReverseWriter::with_capacity(32);
        w.write_octet_string(&digest)?;
        self.set(
            oid::extension::SUBJECT_KEY_IDENTIFIER,
            critical,
            w.finished().to_vec(),
        );
        Ok(())
    }

    /// `authorityKeyIdentifier ::= SEQUENCE { [0] IMPLICIT OCTET STRING
    /// }` — only the `keyIdentifier` field is emitted, same SHA-1 digest
    /// as [`Self::set_subject_key_identifier`] but over the issuer's key.
    pub fn set_authority_key_identifier(
        &mut self,
        issuer_public_key_der: &[u8],
        critical: bool,
    ) -> Result<()> {
        let digest = Sha1::digest(issuer_public_key_der);
        let mut w = ReverseWriter::with_capacity(32);
        let inner = w.prepend_bytes(&digest)?;
        let key_id = w.wrap(tag::context(0), inner)?;
        w.wrap(tag::SEQUENCE, key_id)?;
        self.set(
            oid::extension::AUTHORITY_KEY_IDENTIFIER,
            critical,
            w.finished().to_vec(),
        );
        Ok(())
    }
}

fn write_extension_entry(w: &mut ReverseWriter, entry: &ExtensionEntry) -> Result<usize> {
    let mut len = w.write_octet_string(&entry.value)?;
    if entry.critical {
        len += w.write_bool(true)?;
    }
    len += w.write_oid(&entry.oid)?;
    w.wrap(tag::SEQUENCE, len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_constraints_not_ca_is_empty_sequence() {
        let mut store = ExtensionStore::default();
        store.set_basic_constraints(false, None, false).unwrap();
        let (_, value) = store.get(oid::extension::BASIC_CONSTRAINTS).unwrap();
        pretty_assertions::assert_eq!(value, &[0x30, 0x00]);
    }

    #[test]
    fn basic_constraints_ca_with_pathlen() {
        let mut store = ExtensionStore::default();
        store.set_basic_constraints(true, Some(0), true).unwrap();
        let (critical, value) = store.get(oid::extension::BASIC_CONSTRAINTS).unwrap();
        assert!(critical);
        pretty_assertions::assert_eq!(value, &[0x30, 0x06, 0x01, 0x01, 0xFF, 0x02, 0x01, 0x00]);
    }

    #[test]
    fn basic_constraints_rejects_pathlen_over_127() {
        let mut store = ExtensionStore::default();
        let err = store
            .set_basic_constraints(true, Some(128), true)
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::PathLenTooLarge { .. }));
    }

    #[test]
    fn key_usage_zero_byte() {
        let mut store = ExtensionStore::default();
        store.set_key_usage(0, false).unwrap();
        let (_, value) = store.get(oid::extension::KEY_USAGE).unwrap();
        pretty_assertions::assert_eq!(value, &[0x03, 0x02, 0x07, 0x00]);
    }

    #[test]
    fn key_usage_with_digital_signature_and_key_encipherment() {
        let mut store = ExtensionStore::default();
        store.set_key_usage(0xA0, false).unwrap();
        let (_, value) = store.get(oid::extension::KEY_USAGE).unwrap();
        pretty_assertions::assert_eq!(value, &[0x03, 0x02, 0x01, 0xA0]);
    }

    #[test]
    fn ns_cert_type_zero_byte() {
        let mut store = ExtensionStore::default();
        store.set_ns_cert_type(0, false).unwrap();
        let (_, value) = store.get(oid::extension::NS_CERT_TYPE).unwrap();
        pretty_assertions::assert_eq!(value, &[0x03, 0x02, 0x00, 0x00]);
    }

    #[test]
    fn setting_same_oid_twice_replaces() {
        let mut store = ExtensionStore::default();
        store.set_key_usage(0xA0, false).unwrap();
        store.set_key_usage(0x80, true).unwrap();
        pretty_assertions::assert_eq!(store.len(), 1);
        let (critical, value) = store.get(oid::extension::KEY_USAGE).unwrap();
        assert!(critical);
        pretty_assertions::assert_eq!(value, &[0x03, 0x02, 0x01, 0x80]);
    }

    #[test]
    fn write_preserves_insertion_order() {
        let mut store = ExtensionStore::default();
        store.set_key_usage(0xA0, false).unwrap();
        store.set_ns_cert_type(0x40, false).unwrap();
        let mut w = ReverseWriter::with_capacity(256);
        store.write(&mut w).unwrap();
        let bytes = w.finished();
        let ku_pos = bytes
            .windows(oid::extension::KEY_USAGE.len())
            .position(|w| w == oid::extension::KEY_USAGE)
            .unwrap();
        let ns_pos = bytes
            .windows(oid::extension::NS_CERT_TYPE.len())
            .position(|w| w == oid::extension::NS_CERT_TYPE)
            .unwrap();
        assert!(ku_pos < ns_pos);
    }
}
