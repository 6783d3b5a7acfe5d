//! Reverse-order DER assembly for X.509 v3 certificates, PKCS#10
//! Certificate Signing Requests, and PKCS#1 RSA keys.
//!
//! The hard engineering here is the [`writer::ReverseWriter`]: DER
//! nests length-before-value, so every `SEQUENCE`/`SET`/`[N]` wrapper
//! needs its content's length before it can write its own tag and
//! length. Rather than assemble forward and copy, every primitive in
//! this crate writes into a buffer from the tail toward the head, so a
//! wrapper can prepend its header the instant its children are done.
//!
//! [`csr::CertificationRequestBuilder`] and [`cert::CertificateBuilder`]
//! are the two end-to-end assemblers built on top of that writer: set
//! subject/issuer names, validity, serial, extensions, and a hash
//! algorithm, then call `to_der`/`to_pem` to get a signed, ready-to-
//! distribute byte stream.
//!
//! Parsing X.509 (the reverse operation), key generation, certificate-
//! chain validation, and elliptic-curve keys are out of scope; this
//! crate is an RSA-only DER *writer*.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod cert;
pub mod csr;
pub mod error;
pub mod extensions;
pub mod hash;
pub mod keys;
pub mod name;
pub mod oid;
pub mod pem;
mod sign;
#[cfg(test)]
mod test_support;
pub mod time;
pub mod writer;

pub use cert::CertificateBuilder;
pub use csr::CertificationRequestBuilder;
pub use error::{Error, Result};
pub use extensions::ExtensionStore;
pub use hash::MessageDigest;
pub use name::DistinguishedName;
pub use time::Validity;

/// Commonly used types, re-exported for `use rasn_x509write::prelude::*;`.
pub mod prelude {
    pub use crate::cert::CertificateBuilder;
    pub use crate::csr::CertificationRequestBuilder;
    pub use crate::error::{Error, Result};
    pub use crate::extensions::ExtensionStore;
    pub use crate::hash::MessageDigest;
    pub use crate::name::DistinguishedName;
    pub use crate::pem::PemLabel;
    pub use crate::time::Validity;
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn end_to_end_csr_then_certificate() {
        let key = crate::test_support::test_key();

        let mut csr = CertificationRequestBuilder::new(key, MessageDigest::Sha256);
        csr.set_subject_name("CN=example,O=Example Org").unwrap();
        let csr_der = csr.to_der().unwrap();
        pretty_assertions::assert_eq!(csr_der[0], crate::writer::tag::SEQUENCE);

        let mut cert = CertificateBuilder::new(
            rsa::BigUint::from(42u32),
            Validity::new("20200101000000Z", "20300101000000Z").unwrap(),
            key,
            key.to_public_key(),
            MessageDigest::Sha256,
        );
        cert.set_issuer_name("CN=root").unwrap();
        cert.set_subject_name("CN=example").unwrap();
        cert.extensions_mut()
            .set_basic_constraints(false, None, false)
            .unwrap();
        let cert_der = cert.to_der().unwrap();
        pretty_assertions::assert_eq!(cert_der[0], crate::writer::tag::SEQUENCE);

        let pem = cert.to_pem().unwrap();
        assert!(pem.starts_with("-----BEGIN CERTIFICATE-----\n"));
        assert!(pem.ends_with("-----END CERTIFICATE-----\n"));
    }

    #[test]
    fn unknown_subject_oid_is_rejected() {
        let key = crate::test_support::test_key();
        let mut csr = CertificationRequestBuilder::new(key, MessageDigest::Sha1);
        assert!(matches!(
            csr.set_subject_name("X=foo"),
            Err(Error::UnknownOid { .. })
        ));
    }
}
