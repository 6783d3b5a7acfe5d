//! DER object-identifier constants used by CSR/certificate assembly.
//!
//! Each constant holds only the OID's *content* octets (base-128 arcs,
//! no tag/length) — [`crate::writer::ReverseWriter::write_oid`] wraps
//! them. Values are lifted from the standard PKCS#1/PKCS#9/X.520/X.509
//! arcs; `rsaEncryption` and `nsCertType` match the byte-for-byte
//! constants mbedtls's `oid.c` carries for the same arcs.

/// A DER-encoded OID's content octets.
pub type Oid = &'static [u8];

/// Subject/issuer attribute-type OIDs recognized by [`crate::name`].
pub mod attribute {
    use super::Oid;

    pub const COMMON_NAME: Oid = &[0x55, 0x04, 0x03];
    pub const COUNTRY_NAME: Oid = &[0x55, 0x04, 0x06];
    pub const ORGANIZATION_NAME: Oid = &[0x55, 0x04, 0x0A];
    pub const ORGANIZATIONAL_UNIT_NAME: Oid = &[0x55, 0x04, 0x0B];
    pub const LOCALITY_NAME: Oid = &[0x55, 0x04, 0x07];
    pub const STATE_OR_PROVINCE_NAME: Oid = &[0x55, 0x04, 0x08];
    pub const EMAIL_ADDRESS: Oid = &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x09, 0x01];
}

/// Certificate/CSR extension OIDs recognized by [`crate::extensions`].
pub mod extension {
    use super::Oid;

    pub const BASIC_CONSTRAINTS: Oid = &[0x55, 0x1D, 0x13];
    pub const KEY_USAGE: Oid = &[0x55, 0x1D, 0x0F];
    pub const SUBJECT_KEY_IDENTIFIER: Oid = &[0x55, 0x1D, 0x0E];
    pub const AUTHORITY_KEY_IDENTIFIER: Oid = &[0x55, 0x1D, 0x23];
    pub const NS_CERT_TYPE: Oid = &[0x60, 0x86, 0x48, 0x01, 0x86, 0xF8, 0x42, 0x01, 0x01];
    /// PKCS#9 `extensionRequest`, used to carry extensions in a CSR.
    pub const EXTENSION_REQUEST: Oid = &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x09, 0x0E];
}

/// PKCS#1 algorithm OIDs.
pub mod pkcs1 {
    use super::Oid;

    pub const RSA_ENCRYPTION: Oid = &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x01];
}

/// `{PK_RSA, md_alg}` signature-algorithm OIDs, keyed by [`crate::hash::MessageDigest`].
pub mod sig_alg {
    use super::Oid;

    pub const SHA1_WITH_RSA: Oid = &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x05];
    pub const SHA224_WITH_RSA: Oid = &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x0E];
    pub const SHA256_WITH_RSA: Oid = &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x0B];
    pub const SHA384_WITH_RSA: Oid = &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x0C];
    pub const SHA512_WITH_RSA: Oid = &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x0D];
}
