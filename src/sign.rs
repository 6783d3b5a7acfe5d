//! The RSA signer adapter: wraps `rsa::RsaPrivateKey`'s PKCS#1 v1.5
//! signing operation behind the `pkcs1_sign(key, mode=private, md_alg,
//! hash, out_sig)` collaborator contract of the original.
//!
//! PKCS#1 v1.5 signing is deterministic in its output, so — unlike
//! RSA-PSS — it needs no caller-supplied RNG; this mirrors the
//! original's `rng = NULL` signing path exactly rather than working
//! around it.

use crate::error::{Result, SignSnafu};
use crate::hash::MessageDigest;
use alloc::vec::Vec;
use rsa::pkcs1v15::Pkcs1v15Sign;
use rsa::RsaPrivateKey;
use snafu::ResultExt;

/// Signs `hash` (the digest of a TBS structure) with `key` using
/// PKCS#1 v1.5, returning a signature `key.size()` bytes long.
pub fn sign(key: &RsaPrivateKey, md: MessageDigest, hash: &[u8]) -> Result<Vec<u8>> {
    let padding = match md {
        MessageDigest::Sha1 => Pkcs1v15Sign::new::<sha1::Sha1>(),
        MessageDigest::Sha224 => Pkcs1v15Sign::new::<sha2::Sha224>(),
        MessageDigest::Sha256 => Pkcs1v15Sign::new::<sha2::Sha256>(),
        MessageDigest::Sha384 => Pkcs1v15Sign::new::<sha2::Sha384>(),
        MessageDigest::Sha512 => Pkcs1v15Sign::new::<sha2::Sha512>(),
    };
    key.sign(padding, hash).context(SignSnafu)
}
