//! The public-key and private-key writers: PKCS#1 `RSAPublicKey` (and
//! its `SubjectPublicKeyInfo` lift) and PKCS#1 `RSAPrivateKey`.

use crate::error::{BadInputSnafu, Result};
use crate::oid;
use crate::pem::{self, PemLabel};
use crate::writer::{tag, ReverseWriter};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use num_bigint_dig::{BigInt, ModInverse, Sign};
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use snafu::OptionExt;

/// `RSAPublicKey ::= SEQUENCE { n INTEGER, e INTEGER }`.
pub(crate) fn write_rsa_public_key(w: &mut ReverseWriter, n: &BigUint, e: &BigUint) -> Result<usize> {
    let mut len = w.write_big_uint(e)?;
    len += w.write_big_uint(n)?;
    w.wrap(tag::SEQUENCE, len)
}

/// `SubjectPublicKeyInfo ::= SEQUENCE { AlgorithmIdentifier(rsaEncryption,
/// NULL), subjectPublicKey BIT STRING }`, the BIT STRING wrapping an
/// `RSAPublicKey` with zero unused bits; the `0x00` unused-bits octet
/// precedes the `RSAPublicKey` bytes inside the BIT STRING content.
pub(crate) fn write_subject_public_key_info(
    w: &mut ReverseWriter,
    n: &BigUint,
    e: &BigUint,
) -> Result<usize> {
    let pubkey_len = write_rsa_public_key(w, n, e)?;
    let content_len = pubkey_len + w.prepend_byte(0x00)?;
    let bitstring_len = w.wrap(tag::BIT_STRING, content_len)?;
    let alg_len = w.write_algorithm_identifier(oid::pkcs1::RSA_ENCRYPTION)?;
    w.wrap(tag::SEQUENCE, bitstring_len + alg_len)
}

/// `RSAPrivateKey ::= SEQUENCE { version INTEGER (0), n, e, d, p, q, dp,
/// dq, qinv INTEGER }`. `dp`/`dq`/`qinv` are recomputed from `d`/`p`/`q`
/// rather than read off a crate-internal precomputed cache, so this
/// works for any two-prime `RsaPrivateKey` regardless of how it was
/// constructed.
pub(crate) fn write_rsa_private_key(w: &mut ReverseWriter, key: &RsaPrivateKey) -> Result<usize> {
    let n = key.n();
    let e = key.e();
    let d = key.d();
    let primes = key.primes();
    let p = primes.first().context(BadInputSnafu {
        detail: "RSA key has no prime factors".to_string(),
    })?;
    let q = primes.get(1).context(BadInputSnafu {
        detail: "RSA key is not a standard two-prime key".to_string(),
    })?;

    let one = BigUint::from(1u32);
    let dp = d % (p - &one);
    let dq = d % (q - &one);

    let p_int = BigInt::from_biguint(Sign::Plus, p.clone());
    let q_int = BigInt::from_biguint(Sign::Plus, q.clone());
    let qinv = q_int
        .mod_inverse(&p_int)
        .and_then(|v| v.to_biguint())
        .context(BadInputSnafu {
            detail: "RSA key's prime factors are not coprime".to_string(),
        })?;

    let mut len = w.write_big_uint(&qinv)?;
    len += w.write_big_uint(&dq)?;
    len += w.write_big_uint(&dp)?;
    len += w.write_big_uint(q)?;
    len += w.write_big_uint(p)?;
    len += w.write_big_uint(d)?;
    len += w.write_big_uint(e)?;
    len += w.write_big_uint(n)?;
    len += w.write_int(0)?;
    w.wrap(tag::SEQUENCE, len)
}

/// DER-encoded `SubjectPublicKeyInfo` for a standalone RSA public key.
pub fn public_key_der(key: &RsaPublicKey) -> Result<Vec<u8>> {
    let mut w = ReverseWriter::with_capacity(1024);
    write_subject_public_key_info(&mut w, key.n(), key.e())?;
    Ok(w.finished().to_vec())
}

/// The raw PKCS#1 `RSAPublicKey` (no SPKI wrapping) — used internally
/// as the input to the SHA-1 key-identifier extensions.
pub fn public_key_pkcs1_der(key: &RsaPublicKey) -> Result<Vec<u8>> {
    let mut w = ReverseWriter::with_capacity(1024);
    write_rsa_public_key(&mut w, key.n(), key.e())?;
    Ok(w.finished().to_vec())
}

pub fn public_key_pem(key: &RsaPublicKey) -> Result<String> {
    Ok(pem::encode(&public_key_der(key)?, PemLabel::PublicKey))
}

/// DER-encoded PKCS#1 `RSAPrivateKey`.
pub fn private_key_der(key: &RsaPrivateKey) -> Result<Vec<u8>> {
    let mut w = ReverseWriter::with_capacity(2048);
    write_rsa_private_key(&mut w, key)?;
    Ok(w.finished().to_vec())
}

pub fn private_key_pem(key: &RsaPrivateKey) -> Result<String> {
    Ok(pem::encode(&private_key_der(key)?, PemLabel::RsaPrivateKey))
}
