//! A fixed-size RSA key for the test suite. 512 bits is far too small
//! for any real certificate, but it keeps key generation and PKCS#1
//! v1.5 signing fast across the many small end-to-end scenarios in
//! `tests/x509.rs` and the `#[cfg(test)]` modules throughout this crate.

use rsa::RsaPrivateKey;
use std::sync::OnceLock;

/// A shared 512-bit RSA key, generated once per test binary.
pub fn test_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| {
        RsaPrivateKey::new(&mut rand::rngs::OsRng, 512).expect("generating 512-bit test key")
    })
}
