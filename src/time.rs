//! `Validity` and the UTCTime/GeneralizedTime chooser.

use crate::error::{BadInputSnafu, Result};
use crate::writer::{tag, ReverseWriter};
use alloc::string::{String, ToString};
use snafu::ensure;

/// `notBefore`/`notAfter`, each a verbatim 15-byte `YYYYMMDDHHMMSSZ`
/// ASCII string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validity {
    not_before: String,
    not_after: String,
}

fn check_timestamp(s: &str) -> Result<()> {
    ensure!(
        s.len() == 15 && s.as_bytes()[14] == b'Z' && s.as_bytes()[..14].iter().all(u8::is_ascii_digit),
        BadInputSnafu {
            detail: alloc::format!("{s:?} is not a 15-byte YYYYMMDDHHMMSSZ timestamp"),
        }
    );
    Ok(())
}

impl Validity {
    /// Verbatim setter: both strings must already be exactly
    /// `YYYYMMDDHHMMSSZ` (15 bytes, trailing `Z`). No time computation
    /// happens here — that's left to the caller or [`Self::from_chrono`].
    pub fn new(not_before: impl Into<String>, not_after: impl Into<String>) -> Result<Self> {
        let not_before = not_before.into();
        let not_after = not_after.into();
        check_timestamp(&not_before)?;
        check_timestamp(&not_after)?;
        Ok(Self {
            not_before,
            not_after,
        })
    }

    /// Convenience constructor formatting two `chrono` timestamps into
    /// the exact shape [`Self::new`] expects, then deferring to it — no
    /// separate code path computes time.
    pub fn from_chrono(
        not_before: chrono::DateTime<chrono::Utc>,
        not_after: chrono::DateTime<chrono::Utc>,
    ) -> Result<Self> {
        let format = |dt: chrono::DateTime<chrono::Utc>| dt.format("%Y%m%d%H%M%SZ").to_string();
        Self::new(format(not_before), format(not_after))
    }

    /// `Validity ::= SEQUENCE { notBefore Time, notAfter Time }`.
    pub(crate) fn write(&self, w: &mut ReverseWriter) -> Result<usize> {
        let mut len = choose_and_write(w, &self.not_after)?;
        len += choose_and_write(w, &self.not_before)?;
        w.wrap(tag::SEQUENCE, len)
    }
}

/// Chooses `UTCTime` (13-byte `YYMMDDHHMMSSZ` payload) for years
/// 2000-2049, `GeneralizedTime` (full 15-byte payload) otherwise.
fn choose_and_write(w: &mut ReverseWriter, timestamp: &str) -> Result<usize> {
    let bytes = timestamp.as_bytes();
    if &timestamp[0..2] == "20" && bytes[2] < b'5' {
        w.write_time(tag::UTC_TIME, &bytes[2..])
    } else {
        w.write_time(tag::GENERALIZED_TIME, bytes)
    }
}
