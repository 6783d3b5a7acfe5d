//! Error type for DER/PEM assembly.
//!
//! Groups the four failure classes the writer can hit: malformed caller
//! input, an output buffer too small for the structure being assembled,
//! and failures surfaced unchanged from the RSA signer.

use alloc::string::String;
use snafu::Snafu;

#[derive(Snafu, Debug)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("unrecognized distinguished name attribute tag: {tag:?}"))]
    UnknownOid { tag: String },

    #[snafu(display("bad input: {detail}"))]
    BadInput { detail: String },

    #[snafu(display("pathLenConstraint {max_pathlen} exceeds 127"))]
    PathLenTooLarge { max_pathlen: i32 },

    #[snafu(display("DER buffer too small: need {need} bytes, {available} available"))]
    BufTooSmall { need: usize, available: usize },

    #[snafu(display("RSA signing failed: {source}"))]
    Sign { source: rsa::errors::Error },
}

pub type Result<T> = core::result::Result<T, Error>;
