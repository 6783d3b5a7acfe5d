//! The reverse-order DER primitive writer.
//!
//! DER nests length-before-value: a SEQUENCE's length can't be written
//! until every byte of its content exists. Rather than assemble content
//! forward and then prepend tag/length through a second pass, a
//! [`ReverseWriter`] fills its buffer from the tail toward the head: each
//! primitive writes itself immediately below the cursor and moves the
//! cursor down by however many bytes it wrote. A wrapper (SEQUENCE, SET,
//! `[N]` context tag, ...) then prepends its own tag and length directly
//! below its already-written children, with no copying and no
//! second pass.
//!
//! Every method returns the number of bytes it wrote (via
//! [`Error::BufTooSmall`] on underflow) so callers can accumulate a
//! running `len` the same way the assemblers in [`crate::csr`] and
//! [`crate::cert`] do.

use crate::error::{BufTooSmallSnafu, Error};
use alloc::vec;
use alloc::vec::Vec;
use rsa::BigUint;
use snafu::ensure;

/// Universal-class DER tags used by this crate. Constructed types have bit
/// 0x20 set; this crate only ever writes SEQUENCE and SET constructed.
pub mod tag {
    pub const BOOLEAN: u8 = 0x01;
    pub const INTEGER: u8 = 0x02;
    pub const BIT_STRING: u8 = 0x03;
    pub const OCTET_STRING: u8 = 0x04;
    pub const NULL: u8 = 0x05;
    pub const OID: u8 = 0x06;
    pub const UTF8_STRING: u8 = 0x0C;
    pub const PRINTABLE_STRING: u8 = 0x13;
    pub const IA5_STRING: u8 = 0x16;
    pub const UTC_TIME: u8 = 0x17;
    pub const GENERALIZED_TIME: u8 = 0x18;
    pub const SEQUENCE: u8 = 0x30;
    pub const SET: u8 = 0x31;

    pub const fn context(number: u8) -> u8 {
        0x80 | number
    }

    pub const fn context_constructed(number: u8) -> u8 {
        0xA0 | number
    }
}

/// A fixed-capacity buffer populated back-to-front.
///
/// `cursor` is the index of the first already-written byte; the
/// unwritten region is `buf[..cursor]`. On success the finished structure
/// occupies `buf[cursor..]`.
pub struct ReverseWriter {
    buf: Vec<u8>,
    cursor: usize,
}

impl ReverseWriter {
    /// Allocates a scratch buffer of `capacity` bytes, all initially
    /// unwritten (`cursor == capacity`).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity],
            cursor: capacity,
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len() - self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The finished structure, most recently written bytes first in
    /// write order but in final document order once assembly completes
    /// (every wrapper is written after its children).
    pub fn finished(&self) -> &[u8] {
        &self.buf[self.cursor..]
    }

    fn reserve(&mut self, need: usize) -> crate::error::Result<()> {
        ensure!(
            self.cursor >= need,
            BufTooSmallSnafu {
                need,
                available: self.cursor,
            }
        );
        Ok(())
    }

    /// Prepends `bytes` verbatim and returns the number of bytes written.
    pub fn prepend_bytes(&mut self, bytes: &[u8]) -> crate::error::Result<usize> {
        self.reserve(bytes.len())?;
        self.cursor -= bytes.len();
        self.buf[self.cursor..self.cursor + bytes.len()].copy_from_slice(bytes);
        Ok(bytes.len())
    }

    /// Prepends a single byte. `pub(crate)` because callers outside this
    /// module only ever need it to splice an "unused bits" or `IMPLICIT`
    /// tag octet next to content they already wrote (see
    /// [`crate::keys::write_subject_public_key_info`]).
    pub(crate) fn prepend_byte(&mut self, byte: u8) -> crate::error::Result<usize> {
        self.reserve(1)?;
        self.cursor -= 1;
        self.buf[self.cursor] = byte;
        Ok(1)
    }

    /// Prepends a one-byte tag.
    pub fn prepend_tag(&mut self, tag: u8) -> crate::error::Result<usize> {
        self.prepend_byte(tag)
    }

    /// Prepends `len` encoded in DER definite form.
    pub fn prepend_length(&mut self, len: usize) -> crate::error::Result<usize> {
        if len <= 0x7F {
            self.prepend_byte(len as u8)
        } else {
            let mut octets = Vec::new();
            let mut n = len;
            while n > 0 {
                octets.push((n & 0xFF) as u8);
                n >>= 8;
            }
            octets.reverse();
            let mut written = self.prepend_bytes(&octets)?;
            written += self.prepend_byte(0x80 | octets.len() as u8)?;
            Ok(written)
        }
    }

    /// Prepends `tag`/`len` around content already written; the combined
    /// length of `tag + length-octets` is returned so callers can add it
    /// to a running total.
    fn prepend_tlv_header(&mut self, tag: u8, content_len: usize) -> crate::error::Result<usize> {
        let mut written = self.prepend_length(content_len)?;
        written += self.prepend_tag(tag)?;
        Ok(written)
    }

    /// Wraps the most-recently-written `content_len` bytes in `tag` +
    /// length, returning the new total length of tag + length + content.
    pub fn wrap(&mut self, tag: u8, content_len: usize) -> crate::error::Result<usize> {
        Ok(content_len + self.prepend_tlv_header(tag, content_len)?)
    }

    /// `BOOLEAN`.
    pub fn write_bool(&mut self, value: bool) -> crate::error::Result<usize> {
        let mut len = self.prepend_byte(if value { 0xFF } else { 0x00 })?;
        len += self.prepend_tlv_header(tag::BOOLEAN, 1)?;
        Ok(len)
    }

    /// `INTEGER` holding a non-negative `i64`, minimally encoded with a
    /// leading `0x00` inserted only when the top bit of the first byte
    /// would otherwise be set (so the value doesn't decode as negative).
    pub fn write_int(&mut self, value: i64) -> crate::error::Result<usize> {
        debug_assert!(value >= 0, "write_int only encodes non-negative values");
        let mut be = value.to_be_bytes().to_vec();
        while be.len() > 1 && be[0] == 0 && be[1] < 0x80 {
            be.remove(0);
        }
        if be[0] & 0x80 != 0 {
            be.insert(0, 0);
        }
        let mut len = self.prepend_bytes(&be)?;
        len += self.prepend_tlv_header(tag::INTEGER, be.len())?;
        Ok(len)
    }

    /// `INTEGER` holding a [`BigUint`] magnitude, same leading-zero rule
    /// as [`Self::write_int`].
    pub fn write_big_uint(&mut self, value: &BigUint) -> crate::error::Result<usize> {
        let mut be = value.to_bytes_be();
        if be.is_empty() {
            be.push(0);
        }
        if be[0] & 0x80 != 0 {
            be.insert(0, 0);
        }
        let mut len = self.prepend_bytes(&be)?;
        len += self.prepend_tlv_header(tag::INTEGER, be.len())?;
        Ok(len)
    }

    /// `OCTET STRING`.
    pub fn write_octet_string(&mut self, value: &[u8]) -> crate::error::Result<usize> {
        let mut len = self.prepend_bytes(value)?;
        len += self.prepend_tlv_header(tag::OCTET_STRING, value.len())?;
        Ok(len)
    }

    /// Raw DER-encoded `OBJECT IDENTIFIER` content (caller supplies the
    /// already base-128-encoded arc bytes).
    pub fn write_oid(&mut self, oid_bytes: &[u8]) -> crate::error::Result<usize> {
        let mut len = self.prepend_bytes(oid_bytes)?;
        len += self.prepend_tlv_header(tag::OID, oid_bytes.len())?;
        Ok(len)
    }

    /// `IA5String`.
    pub fn write_ia5_string(&mut self, value: &str) -> crate::error::Result<usize> {
        let mut len = self.prepend_bytes(value.as_bytes())?;
        len += self.prepend_tlv_header(tag::IA5_STRING, value.len())?;
        Ok(len)
    }

    /// `PrintableString`.
    pub fn write_printable_string(&mut self, value: &str) -> crate::error::Result<usize> {
        let mut len = self.prepend_bytes(value.as_bytes())?;
        len += self.prepend_tlv_header(tag::PRINTABLE_STRING, value.len())?;
        Ok(len)
    }

    /// `BIT STRING`: `bits` holds `bit_count` meaningful bits, the rest
    /// of its last byte padded with zero. Prepends the DER "unused bits"
    /// octet (`(8 - bit_count % 8) % 8`) ahead of the raw bit buffer.
    pub fn write_bit_string(&mut self, bits: &[u8], bit_count: usize) -> crate::error::Result<usize> {
        let unused_bits = ((8 - bit_count % 8) % 8) as u8;
        let mut len = self.prepend_bytes(bits)?;
        len += self.prepend_byte(unused_bits)?;
        len += self.prepend_tlv_header(tag::BIT_STRING, len)?;
        Ok(len)
    }

    /// `UTCTime` or `GeneralizedTime`, raw ASCII digits supplied by the
    /// caller (see [`crate::time`] for the chooser between the two).
    pub fn write_time(&mut self, tag_byte: u8, ascii: &[u8]) -> crate::error::Result<usize> {
        let mut len = self.prepend_bytes(ascii)?;
        len += self.prepend_tlv_header(tag_byte, ascii.len())?;
        Ok(len)
    }

    /// `AlgorithmIdentifier ::= SEQUENCE { algorithm OID, parameters NULL }`.
    /// The NULL parameters field is mandatory for every OID this crate
    /// emits (RSA encryption and the RSA signature algorithms).
    pub fn write_algorithm_identifier(&mut self, oid_bytes: &[u8]) -> crate::error::Result<usize> {
        let mut len = self.prepend_tlv_header(tag::NULL, 0)?;
        len += self.write_oid(oid_bytes)?;
        self.wrap(tag::SEQUENCE, len)
    }
}
