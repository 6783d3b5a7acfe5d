//! The name builder: parses a comma-separated `TAG=value` subject
//! string into a [`DistinguishedName`] and emits its `RDNSequence`
//! encoding.

use crate::error::{BadInputSnafu, Result, UnknownOidSnafu};
use crate::oid::{self, Oid};
use crate::writer::{tag, ReverseWriter};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use snafu::{ensure, OptionExt};

/// One `(OID, text value)` pair inside a relative distinguished name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    oid: Oid,
    value: String,
}

/// An ordered sequence of [`Attribute`]s, in emission order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    attrs: Vec<Attribute>,
}

fn oid_for_tag(tag: &str) -> Result<Oid> {
    match tag {
        "CN" => Ok(oid::attribute::COMMON_NAME),
        "C" => Ok(oid::attribute::COUNTRY_NAME),
        "O" => Ok(oid::attribute::ORGANIZATION_NAME),
        "OU" => Ok(oid::attribute::ORGANIZATIONAL_UNIT_NAME),
        "L" => Ok(oid::attribute::LOCALITY_NAME),
        "ST" => Ok(oid::attribute::STATE_OR_PROVINCE_NAME),
        "R" => Ok(oid::attribute::EMAIL_ADDRESS),
        other => UnknownOidSnafu {
            tag: other.to_string(),
        }
        .fail(),
    }
}

impl DistinguishedName {
    /// Parses `TAG=VALUE(,TAG=VALUE)*`.
    ///
    /// Splits on `,` first and `=` second, rather than mirroring the
    /// original C scanner's pointer/length-sentinel comparison (flagged
    /// in the spec's Design Notes as brittle): this always captures the
    /// final attribute whether or not the input has a trailing comma,
    /// and an empty trailing segment (input ending in a bare comma) is
    /// rejected outright instead of silently accepted.
    pub fn parse(input: &str) -> Result<Self> {
        let mut attrs = Vec::new();
        for segment in input.split(',') {
            ensure!(
                !segment.is_empty(),
                BadInputSnafu {
                    detail: "empty attribute segment in subject name".to_string(),
                }
            );
            let (tag, value) = segment.split_once('=').context(BadInputSnafu {
                detail: alloc::format!("missing '=' in subject name segment {segment:?}"),
            })?;
            let oid = oid_for_tag(tag)?;
            ensure!(
                value.is_ascii() && value.len() <= 127,
                BadInputSnafu {
                    detail: alloc::format!("attribute value {value:?} is not ASCII or exceeds 127 bytes"),
                }
            );
            // Prepended, not appended: the first token parsed ends up at
            // index `len - 1`. Combined with `write` iterating forward
            // (see below), the final encoded RDNSequence preserves the
            // caller's left-to-right order.
            attrs.insert(
                0,
                Attribute {
                    oid,
                    value: value.to_string(),
                },
            );
        }
        Ok(Self { attrs })
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// `RDNSequence`: `SEQUENCE OF SET OF { SEQUENCE { OID, value } }`.
    pub(crate) fn write(&self, w: &mut ReverseWriter) -> Result<usize> {
        let mut len = 0;
        for attr in &self.attrs {
            len += write_attribute(w, attr)?;
        }
        w.wrap(tag::SEQUENCE, len)
    }
}

fn write_attribute(w: &mut ReverseWriter, attr: &Attribute) -> Result<usize> {
    let mut len = if attr.oid == oid::attribute::EMAIL_ADDRESS {
        w.write_ia5_string(&attr.value)?
    } else {
        w.write_printable_string(&attr.value)?
    };
    len += w.write_oid(attr.oid)?;
    let seq_len = w.wrap(tag::SEQUENCE, len)?;
    w.wrap(tag::SET, seq_len)
}
