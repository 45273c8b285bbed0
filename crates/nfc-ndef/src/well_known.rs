//! NFC Forum well-known record types (TNF `0x01`)

pub mod signature;
pub mod smart_poster;
pub mod text;
pub mod uri;

use crate::{NdefError, NdefRecord, Result, ndef_type::Tnf};

pub const TEXT: &[u8] = b"T";
pub const URI: &[u8] = b"U";
pub const SMART_POSTER: &[u8] = b"Sp";
pub const SIGNATURE: &[u8] = b"Sig";

/// Record types that only appear inside a smart poster
pub const ACTION: &[u8] = b"act";
pub const SIZE: &[u8] = b"s";
pub const TYPE: &[u8] = b"t";

/// Fail with [`NdefError::NotExpectedType`] unless `record` is the well-known type `expected`
pub(crate) fn expect_type(record: &NdefRecord, expected: &[u8]) -> Result<()> {
    if record.is_type(Tnf::WellKnown, expected) {
        return Ok(());
    }

    Err(NdefError::not_expected_type(expected, record.type_()))
}
