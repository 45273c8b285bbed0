//! NFC Data Exchange Format toolkit
//!
//! Bundles the NDEF codec and the CRC utility into one library, which is also the
//! library the mobile bindings are generated from

pub mod logging;

pub use nfc_crc as crc;
pub use nfc_ndef as ndef;

pub use nfc_crc::{CrcVariant, TagFamily, compute_crc, verify_crc};
pub use nfc_ndef::{
    NdefError, NdefMessage, NdefPayload, NdefRecord, ParseOptions, ReaderConfig, TagReader, Tnf,
};

uniffi::setup_scaffolding!();

/// Install the default log subscriber, see [`logging::init`]
#[uniffi::export]
fn init_logging() {
    logging::init();
}
