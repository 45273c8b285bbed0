//! NDEF (NFC Data Exchange Format) record and message codec.
//!
//! Records are built with [`NdefRecord`] or one of the well-known builders in
//! [`well_known`], grouped into an [`NdefMessage`] and serialized to the wire
//! format. Received bytes go the other way through [`NdefMessage::deserialize`],
//! which also reassembles chunked records.

uniffi::setup_scaffolding!();

pub mod buffer;
pub mod describe;
pub mod error;
pub mod ffi;
pub mod header;
pub mod message;
pub mod ndef_type;
pub mod options;
pub mod parser;
pub mod payload;
pub mod reader;
pub mod record;
pub mod resume;
pub mod tlv;
pub mod well_known;

pub use buffer::ByteBuffer;
pub use error::NdefError;
pub use header::RecordFlags;
pub use message::NdefMessage;
pub use ndef_type::Tnf;
pub use options::{ParseOptions, ReaderConfig};
pub use payload::NdefPayload;
pub use reader::{MessageInfo, ReadResult, ReaderError, TagReader};
pub use record::NdefRecord;
pub use resume::ResumeError;

pub use well_known::{
    signature::{
        CertificateFormat, SignatureRecord, SignatureType, create_signature_record,
        parse_signature_record,
    },
    smart_poster::{
        SmartPoster, SmartPosterAction, create_smart_poster_record, get_smart_poster_title_record,
        get_smart_poster_uri_record, parse_smart_poster,
    },
    text::{TextEncoding, TextRecord, create_text_record, extract_text},
    uri::{UriAbbreviation, UriRecord, create_uri_record, parse_uri_record, resolve_uri},
};

pub type Result<T, E = NdefError> = std::result::Result<T, E>;

/// Number of blocks read at a time from the NFC chip
pub const NUMBER_OF_BLOCKS_PER_CHUNK: u16 = 32;

/// Number of bytes per block read from the NFC chip
pub const BYTES_PER_BLOCK: u16 = 4;
