use crate::{BYTES_PER_BLOCK, NUMBER_OF_BLOCKS_PER_CHUNK};

/// Default cap on a single (reassembled) record payload, 16 MiB
pub const DEFAULT_MAX_PAYLOAD_LENGTH: u64 = 16 * 1024 * 1024;

/// Limits and leniency knobs for [`crate::NdefMessage::deserialize_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Record)]
pub struct ParseOptions {
    /// Largest payload accepted for one logical record, after chunk reassembly
    pub max_payload_length: u64,

    /// Accept bytes after the record flagged as message end, instead of failing
    pub allow_trailing_bytes: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_payload_length: DEFAULT_MAX_PAYLOAD_LENGTH,
            allow_trailing_bytes: false,
        }
    }
}

/// How tag memory is handed to a [`crate::TagReader`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Record)]
pub struct ReaderConfig {
    pub bytes_per_block: u16,
    pub blocks_per_chunk: u16,

    /// Bytes in front of the TLV area, for example a tag's capability container
    pub header_length: u16,

    pub parse_options: ParseOptions,
}

impl ReaderConfig {
    pub fn bytes_per_chunk(&self) -> usize {
        self.bytes_per_block as usize * self.blocks_per_chunk as usize
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            bytes_per_block: BYTES_PER_BLOCK,
            blocks_per_chunk: NUMBER_OF_BLOCKS_PER_CHUNK,
            header_length: 0,
            parse_options: ParseOptions::default(),
        }
    }
}
