//! Incremental reader for a tag read a chunk of blocks at a time

use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use winnow::{Parser as _, error::ErrMode};
use zeroize::Zeroize as _;

use crate::{
    NdefMessage, ReaderConfig,
    parser::stream::{self, StreamExt as _},
    resume::ResumeError,
    tlv::parse_ndef_tlv_header,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum ReaderError {
    #[error("not enough data to find the NDEF message TLV, read a larger first chunk")]
    NotEnoughData,

    #[error("tag memory holds no NDEF message")]
    NoMessage,

    #[error("error parsing the TLV area: {0}")]
    InvalidTlv(String),

    #[error("error parsing the NDEF message: {0}")]
    InvalidMessage(String),

    #[error("trying to parse a message that has already been parsed")]
    AlreadyParsed,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, uniffi::Record)]
pub struct MessageInfo {
    /// Length of the NDEF message, as reported by its TLV
    pub message_length: u16,

    /// Offset of the first message byte, header and TLV header included
    pub message_offset: u32,

    /// Tag memory that has to be read to hold the whole message
    pub full_message_length: u32,
}

impl MessageInfo {
    pub fn new(message_offset: u32, message_length: u16) -> Self {
        Self {
            message_length,
            message_offset,
            full_message_length: message_offset + message_length as u32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum ReadResult {
    /// The whole message has been read and decoded
    Complete(MessageInfo, NdefMessage),

    /// More tag memory is needed, at least `needed` bytes
    Incomplete { message_info: MessageInfo, needed: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum ReaderState {
    #[default]
    NotStarted,
    Parsing(ParsingContext),
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ParsingContext {
    message_info: MessageInfo,
    first_chunk_hash: Option<String>,
}

/// Collects tag memory chunk by chunk until the NDEF message it holds is complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagReader {
    config: ReaderConfig,
    state: ReaderState,
    buffer: Vec<u8>,
}

impl Default for TagReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TagReader {
    pub fn new() -> Self {
        Self::with_config(ReaderConfig::default())
    }

    pub fn with_config(config: ReaderConfig) -> Self {
        Self {
            config,
            state: ReaderState::default(),
            buffer: Vec::new(),
        }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Add the next chunk of tag memory, starting from the first byte of the tag
    ///
    /// The first chunk has to reach past the TLV header, otherwise it is dropped
    /// with [`ReaderError::NotEnoughData`]
    pub fn parse(&mut self, data: &[u8]) -> Result<ReadResult, ReaderError> {
        match &self.state {
            ReaderState::NotStarted => {
                let message_info = self.parse_message_info(data)?;
                debug!(?message_info, "found NDEF message TLV");

                self.state = ReaderState::Parsing(ParsingContext {
                    message_info,
                    first_chunk_hash: first_chunk_hash(data, self.config.bytes_per_chunk()),
                });

                self.buffer.extend_from_slice(data);
                self.parse_incomplete()
            }

            ReaderState::Parsing(_) => {
                self.buffer.extend_from_slice(data);
                self.parse_incomplete()
            }

            ReaderState::Complete => Err(ReaderError::AlreadyParsed),
        }
    }

    fn parse_message_info(&self, data: &[u8]) -> Result<MessageInfo, ReaderError> {
        let header_length = self.config.header_length as usize;
        let Some(tlv_area) = data.get(header_length..) else {
            return Err(ReaderError::NotEnoughData);
        };

        let mut input = stream::new(tlv_area);
        let length = match parse_ndef_tlv_header.parse_next(&mut input) {
            Ok(Some(0)) | Ok(None) => return Err(ReaderError::NoMessage),
            Ok(Some(length)) => length,
            Err(ErrMode::Incomplete(_)) => return Err(ReaderError::NotEnoughData),
            Err(error) => return Err(ReaderError::InvalidTlv(error.to_string())),
        };

        let offset = data.len() - input.remaining();
        Ok(MessageInfo::new(offset as u32, length))
    }

    fn parse_incomplete(&mut self) -> Result<ReadResult, ReaderError> {
        let ReaderState::Parsing(parsing) = &self.state else {
            return Err(ReaderError::AlreadyParsed);
        };

        let message_info = parsing.message_info;
        let full_length = message_info.full_message_length as usize;

        // need more data to parse the message
        if self.buffer.len() < full_length {
            let needed = (full_length - self.buffer.len()) as u32;
            debug!(needed, "not enough data to parse message, continuing");

            return Ok(ReadResult::Incomplete {
                message_info,
                needed,
            });
        }

        debug!("enough data to parse message, trying to parse");

        let start = message_info.message_offset as usize;
        let message = match NdefMessage::deserialize_with(
            &self.buffer[start..full_length],
            self.config.parse_options,
        ) {
            Ok(message) => message,
            Err(error) => {
                warn!(%error, "unable to parse message, resetting reader");
                self.reset();
                return Err(ReaderError::InvalidMessage(error.to_string()));
            }
        };

        self.buffer.zeroize();
        self.state = ReaderState::Complete;

        Ok(ReadResult::Complete(message_info, message))
    }

    /// Check that a re-read first chunk comes from the tag that is being read
    pub fn is_resumeable(&self, data: &[u8]) -> Result<(), ResumeError> {
        let expected_bytes = self.config.bytes_per_chunk();

        if data.len() < expected_bytes {
            return Err(ResumeError::BlockSizeMismatch {
                expected: expected_bytes as u32,
                actual: data.len() as u32,
            });
        }

        let parsing = match &self.state {
            ReaderState::Parsing(parsing) => parsing,
            ReaderState::Complete => return Err(ResumeError::AlreadyParsed),
            ReaderState::NotStarted => {
                warn!("resuming on a message that has not been parsed, starting from the beginning");
                return Ok(());
            }
        };

        let Some(first_chunk_hash) = first_chunk_hash(data, expected_bytes) else {
            return Err(ResumeError::UnableToGetFirstChunkHash);
        };

        let Some(existing_hash) = &parsing.first_chunk_hash else {
            return Err(ResumeError::UnableToGetFirstChunkHash);
        };

        // scanning a different tag
        if &first_chunk_hash != existing_hash {
            return Err(ResumeError::ChunksDoNotMatch);
        }

        Ok(())
    }

    pub fn is_started(&self) -> bool {
        matches!(self.state, ReaderState::Parsing(_))
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, ReaderState::Complete)
    }

    /// Get the message info, once the TLV header has been read
    pub fn message_info(&self) -> Option<&MessageInfo> {
        match &self.state {
            ReaderState::Parsing(parsing) => Some(&parsing.message_info),
            ReaderState::Complete | ReaderState::NotStarted => None,
        }
    }

    /// Drop everything read so far
    pub fn reset(&mut self) {
        self.buffer.zeroize();
        self.state = ReaderState::NotStarted;
    }
}

fn first_chunk_hash(data: &[u8], chunk_length: usize) -> Option<String> {
    let chunk = data.get(..chunk_length)?;

    let mut sha256 = Sha256::new();
    sha256.update(chunk);
    let hash = sha256.finalize();

    Some(hex::encode(hash))
}
