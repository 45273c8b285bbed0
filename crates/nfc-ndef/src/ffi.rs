use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    NdefError, NdefMessage, NdefPayload, NdefRecord, ReaderConfig, Tnf,
    payload,
    reader::{MessageInfo, ReadResult, ReaderError, TagReader},
    resume::ResumeError,
    tlv,
    well_known::{
        signature::{self, SignatureRecord},
        smart_poster::{self, SmartPoster, SmartPosterAction},
        text::{self, TextEncoding, TextRecord},
        uri::{self, UriAbbreviation, UriRecord},
    },
};

type Result<T, E = NdefError> = std::result::Result<T, E>;

#[derive(Debug, Clone, uniffi::Object)]
pub struct FfiTagReader(Arc<Mutex<TagReader>>);

impl Default for FfiTagReader {
    fn default() -> Self {
        Self::new()
    }
}

#[uniffi::export]
impl FfiTagReader {
    #[uniffi::constructor]
    pub fn new() -> Self {
        Self::with_config(ReaderConfig::default())
    }

    #[uniffi::constructor]
    pub fn with_config(config: ReaderConfig) -> Self {
        let reader = TagReader::with_config(config);
        Self(Arc::new(Mutex::new(reader)))
    }

    #[uniffi::method]
    pub fn parse(&self, data: Vec<u8>) -> Result<ReadResult, ReaderError> {
        self.0.lock().parse(&data)
    }

    #[uniffi::method]
    pub fn is_resumeable(&self, data: Vec<u8>) -> Result<(), ResumeError> {
        self.0.lock().is_resumeable(&data)
    }

    #[uniffi::method]
    pub fn is_started(&self) -> bool {
        self.0.lock().is_started()
    }

    #[uniffi::method]
    pub fn message_info(&self) -> Option<MessageInfo> {
        self.0.lock().message_info().copied()
    }

    #[uniffi::method]
    pub fn reset(&self) {
        self.0.lock().reset();
    }

    #[uniffi::method]
    pub fn string_from_record(&self, record: NdefRecord) -> Option<String> {
        NdefPayload::from_record(&record).as_string()
    }

    #[uniffi::method]
    pub fn data_from_records(&self, records: Vec<NdefRecord>) -> Vec<u8> {
        payload::data_from_records(&records)
    }
}

#[derive(Debug, Clone, uniffi::Object)]
pub struct NfcConst {
    config: ReaderConfig,
}

impl Default for NfcConst {
    fn default() -> Self {
        Self::new()
    }
}

#[uniffi::export]
impl NfcConst {
    #[uniffi::constructor]
    pub fn new() -> Self {
        Self {
            config: ReaderConfig::default(),
        }
    }

    pub fn number_of_blocks_per_chunk(&self) -> u16 {
        self.config.blocks_per_chunk
    }

    pub fn bytes_per_block(&self) -> u16 {
        self.config.bytes_per_block
    }

    pub fn total_bytes_per_chunk(&self) -> u16 {
        self.number_of_blocks_per_chunk() * self.bytes_per_block()
    }

    pub fn reader_config(&self) -> ReaderConfig {
        self.config
    }
}

// MARK: records and messages

#[uniffi::export]
fn ndef_record_new(
    tnf: Tnf,
    type_: Vec<u8>,
    id: Option<Vec<u8>>,
    payload: Vec<u8>,
) -> Result<NdefRecord> {
    NdefRecord::new(tnf, type_, id.map(Into::into), payload)
}

#[uniffi::export]
fn ndef_record_encode(record: NdefRecord) -> Result<Vec<u8>> {
    record.try_encode()
}

#[uniffi::export]
fn ndef_record_decode(bytes: Vec<u8>) -> Result<NdefRecord> {
    NdefRecord::decode(&bytes)
}

#[uniffi::export]
fn ndef_message_new(records: Vec<NdefRecord>) -> Result<NdefMessage> {
    NdefMessage::new(records)
}

#[uniffi::export]
fn ndef_message_serialize(message: NdefMessage) -> Result<Vec<u8>> {
    message.serialize()
}

#[uniffi::export]
fn ndef_message_deserialize(bytes: Vec<u8>) -> Result<NdefMessage> {
    NdefMessage::deserialize(&bytes)
}

#[uniffi::export]
fn ndef_message_describe(message: NdefMessage) -> String {
    message.to_string()
}

#[uniffi::export]
fn ndef_payload_from_record(record: NdefRecord) -> NdefPayload {
    NdefPayload::from_record(&record)
}

// MARK: well-known records

#[uniffi::export]
fn create_text_record(
    text: String,
    language: String,
    encoding: TextEncoding,
) -> Result<NdefRecord> {
    text::create_text_record(&text, &language, encoding)
}

#[uniffi::export]
fn extract_text(record: NdefRecord) -> Result<TextRecord> {
    text::extract_text(&record)
}

#[uniffi::export]
fn create_uri_record(uri: String, abbreviation: UriAbbreviation) -> Result<NdefRecord> {
    uri::create_uri_record(&uri, abbreviation)
}

#[uniffi::export]
fn parse_uri_record(record: NdefRecord) -> Result<UriRecord> {
    uri::parse_uri_record(&record)
}

#[uniffi::export]
fn create_smart_poster_record(
    uri: String,
    titles: Vec<TextRecord>,
    action: Option<SmartPosterAction>,
) -> Result<NdefRecord> {
    smart_poster::create_smart_poster_record(&uri, &titles, action)
}

#[uniffi::export]
fn parse_smart_poster(record: NdefRecord) -> Result<SmartPoster> {
    smart_poster::parse_smart_poster(&record)
}

#[uniffi::export]
fn create_signature_record(signature: SignatureRecord) -> Result<NdefRecord> {
    signature::create_signature_record(&signature)
}

#[uniffi::export]
fn parse_signature_record(record: NdefRecord) -> Result<SignatureRecord> {
    signature::parse_signature_record(&record)
}

// MARK: tag memory

#[uniffi::export]
fn encode_ndef_tlv(message: Vec<u8>) -> Result<Vec<u8>> {
    tlv::encode_ndef_tlv(&message)
}

#[uniffi::export]
fn find_ndef_message(memory: Vec<u8>) -> Result<Vec<u8>> {
    tlv::find_ndef_message(&memory).map(<[u8]>::to_vec)
}
