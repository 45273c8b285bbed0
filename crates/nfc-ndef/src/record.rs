use winnow::Parser as _;

use crate::{
    ByteBuffer, NdefError, Result,
    header::{RecordFlags, SHORT_RECORD_MAX},
    ndef_type::Tnf,
    parser::{
        ParsedRecord, parse_ndef_record,
        stream::{self, StreamExt as _},
    },
};

/// A single NDEF record
///
/// Owns its type, id and payload. The short record and id length flags are derived
/// from the content when encoding, only the message begin, message end and chunk
/// flags are stored
#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Record)]
pub struct NdefRecord {
    tnf: Tnf,
    message_begin: bool,
    message_end: bool,
    chunked: bool,
    type_: ByteBuffer,
    id: Option<ByteBuffer>,
    payload: ByteBuffer,
}

impl NdefRecord {
    /// Build a lone record, flagged as both the beginning and the end of a message
    pub fn new(
        tnf: Tnf,
        type_: impl Into<ByteBuffer>,
        id: Option<ByteBuffer>,
        payload: impl Into<ByteBuffer>,
    ) -> Result<Self> {
        let record = Self {
            tnf,
            message_begin: true,
            message_end: true,
            chunked: false,
            type_: type_.into(),
            id,
            payload: payload.into(),
        };

        if tnf == Tnf::Unchanged {
            return Err(NdefError::param("unchanged TNF is only valid for chunk continuations"));
        }

        record.check()?;
        Ok(record)
    }

    /// The canonical empty record, `0xD0 0x00 0x00` on the wire
    pub fn empty() -> Self {
        Self {
            tnf: Tnf::Empty,
            message_begin: true,
            message_end: true,
            chunked: false,
            type_: ByteBuffer::new(),
            id: None,
            payload: ByteBuffer::new(),
        }
    }

    pub fn well_known(type_: &[u8], payload: impl Into<ByteBuffer>) -> Result<Self> {
        Self::new(Tnf::WellKnown, type_, None, payload)
    }

    pub fn mime(mime_type: &str, payload: impl Into<ByteBuffer>) -> Result<Self> {
        Self::new(Tnf::Mime, mime_type, None, payload)
    }

    pub fn external(type_: &str, payload: impl Into<ByteBuffer>) -> Result<Self> {
        Self::new(Tnf::External, type_, None, payload)
    }

    pub fn absolute_uri(uri: &str) -> Result<Self> {
        Self::new(Tnf::AbsoluteUri, uri, None, ByteBuffer::new())
    }

    /// A chunk of a record split across several wire records
    ///
    /// Only the first chunk carries the TNF, type and id, the rest are [`Tnf::Unchanged`]
    pub(crate) fn chunk(
        tnf: Tnf,
        type_: ByteBuffer,
        id: Option<ByteBuffer>,
        payload: impl Into<ByteBuffer>,
        chunked: bool,
    ) -> Self {
        Self {
            tnf,
            message_begin: false,
            message_end: false,
            chunked,
            type_,
            id,
            payload: payload.into(),
        }
    }

    // MARK: accessors

    pub fn tnf(&self) -> Tnf {
        self.tnf
    }

    pub fn type_(&self) -> &[u8] {
        &self.type_
    }

    /// The id field, `None` when the record has no id length field at all
    pub fn id(&self) -> Option<&[u8]> {
        self.id.as_deref()
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn flags(&self) -> RecordFlags {
        RecordFlags {
            message_begin: self.message_begin,
            message_end: self.message_end,
            chunked: self.chunked,
            short_record: self.payload.len() <= SHORT_RECORD_MAX,
            has_id_length: self.id.is_some(),
        }
    }

    pub fn is_type(&self, tnf: Tnf, type_: &[u8]) -> bool {
        self.tnf == tnf && self.type_.get() == type_
    }

    pub fn set_payload(&mut self, payload: &[u8]) -> Result<()> {
        if self.tnf == Tnf::Empty && !payload.is_empty() {
            return Err(NdefError::param("empty records can not carry a payload"));
        }

        if u32::try_from(payload.len()).is_err() {
            return Err(NdefError::param("payload is longer than 2^32 - 1 bytes"));
        }

        self.payload.set(payload);
        Ok(())
    }

    pub fn set_id(&mut self, id: Option<&[u8]>) -> Result<()> {
        if self.tnf == Tnf::Empty && id.is_some_and(|id| !id.is_empty()) {
            return Err(NdefError::param("empty records can not carry an id"));
        }

        if id.is_some_and(|id| id.len() > u8::MAX as usize) {
            return Err(NdefError::param("id is longer than 255 bytes"));
        }

        self.id = id.map(ByteBuffer::from_slice);
        Ok(())
    }

    pub(crate) fn set_message_flags(&mut self, message_begin: bool, message_end: bool) {
        self.message_begin = message_begin;
        self.message_end = message_end;
    }

    pub fn into_parts(self) -> (Tnf, ByteBuffer, Option<ByteBuffer>, ByteBuffer) {
        (self.tnf, self.type_, self.id, self.payload)
    }

    /// Deep copy with an independent lifetime
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    // MARK: encoding

    /// Number of bytes [`NdefRecord::encode`] produces
    pub fn encoded_len(&self) -> usize {
        let flags = self.flags();
        let payload_length_width = if flags.short_record { 1 } else { 4 };
        let id_length = self.id.as_ref().map(|id| 1 + id.len()).unwrap_or(0);

        2 + payload_length_width + id_length + self.type_.len() + self.payload.len()
    }

    /// Encode after checking the record, for records that did not come through a constructor
    pub fn try_encode(&self) -> Result<Vec<u8>> {
        self.check()?;
        Ok(self.encode())
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut out);
        out
    }

    /// Append the wire form: header, type length, payload length, id length, type, id, payload
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        self.encode_framed(out, self.message_begin, self.message_end);
    }

    /// Encode with the message begin and end flags supplied by the enclosing message
    pub(crate) fn encode_framed(&self, out: &mut Vec<u8>, message_begin: bool, message_end: bool) {
        let flags = RecordFlags {
            message_begin,
            message_end,
            ..self.flags()
        };

        out.push(flags.to_byte(self.tnf.bits()));
        out.push(self.type_.len() as u8);

        if flags.short_record {
            out.push(self.payload.len() as u8);
        } else {
            out.extend_from_slice(&(self.payload.len() as u32).to_be_bytes());
        }

        if let Some(id) = &self.id {
            out.push(id.len() as u8);
        }

        out.extend_from_slice(&self.type_);
        if let Some(id) = &self.id {
            out.extend_from_slice(id);
        }
        out.extend_from_slice(&self.payload);
    }

    // MARK: decoding

    /// Decode exactly one record, the buffer must not contain anything after it
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let (record, consumed) = Self::decode_prefix(bytes)?;

        if consumed != bytes.len() {
            return Err(NdefError::format(format!(
                "{} trailing byte(s) after record",
                bytes.len() - consumed
            )));
        }

        Ok(record)
    }

    /// Decode the record at the start of `bytes`, returning it and the bytes it occupied
    pub fn decode_prefix(bytes: &[u8]) -> Result<(Self, usize)> {
        let mut input = stream::new(bytes);
        let parsed = parse_ndef_record
            .parse_next(&mut input)
            .map_err(|error| NdefError::from_parser(error, "record"))?;

        let consumed = bytes.len() - input.remaining();
        let record = Self::try_from(parsed)?;

        Ok((record, consumed))
    }

    /// [`NdefRecord::validate`] for caller supplied records, failures are [`NdefError::InvalidParam`]
    pub(crate) fn check(&self) -> Result<()> {
        self.validate().map_err(|error| match error {
            NdefError::InvalidFormat(reason) => NdefError::InvalidParam(reason),
            other => other,
        })
    }

    /// Check the TNF rules for the type, id and payload fields
    pub(crate) fn validate(&self) -> Result<()> {
        if self.type_.len() > u8::MAX as usize {
            return Err(NdefError::format("type is longer than 255 bytes"));
        }

        if self.id.as_ref().is_some_and(|id| id.len() > u8::MAX as usize) {
            return Err(NdefError::format("id is longer than 255 bytes"));
        }

        if u32::try_from(self.payload.len()).is_err() {
            return Err(NdefError::format("payload is longer than 2^32 - 1 bytes"));
        }

        match self.tnf {
            Tnf::Empty => {
                let has_id = self.id.as_ref().is_some_and(|id| !id.is_empty());
                if !self.type_.is_empty() || has_id || !self.payload.is_empty() {
                    return Err(NdefError::format(
                        "empty record must have zero length type, id and payload",
                    ));
                }
            }

            Tnf::Unknown | Tnf::Unchanged => {
                if !self.type_.is_empty() {
                    return Err(NdefError::format(format!(
                        "{} record must have a zero length type",
                        self.tnf
                    )));
                }
            }

            tnf if tnf.requires_type() && self.type_.is_empty() => {
                return Err(NdefError::format(format!("{tnf} record is missing its type")));
            }

            _ => {}
        }

        Ok(())
    }
}

impl TryFrom<ParsedRecord<'_>> for NdefRecord {
    type Error = NdefError;

    fn try_from(parsed: ParsedRecord<'_>) -> Result<Self> {
        let tnf = Tnf::try_from(parsed.header.type_name_format)?;
        let flags = parsed.header.flags;

        let record = Self {
            tnf,
            message_begin: flags.message_begin,
            message_end: flags.message_end,
            chunked: flags.chunked,
            type_: ByteBuffer::from_slice(parsed.type_),
            id: parsed.id.map(ByteBuffer::from_slice),
            payload: ByteBuffer::from_slice(parsed.payload),
        };

        record.validate()?;
        Ok(record)
    }
}
