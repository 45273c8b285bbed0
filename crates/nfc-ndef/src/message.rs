use tracing::{debug, trace};
use winnow::Parser as _;

use crate::{
    ByteBuffer, NdefError, ParseOptions, Result,
    ndef_type::Tnf,
    parser::{
        parse_ndef_record,
        stream::{self, StreamExt as _},
    },
    record::NdefRecord,
};

/// An NDEF message, a non-empty ordered sequence of records
#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Record)]
pub struct NdefMessage {
    records: Vec<NdefRecord>,
}

impl NdefMessage {
    /// Message begin goes on the first record and message end on the last, whatever
    /// the records carried
    pub fn new(records: Vec<NdefRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(NdefError::param("a message needs at least one record"));
        }

        let mut message = Self { records };
        message.frame_records();
        Ok(message)
    }

    /// Message holding a single empty record, what a blank tag is formatted with
    pub fn empty() -> Self {
        Self::from(NdefRecord::empty())
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn record(&self, index: usize) -> Result<&NdefRecord> {
        self.records.get(index).ok_or_else(|| {
            NdefError::param(format!(
                "record index {index} out of range, message has {} record(s)",
                self.records.len()
            ))
        })
    }

    pub fn records(&self) -> &[NdefRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NdefRecord> {
        self.records.iter()
    }

    /// Append a record, it becomes the message end
    pub fn push(&mut self, record: NdefRecord) {
        self.records.push(record);
        self.frame_records();
    }

    pub fn into_records(self) -> Vec<NdefRecord> {
        self.records
    }

    /// First record with the given TNF and type
    pub fn find_by_type(&self, tnf: Tnf, type_: &[u8]) -> Option<&NdefRecord> {
        self.records.iter().find(|record| record.is_type(tnf, type_))
    }

    pub fn encoded_len(&self) -> usize {
        self.records.iter().map(NdefRecord::encoded_len).sum()
    }

    /// Encode every record in order
    ///
    /// Message begin is set on the first record only and message end on the last only,
    /// whatever the records carried. Records are written as given, pre-chunked runs
    /// included, nothing is chunked here
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let Some(last) = self.records.len().checked_sub(1) else {
            return Err(NdefError::param("a message needs at least one record"));
        };

        for record in &self.records {
            record.check()?;
        }
        self.validate_chunk_runs()?;

        let mut out = Vec::with_capacity(self.encoded_len());

        for (index, record) in self.records.iter().enumerate() {
            let message_begin = index == 0;
            let message_end = index == last;

            let flags = record.flags();
            if flags.message_begin != message_begin || flags.message_end != message_end {
                debug!("repairing message begin/end flags on record {index}");
            }

            record.encode_framed(&mut out, message_begin, message_end);
        }

        Ok(out)
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        Self::deserialize_with(bytes, ParseOptions::default())
    }

    /// Decode a complete message, reassembling chunked records
    pub fn deserialize_with(bytes: &[u8], options: ParseOptions) -> Result<Self> {
        let mut input = stream::new(bytes);
        let mut records = Vec::new();
        let mut state = ParseState::ExpectFirstRecord;

        while !matches!(state, ParseState::Done) {
            let offset = bytes.len() - input.remaining();
            if input.remaining() == 0 {
                return Err(NdefError::format(format!(
                    "message ended at byte {offset} without a record flagged as message end"
                )));
            }

            let parsed = parse_ndef_record
                .parse_next(&mut input)
                .map_err(|error| NdefError::from_parser(error, "record"))?;

            let record = NdefRecord::try_from(parsed)?;
            let flags = record.flags();
            trace!(offset, tnf = %record.tnf(), ?flags, "parsed record");

            let expect_first = matches!(state, ParseState::ExpectFirstRecord);
            if expect_first && !flags.message_begin {
                return Err(NdefError::format("first record is not flagged as message begin"));
            }
            if !expect_first && flags.message_begin {
                return Err(NdefError::format(format!(
                    "record at byte {offset} is flagged as message begin but is not the first"
                )));
            }

            state = match state {
                ParseState::ExpectFirstRecord | ParseState::MidMessage => {
                    if record.tnf() == Tnf::Unchanged {
                        return Err(NdefError::format(format!(
                            "record at byte {offset} has unchanged TNF outside a chunked record"
                        )));
                    }

                    if flags.chunked {
                        if flags.message_end {
                            return Err(NdefError::format(format!(
                                "chunk at byte {offset} is flagged as message end"
                            )));
                        }

                        let run = ChunkRun::start(record);
                        run.check_length(&options)?;
                        ParseState::InChunkRun(run)
                    } else {
                        check_payload_length(record.payload().len(), &options)?;
                        records.push(record);
                        ParseState::after_record(flags.message_end)
                    }
                }

                ParseState::InChunkRun(mut run) => {
                    if record.tnf() != Tnf::Unchanged
                        || !record.type_().is_empty()
                        || record.id().is_some()
                    {
                        return Err(NdefError::format(format!(
                            "chunk at byte {offset} must have unchanged TNF, no type and no id"
                        )));
                    }

                    if flags.chunked && flags.message_end {
                        return Err(NdefError::format(format!(
                            "chunk at byte {offset} is flagged as message end"
                        )));
                    }

                    run.extend(record.payload());
                    run.check_length(&options)?;

                    if flags.chunked {
                        ParseState::InChunkRun(run)
                    } else {
                        debug!(chunks = run.chunks, "reassembled chunked record");
                        records.push(run.finish(flags.message_end));
                        ParseState::after_record(flags.message_end)
                    }
                }

                ParseState::Done => ParseState::Done,
            };
        }

        let trailing = input.remaining();
        if trailing > 0 {
            if !options.allow_trailing_bytes {
                return Err(NdefError::format(format!(
                    "{trailing} trailing byte(s) after the message end record"
                )));
            }

            debug!("ignoring {trailing} trailing byte(s) after message end");
        }

        Self::new(records)
    }
}

/// Split a record into a pre-chunked run of at most `max_chunk_payload` bytes per chunk
///
/// Returns the record unchanged when its payload already fits
pub fn split_into_chunks(record: &NdefRecord, max_chunk_payload: usize) -> Result<Vec<NdefRecord>> {
    if max_chunk_payload == 0 {
        return Err(NdefError::param("chunk size must be at least one byte"));
    }

    if record.payload().len() <= max_chunk_payload {
        return Ok(vec![record.clone()]);
    }

    let chunks = record.payload().chunks(max_chunk_payload);
    let last = chunks.len() - 1;

    let records = chunks
        .enumerate()
        .map(|(index, chunk)| {
            let chunked = index != last;

            if index == 0 {
                let type_ = ByteBuffer::from_slice(record.type_());
                let id = record.id().map(ByteBuffer::from_slice);
                NdefRecord::chunk(record.tnf(), type_, id, chunk, chunked)
            } else {
                NdefRecord::chunk(Tnf::Unchanged, ByteBuffer::new(), None, chunk, chunked)
            }
        })
        .collect();

    Ok(records)
}

impl NdefMessage {
    fn frame_records(&mut self) {
        let last = self.records.len().saturating_sub(1);

        for (index, record) in self.records.iter_mut().enumerate() {
            record.set_message_flags(index == 0, index == last);
        }
    }

    fn validate_chunk_runs(&self) -> Result<()> {
        let mut in_run = false;

        for (index, record) in self.records.iter().enumerate() {
            let continuation = record.tnf() == Tnf::Unchanged;

            if in_run && (!continuation || !record.type_().is_empty() || record.id().is_some()) {
                return Err(NdefError::param(format!(
                    "record {index} continues a chunked record but is not an unchanged chunk"
                )));
            }

            if !in_run && continuation {
                return Err(NdefError::param(format!(
                    "record {index} has unchanged TNF outside a chunked record"
                )));
            }

            in_run = record.flags().chunked;
        }

        if in_run {
            return Err(NdefError::param("message ends inside a chunked record"));
        }

        Ok(())
    }
}

impl From<NdefRecord> for NdefMessage {
    fn from(mut record: NdefRecord) -> Self {
        record.set_message_flags(true, true);
        Self {
            records: vec![record],
        }
    }
}

impl<'a> IntoIterator for &'a NdefMessage {
    type Item = &'a NdefRecord;
    type IntoIter = std::slice::Iter<'a, NdefRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl IntoIterator for NdefMessage {
    type Item = NdefRecord;
    type IntoIter = std::vec::IntoIter<NdefRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

// MARK: parse state

#[derive(Debug)]
enum ParseState {
    ExpectFirstRecord,
    MidMessage,
    InChunkRun(ChunkRun),
    Done,
}

impl ParseState {
    fn after_record(message_end: bool) -> Self {
        if message_end {
            ParseState::Done
        } else {
            ParseState::MidMessage
        }
    }
}

/// Chunks of one logical record seen so far
#[derive(Debug)]
struct ChunkRun {
    tnf: Tnf,
    type_: ByteBuffer,
    id: Option<ByteBuffer>,
    message_begin: bool,
    payload: Vec<u8>,
    chunks: usize,
}

impl ChunkRun {
    fn start(first: NdefRecord) -> Self {
        let message_begin = first.flags().message_begin;
        let (tnf, type_, id, payload) = first.into_parts();

        Self {
            tnf,
            type_,
            id,
            message_begin,
            payload: payload.into_vec(),
            chunks: 1,
        }
    }

    fn extend(&mut self, payload: &[u8]) {
        self.payload.extend_from_slice(payload);
        self.chunks += 1;
    }

    fn check_length(&self, options: &ParseOptions) -> Result<()> {
        check_payload_length(self.payload.len(), options)
    }

    fn finish(self, message_end: bool) -> NdefRecord {
        let mut record = NdefRecord::chunk(self.tnf, self.type_, self.id, self.payload, false);
        record.set_message_flags(self.message_begin, message_end);
        record
    }
}

fn check_payload_length(length: usize, options: &ParseOptions) -> Result<()> {
    if length as u64 > options.max_payload_length {
        return Err(NdefError::format(format!(
            "record payload of {length} bytes exceeds the limit of {} bytes",
            options.max_payload_length
        )));
    }

    Ok(())
}
