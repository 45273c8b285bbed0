pub mod stream;

use stream::Stream;
use winnow::{
    ModalResult, Parser,
    binary::{
        Endianness, be_u8,
        bits::{bits, bool as take_bool, take as take_bits},
    },
    error::{ContextError, ErrMode},
    token::take,
};

use crate::header::{NdefHeader, RecordFlags};

/// One wire record, its fields borrowed from the input buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord<'i> {
    pub header: NdefHeader,
    pub type_: &'i [u8],
    pub id: Option<&'i [u8]>,
    pub payload: &'i [u8],
}

impl<'i> ParsedRecord<'i> {
    /// Number of wire bytes this record occupied
    pub fn encoded_len(&self) -> usize {
        self.header.encoded_len() + self.header.body_len()
    }
}

/// Parse a single wire record, without interpreting TNF or chunk flags
pub fn parse_ndef_record<'i>(input: &mut Stream<'i>) -> ModalResult<ParsedRecord<'i>> {
    let header = parse_header.parse_next(input)?;
    let type_ = parse_type(input, header.type_length)?;
    let id = parse_id(input, header.id_length)?;
    let payload = parse_payload(input, header.payload_length)?;

    Ok(ParsedRecord {
        header,
        type_,
        id,
        payload,
    })
}

pub fn parse_header(input: &mut Stream<'_>) -> ModalResult<NdefHeader> {
    let (message_begin, message_end, chunked, short_record, has_id_length, type_name_format) =
        parse_header_byte(input)?;

    let type_length = be_u8.parse_next(input)?;

    let payload_length = if short_record {
        be_u8.map(|x: u8| x as u32).parse_next(input)?
    } else {
        winnow::binary::u32(Endianness::Big).parse_next(input)?
    };

    let id_length = if has_id_length {
        Some(be_u8.parse_next(input)?)
    } else {
        None
    };

    let flags = RecordFlags {
        message_begin,
        message_end,
        chunked,
        short_record,
        has_id_length,
    };

    Ok(NdefHeader {
        flags,
        type_name_format,
        type_length,
        payload_length,
        id_length,
    })
}

// private
fn parse_header_byte(input: &mut Stream<'_>) -> ModalResult<(bool, bool, bool, bool, bool, u8)> {
    bits::<_, _, ErrMode<ContextError>, _, _>((
        take_bool,
        take_bool,
        take_bool,
        take_bool,
        take_bool,
        take_bits(3_u8),
    ))
    .parse_next(input)
}

fn parse_type<'i>(input: &mut Stream<'i>, type_length: u8) -> ModalResult<&'i [u8]> {
    take(type_length as usize).parse_next(input)
}

fn parse_id<'i>(input: &mut Stream<'i>, id_length: Option<u8>) -> ModalResult<Option<&'i [u8]>> {
    let Some(id_length) = id_length else {
        return Ok(None);
    };

    take(id_length as usize).map(Some).parse_next(input)
}

fn parse_payload<'i>(input: &mut Stream<'i>, payload_length: u32) -> ModalResult<&'i [u8]> {
    take(payload_length as usize).parse_next(input)
}
