//! TLV blocks that wrap an NDEF message in tag memory (NFC Forum type 2 and type 5 tags)
//!
//! ```text
//! tag (1) | length (1, or 0xFF + 2 big-endian) | value (length)
//! ```

use tracing::trace;
use winnow::{
    ModalResult, Parser as _,
    binary::{be_u8, be_u16},
    token::take,
};

use crate::{
    NdefError, Result,
    parser::stream::{self, Stream},
};

pub const NULL_TLV: u8 = 0x00;
pub const LOCK_CONTROL_TLV: u8 = 0x01;
pub const MEMORY_CONTROL_TLV: u8 = 0x02;
pub const NDEF_MESSAGE_TLV: u8 = 0x03;
pub const PROPRIETARY_TLV: u8 = 0xFD;
pub const TERMINATOR_TLV: u8 = 0xFE;

/// Length byte announcing a 2 byte length
const LONG_LENGTH: u8 = 0xFF;

/// Longest value the 3 byte length form can describe
pub const MAX_TLV_LENGTH: usize = 0xFFFE;

/// Wrap a serialized message in an NDEF message TLV followed by a terminator TLV
pub fn encode_ndef_tlv(message: &[u8]) -> Result<Vec<u8>> {
    if message.len() > MAX_TLV_LENGTH {
        return Err(NdefError::param(format!(
            "message of {} bytes does not fit in a TLV, the limit is {MAX_TLV_LENGTH}",
            message.len()
        )));
    }

    let mut out = Vec::with_capacity(message.len() + 5);
    out.push(NDEF_MESSAGE_TLV);

    if message.len() < LONG_LENGTH as usize {
        out.push(message.len() as u8);
    } else {
        out.push(LONG_LENGTH);
        out.extend_from_slice(&(message.len() as u16).to_be_bytes());
    }

    out.extend_from_slice(message);
    out.push(TERMINATOR_TLV);

    Ok(out)
}

/// The value of the first NDEF message TLV in `memory`
pub fn find_ndef_message(memory: &[u8]) -> Result<&[u8]> {
    let mut input = stream::new(memory);

    let Some(length) = parse_ndef_tlv_header
        .parse_next(&mut input)
        .map_err(|error| NdefError::from_parser(error, "TLV area"))?
    else {
        return Err(NdefError::NoDataFound(
            "terminator TLV reached before an NDEF message TLV".into(),
        ));
    };

    take(length as usize)
        .parse_next(&mut input)
        .map_err(|error| NdefError::from_parser(error, "NDEF message TLV"))
}

/// Skip TLVs up to the NDEF message TLV and return its length
///
/// `None` when the terminator TLV comes first
pub fn parse_ndef_tlv_header(input: &mut Stream<'_>) -> ModalResult<Option<u16>> {
    loop {
        let tag = be_u8.parse_next(input)?;

        match tag {
            NULL_TLV => continue,
            TERMINATOR_TLV => return Ok(None),
            NDEF_MESSAGE_TLV => return parse_tlv_length.map(Some).parse_next(input),
            other => {
                let length = parse_tlv_length.parse_next(input)?;
                trace!(tag = other, length, "skipping TLV");
                take(length as usize).void().parse_next(input)?;
            }
        }
    }
}

fn parse_tlv_length(input: &mut Stream<'_>) -> ModalResult<u16> {
    let length_indicator = be_u8.parse_next(input)?;

    if length_indicator == LONG_LENGTH {
        be_u16.parse_next(input)
    } else {
        Ok(length_indicator as u16)
    }
}
