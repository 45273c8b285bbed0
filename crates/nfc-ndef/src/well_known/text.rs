//! Text record (`T`)
//!
//! ```text
//! +----------+----------+-------------------+----------------+
//! | UTF16(7) | RFU(6)   | lang length(5..0) | lang | text    |
//! +----------+----------+-------------------+----------------+
//! ```

use tracing::debug;
use winnow::{
    ModalResult, Parser as _,
    binary::bits::{bits, bool as take_bool, take as take_bits},
    error::{ContextError, ErrMode},
    token::take,
};

use super::{TEXT, expect_type};
use crate::{NdefError, NdefRecord, Result};

const UTF16_FLAG: u8 = 0b1000_0000;
const MAX_LANGUAGE_CODE_LENGTH: usize = 0b0011_1111;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum TextEncoding {
    Utf8,
    Utf16,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Record)]
pub struct TextRecord {
    pub encoding: TextEncoding,
    pub language: String,
    pub text: String,
}

impl TextRecord {
    pub fn to_record(&self) -> Result<NdefRecord> {
        create_text_record(&self.text, &self.language, self.encoding)
    }
}

/// Build a well-known text record
///
/// UTF-16 text is written big-endian without a byte order mark
pub fn create_text_record(
    text: &str,
    language: &str,
    encoding: TextEncoding,
) -> Result<NdefRecord> {
    if language.is_empty() || language.len() > MAX_LANGUAGE_CODE_LENGTH {
        return Err(NdefError::param(format!(
            "language code must be 1 to {MAX_LANGUAGE_CODE_LENGTH} bytes, got {}",
            language.len()
        )));
    }

    if !language.is_ascii() {
        return Err(NdefError::param(format!("language code {language:?} is not ASCII")));
    }

    let mut control = language.len() as u8;
    if encoding == TextEncoding::Utf16 {
        control |= UTF16_FLAG;
    }

    let mut payload = Vec::with_capacity(1 + language.len() + text.len() * 2);
    payload.push(control);
    payload.extend_from_slice(language.as_bytes());

    match encoding {
        TextEncoding::Utf8 => payload.extend_from_slice(text.as_bytes()),
        TextEncoding::Utf16 => {
            payload.extend(text.encode_utf16().flat_map(|unit| unit.to_be_bytes()));
        }
    }

    NdefRecord::well_known(TEXT, payload)
}

/// Text, language code and encoding of a text record
///
/// The encoding comes from the top bit of the control byte alone, there is no BOM sniffing
pub fn extract_text(record: &NdefRecord) -> Result<TextRecord> {
    expect_type(record, TEXT)?;
    parse_text_payload(record.payload())
}

pub fn parse_text_payload(payload: &[u8]) -> Result<TextRecord> {
    let mut input = payload;

    let (is_utf16, reserved, language_code_length) = parse_control_byte(&mut input)
        .map_err(|error| NdefError::from_parser(error, "text record control byte"))?;

    if reserved {
        debug!("text record has the reserved control bit set, ignoring it");
    }

    let language_code: &[u8] = take(language_code_length as usize)
        .parse_next(&mut input)
        .map_err(|error| NdefError::from_parser(error, "text record language code"))?;

    if !language_code.is_ascii() {
        return Err(NdefError::format("text record language code is not ASCII"));
    }
    let language = String::from_utf8_lossy(language_code).into_owned();

    let text = if is_utf16 {
        decode_utf16_be(input)?
    } else {
        std::str::from_utf8(input)
            .map_err(|error| NdefError::format(format!("text record is not UTF-8: {error}")))?
            .to_string()
    };

    let encoding = if is_utf16 {
        TextEncoding::Utf16
    } else {
        TextEncoding::Utf8
    };

    Ok(TextRecord {
        encoding,
        language,
        text,
    })
}

fn parse_control_byte(input: &mut &[u8]) -> ModalResult<(bool, bool, u8)> {
    bits::<_, _, ErrMode<ContextError>, _, _>((take_bool, take_bool, take_bits(6_u8)))
        .parse_next(input)
}

fn decode_utf16_be(bytes: &[u8]) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(NdefError::format(format!(
            "UTF-16 text has an odd length of {} bytes",
            bytes.len()
        )));
    }

    let units = bytes
        .chunks_exact(2)
        .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
        .collect::<Vec<u16>>();

    String::from_utf16(&units)
        .map_err(|error| NdefError::format(format!("text record is not UTF-16: {error}")))
}
