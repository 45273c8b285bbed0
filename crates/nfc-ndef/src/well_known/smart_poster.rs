//! Smart poster record (`Sp`)
//!
//! The payload is itself a complete NDEF message holding exactly one URI record plus
//! optional title, action, size, type and icon records

use tracing::{debug, warn};

use super::{
    ACTION, SIZE, SMART_POSTER, TEXT, TYPE, URI, expect_type,
    text::{TextRecord, extract_text},
    uri::{UriAbbreviation, UriRecord, create_uri_record, parse_uri_record},
};
use crate::{NdefError, NdefMessage, NdefRecord, Result, ndef_type::Tnf};

/// Recommended action (`act` record)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum SmartPosterAction {
    /// Do the action (send the SMS, launch the browser, ...)
    Do,
    /// Save for later
    Save,
    /// Open for editing
    Open,
    /// Value the RTD reserves for future use
    Reserved(u8),
}

impl SmartPosterAction {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0x00 => Self::Do,
            0x01 => Self::Save,
            0x02 => Self::Open,
            other => Self::Reserved(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Self::Do => 0x00,
            Self::Save => 0x01,
            Self::Open => 0x02,
            Self::Reserved(other) => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Record)]
pub struct SmartPoster {
    pub uri: UriRecord,
    pub titles: Vec<TextRecord>,
    pub action: Option<SmartPosterAction>,
    /// Size of the referenced content in bytes (`s` record)
    pub size: Option<u32>,
    /// MIME type of the referenced content (`t` record)
    pub mime_type: Option<String>,
    /// Image or video records
    pub icons: Vec<NdefRecord>,
}

/// The nested message a smart poster record carries
pub fn smart_poster_message(record: &NdefRecord) -> Result<NdefMessage> {
    expect_type(record, SMART_POSTER)?;

    NdefMessage::deserialize(record.payload()).map_err(|error| match error {
        NdefError::InvalidFormat(reason) => {
            NdefError::InvalidFormat(format!("smart poster payload: {reason}"))
        }
        other => other,
    })
}

/// First title record of a smart poster
pub fn get_smart_poster_title_record(record: &NdefRecord) -> Result<NdefRecord> {
    let message = smart_poster_message(record)?;

    message
        .into_iter()
        .find(|nested| nested.is_type(Tnf::WellKnown, TEXT))
        .ok_or_else(|| NdefError::NoDataFound("smart poster has no title record".into()))
}

/// The URI record of a smart poster, which every smart poster must have
pub fn get_smart_poster_uri_record(record: &NdefRecord) -> Result<NdefRecord> {
    let message = smart_poster_message(record)?;
    take_uri_record(message)
}

pub fn parse_smart_poster(record: &NdefRecord) -> Result<SmartPoster> {
    let message = smart_poster_message(record)?;

    let mut uri = None;
    let mut titles = Vec::new();
    let mut action = None;
    let mut size = None;
    let mut mime_type = None;
    let mut icons = Vec::new();

    for nested in message {
        match (nested.tnf(), nested.type_()) {
            (Tnf::WellKnown, URI) => {
                if uri.is_some() {
                    return Err(NdefError::format("smart poster has more than one URI record"));
                }
                uri = Some(parse_uri_record(&nested)?);
            }

            (Tnf::WellKnown, TEXT) => titles.push(extract_text(&nested)?),

            (Tnf::WellKnown, ACTION) => {
                let [byte] = nested.payload() else {
                    return Err(NdefError::format("smart poster action must be a single byte"));
                };
                action = Some(SmartPosterAction::from_byte(*byte));
            }

            (Tnf::WellKnown, SIZE) => {
                let bytes: [u8; 4] = nested.payload().try_into().map_err(|_| {
                    NdefError::format("smart poster size must be a 4 byte integer")
                })?;
                size = Some(u32::from_be_bytes(bytes));
            }

            (Tnf::WellKnown, TYPE) => {
                let value = std::str::from_utf8(nested.payload())
                    .map_err(|_| NdefError::format("smart poster type is not UTF-8"))?;
                mime_type = Some(value.to_string());
            }

            (Tnf::Mime, type_) if is_icon_type(type_) => icons.push(nested.clone()),

            (tnf, type_) => {
                debug!(
                    "skipping unrecognised smart poster record {tnf} {}",
                    String::from_utf8_lossy(type_)
                );
            }
        }
    }

    let Some(uri) = uri else {
        return Err(NdefError::format("smart poster has no URI record"));
    };

    if matches!(action, Some(SmartPosterAction::Reserved(_))) {
        warn!("smart poster uses a reserved action value");
    }

    Ok(SmartPoster {
        uri,
        titles,
        action,
        size,
        mime_type,
        icons,
    })
}

/// Build a smart poster for `uri` with the given titles and recommended action
pub fn create_smart_poster_record(
    uri: &str,
    titles: &[TextRecord],
    action: Option<SmartPosterAction>,
) -> Result<NdefRecord> {
    let mut records = vec![create_uri_record(uri, UriAbbreviation::Auto)?];

    for title in titles {
        records.push(title.to_record()?);
    }

    if let Some(action) = action {
        records.push(NdefRecord::well_known(ACTION, &[action.to_byte()])?);
    }

    let payload = NdefMessage::new(records)?.serialize()?;
    NdefRecord::well_known(SMART_POSTER, payload)
}

fn take_uri_record(message: NdefMessage) -> Result<NdefRecord> {
    message
        .into_iter()
        .find(|nested| nested.is_type(Tnf::WellKnown, URI))
        .ok_or_else(|| NdefError::format("smart poster has no URI record"))
}

fn is_icon_type(type_: &[u8]) -> bool {
    type_.starts_with(b"image/") || type_.starts_with(b"video/")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::well_known::{
        text::{TextEncoding, create_text_record},
        uri::resolve_uri,
    };

    fn title(text: &str, language: &str) -> TextRecord {
        TextRecord {
            encoding: TextEncoding::Utf8,
            language: language.into(),
            text: text.into(),
        }
    }

    #[test]
    fn build_and_parse() {
        let titles = [title("Rust", "en"), title("Rouille", "fr")];
        let record = create_smart_poster_record(
            "https://www.rust-lang.org",
            &titles,
            Some(SmartPosterAction::Open),
        )
        .unwrap();

        assert_eq!(record.type_(), b"Sp");

        let poster = parse_smart_poster(&record).unwrap();
        assert_eq!(poster.uri.uri, "https://www.rust-lang.org");
        assert_eq!(poster.uri.code, 0x02);
        assert_eq!(poster.titles, titles.to_vec());
        assert_eq!(poster.action, Some(SmartPosterAction::Open));
        assert_eq!(poster.size, None);
        assert!(poster.icons.is_empty());
    }

    #[test]
    fn nested_records_from_wire_bytes() {
        #[rustfmt::skip]
        let payload = vec![
            0x91, 0x01, 0x08, b'U', 0x01, b'n', b'f', b'c', b'.', b'o', b'r', b'g',
            0x11, 0x01, 0x05, b'T', 0x02, b'e', b'n', b'h', b'i',
            0x11, 0x01, 0x04, b's', 0x00, 0x00, 0x10, 0x00,
            0x11, 0x01, 0x08, b't', b't', b'e', b'x', b't', b'/', b'h', b't', b'm',
            0x51, 0x03, 0x01, b'a', b'c', b't', 0x00,
        ];
        let record = NdefRecord::well_known(SMART_POSTER, payload).unwrap();

        let uri_record = get_smart_poster_uri_record(&record).unwrap();
        assert_eq!(resolve_uri(&uri_record).unwrap(), "http://www.nfc.org");

        let title_record = get_smart_poster_title_record(&record).unwrap();
        assert_eq!(extract_text(&title_record).unwrap().text, "hi");

        let poster = parse_smart_poster(&record).unwrap();
        assert_eq!(poster.size, Some(4096));
        assert_eq!(poster.mime_type.as_deref(), Some("text/htm"));
        assert_eq!(poster.action, Some(SmartPosterAction::Do));
    }

    #[test]
    fn icons_are_collected() {
        let records = vec![
            create_uri_record("https://example.com", UriAbbreviation::Auto).unwrap(),
            NdefRecord::mime("image/png", &[0x89, b'P', b'N', b'G']).unwrap(),
            NdefRecord::mime("application/json", "{}").unwrap(),
        ];
        let payload = NdefMessage::new(records).unwrap().serialize().unwrap();
        let record = NdefRecord::well_known(SMART_POSTER, payload).unwrap();

        let poster = parse_smart_poster(&record).unwrap();
        assert_eq!(poster.icons.len(), 1);
        assert_eq!(poster.icons[0].type_(), b"image/png");
    }

    #[test]
    fn missing_uri_is_invalid() {
        let text = create_text_record("no link", "en", TextEncoding::Utf8).unwrap();
        let payload = NdefMessage::from(text).serialize().unwrap();
        let record = NdefRecord::well_known(SMART_POSTER, payload).unwrap();

        assert!(matches!(parse_smart_poster(&record), Err(NdefError::InvalidFormat(_))));
        assert!(matches!(get_smart_poster_uri_record(&record), Err(NdefError::InvalidFormat(_))));
    }

    #[test]
    fn missing_title_is_no_data() {
        let record = create_smart_poster_record("tel:123", &[], None).unwrap();
        let result = get_smart_poster_title_record(&record);

        assert!(matches!(result, Err(NdefError::NoDataFound(_))));
        assert_eq!(parse_smart_poster(&record).unwrap().uri.uri, "tel:123");
    }

    #[test]
    fn payload_must_be_a_message() {
        let record = NdefRecord::well_known(SMART_POSTER, "not a message").unwrap();
        assert!(matches!(parse_smart_poster(&record), Err(NdefError::InvalidFormat(_))));
    }

    #[test]
    fn other_records_are_not_posters() {
        let record = create_text_record("hi", "en", TextEncoding::Utf8).unwrap();
        let result = parse_smart_poster(&record);

        assert!(matches!(result, Err(NdefError::NotExpectedType { .. })));
    }

    #[test]
    fn action_byte_round_trip() {
        for byte in 0..=4 {
            assert_eq!(SmartPosterAction::from_byte(byte).to_byte(), byte);
        }
    }
}
