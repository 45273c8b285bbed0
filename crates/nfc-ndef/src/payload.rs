use tracing::debug;

use crate::{
    NdefRecord,
    ndef_type::Tnf,
    well_known::{
        SIGNATURE, SMART_POSTER, TEXT, URI,
        signature::{SignatureRecord, parse_signature_record},
        smart_poster::{SmartPoster, parse_smart_poster},
        text::{TextRecord, extract_text},
        uri::{UriRecord, parse_uri_record},
    },
};

/// Typed view of a record's payload
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum NdefPayload {
    Empty,
    Text(TextRecord),
    Uri(UriRecord),
    SmartPoster(SmartPoster),
    Signature(SignatureRecord),
    Mime { mime_type: String, data: Vec<u8> },
    Data(Vec<u8>),
}

impl NdefPayload {
    /// Classify a record, a well-known record that fails to parse is kept as raw data
    pub fn from_record(record: &NdefRecord) -> Self {
        let parsed = match (record.tnf(), record.type_()) {
            (Tnf::Empty, _) => return Self::Empty,

            (Tnf::WellKnown, TEXT) => extract_text(record).map(Self::Text),
            (Tnf::WellKnown, URI) => parse_uri_record(record).map(Self::Uri),
            (Tnf::WellKnown, SMART_POSTER) => parse_smart_poster(record).map(Self::SmartPoster),
            (Tnf::WellKnown, SIGNATURE) => parse_signature_record(record).map(Self::Signature),

            (Tnf::Mime, mime_type) => {
                return Self::Mime {
                    mime_type: String::from_utf8_lossy(mime_type).to_string(),
                    data: record.payload().to_vec(),
                };
            }

            _ => return Self::Data(record.payload().to_vec()),
        };

        parsed.unwrap_or_else(|error| {
            debug!("keeping well-known record as raw data: {error}");
            Self::Data(record.payload().to_vec())
        })
    }

    /// The text a payload carries, if it is text, a URI or UTF-8 data
    pub fn as_string(&self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text.text.clone()),
            Self::Uri(uri) => Some(uri.uri.clone()),
            Self::SmartPoster(poster) => Some(poster.uri.uri.clone()),
            Self::Mime { data, .. } | Self::Data(data) => String::from_utf8(data.clone()).ok(),
            Self::Empty | Self::Signature(_) => None,
        }
    }
}

impl From<&NdefRecord> for NdefPayload {
    fn from(record: &NdefRecord) -> Self {
        Self::from_record(record)
    }
}

/// Concatenated raw data of every untyped record, in order
pub fn data_from_records(records: &[NdefRecord]) -> Vec<u8> {
    records
        .iter()
        .map(NdefPayload::from_record)
        .filter_map(|payload| match payload {
            NdefPayload::Data(data) => Some(data),
            _ => None,
        })
        .flatten()
        .collect::<Vec<u8>>()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::well_known::{
        text::{TextEncoding, create_text_record},
        uri::{UriAbbreviation, create_uri_record},
    };

    #[test]
    fn classifies_well_known_records() {
        let text = create_text_record("hello", "en", TextEncoding::Utf8).unwrap();
        let payload = NdefPayload::from_record(&text);
        assert!(matches!(&payload, NdefPayload::Text(text) if text.text == "hello"));
        assert_eq!(payload.as_string().as_deref(), Some("hello"));

        let uri = create_uri_record("https://example.com", UriAbbreviation::Auto).unwrap();
        let payload = NdefPayload::from(&uri);
        assert_eq!(payload.as_string().as_deref(), Some("https://example.com"));
    }

    #[test]
    fn broken_well_known_is_data() {
        let record = NdefRecord::well_known(b"T", &[0x3F, b'e']).unwrap();
        assert_eq!(NdefPayload::from_record(&record), NdefPayload::Data(vec![0x3F, b'e']));
    }

    #[test]
    fn mime_and_empty() {
        let record = NdefRecord::mime("application/json", "{}").unwrap();
        assert_eq!(
            NdefPayload::from_record(&record),
            NdefPayload::Mime {
                mime_type: "application/json".into(),
                data: b"{}".to_vec(),
            }
        );

        assert_eq!(NdefPayload::from_record(&NdefRecord::empty()), NdefPayload::Empty);
    }

    #[test]
    fn data_is_concatenated() {
        let records = vec![
            NdefRecord::external("example.com:a", &[1_u8, 2]).unwrap(),
            create_text_record("skip", "en", TextEncoding::Utf8).unwrap(),
            NdefRecord::external("example.com:b", &[3_u8]).unwrap(),
        ];

        assert_eq!(data_from_records(&records), vec![1, 2, 3]);
    }
}
