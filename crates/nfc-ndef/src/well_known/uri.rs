//! URI record (`U`), one identifier code byte followed by the rest of the URI

use tracing::warn;

use super::{URI, expect_type};
use crate::{NdefError, NdefRecord, Result};

/// URI prefix codes from the NFC Forum URI RTD
pub const URI_PREFIXES: &[&str] = &[
    "",                           // 0x00 - no prepending
    "http://www.",                // 0x01
    "https://www.",               // 0x02
    "http://",                    // 0x03
    "https://",                   // 0x04
    "tel:",                       // 0x05
    "mailto:",                    // 0x06
    "ftp://anonymous:anonymous@", // 0x07
    "ftp://ftp.",                 // 0x08
    "ftps://",                    // 0x09
    "sftp://",                    // 0x0A
    "smb://",                     // 0x0B
    "nfs://",                     // 0x0C
    "ftp://",                     // 0x0D
    "dav://",                     // 0x0E
    "news:",                      // 0x0F
    "telnet://",                  // 0x10
    "imap:",                      // 0x11
    "rtsp://",                    // 0x12
    "urn:",                       // 0x13
    "pop:",                       // 0x14
    "sip:",                       // 0x15
    "sips:",                      // 0x16
    "tftp:",                      // 0x17
    "btspp://",                   // 0x18
    "btl2cap://",                 // 0x19
    "btgoep://",                  // 0x1A
    "tcpobex://",                 // 0x1B
    "irdaobex://",                // 0x1C
    "file://",                    // 0x1D
    "urn:epc:id:",                // 0x1E
    "urn:epc:tag:",               // 0x1F
    "urn:epc:pat:",               // 0x20
    "urn:epc:raw:",               // 0x21
    "urn:epc:",                   // 0x22
    "urn:nfc:",                   // 0x23
];

/// How the identifier code of a new URI record is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum UriAbbreviation {
    /// Use the longest prefix from [`URI_PREFIXES`] the URI starts with
    Auto,

    /// Use this code, `0` stores the URI as-is
    Code(u8),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Record)]
pub struct UriRecord {
    pub code: u8,
    pub suffix: String,
    pub uri: String,
}

/// Prefix for an identifier code, `None` for codes the table does not define
pub fn uri_prefix(code: u8) -> Option<&'static str> {
    URI_PREFIXES.get(code as usize).copied()
}

/// Longest table prefix `uri` starts with, as `(code, suffix)`
pub fn abbreviate(uri: &str) -> (u8, &str) {
    URI_PREFIXES
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, prefix)| uri.starts_with(*prefix))
        .max_by_key(|(_, prefix)| prefix.len())
        .map(|(code, prefix)| (code as u8, &uri[prefix.len()..]))
        .unwrap_or((0, uri))
}

pub fn create_uri_record(uri: &str, abbreviation: UriAbbreviation) -> Result<NdefRecord> {
    let (code, suffix) = match abbreviation {
        UriAbbreviation::Auto => abbreviate(uri),
        UriAbbreviation::Code(0) => (0, uri),
        UriAbbreviation::Code(code) => {
            let Some(prefix) = uri_prefix(code) else {
                return Err(NdefError::param(format!("undefined URI identifier code {code:#04x}")));
            };

            let Some(suffix) = uri.strip_prefix(prefix) else {
                return Err(NdefError::param(format!(
                    "URI {uri:?} does not start with {prefix:?} (code {code:#04x})"
                )));
            };

            (code, suffix)
        }
    };

    let mut payload = Vec::with_capacity(1 + suffix.len());
    payload.push(code);
    payload.extend_from_slice(suffix.as_bytes());

    NdefRecord::well_known(URI, payload)
}

/// Identifier code, stored suffix and resolved URI of a URI record
///
/// Codes outside the table resolve with no prefix
pub fn parse_uri_record(record: &NdefRecord) -> Result<UriRecord> {
    expect_type(record, URI)?;
    parse_uri_payload(record.payload())
}

/// The full URI a URI record points to
pub fn resolve_uri(record: &NdefRecord) -> Result<String> {
    parse_uri_record(record).map(|uri| uri.uri)
}

pub fn parse_uri_payload(payload: &[u8]) -> Result<UriRecord> {
    let Some((&code, suffix)) = payload.split_first() else {
        return Err(NdefError::format("URI record payload is empty"));
    };

    let suffix = std::str::from_utf8(suffix)
        .map_err(|error| NdefError::format(format!("URI record is not UTF-8: {error}")))?;

    let prefix = uri_prefix(code).unwrap_or_else(|| {
        warn!("undefined URI identifier code {code:#04x}, using no prefix");
        ""
    });

    Ok(UriRecord {
        code,
        suffix: suffix.to_string(),
        uri: format!("{prefix}{suffix}"),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::well_known::text::{TextEncoding, create_text_record};

    #[test]
    fn auto_abbreviation() {
        let record = create_uri_record("http://www.example.com/x", UriAbbreviation::Auto).unwrap();
        assert_eq!(record.payload()[0], 0x01);
        assert_eq!(&record.payload()[1..], b"example.com/x");

        let uri = parse_uri_record(&record).unwrap();
        assert_eq!(
            uri,
            UriRecord {
                code: 0x01,
                suffix: "example.com/x".into(),
                uri: "http://www.example.com/x".into(),
            }
        );
        assert_eq!(resolve_uri(&record).unwrap(), "http://www.example.com/x");
    }

    #[test]
    fn longest_prefix_wins() {
        assert_eq!(abbreviate("https://www.rust-lang.org"), (0x02, "rust-lang.org"));
        assert_eq!(abbreviate("https://docs.rs"), (0x04, "docs.rs"));
        assert_eq!(abbreviate("urn:epc:id:sgtin:1"), (0x1E, "sgtin:1"));
        assert_eq!(abbreviate("urn:epc:other"), (0x22, "other"));
        assert_eq!(abbreviate("geo:52.1,4.3"), (0x00, "geo:52.1,4.3"));
    }

    #[test]
    fn explicit_codes() {
        let record = create_uri_record("tel:+15551234", UriAbbreviation::Code(0)).unwrap();
        assert_eq!(record.payload()[0], 0x00);
        assert_eq!(resolve_uri(&record).unwrap(), "tel:+15551234");

        let record = create_uri_record("tel:+15551234", UriAbbreviation::Code(0x05)).unwrap();
        assert_eq!(record.payload(), b"\x05+15551234");

        let result = create_uri_record("mailto:a@b.c", UriAbbreviation::Code(0x05));
        assert!(matches!(result, Err(NdefError::InvalidParam(_))));

        let result = create_uri_record("x", UriAbbreviation::Code(0x24));
        assert!(matches!(result, Err(NdefError::InvalidParam(_))));
    }

    #[test]
    fn undefined_code_has_no_prefix() {
        let record = NdefRecord::well_known(URI, &[0x40, b'a', b'/', b'b']).unwrap();
        let uri = parse_uri_record(&record).unwrap();

        assert_eq!(uri.code, 0x40);
        assert_eq!(uri.uri, "a/b");
    }

    #[test]
    fn empty_payload_is_invalid() {
        let record = NdefRecord::well_known(URI, Vec::<u8>::new()).unwrap();
        assert!(matches!(resolve_uri(&record), Err(NdefError::InvalidFormat(_))));
    }

    #[test]
    fn text_record_is_not_uri() {
        let record = create_text_record("hi", "en", TextEncoding::Utf8).unwrap();
        assert!(matches!(resolve_uri(&record), Err(NdefError::NotExpectedType { .. })));
    }

    #[test]
    fn table_matches_rtd() {
        assert_eq!(URI_PREFIXES.len(), 0x24);
        assert_eq!(uri_prefix(0x03), Some("http://"));
        assert_eq!(uri_prefix(0x04), Some("https://"));
        assert_eq!(uri_prefix(0x23), Some("urn:nfc:"));
        assert_eq!(uri_prefix(0x24), None);
    }
}
