//! Signature record (`Sig`), structural parsing only
//!
//! ```text
//! version (1)
//! uri_present (bit 7) | signature type (bits 6..0)
//! signature length (2, big-endian) | signature or signature URI
//! uri_present (bit 7) | certificate format (bits 6..4) | certificate count (bits 3..0)
//! certificate count x { length (2, big-endian) | certificate }
//! [ length (2, big-endian) | certificate chain URI ]   if uri_present
//! ```
//!
//! Every field is located by the length of the one before it, there is no padding

use winnow::{
    ModalResult, Parser,
    binary::{
        be_u8, be_u16,
        bits::{bits, bool as take_bool, take as take_bits},
        length_take,
    },
    error::{ContextError, ErrMode},
};

use super::{SIGNATURE, expect_type};
use crate::{NdefError, NdefRecord, Result};

const URI_PRESENT: u8 = 0b1000_0000;
const MAX_CERTIFICATES: usize = 0b1111;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum SignatureType {
    /// Marks the end of a signed range, carries no signature
    NotPresent,
    RsassaPss,
    RsassaPkcs1,
    Dsa,
    Ecdsa,
    Other(u8),
}

impl SignatureType {
    pub fn from_bits(bits: u8) -> Self {
        match bits {
            0x00 => Self::NotPresent,
            0x01 => Self::RsassaPss,
            0x02 => Self::RsassaPkcs1,
            0x03 => Self::Dsa,
            0x04 => Self::Ecdsa,
            other => Self::Other(other),
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            Self::NotPresent => 0x00,
            Self::RsassaPss => 0x01,
            Self::RsassaPkcs1 => 0x02,
            Self::Dsa => 0x03,
            Self::Ecdsa => 0x04,
            Self::Other(other) => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum CertificateFormat {
    X509,
    X968,
    Other(u8),
}

impl CertificateFormat {
    pub fn from_bits(bits: u8) -> Self {
        match bits {
            0x00 => Self::X509,
            0x01 => Self::X968,
            other => Self::Other(other),
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            Self::X509 => 0x00,
            Self::X968 => 0x01,
            Self::Other(other) => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Record)]
pub struct SignatureRecord {
    pub version: u8,
    pub signature_type: SignatureType,
    /// The signature field holds a URI to the signature instead of the signature
    pub signature_uri_present: bool,
    pub signature: Vec<u8>,
    pub certificate_format: CertificateFormat,
    pub certificates: Vec<Vec<u8>>,
    pub certificate_uri: Option<Vec<u8>>,
}

impl SignatureRecord {
    pub fn encode_payload(&self) -> Result<Vec<u8>> {
        let signature_type = self.signature_type.bits();
        if signature_type & URI_PRESENT != 0 {
            return Err(NdefError::param(format!(
                "signature type {signature_type:#04x} does not fit in 7 bits"
            )));
        }

        if SignatureType::from_bits(signature_type) != self.signature_type {
            return Err(NdefError::param(format!(
                "signature type {signature_type:#04x} has a named variant, use it instead of Other"
            )));
        }

        let certificate_format = self.certificate_format.bits();
        if certificate_format > 0b111 {
            return Err(NdefError::param(format!(
                "certificate format {certificate_format:#04x} does not fit in 3 bits"
            )));
        }

        if CertificateFormat::from_bits(certificate_format) != self.certificate_format {
            return Err(NdefError::param(format!(
                "certificate format {certificate_format:#04x} has a named variant, use it instead of Other"
            )));
        }

        if self.certificates.len() > MAX_CERTIFICATES {
            return Err(NdefError::param(format!(
                "at most {MAX_CERTIFICATES} certificates fit in a chain, got {}",
                self.certificates.len()
            )));
        }

        let mut out = vec![self.version];

        let mut signature_byte = signature_type;
        if self.signature_uri_present {
            signature_byte |= URI_PRESENT;
        }
        out.push(signature_byte);
        push_length_value(&mut out, &self.signature, "signature")?;

        let mut chain_byte = (certificate_format << 4) | self.certificates.len() as u8;
        if self.certificate_uri.is_some() {
            chain_byte |= URI_PRESENT;
        }
        out.push(chain_byte);

        for certificate in &self.certificates {
            push_length_value(&mut out, certificate, "certificate")?;
        }

        if let Some(uri) = &self.certificate_uri {
            push_length_value(&mut out, uri, "certificate chain URI")?;
        }

        Ok(out)
    }
}

pub fn create_signature_record(signature: &SignatureRecord) -> Result<NdefRecord> {
    NdefRecord::well_known(SIGNATURE, signature.encode_payload()?)
}

pub fn parse_signature_record(record: &NdefRecord) -> Result<SignatureRecord> {
    expect_type(record, SIGNATURE)?;
    parse_signature_payload(record.payload())
}

/// Walk the packed signature layout field by field
///
/// A marker record (signature type not present) may stop right after its empty
/// signature field, it then has no certificate chain
pub fn parse_signature_payload(payload: &[u8]) -> Result<SignatureRecord> {
    let mut input = payload;
    let mut cursor = Cursor::new(payload.len());

    let version = cursor.field(&mut input, "version", be_u8)?;

    let (signature_uri_present, signature_type) =
        cursor.field(&mut input, "signature type", parse_flag_and_7_bits)?;
    let signature_type = SignatureType::from_bits(signature_type);

    let signature = cursor.field(&mut input, "signature", length_take(be_u16))?;

    if input.is_empty() && signature_type == SignatureType::NotPresent {
        return Ok(SignatureRecord {
            version,
            signature_type,
            signature_uri_present,
            signature: signature.to_vec(),
            certificate_format: CertificateFormat::X509,
            certificates: Vec::new(),
            certificate_uri: None,
        });
    }

    let (certificate_uri_present, certificate_format, certificate_count) =
        cursor.field(&mut input, "certificate chain header", parse_chain_byte)?;

    let mut certificates = Vec::with_capacity(certificate_count as usize);
    for _ in 0..certificate_count {
        let certificate = cursor.field(&mut input, "certificate", length_take(be_u16))?;
        certificates.push(certificate.to_vec());
    }

    let certificate_uri = if certificate_uri_present {
        let uri = cursor.field(&mut input, "certificate chain URI", length_take(be_u16))?;
        Some(uri.to_vec())
    } else {
        None
    };

    if !input.is_empty() {
        return Err(NdefError::format(format!(
            "{} trailing byte(s) after the signature certificate chain",
            input.len()
        )));
    }

    Ok(SignatureRecord {
        version,
        signature_type,
        signature_uri_present,
        signature: signature.to_vec(),
        certificate_format: CertificateFormat::from_bits(certificate_format),
        certificates,
        certificate_uri,
    })
}

/// Tracks the offset of each field so errors can point at it
struct Cursor {
    total: usize,
}

impl Cursor {
    fn new(total: usize) -> Self {
        Self { total }
    }

    fn field<'i, O>(
        &mut self,
        input: &mut &'i [u8],
        what: &str,
        mut parser: impl Parser<&'i [u8], O, ErrMode<ContextError>>,
    ) -> Result<O> {
        let offset = self.total - input.len();

        parser.parse_next(input).map_err(|_| {
            NdefError::format(format!(
                "signature record {what} at byte {offset} runs past the end of the payload"
            ))
        })
    }
}

fn parse_flag_and_7_bits(input: &mut &[u8]) -> ModalResult<(bool, u8)> {
    bits::<_, _, ErrMode<ContextError>, _, _>((take_bool, take_bits(7_u8))).parse_next(input)
}

fn parse_chain_byte(input: &mut &[u8]) -> ModalResult<(bool, u8, u8)> {
    bits::<_, _, ErrMode<ContextError>, _, _>((take_bool, take_bits(3_u8), take_bits(4_u8)))
        .parse_next(input)
}

fn push_length_value(out: &mut Vec<u8>, value: &[u8], what: &str) -> Result<()> {
    let length = u16::try_from(value.len()).map_err(|_| {
        NdefError::param(format!("{what} of {} bytes does not fit a 16 bit length", value.len()))
    })?;

    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::well_known::text::{TextEncoding, create_text_record};

    fn signed() -> SignatureRecord {
        SignatureRecord {
            version: 0x01,
            signature_type: SignatureType::Ecdsa,
            signature_uri_present: false,
            signature: vec![0xAA, 0xBB, 0xCC],
            certificate_format: CertificateFormat::X509,
            certificates: vec![vec![0x30, 0x01], vec![0x30, 0x02, 0x03]],
            certificate_uri: Some(b"https://ca.example".to_vec()),
        }
    }

    #[test]
    fn known_layout() {
        #[rustfmt::skip]
        let payload = [
            0x01,                   // version
            0x04,                   // no uri, ecdsa
            0x00, 0x02, 0xDE, 0xAD, // signature
            0x91,                   // uri present, x9.68, one certificate
            0x00, 0x01, 0x42,       // certificate
            0x00, 0x03, b'u', b'r', b'i',
        ];

        let parsed = parse_signature_payload(&payload).unwrap();
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.signature_type, SignatureType::Ecdsa);
        assert!(!parsed.signature_uri_present);
        assert_eq!(parsed.signature, vec![0xDE, 0xAD]);
        assert_eq!(parsed.certificate_format, CertificateFormat::X968);
        assert_eq!(parsed.certificates, vec![vec![0x42]]);
        assert_eq!(parsed.certificate_uri, Some(b"uri".to_vec()));
    }

    #[test]
    fn build_and_parse() {
        let record = create_signature_record(&signed()).unwrap();
        assert_eq!(record.type_(), b"Sig");
        assert_eq!(parse_signature_record(&record).unwrap(), signed());
    }

    #[test]
    fn signature_uri_flag_is_bit_seven() {
        let mut signature = signed();
        signature.signature_uri_present = true;
        signature.signature = b"https://sig.example".to_vec();

        let payload = signature.encode_payload().unwrap();
        assert_eq!(payload[1], 0x84);
        assert_eq!(parse_signature_payload(&payload).unwrap(), signature);
    }

    #[test]
    fn overrun_is_invalid_format() {
        let payload = signed().encode_payload().unwrap();

        for cut in 0..payload.len() {
            let result = parse_signature_payload(&payload[..cut]);
            assert!(
                matches!(result, Err(NdefError::InvalidFormat(_))),
                "cut at {cut} gave {result:?}"
            );
        }
    }

    #[test]
    fn length_past_end_is_invalid_format() {
        let payload = [0x01, 0x01, 0x00, 0x10, 0x00];
        let error = parse_signature_payload(&payload).unwrap_err();

        assert_eq!(
            error,
            NdefError::InvalidFormat(
                "signature record signature at byte 2 runs past the end of the payload".into()
            )
        );
    }

    #[test]
    fn marker_record_without_chain() {
        let parsed = parse_signature_payload(&[0x01, 0x00, 0x00, 0x00]).unwrap();

        assert_eq!(parsed.signature_type, SignatureType::NotPresent);
        assert!(parsed.signature.is_empty());
        assert!(parsed.certificates.is_empty());
        assert_eq!(parsed.certificate_uri, None);
    }

    #[test]
    fn trailing_bytes_are_invalid() {
        let mut payload = signed().encode_payload().unwrap();
        payload.push(0x00);

        assert!(matches!(parse_signature_payload(&payload), Err(NdefError::InvalidFormat(_))));
    }

    #[test]
    fn builder_limits() {
        let mut signature = signed();
        signature.certificates = vec![vec![0x01]; 16];
        assert!(matches!(create_signature_record(&signature), Err(NdefError::InvalidParam(_))));

        let mut signature = signed();
        signature.signature_type = SignatureType::Other(0x80);
        assert!(matches!(create_signature_record(&signature), Err(NdefError::InvalidParam(_))));

        let mut signature = signed();
        signature.signature = vec![0; 70_000];
        assert!(matches!(create_signature_record(&signature), Err(NdefError::InvalidParam(_))));
    }

    #[test]
    fn other_values_must_not_shadow_named_variants() {
        for bits in 0x00..=0x04 {
            let mut signature = signed();
            signature.signature_type = SignatureType::Other(bits);
            let result = create_signature_record(&signature);
            assert!(matches!(result, Err(NdefError::InvalidParam(_))), "type {bits}");
        }

        for bits in 0x00..=0x01 {
            let mut signature = signed();
            signature.certificate_format = CertificateFormat::Other(bits);
            let result = create_signature_record(&signature);
            assert!(matches!(result, Err(NdefError::InvalidParam(_))), "format {bits}");
        }

        let mut signature = signed();
        signature.signature_type = SignatureType::Other(0x05);
        signature.certificate_format = CertificateFormat::Other(0x02);

        let record = create_signature_record(&signature).unwrap();
        assert_eq!(parse_signature_record(&record).unwrap(), signature);
    }

    #[test]
    fn text_record_is_not_signature() {
        let record = create_text_record("hi", "en", TextEncoding::Utf8).unwrap();
        let result = parse_signature_record(&record);

        assert!(matches!(result, Err(NdefError::NotExpectedType { .. })));
    }
}
