//! Human readable rendering of records and messages, used by `ndef-inspect`

use std::fmt;

use crate::{NdefMessage, NdefPayload, NdefRecord, RecordFlags};

impl fmt::Display for RecordFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (self.message_begin, "MB"),
            (self.message_end, "ME"),
            (self.chunked, "CF"),
            (self.short_record, "SR"),
            (self.has_id_length, "IL"),
        ];

        let set = names
            .iter()
            .filter(|(set, _)| *set)
            .map(|(_, name)| *name)
            .collect::<Vec<_>>();

        if set.is_empty() {
            return write!(f, "-");
        }

        write!(f, "{}", set.join(" "))
    }
}

impl fmt::Display for NdefRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  tnf:     {}", self.tnf())?;
        writeln!(f, "  flags:   {}", self.flags())?;
        writeln!(f, "  type:    {}", String::from_utf8_lossy(self.type_()))?;

        match self.id() {
            Some(id) => writeln!(f, "  id:      {}", String::from_utf8_lossy(id))?,
            None => writeln!(f, "  id:      (none)")?,
        }

        write!(
            f,
            "  payload: {} ({} bytes)",
            hex::encode(self.payload()),
            self.payload().len()
        )?;

        match NdefPayload::from_record(self) {
            NdefPayload::Text(text) => {
                write!(f, "\n  text:    [{}, {:?}] {}", text.language, text.encoding, text.text)
            }
            NdefPayload::Uri(uri) => write!(f, "\n  uri:     {}", uri.uri),
            NdefPayload::SmartPoster(poster) => {
                write!(f, "\n  poster:  {}", poster.uri.uri)?;
                for title in &poster.titles {
                    write!(f, "\n  title:   [{}] {}", title.language, title.text)?;
                }
                if let Some(action) = poster.action {
                    write!(f, "\n  action:  {action:?}")?;
                }
                Ok(())
            }
            NdefPayload::Signature(signature) => write!(
                f,
                "\n  sig:     v{} {:?}, {} signature bytes, {} certificate(s) {:?}",
                signature.version,
                signature.signature_type,
                signature.signature.len(),
                signature.certificates.len(),
                signature.certificate_format
            ),
            NdefPayload::Empty
            | NdefPayload::Mime { .. }
            | NdefPayload::Data(_) => Ok(()),
        }
    }
}

impl fmt::Display for NdefMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NDEF message, {} record(s)", self.record_count())?;

        for (index, record) in self.iter().enumerate() {
            write!(f, "\nrecord {index}\n{record}")?;
        }

        Ok(())
    }
}
