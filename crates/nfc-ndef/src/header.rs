//! Record header: the flag byte and the length fields that follow it
//!
//! ```text
//!   7    6    5    4    3    2 1 0
//! +----+----+----+----+----+------+
//! | MB | ME | CF | SR | IL | TNF  |
//! +----+----+----+----+----+------+
//! | type length (1 byte)          |
//! | payload length (1 or 4 bytes) |
//! | id length (1 byte, if IL)     |
//! +-------------------------------+
//! ```

pub const MB: u8 = 0b1000_0000;
pub const ME: u8 = 0b0100_0000;
pub const CF: u8 = 0b0010_0000;
pub const SR: u8 = 0b0001_0000;
pub const IL: u8 = 0b0000_1000;
pub const TNF_MASK: u8 = 0b0000_0111;

/// Largest payload that still fits the one byte short record length field
pub const SHORT_RECORD_MAX: usize = u8::MAX as usize;

/// Header flags of a record, as they appear (or would appear) on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, uniffi::Record)]
pub struct RecordFlags {
    pub message_begin: bool,
    pub message_end: bool,
    pub chunked: bool,
    pub short_record: bool,
    pub has_id_length: bool,
}

impl RecordFlags {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            message_begin: byte & MB != 0,
            message_end: byte & ME != 0,
            chunked: byte & CF != 0,
            short_record: byte & SR != 0,
            has_id_length: byte & IL != 0,
        }
    }

    /// Header byte for these flags and the given TNF bits
    pub fn to_byte(self, tnf_bits: u8) -> u8 {
        let mut byte = tnf_bits & TNF_MASK;

        if self.message_begin {
            byte |= MB;
        }
        if self.message_end {
            byte |= ME;
        }
        if self.chunked {
            byte |= CF;
        }
        if self.short_record {
            byte |= SR;
        }
        if self.has_id_length {
            byte |= IL;
        }

        byte
    }
}

/// Decoded record header, TNF is kept as raw bits until the record is validated
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct NdefHeader {
    pub flags: RecordFlags,
    pub type_name_format: u8,
    pub type_length: u8,
    pub payload_length: u32,
    pub id_length: Option<u8>,
}

impl NdefHeader {
    /// Bytes occupied by the header itself
    pub fn encoded_len(&self) -> usize {
        let payload_length_width = if self.flags.short_record { 1 } else { 4 };
        let id_length_width = if self.id_length.is_some() { 1 } else { 0 };

        2 + payload_length_width + id_length_width
    }

    /// Bytes occupied by the type, id and payload fields that follow the header
    pub fn body_len(&self) -> usize {
        self.type_length as usize
            + self.id_length.unwrap_or(0) as usize
            + self.payload_length as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_byte_round_trip() {
        let byte = 0xD1;
        let flags = RecordFlags::from_byte(byte);

        assert!(flags.message_begin);
        assert!(flags.message_end);
        assert!(!flags.chunked);
        assert!(flags.short_record);
        assert!(!flags.has_id_length);
        assert_eq!(flags.to_byte(byte & TNF_MASK), byte);
    }

    #[test]
    fn every_flag_has_its_own_bit() {
        let flags = RecordFlags {
            message_begin: false,
            message_end: false,
            chunked: true,
            short_record: false,
            has_id_length: true,
        };

        assert_eq!(flags.to_byte(0x06), 0b0010_1110);
    }

    #[test]
    fn header_lengths() {
        let header = NdefHeader {
            flags: RecordFlags::from_byte(0x19),
            type_name_format: 1,
            type_length: 1,
            payload_length: 5,
            id_length: Some(2),
        };

        assert_eq!(header.encoded_len(), 4);
        assert_eq!(header.body_len(), 8);
    }
}
