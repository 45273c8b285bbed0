use crate::NdefError;

/// Type Name Format, the 3 bit namespace selector of a record's type field
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, strum::Display, strum::EnumIter, uniffi::Enum,
)]
pub enum Tnf {
    Empty,
    WellKnown,
    Mime,
    AbsoluteUri,
    External,
    Unknown,
    Unchanged,
}

impl Tnf {
    pub fn bits(self) -> u8 {
        match self {
            Tnf::Empty => 0x00,
            Tnf::WellKnown => 0x01,
            Tnf::Mime => 0x02,
            Tnf::AbsoluteUri => 0x03,
            Tnf::External => 0x04,
            Tnf::Unknown => 0x05,
            Tnf::Unchanged => 0x06,
        }
    }

    /// Whether records of this format must carry a non-empty type field
    pub fn requires_type(self) -> bool {
        matches!(self, Tnf::WellKnown | Tnf::Mime | Tnf::AbsoluteUri | Tnf::External)
    }
}

impl TryFrom<u8> for Tnf {
    type Error = NdefError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        let tnf = match bits {
            0x00 => Tnf::Empty,
            0x01 => Tnf::WellKnown,
            0x02 => Tnf::Mime,
            0x03 => Tnf::AbsoluteUri,
            0x04 => Tnf::External,
            0x05 => Tnf::Unknown,
            0x06 => Tnf::Unchanged,
            other => return Err(NdefError::format(format!("reserved TNF value {other:#04x}"))),
        };

        Ok(tnf)
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator as _;

    use super::*;

    #[test]
    fn bits_round_trip() {
        for tnf in Tnf::iter() {
            assert_eq!(Tnf::try_from(tnf.bits()).unwrap(), tnf);
        }
    }

    #[test]
    fn reserved_value_is_rejected() {
        assert!(matches!(Tnf::try_from(0x07), Err(NdefError::InvalidFormat(_))));
    }
}
