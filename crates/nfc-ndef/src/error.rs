use winnow::error::{ContextError, ErrMode, Needed};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum NdefError {
    /// Storage for a buffer of the requested length could not be reserved
    #[error("unable to allocate a buffer of {length} bytes")]
    AllocationFailure { length: u64 },

    /// Wire bytes violate the length, flag or TNF rules of the format
    #[error("invalid NDEF format: {0}")]
    InvalidFormat(String),

    /// Out of range index or disallowed argument combination
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// A well-known parser was given a record of another type
    #[error("expected a record of type {expected}, found {found}")]
    NotExpectedType { expected: String, found: String },

    /// An optional field or record is absent
    #[error("no data found: {0}")]
    NoDataFound(String),
}

impl NdefError {
    pub(crate) fn format(reason: impl Into<String>) -> Self {
        Self::InvalidFormat(reason.into())
    }

    pub(crate) fn param(reason: impl Into<String>) -> Self {
        Self::InvalidParam(reason.into())
    }

    pub(crate) fn not_expected_type(expected: &[u8], found: &[u8]) -> Self {
        Self::NotExpectedType {
            expected: String::from_utf8_lossy(expected).to_string(),
            found: String::from_utf8_lossy(found).to_string(),
        }
    }

    /// Convert a parser error raised while reading a complete, in-memory buffer
    ///
    /// Running out of input is a truncated record here, never a request for more data
    pub(crate) fn from_parser(error: ErrMode<ContextError>, what: &str) -> Self {
        match error {
            ErrMode::Incomplete(Needed::Size(needed)) => Self::InvalidFormat(format!(
                "{what} is truncated, {needed} more byte(s) required"
            )),
            ErrMode::Incomplete(Needed::Unknown) => {
                Self::InvalidFormat(format!("{what} is truncated"))
            }
            ErrMode::Backtrack(error) | ErrMode::Cut(error) => {
                Self::InvalidFormat(format!("unable to parse {what}: {error}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;

    #[test]
    fn truncation_is_reported_as_invalid_format() {
        let needed = NonZeroUsize::new(3).unwrap();
        let error = NdefError::from_parser(ErrMode::Incomplete(Needed::Size(needed)), "record");

        assert_eq!(
            error,
            NdefError::InvalidFormat("record is truncated, 3 more byte(s) required".into())
        );
    }

    #[test]
    fn not_expected_type_keeps_both_types() {
        let error = NdefError::not_expected_type(b"T", b"U");
        assert_eq!(error.to_string(), "expected a record of type T, found U");
    }
}
