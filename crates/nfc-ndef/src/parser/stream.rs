use winnow::{Bytes, Partial, stream::Stream as _};

/// Input for the record parsers, partial so a short buffer reports how much is missing
pub type Stream<'i> = Partial<&'i Bytes>;

pub fn new(b: &[u8]) -> Stream<'_> {
    Partial::new(Bytes::new(b))
}

pub trait StreamExt<'i> {
    /// Bytes not consumed yet
    fn remaining(&self) -> usize;

    /// The unconsumed bytes, borrowed from the original buffer
    fn rest(&self) -> &'i [u8];
}

impl<'i> StreamExt<'i> for Stream<'i> {
    fn remaining(&self) -> usize {
        self.eof_offset()
    }

    fn rest(&self) -> &'i [u8] {
        let bytes: &'i Bytes = (*self).into_inner();
        bytes
    }
}
