#[derive(Debug, Clone, PartialEq, Eq, uniffi::Error, thiserror::Error)]
pub enum ResumeError {
    /// The first chunk of the new read is not the same as the one read before
    #[error("first chunks do not match, this is a different tag")]
    ChunksDoNotMatch,

    #[error("the reader had already parsed the message")]
    AlreadyParsed,

    /// The bytes passed in need to cover at least one full chunk
    /// (`ReaderConfig::blocks_per_chunk` * `ReaderConfig::bytes_per_block`)
    #[error("chunk size mismatch, expected {expected}, got {actual}")]
    BlockSizeMismatch { expected: u32, actual: u32 },

    #[error("unable to get first chunk hash")]
    UnableToGetFirstChunkHash,
}
