/// Errors raised by the encode/decode pipeline.
///
/// Every variant is fatal at the point it is raised: the whole run aborts,
/// with no retry and no partial-result salvage. The tool processes one file
/// in one pass and prioritizes detecting corruption over availability.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// zlib reported a non-success status while compressing a block.
    #[error("zlib compression failed: {0}")]
    Compression(String),

    /// zlib reported failure after exhausting the buffer-growth retry.
    #[error("zlib decompression failed: {0}")]
    Decompression(String),

    /// A decoded block's re-encoded, re-compressed bytes do not match the
    /// chunk as stored — the container is corrupt or the codec is buggy.
    #[error("block {block}: stored chunk does not match the re-encoded block")]
    Verification { block: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
