use thiserror::Error;

/// Errors surfaced by the fallible parts of the core.
///
/// Register accesses and dot stepping never fail; only restoring a save-state
/// stream can, and only when the stream itself is structurally broken.
#[derive(Debug, Error)]
pub enum Error {
    /// Fewer than eight bytes remain where a chunk header was expected.
    #[error("truncated chunk header at offset {offset}")]
    TruncatedHeader { offset: usize },
    /// A chunk advertises more payload than the stream holds.
    #[error("chunk {tag:?} at offset {offset} claims {len} bytes, {available} available")]
    TruncatedChunk {
        tag: [u8; 4],
        offset: usize,
        len: usize,
        available: usize,
    },
    /// A chunk payload carried no version byte.
    #[error("chunk {tag:?} has an empty payload")]
    EmptyChunk { tag: [u8; 4] },
    /// A known chunk carries a version this build cannot read.
    #[error("chunk {tag:?} has unsupported version {version}")]
    UnsupportedVersion { tag: [u8; 4], version: u8 },
    #[error("postcard: {0}")]
    Postcard(#[from] postcard::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
