//! Error types shared by every transform and by the block packager.

use thiserror::Error;

/// Everything that can go wrong while decoding a block or moving blocks through files.
///
/// Encoding a block never fails; only decoding and file I/O can.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The encoded data does not have the structure the transform expects. A pipeline that
    /// differs from the one used for encoding also ends up here.
    #[error("corrupt data: {0}")]
    CorruptData(String),

    /// A stage or option name that the pipeline parser does not know.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// An I/O error while reading or writing block frames.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// Shorthand used by the decoders.
    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        CodecError::CorruptData(msg.into())
    }
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, CodecError>;
