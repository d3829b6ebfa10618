//! Error types shared by the codecs in this crate.

use thiserror::Error;

/// Errors produced while encoding or decoding.
#[derive(Error, Debug)]
pub enum Error {
    /// The input was structurally valid but cannot be processed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The leading 32 bits are not the GRIN magic number.
    #[error("not a GRIN container: {}", describe_magic(.found))]
    FormatMismatch {
        /// The value found in place of the magic number, if 32 bits were available.
        found: Option<u32>,
    },

    /// The serialized tree is truncated or otherwise unreadable.
    #[error("malformed tree: {0}")]
    MalformedTree(String),

    /// The code stream ended in the middle of a symbol code.
    #[error("malformed code stream: {0}")]
    MalformedCode(String),

    /// The underlying storage could not be opened, read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_magic(found: &Option<u32>) -> String {
    match found {
        Some(value) => format!("found magic number {}", value),
        None => "stream is shorter than the magic number".to_string(),
    }
}

/// Result type for operations that may fail with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
