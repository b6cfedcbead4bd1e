//! Errors returned by the binary and text codecs.

use thiserror::Error;

/// Failure while encoding or decoding a container.
///
/// Decoding never leaves a container half-updated: on any of these errors the
/// target keeps the contents it had before the call.
#[derive(Error, Debug)]
pub enum Error {
    /// The binary codec rejected the input or could not encode a value.
    #[error("binary codec error: {0}")]
    Binary(#[from] bincode::Error),

    /// The JSON codec rejected the input or could not encode a value.
    #[error("json codec error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input decoded cleanly but describes an impossible container,
    /// e.g. an order list that does not match the key table.
    #[error("corrupt container data: {message}")]
    Corrupt {
        /// What was inconsistent.
        message: String,
    },
}

impl Error {
    pub(crate) fn corrupt(message: impl Into<String>) -> Self {
        Error::Corrupt {
            message: message.into(),
        }
    }
}

/// Result alias used by the codec entry points.
pub type Result<T> = std::result::Result<T, Error>;
