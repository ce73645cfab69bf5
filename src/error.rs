//! Error types for query binding.

use std::fmt::Display;

use thiserror::Error;

use crate::coerce::ScalarKind;

/// Errors that can occur while binding or emitting query parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The text is not a valid number for the target kind.
    #[error("Invalid {kind} value: {value:?}")]
    InvalidNumber {
        /// The numeric kind the text was coerced into.
        kind: ScalarKind,
        /// The offending text.
        value: String,
    },

    /// The text is not one of the accepted boolean forms.
    #[error("Invalid boolean value: {0:?}")]
    InvalidBoolean(String),

    /// The field kind cannot be bound from or rendered into a query string.
    #[error("Unsupported field kind: {0}")]
    UnsupportedKind(&'static str),

    /// The referrer or request URL carries a malformed query string.
    #[error("Malformed URL: {0}")]
    MalformedUrl(String),

    /// The raw request head could not be parsed.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// A message raised by serde-derived code, such as an unknown enum variant.
    #[error("{0}")]
    Custom(String),
}

impl serde::de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}
