//! Error handling for the lrptdemod library
//!
//! This module provides a unified error type for all operations in the
//! demodulator, including I/O operations, argument validation, and sample
//! format handling. Every error is terminal for a run: this is a stream
//! processing tool, not a long-lived service, so there is no in-process
//! recovery and no retry logic.

use std::fmt;
use std::io;

/// A specialized Result type for lrptdemod operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for lrptdemod operations
#[derive(Debug)]
pub enum Error {
    /// I/O error (file open, read, or output block flush)
    Io(io::Error),

    /// Invalid command-line argument (bad sample rate, unknown format name)
    Argument(String),

    /// Invalid I/Q sample format or conversion error
    Format(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Argument(msg) => write!(f, "Argument error: {}", msg),
            Error::Format(msg) => write!(f, "Format error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

// From conversion so `?` lifts raw I/O failures into the crate error

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

// Helper constructors for common error scenarios

impl Error {
    /// Create an argument error with a custom message
    pub fn argument<S: Into<String>>(msg: S) -> Self {
        Error::Argument(msg.into())
    }

    /// Create a format error with a custom message
    pub fn format<S: Into<String>>(msg: S) -> Self {
        Error::Format(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_argument_error_constructor() {
        let err = Error::argument("sample rate must not be zero");
        assert!(matches!(err, Error::Argument(_)));
        assert!(err.to_string().contains("Argument error"));
    }

    #[test]
    fn test_format_error_constructor() {
        let err = Error::format("invalid format");
        assert!(matches!(err, Error::Format(_)));
        assert!(err.to_string().contains("Format error"));
    }

    #[test]
    fn test_error_source() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = Error::Io(io_err);
        assert!(err.source().is_some());
    }
}
