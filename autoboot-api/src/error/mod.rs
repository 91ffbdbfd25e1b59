//! Error handling module for collaborator operations

use alloc::format;
use alloc::string::{String, ToString};
use core::fmt;

/// Common error type returned by collaborator operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid argument
    InvalidArgument(String),
    /// Resource not found
    NotFound(String),
    /// Malformed identifier or value
    ParseError(String),
    /// Account subsystem failure
    AccountError(String),
    /// Volume could not be mounted or accessed
    VolumeError(String),
    /// Launch primitive rejected the request
    LaunchError(String),
    /// I/O error
    IoError(String),
    /// Configuration error
    ConfigError(String),
    /// Operation not supported by this platform binding
    Unsupported(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::ParseError(msg) => write!(f, "Parse error: {}", msg),
            Error::AccountError(msg) => write!(f, "Account error: {}", msg),
            Error::VolumeError(msg) => write!(f, "Volume error: {}", msg),
            Error::LaunchError(msg) => write!(f, "Launch error: {}", msg),
            Error::IoError(msg) => write!(f, "I/O error: {}", msg),
            Error::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Error::Unsupported(msg) => write!(f, "Unsupported: {}", msg),
        }
    }
}

impl core::error::Error for Error {}

/// Result type for operations that can fail
pub type Result<T> = core::result::Result<T, Error>;

/// Error context trait for adding context to errors
pub trait ErrorContext<T> {
    /// Prefixes the error message with `context`, keeping the error kind
    fn context(self, context: &str) -> Result<T>;
}

impl<T> ErrorContext<T> for Result<T> {
    fn context(self, context: &str) -> Result<T> {
        self.map_err(|error| error.with_context(context))
    }
}

impl Error {
    fn with_context(self, context: &str) -> Self {
        let wrap = |msg: String| format!("{}: {}", context, msg);
        match self {
            Error::InvalidArgument(msg) => Error::InvalidArgument(wrap(msg)),
            Error::NotFound(msg) => Error::NotFound(wrap(msg)),
            Error::ParseError(msg) => Error::ParseError(wrap(msg)),
            Error::AccountError(msg) => Error::AccountError(wrap(msg)),
            Error::VolumeError(msg) => Error::VolumeError(wrap(msg)),
            Error::LaunchError(msg) => Error::LaunchError(wrap(msg)),
            Error::IoError(msg) => Error::IoError(wrap(msg)),
            Error::ConfigError(msg) => Error::ConfigError(wrap(msg)),
            Error::Unsupported(msg) => Error::Unsupported(wrap(msg)),
        }
    }
}

/// Creates a new not found error
pub fn not_found(msg: &str) -> Error {
    Error::NotFound(msg.to_string())
}

/// Creates a new account error
pub fn account_error(msg: &str) -> Error {
    Error::AccountError(msg.to_string())
}

/// Creates a new volume error
pub fn volume_error(msg: &str) -> Error {
    Error::VolumeError(msg.to_string())
}

/// Creates a new launch error
pub fn launch_error(msg: &str) -> Error {
    Error::LaunchError(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_keeps_kind() {
        let result: Result<()> = Err(volume_error("slccmpt01"));
        let error = result.context("mount").unwrap_err();
        assert_eq!(error, Error::VolumeError("mount: slccmpt01".to_string()));
    }

    #[test]
    fn test_display() {
        let error = account_error("slot 3 not occupied");
        assert_eq!(error.to_string(), "Account error: slot 3 not occupied");
    }
}
