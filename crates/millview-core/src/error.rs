//! Error handling for MillView
//!
//! The toolpath compiler and kinematic queries never fail; these types cover
//! the edges of the system instead:
//! - G-Code errors (template lookup, program files)
//! - I/O errors raised by the front end
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// G-Code error type
///
/// Represents errors raised while locating or loading G-Code programs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GcodeError {
    /// No built-in template with the requested id
    #[error("Unknown template: {id}")]
    UnknownTemplate {
        /// The template id that was requested.
        id: String,
    },

    /// Program file could not be used
    #[error("File error: {reason}")]
    FileError {
        /// The reason the file could not be used.
        reason: String,
    },
}

/// Main error type for MillView
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// G-Code error
    #[error(transparent)]
    Gcode(#[from] GcodeError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a G-Code error
    pub fn is_gcode_error(&self) -> bool {
        matches!(self, Error::Gcode(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gcode_error_display() {
        let err = GcodeError::UnknownTemplate {
            id: "helix".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown template: helix");

        let err = GcodeError::FileError {
            reason: "not a file".to_string(),
        };
        assert_eq!(err.to_string(), "File error: not a file");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = GcodeError::UnknownTemplate {
            id: "x".to_string(),
        }
        .into();
        assert!(err.is_gcode_error());
        assert_eq!(err.to_string(), "Unknown template: x");

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(!err.is_gcode_error());
        assert!(err.to_string().starts_with("I/O error"));
    }
}
