//! Error types for thesisfmt library.

use std::io;
use thiserror::Error;

/// Result type alias for thesisfmt operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while checking or correcting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading or writing the zip container.
    #[error("Zip container error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Malformed XML in a document part.
    #[error("XML error: {0}")]
    Xml(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML rulebook could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file is not a Word (.docx) document.
    #[error("Unknown file format: not a valid .docx package")]
    UnknownFormat,

    /// A required package part is missing.
    #[error("Missing package part: {0}")]
    MissingPart(String),

    /// A measurement literal could not be understood.
    #[error("Invalid measurement: {0:?}")]
    InvalidMeasurement(String),

    /// Two units cannot be converted into each other.
    #[error("Cannot convert {from} to {to}")]
    UnitIncompatible {
        /// Source unit
        from: String,
        /// Requested unit
        to: String,
    },

    /// Classifier produced a category the registry does not know.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// A node type has no configuration at its path.
    #[error("Missing configuration at '{0}'")]
    ConfigMissing(String),

    /// A configuration fragment is malformed.
    #[error("Invalid configuration at '{path}': {reason}")]
    ConfigInvalid {
        /// Dotted configuration path
        path: String,
        /// What is wrong with it
        reason: String,
    },

    /// No live paragraph carries the node's fingerprint.
    #[error("No paragraph matches fingerprint {0}")]
    FingerprintUnmatched(String),

    /// Several paragraphs share one fingerprint.
    #[error("Duplicate fingerprint {0}")]
    DuplicateFingerprint(String),

    /// A whole classifier batch failed.
    #[error("Classifier batch failed: {0}")]
    ClassifierBatchFailure(String),

    /// A single classifier call failed.
    #[error("Classifier error: {0}")]
    Classifier(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for [`Error::ConfigInvalid`].
    pub fn config_invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::ConfigInvalid {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnitIncompatible {
            from: "char".to_string(),
            to: "cm".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot convert char to cm");

        let err = Error::config_invalid("headings.level_1", "unknown field `boldd`");
        assert_eq!(
            err.to_string(),
            "Invalid configuration at 'headings.level_1': unknown field `boldd`"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
