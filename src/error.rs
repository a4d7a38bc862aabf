//! Error handling for breath-trim
//!
//! Every failure is detected at the codec, analysis or config boundary and
//! propagated upward unchanged. The orchestrator collapses it to a status code.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for breath-trim operations
pub type Result<T> = std::result::Result<T, TrimError>;

/// Main error type for breath-trim operations
#[derive(Error, Debug)]
pub enum TrimError {
    // Container Errors
    #[error("Malformed audio file: {reason}")]
    Format { reason: String },

    #[error("Audio file contains no data")]
    NoData,

    // Analysis Errors
    #[error("Empty input: {what}")]
    EmptyInput { what: &'static str },

    // Configuration Errors
    #[error("Invalid parameter {param} = {value} (expected {expected})")]
    InvalidParameter {
        param: String,
        value: String,
        expected: String,
    },

    #[error("Config parse error: {0}")]
    Serialization(#[from] serde_json::Error),

    // I/O Errors
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TrimError {
    pub(crate) fn format(reason: impl Into<String>) -> Self {
        TrimError::Format {
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TrimError::Io {
            path: path.into(),
            source,
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            TrimError::Format { .. } => "FORMAT_ERROR",
            TrimError::NoData => "NO_DATA",
            TrimError::EmptyInput { .. } => "EMPTY_INPUT",
            TrimError::InvalidParameter { .. } => "INVALID_PARAMETER",
            TrimError::Serialization(_) => "SERIALIZATION_ERROR",
            TrimError::Io { .. } => "IO_ERROR",
        }
    }

    /// Integer status reported to the host application. Never zero.
    pub fn status_code(&self) -> i32 {
        match self {
            TrimError::NoData => 1,
            TrimError::Format { .. } => 2,
            TrimError::Io { .. } => 3,
            TrimError::EmptyInput { .. } => 4,
            TrimError::InvalidParameter { .. } | TrimError::Serialization(_) => 5,
        }
    }

    /// Get a recovery suggestion for this error, if there is one
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            TrimError::Format { .. } => {
                Some("Only 16-bit PCM WAV recordings are supported; re-export the file.")
            }
            TrimError::NoData => Some("The recording is empty; record the test again."),
            TrimError::Io { .. } => Some("Check the file path and permissions."),
            TrimError::InvalidParameter { .. } | TrimError::Serialization(_) => {
                Some("Fix the configuration file or fall back to the defaults.")
            }
            TrimError::EmptyInput { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = TrimError::NoData;
        assert_eq!(err.error_code(), "NO_DATA");
        assert_eq!(err.status_code(), 1);
    }

    #[test]
    fn test_status_codes_are_nonzero() {
        let errors = vec![
            TrimError::format("bad tag"),
            TrimError::NoData,
            TrimError::io(
                "a.wav",
                std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            ),
            TrimError::EmptyInput { what: "envelope" },
            TrimError::InvalidParameter {
                param: "chunk_size".to_string(),
                value: "0".to_string(),
                expected: ">= 1".to_string(),
            },
        ];
        for err in errors {
            assert_ne!(err.status_code(), 0, "{}", err);
        }
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = TrimError::io(
            "/nowhere/breath.wav",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().contains("/nowhere/breath.wav"));
        assert!(err.recovery_suggestion().is_some());
    }
}
