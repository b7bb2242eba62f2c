//! Error types for the wilaya pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for wilaya operations
pub type Result<T> = std::result::Result<T, WilayaError>;

/// Main error type for wilaya operations
///
/// Every variant is fatal for a run. Rows that are merely malformed never
/// surface here; loaders skip them.
#[derive(Error, Debug)]
pub enum WilayaError {
    /// An input file is missing or cannot be read
    #[error("Source unavailable: '{}': {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file cannot be parsed as a whole
    #[error("Malformed source '{}': {reason}", path.display())]
    MalformedSource { path: PathBuf, reason: String },

    /// A tariff entry carries a value that does not start with an integer
    #[error("Malformed tariff in entry '{key}': field '{field}' has value {value}")]
    MalformedTariff {
        key: String,
        field: String,
        value: String,
    },

    /// A written artifact does not hash to the bytes that were rendered
    #[error("Checksum mismatch for '{}': expected {expected}, found {actual}", path.display())]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WilayaError {
    /// Build a `SourceUnavailable` error for `path`
    pub fn source_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Build a `MalformedSource` error for `path`
    pub fn malformed_source(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedSource {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a `MalformedTariff` error
    pub fn malformed_tariff(
        key: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::MalformedTariff {
            key: key.into(),
            field: field.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_source_unavailable_message() {
        let err = WilayaError::source_unavailable(
            "data/communes.csv",
            std::io::Error::new(std::io::ErrorKind::NotFound, "No such file"),
        );
        let msg = err.to_string();
        assert!(msg.contains("data/communes.csv"));
        assert!(msg.contains("No such file"));
    }

    #[test]
    fn test_malformed_tariff_message() {
        let err = WilayaError::malformed_tariff("3", "tarif", "\"abc\"");
        assert_eq!(
            err.to_string(),
            "Malformed tariff in entry '3': field 'tarif' has value \"abc\""
        );
    }

    #[test]
    fn test_checksum_mismatch_message() {
        let err = WilayaError::ChecksumMismatch {
            path: PathBuf::from("wilayaData.json"),
            expected: "aa".to_string(),
            actual: "bb".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Checksum mismatch for 'wilayaData.json': expected aa, found bb"
        );
    }
}
