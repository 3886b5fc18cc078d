//! Error types for loading site documents.
//!
//! The transformations themselves never fail: the plan parser degrades to
//! empty fields and unsupported geometries pass through. Errors arise only
//! around them, when a document cannot be fetched or decoded, or when the
//! site configuration is invalid. The loader logs these and carries on with
//! the affected layer missing.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for site loading.
#[derive(Debug, Error)]
pub enum SiteError {
    /// I/O errors (document read, path issues, permissions)
    #[error(transparent)]
    Io(#[from] IoError),

    /// Document decoding errors
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Errors from document sources outside this crate
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// I/O related errors.
#[derive(Debug, Error)]
pub enum IoError {
    /// Failed to read a document
    #[error("Failed to read {format} document '{path}': {source}")]
    Read {
        /// The document format (e.g., "`GeoJSON`", "CSV")
        format: String,
        /// The document path
        path: PathBuf,
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to write an output file
    #[error("Failed to write {format} file '{path}': {source}")]
    Write {
        /// The output format
        format: String,
        /// The file path
        path: PathBuf,
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Document was not found
    #[error("Document not found: '{path}'")]
    NotFound {
        /// The missing document path
        path: PathBuf,
    },
}

/// Document decoding errors.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Failed to parse a document
    #[error("Failed to parse {format} document '{path}': {message}")]
    Parse {
        /// The format being parsed
        format: String,
        /// The document path
        path: String,
        /// Description of the parse error
        message: String,
    },

    /// The document parsed but holds the wrong kind of object
    #[error("Expected a {expected} in '{path}', found a {found}")]
    UnexpectedKind {
        /// The document path
        path: String,
        /// Expected object kind
        expected: String,
        /// Object kind found
        found: String,
    },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid option value
    #[error("Invalid {option} option: {message}")]
    InvalidOption {
        /// The option name
        option: String,
        /// Why it's invalid
        message: String,
    },

    /// Required option is missing
    #[error("Missing required option: {option}")]
    MissingRequired {
        /// The missing option name
        option: String,
    },
}

/// Type alias for Results using `SiteError`.
pub type Result<T> = std::result::Result<T, SiteError>;

impl SiteError {
    /// Get a user-friendly error message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Io(e) => e.user_message(),
            Self::Format(e) => format!("Format error: {e}"),
            Self::Config(e) => format!("Configuration error: {e}"),
            Self::Other(e) => format!("Error: {e}"),
        }
    }

    /// Get recovery suggestions if available.
    #[must_use]
    pub fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::Io(e) => e.recovery_suggestion(),
            Self::Format(FormatError::Parse { .. }) => {
                Some("Check that the document is valid GeoJSON.".to_string())
            },
            Self::Format(FormatError::UnexpectedKind { .. }) => {
                Some("Export the layer as a GeoJSON FeatureCollection.".to_string())
            },
            Self::Config(_) => {
                Some("Run 'ustorp --help' to see the accepted options.".to_string())
            },
            Self::Other(_) => None,
        }
    }

    /// Check if this error is potentially recoverable by the user.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Io(IoError::NotFound { .. }))
    }
}

impl IoError {
    fn user_message(&self) -> String {
        match self {
            Self::Read { format, path, .. } => {
                format!("Failed to read {} document: {}", format, path.display())
            },
            Self::Write { format, path, .. } => {
                format!("Failed to write {} file: {}", format, path.display())
            },
            Self::NotFound { path } => {
                format!("Document not found: {}", path.display())
            },
        }
    }

    fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::NotFound { .. } => {
                Some("Check the data directory and the document paths.".to_string())
            },
            Self::Read { .. } | Self::Write { .. } => {
                Some("Check file permissions and ensure you have access.".to_string())
            },
        }
    }
}

/// Extension trait for adding I/O context to errors.
pub trait IoErrorExt<T> {
    /// Add read context to an error.
    ///
    /// # Errors
    ///
    /// Returns an [`IoError::Read`] if the underlying operation fails.
    fn with_read_context(self, format: &str, path: impl Into<PathBuf>) -> Result<T>;

    /// Add write context to an error.
    ///
    /// # Errors
    ///
    /// Returns an [`IoError::Write`] if the underlying operation fails.
    fn with_write_context(self, format: &str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T, E> IoErrorExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_read_context(self, format: &str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| {
            SiteError::Io(IoError::Read {
                format: format.to_string(),
                path: path.into(),
                source: Box::new(e),
            })
        })
    }

    fn with_write_context(self, format: &str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| {
            SiteError::Io(IoError::Write {
                format: format.to_string(),
                path: path.into(),
                source: Box::new(e),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_context_wraps_source() {
        let failed: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));

        let err = failed
            .with_read_context("GeoJSON", "data/habitat.geojson")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to read GeoJSON document 'data/habitat.geojson': denied"
        );
        assert_eq!(
            err.user_message(),
            "Failed to read GeoJSON document: data/habitat.geojson"
        );
        assert!(err.recovery_suggestion().is_some());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_format_error_messages() {
        let err = SiteError::from(FormatError::UnexpectedKind {
            path: "borders.json".to_string(),
            expected: "FeatureCollection".to_string(),
            found: "Geometry".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Expected a FeatureCollection in 'borders.json', found a Geometry"
        );
        assert!(err.user_message().starts_with("Format error: "));
    }

    #[test]
    fn test_config_errors_are_recoverable() {
        let err = SiteError::from(ConfigError::MissingRequired {
            option: "data-dir".to_string(),
        });
        assert!(err.is_recoverable());
        assert_eq!(
            err.user_message(),
            "Configuration error: Missing required option: data-dir"
        );
    }

    #[test]
    fn test_not_found_is_recoverable() {
        let err = SiteError::from(IoError::NotFound {
            path: PathBuf::from("plans/7.csv"),
        });
        assert!(err.is_recoverable());
        assert_eq!(err.user_message(), "Document not found: plans/7.csv");
    }
}
