//! Document sources for the site loader.
//!
//! The loader asks a [`DocumentSource`] for documents by site-relative path.
//! A source answers with the document text, with `None` when the document
//! does not exist, or with an error when the fetch itself failed. Missing
//! documents are a normal outcome: most habitat areas have no management
//! plan.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;

use crate::error::{IoErrorExt, Result};

/// Trait for fetching site documents.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetches the document at `path`.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the document does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the document exists but cannot be read.
    async fn fetch(&self, path: &str) -> Result<Option<String>>;
}

/// Reads documents from a local data directory.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD rather than
/// failing the read.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

#[async_trait]
impl DocumentSource for FsSource {
    async fn fetch(&self, path: &str) -> Result<Option<String>> {
        let full_path = self.resolve(path);
        match tokio::fs::read(&full_path).await {
            Ok(bytes) => {
                debug!("Read {} bytes from {}", bytes.len(), full_path.display());
                Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No document at {}", full_path.display());
                Ok(None)
            },
            Err(err) => Err(err).with_read_context(document_format(path), full_path),
        }
    }
}

/// Format name of a document, from its extension.
pub(crate) fn document_format(path: &str) -> &'static str {
    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => "CSV",
        Some(ext) if ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("geojson") => {
            "GeoJSON"
        },
        _ => "unknown",
    }
}
