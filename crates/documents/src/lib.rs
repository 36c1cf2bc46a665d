//! Document context for PdfChat
//!
//! Extracts the text of the reference PDF on first use and serves the cached
//! text for the rest of the process lifetime. The document is never re-read:
//! a changed file is only picked up after a restart.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::OnceCell;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Document not found at {0}")]
    NotFound(String),

    #[error("Document read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document extraction error: {0}")]
    Extraction(String),
}

impl From<DocumentError> for pdfchat_common::Error {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::NotFound(_) => pdfchat_common::Error::NotFound(err.to_string()),
            DocumentError::Io(_) | DocumentError::Extraction(_) => {
                pdfchat_common::Error::Internal(err.to_string())
            }
        }
    }
}

/// Turns raw document bytes into per-page text, in document order.
pub trait TextExtractor: Send + Sync + 'static {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, DocumentError>;
}

/// PDF extractor backed by `pdf-extract`
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, DocumentError> {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
            .map_err(|e| DocumentError::Extraction(e.to_string()))
    }
}

/// Lazily extracted, process-wide document text.
pub struct DocumentContext {
    path: PathBuf,
    extractor: Arc<dyn TextExtractor>,
    text: OnceCell<Arc<str>>,
}

impl std::fmt::Debug for DocumentContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentContext")
            .field("path", &self.path)
            .field("loaded", &self.text.initialized())
            .finish()
    }
}

impl DocumentContext {
    /// Context over a PDF file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_extractor(path, Arc::new(PdfTextExtractor))
    }

    /// Context over a file read by a custom extractor
    pub fn with_extractor(path: impl Into<PathBuf>, extractor: Arc<dyn TextExtractor>) -> Self {
        Self {
            path: path.into(),
            extractor,
            text: OnceCell::new(),
        }
    }

    /// Return the document text, extracting it on the first call.
    ///
    /// Concurrent first callers wait for a single extraction. A failed
    /// extraction leaves the cache empty so a later call tries again.
    pub async fn get_context(&self) -> Result<Arc<str>, DocumentError> {
        self.text.get_or_try_init(|| self.load()).await.cloned()
    }

    async fn load(&self) -> Result<Arc<str>, DocumentError> {
        let path = self.path.clone();
        let extractor = Arc::clone(&self.extractor);

        tracing::info!(path = %path.display(), "Loading document context");

        let text = tokio::task::spawn_blocking(move || load_text(&path, extractor.as_ref()))
            .await
            .map_err(|e| DocumentError::Extraction(format!("extraction task failed: {}", e)))??;

        tracing::info!(chars = text.len(), "Document context loaded");
        Ok(Arc::from(text))
    }
}

fn load_text(path: &Path, extractor: &dyn TextExtractor) -> Result<String, DocumentError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DocumentError::NotFound(path.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let pages = extractor.extract_pages(&bytes)?;
    tracing::debug!(pages = pages.len(), "Extracted document pages");

    // Pages without text contribute nothing
    Ok(pages.into_iter().filter(|page| !page.is_empty()).collect())
}
