//! Document text extraction
//!
//! Turns word-processing documents into plain text before they are sent to
//! the model. PDFs and images are never extracted locally.

pub mod docx;
pub mod mock;

pub use docx::DocxExtractor;
pub use mock::MockExtractionClient;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ExtractionService: Send + Sync {
    /// Fails with `Error::ContentExtraction` for malformed documents; an
    /// empty document yields an empty string.
    async fn extract_text(&self, bytes: &[u8]) -> Result<String>;
}
