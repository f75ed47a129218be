//! Model collaborator integration
//!
//! Sends an assembled request payload plus the system instruction to a
//! generative model and returns whatever text it produced.

pub mod gemini;
pub mod mock;

pub use gemini::GeminiModelClient;
pub use mock::MockModelClient;

use crate::models::RequestPayload;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ModelService: Send + Sync {
    /// `Ok(None)` when the service answered but produced no text.
    async fn generate(
        &self,
        payload: &RequestPayload,
        system_instruction: &str,
    ) -> Result<Option<String>>;
}
