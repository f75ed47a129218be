//! Request pipeline: classify, materialize, assemble, invoke, validate.
//!
//! A [`Pipeline`] holds the process-wide collaborators and the constant system
//! instruction. Every call works on its own artifact and payload; nothing is
//! shared between requests and nothing is retried.

pub mod assemble;
pub mod classify;
pub mod materialize;
pub mod validate;

pub use assemble::assemble;
pub use classify::{classify, Strategy};
pub use materialize::materialize;
pub use validate::validate;

use crate::ai::ModelService;
use crate::extract::ExtractionService;
use crate::models::{FormatRequest, FormatResponse, InputArtifact, Instructions, RequestPayload};
use crate::{prompts, Error, Result};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

/// Per-request lifecycle, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Classified,
    Materialized,
    Assembled,
    Invoked,
    Validated,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

pub struct Pipeline {
    model: Arc<dyn ModelService>,
    extractor: Arc<dyn ExtractionService>,
    system_instruction: &'static str,
}

impl Pipeline {
    pub fn new(model: Arc<dyn ModelService>, extractor: Arc<dyn ExtractionService>) -> Self {
        Self {
            model,
            extractor,
            system_instruction: prompts::SYSTEM_INSTRUCTION,
        }
    }

    pub fn system_instruction(&self) -> &str {
        self.system_instruction
    }

    /// Validate a raw transport request and produce the formatted document.
    pub async fn format(&self, request: FormatRequest) -> Result<FormatResponse> {
        let span = info_span!("format_request", request_id = %Uuid::new_v4());
        async move {
            let (artifact, instructions) = Self::accept(request)?;
            let formatted_content = self.run(&artifact, &instructions).await?;
            Ok::<_, Error>(FormatResponse { formatted_content })
        }
        .instrument(span)
        .await
    }

    /// Same checks as [`Pipeline::format`], but stop before calling the model.
    pub async fn prepare(&self, request: FormatRequest) -> Result<RequestPayload> {
        let span = info_span!("prepare_request", request_id = %Uuid::new_v4());
        async move {
            let (artifact, instructions) = Self::accept(request)?;
            self.build_payload(&artifact, &instructions).await
        }
        .instrument(span)
        .await
    }

    /// Checks run in a fixed order: unsupported file type, instructions, then
    /// the single-artifact rule.
    fn accept(request: FormatRequest) -> Result<(InputArtifact, Instructions)> {
        debug!(stage = %Stage::Received, "Request received");

        if let Some(file) = &request.file {
            if classify(Some(&file.mime_type)) == Strategy::Unsupported {
                info!("Rejected unsupported media type {}", file.mime_type);
                return Err(Error::UnsupportedMediaType {
                    mime_type: file.mime_type.clone(),
                });
            }
        }

        let instructions = Instructions::new(request.instructions.as_deref())?;
        let artifact = InputArtifact::from_parts(
            request.text,
            request.file.map(|f| (f.mime_type, f.bytes)),
        )?;

        Ok((artifact, instructions))
    }

    /// Classify, materialize and assemble. The only I/O is DOCX extraction.
    pub async fn build_payload(
        &self,
        artifact: &InputArtifact,
        instructions: &Instructions,
    ) -> Result<RequestPayload> {
        let strategy = classify(artifact.mime_type());
        debug!(stage = %Stage::Classified, %strategy, bytes = artifact.len(), "Artifact classified");

        if strategy == Strategy::Unsupported {
            return Err(Error::UnsupportedMediaType {
                mime_type: artifact.mime_type().unwrap_or_default().to_string(),
            });
        }

        let content = materialize(artifact, strategy, self.extractor.as_ref())
            .await
            .map_err(|e| {
                error!("Materialization failed: {}", e);
                e
            })?;
        debug!(stage = %Stage::Materialized, "Content part ready");

        let payload = assemble(instructions, content);
        debug!(stage = %Stage::Assembled, parts = payload.parts().len(), "Payload assembled");

        Ok(payload)
    }

    /// Full pipeline for an already-validated artifact and instructions.
    pub async fn run(&self, artifact: &InputArtifact, instructions: &Instructions) -> Result<String> {
        let payload = self.build_payload(artifact, instructions).await?;

        let output = self
            .model
            .generate(&payload, self.system_instruction)
            .await
            .map_err(|e| {
                error!("Model invocation failed: {}", e);
                match e {
                    Error::ModelInvocation(_) => e,
                    other => Error::ModelInvocation(other.to_string()),
                }
            })?;
        debug!(stage = %Stage::Invoked, "Model answered");

        let text = validate(output).map_err(|e| {
            error!("Model response rejected: {}", e);
            e
        })?;
        debug!(stage = %Stage::Validated, "Response validated");

        info!("Formatted document ready ({} chars)", text.chars().count());
        Ok(text)
    }
}
