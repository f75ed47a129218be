//! Transport-facing wrapper around the pipeline.
//!
//! Builds the process-wide collaborators once from [`Config`], applies the
//! upload size ceiling, loads local files, and renders errors into the
//! `{ error, details }` shape transports return.

use crate::ai::{GeminiModelClient, MockModelClient, ModelService};
use crate::extract::{DocxExtractor, ExtractionService};
use crate::mime;
use crate::models::{
    Config, ErrorResponse, FormatRequest, FormatResponse, RequestPayload, UploadedFile,
};
use crate::pipeline::Pipeline;
use crate::{Error, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct App {
    pipeline: Pipeline,
    options: AppOptions,
}

/// Injectable collaborator bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub model: Arc<dyn ModelService>,
    pub extractor: Arc<dyn ExtractionService>,
}

#[derive(Debug, Clone, Copy)]
pub struct AppOptions {
    pub max_upload_bytes: u64,
    pub dry_run: bool,
}

impl From<&Config> for AppOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_upload_bytes: config.max_upload_bytes,
            dry_run: config.dry_run,
        }
    }
}

impl App {
    pub fn with_services(services: AppServices, options: AppOptions) -> Self {
        Self {
            pipeline: Pipeline::new(services.model, services.extractor),
            options,
        }
    }

    /// Construct an app from validated configuration.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let model: Arc<dyn ModelService> = if config.dry_run {
            info!("DRY_RUN enabled, requests are assembled but never sent to the model");
            Arc::new(MockModelClient::new())
        } else {
            let api_key = config
                .gemini_api_key
                .clone()
                .ok_or_else(|| Error::Config("GEMINI_API_KEY not set".to_string()))?;
            info!("Model provider: Gemini (model: {})", config.gemini_model);
            Arc::new(
                GeminiModelClient::new(
                    api_key,
                    config.gemini_model.clone(),
                    Duration::from_secs(config.model_timeout_secs),
                )
                .with_base_url(config.gemini_base_url.clone()),
            )
        };

        Ok(Self::with_services(
            AppServices {
                model,
                extractor: Arc::new(DocxExtractor::new()),
            },
            AppOptions::from(config),
        ))
    }

    pub fn is_dry_run(&self) -> bool {
        self.options.dry_run
    }

    pub fn system_instruction(&self) -> &str {
        self.pipeline.system_instruction()
    }

    /// Read a local file as an upload. The MIME type comes from the override
    /// or the file extension, never from the bytes.
    pub async fn load_file(&self, path: &Path, mime_override: Option<&str>) -> Result<UploadedFile> {
        let size = tokio::fs::metadata(path).await?.len();
        self.check_size(size)?;

        let bytes = tokio::fs::read(path).await?;
        let mime_type = mime_override
            .map(str::to_string)
            .unwrap_or_else(|| mime::guess_from_path(path).to_string());

        info!(
            "Loaded {} ({} bytes, {})",
            path.display(),
            bytes.len(),
            mime_type
        );

        Ok(UploadedFile {
            file_name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            mime_type,
            bytes,
        })
    }

    /// Run the full pipeline, including the model call.
    pub async fn format(&self, request: FormatRequest) -> Result<FormatResponse> {
        if self.options.dry_run {
            return Err(Error::DryRun);
        }
        self.check_request(&request)?;
        self.pipeline.format(request).await
    }

    /// Build the request payload only.
    pub async fn preview(&self, request: FormatRequest) -> Result<RequestPayload> {
        self.check_request(&request)?;
        self.pipeline.prepare(request).await
    }

    /// [`App::format`] with errors rendered for a transport.
    pub async fn respond(
        &self,
        request: FormatRequest,
    ) -> std::result::Result<FormatResponse, ErrorResponse> {
        self.format(request)
            .await
            .map_err(|e| ErrorResponse::from(&e))
    }

    fn check_request(&self, request: &FormatRequest) -> Result<()> {
        if let Some(file) = &request.file {
            self.check_size(file.bytes.len() as u64)?;
        }
        if let Some(text) = &request.text {
            self.check_size(text.len() as u64)?;
        }
        Ok(())
    }

    fn check_size(&self, size: u64) -> Result<()> {
        if size > self.options.max_upload_bytes {
            return Err(Error::ArtifactTooLarge {
                size,
                limit: self.options.max_upload_bytes,
            });
        }
        Ok(())
    }
}
