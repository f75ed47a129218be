//! Error handling and custom error types
//!
//! Every failure a request can hit is a variant of [`Error`]. Transports render
//! it with [`Error::user_message`] (short, human readable), the `Display`
//! string (detail) and [`Error::status_code`].

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Formatting instructions are required")]
    MissingInstructions,

    #[error("No document supplied: provide a file or pasted text")]
    MissingContent,

    #[error("Both a file and pasted text were supplied; send exactly one")]
    ConflictingContent,

    #[error("Unsupported media type '{mime_type}'")]
    UnsupportedMediaType { mime_type: String },

    #[error("Failed to extract document text: {0}")]
    ContentExtraction(String),

    #[error("Model invocation failed: {0}")]
    ModelInvocation(String),

    #[error("Model returned an empty response")]
    EmptyModelResponse,

    #[error("Document is {size} bytes, limit is {limit} bytes")]
    ArtifactTooLarge { size: u64, limit: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model calls are disabled in dry-run mode")]
    DryRun,
}

impl Error {
    /// Short message suitable for showing to the person who submitted the document.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::MissingInstructions => "Please provide formatting instructions.",
            Error::MissingContent => "Please upload a file or paste some text.",
            Error::ConflictingContent => "Please provide either a file or pasted text, not both.",
            Error::UnsupportedMediaType { .. } => {
                "Unsupported file type. Use PDF, an image, DOCX, or plain text."
            }
            Error::ContentExtraction(_) => "Could not read the text of the uploaded document.",
            Error::ModelInvocation(_) => "Failed to format document.",
            Error::EmptyModelResponse => "The model returned no formatted content.",
            Error::ArtifactTooLarge { .. } => "The uploaded document is too large.",
            Error::DryRun => "The formatter is in dry-run mode and does not call the model.",
            Error::Io(_) | Error::Serialization(_) | Error::Config(_) => "Internal error.",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingInstructions | Error::MissingContent | Error::ConflictingContent => {
                StatusCode::BAD_REQUEST
            }
            Error::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Error::ArtifactTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Error::ContentExtraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::ModelInvocation(_) | Error::EmptyModelResponse => StatusCode::BAD_GATEWAY,
            Error::DryRun => StatusCode::SERVICE_UNAVAILABLE,
            Error::Io(_) | Error::Serialization(_) | Error::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// True for failures caused by the request itself rather than a collaborator.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
