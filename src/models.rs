//! Data models and structures
//!
//! Defines the request-side types of the pipeline (artifacts, instructions,
//! content parts, payloads), the transport boundary shapes, and process
//! configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// The single document-like input of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputArtifact {
    Text(String),
    File { mime_type: String, bytes: Vec<u8> },
}

impl InputArtifact {
    /// Build the artifact from the optional pieces a transport received.
    ///
    /// Blank pasted text counts as absent. Supplying both a file and pasted
    /// text is rejected instead of silently picking one.
    pub fn from_parts(text: Option<String>, file: Option<(String, Vec<u8>)>) -> Result<Self> {
        let text = text.filter(|t| !t.trim().is_empty());
        match (text, file) {
            (None, None) => Err(Error::MissingContent),
            (Some(_), Some(_)) => Err(Error::ConflictingContent),
            (Some(text), None) => Ok(InputArtifact::Text(text)),
            (None, Some((mime_type, bytes))) => Ok(InputArtifact::File { mime_type, bytes }),
        }
    }

    /// Declared MIME type, `None` for pasted text.
    pub fn mime_type(&self) -> Option<&str> {
        match self {
            InputArtifact::Text(_) => None,
            InputArtifact::File { mime_type, .. } => Some(mime_type),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            InputArtifact::Text(text) => text.len(),
            InputArtifact::File { bytes, .. } => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Natural-language formatting instructions. Never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instructions(String);

impl Instructions {
    pub fn new(raw: Option<&str>) -> Result<Self> {
        match raw {
            Some(text) if !text.trim().is_empty() => Ok(Self(text.to_string())),
            _ => Err(Error::MissingInstructions),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One model-facing unit of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentPart {
    Text {
        text: String,
    },
    Inline {
        #[serde(rename = "mimeType")]
        mime_type: String,
        /// Standard base64 with padding.
        data: String,
    },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text { text } => Some(text),
            ContentPart::Inline { .. } => None,
        }
    }
}

/// Ordered model request: the instruction part, then the single content part.
///
/// Only the request assembler constructs payloads, so no other shape exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestPayload {
    parts: [ContentPart; 2],
}

impl RequestPayload {
    pub(crate) fn new(instruction: ContentPart, content: ContentPart) -> Self {
        Self {
            parts: [instruction, content],
        }
    }

    pub fn parts(&self) -> &[ContentPart] {
        &self.parts
    }

    pub fn instruction(&self) -> &ContentPart {
        &self.parts[0]
    }

    pub fn content(&self) -> &ContentPart {
        &self.parts[1]
    }
}

/// A file received by a transport, before classification.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Raw request as a transport receives it.
#[derive(Debug, Clone, Default)]
pub struct FormatRequest {
    pub instructions: Option<String>,
    pub text: Option<String>,
    pub file: Option<UploadedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatResponse {
    pub formatted_content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        Self {
            error: err.user_message().to_string(),
            details: err.to_string(),
        }
    }
}

// Configuration
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub model_timeout_secs: u64,
    pub max_upload_bytes: u64,
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model_timeout_secs: DEFAULT_MODEL_TIMEOUT_SECS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            dry_run: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            gemini_api_key: non_empty("GEMINI_API_KEY"),
            gemini_model: non_empty("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: non_empty("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            model_timeout_secs: parse_u64("MODEL_TIMEOUT_SECS", non_empty("MODEL_TIMEOUT_SECS"))?
                .unwrap_or(defaults.model_timeout_secs),
            max_upload_bytes: parse_u64("MAX_UPLOAD_BYTES", non_empty("MAX_UPLOAD_BYTES"))?
                .unwrap_or(defaults.max_upload_bytes),
            dry_run: non_empty("DRY_RUN")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !self.dry_run && self.gemini_api_key.is_none() {
            return Err(Error::Config("GEMINI_API_KEY not set".to_string()));
        }
        if self.model_timeout_secs == 0 {
            return Err(Error::Config(
                "MODEL_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err(Error::Config(
                "MAX_UPLOAD_BYTES must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_u64(key: &str, value: Option<String>) -> Result<Option<u64>> {
    value
        .map(|v| {
            v.trim()
                .parse::<u64>()
                .map_err(|_| Error::Config(format!("{} must be a whole number, got '{}'", key, v)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_artifact_from_text_only() {
        let artifact = InputArtifact::from_parts(Some("hello".to_string()), None).unwrap();
        assert_eq!(artifact, InputArtifact::Text("hello".to_string()));
        assert_eq!(artifact.mime_type(), None);
    }

    #[test]
    fn test_artifact_from_file_only() {
        let artifact =
            InputArtifact::from_parts(None, Some(("application/pdf".to_string(), vec![1, 2])))
                .unwrap();
        assert_eq!(artifact.mime_type(), Some("application/pdf"));
        assert_eq!(artifact.len(), 2);
    }

    #[test]
    fn test_artifact_missing_when_nothing_supplied() {
        let err = InputArtifact::from_parts(None, None).unwrap_err();
        assert!(matches!(err, Error::MissingContent));
    }

    #[test]
    fn test_blank_text_counts_as_missing() {
        let err = InputArtifact::from_parts(Some("  \n".to_string()), None).unwrap_err();
        assert!(matches!(err, Error::MissingContent));
    }

    #[test]
    fn test_blank_text_with_file_uses_file() {
        let artifact = InputArtifact::from_parts(
            Some(String::new()),
            Some(("text/plain".to_string(), b"x".to_vec())),
        )
        .unwrap();
        assert_eq!(artifact.mime_type(), Some("text/plain"));
    }

    #[test]
    fn test_artifact_rejects_file_and_text_together() {
        let err = InputArtifact::from_parts(
            Some("hello".to_string()),
            Some(("text/plain".to_string(), b"hello".to_vec())),
        )
        .unwrap_err();
        assert!(matches!(err, Error::ConflictingContent));
    }

    #[test]
    fn test_instructions_reject_blank() {
        assert!(matches!(
            Instructions::new(None).unwrap_err(),
            Error::MissingInstructions
        ));
        assert!(matches!(
            Instructions::new(Some(" \t")).unwrap_err(),
            Error::MissingInstructions
        ));
    }

    #[test]
    fn test_instructions_keep_text_verbatim() {
        let instructions = Instructions::new(Some("  bullet the list ")).unwrap();
        assert_eq!(instructions.as_str(), "  bullet the list ");
    }

    #[test]
    fn test_content_part_serialization() {
        let json = serde_json::to_value(ContentPart::Inline {
            mime_type: "image/png".to_string(),
            data: "AQI=".to_string(),
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "inline", "mimeType": "image/png", "data": "AQI=" })
        );
    }

    #[test]
    fn test_format_response_uses_camel_case() {
        let json = serde_json::to_string(&FormatResponse {
            formatted_content: "DONE".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"formattedContent":"DONE"}"#);
    }

    #[test]
    fn test_error_response_from_error() {
        let response = ErrorResponse::from(&Error::EmptyModelResponse);
        assert_eq!(response.error, "The model returned no formatted content.");
        assert_eq!(response.details, "Model returned an empty response");
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "k")])).unwrap();
        assert_eq!(config.gemini_api_key.as_deref(), Some("k"));
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.gemini_base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(config.model_timeout_secs, DEFAULT_MODEL_TIMEOUT_SECS);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert!(!config.dry_run);
        config.validate().unwrap();
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("GEMINI_MODEL", "gemini-2.5-pro"),
            ("MODEL_TIMEOUT_SECS", "30"),
            ("MAX_UPLOAD_BYTES", "1024"),
            ("DRY_RUN", "true"),
        ]))
        .unwrap();
        assert_eq!(config.gemini_model, "gemini-2.5-pro");
        assert_eq!(config.model_timeout_secs, 30);
        assert_eq!(config.max_upload_bytes, 1024);
        assert!(config.dry_run);
    }

    #[test]
    fn test_config_requires_api_key_unless_dry_run() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert!(matches!(config.validate().unwrap_err(), Error::Config(_)));

        let dry = Config::from_lookup(lookup_from(&[("DRY_RUN", "1")])).unwrap();
        dry.validate().unwrap();
    }

    #[test]
    fn test_config_rejects_malformed_numbers() {
        let err = Config::from_lookup(lookup_from(&[("MODEL_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("MODEL_TIMEOUT_SECS"));
    }
}
