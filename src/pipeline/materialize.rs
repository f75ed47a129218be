use super::classify::Strategy;
use crate::extract::ExtractionService;
use crate::models::{ContentPart, InputArtifact};
use crate::prompts::DOCUMENT_LABEL;
use crate::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Turn an artifact into the single content part its strategy calls for.
///
/// Only [`Strategy::DocxExtract`] touches a collaborator.
pub async fn materialize(
    artifact: &InputArtifact,
    strategy: Strategy,
    extractor: &dyn ExtractionService,
) -> Result<ContentPart> {
    match (strategy, artifact) {
        (Strategy::InlineBinary, InputArtifact::File { mime_type, bytes }) => {
            let data = STANDARD.encode(bytes);
            tracing::debug!(
                "Encoded {} bytes of {} as {} base64 chars",
                bytes.len(),
                mime_type,
                data.len()
            );
            Ok(ContentPart::Inline {
                mime_type: mime_type.clone(),
                data,
            })
        }
        (Strategy::DocxExtract, InputArtifact::File { bytes, .. }) => {
            let text = extractor
                .extract_text(bytes)
                .await
                .map_err(|e| match e {
                    Error::ContentExtraction(_) => e,
                    other => Error::ContentExtraction(other.to_string()),
                })?;
            Ok(labelled(&text))
        }
        (Strategy::PlainTextFile, InputArtifact::File { bytes, .. }) => {
            Ok(labelled(&String::from_utf8_lossy(bytes)))
        }
        (Strategy::PastedText, InputArtifact::Text(text)) => Ok(labelled(text)),
        (Strategy::Unsupported, _)
        | (Strategy::InlineBinary, InputArtifact::Text(_))
        | (Strategy::DocxExtract, InputArtifact::Text(_))
        | (Strategy::PlainTextFile, InputArtifact::Text(_))
        | (Strategy::PastedText, InputArtifact::File { .. }) => {
            Err(Error::UnsupportedMediaType {
                mime_type: artifact.mime_type().unwrap_or("text (pasted)").to_string(),
            })
        }
    }
}

fn labelled(text: &str) -> ContentPart {
    ContentPart::text(format!("{}{}", DOCUMENT_LABEL, text))
}
