//! Declared content types understood at the transport boundary.

use std::path::Path;

pub const PDF: &str = "application/pdf";
pub const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const PLAIN_TEXT: &str = "text/plain";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Essence of a MIME string: lowercase, parameters dropped.
///
/// `"Text/Plain; charset=UTF-8"` becomes `"text/plain"`.
pub fn essence(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Guess a declared MIME type from a file name's extension.
///
/// Unknown extensions map to `application/octet-stream`, which the classifier
/// rejects. File bytes are never consulted.
pub fn guess_from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match ext.as_deref() {
        Some("pdf") => PDF,
        Some("docx") => DOCX,
        Some("txt") => PLAIN_TEXT,
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        Some("bmp") => "image/bmp",
        Some("tif") | Some("tiff") => "image/tiff",
        _ => {
            tracing::debug!(
                "No known MIME type for '{}', using {}",
                path.display(),
                OCTET_STREAM
            );
            OCTET_STREAM
        }
    }
}
