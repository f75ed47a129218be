use crate::mime;
use std::fmt;

/// How an artifact must be represented for the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// PDF or image bytes sent inline as base64.
    InlineBinary,
    /// Word-processing document, text extracted locally first.
    DocxExtract,
    PlainTextFile,
    PastedText,
    Unsupported,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::InlineBinary => "inline-binary",
            Strategy::DocxExtract => "docx-extract",
            Strategy::PlainTextFile => "plain-text-file",
            Strategy::PastedText => "pasted-text",
            Strategy::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

/// Pick a strategy from a declared MIME type; `None` means pasted text.
pub fn classify(mime_type: Option<&str>) -> Strategy {
    let Some(mime_type) = mime_type else {
        return Strategy::PastedText;
    };

    let essence = mime::essence(mime_type);
    match essence.as_str() {
        mime::PDF => Strategy::InlineBinary,
        mime::DOCX => Strategy::DocxExtract,
        mime::PLAIN_TEXT => Strategy::PlainTextFile,
        other => match other.strip_prefix("image/") {
            Some(subtype) if !subtype.is_empty() => Strategy::InlineBinary,
            _ => Strategy::Unsupported,
        },
    }
}
