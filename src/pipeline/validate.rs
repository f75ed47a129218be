use crate::{Error, Result};

/// Accept any non-empty model output unchanged.
pub fn validate(output: Option<String>) -> Result<String> {
    match output {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(Error::EmptyModelResponse),
    }
}
