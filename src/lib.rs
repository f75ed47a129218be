//! Formats user documents into paste-ready plain text with a generative model.
//!
//! A document arrives as pasted text or as a file (PDF, image, DOCX, plain
//! text) together with natural-language instructions. The pipeline decides
//! how the document must be represented for the model, extracts DOCX text
//! locally, assembles an ordered request, and validates the model's answer.

pub mod ai;
pub mod app;
pub mod error;
pub mod extract;
pub mod mime;
pub mod models;
pub mod pipeline;
pub mod prompts;

pub use error::{Error, Result};
