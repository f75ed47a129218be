pub const SYSTEM_INSTRUCTION: &str = include_str!("../data/prompts/system_instruction.txt");

/// Prefix of the first payload part; the caller's instructions follow it.
pub const INSTRUCTIONS_LABEL: &str = "INSTRUCTIONS:\n";

/// Prefix of every text content part (pasted text, text files, extracted DOCX).
pub const DOCUMENT_LABEL: &str = "DOCUMENT CONTENT:\n";
