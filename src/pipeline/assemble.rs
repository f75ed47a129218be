use crate::models::{ContentPart, Instructions, RequestPayload};
use crate::prompts::INSTRUCTIONS_LABEL;

/// Instructions first, then the document. The model relies on this order.
pub fn assemble(instructions: &Instructions, content: ContentPart) -> RequestPayload {
    let instruction = ContentPart::text(format!("{}{}", INSTRUCTIONS_LABEL, instructions.as_str()));
    RequestPayload::new(instruction, content)
}
