use super::ModelService;
use crate::models::RequestPayload;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
enum MockReply {
    Text(Option<String>),
    Failure(String),
}

/// Scripted model service. Replies cycle in the order they were added.
#[derive(Clone)]
pub struct MockModelClient {
    replies: Arc<Mutex<Vec<MockReply>>>,
    call_count: Arc<Mutex<usize>>,
    payloads: Arc<Mutex<Vec<RequestPayload>>>,
    system_instructions: Arc<Mutex<Vec<String>>>,
}

impl MockModelClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            payloads: Arc::new(Mutex::new(Vec::new())),
            system_instructions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Text(Some(response.into())));
        self
    }

    /// Reply with no text at all, as a blocked or empty model answer would.
    pub fn with_missing_response(self) -> Self {
        self.replies.lock().unwrap().push(MockReply::Text(None));
        self
    }

    pub fn with_failure(self, detail: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Failure(detail.into()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_payloads(&self) -> Vec<RequestPayload> {
        self.payloads.lock().unwrap().clone()
    }

    pub fn get_system_instructions(&self) -> Vec<String> {
        self.system_instructions.lock().unwrap().clone()
    }
}

impl Default for MockModelClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelService for MockModelClient {
    async fn generate(
        &self,
        payload: &RequestPayload,
        system_instruction: &str,
    ) -> Result<Option<String>> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        self.payloads.lock().unwrap().push(payload.clone());
        self.system_instructions
            .lock()
            .unwrap()
            .push(system_instruction.to_string());

        let replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            // Echo the document part back
            return Ok(payload.content().as_text().map(str::to_string));
        }

        let index = (*count - 1) % replies.len();
        match &replies[index] {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Failure(detail) => Err(Error::ModelInvocation(detail.clone())),
        }
    }
}
