use super::ExtractionService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockExtractionClient {
    responses: Arc<Mutex<Vec<std::result::Result<String, String>>>>,
    call_count: Arc<Mutex<usize>>,
    inputs: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockExtractionClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            inputs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(Ok(text.into()));
        self
    }

    pub fn with_failure(self, detail: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(Err(detail.into()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_inputs(&self) -> Vec<Vec<u8>> {
        self.inputs.lock().unwrap().clone()
    }
}

impl Default for MockExtractionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExtractionService for MockExtractionClient {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        self.inputs.lock().unwrap().push(bytes.to_vec());

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(String::from_utf8_lossy(bytes).into_owned());
        }

        let index = (*count - 1) % responses.len();
        responses[index].clone().map_err(Error::ContentExtraction)
    }
}
