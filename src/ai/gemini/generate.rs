use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, Part};
use crate::ai::ModelService;
use crate::models::RequestPayload;
use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Formats documents with a Gemini model.
pub struct GeminiModelClient {
    http: GeminiHttpClient,
}

impl GeminiModelClient {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, model, timeout, reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Duration,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, timeout, client),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn model(&self) -> &str {
        self.http.model()
    }

    fn build_request(payload: &RequestPayload, system_instruction: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::Text {
                    text: system_instruction.to_string(),
                }],
            }),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: payload.parts().iter().map(Part::from).collect(),
            }],
        }
    }
}

#[async_trait]
impl ModelService for GeminiModelClient {
    async fn generate(
        &self,
        payload: &RequestPayload,
        system_instruction: &str,
    ) -> Result<Option<String>> {
        tracing::debug!("Sending formatting request to Gemini model {}", self.model());

        let request = Self::build_request(payload, system_instruction);
        let response: GenerateContentResponse = self.http.generate_content(&request).await?;

        if let Some(reason) = response.block_reason() {
            tracing::warn!("Gemini blocked the request: {}", reason);
        }
        if let Some(finish) = response
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
        {
            tracing::debug!("Gemini finish reason: {}", finish);
        }

        Ok(response.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use crate::models::ContentPart;
    use crate::Error;
    use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DEFAULT_MODEL: &str = "gemini-2.5-flash";

    fn make_client(server: &MockServer, model: &str) -> GeminiModelClient {
        GeminiModelClient::new(
            "test-key".to_string(),
            model.to_string(),
            Duration::from_secs(5),
        )
        .with_base_url(server.uri())
    }

    fn text_payload() -> RequestPayload {
        RequestPayload::new(
            ContentPart::text("INSTRUCTIONS:\nmake it uppercase"),
            ContentPart::text("DOCUMENT CONTENT:\nhello world"),
        )
    }

    fn text_response(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        }))
    }

    #[tokio::test]
    async fn test_generate_returns_model_text() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(text_response("HELLO WORLD"))
            .mount(&server)
            .await;

        let client = make_client(&server, DEFAULT_MODEL);
        let text = client.generate(&text_payload(), "be plain").await.unwrap();
        assert_eq!(text.as_deref(), Some("HELLO WORLD"));
    }

    #[tokio::test]
    async fn test_request_keeps_part_order_and_system_instruction() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(body_partial_json(serde_json::json!({
                "system_instruction": { "parts": [{ "text": "be plain" }] },
                "contents": [{
                    "role": "user",
                    "parts": [
                        { "text": "INSTRUCTIONS:\nmake it uppercase" },
                        { "text": "DOCUMENT CONTENT:\nhello world" }
                    ]
                }]
            })))
            .respond_with(text_response("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, DEFAULT_MODEL);
        client.generate(&text_payload(), "be plain").await.unwrap();
    }

    #[tokio::test]
    async fn test_inline_part_is_sent_as_inline_data() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(body_string_contains("\"inlineData\""))
            .and(body_string_contains("\"mimeType\":\"image/png\""))
            .respond_with(text_response("extracted"))
            .expect(1)
            .mount(&server)
            .await;

        let payload = RequestPayload::new(
            ContentPart::text("INSTRUCTIONS:\nextract text"),
            ContentPart::Inline {
                mime_type: "image/png".to_string(),
                data: "iVBORw==".to_string(),
            },
        );

        let client = make_client(&server, DEFAULT_MODEL);
        let text = client.generate(&payload, "sys").await.unwrap();
        assert_eq!(text.as_deref(), Some("extracted"));
    }

    #[tokio::test]
    async fn test_api_error_returns_model_invocation_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let client = make_client(&server, DEFAULT_MODEL);
        let err = client.generate(&text_payload(), "sys").await.unwrap_err();
        assert!(matches!(err, Error::ModelInvocation(_)));
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn test_malformed_body_returns_model_invocation_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = make_client(&server, DEFAULT_MODEL);
        let err = client.generate(&text_payload(), "sys").await.unwrap_err();
        assert!(matches!(err, Error::ModelInvocation(_)));
    }

    #[tokio::test]
    async fn test_empty_candidates_yield_none() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": []
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, DEFAULT_MODEL);
        assert!(client
            .generate(&text_payload(), "sys")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_blocked_prompt_yields_none() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, DEFAULT_MODEL);
        assert!(client
            .generate(&text_payload(), "sys")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_strips_models_prefix_from_model_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .respond_with(text_response("done"))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, "models/gemini-2.5-flash");
        client.generate(&text_payload(), "sys").await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_server_returns_model_invocation_error() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let client = GeminiModelClient::new(
            "test-key".to_string(),
            DEFAULT_MODEL.to_string(),
            Duration::from_secs(2),
        )
        .with_base_url(uri);

        let err = client.generate(&text_payload(), "sys").await.unwrap_err();
        assert!(matches!(err, Error::ModelInvocation(_)));
    }
}
