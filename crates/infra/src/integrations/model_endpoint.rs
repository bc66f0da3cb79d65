//! HTTP model endpoint exposed as a fallback candidate
//!
//! Each invocation POSTs `{"model": <candidate>, "input": <payload>}` to the
//! configured URL and returns the JSON response body. Retries come from the
//! [`HttpClient`]'s policy, so a sequencer driving this invoker is normally
//! built without a retry policy of its own.

use async_trait::async_trait;
use namewizard_core::fallback::CandidateInvoker;
use namewizard_domain::CandidateId;
use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::http::{HttpCallError, HttpClient};

/// Request body sent to the model endpoint
#[derive(Debug, Serialize)]
pub struct ModelRequest<'a> {
    pub model: &'a str,
    pub input: &'a Value,
}

/// Calls one model endpoint per candidate
#[derive(Debug, Clone)]
pub struct ModelEndpointInvoker {
    http_client: HttpClient,
    endpoint: String,
    input: Value,
    api_key: Option<String>,
}

impl ModelEndpointInvoker {
    /// Invoker posting `input` to `endpoint`
    pub fn new(http_client: HttpClient, endpoint: impl Into<String>, input: Value) -> Self {
        Self { http_client, endpoint: endpoint.into(), input, api_key: None }
    }

    /// Send `Authorization: Bearer <key>` with every request
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CandidateInvoker<Value, HttpCallError> for ModelEndpointInvoker {
    async fn invoke(&self, candidate: &CandidateId) -> Result<Value, HttpCallError> {
        let body = ModelRequest { model: candidate.as_str(), input: &self.input };

        let mut request = self.http_client.request(Method::POST, &self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header(AUTHORIZATION, format!("Bearer {key}"));
        }

        let logger = self.http_client.logger();
        logger.debug(
            "Invoking model endpoint",
            &[("candidate", candidate.to_string()), ("endpoint", self.endpoint.clone())],
        );
        let response = self.http_client.send(request).await?;
        let value =
            response.json::<Value>().await.map_err(|e| HttpCallError::Decode(e.to_string()))?;

        logger.info("Model endpoint responded", &[("candidate", candidate.to_string())]);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use namewizard_common::observability::{noop_logger, LogLevel};
    use namewizard_common::resilience::RetryPolicy;
    use namewizard_common::testing::RecordingLogger;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn http_client() -> HttpClient {
        HttpClient::builder()
            .retry_policy(
                RetryPolicy::builder()
                    .max_retries(1)
                    .initial_delay(Duration::from_millis(5))
                    .build()
                    .expect("retry policy"),
            )
            .logger(noop_logger())
            .build()
            .expect("http client")
    }

    #[tokio::test]
    async fn posts_model_and_input() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/rename"))
            .and(header("authorization", "Bearer secret"))
            .and(body_json(json!({"model": "gpt-4", "input": {"file": "scan001.pdf"}})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"name": "invoice-2024.pdf"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let invoker = ModelEndpointInvoker::new(
            http_client(),
            format!("{}/v1/rename", server.uri()),
            json!({"file": "scan001.pdf"}),
        )
        .with_api_key("secret");

        let value = invoker.invoke(&"gpt-4".into()).await.unwrap();
        assert_eq!(value, json!({"name": "invoice-2024.pdf"}));
    }

    #[tokio::test]
    async fn non_json_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let invoker = ModelEndpointInvoker::new(http_client(), server.uri(), json!(null));

        let err = invoker.invoke(&"gpt-4".into()).await.unwrap_err();
        assert!(matches!(err, HttpCallError::Decode(_)));
    }

    #[tokio::test]
    async fn client_errors_are_returned_unretried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422).set_body_string("file is empty"))
            .expect(1)
            .mount(&server)
            .await;

        let invoker = ModelEndpointInvoker::new(http_client(), server.uri(), json!({}));

        let err = invoker.invoke(&"gpt-4".into()).await.unwrap_err();
        assert_eq!(err.status(), Some(422));
    }

    #[tokio::test]
    async fn logs_through_client_logger() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "a.pdf"})))
            .mount(&server)
            .await;
        let logger = RecordingLogger::shared();
        let client = HttpClient::builder().logger(logger.clone()).build().unwrap();
        let invoker = ModelEndpointInvoker::new(client, server.uri(), json!({}));

        invoker.invoke(&"claude-3".into()).await.unwrap();

        let responded = logger.records_at(LogLevel::Info);
        let responded = responded
            .iter()
            .find(|record| record.message == "Model endpoint responded")
            .expect("response logged");
        assert_eq!(responded.field("candidate"), Some("claude-3"));
        assert!(logger.contains("Invoking model endpoint"));
    }
}
