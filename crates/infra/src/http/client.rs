use std::sync::Arc;
use std::time::Duration;

use namewizard_common::observability::{SharedLogger, TracingLogger};
use namewizard_common::resilience::{RetryExecutor, RetryPolicy};
use namewizard_domain::NameWizardError;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};

use super::error::HttpCallError;

/// HTTP client with built-in retry and timeout support.
///
/// Every attempt goes through a [`RetryExecutor`] using the client's
/// [`RetryPolicy`]: network failures and statuses in the policy's retryable
/// set are retried with exponential backoff, anything else fails at once.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    policy: RetryPolicy,
    logger: SharedLogger,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient").field("policy", &self.policy).finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, NameWizardError> {
        Self::builder().build()
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Logger shared by this client and the invokers built on it
    pub fn logger(&self) -> &SharedLogger {
        &self.logger
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder with retry semantics.
    ///
    /// Only success statuses produce a response; the error is the one from
    /// the last attempt.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, HttpCallError> {
        let request = replay(&builder)?.build()?;
        let operation = format!("{} {}", request.method(), request.url());

        RetryExecutor::new(self.policy.clone())
            .with_logger(Arc::clone(&self.logger))
            .with_operation_name(operation)
            .execute(|| self.send_once(&builder))
            .await
            .map_err(|err| err.into_last_error().unwrap_or(HttpCallError::Cancelled))
    }

    /// Execute a single attempt without retries.
    pub async fn send_once(&self, builder: &RequestBuilder) -> Result<Response, HttpCallError> {
        let request = replay(builder)?.build()?;
        let target = format!("{} {}", request.method(), request.url());
        self.logger.debug("Sending HTTP request", &[("operation", target.clone())]);

        let response = self.client.execute(request).await.map_err(|err| {
            self.logger.debug(
                "HTTP request failed",
                &[("operation", target.clone()), ("error", err.to_string())],
            );
            HttpCallError::from(err)
        })?;

        let status = response.status();
        self.logger.debug(
            "Received HTTP response",
            &[("operation", target), ("status", status.as_u16().to_string())],
        );

        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|err| format!("<body unavailable: {err}>"));
        Err(HttpCallError::Status { status: status.as_u16(), body })
    }
}

fn replay(builder: &RequestBuilder) -> Result<RequestBuilder, HttpCallError> {
    builder.try_clone().ok_or_else(|| {
        HttpCallError::Request(
            "request body cannot be cloned; buffer the body to enable retries".into(),
        )
    })
}

/// Builder for [`HttpClient`].
pub struct HttpClientBuilder {
    timeout: Duration,
    policy: RetryPolicy,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
    logger: SharedLogger,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            policy: RetryPolicy::default(),
            user_agent: None,
            default_headers: None,
            logger: Arc::new(TracingLogger::new("http")),
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn build(self) -> Result<HttpClient, NameWizardError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder
            .build()
            .map_err(|err| NameWizardError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(HttpClient { client, policy: self.policy, logger: self.logger })
    }
}
