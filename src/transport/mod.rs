//! HTTP transport with timeout, retry and envelope decoding
//!
//! This module turns a validated payload into a parsed response or a typed
//! failure:
//! - [`HttpTransport`] is the seam between the client and the wire; the
//!   default implementation is [`ReqwestTransport`], and tests substitute
//!   their own
//! - [`ApiConnection`] owns the resilience policy: every request obeys the
//!   configured timeout, failures are classified and handed to the
//!   [`RetryPolicy`], and response envelopes are decoded uniformly

pub mod retry;

pub use retry::{RetryPolicy, RetryPredicate};

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use url::Url;

use crate::{
    errors::{AltitraceApiError, ClientError, NetworkError},
    types::ApiResponse,
};

/// HTTP method of a transport request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A prepared request handed to the transport
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,
    /// Path relative to the configured base URL (e.g. `/simulate`)
    pub path: String,
    /// JSON body for POST requests
    pub body: Option<serde_json::Value>,
}

/// A raw response as it came off the wire
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: String,
}

/// Seam between the client and the underlying HTTP stack
///
/// Implementations issue exactly one attempt per call; retry and envelope
/// handling live in [`ApiConnection`] so every implementation gets them for
/// free. Tests implement this trait with canned responses.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issues a single HTTP request
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, NetworkError>;
}

/// Production transport backed by [`reqwest`]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
    headers: HashMap<String, String>,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(base_url: Url, timeout: Duration, headers: HashMap<String, String>) -> Self {
        Self { client: reqwest::Client::new(), base_url, headers, timeout }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn classify(&self, error: reqwest::Error) -> NetworkError {
        if error.is_timeout() {
            NetworkError::Timeout(self.timeout)
        } else if error.is_connect() {
            NetworkError::Connect(error.to_string())
        } else {
            NetworkError::Request(error.to_string())
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, NetworkError> {
        let url = self.endpoint(&request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| NetworkError::Request(e.to_string()))?;
        Ok(TransportResponse { status, body })
    }
}

/// A transport paired with the retry policy and envelope decoding
///
/// Stateless per call; the shared configuration (transport, policy, debug
/// flag) is read-only, so one connection can serve any number of concurrent
/// requests without locking.
pub struct ApiConnection {
    transport: Arc<dyn HttpTransport>,
    retry: RetryPolicy,
    debug: bool,
}

impl ApiConnection {
    pub fn new(transport: Arc<dyn HttpTransport>, retry: RetryPolicy, debug: bool) -> Self {
        Self { transport, retry, debug }
    }

    /// Issues a GET request and decodes the enveloped payload
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.request(Method::Get, path, None).await
    }

    /// Issues a POST request and decodes the enveloped payload
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let body = serde_json::to_value(body)
            .map_err(|e| NetworkError::Request(format!("failed to encode request body: {e}")))?;
        self.request(Method::Post, path, Some(body)).await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ClientError> {
        let mut attempt = 0u32;
        loop {
            let request = TransportRequest { method, path: path.to_string(), body: body.clone() };
            match self.attempt(request).await {
                Ok(value) => return Ok(value),
                Err((error, status)) => {
                    if !self.retry.should_retry(&error, attempt, status) {
                        return Err(error);
                    }
                    let delay = self.retry.delay_for(attempt);
                    debug!(
                        target: "altitrace::client",
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "retrying request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// One attempt: send, then classify the outcome
    ///
    /// The status code accompanies the error so the retry policy can
    /// distinguish "a response arrived" from a pure network failure.
    async fn attempt<T: DeserializeOwned>(
        &self,
        request: TransportRequest,
    ) -> Result<T, (ClientError, Option<u16>)> {
        if self.debug {
            debug!(
                target: "altitrace::client",
                method = ?request.method,
                path = %request.path,
                body = %request.body.as_ref().map(ToString::to_string).unwrap_or_default(),
                "sending request"
            );
        }

        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|e| (ClientError::Network(e), None))?;
        let status = response.status;

        if self.debug {
            debug!(target: "altitrace::client", status, body = %response.body, "received response");
        }

        match serde_json::from_str::<ApiResponse<T>>(&response.body) {
            Ok(envelope) => envelope
                .into_result(status)
                .map_err(|e| (ClientError::Api(e), Some(status))),
            // A 2xx body that does not decode will not improve on retry
            Err(parse_error) if (200..300).contains(&status) => Err((
                ClientError::Network(NetworkError::MalformedBody(parse_error.to_string())),
                Some(status),
            )),
            // Non-2xx without a decodable envelope: synthesize from the status
            Err(_) => Err((
                ClientError::Api(AltitraceApiError::from_status(status, &response.body)),
                Some(status),
            )),
        }
    }
}
