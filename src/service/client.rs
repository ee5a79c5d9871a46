//! HTTP client for the local execution service

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::ServiceError;
use super::directory::{FunctionDirectory, interpret_functions_response};
use super::dispatch::{Executor, RunRequest, RunResult, interpret_run_response};

pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:5000";

/// Client for `POST /run`, `GET /functions` and `GET /ping`
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: Client,
    base_url: String,
}

impl ServiceClient {
    /// Create a client. `timeout` of `None` waits for the service indefinitely.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ServiceError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Health check against `GET /ping`
    pub async fn ping(&self) -> Result<String, ServiceError> {
        let response = self.http.get(self.url("/ping")).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                detail: body.chars().take(200).collect(),
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl Executor for ServiceClient {
    async fn run(&self, code: &str) -> RunResult {
        let request = RunRequest {
            code: code.to_string(),
        };

        let response = self
            .http
            .post(self.url("/run"))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let result = interpret_run_response(status, &body);

        match &result {
            Ok(output) => tracing::debug!(%status, bytes = output.len(), "run completed"),
            Err(e) => tracing::warn!(%status, error = %e, "run failed"),
        }
        result
    }
}

#[async_trait]
impl FunctionDirectory for ServiceClient {
    async fn list_functions(&self) -> Result<Vec<String>, ServiceError> {
        let response = self.http.get(self.url("/functions")).send().await?;
        let status = response.status();
        let body = response.text().await?;
        interpret_functions_response(status, &body)
    }
}
