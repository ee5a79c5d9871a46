//! Function directory: names of the functions the execution service offers

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use super::ServiceError;

#[async_trait]
pub trait FunctionDirectory: Send + Sync {
    async fn list_functions(&self) -> Result<Vec<String>, ServiceError>;
}

#[derive(Deserialize)]
struct DirectoryError {
    error: String,
}

/// Interpret the status and body returned by `GET /functions`
pub fn interpret_functions_response(
    status: StatusCode,
    body: &str,
) -> Result<Vec<String>, ServiceError> {
    if !status.is_success() {
        let detail = serde_json::from_str::<DirectoryError>(body)
            .map(|e| e.error)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string()
            });
        return Err(ServiceError::Status {
            status: status.as_u16(),
            detail,
        });
    }

    serde_json::from_str(body).map_err(|e| ServiceError::Malformed(e.to_string()))
}
