//! Execution dispatch: send DSL source to the execution service

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::ServiceError;

/// Output text on success, a service failure otherwise
pub type RunResult = Result<String, ServiceError>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunRequest {
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunResponse {
    pub output: String,
}

/// Runs DSL source somewhere and returns its textual output
#[async_trait]
pub trait Executor: Send + Sync {
    async fn run(&self, code: &str) -> RunResult;
}

/// Interpret the status and body returned by `POST /run`.
///
/// The service reports its own crashes as `{"output": "[Server Error] ..."}`
/// with a 5xx status; that text becomes the failure detail.
pub fn interpret_run_response(status: StatusCode, body: &str) -> RunResult {
    let parsed = serde_json::from_str::<RunResponse>(body);

    if !status.is_success() {
        let detail = match parsed {
            Ok(response) => response.output,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string(),
        };
        return Err(ServiceError::Status {
            status: status.as_u16(),
            detail,
        });
    }

    parsed
        .map(|response| response.output)
        .map_err(|e| ServiceError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_returns_output_verbatim() {
        let out = interpret_run_response(StatusCode::OK, r#"{"output": "hi\n"}"#).unwrap();
        assert_eq!(out, "hi\n");
    }

    #[test]
    fn empty_output_is_still_success() {
        let out = interpret_run_response(StatusCode::OK, r#"{"output": ""}"#).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn server_error_carries_service_message() {
        let err = interpret_run_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"output": "[Server Error] boom"}"#,
        )
        .unwrap_err();
        match err {
            ServiceError::Status { status, detail } => {
                assert_eq!(status, 500);
                assert_eq!(detail, "[Server Error] boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_success_without_body_uses_reason() {
        let err = interpret_run_response(StatusCode::NOT_FOUND, "<html>").unwrap_err();
        assert_eq!(err.to_string(), "service responded with status 404: Not Found");
    }

    #[test]
    fn wrong_shape_is_malformed() {
        for body in ["", "[]", r#"{"result": "hi"}"#, r#"{"output": 3}"#] {
            let err = interpret_run_response(StatusCode::OK, body).unwrap_err();
            assert!(matches!(err, ServiceError::Malformed(_)), "{body}");
        }
    }

    #[test]
    fn request_serializes_as_code_object() {
        let body = serde_json::to_value(RunRequest {
            code: "print hi".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"code": "print hi"}));
    }
}
