use thiserror::Error;

/// Failure talking to the execution or function directory service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("could not reach service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service responded with status {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}
