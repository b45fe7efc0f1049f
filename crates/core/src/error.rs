// crates/core/src/error.rs

use thiserror::Error;

/// Failure talking to the HR backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the body's `error`/`message` field when present.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    /// 2xx response whose body did not carry `success: true` or the expected payload.
    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("invalid period: {0}")]
    InvalidPeriod(String),

    #[error("{employee} already has a completed {kind} meeting")]
    AlreadyCompleted { employee: String, kind: &'static str },
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
