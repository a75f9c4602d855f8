// Relay error taxonomy and its HTTP mapping.
//
// 400 for bad client input, 429/402 passed through from the gateway with
// friendlier copy, 500 for everything else. Every body is `{ "error": ... }`.

use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::gateway::traits::GatewayError;

#[derive(Debug, Error)]
pub enum RelayError {
    /// Missing or malformed request field. Never forwarded upstream.
    #[error("{0}")]
    InvalidInput(String),
    #[error("Rate limit exceeded. Please try again in a moment.")]
    RateLimited,
    #[error("AI usage limit reached. Please try again later.")]
    QuotaExceeded,
    /// Any other upstream or internal failure.
    #[error("{0}")]
    Upstream(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RelayError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            RelayError::QuotaExceeded => StatusCode::PAYMENT_REQUIRED,
            RelayError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GatewayError> for RelayError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::RateLimited => RelayError::RateLimited,
            GatewayError::QuotaExceeded => RelayError::QuotaExceeded,
            other => RelayError::Upstream(other.to_string()),
        }
    }
}

impl From<BytesRejection> for RelayError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            RelayError::InvalidInput("Request body is too large".to_string())
        } else {
            RelayError::InvalidInput(rejection.body_text())
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        super::api_error(self.status(), &self.to_string())
    }
}
