//! Pet Error Types
//!
//! This module provides pet-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;
use thiserror::Error;

/// Pet-specific result type alias
pub type PetResult<T> = Result<T, PetError>;

/// Which initData check failed; logged, never sent to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    InvalidSignature,
    Expired,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::InvalidSignature => "invalid_signature",
            RejectionReason::Expired => "expired",
        }
    }
}

/// Pet-specific error variants
#[derive(Debug, Error)]
pub enum PetError {
    /// initData absent, unparseable, or structurally invalid
    #[error("initData missing or malformed: {0}")]
    MalformedInitData(String),

    /// Forged, tampered, or stale initData
    #[error("initData signature invalid or expired")]
    InitDataRejected(RejectionReason),

    #[error("Too many pats, wait a sec")]
    RateLimited { retry_after_secs: u64 },

    /// Durable storage could not be read or written
    #[error("Storage unavailable: {0}")]
    Storage(String),
}

impl PetError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            PetError::MalformedInitData(_) => StatusCode::BAD_REQUEST,
            PetError::InitDataRejected(_) => StatusCode::FORBIDDEN,
            PetError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            PetError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side details stay out of the response body.
    pub fn to_app_error(&self) -> AppError {
        match self {
            PetError::MalformedInitData(_) => AppError::bad_request("initData missing or malformed")
                .with_action("Open this page inside Telegram"),
            PetError::InitDataRejected(_) => {
                AppError::forbidden("initData signature invalid or expired")
            }
            PetError::RateLimited { .. } => {
                AppError::too_many_requests(self.to_string()).with_action("Retry after a moment")
            }
            PetError::Storage(_) => AppError::service_unavailable("Storage unavailable"),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        let status = self.status_code().as_u16();
        match self {
            PetError::Storage(msg) => {
                tracing::error!(status, detail = %msg, "Pet storage error");
            }
            PetError::InitDataRejected(reason) => {
                tracing::warn!(status, reason = reason.as_str(), "initData rejected");
            }
            PetError::RateLimited { retry_after_secs } => {
                tracing::warn!(status, retry_after_secs, "Pet rate limit exceeded");
            }
            PetError::MalformedInitData(reason) => {
                tracing::debug!(status, reason = %reason, "Malformed initData");
            }
        }
    }
}

impl IntoResponse for PetError {
    fn into_response(self) -> Response {
        self.log();
        let mut response = self.to_app_error().into_response();
        if let PetError::RateLimited { retry_after_secs } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }
        response
    }
}
