use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::calendar::DateError;
use crate::services::donations::DonationRejection;
use crate::services::videos::VideoError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Every way a request can fail, mapped one-to-one onto an HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest {
        message: String,
        details: Option<String>,
    },
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{message}")]
    Gone {
        message: String,
        expired_at: DateTime<Utc>,
    },
    #[error("{0}")]
    ServiceUnavailable(String),
    #[error("{context}: {source}")]
    Internal {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            details: None,
        }
    }

    pub fn invalid_format(details: impl Into<String>) -> Self {
        Self::BadRequest {
            message: "Invalid request format".into(),
            details: Some(details.into()),
        }
    }

    pub fn internal(context: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::Internal {
            context,
            source: source.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Gone { .. } => StatusCode::GONE,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        Self::internal("Database query failed", e)
    }
}

impl From<DateError> for ApiError {
    fn from(e: DateError) -> Self {
        Self::bad_request(e.to_string())
    }
}

impl From<DonationRejection> for ApiError {
    fn from(e: DonationRejection) -> Self {
        match e {
            DonationRejection::EventExpired { expired_at } => Self::Gone {
                message: e.to_string(),
                expired_at,
            },
            DonationRejection::PaymentsNotReady => Self::ServiceUnavailable(e.to_string()),
            DonationRejection::VideoNotAllowed => Self::bad_request(e.to_string()),
        }
    }
}

impl From<VideoError> for ApiError {
    fn from(e: VideoError) -> Self {
        match e {
            VideoError::NotFound => Self::NotFound(e.to_string()),
            VideoError::Storage(source) => Self::internal("Video storage failure", source),
            other => Self::bad_request(other.to_string()),
        }
    }
}

/// Attach a caller-facing message to a fallible store or I/O call.
pub trait InternalContext<T> {
    fn or_internal(self, context: &'static str) -> ApiResult<T>;
}

impl<T, E> InternalContext<T> for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn or_internal(self, context: &'static str) -> ApiResult<T> {
        self.map_err(|e| ApiError::internal(context, e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::BadRequest { message, details: Some(details) } => {
                json!({ "error": message, "details": details })
            }
            Self::BadRequest { message, details: None } => json!({ "error": message }),
            Self::Gone { message, expired_at } => {
                json!({ "error": message, "expired_at": expired_at })
            }
            Self::Internal { context, source } => {
                tracing::error!("{context}: {source:#}");
                json!({ "error": context })
            }
            Self::NotFound(message)
            | Self::Conflict(message)
            | Self::ServiceUnavailable(message) => json!({ "error": message }),
        };
        (status, Json(body)).into_response()
    }
}
