use axum::extract::{rejection::JsonRejection, FromRequest, Request};

use crate::error::ApiError;

/// `axum::Json` whose rejection is reported as a structured `BadRequest`
/// (`{"error": "Invalid request format", "details": ...}`) instead of plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::invalid_format(rejection.body_text())),
        }
    }
}
