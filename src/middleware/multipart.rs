use axum::extract::{FromRequest, Multipart, Request};

use crate::error::ApiError;

/// `axum::extract::Multipart` whose rejection (wrong content type, missing
/// boundary) is reported as a structured `BadRequest` like `ApiJson`.
pub struct ApiMultipart(pub Multipart);

impl<S> FromRequest<S> for ApiMultipart
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Multipart::from_request(req, state)
            .await
            .map(Self)
            .map_err(|rejection| ApiError::invalid_format(rejection.body_text()))
    }
}
