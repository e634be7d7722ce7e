use sqlx::PgPool;

use crate::{
    db::{
        guards::{ensure_unique, Entity, Unique},
        unique_violation,
    },
    domain::{EmailAddress, ExternalIdentity},
    error::{ApiError, ApiResult},
    models::parent::{CreateParentRequest, CreateParentResponse, Parent},
};

pub struct ParentService;

impl ParentService {
    pub async fn create(pool: &PgPool, req: &CreateParentRequest) -> ApiResult<CreateParentResponse> {
        let email: EmailAddress = req.parent_email.parse().map_err(ApiError::invalid_format)?;
        let identity: ExternalIdentity = req.auth0_id.parse().map_err(ApiError::bad_request)?;

        ensure_unique(pool, Unique::ParentIdentity(identity.as_ref())).await?;
        ensure_unique(pool, Unique::ParentEmail(email.as_ref())).await?;

        let parent_id: i32 = sqlx::query_scalar(
            "INSERT INTO parents (parent_email, auth0_id)
             VALUES ($1, $2)
             RETURNING parent_id",
        )
        .bind(email.as_ref())
        .bind(identity.as_ref())
        .fetch_one(pool)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some("parents_auth0_id_key") => Unique::ParentIdentity(identity.as_ref()).conflict(),
            Some(_) => Unique::ParentEmail(email.as_ref()).conflict(),
            None => ApiError::internal("Failed to create parent account", e),
        })?;

        tracing::info!("parent {} registered", parent_id);

        Ok(CreateParentResponse {
            parent_id,
            parent_email: email.to_string(),
            auth0_id: identity.as_ref().to_string(),
            message: "Parent account created successfully".into(),
        })
    }

    /// Lookup by identity-provider subject; blank subjects are rejected before querying.
    pub async fn get_by_identity(pool: &PgPool, auth0_id: &str) -> ApiResult<Parent> {
        if auth0_id.trim().is_empty() {
            return Err(ApiError::bad_request("Auth0 ID is required"));
        }

        sqlx::query_as::<_, Parent>(
            "SELECT parent_id, parent_email, auth0_id, stripe_customer_id, created_at
             FROM parents
             WHERE auth0_id = $1",
        )
        .bind(auth0_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Entity::Parent.not_found())
    }
}
