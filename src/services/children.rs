use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    db::{
        guards::{ensure_exists, ensure_unique, Entity, Unique},
        unique_violation,
    },
    domain::{calendar::validate_birth_date, required_text, EmailAddress},
    error::{ApiError, ApiResult},
    models::child::{Child, CreateChildRequest, CreateChildResponse},
};

pub struct ChildService;

impl ChildService {
    pub async fn list_for_parent(pool: &PgPool, parent_id: i32) -> ApiResult<Vec<Child>> {
        let children = sqlx::query_as::<_, Child>(
            "SELECT child_id, dob, parent_id, email, isa_expiry, created_at, child_name
             FROM children
             WHERE parent_id = $1
             ORDER BY child_name ASC",
        )
        .bind(parent_id)
        .fetch_all(pool)
        .await?;
        Ok(children)
    }

    /// Dates are checked before the parent lookup so malformed requests never reach the store.
    pub async fn create(
        pool: &PgPool,
        req: &CreateChildRequest,
        now: DateTime<Utc>,
    ) -> ApiResult<CreateChildResponse> {
        let child_name = required_text("child_name", &req.child_name).map_err(ApiError::invalid_format)?;
        let email: EmailAddress = req.email.parse().map_err(ApiError::invalid_format)?;
        let birth = validate_birth_date(&req.dob, now)?;

        ensure_exists(pool, Entity::Parent, req.parent_id).await?;
        ensure_unique(pool, Unique::ChildEmail(email.as_ref())).await?;

        let child_id: i32 = sqlx::query_scalar(
            "INSERT INTO children (dob, parent_id, email, isa_expiry, child_name)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING child_id",
        )
        .bind(birth.dob)
        .bind(req.parent_id)
        .bind(email.as_ref())
        .bind(birth.isa_expiry)
        .bind(child_name)
        .fetch_one(pool)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some(_) => Unique::ChildEmail(email.as_ref()).conflict(),
            None => ApiError::internal("Failed to create child", e),
        })?;

        tracing::info!(
            "child {} created for parent {} (ISA expiry {})",
            child_id,
            req.parent_id,
            birth.isa_expiry
        );

        Ok(CreateChildResponse {
            child_id,
            child_name: child_name.to_string(),
            isa_expiry: birth.isa_expiry,
            message: "Child created successfully".into(),
        })
    }
}
