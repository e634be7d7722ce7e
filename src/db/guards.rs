use sqlx::PgPool;

use crate::error::{ApiError, ApiResult};

/// Tables addressed by integer primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Parent,
    Child,
    Event,
    Donation,
}

impl Entity {
    fn table(self) -> &'static str {
        match self {
            Entity::Parent => "parents",
            Entity::Child => "children",
            Entity::Event => "events",
            Entity::Donation => "donations",
        }
    }

    fn key(self) -> &'static str {
        match self {
            Entity::Parent => "parent_id",
            Entity::Child => "child_id",
            Entity::Event => "event_id",
            Entity::Donation => "id",
        }
    }

    pub fn not_found(self) -> ApiError {
        let label = match self {
            Entity::Parent => "Parent",
            Entity::Child => "Child",
            Entity::Event => "Event",
            Entity::Donation => "Donation",
        };
        ApiError::NotFound(format!("{label} not found"))
    }
}

/// Fails with `NotFound` unless a row with this primary key exists.
pub async fn ensure_exists(pool: &PgPool, entity: Entity, id: i32) -> ApiResult<()> {
    let (table, key) = (entity.table(), entity.key());
    let exists: bool = sqlx::query_scalar(&format!(
        "SELECT EXISTS(SELECT 1 FROM {table} WHERE {key} = $1)"
    ))
    .bind(id)
    .fetch_one(pool)
    .await?;

    if exists {
        Ok(())
    } else {
        Err(entity.not_found())
    }
}

/// A value that must not already be held by another row.
#[derive(Debug, Clone, Copy)]
pub enum Unique<'a> {
    ParentEmail(&'a str),
    ParentIdentity(&'a str),
    ChildEmail(&'a str),
    /// Event names only collide while the existing event is still open.
    ActiveEventName { child_id: i32, event_name: &'a str },
    AccountForParent(i32),
    ConnectAccount(&'a str),
}

impl Unique<'_> {
    pub fn conflict(&self) -> ApiError {
        let message = match self {
            Unique::ParentEmail(_) => "A parent with this email already exists",
            Unique::ParentIdentity(_) => "A parent with this Auth0 ID already exists",
            Unique::ChildEmail(_) => "A child with this email already exists",
            Unique::ActiveEventName { .. } => {
                "An active event with this name already exists for this child"
            }
            Unique::AccountForParent(_) => "Parent already has a Stripe account",
            Unique::ConnectAccount(_) => "This Stripe account is already linked to another parent",
        };
        ApiError::Conflict(message.into())
    }
}

/// Fails with `Conflict` when the value is already taken; performs no mutation.
pub async fn ensure_unique(pool: &PgPool, candidate: Unique<'_>) -> ApiResult<()> {
    let taken: bool = match candidate {
        Unique::ParentEmail(email) => {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM parents WHERE parent_email = $1)")
                .bind(email)
                .fetch_one(pool)
                .await?
        }
        Unique::ParentIdentity(auth0_id) => {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM parents WHERE auth0_id = $1)")
                .bind(auth0_id)
                .fetch_one(pool)
                .await?
        }
        Unique::ChildEmail(email) => {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM children WHERE email = $1)")
                .bind(email)
                .fetch_one(pool)
                .await?
        }
        Unique::ActiveEventName { child_id, event_name } => {
            sqlx::query_scalar(
                "SELECT EXISTS(
                    SELECT 1 FROM events
                    WHERE child_id = $1 AND event_name = $2 AND expires_at > NOW()
                 )",
            )
            .bind(child_id)
            .bind(event_name)
            .fetch_one(pool)
            .await?
        }
        Unique::AccountForParent(parent_id) => {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM payment_accounts WHERE parent_id = $1)")
                .bind(parent_id)
                .fetch_one(pool)
                .await?
        }
        Unique::ConnectAccount(account) => sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM payment_accounts WHERE stripe_connect_account_id = $1)",
        )
        .bind(account)
        .fetch_one(pool)
        .await?,
    };

    if taken {
        Err(candidate.conflict())
    } else {
        Ok(())
    }
}
