use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    db::guards::{ensure_unique, Entity, Unique},
    domain::{
        calendar::{is_expired, validate_event_expiry},
        required_text,
    },
    error::{ApiError, ApiResult, InternalContext},
    models::event::{CreateEventRequest, CreateEventResponse, EventDetails, EventRow, EventSummary},
};

pub struct EventService;

impl EventService {
    pub async fn create(
        pool: &PgPool,
        req: &CreateEventRequest,
        now: DateTime<Utc>,
    ) -> ApiResult<CreateEventResponse> {
        let event_name = required_text("event_name", &req.event_name).map_err(ApiError::invalid_format)?;
        let expires_at = validate_event_expiry(&req.expires_at, now)?;

        let child_name: String = sqlx::query_scalar("SELECT child_name FROM children WHERE child_id = $1")
            .bind(req.child_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| Entity::Child.not_found())?;

        ensure_unique(
            pool,
            Unique::ActiveEventName {
                child_id: req.child_id,
                event_name,
            },
        )
        .await?;

        let event_id: i32 = sqlx::query_scalar(
            "INSERT INTO events (child_id, event_name, expires_at, event_message, videos_enabled, photo_address)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING event_id",
        )
        .bind(req.child_id)
        .bind(event_name)
        .bind(expires_at)
        .bind(&req.event_message)
        .bind(req.videos_enabled)
        .bind(&req.photo_address)
        .fetch_one(pool)
        .await
        .or_internal("Failed to create event")?;

        tracing::info!("event {} created for child {} (expires {})", event_id, req.child_id, expires_at);

        Ok(CreateEventResponse {
            event_id,
            event_name: event_name.to_string(),
            child_name,
            expires_at,
            message: "Event created successfully".into(),
        })
    }

    /// Event as shown on the donation page; `Gone` once it has expired.
    pub async fn get_open(pool: &PgPool, event_id: i32, now: DateTime<Utc>) -> ApiResult<EventDetails> {
        let event = sqlx::query_as::<_, EventDetails>(
            "SELECT e.event_id, e.child_id, e.event_name, e.expires_at, e.created_at,
                    e.event_message, e.videos_enabled, e.photo_address, c.child_name,
                    pa.stripe_connect_account_id,
                    COALESCE(pa.onboarding_complete, FALSE) AS onboarding_complete
             FROM events e
             JOIN children c ON e.child_id = c.child_id
             LEFT JOIN payment_accounts pa ON c.parent_id = pa.parent_id
             WHERE e.event_id = $1",
        )
        .bind(event_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Entity::Event.not_found())?;

        if is_expired(event.expires_at, now) {
            return Err(ApiError::Gone {
                message: "This event has expired".into(),
                expired_at: event.expires_at,
            });
        }

        Ok(event)
    }

    pub async fn list_for_parent(
        pool: &PgPool,
        parent_id: i32,
        now: DateTime<Utc>,
    ) -> ApiResult<Vec<EventSummary>> {
        let rows = sqlx::query_as::<_, EventRow>(
            "SELECT e.event_id, e.child_id, e.event_name, e.expires_at, e.created_at,
                    e.event_message, e.videos_enabled, e.photo_address, c.child_name
             FROM events e
             JOIN children c ON e.child_id = c.child_id
             WHERE c.parent_id = $1
             ORDER BY e.expires_at ASC, e.created_at DESC",
        )
        .bind(parent_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|row| EventSummary::at(row, now)).collect())
    }
}
