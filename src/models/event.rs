use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::domain::calendar::{days_remaining, is_expired};

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub child_id: i32,
    pub event_name: String,
    /// "YYYY-MM-DD"; the event closes at midnight UTC that day.
    pub expires_at: String,
    pub event_message: Option<String>,
    #[serde(default)]
    pub videos_enabled: bool,
    pub photo_address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateEventResponse {
    pub event_id: i32,
    pub event_name: String,
    pub child_name: String,
    pub expires_at: DateTime<Utc>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub event_id: i32,
}

/// Public view of one event for the donation page, including whether the
/// owning parent can receive funds yet.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventDetails {
    pub event_id: i32,
    pub child_id: i32,
    pub event_name: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub event_message: Option<String>,
    pub videos_enabled: bool,
    pub photo_address: Option<String>,
    pub child_name: String,
    pub stripe_connect_account_id: Option<String>,
    pub onboarding_complete: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub event_id: i32,
    pub child_id: i32,
    pub event_name: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub event_message: Option<String>,
    pub videos_enabled: bool,
    pub photo_address: Option<String>,
    pub child_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSummary {
    pub event_id: i32,
    pub child_id: i32,
    pub event_name: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub event_message: Option<String>,
    pub videos_enabled: bool,
    pub photo_address: Option<String>,
    pub child_name: String,
    pub is_expired: bool,
    pub days_remaining: i64,
}

impl EventSummary {
    /// Expiry fields are derived from the wall clock on every read.
    pub fn at(row: EventRow, now: DateTime<Utc>) -> Self {
        Self {
            is_expired: is_expired(row.expires_at, now),
            days_remaining: days_remaining(row.expires_at, now),
            event_id: row.event_id,
            child_id: row.child_id,
            event_name: row.event_name,
            expires_at: row.expires_at,
            created_at: row.created_at,
            event_message: row.event_message,
            videos_enabled: row.videos_enabled,
            photo_address: row.photo_address,
            child_name: row.child_name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListEventsRequest {
    pub parent_id: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListEventsResponse {
    pub events: Vec<EventSummary>,
    pub count: usize,
}
