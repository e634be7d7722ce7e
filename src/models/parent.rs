use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Parent {
    pub parent_id: i32,
    pub parent_email: String,
    pub auth0_id: String,
    pub stripe_customer_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateParentRequest {
    pub parent_email: String,
    pub auth0_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateParentResponse {
    pub parent_id: i32,
    pub parent_email: String,
    pub auth0_id: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct GetParentRequest {
    pub auth0_id: String,
}
