use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Child {
    pub child_id: i32,
    pub dob: NaiveDate,
    pub parent_id: i32,
    pub email: String,
    /// Fixed at creation; never recomputed from `dob`.
    pub isa_expiry: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub child_name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateChildRequest {
    pub parent_id: i32,
    pub child_name: String,
    /// "YYYY-MM-DD"
    pub dob: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateChildResponse {
    pub child_id: i32,
    pub child_name: String,
    pub isa_expiry: NaiveDate,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ListChildrenRequest {
    pub parent_id: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListChildrenResponse {
    pub children: Vec<Child>,
    pub count: usize,
}
