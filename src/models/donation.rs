use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Smallest accepted donation, in pence.
pub const MIN_AMOUNT_PENCE: i32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Donation {
    pub id: i32,
    pub message: Option<String>,
    pub donor_name: String,
    pub amount_pence: i32,
    pub approved: bool,
    pub event_id: i32,
    pub created_at: DateTime<Utc>,
    pub video_address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDonationRequest {
    pub event_id: i32,
    pub donor_name: String,
    pub amount_pence: i32,
    pub message: Option<String>,
    pub video_address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateDonationResponse {
    pub donation_id: i32,
    pub status: String,
    /// Always false: every donation waits for parent moderation.
    pub approved: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ListDonationsRequest {
    pub event_id: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListDonationsResponse {
    pub donations: Vec<Donation>,
    #[serde(flatten)]
    pub summary: DonationSummary,
    pub event_name: String,
    pub child_name: String,
}

/// Counts and sums for one event, recomputed from every row on each listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationSummary {
    pub total_donations: usize,
    pub approved_donations: usize,
    pub pending_donations: usize,
    pub total_amount_pence: i64,
    pub approved_amount_pence: i64,
}

impl DonationSummary {
    pub fn tally(donations: &[Donation]) -> Self {
        let mut summary = donations.iter().fold(Self::default(), |mut acc, d| {
            acc.total_donations += 1;
            acc.total_amount_pence += i64::from(d.amount_pence);
            if d.approved {
                acc.approved_donations += 1;
                acc.approved_amount_pence += i64::from(d.amount_pence);
            }
            acc
        });
        summary.pending_donations = summary.total_donations - summary.approved_donations;
        summary
    }

    pub fn pending_amount_pence(&self) -> i64 {
        self.total_amount_pence - self.approved_amount_pence
    }
}

#[derive(Debug, Deserialize)]
pub struct ApproveDonationRequest {
    pub donation_id: i32,
    pub approved: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApproveDonationResponse {
    pub donation_id: i32,
    pub approved: bool,
    pub donor_name: String,
    pub message: String,
}

/// The moderation row as seen before a transition.
#[derive(Debug, Clone, FromRow)]
pub struct DonationReviewState {
    pub id: i32,
    pub donor_name: String,
    pub approved: bool,
    pub event_name: String,
    pub child_name: String,
}
