use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::{
    db::guards::Entity,
    domain::{calendar::is_expired, required_text},
    error::{ApiError, ApiResult, InternalContext},
    models::donation::{
        ApproveDonationRequest, ApproveDonationResponse, CreateDonationRequest,
        CreateDonationResponse, Donation, DonationReviewState, DonationSummary,
        ListDonationsResponse, MIN_AMOUNT_PENCE,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DonationRejection {
    #[error("This event has expired")]
    EventExpired { expired_at: DateTime<Utc> },
    #[error("Payment processing not yet available for this event")]
    PaymentsNotReady,
    #[error("Video uploads are not enabled for this event")]
    VideoNotAllowed,
}

/// What a donation needs to know about its event and the parent's payout account.
#[derive(Debug, Clone, FromRow)]
pub struct EventEligibility {
    pub expires_at: DateTime<Utc>,
    pub videos_enabled: bool,
    pub onboarding_complete: bool,
}

impl EventEligibility {
    /// Checks run in a fixed order: expiry, then payout readiness, then video policy.
    pub fn check(&self, now: DateTime<Utc>, has_video: bool) -> Result<(), DonationRejection> {
        if is_expired(self.expires_at, now) {
            return Err(DonationRejection::EventExpired {
                expired_at: self.expires_at,
            });
        }
        if !self.onboarding_complete {
            return Err(DonationRejection::PaymentsNotReady);
        }
        if has_video && !self.videos_enabled {
            return Err(DonationRejection::VideoNotAllowed);
        }
        Ok(())
    }
}

/// Result of comparing a requested approval flag with the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalOutcome {
    Unchanged,
    Changed,
}

impl ApprovalOutcome {
    pub fn decide(current: bool, requested: bool) -> Self {
        if current == requested {
            ApprovalOutcome::Unchanged
        } else {
            ApprovalOutcome::Changed
        }
    }

    pub fn message(self, approved: bool) -> String {
        let state = if approved { "approved" } else { "rejected" };
        match self {
            ApprovalOutcome::Unchanged => format!("Donation is already {state}"),
            ApprovalOutcome::Changed => format!("Donation {state} successfully"),
        }
    }
}

pub struct DonationService;

impl DonationService {
    pub async fn create(
        pool: &PgPool,
        req: &CreateDonationRequest,
        now: DateTime<Utc>,
    ) -> ApiResult<CreateDonationResponse> {
        let donor_name = required_text("donor_name", &req.donor_name).map_err(ApiError::invalid_format)?;
        if req.amount_pence < MIN_AMOUNT_PENCE {
            return Err(ApiError::invalid_format(format!(
                "amount_pence must be at least {MIN_AMOUNT_PENCE}"
            )));
        }
        let video_address = req
            .video_address
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty());

        let eligibility = sqlx::query_as::<_, EventEligibility>(
            "SELECT e.expires_at, e.videos_enabled,
                    COALESCE(pa.onboarding_complete, FALSE) AS onboarding_complete
             FROM events e
             JOIN children c ON e.child_id = c.child_id
             JOIN parents p ON c.parent_id = p.parent_id
             LEFT JOIN payment_accounts pa ON p.parent_id = pa.parent_id
             WHERE e.event_id = $1",
        )
        .bind(req.event_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Entity::Event.not_found())?;

        eligibility.check(now, video_address.is_some())?;

        // Moderation is mandatory: the flag is never taken from the request.
        let donation_id: i32 = sqlx::query_scalar(
            "INSERT INTO donations (message, donor_name, amount_pence, approved, event_id, video_address)
             VALUES ($1, $2, $3, FALSE, $4, $5)
             RETURNING id",
        )
        .bind(&req.message)
        .bind(donor_name)
        .bind(req.amount_pence)
        .bind(req.event_id)
        .bind(video_address)
        .fetch_one(pool)
        .await
        .or_internal("Failed to create donation")?;

        tracing::info!(
            "donation {} of {}p pending moderation on event {}",
            donation_id,
            req.amount_pence,
            req.event_id
        );

        // TODO: create the provider payment intent here once charging is in scope.
        Ok(CreateDonationResponse {
            donation_id,
            status: "pending_payment".into(),
            approved: false,
            message: "Donation created successfully. Payment processing will be implemented next.".into(),
        })
    }

    pub async fn list_for_event(pool: &PgPool, event_id: i32) -> ApiResult<ListDonationsResponse> {
        let (event_name, child_name): (String, String) = sqlx::query_as(
            "SELECT e.event_name, c.child_name
             FROM events e
             JOIN children c ON e.child_id = c.child_id
             WHERE e.event_id = $1",
        )
        .bind(event_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Entity::Event.not_found())?;

        let donations = sqlx::query_as::<_, Donation>(
            "SELECT id, message, donor_name, amount_pence, approved, event_id, created_at, video_address
             FROM donations
             WHERE event_id = $1
             ORDER BY created_at DESC",
        )
        .bind(event_id)
        .fetch_all(pool)
        .await
        .or_internal("Failed to query donations")?;

        Ok(ListDonationsResponse {
            summary: DonationSummary::tally(&donations),
            donations,
            event_name,
            child_name,
        })
    }

    /// Approve or reject. Asking for the current state again writes nothing.
    pub async fn set_approval(
        pool: &PgPool,
        req: &ApproveDonationRequest,
    ) -> ApiResult<ApproveDonationResponse> {
        let current = sqlx::query_as::<_, DonationReviewState>(
            "SELECT d.id, d.donor_name, d.approved, e.event_name, c.child_name
             FROM donations d
             JOIN events e ON d.event_id = e.event_id
             JOIN children c ON e.child_id = c.child_id
             WHERE d.id = $1",
        )
        .bind(req.donation_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Entity::Donation.not_found())?;

        let mut outcome = ApprovalOutcome::decide(current.approved, req.approved);

        if outcome == ApprovalOutcome::Changed {
            // Conditional so a concurrent request that already flipped the flag is not written twice.
            let updated = sqlx::query("UPDATE donations SET approved = $1 WHERE id = $2 AND approved <> $1")
                .bind(req.approved)
                .bind(req.donation_id)
                .execute(pool)
                .await
                .or_internal("Failed to update donation status")?;

            if updated.rows_affected() == 0 {
                outcome = ApprovalOutcome::Unchanged;
            } else {
                tracing::info!(
                    "donation {} on '{}' for {} set approved={}",
                    current.id,
                    current.event_name,
                    current.child_name,
                    req.approved
                );
            }
        }

        Ok(ApproveDonationResponse {
            donation_id: current.id,
            approved: req.approved,
            donor_name: current.donor_name,
            message: outcome.message(req.approved),
        })
    }
}
