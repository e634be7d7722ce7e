use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentAccount {
    pub account_id: i32,
    pub parent_id: i32,
    pub stripe_connect_account_id: String,
    pub onboarding_complete: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SaveAccountRequest {
    pub parent_id: i32,
    pub stripe_connect_account_id: String,
}

#[derive(Debug, Deserialize)]
pub struct OnboardingCompleteRequest {
    pub stripe_connect_account_id: String,
}

/// Shared by account linking and onboarding completion.
#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentAccountResponse {
    pub account_id: i32,
    pub parent_id: i32,
    pub stripe_connect_account_id: String,
    pub onboarding_complete: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentStatusRequest {
    pub parent_id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentReadiness {
    NoAccount,
    PendingOnboarding,
    Ready,
}

impl PaymentReadiness {
    pub fn of(account: Option<&PaymentAccount>) -> Self {
        match account {
            None => PaymentReadiness::NoAccount,
            Some(a) if a.onboarding_complete => PaymentReadiness::Ready,
            Some(_) => PaymentReadiness::PendingOnboarding,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PaymentReadiness::NoAccount => {
                "No payment account set up. Create a Stripe account to start receiving donations."
            }
            PaymentReadiness::PendingOnboarding => {
                "Complete Stripe onboarding to start receiving donations."
            }
            PaymentReadiness::Ready => "Payment account is ready to receive donations.",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentStatusResponse {
    pub parent_id: i32,
    pub has_account: bool,
    pub payment_account: Option<PaymentAccount>,
    pub status: PaymentReadiness,
    pub message: String,
}

impl PaymentStatusResponse {
    pub fn new(parent_id: i32, account: Option<PaymentAccount>) -> Self {
        let status = PaymentReadiness::of(account.as_ref());
        Self {
            parent_id,
            has_account: account.is_some(),
            payment_account: account,
            status,
            message: status.message().to_string(),
        }
    }
}
