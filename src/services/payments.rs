use sqlx::PgPool;

use crate::{
    db::{
        guards::{ensure_exists, ensure_unique, Entity, Unique},
        unique_violation,
    },
    domain::ConnectAccountId,
    error::{ApiError, ApiResult, InternalContext},
    models::payment::{PaymentAccount, PaymentAccountResponse, PaymentStatusResponse},
};

const ACCOUNT_COLS: &str =
    "account_id, parent_id, stripe_connect_account_id, onboarding_complete, created_at";

pub struct PaymentService;

impl PaymentService {
    /// Links a payout account created client-side. Onboarding always starts incomplete.
    pub async fn save_account(
        pool: &PgPool,
        parent_id: i32,
        raw_account: &str,
    ) -> ApiResult<PaymentAccountResponse> {
        let account: ConnectAccountId = raw_account.parse().map_err(ApiError::bad_request)?;

        ensure_exists(pool, Entity::Parent, parent_id).await?;
        ensure_unique(pool, Unique::AccountForParent(parent_id)).await?;
        ensure_unique(pool, Unique::ConnectAccount(account.as_ref())).await?;

        let saved = sqlx::query_as::<_, PaymentAccount>(&format!(
            "INSERT INTO payment_accounts (parent_id, stripe_connect_account_id, onboarding_complete)
             VALUES ($1, $2, FALSE)
             RETURNING {ACCOUNT_COLS}"
        ))
        .bind(parent_id)
        .bind(account.as_ref())
        .fetch_one(pool)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some("payment_accounts_parent_id_key") => Unique::AccountForParent(parent_id).conflict(),
            Some(_) => Unique::ConnectAccount(account.as_ref()).conflict(),
            None => ApiError::internal("Failed to save payment account", e),
        })?;

        tracing::info!("payment account {} linked to parent {}", saved.account_id, parent_id);

        Ok(PaymentAccountResponse {
            account_id: saved.account_id,
            parent_id: saved.parent_id,
            stripe_connect_account_id: saved.stripe_connect_account_id,
            onboarding_complete: saved.onboarding_complete,
            message: "Stripe account linked successfully. Complete onboarding to start receiving payments."
                .into(),
        })
    }

    /// Marks onboarding complete. The flag only ever moves from false to true.
    pub async fn complete_onboarding(pool: &PgPool, raw_account: &str) -> ApiResult<PaymentAccountResponse> {
        let account: ConnectAccountId = raw_account.parse().map_err(ApiError::bad_request)?;

        let current = Self::find_by_connect_account(pool, &account)
            .await?
            .ok_or_else(|| ApiError::NotFound("Stripe account not found".into()))?;

        if current.onboarding_complete {
            return Ok(already_complete(current));
        }

        let updated = sqlx::query_as::<_, PaymentAccount>(&format!(
            "UPDATE payment_accounts
             SET onboarding_complete = TRUE
             WHERE stripe_connect_account_id = $1 AND onboarding_complete = FALSE
             RETURNING {ACCOUNT_COLS}"
        ))
        .bind(account.as_ref())
        .fetch_optional(pool)
        .await
        .or_internal("Failed to update onboarding status")?;

        // No row means another request completed it between the read and the write.
        let Some(updated) = updated else {
            return Ok(already_complete(current));
        };

        tracing::info!("payment account {} completed onboarding", updated.account_id);

        Ok(PaymentAccountResponse {
            account_id: updated.account_id,
            parent_id: updated.parent_id,
            stripe_connect_account_id: updated.stripe_connect_account_id,
            onboarding_complete: true,
            message: "Onboarding completed successfully. Account can now receive payments.".into(),
        })
    }

    pub async fn status(pool: &PgPool, parent_id: i32) -> ApiResult<PaymentStatusResponse> {
        ensure_exists(pool, Entity::Parent, parent_id).await?;

        let account = sqlx::query_as::<_, PaymentAccount>(&format!(
            "SELECT {ACCOUNT_COLS} FROM payment_accounts WHERE parent_id = $1"
        ))
        .bind(parent_id)
        .fetch_optional(pool)
        .await
        .or_internal("Failed to query payment account")?;

        Ok(PaymentStatusResponse::new(parent_id, account))
    }

    async fn find_by_connect_account(
        pool: &PgPool,
        account: &ConnectAccountId,
    ) -> ApiResult<Option<PaymentAccount>> {
        let found = sqlx::query_as::<_, PaymentAccount>(&format!(
            "SELECT {ACCOUNT_COLS} FROM payment_accounts WHERE stripe_connect_account_id = $1"
        ))
        .bind(account.as_ref())
        .fetch_optional(pool)
        .await?;
        Ok(found)
    }
}

fn already_complete(account: PaymentAccount) -> PaymentAccountResponse {
    PaymentAccountResponse {
        account_id: account.account_id,
        parent_id: account.parent_id,
        stripe_connect_account_id: account.stripe_connect_account_id,
        onboarding_complete: true,
        message: "Onboarding was already complete".into(),
    }
}
