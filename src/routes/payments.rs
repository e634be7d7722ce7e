use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::ApiResult,
    middleware::json::ApiJson,
    models::payment::{
        OnboardingCompleteRequest, PaymentAccountResponse, PaymentStatusRequest,
        PaymentStatusResponse, SaveAccountRequest,
    },
    services::payments::PaymentService,
    AppState,
};

pub async fn save_account(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SaveAccountRequest>,
) -> ApiResult<(StatusCode, Json<PaymentAccountResponse>)> {
    let saved =
        PaymentService::save_account(&state.db, body.parent_id, &body.stripe_connect_account_id).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn onboarding_complete(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<OnboardingCompleteRequest>,
) -> ApiResult<Json<PaymentAccountResponse>> {
    PaymentService::complete_onboarding(&state.db, &body.stripe_connect_account_id)
        .await
        .map(Json)
}

pub async fn payment_status(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<PaymentStatusRequest>,
) -> ApiResult<Json<PaymentStatusResponse>> {
    PaymentService::status(&state.db, body.parent_id)
        .await
        .map(Json)
}
