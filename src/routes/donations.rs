use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

use crate::{
    error::ApiResult,
    middleware::json::ApiJson,
    models::donation::{
        ApproveDonationRequest, ApproveDonationResponse, CreateDonationRequest,
        CreateDonationResponse, ListDonationsRequest, ListDonationsResponse,
    },
    services::donations::DonationService,
    AppState,
};

pub async fn create_donation(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateDonationRequest>,
) -> ApiResult<(StatusCode, Json<CreateDonationResponse>)> {
    let created = DonationService::create(&state.db, &body, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_donations(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ListDonationsRequest>,
) -> ApiResult<Json<ListDonationsResponse>> {
    DonationService::list_for_event(&state.db, body.event_id)
        .await
        .map(Json)
}

pub async fn approve_donation(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ApproveDonationRequest>,
) -> ApiResult<Json<ApproveDonationResponse>> {
    DonationService::set_approval(&state.db, &body)
        .await
        .map(Json)
}
