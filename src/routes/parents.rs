use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::ApiResult,
    middleware::json::ApiJson,
    models::parent::{CreateParentRequest, CreateParentResponse, GetParentRequest, Parent},
    services::parents::ParentService,
    AppState,
};

pub async fn create_parent(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateParentRequest>,
) -> ApiResult<(StatusCode, Json<CreateParentResponse>)> {
    let created = ParentService::create(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_parent(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<GetParentRequest>,
) -> ApiResult<Json<Parent>> {
    ParentService::get_by_identity(&state.db, &body.auth0_id)
        .await
        .map(Json)
}
