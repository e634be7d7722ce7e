use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

use crate::{
    error::ApiResult,
    middleware::json::ApiJson,
    models::child::{CreateChildRequest, CreateChildResponse, ListChildrenRequest, ListChildrenResponse},
    services::children::ChildService,
    AppState,
};

pub async fn create_child(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateChildRequest>,
) -> ApiResult<(StatusCode, Json<CreateChildResponse>)> {
    let created = ChildService::create(&state.db, &body, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_children(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ListChildrenRequest>,
) -> ApiResult<Json<ListChildrenResponse>> {
    let children = ChildService::list_for_parent(&state.db, body.parent_id).await?;
    Ok(Json(ListChildrenResponse {
        count: children.len(),
        children,
    }))
}
