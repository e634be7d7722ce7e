use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

use crate::{
    error::ApiResult,
    middleware::json::ApiJson,
    models::event::{
        CreateEventRequest, CreateEventResponse, EventDetails, EventRequest, ListEventsRequest,
        ListEventsResponse,
    },
    services::events::EventService,
    AppState,
};

pub async fn create_event(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateEventRequest>,
) -> ApiResult<(StatusCode, Json<CreateEventResponse>)> {
    let created = EventService::create(&state.db, &body, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Donation-page view of an event; 410 once it has expired.
pub async fn request_event(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<EventRequest>,
) -> ApiResult<Json<EventDetails>> {
    EventService::get_open(&state.db, body.event_id, Utc::now())
        .await
        .map(Json)
}

pub async fn list_events(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ListEventsRequest>,
) -> ApiResult<Json<ListEventsResponse>> {
    let events = EventService::list_for_parent(&state.db, body.parent_id, Utc::now()).await?;
    Ok(Json(ListEventsResponse {
        count: events.len(),
        events,
    }))
}
