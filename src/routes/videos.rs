use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
    Json,
};
use chrono::Utc;

use crate::{
    error::{ApiError, ApiResult, InternalContext},
    middleware::multipart::ApiMultipart,
    models::video::{ServeVideoQuery, VideoUploadResponse},
    services::videos::VideoService,
    AppState,
};

pub async fn upload_video(
    State(state): State<AppState>,
    ApiMultipart(multipart): ApiMultipart,
) -> ApiResult<(StatusCode, Json<VideoUploadResponse>)> {
    let uploaded = VideoService::upload(&state.config, multipart, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(uploaded)))
}

pub async fn serve_video(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Query(params): Query<ServeVideoQuery>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let range = match headers.get(header::RANGE) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| ApiError::bad_request("Invalid Range header"))?,
        ),
        None => None,
    };

    let video = VideoService::open(&state.config, &filename, range).await?;

    let mut builder = Response::builder()
        .header(header::CONTENT_TYPE, video.content_type)
        .header(header::CONTENT_LENGTH, video.body.len().to_string())
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CACHE_CONTROL, "public, max-age=3600");

    builder = match video.range {
        Some((start, end)) => builder
            .status(StatusCode::PARTIAL_CONTENT)
            .header(
                header::CONTENT_RANGE,
                format!("bytes {}-{}/{}", start, end, video.file_size),
            ),
        None => builder.status(StatusCode::OK),
    };

    if params.wants_download() {
        builder = builder.header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        );
    }

    builder
        .body(Body::from(video.body))
        .or_internal("Failed to build video response")
}
