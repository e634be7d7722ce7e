use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{config::Config, routes, AppState};

/// Headroom on top of the largest video for multipart framing.
const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;

fn cors(config: &Config) -> anyhow::Result<CorsLayer> {
    let origin = match &config.cors_origin {
        Some(origin) => AllowOrigin::exact(HeaderValue::from_str(origin)?),
        None => AllowOrigin::any(),
    };

    Ok(CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::RANGE])
        .allow_origin(origin))
}

pub fn router(state: AppState) -> anyhow::Result<Router> {
    let cors = cors(&state.config)?;
    let body_limit = state.config.video_max_bytes + MULTIPART_OVERHEAD_BYTES;

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        // Parents
        .route("/api/parents/create", post(routes::parents::create_parent))
        .route("/api/parents/get", post(routes::parents::get_parent))
        // Children
        .route("/api/children/create", post(routes::children::create_child))
        .route("/api/children/list", post(routes::children::list_children))
        // Events
        .route("/api/events/create", post(routes::events::create_event))
        .route("/api/events/request", post(routes::events::request_event))
        .route("/api/events/list", post(routes::events::list_events))
        // Donations
        .route("/api/donations/create", post(routes::donations::create_donation))
        .route("/api/donations/list", post(routes::donations::list_donations))
        .route("/api/donations/approve", post(routes::donations::approve_donation))
        // Payments
        .route("/api/payments/save-account", post(routes::payments::save_account))
        .route("/api/payments/onboarding-complete", post(routes::payments::onboarding_complete))
        .route("/api/payments/status", post(routes::payments::payment_status))
        // Videos
        .route("/api/uploads/video", post(routes::videos::upload_video))
        .route("/api/videos/{filename}", get(routes::videos::serve_video))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(body_limit as usize))
        .with_state(state);

    Ok(app)
}
