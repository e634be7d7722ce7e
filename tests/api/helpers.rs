use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tower::ServiceExt;
use uuid::Uuid;

use birthday_fund_api::{app, config::Config, db, AppState};

pub const BOUNDARY: &str = "----birthday-fund-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub db: PgPool,
    pub video_dir: PathBuf,
}

impl TestApp {
    fn build(pool: PgPool, video_max_bytes: u64) -> Self {
        let video_dir = std::env::temp_dir().join(format!("birthday-fund-videos-{}", Uuid::new_v4()));
        let config = Config {
            database_url: String::new(),
            host: "127.0.0.1".into(),
            port: 8080,
            video_dir: video_dir.to_string_lossy().into_owned(),
            video_max_bytes,
            public_base_url: "http://localhost:8080".into(),
            cors_origin: None,
        };
        let state = AppState {
            db: pool.clone(),
            config: Arc::new(config),
        };
        let router = app::router(state).expect("Failed to build router");

        Self {
            router,
            db: pool,
            video_dir,
        }
    }

    /// An app whose pool points nowhere; fine for any request rejected before the store is touched.
    pub fn without_db() -> Self {
        Self::without_db_with_limit(birthday_fund_api::config::DEFAULT_VIDEO_MAX_BYTES)
    }

    pub fn without_db_with_limit(video_max_bytes: u64) -> Self {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(250))
            .connect_lazy("postgres://nobody@127.0.0.1:1/unreachable")
            .expect("Failed to create lazy pool");
        Self::build(pool, video_max_bytes)
    }

    /// Connects to `TEST_DATABASE_URL`; `None` when it is not set so the caller can skip.
    pub async fn with_db() -> Option<Self> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = db::create_pool(&url).await.expect("Failed to connect to test database");
        db::run_migrations(&pool).await.expect("Failed to migrate test database");
        Some(Self::build(pool, birthday_fund_api::config::DEFAULT_VIDEO_MAX_BYTES))
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_raw(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = self.send(request).await;
        let status = response.status();
        (status, body_json(response).await)
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.post_raw(uri, &body.to_string()).await
    }

    pub async fn upload(&self, field: &str, file_name: &str, content: &[u8]) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/uploads/video")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(field, file_name, content)))
            .unwrap();
        let response = self.send(request).await;
        let status = response.status();
        (status, body_json(response).await)
    }

    pub async fn get(&self, uri: &str, range: Option<&str>) -> Response {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(range) = range {
            builder = builder.header(header::RANGE, range);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.video_dir);
    }
}

pub fn multipart_body(field: &str, file_name: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body")
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = body_bytes(response).await;
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", Uuid::new_v4().simple())
}

pub fn unique_identity() -> String {
    format!("auth0|{}", Uuid::new_v4().simple())
}
