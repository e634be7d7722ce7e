//! Scenarios that need a live Postgres; they skip unless `TEST_DATABASE_URL` is set.

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use crate::helpers::{unique_email, unique_identity, TestApp};

async fn app_or_skip() -> Option<TestApp> {
    let app = TestApp::with_db().await;
    if app.is_none() {
        eprintln!("TEST_DATABASE_URL not set, skipping");
    }
    app
}

fn days_from_today(days: i64) -> String {
    (Utc::now().date_naive() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

async fn create_parent(app: &TestApp) -> i64 {
    let (status, body) = app
        .post_json(
            "/api/parents/create",
            json!({ "parent_email": unique_email("parent"), "auth0_id": unique_identity() }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["parent_id"].as_i64().unwrap()
}

async fn create_child(app: &TestApp, parent_id: i64) -> i64 {
    let (status, body) = app
        .post_json(
            "/api/children/create",
            json!({
                "parent_id": parent_id,
                "child_name": "Ada",
                "dob": "2017-07-15",
                "email": unique_email("child")
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["isa_expiry"], "2035-07-15");
    body["child_id"].as_i64().unwrap()
}

async fn create_event(app: &TestApp, child_id: i64, videos_enabled: bool) -> i64 {
    let (status, body) = app
        .post_json(
            "/api/events/create",
            json!({
                "child_id": child_id,
                "event_name": format!("Birthday {}", uuid::Uuid::new_v4().simple()),
                "expires_at": days_from_today(30),
                "videos_enabled": videos_enabled
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["child_name"], "Ada");
    body["event_id"].as_i64().unwrap()
}

async fn donate(app: &TestApp, event_id: i64, amount_pence: i64, video: Option<&str>) -> (StatusCode, Value) {
    app.post_json(
        "/api/donations/create",
        json!({
            "event_id": event_id,
            "donor_name": "Gran",
            "amount_pence": amount_pence,
            "message": "Happy birthday!",
            "video_address": video
        }),
    )
    .await
}

#[tokio::test]
async fn parent_registration_is_unique() {
    let Some(app) = app_or_skip().await else { return };
    let request = json!({ "parent_email": unique_email("parent"), "auth0_id": unique_identity() });

    let (status, body) = app.post_json("/api/parents/create", request.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Parent account created successfully");

    let (status, _) = app.post_json("/api/parents/create", request.clone()).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .post_json("/api/parents/get", json!({ "auth0_id": request["auth0_id"] }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["parent_email"], request["parent_email"]);
}

#[tokio::test]
async fn unknown_records_are_not_found() {
    let Some(app) = app_or_skip().await else { return };

    let (status, body) = app
        .post_json("/api/parents/get", json!({ "auth0_id": unique_identity() }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Parent not found");

    let (status, _) = app
        .post_json("/api/events/request", json!({ "event_id": i32::MAX }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post_json(
            "/api/donations/approve",
            json!({ "donation_id": i32::MAX, "approved": true }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_active_event_name_conflicts() {
    let Some(app) = app_or_skip().await else { return };
    let parent_id = create_parent(&app).await;
    let child_id = create_child(&app, parent_id).await;
    let request = json!({
        "child_id": child_id,
        "event_name": "10th Birthday",
        "expires_at": days_from_today(30)
    });

    let (status, _) = app.post_json("/api/events/create", request.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app.post_json("/api/events/create", request).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .post_json("/api/events/list", json!({ "parent_id": parent_id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["events"][0]["is_expired"], false);
    assert_eq!(body["events"][0]["days_remaining"], 29);
}

#[tokio::test]
async fn donations_wait_for_payout_onboarding() {
    let Some(app) = app_or_skip().await else { return };
    let parent_id = create_parent(&app).await;
    let child_id = create_child(&app, parent_id).await;
    let event_id = create_event(&app, child_id, false).await;

    let (status, body) = app
        .post_json("/api/payments/status", json!({ "parent_id": parent_id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "no_account");

    let (status, _) = donate(&app, event_id, 500, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let account = format!("acct_{}", uuid::Uuid::new_v4().simple());
    let (status, body) = app
        .post_json(
            "/api/payments/save-account",
            json!({ "parent_id": parent_id, "stripe_connect_account_id": &account }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["onboarding_complete"], false);

    let (status, _) = donate(&app, event_id, 500, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let onboarding = json!({ "stripe_connect_account_id": &account });
    let (status, body) = app.post_json("/api/payments/onboarding-complete", onboarding.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Onboarding completed successfully. Account can now receive payments.");

    let (status, body) = app.post_json("/api/payments/onboarding-complete", onboarding).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["onboarding_complete"], true);
    assert_eq!(body["message"], "Onboarding was already complete");

    let (status, body) = app
        .post_json("/api/payments/status", json!({ "parent_id": parent_id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");

    let (status, body) = donate(&app, event_id, 500, None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["approved"], false);

    let (status, _) = donate(&app, event_id, 500, Some("http://localhost:8080/api/videos/1_a.mp4")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post_json("/api/events/request", json!({ "event_id": event_id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["onboarding_complete"], true);
    assert_eq!(body["stripe_connect_account_id"], account);
}

#[tokio::test]
async fn moderation_totals_follow_approvals() {
    let Some(app) = app_or_skip().await else { return };
    let parent_id = create_parent(&app).await;
    let child_id = create_child(&app, parent_id).await;
    let event_id = create_event(&app, child_id, true).await;

    let account = format!("acct_{}", uuid::Uuid::new_v4().simple());
    app.post_json(
        "/api/payments/save-account",
        json!({ "parent_id": parent_id, "stripe_connect_account_id": &account }),
    )
    .await;
    app.post_json(
        "/api/payments/onboarding-complete",
        json!({ "stripe_connect_account_id": &account }),
    )
    .await;

    let (_, first) = donate(&app, event_id, 1000, None).await;
    let (_, second) = donate(&app, event_id, 250, Some("http://localhost:8080/api/videos/1_a.mp4")).await;
    let first_id = first["donation_id"].as_i64().unwrap();
    assert!(second["donation_id"].is_i64());

    let approve = json!({ "donation_id": first_id, "approved": true });
    let (status, body) = app.post_json("/api/donations/approve", approve.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Donation approved successfully");

    let (status, body) = app.post_json("/api/donations/approve", approve).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Donation is already approved");

    let (status, body) = app
        .post_json("/api/donations/list", json!({ "event_id": event_id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_donations"], 2);
    assert_eq!(body["approved_donations"], 1);
    assert_eq!(body["pending_donations"], 1);
    assert_eq!(body["total_amount_pence"], 1250);
    assert_eq!(body["approved_amount_pence"], 1000);
    assert_eq!(body["child_name"], "Ada");
}

#[tokio::test]
async fn expired_event_is_gone_and_takes_no_donations() {
    let Some(app) = app_or_skip().await else { return };
    let parent_id = create_parent(&app).await;
    let child_id = create_child(&app, parent_id).await;

    let account = format!("acct_{}", uuid::Uuid::new_v4().simple());
    app.post_json(
        "/api/payments/save-account",
        json!({ "parent_id": parent_id, "stripe_connect_account_id": &account }),
    )
    .await;
    app.post_json(
        "/api/payments/onboarding-complete",
        json!({ "stripe_connect_account_id": &account }),
    )
    .await;

    // The create endpoint refuses past dates, so the expired event is written directly.
    let event_id: i32 = sqlx::query_scalar(
        "INSERT INTO events (child_id, event_name, expires_at, videos_enabled)
         VALUES ($1, 'Last year', NOW() - INTERVAL '1 day', TRUE)
         RETURNING event_id",
    )
    .bind(child_id as i32)
    .fetch_one(&app.db)
    .await
    .expect("Failed to insert expired event");

    let (status, body) = app
        .post_json("/api/events/request", json!({ "event_id": event_id }))
        .await;
    assert_eq!(status, StatusCode::GONE);
    assert_eq!(body["error"], "This event has expired");
    assert!(body["expired_at"].is_string());

    let (status, body) = donate(&app, event_id as i64, 500, None).await;
    assert_eq!(status, StatusCode::GONE);
    assert!(body["expired_at"].is_string());

    let (status, body) = app
        .post_json("/api/donations/list", json!({ "event_id": event_id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_donations"], 0);

    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM donations WHERE event_id = $1")
        .bind(event_id)
        .fetch_one(&app.db)
        .await
        .unwrap();
    assert_eq!(stored, 0);
}
