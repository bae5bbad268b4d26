use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use goaltrack_core::utils::FixedClock;
use goaltrack_server::{api::app_router, build_state_with_clock, config::Config};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

struct TestApp {
    router: Router,
    clock: Arc<FixedClock>,
    _dir: TempDir,
}

async fn build_test_app(today: NaiveDate) -> TestApp {
    let dir = tempdir().unwrap();
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: dir.path().join("test.db").to_string_lossy().to_string(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(30),
    };
    let clock = Arc::new(FixedClock::at_date(today));
    let state = build_state_with_clock(&config, clock.clone()).await.unwrap();
    TestApp {
        router: app_router(state, &config),
        clock,
        _dir: dir,
    }
}

async fn send(
    app: &TestApp,
    method: Method,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("X-User-Id", user);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).to_string())
        })
    };
    (status, value)
}

async fn register(app: &TestApp, username: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/users",
        None,
        Some(json!({ "username": username, "email": format!("{}@example.com", username) })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn healthz_works() {
    let app = build_test_app(date(2024, 1, 1)).await;
    let (status, body) = send(&app, Method::GET, "/api/v1/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_string()));
}

#[tokio::test]
async fn goal_day_tracking_flow() {
    let app = build_test_app(date(2024, 1, 1)).await;
    let user = register(&app, "tracker").await;

    let (status, goal) = send(
        &app,
        Method::POST,
        "/api/v1/goals",
        Some(&user),
        Some(json!({
            "title": "Meditate",
            "description": "ten minutes",
            "startDate": "2024-01-01",
            "endDate": "2024-01-03"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", goal);
    assert_eq!(goal["totalDays"], 3);
    assert_eq!(goal["completedDays"], 0);
    let id = goal["id"].as_str().unwrap().to_string();

    app.clock.set_date(date(2024, 1, 2));
    let (status, toggled) = send(
        &app,
        Method::POST,
        &format!("/api/v1/goals/{}/days/2024-01-02/toggle", id),
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", toggled);
    assert_eq!(toggled["completed"], true);
    assert_eq!(toggled["message"], "Day marked as completed!");

    let (_, progress) = send(
        &app,
        Method::GET,
        &format!("/api/v1/goals/{}/progress", id),
        Some(&user),
        None,
    )
    .await;
    assert_eq!(progress["completedDays"], 1);
    assert_eq!(progress["remainingDays"], 2);
    let pct = progress["progressPercentage"].as_f64().unwrap();
    assert!((pct - 33.33).abs() < 0.01);

    let (_, days) = send(
        &app,
        Method::GET,
        &format!("/api/v1/goals/{}/days", id),
        Some(&user),
        None,
    )
    .await;
    let flags: Vec<bool> = days
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["completed"].as_bool().unwrap())
        .collect();
    assert_eq!(flags, vec![false, true, false]);
    assert_eq!(days[0]["date"], "2024-01-01");

    let (status, rejected) = send(
        &app,
        Method::POST,
        &format!("/api/v1/goals/{}/days/2024-01-03/toggle", id),
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(rejected["code"], 400);

    let (_, working) = send(
        &app,
        Method::GET,
        "/api/v1/goals?filter=working",
        Some(&user),
        None,
    )
    .await;
    assert_eq!(working.as_array().unwrap().len(), 1);
    let (_, completed) = send(
        &app,
        Method::GET,
        "/api/v1/goals?filter=completed",
        Some(&user),
        None,
    )
    .await;
    assert!(completed.as_array().unwrap().is_empty());

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/goals/{}", id),
        Some(&user),
        Some(json!({
            "title": "Meditate daily",
            "startDate": "2024-01-01",
            "endDate": "2024-01-10"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["totalDays"], 10);
    assert_eq!(updated["completedDays"], 0);
    assert_eq!(updated["description"], Value::Null);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/goals/{}", id),
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, missing) = send(
        &app,
        Method::GET,
        &format!("/api/v1/goals/{}", id),
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["code"], 404);
}

#[tokio::test]
async fn goals_require_user_header() {
    let app = build_test_app(date(2024, 1, 1)).await;
    let (status, body) = send(&app, Method::GET, "/api/v1/goals", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);
}

#[tokio::test]
async fn invalid_goals_are_rejected_before_storage() {
    let app = build_test_app(date(2024, 5, 10)).await;
    let user = register(&app, "validator").await;

    let cases = [
        json!({ "title": "No", "startDate": "2024-05-10", "endDate": "2024-05-12" }),
        json!({ "title": "Backwards", "startDate": "2024-05-12", "endDate": "2024-05-10" }),
        json!({ "title": "Same day", "startDate": "2024-05-10", "endDate": "2024-05-10" }),
        json!({ "title": "Too long", "startDate": "2024-05-10", "endDate": "2025-05-11" }),
        json!({ "title": "Past start", "startDate": "2024-05-09", "endDate": "2024-05-12" }),
    ];
    for case in cases {
        let (status, body) =
            send(&app, Method::POST, "/api/v1/goals", Some(&user), Some(case)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    }

    let (_, goals) = send(&app, Method::GET, "/api/v1/goals", Some(&user), None).await;
    assert!(goals.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_owner_and_duplicate_username() {
    let app = build_test_app(date(2024, 1, 1)).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/goals",
        Some("nobody"),
        Some(json!({ "title": "Orphan", "startDate": "2024-01-01", "endDate": "2024-01-02" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    register(&app, "unique").await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/users",
        None,
        Some(json!({ "username": "unique", "email": "again@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn malformed_requests_get_json_errors() {
    let app = build_test_app(date(2024, 1, 1)).await;
    let user = register(&app, "sloppy").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/goals/abc/days/not-a-date/toggle",
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["code"], 400);
    assert!(body["message"].is_string());

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/goals?filter=bogus",
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["code"], 400);
    assert!(body["message"].is_string());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/goals",
        Some(&user),
        Some(json!({ "title": "Run" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["code"], 400);
    assert!(body["message"].as_str().unwrap().contains("startDate"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/users",
        None,
        Some(json!({ "username": "noemail" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["code"], 400);
}
