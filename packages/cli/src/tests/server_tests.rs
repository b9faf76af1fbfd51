use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Request, StatusCode},
};
use tower::ServiceExt;

use crate::config::Config;
use crate::server::{build_app, build_state};

fn test_config() -> Config {
    Config {
        port: 4001,
        host: "127.0.0.1".to_string(),
        cors_origin: HeaderValue::from_static("http://localhost:5173"),
        database_url: "sqlite::memory:".to_string(),
        db_max_connections: 1,
        request_deadline: Duration::from_secs(5),
        dev_user: Some("dev-user".to_string()),
        session_ttl_hours: 1,
    }
}

#[tokio::test]
async fn test_health_with_cors_header() {
    let config = test_config();
    let app = build_app(build_state(&config).await.unwrap(), &config);

    let request = Request::builder()
        .uri("/api/health")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_preflight_allows_credentialed_session_requests() {
    let config = test_config();
    let app = build_app(build_state(&config).await.unwrap(), &config);

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/plans")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:5173"
    );
}

#[tokio::test]
async fn test_dev_user_session_verifier() {
    let config = test_config();
    let app = build_app(build_state(&config).await.unwrap(), &config);

    let anonymous = Request::builder()
        .uri("/api/plans")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(anonymous).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let authed = Request::builder()
        .uri("/api/plans")
        .header(header::AUTHORIZATION, "Bearer anything")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(authed).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
