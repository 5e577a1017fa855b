mod common;

use axum::http::{StatusCode, header};
use common::*;

#[tokio::test]
async fn health_reports_healthy_with_environment() {
    let (app, _) = test_app(|cfg| cfg.app.environment = "staging".into());
    let resp = send(&app, get("/health")).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let v = body_json(resp).await;
    assert_eq!(v["status"], "healthy");
    assert_eq!(v["environment"], "staging");
    assert!(v["timestamp"].is_string());
}

#[tokio::test]
async fn health_stays_healthy_after_failures() {
    let (app, _) = test_app(|_| {});
    for _ in 0..3 {
        let req = Form::new()
            .file("image", "bad.png", "image/png", b"junk")
            .request("/api/resize");
        send(&app, req).await;
    }
    let resp = send(&app, get("/health")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "healthy");
}

#[tokio::test]
async fn version_reports_configured_values() {
    let (app, _) = test_app(|cfg| {
        cfg.app.version = "2.1.0".into();
        cfg.app.environment = "production".into();
    });
    let v = body_json(send(&app, get("/api/version")).await).await;
    assert_eq!(v["version"], "2.1.0");
    assert_eq!(v["service"], "image-resizer-api");
    assert_eq!(v["environment"], "production");
}

#[tokio::test]
async fn index_serves_html_shell() {
    let (app, _) = test_app(|_| {});
    let resp = send(&app, get("/")).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    let html = String::from_utf8(body_bytes(resp).await).unwrap();
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("Image Resizer"));
    assert!(html.contains("/static/style.css"));
    assert!(html.contains("/static/app.js"));
}

#[tokio::test]
async fn stylesheet_is_served() {
    let (app, _) = test_app(|_| {});
    let resp = send(&app, get("/static/style.css")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/css")
    );
}

#[tokio::test]
async fn every_response_has_request_id() {
    let (app, _) = test_app(|_| {});
    let resp = send(&app, get("/health")).await;
    let id = resp.headers()["x-request-id"].to_str().unwrap();
    assert!(id.starts_with("req_"));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (app, state) = test_app(|_| {});
    let resp = send(&app, get("/api-docs/openapi.json")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let v = body_json(resp).await;
    assert!(v["paths"]["/api/resize"].is_object());
    assert_eq!(state.stats.snapshot().total_requests, 0);
}
