mod common;

use axum::http::StatusCode;
use common::*;

#[tokio::test]
async fn info_reports_png_metadata() {
    let (app, state) = test_app(|_| {});
    let payload = png(800, 600);
    let req = Form::new()
        .file("image", "landscape.png", "image/png", &payload)
        .request("/api/info");
    let resp = send(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let v = body_json(resp).await;
    assert_eq!(v["filename"], "landscape.png");
    assert_eq!(v["format"], "PNG");
    assert_eq!(v["mode"], "RGB");
    assert_eq!(v["width"], 800);
    assert_eq!(v["height"], 600);
    assert_eq!(v["size"], serde_json::json!([800, 600]));
    assert_eq!(v["file_size_bytes"], payload.len() as u64);

    // 元数据读取不影响缩放计数
    let s = state.stats.snapshot();
    assert_eq!((s.successful_resizes, s.failed_resizes), (0, 0));
}

#[tokio::test]
async fn info_reports_jpeg_format() {
    let (app, _) = test_app(|_| {});
    let req = Form::new()
        .file("image", "p.jpg", "image/jpeg", &jpeg(31, 17))
        .request("/api/info");
    let v = body_json(send(&app, req).await).await;
    assert_eq!(v["format"], "JPEG");
    assert_eq!(v["size"], serde_json::json!([31, 17]));
}

#[tokio::test]
async fn info_without_image_is_rejected() {
    let (app, state) = test_app(|_| {});
    let req = Form::new().text("note", "hi").request("/api/info");
    let resp = send(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(resp).await, "No image file provided");
    assert_eq!(state.stats.snapshot().failed_resizes, 0);
}

#[tokio::test]
async fn info_on_garbage_is_server_error() {
    let (app, state) = test_app(|_| {});
    let req = Form::new()
        .file("image", "x.bin", "application/octet-stream", b"garbage bytes")
        .request("/api/info");
    let resp = send(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        error_message(resp)
            .await
            .starts_with("Failed to get image info: ")
    );
    assert_eq!(state.stats.snapshot().failed_resizes, 0);
}
