#![allow(dead_code)]

use std::io::Cursor;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use tower::ServiceExt;

use image_resizer_api::{AppConfig, AppState, build_router};

pub const BOUNDARY: &str = "----image-resizer-test-boundary";

/// 构造测试用路由；返回 state 以便直接检查计数器
pub fn test_app(configure: impl FnOnce(&mut AppConfig)) -> (Router, AppState) {
    let mut cfg = AppConfig::default();
    cfg.image.max_parallel = 2;
    configure(&mut cfg);
    let state = AppState::new(cfg);
    (build_router(state.clone()), state)
}

pub fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).expect("encode fixture");
    out.into_inner()
}

pub fn png(w: u32, h: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(w, h, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 90]));
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Png)
}

pub fn jpeg(w: u32, h: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(w, h, Rgb([10, 120, 200]));
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg)
}

/// 手工拼装 multipart/form-data 请求体
#[derive(Default)]
pub struct Form {
    buf: Vec<u8>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                .as_bytes(),
        );
        self
    }

    pub fn request(mut self, uri: &str) -> Request<Body> {
        self.buf
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.buf))
            .expect("build request")
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("build request")
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.expect("call app")
}

pub async fn body_bytes(resp: Response<Body>) -> Vec<u8> {
    to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body")
        .to_vec()
}

pub async fn body_json(resp: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(resp).await).expect("parse json")
}

pub async fn error_message(resp: Response<Body>) -> String {
    body_json(resp).await["error"]
        .as_str()
        .expect("error field")
        .to_string()
}
