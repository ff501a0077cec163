//! Helpers for driving the router in-process with `tower::ServiceExt::oneshot`.

use std::time::Duration;

use axum::body::{Body, BodyDataStream};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use futures::StreamExt;
use serde_json::Value;
use tower::ServiceExt;

/// Response status, body text and the body parsed as JSON when it is JSON.
pub struct TestResponse {
    pub status: StatusCode,
    pub text: String,
    pub json: Option<Value>,
}

impl TestResponse {
    pub fn json(&self) -> &Value {
        self.json.as_ref().expect("response body is not JSON")
    }
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

async fn collect(response: Response<Body>) -> TestResponse {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8_lossy(&bytes).to_string();
    let json = serde_json::from_slice(&bytes).ok();

    TestResponse { status, text, json }
}

pub async fn make_request(
    app: &Router,
    method: Method,
    path: &str,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> TestResponse {
    match body {
        Some(json_body) => {
            let mut all_headers = vec![("content-type", "application/json")];
            all_headers.extend_from_slice(headers);
            send_raw(app, method, path, &json_body.to_string(), &all_headers).await
        }
        None => send_raw(app, method, path, "", headers).await,
    }
}

/// Send a body exactly as given; no content type is added.
pub async fn send_raw(
    app: &Router,
    method: Method,
    path: &str,
    body: &str,
    headers: &[(&str, &str)],
) -> TestResponse {
    let mut request = Request::builder().method(method).uri(path);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    let request = request.body(Body::from(body.to_string())).unwrap();

    collect(send(app, request).await).await
}

pub async fn get(app: &Router, path: &str) -> TestResponse {
    make_request(app, Method::GET, path, None, &[]).await
}

pub async fn post_json(app: &Router, path: &str, body: Value) -> TestResponse {
    make_request(app, Method::POST, path, Some(body), &[]).await
}

/// Open an SSE endpoint and hand back its body as a frame stream.
pub async fn open_stream(app: &Router, path: &str) -> (StatusCode, BodyDataStream) {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    let response = send(app, request).await;
    (response.status(), response.into_body().into_data_stream())
}

/// Next body frame as text, or `None` if nothing arrives within `wait`.
pub async fn next_frame(stream: &mut BodyDataStream, wait: Duration) -> Option<String> {
    match tokio::time::timeout(wait, stream.next()).await {
        Ok(Some(frame)) => Some(String::from_utf8_lossy(&frame.unwrap()).to_string()),
        Ok(None) | Err(_) => None,
    }
}
