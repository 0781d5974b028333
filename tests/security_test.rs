use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use rust_file_host::config::UploadConfig;
use rust_file_host::{AppState, create_app};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

const PASSWORD: &str = "hunter2";

fn setup_app(dir: &TempDir) -> Router {
    let mut config = UploadConfig::development(dir.path().join("uploads"));
    config.upload_password = Some(PASSWORD.to_string());
    create_app(AppState::new(config))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_path_traversal_filename_is_flattened() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir);

    let boundary = "---------------------------123456789012345678901234567";
    let bad_filename_body = format!(
        "--{boundary}\r\n\
        Content-Disposition: form-data; name=\"file\"; filename=\"../../../etc/passwd\"\r\n\
        Content-Type: text/plain\r\n\r\n\
        Safe content\r\n\
        --{boundary}--\r\n"
    );

    let (status, json) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header("Host", "localhost:3000")
            .header("Authorization", PASSWORD)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(bad_filename_body))
            .unwrap(),
    )
    .await;

    // Sanitized into a flat name inside the upload directory
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["filename"], "etc_passwd");
    assert!(dir.path().join("uploads").join("etc_passwd").exists());
    assert!(!dir.path().join("etc").exists());
}

#[tokio::test]
async fn test_delete_traversal_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir);
    std::fs::create_dir_all(dir.path().join("uploads")).unwrap();
    std::fs::write(dir.path().join("secret.txt"), b"keep me").unwrap();

    let (status, json) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri("/api/delete/..%2Fsecret.txt")
            .header("Authorization", PASSWORD)
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", json);
    assert!(dir.path().join("secret.txt").exists());
}

#[tokio::test]
async fn test_download_traversal_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir);
    std::fs::create_dir_all(dir.path().join("uploads")).unwrap();
    std::fs::write(dir.path().join("secret.txt"), b"top secret").unwrap();

    let (status, _) = send(
        &app,
        Request::builder()
            .uri("/uploads/..%2Fsecret.txt")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_download_serves_markup_as_text() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir);
    std::fs::create_dir_all(dir.path().join("uploads")).unwrap();
    std::fs::write(
        dir.path().join("uploads").join("page.html"),
        b"<!DOCTYPE html><html><script>alert(1)</script></html>",
    )
    .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/uploads/page.html")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/plain; charset=utf-8"
    );
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}
