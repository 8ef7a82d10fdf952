//! Router tests — requests dispatched straight into the axum router,
//! without binding a socket.

use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use tempfile::TempDir;
use tower::ServiceExt;
use yamldocs_services::{AssetBundle, FileService, FixedRoot, NoRoot, WorkspaceRootProvider};
use yamldocs_transport::router::build_router;

fn app_for(roots: Arc<dyn WorkspaceRootProvider>) -> Router {
    build_router(FileService::new(roots), AssetBundle::bundled())
}

fn app(root: &Path) -> Router {
    app_for(Arc::new(FixedRoot::new(root)))
}

async fn send(app: Router, method: &str, uri: &str, body: impl Into<Body>) -> Response {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(body.into())
        .unwrap();
    app.oneshot(req).await.unwrap()
}

async fn get(app: Router, uri: &str) -> Response {
    send(app, "GET", uri, Body::empty()).await
}

async fn body_bytes(resp: Response) -> Vec<u8> {
    to_bytes(resp.into_body(), usize::MAX).await.unwrap().to_vec()
}

fn header_str<'a>(resp: &'a Response, name: header::HeaderName) -> &'a str {
    resp.headers().get(name).unwrap().to_str().unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Static UI
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn root_serves_index_html() {
    let tmp = TempDir::new().unwrap();
    let resp = get(app(tmp.path()), "/").await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header_str(&resp, header::CONTENT_TYPE), "text/html; charset=utf-8");
    assert_eq!(header_str(&resp, header::CACHE_CONTROL), "no-cache");

    let body = body_bytes(resp).await;
    let index = AssetBundle::bundled().get("index.html").unwrap();
    assert_eq!(body, index.bytes);
}

#[tokio::test]
async fn nested_assets_get_their_content_type() {
    let tmp = TempDir::new().unwrap();

    let resp = get(app(tmp.path()), "/css/style.css").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header_str(&resp, header::CONTENT_TYPE), "text/css; charset=utf-8");

    let resp = get(app(tmp.path()), "/js/services/FileService.js").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        header_str(&resp, header::CONTENT_TYPE),
        "application/javascript; charset=utf-8"
    );

    let resp = get(app(tmp.path()), "/favicon.svg").await;
    assert_eq!(header_str(&resp, header::CONTENT_TYPE), "image/svg+xml");
}

#[tokio::test]
async fn unknown_asset_is_404_with_text_body() {
    let tmp = TempDir::new().unwrap();
    let resp = get(app(tmp.path()), "/nonexistent.html").await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_bytes(resp).await, b"404 Not Found");
}

#[tokio::test]
async fn source_maps_are_never_served() {
    let tmp = TempDir::new().unwrap();

    // Bundled, still refused.
    assert!(AssetBundle::bundled().get("js/app.js.map").is_some());
    let resp = get(app(tmp.path()), "/js/app.js.map").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = get(app(tmp.path()), "/style.css.map").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn static_routes_reject_writes() {
    let tmp = TempDir::new().unwrap();
    let resp = send(app(tmp.path()), "POST", "/index.html", "x").await;

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(header_str(&resp, header::ALLOW), "GET, HEAD");
}

#[tokio::test]
async fn workspace_files_are_not_reachable_as_assets() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("secret.txt"), "hidden").unwrap();

    let resp = get(app(tmp.path()), "/secret.txt").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ─────────────────────────────────────────────────────────────────────────────
// File API — parameters and methods
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_or_empty_path_is_400() {
    let tmp = TempDir::new().unwrap();

    for uri in ["/api/exists", "/api/file", "/api/exists?path=", "/api/file?other=1"] {
        let resp = get(app(tmp.path()), uri).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
    }

    let resp = send(app(tmp.path()), "POST", "/api/save", "data").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrong_method_is_405_before_path_validation() {
    let tmp = TempDir::new().unwrap();

    let resp = send(app(tmp.path()), "POST", "/api/exists", Body::empty()).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(header_str(&resp, header::ALLOW), "GET, HEAD");

    let resp = send(app(tmp.path()), "DELETE", "/api/file?path=a.txt", Body::empty()).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

    let resp = get(app(tmp.path()), "/api/save?path=a.txt").await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(header_str(&resp, header::ALLOW), "POST");
}

#[tokio::test]
async fn missing_root_is_500() {
    let roots: Arc<dyn WorkspaceRootProvider> = Arc::new(NoRoot);

    let resp = get(app_for(roots.clone()), "/api/exists?path=a.txt").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let resp = get(app_for(roots.clone()), "/api/file?path=a.txt").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let resp = send(app_for(roots), "POST", "/api/save?path=a.txt", "x").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn traversal_is_rejected_with_400() {
    let tmp = TempDir::new().unwrap();
    let ws = tmp.path().join("ws");
    std::fs::create_dir(&ws).unwrap();
    std::fs::write(tmp.path().join("outside.txt"), "nope").unwrap();

    let resp = get(app(&ws), "/api/file?path=../outside.txt").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = get(app(&ws), "/api/exists?path=..%2Foutside.txt").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(app(&ws), "POST", "/api/save?path=../evil.txt", "x").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(!tmp.path().join("evil.txt").exists());
}

// ─────────────────────────────────────────────────────────────────────────────
// File API — behavior
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn exists_reports_files_and_directories() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir(tmp.path().join("docs")).unwrap();
    std::fs::write(tmp.path().join("redocly.yaml"), "apis: {}\n").unwrap();

    let resp = get(app(tmp.path()), "/api/exists?path=redocly.yaml").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());

    let resp = get(app(tmp.path()), "/api/exists?path=docs").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = get(app(tmp.path()), "/api/exists?path=missing.yaml").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn read_returns_raw_bytes_as_plain_text() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("openapi.yaml"), "openapi: 3.0.0\n").unwrap();

    let resp = get(app(tmp.path()), "/api/file?path=openapi.yaml").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header_str(&resp, header::CONTENT_TYPE), "text/plain; charset=utf-8");
    assert_eq!(body_bytes(resp).await, b"openapi: 3.0.0\n");
}

#[tokio::test]
async fn read_of_directory_or_missing_file_is_404() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir(tmp.path().join("docs")).unwrap();

    let resp = get(app(tmp.path()), "/api/file?path=docs").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = get(app(tmp.path()), "/api/file?path=nope.yaml").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn save_then_read_round_trips() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("sub/dir")).unwrap();

    let resp = send(app(tmp.path()), "POST", "/api/save?path=sub/dir/new.md", "# Title\n").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = get(app(tmp.path()), "/api/file?path=sub/dir/new.md").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, b"# Title\n");
}

#[tokio::test]
async fn save_into_missing_directory_is_404_and_writes_nothing() {
    let tmp = TempDir::new().unwrap();

    let resp = send(app(tmp.path()), "POST", "/api/save?path=sub/dir/new.txt", "data").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(!tmp.path().join("sub").exists());
}

#[tokio::test]
async fn save_onto_a_directory_is_500() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir(tmp.path().join("docs")).unwrap();

    let resp = send(app(tmp.path()), "POST", "/api/save?path=docs", "data").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(tmp.path().join("docs").is_dir());
}

#[tokio::test]
async fn unknown_api_path_is_404_for_any_method() {
    let tmp = TempDir::new().unwrap();

    let resp = get(app(tmp.path()), "/api/list?path=.").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(header_str(&resp, header::CONTENT_TYPE), "text/plain; charset=utf-8");
    assert_eq!(body_bytes(resp).await, b"not found: /api/list");

    let resp = send(app(tmp.path()), "POST", "/api/delete?path=a.txt", "x").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.headers().get(header::ALLOW).is_none());
}
