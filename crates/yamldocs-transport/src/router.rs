//! HTTP routing — binds the bundled UI and the file API to their paths.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderValue, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};
use yamldocs_protocol::routes::is_api_route;
use yamldocs_protocol::{ApiError, NO_CACHE, PathQuery, Routes, TEXT_PLAIN_UTF8};
use yamldocs_services::{AssetBundle, AssetLookup, FileService};

/// Shared state for every handler.
struct AppState {
    files: FileService,
    assets: AssetBundle,
}

/// Successful file API outcomes.
enum Reply {
    Empty,
    File(Vec<u8>),
}

/// Build the application router.
///
/// `/api/exists`, `/api/file` and `/api/save` go to the file service;
/// every other path is looked up in the asset bundle.
pub fn build_router(files: FileService, assets: AssetBundle) -> Router {
    let state = Arc::new(AppState { files, assets });

    Router::new()
        .route(Routes::EXISTS, get(exists_handler).fallback(reject_non_get))
        .route(Routes::FILE, get(file_handler).fallback(reject_non_get))
        .route(Routes::SAVE, post(save_handler).fallback(reject_non_post))
        .fallback(static_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// File API
// ─────────────────────────────────────────────────────────────────────────────

async fn exists_handler(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    query: Result<Query<PathQuery>, QueryRejection>,
) -> Response {
    let outcome = match parse_query(query) {
        Ok(q) => state.files.exists(q.path.as_deref()).await.map(|()| Reply::Empty),
        Err(e) => Err(e),
    };
    respond(&Method::GET, &uri, outcome)
}

async fn file_handler(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    query: Result<Query<PathQuery>, QueryRejection>,
) -> Response {
    let outcome = match parse_query(query) {
        Ok(q) => state.files.read(q.path.as_deref()).await.map(Reply::File),
        Err(e) => Err(e),
    };
    respond(&Method::GET, &uri, outcome)
}

async fn save_handler(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    query: Result<Query<PathQuery>, QueryRejection>,
    body: Body,
) -> Response {
    let outcome = match parse_query(query) {
        Ok(q) => state
            .files
            .save(q.path.as_deref(), body.into_data_stream())
            .await
            .map(|_| Reply::Empty),
        Err(e) => Err(e),
    };
    respond(&Method::POST, &uri, outcome)
}

async fn reject_non_get(method: Method, uri: Uri) -> Response {
    method_not_allowed(method, &uri, Routes::ALLOW_GET)
}

async fn reject_non_post(method: Method, uri: Uri) -> Response {
    method_not_allowed(method, &uri, Routes::ALLOW_POST)
}

// ─────────────────────────────────────────────────────────────────────────────
// Static UI
// ─────────────────────────────────────────────────────────────────────────────

async fn static_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
) -> Response {
    // Unknown file API paths never fall through to the bundle.
    if is_api_route(uri.path()) {
        return error_response(&method, &uri, ApiError::NotFound(uri.path().to_string()));
    }

    if method != Method::GET && method != Method::HEAD {
        return method_not_allowed(method, &uri, Routes::ALLOW_GET);
    }

    match state.assets.lookup(uri.path()) {
        AssetLookup::Found(asset) => {
            debug!("Served {} ({} bytes)", asset.path, asset.bytes.len());
            (
                [
                    (header::CONTENT_TYPE, asset.content_type()),
                    (header::CACHE_CONTROL, NO_CACHE),
                ],
                asset.bytes,
            )
                .into_response()
        }
        AssetLookup::SourceMap => {
            debug!("Refusing source map request: {}", uri.path());
            asset_not_found()
        }
        AssetLookup::Missing => {
            warn!("Asset not found: {}", uri.path());
            asset_not_found()
        }
    }
}

fn asset_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain")],
        "404 Not Found",
    )
        .into_response()
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn parse_query(query: Result<Query<PathQuery>, QueryRejection>) -> Result<PathQuery, ApiError> {
    query
        .map(|Query(q)| q)
        .map_err(|e| ApiError::InvalidQuery(e.body_text()))
}

fn method_not_allowed(method: Method, uri: &Uri, allow: &'static str) -> Response {
    let err = ApiError::MethodNotAllowed {
        method: method.to_string(),
        allow,
    };
    error_response(&method, uri, err)
}

fn respond(method: &Method, uri: &Uri, outcome: Result<Reply, ApiError>) -> Response {
    match outcome {
        Ok(Reply::Empty) => {
            debug!("{method} {uri} -> 200");
            StatusCode::OK.into_response()
        }
        Ok(Reply::File(bytes)) => {
            debug!("{method} {uri} -> 200 ({} bytes)", bytes.len());
            ([(header::CONTENT_TYPE, TEXT_PLAIN_UTF8)], bytes).into_response()
        }
        Err(err) => error_response(method, uri, err),
    }
}

fn error_response(method: &Method, uri: &Uri, err: ApiError) -> Response {
    let status = StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if err.is_server_error() {
        error!("{method} {uri} -> {status}: {err}");
    } else {
        warn!("{method} {uri} -> {status}: {err}");
    }

    let mut response = (
        status,
        [(header::CONTENT_TYPE, TEXT_PLAIN_UTF8)],
        err.to_string(),
    )
        .into_response();

    if let ApiError::MethodNotAllowed { allow, .. } = &err {
        response
            .headers_mut()
            .insert(header::ALLOW, HeaderValue::from_static(allow));
    }
    response
}
