//! HTTP server for the browser UI
//!
//! Exposes the diff and file tree commands through a single command-proxy
//! endpoint, guarded by a Bearer token.

mod auth;
mod proxy;
pub mod routes;
pub mod state;

pub use auth::{generate_auth_token, AuthLayer};
pub use proxy::{invoke_handler, InvokeRequest, InvokeResponse};
pub use state::ServerAppState;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue,
    },
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Version information for the server
#[derive(serde::Serialize)]
struct VersionInfo {
    version: String,
}

/// Build the CORS layer; an empty origin list allows any origin
fn cors_layer(cors_origins: &[String]) -> CorsLayer {
    let layer = if cors_origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        let allowed_origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new().allow_origin(allowed_origins)
    };
    layer
        .allow_methods(Any)
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
}

/// Build the application router.
///
/// Layer order: cors (outer) -> auth -> handler, so preflight requests are
/// answered before the token check.
pub fn build_router(state: ServerAppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/api/invoke", post(proxy::invoke_handler))
        .route("/api/version", get(version_handler))
        .route("/health", get(health_handler))
        .layer(AuthLayer::new(state.auth_token.clone()))
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

/// Run the HTTP server until a shutdown is requested
pub async fn run_server(
    port: u16,
    bind: &str,
    state: ServerAppState,
    cors_origins: Vec<String>,
) -> Result<(), String> {
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    let app = build_router(state.clone(), &cors_origins);

    let cors_display = if cors_origins.is_empty() {
        "*".to_string()
    } else {
        cors_origins.join(", ")
    };

    println!();
    println!("  diffdesk server");
    println!("  URL:          http://{}", addr);
    println!("  Auth Token:   {}", state.auth_token);
    println!("  CORS Origins: {}", cors_display);
    println!("  Endpoints:    POST /api/invoke, GET /api/version, GET /health");
    println!();

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    log::info!("Server listening on http://{}", addr);

    let shutdown_state = state.shutdown_state.clone();
    let shutdown_signal = async move {
        shutdown_state.wait().await;
        log::info!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| format!("Server error: {}", e))
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

/// Version endpoint
async fn version_handler() -> Json<VersionInfo> {
    Json(VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{ConfigState, GitState};
    use crate::shutdown::ShutdownState;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const TOKEN: &str = "test-token";

    fn test_router() -> Router {
        let state = ServerAppState::new(
            TOKEN.to_string(),
            GitState::new(),
            ConfigState::default(),
            ShutdownState::new(),
        );
        build_router(state, &[])
    }

    fn invoke(body: Value, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri("/api/invoke")
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let response = test_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_requires_token() {
        let response = test_router()
            .oneshot(invoke(json!({ "cmd": "tree_build", "args": {} }), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = test_router()
            .oneshot(invoke(json!({ "cmd": "tree_build", "args": {} }), Some("wrong")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_version() {
        let response = test_router()
            .oneshot(
                Request::get("/api/version")
                    .header(AUTHORIZATION, format!("Bearer {}", TOKEN))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_invoke_diff_parse() {
        let text = "diff --git a/a.txt b/a.txt\n--- a/a.txt\n+++ b/a.txt\n@@ -1 +1,2 @@\n a\n+b\n";
        let response = test_router()
            .oneshot(invoke(
                json!({ "cmd": "diff_parse", "args": { "text": text } }),
                Some(TOKEN),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"][0]["path"], "a.txt");
        assert_eq!(body["data"][0]["additions"], 1);
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_invoke_tree_build_and_merge() {
        let router = test_router();
        let response = router
            .clone()
            .oneshot(invoke(
                json!({ "cmd": "tree_build", "args": { "paths": ["src/a.rs", "README.md"] } }),
                Some(TOKEN),
            ))
            .await
            .unwrap();
        let tree = json_body(response).await["data"].clone();
        assert_eq!(tree["children"][0]["name"], "src");
        assert_eq!(tree["children"][0]["type"], "directory");

        let response = router
            .oneshot(invoke(
                json!({
                    "cmd": "tree_merge_status",
                    "args": {
                        "tree": tree,
                        "statuses": [{ "path": "src/a.rs", "status": "added" }]
                    }
                }),
                Some(TOKEN),
            ))
            .await
            .unwrap();
        let merged = json_body(response).await["data"].clone();
        assert_eq!(merged["children"][0]["status"], "modified");
        assert_eq!(merged["children"][0]["children"][0]["status"], "added");
        assert!(merged["children"][1].get("status").is_none());
    }

    #[tokio::test]
    async fn test_invoke_unknown_command() {
        let response = test_router()
            .oneshot(invoke(json!({ "cmd": "nope" }), Some(TOKEN)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Unknown command: nope");
    }

    #[tokio::test]
    async fn test_invoke_missing_argument() {
        let response = test_router()
            .oneshot(invoke(json!({ "cmd": "diff_parse", "args": {} }), Some(TOKEN)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Missing argument: text");
    }
}
