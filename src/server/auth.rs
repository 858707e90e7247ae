//! Authentication middleware for the server
//!
//! Validates Bearer tokens on `/api/*` requests. Health checks and CORS
//! preflight requests pass through.

use axum::{
    body::Body,
    extract::Request,
    http::{header::AUTHORIZATION, Method, StatusCode},
    response::Response,
};
use std::sync::Arc;
use tower::Layer;

/// Authentication layer that validates Bearer tokens
#[derive(Clone)]
pub struct AuthLayer {
    token: Arc<String>,
}

impl AuthLayer {
    pub fn new(token: String) -> Self {
        Self {
            token: Arc::new(token),
        }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            token: self.token.clone(),
        }
    }
}

/// The actual middleware service
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    token: Arc<String>,
}

impl<S> tower::Service<Request> for AuthMiddleware<S>
where
    S: tower::Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let token = self.token.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let requires_auth =
                req.method() != Method::OPTIONS && req.uri().path().starts_with("/api/");

            if !requires_auth || bearer_matches(&req, &token) {
                return inner.call(req).await;
            }

            log::debug!("[Auth] Rejected {} {}", req.method(), req.uri().path());
            let mut response = Response::new(Body::from(
                "Unauthorized: Invalid or missing Bearer token",
            ));
            *response.status_mut() = StatusCode::UNAUTHORIZED;
            Ok(response)
        })
    }
}

fn bearer_matches(req: &Request, token: &str) -> bool {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|provided| provided == token)
        .unwrap_or(false)
}

/// Generate a random auth token (32 hex chars)
pub fn generate_auth_token() -> String {
    use rand::Rng;
    let bytes: [u8; 16] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_auth_token() {
        let token = generate_auth_token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_auth_token());
    }

    #[test]
    fn test_bearer_matches() {
        let ok = axum::http::Request::builder()
            .header(AUTHORIZATION, "Bearer secret")
            .body(Body::empty())
            .unwrap();
        assert!(bearer_matches(&ok, "secret"));

        let wrong = axum::http::Request::builder()
            .header(AUTHORIZATION, "Bearer other")
            .body(Body::empty())
            .unwrap();
        assert!(!bearer_matches(&wrong, "secret"));

        let basic = axum::http::Request::builder()
            .header(AUTHORIZATION, "Basic secret")
            .body(Body::empty())
            .unwrap();
        assert!(!bearer_matches(&basic, "secret"));

        let missing = axum::http::Request::builder().body(Body::empty()).unwrap();
        assert!(!bearer_matches(&missing, "secret"));
    }
}
