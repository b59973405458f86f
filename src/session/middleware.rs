//! Session cookie middleware for Axum.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use super::guard::SharedActionGuard;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "qa_session";

/// Opaque per-visitor session identifier, available as a request extension.
#[derive(Clone, Debug)]
pub struct SessionId(pub String);

fn cookie_value(headers: &axum::http::HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k == name).then(|| v.to_string())
    })
}

/// Assigns a session id to every request.
///
/// Reuses the id from the session cookie when present, otherwise issues a
/// fresh one and sets the cookie on the response. The guard record is
/// created on first access either way.
pub async fn session_middleware(
    State(guard): State<SharedActionGuard>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let existing = cookie_value(request.headers(), SESSION_COOKIE);
    let is_new = existing.is_none();
    let session_id = existing.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    guard.ensure(&session_id);
    request
        .extensions_mut()
        .insert(SessionId(session_id.clone()));

    let mut response = next.run(request).await;

    if is_new {
        let cookie = format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::create_action_guard;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{middleware, Extension, Router};
    use tower::Service;

    async fn echo_session(Extension(session): Extension<SessionId>) -> String {
        session.0
    }

    fn app(guard: SharedActionGuard) -> Router {
        Router::new()
            .route("/whoami", get(echo_session))
            .layer(middleware::from_fn_with_state(guard, session_middleware))
    }

    #[tokio::test]
    async fn issues_cookie_for_new_visitor() {
        let guard = create_action_guard();
        let mut svc = app(guard.clone()).into_service();

        let req = Request::builder()
            .uri("/whoami")
            .body(Body::empty())
            .unwrap();
        let resp = svc.call(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let set_cookie = resp
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(set_cookie.starts_with("qa_session="));
        assert_eq!(guard.session_count(), 1);
    }

    #[tokio::test]
    async fn reuses_existing_cookie() {
        let guard = create_action_guard();
        let mut svc = app(guard.clone()).into_service();

        let req = Request::builder()
            .uri("/whoami")
            .header(header::COOKIE, "other=1; qa_session=abc-123")
            .body(Body::empty())
            .unwrap();
        let resp = svc.call(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(header::SET_COOKIE).is_none());
        let body = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"abc-123");
    }
}
