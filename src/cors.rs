use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
            ACCESS_CONTROL_REQUEST_HEADERS, ORIGIN,
        },
        HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::state::AppState;

const ALLOWED_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";

/// Outermost filter. Echoes allow-listed origins and answers every OPTIONS
/// request itself, so preflights never reach auth or a handler.
pub async fn negotiate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let origin = request
        .headers()
        .get(ORIGIN)
        .filter(|o| o.to_str().is_ok_and(|o| state.config.cors.is_allowed(o)))
        .cloned();

    let mut response = if request.method() == Method::OPTIONS {
        debug!(origin = ?origin, "answering preflight");
        let mut preflight = Response::new(Body::empty());
        *preflight.status_mut() = StatusCode::OK;
        let headers = preflight.headers_mut();
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        if let Some(requested) = request.headers().get(ACCESS_CONTROL_REQUEST_HEADERS) {
            headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, requested.clone());
        }
        preflight
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(
        ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    if let Some(origin) = origin {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http, middleware::from_fn_with_state, routing::get, Router};
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use tower::ServiceExt;

    fn app(hits: Arc<AtomicUsize>) -> Router {
        let state = AppState::fake();
        Router::new()
            .route(
                "/cards",
                get(move || {
                    let hits = hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        "cards"
                    }
                }),
            )
            .layer(from_fn_with_state(state, negotiate))
    }

    #[tokio::test]
    async fn preflight_is_answered_without_reaching_handler() {
        let hits = Arc::new(AtomicUsize::new(0));
        let res = app(hits.clone())
            .oneshot(
                http::Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/cards")
                    .header(ORIGIN, "http://localhost:3000")
                    .header(ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        let h = res.headers();
        assert_eq!(h[ACCESS_CONTROL_ALLOW_METHODS], ALLOWED_METHODS);
        assert_eq!(h[ACCESS_CONTROL_ALLOW_HEADERS], "authorization,content-type");
        assert_eq!(h[ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost:3000");
        assert_eq!(h[ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[tokio::test]
    async fn allowed_origin_is_echoed_on_regular_requests() {
        let hits = Arc::new(AtomicUsize::new(0));
        let res = app(hits.clone())
            .oneshot(
                http::Request::builder()
                    .uri("/cards")
                    .header(ORIGIN, "https://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(res.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "https://localhost:3000");
        assert_eq!(res.headers()[ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert!(res.headers().get(ACCESS_CONTROL_ALLOW_METHODS).is_none());
    }

    #[tokio::test]
    async fn unknown_origin_is_not_echoed() {
        let hits = Arc::new(AtomicUsize::new(0));
        let res = app(hits)
            .oneshot(
                http::Request::builder()
                    .uri("/cards")
                    .header(ORIGIN, "https://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(res.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        assert_eq!(res.headers()[ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }
}
