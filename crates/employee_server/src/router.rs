//! Employee service router setup.

use std::time::Instant;

use axum::extract::Request;
use axum::http::{Method, StatusCode, Uri};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use log::{info, warn};
use tower_http::cors::{Any, CorsLayer};

use crate::routes;
use crate::state::AppState;

/// Creates the service router: `/employees` routes, `/health`, CORS for any
/// origin, and per-request logging.
pub fn employee_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::employees::routes())
        .route("/health", get(routes::health::health))
        .method_not_allowed_fallback(not_found)
        .fallback(not_found)
        .layer(middleware::from_fn(log_request))
        .layer(cors_layer())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn not_found(method: Method, uri: Uri) -> (StatusCode, String) {
    (
        StatusCode::NOT_FOUND,
        format!("Cannot {method} {}", uri.path()),
    )
}

async fn log_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let http_status = response.status();
    let duration_ms = started_at.elapsed().as_millis();
    if http_status.is_server_error() {
        warn!(
            "event=http_request module=http status=error method={method} path={path} http_status={} duration_ms={duration_ms}",
            http_status.as_u16()
        );
    } else {
        info!(
            "event=http_request module=http status=ok method={method} path={path} http_status={} duration_ms={duration_ms}",
            http_status.as_u16()
        );
    }

    response
}
