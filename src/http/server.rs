//! HTTP pipeline construction.
//!
//! # Responsibilities
//! - Shared application state handed to every handler
//! - The base router with the `/status` endpoint
//! - The middleware chain, in fixed order: content-type default,
//!   compression, security headers, request accounting
//!
//! # Design Decisions
//! - Layers are attached only once the route set is complete
//!   ([`finalize`]), so accounting and security headers wrap every route,
//!   including routes merged after the base router was built and the
//!   not-found fallback
//! - The request counter is atomic; handlers run concurrently and an
//!   increment must never be lost

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Request, State};
use axum::http::header::{self, HeaderName, HeaderValue};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::store::Automoviles;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// The resource's data-access collaborator.
    pub automoviles: Arc<dyn Automoviles>,

    pub service_name: String,

    /// Collection URL reported as the error-envelope pointer.
    pub collection_url: String,

    pub default_page_size: i64,

    /// Monotonic count of every inbound request.
    pub requests: Arc<AtomicU64>,

    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        config: &ServiceConfig,
        automoviles: Arc<dyn Automoviles>,
        requests: Arc<AtomicU64>,
        started_at: Instant,
    ) -> Self {
        Self {
            automoviles,
            service_name: config.service_name.clone(),
            collection_url: config.collection_url(),
            default_page_size: config.records_per_page,
            requests,
            started_at,
        }
    }
}

/// Build the base router: the status endpoint only. Resource routes are
/// merged by the route-registration step, the fallback by the
/// error-handler step.
pub fn build() -> Router<AppState> {
    Router::new().route("/status", get(status))
}

/// Attach state and the middleware chain to the completed route set.
pub fn finalize(router: Router<AppState>, state: AppState) -> Router {
    router.with_state(state.clone()).layer(
        ServiceBuilder::new()
            .layer(SetResponseHeaderLayer::if_not_present(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            ))
            .layer(CompressionLayer::new())
            .layer(SetResponseHeaderLayer::overriding(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("SAMEORIGIN"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::X_XSS_PROTECTION,
                HeaderValue::from_static("1; mode=block"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::STRICT_TRANSPORT_SECURITY,
                HeaderValue::from_static("max-age=15552000; includeSubDomains"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                HeaderName::from_static("x-dns-prefetch-control"),
                HeaderValue::from_static("off"),
            ))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn_with_state(state, account_requests)),
    )
}

/// Request accounting: one increment and one info record per inbound
/// request, whatever it ends up matching.
async fn account_requests(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    state.requests.fetch_add(1, Ordering::Relaxed);
    tracing::info!(
        service = %state.service_name,
        method = %request.method(),
        path = %request.uri().path(),
        params = request.uri().query().unwrap_or_default(),
        "request received"
    );
    next.run(request).await
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusBody {
    up_time: f64,
    number_of_received_requests: u64,
}

async fn status(State(state): State<AppState>) -> Json<StatusBody> {
    Json(StatusBody {
        up_time: state.started_at.elapsed().as_secs_f64(),
        number_of_received_requests: state.requests.load(Ordering::Relaxed),
    })
}
