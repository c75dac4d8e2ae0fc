//! HTTP middleware

pub mod security_headers;
pub mod timeout;

use crate::state::AppState;
use axum::{body::Body, extract::{Request, State}, middleware::Next, response::Response};
use std::sync::Arc;

/// Count every request passing through the router.
pub async fn track_requests(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    state.increment_requests();
    next.run(request).await
}
