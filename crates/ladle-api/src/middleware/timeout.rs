//! Request timeout middleware
//!
//! Bounds every request with the configured time budget so a hung store or
//! hashing call cannot pin a task forever. Elapsed timeouts surface as the
//! generic internal error response, never as 404 or 409.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Duration;

pub async fn enforce_timeout(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let budget = Duration::from_secs(state.config.server.request_timeout_secs);

    match tokio::time::timeout(budget, next.run(request)).await {
        Ok(response) => Ok(response),
        Err(_) => Err(AppError::Internal(format!(
            "request exceeded {}s budget",
            budget.as_secs()
        ))),
    }
}
