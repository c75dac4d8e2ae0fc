/// Authentication middleware for protecting routes
///
/// Extracts the access token from the `access_token` cookie, verifies it,
/// and attaches the decoded identity to request extensions. This gate does
/// no data access; a valid signature is trusted as-is.
use super::jwt::verify_access_token;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Name of the cookie carrying the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Authenticated identity extracted from the access token.
///
/// Added to request extensions by [`require_auth`] and read in handlers
/// via `Extension<CurrentUser>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's unique identifier
    pub id: i64,
    /// User's role
    pub role: String,
}

/// Authentication middleware that requires a valid access token.
///
/// A missing cookie and a failing token produce distinct 401 messages for
/// UX purposes only; neither reveals why verification failed.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let cookie = jar
        .get(ACCESS_TOKEN_COOKIE)
        .ok_or(AppError::Unauthenticated)?;

    let claims =
        verify_access_token(&state.jwt, cookie.value()).map_err(|_| AppError::InvalidToken)?;

    let user = CurrentUser {
        id: claims.user_id().map_err(|_| AppError::InvalidToken)?,
        role: claims.role,
    };

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
