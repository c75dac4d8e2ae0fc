//! User account handlers
//!
//! Registration and login issue the access token cookie; profile mutation
//! routes sit behind the authentication and self-only gates wired in the
//! router.

use crate::auth::jwt::issue_access_token;
use crate::auth::middleware::ACCESS_TOKEN_COOKIE;
use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::state::AppState;
use crate::validation::{LoginUser, RegisterUser, UpdateUser, ValidatedJson};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use ladle_core::{NewUser, PublicUser, User, UserPatch, DEFAULT_ROLE};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Login response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub status: String,
    pub message: String,
}

/// Build the access token cookie shared by registration and login.
fn access_token_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(state.config.auth.cookie_secure)
        .max_age(time::Duration::seconds(state.jwt.expiration_secs as i64))
        .build()
}

/// Register a new user account
///
/// Uniqueness of username and email is pre-checked for friendlier errors,
/// but the store constraint remains the source of truth: a concurrent
/// registration losing the race still surfaces as the same 409.
#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "users",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "User registered, token cookie set", body = PublicUser),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorBody),
        (status = 409, description = "Username or email already taken", body = crate::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody),
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<RegisterUser>,
) -> Result<impl IntoResponse, AppError> {
    let taken = state
        .users
        .get_by_username_or_email(Some(&payload.username), Some(&payload.email))
        .await?;
    if taken.iter().any(|u| u.username == payload.username) {
        return Err(AppError::Conflict("username"));
    }
    if taken.iter().any(|u| u.email == payload.email) {
        return Err(AppError::Conflict("email"));
    }

    let password_hash = hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("failed to hash password: {e}")))?;

    let user = state
        .users
        .create(NewUser {
            username: payload.username,
            email: payload.email,
            password_hash,
            role: DEFAULT_ROLE.to_string(),
        })
        .await?;

    let token = issue_access_token(&state.jwt, user.id, &user.role)
        .map_err(|e| AppError::Internal(format!("failed to issue token: {e}")))?;

    tracing::info!(user_id = user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        jar.add(access_token_cookie(&state, token)),
        Json(user.to_public()),
    ))
}

/// Login with email and password
///
/// An unknown email and a wrong password produce byte-identical responses.
#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "users",
    request_body = LoginUser,
    responses(
        (status = 200, description = "Login successful, token cookie set", body = LoginResponse),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorBody),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody),
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginUser>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .users
        .get_by_email(&payload.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let password_valid = verify_password(&payload.password, &user.password_hash)
        .map_err(|e| AppError::Internal(format!("failed to verify password: {e}")))?;

    if !password_valid {
        return Err(AppError::InvalidCredentials);
    }

    let token = issue_access_token(&state.jwt, user.id, &user.role)
        .map_err(|e| AppError::Internal(format!("failed to issue token: {e}")))?;

    tracing::info!(user_id = user.id, "user logged in");

    Ok((
        jar.add(access_token_cookie(&state, token)),
        Json(LoginResponse {
            status: "success".to_string(),
            message: "User logged in".to_string(),
        }),
    ))
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    responses(
        (status = 200, description = "All users", body = [PublicUser]),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody),
    )
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let users = state.users.get_all().await?;
    let public: Vec<PublicUser> = users.iter().map(User::to_public).collect();

    Ok(Json(public))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = PublicUser),
        (status = 404, description = "User not found", body = crate::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody),
    )
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .users
        .get_by_id(id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    Ok(Json(user.to_public()))
}

/// Update the authenticated user's own account
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "Updated user", body = PublicUser),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorBody),
        (status = 401, description = "Unauthenticated", body = crate::error::ErrorBody),
        (status = 403, description = "Not the account owner", body = crate::error::ErrorBody),
        (status = 404, description = "User not found", body = crate::error::ErrorBody),
        (status = 409, description = "Username or email already taken", body = crate::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody),
    )
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateUser>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(ref username) = payload.username {
        if let Some(existing) = state.users.get_by_username(username).await? {
            if existing.id != id {
                return Err(AppError::Conflict("username"));
            }
        }
    }
    if let Some(ref email) = payload.email {
        if let Some(existing) = state.users.get_by_email(email).await? {
            if existing.id != id {
                return Err(AppError::Conflict("email"));
            }
        }
    }

    let password_hash = match payload.password {
        Some(ref password) => Some(
            hash_password(password)
                .map_err(|e| AppError::Internal(format!("failed to hash password: {e}")))?,
        ),
        None => None,
    };

    let user = state
        .users
        .update(
            id,
            UserPatch {
                username: payload.username,
                email: payload.email,
                password_hash,
            },
        )
        .await?
        .ok_or(AppError::NotFound("User"))?;

    Ok(Json(user.to_public()))
}

/// Delete the authenticated user's own account
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Unauthenticated", body = crate::error::ErrorBody),
        (status = 403, description = "Not the account owner", body = crate::error::ErrorBody),
        (status = 404, description = "User not found", body = crate::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody),
    )
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state
        .users
        .delete(id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    tracing::info!(user_id = id, "user deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::{MemoryRecipeStore, MemoryUserStore};
    use ladle_core::AppConfig;

    fn test_state() -> AppState {
        AppState::new(
            AppConfig::default(),
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryRecipeStore::new()),
        )
    }

    #[test]
    fn test_cookie_attributes() {
        let state = test_state();
        let cookie = access_token_cookie(&state, "tok".to_string());

        assert_eq!(cookie.name(), "access_token");
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(3600)));
        // Dev config leaves Secure off; production config turns it on
        assert_ne!(cookie.secure(), Some(true));
    }

    #[test]
    fn test_cookie_secure_follows_config() {
        let mut state = test_state();
        state.config.auth.cookie_secure = true;

        let cookie = access_token_cookie(&state, "tok".to_string());
        assert_eq!(cookie.secure(), Some(true));
    }
}
