//! API route definitions
//!
//! The gates compose outside-in per route group: authentication first, then
//! the ownership check, then the handler. Everything else stays public.

use crate::auth::{middleware as auth_middleware, policy};
use crate::handlers::{recipes, users};
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

/// Routes mounted under `/api`.
pub fn api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route("/users", get(users::list_users))
        .route("/users/:id", get(users::get_user))
        .route("/recipes", get(recipes::list_recipes))
        .route("/recipes/:id", get(recipes::get_recipe));

    // Self-only user mutations
    let user_mutations = Router::new()
        .route(
            "/users/:id",
            patch(users::update_user).delete(users::delete_user),
        )
        .route_layer(middleware::from_fn(policy::require_self))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::require_auth,
        ));

    // Authenticated recipe creation
    let recipe_creation = Router::new()
        .route("/recipes", post(recipes::create_recipe))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::require_auth,
        ));

    // Author-only recipe mutations
    let recipe_mutations = Router::new()
        .route(
            "/recipes/:id",
            patch(recipes::update_recipe).delete(recipes::delete_recipe),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            policy::require_recipe_author,
        ))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth_middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(user_mutations)
        .merge(recipe_creation)
        .merge(recipe_mutations)
}
