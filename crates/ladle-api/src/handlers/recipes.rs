//! Recipe handlers
//!
//! Reads are public. Creation requires authentication and binds the recipe
//! to the caller; mutation routes additionally sit behind the author-only
//! gate wired in the router.

use crate::auth::middleware::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;
use crate::validation::{CreateRecipe, UpdateRecipe, ValidatedJson};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use ladle_core::{NewRecipe, RecipePatch};
use std::sync::Arc;

/// List all recipes
#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    responses(
        (status = 200, description = "All recipes", body = [Recipe]),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody),
    )
)]
pub async fn list_recipes(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let recipes = state.recipes.get_all().await?;
    Ok(Json(recipes))
}

/// Get a recipe by id
#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = Recipe),
        (status = 404, description = "Recipe not found", body = crate::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody),
    )
)]
pub async fn get_recipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let recipe = state
        .recipes
        .get_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Recipe"))?;

    Ok(Json(recipe))
}

/// Create a recipe owned by the authenticated user
///
/// The author is always the caller; an `authorId` in the payload is
/// ignored.
#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = CreateRecipe,
    responses(
        (status = 201, description = "Created recipe", body = Recipe),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorBody),
        (status = 401, description = "Unauthenticated", body = crate::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody),
    )
)]
pub async fn create_recipe(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateRecipe>,
) -> Result<impl IntoResponse, AppError> {
    let recipe = state
        .recipes
        .create(NewRecipe {
            name: payload.name,
            description: payload.description,
            ingredients: payload.ingredients,
            steps: payload.steps,
            author_id: user.id,
        })
        .await?;

    tracing::info!(recipe_id = recipe.id, author_id = user.id, "recipe created");

    Ok((StatusCode::CREATED, Json(recipe)))
}

/// Update a recipe (author only)
#[utoipa::path(
    patch,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = UpdateRecipe,
    responses(
        (status = 200, description = "Updated recipe", body = Recipe),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorBody),
        (status = 401, description = "Unauthenticated", body = crate::error::ErrorBody),
        (status = 403, description = "Not the author", body = crate::error::ErrorBody),
        (status = 404, description = "Recipe not found", body = crate::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody),
    )
)]
pub async fn update_recipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateRecipe>,
) -> Result<impl IntoResponse, AppError> {
    let recipe = state
        .recipes
        .update(
            id,
            RecipePatch {
                name: payload.name,
                description: payload.description,
                ingredients: payload.ingredients,
                steps: payload.steps,
            },
        )
        .await?
        .ok_or(AppError::NotFound("Recipe"))?;

    Ok(Json(recipe))
}

/// Delete a recipe (author only)
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthenticated", body = crate::error::ErrorBody),
        (status = 403, description = "Not the author", body = crate::error::ErrorBody),
        (status = 404, description = "Recipe not found", body = crate::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody),
    )
)]
pub async fn delete_recipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state
        .recipes
        .delete(id)
        .await?
        .ok_or(AppError::NotFound("Recipe"))?;

    tracing::info!(recipe_id = id, "recipe deleted");

    Ok(StatusCode::NO_CONTENT)
}
