//! Ownership authorization
//!
//! Authorization is a replaceable policy predicate over the authenticated
//! identity and the targeted resource. The default policy permits mutation
//! by exactly the resource's recorded owner; swapping in a richer policy
//! does not touch the gates' control flow.

use super::middleware::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
    Extension,
};
use ladle_core::Recipe;
use std::sync::Arc;

/// A resource with a recorded owner.
pub trait Owned {
    fn owner_id(&self) -> i64;
}

impl Owned for Recipe {
    fn owner_id(&self) -> i64 {
        self.author_id
    }
}

/// Policy predicate deciding whether an identity may mutate a resource.
pub trait OwnershipPolicy<R>: Send + Sync {
    fn allows(&self, identity: &CurrentUser, resource: &R) -> bool;
}

/// Owner-only policy: permits exactly the recorded owner, regardless of
/// role.
#[derive(Debug, Default, Clone, Copy)]
pub struct OwnerOnly;

impl<R: Owned> OwnershipPolicy<R> for OwnerOnly {
    fn allows(&self, identity: &CurrentUser, resource: &R) -> bool {
        identity.id == resource.owner_id()
    }
}

/// Self-only gate for user mutation routes.
///
/// Pure comparison of the path id against the authenticated identity; no
/// data access.
pub async fn require_self(
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if user.id != id {
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}

/// Author-only gate for recipe mutation routes.
///
/// Fetches the targeted recipe so the decision is made against stored
/// ownership, not client-supplied data. An absent recipe is 404; a store
/// failure is an internal error, never 404.
pub async fn require_recipe_author(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let recipe = state
        .recipes
        .get_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Recipe"))?;

    if !OwnerOnly.allows(&user, &recipe) {
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn identity(id: i64) -> CurrentUser {
        CurrentUser {
            id,
            role: "user".to_string(),
        }
    }

    fn recipe_by(author_id: i64) -> Recipe {
        let now = Utc::now();
        Recipe {
            id: 1,
            name: "Pasta".to_string(),
            description: "d".to_string(),
            ingredients: vec!["Pasta".to_string()],
            steps: vec!["Boil".to_string()],
            author_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_owner_only_allows_the_author() {
        assert!(OwnerOnly.allows(&identity(1), &recipe_by(1)));
    }

    #[test]
    fn test_owner_only_denies_everyone_else() {
        assert!(!OwnerOnly.allows(&identity(2), &recipe_by(1)));
    }
}
