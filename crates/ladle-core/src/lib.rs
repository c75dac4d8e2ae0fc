//! Ladle Core - Domain models, store abstractions, and shared types
//!
//! This crate defines the core abstractions used throughout the ladle system:
//! - User and recipe domain models
//! - Entity store traits implemented by persistence backends
//! - Store error types (absence is a value, failure is an error)
//! - Configuration management

pub mod config;

pub use config::{AppConfig, AuthConfig, ConfigError, DatabaseConfig, LoggingConfig, ServerConfig};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

// ============================================================================
// Error Types
// ============================================================================

/// Failures surfaced by entity stores.
///
/// "Not found" is never an error here: lookups return `Option` and
/// update/delete return the affected record as `Option`, keeping absence
/// distinguishable from transport failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated. `field` names the colliding
    /// attribute as it appears on the wire.
    #[error("{field} is already taken")]
    Conflict { field: &'static str },

    #[error("database error: {0}")]
    Database(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

// ============================================================================
// User Model
// ============================================================================

/// Default role assigned to newly registered accounts.
pub const DEFAULT_ROLE: &str = "user";

/// User account.
///
/// The password hash never leaves the process: serialization skips it, and
/// handlers convert to [`PublicUser`] before responding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,

    /// Unique display name, 3-30 characters.
    pub username: String,

    /// Unique email address, used for login.
    pub email: String,

    /// Argon2id hash in PHC string format.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Role carried as a token claim.
    pub role: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Public projection with the credential material stripped.
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Public user representation (safe for API responses).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a user. The id and timestamps are assigned by the
/// store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// Partial user update. Absent fields are left untouched in storage.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}

// ============================================================================
// Recipe Model
// ============================================================================

/// Recipe owned by its creating user.
///
/// `author_id` is set from the authenticated identity at creation time and
/// never changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub description: String,

    /// Ordered, non-empty list of non-empty ingredient lines.
    pub ingredients: Vec<String>,

    /// Ordered, non-empty list of non-empty preparation steps.
    pub steps: Vec<String>,

    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a recipe. `author_id` comes from the authenticated
/// identity, never from the payload.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub name: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub author_id: i64,
}

/// Partial recipe update. Absent fields are left untouched in storage.
#[derive(Debug, Clone, Default)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub steps: Option<Vec<String>>,
}

impl RecipePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.ingredients.is_none()
            && self.steps.is_none()
    }
}

// ============================================================================
// Entity Store Traits
// ============================================================================

/// Data access for user accounts.
///
/// Uniqueness of `username` and `email` is enforced atomically by the
/// backing store; `create` and `update` report violations as
/// [`StoreError::Conflict`].
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn get_all(&self) -> StoreResult<Vec<User>>;

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<User>>;

    async fn get_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn get_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Fetch every user matching either value. Used by uniqueness pre-checks
    /// that need both candidates in one round trip.
    async fn get_by_username_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> StoreResult<Vec<User>>;

    async fn create(&self, user: NewUser) -> StoreResult<User>;

    /// Returns `None` when no user with `id` exists.
    async fn update(&self, id: i64, patch: UserPatch) -> StoreResult<Option<User>>;

    /// Returns the deleted record, or `None` when no user with `id` exists.
    async fn delete(&self, id: i64) -> StoreResult<Option<User>>;
}

/// Data access for recipes.
#[async_trait::async_trait]
pub trait RecipeStore: Send + Sync {
    async fn get_all(&self) -> StoreResult<Vec<Recipe>>;

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Recipe>>;

    /// Creates a recipe connected to its author. A dangling `author_id` is a
    /// conflict, not a transport failure.
    async fn create(&self, recipe: NewRecipe) -> StoreResult<Recipe>;

    /// Returns `None` when no recipe with `id` exists.
    async fn update(&self, id: i64, patch: RecipePatch) -> StoreResult<Option<Recipe>>;

    /// Returns the deleted record, or `None` when no recipe with `id` exists.
    async fn delete(&self, id: i64) -> StoreResult<Option<Recipe>>;
}

// ============================================================================
// Tests
// ============================================================================
