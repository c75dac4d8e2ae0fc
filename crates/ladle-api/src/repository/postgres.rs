//! PostgreSQL-backed entity stores
//!
//! The database enforces uniqueness atomically; SQLSTATE 23505 violations
//! are mapped to [`StoreError::Conflict`] so registration races collapse to
//! the same conflict outcome as the handler pre-checks. Absence is `None`,
//! never an error.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ladle_core::{
    NewRecipe, NewUser, Recipe, RecipePatch, StoreError, StoreResult, User, UserPatch,
    RecipeStore, UserStore,
};
use sqlx::PgPool;

const USER_COLUMNS: &str = "id, username, email, password_hash, role, created_at, updated_at";
const RECIPE_COLUMNS: &str =
    "id, name, description, ingredients, steps, author_id, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RecipeRow {
    id: i64,
    name: String,
    description: String,
    ingredients: Vec<String>,
    steps: Vec<String>,
    author_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            ingredients: row.ingredients,
            steps: row.steps,
            author_id: row.author_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Translate a sqlx error into a store error, recognizing constraint
/// violations by SQLSTATE and constraint name.
fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db) = err {
        let code = db.code();
        let constraint = db.constraint().unwrap_or_default();

        // 23505: unique_violation
        if code.as_deref() == Some("23505") {
            let field = if constraint.contains("email") {
                "email"
            } else {
                "username"
            };
            return StoreError::Conflict { field };
        }

        // 23503: foreign_key_violation (dangling recipe author)
        if code.as_deref() == Some("23503") {
            return StoreError::Conflict { field: "authorId" };
        }
    }

    StoreError::Database(err.to_string())
}

/// User store backed by the `users` table.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get_all(&self) -> StoreResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(User::from))
    }

    async fn get_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(User::from))
    }

    async fn get_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(User::from))
    }

    async fn get_by_username_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> StoreResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE ($1::text IS NOT NULL AND username = $1) \
                OR ($2::text IS NOT NULL AND email = $2)"
        ))
        .bind(username)
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (username, email, password_hash, role) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update(&self, id: i64, patch: UserPatch) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET \
                 username = COALESCE($2, username), \
                 email = COALESCE($3, email), \
                 password_hash = COALESCE($4, password_hash), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.username)
        .bind(patch.email)
        .bind(patch.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(User::from))
    }

    async fn delete(&self, id: i64) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(User::from))
    }
}

/// Recipe store backed by the `recipes` table.
#[derive(Clone)]
pub struct PgRecipeStore {
    pool: PgPool,
}

impl PgRecipeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn get_all(&self) -> StoreResult<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, RecipeRow>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Recipe>> {
        let row = sqlx::query_as::<_, RecipeRow>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Recipe::from))
    }

    async fn create(&self, recipe: NewRecipe) -> StoreResult<Recipe> {
        let row = sqlx::query_as::<_, RecipeRow>(&format!(
            "INSERT INTO recipes (name, description, ingredients, steps, author_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {RECIPE_COLUMNS}"
        ))
        .bind(&recipe.name)
        .bind(&recipe.description)
        .bind(&recipe.ingredients)
        .bind(&recipe.steps)
        .bind(recipe.author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update(&self, id: i64, patch: RecipePatch) -> StoreResult<Option<Recipe>> {
        let row = sqlx::query_as::<_, RecipeRow>(&format!(
            "UPDATE recipes SET \
                 name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 ingredients = COALESCE($4, ingredients), \
                 steps = COALESCE($5, steps), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {RECIPE_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.ingredients)
        .bind(patch.steps)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Recipe::from))
    }

    async fn delete(&self, id: i64) -> StoreResult<Option<Recipe>> {
        let row = sqlx::query_as::<_, RecipeRow>(&format!(
            "DELETE FROM recipes WHERE id = $1 RETURNING {RECIPE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Recipe::from))
    }
}

#[cfg(test)]
mod tests {
    // Query behaviour is covered end-to-end by the integration suite against
    // the in-memory stores; these tests pin the error translation, which is
    // the only logic that lives here.

    use super::*;

    #[test]
    fn test_non_database_errors_map_to_database() {
        let err = map_sqlx_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database(_)));
    }
}
