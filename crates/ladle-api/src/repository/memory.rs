//! In-memory entity stores for tests
//!
//! Mirror the Postgres stores' observable semantics, including uniqueness
//! conflicts and sequential id assignment, so the full handler chain can be
//! exercised without a database.

use async_trait::async_trait;
use chrono::Utc;
use ladle_core::{
    NewRecipe, NewUser, Recipe, RecipePatch, StoreError, StoreResult, User, UserPatch,
    RecipeStore, UserStore,
};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory user store.
#[derive(Default)]
pub struct MemoryUserStore {
    table: RwLock<Table<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_all(&self) -> StoreResult<Vec<User>> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn get_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }

    async fn get_by_username_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> StoreResult<Vec<User>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|u| {
                username.is_some_and(|name| u.username == name)
                    || email.is_some_and(|mail| u.email == mail)
            })
            .cloned()
            .collect())
    }

    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let mut table = self.table.write().await;

        if table.rows.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict { field: "username" });
        }
        if table.rows.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict { field: "email" });
        }

        let now = Utc::now();
        let id = table.allocate_id();
        let user = User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(id, user.clone());

        Ok(user)
    }

    async fn update(&self, id: i64, patch: UserPatch) -> StoreResult<Option<User>> {
        let mut table = self.table.write().await;

        if !table.rows.contains_key(&id) {
            return Ok(None);
        }

        if let Some(ref username) = patch.username {
            if table
                .rows
                .values()
                .any(|u| u.id != id && u.username == *username)
            {
                return Err(StoreError::Conflict { field: "username" });
            }
        }
        if let Some(ref email) = patch.email {
            if table.rows.values().any(|u| u.id != id && u.email == *email) {
                return Err(StoreError::Conflict { field: "email" });
            }
        }

        let Some(user) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(username) = patch.username {
            user.username = username;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(password_hash) = patch.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i64) -> StoreResult<Option<User>> {
        let mut table = self.table.write().await;
        Ok(table.rows.remove(&id))
    }
}

/// In-memory recipe store.
#[derive(Default)]
pub struct MemoryRecipeStore {
    table: RwLock<Table<Recipe>>,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn get_all(&self) -> StoreResult<Vec<Recipe>> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Recipe>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn create(&self, recipe: NewRecipe) -> StoreResult<Recipe> {
        let mut table = self.table.write().await;

        let now = Utc::now();
        let id = table.allocate_id();
        let recipe = Recipe {
            id,
            name: recipe.name,
            description: recipe.description,
            ingredients: recipe.ingredients,
            steps: recipe.steps,
            author_id: recipe.author_id,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(id, recipe.clone());

        Ok(recipe)
    }

    async fn update(&self, id: i64, patch: RecipePatch) -> StoreResult<Option<Recipe>> {
        let mut table = self.table.write().await;

        let Some(recipe) = table.rows.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            recipe.name = name;
        }
        if let Some(description) = patch.description {
            recipe.description = description;
        }
        if let Some(ingredients) = patch.ingredients {
            recipe.ingredients = ingredients;
        }
        if let Some(steps) = patch.steps {
            recipe.steps = steps;
        }
        recipe.updated_at = Utc::now();

        Ok(Some(recipe.clone()))
    }

    async fn delete(&self, id: i64) -> StoreResult<Option<Recipe>> {
        let mut table = self.table.write().await;
        Ok(table.rows.remove(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: "user".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = MemoryUserStore::new();

        let first = store.create(new_user("a-user", "a@b.com")).await.unwrap();
        let second = store.create(new_user("b-user", "b@b.com")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = MemoryUserStore::new();
        store.create(new_user("a-user", "a@b.com")).await.unwrap();

        let err = store
            .create(new_user("a-user", "other@b.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Conflict { field: "username" }));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryUserStore::new();
        store.create(new_user("a-user", "a@b.com")).await.unwrap();

        let err = store
            .create(new_user("b-user", "a@b.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Conflict { field: "email" }));
    }

    #[tokio::test]
    async fn test_get_by_username_or_email_matches_either() {
        let store = MemoryUserStore::new();
        let alice = store.create(new_user("alice", "alice@b.com")).await.unwrap();
        let bob = store.create(new_user("bob", "bob@b.com")).await.unwrap();
        store.create(new_user("carol", "carol@b.com")).await.unwrap();

        let matches = store
            .get_by_username_or_email(Some("alice"), Some("bob@b.com"))
            .await
            .unwrap();

        let ids: Vec<i64> = matches.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![alice.id, bob.id]);

        let none = store.get_by_username_or_email(None, None).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_update_leaves_absent_fields_untouched() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("a-user", "a@b.com")).await.unwrap();

        let updated = store
            .update(
                user.id,
                UserPatch {
                    username: Some("renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.username, "renamed");
        assert_eq!(updated.email, "a@b.com");
        assert_eq!(updated.password_hash, "hash");
    }

    #[tokio::test]
    async fn test_update_to_taken_email_conflicts() {
        let store = MemoryUserStore::new();
        store.create(new_user("a-user", "a@b.com")).await.unwrap();
        let other = store.create(new_user("b-user", "b@b.com")).await.unwrap();

        let err = store
            .update(
                other.id,
                UserPatch {
                    email: Some("a@b.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Conflict { field: "email" }));
    }

    #[tokio::test]
    async fn test_update_missing_user_is_absent_not_error() {
        let store = MemoryUserStore::new();
        let result = store.update(99, UserPatch::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_returns_the_removed_row() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("a-user", "a@b.com")).await.unwrap();

        let deleted = store.delete(user.id).await.unwrap();
        assert_eq!(deleted.map(|u| u.id), Some(user.id));

        assert!(store.delete(user.id).await.unwrap().is_none());
        assert!(store.get_by_id(user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_recipe_round_trip() {
        let store = MemoryRecipeStore::new();

        let created = store
            .create(NewRecipe {
                name: "Pasta".to_string(),
                description: "d".to_string(),
                ingredients: vec!["Pasta".to_string()],
                steps: vec!["Boil".to_string()],
                author_id: 1,
            })
            .await
            .unwrap();

        let fetched = store.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Pasta");
        assert_eq!(fetched.author_id, 1);

        let updated = store
            .update(
                created.id,
                RecipePatch {
                    steps: Some(vec!["Boil".to_string(), "Drain".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        // Patched field changes, the rest stays
        assert_eq!(updated.steps.len(), 2);
        assert_eq!(updated.ingredients, vec!["Pasta".to_string()]);
        assert_eq!(updated.author_id, 1);
    }
}
