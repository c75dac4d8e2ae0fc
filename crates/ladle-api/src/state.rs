//! Application state management

use crate::auth::jwt::JwtConfig;
use ladle_core::{AppConfig, RecipeStore, UserStore};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Application state shared across handlers.
///
/// Everything here is read-only after startup apart from the request
/// counter; concurrent requests share no other mutable state.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Token service configuration, derived from `config.auth` at startup
    pub jwt: JwtConfig,
    /// Server start time
    pub start_time: Instant,
    /// Request counter
    pub request_count: AtomicU64,
    /// User store
    pub users: Arc<dyn UserStore>,
    /// Recipe store
    pub recipes: Arc<dyn RecipeStore>,
}

impl AppState {
    /// Create new application state with config and store backends.
    pub fn new(config: AppConfig, users: Arc<dyn UserStore>, recipes: Arc<dyn RecipeStore>) -> Self {
        let jwt = JwtConfig::from(&config.auth);
        Self {
            config,
            jwt,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
            users,
            recipes,
        }
    }

    /// Increment request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Get total request count
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::{MemoryRecipeStore, MemoryUserStore};

    #[test]
    fn test_request_counter() {
        let state = AppState::new(
            AppConfig::default(),
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryRecipeStore::new()),
        );

        assert_eq!(state.get_request_count(), 0);
        state.increment_requests();
        state.increment_requests();
        assert_eq!(state.get_request_count(), 2);
    }

    #[test]
    fn test_jwt_config_derived_from_app_config() {
        let state = AppState::new(
            AppConfig::default(),
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryRecipeStore::new()),
        );

        assert_eq!(state.jwt.secret, state.config.auth.jwt_secret);
        assert_eq!(
            state.jwt.expiration_secs,
            state.config.auth.token_expiration_secs
        );
    }
}
