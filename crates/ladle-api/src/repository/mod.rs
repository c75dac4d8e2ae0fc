//! Entity store implementations
//!
//! `postgres` is the production backend. `memory` mirrors its semantics,
//! including uniqueness conflicts, and backs the integration tests.

pub mod postgres;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

pub use postgres::{PgRecipeStore, PgUserStore};
