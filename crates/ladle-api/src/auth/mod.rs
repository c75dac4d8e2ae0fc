//! Authentication and authorization module
//!
//! This module provides the credential and token pipeline:
//! - Token issuance and verification (JWT, HMAC-SHA256)
//! - Password hashing with Argon2id
//! - Authentication middleware reading the access token cookie
//! - Ownership authorization gates built on a policy predicate

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;

pub use jwt::{issue_access_token, verify_access_token, Claims, JwtConfig, TokenError};
pub use middleware::{require_auth, CurrentUser, ACCESS_TOKEN_COOKIE};
pub use password::{hash_password, verify_password, PasswordError};
pub use policy::{require_recipe_author, require_self, Owned, OwnerOnly, OwnershipPolicy};
