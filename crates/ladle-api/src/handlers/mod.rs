//! API handlers

pub mod health;
pub mod recipes;
pub mod users;
