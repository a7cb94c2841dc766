//! ShareVent Server Library
//!
//! This module exports the core types and functions for testing and reuse.

pub mod access;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod phone;
pub mod routes;
pub mod security;
pub mod session;
pub mod storage;

pub use config::Config;
pub use db::create_pool;
pub use error::{AppError, Result};
pub use storage::PhotoStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::SqlitePool,
    pub store: PhotoStore,
    pub config: Config,
}
