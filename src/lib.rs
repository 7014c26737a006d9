//! Booklib book catalog server
//!
//! A small REST JSON API for creating, reading, updating and deleting books
//! stored in an embedded SQLite database.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod server;

pub use api::AppState;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
