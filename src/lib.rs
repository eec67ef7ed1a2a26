pub mod api;
pub mod auth;
pub mod db;
pub mod images;
pub mod models;
pub mod schema;
pub mod shopping_list;
pub mod short_code;
pub mod telemetry;

use std::sync::Arc;

/// Application state shared across all handlers
pub type AppState = Arc<db::DbPool>;
