//! animal-registry: a small REST service for cataloguing animal records
//!
//! Exposes list and create endpoints for animal records with optional image
//! upload. Records carry server-assigned identifiers and timestamps, names
//! are unique case-insensitively, and persistence is pluggable between an
//! in-process store and Redis.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use animal_registry::{config::RegistryConfig, state::AppState, store::MemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = RegistryConfig::load()?;
//!     let state = AppState::new(config, Arc::new(MemoryStore::new()))?;
//!     let app = animal_registry::router(state);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod animals;
pub mod config;
pub mod error;
pub mod state;
pub mod store;
pub mod uploads;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::animals::handlers::{create_animal, list_animals};
use crate::state::AppState;

/// Builds the application router.
///
/// `/animals` is served with and without the trailing slash so that clients
/// of either form see the same resource.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/animals", get(list_animals).post(create_animal))
        .route("/animals/", get(list_animals).post(create_animal))
        .route("/uploads/{filename}", get(uploads::serve_upload))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
