//! # users-api
//!
//! A user resource service: create, read, replace, JSON-Patch, delete and
//! paginated listing over an in-process store.
//!
//! ## Features
//!
//! - **Repository**: [`repository::UserRepository`] with upsert-by-id and ordered, counted pages
//! - **Validation**: explicit per-call results from [`validation`]
//! - **Handlers**: [`handlers::UserHandler`] with insert-vs-update resolution and `X-Pagination` links
//! - **Middleware stack**: request tracking, panic recovery, body size limits, timeouts, CORS, compression
//! - **Health checks**: Liveness and readiness probes
//! - **Graceful shutdown**: Proper signal handling (SIGTERM, SIGINT)
//!
//! ## Example
//!
//! ```rust,no_run
//! use users_api::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::new(config.clone(), InMemoryUserRepository::new());
//!     let app = router(state);
//!
//!     Server::new(config).serve(app).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod ids;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repository;
pub mod routes;
pub mod server;
pub mod state;
pub mod validation;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, MiddlewareConfig, ServiceConfig};
    pub use crate::error::{Error, Result};
    pub use crate::handlers::{
        ApiError, ApiErrorKind, ApiOperation, ListQuery, PaginationMetadata, ResourceLinks,
        UserHandler, WriteOutcome,
    };
    pub use crate::health::{health, readiness};
    pub use crate::ids::UserId;
    pub use crate::middleware::{
        request_id_layer, request_id_propagation_layer, require_json, sensitive_headers_layer,
    };
    pub use crate::models::{CreateUser, UpdateUser, User, UserResponse};
    pub use crate::observability::{init_tracing, shutdown_tracing};
    pub use crate::repository::{InMemoryUserRepository, UserRepository};
    pub use crate::routes::router;
    pub use crate::server::Server;
    pub use crate::state::AppState;

    pub use axum::{
        extract::{Path, Query, State},
        routing::{delete, get, patch, post, put},
        Json, Router,
    };
    pub use serde::{Deserialize, Serialize};
    pub use tracing::{debug, error, info, warn};
}
