//! Route table

use axum::{middleware, routing::get, Router};

use crate::handlers::{create_user, delete_user, get_user, list_users, patch_user, replace_user};
use crate::health::{health, readiness};
use crate::middleware::require_json;
use crate::state::AppState;

/// Build the application router
///
/// `GET /users/{id}` also answers `HEAD`. Every route sits behind the
/// `Accept` check; the server-level middleware stack is applied separately by
/// [`crate::server::Server`].
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user)
                .put(replace_user)
                .patch(patch_user)
                .delete(delete_user),
        )
        .route("/health", get(health))
        .route("/ready", get(readiness))
        .layer(middleware::from_fn(require_json))
        .with_state(state)
}
