//! Application state shared by all route functions

use std::sync::Arc;

use crate::config::Config;
use crate::handlers::{ResourceLinks, UserHandler};
use crate::repository::InMemoryUserRepository;

/// Application state
///
/// Cheap to clone: the configuration is behind an `Arc` and the repository
/// clones share one collection.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    users: UserHandler<InMemoryUserRepository>,
}

impl AppState {
    /// Create state around an already constructed repository
    pub fn new(config: Config, repository: InMemoryUserRepository) -> Self {
        let links = ResourceLinks::new(config.service.public_url.clone());
        Self {
            config: Arc::new(config),
            users: UserHandler::new(repository, links),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the user handler
    pub fn users(&self) -> &UserHandler<InMemoryUserRepository> {
        &self.users
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default(), InMemoryUserRepository::new())
    }
}
