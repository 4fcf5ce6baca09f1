//! Process-level error type
//!
//! Request failures are [`crate::handlers::ApiError`] values and never reach
//! this type. [`Error`] covers what can go wrong around the server itself:
//! loading configuration, binding the listener and serving.

use thiserror::Error;

/// Result type alias using the service error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the service
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid listen address
    #[error("Invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}
