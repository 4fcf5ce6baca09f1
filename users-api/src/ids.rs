//! Identifiers for user records
//!
//! A [`UserId`] wraps a 128-bit UUID. Ids minted by the service use UUIDv7 so
//! that freshly created records sort by creation time in logs; ids supplied
//! by clients (the upsert path of `PUT /users/{id}`) may be any UUID version.
//!
//! The nil UUID is reserved: a record carrying it has not been assigned an id
//! yet, and the repository mints one on insert.
//!
//! ```rust
//! use users_api::ids::UserId;
//! use std::str::FromStr;
//!
//! let id = UserId::new();
//! assert!(!id.is_nil());
//!
//! let parsed = UserId::from_str(&id.to_string()).unwrap();
//! assert_eq!(parsed, id);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Primary key of a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new time-sortable id (UUIDv7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// The unassigned id.
    #[must_use]
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Returns `true` for the unassigned id.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::nil()
    }
}

impl From<Uuid> for UserId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for UserId {
    type Err = UserIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| UserIdError::Parse(s.to_string()))
    }
}

/// Errors that can occur when parsing a [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserIdError {
    /// The text is not a UUID.
    #[error("'{0}' is not a valid user id")]
    Parse(String),
}
