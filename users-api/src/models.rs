//! User record and its wire representations
//!
//! The stored [`User`] never leaves the service directly. Reads project it to
//! [`UserResponse`]; writes arrive as [`CreateUser`] or [`UpdateUser`]. The
//! conversions between them are plain functions with no hidden mapping rules.

use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// First name stored when a creation payload omits it
pub const DEFAULT_FIRST_NAME: &str = "John";

/// Last name stored when a creation payload omits it
pub const DEFAULT_LAST_NAME: &str = "Doe";

/// Stored user record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub login: String,
    pub first_name: String,
    pub last_name: String,
}

impl User {
    /// Display name, last name first
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }

    /// Builds a fresh record at `id` from a replace payload.
    ///
    /// Fields missing from the payload are stored empty; nothing is carried
    /// over from a previous version of the record.
    #[must_use]
    pub fn from_update(id: UserId, update: UpdateUser) -> Self {
        Self {
            id,
            login: update.login.unwrap_or_default(),
            first_name: update.first_name.unwrap_or_default(),
            last_name: update.last_name.unwrap_or_default(),
        }
    }
}

/// Creation payload for `POST /users`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl CreateUser {
    /// Converts a validated payload into an unsaved record (nil id).
    #[must_use]
    pub fn into_user(self) -> User {
        User {
            id: UserId::nil(),
            login: self.login.unwrap_or_default(),
            first_name: self
                .first_name
                .unwrap_or_else(|| DEFAULT_FIRST_NAME.to_string()),
            last_name: self
                .last_name
                .unwrap_or_else(|| DEFAULT_LAST_NAME.to_string()),
        }
    }
}

/// Update representation, used by `PUT` bodies and as the `PATCH` target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl From<&User> for UpdateUser {
    fn from(user: &User) -> Self {
        Self {
            login: Some(user.login.clone()),
            first_name: Some(user.first_name.clone()),
            last_name: Some(user.last_name.clone()),
        }
    }
}

/// Output representation returned by reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub login: String,
    pub full_name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            login: user.login.clone(),
            full_name: user.full_name(),
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User {
            id: UserId::new(),
            login: "johndoe375".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
        }
    }

    #[test]
    fn test_full_name_is_last_then_first() {
        assert_eq!(sample().full_name(), "Doe John");
    }

    #[test]
    fn test_create_defaults_names() {
        let user = CreateUser {
            login: Some("alice".to_string()),
            ..Default::default()
        }
        .into_user();

        assert!(user.id.is_nil());
        assert_eq!(user.first_name, DEFAULT_FIRST_NAME);
        assert_eq!(user.last_name, DEFAULT_LAST_NAME);
    }

    #[test]
    fn test_create_keeps_supplied_names() {
        let user = CreateUser {
            login: Some("alice".to_string()),
            first_name: Some("Alice".to_string()),
            last_name: Some("Liddell".to_string()),
        }
        .into_user();

        assert_eq!(user.full_name(), "Liddell Alice");
    }

    #[test]
    fn test_from_update_does_not_preserve_missing_fields() {
        let id = UserId::new();
        let user = User::from_update(
            id,
            UpdateUser {
                login: Some("bob".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(user.id, id);
        assert_eq!(user.login, "bob");
        assert_eq!(user.first_name, "");
        assert_eq!(user.last_name, "");
    }

    #[test]
    fn test_update_representation_uses_camel_case() {
        let json = serde_json::to_value(UpdateUser::from(&sample())).unwrap();
        assert_eq!(json["login"], "johndoe375");
        assert_eq!(json["firstName"], "John");
        assert_eq!(json["lastName"], "Doe");
    }

    #[test]
    fn test_response_projection() {
        let user = sample();
        let response = UserResponse::from(&user);
        assert_eq!(response.id, user.id);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["fullName"], "Doe John");
        assert!(json.get("firstName").is_none());
    }
}
