//! Request validation pipeline
//!
//! Every check is a pure function over a parsed JSON body and returns its own
//! [`ValidationErrors`] value. Nothing is accumulated across requests.
//!
//! Structural validation runs first and only looks at shape: the body must be
//! an object and each known field, when present and non-null, must be a
//! string. Domain rules (the login format) run after it and only on the
//! creation path.
//!
//! ```rust
//! use serde_json::json;
//! use users_api::validation::validate_create;
//!
//! let ok = validate_create(&json!({"login": "johndoe375"})).unwrap();
//! assert_eq!(ok.login.as_deref(), Some("johndoe375"));
//!
//! let err = validate_create(&json!({"login": "john doe"})).unwrap_err();
//! assert_eq!(err.errors()[0].field, "login");
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{CreateUser, UpdateUser};

/// Letters and digits only, at least one character
static LOGIN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("login regex is valid"));

/// Fields of the creation and update representations
pub const USER_FIELDS: &[&str] = &["login", "firstName", "lastName"];

/// Pseudo-field used when the body as a whole is wrong
pub const BODY_FIELD: &str = "body";

/// Field-level validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name (wire spelling) or JSON pointer for patch failures
    pub field: String,
    /// Error code (e.g., "REQUIRED", "INVALID_TYPE", "INVALID_LOGIN")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// Ordered list of field errors produced by one validation call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Create an empty error list
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an error list holding a single error
    pub fn single(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let mut errors = Self::new();
        errors.add(field, code, message);
        errors
    }

    /// Add a field-level error
    pub fn add(
        &mut self,
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.errors.push(FieldError {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        });
    }

    /// Check if there are any validation errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of field errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Borrow the errors in the order they were found
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Take the errors out
    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// `Ok(value)` if no errors were recorded, otherwise `Err(self)`
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Returns `true` if `login` is non-empty and made of ASCII letters and digits
pub fn is_valid_login(login: &str) -> bool {
    LOGIN_REGEX.is_match(login)
}

/// Shape check shared by every user payload
///
/// The body must be an object and each of [`USER_FIELDS`] present in it must
/// be a string or null. Unknown fields are ignored here.
pub fn check_structure(body: &Value) -> Result<&Map<String, Value>, ValidationErrors> {
    let Some(object) = body.as_object() else {
        return Err(ValidationErrors::single(
            BODY_FIELD,
            "INVALID_TYPE",
            "The request body must be a JSON object.",
        ));
    };

    let mut errors = ValidationErrors::new();
    for field in USER_FIELDS {
        match object.get(*field) {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(other) => errors.add(
                *field,
                "INVALID_TYPE",
                format!(
                    "The {} field must be a string, found {}.",
                    field,
                    json_type_name(other)
                ),
            ),
        }
    }
    errors.into_result(object)
}

/// Validate a creation payload
///
/// Runs [`check_structure`], then requires a login of letters and digits.
pub fn validate_create(body: &Value) -> Result<CreateUser, ValidationErrors> {
    check_structure(body)?;
    let create: CreateUser = decode(body)?;

    match create.login.as_deref() {
        None => Err(ValidationErrors::single(
            "login",
            "REQUIRED",
            "The login field is required.",
        )),
        Some(login) if !is_valid_login(login) => Err(ValidationErrors::single(
            "login",
            "INVALID_LOGIN",
            "The login must consist of letters and digits only.",
        )),
        Some(_) => Ok(create),
    }
}

/// Validate a replace payload
///
/// Structural check only; previously accepted values need not be re-checked.
pub fn validate_update(body: &Value) -> Result<UpdateUser, ValidationErrors> {
    check_structure(body)?;
    decode(body)
}

/// Validate the document produced by applying a patch
///
/// Same as [`validate_update`], and additionally rejects fields the update
/// representation does not have (a patch that added `/age`, say).
pub fn validate_patched(body: &Value) -> Result<UpdateUser, ValidationErrors> {
    let object = check_structure(body)?;

    let mut errors = ValidationErrors::new();
    for key in object.keys() {
        if !USER_FIELDS.contains(&key.as_str()) {
            errors.add(
                key.clone(),
                "UNKNOWN_FIELD",
                format!("The field '{}' is not part of the user resource.", key),
            );
        }
    }
    errors.into_result(())?;

    decode(body)
}

fn decode<T: DeserializeOwned>(body: &Value) -> Result<T, ValidationErrors> {
    T::deserialize(body)
        .map_err(|e| ValidationErrors::single(BODY_FIELD, "INVALID_BODY", e.to_string()))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_format() {
        assert!(is_valid_login("johndoe375"));
        assert!(is_valid_login("ABC"));
        assert!(!is_valid_login(""));
        assert!(!is_valid_login("john doe"));
        assert!(!is_valid_login("john.doe"));
        assert!(!is_valid_login("jöhn"));
        assert!(!is_valid_login("john\n"));
    }

    #[test]
    fn test_create_accepts_minimal_payload() {
        let create = validate_create(&json!({"login": "alice"})).unwrap();
        assert_eq!(create.login.as_deref(), Some("alice"));
        assert!(create.first_name.is_none());
    }

    #[test]
    fn test_create_requires_login() {
        let err = validate_create(&json!({"firstName": "Alice"})).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.errors()[0].field, "login");
        assert_eq!(err.errors()[0].code, "REQUIRED");

        let err = validate_create(&json!({"login": null})).unwrap_err();
        assert_eq!(err.errors()[0].code, "REQUIRED");
    }

    #[test]
    fn test_create_rejects_bad_login() {
        let err = validate_create(&json!({"login": "john doe"})).unwrap_err();
        assert_eq!(err.errors()[0].code, "INVALID_LOGIN");

        let err = validate_create(&json!({"login": ""})).unwrap_err();
        assert_eq!(err.errors()[0].code, "INVALID_LOGIN");
    }

    #[test]
    fn test_structure_runs_before_login_rule() {
        let err = validate_create(&json!({"login": 42, "lastName": ["x"]})).unwrap_err();
        let fields: Vec<_> = err.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["login", "lastName"]);
        assert!(err.errors().iter().all(|e| e.code == "INVALID_TYPE"));
    }

    #[test]
    fn test_structure_rejects_non_objects() {
        let err = validate_update(&json!(["login"])).unwrap_err();
        assert_eq!(err.errors()[0].field, BODY_FIELD);

        let err = validate_create(&json!("alice")).unwrap_err();
        assert_eq!(err.errors()[0].field, BODY_FIELD);
    }

    #[test]
    fn test_update_skips_login_rule() {
        let update = validate_update(&json!({"login": "john doe"})).unwrap();
        assert_eq!(update.login.as_deref(), Some("john doe"));

        let update = validate_update(&json!({})).unwrap();
        assert_eq!(update, UpdateUser::default());
    }

    #[test]
    fn test_update_ignores_unknown_fields() {
        assert!(validate_update(&json!({"login": "a", "age": 3})).is_ok());
    }

    #[test]
    fn test_patched_rejects_unknown_fields() {
        let err = validate_patched(&json!({"login": "a", "age": 3})).unwrap_err();
        assert_eq!(err.errors()[0].field, "age");
        assert_eq!(err.errors()[0].code, "UNKNOWN_FIELD");
    }

    #[test]
    fn test_patched_rejects_wrong_types() {
        let err = validate_patched(&json!({"login": {"nested": true}})).unwrap_err();
        assert_eq!(err.errors()[0].code, "INVALID_TYPE");
    }

    #[test]
    fn test_display_joins_messages() {
        let mut errors = ValidationErrors::new();
        errors.add("login", "REQUIRED", "missing");
        errors.add("lastName", "INVALID_TYPE", "wrong");
        assert_eq!(errors.to_string(), "login: missing; lastName: wrong");
    }

    #[test]
    fn test_into_result() {
        assert_eq!(ValidationErrors::new().into_result(7), Ok(7));
        assert!(ValidationErrors::single("a", "b", "c").into_result(7).is_err());
    }
}
