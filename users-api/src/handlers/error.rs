//! API error types for handler operations
//!
//! Every failure a handler can produce is an [`ApiError`]: a kind that fixes
//! the HTTP status, the operation that failed, a message, optional entity
//! context and, for validation failures, field-level detail.
//!
//! # Example
//!
//! ```rust
//! use users_api::handlers::{ApiError, ApiErrorKind, ApiOperation};
//!
//! let error = ApiError::not_found(ApiOperation::Get, "User", "usr_123");
//! assert!(matches!(error.kind, ApiErrorKind::NotFound));
//! assert_eq!(error.entity_id, Some("usr_123".to_string()));
//! ```

use std::fmt;

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::validation::{FieldError, ValidationErrors};

/// Operation being performed when the API error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// Listing users
    List,
    /// Getting a single user by id
    Get,
    /// Creating a user
    Create,
    /// Replacing (or inserting) a user at a given id
    Replace,
    /// Applying a JSON Patch to a user
    Patch,
    /// Deleting a user
    Delete,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Get => write!(f, "get"),
            Self::Create => write!(f, "create"),
            Self::Replace => write!(f, "replace"),
            Self::Patch => write!(f, "patch"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Category of API error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Unparsable identifier or missing/unparsable body
    BadRequest,
    /// Structural or login-format violation
    ValidationFailed,
    /// Unknown id on an operation that needs an existing record
    NotFound,
    /// No acceptable representation for the `Accept` header
    NotAcceptable,
    /// Internal server error
    InternalError,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest => write!(f, "bad_request"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::NotFound => write!(f, "not_found"),
            Self::NotAcceptable => write!(f, "not_acceptable"),
            Self::InternalError => write!(f, "internal_error"),
        }
    }
}

impl ApiOperation {
    /// The user operation a request would have reached, if any
    ///
    /// Used where a request is refused before routing, such as content
    /// negotiation. Paths outside `/users` have no operation.
    pub fn for_request(method: &Method, path: &str) -> Option<Self> {
        let rest = path.trim_end_matches('/').strip_prefix("/users")?;
        let has_id = match rest.strip_prefix('/') {
            None if rest.is_empty() => false,
            Some(id) if !id.is_empty() && !id.contains('/') => true,
            _ => return None,
        };

        let read = *method == Method::GET || *method == Method::HEAD;
        match has_id {
            false if read => Some(Self::List),
            false if *method == Method::POST => Some(Self::Create),
            true if read => Some(Self::Get),
            true if *method == Method::PUT => Some(Self::Replace),
            true if *method == Method::PATCH => Some(Self::Patch),
            true if *method == Method::DELETE => Some(Self::Delete),
            _ => None,
        }
    }
}

impl ApiErrorKind {
    /// Get the HTTP status code for this error kind
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for this error kind
    #[must_use]
    pub fn error_code(&self) -> String {
        self.to_string().to_uppercase()
    }
}

/// Structured API error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The operation being performed, absent for requests refused before routing
    pub operation: Option<ApiOperation>,
    /// The category of error
    pub kind: ApiErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The type of entity involved
    pub entity_type: Option<String>,
    /// The id of the entity involved
    pub entity_id: Option<String>,
    /// Field-level detail for validation failures
    pub errors: Vec<FieldError>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation: Some(operation),
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
            errors: Vec::new(),
        }
    }

    /// Create a "not found" error with entity context
    pub fn not_found(
        operation: ApiOperation,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        Self::new(operation, ApiErrorKind::NotFound, "Entity not found")
            .with_entity(entity_type, entity_id)
    }

    /// Create a bad request error
    pub fn bad_request(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::BadRequest, message)
    }

    /// Create a validation failed error carrying field-level detail
    pub fn validation_failed(operation: ApiOperation, errors: ValidationErrors) -> Self {
        let mut error = Self::new(
            operation,
            ApiErrorKind::ValidationFailed,
            "One or more validation errors occurred",
        );
        error.errors = errors.into_errors();
        error
    }

    /// Create a not acceptable error for the operation the request targeted
    pub fn not_acceptable(operation: Option<ApiOperation>, message: impl Into<String>) -> Self {
        Self {
            operation,
            ..Self::new(ApiOperation::Get, ApiErrorKind::NotAcceptable, message)
        }
    }

    /// Create an internal error
    pub fn internal(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::InternalError, message)
    }

    /// Add entity context to an existing error
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: ApiOperation) -> Self {
        self.operation = Some(operation);
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operation {
            Some(operation) => write!(
                f,
                "API {} error during {}: {}",
                self.kind, operation, self.message
            )?,
            None => write!(f, "API {} error: {}", self.kind, self.message)?,
        }
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Response body for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
    pub code: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();
        let code = self.kind.error_code();

        if status.is_server_error() {
            tracing::error!(
                operation = self.operation.as_ref().map(tracing::field::display),
                kind = %self.kind,
                entity_type = ?self.entity_type,
                entity_id = ?self.entity_id,
                "API error: {}", self.message
            );
        } else {
            tracing::warn!(
                operation = self.operation.as_ref().map(tracing::field::display),
                kind = %self.kind,
                entity_type = ?self.entity_type,
                entity_id = ?self.entity_id,
                field_errors = self.errors.len(),
                "API error: {}", self.message
            );
        }

        let response = ApiErrorResponse {
            error: self.message,
            code,
            status: status.as_u16(),
            operation: self.operation.map(|op| op.to_string()),
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            errors: self.errors,
        };

        (status, Json(response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_operation_display() {
        assert_eq!(format!("{}", ApiOperation::List), "list");
        assert_eq!(format!("{}", ApiOperation::Get), "get");
        assert_eq!(format!("{}", ApiOperation::Create), "create");
        assert_eq!(format!("{}", ApiOperation::Replace), "replace");
        assert_eq!(format!("{}", ApiOperation::Patch), "patch");
        assert_eq!(format!("{}", ApiOperation::Delete), "delete");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiErrorKind::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiErrorKind::ValidationFailed.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ApiErrorKind::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiErrorKind::NotAcceptable.status_code(),
            StatusCode::NOT_ACCEPTABLE
        );
        assert_eq!(
            ApiErrorKind::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_code() {
        assert_eq!(ApiErrorKind::ValidationFailed.error_code(), "VALIDATION_FAILED");
        assert_eq!(ApiErrorKind::NotFound.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_not_found_convenience() {
        let error = ApiError::not_found(ApiOperation::Delete, "User", "abc");
        assert_eq!(error.operation, Some(ApiOperation::Delete));
        assert_eq!(error.kind, ApiErrorKind::NotFound);
        assert_eq!(error.entity_type, Some("User".to_string()));
    }

    #[test]
    fn test_validation_failed_keeps_field_errors() {
        let error = ApiError::validation_failed(
            ApiOperation::Create,
            ValidationErrors::single("login", "INVALID_LOGIN", "letters and digits only"),
        );
        assert_eq!(error.errors.len(), 1);
        assert_eq!(error.errors[0].field, "login");
    }

    #[test]
    fn test_display_with_entity() {
        let display = ApiError::not_found(ApiOperation::Get, "User", "abc").to_string();
        assert!(display.contains("not_found"));
        assert!(display.contains("get"));
        assert!(display.contains("[User: abc]"));
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::bad_request(ApiOperation::Replace, "bad id").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::validation_failed(ApiOperation::Create, ValidationErrors::new())
            .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_for_request_names_user_operations() {
        assert_eq!(
            ApiOperation::for_request(&Method::GET, "/users"),
            Some(ApiOperation::List)
        );
        assert_eq!(
            ApiOperation::for_request(&Method::POST, "/users/"),
            Some(ApiOperation::Create)
        );
        assert_eq!(
            ApiOperation::for_request(&Method::HEAD, "/users/abc"),
            Some(ApiOperation::Get)
        );
        assert_eq!(
            ApiOperation::for_request(&Method::PUT, "/users/abc"),
            Some(ApiOperation::Replace)
        );
        assert_eq!(
            ApiOperation::for_request(&Method::PATCH, "/users/abc"),
            Some(ApiOperation::Patch)
        );
        assert_eq!(
            ApiOperation::for_request(&Method::DELETE, "/users/abc"),
            Some(ApiOperation::Delete)
        );
    }

    #[test]
    fn test_for_request_outside_users_is_none() {
        assert_eq!(ApiOperation::for_request(&Method::GET, "/health"), None);
        assert_eq!(ApiOperation::for_request(&Method::GET, "/usersx"), None);
        assert_eq!(ApiOperation::for_request(&Method::GET, "/users/a/b"), None);
        assert_eq!(ApiOperation::for_request(&Method::DELETE, "/users"), None);
    }

    #[test]
    fn test_not_acceptable_carries_given_operation() {
        let error = ApiError::not_acceptable(Some(ApiOperation::Create), "json only");
        assert_eq!(error.operation, Some(ApiOperation::Create));
        assert_eq!(error.kind.status_code(), StatusCode::NOT_ACCEPTABLE);

        let error = ApiError::not_acceptable(None, "json only");
        assert_eq!(error.operation, None);
        assert_eq!(error.to_string(), "API not_acceptable error: json only");
    }
}
