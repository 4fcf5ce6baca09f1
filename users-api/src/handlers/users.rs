//! User resource handlers
//!
//! [`UserHandler`] holds the decision logic for every operation on the user
//! collection and is generic over the storage seam, so it can be driven
//! directly in tests. The axum route functions at the bottom of this module
//! only extract the request parts and delegate.
//!
//! Identifier handling differs per operation: an id that does not parse is a
//! `404` on reads, deletes and patches (no such resource can exist), but a
//! `400` on replace, where the client is naming the id to create.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use super::error::{ApiError, ApiOperation};
use super::query::ListQuery;
use super::response::{ListResponse, NoContent, PaginationMetadata, ResourceLinks, WriteOutcome};
use crate::ids::UserId;
use crate::models::{UpdateUser, User, UserResponse};
use crate::repository::{RepositoryErrorKind, RepositoryResult, UserRepository};
use crate::state::AppState;
use crate::validation::{self, ValidationErrors};

const ENTITY: &str = "User";

/// Handler for the user collection
#[derive(Debug, Clone)]
pub struct UserHandler<R> {
    repository: R,
    links: ResourceLinks,
}

impl<R: UserRepository> UserHandler<R> {
    /// Create a handler over `repository`, building links with `links`
    pub fn new(repository: R, links: ResourceLinks) -> Self {
        Self { repository, links }
    }

    /// The underlying repository
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// `GET /users/{id}`
    pub async fn get(&self, id: &str) -> Result<UserResponse, ApiError> {
        let op = ApiOperation::Get;
        let id = parse_existing_id(op, id)?;

        self.repository
            .find_by_id(&id)
            .await
            .map(UserResponse::from)
            .ok_or_else(|| ApiError::not_found(op, ENTITY, id.to_string()))
    }

    /// `POST /users`
    pub async fn create(&self, body: &[u8]) -> Result<WriteOutcome, ApiError> {
        let op = ApiOperation::Create;
        let payload = parse_body(op, body)?;
        let create =
            validation::validate_create(&payload).map_err(|e| ApiError::validation_failed(op, e))?;

        let result = self.repository.insert(create.into_user()).await;
        self.finish_write(op, result.map(|user| (user, true)))
    }

    /// `PUT /users/{id}`
    ///
    /// Stores a record rebuilt entirely from the payload, inserting it at the
    /// requested id when none exists.
    pub async fn replace(&self, id: &str, body: &[u8]) -> Result<WriteOutcome, ApiError> {
        let op = ApiOperation::Replace;
        let id = id
            .parse::<UserId>()
            .map_err(|e| ApiError::bad_request(op, e.to_string()))?;
        if id.is_nil() {
            return Err(ApiError::bad_request(op, "The nil id cannot name a user"));
        }

        let payload = parse_body(op, body)?;
        let update =
            validation::validate_update(&payload).map_err(|e| ApiError::validation_failed(op, e))?;

        let result = self
            .repository
            .upsert_by_id(User::from_update(id, update))
            .await;
        self.finish_write(op, result)
    }

    /// `PATCH /users/{id}`
    ///
    /// Applies an RFC 6902 document to a copy of the stored record's update
    /// representation. The read, patch, validation and write happen under one
    /// repository lock, so a concurrent delete turns this into a `404` and
    /// concurrent patches see each other's results. Never creates.
    pub async fn patch(&self, id: &str, body: &[u8]) -> Result<WriteOutcome, ApiError> {
        let op = ApiOperation::Patch;
        if is_blank(body) {
            return Err(ApiError::bad_request(op, "A JSON Patch document is required"));
        }
        let patch: json_patch::Patch = serde_json::from_slice(body).map_err(|e| {
            ApiError::bad_request(op, format!("The body is not a JSON Patch document: {}", e))
        })?;

        let id = parse_existing_id(op, id)?;
        let outcome = self
            .repository
            .update_existing(&id, |user| -> Result<User, ApiError> {
                let mut document = serde_json::to_value(UpdateUser::from(user))
                    .map_err(|e| ApiError::internal(op, e.to_string()))?;
                json_patch::patch(&mut document, &patch.0).map_err(|e| {
                    ApiError::validation_failed(
                        op,
                        ValidationErrors::single("patch", "PATCH_FAILED", e.to_string()),
                    )
                })?;

                let update = validation::validate_patched(&document)
                    .map_err(|e| ApiError::validation_failed(op, e))?;
                Ok(User::from_update(user.id, update))
            })
            .await
            .ok_or_else(|| ApiError::not_found(op, ENTITY, id.to_string()))?;

        let user = outcome?;
        tracing::info!(operation = %op, user_id = %user.id, "user patched");
        Ok(WriteOutcome::NoContent)
    }

    /// `DELETE /users/{id}`
    pub async fn delete(&self, id: &str) -> Result<NoContent, ApiError> {
        let op = ApiOperation::Delete;
        let id = parse_existing_id(op, id)?;

        if !self.repository.delete(&id).await {
            return Err(ApiError::not_found(op, ENTITY, id.to_string()));
        }
        tracing::debug!(user_id = %id, "user deleted");

        Ok(NoContent)
    }

    /// `GET /users`
    pub async fn list(&self, query: &ListQuery) -> ListResponse<UserResponse> {
        let page_number = query.page_number();
        let page_size = query.page_size();

        let page = self
            .repository
            .list_page(query.pagination())
            .await
            .map(UserResponse::from);
        let pagination =
            PaginationMetadata::build(&self.links, page_number, page_size, page.total_count);

        ListResponse::new(page.items, pagination)
    }

    fn finish_write(
        &self,
        op: ApiOperation,
        result: RepositoryResult<(User, bool)>,
    ) -> Result<WriteOutcome, ApiError> {
        match result {
            Ok((user, true)) => {
                tracing::info!(operation = %op, user_id = %user.id, "user stored");
                Ok(WriteOutcome::created(user.id, &self.links))
            }
            Ok((user, false)) => {
                tracing::info!(operation = %op, user_id = %user.id, "user overwritten");
                Ok(WriteOutcome::NoContent)
            }
            Err(err) => match err.kind {
                RepositoryErrorKind::DuplicateIdentity => {
                    tracing::warn!(operation = %op, error = %err, "unexpected duplicate identity");
                    Ok(WriteOutcome::NoContent)
                }
            },
        }
    }
}

/// Parse an id that must name an existing record; failure is a `404`
fn parse_existing_id(op: ApiOperation, id: &str) -> Result<UserId, ApiError> {
    id.parse::<UserId>()
        .map_err(|_| ApiError::not_found(op, ENTITY, id))
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

/// Decode a JSON request body; missing, `null` or malformed bodies are a `400`
fn parse_body(op: ApiOperation, body: &[u8]) -> Result<Value, ApiError> {
    if is_blank(body) {
        return Err(ApiError::bad_request(op, "A request body is required"));
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Null) => Err(ApiError::bad_request(op, "A request body is required")),
        Ok(value) => Ok(value),
        Err(e) => Err(ApiError::bad_request(
            op,
            format!("The request body is not valid JSON: {}", e),
        )),
    }
}

// Route functions

/// `GET|HEAD /users/{id}`
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    tracing::info!(user_id = %id, "get user");
    state.users().get(&id).await.map(Json)
}

/// `POST /users`
pub async fn create_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<WriteOutcome, ApiError> {
    tracing::info!(body_len = body.len(), "create user");
    state.users().create(&body).await
}

/// `PUT /users/{id}`
pub async fn replace_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<WriteOutcome, ApiError> {
    tracing::info!(user_id = %id, "replace user");
    state.users().replace(&id, &body).await
}

/// `PATCH /users/{id}`
pub async fn patch_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<WriteOutcome, ApiError> {
    tracing::info!(user_id = %id, "patch user");
    state.users().patch(&id, &body).await
}

/// `DELETE /users/{id}`
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<NoContent, ApiError> {
    tracing::info!(user_id = %id, "delete user");
    state.users().delete(&id).await
}

/// `GET /users`
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ListResponse<UserResponse> {
    tracing::info!(
        page_number = query.page_number(),
        page_size = query.page_size(),
        "list users"
    );
    state.users().list(&query).await
}
