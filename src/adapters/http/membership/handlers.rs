//! HTTP handlers for membership endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::membership::{
    CreateMembershipCommand, CreateMembershipHandler, DeleteMembershipCommand,
    DeleteMembershipHandler, GetMembershipHandler, GetMembershipQuery, ListMembershipsHandler,
    ListMembershipsQuery, ListPeriodsHandler, ListPeriodsQuery, UpdateMembershipCommand,
    UpdateMembershipHandler,
};
use crate::domain::foundation::MembershipId;
use crate::domain::membership::{MembershipChanges, MembershipError, MembershipInput};
use crate::ports::{Clock, MembershipRepository};

use super::dto::{
    CreateMembershipRequest, ErrorResponse, HealthResponse, MembershipWithPeriodsResponse,
    PeriodResponse, UpdateMembershipRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped dependencies
/// for efficient sharing across handlers.
#[derive(Clone)]
pub struct MembershipAppState {
    pub repository: Arc<dyn MembershipRepository>,
    pub clock: Arc<dyn Clock>,
    /// Include the underlying cause in error bodies. Off in production.
    pub expose_error_details: bool,
}

impl MembershipAppState {
    pub fn new(repository: Arc<dyn MembershipRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            expose_error_details: false,
        }
    }

    pub fn with_error_details(mut self, expose: bool) -> Self {
        self.expose_error_details = expose;
        self
    }

    /// Create handlers on demand from the shared state.
    pub fn list_memberships_handler(&self) -> ListMembershipsHandler {
        ListMembershipsHandler::new(self.repository.clone(), self.clock.clone())
    }

    pub fn get_membership_handler(&self) -> GetMembershipHandler {
        GetMembershipHandler::new(self.repository.clone(), self.clock.clone())
    }

    pub fn create_membership_handler(&self) -> CreateMembershipHandler {
        CreateMembershipHandler::new(self.repository.clone(), self.clock.clone())
    }

    pub fn update_membership_handler(&self) -> UpdateMembershipHandler {
        UpdateMembershipHandler::new(self.repository.clone(), self.clock.clone())
    }

    pub fn delete_membership_handler(&self) -> DeleteMembershipHandler {
        DeleteMembershipHandler::new(self.repository.clone())
    }

    pub fn list_periods_handler(&self) -> ListPeriodsHandler {
        ListPeriodsHandler::new(self.repository.clone())
    }

    fn api_error(&self, err: MembershipError) -> MembershipApiError {
        MembershipApiError::from_membership_error(err, self.expose_error_details)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Request Parsing
// ════════════════════════════════════════════════════════════════════════════════

fn parse_id(raw: &str) -> Result<MembershipId, MembershipApiError> {
    raw.parse().map_err(|_| MembershipApiError::invalid_id())
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /memberships - List all memberships with their periods
pub async fn list_memberships(
    State(state): State<MembershipAppState>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let result = state
        .list_memberships_handler()
        .handle(ListMembershipsQuery)
        .await
        .map_err(|e| state.api_error(e))?;

    let response: Vec<MembershipWithPeriodsResponse> = result
        .into_iter()
        .map(MembershipWithPeriodsResponse::from)
        .collect();

    Ok(Json(response))
}

/// GET /memberships/:id - Get one membership with its periods
pub async fn get_membership(
    State(state): State<MembershipAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let id = parse_id(&id)?;

    let result = state
        .get_membership_handler()
        .handle(GetMembershipQuery { id })
        .await
        .map_err(|e| state.api_error(e))?
        .ok_or_else(|| state.api_error(MembershipError::not_found(id)))?;

    Ok(Json(MembershipWithPeriodsResponse::from(result)))
}

/// GET /memberships/:id/periods - List the periods of one membership
pub async fn list_periods(
    State(state): State<MembershipAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let membership_id = parse_id(&id)?;

    let result = state
        .list_periods_handler()
        .handle(ListPeriodsQuery { membership_id })
        .await
        .map_err(|e| state.api_error(e))?;

    let response: Vec<PeriodResponse> = result.into_iter().map(PeriodResponse::from).collect();
    Ok(Json(response))
}

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST/PUT/DELETE endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /memberships - Create a membership and its billing periods
pub async fn create_membership(
    State(state): State<MembershipAppState>,
    payload: Result<Json<CreateMembershipRequest>, JsonRejection>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let Json(request) = payload.map_err(MembershipApiError::from)?;
    let input = MembershipInput::try_from(request)
        .map_err(|e| MembershipApiError::invalid_body(e.to_string()))?;

    let result = state
        .create_membership_handler()
        .handle(CreateMembershipCommand { input })
        .await
        .map_err(|e| state.api_error(e))?;

    Ok((
        StatusCode::CREATED,
        Json(MembershipWithPeriodsResponse::from(result)),
    ))
}

/// PUT /memberships/:id - Partially update a membership
pub async fn update_membership(
    State(state): State<MembershipAppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateMembershipRequest>, JsonRejection>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let id = parse_id(&id)?;
    let Json(request) = payload.map_err(MembershipApiError::from)?;
    let changes = MembershipChanges::try_from(request)
        .map_err(|e| MembershipApiError::invalid_body(e.to_string()))?;

    let result = state
        .update_membership_handler()
        .handle(UpdateMembershipCommand { id, changes })
        .await
        .map_err(|e| state.api_error(e))?;

    Ok(Json(MembershipWithPeriodsResponse::from(result)))
}

/// DELETE /memberships/:id - Delete a membership and its periods
pub async fn delete_membership(
    State(state): State<MembershipAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let id = parse_id(&id)?;

    let result = state
        .delete_membership_handler()
        .handle(DeleteMembershipCommand { id })
        .await
        .map_err(|e| state.api_error(e))?;

    if result.success {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(MembershipApiError::new(
            StatusCode::BAD_REQUEST,
            "MEMBERSHIP_DELETE_FAILED",
            result
                .error
                .unwrap_or_else(|| "Failed to delete membership".to_string()),
        ))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper that converts membership errors to HTTP responses.
#[derive(Debug)]
pub struct MembershipApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl MembershipApiError {
    fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse::new(status.as_u16(), code, message),
        }
    }

    /// Maps an orchestration error to its status and body.
    ///
    /// Validation, creation, update and delete failures are client errors;
    /// a missing membership is 404; everything else is a server error.
    pub fn from_membership_error(err: MembershipError, expose_details: bool) -> Self {
        let status = match &err {
            MembershipError::NotFound(_) => StatusCode::NOT_FOUND,
            MembershipError::ValidationFailed(_)
            | MembershipError::CreationFailed { .. }
            | MembershipError::UpdateFailed { .. }
            | MembershipError::DeleteFailed { .. } => StatusCode::BAD_REQUEST,
            MembershipError::FetchFailed { .. }
            | MembershipError::PeriodCreationFailed { .. }
            | MembershipError::PeriodFetchFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let mut api_error = Self::new(status, err.code(), err.message());
        if expose_details {
            if let Some(cause) = err.cause() {
                api_error.body = api_error
                    .body
                    .with_details(serde_json::Value::String(cause.to_string()));
            }
        }
        api_error
    }

    pub fn invalid_id() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            "Invalid membership ID format",
        )
    }

    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<MembershipError> for MembershipApiError {
    fn from(err: MembershipError) -> Self {
        Self::from_membership_error(err, false)
    }
}

impl From<JsonRejection> for MembershipApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_body(rejection.body_text())
    }
}

impl IntoResponse for MembershipApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}
