//! Host portal. Every route requires a logged-in, approved host and only
//! operates on visits addressed to that host's email.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::domain::VisitStatus;

use super::auth::CurrentPrincipal;
use super::{ApiError, ApiResponse, AppState, VisitDto, validation};

#[derive(Deserialize)]
pub struct VisitListQuery {
    pub status: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct RejectRequest {
    #[serde(default)]
    pub reason: String,
}

fn host_email(principal: &crate::domain::Principal) -> Result<String, ApiError> {
    principal
        .as_host()
        .map(|h| h.email.clone())
        .ok_or_else(|| ApiError::Forbidden("Host account required".to_string()))
}

fn parse_status(status: Option<&str>) -> Result<Option<VisitStatus>, ApiError> {
    status
        .map(|s| {
            VisitStatus::parse(s)
                .ok_or_else(|| ApiError::validation(format!("Unknown status: {s}")))
        })
        .transpose()
}

/// GET /host/visits
/// Visits addressed to the logged-in host, optionally filtered by status.
pub async fn list_visits(
    State(state): State<Arc<AppState>>,
    axum::Extension(CurrentPrincipal(principal)): axum::Extension<CurrentPrincipal>,
    Query(query): Query<VisitListQuery>,
) -> Result<Json<ApiResponse<Vec<VisitDto>>>, ApiError> {
    let email = host_email(&principal)?;
    let status = parse_status(query.status.as_deref())?;

    let visits = state.visit_service().list_for_host(&email, status).await?;

    // Codes are issued to the visitor at approval; listings never carry them.
    Ok(Json(ApiResponse::success(
        visits
            .into_iter()
            .map(VisitDto::from_model_without_codes)
            .collect(),
    )))
}

/// POST /host/visits/{id}/approve
/// Approve a pending visit and issue its entry/exit codes.
pub async fn approve_visit(
    State(state): State<Arc<AppState>>,
    axum::Extension(CurrentPrincipal(principal)): axum::Extension<CurrentPrincipal>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<VisitDto>>, ApiError> {
    let id = validation::validate_visit_id(id)?;
    let email = host_email(&principal)?;

    let visit = state.visit_service().approve(id, Some(&email)).await?;

    tracing::info!(visit_id = id, host = %email, "Visit approved");

    Ok(Json(ApiResponse::success(VisitDto::from_model(visit))))
}

/// POST /host/visits/{id}/reject
/// Reject a visit that has not been checked in yet.
pub async fn reject_visit(
    State(state): State<Arc<AppState>>,
    axum::Extension(CurrentPrincipal(principal)): axum::Extension<CurrentPrincipal>,
    Path(id): Path<i32>,
    payload: Option<Json<RejectRequest>>,
) -> Result<Json<ApiResponse<VisitDto>>, ApiError> {
    let id = validation::validate_visit_id(id)?;
    let email = host_email(&principal)?;
    let reason = payload.map(|Json(p)| p.reason).unwrap_or_default();

    let visit = state
        .visit_service()
        .reject(id, &reason, Some(&email))
        .await?;

    tracing::info!(visit_id = id, host = %email, "Visit rejected");

    Ok(Json(ApiResponse::success(VisitDto::from_model(visit))))
}
