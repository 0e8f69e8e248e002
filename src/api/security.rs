//! Security desk. Check-in and check-out require the exact code issued
//! at approval.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::domain::VisitStatus;

use super::{ApiError, ApiResponse, AppState, VisitDto, validation};

#[derive(Deserialize)]
pub struct VisitListQuery {
    pub status: Option<String>,
    pub limit: Option<u64>,
}

#[derive(Deserialize)]
pub struct CheckInRequest {
    pub entry_code: String,
}

#[derive(Deserialize)]
pub struct CheckOutRequest {
    pub exit_code: String,
}

/// GET /security/visits
/// All visits, optionally filtered by status.
pub async fn list_visits(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VisitListQuery>,
) -> Result<Json<ApiResponse<Vec<VisitDto>>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(|s| {
            VisitStatus::parse(s)
                .ok_or_else(|| ApiError::validation(format!("Unknown status: {s}")))
        })
        .transpose()?;

    let visits = state.visit_service().list(status, query.limit).await?;

    Ok(Json(ApiResponse::success(
        visits.into_iter().map(VisitDto::from_model).collect(),
    )))
}

/// GET /security/visits/by-pass/{`pass_id`}
/// Look up the visit for a pass presented at the gate.
pub async fn get_by_pass_id(
    State(state): State<Arc<AppState>>,
    Path(pass_id): Path<String>,
) -> Result<Json<ApiResponse<VisitDto>>, ApiError> {
    let pass_id = validation::validate_pass_id(&pass_id)?;

    let visit = state.visit_service().get_by_pass_id(pass_id).await?;

    Ok(Json(ApiResponse::success(VisitDto::from_model(visit))))
}

/// POST /security/visits/{id}/check-in
/// Check a visitor in. The presented entry code must match exactly.
pub async fn check_in(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<CheckInRequest>,
) -> Result<Json<ApiResponse<VisitDto>>, ApiError> {
    let id = validation::validate_visit_id(id)?;
    validation::validate_code(&payload.entry_code)?;

    let visit = state
        .visit_service()
        .check_in(id, &payload.entry_code)
        .await?;

    tracing::info!(visit_id = id, "Visitor checked in");

    Ok(Json(ApiResponse::success(VisitDto::from_model(visit))))
}

/// POST /security/visits/{id}/check-out
/// Check a visitor out with the exit code.
pub async fn check_out(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<CheckOutRequest>,
) -> Result<Json<ApiResponse<VisitDto>>, ApiError> {
    let id = validation::validate_visit_id(id)?;
    validation::validate_code(&payload.exit_code)?;

    let visit = state
        .visit_service()
        .check_out(id, &payload.exit_code)
        .await?;

    tracing::info!(visit_id = id, "Visitor checked out");

    Ok(Json(ApiResponse::success(VisitDto::from_model(visit))))
}
