//! Public visitor endpoints. No authentication; a visitor only ever
//! holds their pass ID.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::services::RegisterVisit;

use super::{ApiError, ApiResponse, AppState, VisitDto, validation};

#[derive(Deserialize)]
pub struct RegisterVisitRequest {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub purpose: String,
    pub visit_date: String,
    pub host_name: String,
    pub host_email: String,
}

/// POST /visitors/register
/// Register a visit request. Starts in `pending` until the host decides.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterVisitRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VisitDto>>), ApiError> {
    validation::validate_email(&payload.email)?;
    validation::validate_email(&payload.host_email)?;

    let visit = state
        .visit_service()
        .register(RegisterVisit {
            full_name: payload.full_name,
            email: payload.email,
            phone: payload.phone,
            company: payload.company,
            purpose: payload.purpose,
            visit_date: payload.visit_date,
            host_name: payload.host_name,
            host_email: payload.host_email,
        })
        .await?;

    tracing::info!(pass_id = %visit.pass_id, "Visit registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(VisitDto::from_model(visit))),
    ))
}

/// GET /visitors/{`pass_id`}
/// Status lookup by pass ID, including issued codes once approved. The
/// pass ID is unguessable, which is the whole access control here.
pub async fn get_by_pass_id(
    State(state): State<Arc<AppState>>,
    Path(pass_id): Path<String>,
) -> Result<Json<ApiResponse<VisitDto>>, ApiError> {
    let pass_id = validation::validate_pass_id(&pass_id)?;

    let visit = state.visit_service().get_by_pass_id(pass_id).await?;

    Ok(Json(ApiResponse::success(VisitDto::from_model(visit))))
}
