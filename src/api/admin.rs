//! Admin portal: account management and full visit oversight.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::constants::limits;
use crate::domain::{HostConfirmation, NotificationEvent, StaffRole, VisitStatus};

use super::{
    ApiError, ApiResponse, AppState, HostDto, NotificationDto, UserDto, VisitDto, validation,
};

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

#[derive(Deserialize)]
pub struct HostListQuery {
    pub approval_status: Option<String>,
}

#[derive(Deserialize)]
pub struct VisitListQuery {
    pub status: Option<String>,
    pub limit: Option<u64>,
}

#[derive(Deserialize, Default)]
pub struct RejectRequest {
    #[serde(default)]
    pub reason: String,
}

#[derive(Deserialize)]
pub struct NotificationListQuery {
    pub limit: Option<u64>,
}

/// GET /admin/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let users = state
        .store()
        .list_users()
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserDto::from).collect(),
    )))
}

/// POST /admin/users
/// Create a staff account (admin, superadmin, or security).
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    validation::validate_username(&payload.username)?;
    validation::validate_email(&payload.email)?;

    if StaffRole::parse(&payload.role).is_none() {
        return Err(ApiError::validation(format!(
            "Unknown role: {}",
            payload.role
        )));
    }
    if payload.password.len() < limits::MIN_PASSWORD_LENGTH {
        return Err(ApiError::validation(format!(
            "Password must be at least {} characters",
            limits::MIN_PASSWORD_LENGTH
        )));
    }

    if state
        .store()
        .get_user_by_username(&payload.username)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .is_some()
    {
        return Err(ApiError::Conflict("Username already taken".to_string()));
    }

    let security = state.config().read().await.security.clone();

    let user = state
        .store()
        .create_user(
            &payload.username,
            &payload.email,
            &payload.full_name,
            &payload.role,
            &payload.password,
            Some(&security),
        )
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    tracing::info!(username = %user.username, role = %user.role, "Staff account created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from(user))),
    ))
}

/// PUT /admin/users/{id}/active
pub async fn set_user_active(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<SetActiveRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state
        .store()
        .set_user_active(id, payload.is_active)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("User", id))?;

    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

/// PUT /admin/hosts/{id}/active
pub async fn set_host_active(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<SetActiveRequest>,
) -> Result<Json<ApiResponse<HostDto>>, ApiError> {
    let host = state
        .store()
        .set_host_active(id, payload.is_active)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Host", id))?;

    Ok(Json(ApiResponse::success(HostDto::from(host))))
}

/// GET /admin/hosts
pub async fn list_hosts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HostListQuery>,
) -> Result<Json<ApiResponse<Vec<HostDto>>>, ApiError> {
    let approval_status = query
        .approval_status
        .as_deref()
        .map(|s| {
            HostConfirmation::parse(s)
                .ok_or_else(|| ApiError::validation(format!("Unknown approval status: {s}")))
        })
        .transpose()?;

    let hosts = state
        .store()
        .list_hosts(approval_status)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        hosts.into_iter().map(HostDto::from).collect(),
    )))
}

/// POST /admin/hosts/{id}/approve
pub async fn approve_host(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<HostDto>>, ApiError> {
    let host = state
        .store()
        .set_host_approval(id, true)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Host", id))?;

    let _ = state.event_bus().send(NotificationEvent::HostApproved {
        host_id: host.id,
        username: host.username.clone(),
    });

    tracing::info!(host = %host.username, "Host approved");

    Ok(Json(ApiResponse::success(HostDto::from(host))))
}

/// POST /admin/hosts/{id}/reject
pub async fn reject_host(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<HostDto>>, ApiError> {
    let host = state
        .store()
        .set_host_approval(id, false)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Host", id))?;

    let _ = state.event_bus().send(NotificationEvent::HostRejected {
        host_id: host.id,
        username: host.username.clone(),
    });

    tracing::info!(host = %host.username, "Host rejected");

    Ok(Json(ApiResponse::success(HostDto::from(host))))
}

/// GET /admin/visits
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
        visits
            .into_iter()
            .map(VisitDto::from_model_without_codes)
            .collect(),
    )))
}

/// POST /admin/visits/{id}/reject
/// Admin override: reject any visit regardless of owning host.
pub async fn reject_visit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    payload: Option<Json<RejectRequest>>,
) -> Result<Json<ApiResponse<VisitDto>>, ApiError> {
    let id = validation::validate_visit_id(id)?;
    let reason = payload.map(|Json(p)| p.reason).unwrap_or_default();

    let visit = state
        .visit_service()
        .reject(id, &reason, None)
        .await?;

    tracing::info!(visit_id = id, "Visit rejected by admin");

    Ok(Json(ApiResponse::success(VisitDto::from_model(visit))))
}

/// GET /admin/notifications
/// Recent entries from the notification outbox.
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NotificationListQuery>,
) -> Result<Json<ApiResponse<Vec<NotificationDto>>>, ApiError> {
    let limit = query.limit.unwrap_or(limits::DEFAULT_LIST_LIMIT);

    let notifications = state
        .store()
        .recent_notifications(limit.min(limits::MAX_LIST_LIMIT))
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        notifications.into_iter().map(NotificationDto::from).collect(),
    )))
}
