use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use crate::domain::{Principal, PrincipalKind};
use crate::services::PrincipalInfo;

use super::{ApiError, ApiResponse, AppState, MessageResponse, validation};

const SESSION_PRINCIPAL_ID: &str = "principal_id";
const SESSION_PRINCIPAL_KIND: &str = "principal_kind";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    /// Which portal this login is for ("admin", "security", "host").
    /// Optional; when absent staff is tried before host.
    pub kind: Option<String>,
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RegisterHostRequest {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Resolved principal made available to downstream handlers.
#[derive(Clone)]
pub struct CurrentPrincipal(pub Principal);

// ============================================================================
// Middleware
// ============================================================================

/// Resolve the session to a live principal and store it as a request
/// extension. The id alone is ambiguous across the two account tables,
/// so the stored kind decides which table to consult; sessions that
/// predate the kind field are healed by writing the resolved kind back.
async fn resolve_session(
    state: &AppState,
    session: &Session,
) -> Result<Principal, ApiError> {
    let principal_id: i32 = session
        .get(SESSION_PRINCIPAL_ID)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    let kind: Option<String> = session
        .get(SESSION_PRINCIPAL_KIND)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

    let resolved = state
        .auth_service()
        .resolve_principal(principal_id, kind.as_deref())
        .await?;

    if let Some(healed) = resolved.healed_kind {
        session
            .insert(SESSION_PRINCIPAL_KIND, healed.as_str())
            .await
            .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;
    }

    Ok(resolved.principal)
}

async fn guard(
    state: Arc<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
    allowed: &[PrincipalKind],
) -> Result<impl IntoResponse, ApiError> {
    let principal = resolve_session(&state, &session).await?;

    if !allowed.is_empty() && !allowed.contains(&principal.kind()) {
        return Err(ApiError::Forbidden(format!(
            "This endpoint requires one of: {}",
            allowed
                .iter()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }

    tracing::Span::current().record("user_id", principal.username());
    request.extensions_mut().insert(CurrentPrincipal(principal));
    Ok(next.run(request).await)
}

pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    session: Session,
    request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    guard(state, session, request, next, &[]).await
}

pub async fn require_host(
    State(state): State<Arc<AppState>>,
    session: Session,
    request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    guard(state, session, request, next, &[PrincipalKind::Host]).await
}

pub async fn require_security(
    State(state): State<Arc<AppState>>,
    session: Session,
    request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    // Admins can operate the security desk too.
    guard(
        state,
        session,
        request,
        next,
        &[PrincipalKind::Security, PrincipalKind::Admin],
    )
    .await
}

pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    session: Session,
    request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    guard(state, session, request, next, &[PrincipalKind::Admin]).await
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
/// Authenticate against the staff or hosts table and start a session.
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<PrincipalInfo>>, ApiError> {
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let kind = match payload.kind.as_deref() {
        None | Some("") => None,
        Some(s) => Some(
            PrincipalKind::parse(s)
                .ok_or_else(|| ApiError::validation(format!("Unknown login kind: {s}")))?,
        ),
    };

    let principal = state
        .auth_service()
        .login(kind, &payload.username, &payload.password)
        .await?;

    // Rotate the session id on privilege change.
    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to rotate session: {e}")))?;
    session
        .insert(SESSION_PRINCIPAL_ID, principal.id())
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;
    session
        .insert(SESSION_PRINCIPAL_KIND, principal.kind().as_str())
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!(
        username = principal.username(),
        kind = %principal.kind(),
        "Login successful"
    );

    Ok(Json(ApiResponse::success(PrincipalInfo::from(&principal))))
}

/// POST /auth/logout
/// Invalidate the current session.
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    (StatusCode::OK, "Logged out")
}

/// GET /auth/me
/// Current principal information.
pub async fn get_current_principal(
    axum::Extension(CurrentPrincipal(principal)): axum::Extension<CurrentPrincipal>,
) -> Json<ApiResponse<PrincipalInfo>> {
    Json(ApiResponse::success(PrincipalInfo::from(&principal)))
}

/// PUT /auth/password
/// Change password (requires current password verification).
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    axum::Extension(CurrentPrincipal(principal)): axum::Extension<CurrentPrincipal>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .auth_service()
        .change_password(&principal, &payload.current_password, &payload.new_password)
        .await?;

    tracing::info!(username = principal.username(), "Password changed");

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Password updated successfully".to_string(),
    })))
}

/// POST /host/register
/// Self-service host registration; the account stays pending until an
/// admin approves it.
pub async fn register_host(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterHostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PrincipalInfo>>), ApiError> {
    validation::validate_username(&payload.username)?;
    validation::validate_email(&payload.email)?;
    if payload.full_name.trim().is_empty() {
        return Err(ApiError::validation("Full name is required"));
    }

    let info = state
        .auth_service()
        .register_host(
            &payload.username,
            &payload.email,
            &payload.full_name,
            payload.department.as_deref(),
            payload.phone.as_deref(),
            &payload.password,
        )
        .await?;

    tracing::info!(username = %info.username, "Host registration submitted");

    Ok((StatusCode::CREATED, Json(ApiResponse::success(info))))
}
