use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::state::SharedState;

mod admin;
pub mod auth;
mod error;
pub mod events;
mod host;
mod observability;
mod security;
mod types;
mod validation;
mod visitors;

pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn event_bus(&self) -> &tokio::sync::broadcast::Sender<crate::domain::NotificationEvent> {
        &self.shared.event_bus
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn crate::services::AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn visit_service(&self) -> &Arc<dyn crate::services::VisitService> {
        &self.shared.visit_service
    }
}

pub async fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    Ok(Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    }))
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    create_app_state(shared, prometheus_handle).await
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (cors_origins, secure_cookies, session_expiry_minutes) = {
        let config = state.config().read().await;
        (
            config.server.cors_allowed_origins.clone(),
            config.server.secure_cookies,
            config.server.session_expiry_minutes,
        )
    };

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            session_expiry_minutes,
        )));

    let api_router = Router::new()
        .merge(host_router(state.clone()))
        .merge(security_router(state.clone()))
        .merge(admin_router(state.clone()))
        .merge(authenticated_router(state.clone()))
        .route("/visitors/register", post(visitors::register))
        .route("/visitors/{pass_id}", get(visitors::get_by_pass_id))
        .route("/host/register", post(auth::register_host))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/health/live", get(observability::health_live))
        .route("/health/ready", get(observability::health_ready))
        .layer(session_layer)
        .with_state(state.clone());

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

/// Routes available to any logged-in principal.
fn authenticated_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(auth::get_current_principal))
        .route("/auth/password", put(auth::change_password))
        .route("/metrics", get(observability::get_metrics))
        .merge(events::router())
        .route_layer(middleware::from_fn_with_state(state, auth::require_auth))
}

fn host_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/host/visits", get(host::list_visits))
        .route("/host/visits/{id}/approve", post(host::approve_visit))
        .route("/host/visits/{id}/reject", post(host::reject_visit))
        .route_layer(middleware::from_fn_with_state(state, auth::require_host))
}

fn security_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/security/visits", get(security::list_visits))
        .route(
            "/security/visits/by-pass/{pass_id}",
            get(security::get_by_pass_id),
        )
        .route("/security/visits/{id}/check-in", post(security::check_in))
        .route("/security/visits/{id}/check-out", post(security::check_out))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::require_security,
        ))
}

fn admin_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users", post(admin::create_user))
        .route("/admin/users/{id}/active", put(admin::set_user_active))
        .route("/admin/hosts", get(admin::list_hosts))
        .route("/admin/hosts/{id}/active", put(admin::set_host_active))
        .route("/admin/hosts/{id}/approve", post(admin::approve_host))
        .route("/admin/hosts/{id}/reject", post(admin::reject_host))
        .route("/admin/visits", get(admin::list_visits))
        .route("/admin/visits/{id}/reject", post(admin::reject_visit))
        .route("/admin/notifications", get(admin::list_notifications))
        .route_layer(middleware::from_fn_with_state(state, auth::require_admin))
}
