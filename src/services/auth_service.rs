//! Domain service for authentication and principal management.
//!
//! Staff accounts (admin, superadmin, security) and host accounts live in
//! separate tables with independent ID sequences, so a session must carry
//! both the principal ID and which table it belongs to.

use serde::Serialize;
use thiserror::Error;

use crate::domain::{Principal, PrincipalKind};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is inactive")]
    Inactive,

    #[error("Principal not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Principal info DTO for responses.
#[derive(Debug, Clone, Serialize)]
pub struct PrincipalInfo {
    pub id: i32,
    pub kind: String,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role: Option<String>,
}

impl From<&Principal> for PrincipalInfo {
    fn from(principal: &Principal) -> Self {
        match principal {
            Principal::Staff(user) => Self {
                id: user.id,
                kind: principal.kind().as_str().to_string(),
                username: user.username.clone(),
                full_name: user.full_name.clone(),
                email: user.email.clone(),
                role: Some(user.role.clone()),
            },
            Principal::Host(host) => Self {
                id: host.id,
                kind: PrincipalKind::Host.as_str().to_string(),
                username: host.username.clone(),
                full_name: host.full_name.clone(),
                email: host.email.clone(),
                role: None,
            },
        }
    }
}

/// The outcome of resolving a session back to a principal. `healed_kind`
/// is set when the session predates the kind discriminator and the lookup
/// had to probe both tables; the caller writes it back to the session.
#[derive(Debug)]
pub struct ResolvedPrincipal {
    pub principal: Principal,
    pub healed_kind: Option<PrincipalKind>,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials against the table named by `kind`, or probes
    /// both tables when `kind` is absent (staff first).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] on a bad username or
    /// password and [`AuthError::Inactive`] for a disabled or unapproved
    /// account.
    async fn login(
        &self,
        kind: Option<PrincipalKind>,
        username: &str,
        password: &str,
    ) -> Result<Principal, AuthError>;

    /// Resolves a stored session back to a live principal.
    ///
    /// When `kind` is present it is authoritative and only that table is
    /// consulted. When absent (a pre-discriminator session), the staff
    /// table is probed before the hosts table and the winning kind is
    /// reported back for self-healing. An inactive principal fails
    /// resolution regardless of how it was found.
    async fn resolve_principal(
        &self,
        principal_id: i32,
        kind: Option<&str>,
    ) -> Result<ResolvedPrincipal, AuthError>;

    /// Registers a new host account, pending admin approval.
    async fn register_host(
        &self,
        username: &str,
        email: &str,
        full_name: &str,
        department: Option<&str>,
        phone: Option<&str>,
        password: &str,
    ) -> Result<PrincipalInfo, AuthError>;

    /// Changes a principal's password after verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] if the current password is
    /// incorrect or the new password is invalid.
    async fn change_password(
        &self,
        principal: &Principal,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;
}
