//! Domain service for the visit lifecycle.
//!
//! pending -> approved -> checked-in -> checked-out, with rejection
//! possible until check-in. Approval issues single-use entry and exit
//! codes that gate the physical check-in and check-out.

use thiserror::Error;

use crate::domain::VisitStatus;
use crate::entities::visits;

/// Errors specific to visit operations.
#[derive(Debug, Error)]
pub enum VisitError {
    #[error("Visit not found")]
    NotFound,

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Not allowed")]
    Forbidden,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for VisitError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for VisitError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Fields a visitor submits when registering.
#[derive(Debug, Clone)]
pub struct RegisterVisit {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub purpose: String,
    pub visit_date: String,
    pub host_name: String,
    pub host_email: String,
}

/// Domain service trait for visits.
#[async_trait::async_trait]
pub trait VisitService: Send + Sync {
    /// Registers a new visit in `pending` status and assigns a pass ID.
    async fn register(&self, input: RegisterVisit) -> Result<visits::Model, VisitError>;

    async fn get(&self, id: i32) -> Result<visits::Model, VisitError>;

    async fn get_by_pass_id(&self, pass_id: &str) -> Result<visits::Model, VisitError>;

    async fn list(
        &self,
        status: Option<VisitStatus>,
        limit: Option<u64>,
    ) -> Result<Vec<visits::Model>, VisitError>;

    async fn list_for_host(
        &self,
        host_email: &str,
        status: Option<VisitStatus>,
    ) -> Result<Vec<visits::Model>, VisitError>;

    /// Approves a pending visit and issues entry/exit codes.
    ///
    /// When `acting_host_email` is set, the visit must belong to that
    /// host. At most one concurrent approval can win.
    ///
    /// # Errors
    ///
    /// Returns [`VisitError::InvalidTransition`] if the visit is not
    /// pending, [`VisitError::Forbidden`] for the wrong host.
    async fn approve(
        &self,
        id: i32,
        acting_host_email: Option<&str>,
    ) -> Result<visits::Model, VisitError>;

    /// Rejects a visit that has not been checked in yet. A non-empty
    /// reason is required; without one the visit is left untouched and
    /// [`VisitError::Validation`] is returned.
    async fn reject(
        &self,
        id: i32,
        reason: &str,
        acting_host_email: Option<&str>,
    ) -> Result<visits::Model, VisitError>;

    /// Checks a visitor in. Requires the exact entry code issued at
    /// approval; a wrong code never mutates state.
    async fn check_in(&self, id: i32, entry_code: &str) -> Result<visits::Model, VisitError>;

    /// Checks a visitor out. Requires the exact exit code.
    async fn check_out(&self, id: i32, exit_code: &str) -> Result<visits::Model, VisitError>;
}
