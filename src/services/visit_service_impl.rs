//! `SeaORM` implementation of the `VisitService` trait.

use async_trait::async_trait;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::CodesConfig;
use crate::constants::{limits, pass};
use crate::db::{NewVisit, Store};
use crate::domain::{
    CodeSlot, NotificationEvent, VisitEvent, VisitStatus, generate_code, validate_code,
};
use crate::entities::visits;
use crate::services::visit_service::{RegisterVisit, VisitError, VisitService};

pub struct SeaOrmVisitService {
    store: Store,
    codes: CodesConfig,
    event_bus: broadcast::Sender<NotificationEvent>,
}

impl SeaOrmVisitService {
    #[must_use]
    pub const fn new(
        store: Store,
        codes: CodesConfig,
        event_bus: broadcast::Sender<NotificationEvent>,
    ) -> Self {
        Self {
            store,
            codes,
            event_bus,
        }
    }

    fn emit(&self, event: NotificationEvent) {
        let _ = self.event_bus.send(event);
    }

    fn new_pass_id() -> String {
        let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
        format!("{}-{}", pass::PREFIX, suffix)
    }

    async fn fetch(&self, id: i32) -> Result<visits::Model, VisitError> {
        self.store.get_visit(id).await?.ok_or(VisitError::NotFound)
    }

    fn check_ownership(
        visit: &visits::Model,
        acting_host_email: Option<&str>,
    ) -> Result<(), VisitError> {
        if let Some(email) = acting_host_email
            && !visit.host_email.eq_ignore_ascii_case(email)
        {
            return Err(VisitError::Forbidden);
        }
        Ok(())
    }

    fn transition_failed(visit: &visits::Model, event: VisitEvent) -> VisitError {
        let message = match VisitStatus::parse(&visit.status) {
            Some(status) if status.is_terminal() => format!("Visit is already {status}"),
            _ => format!("Cannot {event} a visit in status '{}'", visit.status),
        };
        VisitError::InvalidTransition(message)
    }

    fn ensure_permitted(visit: &visits::Model, event: VisitEvent) -> Result<(), VisitError> {
        match VisitStatus::parse(&visit.status) {
            Some(status) if status.permits(event) => Ok(()),
            _ => Err(Self::transition_failed(visit, event)),
        }
    }
}

#[async_trait]
impl VisitService for SeaOrmVisitService {
    async fn register(&self, input: RegisterVisit) -> Result<visits::Model, VisitError> {
        if input.full_name.trim().is_empty() {
            return Err(VisitError::Validation("Full name is required".to_string()));
        }
        if input.purpose.trim().is_empty() {
            return Err(VisitError::Validation("Purpose is required".to_string()));
        }
        if input.purpose.len() > limits::MAX_REASON_LENGTH {
            return Err(VisitError::Validation(format!(
                "Purpose must be at most {} characters",
                limits::MAX_REASON_LENGTH
            )));
        }
        if input.host_email.trim().is_empty() {
            return Err(VisitError::Validation("Host email is required".to_string()));
        }

        let visit = self
            .store
            .create_visit(NewVisit {
                pass_id: Self::new_pass_id(),
                full_name: input.full_name,
                email: input.email,
                phone: input.phone,
                company: input.company,
                purpose: input.purpose,
                visit_date: input.visit_date,
                host_name: input.host_name,
                host_email: input.host_email,
            })
            .await?;

        self.emit(NotificationEvent::VisitRegistered {
            visit_id: visit.id,
            pass_id: visit.pass_id.clone(),
            visitor_name: visit.full_name.clone(),
            host_email: visit.host_email.clone(),
        });

        Ok(visit)
    }

    async fn get(&self, id: i32) -> Result<visits::Model, VisitError> {
        self.fetch(id).await
    }

    async fn get_by_pass_id(&self, pass_id: &str) -> Result<visits::Model, VisitError> {
        self.store
            .get_visit_by_pass_id(pass_id)
            .await?
            .ok_or(VisitError::NotFound)
    }

    async fn list(
        &self,
        status: Option<VisitStatus>,
        limit: Option<u64>,
    ) -> Result<Vec<visits::Model>, VisitError> {
        Ok(self.store.list_visits(status, limit).await?)
    }

    async fn list_for_host(
        &self,
        host_email: &str,
        status: Option<VisitStatus>,
    ) -> Result<Vec<visits::Model>, VisitError> {
        Ok(self.store.list_visits_for_host(host_email, status).await?)
    }

    async fn approve(
        &self,
        id: i32,
        acting_host_email: Option<&str>,
    ) -> Result<visits::Model, VisitError> {
        let visit = self.fetch(id).await?;
        Self::check_ownership(&visit, acting_host_email)?;
        Self::ensure_permitted(&visit, VisitEvent::HostApprove)?;

        let entry_code = generate_code(self.codes.length);
        let exit_code = generate_code(self.codes.length);

        // Guarded UPDATE; a concurrent approval loses here and keeps the
        // winner's codes intact.
        let won = self.store.approve_visit(id, &entry_code, &exit_code).await?;
        if !won {
            let current = self.fetch(id).await?;
            return Err(Self::transition_failed(&current, VisitEvent::HostApprove));
        }

        let updated = self.fetch(id).await?;

        self.emit(NotificationEvent::VisitApproved {
            visit_id: updated.id,
            pass_id: updated.pass_id.clone(),
            visitor_name: updated.full_name.clone(),
            host_email: updated.host_email.clone(),
        });

        Ok(updated)
    }

    async fn reject(
        &self,
        id: i32,
        reason: &str,
        acting_host_email: Option<&str>,
    ) -> Result<visits::Model, VisitError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(VisitError::Validation(
                "A rejection reason is required".to_string(),
            ));
        }
        if reason.len() > limits::MAX_REASON_LENGTH {
            return Err(VisitError::Validation(format!(
                "Reason must be at most {} characters",
                limits::MAX_REASON_LENGTH
            )));
        }

        let visit = self.fetch(id).await?;
        Self::check_ownership(&visit, acting_host_email)?;
        Self::ensure_permitted(&visit, VisitEvent::HostReject)?;

        let won = self.store.reject_visit(id, reason).await?;
        if !won {
            let current = self.fetch(id).await?;
            return Err(Self::transition_failed(&current, VisitEvent::HostReject));
        }

        let updated = self.fetch(id).await?;

        self.emit(NotificationEvent::VisitRejected {
            visit_id: updated.id,
            pass_id: updated.pass_id.clone(),
            visitor_name: updated.full_name.clone(),
            host_email: updated.host_email.clone(),
            reason: reason.to_string(),
        });

        Ok(updated)
    }

    async fn check_in(&self, id: i32, entry_code: &str) -> Result<visits::Model, VisitError> {
        let visit = self.fetch(id).await?;

        // Exact match only, checked before the state change so a wrong
        // code never consumes the transition.
        if !validate_code(visit.entry_code.as_deref(), entry_code) {
            return Err(VisitError::InvalidTransition(format!(
                "Invalid {} code",
                CodeSlot::Entry
            )));
        }

        Self::ensure_permitted(&visit, VisitEvent::CheckIn)?;

        let won = self.store.check_in_visit(id).await?;
        if !won {
            let current = self.fetch(id).await?;
            return Err(Self::transition_failed(&current, VisitEvent::CheckIn));
        }

        let updated = self.fetch(id).await?;

        self.emit(NotificationEvent::VisitCheckedIn {
            visit_id: updated.id,
            pass_id: updated.pass_id.clone(),
            visitor_name: updated.full_name.clone(),
            host_email: updated.host_email.clone(),
            check_in_time: updated.check_in_time.clone().unwrap_or_default(),
        });

        Ok(updated)
    }

    async fn check_out(&self, id: i32, exit_code: &str) -> Result<visits::Model, VisitError> {
        let visit = self.fetch(id).await?;

        if !validate_code(visit.exit_code.as_deref(), exit_code) {
            return Err(VisitError::InvalidTransition(format!(
                "Invalid {} code",
                CodeSlot::Exit
            )));
        }

        Self::ensure_permitted(&visit, VisitEvent::CheckOut)?;

        let won = self.store.check_out_visit(id).await?;
        if !won {
            let current = self.fetch(id).await?;
            return Err(Self::transition_failed(&current, VisitEvent::CheckOut));
        }

        let updated = self.fetch(id).await?;

        self.emit(NotificationEvent::VisitCheckedOut {
            visit_id: updated.id,
            pass_id: updated.pass_id.clone(),
            visitor_name: updated.full_name.clone(),
            host_email: updated.host_email.clone(),
            check_out_time: updated.check_out_time.clone().unwrap_or_default(),
        });

        Ok(updated)
    }
}
