//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::warn;

use crate::config::SecurityConfig;
use crate::constants::limits;
use crate::db::Store;
use crate::domain::{NotificationEvent, Principal, PrincipalKind};
use crate::services::auth_service::{
    AuthError, AuthService, PrincipalInfo, ResolvedPrincipal,
};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
    event_bus: broadcast::Sender<NotificationEvent>,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(
        store: Store,
        security: SecurityConfig,
        event_bus: broadcast::Sender<NotificationEvent>,
    ) -> Self {
        Self {
            store,
            security,
            event_bus,
        }
    }

    fn emit(&self, event: NotificationEvent) {
        // No receivers is fine; the bus is best-effort.
        let _ = self.event_bus.send(event);
    }

    async fn login_staff(&self, username: &str, password: &str) -> Result<Principal, AuthError> {
        let is_valid = self.store.verify_user_password(username, password).await?;
        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let principal = Principal::Staff(user);
        if !principal.is_active() {
            return Err(AuthError::Inactive);
        }
        Ok(principal)
    }

    async fn login_host(&self, username: &str, password: &str) -> Result<Principal, AuthError> {
        let is_valid = self.store.verify_host_password(username, password).await?;
        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let host = self
            .store
            .get_host_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let principal = Principal::Host(host);
        if !principal.is_active() {
            return Err(AuthError::Inactive);
        }
        Ok(principal)
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(
        &self,
        kind: Option<PrincipalKind>,
        username: &str,
        password: &str,
    ) -> Result<Principal, AuthError> {
        match kind {
            Some(PrincipalKind::Host) => self.login_host(username, password).await,
            Some(_) => self.login_staff(username, password).await,
            None => {
                // Staff wins when usernames collide across tables.
                match self.login_staff(username, password).await {
                    Err(AuthError::InvalidCredentials) => {
                        self.login_host(username, password).await
                    }
                    other => other,
                }
            }
        }
    }

    async fn resolve_principal(
        &self,
        principal_id: i32,
        kind: Option<&str>,
    ) -> Result<ResolvedPrincipal, AuthError> {
        let (principal, healed_kind) = match kind {
            Some(kind_str) => {
                let kind = PrincipalKind::parse(kind_str).ok_or(AuthError::NotFound)?;
                let principal = match kind {
                    PrincipalKind::Host => self
                        .store
                        .get_host(principal_id)
                        .await?
                        .map(Principal::Host),
                    PrincipalKind::Admin | PrincipalKind::Security => self
                        .store
                        .get_user(principal_id)
                        .await?
                        .map(Principal::Staff),
                };
                (principal.ok_or(AuthError::NotFound)?, None)
            }
            None => {
                // Legacy session without a kind discriminator. Staff and
                // host IDs come from separate sequences, so the same ID
                // can exist in both tables. Staff wins the tie, matching
                // the login order, and the resolved kind is written back.
                if let Some(user) = self.store.get_user(principal_id).await? {
                    let principal = Principal::Staff(user);
                    let kind = principal.kind();
                    (principal, Some(kind))
                } else if let Some(host) = self.store.get_host(principal_id).await? {
                    warn!(principal_id, "Healed legacy session to host principal");
                    (Principal::Host(host), Some(PrincipalKind::Host))
                } else {
                    return Err(AuthError::NotFound);
                }
            }
        };

        if !principal.is_active() {
            return Err(AuthError::Inactive);
        }

        Ok(ResolvedPrincipal {
            principal,
            healed_kind,
        })
    }

    async fn register_host(
        &self,
        username: &str,
        email: &str,
        full_name: &str,
        department: Option<&str>,
        phone: Option<&str>,
        password: &str,
    ) -> Result<PrincipalInfo, AuthError> {
        if password.len() < limits::MIN_PASSWORD_LENGTH {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters",
                limits::MIN_PASSWORD_LENGTH
            )));
        }

        if self.store.get_host_by_username(username).await?.is_some() {
            return Err(AuthError::Validation("Username already taken".to_string()));
        }

        if self.store.get_host_by_email(email).await?.is_some() {
            return Err(AuthError::Validation("Email already registered".to_string()));
        }

        let host = self
            .store
            .create_host(
                username,
                email,
                full_name,
                department,
                phone,
                password,
                Some(&self.security),
            )
            .await?;

        self.emit(NotificationEvent::HostRegistered {
            host_id: host.id,
            username: host.username.clone(),
        });

        Ok(PrincipalInfo::from(&Principal::Host(host)))
    }

    async fn change_password(
        &self,
        principal: &Principal,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if new_password.len() < limits::MIN_PASSWORD_LENGTH {
            return Err(AuthError::Validation(format!(
                "New password must be at least {} characters",
                limits::MIN_PASSWORD_LENGTH
            )));
        }

        if current_password == new_password {
            return Err(AuthError::Validation(
                "New password must be different from current password".to_string(),
            ));
        }

        let username = principal.username();

        let is_valid = match principal {
            Principal::Staff(_) => {
                self.store
                    .verify_user_password(username, current_password)
                    .await?
            }
            Principal::Host(_) => {
                self.store
                    .verify_host_password(username, current_password)
                    .await?
            }
        };

        if !is_valid {
            return Err(AuthError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }

        match principal {
            Principal::Staff(_) => {
                self.store
                    .update_user_password(username, new_password, Some(&self.security))
                    .await?;
            }
            Principal::Host(_) => {
                self.store
                    .update_host_password(username, new_password, Some(&self.security))
                    .await?;
            }
        }

        Ok(())
    }
}
