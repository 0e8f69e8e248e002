use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tokio::task;

use crate::config::SecurityConfig;
use crate::domain::HostConfirmation;
use crate::entities::hosts;

use super::user::{hash_password, verify_hash};

/// Repository for the `hosts` table. Hosts self-register and stay
/// `pending` until an admin approves them.
pub struct HostRepository {
    conn: DatabaseConnection,
}

impl HostRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<hosts::Model>> {
        hosts::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query host by ID")
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<hosts::Model>> {
        hosts::Entity::find()
            .filter(hosts::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query host by username")
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<hosts::Model>> {
        hosts::Entity::find()
            .filter(hosts::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query host by email")
    }

    pub async fn list(
        &self,
        approval_status: Option<HostConfirmation>,
    ) -> Result<Vec<hosts::Model>> {
        let mut query = hosts::Entity::find();
        if let Some(status) = approval_status {
            query = query.filter(hosts::Column::ApprovalStatus.eq(status.as_str()));
        }
        query.all(&self.conn).await.context("Failed to list hosts")
    }

    pub async fn create(
        &self,
        username: &str,
        email: &str,
        full_name: &str,
        department: Option<&str>,
        phone: Option<&str>,
        password: &str,
        config: Option<&SecurityConfig>,
    ) -> Result<hosts::Model> {
        let password = password.to_string();
        let config = config.cloned();
        let password_hash =
            task::spawn_blocking(move || hash_password(&password, config.as_ref()))
                .await
                .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();

        let active = hosts::ActiveModel {
            username: Set(username.to_string()),
            email: Set(email.to_string()),
            full_name: Set(full_name.to_string()),
            department: Set(department.map(ToString::to_string)),
            phone: Set(phone.map(ToString::to_string)),
            password_hash: Set(password_hash),
            approval_status: Set(HostConfirmation::Pending.as_str().to_string()),
            is_approved: Set(false),
            is_active: Set(true),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert host")
    }

    pub async fn verify_password(&self, username: &str, password: &str) -> Result<bool> {
        let host = self
            .get_by_username(username)
            .await
            .context("Failed to query host for password verification")?;

        let Some(host) = host else {
            return Ok(false);
        };

        verify_hash(&host.password_hash, password).await
    }

    pub async fn update_password(
        &self,
        username: &str,
        new_password: &str,
        config: Option<&SecurityConfig>,
    ) -> Result<()> {
        let host = self
            .get_by_username(username)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Host not found: {username}"))?;

        let password = new_password.to_string();
        let config = config.cloned();
        let new_hash = task::spawn_blocking(move || hash_password(&password, config.as_ref()))
            .await
            .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: hosts::ActiveModel = host.into();
        active.password_hash = Set(new_hash);
        active.updated_at = Set(now);
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Move a host to `approved` or `rejected`. Approval also flips
    /// `is_approved` so the login path can gate on a single flag.
    pub async fn set_approval(&self, id: i32, approved: bool) -> Result<Option<hosts::Model>> {
        let Some(host) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: hosts::ActiveModel = host.into();
        active.approval_status = Set(if approved {
            HostConfirmation::Approved
        } else {
            HostConfirmation::Rejected
        }
        .as_str()
        .to_string());
        active.is_approved = Set(approved);
        active.updated_at = Set(now);
        let updated = active.update(&self.conn).await?;

        Ok(Some(updated))
    }

    pub async fn set_active(&self, id: i32, is_active: bool) -> Result<Option<hosts::Model>> {
        let Some(host) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: hosts::ActiveModel = host.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(now);
        let updated = active.update(&self.conn).await?;

        Ok(Some(updated))
    }
}
