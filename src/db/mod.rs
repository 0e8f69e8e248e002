use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::domain::{HostConfirmation, VisitStatus};
use crate::entities::{hosts, notifications, users, visits};

pub mod migrator;
pub mod repositories;

pub use repositories::visit::NewVisit;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let path_str = db_url.trim_start_matches("sqlite:");
        if !path_str.starts_with(":memory:") {
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn host_repo(&self) -> repositories::host::HostRepository {
        repositories::host::HostRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn visit_repo(&self) -> repositories::visit::VisitRepository {
        repositories::visit::VisitRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn notification_repo(&self) -> repositories::notification::NotificationRepository {
        repositories::notification::NotificationRepository::new(self.conn.clone())
    }

    // ========== User Repository Methods ==========

    pub async fn get_user(&self, id: i32) -> Result<Option<users::Model>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<users::Model>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn list_users(&self) -> Result<Vec<users::Model>> {
        self.user_repo().list().await
    }

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        full_name: &str,
        role: &str,
        password: &str,
        config: Option<&SecurityConfig>,
    ) -> Result<users::Model> {
        self.user_repo()
            .create(username, email, full_name, role, password, config)
            .await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn update_user_password(
        &self,
        username: &str,
        new_password: &str,
        config: Option<&SecurityConfig>,
    ) -> Result<()> {
        self.user_repo()
            .update_password(username, new_password, config)
            .await
    }

    pub async fn set_user_active(&self, id: i32, is_active: bool) -> Result<Option<users::Model>> {
        self.user_repo().set_active(id, is_active).await
    }

    // ========== Host Repository Methods ==========

    pub async fn get_host(&self, id: i32) -> Result<Option<hosts::Model>> {
        self.host_repo().get_by_id(id).await
    }

    pub async fn get_host_by_username(&self, username: &str) -> Result<Option<hosts::Model>> {
        self.host_repo().get_by_username(username).await
    }

    pub async fn get_host_by_email(&self, email: &str) -> Result<Option<hosts::Model>> {
        self.host_repo().get_by_email(email).await
    }

    pub async fn list_hosts(
        &self,
        approval_status: Option<HostConfirmation>,
    ) -> Result<Vec<hosts::Model>> {
        self.host_repo().list(approval_status).await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_host(
        &self,
        username: &str,
        email: &str,
        full_name: &str,
        department: Option<&str>,
        phone: Option<&str>,
        password: &str,
        config: Option<&SecurityConfig>,
    ) -> Result<hosts::Model> {
        self.host_repo()
            .create(username, email, full_name, department, phone, password, config)
            .await
    }

    pub async fn verify_host_password(&self, username: &str, password: &str) -> Result<bool> {
        self.host_repo().verify_password(username, password).await
    }

    pub async fn update_host_password(
        &self,
        username: &str,
        new_password: &str,
        config: Option<&SecurityConfig>,
    ) -> Result<()> {
        self.host_repo()
            .update_password(username, new_password, config)
            .await
    }

    pub async fn set_host_approval(&self, id: i32, approved: bool) -> Result<Option<hosts::Model>> {
        self.host_repo().set_approval(id, approved).await
    }

    pub async fn set_host_active(&self, id: i32, is_active: bool) -> Result<Option<hosts::Model>> {
        self.host_repo().set_active(id, is_active).await
    }

    // ========== Visit Repository Methods ==========

    pub async fn create_visit(&self, new: NewVisit) -> Result<visits::Model> {
        self.visit_repo().create(new).await
    }

    pub async fn get_visit(&self, id: i32) -> Result<Option<visits::Model>> {
        self.visit_repo().get(id).await
    }

    pub async fn get_visit_by_pass_id(&self, pass_id: &str) -> Result<Option<visits::Model>> {
        self.visit_repo().get_by_pass_id(pass_id).await
    }

    pub async fn list_visits(
        &self,
        status: Option<VisitStatus>,
        limit: Option<u64>,
    ) -> Result<Vec<visits::Model>> {
        self.visit_repo().list(status, limit).await
    }

    pub async fn list_visits_for_host(
        &self,
        host_email: &str,
        status: Option<VisitStatus>,
    ) -> Result<Vec<visits::Model>> {
        self.visit_repo().list_for_host(host_email, status).await
    }

    pub async fn approve_visit(
        &self,
        id: i32,
        entry_code: &str,
        exit_code: &str,
    ) -> Result<bool> {
        self.visit_repo().approve(id, entry_code, exit_code).await
    }

    pub async fn reject_visit(&self, id: i32, reason: &str) -> Result<bool> {
        self.visit_repo().reject(id, reason).await
    }

    pub async fn check_in_visit(&self, id: i32) -> Result<bool> {
        self.visit_repo().check_in(id).await
    }

    pub async fn check_out_visit(&self, id: i32) -> Result<bool> {
        self.visit_repo().check_out(id).await
    }

    // ========== Notification Repository Methods ==========

    pub async fn record_notification(&self, event_type: &str, payload: &str) -> Result<i32> {
        self.notification_repo().insert(event_type, payload).await
    }

    pub async fn mark_notification_delivered(&self, id: i32) -> Result<()> {
        self.notification_repo().mark_delivered(id).await
    }

    pub async fn mark_notification_failed(&self, id: i32, error: &str) -> Result<()> {
        self.notification_repo().mark_failed(id, error).await
    }

    pub async fn mark_notification_skipped(&self, id: i32) -> Result<()> {
        self.notification_repo().mark_skipped(id).await
    }

    pub async fn recent_notifications(&self, limit: u64) -> Result<Vec<notifications::Model>> {
        self.notification_repo().list_recent(limit).await
    }
}
