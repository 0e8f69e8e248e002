use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, sea_query::Expr,
};

use crate::constants::limits;
use crate::domain::{HostConfirmation, VisitStatus};
use crate::entities::visits;

/// Fields required to register a new visit.
pub struct NewVisit {
    pub pass_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub purpose: String,
    pub visit_date: String,
    pub host_name: String,
    pub host_email: String,
}

/// Repository for the `visits` table.
///
/// Every lifecycle transition is a single guarded UPDATE that filters on
/// the expected current status. `rows_affected == 0` means the visit was
/// not in the expected state, which covers both stale reads and
/// concurrent racers: exactly one caller can win any transition.
pub struct VisitRepository {
    conn: DatabaseConnection,
}

impl VisitRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, new: NewVisit) -> Result<visits::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = visits::ActiveModel {
            pass_id: Set(new.pass_id),
            full_name: Set(new.full_name),
            email: Set(new.email),
            phone: Set(new.phone),
            company: Set(new.company),
            purpose: Set(new.purpose),
            visit_date: Set(new.visit_date),
            host_name: Set(new.host_name),
            host_email: Set(new.host_email),
            status: Set(VisitStatus::Pending.as_str().to_string()),
            host_confirmation: Set(HostConfirmation::Pending.as_str().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert visit")
    }

    pub async fn get(&self, id: i32) -> Result<Option<visits::Model>> {
        visits::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query visit by ID")
    }

    pub async fn get_by_pass_id(&self, pass_id: &str) -> Result<Option<visits::Model>> {
        visits::Entity::find()
            .filter(visits::Column::PassId.eq(pass_id))
            .one(&self.conn)
            .await
            .context("Failed to query visit by pass ID")
    }

    pub async fn list(
        &self,
        status: Option<VisitStatus>,
        limit: Option<u64>,
    ) -> Result<Vec<visits::Model>> {
        let mut query = visits::Entity::find();
        if let Some(status) = status {
            query = query.filter(visits::Column::Status.eq(status.as_str()));
        }
        let limit = limit
            .unwrap_or(limits::DEFAULT_LIST_LIMIT)
            .min(limits::MAX_LIST_LIMIT);
        query
            .order_by_desc(visits::Column::CreatedAt)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to list visits")
    }

    pub async fn list_for_host(
        &self,
        host_email: &str,
        status: Option<VisitStatus>,
    ) -> Result<Vec<visits::Model>> {
        let mut query = visits::Entity::find().filter(visits::Column::HostEmail.eq(host_email));
        if let Some(status) = status {
            query = query.filter(visits::Column::Status.eq(status.as_str()));
        }
        query
            .order_by_desc(visits::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list visits for host")
    }

    /// pending -> approved. Issues entry/exit codes as part of the same
    /// guarded UPDATE so a race never produces two different code pairs.
    pub async fn approve(&self, id: i32, entry_code: &str, exit_code: &str) -> Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = visits::Entity::update_many()
            .col_expr(
                visits::Column::Status,
                Expr::value(VisitStatus::Approved.as_str()),
            )
            .col_expr(
                visits::Column::HostConfirmation,
                Expr::value(HostConfirmation::Approved.as_str()),
            )
            .col_expr(visits::Column::HostConfirmationTime, Expr::value(now.clone()))
            .col_expr(visits::Column::EntryCode, Expr::value(entry_code))
            .col_expr(visits::Column::ExitCode, Expr::value(exit_code))
            .col_expr(visits::Column::UpdatedAt, Expr::value(now))
            .filter(visits::Column::Id.eq(id))
            .filter(visits::Column::Status.eq(VisitStatus::Pending.as_str()))
            .filter(visits::Column::HostConfirmation.eq(HostConfirmation::Pending.as_str()))
            .exec(&self.conn)
            .await
            .context("Failed to approve visit")?;

        Ok(result.rows_affected > 0)
    }

    /// pending or approved -> rejected. Not allowed once checked in.
    pub async fn reject(&self, id: i32, reason: &str) -> Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = visits::Entity::update_many()
            .col_expr(
                visits::Column::Status,
                Expr::value(VisitStatus::Rejected.as_str()),
            )
            .col_expr(
                visits::Column::HostConfirmation,
                Expr::value(HostConfirmation::Rejected.as_str()),
            )
            .col_expr(
                visits::Column::HostConfirmationReason,
                Expr::value(reason),
            )
            .col_expr(visits::Column::HostConfirmationTime, Expr::value(now.clone()))
            .col_expr(visits::Column::UpdatedAt, Expr::value(now))
            .filter(visits::Column::Id.eq(id))
            .filter(
                Condition::any()
                    .add(visits::Column::Status.eq(VisitStatus::Pending.as_str()))
                    .add(visits::Column::Status.eq(VisitStatus::Approved.as_str())),
            )
            .exec(&self.conn)
            .await
            .context("Failed to reject visit")?;

        Ok(result.rows_affected > 0)
    }

    /// approved -> checked-in.
    pub async fn check_in(&self, id: i32) -> Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = visits::Entity::update_many()
            .col_expr(
                visits::Column::Status,
                Expr::value(VisitStatus::CheckedIn.as_str()),
            )
            .col_expr(visits::Column::CheckInTime, Expr::value(now.clone()))
            .col_expr(visits::Column::UpdatedAt, Expr::value(now))
            .filter(visits::Column::Id.eq(id))
            .filter(visits::Column::Status.eq(VisitStatus::Approved.as_str()))
            .filter(visits::Column::HostConfirmation.eq(HostConfirmation::Approved.as_str()))
            .exec(&self.conn)
            .await
            .context("Failed to check in visit")?;

        Ok(result.rows_affected > 0)
    }

    /// checked-in -> checked-out.
    pub async fn check_out(&self, id: i32) -> Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = visits::Entity::update_many()
            .col_expr(
                visits::Column::Status,
                Expr::value(VisitStatus::CheckedOut.as_str()),
            )
            .col_expr(visits::Column::CheckOutTime, Expr::value(now.clone()))
            .col_expr(visits::Column::UpdatedAt, Expr::value(now))
            .filter(visits::Column::Id.eq(id))
            .filter(visits::Column::Status.eq(VisitStatus::CheckedIn.as_str()))
            .exec(&self.conn)
            .await
            .context("Failed to check out visit")?;

        Ok(result.rows_affected > 0)
    }
}
