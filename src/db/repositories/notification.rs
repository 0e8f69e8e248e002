use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, sea_query::Expr,
};

use crate::entities::notifications;

/// Outbox for notification events. Every event is recorded before any
/// delivery attempt so the log survives webhook failures.
pub struct NotificationRepository {
    conn: DatabaseConnection,
}

impl NotificationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, event_type: &str, payload: &str) -> Result<i32> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = notifications::ActiveModel {
            event_type: Set(event_type.to_string()),
            payload: Set(payload.to_string()),
            delivery_status: Set("pending".to_string()),
            created_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert notification")?;

        Ok(model.id)
    }

    pub async fn mark_delivered(&self, id: i32) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        notifications::Entity::update_many()
            .col_expr(notifications::Column::DeliveryStatus, Expr::value("delivered"))
            .col_expr(notifications::Column::DeliveredAt, Expr::value(now))
            .filter(notifications::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to mark notification delivered")?;

        Ok(())
    }

    pub async fn mark_failed(&self, id: i32, error: &str) -> Result<()> {
        notifications::Entity::update_many()
            .col_expr(notifications::Column::DeliveryStatus, Expr::value("failed"))
            .col_expr(notifications::Column::DeliveryError, Expr::value(error))
            .filter(notifications::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to mark notification failed")?;

        Ok(())
    }

    pub async fn mark_skipped(&self, id: i32) -> Result<()> {
        notifications::Entity::update_many()
            .col_expr(notifications::Column::DeliveryStatus, Expr::value("skipped"))
            .filter(notifications::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to mark notification skipped")?;

        Ok(())
    }

    pub async fn list_recent(&self, limit: u64) -> Result<Vec<notifications::Model>> {
        notifications::Entity::find()
            .order_by_desc(notifications::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to list notifications")
    }
}
