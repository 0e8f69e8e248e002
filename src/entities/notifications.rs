use sea_orm::entity::prelude::*;

/// Outbox row for every domain event handed to the notification
/// collaborator. Delivery failures are recorded here, never propagated.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Event type tag, e.g. `VisitApproved`.
    pub event_type: String,

    /// Full event JSON as broadcast on the bus.
    pub payload: String,

    /// `pending` | `delivered` | `failed` | `skipped`
    pub delivery_status: String,

    pub delivery_error: Option<String>,

    pub created_at: String,

    pub delivered_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
