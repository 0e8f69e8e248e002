use sea_orm::entity::prelude::*;

/// One visitor registration and its lifecycle state.
///
/// Timestamps are RFC 3339 UTC strings. `check_in_time` is non-null iff
/// status is `checked-in` or `checked-out`; `check_out_time` is non-null iff
/// status is `checked-out`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "visits")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Human-facing pass identifier, assigned at creation, immutable.
    #[sea_orm(unique)]
    pub pass_id: String,

    pub full_name: String,

    pub email: String,

    pub phone: Option<String>,

    pub company: Option<String>,

    pub purpose: String,

    /// Planned visit date (`YYYY-MM-DD`); informational.
    pub visit_date: String,

    pub host_name: String,

    /// Routing key for the host portal: a host sees visits addressed to
    /// their account email.
    pub host_email: String,

    /// `pending` | `approved` | `checked-in` | `checked-out` | `rejected`
    pub status: String,

    /// Host's decision, tracked independently of `status`:
    /// `pending` | `approved` | `rejected`.
    pub host_confirmation: String,

    /// Required free text when the host rejects.
    pub host_confirmation_reason: Option<String>,

    pub host_confirmation_time: Option<String>,

    /// Issued on host approval; absent until then.
    pub entry_code: Option<String>,

    pub exit_code: Option<String>,

    pub check_in_time: Option<String>,

    pub check_out_time: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
