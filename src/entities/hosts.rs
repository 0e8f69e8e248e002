use sea_orm::entity::prelude::*;

/// Host accounts. Separate auto-increment sequence from `users`, so a host
/// id may equal a staff id; the session kind tag disambiguates.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "hosts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    #[sea_orm(unique)]
    pub email: String,

    pub full_name: String,

    pub department: Option<String>,

    pub phone: Option<String>,

    /// Argon2id password hash
    pub password_hash: String,

    /// `pending` | `approved` | `rejected`; set by an admin.
    pub approval_status: String,

    /// Both flags must hold for login to succeed.
    pub is_approved: bool,

    pub is_active: bool,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
