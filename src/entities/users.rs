use sea_orm::entity::prelude::*;

/// Staff accounts: admin, superadmin and security share this table and its
/// id sequence. Hosts live in their own table; ids collide across the two.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    pub email: String,

    pub full_name: String,

    /// `admin` | `superadmin` | `security`
    pub role: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Inactive accounts are rejected at resolution time regardless of
    /// credential validity.
    pub is_active: bool,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
