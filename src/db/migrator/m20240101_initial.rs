use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Hash a bootstrap password using Argon2id.
fn hash_bootstrap_password(password: &str) -> String {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .expect("Failed to hash bootstrap password")
        .to_string()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        // users and hosts match their entities from day one
        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Hosts)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // visits table as first shipped: codes and host-confirmation columns
        // arrive in later migrations
        manager
            .create_table(
                Table::create()
                    .table(VisitsDef::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VisitsDef::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VisitsDef::PassId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(VisitsDef::FullName).string().not_null())
                    .col(ColumnDef::new(VisitsDef::Email).string().not_null())
                    .col(ColumnDef::new(VisitsDef::Phone).string())
                    .col(ColumnDef::new(VisitsDef::Company).string())
                    .col(ColumnDef::new(VisitsDef::Purpose).string().not_null())
                    .col(ColumnDef::new(VisitsDef::VisitDate).string().not_null())
                    .col(ColumnDef::new(VisitsDef::HostName).string().not_null())
                    .col(ColumnDef::new(VisitsDef::HostEmail).string().not_null())
                    .col(
                        ColumnDef::new(VisitsDef::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(VisitsDef::CheckInTime).string())
                    .col(ColumnDef::new(VisitsDef::CheckOutTime).string())
                    .col(ColumnDef::new(VisitsDef::CreatedAt).string().not_null())
                    .col(ColumnDef::new(VisitsDef::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_visits_status")
                    .table(VisitsDef::Table)
                    .col(VisitsDef::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_visits_host_email")
                    .table(VisitsDef::Table)
                    .col(VisitsDef::HostEmail)
                    .to_owned(),
            )
            .await?;

        // Seed default staff accounts
        let now = chrono::Utc::now().to_rfc3339();

        for (username, email, full_name, role, password) in [
            (
                "admin",
                "admin@example.com",
                "System Administrator",
                "admin",
                "admin123",
            ),
            (
                "security",
                "security@example.com",
                "Security Officer",
                "security",
                "security123",
            ),
        ] {
            let insert = sea_orm_migration::sea_query::Query::insert()
                .into_table(Users)
                .columns([
                    crate::entities::users::Column::Username,
                    crate::entities::users::Column::Email,
                    crate::entities::users::Column::FullName,
                    crate::entities::users::Column::Role,
                    crate::entities::users::Column::PasswordHash,
                    crate::entities::users::Column::IsActive,
                    crate::entities::users::Column::CreatedAt,
                    crate::entities::users::Column::UpdatedAt,
                ])
                .values_panic([
                    username.into(),
                    email.into(),
                    full_name.into(),
                    role.into(),
                    hash_bootstrap_password(password).into(),
                    true.into(),
                    now.clone().into(),
                    now.clone().into(),
                ])
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VisitsDef::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Hosts).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum VisitsDef {
    #[sea_orm(iden = "visits")]
    Table,
    Id,
    PassId,
    FullName,
    Email,
    Phone,
    Company,
    Purpose,
    VisitDate,
    HostName,
    HostEmail,
    Status,
    CheckInTime,
    CheckOutTime,
    CreatedAt,
    UpdatedAt,
}
