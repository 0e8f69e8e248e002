use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Visits::Table)
                    .add_column(
                        ColumnDef::new(Visits::HostConfirmation)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Visits::Table)
                    .add_column(ColumnDef::new(Visits::HostConfirmationReason).string())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Visits::Table)
                    .add_column(ColumnDef::new(Visits::HostConfirmationTime).string())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for column in [
            Visits::HostConfirmationTime,
            Visits::HostConfirmationReason,
            Visits::HostConfirmation,
        ] {
            manager
                .alter_table(
                    Table::alter()
                        .table(Visits::Table)
                        .drop_column(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Visits {
    Table,
    HostConfirmation,
    HostConfirmationReason,
    HostConfirmationTime,
}
