use sea_orm_migration::prelude::*;

mod m20240101_initial;
mod m20240415_add_entry_exit_codes;
mod m20240502_add_host_confirmation;
mod m20240610_add_notifications;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_initial::Migration),
            Box::new(m20240415_add_entry_exit_codes::Migration),
            Box::new(m20240502_add_host_confirmation::Migration),
            Box::new(m20240610_add_notifications::Migration),
        ]
    }
}
