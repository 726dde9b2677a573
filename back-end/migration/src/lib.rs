pub use sea_orm_migration::prelude::*;

mod m20250601_090000_create_users;
mod m20250601_090100_create_notes;
mod m20250601_090200_create_interactions;
mod m20250601_090300_create_subscriptions;
mod m20250601_090400_create_circulars_and_settings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_090000_create_users::Migration),
            Box::new(m20250601_090100_create_notes::Migration),
            Box::new(m20250601_090200_create_interactions::Migration),
            Box::new(m20250601_090300_create_subscriptions::Migration),
            Box::new(m20250601_090400_create_circulars_and_settings::Migration),
        ]
    }
}
