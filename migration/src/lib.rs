pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20250301_000001_codes_and_profiles;
mod m20250301_000002_accounts_and_feedback;
mod m20250315_000001_engagement;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_codes_and_profiles::Migration),
            Box::new(m20250301_000002_accounts_and_feedback::Migration),
            Box::new(m20250315_000001_engagement::Migration),
        ]
    }
}
