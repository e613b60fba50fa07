pub use sea_orm_migration::prelude::*;

mod m20240301_000001_refuels;
mod m20240301_000002_fleet;
mod m20240301_000003_plots;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_refuels::Migration),
            Box::new(m20240301_000002_fleet::Migration),
            Box::new(m20240301_000003_plots::Migration),
        ]
    }
}
