pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_profiles_table;
mod m20250301_000002_create_messages_table;
mod m20250301_000003_create_reviews_table;
mod m20250301_000004_create_service_requests_table;
mod m20250301_000005_create_images_table;
mod m20250308_000001_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_profiles_table::Migration),
            Box::new(m20250301_000002_create_messages_table::Migration),
            Box::new(m20250301_000003_create_reviews_table::Migration),
            Box::new(m20250301_000004_create_service_requests_table::Migration),
            Box::new(m20250301_000005_create_images_table::Migration),
            Box::new(m20250308_000001_add_indexes::Migration),
        ]
    }
}
