//! Schema migrations for the `users`, `groups` and `posts` tables.

pub use sea_orm_migration::prelude::*;

mod m20251018_000001_create_users_table;
mod m20251018_000002_create_groups_table;
mod m20251018_000003_create_posts_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251018_000001_create_users_table::Migration),
            Box::new(m20251018_000002_create_groups_table::Migration),
            Box::new(m20251018_000003_create_posts_table::Migration),
        ]
    }
}
