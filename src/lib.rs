pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod infrastructure;
pub mod schema;

use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub use application::order_line_service::OrderLineService;
pub use db::{create_pool, DbPool};
pub use domain::errors::{DomainError, Entity};
pub use infrastructure::memory_store::InMemoryUnitOfWork;
pub use infrastructure::pg_store::PgUnitOfWork;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), DomainError> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DomainError::Internal(format!("Failed to run database migrations: {e}")))?;
    for version in &applied {
        log::info!("Applied migration {}", version);
    }
    Ok(())
}
