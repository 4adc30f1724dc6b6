//! Storage layer - database entities and repositories

pub mod entity;
pub mod mapper;
pub mod migrations;
pub mod repositories;

pub use migrations::{CentralMigrator, TenantMigrator};
pub use repositories::{tenant_store, SeaOrmTenantRepository, SeaOrmTenantStoreFactory};

use anyhow::{Context, Result};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::path::Path;
use tracing::debug;

/// Connect to a database, creating the parent directory of a SQLite file first
pub async fn connect(url: &str) -> Result<DatabaseConnection> {
    if let Some(path) = sqlite_file_path(url) {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }

    let db = Database::connect(url)
        .await
        .with_context(|| format!("failed to connect to {}", url))?;
    debug!(backend = ?db.get_database_backend(), "Database connected");
    Ok(db)
}

/// Apply pending central database migrations
pub async fn migrate_central(db: &DatabaseConnection) -> Result<()> {
    CentralMigrator::up(db, None).await?;
    Ok(())
}

/// Apply pending tenant database migrations
pub async fn migrate_tenant(db: &DatabaseConnection) -> Result<()> {
    TenantMigrator::up(db, None).await?;
    Ok(())
}

fn sqlite_file_path(url: &str) -> Option<&Path> {
    let rest = url.strip_prefix("sqlite://")?;
    let path = rest.split('?').next()?;
    if path.is_empty() || path.starts_with(':') {
        return None;
    }
    Some(Path::new(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_file_path_strips_scheme_and_query() {
        assert_eq!(
            sqlite_file_path("sqlite://data/central.sqlite?mode=rwc"),
            Some(Path::new("data/central.sqlite"))
        );
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/crm"), None);
    }
}
