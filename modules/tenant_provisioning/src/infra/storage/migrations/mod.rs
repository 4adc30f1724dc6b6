//! Database migrations
//!
//! The central database and every tenant database carry separate schemas,
//! each with its own migrator.

use sea_orm_migration::prelude::*;

mod central;
mod tenant;

pub use central::CentralMigrator;
pub use tenant::TenantMigrator;

/// Auto-increment surrogate key
fn id_column<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn timestamp_column<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn names(migrations: Vec<Box<dyn MigrationTrait>>) -> Vec<String> {
        migrations.iter().map(|m| m.name().to_string()).collect()
    }

    #[test]
    fn migration_names_are_unique_and_ordered() {
        for names in [
            names(CentralMigrator::migrations()),
            names(TenantMigrator::migrations()),
        ] {
            let unique: HashSet<_> = names.iter().collect();
            assert_eq!(unique.len(), names.len(), "{:?}", names);
            let mut sorted = names.clone();
            sorted.sort();
            assert_eq!(sorted, names);
            assert!(names.iter().all(|n| n.starts_with('m')), "{:?}", names);
        }
    }
}
