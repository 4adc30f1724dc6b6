//! Central database schema: tenants and their domains

use super::{id_column, timestamp_column};
use sea_orm_migration::prelude::*;

pub struct CentralMigrator;

#[async_trait::async_trait]
impl MigratorTrait for CentralMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250301_000001_create_tenants::Migration)]
    }
}

mod m20250301_000001_create_tenants {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_tenants"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Tenants::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Tenants::Id)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Tenants::Name).string().not_null())
                        .col(ColumnDef::new(Tenants::Plan).string().not_null())
                        .col(ColumnDef::new(Tenants::MaxUsers).integer().not_null())
                        .col(ColumnDef::new(Tenants::MaxStorageMb).big_integer().not_null())
                        .col(&mut timestamp_column(Tenants::CreatedAt))
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Domains::Table)
                        .if_not_exists()
                        .col(&mut id_column(Domains::Id))
                        .col(
                            ColumnDef::new(Domains::Domain)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Domains::TenantId).string().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_domains_tenant")
                                .from(Domains::Table, Domains::TenantId)
                                .to(Tenants::Table, Tenants::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_domains_tenant_id")
                        .table(Domains::Table)
                        .col(Domains::TenantId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Domains::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Tenants::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Tenants {
        Table,
        Id,
        Name,
        Plan,
        MaxUsers,
        MaxStorageMb,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Domains {
        Table,
        Id,
        Domain,
        TenantId,
    }
}
