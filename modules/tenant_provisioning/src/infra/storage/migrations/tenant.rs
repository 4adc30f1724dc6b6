//! Tenant database schema
//!
//! Nothing here carries a tenant id: the database itself is the boundary.

use super::{id_column, timestamp_column};
use sea_orm_migration::prelude::*;

pub struct TenantMigrator;

#[async_trait::async_trait]
impl MigratorTrait for TenantMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_access::Migration),
            Box::new(m20250301_000002_create_modules::Migration),
            Box::new(m20250301_000003_create_billing::Migration),
            Box::new(m20250301_000004_create_layouts::Migration),
            Box::new(m20250301_000005_create_automation::Migration),
            Box::new(m20250301_000006_create_integrations::Migration),
        ]
    }
}

mod m20250301_000001_create_access {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_access"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Permissions::Table)
                        .if_not_exists()
                        .col(&mut id_column(Permissions::Id))
                        .col(
                            ColumnDef::new(Permissions::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Permissions::GuardName).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Roles::Table)
                        .if_not_exists()
                        .col(&mut id_column(Roles::Id))
                        .col(ColumnDef::new(Roles::Name).string().not_null().unique_key())
                        .col(ColumnDef::new(Roles::GuardName).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RoleHasPermissions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RoleHasPermissions::RoleId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RoleHasPermissions::PermissionId)
                                .big_integer()
                                .not_null(),
                        )
                        .primary_key(
                            Index::create()
                                .col(RoleHasPermissions::RoleId)
                                .col(RoleHasPermissions::PermissionId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_role_has_permissions_role")
                                .from(RoleHasPermissions::Table, RoleHasPermissions::RoleId)
                                .to(Roles::Table, Roles::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_role_has_permissions_permission")
                                .from(RoleHasPermissions::Table, RoleHasPermissions::PermissionId)
                                .to(Permissions::Table, Permissions::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(&mut id_column(Users::Id))
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                        .col(ColumnDef::new(Users::Password).string().not_null())
                        .col(&mut timestamp_column(Users::CreatedAt))
                        .col(&mut timestamp_column(Users::UpdatedAt))
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(UserRoles::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(UserRoles::UserId).big_integer().not_null())
                        .col(ColumnDef::new(UserRoles::RoleId).big_integer().not_null())
                        .primary_key(
                            Index::create()
                                .col(UserRoles::UserId)
                                .col(UserRoles::RoleId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_user_roles_user")
                                .from(UserRoles::Table, UserRoles::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_user_roles_role")
                                .from(UserRoles::Table, UserRoles::RoleId)
                                .to(Roles::Table, Roles::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(UserRoles::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(RoleHasPermissions::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Roles::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Permissions::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Permissions {
        Table,
        Id,
        Name,
        GuardName,
    }

    #[derive(DeriveIden)]
    enum Roles {
        Table,
        Id,
        Name,
        GuardName,
    }

    #[derive(DeriveIden)]
    enum RoleHasPermissions {
        Table,
        RoleId,
        PermissionId,
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        Name,
        Email,
        Password,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum UserRoles {
        Table,
        UserId,
        RoleId,
    }
}

mod m20250301_000002_create_modules {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_modules"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Modules::Table)
                        .if_not_exists()
                        .col(&mut id_column(Modules::Id))
                        .col(ColumnDef::new(Modules::ApiName).string().not_null().unique_key())
                        .col(ColumnDef::new(Modules::Name).string().not_null())
                        .col(ColumnDef::new(Modules::SingularName).string().not_null())
                        .col(ColumnDef::new(Modules::Icon).string().not_null())
                        .col(ColumnDef::new(Modules::Description).text().not_null())
                        .col(ColumnDef::new(Modules::DisplayOrder).integer().not_null())
                        .col(ColumnDef::new(Modules::Settings).json().not_null())
                        .col(
                            ColumnDef::new(Modules::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(&mut timestamp_column(Modules::CreatedAt))
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Pipelines::Table)
                        .if_not_exists()
                        .col(&mut id_column(Pipelines::Id))
                        .col(ColumnDef::new(Pipelines::ModuleId).big_integer().not_null())
                        .col(ColumnDef::new(Pipelines::Name).string().not_null())
                        .col(
                            ColumnDef::new(Pipelines::StageFieldApiName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Pipelines::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Pipelines::Settings).json().not_null())
                        .col(ColumnDef::new(Pipelines::CreatedBy).big_integer())
                        .col(&mut timestamp_column(Pipelines::CreatedAt))
                        .col(&mut timestamp_column(Pipelines::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_pipelines_module")
                                .from(Pipelines::Table, Pipelines::ModuleId)
                                .to(Modules::Table, Modules::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("uq_pipelines_module_name")
                        .table(Pipelines::Table)
                        .col(Pipelines::ModuleId)
                        .col(Pipelines::Name)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Stages::Table)
                        .if_not_exists()
                        .col(&mut id_column(Stages::Id))
                        .col(ColumnDef::new(Stages::PipelineId).big_integer().not_null())
                        .col(ColumnDef::new(Stages::Name).string().not_null())
                        .col(ColumnDef::new(Stages::Color).string().not_null())
                        .col(ColumnDef::new(Stages::Probability).integer().not_null())
                        .col(ColumnDef::new(Stages::DisplayOrder).integer().not_null())
                        .col(
                            ColumnDef::new(Stages::IsWonStage)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Stages::IsLostStage)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Stages::Settings).json().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stages_pipeline")
                                .from(Stages::Table, Stages::PipelineId)
                                .to(Pipelines::Table, Pipelines::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("uq_stages_pipeline_name")
                        .table(Stages::Table)
                        .col(Stages::PipelineId)
                        .col(Stages::Name)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ModulePermissions::Table)
                        .if_not_exists()
                        .col(&mut id_column(ModulePermissions::Id))
                        .col(
                            ColumnDef::new(ModulePermissions::RoleId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ModulePermissions::ModuleId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ModulePermissions::CanView).boolean().not_null())
                        .col(ColumnDef::new(ModulePermissions::CanCreate).boolean().not_null())
                        .col(ColumnDef::new(ModulePermissions::CanEdit).boolean().not_null())
                        .col(ColumnDef::new(ModulePermissions::CanDelete).boolean().not_null())
                        .col(ColumnDef::new(ModulePermissions::CanExport).boolean().not_null())
                        .col(ColumnDef::new(ModulePermissions::CanImport).boolean().not_null())
                        .col(
                            ColumnDef::new(ModulePermissions::RecordAccessLevel)
                                .string()
                                .not_null()
                                .default("all"),
                        )
                        .col(
                            ColumnDef::new(ModulePermissions::FieldRestrictions)
                                .json()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_module_permissions_module")
                                .from(ModulePermissions::Table, ModulePermissions::ModuleId)
                                .to(Modules::Table, Modules::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("uq_module_permissions_role_module")
                        .table(ModulePermissions::Table)
                        .col(ModulePermissions::RoleId)
                        .col(ModulePermissions::ModuleId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ModuleRecords::Table)
                        .if_not_exists()
                        .col(&mut id_column(ModuleRecords::Id))
                        .col(ColumnDef::new(ModuleRecords::ModuleId).big_integer().not_null())
                        .col(ColumnDef::new(ModuleRecords::Data).json().not_null())
                        .col(ColumnDef::new(ModuleRecords::CreatedBy).big_integer().not_null())
                        .col(&mut timestamp_column(ModuleRecords::CreatedAt))
                        .col(&mut timestamp_column(ModuleRecords::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_module_records_module")
                                .from(ModuleRecords::Table, ModuleRecords::ModuleId)
                                .to(Modules::Table, Modules::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_module_records_module_id")
                        .table(ModuleRecords::Table)
                        .col(ModuleRecords::ModuleId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ModuleRecords::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ModulePermissions::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Stages::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Pipelines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Modules::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Modules {
        Table,
        Id,
        ApiName,
        Name,
        SingularName,
        Icon,
        Description,
        DisplayOrder,
        Settings,
        IsActive,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Pipelines {
        Table,
        Id,
        ModuleId,
        Name,
        StageFieldApiName,
        IsActive,
        Settings,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Stages {
        Table,
        Id,
        PipelineId,
        Name,
        Color,
        Probability,
        DisplayOrder,
        IsWonStage,
        IsLostStage,
        Settings,
    }

    #[derive(DeriveIden)]
    enum ModulePermissions {
        Table,
        Id,
        RoleId,
        ModuleId,
        CanView,
        CanCreate,
        CanEdit,
        CanDelete,
        CanExport,
        CanImport,
        RecordAccessLevel,
        FieldRestrictions,
    }

    #[derive(DeriveIden)]
    enum ModuleRecords {
        Table,
        Id,
        ModuleId,
        Data,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000003_create_billing {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_billing"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(TenantSubscriptions::Table)
                        .if_not_exists()
                        .col(&mut id_column(TenantSubscriptions::Id))
                        .col(ColumnDef::new(TenantSubscriptions::Plan).string().not_null())
                        .col(ColumnDef::new(TenantSubscriptions::Status).string().not_null())
                        .col(
                            ColumnDef::new(TenantSubscriptions::BillingCycle)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TenantSubscriptions::Seats).integer().not_null())
                        .col(
                            ColumnDef::new(TenantSubscriptions::PricePerSeat)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TenantSubscriptions::CurrentPeriodStart)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TenantSubscriptions::CurrentPeriodEnd)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TenantSubscriptions::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum TenantSubscriptions {
        Table,
        Id,
        Plan,
        Status,
        BillingCycle,
        Seats,
        PricePerSeat,
        CurrentPeriodStart,
        CurrentPeriodEnd,
    }
}

mod m20250301_000004_create_layouts {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000004_create_layouts"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ModuleViews::Table)
                        .if_not_exists()
                        .col(&mut id_column(ModuleViews::Id))
                        .col(ColumnDef::new(ModuleViews::ModuleId).big_integer().not_null())
                        .col(ColumnDef::new(ModuleViews::Name).string().not_null())
                        .col(
                            ColumnDef::new(ModuleViews::IsDefault)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(ModuleViews::Definition).json().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("uq_module_views_module_name")
                        .table(ModuleViews::Table)
                        .col(ModuleViews::ModuleId)
                        .col(ModuleViews::Name)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Reports::Table)
                        .if_not_exists()
                        .col(&mut id_column(Reports::Id))
                        .col(ColumnDef::new(Reports::ModuleId).big_integer().not_null())
                        .col(ColumnDef::new(Reports::Name).string().not_null())
                        .col(ColumnDef::new(Reports::Description).text().not_null())
                        .col(ColumnDef::new(Reports::Type).string().not_null())
                        .col(ColumnDef::new(Reports::ChartType).string())
                        .col(
                            ColumnDef::new(Reports::IsPublic)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Reports::Definition).json().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("uq_reports_module_name")
                        .table(Reports::Table)
                        .col(Reports::ModuleId)
                        .col(Reports::Name)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Dashboards::Table)
                        .if_not_exists()
                        .col(&mut id_column(Dashboards::Id))
                        .col(ColumnDef::new(Dashboards::Name).string().not_null().unique_key())
                        .col(ColumnDef::new(Dashboards::Description).text().not_null())
                        .col(
                            ColumnDef::new(Dashboards::IsDefault)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(DashboardWidgets::Table)
                        .if_not_exists()
                        .col(&mut id_column(DashboardWidgets::Id))
                        .col(
                            ColumnDef::new(DashboardWidgets::DashboardId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DashboardWidgets::Title).string().not_null())
                        .col(ColumnDef::new(DashboardWidgets::Type).string().not_null())
                        .col(ColumnDef::new(DashboardWidgets::Config).json().not_null())
                        .col(ColumnDef::new(DashboardWidgets::GridPosition).json().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_dashboard_widgets_dashboard")
                                .from(DashboardWidgets::Table, DashboardWidgets::DashboardId)
                                .to(Dashboards::Table, Dashboards::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("uq_dashboard_widgets_dashboard_title")
                        .table(DashboardWidgets::Table)
                        .col(DashboardWidgets::DashboardId)
                        .col(DashboardWidgets::Title)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DashboardWidgets::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Dashboards::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Reports::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ModuleViews::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ModuleViews {
        Table,
        Id,
        ModuleId,
        Name,
        IsDefault,
        Definition,
    }

    #[derive(DeriveIden)]
    enum Reports {
        Table,
        Id,
        ModuleId,
        Name,
        Description,
        Type,
        ChartType,
        IsPublic,
        Definition,
    }

    #[derive(DeriveIden)]
    enum Dashboards {
        Table,
        Id,
        Name,
        Description,
        IsDefault,
    }

    #[derive(DeriveIden)]
    enum DashboardWidgets {
        Table,
        Id,
        DashboardId,
        Title,
        Type,
        Config,
        GridPosition,
    }
}

mod m20250301_000005_create_automation {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000005_create_automation"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Workflows::Table)
                        .if_not_exists()
                        .col(&mut id_column(Workflows::Id))
                        .col(ColumnDef::new(Workflows::ModuleId).big_integer().not_null())
                        .col(ColumnDef::new(Workflows::Name).string().not_null())
                        .col(ColumnDef::new(Workflows::Description).text().not_null())
                        .col(ColumnDef::new(Workflows::TriggerType).string().not_null())
                        .col(ColumnDef::new(Workflows::TriggerConfig).json().not_null())
                        .col(
                            ColumnDef::new(Workflows::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Workflows::CreatedBy).big_integer().not_null())
                        .col(&mut timestamp_column(Workflows::CreatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_workflows_module")
                                .from(Workflows::Table, Workflows::ModuleId)
                                .to(Modules::Table, Modules::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(WorkflowSteps::Table)
                        .if_not_exists()
                        .col(&mut id_column(WorkflowSteps::Id))
                        .col(ColumnDef::new(WorkflowSteps::WorkflowId).big_integer().not_null())
                        .col(ColumnDef::new(WorkflowSteps::StepOrder).integer().not_null())
                        .col(ColumnDef::new(WorkflowSteps::ActionType).string().not_null())
                        .col(ColumnDef::new(WorkflowSteps::ActionConfig).json().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_workflow_steps_workflow")
                                .from(WorkflowSteps::Table, WorkflowSteps::WorkflowId)
                                .to(Workflows::Table, Workflows::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("uq_workflow_steps_workflow_order")
                        .table(WorkflowSteps::Table)
                        .col(WorkflowSteps::WorkflowId)
                        .col(WorkflowSteps::StepOrder)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(WorkflowExecutions::Table)
                        .if_not_exists()
                        .col(&mut id_column(WorkflowExecutions::Id))
                        .col(
                            ColumnDef::new(WorkflowExecutions::WorkflowId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(WorkflowExecutions::Status).string().not_null())
                        .col(
                            ColumnDef::new(WorkflowExecutions::TriggeredBy)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(WorkflowExecutions::StartedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(WorkflowExecutions::CompletedAt)
                                .timestamp_with_time_zone(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_workflow_executions_workflow")
                                .from(WorkflowExecutions::Table, WorkflowExecutions::WorkflowId)
                                .to(Workflows::Table, Workflows::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Blueprints::Table)
                        .if_not_exists()
                        .col(&mut id_column(Blueprints::Id))
                        .col(ColumnDef::new(Blueprints::ModuleId).big_integer().not_null())
                        .col(ColumnDef::new(Blueprints::Name).string().not_null())
                        .col(ColumnDef::new(Blueprints::FieldApiName).string().not_null())
                        .col(
                            ColumnDef::new(Blueprints::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Blueprints::CreatedBy).big_integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_blueprints_module")
                                .from(Blueprints::Table, Blueprints::ModuleId)
                                .to(Modules::Table, Modules::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(BlueprintStates::Table)
                        .if_not_exists()
                        .col(&mut id_column(BlueprintStates::Id))
                        .col(
                            ColumnDef::new(BlueprintStates::BlueprintId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(BlueprintStates::Name).string().not_null())
                        .col(ColumnDef::new(BlueprintStates::Color).string().not_null())
                        .col(ColumnDef::new(BlueprintStates::IsInitial).boolean().not_null())
                        .col(ColumnDef::new(BlueprintStates::IsFinal).boolean().not_null())
                        .col(ColumnDef::new(BlueprintStates::DisplayOrder).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_blueprint_states_blueprint")
                                .from(BlueprintStates::Table, BlueprintStates::BlueprintId)
                                .to(Blueprints::Table, Blueprints::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("uq_blueprint_states_blueprint_name")
                        .table(BlueprintStates::Table)
                        .col(BlueprintStates::BlueprintId)
                        .col(BlueprintStates::Name)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(BlueprintTransitions::Table)
                        .if_not_exists()
                        .col(&mut id_column(BlueprintTransitions::Id))
                        .col(
                            ColumnDef::new(BlueprintTransitions::BlueprintId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BlueprintTransitions::FromStateId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BlueprintTransitions::ToStateId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(BlueprintTransitions::Name).string().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_blueprint_transitions_blueprint")
                                .from(
                                    BlueprintTransitions::Table,
                                    BlueprintTransitions::BlueprintId,
                                )
                                .to(Blueprints::Table, Blueprints::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(BlueprintTransitions::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(BlueprintStates::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Blueprints::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(WorkflowExecutions::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(WorkflowSteps::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Workflows::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Modules {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Workflows {
        Table,
        Id,
        ModuleId,
        Name,
        Description,
        TriggerType,
        TriggerConfig,
        IsActive,
        CreatedBy,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum WorkflowSteps {
        Table,
        Id,
        WorkflowId,
        StepOrder,
        ActionType,
        ActionConfig,
    }

    #[derive(DeriveIden)]
    enum WorkflowExecutions {
        Table,
        Id,
        WorkflowId,
        Status,
        TriggeredBy,
        StartedAt,
        CompletedAt,
    }

    #[derive(DeriveIden)]
    enum Blueprints {
        Table,
        Id,
        ModuleId,
        Name,
        FieldApiName,
        IsActive,
        CreatedBy,
    }

    #[derive(DeriveIden)]
    enum BlueprintStates {
        Table,
        Id,
        BlueprintId,
        Name,
        Color,
        IsInitial,
        IsFinal,
        DisplayOrder,
    }

    #[derive(DeriveIden)]
    enum BlueprintTransitions {
        Table,
        Id,
        BlueprintId,
        FromStateId,
        ToStateId,
        Name,
    }
}

mod m20250301_000006_create_integrations {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000006_create_integrations"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(EmailAccounts::Table)
                        .if_not_exists()
                        .col(&mut id_column(EmailAccounts::Id))
                        .col(ColumnDef::new(EmailAccounts::UserId).big_integer().not_null())
                        .col(ColumnDef::new(EmailAccounts::Name).string().not_null())
                        .col(
                            ColumnDef::new(EmailAccounts::EmailAddress)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(EmailAccounts::Provider).string().not_null())
                        .col(
                            ColumnDef::new(EmailAccounts::IsDefault)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(EmailMessages::Table)
                        .if_not_exists()
                        .col(&mut id_column(EmailMessages::Id))
                        .col(ColumnDef::new(EmailMessages::AccountId).big_integer().not_null())
                        .col(ColumnDef::new(EmailMessages::Direction).string().not_null())
                        .col(ColumnDef::new(EmailMessages::FromEmail).string().not_null())
                        .col(ColumnDef::new(EmailMessages::ToEmail).string().not_null())
                        .col(ColumnDef::new(EmailMessages::Subject).string().not_null())
                        .col(ColumnDef::new(EmailMessages::Body).text().not_null())
                        .col(
                            ColumnDef::new(EmailMessages::SentAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_email_messages_account")
                                .from(EmailMessages::Table, EmailMessages::AccountId)
                                .to(EmailAccounts::Table, EmailAccounts::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(EmailTemplates::Table)
                        .if_not_exists()
                        .col(&mut id_column(EmailTemplates::Id))
                        .col(ColumnDef::new(EmailTemplates::Name).string().not_null().unique_key())
                        .col(ColumnDef::new(EmailTemplates::Category).string().not_null())
                        .col(ColumnDef::new(EmailTemplates::Subject).string().not_null())
                        .col(ColumnDef::new(EmailTemplates::Body).text().not_null())
                        .col(ColumnDef::new(EmailTemplates::CreatedBy).big_integer().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(AuditLogs::Table)
                        .if_not_exists()
                        .col(&mut id_column(AuditLogs::Id))
                        .col(ColumnDef::new(AuditLogs::UserId).big_integer().not_null())
                        .col(ColumnDef::new(AuditLogs::Event).string().not_null())
                        .col(ColumnDef::new(AuditLogs::AuditableType).string().not_null())
                        .col(ColumnDef::new(AuditLogs::AuditableId).big_integer())
                        .col(ColumnDef::new(AuditLogs::OldValues).json().not_null())
                        .col(ColumnDef::new(AuditLogs::NewValues).json().not_null())
                        .col(&mut timestamp_column(AuditLogs::CreatedAt))
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Imports::Table)
                        .if_not_exists()
                        .col(&mut id_column(Imports::Id))
                        .col(ColumnDef::new(Imports::UserId).big_integer().not_null())
                        .col(ColumnDef::new(Imports::ModuleId).big_integer().not_null())
                        .col(ColumnDef::new(Imports::FileName).string().not_null())
                        .col(ColumnDef::new(Imports::Status).string().not_null())
                        .col(ColumnDef::new(Imports::TotalRows).integer().not_null())
                        .col(ColumnDef::new(Imports::ImportedRows).integer().not_null())
                        .col(ColumnDef::new(Imports::FailedRows).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_imports_module")
                                .from(Imports::Table, Imports::ModuleId)
                                .to(Modules::Table, Modules::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Exports::Table)
                        .if_not_exists()
                        .col(&mut id_column(Exports::Id))
                        .col(ColumnDef::new(Exports::UserId).big_integer().not_null())
                        .col(ColumnDef::new(Exports::ModuleId).big_integer().not_null())
                        .col(ColumnDef::new(Exports::FileName).string().not_null())
                        .col(ColumnDef::new(Exports::Format).string().not_null())
                        .col(ColumnDef::new(Exports::Status).string().not_null())
                        .col(ColumnDef::new(Exports::RecordCount).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_exports_module")
                                .from(Exports::Table, Exports::ModuleId)
                                .to(Modules::Table, Modules::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ApiKeys::Table)
                        .if_not_exists()
                        .col(&mut id_column(ApiKeys::Id))
                        .col(ColumnDef::new(ApiKeys::UserId).big_integer().not_null())
                        .col(ColumnDef::new(ApiKeys::Name).string().not_null())
                        .col(ColumnDef::new(ApiKeys::Prefix).string().not_null().unique_key())
                        .col(ColumnDef::new(ApiKeys::KeyHash).string().not_null())
                        .col(ColumnDef::new(ApiKeys::Scopes).json().not_null())
                        .col(ColumnDef::new(ApiKeys::ExpiresAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Webhooks::Table)
                        .if_not_exists()
                        .col(&mut id_column(Webhooks::Id))
                        .col(ColumnDef::new(Webhooks::UserId).big_integer().not_null())
                        .col(ColumnDef::new(Webhooks::ModuleId).big_integer().not_null())
                        .col(ColumnDef::new(Webhooks::Name).string().not_null())
                        .col(ColumnDef::new(Webhooks::Url).string().not_null())
                        .col(ColumnDef::new(Webhooks::Events).json().not_null())
                        .col(ColumnDef::new(Webhooks::Secret).string().not_null())
                        .col(
                            ColumnDef::new(Webhooks::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_webhooks_module")
                                .from(Webhooks::Table, Webhooks::ModuleId)
                                .to(Modules::Table, Modules::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Webhooks::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ApiKeys::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Exports::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Imports::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(AuditLogs::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(EmailTemplates::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(EmailMessages::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(EmailAccounts::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Modules {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum EmailAccounts {
        Table,
        Id,
        UserId,
        Name,
        EmailAddress,
        Provider,
        IsDefault,
    }

    #[derive(DeriveIden)]
    enum EmailMessages {
        Table,
        Id,
        AccountId,
        Direction,
        FromEmail,
        ToEmail,
        Subject,
        Body,
        SentAt,
    }

    #[derive(DeriveIden)]
    enum EmailTemplates {
        Table,
        Id,
        Name,
        Category,
        Subject,
        Body,
        CreatedBy,
    }

    #[derive(DeriveIden)]
    enum AuditLogs {
        Table,
        Id,
        UserId,
        Event,
        AuditableType,
        AuditableId,
        OldValues,
        NewValues,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Imports {
        Table,
        Id,
        UserId,
        ModuleId,
        FileName,
        Status,
        TotalRows,
        ImportedRows,
        FailedRows,
    }

    #[derive(DeriveIden)]
    enum Exports {
        Table,
        Id,
        UserId,
        ModuleId,
        FileName,
        Format,
        Status,
        RecordCount,
    }

    #[derive(DeriveIden)]
    enum ApiKeys {
        Table,
        Id,
        UserId,
        Name,
        Prefix,
        KeyHash,
        Scopes,
        ExpiresAt,
    }

    #[derive(DeriveIden)]
    enum Webhooks {
        Table,
        Id,
        UserId,
        ModuleId,
        Name,
        Url,
        Events,
        Secret,
        IsActive,
    }
}
