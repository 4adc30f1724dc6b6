//! SeaORM entities for database tables
//!
//! `tenant` and `domain` live in the central database; every other module
//! here is a table of a tenant database.

// ===== Central database =====

/// Registered tenants
pub mod tenant {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "tenants")]
    pub struct Model {
        /// Tenant slug (primary key)
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub name: String,
        /// Plan tier name
        pub plan: String,
        pub max_users: i32,
        pub max_storage_mb: i64,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::domain::Entity")]
        Domain,
    }

    impl Related<super::domain::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Domain.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Domain bindings of tenants
pub mod domain {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "domains")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        #[sea_orm(unique)]
        pub domain: String,
        pub tenant_id: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::tenant::Entity",
            from = "Column::TenantId",
            to = "super::tenant::Column::Id"
        )]
        Tenant,
    }

    impl Related<super::tenant::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Tenant.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

// ===== Tenant database =====

pub mod module {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "modules")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        #[sea_orm(unique)]
        pub api_name: String,
        pub name: String,
        pub singular_name: String,
        pub icon: String,
        pub description: String,
        pub display_order: i32,
        pub settings: Json,
        pub is_active: bool,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod pipeline {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "pipelines")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub module_id: i64,
        pub name: String,
        pub stage_field_api_name: String,
        pub is_active: bool,
        /// show_totals, value_field, title_field, subtitle_field, due_date_field
        pub settings: Json,
        pub created_by: Option<i64>,
        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::stage::Entity")]
        Stage,
    }

    impl Related<super::stage::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Stage.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod stage {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "stages")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub pipeline_id: i64,
        pub name: String,
        pub color: String,
        pub probability: i32,
        pub display_order: i32,
        pub is_won_stage: bool,
        pub is_lost_stage: bool,
        pub settings: Json,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::pipeline::Entity",
            from = "Column::PipelineId",
            to = "super::pipeline::Column::Id"
        )]
        Pipeline,
    }

    impl Related<super::pipeline::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Pipeline.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod permission {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "permissions")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        #[sea_orm(unique)]
        pub name: String,
        pub guard_name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod role {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "roles")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        #[sea_orm(unique)]
        pub name: String,
        pub guard_name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Role to permission pivot
pub mod role_permission {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "role_has_permissions")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub role_id: i64,
        #[sea_orm(primary_key, auto_increment = false)]
        pub permission_id: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod module_permission {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "module_permissions")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub role_id: i64,
        pub module_id: i64,
        pub can_view: bool,
        pub can_create: bool,
        pub can_edit: bool,
        pub can_delete: bool,
        pub can_export: bool,
        pub can_import: bool,
        /// "all" or "own"
        pub record_access_level: String,
        /// JSON array of field API names
        pub field_restrictions: Json,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod user {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub name: String,
        #[sea_orm(unique)]
        pub email: String,
        /// Argon2id PHC string
        pub password: String,
        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// User to role pivot
pub mod user_role {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "user_roles")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub user_id: i64,
        #[sea_orm(primary_key, auto_increment = false)]
        pub role_id: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod subscription {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "tenant_subscriptions")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub plan: String,
        pub status: String,
        pub billing_cycle: String,
        pub seats: i32,
        /// Integer cents
        pub price_per_seat: i64,
        pub current_period_start: DateTimeUtc,
        pub current_period_end: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod view {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "module_views")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub module_id: i64,
        pub name: String,
        pub is_default: bool,
        pub definition: Json,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod report {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "reports")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub module_id: i64,
        pub name: String,
        pub description: String,
        pub r#type: String,
        pub chart_type: Option<String>,
        pub is_public: bool,
        pub definition: Json,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod dashboard {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "dashboards")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        #[sea_orm(unique)]
        pub name: String,
        pub description: String,
        pub is_default: bool,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::dashboard_widget::Entity")]
        Widget,
    }

    impl Related<super::dashboard_widget::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Widget.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod dashboard_widget {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "dashboard_widgets")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub dashboard_id: i64,
        pub title: String,
        pub r#type: String,
        pub config: Json,
        /// {x, y, w, h}
        pub grid_position: Json,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::dashboard::Entity",
            from = "Column::DashboardId",
            to = "super::dashboard::Column::Id"
        )]
        Dashboard,
    }

    impl Related<super::dashboard::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Dashboard.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod module_record {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "module_records")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub module_id: i64,
        pub data: Json,
        pub created_by: i64,
        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

// ===== Workflows and blueprints =====

pub mod workflow {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "workflows")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub module_id: i64,
        pub name: String,
        pub description: String,
        pub trigger_type: String,
        pub trigger_config: Json,
        pub is_active: bool,
        pub created_by: i64,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::workflow_step::Entity")]
        Step,
        #[sea_orm(has_many = "super::workflow_execution::Entity")]
        Execution,
    }

    impl Related<super::workflow_step::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Step.def()
        }
    }

    impl Related<super::workflow_execution::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Execution.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod workflow_step {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "workflow_steps")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub workflow_id: i64,
        pub step_order: i32,
        pub action_type: String,
        pub action_config: Json,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::workflow::Entity",
            from = "Column::WorkflowId",
            to = "super::workflow::Column::Id"
        )]
        Workflow,
    }

    impl Related<super::workflow::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Workflow.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod workflow_execution {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "workflow_executions")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub workflow_id: i64,
        pub status: String,
        pub triggered_by: i64,
        pub started_at: DateTimeUtc,
        pub completed_at: Option<DateTimeUtc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::workflow::Entity",
            from = "Column::WorkflowId",
            to = "super::workflow::Column::Id"
        )]
        Workflow,
    }

    impl Related<super::workflow::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Workflow.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod blueprint {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "blueprints")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub module_id: i64,
        pub name: String,
        pub field_api_name: String,
        pub is_active: bool,
        pub created_by: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::blueprint_state::Entity")]
        State,
        #[sea_orm(has_many = "super::blueprint_transition::Entity")]
        Transition,
    }

    impl Related<super::blueprint_state::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::State.def()
        }
    }

    impl Related<super::blueprint_transition::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Transition.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod blueprint_state {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "blueprint_states")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub blueprint_id: i64,
        pub name: String,
        pub color: String,
        pub is_initial: bool,
        pub is_final: bool,
        pub display_order: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::blueprint::Entity",
            from = "Column::BlueprintId",
            to = "super::blueprint::Column::Id"
        )]
        Blueprint,
    }

    impl Related<super::blueprint::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Blueprint.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod blueprint_transition {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "blueprint_transitions")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub blueprint_id: i64,
        pub from_state_id: i64,
        pub to_state_id: i64,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::blueprint::Entity",
            from = "Column::BlueprintId",
            to = "super::blueprint::Column::Id"
        )]
        Blueprint,
    }

    impl Related<super::blueprint::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Blueprint.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

// ===== Email =====

pub mod email_account {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "email_accounts")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub user_id: i64,
        pub name: String,
        #[sea_orm(unique)]
        pub email_address: String,
        pub provider: String,
        pub is_default: bool,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::email_message::Entity")]
        Message,
    }

    impl Related<super::email_message::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Message.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod email_message {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "email_messages")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub account_id: i64,
        pub direction: String,
        pub from_email: String,
        pub to_email: String,
        pub subject: String,
        pub body: String,
        pub sent_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::email_account::Entity",
            from = "Column::AccountId",
            to = "super::email_account::Column::Id"
        )]
        Account,
    }

    impl Related<super::email_account::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Account.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod email_template {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "email_templates")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        #[sea_orm(unique)]
        pub name: String,
        pub category: String,
        pub subject: String,
        pub body: String,
        pub created_by: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

// ===== Audit, transfers and integrations =====

pub mod audit_log {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "audit_logs")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub user_id: i64,
        pub event: String,
        pub auditable_type: String,
        pub auditable_id: Option<i64>,
        pub old_values: Json,
        pub new_values: Json,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod data_import {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "imports")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub user_id: i64,
        pub module_id: i64,
        pub file_name: String,
        pub status: String,
        pub total_rows: i32,
        pub imported_rows: i32,
        pub failed_rows: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod data_export {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "exports")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub user_id: i64,
        pub module_id: i64,
        pub file_name: String,
        pub format: String,
        pub status: String,
        pub record_count: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod api_key {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "api_keys")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub user_id: i64,
        pub name: String,
        #[sea_orm(unique)]
        pub prefix: String,
        /// SHA-256 of the full key, hex encoded
        pub key_hash: String,
        pub scopes: Json,
        pub expires_at: Option<DateTimeUtc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod webhook {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "webhooks")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub user_id: i64,
        pub module_id: i64,
        pub name: String,
        pub url: String,
        pub events: Json,
        pub secret: String,
        pub is_active: bool,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}
