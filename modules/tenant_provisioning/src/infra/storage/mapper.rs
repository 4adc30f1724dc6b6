//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity;
use crate::contract::{
    AccessLevel, ApiKey, BillingCycle, Blueprint, BlueprintState, BlueprintTransition, Dashboard,
    DashboardWidget, DataExport, DataImport, Domain, EmailAccount, EmailTemplate, GridPosition,
    Module, ModuleAccess, ModulePermission, NewApiKey, NewAuditLog, NewBlueprint,
    NewBlueprintState, NewBlueprintTransition, NewDashboard, NewDashboardWidget, NewDataExport,
    NewDataImport, NewEmailAccount, NewEmailMessage, NewEmailTemplate, NewModule,
    NewModulePermission, NewModuleRecord, NewPipeline, NewReport, NewSavedView, NewStage,
    NewSubscription, NewTenant, NewUser, NewWebhook, NewWorkflow, NewWorkflowExecution,
    NewWorkflowStep, Permission, Pipeline, PlanTier, Report, Role, SavedView, Stage,
    Subscription, SubscriptionStatus, Tenant, TenantLimits, User, Webhook, Workflow,
    WorkflowExecution, WorkflowStep,
};
use anyhow::anyhow;
use chrono::Utc;
use serde_json::{json, Value};

fn parse_plan(value: &str) -> anyhow::Result<PlanTier> {
    PlanTier::parse(value).ok_or_else(|| anyhow!("unknown plan tier '{}'", value))
}

// ===== Tenant Conversions =====

impl TryFrom<entity::tenant::Model> for Tenant {
    type Error = anyhow::Error;

    fn try_from(entity: entity::tenant::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            plan: parse_plan(&entity.plan)?,
            limits: TenantLimits {
                max_users: u32::try_from(entity.max_users)?,
                max_storage_mb: u64::try_from(entity.max_storage_mb)?,
            },
            id: entity.id,
            name: entity.name,
            created_at: entity.created_at,
        })
    }
}

impl TryFrom<&NewTenant> for entity::tenant::ActiveModel {
    type Error = anyhow::Error;

    fn try_from(model: &NewTenant) -> Result<Self, Self::Error> {
        use sea_orm::ActiveValue::*;

        Ok(Self {
            id: Set(model.id.clone()),
            name: Set(model.name.clone()),
            plan: Set(model.plan.as_str().to_string()),
            max_users: Set(i32::try_from(model.limits.max_users)?),
            max_storage_mb: Set(i64::try_from(model.limits.max_storage_mb)?),
            created_at: Set(Utc::now()),
        })
    }
}

impl From<entity::domain::Model> for Domain {
    fn from(entity: entity::domain::Model) -> Self {
        Self {
            id: entity.id,
            domain: entity.domain,
            tenant_id: entity.tenant_id,
        }
    }
}

// ===== Module Conversions =====

impl From<entity::module::Model> for Module {
    fn from(entity: entity::module::Model) -> Self {
        Self {
            id: entity.id,
            api_name: entity.api_name,
            name: entity.name,
            singular_name: entity.singular_name,
            icon: entity.icon,
            description: entity.description,
            display_order: entity.display_order,
            settings: entity.settings,
            is_active: entity.is_active,
            created_at: entity.created_at,
        }
    }
}

impl From<&NewModule> for entity::module::ActiveModel {
    fn from(model: &NewModule) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: NotSet,
            api_name: Set(model.api_name.clone()),
            name: Set(model.name.clone()),
            singular_name: Set(model.singular_name.clone()),
            icon: Set(model.icon.clone()),
            description: Set(model.description.clone()),
            display_order: Set(model.display_order),
            settings: Set(model.settings.clone()),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        }
    }
}

// ===== Pipeline Conversions =====

impl From<entity::pipeline::Model> for Pipeline {
    fn from(entity: entity::pipeline::Model) -> Self {
        Self {
            id: entity.id,
            module_id: entity.module_id,
            name: entity.name,
            stage_field_api_name: entity.stage_field_api_name,
            is_active: entity.is_active,
            settings: entity.settings,
            created_by: entity.created_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<&NewPipeline> for entity::pipeline::ActiveModel {
    fn from(model: &NewPipeline) -> Self {
        use sea_orm::ActiveValue::*;

        let now = Utc::now();
        Self {
            id: NotSet,
            module_id: Set(model.module_id),
            name: Set(model.name.clone()),
            stage_field_api_name: Set(model.stage_field_api_name.clone()),
            is_active: Set(true),
            settings: Set(model.settings.clone()),
            created_by: Set(model.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

impl From<entity::stage::Model> for Stage {
    fn from(entity: entity::stage::Model) -> Self {
        Self {
            id: entity.id,
            pipeline_id: entity.pipeline_id,
            name: entity.name,
            color: entity.color,
            probability: entity.probability,
            display_order: entity.display_order,
            is_won_stage: entity.is_won_stage,
            is_lost_stage: entity.is_lost_stage,
        }
    }
}

impl From<&NewStage> for entity::stage::ActiveModel {
    fn from(model: &NewStage) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: NotSet,
            pipeline_id: Set(model.pipeline_id),
            name: Set(model.name.clone()),
            color: Set(model.color.clone()),
            probability: Set(model.probability),
            display_order: Set(model.display_order),
            is_won_stage: Set(model.is_won_stage),
            is_lost_stage: Set(model.is_lost_stage),
            settings: Set(json!([])),
        }
    }
}

// ===== Role and Permission Conversions =====

impl From<entity::permission::Model> for Permission {
    fn from(entity: entity::permission::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            guard_name: entity.guard_name,
        }
    }
}

impl From<entity::role::Model> for Role {
    fn from(entity: entity::role::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            guard_name: entity.guard_name,
        }
    }
}

impl TryFrom<entity::module_permission::Model> for ModulePermission {
    type Error = anyhow::Error;

    fn try_from(entity: entity::module_permission::Model) -> Result<Self, Self::Error> {
        let access_level = AccessLevel::parse(&entity.record_access_level).ok_or_else(|| {
            anyhow!("unknown record access level '{}'", entity.record_access_level)
        })?;
        let field_restrictions: Vec<String> = serde_json::from_value(entity.field_restrictions)?;

        Ok(Self {
            id: entity.id,
            role_id: entity.role_id,
            module_id: entity.module_id,
            access: ModuleAccess {
                can_view: entity.can_view,
                can_create: entity.can_create,
                can_edit: entity.can_edit,
                can_delete: entity.can_delete,
                can_export: entity.can_export,
                can_import: entity.can_import,
                access_level,
                field_restrictions,
            },
        })
    }
}

impl From<&NewModulePermission> for entity::module_permission::ActiveModel {
    fn from(model: &NewModulePermission) -> Self {
        use sea_orm::ActiveValue::*;

        let access = &model.access;
        Self {
            id: NotSet,
            role_id: Set(model.role_id),
            module_id: Set(model.module_id),
            can_view: Set(access.can_view),
            can_create: Set(access.can_create),
            can_edit: Set(access.can_edit),
            can_delete: Set(access.can_delete),
            can_export: Set(access.can_export),
            can_import: Set(access.can_import),
            record_access_level: Set(access.access_level.as_str().to_string()),
            field_restrictions: Set(json!(access.field_restrictions)),
        }
    }
}

// ===== User Conversions =====

impl From<entity::user::Model> for User {
    fn from(entity: entity::user::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            password_hash: entity.password,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<&NewUser> for entity::user::ActiveModel {
    fn from(model: &NewUser) -> Self {
        use sea_orm::ActiveValue::*;

        let now = Utc::now();
        Self {
            id: NotSet,
            name: Set(model.name.clone()),
            email: Set(model.email.clone()),
            password: Set(model.password_hash.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

// ===== Subscription Conversions =====

impl TryFrom<entity::subscription::Model> for Subscription {
    type Error = anyhow::Error;

    fn try_from(entity: entity::subscription::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entity.id,
            plan: parse_plan(&entity.plan)?,
            status: SubscriptionStatus::parse(&entity.status)
                .ok_or_else(|| anyhow!("unknown subscription status '{}'", entity.status))?,
            billing_cycle: BillingCycle::parse(&entity.billing_cycle)
                .ok_or_else(|| anyhow!("unknown billing cycle '{}'", entity.billing_cycle))?,
            seats: u32::try_from(entity.seats)?,
            price_per_seat_cents: entity.price_per_seat,
            current_period_start: entity.current_period_start,
            current_period_end: entity.current_period_end,
        })
    }
}

impl TryFrom<&NewSubscription> for entity::subscription::ActiveModel {
    type Error = anyhow::Error;

    fn try_from(model: &NewSubscription) -> Result<Self, Self::Error> {
        use sea_orm::ActiveValue::*;

        Ok(Self {
            id: NotSet,
            plan: Set(model.plan.as_str().to_string()),
            status: Set(model.status.as_str().to_string()),
            billing_cycle: Set(model.billing_cycle.as_str().to_string()),
            seats: Set(i32::try_from(model.seats)?),
            price_per_seat: Set(model.price_per_seat_cents),
            current_period_start: Set(model.current_period_start),
            current_period_end: Set(model.current_period_end),
        })
    }
}

// ===== View, Report and Dashboard Conversions =====

impl From<entity::view::Model> for SavedView {
    fn from(entity: entity::view::Model) -> Self {
        Self {
            id: entity.id,
            module_id: entity.module_id,
            name: entity.name,
            is_default: entity.is_default,
            definition: entity.definition,
        }
    }
}

impl From<&NewSavedView> for entity::view::ActiveModel {
    fn from(model: &NewSavedView) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: NotSet,
            module_id: Set(model.module_id),
            name: Set(model.name.clone()),
            is_default: Set(model.is_default),
            definition: Set(model.definition.clone()),
        }
    }
}

impl From<entity::report::Model> for Report {
    fn from(entity: entity::report::Model) -> Self {
        Self {
            id: entity.id,
            module_id: entity.module_id,
            name: entity.name,
            description: entity.description,
            report_type: entity.r#type,
            chart_type: entity.chart_type,
            is_public: entity.is_public,
            definition: entity.definition,
        }
    }
}

impl From<&NewReport> for entity::report::ActiveModel {
    fn from(model: &NewReport) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: NotSet,
            module_id: Set(model.module_id),
            name: Set(model.name.clone()),
            description: Set(model.description.clone()),
            r#type: Set(model.report_type.clone()),
            chart_type: Set(model.chart_type.clone()),
            is_public: Set(model.is_public),
            definition: Set(model.definition.clone()),
        }
    }
}

impl From<entity::dashboard::Model> for Dashboard {
    fn from(entity: entity::dashboard::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            is_default: entity.is_default,
        }
    }
}

impl From<&NewDashboard> for entity::dashboard::ActiveModel {
    fn from(model: &NewDashboard) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: NotSet,
            name: Set(model.name.clone()),
            description: Set(model.description.clone()),
            is_default: Set(model.is_default),
        }
    }
}

fn position_to_json(position: &GridPosition) -> Value {
    json!({ "x": position.x, "y": position.y, "w": position.w, "h": position.h })
}

fn position_from_json(value: &Value) -> anyhow::Result<GridPosition> {
    let field = |name: &str| -> anyhow::Result<u32> {
        let raw = value
            .get(name)
            .and_then(Value::as_u64)
            .ok_or_else(|| anyhow!("grid position is missing '{}'", name))?;
        Ok(u32::try_from(raw)?)
    };
    Ok(GridPosition {
        x: field("x")?,
        y: field("y")?,
        w: field("w")?,
        h: field("h")?,
    })
}

impl TryFrom<entity::dashboard_widget::Model> for DashboardWidget {
    type Error = anyhow::Error;

    fn try_from(entity: entity::dashboard_widget::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            grid_position: position_from_json(&entity.grid_position)?,
            id: entity.id,
            dashboard_id: entity.dashboard_id,
            title: entity.title,
            widget_type: entity.r#type,
            config: entity.config,
        })
    }
}

impl From<&NewDashboardWidget> for entity::dashboard_widget::ActiveModel {
    fn from(model: &NewDashboardWidget) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: NotSet,
            dashboard_id: Set(model.dashboard_id),
            title: Set(model.title.clone()),
            r#type: Set(model.widget_type.clone()),
            config: Set(model.config.clone()),
            grid_position: Set(position_to_json(&model.grid_position)),
        }
    }
}

// ===== Module Record Conversions =====

impl From<&NewModuleRecord> for entity::module_record::ActiveModel {
    fn from(model: &NewModuleRecord) -> Self {
        use sea_orm::ActiveValue::*;

        let now = Utc::now();
        Self {
            id: NotSet,
            module_id: Set(model.module_id),
            data: Set(model.data.clone()),
            created_by: Set(model.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

// ===== Workflow and Blueprint Conversions =====

impl From<entity::workflow::Model> for Workflow {
    fn from(entity: entity::workflow::Model) -> Self {
        Self {
            id: entity.id,
            module_id: entity.module_id,
            name: entity.name,
            description: entity.description,
            trigger_type: entity.trigger_type,
            trigger_config: entity.trigger_config,
            is_active: entity.is_active,
            created_by: entity.created_by,
        }
    }
}

impl From<&NewWorkflow> for entity::workflow::ActiveModel {
    fn from(model: &NewWorkflow) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: NotSet,
            module_id: Set(model.module_id),
            name: Set(model.name.clone()),
            description: Set(model.description.clone()),
            trigger_type: Set(model.trigger_type.clone()),
            trigger_config: Set(model.trigger_config.clone()),
            is_active: Set(model.is_active),
            created_by: Set(model.created_by),
            created_at: Set(Utc::now()),
        }
    }
}

impl From<entity::workflow_step::Model> for WorkflowStep {
    fn from(entity: entity::workflow_step::Model) -> Self {
        Self {
            id: entity.id,
            workflow_id: entity.workflow_id,
            step_order: entity.step_order,
            action_type: entity.action_type,
            action_config: entity.action_config,
        }
    }
}

impl From<&NewWorkflowStep> for entity::workflow_step::ActiveModel {
    fn from(model: &NewWorkflowStep) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: NotSet,
            workflow_id: Set(model.workflow_id),
            step_order: Set(model.step_order),
            action_type: Set(model.action_type.clone()),
            action_config: Set(model.action_config.clone()),
        }
    }
}

impl From<entity::workflow_execution::Model> for WorkflowExecution {
    fn from(entity: entity::workflow_execution::Model) -> Self {
        Self {
            id: entity.id,
            workflow_id: entity.workflow_id,
            status: entity.status,
            triggered_by: entity.triggered_by,
            started_at: entity.started_at,
            completed_at: entity.completed_at,
        }
    }
}

impl From<&NewWorkflowExecution> for entity::workflow_execution::ActiveModel {
    fn from(model: &NewWorkflowExecution) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: NotSet,
            workflow_id: Set(model.workflow_id),
            status: Set(model.status.clone()),
            triggered_by: Set(model.triggered_by),
            started_at: Set(model.started_at),
            completed_at: Set(model.completed_at),
        }
    }
}

impl From<entity::blueprint::Model> for Blueprint {
    fn from(entity: entity::blueprint::Model) -> Self {
        Self {
            id: entity.id,
            module_id: entity.module_id,
            name: entity.name,
            field_api_name: entity.field_api_name,
            is_active: entity.is_active,
            created_by: entity.created_by,
        }
    }
}

impl From<&NewBlueprint> for entity::blueprint::ActiveModel {
    fn from(model: &NewBlueprint) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: NotSet,
            module_id: Set(model.module_id),
            name: Set(model.name.clone()),
            field_api_name: Set(model.field_api_name.clone()),
            is_active: Set(model.is_active),
            created_by: Set(model.created_by),
        }
    }
}

impl From<entity::blueprint_state::Model> for BlueprintState {
    fn from(entity: entity::blueprint_state::Model) -> Self {
        Self {
            id: entity.id,
            blueprint_id: entity.blueprint_id,
            name: entity.name,
            color: entity.color,
            is_initial: entity.is_initial,
            is_final: entity.is_final,
            display_order: entity.display_order,
        }
    }
}

impl From<&NewBlueprintState> for entity::blueprint_state::ActiveModel {
    fn from(model: &NewBlueprintState) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: NotSet,
            blueprint_id: Set(model.blueprint_id),
            name: Set(model.name.clone()),
            color: Set(model.color.clone()),
            is_initial: Set(model.is_initial),
            is_final: Set(model.is_final),
            display_order: Set(model.display_order),
        }
    }
}

impl From<entity::blueprint_transition::Model> for BlueprintTransition {
    fn from(entity: entity::blueprint_transition::Model) -> Self {
        Self {
            id: entity.id,
            blueprint_id: entity.blueprint_id,
            from_state_id: entity.from_state_id,
            to_state_id: entity.to_state_id,
            name: entity.name,
        }
    }
}

impl From<&NewBlueprintTransition> for entity::blueprint_transition::ActiveModel {
    fn from(model: &NewBlueprintTransition) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: NotSet,
            blueprint_id: Set(model.blueprint_id),
            from_state_id: Set(model.from_state_id),
            to_state_id: Set(model.to_state_id),
            name: Set(model.name.clone()),
        }
    }
}

// ===== Email Conversions =====

impl From<entity::email_account::Model> for EmailAccount {
    fn from(entity: entity::email_account::Model) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            name: entity.name,
            email_address: entity.email_address,
            provider: entity.provider,
            is_default: entity.is_default,
        }
    }
}

impl From<&NewEmailAccount> for entity::email_account::ActiveModel {
    fn from(model: &NewEmailAccount) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: NotSet,
            user_id: Set(model.user_id),
            name: Set(model.name.clone()),
            email_address: Set(model.email_address.clone()),
            provider: Set(model.provider.clone()),
            is_default: Set(model.is_default),
        }
    }
}

impl From<&NewEmailMessage> for entity::email_message::ActiveModel {
    fn from(model: &NewEmailMessage) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: NotSet,
            account_id: Set(model.account_id),
            direction: Set(model.direction.clone()),
            from_email: Set(model.from_email.clone()),
            to_email: Set(model.to_email.clone()),
            subject: Set(model.subject.clone()),
            body: Set(model.body.clone()),
            sent_at: Set(model.sent_at),
        }
    }
}

impl From<entity::email_template::Model> for EmailTemplate {
    fn from(entity: entity::email_template::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            category: entity.category,
            subject: entity.subject,
            body: entity.body,
            created_by: entity.created_by,
        }
    }
}

impl From<&NewEmailTemplate> for entity::email_template::ActiveModel {
    fn from(model: &NewEmailTemplate) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: NotSet,
            name: Set(model.name.clone()),
            category: Set(model.category.clone()),
            subject: Set(model.subject.clone()),
            body: Set(model.body.clone()),
            created_by: Set(model.created_by),
        }
    }
}

// ===== Audit and Integration Conversions =====

impl From<&NewAuditLog> for entity::audit_log::ActiveModel {
    fn from(model: &NewAuditLog) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: NotSet,
            user_id: Set(model.user_id),
            event: Set(model.event.clone()),
            auditable_type: Set(model.auditable_type.clone()),
            auditable_id: Set(model.auditable_id),
            old_values: Set(model.old_values.clone()),
            new_values: Set(model.new_values.clone()),
            created_at: Set(Utc::now()),
        }
    }
}

impl From<entity::data_import::Model> for DataImport {
    fn from(entity: entity::data_import::Model) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            module_id: entity.module_id,
            file_name: entity.file_name,
            status: entity.status,
            total_rows: entity.total_rows,
            imported_rows: entity.imported_rows,
            failed_rows: entity.failed_rows,
        }
    }
}

impl From<&NewDataImport> for entity::data_import::ActiveModel {
    fn from(model: &NewDataImport) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: NotSet,
            user_id: Set(model.user_id),
            module_id: Set(model.module_id),
            file_name: Set(model.file_name.clone()),
            status: Set(model.status.clone()),
            total_rows: Set(model.total_rows),
            imported_rows: Set(model.imported_rows),
            failed_rows: Set(model.failed_rows),
        }
    }
}

impl From<entity::data_export::Model> for DataExport {
    fn from(entity: entity::data_export::Model) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            module_id: entity.module_id,
            file_name: entity.file_name,
            format: entity.format,
            status: entity.status,
            record_count: entity.record_count,
        }
    }
}

impl From<&NewDataExport> for entity::data_export::ActiveModel {
    fn from(model: &NewDataExport) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: NotSet,
            user_id: Set(model.user_id),
            module_id: Set(model.module_id),
            file_name: Set(model.file_name.clone()),
            format: Set(model.format.clone()),
            status: Set(model.status.clone()),
            record_count: Set(model.record_count),
        }
    }
}

impl From<entity::api_key::Model> for ApiKey {
    fn from(entity: entity::api_key::Model) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            name: entity.name,
            prefix: entity.prefix,
            key_hash: entity.key_hash,
            scopes: entity.scopes,
            expires_at: entity.expires_at,
        }
    }
}

impl From<&NewApiKey> for entity::api_key::ActiveModel {
    fn from(model: &NewApiKey) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: NotSet,
            user_id: Set(model.user_id),
            name: Set(model.name.clone()),
            prefix: Set(model.prefix.clone()),
            key_hash: Set(model.key_hash.clone()),
            scopes: Set(model.scopes.clone()),
            expires_at: Set(model.expires_at),
        }
    }
}

impl From<entity::webhook::Model> for Webhook {
    fn from(entity: entity::webhook::Model) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            module_id: entity.module_id,
            name: entity.name,
            url: entity.url,
            events: entity.events,
            secret: entity.secret,
            is_active: entity.is_active,
        }
    }
}

impl From<&NewWebhook> for entity::webhook::ActiveModel {
    fn from(model: &NewWebhook) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: NotSet,
            user_id: Set(model.user_id),
            module_id: Set(model.module_id),
            name: Set(model.name.clone()),
            url: Set(model.url.clone()),
            events: Set(model.events.clone()),
            secret: Set(model.secret.clone()),
            is_active: Set(model.is_active),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_position_survives_json_column() {
        let position = GridPosition { x: 6, y: 4, w: 6, h: 4 };
        let value = position_to_json(&position);
        assert_eq!(position_from_json(&value).unwrap(), position);
    }

    #[test]
    fn malformed_grid_position_is_an_error() {
        assert!(position_from_json(&json!({ "x": 0, "y": 0, "w": 3 })).is_err());
        assert!(position_from_json(&json!({ "x": -1, "y": 0, "w": 3, "h": 2 })).is_err());
    }

    #[test]
    fn module_permission_with_unknown_access_level_is_rejected() {
        let row = entity::module_permission::Model {
            id: 1,
            role_id: 1,
            module_id: 1,
            can_view: true,
            can_create: false,
            can_edit: false,
            can_delete: false,
            can_export: false,
            can_import: false,
            record_access_level: "team".to_string(),
            field_restrictions: json!([]),
        };
        assert!(ModulePermission::try_from(row).is_err());
    }
}
