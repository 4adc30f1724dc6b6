//! SeaORM repository implementations

use crate::config::TENANT_PLACEHOLDER;
use crate::contract::{
    ApiKey, Blueprint, BlueprintState, BlueprintTransition, Dashboard, DashboardWidget, DataExport,
    DataImport, Domain, EmailAccount, EmailTemplate, Module, ModulePermission, NewApiKey,
    NewAuditLog, NewBlueprint, NewBlueprintState, NewBlueprintTransition, NewDashboard,
    NewDashboardWidget, NewDataExport, NewDataImport, NewEmailAccount, NewEmailMessage,
    NewEmailTemplate, NewModule, NewModulePermission, NewModuleRecord, NewPipeline, NewReport,
    NewSavedView, NewStage, NewSubscription, NewTenant, NewUser, NewWebhook, NewWorkflow,
    NewWorkflowExecution, NewWorkflowStep, Permission, Pipeline, Report, Role, SavedView, Stage,
    Subscription, Tenant, User, Webhook, Workflow, WorkflowExecution, WorkflowStep,
};
use crate::domain::repository::{
    AuditLogRepository, AutomationRepository, DashboardRepository, EmailRepository,
    IntegrationRepository, ModulePermissionRepository, ModuleRepository, PipelineRepository,
    RecordRepository, ReportRepository, RoleRepository, SubscriptionRepository, TenantRepository,
    TenantStore, TenantStoreFactory, UserRepository, ViewRepository,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::entity;
use super::{connect, migrate_tenant};

// ===== Tenant Repository =====

pub struct SeaOrmTenantRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmTenantRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TenantRepository for SeaOrmTenantRepository {
    async fn find(&self, tenant_id: &str) -> Result<Option<Tenant>> {
        entity::tenant::Entity::find_by_id(tenant_id.to_string())
            .one(&*self.db)
            .await?
            .map(Tenant::try_from)
            .transpose()
    }

    async fn insert(&self, tenant: &NewTenant) -> Result<(Tenant, Domain)> {
        use sea_orm::ActiveValue::*;

        let txn = self.db.begin().await?;

        let active = entity::tenant::ActiveModel::try_from(tenant)?;
        let tenant_row = entity::tenant::Entity::insert(active)
            .exec_with_returning(&txn)
            .await?;

        let domain = entity::domain::ActiveModel {
            id: NotSet,
            domain: Set(tenant.domain.clone()),
            tenant_id: Set(tenant.id.clone()),
        };
        let domain_row = entity::domain::Entity::insert(domain)
            .exec_with_returning(&txn)
            .await?;

        txn.commit().await?;
        Ok((tenant_row.try_into()?, domain_row.into()))
    }

    async fn find_domain(&self, tenant_id: &str) -> Result<Option<Domain>> {
        let result = entity::domain::Entity::find()
            .filter(entity::domain::Column::TenantId.eq(tenant_id))
            .one(&*self.db)
            .await?;

        Ok(result.map(|e| e.into()))
    }

    async fn list_all(&self) -> Result<Vec<Tenant>> {
        entity::tenant::Entity::find()
            .order_by_asc(entity::tenant::Column::Id)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(Tenant::try_from)
            .collect()
    }
}

// ===== Module Repository =====

pub struct SeaOrmModuleRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmModuleRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ModuleRepository for SeaOrmModuleRepository {
    async fn find_by_api_name(&self, api_name: &str) -> Result<Option<Module>> {
        let result = entity::module::Entity::find()
            .filter(entity::module::Column::ApiName.eq(api_name))
            .one(&*self.db)
            .await?;

        Ok(result.map(|e| e.into()))
    }

    async fn list_all(&self) -> Result<Vec<Module>> {
        let results = entity::module::Entity::find()
            .order_by_asc(entity::module::Column::DisplayOrder)
            .order_by_asc(entity::module::Column::Id)
            .all(&*self.db)
            .await?;

        Ok(results.into_iter().map(|e| e.into()).collect())
    }

    async fn create(&self, module: &NewModule) -> Result<Module> {
        let active: entity::module::ActiveModel = module.into();
        let result = entity::module::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        Ok(result.into())
    }
}

// ===== Pipeline Repository =====

pub struct SeaOrmPipelineRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmPipelineRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PipelineRepository for SeaOrmPipelineRepository {
    async fn find_pipeline(&self, module_id: i64, name: &str) -> Result<Option<Pipeline>> {
        let result = entity::pipeline::Entity::find()
            .filter(entity::pipeline::Column::ModuleId.eq(module_id))
            .filter(entity::pipeline::Column::Name.eq(name))
            .order_by_asc(entity::pipeline::Column::Id)
            .one(&*self.db)
            .await?;

        Ok(result.map(|e| e.into()))
    }

    async fn list_for_module(&self, module_id: i64) -> Result<Vec<Pipeline>> {
        let results = entity::pipeline::Entity::find()
            .filter(entity::pipeline::Column::ModuleId.eq(module_id))
            .order_by_asc(entity::pipeline::Column::Id)
            .all(&*self.db)
            .await?;

        Ok(results.into_iter().map(|e| e.into()).collect())
    }

    async fn create_pipeline(&self, pipeline: &NewPipeline) -> Result<Pipeline> {
        let active: entity::pipeline::ActiveModel = pipeline.into();
        let result = entity::pipeline::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        Ok(result.into())
    }

    async fn find_stage(&self, pipeline_id: i64, name: &str) -> Result<Option<Stage>> {
        let result = entity::stage::Entity::find()
            .filter(entity::stage::Column::PipelineId.eq(pipeline_id))
            .filter(entity::stage::Column::Name.eq(name))
            .one(&*self.db)
            .await?;

        Ok(result.map(|e| e.into()))
    }

    async fn list_stages(&self, pipeline_id: i64) -> Result<Vec<Stage>> {
        let results = entity::stage::Entity::find()
            .filter(entity::stage::Column::PipelineId.eq(pipeline_id))
            .order_by_asc(entity::stage::Column::DisplayOrder)
            .all(&*self.db)
            .await?;

        Ok(results.into_iter().map(|e| e.into()).collect())
    }

    async fn create_stage(&self, stage: &NewStage) -> Result<Stage> {
        let active: entity::stage::ActiveModel = stage.into();
        let result = entity::stage::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        Ok(result.into())
    }
}

// ===== Role Repository =====

pub struct SeaOrmRoleRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmRoleRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoleRepository for SeaOrmRoleRepository {
    async fn find_permission(&self, name: &str) -> Result<Option<Permission>> {
        let result = entity::permission::Entity::find()
            .filter(entity::permission::Column::Name.eq(name))
            .one(&*self.db)
            .await?;

        Ok(result.map(|e| e.into()))
    }

    async fn create_permission(&self, name: &str, guard_name: &str) -> Result<Permission> {
        use sea_orm::ActiveValue::*;

        let active = entity::permission::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            guard_name: Set(guard_name.to_string()),
        };
        let result = entity::permission::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        Ok(result.into())
    }

    async fn list_permissions(&self) -> Result<Vec<Permission>> {
        let results = entity::permission::Entity::find()
            .order_by_asc(entity::permission::Column::Id)
            .all(&*self.db)
            .await?;

        Ok(results.into_iter().map(|e| e.into()).collect())
    }

    async fn find_role(&self, name: &str) -> Result<Option<Role>> {
        let result = entity::role::Entity::find()
            .filter(entity::role::Column::Name.eq(name))
            .one(&*self.db)
            .await?;

        Ok(result.map(|e| e.into()))
    }

    async fn create_role(&self, name: &str, guard_name: &str) -> Result<Role> {
        use sea_orm::ActiveValue::*;

        let active = entity::role::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            guard_name: Set(guard_name.to_string()),
        };
        let result = entity::role::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        Ok(result.into())
    }

    async fn list_roles(&self) -> Result<Vec<Role>> {
        let results = entity::role::Entity::find()
            .order_by_asc(entity::role::Column::Id)
            .all(&*self.db)
            .await?;

        Ok(results.into_iter().map(|e| e.into()).collect())
    }

    async fn sync_permissions(&self, role_id: i64, permission_ids: &[i64]) -> Result<()> {
        use sea_orm::ActiveValue::Set;

        let txn = self.db.begin().await?;

        entity::role_permission::Entity::delete_many()
            .filter(entity::role_permission::Column::RoleId.eq(role_id))
            .exec(&txn)
            .await?;

        if !permission_ids.is_empty() {
            let rows = permission_ids
                .iter()
                .map(|&permission_id| entity::role_permission::ActiveModel {
                    role_id: Set(role_id),
                    permission_id: Set(permission_id),
                });
            entity::role_permission::Entity::insert_many(rows)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    async fn role_permissions(&self, role_id: i64) -> Result<Vec<Permission>> {
        let permission_ids: Vec<i64> = entity::role_permission::Entity::find()
            .filter(entity::role_permission::Column::RoleId.eq(role_id))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|row| row.permission_id)
            .collect();

        if permission_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = entity::permission::Entity::find()
            .filter(entity::permission::Column::Id.is_in(permission_ids))
            .order_by_asc(entity::permission::Column::Id)
            .all(&*self.db)
            .await?;

        Ok(results.into_iter().map(|e| e.into()).collect())
    }
}

// ===== Module Permission Repository =====

pub struct SeaOrmModulePermissionRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmModulePermissionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ModulePermissionRepository for SeaOrmModulePermissionRepository {
    async fn find(&self, role_id: i64, module_id: i64) -> Result<Option<ModulePermission>> {
        entity::module_permission::Entity::find()
            .filter(entity::module_permission::Column::RoleId.eq(role_id))
            .filter(entity::module_permission::Column::ModuleId.eq(module_id))
            .one(&*self.db)
            .await?
            .map(ModulePermission::try_from)
            .transpose()
    }

    async fn create(&self, permission: &NewModulePermission) -> Result<ModulePermission> {
        let active: entity::module_permission::ActiveModel = permission.into();
        let result = entity::module_permission::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        result.try_into()
    }
}

// ===== User Repository =====

pub struct SeaOrmUserRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmUserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let result = entity::user::Entity::find()
            .filter(entity::user::Column::Email.eq(email))
            .one(&*self.db)
            .await?;

        Ok(result.map(|e| e.into()))
    }

    async fn first(&self) -> Result<Option<User>> {
        let result = entity::user::Entity::find()
            .order_by_asc(entity::user::Column::Id)
            .one(&*self.db)
            .await?;

        Ok(result.map(|e| e.into()))
    }

    async fn create(&self, user: &NewUser) -> Result<User> {
        let active: entity::user::ActiveModel = user.into();
        let result = entity::user::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        Ok(result.into())
    }

    async fn update(&self, user: &User) -> Result<User> {
        use sea_orm::ActiveValue::*;

        let active = entity::user::ActiveModel {
            id: Unchanged(user.id),
            name: Set(user.name.clone()),
            password: Set(user.password_hash.clone()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        let result = entity::user::Entity::update(active)
            .exec(&*self.db)
            .await?;

        Ok(result.into())
    }

    async fn assign_role(&self, user_id: i64, role_id: i64) -> Result<()> {
        use sea_orm::ActiveValue::Set;

        let existing = entity::user_role::Entity::find_by_id((user_id, role_id))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Ok(());
        }

        let active = entity::user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_id),
        };
        entity::user_role::Entity::insert(active)
            .exec_without_returning(&*self.db)
            .await?;
        Ok(())
    }

    async fn role_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        let results = entity::user_role::Entity::find()
            .filter(entity::user_role::Column::UserId.eq(user_id))
            .order_by_asc(entity::user_role::Column::RoleId)
            .all(&*self.db)
            .await?;

        Ok(results.into_iter().map(|row| row.role_id).collect())
    }
}

// ===== Subscription Repository =====

pub struct SeaOrmSubscriptionRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmSubscriptionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SubscriptionRepository for SeaOrmSubscriptionRepository {
    async fn count(&self) -> Result<u64> {
        Ok(entity::subscription::Entity::find()
            .count(&*self.db)
            .await?)
    }

    async fn create(&self, subscription: &NewSubscription) -> Result<Subscription> {
        let active = entity::subscription::ActiveModel::try_from(subscription)?;
        let result = entity::subscription::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        result.try_into()
    }
}

// ===== View Repository =====

pub struct SeaOrmViewRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmViewRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ViewRepository for SeaOrmViewRepository {
    async fn find(&self, module_id: i64, name: &str) -> Result<Option<SavedView>> {
        let result = entity::view::Entity::find()
            .filter(entity::view::Column::ModuleId.eq(module_id))
            .filter(entity::view::Column::Name.eq(name))
            .one(&*self.db)
            .await?;

        Ok(result.map(|e| e.into()))
    }

    async fn create(&self, view: &NewSavedView) -> Result<SavedView> {
        let active: entity::view::ActiveModel = view.into();
        let result = entity::view::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        Ok(result.into())
    }
}

// ===== Report Repository =====

pub struct SeaOrmReportRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmReportRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReportRepository for SeaOrmReportRepository {
    async fn find(&self, module_id: i64, name: &str) -> Result<Option<Report>> {
        let result = entity::report::Entity::find()
            .filter(entity::report::Column::ModuleId.eq(module_id))
            .filter(entity::report::Column::Name.eq(name))
            .one(&*self.db)
            .await?;

        Ok(result.map(|e| e.into()))
    }

    async fn create(&self, report: &NewReport) -> Result<Report> {
        let active: entity::report::ActiveModel = report.into();
        let result = entity::report::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        Ok(result.into())
    }
}

// ===== Dashboard Repository =====

pub struct SeaOrmDashboardRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmDashboardRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DashboardRepository for SeaOrmDashboardRepository {
    async fn find_dashboard(&self, name: &str) -> Result<Option<Dashboard>> {
        let result = entity::dashboard::Entity::find()
            .filter(entity::dashboard::Column::Name.eq(name))
            .one(&*self.db)
            .await?;

        Ok(result.map(|e| e.into()))
    }

    async fn create_dashboard(&self, dashboard: &NewDashboard) -> Result<Dashboard> {
        let active: entity::dashboard::ActiveModel = dashboard.into();
        let result = entity::dashboard::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        Ok(result.into())
    }

    async fn find_widget(&self, dashboard_id: i64, title: &str) -> Result<Option<DashboardWidget>> {
        entity::dashboard_widget::Entity::find()
            .filter(entity::dashboard_widget::Column::DashboardId.eq(dashboard_id))
            .filter(entity::dashboard_widget::Column::Title.eq(title))
            .one(&*self.db)
            .await?
            .map(DashboardWidget::try_from)
            .transpose()
    }

    async fn create_widget(&self, widget: &NewDashboardWidget) -> Result<DashboardWidget> {
        let active: entity::dashboard_widget::ActiveModel = widget.into();
        let result = entity::dashboard_widget::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        result.try_into()
    }
}

// ===== Record Repository =====

pub struct SeaOrmRecordRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmRecordRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordRepository for SeaOrmRecordRepository {
    async fn insert_batch(&self, records: &[NewModuleRecord]) -> Result<Vec<i64>> {
        let txn = self.db.begin().await?;

        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            let active: entity::module_record::ActiveModel = record.into();
            let result = entity::module_record::Entity::insert(active)
                .exec(&txn)
                .await?;
            ids.push(result.last_insert_id);
        }

        txn.commit().await?;
        debug!(rows = ids.len(), "Record batch committed");
        Ok(ids)
    }

    async fn count_for_module(&self, module_id: i64) -> Result<u64> {
        Ok(entity::module_record::Entity::find()
            .filter(entity::module_record::Column::ModuleId.eq(module_id))
            .count(&*self.db)
            .await?)
    }

    async fn first_ids(&self, limit: u64) -> Result<Vec<i64>> {
        Ok(entity::module_record::Entity::find()
            .select_only()
            .column(entity::module_record::Column::Id)
            .order_by_asc(entity::module_record::Column::Id)
            .limit(limit)
            .into_tuple()
            .all(&*self.db)
            .await?)
    }
}

// ===== Automation Repository =====

pub struct SeaOrmAutomationRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmAutomationRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AutomationRepository for SeaOrmAutomationRepository {
    async fn create_workflow(&self, workflow: &NewWorkflow) -> Result<Workflow> {
        let active: entity::workflow::ActiveModel = workflow.into();
        let result = entity::workflow::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        Ok(result.into())
    }

    async fn create_workflow_step(&self, step: &NewWorkflowStep) -> Result<WorkflowStep> {
        let active: entity::workflow_step::ActiveModel = step.into();
        let result = entity::workflow_step::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        Ok(result.into())
    }

    async fn create_workflow_execution(
        &self,
        execution: &NewWorkflowExecution,
    ) -> Result<WorkflowExecution> {
        let active: entity::workflow_execution::ActiveModel = execution.into();
        let result = entity::workflow_execution::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        Ok(result.into())
    }

    async fn create_blueprint(&self, blueprint: &NewBlueprint) -> Result<Blueprint> {
        let active: entity::blueprint::ActiveModel = blueprint.into();
        let result = entity::blueprint::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        Ok(result.into())
    }

    async fn create_blueprint_state(&self, state: &NewBlueprintState) -> Result<BlueprintState> {
        let active: entity::blueprint_state::ActiveModel = state.into();
        let result = entity::blueprint_state::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        Ok(result.into())
    }

    async fn create_blueprint_transition(
        &self,
        transition: &NewBlueprintTransition,
    ) -> Result<BlueprintTransition> {
        let active: entity::blueprint_transition::ActiveModel = transition.into();
        let result = entity::blueprint_transition::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        Ok(result.into())
    }
}

// ===== Email Repository =====

pub struct SeaOrmEmailRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmEmailRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EmailRepository for SeaOrmEmailRepository {
    async fn create_account(&self, account: &NewEmailAccount) -> Result<EmailAccount> {
        let active: entity::email_account::ActiveModel = account.into();
        let result = entity::email_account::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        Ok(result.into())
    }

    async fn insert_messages(&self, messages: &[NewEmailMessage]) -> Result<usize> {
        let txn = self.db.begin().await?;

        for message in messages {
            let active: entity::email_message::ActiveModel = message.into();
            entity::email_message::Entity::insert(active)
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        debug!(rows = messages.len(), "Email message batch committed");
        Ok(messages.len())
    }

    async fn create_template(&self, template: &NewEmailTemplate) -> Result<EmailTemplate> {
        let active: entity::email_template::ActiveModel = template.into();
        let result = entity::email_template::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        Ok(result.into())
    }
}

// ===== Audit Log Repository =====

pub struct SeaOrmAuditLogRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmAuditLogRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuditLogRepository for SeaOrmAuditLogRepository {
    async fn insert_batch(&self, entries: &[NewAuditLog]) -> Result<usize> {
        let txn = self.db.begin().await?;

        for entry in entries {
            let active: entity::audit_log::ActiveModel = entry.into();
            entity::audit_log::Entity::insert(active).exec(&txn).await?;
        }

        txn.commit().await?;
        debug!(rows = entries.len(), "Audit log batch committed");
        Ok(entries.len())
    }
}

// ===== Integration Repository =====

pub struct SeaOrmIntegrationRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmIntegrationRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IntegrationRepository for SeaOrmIntegrationRepository {
    async fn create_import(&self, import: &NewDataImport) -> Result<DataImport> {
        let active: entity::data_import::ActiveModel = import.into();
        let result = entity::data_import::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        Ok(result.into())
    }

    async fn create_export(&self, export: &NewDataExport) -> Result<DataExport> {
        let active: entity::data_export::ActiveModel = export.into();
        let result = entity::data_export::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        Ok(result.into())
    }

    async fn create_api_key(&self, key: &NewApiKey) -> Result<ApiKey> {
        let active: entity::api_key::ActiveModel = key.into();
        let result = entity::api_key::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        Ok(result.into())
    }

    async fn create_webhook(&self, webhook: &NewWebhook) -> Result<Webhook> {
        let active: entity::webhook::ActiveModel = webhook.into();
        let result = entity::webhook::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        Ok(result.into())
    }
}

// ===== Tenant Store Factory =====

/// Build every tenant repository over one connection
pub fn tenant_store(db: Arc<DatabaseConnection>) -> TenantStore {
    TenantStore {
        modules: Arc::new(SeaOrmModuleRepository::new(db.clone())),
        pipelines: Arc::new(SeaOrmPipelineRepository::new(db.clone())),
        roles: Arc::new(SeaOrmRoleRepository::new(db.clone())),
        module_permissions: Arc::new(SeaOrmModulePermissionRepository::new(db.clone())),
        users: Arc::new(SeaOrmUserRepository::new(db.clone())),
        subscriptions: Arc::new(SeaOrmSubscriptionRepository::new(db.clone())),
        views: Arc::new(SeaOrmViewRepository::new(db.clone())),
        reports: Arc::new(SeaOrmReportRepository::new(db.clone())),
        dashboards: Arc::new(SeaOrmDashboardRepository::new(db.clone())),
        records: Arc::new(SeaOrmRecordRepository::new(db.clone())),
        automation: Arc::new(SeaOrmAutomationRepository::new(db.clone())),
        email: Arc::new(SeaOrmEmailRepository::new(db.clone())),
        audit_logs: Arc::new(SeaOrmAuditLogRepository::new(db.clone())),
        integrations: Arc::new(SeaOrmIntegrationRepository::new(db)),
    }
}

/// Opens tenant databases from a URL template and keeps them migrated
///
/// `{tenant}` in the template is replaced by the tenant id. Connections are
/// cached per tenant for the lifetime of the factory.
pub struct SeaOrmTenantStoreFactory {
    url_template: String,
    connections: Mutex<HashMap<String, Arc<DatabaseConnection>>>,
}

impl SeaOrmTenantStoreFactory {
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            connections: Mutex::new(HashMap::new()),
        }
    }

    fn url_for(&self, tenant_id: &str) -> String {
        self.url_template.replace(TENANT_PLACEHOLDER, tenant_id)
    }
}

#[async_trait]
impl TenantStoreFactory for SeaOrmTenantStoreFactory {
    async fn open(&self, tenant_id: &str) -> Result<TenantStore> {
        if let Some(db) = self.connections.lock().get(tenant_id).cloned() {
            return Ok(tenant_store(db));
        }

        let db = Arc::new(connect(&self.url_for(tenant_id)).await?);
        migrate_tenant(&db).await?;
        info!(tenant = %tenant_id, "Tenant database ready");

        let db = self
            .connections
            .lock()
            .entry(tenant_id.to_string())
            .or_insert(db)
            .clone();
        Ok(tenant_store(db))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    #[test]
    fn tenant_url_substitutes_placeholder() {
        let factory = SeaOrmTenantStoreFactory::new(Config::default().tenant_database_url);
        assert_eq!(
            factory.url_for("techco"),
            "sqlite://data/tenant_techco.sqlite?mode=rwc"
        );
    }
}
