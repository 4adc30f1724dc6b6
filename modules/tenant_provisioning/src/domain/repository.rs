//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! SeaORM implementations are in infra/storage/repositories.rs, the
//! in-memory implementation is in infra/memory.rs.
//!
//! Tenant-scoped repositories never take a tenant id: a [`TenantStore`] is
//! opened for exactly one tenant database and every call goes there.

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
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

// ===== Central database =====

/// Repository for tenants and their domain bindings
#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// Find a tenant by id
    async fn find(&self, tenant_id: &str) -> Result<Option<Tenant>>;

    /// Insert a tenant together with its domain record
    async fn insert(&self, tenant: &NewTenant) -> Result<(Tenant, Domain)>;

    /// Find the domain bound to a tenant
    async fn find_domain(&self, tenant_id: &str) -> Result<Option<Domain>>;

    /// List all tenants ordered by id
    async fn list_all(&self) -> Result<Vec<Tenant>>;
}

// ===== Tenant database =====

/// Repository for module definitions
#[async_trait]
pub trait ModuleRepository: Send + Sync {
    async fn find_by_api_name(&self, api_name: &str) -> Result<Option<Module>>;

    /// List all modules ordered by display order
    async fn list_all(&self) -> Result<Vec<Module>>;

    async fn create(&self, module: &NewModule) -> Result<Module>;
}

/// Repository for pipelines and their stages
#[async_trait]
pub trait PipelineRepository: Send + Sync {
    /// First pipeline matching (module, name)
    async fn find_pipeline(&self, module_id: i64, name: &str) -> Result<Option<Pipeline>>;

    /// Pipelines of a module ordered by id
    async fn list_for_module(&self, module_id: i64) -> Result<Vec<Pipeline>>;

    async fn create_pipeline(&self, pipeline: &NewPipeline) -> Result<Pipeline>;

    async fn find_stage(&self, pipeline_id: i64, name: &str) -> Result<Option<Stage>>;

    /// Stages of a pipeline ordered by display order
    async fn list_stages(&self, pipeline_id: i64) -> Result<Vec<Stage>>;

    async fn create_stage(&self, stage: &NewStage) -> Result<Stage>;
}

/// Repository for roles, permissions and the role-permission relation
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_permission(&self, name: &str) -> Result<Option<Permission>>;

    async fn create_permission(&self, name: &str, guard_name: &str) -> Result<Permission>;

    /// List all permissions ordered by id
    async fn list_permissions(&self) -> Result<Vec<Permission>>;

    async fn find_role(&self, name: &str) -> Result<Option<Role>>;

    async fn create_role(&self, name: &str, guard_name: &str) -> Result<Role>;

    /// List all roles ordered by id
    async fn list_roles(&self) -> Result<Vec<Role>>;

    /// Replace the role's permission set with exactly `permission_ids`
    async fn sync_permissions(&self, role_id: i64, permission_ids: &[i64]) -> Result<()>;

    /// Permissions currently granted to a role
    async fn role_permissions(&self, role_id: i64) -> Result<Vec<Permission>>;
}

/// Repository for per-(role, module) access grants
#[async_trait]
pub trait ModulePermissionRepository: Send + Sync {
    async fn find(&self, role_id: i64, module_id: i64) -> Result<Option<ModulePermission>>;

    async fn create(&self, permission: &NewModulePermission) -> Result<ModulePermission>;
}

/// Repository for tenant users and their role assignments
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// User with the lowest id, used as owner of generated records
    async fn first(&self) -> Result<Option<User>>;

    async fn create(&self, user: &NewUser) -> Result<User>;

    /// Update name and password hash of an existing user
    async fn update(&self, user: &User) -> Result<User>;

    /// Assign a role; assigning an already held role is a no-op
    async fn assign_role(&self, user_id: i64, role_id: i64) -> Result<()>;

    async fn role_ids(&self, user_id: i64) -> Result<Vec<i64>>;
}

/// Repository for the tenant billing subscription
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn count(&self) -> Result<u64>;

    async fn create(&self, subscription: &NewSubscription) -> Result<Subscription>;
}

/// Repository for saved table views
#[async_trait]
pub trait ViewRepository: Send + Sync {
    async fn find(&self, module_id: i64, name: &str) -> Result<Option<SavedView>>;

    async fn create(&self, view: &NewSavedView) -> Result<SavedView>;
}

/// Repository for saved reports
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn find(&self, module_id: i64, name: &str) -> Result<Option<Report>>;

    async fn create(&self, report: &NewReport) -> Result<Report>;
}

/// Repository for dashboards and widgets
#[async_trait]
pub trait DashboardRepository: Send + Sync {
    async fn find_dashboard(&self, name: &str) -> Result<Option<Dashboard>>;

    async fn create_dashboard(&self, dashboard: &NewDashboard) -> Result<Dashboard>;

    async fn find_widget(&self, dashboard_id: i64, title: &str) -> Result<Option<DashboardWidget>>;

    async fn create_widget(&self, widget: &NewDashboardWidget) -> Result<DashboardWidget>;
}

/// Repository for schema-less module records
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Insert all rows atomically and return their ids in input order
    async fn insert_batch(&self, records: &[NewModuleRecord]) -> Result<Vec<i64>>;

    async fn count_for_module(&self, module_id: i64) -> Result<u64>;

    /// Lowest `limit` record ids across all modules
    async fn first_ids(&self, limit: u64) -> Result<Vec<i64>>;
}

/// Repository for workflows, blueprints and their children
#[async_trait]
pub trait AutomationRepository: Send + Sync {
    async fn create_workflow(&self, workflow: &NewWorkflow) -> Result<Workflow>;

    async fn create_workflow_step(&self, step: &NewWorkflowStep) -> Result<WorkflowStep>;

    async fn create_workflow_execution(
        &self,
        execution: &NewWorkflowExecution,
    ) -> Result<WorkflowExecution>;

    async fn create_blueprint(&self, blueprint: &NewBlueprint) -> Result<Blueprint>;

    async fn create_blueprint_state(&self, state: &NewBlueprintState) -> Result<BlueprintState>;

    async fn create_blueprint_transition(
        &self,
        transition: &NewBlueprintTransition,
    ) -> Result<BlueprintTransition>;
}

/// Repository for mailboxes, their messages and reusable templates
#[async_trait]
pub trait EmailRepository: Send + Sync {
    async fn create_account(&self, account: &NewEmailAccount) -> Result<EmailAccount>;

    /// Insert all messages atomically and return how many were stored
    async fn insert_messages(&self, messages: &[NewEmailMessage]) -> Result<usize>;

    async fn create_template(&self, template: &NewEmailTemplate) -> Result<EmailTemplate>;
}

/// Repository for the audit trail
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Insert all entries atomically and return how many were stored
    async fn insert_batch(&self, entries: &[NewAuditLog]) -> Result<usize>;
}

/// Repository for import and export jobs, API keys and webhooks
#[async_trait]
pub trait IntegrationRepository: Send + Sync {
    async fn create_import(&self, import: &NewDataImport) -> Result<DataImport>;

    async fn create_export(&self, export: &NewDataExport) -> Result<DataExport>;

    async fn create_api_key(&self, key: &NewApiKey) -> Result<ApiKey>;

    async fn create_webhook(&self, webhook: &NewWebhook) -> Result<Webhook>;
}

/// All repositories of one tenant database
#[derive(Clone)]
pub struct TenantStore {
    pub modules: Arc<dyn ModuleRepository>,
    pub pipelines: Arc<dyn PipelineRepository>,
    pub roles: Arc<dyn RoleRepository>,
    pub module_permissions: Arc<dyn ModulePermissionRepository>,
    pub users: Arc<dyn UserRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub views: Arc<dyn ViewRepository>,
    pub reports: Arc<dyn ReportRepository>,
    pub dashboards: Arc<dyn DashboardRepository>,
    pub records: Arc<dyn RecordRepository>,
    pub automation: Arc<dyn AutomationRepository>,
    pub email: Arc<dyn EmailRepository>,
    pub audit_logs: Arc<dyn AuditLogRepository>,
    pub integrations: Arc<dyn IntegrationRepository>,
}

/// Opens the isolated store of a tenant
///
/// Selecting the store is the tenant boundary: nothing in a tenant database
/// carries a tenant id column.
#[async_trait]
pub trait TenantStoreFactory: Send + Sync {
    async fn open(&self, tenant_id: &str) -> Result<TenantStore>;
}
