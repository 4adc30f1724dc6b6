//! In-memory repositories
//!
//! Backs `--dry-run` and the behaviour tests. Unique keys are enforced the
//! same way the SQL schema enforces them, so a logic error that would trip a
//! constraint in the database fails here too.

use crate::contract::{
    ApiKey, AuditLog, Blueprint, BlueprintState, BlueprintTransition, Dashboard, DashboardWidget,
    DataExport, DataImport, Domain, EmailAccount, EmailMessage, EmailTemplate, Module,
    ModulePermission, ModuleRecord, NewApiKey, NewAuditLog, NewBlueprint, NewBlueprintState,
    NewBlueprintTransition, NewDashboard, NewDashboardWidget, NewDataExport, NewDataImport,
    NewEmailAccount, NewEmailMessage, NewEmailTemplate, NewModule, NewModulePermission,
    NewModuleRecord, NewPipeline, NewReport, NewSavedView, NewStage, NewSubscription, NewTenant,
    NewUser, NewWebhook, NewWorkflow, NewWorkflowExecution, NewWorkflowStep, Permission, Pipeline,
    Report, Role, SavedView, Stage, Subscription, Tenant, User, Webhook, Workflow,
    WorkflowExecution, WorkflowStep,
};
use crate::domain::repository::{
    AuditLogRepository, AutomationRepository, DashboardRepository, EmailRepository,
    IntegrationRepository, ModulePermissionRepository, ModuleRepository, PipelineRepository,
    RecordRepository, ReportRepository, RoleRepository, SubscriptionRepository, TenantRepository,
    TenantStore, TenantStoreFactory, UserRepository, ViewRepository,
};
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

fn ensure_unique(taken: bool, constraint: &str) -> Result<()> {
    if taken {
        bail!("unique constraint failed: {}", constraint);
    }
    Ok(())
}

// ===== Central database =====

#[derive(Default)]
pub struct InMemoryTenantRepository {
    tenants: RwLock<BTreeMap<String, (Tenant, Domain)>>,
}

impl InMemoryTenantRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TenantRepository for InMemoryTenantRepository {
    async fn find(&self, tenant_id: &str) -> Result<Option<Tenant>> {
        Ok(self.tenants.read().get(tenant_id).map(|(t, _)| t.clone()))
    }

    async fn insert(&self, tenant: &NewTenant) -> Result<(Tenant, Domain)> {
        let mut tenants = self.tenants.write();
        ensure_unique(tenants.contains_key(&tenant.id), "tenants.id")?;
        ensure_unique(
            tenants.values().any(|(_, d)| d.domain == tenant.domain),
            "domains.domain",
        )?;

        let row = Tenant {
            id: tenant.id.clone(),
            name: tenant.name.clone(),
            plan: tenant.plan,
            limits: tenant.limits,
            created_at: Utc::now(),
        };
        let domain = Domain {
            id: tenants.len() as i64 + 1,
            domain: tenant.domain.clone(),
            tenant_id: tenant.id.clone(),
        };
        tenants.insert(tenant.id.clone(), (row.clone(), domain.clone()));
        Ok((row, domain))
    }

    async fn find_domain(&self, tenant_id: &str) -> Result<Option<Domain>> {
        Ok(self.tenants.read().get(tenant_id).map(|(_, d)| d.clone()))
    }

    async fn list_all(&self) -> Result<Vec<Tenant>> {
        Ok(self.tenants.read().values().map(|(t, _)| t.clone()).collect())
    }
}

// ===== Tenant database =====

#[derive(Default)]
struct Tables {
    last_id: i64,
    modules: Vec<Module>,
    pipelines: Vec<Pipeline>,
    stages: Vec<Stage>,
    permissions: Vec<Permission>,
    roles: Vec<Role>,
    role_permissions: BTreeSet<(i64, i64)>,
    module_permissions: Vec<ModulePermission>,
    users: Vec<User>,
    user_roles: BTreeSet<(i64, i64)>,
    subscriptions: Vec<Subscription>,
    views: Vec<SavedView>,
    reports: Vec<Report>,
    dashboards: Vec<Dashboard>,
    widgets: Vec<DashboardWidget>,
    records: Vec<ModuleRecord>,
    batch_sizes: Vec<usize>,
    workflows: Vec<Workflow>,
    workflow_steps: Vec<WorkflowStep>,
    workflow_executions: Vec<WorkflowExecution>,
    blueprints: Vec<Blueprint>,
    blueprint_states: Vec<BlueprintState>,
    blueprint_transitions: Vec<BlueprintTransition>,
    email_accounts: Vec<EmailAccount>,
    email_messages: Vec<EmailMessage>,
    email_templates: Vec<EmailTemplate>,
    audit_logs: Vec<AuditLog>,
    imports: Vec<DataImport>,
    exports: Vec<DataExport>,
    api_keys: Vec<ApiKey>,
    webhooks: Vec<Webhook>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

/// One tenant database held in memory
#[derive(Default)]
pub struct InMemoryTenantDb {
    tables: RwLock<Tables>,
}

impl InMemoryTenantDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository bundle over this database
    pub fn store(self: &Arc<Self>) -> TenantStore {
        TenantStore {
            modules: self.clone(),
            pipelines: self.clone(),
            roles: self.clone(),
            module_permissions: self.clone(),
            users: self.clone(),
            subscriptions: self.clone(),
            views: self.clone(),
            reports: self.clone(),
            dashboards: self.clone(),
            records: self.clone(),
            automation: self.clone(),
            email: self.clone(),
            audit_logs: self.clone(),
            integrations: self.clone(),
        }
    }

    pub fn records(&self) -> Vec<ModuleRecord> {
        self.tables.read().records.clone()
    }

    /// Row count of every `insert_batch` call, in call order
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.tables.read().batch_sizes.clone()
    }

    pub fn stages(&self) -> Vec<Stage> {
        self.tables.read().stages.clone()
    }

    pub fn views(&self) -> Vec<SavedView> {
        self.tables.read().views.clone()
    }

    pub fn reports(&self) -> Vec<Report> {
        self.tables.read().reports.clone()
    }

    pub fn dashboards(&self) -> Vec<Dashboard> {
        self.tables.read().dashboards.clone()
    }

    pub fn widgets(&self) -> Vec<DashboardWidget> {
        self.tables.read().widgets.clone()
    }

    pub fn module_permissions(&self) -> Vec<ModulePermission> {
        self.tables.read().module_permissions.clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.tables.read().users.clone()
    }

    pub fn user_role_count(&self) -> usize {
        self.tables.read().user_roles.len()
    }

    pub fn subscription_count(&self) -> usize {
        self.tables.read().subscriptions.len()
    }

    pub fn workflows(&self) -> Vec<Workflow> {
        self.tables.read().workflows.clone()
    }

    pub fn workflow_steps(&self) -> Vec<WorkflowStep> {
        self.tables.read().workflow_steps.clone()
    }

    pub fn workflow_executions(&self) -> Vec<WorkflowExecution> {
        self.tables.read().workflow_executions.clone()
    }

    pub fn blueprints(&self) -> Vec<Blueprint> {
        self.tables.read().blueprints.clone()
    }

    pub fn blueprint_states(&self) -> Vec<BlueprintState> {
        self.tables.read().blueprint_states.clone()
    }

    pub fn blueprint_transitions(&self) -> Vec<BlueprintTransition> {
        self.tables.read().blueprint_transitions.clone()
    }

    pub fn email_accounts(&self) -> Vec<EmailAccount> {
        self.tables.read().email_accounts.clone()
    }

    pub fn email_messages(&self) -> Vec<EmailMessage> {
        self.tables.read().email_messages.clone()
    }

    pub fn email_templates(&self) -> Vec<EmailTemplate> {
        self.tables.read().email_templates.clone()
    }

    pub fn audit_logs(&self) -> Vec<AuditLog> {
        self.tables.read().audit_logs.clone()
    }

    pub fn imports(&self) -> Vec<DataImport> {
        self.tables.read().imports.clone()
    }

    pub fn exports(&self) -> Vec<DataExport> {
        self.tables.read().exports.clone()
    }

    pub fn api_keys(&self) -> Vec<ApiKey> {
        self.tables.read().api_keys.clone()
    }

    pub fn webhooks(&self) -> Vec<Webhook> {
        self.tables.read().webhooks.clone()
    }
}

#[async_trait]
impl ModuleRepository for InMemoryTenantDb {
    async fn find_by_api_name(&self, api_name: &str) -> Result<Option<Module>> {
        let tables = self.tables.read();
        Ok(tables.modules.iter().find(|m| m.api_name == api_name).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Module>> {
        let mut modules = self.tables.read().modules.clone();
        modules.sort_by_key(|m| (m.display_order, m.id));
        Ok(modules)
    }

    async fn create(&self, module: &NewModule) -> Result<Module> {
        let mut tables = self.tables.write();
        ensure_unique(
            tables.modules.iter().any(|m| m.api_name == module.api_name),
            "modules.api_name",
        )?;
        let row = Module {
            id: tables.next_id(),
            api_name: module.api_name.clone(),
            name: module.name.clone(),
            singular_name: module.singular_name.clone(),
            icon: module.icon.clone(),
            description: module.description.clone(),
            display_order: module.display_order,
            settings: module.settings.clone(),
            is_active: true,
            created_at: Utc::now(),
        };
        tables.modules.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl PipelineRepository for InMemoryTenantDb {
    async fn find_pipeline(&self, module_id: i64, name: &str) -> Result<Option<Pipeline>> {
        let tables = self.tables.read();
        Ok(tables
            .pipelines
            .iter()
            .find(|p| p.module_id == module_id && p.name == name)
            .cloned())
    }

    async fn list_for_module(&self, module_id: i64) -> Result<Vec<Pipeline>> {
        let tables = self.tables.read();
        Ok(tables
            .pipelines
            .iter()
            .filter(|p| p.module_id == module_id)
            .cloned()
            .collect())
    }

    async fn create_pipeline(&self, pipeline: &NewPipeline) -> Result<Pipeline> {
        let mut tables = self.tables.write();
        ensure_unique(
            tables
                .pipelines
                .iter()
                .any(|p| p.module_id == pipeline.module_id && p.name == pipeline.name),
            "pipelines.module_id, pipelines.name",
        )?;
        let now = Utc::now();
        let row = Pipeline {
            id: tables.next_id(),
            module_id: pipeline.module_id,
            name: pipeline.name.clone(),
            stage_field_api_name: pipeline.stage_field_api_name.clone(),
            is_active: true,
            settings: pipeline.settings.clone(),
            created_by: pipeline.created_by,
            created_at: now,
            updated_at: now,
        };
        tables.pipelines.push(row.clone());
        Ok(row)
    }

    async fn find_stage(&self, pipeline_id: i64, name: &str) -> Result<Option<Stage>> {
        let tables = self.tables.read();
        Ok(tables
            .stages
            .iter()
            .find(|s| s.pipeline_id == pipeline_id && s.name == name)
            .cloned())
    }

    async fn list_stages(&self, pipeline_id: i64) -> Result<Vec<Stage>> {
        let mut stages: Vec<Stage> = self
            .tables
            .read()
            .stages
            .iter()
            .filter(|s| s.pipeline_id == pipeline_id)
            .cloned()
            .collect();
        stages.sort_by_key(|s| (s.display_order, s.id));
        Ok(stages)
    }

    async fn create_stage(&self, stage: &NewStage) -> Result<Stage> {
        let mut tables = self.tables.write();
        ensure_unique(
            tables
                .stages
                .iter()
                .any(|s| s.pipeline_id == stage.pipeline_id && s.name == stage.name),
            "stages.pipeline_id, stages.name",
        )?;
        let row = Stage {
            id: tables.next_id(),
            pipeline_id: stage.pipeline_id,
            name: stage.name.clone(),
            color: stage.color.clone(),
            probability: stage.probability,
            display_order: stage.display_order,
            is_won_stage: stage.is_won_stage,
            is_lost_stage: stage.is_lost_stage,
        };
        tables.stages.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl RoleRepository for InMemoryTenantDb {
    async fn find_permission(&self, name: &str) -> Result<Option<Permission>> {
        let tables = self.tables.read();
        Ok(tables.permissions.iter().find(|p| p.name == name).cloned())
    }

    async fn create_permission(&self, name: &str, guard_name: &str) -> Result<Permission> {
        let mut tables = self.tables.write();
        ensure_unique(
            tables.permissions.iter().any(|p| p.name == name),
            "permissions.name",
        )?;
        let row = Permission {
            id: tables.next_id(),
            name: name.to_string(),
            guard_name: guard_name.to_string(),
        };
        tables.permissions.push(row.clone());
        Ok(row)
    }

    async fn list_permissions(&self) -> Result<Vec<Permission>> {
        Ok(self.tables.read().permissions.clone())
    }

    async fn find_role(&self, name: &str) -> Result<Option<Role>> {
        let tables = self.tables.read();
        Ok(tables.roles.iter().find(|r| r.name == name).cloned())
    }

    async fn create_role(&self, name: &str, guard_name: &str) -> Result<Role> {
        let mut tables = self.tables.write();
        ensure_unique(tables.roles.iter().any(|r| r.name == name), "roles.name")?;
        let row = Role {
            id: tables.next_id(),
            name: name.to_string(),
            guard_name: guard_name.to_string(),
        };
        tables.roles.push(row.clone());
        Ok(row)
    }

    async fn list_roles(&self) -> Result<Vec<Role>> {
        Ok(self.tables.read().roles.clone())
    }

    async fn sync_permissions(&self, role_id: i64, permission_ids: &[i64]) -> Result<()> {
        let mut tables = self.tables.write();
        tables.role_permissions.retain(|(r, _)| *r != role_id);
        for &permission_id in permission_ids {
            tables.role_permissions.insert((role_id, permission_id));
        }
        Ok(())
    }

    async fn role_permissions(&self, role_id: i64) -> Result<Vec<Permission>> {
        let tables = self.tables.read();
        Ok(tables
            .permissions
            .iter()
            .filter(|p| tables.role_permissions.contains(&(role_id, p.id)))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ModulePermissionRepository for InMemoryTenantDb {
    async fn find(&self, role_id: i64, module_id: i64) -> Result<Option<ModulePermission>> {
        let tables = self.tables.read();
        Ok(tables
            .module_permissions
            .iter()
            .find(|p| p.role_id == role_id && p.module_id == module_id)
            .cloned())
    }

    async fn create(&self, permission: &NewModulePermission) -> Result<ModulePermission> {
        let mut tables = self.tables.write();
        ensure_unique(
            tables
                .module_permissions
                .iter()
                .any(|p| p.role_id == permission.role_id && p.module_id == permission.module_id),
            "module_permissions.role_id, module_permissions.module_id",
        )?;
        let row = ModulePermission {
            id: tables.next_id(),
            role_id: permission.role_id,
            module_id: permission.module_id,
            access: permission.access.clone(),
        };
        tables.module_permissions.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl UserRepository for InMemoryTenantDb {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.read();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn first(&self) -> Result<Option<User>> {
        let tables = self.tables.read();
        Ok(tables.users.iter().min_by_key(|u| u.id).cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<User> {
        let mut tables = self.tables.write();
        ensure_unique(
            tables.users.iter().any(|u| u.email == user.email),
            "users.email",
        )?;
        let now = Utc::now();
        let row = User {
            id: tables.next_id(),
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn update(&self, user: &User) -> Result<User> {
        let mut tables = self.tables.write();
        let Some(row) = tables.users.iter_mut().find(|u| u.id == user.id) else {
            bail!("user {} not found", user.id);
        };
        row.name = user.name.clone();
        row.password_hash = user.password_hash.clone();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn assign_role(&self, user_id: i64, role_id: i64) -> Result<()> {
        self.tables.write().user_roles.insert((user_id, role_id));
        Ok(())
    }

    async fn role_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        let tables = self.tables.read();
        Ok(tables
            .user_roles
            .iter()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, r)| *r)
            .collect())
    }
}

#[async_trait]
impl SubscriptionRepository for InMemoryTenantDb {
    async fn count(&self) -> Result<u64> {
        Ok(self.tables.read().subscriptions.len() as u64)
    }

    async fn create(&self, subscription: &NewSubscription) -> Result<Subscription> {
        let mut tables = self.tables.write();
        let row = Subscription {
            id: tables.next_id(),
            plan: subscription.plan,
            status: subscription.status,
            billing_cycle: subscription.billing_cycle,
            seats: subscription.seats,
            price_per_seat_cents: subscription.price_per_seat_cents,
            current_period_start: subscription.current_period_start,
            current_period_end: subscription.current_period_end,
        };
        tables.subscriptions.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl ViewRepository for InMemoryTenantDb {
    async fn find(&self, module_id: i64, name: &str) -> Result<Option<SavedView>> {
        let tables = self.tables.read();
        Ok(tables
            .views
            .iter()
            .find(|v| v.module_id == module_id && v.name == name)
            .cloned())
    }

    async fn create(&self, view: &NewSavedView) -> Result<SavedView> {
        let mut tables = self.tables.write();
        ensure_unique(
            tables
                .views
                .iter()
                .any(|v| v.module_id == view.module_id && v.name == view.name),
            "module_views.module_id, module_views.name",
        )?;
        let row = SavedView {
            id: tables.next_id(),
            module_id: view.module_id,
            name: view.name.clone(),
            is_default: view.is_default,
            definition: view.definition.clone(),
        };
        tables.views.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl ReportRepository for InMemoryTenantDb {
    async fn find(&self, module_id: i64, name: &str) -> Result<Option<Report>> {
        let tables = self.tables.read();
        Ok(tables
            .reports
            .iter()
            .find(|r| r.module_id == module_id && r.name == name)
            .cloned())
    }

    async fn create(&self, report: &NewReport) -> Result<Report> {
        let mut tables = self.tables.write();
        ensure_unique(
            tables
                .reports
                .iter()
                .any(|r| r.module_id == report.module_id && r.name == report.name),
            "reports.module_id, reports.name",
        )?;
        let row = Report {
            id: tables.next_id(),
            module_id: report.module_id,
            name: report.name.clone(),
            description: report.description.clone(),
            report_type: report.report_type.clone(),
            chart_type: report.chart_type.clone(),
            is_public: report.is_public,
            definition: report.definition.clone(),
        };
        tables.reports.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl DashboardRepository for InMemoryTenantDb {
    async fn find_dashboard(&self, name: &str) -> Result<Option<Dashboard>> {
        let tables = self.tables.read();
        Ok(tables.dashboards.iter().find(|d| d.name == name).cloned())
    }

    async fn create_dashboard(&self, dashboard: &NewDashboard) -> Result<Dashboard> {
        let mut tables = self.tables.write();
        ensure_unique(
            tables.dashboards.iter().any(|d| d.name == dashboard.name),
            "dashboards.name",
        )?;
        let row = Dashboard {
            id: tables.next_id(),
            name: dashboard.name.clone(),
            description: dashboard.description.clone(),
            is_default: dashboard.is_default,
        };
        tables.dashboards.push(row.clone());
        Ok(row)
    }

    async fn find_widget(&self, dashboard_id: i64, title: &str) -> Result<Option<DashboardWidget>> {
        let tables = self.tables.read();
        Ok(tables
            .widgets
            .iter()
            .find(|w| w.dashboard_id == dashboard_id && w.title == title)
            .cloned())
    }

    async fn create_widget(&self, widget: &NewDashboardWidget) -> Result<DashboardWidget> {
        let mut tables = self.tables.write();
        ensure_unique(
            tables
                .widgets
                .iter()
                .any(|w| w.dashboard_id == widget.dashboard_id && w.title == widget.title),
            "dashboard_widgets.dashboard_id, dashboard_widgets.title",
        )?;
        let row = DashboardWidget {
            id: tables.next_id(),
            dashboard_id: widget.dashboard_id,
            title: widget.title.clone(),
            widget_type: widget.widget_type.clone(),
            config: widget.config.clone(),
            grid_position: widget.grid_position,
        };
        tables.widgets.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl RecordRepository for InMemoryTenantDb {
    async fn insert_batch(&self, records: &[NewModuleRecord]) -> Result<Vec<i64>> {
        let mut tables = self.tables.write();
        // All-or-nothing, like the SQL transaction
        if let Some(orphan) = records
            .iter()
            .find(|r| !tables.modules.iter().any(|m| m.id == r.module_id))
        {
            bail!("foreign key constraint failed: module {}", orphan.module_id);
        }

        let now = Utc::now();
        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            let id = tables.next_id();
            tables.records.push(ModuleRecord {
                id,
                module_id: record.module_id,
                data: record.data.clone(),
                created_by: record.created_by,
                created_at: now,
                updated_at: now,
            });
            ids.push(id);
        }
        tables.batch_sizes.push(records.len());
        Ok(ids)
    }

    async fn count_for_module(&self, module_id: i64) -> Result<u64> {
        let tables = self.tables.read();
        Ok(tables
            .records
            .iter()
            .filter(|r| r.module_id == module_id)
            .count() as u64)
    }

    async fn first_ids(&self, limit: u64) -> Result<Vec<i64>> {
        let mut ids: Vec<i64> = self.tables.read().records.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.truncate(usize::try_from(limit)?);
        Ok(ids)
    }
}

#[async_trait]
impl AutomationRepository for InMemoryTenantDb {
    async fn create_workflow(&self, workflow: &NewWorkflow) -> Result<Workflow> {
        let mut tables = self.tables.write();
        let row = Workflow {
            id: tables.next_id(),
            module_id: workflow.module_id,
            name: workflow.name.clone(),
            description: workflow.description.clone(),
            trigger_type: workflow.trigger_type.clone(),
            trigger_config: workflow.trigger_config.clone(),
            is_active: workflow.is_active,
            created_by: workflow.created_by,
        };
        tables.workflows.push(row.clone());
        Ok(row)
    }

    async fn create_workflow_step(&self, step: &NewWorkflowStep) -> Result<WorkflowStep> {
        let mut tables = self.tables.write();
        ensure_unique(
            tables
                .workflow_steps
                .iter()
                .any(|s| s.workflow_id == step.workflow_id && s.step_order == step.step_order),
            "workflow_steps.workflow_id, workflow_steps.step_order",
        )?;
        let row = WorkflowStep {
            id: tables.next_id(),
            workflow_id: step.workflow_id,
            step_order: step.step_order,
            action_type: step.action_type.clone(),
            action_config: step.action_config.clone(),
        };
        tables.workflow_steps.push(row.clone());
        Ok(row)
    }

    async fn create_workflow_execution(
        &self,
        execution: &NewWorkflowExecution,
    ) -> Result<WorkflowExecution> {
        let mut tables = self.tables.write();
        let row = WorkflowExecution {
            id: tables.next_id(),
            workflow_id: execution.workflow_id,
            status: execution.status.clone(),
            triggered_by: execution.triggered_by,
            started_at: execution.started_at,
            completed_at: execution.completed_at,
        };
        tables.workflow_executions.push(row.clone());
        Ok(row)
    }

    async fn create_blueprint(&self, blueprint: &NewBlueprint) -> Result<Blueprint> {
        let mut tables = self.tables.write();
        let row = Blueprint {
            id: tables.next_id(),
            module_id: blueprint.module_id,
            name: blueprint.name.clone(),
            field_api_name: blueprint.field_api_name.clone(),
            is_active: blueprint.is_active,
            created_by: blueprint.created_by,
        };
        tables.blueprints.push(row.clone());
        Ok(row)
    }

    async fn create_blueprint_state(&self, state: &NewBlueprintState) -> Result<BlueprintState> {
        let mut tables = self.tables.write();
        ensure_unique(
            tables
                .blueprint_states
                .iter()
                .any(|s| s.blueprint_id == state.blueprint_id && s.name == state.name),
            "blueprint_states.blueprint_id, blueprint_states.name",
        )?;
        let row = BlueprintState {
            id: tables.next_id(),
            blueprint_id: state.blueprint_id,
            name: state.name.clone(),
            color: state.color.clone(),
            is_initial: state.is_initial,
            is_final: state.is_final,
            display_order: state.display_order,
        };
        tables.blueprint_states.push(row.clone());
        Ok(row)
    }

    async fn create_blueprint_transition(
        &self,
        transition: &NewBlueprintTransition,
    ) -> Result<BlueprintTransition> {
        let mut tables = self.tables.write();
        let row = BlueprintTransition {
            id: tables.next_id(),
            blueprint_id: transition.blueprint_id,
            from_state_id: transition.from_state_id,
            to_state_id: transition.to_state_id,
            name: transition.name.clone(),
        };
        tables.blueprint_transitions.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl EmailRepository for InMemoryTenantDb {
    async fn create_account(&self, account: &NewEmailAccount) -> Result<EmailAccount> {
        let mut tables = self.tables.write();
        ensure_unique(
            tables
                .email_accounts
                .iter()
                .any(|a| a.email_address == account.email_address),
            "email_accounts.email_address",
        )?;
        let row = EmailAccount {
            id: tables.next_id(),
            user_id: account.user_id,
            name: account.name.clone(),
            email_address: account.email_address.clone(),
            provider: account.provider.clone(),
            is_default: account.is_default,
        };
        tables.email_accounts.push(row.clone());
        Ok(row)
    }

    async fn insert_messages(&self, messages: &[NewEmailMessage]) -> Result<usize> {
        let mut tables = self.tables.write();
        if let Some(orphan) = messages
            .iter()
            .find(|m| !tables.email_accounts.iter().any(|a| a.id == m.account_id))
        {
            bail!("foreign key constraint failed: email account {}", orphan.account_id);
        }

        for message in messages {
            let id = tables.next_id();
            tables.email_messages.push(EmailMessage {
                id,
                account_id: message.account_id,
                direction: message.direction.clone(),
                from_email: message.from_email.clone(),
                to_email: message.to_email.clone(),
                subject: message.subject.clone(),
                body: message.body.clone(),
                sent_at: message.sent_at,
            });
        }
        Ok(messages.len())
    }

    async fn create_template(&self, template: &NewEmailTemplate) -> Result<EmailTemplate> {
        let mut tables = self.tables.write();
        ensure_unique(
            tables.email_templates.iter().any(|t| t.name == template.name),
            "email_templates.name",
        )?;
        let row = EmailTemplate {
            id: tables.next_id(),
            name: template.name.clone(),
            category: template.category.clone(),
            subject: template.subject.clone(),
            body: template.body.clone(),
            created_by: template.created_by,
        };
        tables.email_templates.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryTenantDb {
    async fn insert_batch(&self, entries: &[NewAuditLog]) -> Result<usize> {
        let mut tables = self.tables.write();
        let now = Utc::now();
        for entry in entries {
            let id = tables.next_id();
            tables.audit_logs.push(AuditLog {
                id,
                user_id: entry.user_id,
                event: entry.event.clone(),
                auditable_type: entry.auditable_type.clone(),
                auditable_id: entry.auditable_id,
                old_values: entry.old_values.clone(),
                new_values: entry.new_values.clone(),
                created_at: now,
            });
        }
        Ok(entries.len())
    }
}

#[async_trait]
impl IntegrationRepository for InMemoryTenantDb {
    async fn create_import(&self, import: &NewDataImport) -> Result<DataImport> {
        let mut tables = self.tables.write();
        let row = DataImport {
            id: tables.next_id(),
            user_id: import.user_id,
            module_id: import.module_id,
            file_name: import.file_name.clone(),
            status: import.status.clone(),
            total_rows: import.total_rows,
            imported_rows: import.imported_rows,
            failed_rows: import.failed_rows,
        };
        tables.imports.push(row.clone());
        Ok(row)
    }

    async fn create_export(&self, export: &NewDataExport) -> Result<DataExport> {
        let mut tables = self.tables.write();
        let row = DataExport {
            id: tables.next_id(),
            user_id: export.user_id,
            module_id: export.module_id,
            file_name: export.file_name.clone(),
            format: export.format.clone(),
            status: export.status.clone(),
            record_count: export.record_count,
        };
        tables.exports.push(row.clone());
        Ok(row)
    }

    async fn create_api_key(&self, key: &NewApiKey) -> Result<ApiKey> {
        let mut tables = self.tables.write();
        ensure_unique(
            tables.api_keys.iter().any(|k| k.prefix == key.prefix),
            "api_keys.prefix",
        )?;
        let row = ApiKey {
            id: tables.next_id(),
            user_id: key.user_id,
            name: key.name.clone(),
            prefix: key.prefix.clone(),
            key_hash: key.key_hash.clone(),
            scopes: key.scopes.clone(),
            expires_at: key.expires_at,
        };
        tables.api_keys.push(row.clone());
        Ok(row)
    }

    async fn create_webhook(&self, webhook: &NewWebhook) -> Result<Webhook> {
        let mut tables = self.tables.write();
        let row = Webhook {
            id: tables.next_id(),
            user_id: webhook.user_id,
            module_id: webhook.module_id,
            name: webhook.name.clone(),
            url: webhook.url.clone(),
            events: webhook.events.clone(),
            secret: webhook.secret.clone(),
            is_active: webhook.is_active,
        };
        tables.webhooks.push(row.clone());
        Ok(row)
    }
}

/// Hands out one [`InMemoryTenantDb`] per tenant id
#[derive(Default)]
pub struct InMemoryStoreFactory {
    databases: Mutex<HashMap<String, Arc<InMemoryTenantDb>>>,
}

impl InMemoryStoreFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The database of a tenant, created empty on first access
    pub fn database(&self, tenant_id: &str) -> Arc<InMemoryTenantDb> {
        self.databases
            .lock()
            .entry(tenant_id.to_string())
            .or_default()
            .clone()
    }
}

#[async_trait]
impl TenantStoreFactory for InMemoryStoreFactory {
    async fn open(&self, tenant_id: &str) -> Result<TenantStore> {
        Ok(self.database(tenant_id).store())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn module(api_name: &str) -> NewModule {
        NewModule {
            api_name: api_name.to_string(),
            name: api_name.to_string(),
            singular_name: api_name.to_string(),
            icon: "box".to_string(),
            description: String::new(),
            display_order: 1,
            settings: json!({}),
        }
    }

    #[tokio::test]
    async fn duplicate_api_name_is_rejected() {
        let db = Arc::new(InMemoryTenantDb::new());
        let store = db.store();
        store.modules.create(&module("deals")).await.unwrap();
        assert!(store.modules.create(&module("deals")).await.is_err());
    }

    #[tokio::test]
    async fn duplicate_pipeline_name_is_rejected_per_module() {
        let db = Arc::new(InMemoryTenantDb::new());
        let store = db.store();
        let deals = store.modules.create(&module("deals")).await.unwrap();
        let cases = store.modules.create(&module("cases")).await.unwrap();
        let pipeline = |module_id| NewPipeline {
            module_id,
            name: "Sales Pipeline".to_string(),
            stage_field_api_name: "stage".to_string(),
            settings: json!({}),
            created_by: None,
        };

        store.pipelines.create_pipeline(&pipeline(deals.id)).await.unwrap();
        assert!(store.pipelines.create_pipeline(&pipeline(deals.id)).await.is_err());
        store.pipelines.create_pipeline(&pipeline(cases.id)).await.unwrap();
        assert_eq!(store.pipelines.list_for_module(deals.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn batch_with_unknown_module_inserts_nothing() {
        let db = Arc::new(InMemoryTenantDb::new());
        let store = db.store();
        let deals = store.modules.create(&module("deals")).await.unwrap();

        let batch = vec![
            NewModuleRecord { module_id: deals.id, data: json!({}), created_by: 1 },
            NewModuleRecord { module_id: 999, data: json!({}), created_by: 1 },
        ];
        assert!(store.records.insert_batch(&batch).await.is_err());
        assert!(db.records().is_empty());
        assert!(db.batch_sizes().is_empty());
    }

    #[tokio::test]
    async fn message_batch_with_unknown_account_inserts_nothing() {
        let db = Arc::new(InMemoryTenantDb::new());
        let store = db.store();
        let account = store
            .email
            .create_account(&NewEmailAccount {
                user_id: 1,
                name: "Sales inbox".to_string(),
                email_address: "sales@acme.test".to_string(),
                provider: "imap".to_string(),
                is_default: true,
            })
            .await
            .unwrap();

        let message = |account_id| NewEmailMessage {
            account_id,
            direction: "inbound".to_string(),
            from_email: "buyer@example.com".to_string(),
            to_email: "sales@acme.test".to_string(),
            subject: "Pricing".to_string(),
            body: String::new(),
            sent_at: Utc::now(),
        };
        let batch = vec![message(account.id), message(999)];
        assert!(store.email.insert_messages(&batch).await.is_err());
        assert!(db.email_messages().is_empty());

        assert_eq!(store.email.insert_messages(&batch[..1]).await.unwrap(), 1);
        assert_eq!(db.email_messages().len(), 1);
    }

    #[tokio::test]
    async fn first_ids_are_the_lowest_record_ids() {
        let db = Arc::new(InMemoryTenantDb::new());
        let store = db.store();
        let contacts = store.modules.create(&module("contacts")).await.unwrap();
        let batch: Vec<_> = (0..5)
            .map(|_| NewModuleRecord { module_id: contacts.id, data: json!({}), created_by: 1 })
            .collect();
        let ids = store.records.insert_batch(&batch).await.unwrap();

        assert_eq!(store.records.first_ids(3).await.unwrap(), ids[..3].to_vec());
        assert_eq!(store.records.first_ids(100).await.unwrap(), ids);
    }

    #[tokio::test]
    async fn sync_permissions_replaces_the_set() {
        let db = Arc::new(InMemoryTenantDb::new());
        let store = db.store();
        let a = store.roles.create_permission("a", "web").await.unwrap();
        let b = store.roles.create_permission("b", "web").await.unwrap();
        let role = store.roles.create_role("r", "web").await.unwrap();

        store.roles.sync_permissions(role.id, &[a.id]).await.unwrap();
        store.roles.sync_permissions(role.id, &[b.id]).await.unwrap();

        let granted = store.roles.role_permissions(role.id).await.unwrap();
        assert_eq!(granted, vec![b]);
    }

    #[tokio::test]
    async fn factory_isolates_tenants() {
        let factory = InMemoryStoreFactory::new();
        let techco = factory.open("techco").await.unwrap();
        techco.modules.create(&module("deals")).await.unwrap();

        let smallbiz = factory.open("smallbiz").await.unwrap();
        assert!(smallbiz.modules.find_by_api_name("deals").await.unwrap().is_none());
        assert!(techco.modules.find_by_api_name("deals").await.unwrap().is_some());
    }
}
