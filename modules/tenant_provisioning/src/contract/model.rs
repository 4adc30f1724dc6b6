//! Contract models for tenant provisioning
//!
//! These models are transport-agnostic and shared by the domain and storage layers.
//! NO serde derives - these are pure domain models. Free-form blobs (settings,
//! record data, report definitions) are carried as `serde_json::Value`.

use chrono::{DateTime, Utc};
use serde_json::Value;

// ===== Central database =====

/// Billing plan tier of a tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanTier {
    Starter,
    Professional,
    Business,
    Enterprise,
}

impl PlanTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starter => "starter",
            Self::Professional => "professional",
            Self::Business => "business",
            Self::Enterprise => "enterprise",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "starter" => Some(Self::Starter),
            "professional" => Some(Self::Professional),
            "business" => Some(Self::Business),
            "enterprise" => Some(Self::Enterprise),
            _ => None,
        }
    }

    /// Monthly list price of one seat, in cents
    pub fn seat_price_cents(self) -> i64 {
        match self {
            Self::Starter => 1500,
            Self::Professional => 4900,
            Self::Business => 7900,
            Self::Enterprise => 9900,
        }
    }
}

/// Resource ceilings attached to a tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantLimits {
    pub max_users: u32,
    pub max_storage_mb: u64,
}

/// Tenant registered in the central database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant {
    /// Globally unique, immutable slug (e.g. "techco")
    pub id: String,
    pub name: String,
    pub plan: PlanTier,
    pub limits: TenantLimits,
    pub created_at: DateTime<Utc>,
}

/// Domain bound 1:1 to a tenant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub id: i64,
    pub domain: String,
    pub tenant_id: String,
}

/// Definition of a tenant to register
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTenant {
    pub id: String,
    pub name: String,
    pub domain: String,
    pub plan: PlanTier,
    pub limits: TenantLimits,
}

/// Result of registering a tenant: the tenant row plus its domain binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantHandle {
    pub tenant: Tenant,
    pub domain: Domain,
}

// ===== Modules, pipelines, stages =====

/// Entity-type definition, addressed by its immutable API name
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub id: i64,
    pub api_name: String,
    pub name: String,
    pub singular_name: String,
    pub icon: String,
    pub description: String,
    pub display_order: i32,
    pub settings: Value,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewModule {
    pub api_name: String,
    pub name: String,
    pub singular_name: String,
    pub icon: String,
    pub description: String,
    pub display_order: i32,
    pub settings: Value,
}

/// Kanban board over one module's stage field
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    pub id: i64,
    pub module_id: i64,
    pub name: String,
    pub stage_field_api_name: String,
    pub is_active: bool,
    pub settings: Value,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPipeline {
    pub module_id: i64,
    pub name: String,
    pub stage_field_api_name: String,
    pub settings: Value,
    pub created_by: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub id: i64,
    pub pipeline_id: i64,
    pub name: String,
    pub color: String,
    /// Advisory win probability, 0-100
    pub probability: i32,
    pub display_order: i32,
    pub is_won_stage: bool,
    pub is_lost_stage: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewStage {
    pub pipeline_id: i64,
    pub name: String,
    pub color: String,
    pub probability: i32,
    pub display_order: i32,
    pub is_won_stage: bool,
    pub is_lost_stage: bool,
}

// ===== Roles and permissions =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub id: i64,
    pub name: String,
    pub guard_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub guard_name: String,
}

/// Record visibility granted by a module permission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    /// Every record of the module
    All,
    /// Only records the user owns
    Own,
}

impl AccessLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Own => "own",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Self::All),
            "own" => Some(Self::Own),
            _ => None,
        }
    }
}

/// CRUD-style grant of one role on one module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleAccess {
    pub can_view: bool,
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_export: bool,
    pub can_import: bool,
    pub access_level: AccessLevel,
    /// Field API names hidden from the role
    pub field_restrictions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePermission {
    pub id: i64,
    pub role_id: i64,
    pub module_id: i64,
    pub access: ModuleAccess,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewModulePermission {
    pub role_id: i64,
    pub module_id: i64,
    pub access: ModuleAccess,
}

// ===== Users and billing =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Argon2id PHC string
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Trialing => "trialing",
            Self::PastDue => "past_due",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "trialing" => Some(Self::Trialing),
            "past_due" => Some(Self::PastDue),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

impl BillingCycle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }
}

/// Billing state of a tenant; at most one row per tenant database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub id: i64,
    pub plan: PlanTier,
    pub status: SubscriptionStatus,
    pub billing_cycle: BillingCycle,
    pub seats: u32,
    pub price_per_seat_cents: i64,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub plan: PlanTier,
    pub status: SubscriptionStatus,
    pub billing_cycle: BillingCycle,
    pub seats: u32,
    pub price_per_seat_cents: i64,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
}

// ===== Views, reports, dashboards =====

/// Saved table view; `definition` holds filters, columns and sorting
#[derive(Debug, Clone, PartialEq)]
pub struct SavedView {
    pub id: i64,
    pub module_id: i64,
    pub name: String,
    pub is_default: bool,
    pub definition: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSavedView {
    pub module_id: i64,
    pub name: String,
    pub is_default: bool,
    pub definition: Value,
}

/// Saved report; `definition` holds filters, grouping, aggregations, date range and config
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: i64,
    pub module_id: i64,
    pub name: String,
    pub description: String,
    pub report_type: String,
    pub chart_type: Option<String>,
    pub is_public: bool,
    pub definition: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    pub module_id: i64,
    pub name: String,
    pub description: String,
    pub report_type: String,
    pub chart_type: Option<String>,
    pub is_public: bool,
    pub definition: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDashboard {
    pub name: String,
    pub description: String,
    pub is_default: bool,
}

/// Cell rectangle on the 12-column dashboard grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardWidget {
    pub id: i64,
    pub dashboard_id: i64,
    pub title: String,
    pub widget_type: String,
    pub config: Value,
    pub grid_position: GridPosition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDashboardWidget {
    pub dashboard_id: i64,
    pub title: String,
    pub widget_type: String,
    pub config: Value,
    pub grid_position: GridPosition,
}

// ===== Module records =====

/// Schema-less instance of a module's entity type
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleRecord {
    pub id: i64,
    pub module_id: i64,
    pub data: Value,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewModuleRecord {
    pub module_id: i64,
    pub data: Value,
    pub created_by: i64,
}

// ===== Workflows and blueprints =====

/// Automation rule on a module; `trigger_config` is free-form
#[derive(Debug, Clone, PartialEq)]
pub struct Workflow {
    pub id: i64,
    pub module_id: i64,
    pub name: String,
    pub description: String,
    pub trigger_type: String,
    pub trigger_config: Value,
    pub is_active: bool,
    pub created_by: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkflow {
    pub module_id: i64,
    pub name: String,
    pub description: String,
    pub trigger_type: String,
    pub trigger_config: Value,
    pub is_active: bool,
    pub created_by: i64,
}

/// One action of a workflow; `step_order` starts at 1
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowStep {
    pub id: i64,
    pub workflow_id: i64,
    pub step_order: i32,
    pub action_type: String,
    pub action_config: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkflowStep {
    pub workflow_id: i64,
    pub step_order: i32,
    pub action_type: String,
    pub action_config: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowExecution {
    pub id: i64,
    pub workflow_id: i64,
    pub status: String,
    pub triggered_by: i64,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkflowExecution {
    pub workflow_id: i64,
    pub status: String,
    pub triggered_by: i64,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Approval process on a module field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    pub id: i64,
    pub module_id: i64,
    pub name: String,
    pub field_api_name: String,
    pub is_active: bool,
    pub created_by: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBlueprint {
    pub module_id: i64,
    pub name: String,
    pub field_api_name: String,
    pub is_active: bool,
    pub created_by: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlueprintState {
    pub id: i64,
    pub blueprint_id: i64,
    pub name: String,
    pub color: String,
    pub is_initial: bool,
    pub is_final: bool,
    pub display_order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBlueprintState {
    pub blueprint_id: i64,
    pub name: String,
    pub color: String,
    pub is_initial: bool,
    pub is_final: bool,
    pub display_order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlueprintTransition {
    pub id: i64,
    pub blueprint_id: i64,
    pub from_state_id: i64,
    pub to_state_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBlueprintTransition {
    pub blueprint_id: i64,
    pub from_state_id: i64,
    pub to_state_id: i64,
    pub name: String,
}

// ===== Email =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAccount {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub email_address: String,
    pub provider: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmailAccount {
    pub user_id: i64,
    pub name: String,
    pub email_address: String,
    pub provider: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub id: i64,
    pub account_id: i64,
    pub direction: String,
    pub from_email: String,
    pub to_email: String,
    pub subject: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmailMessage {
    pub account_id: i64,
    pub direction: String,
    pub from_email: String,
    pub to_email: String,
    pub subject: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplate {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub subject: String,
    pub body: String,
    pub created_by: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmailTemplate {
    pub name: String,
    pub category: String,
    pub subject: String,
    pub body: String,
    pub created_by: i64,
}

// ===== Audit, transfers and integrations =====

/// Change history entry; `auditable_id` is a module record id
#[derive(Debug, Clone, PartialEq)]
pub struct AuditLog {
    pub id: i64,
    pub user_id: i64,
    pub event: String,
    pub auditable_type: String,
    pub auditable_id: Option<i64>,
    pub old_values: Value,
    pub new_values: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditLog {
    pub user_id: i64,
    pub event: String,
    pub auditable_type: String,
    pub auditable_id: Option<i64>,
    pub old_values: Value,
    pub new_values: Value,
}

/// File import job into a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataImport {
    pub id: i64,
    pub user_id: i64,
    pub module_id: i64,
    pub file_name: String,
    pub status: String,
    pub total_rows: i32,
    pub imported_rows: i32,
    pub failed_rows: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDataImport {
    pub user_id: i64,
    pub module_id: i64,
    pub file_name: String,
    pub status: String,
    pub total_rows: i32,
    pub imported_rows: i32,
    pub failed_rows: i32,
}

/// File export job from a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataExport {
    pub id: i64,
    pub user_id: i64,
    pub module_id: i64,
    pub file_name: String,
    pub format: String,
    pub status: String,
    pub record_count: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDataExport {
    pub user_id: i64,
    pub module_id: i64,
    pub file_name: String,
    pub format: String,
    pub status: String,
    pub record_count: i32,
}

/// API credential; only the prefix and a SHA-256 digest of the key are kept
#[derive(Debug, Clone, PartialEq)]
pub struct ApiKey {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub prefix: String,
    pub key_hash: String,
    pub scopes: Value,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewApiKey {
    pub user_id: i64,
    pub name: String,
    pub prefix: String,
    pub key_hash: String,
    pub scopes: Value,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Outbound notification of module record events
#[derive(Debug, Clone, PartialEq)]
pub struct Webhook {
    pub id: i64,
    pub user_id: i64,
    pub module_id: i64,
    pub name: String,
    pub url: String,
    pub events: Value,
    pub secret: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWebhook {
    pub user_id: i64,
    pub module_id: i64,
    pub name: String,
    pub url: String,
    pub events: Value,
    pub secret: String,
    pub is_active: bool,
}

// ===== Provisioning outcomes =====

/// Outcome of a create-if-absent operation
#[derive(Debug, Clone, PartialEq)]
pub enum Ensured<T> {
    Created(T),
    Existing(T),
}

impl<T> Ensured<T> {
    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub fn get(&self) -> &T {
        match self {
            Self::Created(value) | Self::Existing(value) => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Created(value) | Self::Existing(value) => value,
        }
    }
}

/// Why a sub-step was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// A module the sub-step targets does not exist in the tenant
    ModuleMissing { api_name: String },
    /// A role the sub-step assigns does not exist in the tenant
    RoleMissing { name: String },
    /// The module permission matrix needs at least one role
    NoRoles,
    /// The module permission matrix needs at least one module
    NoModules,
    /// The subscription singleton already exists
    SubscriptionExists,
    /// The tenant was registered by an earlier run
    TenantExists { tenant_id: String },
    /// A report a dashboard widget renders does not exist
    ReportMissing { name: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ModuleMissing { api_name } => write!(f, "module '{}' not found", api_name),
            Self::RoleMissing { name } => write!(f, "role '{}' not found", name),
            Self::NoRoles => write!(f, "no roles exist"),
            Self::NoModules => write!(f, "no modules exist"),
            Self::SubscriptionExists => write!(f, "subscription already exists"),
            Self::TenantExists { tenant_id } => {
                write!(f, "tenant '{}' already provisioned", tenant_id)
            }
            Self::ReportMissing { name } => write!(f, "report '{}' not found", name),
        }
    }
}

/// A soft skip: the named sub-step was a no-op
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skip {
    pub subject: String,
    pub reason: SkipReason,
}

/// Row counts and skips accumulated by one provisioning step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    pub created: usize,
    pub existing: usize,
    pub skipped: Vec<Skip>,
}

impl Tally {
    pub fn record<T>(&mut self, outcome: &Ensured<T>) {
        if outcome.was_created() {
            self.created += 1;
        } else {
            self.existing += 1;
        }
    }

    pub fn skip(&mut self, subject: impl Into<String>, reason: SkipReason) {
        self.skipped.push(Skip {
            subject: subject.into(),
            reason,
        });
    }

    pub fn merge(&mut self, other: Tally) {
        self.created += other.created;
        self.existing += other.existing;
        self.skipped.extend(other.skipped);
    }
}
