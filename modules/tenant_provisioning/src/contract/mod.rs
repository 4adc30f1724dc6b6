//! Contract layer - models and errors shared by every provisioning routine
//!
//! NO serde derives on models - these are pure domain types.

pub mod error;
pub mod model;

pub use error::{ProvisioningError, ProvisioningResult};
pub use model::{
    AccessLevel, ApiKey, AuditLog, BillingCycle, Blueprint, BlueprintState, BlueprintTransition,
    Dashboard, DashboardWidget, DataExport, DataImport, Domain, EmailAccount, EmailMessage,
    EmailTemplate, Ensured, GridPosition, Module, ModuleAccess, ModulePermission, ModuleRecord,
    NewApiKey, NewAuditLog, NewBlueprint, NewBlueprintState, NewBlueprintTransition, NewDashboard,
    NewDashboardWidget, NewDataExport, NewDataImport, NewEmailAccount, NewEmailMessage,
    NewEmailTemplate, NewModule, NewModulePermission, NewModuleRecord, NewPipeline, NewReport,
    NewSavedView, NewStage, NewSubscription, NewTenant, NewUser, NewWebhook, NewWorkflow,
    NewWorkflowExecution, NewWorkflowStep, Permission, Pipeline, PlanTier, Report, Role,
    SavedView, Skip, SkipReason, Stage, Subscription, SubscriptionStatus, Tally, Tenant,
    TenantHandle, TenantLimits, User, Webhook, Workflow, WorkflowExecution, WorkflowStep,
};
