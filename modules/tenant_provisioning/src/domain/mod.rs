//! Domain layer - provisioning logic and services

pub mod access;
pub mod catalog;
pub mod context;
pub mod defaults;
pub mod generator;
pub mod layouts;
pub mod pipelines;
pub mod registrar;
pub mod repository;
pub mod service;
pub mod users;

pub use access::{defaults_for_role, AccessProvisioner, PermissionSelector, RoleKind};
pub use context::{TenantContext, TenantResolver};
pub use defaults::{
    DefaultDataOrchestrator, Preset, ProvisioningPlan, ProvisioningReport, Step, StepReport,
};
pub use generator::{
    AuxiliaryKind, AuxiliaryVolume, BulkGenerator, GenerationReport, ModuleCatalog, RecordKind,
    Scale, Volume,
};
pub use layouts::{GridLayout, LayoutProvisioner};
pub use pipelines::PipelineProvisioner;
pub use registrar::TenantRegistrar;
pub use repository::{
    AuditLogRepository, AutomationRepository, DashboardRepository, EmailRepository,
    IntegrationRepository, ModulePermissionRepository, ModuleRepository, PipelineRepository,
    RecordRepository, ReportRepository, RoleRepository, SubscriptionRepository, TenantRepository,
    TenantStore, TenantStoreFactory, UserRepository, ViewRepository,
};
pub use service::{BootstrapReport, Service};
pub use users::{hash_password, UserProvisioner};
