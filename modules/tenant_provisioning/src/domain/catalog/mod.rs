//! Static reference data provisioned into tenants

pub mod layouts;
pub mod modules;
pub mod permissions;
pub mod pipelines;
pub mod tenants;

pub use modules::{ModuleDefinition, DEFAULT_MODULES};
pub use pipelines::{PipelineTemplate, StageTemplate, DEFAULT_PIPELINES};
pub use tenants::{DemoUser, TenantDefinition, DEMO_USERS, TENANT_DEFINITIONS};
