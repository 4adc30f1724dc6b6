//! Tenant Provisioning Module
//!
//! Seeds the databases of a multi-tenant CRM: tenants in the central
//! database, then per tenant the access model, demo users, default modules,
//! pipelines, views, reports, dashboards and bulk synthetic records. Every
//! routine is safe to re-run.

// Public exports
pub mod contract;
pub use contract::{ProvisioningError, ProvisioningResult, Skip, SkipReason, Tally};

pub mod config;
pub use config::Config;

pub mod domain;
pub use domain::{
    BootstrapReport, GenerationReport, Preset, ProvisioningPlan, ProvisioningReport, Scale,
    Service, Step,
};

pub mod infra;
