//! Contract error types for tenant provisioning
//!
//! Hard preconditions abort the running routine and surface here. Soft skips
//! (a missing optional module, an empty role list) are not errors; they are
//! reported through [`crate::contract::Tally`].

/// Tenant provisioning errors
#[derive(Debug, thiserror::Error)]
pub enum ProvisioningError {
    /// A tenant-scoped routine was invoked without a tenant
    #[error("no tenant context: this routine must run against a tenant")]
    NoTenantContext,

    /// The tenant id is not registered in the central database
    #[error("unknown tenant: {tenant_id}")]
    UnknownTenant { tenant_id: String },

    /// Tenant identity already registered; tenants are never upserted
    #[error("tenant already exists: {tenant_id}")]
    DuplicateTenant { tenant_id: String },

    /// Sample or synthetic data needs an existing user to own the records
    #[error("no base user found; create a user before seeding records")]
    NoBaseUser,

    #[error("invalid preset '{value}', expected one of: starter, sales, support, full")]
    InvalidPreset { value: String },

    #[error("invalid scale '{value}', expected one of: small, medium, large, massive")]
    InvalidScale { value: String },

    /// A plan contains a step whose required predecessor is absent
    #[error("step '{step}' requires '{requires}', which is not part of the plan")]
    UnsatisfiedDependency {
        step: &'static str,
        requires: &'static str,
    },

    /// Credential hashing failed
    #[error("password hashing failed: {0}")]
    Credential(String),

    /// Persistence layer failure
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type ProvisioningResult<T> = Result<T, ProvisioningError>;
