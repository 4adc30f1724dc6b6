//! Central tenant registration

use super::repository::TenantRepository;
use crate::contract::{NewTenant, ProvisioningError, ProvisioningResult, TenantHandle};
use std::sync::Arc;
use tracing::info;

/// Registers tenants and their domains in the central database
pub struct TenantRegistrar {
    tenants: Arc<dyn TenantRepository>,
}

impl TenantRegistrar {
    pub fn new(tenants: Arc<dyn TenantRepository>) -> Self {
        Self { tenants }
    }

    /// Insert a new tenant bound to exactly one domain.
    ///
    /// Tenants are never upserted: an existing id fails with `DuplicateTenant`.
    pub async fn create_tenant(&self, tenant: &NewTenant) -> ProvisioningResult<TenantHandle> {
        if self.tenants.find(&tenant.id).await?.is_some() {
            return Err(ProvisioningError::DuplicateTenant {
                tenant_id: tenant.id.clone(),
            });
        }

        let (tenant_row, domain) = self.tenants.insert(tenant).await?;
        info!(
            tenant = %tenant_row.id,
            domain = %domain.domain,
            plan = tenant_row.plan.as_str(),
            "Tenant registered"
        );
        Ok(TenantHandle {
            tenant: tenant_row,
            domain,
        })
    }
}
