//! Tenant context resolution

use super::repository::{TenantRepository, TenantStore, TenantStoreFactory};
use crate::contract::{ProvisioningError, ProvisioningResult, Tenant};
use std::sync::Arc;
use tracing::debug;

/// A registered tenant together with its isolated store
#[derive(Clone)]
pub struct TenantContext {
    pub tenant: Tenant,
    pub store: TenantStore,
}

/// Turns an optional tenant id into a [`TenantContext`]
#[derive(Clone)]
pub struct TenantResolver {
    tenants: Arc<dyn TenantRepository>,
    factory: Arc<dyn TenantStoreFactory>,
}

impl TenantResolver {
    pub fn new(tenants: Arc<dyn TenantRepository>, factory: Arc<dyn TenantStoreFactory>) -> Self {
        Self { tenants, factory }
    }

    pub async fn resolve(&self, tenant_id: Option<&str>) -> ProvisioningResult<TenantContext> {
        let tenant_id = tenant_id.ok_or(ProvisioningError::NoTenantContext)?;
        let tenant = self
            .tenants
            .find(tenant_id)
            .await?
            .ok_or_else(|| ProvisioningError::UnknownTenant {
                tenant_id: tenant_id.to_string(),
            })?;
        let store = self.factory.open(&tenant.id).await?;
        debug!(tenant = %tenant.id, "Tenant context resolved");
        Ok(TenantContext { tenant, store })
    }
}
