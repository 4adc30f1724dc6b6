//! Common test utilities: in-memory service wiring and tenant fixtures

#![allow(dead_code)]

use std::sync::Arc;
use tenant_provisioning::contract::{NewTenant, PlanTier, TenantLimits};
use tenant_provisioning::domain::{DefaultDataOrchestrator, TenantStore};
use tenant_provisioning::infra::{InMemoryStoreFactory, InMemoryTenantDb, InMemoryTenantRepository};
use tenant_provisioning::{Config, Service};

/// Service over in-memory central and tenant databases
pub struct TestHarness {
    pub service: Service,
    pub tenants: Arc<InMemoryTenantRepository>,
    pub factory: Arc<InMemoryStoreFactory>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let tenants = Arc::new(InMemoryTenantRepository::new());
        let factory = Arc::new(InMemoryStoreFactory::new());
        let service = Service::new(tenants.clone(), factory.clone(), config);
        Self {
            service,
            tenants,
            factory,
        }
    }

    /// Register one tenant without touching its database
    pub async fn register(&self, tenant_id: &str) {
        self.service
            .registrar()
            .create_tenant(&new_tenant(tenant_id))
            .await
            .unwrap();
    }

    pub fn db(&self, tenant_id: &str) -> Arc<InMemoryTenantDb> {
        self.factory.database(tenant_id)
    }

    pub fn store(&self, tenant_id: &str) -> TenantStore {
        self.db(tenant_id).store()
    }

    pub async fn orchestrator(&self, tenant_id: &str) -> DefaultDataOrchestrator {
        let ctx = self.service.resolve(Some(tenant_id)).await.unwrap();
        DefaultDataOrchestrator::new(ctx.store, ctx.tenant, 100, Some(7))
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Defaults with a fixed seed and a fast password
pub fn test_config() -> Config {
    Config {
        rng_seed: Some(42),
        default_password: "secret".to_string(),
        ..Config::default()
    }
}

pub fn new_tenant(tenant_id: &str) -> NewTenant {
    NewTenant {
        id: tenant_id.to_string(),
        name: format!("{} Inc", tenant_id),
        domain: format!("{}.localhost", tenant_id),
        plan: PlanTier::Professional,
        limits: TenantLimits {
            max_users: 25,
            max_storage_mb: 10_240,
        },
    }
}

pub fn print_test_header(test_name: &str, purpose: &str) {
    println!("\n🧪 TEST: {}", test_name);
    println!("📋 PURPOSE: {}", purpose);
}
