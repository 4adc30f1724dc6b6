//! Domain service - entry points of every provisioning routine

use super::access::AccessProvisioner;
use super::catalog::{DEFAULT_PIPELINES, DEMO_USERS, TENANT_DEFINITIONS};
use super::context::{TenantContext, TenantResolver};
use super::defaults::{DefaultDataOrchestrator, Preset, ProvisioningPlan, ProvisioningReport};
use super::generator::{BulkGenerator, GenerationReport, Scale};
use super::pipelines::PipelineProvisioner;
use super::registrar::TenantRegistrar;
use super::repository::{TenantRepository, TenantStoreFactory};
use super::users::UserProvisioner;
use crate::config::Config;
use crate::contract::{ProvisioningError, ProvisioningResult, SkipReason, Tally};
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of the central bootstrap
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Ids of tenants registered by this run
    pub created: Vec<String>,
    /// Tenant registration counts and "already provisioned" skips
    pub tally: Tally,
    /// Rows written into the new tenants' databases
    pub environment: Tally,
}

/// Domain service for tenant provisioning
pub struct Service {
    registrar: TenantRegistrar,
    resolver: TenantResolver,
    config: Config,
}

impl Service {
    pub fn new(
        tenants: Arc<dyn TenantRepository>,
        factory: Arc<dyn TenantStoreFactory>,
        config: Config,
    ) -> Self {
        Self {
            registrar: TenantRegistrar::new(tenants.clone()),
            resolver: TenantResolver::new(tenants, factory),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registrar(&self) -> &TenantRegistrar {
        &self.registrar
    }

    pub async fn resolve(&self, tenant_id: Option<&str>) -> ProvisioningResult<TenantContext> {
        self.resolver.resolve(tenant_id).await
    }

    // ===== Central database =====

    /// Register the fixed tenant set and make each new tenant login-ready.
    ///
    /// Tenants registered by an earlier run are reported and left untouched.
    pub async fn bootstrap_tenants(
        &self,
        with_defaults: bool,
    ) -> ProvisioningResult<BootstrapReport> {
        let mut report = BootstrapReport::default();

        for definition in TENANT_DEFINITIONS {
            let handle = match self.registrar.create_tenant(&definition.to_new_tenant()).await {
                Ok(handle) => handle,
                Err(ProvisioningError::DuplicateTenant { tenant_id }) => {
                    warn!(tenant = %tenant_id, "Tenant already provisioned, skipping");
                    report
                        .tally
                        .skip(tenant_id.clone(), SkipReason::TenantExists { tenant_id });
                    continue;
                }
                Err(e) => return Err(e),
            };
            report.tally.created += 1;

            let ctx = self.resolver.resolve(Some(&handle.tenant.id)).await?;
            report.environment.merge(self.prepare_environment(&ctx, with_defaults).await?);
            report.created.push(handle.tenant.id);
        }

        info!(
            created = report.created.len(),
            skipped = report.tally.skipped.len(),
            "Tenant bootstrap finished"
        );
        Ok(report)
    }

    async fn prepare_environment(
        &self,
        ctx: &TenantContext,
        with_defaults: bool,
    ) -> ProvisioningResult<Tally> {
        let access = AccessProvisioner::new(ctx.store.clone());
        let mut tally = access.provision_roles().await?;
        tally.merge(
            UserProvisioner::new(ctx.store.clone())
                .provision(&ctx.tenant.id, DEMO_USERS, &self.config.default_password)
                .await?,
        );

        if with_defaults {
            let plan = ProvisioningPlan::for_preset(Preset::Full, false)?;
            let defaults = self.orchestrator(ctx).run(&plan).await?;
            for step in defaults.steps {
                tally.merge(step.tally);
            }
            tally.merge(access.provision_matrix().await?);
        }
        Ok(tally)
    }

    // ===== Tenant database =====

    /// Roles, permissions and the module permission matrix
    pub async fn provision_access(&self, tenant_id: Option<&str>) -> ProvisioningResult<Tally> {
        let ctx = self.resolver.resolve(tenant_id).await?;
        let access = AccessProvisioner::new(ctx.store);
        let mut tally = access.provision_roles().await?;
        tally.merge(access.provision_matrix().await?);
        Ok(tally)
    }

    /// Demo logins for every canonical role
    pub async fn provision_users(&self, tenant_id: Option<&str>) -> ProvisioningResult<Tally> {
        let ctx = self.resolver.resolve(tenant_id).await?;
        UserProvisioner::new(ctx.store)
            .provision(&ctx.tenant.id, DEMO_USERS, &self.config.default_password)
            .await
    }

    /// The pipeline templates alone
    pub async fn provision_pipelines(&self, tenant_id: Option<&str>) -> ProvisioningResult<Tally> {
        let ctx = self.resolver.resolve(tenant_id).await?;
        PipelineProvisioner::new(ctx.store)
            .provision(DEFAULT_PIPELINES)
            .await
    }

    /// Default data for `preset`, or the configured default preset when `None`
    pub async fn provision_defaults(
        &self,
        tenant_id: Option<&str>,
        preset: Option<&str>,
        with_sample_data: bool,
    ) -> ProvisioningResult<ProvisioningReport> {
        let preset = Preset::parse(preset.unwrap_or(&self.config.default_preset))?;
        let plan = ProvisioningPlan::for_preset(preset, with_sample_data)?;
        let ctx = self.resolver.resolve(tenant_id).await?;
        info!(tenant = %ctx.tenant.id, preset = preset.as_str(), "Provisioning defaults");
        self.orchestrator(&ctx).run(&plan).await
    }

    /// Bulk synthetic data at `scale` (medium when `None`)
    pub async fn generate_test_data(
        &self,
        tenant_id: Option<&str>,
        scale: Option<&str>,
        seed: Option<u64>,
    ) -> ProvisioningResult<GenerationReport> {
        let scale = scale.map(Scale::parse).transpose()?.unwrap_or_default();
        let ctx = self.resolver.resolve(tenant_id).await?;
        info!(tenant = %ctx.tenant.id, scale = scale.as_str(), "Generating test data");

        let mut generator = BulkGenerator::new(
            ctx.store,
            self.config.batch_size,
            seed.or(self.config.rng_seed),
        )
        .await?;
        generator.run(&scale.volume()).await
    }

    fn orchestrator(&self, ctx: &TenantContext) -> DefaultDataOrchestrator {
        DefaultDataOrchestrator::new(
            ctx.store.clone(),
            ctx.tenant.clone(),
            self.config.batch_size,
            self.config.rng_seed,
        )
    }
}
