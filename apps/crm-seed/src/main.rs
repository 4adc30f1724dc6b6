use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tenant_provisioning::domain::{TenantRepository, TenantStoreFactory};
use tenant_provisioning::infra::storage::{self, SeaOrmTenantRepository, SeaOrmTenantStoreFactory};
use tenant_provisioning::infra::{InMemoryStoreFactory, InMemoryTenantRepository};
use tenant_provisioning::{
    BootstrapReport, Config, GenerationReport, ProvisioningReport, Service, Tally,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "crm-seed")]
#[command(about = "Provision tenants and seed their CRM databases", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Run against a throwaway in-memory database holding the fixed tenant set
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register the fixed tenant set in the central database
    Tenants {
        /// Also seed default modules, layouts and the permission matrix
        #[arg(long)]
        with_defaults: bool,
    },
    /// Roles, permissions and the module permission matrix
    Access {
        #[arg(long, env = "CRM_TENANT")]
        tenant: Option<String>,
    },
    /// Demo logins for every canonical role
    Users {
        #[arg(long, env = "CRM_TENANT")]
        tenant: Option<String>,
    },
    /// Pipeline and stage templates
    Pipelines {
        #[arg(long, env = "CRM_TENANT")]
        tenant: Option<String>,
    },
    /// Default data for a preset
    Defaults {
        #[arg(long, env = "CRM_TENANT")]
        tenant: Option<String>,

        /// starter, sales, support or full (configured default when omitted)
        #[arg(long)]
        preset: Option<String>,

        /// Append a small synthetic data set
        #[arg(long)]
        with_sample_data: bool,
    },
    /// Bulk synthetic records
    TestData {
        #[arg(long, env = "CRM_TENANT")]
        tenant: Option<String>,

        /// small, medium, large or massive
        #[arg(long)]
        scale: Option<String>,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.json_logs)?;

    let config = Config::load(cli.config.as_deref())?;
    let service = build_service(config, cli.dry_run).await?;

    if cli.dry_run && !matches!(cli.command, Commands::Tenants { .. }) {
        info!("Dry run: registering the fixed tenant set in memory first");
        service.bootstrap_tenants(false).await?;
    }

    match cli.command {
        Commands::Tenants { with_defaults } => {
            let report = service.bootstrap_tenants(with_defaults).await?;
            log_bootstrap(&report);
        }
        Commands::Access { tenant } => {
            let tally = service.provision_access(tenant.as_deref()).await?;
            log_tally("access", &tally);
        }
        Commands::Users { tenant } => {
            let tally = service.provision_users(tenant.as_deref()).await?;
            log_tally("users", &tally);
        }
        Commands::Pipelines { tenant } => {
            let tally = service.provision_pipelines(tenant.as_deref()).await?;
            log_tally("pipelines", &tally);
        }
        Commands::Defaults {
            tenant,
            preset,
            with_sample_data,
        } => {
            let report = service
                .provision_defaults(tenant.as_deref(), preset.as_deref(), with_sample_data)
                .await?;
            log_defaults(&report);
        }
        Commands::TestData {
            tenant,
            scale,
            seed,
        } => {
            let report = service
                .generate_test_data(tenant.as_deref(), scale.as_deref(), seed)
                .await?;
            log_generation(&report);
        }
    }

    Ok(())
}

async fn build_service(config: Config, dry_run: bool) -> Result<Service> {
    let (tenants, factory): (Arc<dyn TenantRepository>, Arc<dyn TenantStoreFactory>) = if dry_run
    {
        (
            Arc::new(InMemoryTenantRepository::new()),
            Arc::new(InMemoryStoreFactory::new()),
        )
    } else {
        let db = storage::connect(&config.central_database_url)
            .await
            .context("Failed to open the central database")?;
        storage::migrate_central(&db).await?;
        (
            Arc::new(SeaOrmTenantRepository::new(Arc::new(db))),
            Arc::new(SeaOrmTenantStoreFactory::new(
                config.tenant_database_url.clone(),
            )),
        )
    };
    Ok(Service::new(tenants, factory, config))
}

fn init_logging(log_level: &str, json: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level))
        .context("Failed to initialize logging filter")?;

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    Ok(())
}

fn log_tally(step: &str, tally: &Tally) {
    info!(
        step,
        created = tally.created,
        existing = tally.existing,
        skipped = tally.skipped.len(),
        "Step finished"
    );
    for skip in &tally.skipped {
        warn!(step, subject = %skip.subject, reason = %skip.reason, "Skipped");
    }
}

fn log_bootstrap(report: &BootstrapReport) {
    log_tally("tenants", &report.tally);
    log_tally("environment", &report.environment);
    for tenant in &report.created {
        info!(tenant = %tenant, "Tenant ready");
    }
}

fn log_defaults(report: &ProvisioningReport) {
    for step in &report.steps {
        log_tally(step.step.name(), &step.tally);
    }
    if let Some(sample) = &report.sample_data {
        log_generation(sample);
    }
    info!(created = report.total_created(), "Default data provisioned");
}

fn log_generation(report: &GenerationReport) {
    for (kind, count) in &report.created {
        info!(module = kind.api_name(), records = count, "Records generated");
    }
    for kind in &report.skipped {
        warn!(module = kind.api_name(), "Module not found, records skipped");
    }
    for (kind, count) in &report.auxiliary {
        info!(group = kind.as_str(), rows = count, "Rows generated");
    }
    for kind in &report.auxiliary_skipped {
        warn!(group = kind.as_str(), "No target modules found, group skipped");
    }
    info!(
        records = report.total_records(),
        reports = report.reports,
        dashboards = report.dashboards,
        "Test data generated"
    );
}
