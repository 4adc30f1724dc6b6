//! Configuration for tenant provisioning
//!
//! Layered with figment: field defaults, then an optional YAML file, then
//! `CRM_SEED_*` environment variables.

use anyhow::{bail, Result};
use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use serde::Deserialize;
use std::path::Path;

/// Placeholder substituted with the tenant id in `tenant_database_url`
pub const TENANT_PLACEHOLDER: &str = "{tenant}";

/// Tenant provisioning configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// DSN of the central database holding tenants and domains
    #[serde(default = "default_central_database_url")]
    pub central_database_url: String,

    /// DSN template of tenant databases, must contain `{tenant}`
    #[serde(default = "default_tenant_database_url")]
    pub tenant_database_url: String,

    /// Plain-text password given to demo users
    #[serde(default = "default_password")]
    pub default_password: String,

    /// Rows per module record insert batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Preset used by the default-data routine when none is given
    #[serde(default = "default_preset")]
    pub default_preset: String,

    /// Seed for reproducible synthetic data; random when unset
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            central_database_url: default_central_database_url(),
            tenant_database_url: default_tenant_database_url(),
            default_password: default_password(),
            batch_size: default_batch_size(),
            default_preset: default_preset(),
            rng_seed: None,
        }
    }
}

impl Config {
    /// Load configuration from an optional YAML file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let config: Config = figment.merge(Env::prefixed("CRM_SEED_")).extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.tenant_database_url.contains(TENANT_PLACEHOLDER) {
            bail!(
                "tenant_database_url must contain '{}': {}",
                TENANT_PLACEHOLDER,
                self.tenant_database_url
            );
        }
        if self.batch_size == 0 {
            bail!("batch_size must be greater than zero");
        }
        Ok(())
    }
}

fn default_central_database_url() -> String {
    "sqlite://data/central.sqlite?mode=rwc".to_string()
}

fn default_tenant_database_url() -> String {
    "sqlite://data/tenant_{tenant}.sqlite?mode=rwc".to_string()
}

fn default_password() -> String {
    "password".to_string()
}

fn default_batch_size() -> usize {
    100
}

fn default_preset() -> String {
    "full".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.default_preset, "full");
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        let config = Config {
            tenant_database_url: "sqlite::memory:".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
