//! Service configuration with TOML file support.

use crate::ServiceError;
use eligo_types::{default_service_table, BonusParams, ServiceParams, ServiceType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Configuration for the eligo service.
///
/// Can be loaded from a TOML file via [`ServiceConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Only the admin identity has no
/// default; everything else falls back to the stock values.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// The single administrator identity gating admin commands.
    pub admin_user_id: i64,

    /// Base URL of the remote verification-status endpoint.
    #[serde(default = "default_status_base_url")]
    pub status_base_url: String,

    /// Spacing between remote status queries while polling, in seconds.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Registration, referral, and check-in bonuses.
    #[serde(default)]
    pub bonuses: BonusParams,

    /// Per-service cost, concurrency limit, and poll window. Every service
    /// that accepts submissions must have an entry here.
    #[serde(default = "default_service_table")]
    pub services: BTreeMap<ServiceType, ServiceParams>,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_status_base_url() -> String {
    "https://my.sheerid.com".to_string()
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ServiceConfig {
    /// A configuration with stock values and the given admin identity.
    pub fn with_admin(admin_user_id: i64) -> Self {
        Self {
            admin_user_id,
            status_base_url: default_status_base_url(),
            poll_interval_secs: default_poll_interval_secs(),
            bonuses: BonusParams::default(),
            services: default_service_table(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }

    /// Load a configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| ServiceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the services cannot run on.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.poll_interval_secs == 0 {
            return Err(ServiceError::Config(
                "poll_interval_secs must be positive".to_string(),
            ));
        }
        for (service, params) in &self.services {
            if params.verify_cost == 0 {
                return Err(ServiceError::Config(format!(
                    "verify_cost for {service} must be positive"
                )));
            }
            if params.max_concurrent == 0 {
                return Err(ServiceError::Config(format!(
                    "max_concurrent for {service} must be positive"
                )));
            }
            if params.poll_window_secs < self.poll_interval_secs {
                return Err(ServiceError::Config(format!(
                    "poll_window_secs for {service} is below the poll interval"
                )));
            }
        }
        Ok(())
    }
}
