//! Configuration loader with layered sources.

use crate::{format_validation_errors, AppConfig, ConfigValidator};
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use sightline_core::SightlineError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Flat environment variables understood for compatibility with existing
/// deployments, mapped to their configuration key. Applied last.
pub const LEGACY_ENV_VARS: &[(&str, &str)] = &[
    ("DATABASE_URL", "database.url"),
    ("REDIS_URL", "redis.url"),
    ("SENTRY_DSN", "observability.error_reporting_dsn"),
    ("ENVIRONMENT", "app.environment"),
    ("ROBOFLOW_API_URL", "inference.api_url"),
    ("ROBOFLOW_API_KEY", "inference.api_key"),
    ("ROBOFLOW_MODEL_ID", "inference.model_id"),
];

const ENV_PREFIX: &str = "SIGHTLINE";

/// Configuration loader.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    env: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides
    /// 4. Environment variables with the `SIGHTLINE__` prefix
    /// 5. Flat variables such as `DATABASE_URL` (see [`LEGACY_ENV_VARS`])
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            env: None,
        }
    }

    /// Loader for the default location (`./config`).
    #[must_use]
    pub fn from_default_location() -> Self {
        Self::new("./config")
    }

    /// Reads environment variables from `vars` instead of the process
    /// environment. `.env` files are not consulted in this mode.
    #[must_use]
    pub fn with_env(mut self, vars: HashMap<String, String>) -> Self {
        self.env = Some(vars);
        self
    }

    /// Loads and validates the configuration.
    pub fn load(&self) -> Result<AppConfig, SightlineError> {
        if self.env.is_none() {
            if let Err(e) = dotenvy::dotenv() {
                debug!("No .env file found or error loading it: {}", e);
            }
        }

        let environment = self
            .var("SIGHTLINE__APP__ENVIRONMENT")
            .or_else(|| self.var("ENVIRONMENT"))
            .unwrap_or_else(|| "local".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();
        for name in ["default", environment.as_str(), "local"] {
            builder = self.add_file(builder, name);
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(self.env.clone()),
        );

        for (var, key) in LEGACY_ENV_VARS {
            builder = builder
                .set_override_option(*key, self.var(var))
                .map_err(config_error_to_sightline_error)?;
        }

        let app_config: AppConfig = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error_to_sightline_error)?;

        Self::validate_config(&app_config)?;

        Ok(app_config)
    }

    fn add_file(
        &self,
        builder: ConfigBuilder<config::builder::DefaultState>,
        name: &str,
    ) -> ConfigBuilder<config::builder::DefaultState> {
        let path = self.config_dir.join(format!("{}.toml", name));
        if !Path::new(&path).exists() {
            return builder;
        }
        debug!("Loading config from: {}", path.display());
        builder.add_source(File::from(path).required(false))
    }

    /// Looks up a variable, treating empty values as unset.
    fn var(&self, name: &str) -> Option<String> {
        let value = match &self.env {
            Some(vars) => vars.get(name).cloned(),
            None => std::env::var(name).ok(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Validates the configuration.
    fn validate_config(config: &AppConfig) -> Result<(), SightlineError> {
        if config.inference.api_key.is_empty() {
            warn!("No inference API key configured (ROBOFLOW_API_KEY); inference calls will fail");
        }

        if config.app.environment == "production" && config.observability.error_reporting_dsn.is_none() {
            warn!("No error reporting DSN configured in production; failures are only logged");
        }

        ConfigValidator::validate(config)
            .map_err(|errors| SightlineError::Configuration(format_validation_errors(&errors)))
    }
}

fn config_error_to_sightline_error(err: ConfigError) -> SightlineError {
    SightlineError::Configuration(err.to_string())
}
