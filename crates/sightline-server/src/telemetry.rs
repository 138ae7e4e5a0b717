//! Logging, metrics and error-reporting setup.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sightline_config::ObservabilityConfig;
use sightline_core::{SightlineError, SightlineResult};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Builds the default filter directive from the configured level.
fn default_directive(config: &ObservabilityConfig) -> String {
    format!("{},sightline=debug,tower_http=debug", config.log_level)
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` overrides the configured level. Output is JSON when
/// `log_format = "json"`, human-readable otherwise.
pub fn init_tracing(config: &ObservabilityConfig) -> SightlineResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.log_format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true).with_target(true))
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer().with_target(true)).try_init()
    };

    result.map_err(|e| SightlineError::Configuration(format!("Failed to initialize tracing: {}", e)))
}

/// Installs the Prometheus recorder when metrics are enabled.
pub fn install_metrics(config: &ObservabilityConfig) -> SightlineResult<Option<PrometheusHandle>> {
    if !config.metrics_enabled {
        return Ok(None);
    }

    PrometheusBuilder::new()
        .install_recorder()
        .map(Some)
        .map_err(|e| SightlineError::Configuration(format!("Failed to install metrics recorder: {}", e)))
}

/// Binds a Sentry client to the process when a DSN is configured.
///
/// The returned guard flushes queued events on drop and must be held until
/// shutdown.
pub fn init_error_reporting(
    config: &ObservabilityConfig,
    environment: &str,
) -> SightlineResult<Option<sentry::ClientInitGuard>> {
    let Some(dsn) = config.error_reporting_dsn.as_deref() else {
        return Ok(None);
    };
    let dsn: sentry::types::Dsn = dsn
        .parse()
        .map_err(|e| SightlineError::Configuration(format!("Invalid error reporting DSN: {}", e)))?;

    let guard = sentry::init(sentry::ClientOptions {
        dsn: Some(dsn),
        environment: Some(environment.to_string().into()),
        release: sentry::release_name!(),
        ..Default::default()
    });
    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_uses_configured_level() {
        let config = ObservabilityConfig {
            log_level: "warn".to_string(),
            ..ObservabilityConfig::default()
        };
        assert_eq!(default_directive(&config), "warn,sightline=debug,tower_http=debug");
    }

    #[test]
    fn test_metrics_disabled_installs_nothing() {
        let config = ObservabilityConfig {
            metrics_enabled: false,
            ..ObservabilityConfig::default()
        };
        assert!(install_metrics(&config).unwrap().is_none());
    }

    #[test]
    fn test_error_reporting_disabled_without_dsn() {
        let config = ObservabilityConfig::default();
        assert!(init_error_reporting(&config, "local").unwrap().is_none());
    }

    #[test]
    fn test_error_reporting_rejects_malformed_dsn() {
        let config = ObservabilityConfig {
            error_reporting_dsn: Some("https://example.com/not-a-project".to_string()),
            ..ObservabilityConfig::default()
        };
        assert!(matches!(
            init_error_reporting(&config, "local"),
            Err(SightlineError::Configuration(_))
        ));
    }
}
