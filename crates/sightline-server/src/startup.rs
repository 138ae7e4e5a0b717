//! Server startup output.

use sightline_config::AppConfig;
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
   _____ _       __    __  ___
  / ___/(_)___ _/ /_  / /_/ (_)___  ___
  \__ \/ / __ `/ __ \/ __/ / / __ \/ _ \
 ___/ / / /_/ / / / / /_/ / / / / /  __/
/____/_/\__, /_/ /_/\__/_/_/_/ /_/\___/
       /____/
    "#);
}

/// Builds the lines describing where the server listens.
#[must_use]
pub fn startup_lines(config: &AppConfig) -> Vec<String> {
    let base = format!("http://{}", config.server.addr());
    let mut lines = vec![
        format!("REST API:  {}", base),
        format!("Health:    {}/health", base),
        format!("API Docs:  {}/swagger-ui", base),
    ];
    if config.observability.metrics_enabled {
        lines.push(format!("Metrics:   {}{}", base, config.observability.metrics_path));
    }
    lines.push(format!("Model:     {}", config.inference.model_id));
    lines
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    for line in startup_lines(config) {
        info!("{}", line);
    }
    info!("{}", separator);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_lines_include_docs_and_metrics() {
        let mut config = AppConfig::default();
        config.server.port = 9000;
        config.observability.metrics_enabled = true;

        let lines = startup_lines(&config);
        assert!(lines.iter().any(|l| l.ends_with(":9000/swagger-ui")));
        assert!(lines.iter().any(|l| l.starts_with("Metrics:") && l.ends_with("/metrics")));
    }

    #[test]
    fn test_startup_lines_without_metrics() {
        let mut config = AppConfig::default();
        config.observability.metrics_enabled = false;

        assert!(!startup_lines(&config).iter().any(|l| l.starts_with("Metrics:")));
    }

    #[test]
    fn test_print_banner_does_not_panic() {
        print_banner();
        print_startup_info(&AppConfig::default());
    }
}
