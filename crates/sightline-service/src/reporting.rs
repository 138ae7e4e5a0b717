//! Error-report sink.
//!
//! Logs failures captured by [`sightline_core::monitored`] and forwards them
//! to Sentry. Forwarding goes through whatever client is bound to the
//! current hub: `sentry::init` at startup when a DSN is configured, nothing
//! otherwise, in which case the report is only logged.

use shaku::Component;
use sightline_core::{ErrorReport, ErrorReporter};
use tracing::warn;

/// Log target for captured reports.
pub const ERROR_REPORT_TARGET: &str = "error_report";

/// Error-report sink component.
///
/// Sentry queues events on its own transport thread, so `capture` never
/// waits on the network and a failed delivery never reaches the caller.
#[derive(Component)]
#[shaku(interface = ErrorReporter)]
pub struct ErrorReportingService {
    environment: String,
}

impl ErrorReportingService {
    /// Creates a sink tagging its log lines with `environment`.
    #[must_use]
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
        }
    }

    /// Parts for the DI module parameters.
    #[must_use]
    pub fn into_parameters(self) -> ErrorReportingServiceParameters {
        ErrorReportingServiceParameters {
            environment: self.environment,
        }
    }
}

impl ErrorReporter for ErrorReportingService {
    fn capture(&self, report: ErrorReport) {
        warn!(
            target: ERROR_REPORT_TARGET,
            operation = %report.operation,
            error_code = %report.error_code,
            execution_time_secs = report.execution_time_secs,
            environment = %self.environment,
            "{}",
            report.message
        );

        sentry::with_scope(
            |scope| {
                scope.set_tag("operation", &report.operation);
                scope.set_tag("error_code", &report.error_code);
                scope.set_extra("execution_time", report.execution_time_secs.into());
                scope.set_extra("occurred_at", report.occurred_at.to_rfc3339().into());
            },
            || sentry::capture_message(&report.message, sentry::Level::Error),
        );
    }
}

impl std::fmt::Debug for ErrorReportingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorReportingService")
            .field("environment", &self.environment)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sentry::test::with_captured_events;

    fn report() -> ErrorReport {
        ErrorReport {
            operation: "REDIS: GET".to_string(),
            error_code: "CACHE_ERROR".to_string(),
            message: "Cache error: connection reset".to_string(),
            execution_time_secs: 0.25,
            occurred_at: Utc::now(),
        }
    }

    #[test]
    fn test_capture_without_client_only_logs() {
        let service = ErrorReportingService::new("local");
        service.capture(report());
    }

    #[test]
    fn test_capture_sends_tagged_event() {
        let service = ErrorReportingService::new("staging");

        let events = with_captured_events(|| service.capture(report()));

        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.level, sentry::Level::Error);
        assert_eq!(event.message.as_deref(), Some("Cache error: connection reset"));
        assert_eq!(event.tags.get("operation").map(String::as_str), Some("REDIS: GET"));
        assert_eq!(event.tags.get("error_code").map(String::as_str), Some("CACHE_ERROR"));
        assert_eq!(event.extra.get("execution_time"), Some(&serde_json::json!(0.25)));
    }

    #[test]
    fn test_scope_does_not_leak_between_reports() {
        let service = ErrorReportingService::new("staging");

        let events = with_captured_events(|| {
            service.capture(report());
            sentry::capture_message("unrelated", sentry::Level::Info);
        });

        assert_eq!(events.len(), 2);
        assert!(events[1].tags.get("operation").is_none());
    }
}
