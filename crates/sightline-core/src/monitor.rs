//! Operation instrumentation.
//!
//! [`monitored`] wraps any fallible future with start/success/failure logging,
//! wall-clock timing and a duration histogram. Server-side failures are
//! forwarded to an [`ErrorReporter`]; every failure is returned unchanged.

use crate::{Interface, SightlineError, SightlineResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Instant;
use tracing::{error, info, warn};

/// Log target shared by all instrumented operations.
pub const PERFORMANCE_TARGET: &str = "sightline::performance";

/// Histogram recording the wall time of every instrumented operation.
pub const OPERATION_DURATION_METRIC: &str = "operation_duration_seconds";

/// An instrumented operation: a stable name plus an optional argument echo.
#[derive(Debug, Clone)]
pub struct Operation {
    name: &'static str,
    args: Option<String>,
}

impl Operation {
    /// Creates an operation that does not echo its arguments.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name, args: None }
    }

    /// Echoes the given arguments in the start log line.
    #[must_use]
    pub fn with_args(mut self, args: impl Into<String>) -> Self {
        self.args = Some(args.into());
        self
    }

    /// Returns the operation name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the echoed arguments, if any.
    #[must_use]
    pub fn args(&self) -> Option<&str> {
        self.args.as_deref()
    }
}

/// A failure captured by the instrumentation wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Operation tag.
    pub operation: String,
    /// Machine-readable error code.
    pub error_code: String,
    /// Full error message (not shown to clients).
    pub message: String,
    /// Time spent before the failure.
    pub execution_time_secs: f64,
    /// When the failure was observed.
    pub occurred_at: DateTime<Utc>,
}

impl ErrorReport {
    /// Builds a report for a failed operation.
    #[must_use]
    pub fn new(operation: &Operation, error: &SightlineError, execution_time_secs: f64) -> Self {
        Self {
            operation: operation.name().to_string(),
            error_code: error.error_code().to_string(),
            message: error.to_string(),
            execution_time_secs,
            occurred_at: Utc::now(),
        }
    }
}

/// Sink for failures observed by [`monitored`].
///
/// Implementations must not block and must never fail the caller.
pub trait ErrorReporter: Interface {
    /// Forwards a captured failure.
    fn capture(&self, report: ErrorReport);
}

/// Runs `future` as an instrumented operation.
///
/// The result is returned untouched and every failure is logged and
/// propagated as-is. Only server-class failures (status 500 and above) are
/// forwarded to `reporter`; client errors such as a duplicate email are not.
pub async fn monitored<T, Fut>(
    reporter: &dyn ErrorReporter,
    operation: Operation,
    future: Fut,
) -> SightlineResult<T>
where
    Fut: Future<Output = SightlineResult<T>>,
{
    info!(
        target: PERFORMANCE_TARGET,
        operation = operation.name(),
        "[START] {} {}",
        operation.name(),
        operation.args().unwrap_or_default()
    );
    let start = Instant::now();

    let result = future.await;
    let elapsed = start.elapsed().as_secs_f64();
    metrics::histogram!(OPERATION_DURATION_METRIC, "operation" => operation.name()).record(elapsed);

    match result {
        Ok(value) => {
            info!(
                target: PERFORMANCE_TARGET,
                operation = operation.name(),
                "[SUCCESS] {} - Duration: {:.4}s",
                operation.name(),
                elapsed
            );
            Ok(value)
        }
        Err(err) if err.status_code() < 500 => {
            warn!(
                target: PERFORMANCE_TARGET,
                operation = operation.name(),
                error_code = err.error_code(),
                "[ERROR] {} rejected after {:.4}s: {}",
                operation.name(),
                elapsed,
                err
            );
            Err(err)
        }
        Err(err) => {
            error!(
                target: PERFORMANCE_TARGET,
                operation = operation.name(),
                error_code = err.error_code(),
                "[ERROR] {} failed after {:.4}s: {}",
                operation.name(),
                elapsed,
                err
            );
            reporter.capture(ErrorReport::new(&operation, &err, elapsed));
            Err(err)
        }
    }
}

/// Test doubles for the error-report sink.
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use super::{ErrorReport, ErrorReporter};
    use std::sync::Mutex;

    /// Keeps every captured report in memory.
    #[derive(Debug, Default)]
    pub struct RecordingReporter {
        reports: Mutex<Vec<ErrorReport>>,
    }

    impl RecordingReporter {
        /// Returns a snapshot of the captured reports.
        pub fn reports(&self) -> Vec<ErrorReport> {
            self.reports.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    impl ErrorReporter for RecordingReporter {
        fn capture(&self, report: ErrorReport) {
            if let Ok(mut reports) = self.reports.lock() {
                reports.push(report);
            }
        }
    }
}
