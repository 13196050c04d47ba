//! Prometheus metrics for stores and slices.
//!
//! Stores record action, reducer and effect metrics on their own. Slices
//! record request outcomes through [`SliceMetrics`], labelled by slice and
//! operation. Nothing is exported until [`MetricsRecorder::install`] puts a
//! Prometheus recorder in place; the embedding application decides where to
//! expose the rendered text.
//!
//! ```rust,no_run
//! use shopadmin_runtime::metrics::MetricsRecorder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut recorder = MetricsRecorder::new();
//! recorder.install()?;
//!
//! if let Some(text) = recorder.render() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

use metrics::{counter, describe_counter, describe_histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use thiserror::Error;

/// Actions applied by stores
pub const ACTIONS_TOTAL: &str = "store.actions.total";
/// Actions refused during shutdown
pub const ACTIONS_REJECTED: &str = "store.actions.rejected";
/// Reducer execution time
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";
/// Effects spawned, by `type`
pub const EFFECTS_STARTED: &str = "store.effects.started";
/// Shutdowns that hit their deadline
pub const SHUTDOWN_TIMEOUTS: &str = "store.shutdown.timeout";
/// Requests dispatched by slices
pub const SLICE_REQUESTS: &str = "slice_requests_total";
/// Requests that settled as fulfilled
pub const SLICE_FULFILLED: &str = "slice_requests_fulfilled_total";
/// Requests that settled as rejected
pub const SLICE_REJECTED: &str = "slice_requests_rejected_total";

/// Reducers are in-memory transitions; buckets start at 10µs
const DURATION_BUCKETS: &[f64] = &[0.000_01, 0.000_1, 0.001, 0.01, 0.1, 1.0];

/// Errors from installing the exporter
#[derive(Error, Debug)]
pub enum MetricsError {
    /// The exporter configuration was rejected
    #[error("Failed to build metrics exporter: {0}")]
    Build(#[from] BuildError),
    /// Another recorder could not be replaced
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Installs the global Prometheus recorder and renders its scrape text
#[derive(Default)]
pub struct MetricsRecorder {
    handle: Option<PrometheusHandle>,
}

impl MetricsRecorder {
    /// A recorder that has not been installed
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Describe all metrics and install the Prometheus recorder
    ///
    /// A recorder installed earlier in the process (by another instance or
    /// test) is not an error; this instance then renders nothing.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError`] if the exporter cannot be built or installed.
    pub fn install(&mut self) -> Result<(), MetricsError> {
        describe();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(Matcher::Suffix("duration_seconds".to_string()), DURATION_BUCKETS)?;

        match builder.install_recorder() {
            Ok(handle) => {
                tracing::info!("Prometheus metrics recorder installed");
                self.handle = Some(handle);
                Ok(())
            },
            Err(e) if e.to_string().contains("already initialized") => {
                tracing::warn!("Metrics recorder already installed, reusing it");
                Ok(())
            },
            Err(e) => Err(MetricsError::Install(e.to_string())),
        }
    }

    /// Underlying Prometheus handle, if this instance installed it
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Current metrics in Prometheus text format
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

fn describe() {
    describe_counter!(ACTIONS_TOTAL, "Actions applied by stores");
    describe_counter!(ACTIONS_REJECTED, "Actions refused because the store was shutting down");
    describe_histogram!(REDUCER_DURATION, "Reducer execution time");
    describe_counter!(EFFECTS_STARTED, "Effects spawned, by type");
    describe_counter!(SHUTDOWN_TIMEOUTS, "Shutdowns that hit their deadline");
    describe_counter!(SLICE_REQUESTS, "Slice requests dispatched, by slice and operation");
    describe_counter!(SLICE_FULFILLED, "Slice requests that succeeded");
    describe_counter!(SLICE_REJECTED, "Slice requests that failed");
}

/// Request outcome counters for slices
pub struct SliceMetrics;

impl SliceMetrics {
    /// Count a dispatched request
    pub fn record_request(slice: &'static str, operation: &'static str) {
        counter!(SLICE_REQUESTS, "slice" => slice, "operation" => operation).increment(1);
    }

    /// Count a fulfilled request
    pub fn record_fulfilled(slice: &'static str, operation: &'static str) {
        counter!(SLICE_FULFILLED, "slice" => slice, "operation" => operation).increment(1);
    }

    /// Count a rejected request
    pub fn record_rejected(slice: &'static str, operation: &'static str) {
        counter!(SLICE_REJECTED, "slice" => slice, "operation" => operation).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uninstalled_recorder_renders_nothing() {
        let recorder = MetricsRecorder::new();
        assert!(recorder.handle().is_none());
        assert!(recorder.render().is_none());
    }

    #[test]
    fn slice_outcomes_show_up_in_the_scrape() {
        let mut recorder = MetricsRecorder::new();
        assert!(recorder.install().is_ok());

        SliceMetrics::record_request("category", "list");
        SliceMetrics::record_fulfilled("category", "list");
        SliceMetrics::record_rejected("category", "delete");

        // Nothing to render if another test installed the recorder first
        if let Some(rendered) = recorder.render() {
            assert!(rendered.contains(SLICE_REQUESTS));
            assert!(rendered.contains("operation=\"delete\""));
        }
    }
}
