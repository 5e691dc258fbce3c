//! Prometheus metrics for the chapter job.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // Run metrics
    pub const RUNS_TOTAL: &str = "timecode_runs_total";
    pub const RUN_DURATION_SECONDS: &str = "timecode_run_duration_seconds";
    pub const CATALOG_SIZE: &str = "timecode_catalog_size";
    pub const RECORDS_PUBLISHED_TOTAL: &str = "timecode_records_total";
    pub const VIDEOS_OMITTED_TOTAL: &str = "timecode_videos_omitted_total";

    // Publish metrics
    pub const UPLOADS_TOTAL: &str = "timecode_uploads_total";
    pub const UPLOAD_DURATION_SECONDS: &str = "timecode_upload_duration_seconds";
    pub const UPLOAD_BYTES: &str = "timecode_upload_bytes";
}

/// Record a finished run, `status` being the handler's status code.
pub fn record_run(status: u16, duration_secs: f64) {
    let labels = [("status", status.to_string())];
    counter!(names::RUNS_TOTAL, &labels).increment(1);
    histogram!(names::RUN_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record how the catalog fanned out into records.
pub fn record_dataset(catalog_size: usize, records: usize, omitted: usize) {
    histogram!(names::CATALOG_SIZE).record(catalog_size as f64);
    counter!(names::RECORDS_PUBLISHED_TOTAL).increment(records as u64);
    counter!(names::VIDEOS_OMITTED_TOTAL).increment(omitted as u64);
}

/// Record an upload attempt.
pub fn record_upload(success: bool, bytes: usize, duration_secs: f64) {
    let outcome = if success { "success" } else { "failure" };
    let labels = [("outcome", outcome.to_string())];
    counter!(names::UPLOADS_TOTAL, &labels).increment(1);
    histogram!(names::UPLOAD_DURATION_SECONDS, &labels).record(duration_secs);
    histogram!(names::UPLOAD_BYTES).record(bytes as f64);
}
