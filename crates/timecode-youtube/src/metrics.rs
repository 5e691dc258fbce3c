//! YouTube API metrics collection.
//!
//! Provides standardized metrics for monitoring API usage:
//! - Request counters by operation and status
//! - Latency histograms

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Total YouTube API requests by operation and status.
    pub const REQUESTS_TOTAL: &str = "youtube_requests_total";

    /// Request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "youtube_latency_seconds";
}

/// Record metrics for a completed YouTube API request.
pub fn record_request(operation: &str, status: u16, latency_ms: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency_ms / 1000.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert!(names::REQUESTS_TOTAL.starts_with("youtube_"));
        assert!(names::LATENCY_SECONDS.contains("latency"));
    }
}
