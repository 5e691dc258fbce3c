//! Job configuration.

use std::path::PathBuf;

/// Default object key for the published dataset.
pub const DEFAULT_OBJECT_KEY: &str = "chapters.json";

/// Job configuration.
///
/// YouTube and Cloud Storage settings live in their own crates
/// (`YouTubeConfig`, `GcsConfig`).
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Object key the dataset is written to
    pub object_key: String,
    /// Write to this directory instead of Cloud Storage
    pub local_output_dir: Option<PathBuf>,
    /// Hour of day (UTC) the daily run fires
    pub daily_hour_utc: u32,
    /// Run once and exit instead of scheduling
    pub run_once: bool,
    /// Serve the HTTP trigger surface
    pub http_enabled: bool,
    /// HTTP bind host
    pub host: String,
    /// HTTP bind port
    pub port: u16,
    /// Install the Prometheus recorder and serve `/metrics`
    pub metrics_enabled: bool,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            object_key: DEFAULT_OBJECT_KEY.to_string(),
            local_output_dir: None,
            daily_hour_utc: 0,
            run_once: false,
            http_enabled: true,
            host: "0.0.0.0".to_string(),
            port: 8080,
            metrics_enabled: true,
        }
    }
}

impl JobConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            object_key: std::env::var("TIMECODE_OBJECT_KEY")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_OBJECT_KEY.to_string()),
            local_output_dir: std::env::var("TIMECODE_LOCAL_OUTPUT_DIR")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            daily_hour_utc: std::env::var("TIMECODE_DAILY_HOUR_UTC")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|h| *h < 24)
                .unwrap_or(0),
            run_once: env_flag("TIMECODE_RUN_ONCE", false),
            http_enabled: env_flag("TIMECODE_HTTP_ENABLED", true),
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            metrics_enabled: env_flag("METRICS_ENABLED", true),
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 6] = [
        "TIMECODE_OBJECT_KEY",
        "TIMECODE_LOCAL_OUTPUT_DIR",
        "TIMECODE_DAILY_HOUR_UTC",
        "TIMECODE_RUN_ONCE",
        "TIMECODE_HTTP_ENABLED",
        "API_PORT",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = JobConfig::from_env();
        assert_eq!(config.object_key, DEFAULT_OBJECT_KEY);
        assert_eq!(config.daily_hour_utc, 0);
        assert!(!config.run_once);
        assert!(config.http_enabled);
        assert_eq!(config.port, 8080);
        assert!(config.local_output_dir.is_none());
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        std::env::set_var("TIMECODE_OBJECT_KEY", "exports/poplava.json");
        std::env::set_var("TIMECODE_DAILY_HOUR_UTC", "6");
        std::env::set_var("TIMECODE_RUN_ONCE", "true");
        std::env::set_var("TIMECODE_LOCAL_OUTPUT_DIR", "/tmp/timecode");

        let config = JobConfig::from_env();
        assert_eq!(config.object_key, "exports/poplava.json");
        assert_eq!(config.daily_hour_utc, 6);
        assert!(config.run_once);
        assert_eq!(config.local_output_dir, Some(PathBuf::from("/tmp/timecode")));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_out_of_range_hour_falls_back_to_midnight() {
        clear_env();
        std::env::set_var("TIMECODE_DAILY_HOUR_UTC", "24");
        assert_eq!(JobConfig::from_env().daily_hour_utc, 0);
        clear_env();
    }
}
