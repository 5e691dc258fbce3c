//! YouTube Data API v3 REST client.
//!
//! Thin typed client over two read-only endpoints:
//! - `search.list` filtered to one channel, newest first
//! - `videos.list` for a single id with the `snippet` part
//!
//! Requests are traced and counted; there is no retry.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use timecode_models::VideoId;
use tracing::{debug, info_span, Instrument};
use url::Url;

use crate::error::{YouTubeError, YouTubeResult};
use crate::metrics::record_request;
use crate::source::{SearchPage, VideoSnippet, VideoSource};
use crate::types::{ApiErrorResponse, SearchListResponse, Video, VideoListResponse};

// =============================================================================
// Configuration
// =============================================================================

/// Public YouTube Data API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Largest page the search endpoint will return.
pub const MAX_PAGE_SIZE: u32 = 50;

/// YouTube client configuration.
#[derive(Clone)]
pub struct YouTubeConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Channel whose videos are listed
    pub channel_id: String,
    /// API base URL (overridable for tests)
    pub base_url: String,
    /// Items per search page, at most 50
    pub page_size: u32,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl std::fmt::Debug for YouTubeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeConfig")
            .field("api_key", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .field("base_url", &self.base_url)
            .field("page_size", &self.page_size)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl YouTubeConfig {
    /// Create config from environment variables.
    pub fn from_env() -> YouTubeResult<Self> {
        let api_key = std::env::var("YOUTUBE_API_KEY")
            .or_else(|_| std::env::var("YOUTUBE_TOKEN"))
            .map_err(|_| {
                YouTubeError::config_error("YOUTUBE_API_KEY or YOUTUBE_TOKEN must be set")
            })?;

        if api_key.is_empty() {
            return Err(YouTubeError::config_error("YouTube API key cannot be empty"));
        }

        let channel_id = std::env::var("YOUTUBE_CHANNEL_ID")
            .map_err(|_| YouTubeError::config_error("YOUTUBE_CHANNEL_ID not set"))?;

        if channel_id.is_empty() {
            return Err(YouTubeError::config_error("YOUTUBE_CHANNEL_ID cannot be empty"));
        }

        Ok(Self {
            api_key,
            channel_id,
            base_url: std::env::var("YOUTUBE_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            page_size: MAX_PAGE_SIZE,
            timeout: Duration::from_secs(
                std::env::var("YOUTUBE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            connect_timeout: Duration::from_secs(
                std::env::var("YOUTUBE_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
        })
    }
}

// =============================================================================
// Client
// =============================================================================

/// YouTube Data API client scoped to one channel.
#[derive(Clone)]
pub struct YouTubeClient {
    http: Client,
    config: YouTubeConfig,
    base_url: String,
}

impl YouTubeClient {
    /// Create a new YouTube client.
    pub fn new(config: YouTubeConfig) -> YouTubeResult<Self> {
        let parsed = Url::parse(&config.base_url).map_err(|e| {
            YouTubeError::config_error(format!("Invalid base URL {}: {}", config.base_url, e))
        })?;

        if !(1..=MAX_PAGE_SIZE).contains(&config.page_size) {
            return Err(YouTubeError::config_error(format!(
                "page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, config.page_size
            )));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("timecode-youtube/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(YouTubeError::network)?;

        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            config,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> YouTubeResult<Self> {
        Self::new(YouTubeConfig::from_env()?)
    }

    fn endpoint(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Fetch one page of the channel's videos ordered by publish date.
    pub async fn search(&self, page_token: Option<&str>) -> YouTubeResult<SearchListResponse> {
        let url = self.endpoint("search");
        let page_size = self.config.page_size.to_string();

        let mut query: Vec<(&str, &str)> = vec![
            ("key", self.config.api_key.as_str()),
            ("channelId", self.config.channel_id.as_str()),
            ("part", "snippet,id"),
            ("order", "date"),
            ("maxResults", page_size.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let span = info_span!(
            "youtube_request",
            operation = "search",
            channel_id = %self.config.channel_id,
            page_token = page_token.unwrap_or("")
        );

        self.execute_request("search", span, self.get_json(&url, &query))
            .await
    }

    /// Look up a single video with its snippet.
    ///
    /// Returns [`YouTubeError::NotFound`] when the response has no items.
    pub async fn get_video(&self, video_id: &str) -> YouTubeResult<Video> {
        let url = self.endpoint("videos");
        let query = [
            ("key", self.config.api_key.as_str()),
            ("id", video_id),
            ("part", "snippet"),
        ];

        let span = info_span!("youtube_request", operation = "get_video", video_id = %video_id);

        let response: VideoListResponse = self
            .execute_request("get_video", span, self.get_json(&url, &query))
            .await?;

        response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| YouTubeError::not_found(video_id))
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> YouTubeResult<T> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(YouTubeError::network)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Self::handle_error_response(status, url, response).await);
        }

        let body = response.text().await.map_err(YouTubeError::network)?;
        serde_json::from_str(&body).map_err(|e| {
            YouTubeError::invalid_response(format!(
                "Failed to parse {} response: {} (body prefix: {})",
                url,
                e,
                body.chars().take(200).collect::<String>()
            ))
        })
    }

    /// Execute a request with tracing and metrics.
    async fn execute_request<T, F>(
        &self,
        operation: &str,
        span: tracing::Span,
        fut: F,
    ) -> YouTubeResult<T>
    where
        F: std::future::Future<Output = YouTubeResult<T>>,
    {
        let start = Instant::now();
        let result = fut.instrument(span).await;
        let latency_ms = start.elapsed().as_millis() as f64;

        let status = match &result {
            Ok(_) => 200,
            Err(e) => e.http_status().unwrap_or(500),
        };
        record_request(operation, status, latency_ms);
        debug!(operation, status, latency_ms, "YouTube request finished");

        result
    }

    async fn handle_error_response(
        status: StatusCode,
        url: &str,
        response: reqwest::Response,
    ) -> YouTubeError {
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ApiErrorResponse>(&body)
            .map(|e| e.describe())
            .unwrap_or(body);
        YouTubeError::from_http_status(status.as_u16(), format!("{} failed: {}", url, detail))
    }
}

#[async_trait]
impl VideoSource for YouTubeClient {
    async fn search_page(&self, page_token: Option<&str>) -> YouTubeResult<SearchPage> {
        Ok(self.search(page_token).await?.into())
    }

    async fn video_snippet(&self, video_id: &VideoId) -> YouTubeResult<VideoSnippet> {
        let video = self.get_video(video_id.as_str()).await?;

        let snippet = video.snippet.ok_or_else(|| {
            YouTubeError::invalid_response(format!("video {} has no snippet", video_id))
        })?;

        let thumbnail_url = snippet
            .thumbnails
            .high
            .map(|t| t.url)
            .ok_or_else(|| {
                YouTubeError::invalid_response(format!(
                    "video {} has no high resolution thumbnail",
                    video_id
                ))
            })?;

        Ok(VideoSnippet {
            title: snippet.title,
            description: snippet.description,
            thumbnail_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "YOUTUBE_API_KEY",
            "YOUTUBE_TOKEN",
            "YOUTUBE_CHANNEL_ID",
            "YOUTUBE_API_BASE_URL",
            "YOUTUBE_TIMEOUT_SECS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_config_requires_api_key() {
        clear_env();
        std::env::set_var("YOUTUBE_CHANNEL_ID", "UC123");
        assert!(matches!(
            YouTubeConfig::from_env(),
            Err(YouTubeError::ConfigError(_))
        ));
    }

    #[test]
    #[serial]
    fn test_config_accepts_legacy_token_variable() {
        clear_env();
        std::env::set_var("YOUTUBE_TOKEN", "legacy-key");
        std::env::set_var("YOUTUBE_CHANNEL_ID", "UC123");

        let config = YouTubeConfig::from_env().unwrap();
        assert_eq!(config.api_key, "legacy-key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.page_size, MAX_PAGE_SIZE);
        assert_eq!(config.timeout, Duration::from_secs(30));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_config_requires_channel_id() {
        clear_env();
        std::env::set_var("YOUTUBE_API_KEY", "key");
        assert!(YouTubeConfig::from_env().is_err());
        clear_env();
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = YouTubeConfig {
            api_key: "super-secret".to_string(),
            channel_id: "UC123".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: 50,
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("UC123"));
    }

    #[test]
    fn test_rejects_oversized_page() {
        let config = YouTubeConfig {
            api_key: "key".to_string(),
            channel_id: "UC123".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: 51,
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
        };
        assert!(matches!(
            YouTubeClient::new(config),
            Err(YouTubeError::ConfigError(_))
        ));
    }
}
