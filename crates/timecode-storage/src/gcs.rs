//! Google Cloud Storage client (JSON API).
//!
//! Uploads use the simple media upload endpoint:
//! `POST /upload/storage/v1/b/{bucket}/o?uploadType=media&name={key}`.
//! Authentication uses a service-account key file through `gcp_auth`.
//! When `STORAGE_EMULATOR_HOST` is set, requests go to the emulator
//! without credentials.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::{debug, info, info_span, Instrument};
use url::Url;

use crate::error::{validate_key, StorageError, StorageResult};
use crate::store::ObjectStore;
use crate::token_cache::TokenCache;

/// Public Cloud Storage endpoint.
pub const DEFAULT_BASE_URL: &str = "https://storage.googleapis.com";

// =============================================================================
// Configuration
// =============================================================================

/// Cloud Storage client configuration.
#[derive(Debug, Clone)]
pub struct GcsConfig {
    /// GCP project ID
    pub project_id: String,
    /// Bucket name
    pub bucket_name: String,
    /// Service-account key file; unused against an emulator
    pub credentials_path: Option<PathBuf>,
    /// API base URL
    pub base_url: String,
    /// Talk to an emulator without credentials
    pub emulator: bool,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl GcsConfig {
    /// Create config from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        let project_id = std::env::var("GCP_PROJECT_ID")
            .or_else(|_| std::env::var("FIREBASE_PROJECT_ID"))
            .map_err(|_| {
                StorageError::config_error("GCP_PROJECT_ID or FIREBASE_PROJECT_ID must be set")
            })?;

        if project_id.is_empty() {
            return Err(StorageError::config_error("GCP_PROJECT_ID cannot be empty"));
        }

        let bucket_name = std::env::var("GCS_BUCKET_NAME")
            .map_err(|_| StorageError::config_error("GCS_BUCKET_NAME not set"))?;

        if bucket_name.is_empty() {
            return Err(StorageError::config_error("GCS_BUCKET_NAME cannot be empty"));
        }

        let emulator_host = std::env::var("STORAGE_EMULATOR_HOST")
            .ok()
            .filter(|s| !s.is_empty());

        Ok(Self {
            project_id,
            bucket_name,
            credentials_path: std::env::var("GOOGLE_APPLICATION_CREDENTIALS")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            emulator: emulator_host.is_some(),
            base_url: emulator_host.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(
                std::env::var("GCS_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            connect_timeout: Duration::from_secs(5),
        })
    }
}

// =============================================================================
// Client
// =============================================================================

enum Auth {
    ServiceAccount(TokenCache),
    Anonymous,
}

/// Cloud Storage client bound to one bucket.
#[derive(Clone)]
pub struct GcsClient {
    http: Client,
    config: GcsConfig,
    base_url: String,
    auth: Arc<Auth>,
}

impl GcsClient {
    /// Create a new client, loading service-account credentials unless
    /// running against an emulator.
    pub fn new(config: GcsConfig) -> StorageResult<Self> {
        let auth = if config.emulator {
            Auth::Anonymous
        } else {
            Auth::ServiceAccount(TokenCache::new(Self::create_auth_provider(&config)?))
        };

        Self::with_auth(config, auth)
    }

    fn with_auth(config: GcsConfig, auth: Auth) -> StorageResult<Self> {
        let parsed = Url::parse(&config.base_url).map_err(|e| {
            StorageError::config_error(format!("Invalid base URL {}: {}", config.base_url, e))
        })?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!("timecode-storage/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            config,
            auth: Arc::new(auth),
        })
    }

    fn create_auth_provider(config: &GcsConfig) -> StorageResult<Arc<dyn TokenProvider>> {
        let path = config.credentials_path.as_ref().ok_or_else(|| {
            StorageError::auth_error(
                "GOOGLE_APPLICATION_CREDENTIALS not set. \
                 Set it to the path of your service account JSON file.",
            )
        })?;

        let service_account = CustomServiceAccount::from_file(path).map_err(|e| {
            StorageError::auth_error(format!(
                "Failed to load service account from {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(Arc::new(service_account))
    }

    /// Create from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        Self::new(GcsConfig::from_env()?)
    }

    fn bucket_path(&self) -> String {
        format!(
            "{}/storage/v1/b/{}",
            self.base_url,
            urlencoding::encode(&self.config.bucket_name)
        )
    }

    fn upload_path(&self) -> String {
        format!(
            "{}/upload/storage/v1/b/{}/o",
            self.base_url,
            urlencoding::encode(&self.config.bucket_name)
        )
    }

    async fn authorize(&self, request: RequestBuilder) -> StorageResult<RequestBuilder> {
        match self.auth.as_ref() {
            Auth::ServiceAccount(cache) => Ok(request.bearer_auth(cache.bearer().await?)),
            Auth::Anonymous => Ok(request),
        }
    }

    /// Upload bytes to `key`, overwriting any existing object.
    pub async fn upload_bytes(
        &self,
        data: Vec<u8>,
        key: &str,
        content_type: &str,
    ) -> StorageResult<()> {
        validate_key(key)?;

        let span = info_span!(
            "gcs_upload",
            bucket = %self.config.bucket_name,
            key = %key,
            bytes = data.len()
        );

        self.send_upload(data, key, content_type)
            .instrument(span)
            .await
    }

    async fn send_upload(&self, data: Vec<u8>, key: &str, content_type: &str) -> StorageResult<()> {
        debug!("Uploading {} bytes to {}", data.len(), key);
        let start = Instant::now();

        let request = self
            .http
            .post(self.upload_path())
            .query(&[("uploadType", "media"), ("name", key)])
            .header(CONTENT_TYPE, content_type)
            .body(data);

        let response = self.authorize(request).await?.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::upload_failed(format!(
                "gs://{}/{}: HTTP {}: {}",
                self.config.bucket_name,
                key,
                status.as_u16(),
                error_message(&body)
            )));
        }

        info!(
            latency_ms = start.elapsed().as_millis() as u64,
            "Uploaded gs://{}/{}", self.config.bucket_name, key
        );
        Ok(())
    }

    /// Check connectivity by reading the bucket metadata.
    pub async fn check_bucket(&self) -> StorageResult<()> {
        let request = self.http.get(self.bucket_path());
        let response = self.authorize(request).await?.send().await?;
        let status = response.status();

        match status {
            StatusCode::OK => Ok(()),
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(StorageError::RequestFailed(format!(
                    "GCS connectivity check failed: HTTP {}: {}",
                    status.as_u16(),
                    error_message(&body)
                )))
            }
        }
    }
}

#[async_trait]
impl ObjectStore for GcsClient {
    fn location(&self) -> String {
        format!("gs://{}", self.config.bucket_name)
    }

    async fn put_object(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()> {
        self.upload_bytes(data, key, content_type).await
    }

    async fn check_connectivity(&self) -> StorageResult<()> {
        self.check_bucket().await
    }
}

/// Pull `error.message` out of a Google API error body, falling back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.chars().take(200).collect())
}
