//! Access token cache for Cloud Storage requests.
//!
//! Tokens are refreshed a minute before they expire. Concurrent uploads
//! wait on one refresh instead of each asking the provider, and a failed
//! refresh falls back to the previous token while it is still unexpired.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use gcp_auth::TokenProvider;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{StorageError, StorageResult};

/// OAuth scope for object reads and writes.
pub const STORAGE_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.read_write";

const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Lifetime assumed when the provider's expiry is out of range.
const FALLBACK_LIFETIME: Duration = Duration::from_secs(50 * 60);

struct Bearer {
    value: String,
    expires: Instant,
}

impl Bearer {
    fn fresh(&self, now: Instant) -> bool {
        now + REFRESH_MARGIN < self.expires
    }

    fn unexpired(&self, now: Instant) -> bool {
        now < self.expires
    }
}

/// Convert a wall-clock expiry into a monotonic deadline.
fn deadline(expires_at: DateTime<Utc>, now_utc: DateTime<Utc>, now: Instant) -> Instant {
    if expires_at <= now_utc {
        return now;
    }
    now + (expires_at - now_utc).to_std().unwrap_or(FALLBACK_LIFETIME)
}

/// Shared bearer token cache in front of a `gcp_auth` provider.
pub struct TokenCache {
    provider: Arc<dyn TokenProvider>,
    current: RwLock<Option<Bearer>>,
}

impl TokenCache {
    pub fn new(provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            provider,
            current: RwLock::new(None),
        }
    }

    /// Return a token with at least a minute of validity left.
    pub async fn bearer(&self) -> StorageResult<String> {
        if let Some(token) = self.cached_fresh().await {
            return Ok(token);
        }

        let mut slot = self.current.write().await;
        // Re-check: a concurrent caller may have refreshed while we queued.
        if let Some(bearer) = slot.as_ref().filter(|b| b.fresh(Instant::now())) {
            return Ok(bearer.value.clone());
        }

        match self.provider.token(&[STORAGE_SCOPE]).await {
            Ok(token) => {
                let bearer = Bearer {
                    value: token.as_str().to_string(),
                    expires: deadline(token.expires_at(), Utc::now(), Instant::now()),
                };
                let value = bearer.value.clone();
                *slot = Some(bearer);
                debug!("Refreshed Cloud Storage access token");
                Ok(value)
            }
            Err(e) => match slot.as_ref().filter(|b| b.unexpired(Instant::now())) {
                Some(bearer) => {
                    warn!("Token refresh failed, reusing current token: {}", e);
                    Ok(bearer.value.clone())
                }
                None => Err(StorageError::auth_error(format!(
                    "Failed to obtain access token: {}",
                    e
                ))),
            },
        }
    }

    async fn cached_fresh(&self) -> Option<String> {
        let slot = self.current.read().await;
        slot.as_ref()
            .filter(|b| b.fresh(Instant::now()))
            .map(|b| b.value.clone())
    }
}
