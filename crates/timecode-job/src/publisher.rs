//! Publisher: writes the serialized dataset to the object store.

use std::sync::Arc;
use std::time::Instant;

use timecode_models::{Dataset, JSON_CONTENT_TYPE};
use timecode_storage::ObjectStore;
use tracing::{error, info};

use crate::error::JobResult;
use crate::metrics;

/// Uploads the chapter dataset to a fixed key, overwriting the previous object.
#[derive(Clone)]
pub struct Publisher {
    store: Arc<dyn ObjectStore>,
    object_key: String,
}

impl Publisher {
    pub fn new(store: Arc<dyn ObjectStore>, object_key: impl Into<String>) -> Self {
        Self {
            store,
            object_key: object_key.into(),
        }
    }

    pub fn object_key(&self) -> &str {
        &self.object_key
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Publish `dataset_json`, encoded once more as a JSON string.
    ///
    /// Returns whether the write succeeded. Upload failures are logged and
    /// reported as `Ok(false)`; only payload encoding errors propagate.
    pub async fn publish(&self, dataset_json: &str) -> JobResult<bool> {
        let payload = Dataset::encode_payload(dataset_json)?;
        let bytes = payload.len();
        let start = Instant::now();

        let result = self
            .store
            .put_object(&self.object_key, payload, JSON_CONTENT_TYPE)
            .await;
        let duration = start.elapsed().as_secs_f64();

        match result {
            Ok(()) => {
                metrics::record_upload(true, bytes, duration);
                info!(
                    location = %self.store.location(),
                    key = %self.object_key,
                    bytes,
                    "Published chapter dataset"
                );
                Ok(true)
            }
            Err(e) => {
                metrics::record_upload(false, bytes, duration);
                error!(
                    location = %self.store.location(),
                    key = %self.object_key,
                    "Failed to publish chapter dataset: {}", e
                );
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryStore;
    use timecode_models::{ChapterRecord, VideoId};

    fn sample_dataset() -> Dataset {
        vec![ChapterRecord::from_snippet(
            VideoId::from("v1"),
            "Episode 1",
            "0:00 Start\n5:00 Wrap up",
            "https://img.example/v1.jpg",
        )]
        .into()
    }

    #[tokio::test]
    async fn test_stored_bytes_decode_twice_to_records() {
        let store = Arc::new(MemoryStore::new());
        let publisher = Publisher::new(store.clone(), "chapters.json");
        let dataset = sample_dataset();
        let json = dataset.to_json().unwrap();

        assert!(publisher.publish(&json).await.unwrap());

        let (bytes, content_type) = store.get("chapters.json").unwrap();
        assert_eq!(content_type, "application/json");

        let outer: String = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(outer, json);
        let decoded: Dataset = serde_json::from_str(&outer).unwrap();
        assert_eq!(decoded, dataset);
    }

    #[tokio::test]
    async fn test_empty_dataset_is_stored_as_quoted_array() {
        let store = Arc::new(MemoryStore::new());
        let publisher = Publisher::new(store.clone(), "chapters.json");

        assert!(publisher.publish("[]").await.unwrap());

        let (bytes, _) = store.get("chapters.json").unwrap();
        assert_eq!(bytes, b"\"[]\"");
    }

    #[tokio::test]
    async fn test_upload_failure_is_swallowed() {
        let publisher = Publisher::new(Arc::new(MemoryStore::failing()), "chapters.json");

        let published = publisher.publish("[]").await.unwrap();

        assert!(!published);
    }

    #[tokio::test]
    async fn test_second_publish_overwrites() {
        let store = Arc::new(MemoryStore::new());
        let publisher = Publisher::new(store.clone(), "chapters.json");

        publisher.publish("[]").await.unwrap();
        let json = sample_dataset().to_json().unwrap();
        publisher.publish(&json).await.unwrap();

        let (bytes, _) = store.get("chapters.json").unwrap();
        assert_eq!(Dataset::decode_payload(&bytes).unwrap().len(), 1);
    }
}
