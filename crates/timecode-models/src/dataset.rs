//! The published chapter dataset and its storage payload encoding.
//!
//! The stored object body is the dataset JSON encoded a second time as a
//! JSON string literal, i.e. `"[{\"videoId\":...}]"`. Readers must parse the
//! body twice. This matches what existing consumers of the object expect.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chapter::ChapterRecord;

/// Content type of the published object.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Result type for payload encoding.
pub type PayloadResult<T> = Result<T, PayloadError>;

/// Errors raised while encoding or decoding the stored payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// All chapter records produced by one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset(Vec<ChapterRecord>);

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ChapterRecord) {
        self.0.push(record);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn records(&self) -> &[ChapterRecord] {
        &self.0
    }

    /// Serialize the records as a JSON array.
    pub fn to_json(&self) -> PayloadResult<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    /// Encode a dataset JSON string into the stored object body.
    ///
    /// The JSON text is serialized again, yielding a JSON string literal.
    pub fn encode_payload(dataset_json: &str) -> PayloadResult<Vec<u8>> {
        Ok(serde_json::to_string(dataset_json)?.into_bytes())
    }

    /// Decode a stored object body back into records (outer then inner parse).
    pub fn decode_payload(bytes: &[u8]) -> PayloadResult<Self> {
        let outer = std::str::from_utf8(bytes)?;
        let inner: String = serde_json::from_str(outer)?;
        Ok(serde_json::from_str(&inner)?)
    }
}

impl From<Vec<ChapterRecord>> for Dataset {
    fn from(records: Vec<ChapterRecord>) -> Self {
        Self(records)
    }
}

impl FromIterator<ChapterRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = ChapterRecord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
