//! Video identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque video identifier supplied by the catalog API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier carries no usable value.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_id_serializes_as_plain_string() {
        let id = VideoId::from("dQw4w9WgXcQ");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"dQw4w9WgXcQ\"");
    }

    #[test]
    fn test_blank_video_id_is_empty() {
        assert!(VideoId::default().is_empty());
        assert!(VideoId::from("   ").is_empty());
        assert!(!VideoId::from("abc").is_empty());
    }
}
