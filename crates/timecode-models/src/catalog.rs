//! Per-run catalog of channel video identifiers.

use serde::{Deserialize, Serialize};

use crate::video::VideoId;

/// Ordered list of video ids collected across search pages.
///
/// Duplicates are kept as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog(Vec<VideoId>);

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one page worth of ids, preserving their order.
    pub fn extend_page(&mut self, ids: impl IntoIterator<Item = VideoId>) {
        self.0.extend(ids);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VideoId> {
        self.0.iter()
    }
}

impl From<Vec<VideoId>> for Catalog {
    fn from(ids: Vec<VideoId>) -> Self {
        Self(ids)
    }
}

impl IntoIterator for Catalog {
    type Item = VideoId;
    type IntoIter = std::vec::IntoIter<VideoId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a VideoId;
    type IntoIter = std::slice::Iter<'a, VideoId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_append_in_order_without_dedup() {
        let mut catalog = Catalog::new();
        catalog.extend_page(vec![VideoId::from("a"), VideoId::from("b")]);
        catalog.extend_page(vec![VideoId::from("b"), VideoId::from("c")]);

        let ids: Vec<&str> = catalog.iter().map(VideoId::as_str).collect();
        assert_eq!(ids, vec!["a", "b", "b", "c"]);
        assert_eq!(catalog.len(), 4);
    }
}
