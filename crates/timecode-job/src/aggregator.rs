//! Aggregator: concurrent fan-out of the fetcher over a catalog.

use futures::stream::{FuturesUnordered, StreamExt};
use timecode_models::{Catalog, Dataset};
use timecode_youtube::VideoSource;
use tracing::info;

use crate::error::JobResult;
use crate::fetcher::fetch_chapter_record;

/// Output of one aggregation pass.
#[derive(Debug, Clone)]
pub struct Aggregation {
    /// Records in fetch completion order.
    pub dataset: Dataset,
    /// `dataset` serialized as a JSON array.
    pub dataset_json: String,
    /// Catalog entries that produced no record.
    pub omitted: usize,
}

/// Fetch every video in the catalog concurrently and serialize the results.
///
/// Waits for every lookup to settle. Individual failures only shrink the
/// dataset; the error path is reserved for serialization.
pub async fn aggregate(source: &dyn VideoSource, catalog: &Catalog) -> JobResult<Aggregation> {
    let mut pending: FuturesUnordered<_> = catalog
        .iter()
        .map(|video_id| fetch_chapter_record(source, video_id))
        .collect();

    let mut dataset = Dataset::new();
    while let Some(result) = pending.next().await {
        if let Some(record) = result {
            dataset.push(record);
        }
    }

    let omitted = catalog.len() - dataset.len();
    let dataset_json = dataset.to_json()?;

    info!(
        videos = catalog.len(),
        records = dataset.len(),
        omitted,
        "Aggregated chapter records"
    );

    Ok(Aggregation {
        dataset,
        dataset_json,
        omitted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedSource;
    use std::collections::HashSet;
    use std::sync::atomic::Ordering;
    use timecode_models::VideoId;

    fn catalog(ids: &[&str]) -> Catalog {
        ids.iter().map(|id| VideoId::from(*id)).collect::<Vec<_>>().into()
    }

    #[tokio::test]
    async fn test_dataset_holds_only_successful_fetches() {
        let source = ScriptedSource::new()
            .video("a", "0:00 Opening\n1:00 Closing")
            .failing_video("b", 500)
            .video("c", "no chapters here");

        let aggregation = aggregate(&source, &catalog(&["a", "b", "c"])).await.unwrap();

        assert_eq!(aggregation.dataset.len(), 2);
        assert_eq!(aggregation.omitted, 1);
        assert_eq!(source.lookup_calls.load(Ordering::SeqCst), 3);

        let ids: HashSet<&str> = aggregation
            .dataset
            .records()
            .iter()
            .map(|r| r.video_id().as_str())
            .collect();
        assert_eq!(ids, HashSet::from(["a", "c"]));
    }

    #[tokio::test]
    async fn test_json_matches_dataset() {
        let source = ScriptedSource::new().video("a", "0:00 Opening");

        let aggregation = aggregate(&source, &catalog(&["a"])).await.unwrap();
        let parsed: Dataset = serde_json::from_str(&aggregation.dataset_json).unwrap();

        assert_eq!(parsed, aggregation.dataset);
        assert!(aggregation.dataset_json.contains("\"videoId\":\"a\""));
    }

    #[tokio::test]
    async fn test_empty_catalog_serializes_to_empty_array() {
        let source = ScriptedSource::new();

        let aggregation = aggregate(&source, &Catalog::new()).await.unwrap();

        assert!(aggregation.dataset.is_empty());
        assert_eq!(aggregation.dataset_json, "[]");
        assert_eq!(aggregation.omitted, 0);
    }

    #[tokio::test]
    async fn test_empty_ids_count_as_omitted() {
        let source = ScriptedSource::new().video("a", "0:00 Opening");

        let aggregation = aggregate(&source, &catalog(&["a", ""])).await.unwrap();

        assert_eq!(aggregation.dataset.len(), 1);
        assert_eq!(aggregation.omitted, 1);
        assert_eq!(source.lookup_calls.load(Ordering::SeqCst), 1);
    }
}
