//! Video fetcher: one snippet lookup turned into one chapter record.

use timecode_models::{ChapterRecord, VideoId};
use timecode_youtube::VideoSource;
use tracing::{debug, warn};

/// Fetch a video's snippet and build its chapter record.
///
/// Returns `None` for an empty id (without calling the API) and for any
/// failed lookup; failures are logged and never propagate.
pub async fn fetch_chapter_record(
    source: &dyn VideoSource,
    video_id: &VideoId,
) -> Option<ChapterRecord> {
    if video_id.is_empty() {
        debug!("Skipping empty video id");
        return None;
    }

    match source.video_snippet(video_id).await {
        Ok(snippet) => {
            let record = ChapterRecord::from_snippet(
                video_id.clone(),
                snippet.title,
                &snippet.description,
                snippet.thumbnail_url,
            );
            debug!(video_id = %video_id, chapters = record.chapters().len(), "Fetched chapters");
            Some(record)
        }
        Err(e) => {
            warn!(video_id = %video_id, "Failed to fetch video, omitting it: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedSource;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_builds_record_from_snippet() {
        let source = ScriptedSource::new().video("v1", "Intro text\n0:00 Start\n2:30 Topic");

        let record = fetch_chapter_record(&source, &VideoId::from("v1"))
            .await
            .unwrap();

        assert_eq!(record.video_id().as_str(), "v1");
        assert_eq!(record.title(), "Title v1");
        assert_eq!(record.chapters(), ["0:00 Start", "2:30 Topic"]);
        assert_eq!(record.thumbnail_url(), "https://img.example/v1.jpg");
    }

    #[tokio::test]
    async fn test_empty_id_makes_no_call() {
        let source = ScriptedSource::new();

        assert!(fetch_chapter_record(&source, &VideoId::default()).await.is_none());
        assert!(fetch_chapter_record(&source, &VideoId::from("  ")).await.is_none());
        assert_eq!(source.lookup_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_lookup_is_swallowed() {
        let source = ScriptedSource::new().failing_video("bad", 500);

        assert!(fetch_chapter_record(&source, &VideoId::from("bad")).await.is_none());
        assert_eq!(source.lookup_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_item_is_swallowed() {
        let source = ScriptedSource::new();
        assert!(fetch_chapter_record(&source, &VideoId::from("unknown")).await.is_none());
    }
}
