//! Video source abstraction used by the chapter job.

use async_trait::async_trait;
use timecode_models::VideoId;

use crate::error::YouTubeResult;
use crate::types::SearchListResponse;

/// One page of a channel's video search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    /// Video ids in the order the API returned them
    pub video_ids: Vec<VideoId>,
    /// Hits without a video id (channels, playlists)
    pub skipped: usize,
    /// Continuation token; `None` on the last page
    pub next_page_token: Option<String>,
}

impl From<SearchListResponse> for SearchPage {
    fn from(response: SearchListResponse) -> Self {
        let total = response.items.len();
        let video_ids: Vec<VideoId> = response
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .map(VideoId::from)
            .collect();

        Self {
            skipped: total - video_ids.len(),
            video_ids,
            next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
        }
    }
}

/// Snippet fields needed to build a chapter record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSnippet {
    pub title: String,
    pub description: String,
    /// High resolution thumbnail URL
    pub thumbnail_url: String,
}

/// Read access to a channel's videos.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Fetch one page of the channel's videos, newest first.
    async fn search_page(&self, page_token: Option<&str>) -> YouTubeResult<SearchPage>;

    /// Look up the snippet of a single video.
    async fn video_snippet(&self, video_id: &VideoId) -> YouTubeResult<VideoSnippet>;
}
