//! Chapter records and chapter extraction from description text.
//!
//! Chapters are the `<timestamp> <title>` lines creators put in a video
//! description, e.g.:
//!
//! ```text
//! 0:00 Intro
//! 2:15 Topic Name
//! ```
//!
//! Lines are returned as-is after cleanup; they are not split into
//! (time, title) pairs.

use serde::{Deserialize, Serialize};

use crate::video::VideoId;

/// Marker that opens the chapter block in a description.
pub const CHAPTER_START_MARKER: &str = "0:00";

/// Shortest line (in characters, after trimming) kept as a chapter.
pub const MIN_CHAPTER_LINE_LEN: usize = 6;

/// Characters removed from the chapter block before splitting.
const STRIPPED_CHARS: [char; 2] = ['+', '\''];

/// Extract chapter lines from a video description.
///
/// Everything before the first `"0:00"` is ignored. When the marker is
/// absent the result is empty.
///
/// # Examples
/// ```
/// use timecode_models::extract_chapters;
///
/// let chapters = extract_chapters("intro\n0:00 Start\n0:45 Middle\n1:30 End");
/// assert_eq!(chapters, vec!["0:00 Start", "0:45 Middle", "1:30 End"]);
/// assert!(extract_chapters("no chapters here").is_empty());
/// ```
pub fn extract_chapters(description: &str) -> Vec<String> {
    let Some(start) = description.find(CHAPTER_START_MARKER) else {
        return Vec::new();
    };

    let block: String = description[start..]
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect();

    // Length is measured after trimming, so whitespace padding cannot carry
    // a short line like "  0:5 " past the minimum.
    block
        .split('\n')
        .map(str::trim)
        .filter(|line| line.chars().count() >= MIN_CHAPTER_LINE_LEN)
        .map(str::to_string)
        .collect()
}

/// Chapter index entry for a single video.
///
/// Built once per successful lookup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterRecord {
    video_id: VideoId,
    title: String,
    chapters: Vec<String>,
    /// High resolution thumbnail URL.
    thumbnails: String,
}

impl ChapterRecord {
    /// Build a record from a video's snippet fields.
    ///
    /// The description is run through [`extract_chapters`].
    pub fn from_snippet(
        video_id: VideoId,
        title: impl Into<String>,
        description: &str,
        thumbnail_url: impl Into<String>,
    ) -> Self {
        Self {
            video_id,
            title: title.into(),
            chapters: extract_chapters(description),
            thumbnails: thumbnail_url.into(),
        }
    }

    pub fn video_id(&self) -> &VideoId {
        &self.video_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn chapters(&self) -> &[String] {
        &self.chapters
    }

    pub fn thumbnail_url(&self) -> &str {
        &self.thumbnails
    }
}
