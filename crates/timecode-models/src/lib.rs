//! Shared data models for the Timecode chapter index.
//!
//! This crate provides Serde-serializable types for:
//! - Video identifiers and the per-run catalog
//! - Chapter records and the published dataset
//! - Chapter extraction from description text
//! - Run summaries reported by the job handler

pub mod catalog;
pub mod chapter;
pub mod dataset;
pub mod run;
pub mod video;

// Re-export common types
pub use catalog::Catalog;
pub use chapter::{extract_chapters, ChapterRecord, CHAPTER_START_MARKER, MIN_CHAPTER_LINE_LEN};
pub use dataset::{Dataset, PayloadError, PayloadResult, JSON_CONTENT_TYPE};
pub use run::{RunId, RunSummary};
pub use video::VideoId;
