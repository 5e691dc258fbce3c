//! YouTube Data API v3 client.
//!
//! This crate provides:
//! - Paginated channel search (`search.list`)
//! - Single video snippet lookup (`videos.list`)
//! - The `VideoSource` trait the chapter job is written against
//! - Request tracing spans and metrics

pub mod client;
pub mod error;
pub mod metrics;
pub mod source;
pub mod types;


pub use client::{YouTubeClient, YouTubeConfig, DEFAULT_BASE_URL, MAX_PAGE_SIZE};
pub use error::{YouTubeError, YouTubeResult};
pub use source::{SearchPage, VideoSnippet, VideoSource};
