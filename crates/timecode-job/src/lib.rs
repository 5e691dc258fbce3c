//! Daily job that indexes a YouTube channel's video chapters and publishes
//! them as one JSON object.
//!
//! A run lists the channel catalog, fetches every video concurrently,
//! extracts chapter lines from each description and uploads the result.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod handler;
pub mod lister;
pub mod logging;
pub mod metrics;
pub mod publisher;
pub mod scheduler;
pub mod server;

#[cfg(test)]
mod test_support;

pub use aggregator::{aggregate, Aggregation};
pub use config::JobConfig;
pub use error::{JobError, JobResult};
pub use fetcher::fetch_chapter_record;
pub use handler::{ChapterJob, HandlerResponse, RunState};
pub use lister::list_catalog;
pub use logging::RunLogger;
pub use publisher::Publisher;
pub use scheduler::{following_run, next_daily_run, DailyScheduler};
pub use server::{create_router, AppState};
