//! Run handler: sequences lister, aggregator and publisher and maps the
//! outcome to a status code.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use timecode_models::{RunId, RunSummary};
use timecode_storage::{GcsClient, LocalStore, ObjectStore};
use timecode_youtube::{VideoSource, YouTubeClient};
use tracing::{info, Instrument};

use crate::aggregator::aggregate;
use crate::config::JobConfig;
use crate::error::{JobError, JobResult};
use crate::lister::list_catalog;
use crate::logging::RunLogger;
use crate::metrics;
use crate::publisher::Publisher;

/// Lifecycle of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Listing,
    Fetching,
    Publishing,
    Done,
    Failed,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Listing => "listing",
            RunState::Fetching => "fetching",
            RunState::Publishing => "publishing",
            RunState::Done => "done",
            RunState::Failed => "failed",
        }
    }

    /// Whether the run may move from this state to `next`.
    pub fn can_transition_to(&self, next: RunState) -> bool {
        use RunState::*;
        matches!(
            (self, next),
            (Idle, Listing)
                | (Listing, Fetching)
                | (Fetching, Publishing)
                | (Publishing, Done)
                | (Listing, Failed)
                | (Fetching, Failed)
                | (Publishing, Failed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Failed)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handler outcome: 200 with a summary, or 500 with an error message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RunSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HandlerResponse {
    fn ok(summary: RunSummary) -> Self {
        Self {
            status_code: 200,
            summary: Some(summary),
            error: None,
        }
    }

    fn failed(error: &JobError) -> Self {
        Self {
            status_code: 500,
            summary: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

/// The chapter publishing job.
///
/// Holds the explicitly constructed API handles; every run builds its own
/// catalog and dataset.
pub struct ChapterJob {
    source: Arc<dyn VideoSource>,
    publisher: Publisher,
}

impl ChapterJob {
    pub fn new(
        source: Arc<dyn VideoSource>,
        store: Arc<dyn ObjectStore>,
        object_key: impl Into<String>,
    ) -> Self {
        Self {
            source,
            publisher: Publisher::new(store, object_key),
        }
    }

    /// Build the job from environment configuration.
    ///
    /// Writes to `local_output_dir` when set, to Cloud Storage otherwise.
    pub fn from_env(config: &JobConfig) -> JobResult<Self> {
        let source = Arc::new(YouTubeClient::from_env()?);

        let store: Arc<dyn ObjectStore> = match &config.local_output_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                Arc::new(LocalStore::new(dir.clone()))
            }
            None => Arc::new(GcsClient::from_env()?),
        };

        info!(
            location = %store.location(),
            key = %config.object_key,
            "Chapter job configured"
        );

        Ok(Self::new(source, store, config.object_key.clone()))
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        self.publisher.store()
    }

    pub fn object_key(&self) -> &str {
        self.publisher.object_key()
    }

    /// Execute one run: list the catalog, fetch every video, publish.
    pub async fn run(&self, run_id: RunId) -> JobResult<RunSummary> {
        let logger = RunLogger::new(&run_id);
        let span = logger.span();
        self.run_inner(run_id, logger).instrument(span).await
    }

    async fn run_inner(&self, run_id: RunId, mut logger: RunLogger) -> JobResult<RunSummary> {
        let started_at = Utc::now();
        logger.started(self.object_key());

        logger.advance(RunState::Listing);
        let catalog = list_catalog(self.source.as_ref()).await;

        logger.advance(RunState::Fetching);
        let aggregation = match aggregate(self.source.as_ref(), &catalog).await {
            Ok(aggregation) => aggregation,
            Err(e) => {
                logger.fail(&e);
                return Err(e);
            }
        };
        logger.dataset_built(catalog.len(), aggregation.dataset.len(), aggregation.omitted);

        logger.advance(RunState::Publishing);
        let published = match self.publisher.publish(&aggregation.dataset_json).await {
            Ok(published) => published,
            Err(e) => {
                logger.fail(&e);
                return Err(e);
            }
        };
        if !published {
            logger.not_published(self.object_key());
        }

        logger.advance(RunState::Done);
        metrics::record_dataset(catalog.len(), aggregation.dataset.len(), aggregation.omitted);

        let summary = RunSummary {
            run_id,
            started_at,
            finished_at: Utc::now(),
            catalog_size: catalog.len(),
            records: aggregation.dataset.len(),
            omitted: aggregation.omitted,
            published,
            object_key: self.object_key().to_string(),
        };
        logger.finished(&summary);
        Ok(summary)
    }

    /// Run in a dedicated task and map the outcome to a status code.
    ///
    /// A panic inside the run surfaces as a join error and is reported
    /// as a failed run.
    pub async fn handle(self: &Arc<Self>) -> HandlerResponse {
        let start = Instant::now();
        let job = Arc::clone(self);
        let run_id = RunId::new();
        let task = tokio::spawn(async move { job.run(run_id).await });

        let response = match task.await {
            Ok(Ok(summary)) => HandlerResponse::ok(summary),
            Ok(Err(e)) => HandlerResponse::failed(&e),
            Err(join_error) => {
                let error = JobError::run_aborted(join_error.to_string());
                tracing::error!("Run task terminated abnormally: {}", error);
                HandlerResponse::failed(&error)
            }
        };

        metrics::record_run(response.status_code, start.elapsed().as_secs_f64());
        response
    }
}
