//! Per-run structured logging.
//!
//! `RunLogger` owns the run's lifecycle state. Every event it emits carries
//! structured fields (state transitions as `from`/`to`, dataset counts) so
//! overlapping runs can be filtered apart by `run_id`.

use timecode_models::{RunId, RunSummary};
use tracing::{error, info, info_span, warn, Span};

use crate::error::JobError;
use crate::handler::RunState;

/// Lifecycle logger for one run.
#[derive(Debug)]
pub struct RunLogger {
    run_id: RunId,
    state: RunState,
}

impl RunLogger {
    pub fn new(run_id: &RunId) -> Self {
        Self {
            run_id: run_id.clone(),
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Span the whole run executes in; lister, fetcher and publisher events
    /// inherit its `run_id`.
    pub fn span(&self) -> Span {
        info_span!("run", run_id = %self.run_id)
    }

    pub fn started(&self, object_key: &str) {
        info!(run_id = %self.run_id, object_key, "Run started");
    }

    /// Move to `next`, logging the transition.
    pub fn advance(&mut self, next: RunState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid run transition {} -> {}",
            self.state,
            next
        );
        info!(
            run_id = %self.run_id,
            from = self.state.as_str(),
            to = next.as_str(),
            "Run state changed"
        );
        self.state = next;
    }

    /// Mark the run failed from whatever stage it was in.
    pub fn fail(&mut self, err: &JobError) {
        error!(
            run_id = %self.run_id,
            from = self.state.as_str(),
            to = RunState::Failed.as_str(),
            error = %err,
            "Run failed"
        );
        self.state = RunState::Failed;
    }

    pub fn dataset_built(&self, catalog_size: usize, records: usize, omitted: usize) {
        if omitted > 0 {
            warn!(
                run_id = %self.run_id,
                catalog_size,
                records,
                omitted,
                "Some videos were omitted from the dataset"
            );
        } else {
            info!(run_id = %self.run_id, catalog_size, records, "Dataset built");
        }
    }

    pub fn not_published(&self, object_key: &str) {
        warn!(run_id = %self.run_id, object_key, "Dataset was not published");
    }

    pub fn finished(&self, summary: &RunSummary) {
        let duration_ms = (summary.finished_at - summary.started_at).num_milliseconds();
        info!(
            run_id = %self.run_id,
            catalog_size = summary.catalog_size,
            records = summary.records,
            omitted = summary.omitted,
            published = summary.published,
            duration_ms,
            "Run finished"
        );
    }
}
