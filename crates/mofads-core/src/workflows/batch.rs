use crate::core::models::structure::AtomicStructure;
use crate::engine::assembler::PlacementResult;
use crate::engine::config::EngineConfig;
use crate::engine::error::PlacementError;
use crate::engine::place;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::request::PlacementRequest;
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One independent placement of a batch.
#[derive(Debug, Clone)]
pub struct BatchJob {
    /// Caller-chosen identifier, typically the input file name.
    pub id: String,
    pub structure: AtomicStructure,
    pub request: PlacementRequest,
}

#[derive(Debug, Clone)]
pub struct BatchSuccess {
    pub id: String,
    pub result: PlacementResult,
}

#[derive(Debug, Clone)]
pub struct BatchFailure {
    pub id: String,
    pub error: PlacementError,
}

/// Results of a batch, successes and failures kept apart, each in job order.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub succeeded: Vec<BatchSuccess>,
    pub failed: Vec<BatchFailure>,
}

impl BatchOutcome {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs every job, never stopping on a failure.
///
/// With the `parallel` feature the jobs run on the rayon thread pool; the outcome is
/// ordered by job position either way.
#[instrument(skip_all, name = "batch_workflow")]
pub fn run(jobs: &[BatchJob], config: &EngineConfig, reporter: &ProgressReporter) -> BatchOutcome {
    reporter.report(Progress::PhaseStart {
        name: "Placing adsorbates",
    });
    info!(jobs = jobs.len(), "Starting batch placement.");
    reporter.report(Progress::TaskStart {
        total_steps: jobs.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = jobs.iter();

    #[cfg(feature = "parallel")]
    let iterator = jobs.par_iter();

    let results: Vec<Result<PlacementResult, PlacementError>> = iterator
        .map(|job| {
            let result = place(&job.structure, &job.request, config);
            match &result {
                Ok(_) => reporter.report(Progress::JobPlaced {
                    label: job.id.clone(),
                }),
                Err(e) => reporter.report(Progress::JobFailed {
                    label: job.id.clone(),
                    reason: e.to_string(),
                }),
            }
            reporter.report(Progress::TaskIncrement);
            result
        })
        .collect();

    reporter.report(Progress::TaskFinish);

    let mut outcome = BatchOutcome::default();
    for (job, result) in jobs.iter().zip(results) {
        match result {
            Ok(result) => outcome.succeeded.push(BatchSuccess {
                id: job.id.clone(),
                result,
            }),
            Err(error) => {
                warn!(job = %job.id, error = %error, "Placement failed.");
                outcome.failed.push(BatchFailure {
                    id: job.id.clone(),
                    error,
                });
            }
        }
    }

    info!(
        succeeded = outcome.succeeded.len(),
        failed = outcome.failed.len(),
        "Batch placement finished."
    );
    reporter.report(Progress::PhaseFinish);
    outcome
}
