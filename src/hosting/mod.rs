//! Re-hosting of unhosted opening placeholders onto floor slabs.
//!
//! [`rehost_openings`] runs the whole batch against a [`Document`]: it
//! collects candidates, then for each one locates the nearest horizontal
//! slab face under a shrunk probe copy, creates a face-hosted replacement,
//! and swaps width and height when boundary distances to the reference grids
//! show the footprint axes came out crossed. Each candidate fails
//! independently; run-level problems abort before anything is mutated.

pub mod collect;
pub mod distance;
pub mod locate;
pub mod log;
pub mod orient;
pub mod place;
pub mod sampling;

pub use collect::{collect_inputs, RunInputs};
pub use distance::{DistancePair, ReferenceLines};
pub use locate::{HostFace, LocateHostFace, NoHostFace};
pub use log::{LogEntry, LogLevel, RunLog};
pub use orient::{Orientation, TangentSource};
pub use place::{process_candidate, CandidateError, CandidateOutcome, Placement};

use thiserror::Error;
use tracing::info;

use crate::config::HostingConfig;
use crate::document::{Document, ElementId};
use crate::error::HostingError;

const TRANSACTION_NAME: &str = "Re-host openings onto slabs";

/// Run-level failures. Nothing has been mutated when these are returned,
/// except for [`RunError::Transaction`] raised at commit.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("no opening elements found with a family name containing '{0}'")]
    NoCandidates(String),

    #[error("no floor slabs found")]
    NoSlabs,

    #[error("reference grids {x} and {y} are both missing, distance comparison impossible")]
    NoReferenceLines { x: String, y: String },

    #[error("transaction failed: {0}")]
    Transaction(#[source] HostingError),
}

/// A run-level failure together with everything logged before it.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct RunAborted {
    #[source]
    pub error: RunError,
    pub log: RunLog,
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Replacement instances, in candidate order.
    pub created: Vec<ElementId>,
    pub placements: Vec<Placement>,
    /// Candidates processed, excluding those already hosted.
    pub total: usize,
    pub already_hosted: usize,
    pub failed: usize,
    pub log: RunLog,
}

impl RunReport {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.created.len()
    }

    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "summary: total openings: {}, succeeded: {}, failed: {}",
            self.total,
            self.succeeded(),
            self.failed
        )
    }
}

/// Re-hosts every matching opening in `doc` within one transaction.
///
/// The log is written to `config.log_path` when set; a write failure is
/// recorded in the returned log only.
///
/// # Errors
///
/// Returns [`RunAborted`] when inputs are unusable or the transaction cannot
/// be opened or committed.
pub fn rehost_openings<D: Document>(doc: &mut D, config: &HostingConfig) -> Result<RunReport, RunAborted> {
    let mut log = RunLog::new();
    let inputs = match collect_inputs(doc, config, &mut log) {
        Ok(inputs) => inputs,
        Err(error) => return Err(RunAborted { error, log }),
    };

    if let Err(err) = doc.begin_transaction(TRANSACTION_NAME) {
        log.error(format!("cannot open transaction: {err}"));
        return Err(RunAborted {
            error: RunError::Transaction(err),
            log,
        });
    }
    info!(
        candidates = inputs.candidates.len(),
        slabs = inputs.slabs.len(),
        "re-hosting openings"
    );

    let mut created = Vec::new();
    let mut placements = Vec::new();
    let mut already_hosted = 0;
    let mut failed = 0;
    for &candidate in &inputs.candidates {
        match process_candidate(doc, candidate, config, &inputs.lines, &mut log) {
            Ok(CandidateOutcome::Placed(placement)) => {
                created.push(placement.instance);
                placements.push(placement);
            }
            Ok(CandidateOutcome::AlreadyHosted { .. }) => already_hosted += 1,
            Err(err) => {
                log.error(format!("element {candidate} {err}"));
                failed += 1;
            }
        }
    }

    if let Err(err) = doc.commit_transaction() {
        log.error(format!("cannot commit transaction: {err}"));
        return Err(RunAborted {
            error: RunError::Transaction(err),
            log,
        });
    }

    let mut report = RunReport {
        created,
        placements,
        total: inputs.candidates.len() - already_hosted,
        already_hosted,
        failed,
        log,
    };
    let summary = report.summary_line();
    report.log.info(summary);

    if let Some(path) = &config.log_path {
        match report.log.write_to(path) {
            Ok(()) => report.log.info(format!("log written to {}", path.display())),
            Err(err) => report.log.error(format!("failed to write log file {}: {err}", path.display())),
        }
    }
    Ok(report)
}
