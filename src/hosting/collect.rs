//! Run inputs: candidate openings, host slabs and reference lines.

use tracing::debug;

use crate::config::HostingConfig;
use crate::document::{Category, Document, ElementId};

use super::distance::ReferenceLines;
use super::log::RunLog;
use super::RunError;

/// Everything a run needs before the transaction opens.
#[derive(Debug, Clone)]
pub struct RunInputs {
    pub candidates: Vec<ElementId>,
    pub slabs: Vec<ElementId>,
    pub lines: ReferenceLines,
}

/// Generic-model instances whose family name contains the configured filter.
#[must_use]
pub fn collect_candidates<D: Document>(doc: &D, family_filter: &str) -> Vec<ElementId> {
    doc.elements_of_category(Category::GenericModel)
        .into_iter()
        .filter(|&id| match doc.family_name(id) {
            Ok(Some(family)) => family.contains(family_filter),
            Ok(None) => false,
            Err(err) => {
                debug!(element = %id, error = %err, "skipping element without readable family");
                false
            }
        })
        .collect()
}

/// Looks up the X and Y reference grids by exact name.
#[must_use]
pub fn collect_reference_lines<D: Document>(doc: &D, x_name: &str, y_name: &str) -> ReferenceLines {
    let mut lines = ReferenceLines {
        x_name: x_name.to_owned(),
        y_name: y_name.to_owned(),
        ..ReferenceLines::default()
    };
    for grid in doc.elements_of_category(Category::Grid) {
        let Ok(Some(name)) = doc.element_name(grid) else {
            continue;
        };
        let slot = if name == x_name && lines.x.is_none() {
            &mut lines.x
        } else if name == y_name && lines.y.is_none() {
            &mut lines.y
        } else {
            continue;
        };
        *slot = doc.reference_curve(grid).ok().flatten();
    }
    lines
}

/// Collects and validates run inputs, logging each run-level problem.
///
/// # Errors
///
/// Returns an error if there are no candidates, no slabs, or neither reference line.
pub fn collect_inputs<D: Document>(
    doc: &D,
    config: &HostingConfig,
    log: &mut RunLog,
) -> Result<RunInputs, RunError> {
    let candidates = collect_candidates(doc, &config.family_filter);
    if candidates.is_empty() {
        let error = RunError::NoCandidates(config.family_filter.clone());
        log.error(error.to_string());
        return Err(error);
    }

    let slabs = doc.elements_of_category(Category::Floor);
    if slabs.is_empty() {
        log.error(RunError::NoSlabs.to_string());
        return Err(RunError::NoSlabs);
    }

    let lines = collect_reference_lines(doc, &config.grid_x, &config.grid_y);
    if lines.x.is_none() {
        log.warn(format!("grid {} not found, X distance check skipped", config.grid_x));
    }
    if lines.y.is_none() {
        log.warn(format!("grid {} not found, Y distance check skipped", config.grid_y));
    }
    if lines.is_empty() {
        let error = RunError::NoReferenceLines {
            x: config.grid_x.clone(),
            y: config.grid_y.clone(),
        };
        log.error(error.to_string());
        return Err(error);
    }

    Ok(RunInputs {
        candidates,
        slabs,
        lines,
    })
}
