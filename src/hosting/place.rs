//! Per-candidate placement: probe, locate, create, size, check, correct.

use thiserror::Error;
use tracing::{debug, info_span};

use crate::config::HostingConfig;
use crate::document::{Category, Document, ElementId, OpeningDimensions};
use crate::error::{HostingError, Result};
use crate::math::{to_mm, Point3};
use crate::topology::FaceId;

use super::distance::{DistancePair, ReferenceLines};
use super::locate::{LocateHostFace, NoHostFace};
use super::log::RunLog;
use super::orient::{in_plane_frame, original_tangent, resolve_orientation, TangentSource};
use super::sampling::{face_normal, project_point_to_face, tangent_or_x};

/// Why a candidate was skipped. The display text is the log message.
#[derive(Debug, Error)]
pub enum CandidateError {
    #[error("has no point location")]
    NoLocation,

    #[error("cannot read dimension parameters: {0}")]
    Dimensions(#[source] HostingError),

    #[error("cannot create probe copy: {0}")]
    Probe(#[source] HostingError),

    #[error("failed to set probe size: {0}")]
    ProbeSize(#[source] HostingError),

    #[error("cannot read probe bounding box")]
    ProbeBounds,

    #[error(transparent)]
    NoHostFace(#[from] NoHostFace),

    #[error("placement failed: {0}")]
    Placement(#[source] HostingError),

    #[error("failed to set depth: {0}")]
    Depth(#[source] HostingError),

    #[error("processing error: {0}")]
    Document(#[from] HostingError),
}

/// A successfully re-hosted candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub instance: ElementId,
    pub slab: ElementId,
    /// Width and height the instance ended with.
    pub dimensions: OpeningDimensions,
    pub swapped: bool,
}

/// Result of processing one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CandidateOutcome {
    /// Left untouched; already hosted by `host`.
    AlreadyHosted { host: ElementId },
    Placed(Placement),
}

/// Log lines prefixed with the candidate id.
struct CandidateLog<'a> {
    id: ElementId,
    log: &'a mut RunLog,
}

impl CandidateLog<'_> {
    fn info(&mut self, message: impl std::fmt::Display) {
        self.log.info(format!("element {} {message}", self.id));
    }

    fn warn(&mut self, message: impl std::fmt::Display) {
        self.log.warn(format!("element {} {message}", self.id));
    }

    fn error(&mut self, message: impl std::fmt::Display) {
        self.log.error(format!("element {} {message}", self.id));
    }
}

/// Temporary and partial elements to delete if the candidate fails.
#[derive(Default)]
struct Scratch {
    probe: Option<ElementId>,
    instance: Option<ElementId>,
}

impl Scratch {
    fn delete_probe<D: Document>(&mut self, doc: &mut D, log: &mut CandidateLog<'_>) {
        if let Some(probe) = self.probe.take() {
            if let Err(err) = doc.delete(probe) {
                log.warn(format_args!("could not delete probe {probe}: {err}"));
            }
        }
    }

    fn rollback<D: Document>(&mut self, doc: &mut D, log: &mut CandidateLog<'_>) {
        self.delete_probe(doc, log);
        if let Some(instance) = self.instance.take() {
            if let Err(err) = doc.delete(instance) {
                log.warn(format_args!("could not delete partial instance {instance}: {err}"));
            }
        }
    }
}

/// Re-hosts one candidate, deleting its probe and any partial instance on failure.
///
/// # Errors
///
/// Returns the reason the candidate was skipped; the document keeps no
/// artifacts of the attempt.
pub fn process_candidate<D: Document>(
    doc: &mut D,
    candidate: ElementId,
    config: &HostingConfig,
    lines: &ReferenceLines,
    log: &mut RunLog,
) -> std::result::Result<CandidateOutcome, CandidateError> {
    let _span = info_span!("candidate", element = %candidate).entered();
    let mut log = CandidateLog { id: candidate, log };
    let mut scratch = Scratch::default();

    let result = run(doc, candidate, config, lines, &mut scratch, &mut log);
    if result.is_err() {
        scratch.rollback(doc, &mut log);
    }
    result
}

fn read_dimensions<D: Document>(doc: &D, id: ElementId, config: &HostingConfig) -> Result<OpeningDimensions> {
    let names = &config.parameters;
    Ok(OpeningDimensions {
        width: doc.parameter(id, &names.width)?,
        height: doc.parameter(id, &names.height)?,
        depth: doc.parameter(id, &names.depth)?,
    })
}

fn slab_host<D: Document>(doc: &D, id: ElementId) -> Result<Option<ElementId>> {
    Ok(doc
        .host(id)?
        .filter(|&host| doc.category(host).is_ok_and(|c| c == Category::Floor)))
}

fn format_point(p: &Point3) -> String {
    format!("X={:.2}, Y={:.2}, Z={:.2}", to_mm(p.x), to_mm(p.y), to_mm(p.z))
}

#[allow(clippy::too_many_lines)]
fn run<D: Document>(
    doc: &mut D,
    id: ElementId,
    config: &HostingConfig,
    lines: &ReferenceLines,
    scratch: &mut Scratch,
    log: &mut CandidateLog<'_>,
) -> std::result::Result<CandidateOutcome, CandidateError> {
    let names = &config.parameters;

    // Filtered
    if let Some(host) = slab_host(doc, id)? {
        log.info(format_args!("already hosted by slab {host}, skipped"));
        return Ok(CandidateOutcome::AlreadyHosted { host });
    }
    let location = doc.location_point(id)?.ok_or(CandidateError::NoLocation)?;
    let dims = read_dimensions(doc, id, config).map_err(CandidateError::Dimensions)?;
    log.info(format_args!(
        "origin(mm): {}; size(mm): W={:.2}, H={:.2}, D={:.2}",
        format_point(&location),
        to_mm(dims.width),
        to_mm(dims.height),
        to_mm(dims.depth)
    ));

    let pre = DistancePair::of_element(doc, id, lines)?;
    for line in pre.describe("PRE", lines) {
        log.info(line);
    }

    // ProbeCreated
    let probe_width = (dims.width - config.shrink()).max(config.min_probe_extent);
    let probe_height = (dims.height - config.shrink()).max(config.min_probe_extent);
    log.info(format_args!(
        "probe size: W={:.2}mm, H={:.2}mm",
        to_mm(probe_width),
        to_mm(probe_height)
    ));
    let probe = doc.duplicate(id).map_err(CandidateError::Probe)?;
    scratch.probe = Some(probe);
    doc.set_parameter(probe, &names.width, probe_width)
        .and_then(|()| doc.set_parameter(probe, &names.height, probe_height))
        .and_then(|()| doc.regenerate())
        .map_err(CandidateError::ProbeSize)?;
    if doc.bounding_box(probe)?.is_none() {
        return Err(CandidateError::ProbeBounds);
    }

    // HostFaceFound
    let host = LocateHostFace::new(probe, location)
        .with_search_margin(config.search_margin)
        .with_horizontal_threshold(config.horizontal_threshold)
        .with_selection(config.slab_selection)
        .execute(doc)??;

    let depth = match doc.slab_thickness(host.slab) {
        Ok(thickness) => {
            log.info(format_args!(
                "host slab {}, thickness={:.2}mm",
                host.slab,
                to_mm(thickness)
            ));
            thickness * config.depth_factor
        }
        Err(err) => {
            log.warn(format_args!(
                "host slab {} thickness unreadable ({err}), keeping depth {:.2}mm",
                host.slab,
                to_mm(dims.depth)
            ));
            dims.depth
        }
    };

    let insertion = if let Some(p) = project_point_to_face(doc.geometry(), host.face, &location) {
        log.info(format_args!("projected point(mm): {}", format_point(&p)));
        p
    } else {
        log.warn("projection onto host face failed, placing at original point");
        location
    };

    let tangent = original_tangent(doc, id, config.horizontal_threshold)?;
    let orientation = resolve_orientation(doc.geometry(), host.face, &tangent)?;
    match orientation.source {
        TangentSource::Projected => log.info("placing along projected original direction"),
        TangentSource::FaceBoundary => log.warn("original direction projection failed, using face tangent"),
    }

    // InstanceCreated
    let instance = doc
        .create_on_face(id, host.reference, insertion, orientation.tangent)
        .map_err(CandidateError::Placement)?;
    scratch.instance = Some(instance);
    scratch.delete_probe(doc, log);

    // DimensionsSet
    doc.set_parameter(instance, &names.depth, depth)
        .map_err(CandidateError::Depth)?;
    log.info(format_args!("set depth={:.2}mm", to_mm(depth)));

    let mut final_dims = OpeningDimensions { depth, ..dims };
    if let Err(err) = doc
        .set_parameter(instance, &names.width, dims.width)
        .and_then(|()| doc.set_parameter(instance, &names.height, dims.height))
    {
        log.error(format_args!("failed to set initial W/H: {err}"));
    }
    regenerate_logged(doc, log);

    // ConsistencyChecked
    let post = DistancePair::of_element(doc, instance, lines)?;
    for line in post.describe("POST", lines) {
        log.info(line);
    }

    let mismatches = pre.mismatches(&post, lines, config.tolerance());
    let mut swapped = false;
    if mismatches.is_empty() {
        log.info("boundary distances consistent, no swap");
    } else {
        for m in &mismatches {
            if let (Some(pre_d), Some(post_d)) = (m.pre, m.post) {
                log.info(format_args!(
                    "{} axis mismatch: PRE={:.2}mm, POST={:.2}mm, diff={:.2}mm",
                    m.axis,
                    to_mm(pre_d),
                    to_mm(post_d),
                    to_mm((pre_d - post_d).abs())
                ));
            }
        }
        match doc
            .set_parameter(instance, &names.width, dims.height)
            .and_then(|()| doc.set_parameter(instance, &names.height, dims.width))
        {
            Ok(()) => {
                log.info("boundary distances inconsistent, swapping width and height");
                final_dims.width = dims.height;
                final_dims.height = dims.width;
                swapped = true;
            }
            Err(err) => log.error(format_args!("failed to swap W/H: {err}")),
        }
        regenerate_logged(doc, log);
        match DistancePair::of_element(doc, instance, lines) {
            Ok(post2) => {
                for line in post2.describe("POST2", lines) {
                    log.info(line);
                }
            }
            Err(err) => log.error(format_args!("re-measuring after swap failed: {err}")),
        }
    }

    // Finalized
    match snap_to_face(doc, instance, host.face, config.snap_threshold) {
        Ok(Some((du, dv))) => log.info(format_args!(
            "in-plane correction: du={:.2}mm, dv={:.2}mm",
            to_mm(du),
            to_mm(dv)
        )),
        Ok(None) => debug!("no in-plane correction needed"),
        Err(err) => log.error(format_args!("in-plane correction failed: {err}")),
    }

    scratch.instance = None;
    if let Err(err) = doc.delete(id) {
        log.error(format_args!("failed to delete original opening: {err}"));
    }

    Ok(CandidateOutcome::Placed(Placement {
        instance,
        slab: host.slab,
        dimensions: final_dims,
        swapped,
    }))
}

fn regenerate_logged<D: Document>(doc: &mut D, log: &mut CandidateLog<'_>) {
    if let Err(err) = doc.regenerate() {
        log.warn(format_args!("regeneration failed: {err}"));
    }
}

/// Moves `instance` within the face plane so that its location lies on the face.
///
/// Returns the applied `(tangent, bitangent)` components, or `None` when the
/// correction is at most `threshold` or the location cannot be projected.
///
/// # Errors
///
/// Returns an error if the instance cannot be read or moved.
pub fn snap_to_face<D: Document>(
    doc: &mut D,
    instance: ElementId,
    face: FaceId,
    threshold: f64,
) -> Result<Option<(f64, f64)>> {
    let Some(current) = doc.location_point(instance)? else {
        return Ok(None);
    };
    let store = doc.geometry();
    let Some(on_face) = project_point_to_face(store, face, &current) else {
        return Ok(None);
    };
    let Some(normal) = face_normal(store, face) else {
        return Ok(None);
    };
    let (tangent, bitangent) = in_plane_frame(&normal, tangent_or_x(store, face));

    let delta = on_face - current;
    let (du, dv) = (delta.dot(&tangent), delta.dot(&bitangent));
    let shift = tangent * du + bitangent * dv;
    if shift.norm() <= threshold {
        return Ok(None);
    }
    doc.translate(instance, &shift)?;
    Ok(Some((du, dv)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::{FootprintSketch, MemoryDocument, OpeningPlacement, OpeningType};
    use crate::math::{from_mm, Vector3};
    use approx::assert_relative_eq;

    fn setup() -> (MemoryDocument, ElementId, ElementId) {
        let mut doc = MemoryDocument::new();
        let slab = doc
            .add_slab(
                vec![
                    Point3::new(-10.0, -10.0, 0.0),
                    Point3::new(10.0, -10.0, 0.0),
                    Point3::new(10.0, 10.0, 0.0),
                    Point3::new(-10.0, 10.0, 0.0),
                ],
                from_mm(200.0),
            )
            .unwrap();
        let ty = OpeningType::new("GEN-CSC-Opening-Rectangular", "600x400", FootprintSketch::WidthFirst);
        let opening = doc
            .add_opening(
                &ty,
                OpeningPlacement::level(Point3::origin(), Vector3::x()),
                OpeningDimensions {
                    width: from_mm(600.0),
                    height: from_mm(400.0),
                    depth: from_mm(150.0),
                },
            )
            .unwrap();
        (doc, slab, opening)
    }

    #[test]
    fn missing_dimension_parameter_skips_without_artifacts() {
        let (mut doc, _, opening) = setup();
        doc.remove_parameter(opening, "CSC-MEP-Depth").unwrap();
        let before = doc.element_count();

        let mut log = RunLog::new();
        let err = process_candidate(&mut doc, opening, &HostingConfig::default(), &ReferenceLines::default(), &mut log)
            .unwrap_err();
        assert!(matches!(err, CandidateError::Dimensions(_)));
        assert_eq!(doc.element_count(), before);
    }

    #[test]
    fn unlocated_candidate_is_rejected() {
        let (mut doc, _, opening) = setup();
        doc.clear_location(opening).unwrap();
        let mut log = RunLog::new();
        let err = process_candidate(&mut doc, opening, &HostingConfig::default(), &ReferenceLines::default(), &mut log)
            .unwrap_err();
        assert!(matches!(err, CandidateError::NoLocation));
    }

    #[test]
    fn read_only_depth_deletes_the_new_instance() {
        let (mut doc, _, _) = setup();
        let locked = OpeningType::new("GEN-CSC-Opening-Rectangular", "locked", FootprintSketch::WidthFirst)
            .with_read_only("CSC-MEP-Depth");
        let opening = doc
            .add_opening(
                &locked,
                OpeningPlacement::level(Point3::new(2.0, 2.0, 0.0), Vector3::x()),
                OpeningDimensions {
                    width: 1.0,
                    height: 1.0,
                    depth: 0.3,
                },
            )
            .unwrap();
        let before = doc.element_count();
        let solids_before = doc.geometry().solid_count();

        let mut log = RunLog::new();
        let err = process_candidate(&mut doc, opening, &HostingConfig::default(), &ReferenceLines::default(), &mut log)
            .unwrap_err();
        assert!(matches!(err, CandidateError::Depth(_)));
        assert_eq!(doc.element_count(), before);
        assert_eq!(doc.geometry().solid_count(), solids_before);
        assert!(doc.contains(opening));
    }

    #[test]
    fn locked_width_discards_the_resized_copy() {
        let (mut doc, _, _) = setup();
        let locked = OpeningType::new("GEN-CSC-Opening-Rectangular", "locked", FootprintSketch::WidthFirst)
            .with_read_only("CSC-MEP-Width");
        let opening = doc
            .add_opening(
                &locked,
                OpeningPlacement::level(Point3::new(-2.0, 2.0, 0.0), Vector3::x()),
                OpeningDimensions {
                    width: 1.0,
                    height: 1.0,
                    depth: 0.3,
                },
            )
            .unwrap();
        let before = doc.element_count();
        let solids_before = doc.geometry().solid_count();

        let mut log = RunLog::new();
        let err = process_candidate(&mut doc, opening, &HostingConfig::default(), &ReferenceLines::default(), &mut log)
            .unwrap_err();
        assert!(matches!(err, CandidateError::ProbeSize(_)));
        assert_eq!(doc.element_count(), before);
        assert_eq!(doc.geometry().solid_count(), solids_before);
        assert!(doc.contains(opening));
        assert!(log.contains("W=254.80mm, H=254.80mm"));
    }

    #[test]
    fn snap_moves_only_within_the_face_plane() {
        let (mut doc, slab, opening) = setup();
        let top = doc.solid_faces(slab, true).unwrap()[0];
        let hosted = doc
            .create_on_face(opening, top.reference.unwrap(), Point3::new(1.0, 1.0, 0.0), Vector3::x())
            .unwrap();
        assert_eq!(snap_to_face(&mut doc, hosted, top.face, 1e-6).unwrap(), None);

        doc.translate(hosted, &Vector3::new(0.0, 0.0, 0.5)).unwrap();
        assert_eq!(snap_to_face(&mut doc, hosted, top.face, 1e-6).unwrap(), None);
        assert_relative_eq!(doc.location_point(hosted).unwrap().unwrap().z, 0.5);
    }
}
