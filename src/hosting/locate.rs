//! Host-face location: the nearest horizontal, referenceable slab face under a probe.

use thiserror::Error;
use tracing::debug;

use crate::config::SlabSelection;
use crate::document::{Category, Document, ElementId, FaceReference};
use crate::error::Result;
use crate::math::Point3;
use crate::topology::FaceId;

use super::sampling::{face_midpoint, is_horizontal};

/// A located hosting face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostFace {
    pub face: FaceId,
    pub reference: FaceReference,
    pub slab: ElementId,
    /// Distance from the face midpoint to the probe location, if it could be measured.
    pub distance: Option<f64>,
}

/// No qualifying face was found; carries the slabs whose boxes overlapped the probe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no horizontal host face found; candidate slabs: {}", format_ids(.candidates))]
pub struct NoHostFace {
    pub candidates: Vec<ElementId>,
}

fn format_ids(ids: &[ElementId]) -> String {
    let items: Vec<String> = ids.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}

/// Finds the slab face hosting a probe.
pub struct LocateHostFace {
    probe: ElementId,
    location: Point3,
    search_margin: f64,
    horizontal_threshold: f64,
    selection: SlabSelection,
}

impl LocateHostFace {
    /// Creates a locator for `probe`, measuring face distances from `location`.
    #[must_use]
    pub fn new(probe: ElementId, location: Point3) -> Self {
        Self {
            probe,
            location,
            search_margin: 0.1,
            horizontal_threshold: 0.95,
            selection: SlabSelection::default(),
        }
    }

    #[must_use]
    pub fn with_search_margin(mut self, margin: f64) -> Self {
        self.search_margin = margin;
        self
    }

    #[must_use]
    pub fn with_horizontal_threshold(mut self, threshold: f64) -> Self {
        self.horizontal_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_selection(mut self, selection: SlabSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Runs the search.
    ///
    /// The outer error is a document failure reading the probe; the inner
    /// one means no qualifying face exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the probe's bounding box or the slab filter cannot be read.
    pub fn execute<D: Document>(&self, doc: &D) -> Result<std::result::Result<HostFace, NoHostFace>> {
        let Some(probe_box) = doc.bounding_box(self.probe)? else {
            return Ok(Err(NoHostFace { candidates: Vec::new() }));
        };
        let outline = probe_box.expanded(self.search_margin);
        let candidates = doc.elements_intersecting_box(Category::Floor, &outline)?;

        let mut best: Option<HostFace> = None;
        for &slab in &candidates {
            match doc.elements_intersect(self.probe, slab) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(err) => {
                    debug!(slab = %slab, error = %err, "skipping slab after intersection failure");
                    continue;
                }
            }

            let faces = match doc.solid_faces(slab, true) {
                Ok(faces) => faces,
                Err(err) => {
                    debug!(slab = %slab, error = %err, "skipping slab whose faces cannot be read");
                    continue;
                }
            };
            for handle in faces {
                let Some(reference) = handle.reference else {
                    continue;
                };
                if !is_horizontal(doc.geometry(), handle.face, self.horizontal_threshold) {
                    continue;
                }
                let distance = face_midpoint(doc.geometry(), handle.face).map(|mid| (mid - self.location).norm());
                let closer = match (best, distance) {
                    (None, _) => true,
                    (Some(current), Some(d)) => current.distance.map_or(true, |c| d < c),
                    (Some(_), None) => false,
                };
                if closer {
                    best = Some(HostFace {
                        face: handle.face,
                        reference,
                        slab,
                        distance,
                    });
                }
            }

            if best.is_some() && self.selection == SlabSelection::FirstIntersecting {
                break;
            }
        }

        Ok(best.ok_or(NoHostFace { candidates }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::{FootprintSketch, MemoryDocument, OpeningDimensions, OpeningPlacement, OpeningType};
    use crate::math::Vector3;
    use approx::assert_relative_eq;

    fn square(half: f64, cx: f64, z: f64) -> Vec<Point3> {
        vec![
            Point3::new(cx - half, -half, z),
            Point3::new(cx + half, -half, z),
            Point3::new(cx + half, half, z),
            Point3::new(cx - half, half, z),
        ]
    }

    fn probe(doc: &mut MemoryDocument, at: Point3) -> ElementId {
        let ty = OpeningType::new("GEN-CSC-Opening-Rectangular", "probe", FootprintSketch::WidthFirst);
        let dims = OpeningDimensions {
            width: 1.0,
            height: 1.0,
            depth: 0.5,
        };
        doc.add_opening(&ty, OpeningPlacement::level(at, Vector3::x()), dims).unwrap()
    }

    #[test]
    fn picks_top_face_nearest_to_location() {
        let mut doc = MemoryDocument::new();
        let slab = doc.add_slab(square(10.0, 0.0, 0.0), 1.0).unwrap();
        let probe = probe(&mut doc, Point3::origin());

        let host = LocateHostFace::new(probe, Point3::origin()).execute(&doc).unwrap().unwrap();
        assert_eq!(host.slab, slab);
        assert_eq!(host.reference.element, slab);
        assert_relative_eq!(host.distance.unwrap(), 0.0, epsilon = 1e-12);
        let normal = doc.geometry().face(host.face).unwrap().outward_normal();
        assert_relative_eq!(normal.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn no_intersecting_slab_reports_box_candidates() {
        let mut doc = MemoryDocument::new();
        // Box overlaps within the search margin but the solids do not touch.
        let near = doc.add_slab(square(1.0, 1.55, 0.0), 1.0).unwrap();
        doc.add_slab(square(1.0, 40.0, 0.0), 1.0).unwrap();
        let probe = probe(&mut doc, Point3::origin());

        let missing = LocateHostFace::new(probe, Point3::origin()).execute(&doc).unwrap().unwrap_err();
        assert_eq!(missing.candidates, vec![near]);
        assert!(missing.to_string().contains(&format!("[{near}]")));
    }

    #[test]
    fn selection_policy_decides_between_stacked_slabs() {
        let mut doc = MemoryDocument::new();
        // Two slabs the probe passes through; the second has a face nearer the location.
        let upper = doc.add_slab(square(10.0, 0.0, 0.0), 0.25).unwrap();
        let lower = doc.add_slab(square(10.0, 0.0, -0.3), 0.1).unwrap();
        let probe = probe(&mut doc, Point3::origin());
        let location = Point3::new(0.0, 0.0, -0.35);

        let first = LocateHostFace::new(probe, location).execute(&doc).unwrap().unwrap();
        assert_eq!(first.slab, upper);

        let global = LocateHostFace::new(probe, location)
            .with_selection(SlabSelection::GlobalNearest)
            .execute(&doc)
            .unwrap()
            .unwrap();
        assert_eq!(global.slab, lower);
    }
}
