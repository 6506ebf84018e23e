//! Boundary-to-reference-line distances and the PRE/POST consistency check.

use tracing::debug;

use crate::document::{Document, ElementId};
use crate::error::Result;
use crate::geometry::curve::TrimmedCurve;
use crate::math::to_mm;
use crate::operations::query::Aabb;

use super::sampling::box_samples;

/// The two structural reference curves; either may be absent.
#[derive(Debug, Clone, Default)]
pub struct ReferenceLines {
    pub x_name: String,
    pub y_name: String,
    pub x: Option<TrimmedCurve>,
    pub y: Option<TrimmedCurve>,
}

impl ReferenceLines {
    /// Whether neither curve is available.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none()
    }
}

/// Minimum boundary distances to the X and Y reference lines.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DistancePair {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

/// Axis along which PRE and POST disagree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMismatch {
    /// `'X'` or `'Y'`.
    pub axis: char,
    pub pre: Option<f64>,
    pub post: Option<f64>,
}

impl DistancePair {
    /// Measures the 26 box samples against both reference lines.
    #[must_use]
    pub fn measure(aabb: &Aabb, lines: &ReferenceLines) -> Self {
        let samples = box_samples(aabb);
        let nearest = |curve: &Option<TrimmedCurve>| {
            let curve = curve.as_ref()?;
            samples
                .iter()
                .filter_map(|p| curve.distance_to(p).ok())
                .filter(|d| d.is_finite())
                .reduce(f64::min)
        };
        Self {
            x: nearest(&lines.x),
            y: nearest(&lines.y),
        }
    }

    /// Measures an element's current bounding box; both distances are `None` without one.
    ///
    /// # Errors
    ///
    /// Returns an error if the element cannot be read.
    pub fn of_element<D: Document>(doc: &D, id: ElementId, lines: &ReferenceLines) -> Result<Self> {
        Ok(doc
            .bounding_box(id)?
            .map(|aabb| Self::measure(&aabb, lines))
            .unwrap_or_default())
    }

    /// Axes with a reference line where `self` (PRE) and `post` disagree.
    ///
    /// A missing distance on a checked axis counts as a mismatch.
    #[must_use]
    pub fn mismatches(&self, post: &Self, lines: &ReferenceLines, tolerance: f64) -> Vec<AxisMismatch> {
        let checks = [
            ('X', lines.x.is_some(), self.x, post.x),
            ('Y', lines.y.is_some(), self.y, post.y),
        ];
        let mismatches: Vec<_> = checks
            .into_iter()
            .filter(|&(_, checked, pre, post)| checked && !within_tolerance(pre, post, tolerance))
            .map(|(axis, _, pre, post)| AxisMismatch { axis, pre, post })
            .collect();
        debug!(count = mismatches.len(), "compared boundary distances");
        mismatches
    }

    /// Log lines for each present distance, tagged with the measurement stage.
    #[must_use]
    pub fn describe(&self, stage: &str, lines: &ReferenceLines) -> Vec<String> {
        [('X', &lines.x_name, self.x), ('Y', &lines.y_name, self.y)]
            .into_iter()
            .filter_map(|(axis, name, d)| d.map(|d| format!("{stage} boundary distance {axis}({name})={:.2}mm", to_mm(d))))
            .collect()
    }
}

/// `|a - b| <= tolerance`, false when either value is missing.
#[must_use]
pub fn within_tolerance(a: Option<f64>, b: Option<f64>, tolerance: f64) -> bool {
    matches!((a, b), (Some(a), Some(b)) if (a - b).abs() <= tolerance)
}
