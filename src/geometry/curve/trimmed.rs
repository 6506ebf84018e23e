use crate::error::Result;
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Arc, Curve, Line};

/// Result of a closest point query.
#[derive(Debug, Clone, Copy)]
pub struct ClosestPoint {
    /// The closest point on the curve.
    pub point: Point3,
    /// The parameter value at the closest point.
    pub parameter: f64,
    /// The distance from the query point to the closest point.
    pub distance: f64,
}

/// A curve restricted to a parameter interval `[t_start, t_end]`.
///
/// Used for edge geometry and for reference lines, which are bounded in the
/// host model.
#[derive(Debug, Clone)]
pub enum TrimmedCurve {
    /// A bounded line segment.
    Line { line: Line, t_start: f64, t_end: f64 },
    /// A bounded circular arc.
    Arc { arc: Arc, t_start: f64, t_end: f64 },
}

impl TrimmedCurve {
    /// Creates the straight segment from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns an error if the points coincide.
    pub fn segment(start: Point3, end: Point3) -> Result<Self> {
        let dir = end - start;
        let line = Line::new(start, dir)?;
        Ok(Self::Line {
            line,
            t_start: 0.0,
            t_end: dir.norm(),
        })
    }

    /// Wraps an arc, bounded by its own angular domain.
    #[must_use]
    pub fn arc(arc: Arc) -> Self {
        let domain = arc.domain();
        Self::Arc {
            arc,
            t_start: domain.t_min,
            t_end: domain.t_max,
        }
    }

    /// Returns the parameter interval.
    #[must_use]
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            Self::Line { t_start, t_end, .. } | Self::Arc { t_start, t_end, .. } => (*t_start, *t_end),
        }
    }

    /// Evaluates the underlying curve at `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    pub fn evaluate(&self, t: f64) -> Result<Point3> {
        match self {
            Self::Line { line, .. } => line.evaluate(t),
            Self::Arc { arc, .. } => arc.evaluate(t),
        }
    }

    /// Unit tangent at the midpoint of the parameter interval.
    ///
    /// # Errors
    ///
    /// Returns an error if the tangent is degenerate.
    pub fn tangent_at_mid(&self) -> Result<Vector3> {
        let (t0, t1) = self.bounds();
        let mid = 0.5 * (t0 + t1);
        match self {
            Self::Line { line, .. } => line.tangent(mid),
            Self::Arc { arc, .. } => arc.tangent(mid),
        }
    }

    /// Points along the curve including both ends; `segments` intervals.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    pub fn sample(&self, segments: u32) -> Result<Vec<Point3>> {
        let (t0, t1) = self.bounds();
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.evaluate(t0 + (t1 - t0) * f64::from(i) / f64::from(segments)))
            .collect()
    }

    /// Returns a copy shifted by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector3) -> Self {
        match self {
            Self::Line { line, t_start, t_end } => Self::Line {
                line: line.translated(offset),
                t_start: *t_start,
                t_end: *t_end,
            },
            Self::Arc { arc, t_start, t_end } => Self::Arc {
                arc: arc.translated(offset),
                t_start: *t_start,
                t_end: *t_end,
            },
        }
    }

    /// Finds the closest point on the bounded curve to `point`.
    ///
    /// For lines, computes the analytical projection clamped to the bounds.
    /// For arcs, samples then refines by ternary search.
    ///
    /// # Errors
    ///
    /// Returns an error if curve evaluation fails.
    pub fn closest_point(&self, point: &Point3) -> Result<ClosestPoint> {
        match self {
            Self::Line { line, t_start, t_end } => closest_point_on_line(line, *t_start, *t_end, point),
            Self::Arc { arc, t_start, t_end } => closest_point_on_arc(arc, *t_start, *t_end, point),
        }
    }

    /// Euclidean distance from `point` to the bounded curve.
    ///
    /// # Errors
    ///
    /// Returns an error if curve evaluation fails.
    pub fn distance_to(&self, point: &Point3) -> Result<f64> {
        Ok(self.closest_point(point)?.distance)
    }
}

fn closest_point_on_line(line: &Line, t_start: f64, t_end: f64, point: &Point3) -> Result<ClosestPoint> {
    let to_point = point - line.origin();
    let t = to_point.dot(line.direction()).clamp(t_start, t_end);

    let closest = line.evaluate(t)?;
    Ok(ClosestPoint {
        point: closest,
        parameter: t,
        distance: (point - closest).norm(),
    })
}

fn closest_point_on_arc(arc: &Arc, t_start: f64, t_end: f64, point: &Point3) -> Result<ClosestPoint> {
    let to_point = point - arc.center();
    let in_plane = to_point - arc.normal() * to_point.dot(arc.normal());

    if in_plane.norm() < TOLERANCE {
        // Every arc point is equidistant from a query on the axis.
        let closest = arc.evaluate(t_start)?;
        return Ok(ClosestPoint {
            point: closest,
            parameter: t_start,
            distance: (point - closest).norm(),
        });
    }

    let n_samples = 64u32;
    let mut best_t = t_start;
    let mut best_dist = f64::INFINITY;

    for i in 0..=n_samples {
        let t = t_start + f64::from(i) / f64::from(n_samples) * (t_end - t_start);
        let d = (point - arc.evaluate(t)?).norm();
        if d < best_dist {
            best_dist = d;
            best_t = t;
        }
    }

    let dt = (t_end - t_start) / f64::from(n_samples);
    let mut lo = (best_t - dt).max(t_start.min(t_end));
    let mut hi = (best_t + dt).min(t_start.max(t_end));

    for _ in 0..50 {
        let mid1 = lo + (hi - lo) / 3.0;
        let mid2 = hi - (hi - lo) / 3.0;
        let d1 = (point - arc.evaluate(mid1)?).norm();
        let d2 = (point - arc.evaluate(mid2)?).norm();
        if d1 < d2 {
            hi = mid2;
        } else {
            lo = mid1;
        }
    }

    let refined = 0.5 * (lo + hi);
    let closest = arc.evaluate(refined)?;
    let distance = (point - closest).norm();

    // The refinement window may miss a boundary optimum; keep the better of the two.
    if distance <= best_dist {
        Ok(ClosestPoint {
            point: closest,
            parameter: refined,
            distance,
        })
    } else {
        let closest = arc.evaluate(best_t)?;
        Ok(ClosestPoint {
            point: closest,
            parameter: best_t,
            distance: best_dist,
        })
    }
}
