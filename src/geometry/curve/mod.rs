//! Reference curves: grid lines and edge geometry.

mod arc;
mod line;
mod trimmed;

pub use arc::Arc;
pub use line::Line;
pub use trimmed::{ClosestPoint, TrimmedCurve};

use crate::error::Result;
use crate::math::{Point3, Vector3};

/// Closed parameter interval `[t_min, t_max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    pub t_min: f64,
    pub t_max: f64,
}

impl CurveDomain {
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }
}

/// Unbounded parametric curve; [`TrimmedCurve`] bounds it.
pub trait Curve {
    /// Point at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if `t` cannot be evaluated.
    fn evaluate(&self, t: f64) -> Result<Point3>;

    /// Unit tangent at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error where the derivative vanishes.
    fn tangent(&self, t: f64) -> Result<Vector3>;

    fn domain(&self) -> CurveDomain;
}
