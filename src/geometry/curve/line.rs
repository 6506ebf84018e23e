use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// Unbounded line `origin + t * direction` with a unit direction, so `t` is arc length.
#[derive(Debug, Clone)]
pub struct Line {
    origin: Point3,
    direction: Vector3,
}

impl Line {
    /// # Errors
    ///
    /// Returns an error if `direction` has zero length.
    pub fn new(origin: Point3, direction: Vector3) -> Result<Self> {
        let direction = direction.try_normalize(TOLERANCE).ok_or(GeometryError::ZeroVector)?;
        Ok(Self { origin, direction })
    }

    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    #[must_use]
    pub fn direction(&self) -> &Vector3 {
        &self.direction
    }

    #[must_use]
    pub fn translated(&self, offset: &Vector3) -> Self {
        Self {
            origin: self.origin + offset,
            ..self.clone()
        }
    }
}

impl Curve for Line {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        Ok(self.origin + self.direction * t)
    }

    fn tangent(&self, _t: f64) -> Result<Vector3> {
        Ok(self.direction)
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(f64::NEG_INFINITY, f64::INFINITY)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parameter_is_arc_length() {
        let line = Line::new(Point3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 3.0, 4.0)).unwrap();
        assert_relative_eq!(line.evaluate(5.0).unwrap(), Point3::new(1.0, 3.0, 4.0), epsilon = 1e-12);
        assert!(Line::new(Point3::origin(), Vector3::zeros()).is_err());
    }
}
