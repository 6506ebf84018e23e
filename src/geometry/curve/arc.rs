use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// Circular arc, as used by curved grid lines.
///
/// The parameter is the sweep angle in radians, measured from `x_axis`
/// towards `normal x x_axis`.
#[derive(Debug, Clone)]
pub struct Arc {
    center: Point3,
    radius: f64,
    normal: Vector3,
    x_axis: Vector3,
    y_axis: Vector3,
    angles: (f64, f64),
}

fn unit(v: Vector3) -> Result<Vector3> {
    let len = v.norm();
    if len < TOLERANCE {
        return Err(GeometryError::ZeroVector.into());
    }
    Ok(v / len)
}

impl Arc {
    /// Builds an arc sweeping `start..end` radians about `normal`, with angle
    /// zero pointing along `x_axis`.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive radius, a zero axis, or an
    /// `x_axis` that leaves the arc plane.
    pub fn new(center: Point3, radius: f64, normal: Vector3, x_axis: Vector3, start: f64, end: f64) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate(format!("arc radius {radius} is not positive")).into());
        }
        let normal = unit(normal)?;
        let x_axis = unit(x_axis)?;
        if normal.dot(&x_axis).abs() > 1e-9 {
            return Err(GeometryError::Degenerate("arc start direction is not in the arc plane".into()).into());
        }
        Ok(Self {
            center,
            radius,
            normal,
            x_axis,
            y_axis: normal.cross(&x_axis),
            angles: (start, end),
        })
    }

    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Unit axis of the arc plane.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    #[must_use]
    pub fn translated(&self, offset: &Vector3) -> Self {
        Self {
            center: self.center + offset,
            ..self.clone()
        }
    }

    fn radial(&self, t: f64) -> Vector3 {
        self.x_axis * t.cos() + self.y_axis * t.sin()
    }
}

impl Curve for Arc {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        Ok(self.center + self.radial(t) * self.radius)
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        unit(self.normal.cross(&self.radial(t)))
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(self.angles.0, self.angles.1)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn sweeps_counter_clockwise_about_normal() {
        let arc = Arc::new(Point3::new(1.0, 1.0, 0.0), 2.0, Vector3::z(), Vector3::x(), 0.0, PI).unwrap();
        assert_relative_eq!(arc.evaluate(FRAC_PI_2).unwrap(), Point3::new(1.0, 3.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(arc.tangent(0.0).unwrap(), Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(arc.tangent(PI).unwrap(), -Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn translation_keeps_radius_and_sweep() {
        let arc = Arc::new(Point3::origin(), 1.0, Vector3::z(), Vector3::x(), 0.0, FRAC_PI_2)
            .unwrap()
            .translated(&Vector3::new(0.0, 0.0, 3.0));
        assert_eq!(arc.domain(), CurveDomain::new(0.0, FRAC_PI_2));
        assert_relative_eq!(arc.evaluate(0.0).unwrap(), Point3::new(1.0, 0.0, 3.0), epsilon = 1e-12);
    }

    #[test]
    fn rejects_bad_construction() {
        assert!(Arc::new(Point3::origin(), 0.0, Vector3::z(), Vector3::x(), 0.0, 1.0).is_err());
        assert!(Arc::new(Point3::origin(), 1.0, Vector3::zeros(), Vector3::x(), 0.0, 1.0).is_err());
        assert!(Arc::new(Point3::origin(), 1.0, Vector3::z(), Vector3::new(1.0, 0.0, 1.0), 0.0, 1.0).is_err());
    }
}
