use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::Surface;

/// Face carrier plane with a right-handed in-plane frame `(u, v, normal)`.
#[derive(Debug, Clone)]
pub struct Plane {
    origin: Point3,
    u_dir: Vector3,
    v_dir: Vector3,
    normal: Vector3,
}

impl Plane {
    /// Plane through `origin` facing `normal`; `u` is chosen perpendicular
    /// to +X, or to +Y for normals close to X.
    ///
    /// # Errors
    ///
    /// Returns an error if `normal` has zero length.
    pub fn from_normal(origin: Point3, normal: Vector3) -> Result<Self> {
        let normal = normal.try_normalize(TOLERANCE).ok_or(GeometryError::ZeroVector)?;
        let seed = if normal.x.abs() < 0.9 { Vector3::x() } else { Vector3::y() };
        let u_dir = normal.cross(&seed).normalize();
        Ok(Self {
            origin,
            v_dir: normal.cross(&u_dir),
            u_dir,
            normal,
        })
    }

    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    #[must_use]
    pub fn u_dir(&self) -> &Vector3 {
        &self.u_dir
    }

    #[must_use]
    pub fn v_dir(&self) -> &Vector3 {
        &self.v_dir
    }

    #[must_use]
    pub fn plane_normal(&self) -> &Vector3 {
        &self.normal
    }

    /// In-plane coordinates of the foot of `point`.
    #[must_use]
    pub fn project_uv(&self, point: &Point3) -> (f64, f64) {
        let rel = point - self.origin;
        (rel.dot(&self.u_dir), rel.dot(&self.v_dir))
    }

    /// Foot of the perpendicular from `point`.
    #[must_use]
    pub fn project_point(&self, point: &Point3) -> Point3 {
        point - self.normal * self.normal.dot(&(point - self.origin))
    }

    #[must_use]
    pub fn translated(&self, offset: &Vector3) -> Self {
        Self {
            origin: self.origin + offset,
            ..self.clone()
        }
    }
}

impl Surface for Plane {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        Ok(self.origin + self.u_dir * u + self.v_dir * v)
    }

    fn normal(&self, _u: f64, _v: f64) -> Result<Vector3> {
        Ok(self.normal)
    }
}
