use crate::error::Result;
use crate::math::Point3;
use crate::topology::{FaceId, TopologyStore};

use super::FacePolygon;

/// Result of projecting a point onto a bounded face.
#[derive(Debug, Clone, Copy)]
pub struct FacePoint {
    /// U parameter on the face plane.
    pub u: f64,
    /// V parameter on the face plane.
    pub v: f64,
    /// 3D point on the face.
    pub point: Point3,
    /// Distance from the query point to the face point.
    pub distance: f64,
}

/// Projects a point orthogonally onto a face.
///
/// Yields `None` when the foot of the perpendicular falls outside the face
/// boundary (or inside a hole), mirroring host APIs whose face projection
/// fails off-face.
pub struct ProjectOntoFace {
    face: FaceId,
    query: Point3,
}

impl ProjectOntoFace {
    /// Creates a new query.
    #[must_use]
    pub fn new(face: FaceId, query: Point3) -> Self {
        Self { face, query }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is not found.
    pub fn execute(&self, store: &TopologyStore) -> Result<Option<FacePoint>> {
        let polygon = FacePolygon::collect(store, self.face)?;
        let point = polygon.plane.project_point(&self.query);
        if !polygon.contains(&point) {
            return Ok(None);
        }
        let (u, v) = polygon.plane.project_uv(&point);
        Ok(Some(FacePoint {
            u,
            v,
            point,
            distance: (self.query - point).norm(),
        }))
    }
}
