use crate::error::{OperationError, Result};
use crate::geometry::surface::Surface;
use crate::math::Point3;
use crate::topology::{FaceId, TopologyStore};

/// Evaluates a face at the center of its UV bounding box.
///
/// For non-convex faces the result may fall outside the face region; it is
/// a stable representative point, not a centroid.
pub struct FaceCenter {
    face: FaceId,
}

impl FaceCenter {
    /// Creates a new `FaceCenter` query.
    #[must_use]
    pub fn new(face: FaceId) -> Self {
        Self { face }
    }

    /// Executes the query, returning the 3D point.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is missing or its outer wire is empty.
    pub fn execute(&self, store: &TopologyStore) -> Result<Point3> {
        let face = store.face(self.face)?;
        let points = store.wire_points(face.outer_wire)?;
        if points.is_empty() {
            return Err(OperationError::Failed("face boundary has no vertices".into()).into());
        }

        let (mut u_min, mut u_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut v_min, mut v_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in &points {
            let (u, v) = face.surface.project_uv(p);
            u_min = u_min.min(u);
            u_max = u_max.max(u);
            v_min = v_min.min(v);
            v_max = v_max.max(v);
        }

        face.surface.evaluate(0.5 * (u_min + u_max), 0.5 * (v_min + v_max))
    }
}
