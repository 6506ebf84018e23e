use crate::error::{OperationError, Result};
use crate::geometry::surface::Plane;
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::topology::{FaceData, FaceId, TopologyStore, WireId};

/// Creates a planar face bounded by a closed outer wire and optional hole wires.
///
/// The plane normal follows the outer wire's winding (right-hand rule).
pub struct MakeFace {
    outer_wire: WireId,
    inner_wires: Vec<WireId>,
}

impl MakeFace {
    /// Creates a new `MakeFace` operation.
    #[must_use]
    pub fn new(outer_wire: WireId, inner_wires: Vec<WireId>) -> Self {
        Self {
            outer_wire,
            inner_wires,
        }
    }

    /// Executes the operation, creating the face in the topology store.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] if the outer wire is open, or
    /// [`OperationError::Failed`] if its points are collinear.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<FaceId> {
        if !store.wire(self.outer_wire)?.is_closed {
            return Err(OperationError::InvalidInput("face boundary must be a closed wire".into()).into());
        }
        let points = store.wire_points(self.outer_wire)?;
        let normal = newell_normal(&points)?;
        let surface = Plane::from_normal(points[0], normal)?;

        Ok(store.add_face(FaceData {
            surface,
            outer_wire: self.outer_wire,
            inner_wires: self.inner_wires.clone(),
            same_sense: true,
        }))
    }
}

/// Computes the unit normal of a polygon using Newell's method.
///
/// # Errors
///
/// Returns [`OperationError::Failed`] if the polygon has no area.
pub fn newell_normal(points: &[Point3]) -> Result<Vector3> {
    let n = points.len();
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let curr = &points[i];
        let next = &points[(i + 1) % n];
        normal.x += (curr.y - next.y) * (curr.z + next.z);
        normal.y += (curr.z - next.z) * (curr.x + next.x);
        normal.z += (curr.x - next.x) * (curr.y + next.y);
    }
    let len = normal.norm();
    if len < TOLERANCE {
        return Err(OperationError::Failed("degenerate polygon: cannot compute normal".into()).into());
    }
    Ok(normal / len)
}
