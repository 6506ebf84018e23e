use crate::error::Result;
use crate::geometry::surface::Plane;
use crate::math::polygon_3d::{is_near_polygon_edge, point_in_polygon_3d};
use crate::math::{Point3, Vector3};
use crate::topology::{FaceId, TopologyStore};

/// Polygonal snapshot of a planar face: its plane, outer loop and hole loops.
///
/// Boundary curves are reduced to their vertices, which is exact for
/// straight-edged faces.
#[derive(Debug, Clone)]
pub struct FacePolygon {
    /// Supporting plane of the face.
    pub plane: Plane,
    /// Outward normal (plane normal flipped when the face is reversed).
    pub outward_normal: Vector3,
    /// Outer boundary in traversal order.
    pub outer: Vec<Point3>,
    /// Hole boundaries.
    pub holes: Vec<Vec<Point3>>,
}

impl FacePolygon {
    /// Reads the face from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or one of its wires is missing.
    pub fn collect(store: &TopologyStore, face_id: FaceId) -> Result<Self> {
        let face = store.face(face_id)?;
        let outer = store.wire_points(face.outer_wire)?;
        let holes = face
            .inner_wires
            .iter()
            .map(|wire| store.wire_points(*wire))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self {
            plane: face.surface.clone(),
            outward_normal: face.outward_normal(),
            outer,
            holes,
        })
    }

    /// Tests whether a point on the face plane lies inside the face region.
    ///
    /// Points on the outer boundary count as inside; points strictly inside a hole do not.
    #[must_use]
    pub fn contains(&self, point: &Point3) -> bool {
        point_in_polygon_3d(point, &self.outer, &self.plane)
            && !self.holes.iter().any(|hole| {
                point_in_polygon_3d(point, hole, &self.plane) && !is_near_polygon_edge(point, hole, 1e-8)
            })
    }

    /// Tests whether a point lies within `tol` of any boundary loop.
    #[must_use]
    pub fn is_near_boundary(&self, point: &Point3, tol: f64) -> bool {
        is_near_polygon_edge(point, &self.outer, tol)
            || self.holes.iter().any(|hole| is_near_polygon_edge(point, hole, tol))
    }
}
