use crate::error::Result;
use crate::math::intersect_3d::segment_plane_crossing;
use crate::math::Point3;
use crate::topology::{SolidId, TopologyStore};

use super::classify::classify_point;
use super::{Aabb, BoundingBox, FacePolygon, PointClassification};

/// Plane-side tolerance for edge/face crossings.
const CROSSING_TOL: f64 = 1e-9;

/// Tests whether two planar solids share interior volume.
///
/// Bounding boxes are compared first. Interior overlap is then detected by
/// (a) a vertex of one solid lying strictly inside the other, (b) an edge of
/// one solid piercing a face of the other, or (c) either solid's box center
/// lying inside the other. Solids that only touch along faces do not intersect.
pub struct SolidsIntersect {
    a: SolidId,
    b: SolidId,
}

struct SolidSnapshot {
    aabb: Aabb,
    faces: Vec<FacePolygon>,
}

impl SolidSnapshot {
    fn collect(store: &TopologyStore, solid: SolidId) -> Result<Self> {
        let aabb = BoundingBox::new(solid).execute(store)?;
        let faces = store
            .solid_faces(solid)?
            .into_iter()
            .map(|face| FacePolygon::collect(store, face))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { aabb, faces })
    }

    fn vertices(&self) -> impl Iterator<Item = &Point3> + '_ {
        self.faces.iter().flat_map(|f| f.outer.iter())
    }

    fn segments(&self) -> impl Iterator<Item = (&Point3, &Point3)> + '_ {
        self.faces.iter().flat_map(|f| {
            let n = f.outer.len();
            (0..n).map(move |i| (&f.outer[i], &f.outer[(i + 1) % n]))
        })
    }

    fn is_inside(&self, point: &Point3) -> bool {
        classify_point(point, &self.faces) == PointClassification::Inside
    }

    fn is_pierced_by(&self, start: &Point3, end: &Point3) -> bool {
        self.faces.iter().any(|face| {
            segment_plane_crossing(start, end, &face.plane, CROSSING_TOL)
                .is_some_and(|hit| face.contains(&hit))
        })
    }
}

impl SolidsIntersect {
    /// Creates a new `SolidsIntersect` query.
    #[must_use]
    pub fn new(a: SolidId, b: SolidId) -> Self {
        Self { a, b }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if either solid cannot be read.
    pub fn execute(&self, store: &TopologyStore) -> Result<bool> {
        let a = SolidSnapshot::collect(store, self.a)?;
        let b = SolidSnapshot::collect(store, self.b)?;

        if !a.aabb.intersects(&b.aabb) {
            return Ok(false);
        }

        if a.vertices().any(|p| b.is_inside(p)) || b.vertices().any(|p| a.is_inside(p)) {
            return Ok(true);
        }

        if a.segments().any(|(s, e)| b.is_pierced_by(s, e)) || b.segments().any(|(s, e)| a.is_pierced_by(s, e)) {
            return Ok(true);
        }

        Ok(b.is_inside(&a.aabb.center()) || a.is_inside(&b.aabb.center()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Vector3;
    use crate::operations::shaping::ExtrudeProfile;

    fn rect(store: &mut TopologyStore, x0: f64, y0: f64, x1: f64, y1: f64, z_top: f64, depth: f64) -> SolidId {
        let profile = vec![
            Point3::new(x0, y0, z_top),
            Point3::new(x1, y0, z_top),
            Point3::new(x1, y1, z_top),
            Point3::new(x0, y1, z_top),
        ];
        ExtrudeProfile::new(profile, Vector3::new(0.0, 0.0, -depth))
            .execute(store)
            .unwrap()
    }

    #[test]
    fn opening_through_slab_intersects() {
        let mut store = TopologyStore::new();
        let slab = rect(&mut store, -10.0, -10.0, 10.0, 10.0, 0.0, 0.5);
        let probe = rect(&mut store, -1.0, -1.0, 1.0, 1.0, 0.0, 1.0);
        assert!(SolidsIntersect::new(probe, slab).execute(&store).unwrap());
        assert!(SolidsIntersect::new(slab, probe).execute(&store).unwrap());
    }

    #[test]
    fn stacked_boxes_touching_do_not_intersect() {
        let mut store = TopologyStore::new();
        let lower = rect(&mut store, 0.0, 0.0, 2.0, 2.0, 0.0, 1.0);
        let upper = rect(&mut store, 0.0, 0.0, 2.0, 2.0, 1.0, 1.0);
        assert!(!SolidsIntersect::new(lower, upper).execute(&store).unwrap());
    }

    #[test]
    fn crossing_bars_intersect() {
        let mut store = TopologyStore::new();
        let along_x = rect(&mut store, -5.0, -0.5, 5.0, 0.5, 1.0, 1.0);
        let along_y = rect(&mut store, -0.5, -5.0, 0.5, 5.0, 1.0, 1.0);
        assert!(SolidsIntersect::new(along_x, along_y).execute(&store).unwrap());
    }

    #[test]
    fn separated_boxes_do_not_intersect() {
        let mut store = TopologyStore::new();
        let a = rect(&mut store, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0);
        let b = rect(&mut store, 0.0, 3.0, 1.0, 4.0, 0.0, 1.0);
        assert!(!SolidsIntersect::new(a, b).execute(&store).unwrap());
    }
}
