use crate::math::intersect_3d::{ray_plane, RayPlane};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::FacePolygon;

/// Position of a point relative to a closed polyhedron.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointClassification {
    Inside,
    Outside,
    OnBoundary,
}

/// Ray directions tried in turn; skewed ones first since axis-aligned rays
/// graze box edges.
const RAYS: [[f64; 3]; 5] = [
    [0.577_350_3, 0.577_350_3, 0.577_350_3],
    [0.267_261_2, -0.534_522_5, 0.801_783_7],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
];

/// Classifies `point` against the faces of a closed polyhedron by crossing parity.
///
/// Falls back to `Outside` when every ray grazes an edge.
#[must_use]
pub fn classify_point(point: &Point3, faces: &[FacePolygon]) -> PointClassification {
    RAYS.iter()
        .find_map(|d| cast(point, &Vector3::new(d[0], d[1], d[2]), faces))
        .unwrap_or(PointClassification::Outside)
}

/// `None` when the ray is ambiguous and another direction must be tried.
fn cast(point: &Point3, dir: &Vector3, faces: &[FacePolygon]) -> Option<PointClassification> {
    let near = TOLERANCE * 10.0;
    let mut crossings = 0usize;

    for face in faces {
        match ray_plane(point, dir, &face.plane) {
            RayPlane::Hit { t, .. } if t.abs() <= near => {
                if face.contains(point) {
                    return Some(PointClassification::OnBoundary);
                }
            }
            RayPlane::Hit { point: hit, t } if t > near && face.contains(&hit) => {
                if face.is_near_boundary(&hit, TOLERANCE * 100.0) {
                    return None;
                }
                crossings += 1;
            }
            RayPlane::InPlane => {
                return face.contains(point).then_some(PointClassification::OnBoundary);
            }
            RayPlane::Hit { .. } | RayPlane::Parallel => {}
        }
    }

    Some(if crossings % 2 == 1 {
        PointClassification::Inside
    } else {
        PointClassification::Outside
    })
}
