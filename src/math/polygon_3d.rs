use nalgebra::Point2;

use crate::geometry::surface::Plane;

use super::{Point3, TOLERANCE};

/// Edge tolerance in plane coordinates for [`point_in_polygon_3d`].
const ON_EDGE: f64 = TOLERANCE * 100.0;

/// Whether a point coplanar with `polygon` lies inside it or on its boundary.
///
/// Works in `plane` coordinates with the winding rule, so either loop
/// orientation is accepted.
#[must_use]
pub fn point_in_polygon_3d(point: &Point3, polygon: &[Point3], plane: &Plane) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let to_2d = |p: &Point3| {
        let (u, v) = plane.project_uv(p);
        Point2::new(u, v)
    };
    let q = to_2d(point);
    let loop_2d: Vec<Point2<f64>> = polygon.iter().map(to_2d).collect();

    let edges = || loop_2d.iter().zip(loop_2d.iter().cycle().skip(1));
    if edges().any(|(a, b)| segment_distance_2d(&q, a, b).is_some_and(|d| d < ON_EDGE)) {
        return true;
    }
    let winding: i32 = edges()
        .map(|(a, b)| {
            let side = (b - a).perp(&(q - a));
            match (a.y <= q.y, b.y <= q.y) {
                (true, false) if side > 0.0 => 1,
                (false, true) if side < 0.0 => -1,
                _ => 0,
            }
        })
        .sum();
    winding != 0
}

/// Whether `point` is within `tol` of an edge of the closed loop `polygon`.
#[must_use]
pub fn is_near_polygon_edge(point: &Point3, polygon: &[Point3], tol: f64) -> bool {
    polygon
        .iter()
        .zip(polygon.iter().cycle().skip(1))
        .any(|(a, b)| {
            let ab = b - a;
            let len_sq = ab.norm_squared();
            if len_sq < TOLERANCE * TOLERANCE {
                return false;
            }
            let t = ((point - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
            (point - (a + ab * t)).norm() < tol
        })
}

/// Distance from `q` to segment `a..b`, `None` for a degenerate segment.
fn segment_distance_2d(q: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> Option<f64> {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return None;
    }
    let t = ((q - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    Some((q - (a + ab * t)).norm())
}
