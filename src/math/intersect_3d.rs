use crate::geometry::surface::Plane;

use super::{Point3, Vector3, TOLERANCE};

/// Where the ray `origin + t * dir` meets a plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RayPlane {
    Hit { point: Point3, t: f64 },
    Parallel,
    /// The whole ray lies in the plane.
    InPlane,
}

#[must_use]
pub fn ray_plane(origin: &Point3, dir: &Vector3, plane: &Plane) -> RayPlane {
    let normal = plane.plane_normal();
    let height = plane_side(origin, plane);
    let rate = normal.dot(dir);
    if rate.abs() >= TOLERANCE {
        let t = -height / rate;
        RayPlane::Hit {
            point: origin + dir * t,
            t,
        }
    } else if height.abs() < TOLERANCE {
        RayPlane::InPlane
    } else {
        RayPlane::Parallel
    }
}

/// Signed height of `point` above `plane`, positive on the normal side.
#[must_use]
pub fn plane_side(point: &Point3, plane: &Plane) -> f64 {
    plane.plane_normal().dot(&(point - plane.origin()))
}

/// Point where `start..end` passes through `plane`, if the endpoints lie
/// strictly on opposite sides by more than `tol`.
#[must_use]
pub fn segment_plane_crossing(start: &Point3, end: &Point3, plane: &Plane, tol: f64) -> Option<Point3> {
    let h0 = plane_side(start, plane);
    let h1 = plane_side(end, plane);
    let opposite = (h0 > tol && h1 < -tol) || (h0 < -tol && h1 > tol);
    if !opposite {
        return None;
    }
    Some(start + (end - start) * (h0 / (h0 - h1)))
}
