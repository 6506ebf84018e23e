//! Face classification, tangent extraction and point sampling over document geometry.

use tracing::debug;

use crate::math::{normalize_or_keep, Point3, Vector3};
use crate::operations::query::{Aabb, FaceCenter, ProjectOntoFace};
use crate::topology::{FaceId, TopologyStore};

/// Tangents shorter than this are treated as missing.
const MIN_TANGENT: f64 = 1e-6;

/// Outward unit normal of a face, `None` if the face cannot be read.
#[must_use]
pub fn face_normal(store: &TopologyStore, face: FaceId) -> Option<Vector3> {
    store.face(face).ok().map(|f| normalize_or_keep(&f.outward_normal()))
}

/// Whether the face normal is within `threshold` of vertical (`|n.z| > threshold`).
#[must_use]
pub fn is_horizontal(store: &TopologyStore, face: FaceId, threshold: f64) -> bool {
    face_normal(store, face).is_some_and(|n| n.z.abs() > threshold)
}

/// Direction of the first usable boundary segment, in loop traversal order.
///
/// Straight segments give their direction; curved ones their derivative at
/// the parameter midpoint. Segments that cannot be evaluated are skipped.
#[must_use]
pub fn first_tangent_in_face(store: &TopologyStore, face: FaceId) -> Option<Vector3> {
    let data = store.face(face).ok()?;
    for wire in data.wires() {
        let Ok(wire) = store.wire(wire) else {
            continue;
        };
        for oe in &wire.edges {
            let Ok(edge) = store.edge(oe.edge) else {
                continue;
            };
            match edge.curve.tangent_at_mid() {
                Ok(t) if t.norm() > MIN_TANGENT => return Some(normalize_or_keep(&(t * oe.sign()))),
                _ => debug!("skipping boundary segment without a usable tangent"),
            }
        }
    }
    None
}

/// [`first_tangent_in_face`], defaulting to +X.
#[must_use]
pub fn tangent_or_x(store: &TopologyStore, face: FaceId) -> Vector3 {
    first_tangent_in_face(store, face).unwrap_or_else(Vector3::x)
}

/// Orthogonal projection of `point` onto the bounded face, `None` off the face.
#[must_use]
pub fn project_point_to_face(store: &TopologyStore, face: FaceId, point: &Point3) -> Option<Point3> {
    ProjectOntoFace::new(face, *point)
        .execute(store)
        .ok()
        .flatten()
        .map(|hit| hit.point)
}

/// Face evaluated at the centre of its UV bounding box.
#[must_use]
pub fn face_midpoint(store: &TopologyStore, face: FaceId) -> Option<Point3> {
    FaceCenter::new(face).execute(store).ok()
}

/// The 26 boundary samples of a box: 8 corners, 12 edge midpoints, 6 face centres.
#[must_use]
pub fn box_samples(aabb: &Aabb) -> Vec<Point3> {
    let (lo, hi) = (aabb.min, aabb.max);
    let mid = aabb.center();
    let mut samples = Vec::with_capacity(26);

    for x in [lo.x, hi.x] {
        for y in [lo.y, hi.y] {
            for z in [lo.z, hi.z] {
                samples.push(Point3::new(x, y, z));
            }
        }
    }

    for a in [lo, hi] {
        for b in [lo, hi] {
            samples.push(Point3::new(mid.x, a.y, b.z));
            samples.push(Point3::new(a.x, mid.y, b.z));
            samples.push(Point3::new(a.x, b.y, mid.z));
        }
    }

    for a in [lo, hi] {
        samples.push(Point3::new(mid.x, mid.y, a.z));
        samples.push(Point3::new(mid.x, a.y, mid.z));
        samples.push(Point3::new(a.x, mid.y, mid.z));
    }

    samples
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::curve::{Arc, TrimmedCurve};
    use crate::geometry::surface::Plane;
    use crate::operations::creation::{MakeFace, MakeWire};
    use crate::operations::shaping::ExtrudeProfile;
    use crate::topology::{EdgeData, FaceData, OrientedEdge, VertexData, WireData};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn box_samples_cover_corners_edges_and_faces() {
        let aabb = Aabb::new(p(0.0, 0.0, 0.0), p(2.0, 4.0, 6.0));
        let samples = box_samples(&aabb);
        assert_eq!(samples.len(), 26);

        let count = |f: &dyn Fn(&Point3) -> bool| samples.iter().filter(|s| f(s)).count();
        let on_mid = |v: f64, mid: f64| (v - mid).abs() < 1e-12;
        let mids = |s: &Point3| [on_mid(s.x, 1.0), on_mid(s.y, 2.0), on_mid(s.z, 3.0)].iter().filter(|b| **b).count();
        assert_eq!(count(&|s| mids(s) == 0), 8);
        assert_eq!(count(&|s| mids(s) == 1), 12);
        assert_eq!(count(&|s| mids(s) == 2), 6);
    }

    #[test]
    fn top_and_side_faces_of_a_box() {
        let mut store = TopologyStore::new();
        let solid = ExtrudeProfile::new(
            vec![p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(2.0, 1.0, 0.0), p(0.0, 1.0, 0.0)],
            Vector3::new(0.0, 0.0, -1.0),
        )
        .execute(&mut store)
        .unwrap();
        let faces = store.solid_faces(solid).unwrap();

        assert!(is_horizontal(&store, faces[0], 0.95));
        assert!(is_horizontal(&store, faces[1], 0.95));
        assert!(!is_horizontal(&store, faces[2], 0.95));

        let t = first_tangent_in_face(&store, faces[0]).unwrap();
        assert_relative_eq!(t.x, 1.0, epsilon = 1e-12);

        let mid = face_midpoint(&store, faces[0]).unwrap();
        assert_relative_eq!(mid.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(mid.y, 0.5, epsilon = 1e-12);

        let on = project_point_to_face(&store, faces[0], &p(0.5, 0.5, 3.0)).unwrap();
        assert_relative_eq!(on.z, 0.0, epsilon = 1e-12);
        assert!(project_point_to_face(&store, faces[0], &p(5.0, 0.5, 3.0)).is_none());
    }

    #[test]
    fn curved_first_segment_uses_midpoint_derivative() {
        let mut store = TopologyStore::new();
        // Half disc: arc from (1,0) over (0,1) to (-1,0), closed by a chord.
        let arc = Arc::new(p(0.0, 0.0, 0.0), 1.0, Vector3::z(), Vector3::x(), 0.0, std::f64::consts::PI).unwrap();
        let a = store.add_vertex(VertexData::new(p(1.0, 0.0, 0.0)));
        let b = store.add_vertex(VertexData::new(p(-1.0, 0.0, 0.0)));
        let arc_edge = store.add_edge(EdgeData {
            start: a,
            end: b,
            curve: TrimmedCurve::arc(arc),
        });
        let chord = store.add_edge(EdgeData {
            start: b,
            end: a,
            curve: TrimmedCurve::segment(p(-1.0, 0.0, 0.0), p(1.0, 0.0, 0.0)).unwrap(),
        });
        let wire = store.add_wire(WireData {
            edges: vec![OrientedEdge::new(arc_edge, true), OrientedEdge::new(chord, true)],
            is_closed: true,
        });
        let face = store.add_face(FaceData {
            surface: Plane::from_normal(p(0.0, 0.0, 0.0), Vector3::z()).unwrap(),
            outer_wire: wire,
            inner_wires: vec![],
            same_sense: true,
        });

        let t = first_tangent_in_face(&store, face).unwrap();
        assert_relative_eq!(t.x, -1.0, epsilon = 1e-9);
        assert_relative_eq!(t.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn missing_face_defaults_to_x() {
        let mut store = TopologyStore::new();
        let wire = MakeWire::new(vec![p(0.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(-1.0, 0.0, 0.0)], true)
            .execute(&mut store)
            .unwrap();
        let face = MakeFace::new(wire, vec![]).execute(&mut store).unwrap();
        assert_relative_eq!(tangent_or_x(&store, face).y, 1.0, epsilon = 1e-12);
        assert_eq!(tangent_or_x(&TopologyStore::new(), face), Vector3::x());
    }
}
