use crate::error::{OperationError, Result};
use crate::geometry::curve::TrimmedCurve;
use crate::math::{Point3, Vector3};
use crate::topology::{SolidId, TopologyStore};

/// Samples taken along curved edges when bounding them.
const ARC_SAMPLES: u32 = 16;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Creates a box from two corners, sorting each axis.
    #[must_use]
    pub fn new(a: Point3, b: Point3) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(Self { min: first, max: first }, |acc, p| Self {
            min: Point3::new(acc.min.x.min(p.x), acc.min.y.min(p.y), acc.min.z.min(p.z)),
            max: Point3::new(acc.max.x.max(p.x), acc.max.y.max(p.y), acc.max.z.max(p.z)),
        }))
    }

    /// Grows the box by `margin` on every side.
    #[must_use]
    pub fn expanded(&self, margin: f64) -> Self {
        let m = Vector3::repeat(margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Returns `true` if the boxes overlap or touch.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
            && self.min.z <= other.max.z
            && other.min.z <= self.max.z
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Extent along each axis.
    #[must_use]
    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }
}

/// Computes the axis-aligned bounding box of a solid.
pub struct BoundingBox {
    solid: SolidId,
}

impl BoundingBox {
    /// Creates a new `BoundingBox` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the query, returning the AABB.
    ///
    /// Straight edges contribute their end vertices; arcs are sampled.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid topology is incomplete or has no vertices.
    pub fn execute(&self, store: &TopologyStore) -> Result<Aabb> {
        let mut points = Vec::new();
        for face_id in store.solid_faces(self.solid)? {
            let face = store.face(face_id)?;
            for wire_id in face.wires() {
                for oe in &store.wire(wire_id)?.edges {
                    let edge = store.edge(oe.edge)?;
                    match &edge.curve {
                        TrimmedCurve::Line { .. } => {
                            points.push(store.vertex(edge.start)?.point);
                            points.push(store.vertex(edge.end)?.point);
                        }
                        TrimmedCurve::Arc { .. } => points.extend(edge.curve.sample(ARC_SAMPLES)?),
                    }
                }
            }
        }
        Aabb::from_points(&points)
            .ok_or_else(|| OperationError::Failed("solid has no boundary vertices".into()).into())
    }
}
