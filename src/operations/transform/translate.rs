use std::collections::HashSet;

use crate::error::Result;
use crate::math::Vector3;
use crate::topology::{SolidId, TopologyStore};

/// Translates a solid by a displacement vector.
pub struct Translate {
    solid: SolidId,
    displacement: Vector3,
}

impl Translate {
    /// Creates a new `Translate` operation.
    #[must_use]
    pub fn new(solid: SolidId, displacement: Vector3) -> Self {
        Self {
            solid,
            displacement,
        }
    }

    /// Executes the translation, modifying the solid in-place.
    ///
    /// Shared vertices and edges are moved exactly once.
    ///
    /// # Errors
    ///
    /// Returns an error if any entity of the solid is missing.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<()> {
        let mut seen_edges = HashSet::new();
        let mut seen_vertices = HashSet::new();

        for face_id in store.solid_faces(self.solid)? {
            let face = store.face_mut(face_id)?;
            face.surface = face.surface.translated(&self.displacement);
            let wires: Vec<_> = face.wires().collect();

            for wire_id in wires {
                let edges: Vec<_> = store.wire(wire_id)?.edges.iter().map(|oe| oe.edge).collect();
                for edge_id in edges {
                    if !seen_edges.insert(edge_id) {
                        continue;
                    }
                    let edge = store.edge_mut(edge_id)?;
                    edge.curve = edge.curve.translated(&self.displacement);
                    let (start, end) = (edge.start, edge.end);

                    for vertex_id in [start, end] {
                        if seen_vertices.insert(vertex_id) {
                            store.vertex_mut(vertex_id)?.translate(&self.displacement);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::query::BoundingBox;
    use crate::operations::shaping::ExtrudeProfile;
    use approx::assert_relative_eq;

    #[test]
    fn translated_box_moves_bounds_and_planes() {
        let mut store = TopologyStore::new();
        let profile = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let solid = ExtrudeProfile::new(profile, Vector3::new(0.0, 0.0, 1.0))
            .execute(&mut store)
            .unwrap();

        Translate::new(solid, Vector3::new(2.0, -1.0, 0.5))
            .execute(&mut store)
            .unwrap();

        let aabb = BoundingBox::new(solid).execute(&store).unwrap();
        assert_relative_eq!(aabb.min.x, 2.0);
        assert_relative_eq!(aabb.min.y, -1.0);
        assert_relative_eq!(aabb.max.z, 1.5);

        let top = store.solid_faces(solid).unwrap()[1];
        assert_relative_eq!(store.face(top).unwrap().surface.origin().z, 1.5);
    }
}
