use crate::error::{OperationError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::operations::creation::{newell_normal, MakeFace, MakeSolid, MakeWire};
use crate::topology::{FaceId, ShellData, SolidId, TopologyStore};

/// Sweeps a closed planar polygon along a direction vector into a prism.
///
/// Face order in the resulting shell is fixed: start cap, end cap, then one
/// side face per profile edge. When the profile winds counter-clockwise about
/// `-direction`, the start cap reproduces the profile exactly (same first
/// vertex, same first edge); this is how callers control the first boundary
/// segment seen by face-tangent queries.
pub struct ExtrudeProfile {
    profile: Vec<Point3>,
    direction: Vector3,
}

impl ExtrudeProfile {
    /// Creates a new `ExtrudeProfile` operation.
    #[must_use]
    pub fn new(profile: Vec<Point3>, direction: Vector3) -> Self {
        Self { profile, direction }
    }

    /// Executes the extrusion, creating the solid in the topology store.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] if the direction is zero-length,
    /// the profile has fewer than three points, or the direction lies in the
    /// profile plane.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        if self.direction.norm() < TOLERANCE {
            return Err(OperationError::InvalidInput("extrude direction must be non-zero".into()).into());
        }
        if self.profile.len() < 3 {
            return Err(OperationError::InvalidInput("extrude profile needs at least 3 points".into()).into());
        }

        let normal = newell_normal(&self.profile)?;
        let alignment = normal.dot(&self.direction);
        if alignment.abs() < TOLERANCE {
            return Err(
                OperationError::InvalidInput("extrude direction lies in the profile plane".into()).into(),
            );
        }

        // Base winds about +direction so that the side quads face outward.
        let base: Vec<Point3> = if alignment > 0.0 {
            self.profile.clone()
        } else {
            self.profile.iter().rev().copied().collect()
        };

        let start_cap: Vec<Point3> = base.iter().rev().copied().collect();
        let top: Vec<Point3> = base.iter().map(|p| p + self.direction).collect();

        let n = base.len();
        let mut faces = Vec::with_capacity(n + 2);
        faces.push(planar_face(store, start_cap)?);
        faces.push(planar_face(store, top.clone())?);
        for i in 0..n {
            let j = (i + 1) % n;
            faces.push(planar_face(store, vec![base[i], base[j], top[j], top[i]])?);
        }

        let shell = store.add_shell(ShellData {
            faces,
            is_closed: true,
        });
        MakeSolid::new(shell, vec![]).execute(store)
    }
}

fn planar_face(store: &mut TopologyStore, points: Vec<Point3>) -> Result<FaceId> {
    let wire = MakeWire::new(points, true).execute(store)?;
    MakeFace::new(wire, vec![]).execute(store)
}
