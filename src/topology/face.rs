use crate::geometry::surface::Plane;
use crate::math::Vector3;

use super::wire::WireId;

slotmap::new_key_type! {
    pub struct FaceId;
}

/// Planar face bounded by an outer loop, with optional holes.
#[derive(Debug, Clone)]
pub struct FaceData {
    pub surface: Plane,
    pub outer_wire: WireId,
    pub inner_wires: Vec<WireId>,
    /// `false` when the face points against its plane's normal.
    pub same_sense: bool,
}

impl FaceData {
    /// Unit normal pointing out of the owning solid.
    #[must_use]
    pub fn outward_normal(&self) -> Vector3 {
        let n = *self.surface.plane_normal();
        if self.same_sense {
            n
        } else {
            -n
        }
    }

    pub fn wires(&self) -> impl Iterator<Item = WireId> + '_ {
        std::iter::once(self.outer_wire).chain(self.inner_wires.iter().copied())
    }
}
