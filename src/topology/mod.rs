//! B-rep arena backing every element's solid geometry.

pub mod edge;
pub mod face;
pub mod shell;
pub mod solid;
pub mod vertex;
pub mod wire;

pub use edge::{EdgeData, EdgeId};
pub use face::{FaceData, FaceId};
pub use shell::{ShellData, ShellId};
pub use solid::{SolidData, SolidId};
pub use vertex::{VertexData, VertexId};
pub use wire::{OrientedEdge, WireData, WireId};

use crate::error::TopologyError;
use crate::math::Point3;
use slotmap::SlotMap;

/// Owns vertices, edges, wires, faces, shells and solids; entities refer to
/// each other through generational ids.
#[derive(Debug, Default)]
pub struct TopologyStore {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    wires: SlotMap<WireId, WireData>,
    faces: SlotMap<FaceId, FaceData>,
    shells: SlotMap<ShellId, ShellData>,
    solids: SlotMap<SolidId, SolidData>,
}

impl TopologyStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a vertex and returns its id.
    pub fn add_vertex(&mut self, data: VertexData) -> VertexId {
        self.vertices.insert(data)
    }

    /// Looks up a vertex.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for a stale id.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    /// Mutable access to a vertex.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for a stale id.
    pub fn vertex_mut(&mut self, id: VertexId) -> Result<&mut VertexData, TopologyError> {
        self.vertices
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    /// Stores an edge. Its end vertices must already be in the store.
    pub fn add_edge(&mut self, data: EdgeData) -> EdgeId {
        self.edges.insert(data)
    }

    /// Looks up an edge.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for a stale id.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData, TopologyError> {
        self.edges
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))
    }

    /// Mutable access to an edge; used when translating geometry in place.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for a stale id.
    pub fn edge_mut(&mut self, id: EdgeId) -> Result<&mut EdgeData, TopologyError> {
        self.edges
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))
    }

    /// Stores an edge loop.
    pub fn add_wire(&mut self, data: WireData) -> WireId {
        self.wires.insert(data)
    }

    /// Looks up a wire.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for a stale id.
    pub fn wire(&self, id: WireId) -> Result<&WireData, TopologyError> {
        self.wires
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("wire".into()))
    }

    /// Stores a face bounded by existing wires.
    pub fn add_face(&mut self, data: FaceData) -> FaceId {
        self.faces.insert(data)
    }

    /// Looks up a face.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for a stale id.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, TopologyError> {
        self.faces
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))
    }

    /// Mutable access to a face.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for a stale id.
    pub fn face_mut(&mut self, id: FaceId) -> Result<&mut FaceData, TopologyError> {
        self.faces
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))
    }

    /// Stores a shell.
    pub fn add_shell(&mut self, data: ShellData) -> ShellId {
        self.shells.insert(data)
    }

    /// Looks up a shell by id.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for a stale id.
    pub fn shell(&self, id: ShellId) -> Result<&ShellData, TopologyError> {
        self.shells
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("shell".into()))
    }

    /// Stores a solid whose shells are already in the store.
    pub fn add_solid(&mut self, data: SolidData) -> SolidId {
        self.solids.insert(data)
    }

    /// Looks up a solid.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for a stale id.
    pub fn solid(&self, id: SolidId) -> Result<&SolidData, TopologyError> {
        self.solids
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("solid".into()))
    }

    /// Start points of a wire's oriented edges, in loop order.
    ///
    /// # Errors
    ///
    /// Returns an error if any referenced entity is missing.
    pub fn wire_points(&self, id: WireId) -> Result<Vec<Point3>, TopologyError> {
        self.wire(id)?
            .edges
            .iter()
            .map(|oe| {
                let edge = self.edge(oe.edge)?;
                let start = if oe.forward { edge.start } else { edge.end };
                Ok(self.vertex(start)?.point)
            })
            .collect()
    }

    /// Faces of a solid, outer shell first.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid or one of its shells is missing.
    pub fn solid_faces(&self, id: SolidId) -> Result<Vec<FaceId>, TopologyError> {
        let mut faces = Vec::new();
        for shell in self.solid(id)?.shells() {
            faces.extend_from_slice(&self.shell(shell)?.faces);
        }
        Ok(faces)
    }

    /// Drops a solid and everything it owns. Sub-entities must not be shared
    /// with another solid.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid is not in the store.
    pub fn remove_solid(&mut self, id: SolidId) -> Result<(), TopologyError> {
        let solid = self
            .solids
            .remove(id)
            .ok_or_else(|| TopologyError::EntityNotFound("solid".into()))?;

        let faces: Vec<FaceId> = solid
            .shells()
            .into_iter()
            .filter_map(|shell| self.shells.remove(shell))
            .flat_map(|shell| shell.faces)
            .collect();
        for face in faces.into_iter().filter_map(|f| self.faces.remove(f)) {
            for wire in face.wires().into_iter().filter_map(|w| self.wires.remove(w)) {
                for edge in wire.edges.into_iter().filter_map(|oe| self.edges.remove(oe.edge)) {
                    self.vertices.remove(edge.start);
                    self.vertices.remove(edge.end);
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn solid_count(&self) -> usize {
        self.solids.len()
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}
