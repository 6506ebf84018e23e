use super::edge::EdgeId;

slotmap::new_key_type! {
    pub struct WireId;
}

/// Edge use within a wire. `forward == false` walks the edge from `end` to `start`.
#[derive(Debug, Clone, Copy)]
pub struct OrientedEdge {
    pub edge: EdgeId,
    pub forward: bool,
}

impl OrientedEdge {
    #[must_use]
    pub fn new(edge: EdgeId, forward: bool) -> Self {
        Self { edge, forward }
    }

    /// Multiplier turning the edge curve's tangent into the wire's direction.
    #[must_use]
    pub fn sign(&self) -> f64 {
        if self.forward {
            1.0
        } else {
            -1.0
        }
    }
}

/// Ordered edge loop bounding a face.
#[derive(Debug, Clone)]
pub struct WireData {
    pub edges: Vec<OrientedEdge>,
    pub is_closed: bool,
}
