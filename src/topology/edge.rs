use crate::geometry::curve::TrimmedCurve;

use super::vertex::VertexId;

slotmap::new_key_type! {
    pub struct EdgeId;
}

/// Bounded curve between two vertices; the curve runs from `start` to `end`.
#[derive(Debug, Clone)]
pub struct EdgeData {
    pub start: VertexId,
    pub end: VertexId,
    pub curve: TrimmedCurve,
}
