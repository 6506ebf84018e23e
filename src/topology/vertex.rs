use crate::math::{Point3, Vector3};

slotmap::new_key_type! {
    pub struct VertexId;
}

#[derive(Debug, Clone)]
pub struct VertexData {
    pub point: Point3,
}

impl VertexData {
    #[must_use]
    pub fn new(point: Point3) -> Self {
        Self { point }
    }

    pub fn translate(&mut self, offset: &Vector3) {
        self.point += offset;
    }
}
