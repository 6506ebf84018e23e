mod bounding_box;
mod classify;
mod face_center;
mod face_polygon;
mod project_to_face;
mod solid_intersect;

pub use bounding_box::{Aabb, BoundingBox};
pub use classify::{classify_point, PointClassification};
pub use face_center::FaceCenter;
pub use face_polygon::FacePolygon;
pub use project_to_face::{FacePoint, ProjectOntoFace};
pub use solid_intersect::SolidsIntersect;
