pub mod curve;
pub mod surface;

pub use curve::{Arc, ClosestPoint, Curve, CurveDomain, Line, TrimmedCurve};
pub use surface::{Plane, Surface};
