pub mod intersect_3d;
pub mod polygon_3d;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Millimetres per document length unit (decimal feet).
pub const FEET_TO_MM: f64 = 304.8;

/// Converts a document length to millimetres.
#[must_use]
pub fn to_mm(length: f64) -> f64 {
    length * FEET_TO_MM
}

/// Converts millimetres to a document length.
#[must_use]
pub fn from_mm(mm: f64) -> f64 {
    mm / FEET_TO_MM
}

/// Returns the unit vector along `v`, or `v` itself when it is too short to normalize.
///
/// Callers detect the degenerate case by checking the norm of the result.
#[must_use]
pub fn normalize_or_keep(v: &Vector3) -> Vector3 {
    let len = v.norm();
    if len < 1e-9 {
        *v
    } else {
        v / len
    }
}
