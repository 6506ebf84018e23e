mod plane;

pub use plane::Plane;

use crate::error::Result;
use crate::math::{Point3, Vector3};

/// Parametric carrier surface of a face.
pub trait Surface {
    /// Point at `(u, v)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters cannot be evaluated.
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3>;

    /// Unit normal at `(u, v)`.
    ///
    /// # Errors
    ///
    /// Returns an error where the normal is undefined.
    fn normal(&self, u: f64, v: f64) -> Result<Vector3>;
}
