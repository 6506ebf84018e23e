//! In-plane orientation of a placement on its host face.

use tracing::debug;

use crate::document::{Document, ElementId};
use crate::error::Result;
use crate::math::{normalize_or_keep, Vector3};
use crate::topology::{FaceId, TopologyStore};

use super::sampling::{is_horizontal, tangent_or_x};

/// Below this length a projected direction is considered degenerate.
const DEGENERATE: f64 = 1e-6;

/// Where the placement tangent came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TangentSource {
    /// The original opening's tangent projected onto the host plane.
    Projected,
    /// The host face's own first boundary segment.
    FaceBoundary,
}

/// Orthonormal placement frame on a host face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub normal: Vector3,
    pub tangent: Vector3,
    pub bitangent: Vector3,
    pub source: TangentSource,
}

/// Tangent of the first horizontal face of an element's geometry, +X if none.
///
/// # Errors
///
/// Returns an error if the element cannot be read.
pub fn original_tangent<D: Document>(doc: &D, element: ElementId, horizontal_threshold: f64) -> Result<Vector3> {
    let store = doc.geometry();
    let face = doc
        .solid_faces(element, false)?
        .into_iter()
        .map(|handle| handle.face)
        .find(|&face| is_horizontal(store, face, horizontal_threshold));
    Ok(face.map_or_else(Vector3::x, |face| tangent_or_x(store, face)))
}

/// Completes `tangent` to a right-handed in-plane frame `(tangent, normal x tangent)`.
///
/// A tangent parallel to the normal is replaced by +X, or by +Y when the
/// normal itself is within 0.95 of X.
#[must_use]
pub fn in_plane_frame(normal: &Vector3, tangent: Vector3) -> (Vector3, Vector3) {
    let bitangent = normalize_or_keep(&normal.cross(&tangent));
    if bitangent.norm() >= DEGENERATE {
        return (tangent, bitangent);
    }
    let tangent = if normal.dot(&Vector3::x()).abs() < 0.95 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    (tangent, normalize_or_keep(&normal.cross(&tangent)))
}

/// Resolves the placement frame on `face` for an opening whose original tangent is `original`.
///
/// # Errors
///
/// Returns an error if the face cannot be read.
pub fn resolve_orientation(store: &TopologyStore, face: FaceId, original: &Vector3) -> Result<Orientation> {
    let normal = normalize_or_keep(&store.face(face)?.outward_normal());
    let projected = normalize_or_keep(&(original - normal * original.dot(&normal)));

    let (tangent, source) = if projected.norm() < DEGENERATE {
        debug!("original direction is normal to the host face, using its boundary tangent");
        (tangent_or_x(store, face), TangentSource::FaceBoundary)
    } else {
        (projected, TangentSource::Projected)
    };

    let (tangent, bitangent) = in_plane_frame(&normal, tangent);
    Ok(Orientation {
        normal,
        tangent,
        bitangent,
        source,
    })
}
