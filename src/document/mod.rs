//! Document-model service consumed by the re-hosting pipeline.
//!
//! A [`Document`] is the single mutable resource of a run: the pipeline
//! borrows it exclusively, queries elements and geometry through it, and
//! mutates it only through the operations below. Geometry queries reflect the
//! last [`Document::regenerate`]; parameter changes are not visible in
//! geometry until then.

pub mod memory;

pub use memory::{FootprintSketch, MemoryDocument, OpeningPlacement, OpeningType};

use std::fmt;

use crate::error::Result;
use crate::geometry::curve::TrimmedCurve;
use crate::math::{Point3, Vector3};
use crate::operations::query::Aabb;
use crate::topology::{FaceId, TopologyStore};

/// Identity of an element in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Element categories the pipeline distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Loadable generic-model families, including opening placeholders.
    GenericModel,
    /// Floor slabs.
    Floor,
    /// Structural grid lines.
    Grid,
}

/// Referenceable identity of one face of an element's solid geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceReference {
    /// Element owning the face.
    pub element: ElementId,
    /// Face in the document's topology store.
    pub face: FaceId,
}

/// Footprint parameters of an opening, in document units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpeningDimensions {
    /// Extent along the instance's hand direction.
    pub width: f64,
    /// Extent across the hand direction, in the footprint plane.
    pub height: f64,
    /// Through-thickness extent.
    pub depth: f64,
}

/// A face enumerated from an element's solids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceHandle {
    /// Face in the document's topology store.
    pub face: FaceId,
    /// Present only when references were requested and the face is referenceable.
    pub reference: Option<FaceReference>,
}

/// Query, mutation and transaction contract of a building-model document.
///
/// Every fallible call may fail for a single element without invalidating
/// the document; callers treat such failures as recoverable.
pub trait Document {
    /// Topology store backing all element geometry.
    fn geometry(&self) -> &TopologyStore;

    /// Element instances of `category`, in ascending id order.
    fn elements_of_category(&self, category: Category) -> Vec<ElementId>;

    /// Category of an element.
    ///
    /// # Errors
    ///
    /// Returns an error if the element does not exist.
    fn category(&self, id: ElementId) -> Result<Category>;

    /// Family name of a family instance, `None` for system elements.
    ///
    /// # Errors
    ///
    /// Returns an error if the element does not exist.
    fn family_name(&self, id: ElementId) -> Result<Option<String>>;

    /// User-visible element name (grid label, type name).
    ///
    /// # Errors
    ///
    /// Returns an error if the element does not exist.
    fn element_name(&self, id: ElementId) -> Result<Option<String>>;

    /// Host element of a hosted instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the element does not exist.
    fn host(&self, id: ElementId) -> Result<Option<ElementId>>;

    /// Point location of an element, `None` for elements without one.
    ///
    /// # Errors
    ///
    /// Returns an error if the element does not exist.
    fn location_point(&self, id: ElementId) -> Result<Option<Point3>>;

    /// Reads a named scalar parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if the element or parameter does not exist.
    fn parameter(&self, id: ElementId, name: &str) -> Result<f64>;

    /// Writes a named scalar parameter. Geometry is stale until regeneration.
    ///
    /// # Errors
    ///
    /// Returns an error if the element or parameter does not exist or is read-only.
    fn set_parameter(&mut self, id: ElementId, name: &str, value: f64) -> Result<()>;

    /// Thickness of a floor slab.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not a slab or the value is unreadable.
    fn slab_thickness(&self, id: ElementId) -> Result<f64>;

    /// Axis-aligned bounds of an element's geometry, `None` without geometry.
    ///
    /// # Errors
    ///
    /// Returns an error if the element does not exist.
    fn bounding_box(&self, id: ElementId) -> Result<Option<Aabb>>;

    /// Elements of `category` whose bounding box intersects `outline`, ascending id order.
    ///
    /// # Errors
    ///
    /// Returns an error if geometry cannot be read.
    fn elements_intersecting_box(&self, category: Category, outline: &Aabb) -> Result<Vec<ElementId>>;

    /// Whether the solids of two elements share interior volume.
    ///
    /// # Errors
    ///
    /// Returns an error if either element or its geometry cannot be read.
    fn elements_intersect(&self, a: ElementId, b: ElementId) -> Result<bool>;

    /// Faces of an element's solids in solid order; references are attached
    /// only when `compute_references` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the element does not exist.
    fn solid_faces(&self, id: ElementId, compute_references: bool) -> Result<Vec<FaceHandle>>;

    /// Curve of a grid or other curve-driven element.
    ///
    /// # Errors
    ///
    /// Returns an error if the element does not exist.
    fn reference_curve(&self, id: ElementId) -> Result<Option<TrimmedCurve>>;

    /// Copies an element in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the element cannot be copied.
    fn duplicate(&mut self, id: ElementId) -> Result<ElementId>;

    /// Deletes an element and its geometry.
    ///
    /// # Errors
    ///
    /// Returns an error if the element does not exist.
    fn delete(&mut self, id: ElementId) -> Result<()>;

    /// Creates a face-hosted instance of `type_source`'s family type at
    /// `point` on the referenced face, with `direction` as its in-plane
    /// reference direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the type, face or placement is invalid.
    fn create_on_face(
        &mut self,
        type_source: ElementId,
        face: FaceReference,
        point: Point3,
        direction: Vector3,
    ) -> Result<ElementId>;

    /// Moves an element by `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if the element cannot be moved.
    fn translate(&mut self, id: ElementId, offset: &Vector3) -> Result<()>;

    /// Brings geometry up to date with parameter changes.
    ///
    /// # Errors
    ///
    /// Returns an error if an element's geometry cannot be rebuilt.
    fn regenerate(&mut self) -> Result<()>;

    /// Opens the enclosing transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if a transaction is already open.
    fn begin_transaction(&mut self, name: &str) -> Result<()>;

    /// Commits the open transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if no transaction is open.
    fn commit_transaction(&mut self) -> Result<()>;
}
