//! In-memory [`Document`] built on the crate's topology store.
//!
//! Openings are rectangular prisms regenerated from their width, height and
//! depth parameters. Slabs are extruded downward from a top outline. Grids
//! carry a bounded reference curve and no solid.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::config::ParameterNames;
use crate::error::{DocumentError, HostingError, Result};
use crate::geometry::curve::TrimmedCurve;
use crate::math::{Point3, Vector3};
use crate::operations::query::{Aabb, BoundingBox, SolidsIntersect};
use crate::operations::shaping::ExtrudeProfile;
use crate::operations::transform::Translate;
use crate::topology::{SolidId, TopologyStore};

use super::{Category, Document, ElementId, FaceHandle, FaceReference, OpeningDimensions};

const THICKNESS: &str = "Thickness";

/// Which footprint axis the first edge of an opening's top face follows.
///
/// Orientation queries read the first boundary segment of that face, so the
/// sketch decides whether they report the width or the height direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FootprintSketch {
    #[default]
    WidthFirst,
    HeightFirst,
}

/// Family type that opening instances are created from.
#[derive(Debug, Clone)]
pub struct OpeningType {
    family: String,
    name: String,
    sketch: FootprintSketch,
    parameters: ParameterNames,
    defaults: OpeningDimensions,
    read_only: BTreeSet<String>,
}

impl OpeningType {
    /// Creates a type with the default parameter names and a one-unit default size.
    #[must_use]
    pub fn new(family: impl Into<String>, name: impl Into<String>, sketch: FootprintSketch) -> Self {
        Self {
            family: family.into(),
            name: name.into(),
            sketch,
            parameters: ParameterNames::default(),
            defaults: OpeningDimensions {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            read_only: BTreeSet::new(),
        }
    }

    /// Uses custom parameter names.
    #[must_use]
    pub fn with_parameters(mut self, parameters: ParameterNames) -> Self {
        self.parameters = parameters;
        self
    }

    /// Marks a parameter as read-only on every instance of this type.
    #[must_use]
    pub fn with_read_only(mut self, name: impl Into<String>) -> Self {
        self.read_only.insert(name.into());
        self
    }

    fn initial_parameters(&self, dims: OpeningDimensions) -> BTreeMap<String, f64> {
        BTreeMap::from([
            (self.parameters.width.clone(), dims.width),
            (self.parameters.height.clone(), dims.height),
            (self.parameters.depth.clone(), dims.depth),
        ])
    }
}

/// Location and frame of an unhosted opening.
#[derive(Debug, Clone, Copy)]
pub struct OpeningPlacement {
    /// Insertion point at the footprint centre.
    pub origin: Point3,
    /// Width direction.
    pub hand: Vector3,
    /// Facing direction; the body extends along its negative.
    pub normal: Vector3,
}

impl OpeningPlacement {
    /// A placement on a level plane, body extending downward.
    #[must_use]
    pub fn level(origin: Point3, hand: Vector3) -> Self {
        Self {
            origin,
            hand,
            normal: Vector3::z(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    origin: Point3,
    hand: Vector3,
    normal: Vector3,
}

impl Frame {
    fn orthonormal(origin: Point3, hand: Vector3, normal: Vector3) -> Result<Self> {
        let normal = normal
            .try_normalize(1e-9)
            .ok_or_else(|| DocumentError::Creation("zero-length facing direction".into()))?;
        let hand = (hand - normal * hand.dot(&normal))
            .try_normalize(1e-9)
            .ok_or_else(|| DocumentError::Creation("reference direction is parallel to the face normal".into()))?;
        Ok(Self { origin, hand, normal })
    }
}

#[derive(Debug, Clone)]
struct Opening {
    family_type: OpeningType,
    frame: Option<Frame>,
    parameters: BTreeMap<String, f64>,
    host: Option<FaceReference>,
}

impl Opening {
    fn dimensions(&self) -> Option<OpeningDimensions> {
        let names = &self.family_type.parameters;
        Some(OpeningDimensions {
            width: *self.parameters.get(&names.width)?,
            height: *self.parameters.get(&names.height)?,
            depth: *self.parameters.get(&names.depth)?,
        })
    }
}

#[derive(Debug, Clone)]
enum ElementKind {
    Opening(Opening),
    Slab { thickness: Option<f64> },
    Grid { name: String, curve: TrimmedCurve },
}

#[derive(Debug)]
struct Element {
    kind: ElementKind,
    solid: Option<SolidId>,
    stale: bool,
}

/// A complete in-memory building-model document.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    store: TopologyStore,
    elements: BTreeMap<ElementId, Element>,
    next_id: u64,
    transaction: Option<String>,
    committed: Vec<String>,
}

impl MemoryDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unhosted opening with its body regenerated.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is not positive or the frame is degenerate.
    pub fn add_opening(
        &mut self,
        family_type: &OpeningType,
        placement: OpeningPlacement,
        dims: OpeningDimensions,
    ) -> Result<ElementId> {
        for value in [dims.width, dims.height, dims.depth] {
            if !(value.is_finite() && value > 0.0) {
                return Err(DocumentError::Creation(format!("opening dimension {value} must be positive")).into());
            }
        }
        let frame = Frame::orthonormal(placement.origin, placement.hand, placement.normal)?;
        let opening = Opening {
            family_type: family_type.clone(),
            frame: Some(frame),
            parameters: family_type.initial_parameters(dims),
            host: None,
        };
        self.insert_opening(opening)
    }

    /// Adds a floor slab whose top face is `outline`, extruded downward by `thickness`.
    ///
    /// # Errors
    ///
    /// Returns an error if the thickness is not positive or the outline is degenerate.
    pub fn add_slab(&mut self, outline: Vec<Point3>, thickness: f64) -> Result<ElementId> {
        if !(thickness.is_finite() && thickness > 0.0) {
            return Err(DocumentError::Creation(format!("slab thickness {thickness} must be positive")).into());
        }
        let solid = ExtrudeProfile::new(outline, Vector3::new(0.0, 0.0, -thickness)).execute(&mut self.store)?;
        Ok(self.insert(Element {
            kind: ElementKind::Slab {
                thickness: Some(thickness),
            },
            solid: Some(solid),
            stale: false,
        }))
    }

    /// Adds a named grid line.
    pub fn add_grid(&mut self, name: impl Into<String>, curve: TrimmedCurve) -> ElementId {
        self.insert(Element {
            kind: ElementKind::Grid {
                name: name.into(),
                curve,
            },
            solid: None,
            stale: false,
        })
    }

    /// Makes a slab's thickness unreadable while keeping its geometry.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not a slab.
    pub fn clear_slab_thickness(&mut self, id: ElementId) -> Result<()> {
        match &mut self.element_mut(id)?.kind {
            ElementKind::Slab { thickness } => {
                *thickness = None;
                Ok(())
            }
            _ => Err(missing(id, THICKNESS)),
        }
    }

    /// Removes a parameter from an opening instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not an opening or lacks the parameter.
    pub fn remove_parameter(&mut self, id: ElementId, name: &str) -> Result<()> {
        let opening = self.opening_mut(id)?;
        opening.parameters.remove(name).ok_or_else(|| missing(id, name))?;
        self.mark_stale(id)
    }

    /// Drops an opening's point location and body.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not an opening.
    pub fn clear_location(&mut self, id: ElementId) -> Result<()> {
        self.opening_mut(id)?.frame = None;
        self.mark_stale(id)
    }

    /// Whether the element exists.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Number of live elements.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Whether the element's geometry lags behind its parameters.
    #[must_use]
    pub fn is_stale(&self, id: ElementId) -> bool {
        self.elements.get(&id).is_some_and(|e| e.stale)
    }

    /// Face reference an opening is hosted on.
    #[must_use]
    pub fn host_face(&self, id: ElementId) -> Option<FaceReference> {
        match &self.elements.get(&id)?.kind {
            ElementKind::Opening(opening) => opening.host,
            _ => None,
        }
    }

    /// Width direction of an opening.
    #[must_use]
    pub fn hand_orientation(&self, id: ElementId) -> Option<Vector3> {
        match &self.elements.get(&id)?.kind {
            ElementKind::Opening(opening) => opening.frame.map(|f| f.hand),
            _ => None,
        }
    }

    /// Whether a transaction is open.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    /// Names of committed transactions, oldest first.
    #[must_use]
    pub fn committed_transactions(&self) -> &[String] {
        &self.committed
    }

    fn insert(&mut self, element: Element) -> ElementId {
        self.next_id += 1;
        let id = ElementId(self.next_id);
        self.elements.insert(id, element);
        id
    }

    fn insert_opening(&mut self, opening: Opening) -> Result<ElementId> {
        let solid = build_body(&mut self.store, &opening)?;
        Ok(self.insert(Element {
            kind: ElementKind::Opening(opening),
            solid,
            stale: false,
        }))
    }

    fn element(&self, id: ElementId) -> Result<&Element> {
        Ok(self.elements.get(&id).ok_or(DocumentError::ElementNotFound(id))?)
    }

    fn element_mut(&mut self, id: ElementId) -> Result<&mut Element> {
        Ok(self.elements.get_mut(&id).ok_or(DocumentError::ElementNotFound(id))?)
    }

    fn opening_mut(&mut self, id: ElementId) -> Result<&mut Opening> {
        match &mut self.element_mut(id)?.kind {
            ElementKind::Opening(opening) => Ok(opening),
            _ => Err(DocumentError::Creation(format!("element {id} is not an opening")).into()),
        }
    }

    fn mark_stale(&mut self, id: ElementId) -> Result<()> {
        self.element_mut(id)?.stale = true;
        Ok(())
    }

    fn solid_of(&self, id: ElementId) -> Result<SolidId> {
        Ok(self.element(id)?.solid.ok_or(DocumentError::NoGeometry(id))?)
    }
}

fn missing(element: ElementId, name: &str) -> HostingError {
    DocumentError::MissingParameter {
        element,
        name: name.into(),
    }
    .into()
}

/// Builds the prism of an opening, or nothing when it lacks a location or a dimension.
fn build_body(store: &mut TopologyStore, opening: &Opening) -> Result<Option<SolidId>> {
    let (Some(frame), Some(dims)) = (opening.frame, opening.dimensions()) else {
        return Ok(None);
    };
    let side = frame.normal.cross(&frame.hand);
    let (hw, hh) = (0.5 * dims.width, 0.5 * dims.height);
    let corners = match opening.family_type.sketch {
        FootprintSketch::WidthFirst => [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)],
        FootprintSketch::HeightFirst => [(hw, -hh), (hw, hh), (-hw, hh), (-hw, -hh)],
    };
    let profile = corners
        .iter()
        .map(|&(a, b)| frame.origin + frame.hand * a + side * b)
        .collect();
    let solid = ExtrudeProfile::new(profile, -frame.normal * dims.depth).execute(store)?;
    Ok(Some(solid))
}

impl Document for MemoryDocument {
    fn geometry(&self) -> &TopologyStore {
        &self.store
    }

    fn elements_of_category(&self, category: Category) -> Vec<ElementId> {
        self.elements
            .keys()
            .copied()
            .filter(|&id| self.category(id).is_ok_and(|c| c == category))
            .collect()
    }

    fn category(&self, id: ElementId) -> Result<Category> {
        Ok(match self.element(id)?.kind {
            ElementKind::Opening(_) => Category::GenericModel,
            ElementKind::Slab { .. } => Category::Floor,
            ElementKind::Grid { .. } => Category::Grid,
        })
    }

    fn family_name(&self, id: ElementId) -> Result<Option<String>> {
        Ok(match &self.element(id)?.kind {
            ElementKind::Opening(opening) => Some(opening.family_type.family.clone()),
            _ => None,
        })
    }

    fn element_name(&self, id: ElementId) -> Result<Option<String>> {
        Ok(match &self.element(id)?.kind {
            ElementKind::Opening(opening) => Some(opening.family_type.name.clone()),
            ElementKind::Slab { .. } => None,
            ElementKind::Grid { name, .. } => Some(name.clone()),
        })
    }

    fn host(&self, id: ElementId) -> Result<Option<ElementId>> {
        Ok(match &self.element(id)?.kind {
            ElementKind::Opening(opening) => opening.host.map(|r| r.element),
            _ => None,
        })
    }

    fn location_point(&self, id: ElementId) -> Result<Option<Point3>> {
        Ok(match &self.element(id)?.kind {
            ElementKind::Opening(opening) => opening.frame.map(|f| f.origin),
            _ => None,
        })
    }

    fn parameter(&self, id: ElementId, name: &str) -> Result<f64> {
        match &self.element(id)?.kind {
            ElementKind::Opening(opening) => opening.parameters.get(name).copied().ok_or_else(|| missing(id, name)),
            ElementKind::Slab { thickness } if name == THICKNESS => thickness.ok_or_else(|| missing(id, name)),
            _ => Err(missing(id, name)),
        }
    }

    fn set_parameter(&mut self, id: ElementId, name: &str, value: f64) -> Result<()> {
        let opening = self.opening_mut(id)?;
        if opening.family_type.read_only.contains(name) {
            return Err(DocumentError::ReadOnlyParameter {
                element: id,
                name: name.into(),
            }
            .into());
        }
        let slot = opening.parameters.get_mut(name).ok_or_else(|| missing(id, name))?;
        if !(value.is_finite() && value > 0.0) {
            return Err(DocumentError::InvalidValue {
                element: id,
                name: name.into(),
                value,
            }
            .into());
        }
        *slot = value;
        self.mark_stale(id)
    }

    fn slab_thickness(&self, id: ElementId) -> Result<f64> {
        match self.element(id)?.kind {
            ElementKind::Slab { thickness } => thickness.ok_or_else(|| missing(id, THICKNESS)),
            _ => Err(missing(id, THICKNESS)),
        }
    }

    fn bounding_box(&self, id: ElementId) -> Result<Option<Aabb>> {
        match self.element(id)?.solid {
            Some(solid) => Ok(Some(BoundingBox::new(solid).execute(&self.store)?)),
            None => Ok(None),
        }
    }

    fn elements_intersecting_box(&self, category: Category, outline: &Aabb) -> Result<Vec<ElementId>> {
        let mut hits = Vec::new();
        for id in self.elements_of_category(category) {
            if self.bounding_box(id)?.is_some_and(|b| b.intersects(outline)) {
                hits.push(id);
            }
        }
        Ok(hits)
    }

    fn elements_intersect(&self, a: ElementId, b: ElementId) -> Result<bool> {
        SolidsIntersect::new(self.solid_of(a)?, self.solid_of(b)?).execute(&self.store)
    }

    fn solid_faces(&self, id: ElementId, compute_references: bool) -> Result<Vec<FaceHandle>> {
        let Some(solid) = self.element(id)?.solid else {
            return Ok(Vec::new());
        };
        Ok(self
            .store
            .solid_faces(solid)?
            .into_iter()
            .map(|face| FaceHandle {
                face,
                reference: compute_references.then_some(FaceReference { element: id, face }),
            })
            .collect())
    }

    fn reference_curve(&self, id: ElementId) -> Result<Option<TrimmedCurve>> {
        Ok(match &self.element(id)?.kind {
            ElementKind::Grid { curve, .. } => Some(curve.clone()),
            _ => None,
        })
    }

    fn duplicate(&mut self, id: ElementId) -> Result<ElementId> {
        let copy = match &self.element(id)?.kind {
            ElementKind::Opening(opening) => opening.clone(),
            _ => return Err(DocumentError::Creation(format!("element {id} cannot be copied")).into()),
        };
        self.insert_opening(copy)
    }

    fn delete(&mut self, id: ElementId) -> Result<()> {
        let element = self.elements.remove(&id).ok_or(DocumentError::ElementNotFound(id))?;
        if let Some(solid) = element.solid {
            self.store.remove_solid(solid)?;
        }
        Ok(())
    }

    fn create_on_face(
        &mut self,
        type_source: ElementId,
        face: FaceReference,
        point: Point3,
        direction: Vector3,
    ) -> Result<ElementId> {
        let family_type = match &self.element(type_source)?.kind {
            ElementKind::Opening(opening) => opening.family_type.clone(),
            _ => return Err(DocumentError::Creation(format!("element {type_source} has no family type")).into()),
        };
        let host_solid = self.solid_of(face.element)?;
        if !self.store.solid_faces(host_solid)?.contains(&face.face) {
            return Err(DocumentError::Creation(format!("face is not part of element {}", face.element)).into());
        }
        let normal = self.store.face(face.face)?.outward_normal();
        let frame = Frame::orthonormal(point, direction, normal)?;

        let opening = Opening {
            parameters: family_type.initial_parameters(family_type.defaults),
            family_type,
            frame: Some(frame),
            host: Some(face),
        };
        let id = self.insert_opening(opening)?;
        debug!(element = %id, host = %face.element, "created face-hosted opening");
        Ok(id)
    }

    fn translate(&mut self, id: ElementId, offset: &Vector3) -> Result<()> {
        let element = self.elements.get_mut(&id).ok_or(DocumentError::ElementNotFound(id))?;
        match &mut element.kind {
            ElementKind::Opening(opening) => {
                if let Some(frame) = &mut opening.frame {
                    frame.origin += *offset;
                }
            }
            ElementKind::Grid { curve, .. } => *curve = curve.translated(offset),
            ElementKind::Slab { .. } => {}
        }
        if let Some(solid) = element.solid {
            Translate::new(solid, *offset).execute(&mut self.store)?;
        }
        Ok(())
    }

    fn regenerate(&mut self) -> Result<()> {
        for (id, element) in &mut self.elements {
            if !element.stale {
                continue;
            }
            let ElementKind::Opening(opening) = &element.kind else {
                element.stale = false;
                continue;
            };
            if let Some(old) = element.solid.take() {
                self.store.remove_solid(old)?;
            }
            element.solid = build_body(&mut self.store, opening)?;
            element.stale = false;
            debug!(element = %id, "regenerated opening body");
        }
        Ok(())
    }

    fn begin_transaction(&mut self, name: &str) -> Result<()> {
        if let Some(open) = &self.transaction {
            return Err(DocumentError::Transaction(format!("transaction '{open}' is already open")).into());
        }
        self.transaction = Some(name.into());
        Ok(())
    }

    fn commit_transaction(&mut self) -> Result<()> {
        let name = self
            .transaction
            .take()
            .ok_or_else(|| DocumentError::Transaction("no open transaction".into()))?;
        self.committed.push(name);
        Ok(())
    }
}
