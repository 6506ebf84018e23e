use thiserror::Error;

use crate::document::ElementId;

/// Top-level error type for geometry and document operations.
#[derive(Debug, Error)]
pub enum HostingError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to topological operations.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to kernel operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Errors reported by a [`Document`](crate::document::Document) implementation.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("element {0} not found")]
    ElementNotFound(ElementId),

    #[error("element {element} has no parameter '{name}'")]
    MissingParameter { element: ElementId, name: String },

    #[error("parameter '{name}' on element {element} is read-only")]
    ReadOnlyParameter { element: ElementId, name: String },

    #[error("invalid value {value} for parameter '{name}' on element {element}")]
    InvalidValue { element: ElementId, name: String, value: f64 },

    #[error("element {0} has no geometry")]
    NoGeometry(ElementId),

    #[error("cannot create instance: {0}")]
    Creation(String),

    #[error("transaction error: {0}")]
    Transaction(String),
}

/// Convenience type alias for results using [`HostingError`].
pub type Result<T> = std::result::Result<T, HostingError>;
