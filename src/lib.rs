//! Re-hosting of opening placeholders onto the horizontal faces of floor slabs.
//!
//! The crate pairs a small planar B-rep kernel (`math`, `geometry`,
//! `topology`, `operations`) with a document abstraction and the batch
//! pipeline in [`hosting`]. [`document::MemoryDocument`] implements the
//! document contract entirely in memory.

pub mod config;
pub mod document;
pub mod error;
pub mod geometry;
pub mod hosting;
pub mod math;
pub mod operations;
pub mod topology;

pub use config::{HostingConfig, ParameterNames, SlabSelection};
pub use document::{Document, ElementId, MemoryDocument};
pub use error::{HostingError, Result};
pub use hosting::{rehost_openings, RunAborted, RunError, RunReport};
