//! Layered edition generator
//!
//! Each edition picks one weighted element per layer, is encoded as a DNA
//! string that must be unique within the collection, and is composited onto a
//! raster canvas with anchored placement, occlusion checks and effects. An
//! image and a metadata record are written per edition.

#![forbid(unsafe_code)]

/// Asset discovery and layer definitions
pub mod catalog;
/// Trait selection, DNA encoding and uniqueness tracking
pub mod dna;
/// Collection-level generation loop and draw-order scrambling
pub mod generation;
/// Layout: bounding boxes, anchors and placement resolution
pub mod geometry;
/// Input/output operations and error handling
pub mod io;
/// Canvas compositing, blending and effects
pub mod render;

pub use io::error::{GenerationError, Result};
