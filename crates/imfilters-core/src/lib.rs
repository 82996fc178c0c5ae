//! imfilters core — per-pixel color and tone filters for 8-bit images.
//!
//! This crate contains the raster type, color-space math, the filter
//! library, the parallel pixel engine, composite pipelines, and thin
//! wrappers over the `image` crate for file I/O and spatial filters.

pub mod color;
pub mod error;
pub mod filters;
pub mod image;
pub mod io;
pub mod transform;

// Re-exports for convenience.
pub use error::FilterError;
pub use image::{ChannelLayout, Raster};
pub use io::{load_raster, save_raster, show_raster};
pub use transform::composite::Recipe;
pub use transform::evaluate::{EngineOptions, Filter, OverflowPolicy};
pub use transform::params::FilterOp;
