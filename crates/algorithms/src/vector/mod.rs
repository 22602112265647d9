//! Vector analysis algorithms
//!
//! Geometric operations on feature tables:
//! - Dissolve: merge all tract polygons into a region boundary
//! - Clip: restrict road lines to the region boundary
//! - Buffer: expand clipped roads into a corridor polygon

mod buffer;
mod clip;
mod dissolve;

pub use buffer::{buffer_line, buffer_lines, corridor, BufferParams};
pub use clip::{clip_lines, clip_roads};
pub use dissolve::{dissolve, region_boundary};
