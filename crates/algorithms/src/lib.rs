//! # GeoTract Algorithms
//!
//! Spatial processing for the GeoTract toolkit.
//!
//! ## Available categories
//!
//! - **vector**: dissolve (region union), clip, buffer/corridor
//! - **interpolation**: areal-weighted interpolation of extensive variables
//! - **statistics**: compositional shares
//! - **classification**: choropleth class breaks

pub mod classification;
pub mod interpolation;
pub mod statistics;
pub mod vector;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classification::{class_breaks, classify, ClassifyParams, Scheme};
    pub use crate::interpolation::area_interpolate;
    pub use crate::statistics::{aggregate_composition, composition, CompositionRow};
    pub use crate::vector::{
        buffer_line, buffer_lines, clip_lines, clip_roads, corridor, dissolve, region_boundary,
        BufferParams,
    };
    pub use geotract_core::prelude::*;
}
