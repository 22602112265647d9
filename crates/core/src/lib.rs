//! # GeoTract Core
//!
//! Core types for the GeoTract census/corridor analysis toolkit.
//!
//! This crate provides:
//! - `GeoTable` / `Feature`: attribute tables with geometry
//! - `Crs`: coordinate reference system handling and UTM reprojection
//! - The shared error taxonomy for all pipeline stages

pub mod crs;
pub mod error;
pub mod table;

pub use crs::Crs;
pub use error::{Error, Result};
pub use table::{AttributeValue, Feature, GeoTable};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::{reproject_table, Crs};
    pub use crate::error::{Error, Result};
    pub use crate::table::{AttributeValue, Feature, GeoTable};
}
