//! Dissolve: collapse many polygons into their union.
//!
//! Overlapping and adjacent boundaries merge without gaps; the result is
//! the exact combined coverage, recomputed each run.

use geo::{Area, BooleanOps, MultiPolygon};
use geotract_core::{Error, GeoTable, Result};

/// Union a set of polygons into a single multipolygon.
///
/// Errors on an empty input set or if every polygon has zero area.
pub fn dissolve(polygons: &[MultiPolygon<f64>]) -> Result<MultiPolygon<f64>> {
    if polygons.is_empty() {
        return Err(Error::EmptyResult("no polygons to dissolve".to_string()));
    }

    let mut merged = MultiPolygon::new(Vec::new());
    for poly in polygons {
        merged = merged.union(poly);
    }

    if merged.unsigned_area() <= 0.0 {
        return Err(Error::InvalidGeometry(
            "dissolve produced a zero-area result".to_string(),
        ));
    }
    Ok(merged)
}

/// The region boundary: union of every tract polygon in the table.
pub fn region_boundary(tracts: &GeoTable) -> Result<MultiPolygon<f64>> {
    let polygons = tracts.polygons()?;
    dissolve(&polygons)
}
