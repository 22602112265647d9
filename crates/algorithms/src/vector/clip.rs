//! Clipping road lines to a region boundary.
//!
//! Segments are split exactly at the boundary; only the portions inside
//! the region survive. Clipping an input that lies wholly outside the
//! region yields an empty output, which callers must not assume away.

use geo::{BooleanOps, MultiLineString, MultiPolygon};
use geotract_core::{Error, GeoTable, Result};
use tracing::debug;

/// Clip a set of lines to a polygon boundary.
pub fn clip_lines(
    lines: &MultiLineString<f64>,
    boundary: &MultiPolygon<f64>,
) -> MultiLineString<f64> {
    boundary.clip(lines, false)
}

/// Restrict a road table to the parts intersecting the region boundary.
///
/// Attributes of each road feature are preserved; features that fall
/// entirely outside the region are dropped. The output table may be
/// empty.
pub fn clip_roads(roads: &GeoTable, boundary: &MultiPolygon<f64>) -> Result<GeoTable> {
    let mut clipped = GeoTable::new(roads.crs.clone());

    for (i, feature) in roads.iter().enumerate() {
        let lines = match &feature.geometry {
            Some(geo::Geometry::LineString(ls)) => MultiLineString::new(vec![ls.clone()]),
            Some(geo::Geometry::MultiLineString(mls)) => mls.clone(),
            Some(other) => {
                return Err(Error::InvalidGeometry(format!(
                    "road row {i}: expected line, got {other:?}"
                )))
            }
            None => {
                return Err(Error::InvalidGeometry(format!(
                    "road row {i}: null geometry"
                )))
            }
        };

        let inside = clip_lines(&lines, boundary);
        if inside.0.is_empty() {
            continue;
        }
        let mut kept = feature.clone();
        kept.geometry = Some(geo::Geometry::MultiLineString(inside));
        clipped.push(kept);
    }

    debug!(
        input = roads.len(),
        kept = clipped.len(),
        "clipped roads to region boundary"
    );
    Ok(clipped)
}
