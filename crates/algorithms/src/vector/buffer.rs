//! Buffer operations
//!
//! Expands road lines outward by a fixed linear distance to form a
//! corridor polygon. Each segment contributes an oriented rectangle and
//! each vertex a circle (round caps and joins); the pieces are unioned
//! into a single polygon. Distances are in the units of the working CRS,
//! so inputs must be reprojected before buffering.

use geo::{Area, BooleanOps, Coord, LineString, MultiLineString, MultiPolygon, Polygon};
use geotract_core::{Error, GeoTable, Result};
use std::f64::consts::PI;

/// Parameters for buffer operations
#[derive(Debug, Clone)]
pub struct BufferParams {
    /// Buffer distance in working-CRS linear units (default: 304.8 m, 1000 ft)
    pub distance: f64,
    /// Number of segments to approximate circular caps (default: 16)
    pub segments: usize,
}

impl Default for BufferParams {
    fn default() -> Self {
        Self {
            distance: 304.8,
            segments: 16,
        }
    }
}

impl BufferParams {
    fn validate(&self) -> Result<()> {
        if !self.distance.is_finite() || self.distance <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "distance",
                value: self.distance.to_string(),
                reason: "buffer distance must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Circle polygon approximated with `segments` vertices.
fn circle(center: Coord<f64>, radius: f64, segments: usize) -> Polygon<f64> {
    let n = segments.max(4);
    let mut coords = Vec::with_capacity(n + 1);
    for i in 0..n {
        let angle = 2.0 * PI * i as f64 / n as f64;
        coords.push((center.x + radius * angle.cos(), center.y + radius * angle.sin()));
    }
    coords.push(coords[0]);
    Polygon::new(LineString::from(coords), vec![])
}

/// Oriented rectangle covering one segment offset by `d` on both sides.
fn segment_rect(p0: Coord<f64>, p1: Coord<f64>, d: f64) -> Option<Polygon<f64>> {
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return None;
    }
    let nx = -dy / len * d;
    let ny = dx / len * d;
    Some(Polygon::new(
        LineString::from(vec![
            (p0.x + nx, p0.y + ny),
            (p1.x + nx, p1.y + ny),
            (p1.x - nx, p1.y - ny),
            (p0.x - nx, p0.y - ny),
            (p0.x + nx, p0.y + ny),
        ]),
        vec![],
    ))
}

/// Buffer a single line string with round caps and joins.
pub fn buffer_line(line: &LineString<f64>, params: &BufferParams) -> MultiPolygon<f64> {
    let d = params.distance.abs();
    let mut merged = MultiPolygon::new(Vec::new());

    for coord in &line.0 {
        let cap = circle(*coord, d, params.segments);
        merged = merged.union(&MultiPolygon::new(vec![cap]));
    }
    for window in line.0.windows(2) {
        if let Some(rect) = segment_rect(window[0], window[1], d) {
            merged = merged.union(&MultiPolygon::new(vec![rect]));
        }
    }
    merged
}

/// Buffer every line and union the results into one polygon.
pub fn buffer_lines(lines: &MultiLineString<f64>, params: &BufferParams) -> MultiPolygon<f64> {
    let mut merged = MultiPolygon::new(Vec::new());
    for line in &lines.0 {
        merged = merged.union(&buffer_line(line, params));
    }
    merged
}

/// Build the corridor polygon from a (clipped) road table.
///
/// Requires a projected CRS so the buffer distance is metrically
/// meaningful. An empty road table is an explicit failure rather than a
/// zero-area corridor: downstream interpolation on a degenerate target
/// would silently yield all-zero estimates.
pub fn corridor(roads: &GeoTable, params: &BufferParams) -> Result<MultiPolygon<f64>> {
    params.validate()?;
    if roads.crs.is_geographic() {
        return Err(Error::UnprojectedCrs(roads.crs.identifier()));
    }
    if roads.is_empty() {
        return Err(Error::EmptyCorridor);
    }

    let lines = roads.lines()?;
    let merged = buffer_lines(&lines, params);
    if merged.unsigned_area() <= 0.0 {
        return Err(Error::EmptyCorridor);
    }
    Ok(merged)
}
