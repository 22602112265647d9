//! Areal-weighted interpolation.
//!
//! Redistributes extensive (additive) attributes from source polygons
//! onto target polygons in proportion to intersected area, assuming
//! uniform density within each source polygon. With weights of
//! `intersected area / source area`, a variable's total over any set of
//! disjoint targets can never exceed its total over the overlapping
//! sources, so nothing is double-counted.

use geo::{Area, BooleanOps, MultiPolygon};
use geotract_core::{AttributeValue, Error, Feature, GeoTable, Result};
use tracing::debug;

/// Interpolate extensive variables from `source` tracts onto `targets`.
///
/// Returns a table with one row per target polygon carrying the
/// interpolated value of every requested variable. Values are estimates,
/// meaningful in aggregate only.
///
/// Null source cells contribute zero (Pipeline A imputation removes them
/// in practice). An unknown variable or a zero-area target is a fatal
/// error; a degenerate source polygon likewise, since its density is
/// undefined.
pub fn area_interpolate(
    source: &GeoTable,
    targets: &[MultiPolygon<f64>],
    variables: &[String],
) -> Result<GeoTable> {
    if targets.is_empty() {
        return Err(Error::InvalidParameter {
            name: "targets",
            value: "[]".to_string(),
            reason: "at least one target polygon is required".to_string(),
        });
    }
    for (index, target) in targets.iter().enumerate() {
        if target.0.is_empty() || target.unsigned_area() <= 0.0 {
            return Err(Error::EmptyTarget { index });
        }
    }

    let polygons = source.polygons()?;
    if polygons.is_empty() {
        return Err(Error::EmptyResult("source table has no rows".to_string()));
    }
    let columns: Vec<Vec<Option<f64>>> = variables
        .iter()
        .map(|v| source.numeric_column(v))
        .collect::<Result<_>>()?;

    let mut sums = vec![vec![0.0_f64; variables.len()]; targets.len()];

    for (row, poly) in polygons.iter().enumerate() {
        let source_area = poly.unsigned_area();
        if source_area <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "source row {row} has zero area"
            )));
        }
        for (t, target) in targets.iter().enumerate() {
            let shared = poly.intersection(target).unsigned_area();
            if shared <= 0.0 {
                continue;
            }
            let weight = shared / source_area;
            for (v, column) in columns.iter().enumerate() {
                sums[t][v] += weight * column[row].unwrap_or(0.0);
            }
        }
    }

    let mut estimates = GeoTable::new(source.crs.clone());
    for (t, target) in targets.iter().enumerate() {
        let mut feature = Feature::new(geo::Geometry::MultiPolygon(target.clone()));
        for (v, name) in variables.iter().enumerate() {
            feature.set_property(name.clone(), AttributeValue::Float(sums[t][v]));
        }
        estimates.push(feature);
    }

    debug!(
        sources = polygons.len(),
        targets = targets.len(),
        variables = variables.len(),
        "areal interpolation complete"
    );
    Ok(estimates)
}
