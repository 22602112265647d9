//! Side-by-side choropleth panels.

use crate::canvas::Canvas;
use crate::choropleth::{draw_overlay, draw_table, draw_title, render_err, MapStyle};
use geo::MultiPolygon;
use geotract_algorithms::classification::class_breaks;
use geotract_core::{Error, GeoTable, Result};
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

const OVERLAY_COLOR: RGBColor = RGBColor(200, 30, 30);

/// Render several variables of one table as a row of maps sharing the
/// same extent. Each panel classifies its own variable independently,
/// so per-panel color ramps are not comparable across panels.
///
/// An optional overlay polygon (a corridor, typically) is stroked on
/// top of every panel.
pub fn choropleth_panel(
    table: &GeoTable,
    variables: &[String],
    style: &MapStyle,
    overlay: Option<&MultiPolygon<f64>>,
    path: &Path,
) -> Result<()> {
    if variables.is_empty() {
        return Err(Error::InvalidParameter {
            name: "variables",
            value: "[]".to_string(),
            reason: "need at least one variable to map".to_string(),
        });
    }

    let extent = table.bounds()?;
    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    let panels = root.split_evenly((1, variables.len()));

    for (panel, variable) in panels.iter().zip(variables) {
        let values = table.numeric_column(variable)?;
        let finite: Vec<f64> = values.iter().filter_map(|v| *v).collect();
        let breaks = class_breaks(&finite, &style.classify)?;

        let (w, h) = panel.dim_in_pixel();
        let canvas = Canvas::fit(extent, w, h, style.margin);
        draw_table(panel, &canvas, table, &values, &breaks, style)?;
        if let Some(boundary) = overlay {
            draw_overlay(panel, &canvas, boundary, OVERLAY_COLOR)?;
        }
        draw_title(panel, variable, style)?;
    }

    root.present().map_err(render_err)?;
    info!(panels = variables.len(), path = %path.display(), "rendered panel");
    Ok(())
}
