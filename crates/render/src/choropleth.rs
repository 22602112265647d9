//! Static choropleth maps rendered to PNG.

use crate::canvas::Canvas;
use crate::palette::Palette;
use geo::MultiPolygon;
use geotract_algorithms::classification::{class_breaks, classify, ClassifyParams};
use geotract_core::{Error, GeoTable, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

/// Shared styling for map output.
#[derive(Debug, Clone)]
pub struct MapStyle {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub classify: ClassifyParams,
    pub palette: Palette,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            margin: 40,
            classify: ClassifyParams::default(),
            palette: Palette::Viridis,
        }
    }
}

const EDGE_COLOR: RGBColor = RGBColor(90, 90, 90);
const MISSING_FILL: RGBColor = RGBColor(224, 224, 224);

/// Render a single-variable choropleth to a PNG file.
///
/// Rows with missing values draw in light grey; a missing column is a
/// fatal error, not a blank map.
pub fn choropleth(table: &GeoTable, variable: &str, style: &MapStyle, path: &Path) -> Result<()> {
    let values = table.numeric_column(variable)?;
    let finite: Vec<f64> = values.iter().filter_map(|v| *v).collect();
    let breaks = class_breaks(&finite, &style.classify)?;

    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let canvas = Canvas::fit(table.bounds()?, style.width, style.height, style.margin);
    draw_table(&root, &canvas, table, &values, &breaks, style)?;
    draw_title(&root, variable, style)?;
    draw_legend(&root, &breaks, style)?;

    root.present().map_err(render_err)?;
    info!(variable, path = %path.display(), "rendered choropleth");
    Ok(())
}

pub(crate) fn render_err(e: impl std::fmt::Display) -> Error {
    Error::Render(e.to_string())
}

/// Fill every row's polygons by class color and stroke the edges.
pub(crate) fn draw_table<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    canvas: &Canvas,
    table: &GeoTable,
    values: &[Option<f64>],
    breaks: &[f64],
    style: &MapStyle,
) -> Result<()> {
    let polygons = table.polygons()?;
    for (multi, value) in polygons.iter().zip(values) {
        let fill = match value {
            Some(v) if v.is_finite() => {
                let rgb = style
                    .palette
                    .class_color(classify(*v, breaks), style.classify.k);
                RGBColor(rgb.r, rgb.g, rgb.b)
            }
            _ => MISSING_FILL,
        };
        for poly in &multi.0 {
            let ring: Vec<(i32, i32)> = poly
                .exterior()
                .coords()
                .map(|c| canvas.to_pixel(c.x, c.y))
                .collect();
            area.draw(&Polygon::new(ring.clone(), fill.filled()))
                .map_err(render_err)?;
            area.draw(&PathElement::new(ring, EDGE_COLOR.stroke_width(1)))
                .map_err(render_err)?;
            // Interior rings are rare in tract data; stroke them so
            // holes at least read as boundaries
            for interior in poly.interiors() {
                let hole: Vec<(i32, i32)> = interior
                    .coords()
                    .map(|c| canvas.to_pixel(c.x, c.y))
                    .collect();
                area.draw(&PathElement::new(hole, EDGE_COLOR.stroke_width(1)))
                    .map_err(render_err)?;
            }
        }
    }
    Ok(())
}

/// Stroke a polygon outline on top of an already-drawn map.
pub(crate) fn draw_overlay<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    canvas: &Canvas,
    overlay: &MultiPolygon<f64>,
    color: RGBColor,
) -> Result<()> {
    for poly in &overlay.0 {
        let ring: Vec<(i32, i32)> = poly
            .exterior()
            .coords()
            .map(|c| canvas.to_pixel(c.x, c.y))
            .collect();
        area.draw(&PathElement::new(ring, color.stroke_width(2)))
            .map_err(render_err)?;
    }
    Ok(())
}

pub(crate) fn draw_title<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    style: &MapStyle,
) -> Result<()> {
    area.draw(&Text::new(
        title.to_string(),
        (style.margin as i32, 10),
        ("sans-serif", 22),
    ))
    .map_err(render_err)
}

fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    breaks: &[f64],
    style: &MapStyle,
) -> Result<()> {
    let swatch = 18_i32;
    let x = 10_i32;
    let mut y = style.height as i32 - (style.classify.k as i32) * (swatch + 4) - 10;

    for class in 0..style.classify.k {
        let rgb = style.palette.class_color(class, style.classify.k);
        area.draw(&Rectangle::new(
            [(x, y), (x + swatch, y + swatch)],
            RGBColor(rgb.r, rgb.g, rgb.b).filled(),
        ))
        .map_err(render_err)?;
        area.draw(&Rectangle::new(
            [(x, y), (x + swatch, y + swatch)],
            EDGE_COLOR.stroke_width(1),
        ))
        .map_err(render_err)?;

        let label = legend_label(class, breaks);
        area.draw(&Text::new(
            label,
            (x + swatch + 6, y + 3),
            ("sans-serif", 14),
        ))
        .map_err(render_err)?;
        y += swatch + 4;
    }
    Ok(())
}

fn legend_label(class: usize, breaks: &[f64]) -> String {
    if breaks.is_empty() {
        return "all".to_string();
    }
    if class == 0 {
        format!("<= {:.1}", breaks[0])
    } else if class >= breaks.len() {
        format!("> {:.1}", breaks[breaks.len() - 1])
    } else {
        format!("{:.1} - {:.1}", breaks[class - 1], breaks[class])
    }
}
