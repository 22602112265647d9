//! Interactive choropleth maps as self-contained Leaflet HTML.
//!
//! The output is a single HTML file embedding the table as GeoJSON with
//! precomputed fill colors, so it opens straight from disk. Leaflet
//! itself loads from a CDN.

use crate::choropleth::MapStyle;
use geojson::{Feature as GjFeature, FeatureCollection, Geometry as GjGeometry};
use geotract_algorithms::classification::{class_breaks, classify};
use geotract_core::{Crs, Error, GeoTable, Result};
use std::path::Path;
use tracing::info;

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8"/>
<title>__TITLE__</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"/>
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map { height: 100%; margin: 0; }</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map('map');
map.fitBounds(__BOUNDS__);
L.tileLayer('https://tile.openstreetmap.org/{z}/{x}/{y}.png', {
  attribution: '&copy; OpenStreetMap contributors'
}).addTo(map);
var data = __GEOJSON__;
L.geoJSON(data, {
  style: function (feature) {
    return {
      fillColor: feature.properties.__fill,
      fillOpacity: 0.7,
      color: '#5a5a5a',
      weight: 1
    };
  },
  onEachFeature: function (feature, layer) {
    layer.bindTooltip(feature.properties.__label);
  }
}).addTo(map);
</script>
</body>
</html>
"#;

/// Write an interactive choropleth to an HTML file.
///
/// The table must be in geographic coordinates; Leaflet positions
/// features by latitude and longitude.
pub fn explore(table: &GeoTable, variable: &str, style: &MapStyle, path: &Path) -> Result<()> {
    if !table.crs.is_geographic() {
        return Err(Error::CrsMismatch(
            Crs::wgs84().identifier(),
            table.crs.identifier(),
        ));
    }
    let values = table.numeric_column(variable)?;
    let finite: Vec<f64> = values.iter().filter_map(|v| *v).collect();
    let breaks = class_breaks(&finite, &style.classify)?;

    let mut features = Vec::new();
    for (row, value) in table.iter().zip(&values) {
        let Some(geometry) = &row.geometry else {
            continue;
        };
        let fill = match value {
            Some(v) if v.is_finite() => style
                .palette
                .class_color(classify(*v, &breaks), style.classify.k)
                .hex(),
            _ => "#e0e0e0".to_string(),
        };
        let label = match value {
            Some(v) => format!("{variable}: {v:.2}"),
            None => format!("{variable}: missing"),
        };

        let mut properties = serde_json::Map::new();
        properties.insert("__fill".to_string(), fill.into());
        properties.insert("__label".to_string(), label.into());
        if let Some(v) = value {
            properties.insert(variable.to_string(), (*v).into());
        }
        if let Some(id) = &row.id {
            properties.insert("geoid".to_string(), id.clone().into());
        }
        features.push(GjFeature {
            bbox: None,
            geometry: Some(GjGeometry::new(geometry.into())),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });
    }

    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    let bounds = table.bounds()?;
    let bounds_js = format!(
        "[[{}, {}], [{}, {}]]",
        bounds.min().y,
        bounds.min().x,
        bounds.max().y,
        bounds.max().x
    );

    let geojson = serde_json::to_string(&collection)
        .map_err(|e| Error::Render(format!("GeoJSON encoding failed: {e}")))?;
    let html = TEMPLATE
        .replace("__TITLE__", variable)
        .replace("__BOUNDS__", &bounds_js)
        .replace("__GEOJSON__", &geojson);
    std::fs::write(path, html)?;
    info!(variable, path = %path.display(), "wrote interactive map");
    Ok(())
}
