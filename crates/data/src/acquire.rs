//! Census tract acquisition.
//!
//! Tract tables arrive as GeoJSON feature collections, either fetched
//! from a census-data provider or read from a local file, then filtered
//! to a single target year. Network failures are surfaced immediately;
//! there are no retries.

use geotract_core::{AttributeValue, Crs, Error, Feature, GeoTable, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Fetch a county's tract dataset from a GeoJSON endpoint.
///
/// A `{county}` placeholder in the URL is substituted with the county
/// FIPS code (e.g. `"06073"`).
pub fn fetch_tracts(url: &str, county_fips: &str) -> Result<GeoTable> {
    let url = url.replace("{county}", county_fips);
    info!(url = %url, "fetching tract dataset");

    let response = reqwest::blocking::get(&url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| Error::Acquisition(format!("{url}: {e}")))?;
    let body = response
        .text()
        .map_err(|e| Error::Acquisition(format!("{url}: {e}")))?;
    parse_geojson(&body)
}

/// Read a tract dataset from a local GeoJSON file.
pub fn read_tracts_geojson(path: &Path) -> Result<GeoTable> {
    let body = std::fs::read_to_string(path)?;
    parse_geojson(&body)
}

fn parse_geojson(body: &str) -> Result<GeoTable> {
    let collection: geojson::FeatureCollection = body
        .parse()
        .map_err(|e| Error::Acquisition(format!("invalid GeoJSON: {e}")))?;

    let mut table = GeoTable::new(Crs::wgs84());
    for gj in collection.features {
        let mut feature = match gj.geometry {
            Some(g) => {
                let geometry: geo_types::Geometry<f64> = g
                    .value
                    .try_into()
                    .map_err(|e| Error::InvalidGeometry(format!("{e}")))?;
                Feature::new(geometry)
            }
            None => Feature::empty(),
        };
        if let Some(props) = gj.properties {
            for (key, value) in props {
                feature.set_property(key, attr_from_json(&value));
            }
        }
        if let Some(AttributeValue::String(geoid)) = feature.get_property("geoid").cloned() {
            feature.id = Some(geoid);
        }
        table.push(feature);
    }
    info!(rows = table.len(), "parsed tract dataset");
    Ok(table)
}

fn attr_from_json(value: &serde_json::Value) -> AttributeValue {
    match value {
        serde_json::Value::Null => AttributeValue::Null,
        serde_json::Value::Bool(b) => AttributeValue::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                AttributeValue::Int(i)
            } else {
                AttributeValue::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => AttributeValue::String(s.clone()),
        other => AttributeValue::String(other.to_string()),
    }
}

/// Filter a multi-year tract table down to one target year.
///
/// An empty result is an explicit error, and so is a duplicated tract
/// ID within the year: downstream stages assume exactly one row per
/// tract.
pub fn filter_year(table: &GeoTable, year: i64) -> Result<GeoTable> {
    let mut filtered = GeoTable::new(table.crs.clone());
    for feature in table.iter() {
        let matches = feature
            .get_property("year")
            .and_then(AttributeValue::as_f64)
            .is_some_and(|y| y as i64 == year);
        if matches {
            filtered.push(feature.clone());
        }
    }
    if filtered.is_empty() {
        return Err(Error::EmptyResult(format!("no tracts for year {year}")));
    }

    let mut seen = HashSet::new();
    for feature in filtered.iter() {
        if let Some(id) = &feature.id {
            if !seen.insert(id.clone()) {
                return Err(Error::Other(format!(
                    "duplicate tract {id} for year {year}"
                )));
            }
        }
    }
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_YEARS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]},
                "properties": {"geoid": "06073000100", "year": 2010, "n_total_pop": 100, "median_home_value": 250000.0}
            },
            {
                "type": "Feature",
                "geometry": {"type": "Polygon", "coordinates": [[[1,0],[2,0],[2,1],[1,1],[1,0]]]},
                "properties": {"geoid": "06073000200", "year": 2010, "n_total_pop": 200, "median_home_value": null}
            },
            {
                "type": "Feature",
                "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]},
                "properties": {"geoid": "06073000100", "year": 2000, "n_total_pop": 90}
            }
        ]
    }"#;

    #[test]
    fn parse_and_filter_one_year() {
        let table = parse_geojson(TWO_YEARS).unwrap();
        assert_eq!(table.len(), 3);

        let filtered = filter_year(&table, 2010).unwrap();
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.features[0].id.as_deref(), Some("06073000100"));

        // Numbers land with their JSON types; nulls survive as nulls
        let values = filtered.numeric_column("median_home_value").unwrap();
        assert_eq!(values, vec![Some(250_000.0), None]);
    }

    #[test]
    fn missing_year_is_an_error() {
        let table = parse_geojson(TWO_YEARS).unwrap();
        assert!(matches!(
            filter_year(&table, 1990),
            Err(Error::EmptyResult(_))
        ));
    }

    #[test]
    fn duplicate_tract_in_year_is_an_error() {
        let doubled = TWO_YEARS.replace("\"year\": 2000", "\"year\": 2010");
        let table = parse_geojson(&doubled).unwrap();
        assert!(filter_year(&table, 2010).is_err());
    }

    #[test]
    fn garbage_body_is_an_acquisition_error() {
        assert!(matches!(
            parse_geojson("not geojson"),
            Err(Error::Acquisition(_))
        ));
    }
}
