//! Parquet snapshot storage.
//!
//! A prepared tract table is persisted as a Parquet file with one column
//! per attribute plus a `geometry` column holding WKT text. Snapshots
//! are always stored in WGS84; reprojection happens downstream, never
//! before the write.

use geotract_core::{AttributeValue, Crs, Error, Feature, GeoTable, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::info;
use wkt::{ToWkt, TryFromWkt};

/// Default location of the prepared-dataset snapshot.
pub const DEFAULT_SNAPSHOT_PATH: &str = "data/sdgdf.parquet";

const GEOMETRY_COLUMN: &str = "geometry";

/// Write a table to a Parquet snapshot, replacing any existing file.
pub fn write_snapshot(table: &GeoTable, path: &Path) -> Result<()> {
    if !table.crs.is_geographic() {
        return Err(Error::CrsMismatch(
            Crs::wgs84().identifier(),
            table.crs.identifier(),
        ));
    }
    let mut df = to_dataframe(table)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    ParquetWriter::new(file)
        .finish(&mut df)
        .map_err(|e| Error::Snapshot(format!("{}: {e}", path.display())))?;
    info!(rows = table.len(), path = %path.display(), "wrote snapshot");
    Ok(())
}

/// Read a table back from a Parquet snapshot.
pub fn read_snapshot(path: &Path) -> Result<GeoTable> {
    let file = File::open(path)?;
    let df = ParquetReader::new(file)
        .finish()
        .map_err(|e| Error::Snapshot(format!("{}: {e}", path.display())))?;
    from_dataframe(&df, path)
}

fn to_dataframe(table: &GeoTable) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::new();

    let wkt: Vec<Option<String>> = table
        .iter()
        .map(|f| f.geometry.as_ref().map(|g| g.wkt_string()))
        .collect();
    columns.push(Series::new(GEOMETRY_COLUMN.into(), wkt).into());

    for name in table.column_names() {
        if name == GEOMETRY_COLUMN {
            return Err(Error::Snapshot(format!(
                "attribute column conflicts with reserved name {GEOMETRY_COLUMN:?}"
            )));
        }
        columns.push(column_series(table, &name)?);
    }
    DataFrame::new(columns).map_err(|e| Error::Snapshot(e.to_string()))
}

/// Pick the widest type any cell in the column needs. Mixed int/float
/// columns widen to float; anything mixed with text stores as text.
fn column_series(table: &GeoTable, name: &str) -> Result<Column> {
    let mut has_string = false;
    let mut has_float = false;
    let mut has_int = false;
    let mut has_bool = false;
    for feature in table.iter() {
        match feature.get_property(name) {
            Some(AttributeValue::String(_)) => has_string = true,
            Some(AttributeValue::Float(_)) => has_float = true,
            Some(AttributeValue::Int(_)) => has_int = true,
            Some(AttributeValue::Bool(_)) => has_bool = true,
            Some(AttributeValue::Null) | None => {}
        }
    }

    let series = if has_string {
        let values: Vec<Option<String>> = table
            .iter()
            .map(|f| {
                f.get_property(name).and_then(|v| match v {
                    AttributeValue::Null => None,
                    AttributeValue::Bool(b) => Some(b.to_string()),
                    AttributeValue::Int(i) => Some(i.to_string()),
                    AttributeValue::Float(x) => Some(x.to_string()),
                    AttributeValue::String(s) => Some(s.clone()),
                })
            })
            .collect();
        Series::new(name.into(), values)
    } else if has_float {
        let values: Vec<Option<f64>> = table
            .iter()
            .map(|f| f.get_property(name).and_then(AttributeValue::as_f64))
            .collect();
        Series::new(name.into(), values)
    } else if has_int {
        let values: Vec<Option<i64>> = table
            .iter()
            .map(|f| {
                f.get_property(name).and_then(|v| match v {
                    AttributeValue::Int(i) => Some(*i),
                    _ => None,
                })
            })
            .collect();
        Series::new(name.into(), values)
    } else if has_bool {
        let values: Vec<Option<bool>> = table
            .iter()
            .map(|f| {
                f.get_property(name).and_then(|v| match v {
                    AttributeValue::Bool(b) => Some(*b),
                    _ => None,
                })
            })
            .collect();
        Series::new(name.into(), values)
    } else {
        // All-null column; keep it as an empty float column
        let values: Vec<Option<f64>> = vec![None; table.len()];
        Series::new(name.into(), values)
    };
    Ok(series.into())
}

fn from_dataframe(df: &DataFrame, path: &Path) -> Result<GeoTable> {
    let snapshot_err = |e: PolarsError| Error::Snapshot(format!("{}: {e}", path.display()));

    let mut table = GeoTable::new(Crs::wgs84());
    for _ in 0..df.height() {
        table.push(Feature::empty());
    }

    for column in df.get_columns() {
        let name = column.name().to_string();
        let series = column.as_materialized_series();

        if name == GEOMETRY_COLUMN {
            let ca = series.str().map_err(snapshot_err)?;
            for (i, cell) in ca.into_iter().enumerate() {
                if let Some(text) = cell {
                    let geometry = geo::Geometry::<f64>::try_from_wkt_str(text)
                        .map_err(|e| Error::Snapshot(format!("{}: bad WKT: {e}", path.display())))?;
                    table.features[i].geometry = Some(geometry);
                }
            }
            continue;
        }

        match series.dtype() {
            DataType::Int64 => {
                let ca = series.i64().map_err(snapshot_err)?;
                for (i, cell) in ca.into_iter().enumerate() {
                    let value = cell.map_or(AttributeValue::Null, AttributeValue::Int);
                    table.features[i].set_property(name.clone(), value);
                }
            }
            DataType::Float64 => {
                let ca = series.f64().map_err(snapshot_err)?;
                for (i, cell) in ca.into_iter().enumerate() {
                    let value = cell.map_or(AttributeValue::Null, AttributeValue::Float);
                    table.features[i].set_property(name.clone(), value);
                }
            }
            DataType::Boolean => {
                let ca = series.bool().map_err(snapshot_err)?;
                for (i, cell) in ca.into_iter().enumerate() {
                    let value = cell.map_or(AttributeValue::Null, AttributeValue::Bool);
                    table.features[i].set_property(name.clone(), value);
                }
            }
            DataType::String => {
                let ca = series.str().map_err(snapshot_err)?;
                for (i, cell) in ca.into_iter().enumerate() {
                    let value = cell.map_or(AttributeValue::Null, |s| {
                        AttributeValue::String(s.to_string())
                    });
                    table.features[i].set_property(name.clone(), value);
                }
            }
            other => {
                return Err(Error::Snapshot(format!(
                    "{}: unsupported column type {other:?} for {name:?}",
                    path.display()
                )))
            }
        }
    }

    for feature in table.features.iter_mut() {
        if let Some(AttributeValue::String(geoid)) = feature.get_property("geoid").cloned() {
            feature.id = Some(geoid);
        }
    }
    info!(rows = table.len(), path = %path.display(), "read snapshot");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn sample_table() -> GeoTable {
        let mut table = GeoTable::new(Crs::wgs84());
        for (geoid, pop, value) in [
            ("06073000100", 100_i64, Some(250.0)),
            ("06073000200", 200_i64, None),
        ] {
            let mut f = Feature::new(geo::Geometry::Polygon(polygon![
                (x: 0.0, y: 0.0),
                (x: 1.0, y: 0.0),
                (x: 1.0, y: 1.0),
                (x: 0.0, y: 1.0),
                (x: 0.0, y: 0.0),
            ]));
            f.set_property("geoid", AttributeValue::String(geoid.to_string()));
            f.set_property("n_total_pop", AttributeValue::Int(pop));
            f.set_property(
                "median_home_value",
                value.map_or(AttributeValue::Null, AttributeValue::Float),
            );
            f.id = Some(geoid.to_string());
            table.push(f);
        }
        table
    }

    #[test]
    fn round_trip_preserves_rows_and_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.parquet");

        let table = sample_table();
        write_snapshot(&table, &path).unwrap();
        let restored = read_snapshot(&path).unwrap();

        assert_eq!(restored.len(), 2);
        assert!(restored.crs.is_geographic());
        assert_eq!(restored.features[0].id.as_deref(), Some("06073000100"));
        assert_eq!(
            restored.features[0].get_property("n_total_pop"),
            Some(&AttributeValue::Int(100))
        );
        assert_eq!(
            restored.features[0].get_property("median_home_value"),
            Some(&AttributeValue::Float(250.0))
        );
        assert!(restored.features[1]
            .get_property("median_home_value")
            .unwrap()
            .is_null());
        assert!(restored.features[0].geometry.is_some());
    }

    #[test]
    fn write_overwrites_existing_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.parquet");

        let mut table = sample_table();
        write_snapshot(&table, &path).unwrap();
        table.features.pop();
        write_snapshot(&table, &path).unwrap();

        assert_eq!(read_snapshot(&path).unwrap().len(), 1);
    }

    #[test]
    fn projected_table_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.parquet");

        let mut table = sample_table();
        table.crs = Crs::from_epsg(32611);
        assert!(matches!(
            write_snapshot(&table, &path),
            Err(Error::CrsMismatch(_, _))
        ));
    }
}
