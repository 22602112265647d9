//! Road network loading from zipped shapefiles.
//!
//! TIGER/Line road files ship as zip archives containing the shapefile
//! members (.shp, .shx, .dbf, ...). The archive is unpacked to a
//! temporary directory and read from there; attributes are carried over
//! onto the road features. Road tables are read-only inputs.

use geo::{LineString, MultiLineString};
use geotract_core::{AttributeValue, Crs, Error, Feature, GeoTable, Result};
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Read a road network from a zipped shapefile.
///
/// Coordinates are taken as WGS84 degrees, which is how TIGER/Line
/// distributes them; reproject before any metric operation.
pub fn read_roads_zip(path: &Path) -> Result<GeoTable> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| Error::Acquisition(format!("{}: {e}", path.display())))?;

    let dir = tempfile::tempdir()?;
    let mut shp_path = None;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| Error::Acquisition(format!("{}: {e}", path.display())))?;
        // Flatten to the basename; shapefile members never nest meaningfully
        let Some(name) = Path::new(entry.name())
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
        else {
            continue;
        };
        let lower = name.to_lowercase();
        if !(lower.ends_with(".shp")
            || lower.ends_with(".shx")
            || lower.ends_with(".dbf")
            || lower.ends_with(".prj")
            || lower.ends_with(".cpg"))
        {
            continue;
        }
        let out_path = dir.path().join(&name);
        let mut out = File::create(&out_path)?;
        std::io::copy(&mut entry, &mut out)?;
        if lower.ends_with(".shp") {
            shp_path = Some(out_path);
        }
    }

    let shp_path = shp_path.ok_or_else(|| {
        Error::Acquisition(format!("{}: no .shp member in archive", path.display()))
    })?;

    let mut reader = shapefile::Reader::from_path(&shp_path)
        .map_err(|e| Error::Acquisition(format!("{}: {e}", path.display())))?;

    let mut table = GeoTable::new(Crs::wgs84());
    for row in reader.iter_shapes_and_records() {
        let (shape, record) =
            row.map_err(|e| Error::Acquisition(format!("{}: {e}", path.display())))?;

        let geometry = match shape {
            shapefile::Shape::Polyline(polyline) => {
                let lines: Vec<LineString<f64>> = polyline
                    .parts()
                    .iter()
                    .map(|part| LineString::from(part.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>()))
                    .collect();
                geo::Geometry::MultiLineString(MultiLineString::new(lines))
            }
            shapefile::Shape::NullShape => continue,
            other => {
                return Err(Error::InvalidGeometry(format!(
                    "unexpected shape in road file: {}",
                    other.shapetype()
                )))
            }
        };

        let mut feature = Feature::new(geometry);
        for (name, value) in record {
            feature.set_property(name.to_lowercase(), attr_from_dbase(value));
        }
        table.push(feature);
    }

    if table.is_empty() {
        return Err(Error::EmptyResult(format!(
            "{}: road network is empty",
            path.display()
        )));
    }
    info!(rows = table.len(), path = %path.display(), "loaded road network");
    Ok(table)
}

fn attr_from_dbase(value: shapefile::dbase::FieldValue) -> AttributeValue {
    use shapefile::dbase::FieldValue;
    match value {
        FieldValue::Character(Some(s)) => AttributeValue::String(s.trim().to_string()),
        FieldValue::Numeric(Some(v)) => AttributeValue::Float(v),
        FieldValue::Float(Some(v)) => AttributeValue::Float(v as f64),
        FieldValue::Integer(v) => AttributeValue::Int(v as i64),
        FieldValue::Double(v) => AttributeValue::Float(v),
        FieldValue::Logical(Some(b)) => AttributeValue::Bool(b),
        _ => AttributeValue::Null,
    }
}
