//! Pure-Rust WGS84 → UTM reprojection (Snyder 1987, USGS formulas).
//!
//! Covers EPSG 326xx (UTM North) and 327xx (UTM South), which is all the
//! toolkit needs: tract and road inputs arrive in WGS84 and are projected
//! into the UTM zone estimated from the tract extent so that buffer
//! distances and areas are metrically meaningful. No libproj dependency.

use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::table::GeoTable;
use geo::{Coord, MapCoords};

// ── WGS84 ellipsoid constants ────────────────────────────────────────────

const A: f64 = 6_378_137.0; // semi-major axis (m)
const F: f64 = 1.0 / 298.257_223_563; // flattening
const E2: f64 = 2.0 * F - F * F; // eccentricity squared
const E_PRIME2: f64 = E2 / (1.0 - E2); // second eccentricity squared
const K0: f64 = 0.9996; // UTM scale factor
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Parse an EPSG code into UTM zone info: `Some((zone, is_north))`.
///
/// - EPSG 326xx → zone xx, North hemisphere
/// - EPSG 327xx → zone xx, South hemisphere
pub fn parse_utm_epsg(epsg: u32) -> Option<(u32, bool)> {
    if (32601..=32660).contains(&epsg) {
        Some((epsg - 32600, true))
    } else if (32701..=32760).contains(&epsg) {
        Some((epsg - 32700, false))
    } else {
        None
    }
}

/// Reproject every geometry of a WGS84 table into the target UTM CRS.
///
/// Deterministic for fixed inputs. Tables already in the target CRS are
/// returned unchanged; any other source/target combination is unsupported.
pub fn reproject_table(table: &GeoTable, target: &Crs) -> Result<GeoTable> {
    if table.crs.is_equivalent(target) {
        return Ok(table.clone());
    }
    if !table.crs.is_geographic() {
        return Err(Error::CrsMismatch(
            table.crs.identifier(),
            target.identifier(),
        ));
    }
    let (zone, north) = parse_utm_epsg(target.epsg())
        .ok_or_else(|| Error::UnsupportedCrs(target.identifier()))?;

    let mut out = GeoTable::new(target.clone());
    for feature in table.iter() {
        let mut projected = feature.clone();
        projected.geometry = feature.geometry.as_ref().map(|geom| {
            geom.map_coords(|c| {
                let (e, n) = wgs84_to_utm(c.x, c.y, zone, north);
                Coord { x: e, y: n }
            })
        });
        out.push(projected);
    }
    Ok(out)
}

// ── Core projection (Snyder 1987, USGS Prof. Paper 1395, pp. 61-64) ─────

/// Convert WGS84 (longitude, latitude) in degrees to UTM (easting, northing)
/// in metres for the given zone and hemisphere.
pub fn wgs84_to_utm(lon_deg: f64, lat_deg: f64, zone: u32, north: bool) -> (f64, f64) {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();

    // Central meridian of the zone
    let lon0 = ((zone as f64 - 1.0) * 6.0 - 180.0 + 3.0).to_radians();

    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let tan_lat = lat.tan();

    let n = A / (1.0 - E2 * sin_lat * sin_lat).sqrt();
    let t = tan_lat * tan_lat;
    let c = E_PRIME2 * cos_lat * cos_lat;
    let a_coeff = cos_lat * (lon - lon0);

    let m = meridional_arc(lat);

    let a2 = a_coeff * a_coeff;
    let a4 = a2 * a2;
    let a6 = a4 * a2;

    // Easting (Snyder eq. 8-9)
    let easting = K0 * n
        * (a_coeff
            + (1.0 - t + c) * a2 * a_coeff / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * E_PRIME2) * a4 * a_coeff / 120.0)
        + FALSE_EASTING;

    // Northing (Snyder eq. 8-10)
    let northing = K0
        * (m
            + n * tan_lat
                * (a2 / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * E_PRIME2) * a6 / 720.0));

    let northing = if north {
        northing
    } else {
        northing + FALSE_NORTHING_SOUTH
    };

    (easting, northing)
}

/// Meridional arc from the equator to latitude `lat` (radians).
/// Snyder eq. 3-21.
fn meridional_arc(lat: f64) -> f64 {
    let e2 = E2;
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    A * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
        - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
        + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
        - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Feature;
    use geo::{polygon, Geometry};

    fn assert_close(a: f64, b: f64, tol: f64, msg: &str) {
        let diff = (a - b).abs();
        assert!(
            diff < tol,
            "{msg}: expected {b}, got {a}, diff {diff} exceeds tolerance {tol}"
        );
    }

    #[test]
    fn parse_utm_codes() {
        assert_eq!(parse_utm_epsg(32611), Some((11, true)));
        assert_eq!(parse_utm_epsg(32721), Some((21, false)));
        assert_eq!(parse_utm_epsg(4326), None);
        assert_eq!(parse_utm_epsg(32600), None); // zone 0 invalid
        assert_eq!(parse_utm_epsg(32661), None); // zone 61 invalid
    }

    // Equator at the zone 11 central meridian (-117°): easting is exactly
    // the false easting, northing exactly zero.
    #[test]
    fn equator_central_meridian() {
        let (e, n) = wgs84_to_utm(-117.0, 0.0, 11, true);
        assert_close(e, 500_000.0, 0.01, "easting at CM");
        assert_close(n, 0.0, 0.01, "northing at equator");
    }

    // Downtown San Diego (-117.1611, 32.7157), UTM 11N. The point is
    // ~0.16° west of the central meridian at ~32.7°N, so the easting sits
    // ~15 km west of the false easting and the northing near 3.62e6 m.
    #[test]
    fn san_diego_utm11n() {
        let (e, n) = wgs84_to_utm(-117.1611, 32.7157, 11, true);
        assert!(
            (484_000.0..486_000.0).contains(&e),
            "easting ~485km, got {e}"
        );
        assert!(
            (3_615_000.0..3_625_000.0).contains(&n),
            "northing ~3620km, got {n}"
        );
    }

    #[test]
    fn southern_hemisphere_offset() {
        let (_, n_south) = wgs84_to_utm(-58.3816, -34.6037, 21, false);
        assert!(n_south > 6_000_000.0, "south northing carries false offset");
    }

    #[test]
    fn reproject_table_projects_all_features() {
        let mut table = GeoTable::new(Crs::wgs84());
        table.push(Feature::new(Geometry::Polygon(polygon![
            (x: -117.2, y: 32.7),
            (x: -117.1, y: 32.7),
            (x: -117.1, y: 32.8),
            (x: -117.2, y: 32.8),
            (x: -117.2, y: 32.7),
        ])));

        let target = Crs::from_epsg(32611);
        let projected = reproject_table(&table, &target).unwrap();

        assert_eq!(projected.len(), 1);
        assert!(projected.crs.is_equivalent(&target));
        let Some(Geometry::Polygon(poly)) = &projected.features[0].geometry else {
            panic!("expected polygon");
        };
        for coord in poly.exterior().0.iter() {
            assert!(coord.x > 100_000.0, "easting should be metres");
            assert!(coord.y > 3_000_000.0, "northing should be metres");
        }
    }

    #[test]
    fn reproject_noop_when_already_target() {
        let table = GeoTable::new(Crs::from_epsg(32611));
        let out = reproject_table(&table, &Crs::from_epsg(32611)).unwrap();
        assert!(out.crs.is_equivalent(&table.crs));
    }

    #[test]
    fn reproject_rejects_projected_source() {
        let table = GeoTable::new(Crs::from_epsg(32611));
        assert!(reproject_table(&table, &Crs::from_epsg(32612)).is_err());
    }
}
