//! Coordinate Reference System handling

mod utm;

pub use utm::{parse_utm_epsg, reproject_table, wgs84_to_utm};

use crate::error::{Error, Result};
use geo::Rect;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate Reference System representation.
///
/// EPSG-centric: everything this toolkit does is either WGS84 geographic
/// (EPSG:4326) or a UTM zone (EPSG 326xx / 327xx).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crs {
    epsg: u32,
}

impl Crs {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self { epsg: code }
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// Get the EPSG code
    pub fn epsg(&self) -> u32 {
        self.epsg
    }

    /// Whether this CRS is geographic (degrees) rather than projected (metres)
    pub fn is_geographic(&self) -> bool {
        self.epsg == 4326
    }

    /// Whether this CRS is a projected system with linear units
    pub fn is_projected(&self) -> bool {
        !self.is_geographic()
    }

    /// Check if two CRS are equivalent
    pub fn is_equivalent(&self, other: &Crs) -> bool {
        self.epsg == other.epsg
    }

    /// Estimate the locally appropriate UTM CRS for a WGS84 extent.
    ///
    /// Picks the zone containing the extent centroid; the hemisphere follows
    /// the centroid latitude sign. Deterministic for a fixed extent.
    pub fn utm_for_extent(extent: &Rect<f64>) -> Result<Crs> {
        let center = extent.center();
        let lon = center.x;
        let lat = center.y;

        if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
            return Err(Error::InvalidParameter {
                name: "extent",
                value: format!("center ({lon}, {lat})"),
                reason: "not in WGS84 degrees".to_string(),
            });
        }

        let zone = (((lon + 180.0) / 6.0).floor() as u32 + 1).clamp(1, 60);
        let epsg = if lat >= 0.0 { 32600 + zone } else { 32700 + zone };
        Ok(Crs::from_epsg(epsg))
    }

    /// Get a string identifier for this CRS
    pub fn identifier(&self) -> String {
        format!("EPSG:{}", self.epsg)
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    #[test]
    fn crs_epsg_identifier() {
        let crs = Crs::from_epsg(32611);
        assert_eq!(crs.epsg(), 32611);
        assert_eq!(crs.identifier(), "EPSG:32611");
        assert!(crs.is_projected());
    }

    #[test]
    fn crs_equivalence() {
        let a = Crs::from_epsg(4326);
        let b = Crs::wgs84();
        assert!(a.is_equivalent(&b));
        assert!(b.is_geographic());
    }

    #[test]
    fn utm_estimate_san_diego() {
        // San Diego County sits in UTM zone 11 North
        let extent = Rect::new(
            coord! { x: -117.6, y: 32.5 },
            coord! { x: -116.1, y: 33.5 },
        );
        let crs = Crs::utm_for_extent(&extent).unwrap();
        assert_eq!(crs.epsg(), 32611);
    }

    #[test]
    fn utm_estimate_southern_hemisphere() {
        // Buenos Aires: zone 21 South
        let extent = Rect::new(
            coord! { x: -58.5, y: -34.7 },
            coord! { x: -58.3, y: -34.5 },
        );
        let crs = Crs::utm_for_extent(&extent).unwrap();
        assert_eq!(crs.epsg(), 32721);
    }

    #[test]
    fn utm_estimate_rejects_projected_extent() {
        let extent = Rect::new(
            coord! { x: 480_000.0, y: 3_600_000.0 },
            coord! { x: 500_000.0, y: 3_650_000.0 },
        );
        assert!(Crs::utm_for_extent(&extent).is_err());
    }
}
