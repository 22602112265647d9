//! # GeoTract Data
//!
//! Dataset acquisition and preparation:
//! - census tract tables from a GeoJSON provider or local file
//! - road networks from zipped shapefiles
//! - median imputation and home-value rescaling
//! - Parquet snapshot storage

pub mod acquire;
pub mod clean;
pub mod roads;
pub mod snapshot;

pub use acquire::{fetch_tracts, filter_year, read_tracts_geojson};
pub use clean::{impute_median, rescale_to_thousands};
pub use roads::read_roads_zip;
pub use snapshot::{read_snapshot, write_snapshot, DEFAULT_SNAPSHOT_PATH};
