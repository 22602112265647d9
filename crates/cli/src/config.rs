//! Analysis configuration.
//!
//! Every setting has a working default for the San Diego county
//! workshop dataset; a JSON config file overrides the defaults, and
//! command-line flags override both.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// County FIPS code
    pub county_fips: String,
    /// Census year to keep
    pub year: i64,
    /// Zipped road-network shapefile
    pub roads_path: PathBuf,
    /// Prepared-dataset snapshot
    pub snapshot_path: PathBuf,
    /// Corridor half-width in meters (1000 ft)
    pub buffer_distance: f64,
    /// Vertices per buffer end cap
    pub segments: usize,
    /// Choropleth class count
    pub classes: usize,
    /// Dollar column rescaled to integer thousands during preparation
    pub home_value_variable: String,
    /// Total-population column
    pub total_variable: String,
    /// Additive subgroup columns interpolated onto the corridor
    pub subgroup_variables: Vec<String>,
    /// Share columns shown in the map panel
    pub share_variables: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            county_fips: "06073".to_string(),
            year: 2010,
            roads_path: PathBuf::from("./data/tl_2015_06_prisecroads.zip"),
            snapshot_path: PathBuf::from("data/sdgdf.parquet"),
            buffer_distance: 304.8,
            segments: 16,
            classes: 5,
            home_value_variable: "median_home_value".to_string(),
            total_variable: "n_total_pop".to_string(),
            subgroup_variables: vec![
                "n_nonhisp_white_persons".to_string(),
                "n_hispanic_persons".to_string(),
                "n_nonhisp_black_persons".to_string(),
            ],
            share_variables: vec![
                "p_nonhisp_white_persons".to_string(),
                "p_hispanic_persons".to_string(),
                "p_nonhisp_black_persons".to_string(),
            ],
        }
    }
}

impl AnalysisConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Config from an optional file path, falling back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    /// Total plus subgroups: everything interpolated onto targets.
    pub fn extensive_variables(&self) -> Vec<String> {
        let mut vars = vec![self.total_variable.clone()];
        vars.extend(self.subgroup_variables.iter().cloned());
        vars
    }
}
