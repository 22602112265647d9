//! Attribute tables with geometry.
//!
//! `GeoTable` is the tabular currency of the toolkit: one `Feature` per
//! row, each carrying an optional geometry and a bag of typed attributes.
//! Pipeline stages take tables as arguments and produce new tables; no
//! stage mutates shared state.

use crate::crs::Crs;
use crate::error::{Error, Result};
use geo::{BoundingRect, Geometry, LineString, MultiLineString, MultiPolygon, Rect};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Attribute value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl AttributeValue {
    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Int(v) => Some(*v as f64),
            AttributeValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }
}

/// A row: geometry plus attributes
#[derive(Debug, Clone)]
pub struct Feature {
    /// Feature geometry
    pub geometry: Option<Geometry<f64>>,
    /// Feature attributes
    pub properties: HashMap<String, AttributeValue>,
    /// Optional feature ID
    pub id: Option<String>,
}

impl Feature {
    /// Create a new feature with geometry
    pub fn new(geometry: Geometry<f64>) -> Self {
        Self {
            geometry: Some(geometry),
            properties: HashMap::new(),
            id: None,
        }
    }

    /// Create a feature with no geometry
    pub fn empty() -> Self {
        Self {
            geometry: None,
            properties: HashMap::new(),
            id: None,
        }
    }

    /// Set an attribute
    pub fn set_property(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.properties.insert(key.into(), value);
    }

    /// Get an attribute
    pub fn get_property(&self, key: &str) -> Option<&AttributeValue> {
        self.properties.get(key)
    }
}

/// A collection of features sharing one CRS
#[derive(Debug, Clone)]
pub struct GeoTable {
    pub features: Vec<Feature>,
    pub crs: Crs,
}

impl GeoTable {
    pub fn new(crs: Crs) -> Self {
        Self {
            features: Vec::new(),
            crs,
        }
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// All attribute names present in any row, sorted
    pub fn column_names(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        for feature in &self.features {
            for key in feature.properties.keys() {
                names.insert(key.clone());
            }
        }
        names.into_iter().collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.features
            .iter()
            .any(|f| f.properties.contains_key(name))
    }

    /// Numeric view of a column, one entry per row.
    ///
    /// Null, absent, or non-numeric cells come back as `None`. A column
    /// that no row carries at all is a fatal `MissingColumn` error.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        if !self.has_column(name) {
            return Err(Error::MissingColumn(name.to_string()));
        }
        Ok(self
            .features
            .iter()
            .map(|f| f.get_property(name).and_then(AttributeValue::as_f64))
            .collect())
    }

    /// All row geometries coerced to polygons.
    ///
    /// Missing or non-areal geometry is a fatal `InvalidGeometry` error;
    /// tract tables guarantee non-null polygon geometry per row.
    pub fn polygons(&self) -> Result<Vec<MultiPolygon<f64>>> {
        self.features
            .iter()
            .enumerate()
            .map(|(i, f)| match &f.geometry {
                Some(Geometry::Polygon(p)) => Ok(MultiPolygon::new(vec![p.clone()])),
                Some(Geometry::MultiPolygon(mp)) => Ok(mp.clone()),
                Some(other) => Err(Error::InvalidGeometry(format!(
                    "row {i}: expected polygon, got {other:?}"
                ))),
                None => Err(Error::InvalidGeometry(format!("row {i}: null geometry"))),
            })
            .collect()
    }

    /// All row geometries coerced to line strings, flattened.
    pub fn lines(&self) -> Result<MultiLineString<f64>> {
        let mut lines: Vec<LineString<f64>> = Vec::new();
        for (i, f) in self.features.iter().enumerate() {
            match &f.geometry {
                Some(Geometry::LineString(ls)) => lines.push(ls.clone()),
                Some(Geometry::MultiLineString(mls)) => lines.extend(mls.0.iter().cloned()),
                Some(other) => {
                    return Err(Error::InvalidGeometry(format!(
                        "row {i}: expected line, got {other:?}"
                    )))
                }
                None => return Err(Error::InvalidGeometry(format!("row {i}: null geometry"))),
            }
        }
        Ok(MultiLineString::new(lines))
    }

    /// Axis-aligned bounds over all geometries
    pub fn bounds(&self) -> Result<Rect<f64>> {
        let mut acc: Option<Rect<f64>> = None;
        for feature in &self.features {
            let Some(geom) = &feature.geometry else {
                continue;
            };
            let Some(rect) = geom.bounding_rect() else {
                continue;
            };
            acc = Some(match acc {
                None => rect,
                Some(prev) => Rect::new(
                    geo::coord! {
                        x: prev.min().x.min(rect.min().x),
                        y: prev.min().y.min(rect.min().y),
                    },
                    geo::coord! {
                        x: prev.max().x.max(rect.max().x),
                        y: prev.max().y.max(rect.max().y),
                    },
                ),
            });
        }
        acc.ok_or_else(|| Error::EmptyResult("table has no geometry".to_string()))
    }
}
