//! Attribute cleaning.
//!
//! Two preparation steps run between acquisition and the snapshot:
//! median imputation of missing numeric values, and rescaling of the
//! median home value into integer thousands of dollars.

use geotract_core::{AttributeValue, Error, GeoTable, Result};
use tracing::debug;

/// Fill missing numeric cells with the column median.
///
/// Only columns whose present values are all numeric participate;
/// text and boolean columns pass through untouched, as do columns with
/// no observed values at all. Present values are never altered.
pub fn impute_median(table: &mut GeoTable) -> Result<()> {
    for name in table.column_names() {
        let mut values = Vec::new();
        let mut non_numeric = false;
        for feature in table.iter() {
            match feature.get_property(&name) {
                Some(AttributeValue::Int(v)) => values.push(*v as f64),
                Some(AttributeValue::Float(v)) if v.is_finite() => values.push(*v),
                Some(AttributeValue::Float(_)) | Some(AttributeValue::Null) | None => {}
                Some(_) => {
                    non_numeric = true;
                    break;
                }
            }
        }
        if non_numeric {
            debug!(column = %name, "skipping non-numeric column");
            continue;
        }
        if values.is_empty() {
            debug!(column = %name, "skipping column with no observed values");
            continue;
        }
        let fill = median(&mut values);
        for feature in table.features.iter_mut() {
            let missing = match feature.get_property(&name) {
                None | Some(AttributeValue::Null) => true,
                Some(AttributeValue::Float(v)) => !v.is_finite(),
                Some(_) => false,
            };
            if missing {
                feature.set_property(name.clone(), AttributeValue::Float(fill));
            }
        }
    }
    Ok(())
}

fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Rescale a dollar-valued column into integer thousands.
///
/// Values are divided by 1000 and truncated toward zero. Cells that are
/// still missing after imputation stay missing.
pub fn rescale_to_thousands(table: &mut GeoTable, column: &str) -> Result<()> {
    if !table.has_column(column) {
        return Err(Error::MissingColumn(column.to_string()));
    }
    for feature in table.features.iter_mut() {
        let scaled = match feature.get_property(column) {
            Some(AttributeValue::Int(v)) => Some(*v as f64 / 1000.0),
            Some(AttributeValue::Float(v)) if v.is_finite() => Some(*v / 1000.0),
            _ => None,
        };
        if let Some(v) = scaled {
            feature.set_property(column.to_string(), AttributeValue::Int(v.trunc() as i64));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotract_core::{Crs, Feature};

    fn table_with(values: &[AttributeValue]) -> GeoTable {
        let mut table = GeoTable::new(Crs::wgs84());
        for v in values {
            let mut f = Feature::empty();
            f.set_property("x", v.clone());
            table.push(f);
        }
        table
    }

    #[test]
    fn imputation_fills_missing_and_preserves_present() {
        let mut table = table_with(&[
            AttributeValue::Float(10.0),
            AttributeValue::Null,
            AttributeValue::Float(30.0),
        ]);
        impute_median(&mut table).unwrap();
        let values = table.numeric_column("x").unwrap();
        assert_eq!(values, vec![Some(10.0), Some(20.0), Some(30.0)]);
    }

    #[test]
    fn even_count_takes_midpoint() {
        let mut table = table_with(&[
            AttributeValue::Float(10.0),
            AttributeValue::Float(20.0),
            AttributeValue::Float(40.0),
            AttributeValue::Float(80.0),
            AttributeValue::Null,
        ]);
        impute_median(&mut table).unwrap();
        assert_eq!(table.numeric_column("x").unwrap()[4], Some(30.0));
    }

    #[test]
    fn text_columns_pass_through() {
        let mut table = table_with(&[
            AttributeValue::String("a".into()),
            AttributeValue::Null,
        ]);
        impute_median(&mut table).unwrap();
        assert!(table.features[1].get_property("x").unwrap().is_null());
    }

    #[test]
    fn all_missing_column_is_left_alone() {
        let mut table = table_with(&[AttributeValue::Null, AttributeValue::Null]);
        impute_median(&mut table).unwrap();
        assert!(table.features[0].get_property("x").unwrap().is_null());
    }

    #[test]
    fn rescale_truncates_toward_zero() {
        let mut table = table_with(&[
            AttributeValue::Float(250_000.0),
            AttributeValue::Float(1_999.0),
            AttributeValue::Float(-1_500.0),
            AttributeValue::Null,
        ]);
        rescale_to_thousands(&mut table, "x").unwrap();
        assert_eq!(
            table.features[0].get_property("x"),
            Some(&AttributeValue::Int(250))
        );
        assert_eq!(
            table.features[1].get_property("x"),
            Some(&AttributeValue::Int(1))
        );
        assert_eq!(
            table.features[2].get_property("x"),
            Some(&AttributeValue::Int(-1))
        );
        assert!(table.features[3].get_property("x").unwrap().is_null());
    }

    #[test]
    fn rescale_missing_column_is_an_error() {
        let mut table = table_with(&[AttributeValue::Float(1.0)]);
        assert!(matches!(
            rescale_to_thousands(&mut table, "absent"),
            Err(Error::MissingColumn(_))
        ));
    }
}
