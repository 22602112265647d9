//! Compositional shares: subgroup counts divided by the total count.
//!
//! Defined only where the total is positive; a zero total is signalled
//! as `Error::UndefinedRatio` instead of dividing through to NaN.

use geotract_core::{Error, GeoTable, Result};
use std::collections::HashMap;

/// Shares for one table row, keyed by variable name. Values lie in
/// [0, 1] for non-negative inputs; mutually exclusive subgroups need not
/// cover the whole total, so their shares may sum below 1.
#[derive(Debug, Clone)]
pub struct CompositionRow {
    pub shares: HashMap<String, f64>,
}

/// Per-row composition: each subgroup divided by that row's total.
pub fn composition(
    table: &GeoTable,
    total: &str,
    subgroups: &[String],
) -> Result<Vec<CompositionRow>> {
    let totals = table.numeric_column(total)?;
    let columns: Vec<Vec<Option<f64>>> = subgroups
        .iter()
        .map(|v| table.numeric_column(v))
        .collect::<Result<_>>()?;

    let mut rows = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let denom = totals[row].unwrap_or(0.0);
        if denom <= 0.0 {
            return Err(Error::UndefinedRatio {
                context: format!("row {row}"),
            });
        }
        let mut shares = HashMap::new();
        for (v, name) in subgroups.iter().enumerate() {
            shares.insert(name.clone(), columns[v][row].unwrap_or(0.0) / denom);
        }
        rows.push(CompositionRow { shares });
    }
    Ok(rows)
}

/// Whole-table composition: column sums divided by the total's sum.
pub fn aggregate_composition(
    table: &GeoTable,
    total: &str,
    subgroups: &[String],
) -> Result<HashMap<String, f64>> {
    let denom: f64 = table.numeric_column(total)?.iter().flatten().sum();
    if denom <= 0.0 {
        return Err(Error::UndefinedRatio {
            context: "aggregate".to_string(),
        });
    }

    let mut shares = HashMap::new();
    for name in subgroups {
        let sum: f64 = table.numeric_column(name)?.iter().flatten().sum();
        shares.insert(name.clone(), sum / denom);
    }
    Ok(shares)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotract_core::{AttributeValue, Crs, Feature};

    fn estimates(rows: &[(f64, f64, f64)]) -> GeoTable {
        let mut table = GeoTable::new(Crs::from_epsg(32611));
        for &(total, a, b) in rows {
            let mut f = Feature::empty();
            f.set_property("n_total_pop", AttributeValue::Float(total));
            f.set_property("n_group_a", AttributeValue::Float(a));
            f.set_property("n_group_b", AttributeValue::Float(b));
            table.push(f);
        }
        table
    }

    fn subgroups() -> Vec<String> {
        vec!["n_group_a".to_string(), "n_group_b".to_string()]
    }

    #[test]
    fn shares_bounded_and_subadditive() {
        let table = estimates(&[(300.0, 80.0, 220.0), (100.0, 25.0, 40.0)]);
        let rows = composition(&table, "n_total_pop", &subgroups()).unwrap();

        for row in &rows {
            let mut sum = 0.0;
            for share in row.shares.values() {
                assert!((0.0..=1.0).contains(share), "share {share} out of bounds");
                sum += share;
            }
            assert!(sum <= 1.0 + 1e-12, "exclusive subgroups sum to {sum} > 1");
        }
        assert!((rows[0].shares["n_group_a"] - 80.0 / 300.0).abs() < 1e-12);
    }

    #[test]
    fn zero_total_is_signalled() {
        let table = estimates(&[(0.0, 0.0, 0.0)]);
        assert!(matches!(
            composition(&table, "n_total_pop", &subgroups()),
            Err(Error::UndefinedRatio { .. })
        ));
    }

    #[test]
    fn aggregate_uses_column_sums() {
        let table = estimates(&[(100.0, 30.0, 70.0), (200.0, 50.0, 150.0)]);
        let shares = aggregate_composition(&table, "n_total_pop", &subgroups()).unwrap();
        assert!((shares["n_group_a"] - 80.0 / 300.0).abs() < 1e-12);
        assert!((shares["n_group_b"] - 220.0 / 300.0).abs() < 1e-12);
    }

    #[test]
    fn aggregate_zero_total_is_signalled() {
        let table = estimates(&[(0.0, 0.0, 0.0), (0.0, 0.0, 0.0)]);
        assert!(aggregate_composition(&table, "n_total_pop", &subgroups()).is_err());
    }
}
