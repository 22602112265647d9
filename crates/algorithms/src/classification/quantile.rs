//! Class breaks for choropleth maps.
//!
//! Default scheme: quantiles with five classes, so each class holds
//! roughly the same number of observations.

use geotract_core::{Error, Result};

/// Classification scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Equal-count classes (default)
    Quantiles,
    /// Equal-width classes over the data range
    EqualInterval,
}

/// Parameters for choropleth classification
#[derive(Debug, Clone, Copy)]
pub struct ClassifyParams {
    pub scheme: Scheme,
    /// Number of classes (default: 5)
    pub k: usize,
}

impl Default for ClassifyParams {
    fn default() -> Self {
        Self {
            scheme: Scheme::Quantiles,
            k: 5,
        }
    }
}

/// Compute the `k - 1` upper break values separating `k` classes.
///
/// Non-finite observations are ignored. Errors when fewer than one
/// finite observation remains or `k < 2`.
pub fn class_breaks(values: &[f64], params: &ClassifyParams) -> Result<Vec<f64>> {
    if params.k < 2 {
        return Err(Error::InvalidParameter {
            name: "k",
            value: params.k.to_string(),
            reason: "need at least 2 classes".to_string(),
        });
    }
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Err(Error::EmptyResult(
            "no finite values to classify".to_string(),
        ));
    }
    finite.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let breaks = match params.scheme {
        Scheme::Quantiles => (1..params.k)
            .map(|i| quantile(&finite, i as f64 / params.k as f64))
            .collect(),
        Scheme::EqualInterval => {
            let min = finite[0];
            let max = finite[finite.len() - 1];
            let step = (max - min) / params.k as f64;
            (1..params.k).map(|i| min + step * i as f64).collect()
        }
    };
    Ok(breaks)
}

/// Class index in `0..k` for a value given the break list.
pub fn classify(value: f64, breaks: &[f64]) -> usize {
    breaks.iter().filter(|b| value > **b).count()
}

/// Linear-interpolation quantile of sorted data at fraction `q`.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let frac = pos - lower as f64;
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}
