//! Choropleth classification

mod quantile;

pub use quantile::{class_breaks, classify, ClassifyParams, Scheme};
