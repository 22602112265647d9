//! Interpolation of attributes between polygon supports

mod areal;

pub use areal::area_interpolate;
