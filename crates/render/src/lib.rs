//! # GeoTract Render
//!
//! Map output for tract tables: static PNG choropleths, multi-panel
//! comparisons, and interactive Leaflet HTML.

pub mod canvas;
pub mod choropleth;
pub mod explore;
pub mod palette;
pub mod panel;

pub use canvas::Canvas;
pub use choropleth::{choropleth, MapStyle};
pub use explore::explore;
pub use palette::{ColorStop, Palette, Rgb};
pub use panel::choropleth_panel;
