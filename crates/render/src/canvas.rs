//! World-to-pixel mapping for static map output.

use geo::Rect;

/// Uniform-scale mapping from a world extent onto a pixel area, with a
/// margin and centering on the shorter axis. Pixel y grows downward.
#[derive(Debug, Clone)]
pub struct Canvas {
    extent: Rect<f64>,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Canvas {
    pub fn fit(extent: Rect<f64>, width: u32, height: u32, margin: u32) -> Self {
        let inner_w = width.saturating_sub(2 * margin).max(1) as f64;
        let inner_h = height.saturating_sub(2 * margin).max(1) as f64;

        let sx = inner_w / extent.width();
        let sy = inner_h / extent.height();
        let mut scale = sx.min(sy);
        // Degenerate extents (a single point, or a vertical/horizontal
        // sliver) still need a usable mapping
        if !scale.is_finite() || scale <= 0.0 {
            scale = 1.0;
        }

        let offset_x = margin as f64 + (inner_w - extent.width() * scale) / 2.0;
        let offset_y = margin as f64 + (inner_h - extent.height() * scale) / 2.0;
        Self {
            extent,
            scale,
            offset_x,
            offset_y,
        }
    }

    pub fn to_pixel(&self, x: f64, y: f64) -> (i32, i32) {
        let px = self.offset_x + (x - self.extent.min().x) * self.scale;
        let py = self.offset_y + (self.extent.max().y - y) * self.scale;
        (px.round() as i32, py.round() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    #[test]
    fn corners_map_inside_margin() {
        let extent = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 10.0 });
        let canvas = Canvas::fit(extent, 120, 120, 10);

        assert_eq!(canvas.to_pixel(0.0, 10.0), (10, 10));
        assert_eq!(canvas.to_pixel(10.0, 0.0), (110, 110));
    }

    #[test]
    fn y_axis_is_flipped() {
        let extent = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 10.0 });
        let canvas = Canvas::fit(extent, 100, 100, 0);

        let (_, top) = canvas.to_pixel(5.0, 10.0);
        let (_, bottom) = canvas.to_pixel(5.0, 0.0);
        assert!(top < bottom);
    }

    #[test]
    fn wide_extent_centers_vertically() {
        let extent = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 20.0, y: 10.0 });
        let canvas = Canvas::fit(extent, 200, 200, 0);

        let (_, y_mid) = canvas.to_pixel(10.0, 5.0);
        assert_eq!(y_mid, 100);
    }

    #[test]
    fn degenerate_extent_does_not_blow_up() {
        let extent = Rect::new(coord! { x: 5.0, y: 5.0 }, coord! { x: 5.0, y: 5.0 });
        let canvas = Canvas::fit(extent, 100, 100, 10);
        let (x, y) = canvas.to_pixel(5.0, 5.0);
        assert!((0..100).contains(&x));
        assert!((0..100).contains(&y));
    }
}
