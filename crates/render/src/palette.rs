//! Color palettes and multi-stop interpolation engine.

/// RGB color with channel values in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS hex form, e.g. `#440154`.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A color stop: position in [0, 1] mapped to an RGB color.
#[derive(Debug, Clone, Copy)]
pub struct ColorStop {
    pub t: f64,
    pub color: Rgb,
}

impl ColorStop {
    pub const fn new(t: f64, r: u8, g: u8, b: u8) -> Self {
        Self {
            t,
            color: Rgb::new(r, g, b),
        }
    }
}

/// Available palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Palette {
    /// Purple -> teal -> yellow, the default for demographic counts
    Viridis,
    /// Yellow -> orange -> red, for intensities and shares
    YlOrRd,
    /// Light -> dark blue
    Blues,
    /// White -> black
    Greys,
}

impl Palette {
    pub const ALL: &[Palette] = &[Self::Viridis, Self::YlOrRd, Self::Blues, Self::Greys];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Viridis => "viridis",
            Self::YlOrRd => "YlOrRd",
            Self::Blues => "Blues",
            Self::Greys => "Greys",
        }
    }

    fn stops(&self) -> &'static [ColorStop] {
        match self {
            Self::Viridis => VIRIDIS_STOPS,
            Self::YlOrRd => YLORRD_STOPS,
            Self::Blues => BLUES_STOPS,
            Self::Greys => GREYS_STOPS,
        }
    }

    /// Evaluate the palette at normalized position `t` in [0, 1].
    pub fn evaluate(&self, t: f64) -> Rgb {
        multi_stop(self.stops(), t)
    }

    /// Color of class `class` out of `k` classes, darkest-to-lightest
    /// order following the stop definitions.
    pub fn class_color(&self, class: usize, k: usize) -> Rgb {
        if k <= 1 {
            return self.evaluate(0.5);
        }
        self.evaluate(class.min(k - 1) as f64 / (k - 1) as f64)
    }
}

const VIRIDIS_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 68, 1, 84),
    ColorStop::new(0.25, 59, 82, 139),
    ColorStop::new(0.50, 33, 145, 140),
    ColorStop::new(0.75, 94, 201, 98),
    ColorStop::new(1.00, 253, 231, 37),
];

const YLORRD_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 255, 255, 178),
    ColorStop::new(0.25, 254, 217, 118),
    ColorStop::new(0.50, 253, 141, 60),
    ColorStop::new(0.75, 240, 59, 32),
    ColorStop::new(1.00, 189, 0, 38),
];

const BLUES_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 247, 251, 255),
    ColorStop::new(0.25, 198, 219, 239),
    ColorStop::new(0.50, 107, 174, 214),
    ColorStop::new(0.75, 33, 113, 181),
    ColorStop::new(1.00, 8, 48, 107),
];

const GREYS_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 255, 255, 255),
    ColorStop::new(0.25, 204, 204, 204),
    ColorStop::new(0.50, 150, 150, 150),
    ColorStop::new(0.75, 82, 82, 82),
    ColorStop::new(1.00, 0, 0, 0),
];

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_color(c1: Rgb, c2: Rgb, t: f64) -> Rgb {
    Rgb::new(
        lerp(c1.r as f64, c2.r as f64, t).round() as u8,
        lerp(c1.g as f64, c2.g as f64, t).round() as u8,
        lerp(c1.b as f64, c2.b as f64, t).round() as u8,
    )
}

fn multi_stop(stops: &[ColorStop], t: f64) -> Rgb {
    if t <= 0.0 {
        return stops[0].color;
    }
    if t >= 1.0 {
        return stops[stops.len() - 1].color;
    }
    for i in 1..stops.len() {
        if t <= stops[i].t {
            let ratio = (t - stops[i - 1].t) / (stops[i].t - stops[i - 1].t);
            return lerp_color(stops[i - 1].color, stops[i].color, ratio);
        }
    }
    stops[stops.len() - 1].color
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viridis_endpoints() {
        assert_eq!(Palette::Viridis.evaluate(0.0), Rgb::new(68, 1, 84));
        assert_eq!(Palette::Viridis.evaluate(1.0), Rgb::new(253, 231, 37));
    }

    #[test]
    fn clamps_outside_unit_interval() {
        assert_eq!(Palette::Blues.evaluate(-0.5), Rgb::new(247, 251, 255));
        assert_eq!(Palette::Blues.evaluate(1.5), Rgb::new(8, 48, 107));
    }

    #[test]
    fn five_classes_span_the_ramp() {
        let first = Palette::Viridis.class_color(0, 5);
        let last = Palette::Viridis.class_color(4, 5);
        assert_eq!(first, Rgb::new(68, 1, 84));
        assert_eq!(last, Rgb::new(253, 231, 37));
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(Rgb::new(68, 1, 84).hex(), "#440154");
        assert_eq!(Rgb::new(255, 255, 255).hex(), "#ffffff");
    }

    #[test]
    fn all_palettes_evaluate_midpoint() {
        for &palette in Palette::ALL {
            let _ = palette.evaluate(0.5);
        }
    }
}
