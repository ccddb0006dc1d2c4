//! Display colours used by the map.

use std::fmt;

/// Simple RGB colour, formatted as CSS `rgb(r, g, b)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Fill for every country when the dataset has no usable (positive) value.
pub const NEUTRAL_GRAY: Rgb = Rgb::new(128, 128, 128);

/// Fill and stroke of the hovered country.
pub const HIGHLIGHT: Rgb = Rgb::new(255, 0, 0);

/// Stroke of every country that is not hovered.
pub const BORDER: Rgb = Rgb::new(0, 0, 0);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Light-to-dark blue ramp. `intensity` is clamped to [0, 1]; NaN
    /// counts as 0.
    ///
    /// Every channel is non-increasing in `intensity`, so a larger value is
    /// never rendered lighter than a smaller one.
    pub fn heat(intensity: f64) -> Self {
        let t = if intensity.is_nan() { 0.0 } else { intensity.clamp(0.0, 1.0) };
        let blue = (t * 255.0).floor() as u8;
        Self {
            r: 200u8.saturating_sub(blue),
            g: 225u8.saturating_sub(blue),
            b: 255u8.saturating_sub(blue),
        }
    }

    /// Sum of the channels; lower is darker.
    pub fn luminance_sum(&self) -> u16 {
        self.r as u16 + self.g as u16 + self.b as u16
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}
