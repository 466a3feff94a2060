//! Reference sticker colors and sampled color spaces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six sticker colors of a standard cube.
///
/// Ordered only by definition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceColor {
    /// White.
    White = 0,
    /// Yellow.
    Yellow = 1,
    /// Green.
    Green = 2,
    /// Blue.
    Blue = 3,
    /// Orange.
    Orange = 4,
    /// Red.
    Red = 5,
}

impl ReferenceColor {
    /// All colors in definition order.
    pub const ALL: [ReferenceColor; 6] = [
        ReferenceColor::White,
        ReferenceColor::Yellow,
        ReferenceColor::Green,
        ReferenceColor::Blue,
        ReferenceColor::Orange,
        ReferenceColor::Red,
    ];

    /// Array index of this color.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical RGB triple used as the nearest-centroid reference.
    pub fn reference_rgb(self) -> Rgb {
        match self {
            ReferenceColor::White => Rgb::new(255.0, 255.0, 255.0),
            ReferenceColor::Yellow => Rgb::new(255.0, 213.0, 0.0),
            ReferenceColor::Green => Rgb::new(0.0, 155.0, 72.0),
            ReferenceColor::Blue => Rgb::new(0.0, 70.0, 173.0),
            ReferenceColor::Orange => Rgb::new(255.0, 88.0, 0.0),
            ReferenceColor::Red => Rgb::new(196.0, 30.0, 58.0),
        }
    }

    /// Color on the opposite face of a standard cube.
    pub fn opposite(self) -> Self {
        match self {
            ReferenceColor::White => ReferenceColor::Yellow,
            ReferenceColor::Yellow => ReferenceColor::White,
            ReferenceColor::Green => ReferenceColor::Blue,
            ReferenceColor::Blue => ReferenceColor::Green,
            ReferenceColor::Orange => ReferenceColor::Red,
            ReferenceColor::Red => ReferenceColor::Orange,
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            ReferenceColor::White => "White",
            ReferenceColor::Yellow => "Yellow",
            ReferenceColor::Green => "Green",
            ReferenceColor::Blue => "Blue",
            ReferenceColor::Orange => "Orange",
            ReferenceColor::Red => "Red",
        }
    }
}

impl fmt::Display for ReferenceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An averaged color sample, channels in `[0, 255]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
}

impl Rgb {
    /// Creates a sample from channel values.
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Euclidean distance in RGB space.
    pub fn distance(&self, other: &Rgb) -> f64 {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// Converts to hue (degrees, `[0, 360)`), saturation and value (`[0, 1]`).
    pub fn to_hsv(&self) -> Hsv {
        let r = (self.r / 255.0).clamp(0.0, 1.0);
        let g = (self.g / 255.0).clamp(0.0, 1.0);
        let b = (self.b / 255.0).clamp(0.0, 1.0);

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        let h = if h < 0.0 { h + 360.0 } else { h };
        let s = if max == 0.0 { 0.0 } else { delta / max };

        Hsv { h, s, v: max }
    }
}

/// Hue/saturation/value triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    /// Hue in degrees.
    pub h: f64,
    /// Saturation.
    pub s: f64,
    /// Value.
    pub v: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposites_are_involutive() {
        for color in ReferenceColor::ALL {
            assert_ne!(color.opposite(), color);
            assert_eq!(color.opposite().opposite(), color);
        }
    }

    #[test]
    fn test_hsv_primaries() {
        let red = Rgb::new(255.0, 0.0, 0.0).to_hsv();
        assert!(red.h.abs() < 1e-9);
        assert!((red.s - 1.0).abs() < 1e-9);

        let blue = Rgb::new(0.0, 0.0, 255.0).to_hsv();
        assert!((blue.h - 240.0).abs() < 1e-9);

        let gray = Rgb::new(128.0, 128.0, 128.0).to_hsv();
        assert_eq!(gray.s, 0.0);
    }

    #[test]
    fn test_hsv_wraps_negative_hue() {
        // Red with a blue tint lands just below 360.
        let hsv = ReferenceColor::Red.reference_rgb().to_hsv();
        assert!(hsv.h > 340.0 && hsv.h < 360.0);
    }
}
