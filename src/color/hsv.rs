//! Range-based classification in HSV space.
//!
//! Low-saturation bright samples are white; everything else is tested
//! against per-color hue/saturation/value windows in priority order.

use super::{ColorClassifier, ReferenceColor, Rgb};
use serde::{Deserialize, Serialize};

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Range {
    /// Creates an interval.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if `value` lies inside the interval.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Rule for the achromatic white class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WhiteRule {
    /// Maximum saturation.
    pub s_max: f64,
    /// Minimum value.
    pub v_min: f64,
}

/// Windows for one chromatic color.
///
/// `hue` is a disjunction so a window can wrap around 0/360.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRule {
    /// Color this rule classifies to.
    pub color: ReferenceColor,
    /// Accepted hue sub-ranges in degrees.
    pub hue: Vec<Range>,
    /// Accepted saturation.
    pub saturation: Range,
    /// Accepted value.
    pub value: Range,
}

impl ColorRule {
    fn matches(&self, h: f64, s: f64, v: f64) -> bool {
        self.hue.iter().any(|r| r.contains(h))
            && self.saturation.contains(s)
            && self.value.contains(v)
    }
}

/// Full HSV rule table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HsvRules {
    /// White is tested first.
    pub white: WhiteRule,
    /// Remaining colors, in priority order.
    pub colors: Vec<ColorRule>,
}

impl Default for HsvRules {
    fn default() -> Self {
        let saturation = Range::new(0.4, 1.0);
        let value = Range::new(0.25, 1.0);
        let rule = |color, hue: Vec<Range>| ColorRule {
            color,
            hue,
            saturation,
            value,
        };

        Self {
            white: WhiteRule {
                s_max: 0.25,
                v_min: 0.6,
            },
            colors: vec![
                rule(
                    ReferenceColor::Red,
                    vec![Range::new(0.0, 12.0), Range::new(335.0, 360.0)],
                ),
                rule(ReferenceColor::Orange, vec![Range::new(12.0, 38.0)]),
                rule(ReferenceColor::Yellow, vec![Range::new(38.0, 75.0)]),
                rule(ReferenceColor::Green, vec![Range::new(75.0, 170.0)]),
                rule(ReferenceColor::Blue, vec![Range::new(170.0, 265.0)]),
            ],
        }
    }
}

/// HSV-range classifier. May return `None` under ambiguous lighting.
#[derive(Debug, Clone, Default)]
pub struct HsvClassifier {
    rules: HsvRules,
}

impl HsvClassifier {
    /// Creates a classifier with the given rule table.
    pub fn new(rules: HsvRules) -> Self {
        Self { rules }
    }

    /// Returns the active rule table.
    pub fn rules(&self) -> &HsvRules {
        &self.rules
    }
}

impl ColorClassifier for HsvClassifier {
    fn classify(&self, sample: &Rgb) -> Option<ReferenceColor> {
        let hsv = sample.to_hsv();

        if hsv.s <= self.rules.white.s_max && hsv.v >= self.rules.white.v_min {
            return Some(ReferenceColor::White);
        }

        self.rules
            .colors
            .iter()
            .find(|rule| rule.matches(hsv.h, hsv.s, hsv.v))
            .map(|rule| rule.color)
    }
}
