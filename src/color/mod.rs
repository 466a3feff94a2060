//! Sticker color classification.
//!
//! A sampled average color is mapped to one of the six reference colors.
//! Two strategies share the [`ColorClassifier`] interface: nearest-centroid
//! (always answers) and HSV ranges (may decline). A `None` result means
//! "unclassified" and is never an error.

mod hsv;
mod nearest;
mod reference;

pub use hsv::{ColorRule, HsvClassifier, HsvRules, Range, WhiteRule};
pub use nearest::NearestCentroid;
pub use reference::{Hsv, ReferenceColor, Rgb};

use serde::{Deserialize, Serialize};

/// Maps a sampled color to a reference color.
pub trait ColorClassifier {
    /// Classifies one sample; `None` means unclassified.
    fn classify(&self, sample: &Rgb) -> Option<ReferenceColor>;
}

/// Selectable classification strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierKind {
    /// Nearest reference RGB triple.
    #[default]
    Nearest,
    /// HSV range table.
    Hsv,
}

impl ClassifierKind {
    /// Builds the classifier for this strategy.
    pub fn build(self, rules: &HsvRules) -> Box<dyn ColorClassifier + Send> {
        match self {
            ClassifierKind::Nearest => Box::new(NearestCentroid::new()),
            ClassifierKind::Hsv => Box::new(HsvClassifier::new(rules.clone())),
        }
    }
}

impl std::str::FromStr for ClassifierKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(ClassifierKind::Nearest),
            "hsv" => Ok(ClassifierKind::Hsv),
            other => Err(format!("unknown classifier '{}' (expected nearest or hsv)", other)),
        }
    }
}
