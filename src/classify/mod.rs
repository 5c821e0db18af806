//! Heuristic line classification.
//!
//! Everything here is a pure function of its inputs: text rules take
//! strings, geometry rules take boxes, and the heading and title rules take
//! already-cleaned lines. None of it touches a PDF.

pub mod font;
pub mod geometry;
pub mod heading;
pub mod normalize;
pub mod title;

pub use geometry::{is_centered, CenteringRules};
pub use heading::{FallbackRule, HeadingClassifier, HeadingProfile, HeadingRules, TextCase, Weight};
pub use normalize::{NormalizerRules, SpecialCase, TextNormalizer};
pub use title::{TitleDetector, TitleRules};
