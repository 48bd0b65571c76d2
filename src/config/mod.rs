//! Effect configuration parsing.
//!
//! Parses configuration strings like `width=800&aspect_ratio=16:9&strategy=native`
//! into an [`EffectConfig`] that can be resolved against any image size.
//! Parsing never fails: problems are reported as [`ParseWarning`]s and the
//! offending key is left unspecified.
//!
//! # Example
//!
//! ```
//! use zencrop::config;
//!
//! let result = config::parse("width=400&aspect_ratio=4:3");
//! assert!(result.warnings.is_empty());
//!
//! let crop = result.config.resolve(1920, 1080).expect("feasible");
//! assert_eq!((crop.x, crop.y, crop.width, crop.height), (760, 390, 400, 300));
//! ```
//!
//! # Empty values
//!
//! `min_width=` (empty) means "not specified", while `min_width=0` is an
//! explicit zero. Zero is rejected for keys that must be positive.

mod parse;

use alloc::string::String;
use alloc::vec::Vec;

use crate::crop::{CropBox, CropError, Gravity, OriginalImage, SizeConstraints};
use crate::strategy::{CropStrategy, Strategy};

/// Everything needed to compute a crop box once the image size is known.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectConfig {
    pub constraints: SizeConstraints,
    pub strategy: Strategy,
    pub gravity: Gravity,
}

impl EffectConfig {
    /// Run the configured strategy for an image of the given size.
    pub fn resolve(&self, image_width: u32, image_height: u32) -> Result<CropBox, CropError> {
        self.strategy.resolve(
            OriginalImage::new(image_width, image_height),
            &self.constraints,
            self.gravity,
        )
    }
}

/// Result of parsing a configuration string.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed configuration.
    pub config: EffectConfig,
    /// Non-fatal parse warnings.
    pub warnings: Vec<ParseWarning>,
}

/// Non-fatal warning from configuration parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// A key appeared more than once (last value wins).
    DuplicateKey { key: &'static str, value: String },
    /// The key is not a crop setting.
    KeyNotRecognized { key: String, value: String },
    /// A key was recognized but its value could not be parsed.
    ValueInvalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
    /// The aspect ratio is not `W:H`; the image ratio is used instead.
    InvalidAspectRatio { value: String },
}

/// Parse a configuration string (with or without leading `?`).
pub fn parse(query: &str) -> ParseResult {
    let (config, warnings) = parse::parse_query(query);
    ParseResult { config, warnings }
}
