//! Crop box computation from size constraints.
//!
//! Reconciles explicit sizes, an aspect ratio, min/max bounds and an
//! auto-crop-area shrink into one rectangle contained in the source image.
//! Pure geometry: no pixel operations, no allocations, `no_std` compatible.
//!
//! # Example
//!
//! ```
//! use zencrop::{CropBox, OriginalImage, SizeConstraints, resolve};
//!
//! let crop = resolve(OriginalImage::new(2000, 1000), &SizeConstraints::new().width(500))
//!     .unwrap();
//!
//! // Height follows the image's own 2:1 ratio, box centered.
//! assert_eq!(crop, CropBox::new(750, 375, 500, 250));
//! ```

#[cfg(not(feature = "std"))]
use num_traits::Float;

use crate::ratio::{AspectRatio, AspectRatioSpec};
use crate::strategy::{CropStrategy, Native};

/// Dimensions of the decoded source image.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OriginalImage {
    pub width: u32,
    pub height: u32,
}

impl OriginalImage {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Reject zero-sized images.
    pub fn validate(&self) -> Result<(), CropError> {
        if self.width == 0 || self.height == 0 {
            return Err(CropError::InvalidImageDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// The image's own ratio, reduced to lowest terms.
    pub fn aspect_ratio(&self) -> AspectRatio {
        AspectRatio::from_dimensions(self.width, self.height)
    }
}

/// Requested crop size and limits.
///
/// `None` means "not specified". Unspecified minimums resolve to 0 and
/// unspecified maximums to the image dimensions, see [`Bounds::resolve`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SizeConstraints {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub min_width: Option<u32>,
    pub min_height: Option<u32>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub aspect_ratio: AspectRatioSpec,
    /// Shrink factor in `(0, 1]` applied after clamping.
    pub auto_crop_area: f64,
}

impl Default for SizeConstraints {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            min_width: None,
            min_height: None,
            max_width: None,
            max_height: None,
            aspect_ratio: AspectRatioSpec::Unconstrained,
            auto_crop_area: 1.0,
        }
    }
}

impl SizeConstraints {
    /// No sizes, no limits, unconstrained ratio, no shrink.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn min_size(mut self, min_width: u32, min_height: u32) -> Self {
        self.min_width = Some(min_width);
        self.min_height = Some(min_height);
        self
    }

    pub fn min_width(mut self, min_width: u32) -> Self {
        self.min_width = Some(min_width);
        self
    }

    pub fn min_height(mut self, min_height: u32) -> Self {
        self.min_height = Some(min_height);
        self
    }

    pub fn max_size(mut self, max_width: u32, max_height: u32) -> Self {
        self.max_width = Some(max_width);
        self.max_height = Some(max_height);
        self
    }

    pub fn max_width(mut self, max_width: u32) -> Self {
        self.max_width = Some(max_width);
        self
    }

    pub fn max_height(mut self, max_height: u32) -> Self {
        self.max_height = Some(max_height);
        self
    }

    /// Enforce (or free) the aspect ratio.
    pub fn aspect_ratio(mut self, ratio: impl Into<AspectRatioSpec>) -> Self {
        self.aspect_ratio = ratio.into();
        self
    }

    pub fn auto_crop_area(mut self, area: f64) -> Self {
        self.auto_crop_area = area;
        self
    }
}

/// Min/max limits after defaults are applied.
///
/// Maximums never exceed the image, so a box within bounds always fits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub min_width: u32,
    pub min_height: u32,
    pub max_width: u32,
    pub max_height: u32,
}

impl Bounds {
    /// Apply defaults and check that each axis leaves a non-empty range.
    pub fn resolve(image: OriginalImage, constraints: &SizeConstraints) -> Result<Self, CropError> {
        let bounds = Self {
            min_width: constraints.min_width.unwrap_or(0),
            min_height: constraints.min_height.unwrap_or(0),
            max_width: constraints.max_width.unwrap_or(image.width).min(image.width),
            max_height: constraints.max_height.unwrap_or(image.height).min(image.height),
        };
        if bounds.min_width > bounds.max_width {
            return Err(CropError::InfeasibleConstraints(
                Infeasible::MinWidthExceedsMax {
                    min: bounds.min_width,
                    max: bounds.max_width,
                },
            ));
        }
        if bounds.min_height > bounds.max_height {
            return Err(CropError::InfeasibleConstraints(
                Infeasible::MinHeightExceedsMax {
                    min: bounds.min_height,
                    max: bounds.max_height,
                },
            ));
        }
        Ok(bounds)
    }

    /// Clamp a size into `[min, max]` on both axes.
    pub fn clamp(&self, width: u32, height: u32) -> (u32, u32) {
        (
            width.clamp(self.min_width, self.max_width),
            height.clamp(self.min_height, self.max_height),
        )
    }
}

/// Where to anchor the crop box inside the image.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gravity {
    /// Center on both axes.
    #[default]
    Center,
    /// Position by fraction of the free space. `(0.0, 0.0)` = top-left, `(1.0, 1.0)` = bottom-right.
    Percentage(f32, f32),
}

/// Rectangle to extract from the source image.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CropBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropBox {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner.
    pub fn anchor(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Exclusive right edge, saturating at `u32::MAX`.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge, saturating at `u32::MAX`.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Whether this box covers the whole image (no actual crop).
    pub fn is_full(&self, image: OriginalImage) -> bool {
        self.x == 0 && self.y == 0 && self.width == image.width && self.height == image.height
    }

    /// Ratio of the box, reduced to lowest terms.
    pub fn aspect_ratio(&self) -> AspectRatio {
        AspectRatio::from_dimensions(self.width, self.height)
    }
}

/// Which condition made a request impossible to satisfy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Infeasible {
    /// Resolved minimum width is larger than the resolved maximum.
    MinWidthExceedsMax { min: u32, max: u32 },
    /// Resolved minimum height is larger than the resolved maximum.
    MinHeightExceedsMax { min: u32, max: u32 },
    /// Width collapsed to zero.
    ZeroWidth,
    /// Height collapsed to zero.
    ZeroHeight,
}

impl core::fmt::Display for Infeasible {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MinWidthExceedsMax { min, max } => {
                write!(f, "min width {min} exceeds max width {max}")
            }
            Self::MinHeightExceedsMax { min, max } => {
                write!(f, "min height {min} exceeds max height {max}")
            }
            Self::ZeroWidth => f.write_str("crop width resolved to zero"),
            Self::ZeroHeight => f.write_str("crop height resolved to zero"),
        }
    }
}

/// Crop box computation error.
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum CropError {
    /// Source image has zero width or height.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidImageDimensions { width: u32, height: u32 },
    /// Bounds cannot produce any non-empty box for this image.
    #[error("infeasible crop constraints: {0}")]
    InfeasibleConstraints(Infeasible),
    /// Auto-crop area is not a finite value in `(0, 1]`.
    #[error("auto crop area must be in (0, 1], got {0}")]
    InvalidAutoCropArea(f64),
}

/// Compute the crop box with the canonical strategy, centered.
///
/// When both width and height are given, width is authoritative and height
/// follows the effective aspect ratio. See [`Native`] for the variants.
pub fn resolve(image: OriginalImage, constraints: &SizeConstraints) -> Result<CropBox, CropError> {
    Native::default().resolve(image, constraints, Gravity::Center)
}

/// Flat entry point taking raw values, with `aspect_ratio` parsed leniently.
///
/// Any `aspect_ratio` string other than `W:H` with terms in `1..=999`
/// (e.g. `"NaN"`) leaves the ratio unconstrained.
#[allow(clippy::too_many_arguments)]
pub fn resolve_crop_box(
    original_width: u32,
    original_height: u32,
    width: Option<u32>,
    height: Option<u32>,
    min_width: Option<u32>,
    min_height: Option<u32>,
    max_width: Option<u32>,
    max_height: Option<u32>,
    aspect_ratio: &str,
    auto_crop_area: f64,
) -> Result<CropBox, CropError> {
    let constraints = SizeConstraints {
        width,
        height,
        min_width,
        min_height,
        max_width,
        max_height,
        aspect_ratio: AspectRatioSpec::parse_lenient(aspect_ratio),
        auto_crop_area,
    };
    resolve(OriginalImage::new(original_width, original_height), &constraints)
}

/// Validated inputs for one resolution, shared by every strategy.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Prepared {
    pub(crate) image: OriginalImage,
    pub(crate) bounds: Bounds,
    pub(crate) ratio: AspectRatio,
    auto_crop_area: f64,
}

impl Prepared {
    pub(crate) fn new(image: OriginalImage, constraints: &SizeConstraints) -> Result<Self, CropError> {
        image.validate()?;
        let area = constraints.auto_crop_area;
        if !area.is_finite() || area <= 0.0 || area > 1.0 {
            return Err(CropError::InvalidAutoCropArea(area));
        }
        let bounds = Bounds::resolve(image, constraints)?;
        let ratio = constraints.aspect_ratio.effective(image.width, image.height);
        Ok(Self {
            image,
            bounds,
            ratio,
            auto_crop_area: area,
        })
    }

    /// Clamp, shrink and anchor a base size.
    pub(crate) fn finish(&self, base: (u32, u32), gravity: Gravity) -> Result<CropBox, CropError> {
        let b = &self.bounds;
        let (w, h) = b.clamp(base.0, base.1);

        // The shrunk box must stay at least as large as the minimums.
        let width = round_px((w as f64 * self.auto_crop_area).max(b.min_width as f64));
        let height = round_px((h as f64 * self.auto_crop_area).max(b.min_height as f64));
        if width == 0 {
            return Err(CropError::InfeasibleConstraints(Infeasible::ZeroWidth));
        }
        if height == 0 {
            return Err(CropError::InfeasibleConstraints(Infeasible::ZeroHeight));
        }

        let slack_x = self.image.width.saturating_sub(width);
        let slack_y = self.image.height.saturating_sub(height);
        let x = gravity_offset_1d(slack_x, &gravity, true).min(slack_x);
        let y = gravity_offset_1d(slack_y, &gravity, false).min(slack_y);

        let crop = CropBox {
            x,
            y,
            width,
            height,
        };
        tracing::debug!(
            image_width = self.image.width,
            image_height = self.image.height,
            ratio_width = self.ratio.width(),
            ratio_height = self.ratio.height(),
            base_width = base.0,
            base_height = base.1,
            x = crop.x,
            y = crop.y,
            width = crop.width,
            height = crop.height,
            "resolved crop box"
        );
        Ok(crop)
    }
}

/// Round half away from zero to a pixel count, saturating at the `u32` range.
pub(crate) fn round_px(v: f64) -> u32 {
    v.round().max(0.0) as u32
}

fn gravity_offset_1d(space: u32, gravity: &Gravity, horizontal: bool) -> u32 {
    if space == 0 {
        return 0;
    }
    match gravity {
        Gravity::Center => space / 2,
        Gravity::Percentage(x, y) => {
            let pct = if horizontal { *x } else { *y };
            // NaN clamps to NaN and then casts to 0.
            (space as f64 * pct.clamp(0.0, 1.0) as f64).round() as u32
        }
    }
}
