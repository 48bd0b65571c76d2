//! Crop strategies: how the base size is chosen before clamping.
//!
//! Every strategy shares the same finish: clamp to [`Bounds`](crate::Bounds),
//! apply the auto-crop-area shrink, then anchor by [`Gravity`].

use crate::crop::{CropBox, CropError, Gravity, OriginalImage, Prepared, SizeConstraints, round_px};

/// A way of turning constraints into a crop box for one image.
pub trait CropStrategy {
    /// Compute the crop box. Deterministic and free of side effects.
    fn resolve(
        &self,
        image: OriginalImage,
        constraints: &SizeConstraints,
        gravity: Gravity,
    ) -> Result<CropBox, CropError>;
}

/// Which explicit dimension wins when both width and height are given.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Authority {
    /// Height is derived from width through the aspect ratio.
    #[default]
    Width,
    /// Width is derived from height through the aspect ratio.
    Height,
}

/// Size from explicit width/height, or from the image width when neither is given.
///
/// The effective aspect ratio always links the two axes: one explicit
/// dimension implies the other. Without explicit sizes the box starts at the
/// full image width and backs off to the max height, then the max width.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Native {
    pub hard_sizes: Authority,
}

impl Native {
    /// Width authoritative when both sizes are given.
    pub const fn new() -> Self {
        Self {
            hard_sizes: Authority::Width,
        }
    }

    /// Height authoritative when both sizes are given.
    pub const fn height_authoritative() -> Self {
        Self {
            hard_sizes: Authority::Height,
        }
    }

    fn base_size(&self, p: &Prepared, constraints: &SizeConstraints) -> (u32, u32) {
        let delta = p.ratio.delta();
        let from_width = |w: u32| (w, round_px(w as f64 * delta));
        let from_height = |h: u32| (round_px(h as f64 / delta), h);

        match (constraints.width, constraints.height, self.hard_sizes) {
            (None, None, _) => {
                let b = &p.bounds;
                let (mut w, mut h) = from_width(p.image.width);
                if h > b.max_height {
                    tracing::trace!(height = h, max_height = b.max_height, "height over limit");
                    (w, h) = from_height(b.max_height);
                }
                if w > b.max_width {
                    tracing::trace!(width = w, max_width = b.max_width, "width over limit");
                    (w, h) = from_width(b.max_width);
                }
                (w, h)
            }
            (Some(w), None, _) | (Some(w), Some(_), Authority::Width) => from_width(w),
            (None, Some(h), _) | (Some(_), Some(h), Authority::Height) => from_height(h),
        }
    }
}

impl CropStrategy for Native {
    fn resolve(
        &self,
        image: OriginalImage,
        constraints: &SizeConstraints,
        gravity: Gravity,
    ) -> Result<CropBox, CropError> {
        let p = Prepared::new(image, constraints)?;
        let base = self.base_size(&p, constraints);
        p.finish(base, gravity)
    }
}

/// Largest box of the effective aspect ratio that fits inside the max bounds.
///
/// Explicit width and height are ignored; min bounds and the auto-crop
/// area still apply.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AspectFit;

impl AspectFit {
    fn base_size(&self, p: &Prepared) -> (u32, u32) {
        let r = p.ratio.as_f64();
        let max_w = p.bounds.max_width as f64;
        let max_h = p.bounds.max_height as f64;
        if r < 1.0 {
            // Portrait
            let w = (max_h * r).min(max_w);
            (round_px(w), round_px(w / r))
        } else {
            let h = (max_w / r).min(max_h);
            (round_px(h * r), round_px(h))
        }
    }
}

impl CropStrategy for AspectFit {
    fn resolve(
        &self,
        image: OriginalImage,
        constraints: &SizeConstraints,
        gravity: Gravity,
    ) -> Result<CropBox, CropError> {
        let p = Prepared::new(image, constraints)?;
        p.finish(self.base_size(&p), gravity)
    }
}

/// Strategy chosen by configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    Native(Native),
    AspectFit(AspectFit),
}

impl Default for Strategy {
    fn default() -> Self {
        Self::Native(Native::new())
    }
}

impl Strategy {
    /// Look up a strategy by configuration name (case-insensitive).
    ///
    /// `native`, `native-height`, and `fit` (alias `automated_crop_default`).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("native") {
            Some(Self::Native(Native::new()))
        } else if name.eq_ignore_ascii_case("native-height") {
            Some(Self::Native(Native::height_authoritative()))
        } else if name.eq_ignore_ascii_case("fit")
            || name.eq_ignore_ascii_case("automated_crop_default")
        {
            Some(Self::AspectFit(AspectFit))
        } else {
            None
        }
    }

    /// Canonical configuration name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Native(Native {
                hard_sizes: Authority::Width,
            }) => "native",
            Self::Native(Native {
                hard_sizes: Authority::Height,
            }) => "native-height",
            Self::AspectFit(_) => "fit",
        }
    }
}

impl CropStrategy for Strategy {
    fn resolve(
        &self,
        image: OriginalImage,
        constraints: &SizeConstraints,
        gravity: Gravity,
    ) -> Result<CropBox, CropError> {
        match self {
            Self::Native(s) => s.resolve(image, constraints, gravity),
            Self::AspectFit(s) => s.resolve(image, constraints, gravity),
        }
    }
}

impl From<Native> for Strategy {
    fn from(s: Native) -> Self {
        Self::Native(s)
    }
}

impl From<AspectFit> for Strategy {
    fn from(s: AspectFit) -> Self {
        Self::AspectFit(s)
    }
}
