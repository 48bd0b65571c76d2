//! Aspect ratios: GCD reduction and lenient `W:H` parsing.
//!
//! An enforced ratio is honored exactly as written (`32:18` stays `32:18`).
//! Anything that is not a well-formed `W:H` pair falls back to the image's
//! own ratio, reduced by the greatest common divisor.
//!
//! ```
//! use zencrop::ratio::{self, AspectRatio};
//!
//! assert_eq!(ratio::parse("16:9", 1000, 1000), AspectRatio::new(16, 9).unwrap());
//! assert_eq!(ratio::parse("NaN", 1920, 1080), AspectRatio::new(16, 9).unwrap());
//! assert_eq!(ratio::parse("wide", 2000, 1000), AspectRatio::new(2, 1).unwrap());
//! ```

use core::fmt;

/// Largest value accepted on either side of an enforced `W:H` ratio.
pub const MAX_RATIO_TERM: u32 = 999;

/// Greatest common divisor, Euclidean remainder reduction.
///
/// Argument order does not matter and `gcd(a, 0) == a`.
pub fn gcd(a: u32, b: u32) -> u32 {
    let (mut a, mut b) = if b > a { (b, a) } else { (a, b) };
    while b > 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// A `width:height` ratio with both terms at least 1.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawAspectRatio"))]
pub struct AspectRatio {
    width: u32,
    height: u32,
}

impl AspectRatio {
    /// Create a ratio. Returns `None` if either term is zero.
    pub const fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            None
        } else {
            Some(Self { width, height })
        }
    }

    /// Ratio of an image, reduced to lowest terms.
    ///
    /// Zero dimensions are treated as 1 so the result is always usable.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
        .reduced()
    }

    /// Strict `W:H` parse: ASCII digits only, 1 to 3 per side, each term in `1..=999`.
    ///
    /// Unlike [`parse`], this does not fall back. The configuration layer uses
    /// it to tell a malformed ratio apart from an intentionally absent one.
    pub fn parse_strict(raw: &str) -> Option<Self> {
        let (w, h) = raw.split_once(':')?;
        Self::new(parse_term(w)?, parse_term(h)?)
    }

    /// Width term.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height term.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The same ratio divided by the GCD of its terms.
    pub fn reduced(self) -> Self {
        let g = gcd(self.width, self.height);
        Self {
            width: self.width / g,
            height: self.height / g,
        }
    }

    /// Height units per width unit (`height / width`).
    pub fn delta(&self) -> f64 {
        self.height as f64 / self.width as f64
    }

    /// Width units per height unit (`width / height`).
    pub fn as_f64(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawAspectRatio {
    width: u32,
    height: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<RawAspectRatio> for AspectRatio {
    type Error = &'static str;

    fn try_from(raw: RawAspectRatio) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.height).ok_or("aspect ratio terms must be at least 1")
    }
}

fn parse_term(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 3 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u32>()
        .ok()
        .filter(|&v| (1..=MAX_RATIO_TERM).contains(&v))
}

/// Requested aspect ratio: either free or an enforced `W:H`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AspectRatioSpec {
    /// Follow the image's own ratio.
    #[default]
    Unconstrained,
    /// Enforce this ratio exactly as given.
    Enforced(AspectRatio),
}

impl AspectRatioSpec {
    /// Parse a ratio string, never failing.
    ///
    /// `NaN`, `unconstrained`, and blank strings are the unconstrained sentinel.
    /// Any other string that is not a valid `W:H` pair is also treated as
    /// unconstrained, with a warning event.
    pub fn parse_lenient(raw: &str) -> Self {
        match AspectRatio::parse_strict(raw) {
            Some(r) => Self::Enforced(r),
            None => {
                if !is_unconstrained_sentinel(raw) {
                    tracing::warn!(raw, "malformed aspect ratio, using image ratio");
                }
                Self::Unconstrained
            }
        }
    }

    /// The ratio to use for an image of the given size.
    pub fn effective(&self, image_width: u32, image_height: u32) -> AspectRatio {
        match *self {
            Self::Enforced(r) => r,
            Self::Unconstrained => AspectRatio::from_dimensions(image_width, image_height),
        }
    }

    /// Whether a specific ratio is enforced.
    pub fn is_enforced(&self) -> bool {
        matches!(self, Self::Enforced(_))
    }
}

impl From<AspectRatio> for AspectRatioSpec {
    fn from(r: AspectRatio) -> Self {
        Self::Enforced(r)
    }
}

/// Whether `raw` is one of the spellings meaning "no enforced ratio".
pub fn is_unconstrained_sentinel(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || raw.eq_ignore_ascii_case("nan") || raw.eq_ignore_ascii_case("unconstrained")
}

/// Resolve a ratio string against fallback image dimensions.
///
/// Returns the enforced ratio verbatim when `raw` is a valid `W:H`, otherwise
/// the fallback dimensions divided by their GCD.
pub fn parse(raw: &str, fallback_width: u32, fallback_height: u32) -> AspectRatio {
    AspectRatioSpec::parse_lenient(raw).effective(fallback_width, fallback_height)
}
