//! Tokenizer and value parsers for `key=value&...` effect configuration.
//!
//! Keys are matched case-insensitively against a fixed set of aliases. Values
//! are percent-decoded before parsing.

use alloc::string::String;
use alloc::vec::Vec;

use super::{EffectConfig, ParseWarning};
use crate::crop::{Gravity, SizeConstraints};
use crate::ratio::{AspectRatio, AspectRatioSpec, is_unconstrained_sentinel};
use crate::strategy::Strategy;

/// Values seen so far; `None` = key absent or empty.
#[derive(Default)]
struct Fields {
    width: Option<u32>,
    height: Option<u32>,
    min_width: Option<u32>,
    min_height: Option<u32>,
    max_width: Option<u32>,
    max_height: Option<u32>,
    aspect_ratio: Option<AspectRatioSpec>,
    auto_crop_area: Option<f64>,
    strategy: Option<Strategy>,
    gravity: Option<Gravity>,
}

impl Fields {
    fn into_config(self) -> EffectConfig {
        let defaults = SizeConstraints::default();
        EffectConfig {
            constraints: SizeConstraints {
                width: self.width,
                height: self.height,
                min_width: self.min_width,
                min_height: self.min_height,
                max_width: self.max_width,
                max_height: self.max_height,
                aspect_ratio: self.aspect_ratio.unwrap_or(defaults.aspect_ratio),
                auto_crop_area: self.auto_crop_area.unwrap_or(defaults.auto_crop_area),
            },
            strategy: self.strategy.unwrap_or_default(),
            gravity: self.gravity.unwrap_or_default(),
        }
    }
}

/// Parse a configuration string into an [`EffectConfig`] + warnings.
pub(crate) fn parse_query(query: &str) -> (EffectConfig, Vec<ParseWarning>) {
    let mut fields = Fields::default();
    let mut warnings = Vec::new();

    for pair in split_query(query) {
        let (raw_key, raw_value) = split_pair(pair);
        let key = ascii_lowercase(&percent_decode(raw_key));
        let value = percent_decode(raw_value);

        match Key::from_alias(key.trim()) {
            Some(setting) => dispatch_key(setting, &value, &mut fields, &mut warnings),
            None => warnings.push(ParseWarning::KeyNotRecognized { key, value }),
        }
    }

    (fields.into_config(), warnings)
}

/// One recognized setting, whatever alias it was spelled with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Key {
    Width,
    Height,
    MinWidth,
    MinHeight,
    MaxWidth,
    MaxHeight,
    AspectRatio,
    AutoCropArea,
    Strategy,
    Anchor,
}

impl Key {
    fn from_alias(alias: &str) -> Option<Self> {
        Some(match alias {
            "w" | "width" => Self::Width,
            "h" | "height" => Self::Height,
            "min_width" | "minwidth" => Self::MinWidth,
            "min_height" | "minheight" => Self::MinHeight,
            "max_width" | "maxwidth" => Self::MaxWidth,
            "max_height" | "maxheight" => Self::MaxHeight,
            "aspect_ratio" | "aspectratio" | "ratio" => Self::AspectRatio,
            "auto_crop_area" | "autocroparea" => Self::AutoCropArea,
            "strategy" | "plugin" => Self::Strategy,
            "anchor" | "gravity" => Self::Anchor,
            _ => return None,
        })
    }

    /// Name reported in warnings.
    fn name(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Height => "height",
            Self::MinWidth => "min_width",
            Self::MinHeight => "min_height",
            Self::MaxWidth => "max_width",
            Self::MaxHeight => "max_height",
            Self::AspectRatio => "aspect_ratio",
            Self::AutoCropArea => "auto_crop_area",
            Self::Strategy => "strategy",
            Self::Anchor => "anchor",
        }
    }
}

fn dispatch_key(setting: Key, value: &str, fields: &mut Fields, warnings: &mut Vec<ParseWarning>) {
    // Empty means "not specified", never zero.
    if value.trim().is_empty() {
        return;
    }

    let key = setting.name();
    match setting {
        Key::Width => positive(&mut fields.width, key, value, warnings),
        Key::Height => positive(&mut fields.height, key, value, warnings),
        Key::MaxWidth => positive(&mut fields.max_width, key, value, warnings),
        Key::MaxHeight => positive(&mut fields.max_height, key, value, warnings),
        Key::MinWidth => non_negative(&mut fields.min_width, key, value, warnings),
        Key::MinHeight => non_negative(&mut fields.min_height, key, value, warnings),

        Key::AspectRatio => {
            let ratio = match AspectRatio::parse_strict(value.trim()) {
                Some(r) => AspectRatioSpec::Enforced(r),
                None => {
                    if !is_unconstrained_sentinel(value) {
                        warnings.push(ParseWarning::InvalidAspectRatio {
                            value: String::from(value),
                        });
                    }
                    AspectRatioSpec::Unconstrained
                }
            };
            set_or_warn(&mut fields.aspect_ratio, Some(ratio), key, value, warnings);
        }

        Key::AutoCropArea => {
            let parsed = parse_area(value);
            if parsed.is_none() {
                invalid(key, value, "expected a number in (0, 1]", warnings);
            }
            set_or_warn(&mut fields.auto_crop_area, parsed, key, value, warnings);
        }

        Key::Strategy => {
            let parsed = Strategy::from_name(value);
            if parsed.is_none() {
                invalid(key, value, "expected native|native-height|fit", warnings);
            }
            set_or_warn(&mut fields.strategy, parsed, key, value, warnings);
        }

        Key::Anchor => {
            let parsed = parse_anchor(value);
            if parsed.is_none() {
                invalid(key, value, "expected a named anchor or x,y percentages", warnings);
            }
            set_or_warn(&mut fields.gravity, parsed, key, value, warnings);
        }
    }
}

fn positive(field: &mut Option<u32>, key: &'static str, value: &str, warnings: &mut Vec<ParseWarning>) {
    let parsed = parse_u32(value).filter(|&v| v > 0);
    if parsed.is_none() {
        invalid(key, value, "expected a positive integer", warnings);
    }
    set_or_warn(field, parsed, key, value, warnings);
}

fn non_negative(field: &mut Option<u32>, key: &'static str, value: &str, warnings: &mut Vec<ParseWarning>) {
    let parsed = parse_u32(value);
    if parsed.is_none() {
        invalid(key, value, "expected a non-negative integer", warnings);
    }
    set_or_warn(field, parsed, key, value, warnings);
}

fn invalid(key: &'static str, value: &str, reason: &'static str, warnings: &mut Vec<ParseWarning>) {
    warnings.push(ParseWarning::ValueInvalid {
        key,
        value: String::from(value),
        reason,
    });
}

fn set_or_warn<T>(
    field: &mut Option<T>,
    parsed: Option<T>,
    key: &'static str,
    value: &str,
    warnings: &mut Vec<ParseWarning>,
) {
    if let Some(v) = parsed {
        if field.is_some() {
            warnings.push(ParseWarning::DuplicateKey {
                key,
                value: String::from(value),
            });
        }
        *field = Some(v);
    }
}

// ---- Value parsers ----

fn parse_u32(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok()
}

fn parse_area(s: &str) -> Option<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|&v| v.is_finite() && v > 0.0 && v <= 1.0)
}

/// Named anchor positions, or `x,y` as percentages of the free space.
fn parse_anchor(s: &str) -> Option<Gravity> {
    let pos = |x: f32, y: f32| Some(Gravity::Percentage(x, y));
    match ascii_lowercase(s.trim()).as_str() {
        "center" | "middlecenter" => Some(Gravity::Center),
        "topleft" => pos(0.0, 0.0),
        "topcenter" => pos(0.5, 0.0),
        "topright" => pos(1.0, 0.0),
        "middleleft" => pos(0.0, 0.5),
        "middleright" => pos(1.0, 0.5),
        "bottomleft" => pos(0.0, 1.0),
        "bottomcenter" => pos(0.5, 1.0),
        "bottomright" => pos(1.0, 1.0),
        other => {
            let (x, y) = other.split_once(',')?;
            let x: f32 = x.trim().parse().ok()?;
            let y: f32 = y.trim().parse().ok()?;
            if !x.is_finite() || !y.is_finite() {
                return None;
            }
            pos(x.clamp(0.0, 100.0) / 100.0, y.clamp(0.0, 100.0) / 100.0)
        }
    }
}

// ---- Query string tokenizer ----

/// Non-empty `&`-separated settings, with one optional leading `?`.
fn split_query(query: &str) -> impl Iterator<Item = &str> {
    query
        .strip_prefix('?')
        .unwrap_or(query)
        .split('&')
        .filter(|s| !s.is_empty())
}

/// `key=value` on the first `=`; a bare key gets an empty value.
fn split_pair(pair: &str) -> (&str, &str) {
    pair.split_once('=').unwrap_or((pair, ""))
}

/// Decode `%XX` escapes and `+`. Malformed escapes pass through as-is and
/// invalid UTF-8 becomes U+FFFD.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                if let (Some(hi), Some(lo)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                    out.push(hi << 4 | lo);
                    i += 3;
                } else {
                    out.push(b'%');
                    i += 1;
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

fn ascii_lowercase(s: &str) -> String {
    let mut out = String::from(s);
    out.make_ascii_lowercase();
    out
}
