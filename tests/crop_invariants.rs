//! Geometric invariants of crop box resolution across many inputs.
//!
//! Every source pixel stores its (x, y) origin, so applying a crop box to a
//! real buffer shows immediately whether the box stays inside the image and
//! whether the anchor lands where the resolver said it would.

use zencrop::*;

// ---- Pixel simulation ----

/// A pixel buffer whose pixels remember where they came from.
#[derive(Clone, Debug)]
struct Grid {
    width: u32,
    height: u32,
    pixels: Vec<(u32, u32)>,
}

impl Grid {
    fn source(w: u32, h: u32) -> Self {
        let pixels = (0..h).flat_map(|y| (0..w).map(move |x| (x, y))).collect();
        Self {
            width: w,
            height: h,
            pixels,
        }
    }

    fn get(&self, x: u32, y: u32) -> (u32, u32) {
        assert!(
            x < self.width && y < self.height,
            "({x},{y}) out of bounds {}x{}",
            self.width,
            self.height
        );
        self.pixels[(y * self.width + x) as usize]
    }

    /// Extract a crop box. Panics if the box leaves the grid.
    fn crop(&self, c: &CropBox) -> Self {
        let mut pixels = Vec::with_capacity((c.width * c.height) as usize);
        for y in c.y..c.y + c.height {
            for x in c.x..c.x + c.width {
                pixels.push(self.get(x, y));
            }
        }
        Self {
            width: c.width,
            height: c.height,
            pixels,
        }
    }
}

fn ar(w: u32, h: u32) -> AspectRatio {
    AspectRatio::new(w, h).unwrap()
}

fn image_sizes() -> Vec<(u32, u32)> {
    let vals = [1u32, 2, 3, 5, 7, 16, 33, 90, 100, 101, 333, 640];
    let mut sizes = Vec::new();
    for &w in &vals {
        for &h in &vals {
            sizes.push((w, h));
        }
    }
    sizes.extend([(1920, 1080), (1080, 1920), (2000, 1000), (4000, 3000), (1621, 883)]);
    sizes
}

fn ratio_specs() -> Vec<AspectRatioSpec> {
    let mut specs = vec![AspectRatioSpec::Unconstrained];
    for (w, h) in [(16, 9), (4, 3), (1, 1), (3, 2), (21, 9), (2, 3), (3, 4), (999, 1), (1, 999)] {
        specs.push(AspectRatioSpec::Enforced(ar(w, h)));
    }
    specs
}

fn constraint_variants(iw: u32, ih: u32) -> Vec<SizeConstraints> {
    let mut out = Vec::new();
    let widths = [None, Some(1), Some(iw / 2), Some(iw), Some(iw * 2)];
    let heights = [None, Some(1), Some(ih / 3), Some(ih * 3)];
    let mins = [None, Some((iw / 4, ih / 4)), Some((iw, 0)), Some((iw + 1, ih))];
    let maxes = [None, Some((iw / 2 + 1, ih / 2 + 1)), Some((iw * 4, 1)), Some((0, ih))];
    let areas = [1.0f64, 0.9, 0.5, 0.01];

    for w in widths {
        for h in heights {
            for min in mins {
                for max in maxes {
                    for area in areas {
                        let mut c = SizeConstraints::new().auto_crop_area(area);
                        c.width = w;
                        c.height = h;
                        if let Some((mw, mh)) = min {
                            c = c.min_size(mw, mh);
                        }
                        if let Some((mw, mh)) = max {
                            c = c.max_size(mw, mh);
                        }
                        out.push(c);
                    }
                }
            }
        }
    }
    out
}

#[test]
fn parametric_invariants() {
    let mut failures = Vec::new();
    let mut checked = 0u64;
    let mut rejected = 0u64;

    for (iw, ih) in image_sizes() {
        let image = OriginalImage::new(iw, ih);
        for ratio in ratio_specs() {
            for base in constraint_variants(iw, ih) {
                let c = base.aspect_ratio(ratio);
                let tag = || format!("{iw}x{ih} {c:?}");

                let first = resolve(image, &c);
                if first != resolve(image, &c) {
                    failures.push(format!("{}: non-deterministic", tag()));
                }

                let bounds = match Bounds::resolve(image, &c) {
                    Ok(b) => b,
                    Err(e) => {
                        if first != Err(e) {
                            failures.push(format!("{}: bounds error {e:?} but got {first:?}", tag()));
                        }
                        rejected += 1;
                        continue;
                    }
                };

                let crop = match first {
                    Ok(crop) => crop,
                    Err(CropError::InfeasibleConstraints(
                        Infeasible::ZeroWidth | Infeasible::ZeroHeight,
                    )) => {
                        rejected += 1;
                        continue;
                    }
                    Err(e) => {
                        failures.push(format!("{}: unexpected error {e:?}", tag()));
                        continue;
                    }
                };
                checked += 1;

                if crop.width == 0 || crop.height == 0 {
                    failures.push(format!("{}: zero-area {crop:?}", tag()));
                }
                if crop.right() > iw || crop.bottom() > ih {
                    failures.push(format!("{}: {crop:?} escapes image", tag()));
                }
                if crop.width < bounds.min_width || crop.width > bounds.max_width {
                    failures.push(format!("{}: width {} outside {bounds:?}", tag(), crop.width));
                }
                if crop.height < bounds.min_height || crop.height > bounds.max_height {
                    failures.push(format!("{}: height {} outside {bounds:?}", tag(), crop.height));
                }
                // Centered: free space split evenly, odd pixel on the far side.
                if crop.x != (iw - crop.width) / 2 || crop.y != (ih - crop.height) / 2 {
                    failures.push(format!("{}: {crop:?} not centered", tag()));
                }
            }
        }
    }

    assert!(checked > 10_000, "only {checked} layouts checked");
    assert!(rejected > 0, "no infeasible requests exercised");
    assert!(
        failures.is_empty(),
        "Invariant failures ({} of {checked}):\n{}",
        failures.len(),
        failures[..failures.len().min(50)].join("\n")
    );
}

#[test]
fn aspect_ratio_fidelity_without_sizes() {
    let mut failures = Vec::new();
    for (iw, ih) in image_sizes() {
        for (rw, rh) in [(16, 9), (4, 3), (1, 1), (3, 2), (21, 9), (2, 3), (3, 4)] {
            let c = SizeConstraints::new().aspect_ratio(ar(rw, rh));
            let crop = match resolve(OriginalImage::new(iw, ih), &c) {
                Ok(crop) => crop,
                // Tiny images can round one side to zero.
                Err(CropError::InfeasibleConstraints(_)) => continue,
                Err(e) => panic!("{iw}x{ih} {rw}:{rh}: {e:?}"),
            };
            let expected_h = (crop.width as f64 * rh as f64 / rw as f64).round() as i64;
            if (expected_h - crop.height as i64).abs() > 1 {
                failures.push(format!(
                    "{iw}x{ih} {rw}:{rh}: {}x{} (expected height {expected_h})",
                    crop.width, crop.height
                ));
            }
            if crop.width != iw && crop.height != ih {
                failures.push(format!(
                    "{iw}x{ih} {rw}:{rh}: {}x{} touches neither edge",
                    crop.width, crop.height
                ));
            }
        }
    }
    assert!(failures.is_empty(), "{}", failures.join("\n"));
}

#[test]
fn crop_applies_to_pixels() {
    let src = Grid::source(160, 90);
    let c = SizeConstraints::new().aspect_ratio(ar(1, 1)).auto_crop_area(0.5);
    let crop = resolve(OriginalImage::new(160, 90), &c).unwrap();
    assert_eq!(crop, CropBox::new(57, 22, 45, 45));

    let out = src.crop(&crop);
    assert_eq!((out.width, out.height), (45, 45));
    assert_eq!(out.get(0, 0), (57, 22));
    assert_eq!(out.get(44, 44), (101, 66));
}

#[test]
fn grid_crop_never_panics_for_resolved_boxes() {
    for (iw, ih) in [(1, 1), (7, 3), (3, 7), (33, 100), (90, 16)] {
        let src = Grid::source(iw, ih);
        for ratio in ratio_specs() {
            for c in constraint_variants(iw, ih) {
                if let Ok(crop) = resolve(OriginalImage::new(iw, ih), &c.aspect_ratio(ratio)) {
                    let out = src.crop(&crop);
                    assert_eq!(out.get(0, 0), crop.anchor());
                }
            }
        }
    }
}

// ---- Documented scenarios ----

#[test]
fn fallback_ratio_of_full_hd() {
    assert_eq!(gcd(1920, 1080), 120);
    for raw in ["NaN", "unconstrained", "16/9", "", "0:0"] {
        assert_eq!(ratio::parse(raw, 1920, 1080), ar(16, 9), "{raw:?}");
    }
}

#[test]
fn width_only_on_two_to_one_image() {
    let crop = resolve_crop_box(2000, 1000, Some(500), None, None, None, None, None, "NaN", 1.0)
        .unwrap();
    assert_eq!(crop, CropBox::new(750, 375, 500, 250));
}

#[test]
fn centering_with_matching_hard_sizes() {
    // Without the 4:3 ratio, height follows width at 16:9 (225, anchor y = 427).
    let crop = resolve_crop_box(1920, 1080, Some(400), Some(300), None, None, None, None, "4:3", 1.0)
        .unwrap();
    assert_eq!(crop.anchor(), (760, 390));
    assert_eq!(crop.size(), (400, 300));
}

#[test]
fn shrink_of_thousand_pixel_box() {
    let c = SizeConstraints::new()
        .width(1000)
        .aspect_ratio(ar(1, 1))
        .min_width(0)
        .auto_crop_area(0.5);
    let crop = resolve(OriginalImage::new(1920, 1080), &c).unwrap();
    assert_eq!(crop.width, 500);
    assert_eq!(crop.height, 500);
}

#[test]
fn sixteen_nine_on_square_image() {
    let crop = resolve_crop_box(1000, 1000, None, None, None, None, None, None, "16:9", 1.0).unwrap();
    assert_eq!(crop.size(), (1000, 563));
    assert_eq!((crop.width as f64 * 9.0 / 16.0).round() as u32, 563);
}

#[test]
fn min_width_wider_than_image_rejected() {
    let err = resolve_crop_box(1920, 1080, None, None, Some(2000), None, None, None, "NaN", 1.0)
        .unwrap_err();
    assert!(matches!(err, CropError::InfeasibleConstraints(_)));
}

#[test]
fn strategies_agree_without_explicit_sizes_on_native_ratio() {
    let image = OriginalImage::new(1920, 1080);
    let c = SizeConstraints::new();
    for s in [
        Strategy::Native(Native::new()),
        Strategy::Native(Native::height_authoritative()),
        Strategy::AspectFit(AspectFit),
    ] {
        let crop = s.resolve(image, &c, Gravity::Center).unwrap();
        assert!(crop.is_full(image), "{}: {crop:?}", s.name());
    }
}
