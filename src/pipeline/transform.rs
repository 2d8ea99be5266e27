use palette::{Hsla, RgbHue};
use tracing::debug;

use crate::color;
use crate::error::{Error, Result};
use crate::params::TransformParams;
use crate::store::{ColourEntry, Palette};

/// Apply `params` to every colour in `palette`.
///
/// The output has the same length, order and ids as the input. The hue
/// anchor is the first input colour and is computed once per call.
pub fn transform(params: &TransformParams, palette: &Palette) -> Result<Palette> {
    let anchor_hue = match palette.first() {
        Some(anchor) if params.hue_shift_enabled() => {
            Some(color::to_hsl(&anchor.value)?.hue.into_positive_degrees())
        }
        _ => None,
    };

    let inversion = if params.invert_enabled() {
        match Inversion::new(params.invert_midpoint() / 100.0) {
            Ok(inversion) => Some(inversion),
            Err(e) => {
                debug!("{e}; skipping inversion");
                None
            }
        }
    } else {
        None
    };

    palette
        .iter()
        .map(|entry| {
            let hsl = color::to_hsl(&entry.value)?;
            let out = transform_hsl(params, anchor_hue, inversion, hsl);
            Ok(ColourEntry::with_id(entry.id, color::to_hex(out)))
        })
        .collect()
}

/// The per-colour steps: hue shift, inversion, brightness.
pub fn transform_hsl(
    params: &TransformParams,
    anchor_hue: Option<f32>,
    inversion: Option<Inversion>,
    mut colour: Hsla,
) -> Hsla {
    if let Some(anchor) = anchor_hue {
        let diff = colour.hue.into_positive_degrees() - anchor;
        colour.hue = RgbHue::from_degrees(wrap_once(params.hue_shift_target() + diff));
    }

    if let Some(inversion) = inversion {
        colour.lightness = inversion.apply(colour.lightness);
    }

    colour.lightness = adjust_brightness(colour.lightness, params.brightness());
    colour
}

/// Bring a hue produced by one addition of two in-range hues back into
/// `[0, 360)`.
fn wrap_once(hue: f32) -> f32 {
    if hue >= 360.0 {
        hue - 360.0
    } else if hue < 0.0 {
        hue + 360.0
    } else {
        hue
    }
}

/// Push lightness toward white for positive brightness, toward black for
/// negative.
fn adjust_brightness(l: f32, brightness: i32) -> f32 {
    let amount = brightness as f32 / 100.0;
    if brightness > 0 {
        l + (1.0 - l) * amount
    } else {
        l + l * amount
    }
}

/// Piecewise lightness reflection around a midpoint in `(0, 1)`.
///
/// `[mid, 1]` maps onto `[0, mid]` and `[0, mid]` onto `[mid, 1]`, each half
/// scaled so the whole range stays within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inversion {
    mid: f32,
}

impl Inversion {
    /// Fails with [`Error::DegenerateMidpoint`] when `mid` is at or beyond
    /// either end of the lightness range.
    pub fn new(mid: f32) -> Result<Self> {
        if mid > 0.0 && mid < 1.0 {
            Ok(Self { mid })
        } else {
            Err(Error::DegenerateMidpoint(mid))
        }
    }

    pub fn apply(&self, l: f32) -> f32 {
        let mid = self.mid;
        if l > mid {
            mid - mid * (l - mid) / (1.0 - mid)
        } else if l < mid {
            1.0 - (1.0 - mid) * l / mid
        } else {
            l
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamUpdate;

    fn palette_of(values: &[&str]) -> Palette {
        values.iter().map(|v| ColourEntry::new(*v)).collect()
    }

    fn hue_of(hex: &str) -> f32 {
        color::to_hsl(hex).unwrap().hue.into_positive_degrees()
    }

    fn lightness_of(hex: &str) -> f32 {
        color::to_hsl(hex).unwrap().lightness
    }

    #[test]
    fn empty_palette_gives_empty_output() {
        let params = TransformParams::default()
            .with(ParamUpdate::HueShiftEnabled(true))
            .with(ParamUpdate::HueShiftTarget(120.0));
        assert!(transform(&params, &Palette::new()).unwrap().is_empty());
    }

    #[test]
    fn default_params_are_identity() {
        let palette = palette_of(&["#123456", "#ABCDEF", "#ff000080", "#000000"]);
        let out = transform(&TransformParams::default(), &palette).unwrap();

        assert_eq!(out.ids(), palette.ids());
        assert_eq!(out.values(), ["#123456", "#abcdef", "#ff000080", "#000000"]);
    }

    #[test]
    fn single_entry_hue_shift_lands_on_target() {
        let params = TransformParams::default()
            .with(ParamUpdate::HueShiftEnabled(true))
            .with(ParamUpdate::HueShiftTarget(180.0));
        let out = transform(&params, &palette_of(&["#ff0000"])).unwrap();
        assert_eq!(out.values(), ["#00ffff"]);
    }

    #[test]
    fn anchor_hue_is_exactly_target_before_quantization() {
        let params = TransformParams::default()
            .with(ParamUpdate::HueShiftEnabled(true))
            .with(ParamUpdate::HueShiftTarget(180.0));
        let hsl = color::to_hsl("#3a7bd5").unwrap();
        let anchor = hsl.hue.into_positive_degrees();

        let out = transform_hsl(&params, Some(anchor), None, hsl);

        assert_eq!(out.hue.into_positive_degrees(), 180.0);
    }

    #[test]
    fn hue_shift_preserves_relative_distance() {
        // red anchor at 0, green at 120
        let params = TransformParams::default()
            .with(ParamUpdate::HueShiftEnabled(true))
            .with(ParamUpdate::HueShiftTarget(300.0));
        let out = transform(&params, &palette_of(&["#ff0000", "#00ff00"])).unwrap();

        // 300 + 120 wraps to 60: yellow
        assert_eq!(out.values(), ["#ff00ff", "#ffff00"]);
    }

    #[test]
    fn hue_shift_wraps_below_zero() {
        // blue anchor at 240, red at 0: diff -240, target 100 -> -140 -> 220
        let params = TransformParams::default()
            .with(ParamUpdate::HueShiftEnabled(true))
            .with(ParamUpdate::HueShiftTarget(100.0));
        let out = transform(&params, &palette_of(&["#0000ff", "#ff0000"])).unwrap();
        let hue = hue_of(out.values()[1]);
        assert!((hue - 220.0).abs() < 1.0, "expected ~220, got {hue}");
    }

    #[test]
    fn inversion_leaves_midpoint_unchanged() {
        let inversion = Inversion::new(0.5).unwrap();
        assert_eq!(inversion.apply(0.5), 0.5);
    }

    #[test]
    fn inversion_swaps_halves() {
        for mid in [0.2_f32, 0.5, 0.8] {
            let inversion = Inversion::new(mid).unwrap();
            let eps = 0.05;
            let below = inversion.apply(mid - eps);
            let above = inversion.apply(mid + eps);
            assert!(
                (mid..=1.0).contains(&below),
                "mid {mid}: {below} not in upper half"
            );
            assert!(
                (0.0..=mid).contains(&above),
                "mid {mid}: {above} not in lower half"
            );
        }
    }

    #[test]
    fn inversion_maps_extremes() {
        let inversion = Inversion::new(0.3).unwrap();
        assert!((inversion.apply(0.0) - 1.0).abs() < 1e-6);
        assert!(inversion.apply(1.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_midpoint_is_rejected() {
        assert_eq!(Inversion::new(0.0), Err(Error::DegenerateMidpoint(0.0)));
        assert_eq!(Inversion::new(1.0), Err(Error::DegenerateMidpoint(1.0)));
    }

    #[test]
    fn degenerate_midpoint_is_identity_in_transform() {
        let palette = palette_of(&["#123456", "#fedcba"]);
        for midpoint in [0.0, 100.0] {
            let params = TransformParams::default()
                .with(ParamUpdate::InvertEnabled(true))
                .with(ParamUpdate::InvertMidpoint(midpoint));
            let out = transform(&params, &palette).unwrap();
            assert_eq!(out.values(), ["#123456", "#fedcba"]);
        }
    }

    #[test]
    fn inversion_turns_black_white() {
        let params = TransformParams::default().with(ParamUpdate::InvertEnabled(true));
        let out = transform(&params, &palette_of(&["#000000", "#ffffff"])).unwrap();
        assert_eq!(out.values(), ["#ffffff", "#000000"]);
    }

    #[test]
    fn brightness_pushes_toward_extremes() {
        let palette = palette_of(&["#808080"]);

        let up = TransformParams::default().with(ParamUpdate::Brightness(50));
        let lighter = transform(&up, &palette).unwrap();
        assert!(lightness_of(lighter.values()[0]) > lightness_of("#808080"));

        let down = TransformParams::default().with(ParamUpdate::Brightness(-50));
        let darker = transform(&down, &palette).unwrap();
        assert!(lightness_of(darker.values()[0]) < lightness_of("#808080"));
    }

    #[test]
    fn full_brightness_is_white_and_black() {
        let palette = palette_of(&["#3a7bd5"]);
        let white = TransformParams::default().with(ParamUpdate::Brightness(100));
        assert_eq!(transform(&white, &palette).unwrap().values(), ["#ffffff"]);
        let black = TransformParams::default().with(ParamUpdate::Brightness(-100));
        assert_eq!(transform(&black, &palette).unwrap().values(), ["#000000"]);
    }

    #[test]
    fn brightness_formula() {
        assert!((adjust_brightness(0.4, 50) - 0.7).abs() < 1e-6);
        assert!((adjust_brightness(0.4, -50) - 0.2).abs() < 1e-6);
        assert_eq!(adjust_brightness(0.4, 0), 0.4);
    }

    #[test]
    fn inversion_applies_before_brightness() {
        // l = 0.25 inverts to 0.75 at mid 0.5, then +20% -> 0.8
        let params = TransformParams::default()
            .with(ParamUpdate::InvertEnabled(true))
            .with(ParamUpdate::Brightness(20));
        let hsl: Hsla = Hsla::new(0.0, 0.0, 0.25, 1.0);
        let out = transform_hsl(&params, None, Inversion::new(0.5).ok(), hsl);
        assert!((out.lightness - 0.8).abs() < 1e-6);
    }

    #[test]
    fn alpha_is_preserved() {
        let params = TransformParams::default().with(ParamUpdate::InvertEnabled(true));
        let out = transform(&params, &palette_of(&["#00000080"])).unwrap();
        assert_eq!(out.values(), ["#ffffff80"]);
    }

    #[test]
    fn invalid_value_propagates() {
        let palette = palette_of(&["#123456", "oops"]);
        assert_eq!(
            transform(&TransformParams::default(), &palette),
            Err(Error::InvalidColourFormat("oops".to_string()))
        );
    }

    #[test]
    fn invalid_anchor_propagates_when_shifting() {
        let params = TransformParams::default().with(ParamUpdate::HueShiftEnabled(true));
        assert!(transform(&params, &palette_of(&["#12345"])).is_err());
    }

    #[test]
    fn midpoint_lightness_is_a_fixed_point() {
        // pure red sits at l = 0.5
        let params = TransformParams::default().with(ParamUpdate::InvertEnabled(true));
        let out = transform(&params, &palette_of(&["#FF0000", "#000000"])).unwrap();
        assert_eq!(out.values(), ["#ff0000", "#ffffff"]);
    }
}
