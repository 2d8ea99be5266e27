/// Brightness slider bounds.
pub const BRIGHTNESS_RANGE: std::ops::RangeInclusive<i32> = -100..=100;
/// Inversion midpoint bounds, in percent lightness.
pub const MIDPOINT_RANGE: std::ops::RangeInclusive<f32> = 0.0..=100.0;

pub const DEFAULT_MIDPOINT: f32 = 50.0;

/// Knobs for the palette transform.
///
/// Fields are only reachable through setters so that every value stays
/// inside its declared range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformParams {
    brightness: i32,
    hue_shift_enabled: bool,
    hue_shift_target: f32,
    invert_enabled: bool,
    invert_midpoint: f32,
}

/// A single named-field change coming from the UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamUpdate {
    Brightness(i32),
    HueShiftEnabled(bool),
    HueShiftTarget(f32),
    InvertEnabled(bool),
    InvertMidpoint(f32),
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            brightness: 0,
            hue_shift_enabled: false,
            hue_shift_target: 0.0,
            invert_enabled: false,
            invert_midpoint: DEFAULT_MIDPOINT,
        }
    }
}

impl TransformParams {
    pub fn brightness(&self) -> i32 {
        self.brightness
    }

    pub fn hue_shift_enabled(&self) -> bool {
        self.hue_shift_enabled
    }

    /// Target hue for the anchor colour, in `[0, 360)` degrees.
    pub fn hue_shift_target(&self) -> f32 {
        self.hue_shift_target
    }

    pub fn invert_enabled(&self) -> bool {
        self.invert_enabled
    }

    /// Inversion midpoint in percent lightness.
    pub fn invert_midpoint(&self) -> f32 {
        self.invert_midpoint
    }

    pub fn apply(&mut self, update: ParamUpdate) {
        match update {
            ParamUpdate::Brightness(v) => self.set_brightness(v),
            ParamUpdate::HueShiftEnabled(v) => self.hue_shift_enabled = v,
            ParamUpdate::HueShiftTarget(v) => self.set_hue_shift_target(v),
            ParamUpdate::InvertEnabled(v) => self.invert_enabled = v,
            ParamUpdate::InvertMidpoint(v) => self.set_invert_midpoint(v),
        }
    }

    /// Builder-style variant of [`apply`](Self::apply).
    pub fn with(mut self, update: ParamUpdate) -> Self {
        self.apply(update);
        self
    }

    pub fn set_brightness(&mut self, value: i32) {
        self.brightness = value.clamp(*BRIGHTNESS_RANGE.start(), *BRIGHTNESS_RANGE.end());
    }

    /// Hue is cyclic, so out-of-range targets wrap instead of saturating.
    pub fn set_hue_shift_target(&mut self, degrees: f32) {
        if !degrees.is_finite() {
            return;
        }
        let wrapped = degrees.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        self.hue_shift_target = if wrapped >= 360.0 { 0.0 } else { wrapped };
    }

    pub fn set_invert_midpoint(&mut self, percent: f32) {
        if !percent.is_finite() {
            return;
        }
        self.invert_midpoint = percent.clamp(*MIDPOINT_RANGE.start(), *MIDPOINT_RANGE.end());
    }
}
