use palette::{FromColor, Hsl, Hsla, Srgb};

use crate::error::{Error, Result};

/// Core color type used throughout the pipeline.
/// Wraps sRGB u8 components plus alpha and provides the HSL conversions the
/// transform engine works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Parse a hex color string like `#ff8800`, `#FF8800` or `#ff880080`.
    ///
    /// The leading `#` is required and exactly 6 or 8 hex digits must follow.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let invalid = || Error::InvalidColourFormat(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !(digits.len() == 6 || digits.len() == 8)
            || !digits.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a,
        })
    }

    /// Serialize to lowercase hex: `#rrggbb`, or `#rrggbbaa` when not opaque.
    pub fn to_hex(self) -> String {
        self.to_string()
    }

    /// Convert to HSL with alpha. Hue is in degrees, saturation and
    /// lightness in `[0, 1]`. Achromatic colors get a hue of 0.
    pub fn to_hsl(self) -> Hsla {
        let srgb: Srgb<f32> = Srgb::new(self.r, self.g, self.b).into_format();
        let hsl: Hsl = Hsl::from_color(srgb);
        Hsla {
            color: hsl,
            alpha: self.a as f32 / 255.0,
        }
    }

    /// Create from HSL with alpha, clamping back into the sRGB gamut.
    pub fn from_hsl(hsla: Hsla) -> Self {
        let srgb: Srgb<f32> = Srgb::from_color(hsla.color);
        let a = (hsla.alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::from_srgb_f32_clamped(srgb).with_alpha(a)
    }

    /// Clamp an Srgb<f32> to [0, 1] and convert to an opaque Color.
    fn from_srgb_f32_clamped(srgb: Srgb<f32>) -> Self {
        let r = (srgb.red.clamp(0.0, 1.0) * 255.0).round() as u8;
        let g = (srgb.green.clamp(0.0, 1.0) * 255.0).round() as u8;
        let b = (srgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(r, g, b)
    }

    /// WCAG 2.0 relative luminance.
    ///
    /// Linearizes each sRGB channel, then computes the weighted sum.
    pub fn relative_luminance(self) -> f32 {
        fn linearize(c: u8) -> f32 {
            let c = c as f32 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        let r = linearize(self.r);
        let g = linearize(self.g);
        let b = linearize(self.b);
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a < 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

/// Decompose a hex string into HSL.
pub fn to_hsl(hex: &str) -> Result<Hsla> {
    Ok(Color::from_hex(hex)?.to_hsl())
}

/// Format an HSL color as canonical hex.
pub fn to_hex(hsla: Hsla) -> String {
    Color::from_hsl(hsla).to_hex()
}

/// Normalize any accepted hex spelling to its canonical lowercase form.
pub fn canonical_hex(hex: &str) -> Result<String> {
    Ok(Color::from_hex(hex)?.to_hex())
}
