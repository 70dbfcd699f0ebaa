use palette::{FromColor, Hsl, IntoColor, Lab, Srgb};

use crate::error::{Error, Result};

/// Core color type used throughout the pipeline.
/// Holds normalized sRGB components in [0, 1] and provides conversions to
/// perceptual color spaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_srgb(Srgb::new(r, g, b).into_format())
    }

    /// Quantize to 8-bit channels, rounding to nearest.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Parse a hex color string like `#ff8800`, `#FF8800` or the short `#f80`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidHex(hex.to_string()));
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| Error::InvalidHex(hex.to_string()));
        match digits.len() {
            6 => Ok(Self::from_rgb8(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            // #abc is shorthand for #aabbcc
            3 => Ok(Self::from_rgb8(
                channel(&digits[0..1])? * 17,
                channel(&digits[1..2])? * 17,
                channel(&digits[2..3])? * 17,
            )),
            _ => Err(Error::InvalidHex(hex.to_string())),
        }
    }

    /// Serialize to lowercase hex `#rrggbb`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    pub fn to_srgb(self) -> Srgb<f32> {
        Srgb::new(self.r, self.g, self.b)
    }

    /// Create from `palette::Srgb<f32>`, clamping out-of-gamut components.
    pub fn from_srgb(srgb: Srgb<f32>) -> Self {
        Self {
            r: srgb.red.clamp(0.0, 1.0),
            g: srgb.green.clamp(0.0, 1.0),
            b: srgb.blue.clamp(0.0, 1.0),
        }
    }

    /// Convert to CIELAB (D65).
    pub fn to_lab(self) -> Lab {
        self.to_srgb().into_color()
    }

    pub fn from_lab(lab: Lab) -> Self {
        Self::from_srgb(Srgb::from_color(lab))
    }

    pub fn to_hsl(self) -> Hsl {
        self.to_srgb().into_color()
    }

    pub fn from_hsl(hsl: Hsl) -> Self {
        Self::from_srgb(Srgb::from_color(hsl))
    }

    /// Rec. 601 luma in [0, 1].
    pub fn luma(self) -> f32 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }

    /// Grayscale level 0-255 (rounded luma).
    pub fn grayscale(self) -> u8 {
        (self.luma().clamp(0.0, 1.0) * 255.0).round() as u8
    }

    /// HSL lightness scaled to 0-255.
    pub fn luminance(self) -> u8 {
        (self.to_hsl().lightness.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    /// Same hue and saturation, HSL lightness replaced by `lightness`.
    pub fn with_lightness(self, lightness: f32) -> Color {
        let mut hsl = self.to_hsl();
        hsl.lightness = lightness.clamp(0.0, 1.0);
        Color::from_hsl(hsl)
    }

    /// Linear blend in sRGB; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Gradient of `steps` colors from `a` (exclusive) to `b` (inclusive).
///
/// Channels are blended linearly in sRGB, so luma moves linearly from `a` to
/// `b` and hue never drifts through unrelated colors.
pub fn interpolate(a: Color, b: Color, steps: usize) -> Vec<Color> {
    (1..=steps)
        .map(|k| {
            if k == steps {
                b
            } else {
                a.lerp(b, k as f32 / steps as f32)
            }
        })
        .collect()
}

/// How two colors are compared when matching against a ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DistanceMetric {
    /// Squared Euclidean distance in CIELAB.
    Lab,
    /// Circular hue distance combined with saturation delta; lightness ignored.
    Hue,
    /// Absolute luma difference.
    Grayscale,
}

impl DistanceMetric {
    pub fn distance(self, a: Color, b: Color) -> f32 {
        match self {
            DistanceMetric::Lab => {
                let (la, lb) = (a.to_lab(), b.to_lab());
                (la.l - lb.l).powi(2) + (la.a - lb.a).powi(2) + (la.b - lb.b).powi(2)
            }
            DistanceMetric::Hue => {
                let (ha, hb) = (a.to_hsl(), b.to_hsl());
                let dh = hue_distance(
                    ha.hue.into_positive_degrees(),
                    hb.hue.into_positive_degrees(),
                );
                let ds = ha.saturation - hb.saturation;
                (dh * dh + ds * ds).sqrt()
            }
            DistanceMetric::Grayscale => (a.luma() - b.luma()).abs(),
        }
    }
}

/// Shortest angular distance between two hues in degrees, scaled so 180° = 1.
fn hue_distance(h1: f32, h2: f32) -> f32 {
    let d = (h1 - h2).abs() % 360.0;
    d.min(360.0 - d) / 180.0
}
