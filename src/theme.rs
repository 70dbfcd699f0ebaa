use crate::color::Color;
use crate::error::{Error, Result};

pub const MIN_THEME_COLORS: usize = 3;
pub const MAX_THEME_COLORS: usize = 256;

/// An ordered set of distinct theme colors.
///
/// Colors are considered equal when they quantize to the same 8-bit triple;
/// the first occurrence is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    colors: Vec<Color>,
}

impl Theme {
    pub fn new(colors: impl IntoIterator<Item = Color>) -> Result<Self> {
        let mut distinct: Vec<Color> = Vec::new();
        for color in colors {
            if !distinct.iter().any(|c| c.to_rgb8() == color.to_rgb8()) {
                distinct.push(color);
            }
        }
        if !(MIN_THEME_COLORS..=MAX_THEME_COLORS).contains(&distinct.len()) {
            return Err(Error::InvalidTheme {
                count: distinct.len(),
            });
        }
        Ok(Self { colors: distinct })
    }

    /// Parse a theme from hex strings (`#RGB` or `#RRGGBB`).
    pub fn from_hex<S: AsRef<str>>(hexes: &[S]) -> Result<Self> {
        let colors = hexes
            .iter()
            .map(|h| Color::from_hex(h.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(colors)
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
