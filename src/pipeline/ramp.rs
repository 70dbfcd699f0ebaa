use crate::color::{interpolate, Color};
use crate::theme::Theme;

pub const RAMP_LEN: usize = 256;

/// Dense 256-entry color lookup indexed by grayscale level.
///
/// Luma is non-decreasing with the index.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    colors: Vec<Color>,
}

impl ColorRamp {
    /// Expand a theme into a ramp.
    ///
    /// Anchors are sorted by luma. The darkest seeds level 0, the lightest
    /// owns level 255 and every other anchor lands on its own grayscale level,
    /// with linear gradients filling the gaps. An anchor sharing its level
    /// with the previously placed one replaces it.
    pub fn build(theme: &Theme) -> Self {
        let mut sorted = theme.colors().to_vec();
        sorted.sort_by(|a, b| a.luma().total_cmp(&b.luma()));

        let (darkest, rest) = match sorted.split_first() {
            Some(split) => split,
            None => return Self::from_anchors(Color::BLACK, &[], Color::WHITE),
        };
        match rest.split_last() {
            Some((lightest, middle)) => Self::from_anchors(*darkest, middle, *lightest),
            None => Self::from_anchors(*darkest, &[], *darkest),
        }
    }

    fn from_anchors(darkest: Color, middle: &[Color], lightest: Color) -> Self {
        let mut colors = Vec::with_capacity(RAMP_LEN);
        colors.push(darkest);
        let mut last = 0usize;

        for &anchor in middle {
            let level = anchor.grayscale() as usize;
            if level >= RAMP_LEN - 1 {
                continue;
            }
            if level <= last {
                colors[last] = anchor;
                continue;
            }
            colors.extend(interpolate(colors[last], anchor, level - last));
            last = level;
        }

        colors.extend(interpolate(colors[last], lightest, RAMP_LEN - 1 - last));
        debug_assert_eq!(colors.len(), RAMP_LEN);

        Self { colors }
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Ramp color at a grayscale level.
    pub fn at(&self, level: u8) -> Color {
        self.colors[level as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Color> {
        self.colors.iter()
    }
}
