use crate::color::{Color, DistanceMetric};
use crate::pipeline::ramp::ColorRamp;

/// An observed source color, the ramp color chosen for it, and its weight.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedColor {
    pub observed: Color,
    pub matched: Color,
    pub weight: u64,
}

/// Picks the closest ramp color for observed source colors.
///
/// With `preserve_luminance` every ramp candidate first takes the observed
/// color's HSL lightness, so only hue and saturation come from the theme.
/// Otherwise ramp colors are compared and returned as they are.
#[derive(Debug, Clone, Copy)]
pub struct ColorMatcher<'a> {
    ramp: &'a ColorRamp,
    metric: DistanceMetric,
    preserve_luminance: bool,
}

impl<'a> ColorMatcher<'a> {
    pub fn new(ramp: &'a ColorRamp, metric: DistanceMetric, preserve_luminance: bool) -> Self {
        Self {
            ramp,
            metric,
            preserve_luminance,
        }
    }

    fn candidate(&self, ramp_color: Color, lightness: f32) -> Color {
        if self.preserve_luminance {
            ramp_color.with_lightness(lightness)
        } else {
            ramp_color
        }
    }

    /// Closest candidate; the lowest ramp index wins ties.
    pub fn match_color(&self, observed: Color) -> Color {
        let lightness = observed.to_hsl().lightness;
        let mut best = self.candidate(self.ramp.at(0), lightness);
        let mut best_distance = self.metric.distance(observed, best);

        for &ramp_color in self.ramp.iter().skip(1) {
            let candidate = self.candidate(ramp_color, lightness);
            let distance = self.metric.distance(observed, candidate);
            if distance < best_distance {
                best = candidate;
                best_distance = distance;
            }
        }
        best
    }

    pub fn match_all(&self, observed: &[(Color, u64)]) -> Vec<MatchedColor> {
        observed
            .iter()
            .map(|&(color, weight)| MatchedColor {
                observed: color,
                matched: self.match_color(color),
                weight,
            })
            .collect()
    }
}
