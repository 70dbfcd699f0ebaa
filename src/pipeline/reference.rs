use crate::error::{Error, Result};
use crate::pipeline::histogram::Histogram;
use crate::pipeline::matcher::MatchedColor;

/// Synthetic pixel population whose channel histograms encode the target
/// distribution for histogram matching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferencePopulation {
    pixels: Vec<[u8; 3]>,
}

impl ReferencePopulation {
    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Histogram of one channel (0 = red, 1 = green, 2 = blue).
    pub fn channel_histogram(&self, channel: usize) -> Histogram {
        Histogram::from_samples(self.pixels.iter().map(|p| p[channel]))
    }
}

/// Check that precision lies in (0, 1].
pub fn validate_precision(precision: f32) -> Result<()> {
    if precision > 0.0 && precision <= 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidPrecision(precision))
    }
}

/// Emit `ceil(weight * precision)` copies of every matched color.
pub fn synthesize(matched: &[MatchedColor], precision: f32) -> Result<ReferencePopulation> {
    validate_precision(precision)?;

    let copies = |weight: u64| (weight as f64 * f64::from(precision)).ceil() as usize;
    let mut pixels = Vec::with_capacity(matched.iter().map(|m| copies(m.weight)).sum());
    for m in matched {
        let rgb = m.matched.to_rgb8();
        pixels.extend(std::iter::repeat(rgb).take(copies(m.weight)));
    }

    log::debug!(
        "synthesized {} reference pixels from {} matched colors",
        pixels.len(),
        matched.len()
    );
    Ok(ReferencePopulation { pixels })
}
