use image::RgbImage;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::pipeline::parallel::{fold_pixels, for_each_pixel_mut};
use crate::pipeline::reference::ReferencePopulation;

pub const LEVELS: usize = 256;

/// Pixel counts per level (0-255) for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: [u64; LEVELS],
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            counts: [0; LEVELS],
        }
    }
}

impl Histogram {
    pub fn from_samples(samples: impl IntoIterator<Item = u8>) -> Self {
        let mut hist = Self::default();
        for level in samples {
            hist.counts[level as usize] += 1;
        }
        hist
    }

    /// Histogram of one channel of an image (0 = red, 1 = green, 2 = blue).
    pub fn of_channel(image: &RgbImage, channel: usize) -> Self {
        Self::fold(image, |px| px[channel])
    }

    /// Histogram of Rec. 601 grayscale levels.
    pub fn grayscale(image: &RgbImage) -> Self {
        Self::fold(image, |px| Color::from_rgb8(px[0], px[1], px[2]).grayscale())
    }

    fn fold<F>(image: &RgbImage, level: F) -> Self
    where
        F: Fn(&[u8]) -> u8 + Sync + Send,
    {
        fold_pixels(
            image.as_raw(),
            Self::default,
            |mut hist: Self, px: &[u8]| {
                hist.counts[level(px) as usize] += 1;
                hist
            },
            Self::merge,
        )
    }

    /// Sum of two histograms.
    pub fn merge(mut self, other: Self) -> Self {
        for (a, b) in self.counts.iter_mut().zip(other.counts) {
            *a += b;
        }
        self
    }

    pub fn count(&self, level: u8) -> u64 {
        self.counts[level as usize]
    }

    pub fn counts(&self) -> &[u64; LEVELS] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Normalized cumulative distribution; all zeros for an empty histogram.
    pub fn cdf(&self) -> [f64; LEVELS] {
        let mut cdf = [0.0; LEVELS];
        let total = self.total();
        if total == 0 {
            return cdf;
        }
        let mut running = 0u64;
        for (level, &count) in self.counts.iter().enumerate() {
            running += count;
            cdf[level] = running as f64 / total as f64;
        }
        cdf
    }
}

/// Lookup table sending each source level to the populated reference level
/// whose cumulative frequency is closest. The lowest level wins ties.
pub fn specification_lut(source: &Histogram, reference: &Histogram) -> [u8; LEVELS] {
    let source_cdf = source.cdf();
    let reference_cdf = reference.cdf();
    let populated: Vec<(usize, f64)> = reference_cdf
        .iter()
        .enumerate()
        .filter(|&(level, _)| reference.counts[level] > 0)
        .map(|(level, &value)| (level, value))
        .collect();

    let mut lut = [0u8; LEVELS];
    for (entry, &target) in lut.iter_mut().zip(source_cdf.iter()) {
        let mut best = 0usize;
        let mut best_diff = f64::INFINITY;
        for &(level, value) in &populated {
            let diff = (value - target).abs();
            if diff < best_diff {
                best = level;
                best_diff = diff;
            }
        }
        *entry = best as u8;
    }
    lut
}

/// Remap each channel of `source` so its distribution follows `reference`.
///
/// Output has the same dimensions as the source. Fails without producing
/// an image when either side has no pixels.
pub fn match_histograms(source: &RgbImage, reference: &ReferencePopulation) -> Result<RgbImage> {
    if source.width() == 0 || source.height() == 0 {
        return Err(Error::DegenerateImage {
            stage: "histogram matching",
            reason: "source image has no pixels",
        });
    }
    if reference.is_empty() {
        return Err(Error::DegenerateImage {
            stage: "histogram matching",
            reason: "reference population is empty",
        });
    }

    let luts: [[u8; LEVELS]; 3] = std::array::from_fn(|channel| {
        specification_lut(
            &Histogram::of_channel(source, channel),
            &reference.channel_histogram(channel),
        )
    });

    let mut output = source.clone();
    for_each_pixel_mut(&mut output, |px| {
        for (channel, lut) in luts.iter().enumerate() {
            px[channel] = lut[px[channel] as usize];
        }
    });
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::pipeline::matcher::MatchedColor;
    use crate::pipeline::reference::synthesize;
    use image::Rgb;

    fn population(entries: &[([u8; 3], u64)]) -> ReferencePopulation {
        let matched: Vec<MatchedColor> = entries
            .iter()
            .map(|&([r, g, b], weight)| {
                let color = Color::from_rgb8(r, g, b);
                MatchedColor {
                    observed: color,
                    matched: color,
                    weight,
                }
            })
            .collect();
        synthesize(&matched, 1.0).unwrap()
    }

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let v = ((x + y * width) % 256) as u8;
            Rgb([v, 255 - v, v / 2])
        })
    }

    #[test]
    fn histogram_totals_pixel_count() {
        let image = gradient(40, 30);
        for channel in 0..3 {
            assert_eq!(Histogram::of_channel(&image, channel).total(), 1200);
        }
        assert_eq!(Histogram::grayscale(&image).total(), 1200);
    }

    #[test]
    fn parallel_histogram_matches_sequential_count() {
        let image = gradient(512, 256);
        let hist = Histogram::of_channel(&image, 0);
        assert_eq!(hist.total(), 512 * 256);
        assert_eq!(hist.count(7), 512);
    }

    #[test]
    fn cdf_ends_at_one() {
        let hist = Histogram::from_samples([0, 0, 10, 255]);
        let cdf = hist.cdf();
        assert_eq!(cdf[0], 0.5);
        assert_eq!(cdf[9], 0.5);
        assert_eq!(cdf[10], 0.75);
        assert_eq!(cdf[255], 1.0);
    }

    #[test]
    fn empty_histogram_cdf_is_zero() {
        assert!(Histogram::default().cdf().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn identical_histograms_give_identity_on_used_levels() {
        let hist = Histogram::from_samples([3, 3, 50, 120, 121, 200, 255]);
        let lut = specification_lut(&hist, &hist);
        for level in [3u8, 50, 120, 121, 200, 255] {
            assert_eq!(lut[level as usize], level);
        }
    }

    #[test]
    fn two_level_reference_splits_source_by_rank() {
        let source = Histogram::from_samples(0..=99);
        let reference = Histogram::from_samples([10, 10, 240, 240]);
        let lut = specification_lut(&source, &reference);
        assert_eq!(lut[0], 10);
        assert_eq!(lut[30], 10);
        assert_eq!(lut[80], 240);
        assert_eq!(lut[99], 240);
    }

    #[test]
    fn output_keeps_source_dimensions() {
        let source = gradient(37, 11);
        let reference = population(&[([10, 20, 30], 5), ([200, 180, 160], 9)]);
        let output = match_histograms(&source, &reference).unwrap();
        assert_eq!(output.dimensions(), (37, 11));
    }

    #[test]
    fn output_uses_only_reference_levels() {
        let source = gradient(64, 4);
        let reference = population(&[([10, 20, 30], 1), ([200, 180, 160], 1)]);
        let output = match_histograms(&source, &reference).unwrap();
        for px in output.pixels() {
            assert!(px[0] == 10 || px[0] == 200, "unexpected red {}", px[0]);
            assert!(px[1] == 20 || px[1] == 180, "unexpected green {}", px[1]);
        }
    }

    #[test]
    fn uniform_source_does_not_divide_by_zero() {
        let source = RgbImage::from_pixel(8, 8, Rgb([90, 90, 90]));
        let reference = population(&[([0, 0, 0], 1), ([255, 255, 255], 1)]);
        let output = match_histograms(&source, &reference).unwrap();
        assert!(output.pixels().all(|px| px.0 == [255, 255, 255]));
    }

    #[test]
    fn empty_inputs_are_degenerate() {
        let reference = population(&[([1, 2, 3], 1)]);
        assert!(matches!(
            match_histograms(&RgbImage::new(0, 5), &reference),
            Err(Error::DegenerateImage { .. })
        ));
        assert!(matches!(
            match_histograms(&gradient(4, 4), &ReferencePopulation::default()),
            Err(Error::DegenerateImage { .. })
        ));
    }
}
