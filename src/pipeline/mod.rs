pub mod extract;
pub mod histogram;
pub mod matcher;
pub mod parallel;
pub mod ramp;
pub mod reference;

use std::time::Instant;

use image::RgbImage;

use crate::color::{Color, DistanceMetric};
use crate::error::{Error, Result};
use crate::theme::Theme;

use extract::{extract_palette, MAX_PALETTE};
use histogram::{match_histograms, LEVELS};
use matcher::{ColorMatcher, MatchedColor};
use parallel::fold_pixels;
use ramp::ColorRamp;
use reference::{synthesize, validate_precision};

/// Which source colors get matched against the ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Granularity {
    /// One observed color per grayscale level: the mean color of its pixels.
    Levels,
    /// Dominant colors from adaptive quantization.
    Dominant,
}

/// Immutable settings for one colorize run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorizeConfig {
    /// Share of the weighted reference population to synthesize, in (0, 1].
    pub precision: f32,
    pub metric: DistanceMetric,
    /// Keep the photo's lightness and take only hue/saturation from the theme.
    pub preserve_luminance: bool,
    pub granularity: Granularity,
    /// Palette size for `Granularity::Dominant`.
    pub max_colors: usize,
}

impl Default for ColorizeConfig {
    fn default() -> Self {
        Self {
            precision: 1.0,
            metric: DistanceMetric::Grayscale,
            preserve_luminance: false,
            granularity: Granularity::Levels,
            max_colors: MAX_PALETTE,
        }
    }
}

/// Hooks called as intermediate results become available.
pub trait PipelineObserver {
    fn ramp_built(&self, _ramp: &ColorRamp) {}
    fn colors_matched(&self, _matched: &[MatchedColor]) {}
}

/// Observer that ignores everything.
pub struct Silent;

impl PipelineObserver for Silent {}

/// Recolor `image` so its color distribution follows `theme`.
pub fn colorize(image: &RgbImage, theme: &Theme, config: &ColorizeConfig) -> Result<RgbImage> {
    colorize_with(image, theme, config, &Silent)
}

/// Like [`colorize`], reporting the ramp and matched colors to `observer`.
pub fn colorize_with(
    image: &RgbImage,
    theme: &Theme,
    config: &ColorizeConfig,
    observer: &dyn PipelineObserver,
) -> Result<RgbImage> {
    validate_precision(config.precision)?;
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::DegenerateImage {
            stage: "input",
            reason: "image has no pixels",
        });
    }
    if is_uniform(image) {
        log::warn!("image is a single uniform color, histogram matching has nothing to spread");
    }

    let start = Instant::now();
    let ramp = ColorRamp::build(theme);
    observer.ramp_built(&ramp);

    let observed = match config.granularity {
        Granularity::Levels => level_means(image),
        Granularity::Dominant => extract_palette(image, config.max_colors)
            .into_iter()
            .map(|c| (c.color, c.count))
            .collect(),
    };
    log::debug!(
        "observed {} colors ({:?}) in {:.2?}",
        observed.len(),
        config.granularity,
        start.elapsed()
    );

    let matcher = ColorMatcher::new(&ramp, config.metric, config.preserve_luminance);
    let matched = matcher.match_all(&observed);
    observer.colors_matched(&matched);

    let reference = synthesize(&matched, config.precision)?;
    let output = match_histograms(image, &reference)?;
    log::debug!("colorized {}x{} image in {:.2?}", image.width(), image.height(), start.elapsed());
    Ok(output)
}

fn is_uniform(image: &RgbImage) -> bool {
    let mut pixels = image.pixels();
    match pixels.next() {
        Some(first) => pixels.all(|p| p == first),
        None => true,
    }
}

/// Per-channel sums and pixel count for every grayscale level.
#[derive(Clone)]
struct LevelSums {
    sums: Vec<[u64; 3]>,
    counts: Vec<u64>,
}

impl LevelSums {
    fn new() -> Self {
        Self {
            sums: vec![[0; 3]; LEVELS],
            counts: vec![0; LEVELS],
        }
    }

    fn merge(mut self, other: Self) -> Self {
        for (a, b) in self.sums.iter_mut().zip(&other.sums) {
            for c in 0..3 {
                a[c] += b[c];
            }
        }
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            *a += b;
        }
        self
    }
}

/// Mean color and pixel count of each populated grayscale level, darkest first.
pub fn level_means(image: &RgbImage) -> Vec<(Color, u64)> {
    let totals = fold_pixels(
        image.as_raw(),
        LevelSums::new,
        |mut acc: LevelSums, px: &[u8]| {
            let level = Color::from_rgb8(px[0], px[1], px[2]).grayscale() as usize;
            for c in 0..3 {
                acc.sums[level][c] += u64::from(px[c]);
            }
            acc.counts[level] += 1;
            acc
        },
        LevelSums::merge,
    );

    totals
        .sums
        .iter()
        .zip(&totals.counts)
        .filter(|(_, count)| **count > 0)
        .map(|(sum, &count)| {
            let mean = |c: usize| (sum[c] as f64 / count as f64 / 255.0) as f32;
            (Color::new(mean(0), mean(1), mean(2)), count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::cell::RefCell;

    fn gray_theme() -> Theme {
        Theme::from_hex(&["#000000", "#808080", "#ffffff"]).unwrap()
    }

    fn photo(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let r = ((x * 255) / width.max(1)) as u8;
            let g = ((y * 255) / height.max(1)) as u8;
            Rgb([r, g, 128])
        })
    }

    #[test]
    fn level_means_cover_every_pixel() {
        let image = photo(30, 20);
        let levels = level_means(&image);
        assert_eq!(levels.iter().map(|(_, n)| n).sum::<u64>(), 600);
        for pair in levels.windows(2) {
            assert!(pair[0].0.grayscale() <= pair[1].0.grayscale());
        }
    }

    #[test]
    fn level_mean_of_gray_pixels_is_the_gray() {
        let image = RgbImage::from_pixel(3, 3, Rgb([77, 77, 77]));
        let levels = level_means(&image);
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].0.to_rgb8(), [77, 77, 77]);
        assert_eq!(levels[0].1, 9);
    }

    #[test]
    fn invalid_precision_fails_before_work() {
        for precision in [0.0, 1.5] {
            let config = ColorizeConfig {
                precision,
                ..ColorizeConfig::default()
            };
            assert_eq!(
                colorize(&photo(4, 4), &gray_theme(), &config),
                Err(Error::InvalidPrecision(precision))
            );
        }
    }

    #[test]
    fn empty_image_is_degenerate() {
        assert!(matches!(
            colorize(&RgbImage::new(0, 0), &gray_theme(), &ColorizeConfig::default()),
            Err(Error::DegenerateImage { stage: "input", .. })
        ));
    }

    #[test]
    fn uniform_image_still_colorizes() {
        let image = RgbImage::from_pixel(5, 5, Rgb([40, 90, 140]));
        let output = colorize(&image, &gray_theme(), &ColorizeConfig::default()).unwrap();
        assert_eq!(output.dimensions(), (5, 5));
    }

    #[test]
    fn every_granularity_and_metric_keeps_dimensions() {
        let image = photo(24, 16);
        let theme = Theme::from_hex(&["#2e3440", "#88c0d0", "#bf616a", "#ebcb8b", "#eceff4"]).unwrap();
        for granularity in [Granularity::Levels, Granularity::Dominant] {
            for metric in [DistanceMetric::Lab, DistanceMetric::Hue, DistanceMetric::Grayscale] {
                for preserve_luminance in [false, true] {
                    let config = ColorizeConfig {
                        precision: 0.5,
                        metric,
                        preserve_luminance,
                        granularity,
                        max_colors: 32,
                    };
                    let output = colorize(&image, &theme, &config).unwrap();
                    assert_eq!(output.dimensions(), image.dimensions());
                }
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        ramp_len: RefCell<usize>,
        matched: RefCell<usize>,
    }

    impl PipelineObserver for Recorder {
        fn ramp_built(&self, ramp: &ColorRamp) {
            *self.ramp_len.borrow_mut() = ramp.colors().len();
        }

        fn colors_matched(&self, matched: &[MatchedColor]) {
            *self.matched.borrow_mut() = matched.len();
        }
    }

    #[test]
    fn observer_sees_ramp_and_matches() {
        let recorder = Recorder::default();
        let image = RgbImage::from_fn(4, 1, |x, _| Rgb([(x * 60) as u8; 3]));
        colorize_with(&image, &gray_theme(), &ColorizeConfig::default(), &recorder).unwrap();
        assert_eq!(*recorder.ramp_len.borrow(), 256);
        assert_eq!(*recorder.matched.borrow(), 4);
    }
}
