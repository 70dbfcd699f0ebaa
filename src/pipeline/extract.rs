use std::cmp::Reverse;
use std::collections::HashSet;

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use kmeans_colors::get_kmeans_hamerly;
use palette::Lab;

use crate::color::Color;

/// A dominant color with the number of pixels its cluster covers.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedColor {
    pub color: Color,
    pub count: u64,
}

pub const MAX_PALETTE: usize = 256;

const MAX_DIM: u32 = 256;
const MAX_ITER: usize = 20;
const CONVERGE: f32 = 5.0;
const SEED: u64 = 42;
const DEDUP_THRESHOLD: f32 = 25.0; // ΔE² < 25 means ΔE < 5

/// Downscale to fit within 256x256 (preserving aspect ratio) for clustering.
fn prepare(image: &RgbImage) -> RgbImage {
    if image.width() > MAX_DIM || image.height() > MAX_DIM {
        DynamicImage::ImageRgb8(image.clone())
            .resize(MAX_DIM, MAX_DIM, FilterType::Lanczos3)
            .to_rgb8()
    } else {
        image.clone()
    }
}

/// Number of distinct colors, counting no further than `limit`.
fn distinct_colors(image: &RgbImage, limit: usize) -> usize {
    let mut seen = HashSet::with_capacity(limit);
    for pixel in image.pixels() {
        seen.insert(pixel.0);
        if seen.len() >= limit {
            break;
        }
    }
    seen.len()
}

/// Halve the requested palette size until the image can fill it.
fn palette_size(requested: usize, distinct: usize) -> usize {
    let mut size = requested;
    while size > distinct.max(1) {
        let next = size / 2;
        log::info!("image has {distinct} distinct colors, retrying extraction with {next} instead of {size}");
        size = next;
    }
    size
}

/// Quantize an image to at most `max_colors` dominant colors.
///
/// Runs K-means in CIELAB (Hamerly's algorithm, K-means++ init, fixed seed)
/// on a downscaled copy. Counts refer to pixels of that copy. Returns
/// deduplicated colors sorted by count (descending). Never fails: low-color
/// images get a smaller palette, empty images an empty one.
pub fn extract_palette(image: &RgbImage, max_colors: usize) -> Vec<ExtractedColor> {
    if image.width() == 0 || image.height() == 0 {
        return Vec::new();
    }

    let working = prepare(image);
    let requested = max_colors.clamp(1, MAX_PALETTE);
    let k = palette_size(requested, distinct_colors(&working, requested));

    let pixels: Vec<Lab> = working
        .pixels()
        .map(|p| Color::from_rgb8(p[0], p[1], p[2]).to_lab())
        .collect();
    let result = get_kmeans_hamerly(k, MAX_ITER, CONVERGE, false, &pixels, SEED);

    // Count pixels per centroid
    let mut counts = vec![0u64; result.centroids.len()];
    for &idx in &result.indices {
        counts[idx as usize] += 1;
    }

    let mut colors: Vec<ExtractedColor> = result
        .centroids
        .iter()
        .zip(&counts)
        .filter(|(_, count)| **count > 0)
        .map(|(lab, &count)| ExtractedColor {
            color: Color::from_lab(*lab),
            count,
        })
        .collect();

    colors.sort_by_key(|c| Reverse(c.count));
    deduplicate(&mut colors);
    colors.sort_by_key(|c| Reverse(c.count));

    log::debug!(
        "extracted {} dominant colors from {}x{} pixels",
        colors.len(),
        working.width(),
        working.height()
    );
    colors
}

/// Merge colors that are too similar (ΔE < 5 in LAB space).
/// Keeps the first color and accumulates the count.
fn deduplicate(colors: &mut Vec<ExtractedColor>) {
    let mut i = 0;
    while i < colors.len() {
        let lab_i = colors[i].color.to_lab();
        let mut j = i + 1;
        while j < colors.len() {
            let lab_j = colors[j].color.to_lab();
            let delta_e_sq = (lab_i.l - lab_j.l).powi(2)
                + (lab_i.a - lab_j.a).powi(2)
                + (lab_i.b - lab_j.b).powi(2);
            if delta_e_sq < DEDUP_THRESHOLD {
                colors[i].count += colors[j].count;
                colors.remove(j);
            } else {
                j += 1;
            }
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb(rgb))
    }

    fn total(colors: &[ExtractedColor]) -> u64 {
        colors.iter().map(|c| c.count).sum()
    }

    #[test]
    fn single_pixel_produces_one_color() {
        let colors = extract_palette(&solid(1, 1, [200, 50, 50]), MAX_PALETTE);
        assert_eq!(colors.len(), 1);
        assert_eq!(colors[0].count, 1);
        let [r, g, b] = colors[0].color.to_rgb8();
        assert!(r.abs_diff(200) <= 1 && g.abs_diff(50) <= 1 && b.abs_diff(50) <= 1);
    }

    #[test]
    fn palette_size_halves_until_it_fits() {
        assert_eq!(palette_size(256, 1), 1);
        assert_eq!(palette_size(256, 3), 2);
        assert_eq!(palette_size(256, 256), 256);
        assert_eq!(palette_size(16, 1000), 16);
        assert_eq!(palette_size(256, 0), 1);
    }

    #[test]
    fn empty_image_produces_no_colors() {
        assert!(extract_palette(&RgbImage::new(0, 0), MAX_PALETTE).is_empty());
    }

    #[test]
    fn uniform_image_produces_one_dominant_color() {
        let colors = extract_palette(&solid(32, 32, [20, 120, 200]), MAX_PALETTE);
        assert_eq!(colors.len(), 1);
        assert_eq!(colors[0].count, 32 * 32);
    }

    #[test]
    fn two_color_image_produces_two_dominant_colors() {
        let image = RgbImage::from_fn(20, 20, |x, _| {
            if x < 10 {
                Rgb([200, 50, 50])
            } else {
                Rgb([50, 50, 200])
            }
        });
        let colors = extract_palette(&image, MAX_PALETTE);

        assert_eq!(colors.len(), 2);
        assert_eq!(colors[0].count, 200);
        assert_eq!(colors[1].count, 200);
    }

    #[test]
    fn results_sorted_by_count_descending() {
        let image = RgbImage::from_fn(10, 10, |x, y| match y * 10 + x {
            0..=49 => Rgb([200, 50, 50]),
            50..=74 => Rgb([50, 50, 200]),
            75..=89 => Rgb([50, 200, 50]),
            _ => Rgb([240, 240, 240]),
        });
        let colors = extract_palette(&image, 8);

        assert_eq!(colors.len(), 4);
        assert_eq!(total(&colors), 100);
        for window in colors.windows(2) {
            assert!(
                window[0].count >= window[1].count,
                "colors not sorted by count: {} < {}",
                window[0].count,
                window[1].count
            );
        }
        let counts: Vec<u64> = colors.iter().map(|c| c.count).collect();
        assert_eq!(counts, [50, 25, 15, 10]);
    }

    #[test]
    fn deduplication_merges_similar_colors() {
        let mut colors = vec![
            ExtractedColor {
                color: Color::from_lab(Lab::new(50.0, 20.0, 30.0)),
                count: 5,
            },
            ExtractedColor {
                color: Color::from_lab(Lab::new(51.0, 20.5, 30.5)),
                count: 3,
            },
            ExtractedColor {
                color: Color::from_lab(Lab::new(80.0, -20.0, 10.0)),
                count: 2,
            },
        ];
        deduplicate(&mut colors);
        assert_eq!(colors.len(), 2);
        assert_eq!(colors[0].count, 8);
    }

    #[test]
    fn large_image_is_downscaled() {
        let image = RgbImage::from_fn(512, 256, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 90]));
        let colors = extract_palette(&image, 16);
        assert!(!colors.is_empty() && colors.len() <= 16);
        assert_eq!(total(&colors), 256 * 128);
    }
}
