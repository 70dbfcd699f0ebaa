use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::builder::PossibleValuesParser;
use clap::Parser;
use log::LevelFilter;
use regex::Regex;

use crate::color::{Color, DistanceMetric};
use crate::pipeline::extract::MAX_PALETTE;
use crate::pipeline::{ColorizeConfig, Granularity};
use crate::presets;
use crate::theme::Theme;
use crate::wallpaper::BgMode;

/// `#RRGGBB` or `#RGB` anywhere in a line.
const HEX_PATTERN: &str = r"#[0-9A-Fa-f]{6}|#[0-9A-Fa-f]{3}";

/// Colorize images with a selected color theme.
#[derive(Parser, Debug)]
#[command(name = "mola", version, about, args_override_self = true)]
pub struct Args {
    /// Image to colorize
    #[arg(required_unless_present = "list_themes")]
    pub input: Option<PathBuf>,

    /// Name of a built-in theme
    #[arg(short, long, value_parser = PossibleValuesParser::new(presets::names()))]
    pub theme: Option<String>,

    /// Text file to scan for hex colors
    #[arg(short = 'f', long = "file", conflicts_with = "theme")]
    pub theme_file: Option<PathBuf>,

    /// Hex color to add to the theme (repeatable)
    #[arg(short = 'c', long = "color", value_parser = Color::from_hex)]
    pub colors: Vec<Color>,

    /// Processing precision in range 1-100, 100 being the slowest but most accurate
    #[arg(short, long, default_value_t = 100, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub precision: u8,

    /// Write the result to this file instead of setting it as wallpaper
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub placement: PlacementFlags,

    /// Distance used to match image colors to theme colors
    #[arg(long, value_enum, default_value_t = DistanceMetric::Grayscale)]
    pub metric: DistanceMetric,

    /// Match per grayscale level or per dominant color
    #[arg(long, value_enum, default_value_t = Granularity::Levels)]
    pub granularity: Granularity,

    /// Keep the photo's lightness and take only hue and saturation from the theme
    #[arg(long)]
    pub preserve_luminance: bool,

    /// Number of dominant colors to extract with --granularity dominant
    #[arg(short = 'k', long = "colors", default_value_t = MAX_PALETTE)]
    pub max_colors: usize,

    /// Print a colored terminal preview of the theme, ramp and matched colors
    #[arg(long)]
    pub preview: bool,

    /// List built-in themes and exit
    #[arg(long)]
    pub list_themes: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// feh placement options; the default when none is given is `--bg-scale`.
#[derive(clap::Args, Debug, Clone, Copy, Default)]
#[group(id = "placement", multiple = false, conflicts_with = "output")]
pub struct PlacementFlags {
    #[arg(long)]
    pub bg_center: bool,
    #[arg(long)]
    pub bg_fill: bool,
    #[arg(long)]
    pub bg_max: bool,
    #[arg(long)]
    pub bg_scale: bool,
    #[arg(long)]
    pub bg_tile: bool,
}

impl PlacementFlags {
    pub fn mode(&self) -> Option<BgMode> {
        [
            (self.bg_center, BgMode::Center),
            (self.bg_fill, BgMode::Fill),
            (self.bg_max, BgMode::Max),
            (self.bg_scale, BgMode::Scale),
            (self.bg_tile, BgMode::Tile),
        ]
        .into_iter()
        .find_map(|(set, mode)| set.then_some(mode))
    }
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Error
        }
    }

    pub fn config(&self) -> ColorizeConfig {
        ColorizeConfig {
            precision: f32::from(self.precision) / 100.0,
            metric: self.metric,
            preserve_luminance: self.preserve_luminance,
            granularity: self.granularity,
            max_colors: self.max_colors,
        }
    }

    /// Collect colors from the preset, the theme file and `--color`, in that order.
    pub fn theme(&self) -> Result<Theme> {
        let mut colors = Vec::new();
        if let Some(name) = &self.theme {
            log::debug!("Using theme '{name}'");
            let hexes = presets::hexes(name).with_context(|| format!("unknown theme '{name}'"))?;
            for hex in hexes {
                colors.push(Color::from_hex(hex)?);
            }
        }
        if let Some(path) = &self.theme_file {
            let found = read_theme_file(path)?;
            log::debug!("Extracted {} colors from the theme file", found.len());
            colors.extend(found);
        }
        if !self.colors.is_empty() {
            log::debug!("Parsed {} colors from the command line", self.colors.len());
            colors.extend(self.colors.iter().copied());
        }
        Ok(Theme::new(colors)?)
    }
}

/// Scan text for hex colors, in order of appearance.
pub fn scan_hex_colors(text: &str) -> Result<Vec<Color>> {
    let re = Regex::new(HEX_PATTERN)?;
    re.find_iter(text)
        .map(|m| Color::from_hex(m.as_str()).map_err(Into::into))
        .collect()
}

fn read_theme_file(path: &Path) -> Result<Vec<Color>> {
    log::debug!("Parsing file '{}' for colors", path.display());
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read theme file {}", path.display()))?;
    scan_hex_colors(&text)
}
