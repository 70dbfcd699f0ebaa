use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Color as TermColor, Print, ResetColor, SetBackgroundColor};

use crate::color::Color;
use crate::pipeline::matcher::MatchedColor;
use crate::pipeline::ramp::ColorRamp;
use crate::pipeline::PipelineObserver;

/// Ramp entries shown per swatch cell.
const RAMP_STRIDE: usize = 8;

/// Write one labelled row of truecolor blocks, `block_size` cells per color.
pub fn write_swatch<W: Write>(out: &mut W, label: &str, colors: &[Color], block_size: usize) -> io::Result<()> {
    queue!(out, Print(format!("{label:>8} ")))?;
    for color in colors {
        let [r, g, b] = color.to_rgb8();
        queue!(
            out,
            SetBackgroundColor(TermColor::Rgb { r, g, b }),
            Print(" ".repeat(block_size))
        )?;
    }
    queue!(out, ResetColor, Print("\n"))?;
    out.flush()
}

/// Colors sorted by luma with 8-bit duplicates removed.
pub fn sorted_unique(colors: impl IntoIterator<Item = Color>) -> Vec<Color> {
    let mut unique: Vec<Color> = Vec::new();
    for color in colors {
        if !unique.iter().any(|c| c.to_rgb8() == color.to_rgb8()) {
            unique.push(color);
        }
    }
    unique.sort_by(|a, b| a.luma().total_cmp(&b.luma()));
    unique
}

/// Prints the ramp and matched colors to stderr as they are produced.
pub struct SwatchPreview {
    block_size: usize,
}

impl SwatchPreview {
    pub fn new(block_size: usize) -> Self {
        Self { block_size }
    }

    pub fn show(&self, label: &str, colors: &[Color]) {
        if let Err(err) = write_swatch(&mut io::stderr(), label, colors, self.block_size) {
            log::warn!("failed to print {label} preview: {err}");
        }
    }
}

impl Default for SwatchPreview {
    fn default() -> Self {
        Self::new(3)
    }
}

impl PipelineObserver for SwatchPreview {
    fn ramp_built(&self, ramp: &ColorRamp) {
        let sampled: Vec<Color> = ramp.iter().step_by(RAMP_STRIDE).copied().collect();
        self.show("ramp", &sampled);
    }

    fn colors_matched(&self, matched: &[MatchedColor]) {
        self.show("closest", &sorted_unique(matched.iter().map(|m| m.matched)));
    }
}
