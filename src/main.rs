use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;

use mola::cli::Args;
use mola::image_io::{load_image, save_image};
use mola::preview::{sorted_unique, SwatchPreview};
use mola::wallpaper::{feh_available, set_wallpaper, temp_output_path};
use mola::{colorize, colorize_with, presets};

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    if args.list_themes {
        for name in presets::names() {
            println!("{name}");
        }
        return Ok(());
    }
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let start = Instant::now();
    let input = args.input.as_deref().context("no input image given")?;
    let theme = args.theme()?;

    // Without --output the result becomes the wallpaper
    let wallpaper = match &args.output {
        Some(_) => None,
        None => {
            if !feh_available() {
                bail!("'feh' doesn't seem to be available in the system");
            }
            Some(args.placement.mode().unwrap_or_default())
        }
    };

    log::debug!("Using input file '{}'", input.display());
    let image = load_image(input)?;

    let config = args.config();
    log::debug!("Running colorize with {config:?}");
    let output = if args.preview {
        let preview = SwatchPreview::default();
        preview.show("theme", &sorted_unique(theme.colors().iter().copied()));
        colorize_with(&image, &theme, &config, &preview)
    } else {
        colorize(&image, &theme, &config)
    }
    .with_context(|| format!("failed to colorize {}", input.display()))?;

    let output_path = match &args.output {
        Some(path) => path.clone(),
        None => temp_output_path(input),
    };
    log::debug!("Using output path '{}'", output_path.display());
    save_image(&output, &output_path)?;

    if let Some(mode) = wallpaper {
        set_wallpaper(&output_path, mode)?;
    }

    log::debug!("Done. That took {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}
