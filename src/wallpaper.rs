use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};

/// How feh places the wallpaper on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BgMode {
    Center,
    Fill,
    Max,
    #[default]
    Scale,
    Tile,
}

impl BgMode {
    pub fn flag(self) -> &'static str {
        match self {
            BgMode::Center => "--bg-center",
            BgMode::Fill => "--bg-fill",
            BgMode::Max => "--bg-max",
            BgMode::Scale => "--bg-scale",
            BgMode::Tile => "--bg-tile",
        }
    }
}

/// Whether a `feh` binary can be started.
pub fn feh_available() -> bool {
    Command::new("feh")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// Temporary output path that keeps the input's extension so the encoder
/// picks the same format.
pub fn temp_output_path(input: &Path) -> PathBuf {
    let extension = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png");
    std::env::temp_dir().join(format!("mola-{}.{extension}", std::process::id()))
}

/// Set `image` as the desktop background with `feh --no-fehbg`.
pub fn set_wallpaper(image: &Path, mode: BgMode) -> Result<()> {
    let args = ["--no-fehbg", mode.flag()];
    log::debug!("Running feh with attributes: {args:?} {}", image.display());
    let status = Command::new("feh")
        .args(args)
        .arg(image)
        .status()
        .map_err(|err| match err.kind() {
            ErrorKind::NotFound => anyhow::anyhow!("'feh' doesn't seem to be available in the system"),
            _ => anyhow::Error::new(err),
        })
        .context("failed to run feh")?;
    if !status.success() {
        bail!("feh exited with {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_scales() {
        assert_eq!(BgMode::default().flag(), "--bg-scale");
    }

    #[test]
    fn flags_are_feh_options() {
        for mode in [BgMode::Center, BgMode::Fill, BgMode::Max, BgMode::Scale, BgMode::Tile] {
            assert!(mode.flag().starts_with("--bg-"));
        }
    }

    #[test]
    fn temp_path_keeps_extension() {
        let path = temp_output_path(Path::new("/photos/beach.jpg"));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("jpg"));
        assert!(path.starts_with(std::env::temp_dir()));
    }

    #[test]
    fn temp_path_defaults_to_png() {
        let path = temp_output_path(Path::new("photo"));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
    }
}
