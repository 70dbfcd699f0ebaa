use thiserror::Error;

/// Errors surfaced by the colorizing pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("a theme needs between 3 and 256 distinct colors ({count} given)")]
    InvalidTheme { count: usize },

    #[error("precision must be in range (0, 1] ({0} given)")]
    InvalidPrecision(f32),

    #[error("degenerate image in {stage}: {reason}")]
    DegenerateImage {
        stage: &'static str,
        reason: &'static str,
    },

    #[error("invalid hex color '{0}': expected #RGB or #RRGGBB")]
    InvalidHex(String),
}

pub type Result<T> = std::result::Result<T, Error>;
