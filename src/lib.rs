pub mod cli;
pub mod color;
pub mod error;
pub mod image_io;
pub mod pipeline;
pub mod presets;
pub mod preview;
pub mod theme;
pub mod wallpaper;

pub use color::{Color, DistanceMetric};
pub use error::{Error, Result};
pub use pipeline::{colorize, colorize_with, ColorizeConfig, Granularity, PipelineObserver};
pub use theme::Theme;
