#![allow(clippy::missing_errors_doc)]

use std::path::PathBuf;

use clap::Parser;

use crate::ui::surface::CellSize;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "weather-fx",
    version,
    about = "Weather-driven particle effects for the terminal"
)]
pub struct Cli {
    /// Weather condition to show once textures are loaded (e.g. "light rain")
    #[arg(long)]
    pub condition: Option<String>,

    /// Target FPS (15..60)
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u8).range(15..=60))]
    pub fps: u8,

    /// Directory holding the particle textures
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Width of one terminal cell in surface pixels
    #[arg(long, default_value_t = 8.0)]
    pub cell_width: f32,

    /// Height of one terminal cell in surface pixels
    #[arg(long, default_value_t = 16.0)]
    pub cell_height: f32,

    /// Freeze particles instead of animating them
    #[arg(long)]
    pub no_animation: bool,

    /// Append logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Render one offscreen frame to stdout and exit (non-interactive)
    #[arg(long)]
    pub one_shot: bool,

    /// Frames to simulate before a one-shot render
    #[arg(long, default_value_t = 30)]
    pub frames: u32,
}

impl Cli {
    pub fn validate(&self) -> anyhow::Result<()> {
        let cell = CellSize {
            width_px: self.cell_width,
            height_px: self.cell_height,
        };
        if !cell.is_valid() {
            anyhow::bail!(
                "--cell-width and --cell-height must be positive and at most {}",
                CellSize::MAX_PX
            );
        }
        Ok(())
    }
}
