use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{cli::Cli, data::textures::DEFAULT_TEXTURE_DIR, ui::surface::CellSize};

const DEFAULT_FPS: u8 = 30;
const MIN_FPS: u8 = 15;
const MAX_FPS: u8 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    pub fps: u8,
    pub assets_dir: PathBuf,
    pub cell: CellSize,
    pub animate: bool,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            assets_dir: PathBuf::from(DEFAULT_TEXTURE_DIR),
            cell: CellSize::default(),
            animate: true,
        }
    }
}

impl RuntimeSettings {
    pub fn from_cli_defaults(cli: &Cli) -> Self {
        Self {
            fps: cli.fps,
            assets_dir: cli
                .assets
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TEXTURE_DIR)),
            cell: CellSize {
                width_px: cli.cell_width,
                height_px: cli.cell_height,
            },
            animate: !cli.no_animation,
        }
    }
}

/// Resolves settings from the CLI and an optional settings file.
///
/// The file overrides CLI defaults; flags the user actually passed override
/// the file. An unreadable or malformed file is ignored, and out-of-range
/// values are clamped or reset to defaults.
pub fn load_runtime_settings(
    cli: &Cli,
    path: Option<PathBuf>,
) -> (RuntimeSettings, Option<PathBuf>) {
    let mut settings = RuntimeSettings::from_cli_defaults(cli);
    let Some(path) = path else {
        sanitize(&mut settings);
        return (settings, None);
    };

    if let Ok(content) = fs::read_to_string(&path) {
        match serde_json::from_str::<RuntimeSettings>(&content) {
            Ok(saved) => settings = saved,
            Err(err) => log::warn!("ignoring malformed settings {}: {err}", path.display()),
        }
    }

    let defaults = RuntimeSettings::default();
    if cli.fps != defaults.fps {
        settings.fps = cli.fps;
    }
    if let Some(assets) = &cli.assets {
        settings.assets_dir = assets.clone();
    }
    if cli.cell_width != defaults.cell.width_px {
        settings.cell.width_px = cli.cell_width;
    }
    if cli.cell_height != defaults.cell.height_px {
        settings.cell.height_px = cli.cell_height;
    }
    if cli.no_animation {
        settings.animate = false;
    }

    sanitize(&mut settings);
    (settings, Some(path))
}

fn sanitize(settings: &mut RuntimeSettings) {
    let fps = settings.fps.clamp(MIN_FPS, MAX_FPS);
    if fps != settings.fps {
        log::warn!("fps {} out of range, using {fps}", settings.fps);
        settings.fps = fps;
    }
    if !settings.cell.is_valid() {
        log::warn!(
            "invalid cell size {}x{}, using defaults",
            settings.cell.width_px,
            settings.cell.height_px
        );
        settings.cell = CellSize::default();
    }
}

pub fn save_runtime_settings(path: &Path, settings: &RuntimeSettings) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("creating settings directory failed")?;
    }
    let payload =
        serde_json::to_string_pretty(settings).context("serializing settings payload failed")?;
    fs::write(path, payload).context("writing settings file failed")
}

#[must_use]
pub fn settings_path() -> Option<PathBuf> {
    if let Some(base) = std::env::var_os("WEATHER_FX_CONFIG_DIR") {
        return Some(PathBuf::from(base).join("settings.json"));
    }

    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("weather-fx")
            .join("settings.json"),
    )
}
