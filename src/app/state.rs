use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;

use crate::{
    app::{
        events::{AppEvent, spawn_texture_load, start_frame_task},
        settings::{RuntimeSettings, save_runtime_settings},
    },
    cli::Cli,
    data::textures::TextureSet,
    domain::weather::Effect,
    ui::{
        particles::{FxError, ParticleEngine},
        surface::RenderSurface,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Loading,
    Ready,
    EnteringCondition,
    Quit,
}

#[derive(Debug)]
pub struct AppState {
    pub mode: AppMode,
    pub running: bool,
    pub settings: RuntimeSettings,
    pub settings_path: Option<PathBuf>,
    pub engine: ParticleEngine,
    pub effect: Effect,
    pub condition: Option<String>,
    pub condition_input: String,
    pub status: Option<String>,
    pub frame_tick: u64,
    pending_condition: Option<String>,
}

impl AppState {
    pub fn new(cli: &Cli, settings: RuntimeSettings, settings_path: Option<PathBuf>) -> Self {
        let surface = RenderSurface::new(0, 0, settings.cell);
        Self {
            mode: AppMode::Loading,
            running: true,
            settings,
            settings_path,
            engine: ParticleEngine::new(TextureSet::default(), surface),
            effect: Effect::Clear,
            condition: None,
            condition_input: String::new(),
            status: None,
            frame_tick: 0,
            pending_condition: cli.condition.clone(),
        }
    }

    pub async fn handle_event(
        &mut self,
        event: AppEvent,
        tx: &mpsc::Sender<AppEvent>,
    ) -> Result<()> {
        match event {
            AppEvent::Bootstrap => {
                if self.settings.animate {
                    start_frame_task(tx.clone(), self.settings.fps);
                }
                spawn_texture_load(tx.clone(), self.settings.assets_dir.clone());
            }
            AppEvent::TexturesLoaded(textures) => self.on_textures_loaded(textures),
            AppEvent::TickFrame => self.on_frame(),
            AppEvent::Input(event) => self.handle_input(event, tx).await?,
            AppEvent::ApplyCondition(condition) => self.apply_condition(&condition),
            AppEvent::Quit => {
                self.mode = AppMode::Quit;
            }
        }

        Ok(())
    }

    /// Installs the texture registry and applies any condition that was
    /// requested before loading finished.
    pub fn on_textures_loaded(&mut self, textures: TextureSet) {
        self.engine.install_textures(textures);
        if self.mode == AppMode::Loading {
            self.mode = AppMode::Ready;
        }
        self.status = self.texture_status();
        if let Some(condition) = self.pending_condition.take() {
            self.apply_condition(&condition);
        }
    }

    pub fn on_frame(&mut self) {
        self.engine.update();
        self.frame_tick = self.frame_tick.saturating_add(1);
    }

    pub fn apply_condition(&mut self, condition: &str) {
        match self.engine.apply_weather_effects(condition) {
            Ok(effect) => {
                self.effect = effect;
                self.condition = Some(condition.to_string());
                self.status = self.texture_status();
            }
            Err(err) => self.report(err),
        }
    }

    fn start(&mut self, effect: Effect) {
        let result = match effect {
            Effect::Rain => self.engine.start_rain(),
            Effect::Snow => self.engine.start_snow(),
            Effect::Cloud => self.engine.start_cloudy(),
            Effect::Clear => {
                self.engine.clear_effects();
                Ok(())
            }
        };
        match result {
            Ok(()) => {
                self.effect = effect;
                self.condition = None;
                self.status = self.texture_status();
            }
            Err(err) => self.report(err),
        }
    }

    /// Placeholder warning, shown for as long as the installed set has any.
    fn texture_status(&self) -> Option<String> {
        let placeholders = self.engine.textures().placeholder_count();
        (placeholders > 0)
            .then(|| format!("{placeholders} texture(s) missing, using placeholders"))
    }

    fn report(&mut self, err: FxError) {
        log::error!("effect change rejected: {err}");
        self.status = Some(err.to_string());
    }

    async fn handle_input(&mut self, event: Event, tx: &mpsc::Sender<AppEvent>) -> Result<()> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if self.mode == AppMode::EnteringCondition {
                    self.handle_prompt_key(key, tx).await?;
                } else {
                    self.handle_hotkey(key, tx).await?;
                }
            }
            Event::Resize(columns, rows) => self.engine.resize(columns, rows),
            _ => {}
        }

        Ok(())
    }

    async fn handle_hotkey(&mut self, key: KeyEvent, tx: &mpsc::Sender<AppEvent>) -> Result<()> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                tx.send(AppEvent::Quit).await?;
            }
            KeyCode::Char('r') => self.start(Effect::Rain),
            KeyCode::Char('s') => self.start(Effect::Snow),
            KeyCode::Char('c') => self.start(Effect::Cloud),
            KeyCode::Char('x') => self.start(Effect::Clear),
            KeyCode::Char('/') => {
                self.condition_input.clear();
                self.mode = AppMode::EnteringCondition;
            }
            KeyCode::Char('w') => self.save_settings(),
            _ => {}
        }
        Ok(())
    }

    async fn handle_prompt_key(
        &mut self,
        key: KeyEvent,
        tx: &mpsc::Sender<AppEvent>,
    ) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.condition_input.clear();
                self.mode = self.idle_mode();
            }
            KeyCode::Enter => {
                let condition = std::mem::take(&mut self.condition_input);
                self.mode = self.idle_mode();
                tx.send(AppEvent::ApplyCondition(condition)).await?;
            }
            KeyCode::Backspace => {
                self.condition_input.pop();
            }
            KeyCode::Char(ch) if is_condition_char(ch) => {
                self.condition_input.push(ch);
            }
            _ => {}
        }
        Ok(())
    }

    fn idle_mode(&self) -> AppMode {
        if self.engine.textures().is_empty() {
            AppMode::Loading
        } else {
            AppMode::Ready
        }
    }

    fn save_settings(&mut self) {
        let Some(path) = self.settings_path.clone() else {
            self.status = Some("no settings path available".to_string());
            return;
        };
        self.status = Some(match save_runtime_settings(&path, &self.settings) {
            Ok(()) => format!("settings saved to {}", path.display()),
            Err(err) => {
                log::error!("saving settings failed: {err:#}");
                format!("saving settings failed: {err}")
            }
        });
    }
}

pub(crate) fn is_condition_char(ch: char) -> bool {
    !ch.is_control()
}

#[cfg(test)]
mod tests;
