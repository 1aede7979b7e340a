use std::path::PathBuf;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use image::RgbaImage;
use tokio::sync::mpsc;

use super::{AppMode, AppState, is_condition_char};
use crate::{
    app::{events::AppEvent, settings::RuntimeSettings},
    data::textures::{Texture, TextureKey, TextureSet},
    domain::weather::{Effect, ParticleKind},
    test_support::test_cli,
};

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Input(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
}

fn ready_state() -> AppState {
    let mut state = AppState::new(&test_cli(), RuntimeSettings::default(), None);
    state.engine.resize(80, 24);
    state.on_textures_loaded(TextureSet::placeholders());
    state
}

#[test]
fn condition_input_rejects_control_chars() {
    assert!(is_condition_char('r'));
    assert!(is_condition_char(' '));
    assert!(!is_condition_char('\n'));
}

#[test]
fn pending_condition_applies_once_textures_load() {
    let mut cli = test_cli();
    cli.condition = Some("Snow".to_string());
    let mut state = AppState::new(&cli, RuntimeSettings::default(), None);
    state.engine.resize(80, 24);
    assert_eq!(state.mode, AppMode::Loading);
    assert!(state.engine.particles().is_empty());

    state.on_textures_loaded(TextureSet::placeholders());
    assert_eq!(state.mode, AppMode::Ready);
    assert_eq!(state.effect, Effect::Snow);
    assert_eq!(state.condition.as_deref(), Some("Snow"));
    assert_eq!(state.engine.particles().len(), 50);
}

#[test]
fn placeholder_textures_are_reported() {
    let state = ready_state();
    assert_eq!(
        state.status.as_deref(),
        Some("4 texture(s) missing, using placeholders")
    );
}

#[test]
fn placeholder_warning_survives_the_initial_condition() {
    let mut cli = test_cli();
    cli.condition = Some("light rain".to_string());
    let mut state = AppState::new(&cli, RuntimeSettings::default(), None);
    state.engine.resize(80, 24);

    state.on_textures_loaded(TextureSet::placeholders());
    assert_eq!(state.effect, Effect::Rain);
    assert_eq!(
        state.status.as_deref(),
        Some("4 texture(s) missing, using placeholders")
    );

    state.apply_condition("snow");
    assert_eq!(
        state.status.as_deref(),
        Some("4 texture(s) missing, using placeholders")
    );
}

#[test]
fn loaded_textures_leave_no_status() {
    let mut textures = TextureSet::default();
    for key in TextureKey::ALL {
        textures.insert(
            key,
            Texture::from_image(RgbaImage::new(8, 8), PathBuf::from(key.file_name())),
        );
    }
    let mut cli = test_cli();
    cli.condition = Some("rain".to_string());
    let mut state = AppState::new(&cli, RuntimeSettings::default(), None);
    state.engine.resize(80, 24);

    state.on_textures_loaded(textures);
    assert_eq!(state.effect, Effect::Rain);
    assert!(state.status.is_none());
}

#[tokio::test]
async fn hotkey_before_textures_reports_missing_texture() {
    let (tx, _rx) = mpsc::channel(8);
    let mut state = AppState::new(&test_cli(), RuntimeSettings::default(), None);
    state
        .handle_event(key(KeyCode::Char('r')), &tx)
        .await
        .expect("handle key");
    assert_eq!(
        state.status.as_deref(),
        Some("no texture loaded for rain particles")
    );
    assert!(state.engine.particles().is_empty());
}

#[tokio::test]
async fn hotkeys_switch_effects() {
    let (tx, _rx) = mpsc::channel(8);
    let mut state = ready_state();

    state
        .handle_event(key(KeyCode::Char('r')), &tx)
        .await
        .expect("rain");
    assert_eq!(state.effect, Effect::Rain);
    assert_eq!(state.engine.particles().len(), 100);

    state
        .handle_event(key(KeyCode::Char('c')), &tx)
        .await
        .expect("cloudy");
    assert_eq!(state.effect, Effect::Cloud);
    assert!(
        state
            .engine
            .particles()
            .iter()
            .all(|p| p.kind() == ParticleKind::Cloud)
    );

    state
        .handle_event(key(KeyCode::Char('x')), &tx)
        .await
        .expect("clear");
    assert_eq!(state.effect, Effect::Clear);
    assert!(!state.engine.is_running());
}

#[tokio::test]
async fn prompt_submits_condition_through_the_channel() {
    let (tx, mut rx) = mpsc::channel(8);
    let mut state = ready_state();

    state
        .handle_event(key(KeyCode::Char('/')), &tx)
        .await
        .expect("open prompt");
    assert_eq!(state.mode, AppMode::EnteringCondition);
    for ch in "drizzlee".chars() {
        state
            .handle_event(key(KeyCode::Char(ch)), &tx)
            .await
            .expect("type");
    }
    state
        .handle_event(key(KeyCode::Backspace), &tx)
        .await
        .expect("backspace");
    state
        .handle_event(key(KeyCode::Enter), &tx)
        .await
        .expect("submit");
    assert_eq!(state.mode, AppMode::Ready);

    let event = rx.recv().await.expect("condition event");
    let condition = match event {
        AppEvent::ApplyCondition(condition) => condition,
        other => panic!("unexpected event {other:?}"),
    };
    assert_eq!(condition, "drizzle");

    state
        .handle_event(AppEvent::ApplyCondition(condition), &tx)
        .await
        .expect("apply");
    assert_eq!(state.effect, Effect::Rain);
}

#[tokio::test]
async fn prompt_escape_cancels_without_quitting() {
    let (tx, mut rx) = mpsc::channel(8);
    let mut state = ready_state();
    state
        .handle_event(key(KeyCode::Char('/')), &tx)
        .await
        .expect("open prompt");
    state
        .handle_event(key(KeyCode::Char('q')), &tx)
        .await
        .expect("type q");
    state
        .handle_event(key(KeyCode::Esc), &tx)
        .await
        .expect("cancel");

    assert_eq!(state.mode, AppMode::Ready);
    assert!(state.condition_input.is_empty());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn resize_keeps_running_effect() {
    let (tx, _rx) = mpsc::channel(8);
    let mut state = ready_state();
    state.apply_condition("rain");
    state
        .handle_event(AppEvent::Input(Event::Resize(120, 40)), &tx)
        .await
        .expect("resize");

    assert_eq!(state.engine.surface().columns(), 120);
    assert_eq!(state.engine.particles().len(), 100);
    assert!(state.engine.is_running());
}

#[tokio::test]
async fn quit_key_sends_quit_event() {
    let (tx, mut rx) = mpsc::channel(8);
    let mut state = ready_state();
    state
        .handle_event(key(KeyCode::Char('q')), &tx)
        .await
        .expect("quit key");
    let event = rx.recv().await.expect("quit event");
    state.handle_event(event, &tx).await.expect("quit");
    assert_eq!(state.mode, AppMode::Quit);
}

#[tokio::test]
async fn bootstrap_loads_placeholders_for_missing_assets() {
    let (tx, mut rx) = mpsc::channel(8);
    let dir = tempfile::TempDir::new().expect("temp dir");
    let settings = RuntimeSettings {
        assets_dir: dir.path().join("missing"),
        animate: false,
        ..RuntimeSettings::default()
    };
    let mut state = AppState::new(&test_cli(), settings, None);
    state
        .handle_event(AppEvent::Bootstrap, &tx)
        .await
        .expect("bootstrap");

    let event = rx.recv().await.expect("textures event");
    let textures = match event {
        AppEvent::TexturesLoaded(textures) => textures,
        other => panic!("unexpected event {other:?}"),
    };
    assert_eq!(textures.placeholder_count(), 4);
}

#[test]
fn save_without_path_sets_status() {
    let mut state = ready_state();
    state.save_settings();
    assert_eq!(state.status.as_deref(), Some("no settings path available"));
}

#[test]
fn save_with_path_writes_file() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let path = dir.path().join("settings.json");
    let mut state = ready_state();
    state.settings_path = Some(path.clone());
    state.save_settings();
    assert!(path.exists());
    assert!(
        state
            .status
            .as_deref()
            .is_some_and(|status| status.starts_with("settings saved"))
    );
}

#[test]
fn frames_advance_the_engine() {
    let mut state = ready_state();
    state.apply_condition("rain");
    let before = state.engine.particles()[0].y;
    state.on_frame();
    assert_eq!(state.frame_tick, 1);
    assert!(state.engine.particles()[0].y > before);
}
