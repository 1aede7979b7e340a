pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod logging;
pub mod ui;

#[cfg(test)]
pub(crate) mod test_support;

use std::io::{self, Stdout, Write};

use anyhow::{Context, Result};
use app::events::{AppEvent, spawn_input_task};
use app::settings::{RuntimeSettings, load_runtime_settings, settings_path};
use app::state::{AppMode, AppState};
use cli::Cli;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{
    Terminal,
    backend::{CrosstermBackend, TestBackend},
};
use tokio::sync::mpsc;

const ONE_SHOT_COLUMNS: u16 = 80;
const ONE_SHOT_ROWS: u16 = 24;

pub async fn run(cli: Cli) -> Result<()> {
    cli.validate()?;
    logging::init(&cli)?;
    let (settings, path) = load_runtime_settings(&cli, settings_path());

    if cli.one_shot {
        let lines = render_one_shot(&cli, settings).await?;
        let mut stdout = io::stdout().lock();
        for line in lines {
            writeln!(stdout, "{line}")?;
        }
        return Ok(());
    }

    let mut terminal = setup_terminal()?;
    let result = run_inner(&mut terminal, &cli, settings, path).await;
    restore_terminal(&mut terminal)?;
    result
}

/// Loads textures, applies the CLI condition, advances `cli.frames` frames
/// and returns the rendered offscreen screen as text.
pub async fn render_one_shot(cli: &Cli, settings: RuntimeSettings) -> Result<Vec<String>> {
    let textures = data::textures::load_textures(&settings.assets_dir).await;
    let mut app = AppState::new(cli, settings, None);
    app.engine.resize(ONE_SHOT_COLUMNS, ONE_SHOT_ROWS);
    app.on_textures_loaded(textures);
    for _ in 0..cli.frames {
        app.on_frame();
    }

    let mut terminal = Terminal::new(TestBackend::new(ONE_SHOT_COLUMNS, ONE_SHOT_ROWS))
        .context("creating offscreen terminal failed")?;
    terminal.draw(|frame| ui::draw(frame, &mut app))?;
    Ok(ui::buffer_lines(terminal.backend().buffer()))
}

async fn run_inner(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    cli: &Cli,
    settings: RuntimeSettings,
    settings_path: Option<std::path::PathBuf>,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<AppEvent>(256);
    let input_stream = spawn_input_task();
    tokio::pin!(input_stream);
    let mut app = AppState::new(cli, settings, settings_path);

    let size = terminal.size()?;
    app.engine.resize(size.width, size.height);
    tx.send(AppEvent::Bootstrap).await?;

    while app.running {
        tokio::select! {
            maybe_input = input_stream.next() => {
                if let Some(input) = maybe_input {
                    app.handle_event(AppEvent::Input(input), &tx).await?;
                }
            }
            maybe_event = rx.recv() => {
                if let Some(event) = maybe_event {
                    app.handle_event(event, &tx).await?;
                }
            }
        }

        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        if app.mode == AppMode::Quit {
            app.running = false;
        }
    }

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    install_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn install_panic_hook() {
    let existing = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
        existing(panic);
    }));
}
