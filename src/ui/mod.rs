pub mod particles;
pub mod surface;
pub mod widgets;

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
};

use crate::{
    app::state::{AppMode, AppState},
    ui::surface::{ParticleLayer, sky_color},
};

/// Fits the particle surface to the frame area, then renders.
pub fn draw(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();
    state.engine.resize(area.width, area.height);
    render(frame, state);
}

/// Draws the scene back to front: sky, particle layer, HUD, prompt.
pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let kind = state
        .engine
        .session()
        .filter(|session| session.running)
        .map(|session| session.kind);

    frame.render_widget(
        Block::default().style(Style::default().bg(sky_color(kind))),
        area,
    );
    frame.render_widget(ParticleLayer::new(&state.engine), area);
    widgets::hud::render(frame, area, state);

    if state.mode == AppMode::EnteringCondition {
        let popup = centered_rect(60, 20, area);
        widgets::prompt::render(frame, popup, state);
    }
}

/// Plain-text rows of a rendered buffer, for one-shot output.
#[must_use]
pub fn buffer_lines(buffer: &Buffer) -> Vec<String> {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
