use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::state::{AppMode, AppState};

const PANEL_WIDTH: u16 = 44;
const PANEL_HEIGHT: u16 = 6;
const HELP: &str = "r rain  s snow  c cloudy  x clear  / condition  w save  q quit";

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    if area.width < 12 || area.height < 3 {
        return;
    }

    let panel = Rect {
        x: area.x + 1,
        y: area.y,
        width: PANEL_WIDTH.min(area.width.saturating_sub(2)),
        height: PANEL_HEIGHT.min(area.height.saturating_sub(1)),
    };
    frame.render_widget(Clear, panel);
    let block = Block::default()
        .borders(Borders::ALL)
        .title("weather-fx")
        .style(Style::default().fg(Color::White).bg(Color::Black));
    frame.render_widget(Paragraph::new(panel_lines(state)).block(block), panel);

    let help_area = Rect {
        x: area.x,
        y: area.bottom() - 1,
        width: area.width,
        height: 1,
    };
    frame.render_widget(Clear, help_area);
    frame.render_widget(
        Paragraph::new(HELP).style(Style::default().fg(Color::Gray)),
        help_area,
    );
}

fn panel_lines(state: &AppState) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Gray);
    let value = Style::default().add_modifier(Modifier::BOLD);

    let condition = state.condition.clone().unwrap_or_else(|| "--".to_string());
    let particles = state.engine.particles().len();
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Condition ", label),
            Span::styled(condition, value),
        ]),
        Line::from(vec![
            Span::styled("Effect    ", label),
            Span::styled(format!("{} ({particles} particles)", state.effect), value),
        ]),
    ];

    if state.mode == AppMode::Loading {
        lines.push(Line::styled(
            "Loading textures...",
            Style::default().fg(Color::Cyan),
        ));
    }
    if let Some(status) = &state.status {
        lines.push(Line::styled(
            status.clone(),
            Style::default().fg(Color::Yellow),
        ));
    }
    lines
}
