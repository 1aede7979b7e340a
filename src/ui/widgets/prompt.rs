use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::state::AppState;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Condition (Enter apply, Esc cancel)")
        .style(Style::default().fg(Color::White).bg(Color::Black));
    let text = format!("{}_", state.condition_input);
    frame.render_widget(Paragraph::new(text).block(block), area);
}
