// src/ui/widgets/input.rs
use ratatui::{prelude::*, widgets::{Block, Borders, Paragraph}};
use crate::app::{App, AppState};
use crate::core::aggregator::EngagementStatus;

/// Renders the target entry box. The border turns green once the typed text
/// is a valid target and red after a rejected one.
pub fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let border_style = if matches!(app.state, AppState::Idle) && app.input_is_valid() {
        Style::default().fg(Color::Green)
    } else if app.session.status() == EngagementStatus::InvalidTarget {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title("Target (hostname or IPv4)");
    let input_paragraph = Paragraph::new(app.input.as_str())
        .block(input_block)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(input_paragraph, area);

    if let AppState::Idle = app.state {
        frame.set_cursor_position(Position::new(
            area.x + app.input.chars().count() as u16 + 1,
            area.y + 1,
        ));
    }
}
