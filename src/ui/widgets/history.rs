// src/ui/widgets/history.rs

use crate::app::App;
use crate::core::history::HISTORY_CAPACITY;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

/// Renders the most recent engagements, newest first.
pub fn render_history(frame: &mut Frame, app: &App, area: Rect) {
    let history = app.session.history();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Recent Engagements ({}/{})", history.len(), HISTORY_CAPACITY));

    if history.is_empty() {
        let placeholder = Paragraph::new("No engagements yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem> = history
        .list()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", entry.display_time()), Style::default().fg(Color::DarkGray)),
                Span::raw(entry.target.clone()),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
