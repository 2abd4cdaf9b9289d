// src/ui/widgets/footer.rs

use crate::app::{App, AppState, ExportStatus};
use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

fn key(label: &'static str) -> Span<'static> {
    Span::styled(label, Style::new().bold().fg(Color::Yellow))
}

/// Renders the footer: key hints, or the outcome of the last export.
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let line = match (&app.state, &app.export_status) {
        (AppState::Finished, ExportStatus::Success(path)) => Line::from(vec![
            Span::styled("Report saved: ", Style::new().fg(Color::Green)),
            Span::raw(path.clone()),
        ]),
        (AppState::Finished, ExportStatus::Error(e)) => Line::from(vec![
            Span::styled("Export failed: ", Style::new().fg(Color::Red)),
            Span::raw(e.clone()),
        ]),
        (AppState::Idle, _) => Line::from(vec![
            Span::raw("Press "),
            key("Enter"),
            Span::raw(" to engage, "),
            key("Esc"),
            Span::raw(" to quit."),
        ]),
        (AppState::Finished, ExportStatus::Idle) => Line::from(vec![
            key("[N]"),
            Span::raw("ew engagement, "),
            key("[E]"),
            Span::raw("xport audit, "),
            key("[J]"),
            Span::raw("SON export, "),
            key("[T]"),
            Span::raw("erminate, "),
            key("[Q]"),
            Span::raw("uit"),
        ]),
        (AppState::Scanning, _) => Line::from("Querying intelligence sources... Press Q to quit."),
    };

    let footer = Paragraph::new(line).alignment(Alignment::Center);
    frame.render_widget(footer, area);
}
