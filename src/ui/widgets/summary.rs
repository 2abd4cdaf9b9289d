// src/ui/widgets/summary.rs

use crate::app::{App, AppState};
use crate::core::aggregator::EngagementStatus;
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

fn status_style(status: EngagementStatus) -> Style {
    match status {
        EngagementStatus::Success => Style::default().fg(Color::Green),
        EngagementStatus::Restricted => Style::default().fg(Color::Yellow),
        EngagementStatus::InvalidTarget | EngagementStatus::UplinkFailure => Style::default().fg(Color::Red),
        EngagementStatus::Idle => Style::default().fg(Color::DarkGray),
    }
}

/// Renders the status label, tier counts and any degraded sources.
pub fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Summary");
    let status = app.session.status();

    let mut lines = vec![
        Line::from("STATUS".bold()),
        Line::from(Span::styled(status.to_string(), status_style(status))),
        Line::from(""),
    ];

    if matches!(app.state, AppState::Finished) && app.session.current().is_some() {
        let summary = &app.summary;
        lines.push(Line::from("OPEN PORTS".bold()));
        lines.push(Line::from(format!("Total: {}", summary.total_ports)));
        lines.push(Line::from(vec![
            Span::raw("Critical: "),
            Span::styled(summary.critical_ports.to_string(), Style::default().fg(Color::Red)),
        ]));
        lines.push(Line::from(vec![
            Span::raw("Warning: "),
            Span::styled(summary.warning_ports.to_string(), Style::default().fg(Color::Yellow)),
        ]));
        lines.push(Line::from(vec![
            Span::raw("Flagged: "),
            Span::styled(summary.flagged_ports.to_string(), Style::default().fg(Color::Magenta)),
        ]));
        lines.push(Line::from(""));

        if !summary.degraded_sources.is_empty() {
            lines.push(Line::from("DEGRADED SOURCES".bold()));
            for kind in &summary.degraded_sources {
                lines.push(Line::from(Span::styled(format!("✗ {kind}"), Style::default().fg(Color::Red))));
            }
        }
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
