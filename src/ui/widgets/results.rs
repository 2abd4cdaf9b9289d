// src/ui/widgets/results.rs

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, Wrap},
};
use chrono::Utc;
use crate::app::{App, AppState, SPINNER_CHARS};
use crate::core::report::AuditDocument;
use crate::core::risk::RiskTier;

/// Renders the audit view: instructions, a spinner, or the rendered document.
pub fn render_results(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Audit Report (Navigate with ↑ ↓)");

    match app.state {
        AppState::Idle => {
            let instructions = Paragraph::new(
                "Enter a hostname or IPv4 address and press Enter to start an engagement.",
            )
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
            frame.render_widget(instructions, area);
        }
        AppState::Scanning => {
            let spinner_char = SPINNER_CHARS[app.spinner_frame];
            let content = Paragraph::new(Line::from(vec![
                Span::styled(format!("{} ", spinner_char), Style::default().fg(Color::Cyan)),
                Span::raw("Aggregating geo, dns, whois and scan intelligence..."),
            ]))
            .block(block)
            .alignment(Alignment::Center);
            frame.render_widget(content, area);
        }
        AppState::Finished => match app.session.report(Utc::now()) {
            Ok(document) => {
                let mut lines = build_report_lines(&document);
                if let Some(target) = app.session.target() {
                    lines.insert(2, Line::from(vec![
                        Span::styled("Target ", Style::default().fg(Color::DarkGray)),
                        Span::raw(format!("{} ({})", target, target.kind())),
                    ]));
                }
                app.report_scroll_state = app.report_scroll_state.content_length(lines.len());
                let paragraph = Paragraph::new(lines)
                    .block(block)
                    .scroll((app.scroll_offset as u16, 0));
                frame.render_widget(paragraph, area);
                frame.render_stateful_widget(
                    Scrollbar::new(ScrollbarOrientation::VerticalRight),
                    area.inner(Margin { vertical: 1, horizontal: 0 }),
                    &mut app.report_scroll_state,
                );
            }
            Err(e) => {
                let message = Paragraph::new(vec![
                    Line::from(Span::styled(app.session.status().to_string(), Style::default().fg(Color::Red).bold())),
                    Line::from(""),
                    Line::from(e.to_string()),
                ])
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
                frame.render_widget(message, area);
            }
        },
    }
}

fn tier_style(tier: RiskTier) -> Style {
    match tier {
        RiskTier::Critical => Style::default().fg(Color::Red).bold(),
        RiskTier::Warning => Style::default().fg(Color::Yellow),
        RiskTier::Standard => Style::default().fg(Color::Cyan),
    }
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(text.to_string(), Style::default().bold().underlined()))
}

fn build_report_lines(document: &AuditDocument) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(document.title.clone(), Style::default().fg(Color::Green).bold())),
        Line::from(Span::styled(
            format!("Generated {}", document.generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        heading("1. GEOGRAPHICAL INTELLIGENCE"),
    ];

    for row in &document.geo_intelligence {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<14}", row.field), Style::default().fg(Color::DarkGray)),
            Span::raw(row.value.clone()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(heading("2. SERVICE VULNERABILITY MATRIX"));
    if document.scan_restricted {
        lines.push(Line::from(Span::styled(
            "Port scan restricted by the intelligence backend.",
            Style::default().fg(Color::Yellow),
        )));
    } else if document.vulnerability_matrix.is_empty() {
        lines.push(Line::from("No open services reported."));
    }
    for row in &document.vulnerability_matrix {
        lines.push(Line::from(vec![
            Span::styled(format!("{:>6} ", row.port), tier_style(row.tier)),
            Span::raw(format!("{:<14}", row.service)),
            Span::styled(format!("{:<9}", row.risk_status), tier_style(row.tier)),
            Span::raw(format!("[{}] ", row.tier)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("       {}", row.advisory),
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines.push(Line::from(""));
    lines.push(heading("3. DNS RECORDS"));
    if document.dns_records.is_empty() {
        lines.push(Line::from("No records"));
    }
    for row in &document.dns_records {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<4}", row.record_type), Style::default().fg(Color::Cyan)),
            Span::raw(row.value.clone()),
        ]));
    }

    lines
}
