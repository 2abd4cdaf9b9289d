// src/app.rs

use crate::core::aggregator::EngagementStatus;
use crate::core::models::{AggregateResult, SourceKind};
use crate::core::report::ReportFormat;
use crate::core::risk::{self, RiskTier};
use crate::core::session::EngagementSession;
use crate::core::target::{self, Target};
use chrono::Utc;
use tracing::info;
use ratatui::widgets::ScrollbarState;
use std::path::PathBuf;

pub const SPINNER_CHARS: [char; 4] = ['|', '/', '-', '\\'];

pub enum ExportStatus {
    Idle,
    Success(String),
    Error(String),
}

pub enum AppState {
    Idle,
    Scanning,
    Finished,
}

/// Counts shown in the summary panel, derived from the held result.
#[derive(Debug, Default)]
pub struct EngagementSummary {
    pub critical_ports: usize,
    pub warning_ports: usize,
    pub flagged_ports: usize,
    pub total_ports: usize,
    pub degraded_sources: Vec<SourceKind>,
}

pub struct App {
    pub should_quit: bool,
    pub state: AppState,
    pub input: String,
    pub session: EngagementSession,
    pub summary: EngagementSummary,
    pub scroll_offset: usize,
    pub report_scroll_state: ScrollbarState,
    pub export_status: ExportStatus,
    pub report_dir: PathBuf,
    pub spinner_frame: usize,
}

impl App {
    pub fn new(report_dir: PathBuf) -> Self {
        Self {
            should_quit: false,
            state: AppState::Idle,
            input: String::new(),
            session: EngagementSession::new(),
            summary: EngagementSummary::default(),
            scroll_offset: 0,
            report_scroll_state: ScrollbarState::default(),
            export_status: ExportStatus::Idle,
            report_dir,
            spinner_frame: 0,
        }
    }

    /// Whether the text typed so far is an acceptable target.
    pub fn input_is_valid(&self) -> bool {
        target::validate(&self.input)
    }

    /// Opens an engagement for the typed target and switches to `Scanning`.
    ///
    /// Returns `None` when one is already in flight or the target is
    /// rejected; the session status then shows why.
    pub fn begin_engagement(&mut self) -> Option<Target> {
        if self.session.is_in_flight() || self.input.is_empty() {
            return None;
        }
        match self.session.begin(&self.input) {
            Ok(target) => {
                self.state = AppState::Scanning;
                self.summary = EngagementSummary::default();
                self.export_status = ExportStatus::Idle;
                Some(target)
            }
            Err(e) => {
                info!(error = %e, "Engagement not started.");
                None
            }
        }
    }

    /// Applies an outcome delivered by the engagement task.
    pub fn finish_engagement(&mut self, target: Target, result: Option<AggregateResult>, status: EngagementStatus) {
        self.session.complete(target, result, status);
        self.state = AppState::Finished;
        self.update_summary();
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
        self.report_scroll_state = self.report_scroll_state.position(self.scroll_offset);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
        self.report_scroll_state = self.report_scroll_state.position(self.scroll_offset);
    }

    pub fn update_summary(&mut self) {
        self.summary = match self.session.current() {
            Some(result) => {
                let ports = result.scan.ports();
                let tiers: Vec<_> = ports.iter().map(|p| risk::tier_for(&p.port)).collect();
                EngagementSummary {
                    critical_ports: tiers.iter().filter(|t| **t == RiskTier::Critical).count(),
                    warning_ports: tiers.iter().filter(|t| **t == RiskTier::Warning).count(),
                    flagged_ports: ports.iter().filter(|p| risk::is_flagged(&p.port)).count(),
                    total_ports: ports.len(),
                    degraded_sources: result.degraded.clone(),
                }
            }
            None => EngagementSummary::default(),
        };
    }

    pub fn on_tick(&mut self) {
        if matches!(self.state, AppState::Scanning) {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
        }
    }

    pub fn quit(&mut self) { self.should_quit = true; }

    /// Renders the held result and writes it into the report directory.
    pub fn export_report(&mut self, format: ReportFormat) {
        self.export_status = match self.session.report(Utc::now()).and_then(|doc| doc.export(&self.report_dir, format)) {
            Ok(path) => ExportStatus::Success(path.display().to_string()),
            Err(e) => ExportStatus::Error(e.to_string()),
        };
    }

    /// Back to target entry for a new engagement. History is kept.
    pub fn reset(&mut self) {
        self.state = AppState::Idle;
        self.input = String::new();
        self.scroll_offset = 0;
        self.report_scroll_state = ScrollbarState::default();
        self.export_status = ExportStatus::Idle;
    }

    /// Ends the engagement: clears the session, including its history.
    pub fn terminate(&mut self) {
        self.session.terminate();
        self.summary = EngagementSummary::default();
        self.reset();
    }
}
