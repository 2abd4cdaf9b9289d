// src/cli.rs

use clap::{ArgAction, Parser, ValueEnum};
use chrono::Utc;
use tracing::info;

use crate::core::aggregator::{EngagementStatus, FanoutAggregator};
use crate::core::error::ReconError;
use crate::core::report::{AuditDocument, ReportFormat};
use crate::core::session::EngagementSession;

#[derive(Parser, Debug, Clone)]
#[command(name = "reconguard", version, about = "Reconnaissance aggregation and risk reporting.")]
pub struct Cli {
    /// Run one engagement against this hostname or IPv4 address and print
    /// the audit document instead of starting the TUI
    #[arg(short = 't', long = "target")]
    pub target: Option<String>,

    /// Format of the printed audit document
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,

    /// Also write the document into the report directory
    #[arg(short = 'e', long = "export", action = ArgAction::SetTrue)]
    pub export: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Markdown => ReportFormat::Markdown,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

/// A finished one-shot engagement.
#[derive(Debug)]
pub struct OneShot {
    pub status: EngagementStatus,
    pub document: AuditDocument,
}

/// Runs a single engagement through a fresh session and renders its report.
///
/// An invalid target or an uplink failure leaves nothing to report and is
/// returned as an error.
pub async fn run_once(aggregator: &FanoutAggregator, input: &str) -> Result<OneShot, ReconError> {
    let mut session = EngagementSession::new();
    let status = session.execute(aggregator, input).await;
    info!(target = %input, status = %status, "One-shot engagement finished.");

    match status {
        EngagementStatus::InvalidTarget => Err(ReconError::InvalidTarget(input.to_string())),
        EngagementStatus::UplinkFailure => Err(ReconError::Uplink(format!("no intelligence gathered for {}", input))),
        _ => Ok(OneShot { status, document: session.report(Utc::now())? }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregator::tests::ScriptedSources;
    use crate::core::models::SourceResult;
    use std::sync::Arc;
    use std::time::Duration;

    fn aggregator(sources: ScriptedSources) -> FanoutAggregator {
        FanoutAggregator::new(Arc::new(sources), Duration::from_secs(5))
    }

    #[test]
    fn parses_one_shot_arguments() {
        let cli = Cli::try_parse_from(["reconguard", "-t", "example.com", "--format", "json", "--export"]).unwrap();
        assert_eq!(cli.target.as_deref(), Some("example.com"));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.export);
        assert_eq!(ReportFormat::from(cli.format), ReportFormat::Json);
    }

    #[test]
    fn no_target_means_interactive() {
        let cli = Cli::try_parse_from(["reconguard"]).unwrap();
        assert!(cli.target.is_none());
        assert_eq!(cli.format, OutputFormat::Markdown);
        assert!(!cli.export);
    }

    #[tokio::test]
    async fn restricted_engagement_still_produces_a_document() {
        let mut scripted = ScriptedSources::all_succeeding();
        scripted.scan = SourceResult::Denied("ETHICAL_GUARDRAIL".into());

        let outcome = run_once(&aggregator(scripted), "example.com").await.unwrap();
        assert_eq!(outcome.status, EngagementStatus::Restricted);
        assert!(outcome.document.scan_restricted);
        assert_eq!(outcome.document.target, "example.com");
    }

    #[tokio::test]
    async fn invalid_target_is_an_error() {
        let result = run_once(&aggregator(ScriptedSources::all_succeeding()), "://example.com").await;
        assert!(matches!(result, Err(ReconError::InvalidTarget(_))));
    }

    #[tokio::test]
    async fn uplink_failure_is_an_error() {
        let mut scripted = ScriptedSources::all_succeeding();
        scripted.uplink_error = Some("backend offline".into());
        let result = run_once(&aggregator(scripted), "example.com").await;
        assert!(matches!(result, Err(ReconError::Uplink(_))));
    }
}
