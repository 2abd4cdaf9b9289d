// src/core/session.rs

use tracing::{debug, info, warn};

use crate::core::aggregator::{EngagementStatus, FanoutAggregator};
use crate::core::error::ReconError;
use crate::core::history::{EngagementHistory, EngagementHistoryEntry};
use crate::core::models::AggregateResult;
use crate::core::report::{self, AuditDocument};
use crate::core::target::Target;
use chrono::{DateTime, Utc};

/// The state of one operator's engagements: current target, current result,
/// derived status and history. All transitions go through this API.
///
/// Single-writer: one engagement may be in flight at a time, and a second
/// `begin` while one is outstanding is rejected.
#[derive(Debug, Default)]
pub struct EngagementSession {
    target: Option<Target>,
    current: Option<AggregateResult>,
    status: EngagementStatus,
    history: EngagementHistory,
    in_flight: bool,
}

impl EngagementSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `input` and opens an engagement for it.
    ///
    /// The previous result is discarded once the target is accepted. An
    /// invalid target leaves the session in `InvalidTarget` with the previous
    /// result intact, no history entry and nothing in flight.
    pub fn begin(&mut self, input: &str) -> Result<Target, ReconError> {
        if self.in_flight {
            let outstanding = self.target.as_ref().map(|t| t.to_string()).unwrap_or_default();
            warn!(outstanding = %outstanding, requested = %input, "Rejected engagement while another is in flight.");
            return Err(ReconError::EngagementInFlight(outstanding));
        }

        let target = match Target::parse(input) {
            Ok(target) => target,
            Err(e) => {
                info!(input = %input, "Target failed validation.");
                self.status = EngagementStatus::InvalidTarget;
                return Err(e);
            }
        };

        debug!(target = %target, "Engagement opened.");
        self.current = None;
        self.target = Some(target.clone());
        self.status = EngagementStatus::Idle;
        self.in_flight = true;
        Ok(target)
    }

    /// Stores the outcome of the engagement opened by `begin` and records it
    /// in the history. Outcomes arriving after `terminate` are dropped.
    pub fn complete(&mut self, target: Target, result: Option<AggregateResult>, status: EngagementStatus) {
        if !self.in_flight {
            warn!(target = %target, status = %status, "Dropped outcome of an engagement that is no longer open.");
            return;
        }
        if status != EngagementStatus::InvalidTarget {
            self.history.record(EngagementHistoryEntry::new(target.as_str(), Utc::now()));
        }
        info!(target = %target, status = %status, "Engagement recorded.");
        self.target = Some(target);
        self.current = result;
        self.status = status;
        self.in_flight = false;
    }

    /// Runs a full engagement: validate, fan out, consolidate, record.
    pub async fn execute(&mut self, aggregator: &FanoutAggregator, input: &str) -> EngagementStatus {
        let target = match self.begin(input) {
            Ok(target) => target,
            Err(ReconError::InvalidTarget(_)) => return EngagementStatus::InvalidTarget,
            // Only `EngagementInFlight` remains; the outstanding one keeps its status.
            Err(_) => return self.status,
        };
        let (result, status) = aggregator.run(&target).await;
        self.complete(target, result, status);
        status
    }

    /// Explicitly ends the engagement: discards the result and the history.
    pub fn terminate(&mut self) {
        info!("Engagement terminated, clearing session state.");
        self.target = None;
        self.current = None;
        self.status = EngagementStatus::Idle;
        self.history.clear();
        self.in_flight = false;
    }

    /// Renders the audit document from the held result.
    pub fn report(&self, generated_at: DateTime<Utc>) -> Result<AuditDocument, ReconError> {
        let target = self.target.as_ref().ok_or(ReconError::ReportPrecondition)?;
        report::render(target, self.current.as_ref(), generated_at)
    }

    pub fn status(&self) -> EngagementStatus {
        self.status
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    pub fn current(&self) -> Option<&AggregateResult> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &EngagementHistory {
        &self.history
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregator::tests::ScriptedSources;
    use crate::core::models::{ServicePort, SourceResult};
    use crate::core::report::DEFAULT_REGISTRAR;
    use crate::core::risk::{self, RiskTier};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::time::Duration;

    fn aggregator_over(sources: ScriptedSources) -> (FanoutAggregator, Arc<ScriptedSources>) {
        let sources = Arc::new(sources);
        (FanoutAggregator::new(sources.clone(), Duration::from_secs(5)), sources)
    }

    #[tokio::test]
    async fn critical_port_is_flagged_in_the_report() {
        let mut scripted = ScriptedSources::all_succeeding();
        scripted.scan = SourceResult::Success(vec![ServicePort::new("445", "smb")]);
        let (aggregator, _) = aggregator_over(scripted);
        let mut session = EngagementSession::new();

        let status = session.execute(&aggregator, "example.com").await;
        assert_eq!(status, EngagementStatus::Success);
        assert_eq!(risk::classify("445").tier, RiskTier::Critical);

        let doc = session.report(Utc::now()).unwrap();
        let row = &doc.vulnerability_matrix[0];
        assert_eq!(row.port, "445");
        assert_eq!(row.risk_status, "FLAGGED");
        assert_eq!(row.tier, RiskTier::Critical);
        assert_eq!(Some(row.advisory.as_str()), risk::classify("445").advisory);
        assert_eq!(session.history().len(), 1);
    }

    #[tokio::test]
    async fn denied_scan_still_reports_other_sources() {
        let mut scripted = ScriptedSources::all_succeeding();
        scripted.scan = SourceResult::Denied("ETHICAL_GUARDRAIL".into());
        scripted.whois = SourceResult::Failure("unsupported TLD".into());
        let (aggregator, _) = aggregator_over(scripted);
        let mut session = EngagementSession::new();

        let status = session.execute(&aggregator, "10.0.0.5").await;
        assert_eq!(status, EngagementStatus::Restricted);
        assert_eq!(session.status(), EngagementStatus::Restricted);

        let doc = session.report(Utc::now()).unwrap();
        assert!(doc.scan_restricted);
        assert!(doc.vulnerability_matrix.is_empty());
        assert_eq!(doc.geo_intelligence[0].value, "Edgecast Inc.");
        assert_eq!(doc.geo_intelligence[3].value, DEFAULT_REGISTRAR);
    }

    #[tokio::test]
    async fn invalid_target_issues_no_query_and_records_nothing() {
        let (aggregator, sources) = aggregator_over(ScriptedSources::all_succeeding());
        let mut session = EngagementSession::new();

        let status = session.execute(&aggregator, "not a host").await;
        assert_eq!(status, EngagementStatus::InvalidTarget);
        assert_eq!(session.status(), EngagementStatus::InvalidTarget);
        assert_eq!(sources.calls.load(Ordering::SeqCst), 0);
        assert!(session.history().is_empty());
        assert!(!session.is_in_flight());
        assert!(matches!(session.report(Utc::now()), Err(ReconError::ReportPrecondition)));
    }

    #[tokio::test]
    async fn uplink_failure_is_recorded_without_a_result() {
        let mut scripted = ScriptedSources::all_succeeding();
        scripted.uplink_error = Some("backend offline".into());
        let (aggregator, _) = aggregator_over(scripted);
        let mut session = EngagementSession::new();

        let status = session.execute(&aggregator, "example.com").await;
        assert_eq!(status, EngagementStatus::UplinkFailure);
        assert!(session.current().is_none());
        assert_eq!(session.history().len(), 1);
        assert!(matches!(session.report(Utc::now()), Err(ReconError::ReportPrecondition)));
    }

    #[test]
    fn second_begin_while_in_flight_is_rejected() {
        let mut session = EngagementSession::new();
        let first = session.begin("example.com").unwrap();
        assert!(session.is_in_flight());

        match session.begin("scanme.nmap.org") {
            Err(ReconError::EngagementInFlight(outstanding)) => assert_eq!(outstanding, "example.com"),
            other => panic!("unexpected result: {other:?}"),
        }

        session.complete(first, Some(AggregateResult::default()), EngagementStatus::Success);
        assert!(!session.is_in_flight());
        assert!(session.begin("scanme.nmap.org").is_ok());
    }

    #[test]
    fn new_engagement_discards_result_but_keeps_history() {
        let mut session = EngagementSession::new();
        let target = session.begin("example.com").unwrap();
        session.complete(target, Some(AggregateResult::default()), EngagementStatus::Success);
        assert!(session.current().is_some());

        session.begin("scanme.nmap.org").unwrap();
        assert!(session.current().is_none());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn terminate_resets_everything() {
        let mut session = EngagementSession::new();
        for host in ["one.example.com", "two.example.com"] {
            let target = session.begin(host).unwrap();
            session.complete(target, Some(AggregateResult::default()), EngagementStatus::Success);
        }
        assert_eq!(session.history().len(), 2);

        session.terminate();
        assert!(session.history().is_empty());
        assert!(session.current().is_none());
        assert!(session.target().is_none());
        assert_eq!(session.status(), EngagementStatus::Idle);
    }

    #[test]
    fn history_is_bounded_and_most_recent_first() {
        let mut session = EngagementSession::new();
        for n in 1..=6 {
            let target = session.begin(&format!("host{n}.example.com")).unwrap();
            session.complete(target, Some(AggregateResult::default()), EngagementStatus::Success);
        }
        let targets: Vec<&str> = session.history().list().map(|e| e.target.as_str()).collect();
        assert_eq!(targets.len(), 5);
        assert_eq!(targets[0], "host6.example.com");
        assert_eq!(targets[4], "host2.example.com");
    }

    #[test]
    fn rejected_target_keeps_the_previous_result() {
        let mut session = EngagementSession::new();
        let target = session.begin("example.com").unwrap();
        session.complete(target, Some(AggregateResult::default()), EngagementStatus::Success);

        assert!(matches!(session.begin("not a host"), Err(ReconError::InvalidTarget(_))));
        assert_eq!(session.status(), EngagementStatus::InvalidTarget);
        assert!(session.current().is_some());
        assert_eq!(session.target().map(Target::as_str), Some("example.com"));
        assert!(session.report(Utc::now()).is_ok());
    }

    #[test]
    fn outcome_arriving_after_terminate_is_dropped() {
        let mut session = EngagementSession::new();
        let target = session.begin("example.com").unwrap();
        session.terminate();

        session.complete(target, Some(AggregateResult::default()), EngagementStatus::Success);
        assert!(session.history().is_empty());
        assert!(session.current().is_none());
        assert_eq!(session.status(), EngagementStatus::Idle);
    }
}
