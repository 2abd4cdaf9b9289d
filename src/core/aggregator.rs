// src/core/aggregator.rs

use tracing::{debug, error, info, warn};

use crate::core::error::ReconError;
use crate::core::models::{
    AggregateResult, DnsRecords, GeoData, ScanOutcome, ServicePort, SourceKind, SourceResult, WhoisData,
};
use crate::core::sources::IntelSource;
use crate::core::target::Target;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use strum::Display;

/// The derived overall status of an engagement. Never stored on its own; it
/// is computed once from the shape of the consolidated outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
pub enum EngagementStatus {
    #[default]
    #[strum(serialize = "System Idle")]
    Idle,
    #[strum(serialize = "RECON_SUCCESS")]
    Success,
    #[strum(serialize = "WARNING: RESTRICTED")]
    Restricted,
    #[strum(serialize = "ERROR: INVALID_TARGET")]
    InvalidTarget,
    #[strum(serialize = "ERROR: UPLINK_FAILURE")]
    UplinkFailure,
}

impl EngagementStatus {
    /// Derives the status from an orchestration outcome.
    pub fn derive(outcome: &Result<AggregateResult, ReconError>) -> Self {
        match outcome {
            Ok(result) if result.scan.is_denied() => EngagementStatus::Restricted,
            Ok(_) => EngagementStatus::Success,
            Err(ReconError::InvalidTarget(_)) => EngagementStatus::InvalidTarget,
            Err(_) => EngagementStatus::UplinkFailure,
        }
    }
}

/// Runs the four source queries concurrently and folds them into one result.
#[derive(Clone)]
pub struct FanoutAggregator {
    sources: Arc<dyn IntelSource>,
    source_timeout: Duration,
}

impl FanoutAggregator {
    pub fn new(sources: Arc<dyn IntelSource>, source_timeout: Duration) -> Self {
        Self { sources, source_timeout }
    }

    /// Runs one engagement against `target` and derives its status.
    ///
    /// The result is `None` only when the uplink could not be opened, in
    /// which case the status is `UplinkFailure`.
    pub async fn run(&self, target: &Target) -> (Option<AggregateResult>, EngagementStatus) {
        let outcome = self.try_run(target).await;
        let status = EngagementStatus::derive(&outcome);
        info!(target = %target, status = %status, "Engagement finished.");
        (outcome.ok(), status)
    }

    async fn try_run(&self, target: &Target) -> Result<AggregateResult, ReconError> {
        info!(target = %target, "Opening uplink.");
        self.sources.uplink().await.map_err(|e| {
            error!(target = %target, error = %e, "Uplink failed before any source was attempted.");
            e
        })?;

        info!(target = %target, "Starting fan-out to all intelligence sources.");

        // Join barrier: every source is awaited, none is cancelled early, and
        // each one's latency is independent of the others.
        let (geo, dns, whois, scan) = tokio::join!(
            self.bounded(SourceKind::Geo, self.sources.geo(target)),
            self.bounded(SourceKind::Dns, self.sources.dns(target)),
            self.bounded(SourceKind::Whois, self.sources.whois(target)),
            self.bounded(SourceKind::Scan, self.sources.scan(target))
        );

        debug!("All sources resolved, consolidating.");
        Ok(fold(geo, dns, whois, scan))
    }

    /// Applies the per-source timeout. A timeout is just another failure.
    async fn bounded<T>(&self, kind: SourceKind, query: impl Future<Output = SourceResult<T>>) -> SourceResult<T> {
        match tokio::time::timeout(self.source_timeout, query).await {
            Ok(result) => result,
            Err(_) => {
                warn!(source = %kind, timeout = ?self.source_timeout, "Source timed out.");
                SourceResult::Failure(format!("{} source timed out after {:?}", kind, self.source_timeout))
            }
        }
    }
}

/// Folds a source result into its payload or the source's default,
/// remembering which sources were degraded.
fn settle<T>(kind: SourceKind, result: SourceResult<T>, degraded: &mut Vec<SourceKind>) -> Option<T> {
    match result {
        SourceResult::Success(payload) => Some(payload),
        SourceResult::Failure(reason) | SourceResult::Denied(reason) => {
            warn!(source = %kind, reason = %reason, "Source degraded to its default.");
            degraded.push(kind);
            None
        }
    }
}

/// Consolidates the four outcomes.
///
/// Geo degrades to absent, DNS and WHOIS to empty payloads, and the scan to
/// an empty port list, except that a scan denial becomes the explicit
/// `ScanOutcome::Denied` marker.
pub fn fold(
    geo: SourceResult<GeoData>,
    dns: SourceResult<DnsRecords>,
    whois: SourceResult<WhoisData>,
    scan: SourceResult<Vec<ServicePort>>,
) -> AggregateResult {
    let mut degraded = Vec::new();

    let geo = settle(SourceKind::Geo, geo, &mut degraded);
    let dns = settle(SourceKind::Dns, dns, &mut degraded).unwrap_or_default();
    if dns.is_empty() {
        debug!("No DNS records to report.");
    }
    let whois = settle(SourceKind::Whois, whois, &mut degraded).unwrap_or_default();
    let scan = match scan {
        SourceResult::Denied(reason) => {
            warn!(reason = %reason, "Scan denied, marking engagement as restricted.");
            ScanOutcome::Denied
        }
        other => ScanOutcome::Ports(settle(SourceKind::Scan, other, &mut degraded).unwrap_or_default()),
    };

    AggregateResult { geo, dns, whois, scan, degraded }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::models::{AddressRecord, NameServerRecord};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// An in-memory source set with scripted answers and optional delays.
    pub(crate) struct ScriptedSources {
        pub uplink_error: Option<String>,
        pub geo: SourceResult<GeoData>,
        pub dns: SourceResult<DnsRecords>,
        pub whois: SourceResult<WhoisData>,
        pub scan: SourceResult<Vec<ServicePort>>,
        pub delays: [Duration; 4],
        pub calls: AtomicUsize,
        pub seen_targets: Mutex<Vec<String>>,
    }

    impl ScriptedSources {
        pub(crate) fn all_succeeding() -> Self {
            Self {
                uplink_error: None,
                geo: SourceResult::Success(sample_geo()),
                dns: SourceResult::Success(sample_dns()),
                whois: SourceResult::Success(sample_whois()),
                scan: SourceResult::Success(vec![ServicePort::new("445", "smb")]),
                delays: [Duration::ZERO; 4],
                calls: AtomicUsize::new(0),
                seen_targets: Mutex::new(Vec::new()),
            }
        }

        async fn answer<T: Clone>(&self, index: usize, target: &Target, result: &SourceResult<T>) -> SourceResult<T> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_targets.lock().unwrap().push(target.to_string());
            tokio::time::sleep(self.delays[index]).await;
            result.clone()
        }
    }

    #[async_trait]
    impl IntelSource for ScriptedSources {
        async fn uplink(&self) -> Result<(), ReconError> {
            match &self.uplink_error {
                Some(reason) => Err(ReconError::Uplink(reason.clone())),
                None => Ok(()),
            }
        }

        async fn geo(&self, target: &Target) -> SourceResult<GeoData> {
            self.answer(0, target, &self.geo).await
        }

        async fn dns(&self, target: &Target) -> SourceResult<DnsRecords> {
            self.answer(1, target, &self.dns).await
        }

        async fn whois(&self, target: &Target) -> SourceResult<WhoisData> {
            self.answer(2, target, &self.whois).await
        }

        async fn scan(&self, target: &Target) -> SourceResult<Vec<ServicePort>> {
            self.answer(3, target, &self.scan).await
        }
    }

    pub(crate) fn sample_geo() -> GeoData {
        GeoData {
            isp: Some("Edgecast Inc.".into()),
            city: Some("Norwell".into()),
            country: Some("United States".into()),
            lat: Some(42.1508),
            lon: Some(-70.8228),
        }
    }

    pub(crate) fn sample_dns() -> DnsRecords {
        DnsRecords {
            a: vec![AddressRecord { address: "93.184.216.34".into() }],
            mx: Vec::new(),
            ns: vec![NameServerRecord { host: "a.iana-servers.net".into() }],
        }
    }

    pub(crate) fn sample_whois() -> WhoisData {
        WhoisData {
            registrar: Some("RESERVED-Internet Assigned Numbers Authority".into()),
            expiration_date: Some("2026-08-13".into()),
            ..WhoisData::default()
        }
    }

    fn aggregator(sources: ScriptedSources) -> (FanoutAggregator, Arc<ScriptedSources>) {
        let sources = Arc::new(sources);
        (FanoutAggregator::new(sources.clone(), Duration::from_secs(5)), sources)
    }

    fn target(raw: &str) -> Target {
        Target::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn all_sources_succeed() {
        let (aggregator, sources) = aggregator(ScriptedSources::all_succeeding());
        let (result, status) = aggregator.run(&target("example.com")).await;

        assert_eq!(status, EngagementStatus::Success);
        let result = result.unwrap();
        assert_eq!(result.geo, Some(sample_geo()));
        assert_eq!(result.dns, sample_dns());
        assert_eq!(result.whois, sample_whois());
        assert_eq!(result.scan, ScanOutcome::Ports(vec![ServicePort::new("445", "smb")]));
        assert!(result.degraded.is_empty());
        assert_eq!(sources.calls.load(Ordering::SeqCst), 4);
        assert!(sources.seen_targets.lock().unwrap().iter().all(|t| t == "example.com"));
    }

    #[tokio::test]
    async fn scan_denial_is_restricted_regardless_of_others() {
        let mut scripted = ScriptedSources::all_succeeding();
        scripted.scan = SourceResult::Denied("ETHICAL_GUARDRAIL".into());
        scripted.geo = SourceResult::Failure("down".into());
        let (aggregator, _) = aggregator(scripted);

        let (result, status) = aggregator.run(&target("10.0.0.5")).await;
        assert_eq!(status, EngagementStatus::Restricted);
        let result = result.unwrap();
        assert!(result.scan.is_denied());
        assert_eq!(result.geo, None);
        assert_eq!(result.dns, sample_dns());
        assert_eq!(result.degraded, vec![SourceKind::Geo]);
    }

    #[tokio::test]
    async fn non_scan_failures_degrade_to_defaults_and_stay_successful() {
        let mut scripted = ScriptedSources::all_succeeding();
        scripted.geo = SourceResult::Failure("500".into());
        scripted.dns = SourceResult::Failure("timeout".into());
        scripted.whois = SourceResult::Denied("403".into());
        let (aggregator, _) = aggregator(scripted);

        let (result, status) = aggregator.run(&target("example.com")).await;
        assert_eq!(status, EngagementStatus::Success);
        let result = result.unwrap();
        assert_eq!(result.geo, None);
        assert_eq!(result.dns, DnsRecords::default());
        assert_eq!(result.whois, WhoisData::default());
        assert_eq!(result.degraded, vec![SourceKind::Geo, SourceKind::Dns, SourceKind::Whois]);
    }

    #[tokio::test]
    async fn scan_failure_is_empty_not_denied() {
        let mut scripted = ScriptedSources::all_succeeding();
        scripted.scan = SourceResult::Failure("Port Scan Failed".into());
        let (aggregator, _) = aggregator(scripted);

        let (result, status) = aggregator.run(&target("example.com")).await;
        assert_eq!(status, EngagementStatus::Success);
        assert_eq!(result.unwrap().scan, ScanOutcome::Ports(Vec::new()));
    }

    #[tokio::test]
    async fn uplink_failure_attempts_no_source() {
        let mut scripted = ScriptedSources::all_succeeding();
        scripted.uplink_error = Some("connection refused".into());
        let (aggregator, sources) = aggregator(scripted);

        let (result, status) = aggregator.run(&target("example.com")).await;
        assert_eq!(status, EngagementStatus::UplinkFailure);
        assert!(result.is_none());
        assert_eq!(sources.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_sources_run_concurrently() {
        let mut scripted = ScriptedSources::all_succeeding();
        scripted.delays = [Duration::from_secs(2); 4];
        let (aggregator, _) = aggregator(scripted);

        let started = Instant::now();
        let (_, status) = aggregator.run(&target("example.com")).await;
        assert_eq!(status, EngagementStatus::Success);
        // Serialized queries would take eight seconds.
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn hung_source_times_out_into_its_default() {
        let mut scripted = ScriptedSources::all_succeeding();
        scripted.delays[1] = Duration::from_secs(60);
        let sources = Arc::new(scripted);
        let aggregator = FanoutAggregator::new(sources, Duration::from_secs(1));

        let (result, status) = aggregator.run(&target("example.com")).await;
        assert_eq!(status, EngagementStatus::Success);
        let result = result.unwrap();
        assert_eq!(result.dns, DnsRecords::default());
        assert_eq!(result.degraded, vec![SourceKind::Dns]);
        assert_eq!(result.geo, Some(sample_geo()));
    }

    #[test]
    fn status_labels() {
        assert_eq!(EngagementStatus::Idle.to_string(), "System Idle");
        assert_eq!(EngagementStatus::Success.to_string(), "RECON_SUCCESS");
        assert_eq!(EngagementStatus::Restricted.to_string(), "WARNING: RESTRICTED");
        assert_eq!(EngagementStatus::InvalidTarget.to_string(), "ERROR: INVALID_TARGET");
        assert_eq!(EngagementStatus::UplinkFailure.to_string(), "ERROR: UPLINK_FAILURE");
    }
}
