// src/core/sources/mod.rs

// One adapter per intelligence source, plus the HTTP uplink they share.
pub mod dns_source;
pub mod geo_source;
pub mod http;
pub mod scan_source;
pub mod whois_source;

use crate::core::error::ReconError;
use crate::core::models::{DnsRecords, GeoData, ServicePort, SourceResult, WhoisData};
use crate::core::target::Target;
use async_trait::async_trait;

pub use self::http::HttpSources;

/// The set of intelligence sources an engagement fans out to.
///
/// Each query is parameterized only by the target and reports its own outcome
/// as a `SourceResult`; implementations never panic or raise for a single
/// source's failure.
#[async_trait]
pub trait IntelSource: Send + Sync {
    /// Opens the uplink for one engagement, before any source is queried.
    /// An error here means no source could be attempted at all.
    async fn uplink(&self) -> Result<(), ReconError> {
        Ok(())
    }

    async fn geo(&self, target: &Target) -> SourceResult<GeoData>;

    async fn dns(&self, target: &Target) -> SourceResult<DnsRecords>;

    async fn whois(&self, target: &Target) -> SourceResult<WhoisData>;

    /// Port/service scan. A refusal is reported as `SourceResult::Denied`.
    async fn scan(&self, target: &Target) -> SourceResult<Vec<ServicePort>>;
}

/// Extracts a backend-reported `{"error": "..."}` message, if any.
pub(crate) fn backend_error(body: &serde_json::Value) -> Option<String> {
    body.get("error").map(|e| match e {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}
