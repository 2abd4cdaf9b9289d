// src/core/sources/http.rs

use tracing::{debug, error, info, warn};

use super::{dns_source, geo_source, scan_source, whois_source, IntelSource};
use crate::config::EngineConfig;
use crate::core::error::ReconError;
use crate::core::models::{DnsRecords, GeoData, ServicePort, SourceKind, SourceResult, WhoisData};
use crate::core::target::Target;
use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

/// Path of each source's endpoint, relative to the backend base URL.
fn endpoint_path(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Geo => "tools/geo",
        SourceKind::Dns => "tools/dns",
        SourceKind::Whois => "tools/whois",
        SourceKind::Scan => "tools/scan",
    }
}

/// The real source set: four HTTP endpoints on one intelligence backend.
#[derive(Debug, Clone)]
pub struct HttpSources {
    client: reqwest::Client,
    base: Url,
    probe_uplink: bool,
}

impl HttpSources {
    /// Builds the shared HTTP client. Failing here is an uplink failure.
    pub fn new(config: &EngineConfig) -> Result<Self, ReconError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.source_timeout)
            .build()
            .map_err(|e| {
                error!(error = %e, "Failed to build HTTP client for the intelligence uplink.");
                ReconError::Uplink(format!("Failed to build HTTP client: {}", e))
            })?;

        // `Url::join` replaces the last path segment unless the base ends in '/'.
        let mut base = config.api_base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { client, base, probe_uplink: config.probe_uplink })
    }

    /// Builds `{base}/tools/<source>?target=<target>`.
    pub fn endpoint(&self, kind: SourceKind, target: &Target) -> Result<Url, ReconError> {
        let mut url = self.base.join(endpoint_path(kind))
            .map_err(|e| ReconError::Uplink(format!("Invalid {} endpoint: {}", kind, e)))?;
        url.query_pairs_mut().append_pair("target", target.as_str());
        Ok(url)
    }

    /// Issues one GET and classifies the response.
    ///
    /// 403 becomes `Denied`; any other transport error, non-2xx status or
    /// non-JSON body becomes `Failure`. Callers decide what a denial means
    /// for their source.
    async fn fetch(&self, kind: SourceKind, target: &Target) -> SourceResult<serde_json::Value> {
        let url = match self.endpoint(kind, target) {
            Ok(url) => url,
            Err(e) => return SourceResult::Failure(e.to_string()),
        };
        debug!(source = %kind, url = %url, "Sending source request.");

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(source = %kind, error = %e, "Source request failed.");
                return SourceResult::Failure(format!("HTTP request failed: {}", e));
            }
        };

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            let detail = response.text().await.unwrap_or_default();
            warn!(source = %kind, detail = %detail, "Source denied the request.");
            return SourceResult::Denied(detail);
        }
        if !status.is_success() {
            warn!(source = %kind, status = %status, "Source answered with a non-success status.");
            return SourceResult::Failure(format!("HTTP status {}", status));
        }

        match response.text().await {
            Ok(body) => match serde_json::from_str(&body) {
                Ok(value) => SourceResult::Success(value),
                Err(e) => {
                    warn!(source = %kind, error = %e, "Source body is not valid JSON.");
                    SourceResult::Failure(format!("Malformed response body: {}", e))
                }
            },
            Err(e) => {
                warn!(source = %kind, error = %e, "Failed to read source response body.");
                SourceResult::Failure(format!("Failed to read response body: {}", e))
            }
        }
    }
}

/// Maps a fetched body through a source-specific parser, passing failures and
/// denials through untouched.
fn and_then<T>(
    fetched: SourceResult<serde_json::Value>,
    parse: impl FnOnce(serde_json::Value) -> SourceResult<T>,
) -> SourceResult<T> {
    match fetched {
        SourceResult::Success(body) => parse(body),
        SourceResult::Failure(reason) => SourceResult::Failure(reason),
        SourceResult::Denied(reason) => SourceResult::Denied(reason),
    }
}

#[async_trait]
impl IntelSource for HttpSources {
    async fn uplink(&self) -> Result<(), ReconError> {
        if !self.probe_uplink {
            return Ok(());
        }
        info!(base = %self.base, "Probing intelligence backend.");
        let response = self.client.get(self.base.clone()).send().await
            .map_err(|e| ReconError::Uplink(format!("Backend unreachable: {}", e)))?;
        if !response.status().is_success() {
            return Err(ReconError::Uplink(format!("Backend health check returned {}", response.status())));
        }
        let body: serde_json::Value = response.json().await
            .map_err(|e| ReconError::Uplink(format!("Backend health body unreadable: {}", e)))?;
        match body.get("status").and_then(|s| s.as_str()) {
            Some("online") => Ok(()),
            other => Err(ReconError::Uplink(format!("Backend is not online (status: {:?})", other))),
        }
    }

    async fn geo(&self, target: &Target) -> SourceResult<GeoData> {
        and_then(self.fetch(SourceKind::Geo, target).await, geo_source::parse_geo_body)
    }

    async fn dns(&self, target: &Target) -> SourceResult<DnsRecords> {
        and_then(self.fetch(SourceKind::Dns, target).await, dns_source::parse_dns_body)
    }

    async fn whois(&self, target: &Target) -> SourceResult<WhoisData> {
        and_then(self.fetch(SourceKind::Whois, target).await, whois_source::parse_whois_body)
    }

    async fn scan(&self, target: &Target) -> SourceResult<Vec<ServicePort>> {
        and_then(self.fetch(SourceKind::Scan, target).await, scan_source::parse_scan_body)
    }
}
