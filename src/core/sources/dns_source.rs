// src/core/sources/dns_source.rs

use tracing::{debug, warn};

use super::backend_error;
use crate::core::models::{DnsRecords, SourceResult};

/// Parses a DNS body of the form `{"A": [..], "MX": [..], "NS": [..]}`.
///
/// Missing record types are treated as empty. An in-band `{"error": ..}` is a
/// failure.
pub fn parse_dns_body(body: serde_json::Value) -> SourceResult<DnsRecords> {
    if let Some(reason) = backend_error(&body) {
        warn!(reason = %reason, "DNS lookup reported an error.");
        return SourceResult::Failure(reason);
    }
    if !body.is_object() {
        return SourceResult::Failure("DNS response is not an object".to_string());
    }

    match serde_json::from_value::<DnsRecords>(body) {
        Ok(records) => {
            debug!(a = records.a.len(), mx = records.mx.len(), ns = records.ns.len(), "DNS records parsed.");
            SourceResult::Success(records)
        }
        Err(e) => {
            warn!(error = %e, "DNS records did not match the expected shape.");
            SourceResult::Failure(format!("Malformed DNS records: {}", e))
        }
    }
}
