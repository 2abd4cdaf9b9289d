// src/core/sources/scan_source.rs

use tracing::{debug, info, warn};

use super::backend_error;
use crate::core::models::{ServicePort, SourceResult};

/// Parses a scan body: a list of `{port, service, state}` entries.
///
/// A backend that ran but failed answers `{"error": ..}` with a 2xx status;
/// that is an ordinary failure. Refusals never reach this parser: they are
/// classified as `Denied` from the HTTP status.
pub fn parse_scan_body(body: serde_json::Value) -> SourceResult<Vec<ServicePort>> {
    if let Some(reason) = backend_error(&body) {
        warn!(reason = %reason, "Port scan reported an error.");
        return SourceResult::Failure(reason);
    }

    match serde_json::from_value::<Vec<ServicePort>>(body) {
        Ok(ports) => {
            info!(count = ports.len(), "Port scan results parsed.");
            for port in &ports {
                debug!(port = %port.port, service = %port.service, "Discovered service.");
            }
            SourceResult::Success(ports)
        }
        Err(e) => {
            warn!(error = %e, "Port scan body did not match the expected shape.");
            SourceResult::Failure(format!("Malformed scan results: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parses_port_list() {
        let body = json!([
            { "port": 22, "service": "ssh", "state": "open" },
            { "port": 445, "service": "microsoft-ds", "state": "open" }
        ]);
        match parse_scan_body(body) {
            SourceResult::Success(ports) => {
                let ids: Vec<&str> = ports.iter().map(|p| p.port.as_str()).collect();
                assert_eq!(ids, vec!["22", "445"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn empty_list_is_a_success() {
        assert_eq!(parse_scan_body(json!([])), SourceResult::Success(Vec::new()));
    }

    #[test]
    fn in_band_error_is_a_failure_not_a_denial() {
        assert_eq!(
            parse_scan_body(json!({ "error": "Port Scan Failed: nmap not found" })),
            SourceResult::Failure("Port Scan Failed: nmap not found".into())
        );
    }
}
