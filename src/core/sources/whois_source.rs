// src/core/sources/whois_source.rs

use tracing::{debug, warn};

use super::backend_error;
use crate::core::models::{SourceResult, WhoisData};

/// Parses a WHOIS body: `{"success": true, "domain": .., "data": {..}}` or
/// `{"success": false, "error": ..}`.
pub fn parse_whois_body(body: serde_json::Value) -> SourceResult<WhoisData> {
    let succeeded = body.get("success").and_then(|s| s.as_bool());

    if succeeded == Some(false) || (succeeded.is_none() && body.get("error").is_some()) {
        let reason = backend_error(&body).unwrap_or_else(|| "WHOIS lookup failed".to_string());
        warn!(reason = %reason, "WHOIS lookup reported an error.");
        return SourceResult::Failure(reason);
    }

    let data = body.get("data").cloned().unwrap_or_else(|| serde_json::json!({}));
    match serde_json::from_value::<WhoisData>(data) {
        Ok(whois) => {
            debug!(registrar = ?whois.registrar, "WHOIS data parsed.");
            SourceResult::Success(whois)
        }
        Err(e) => {
            warn!(error = %e, "WHOIS data did not match the expected shape.");
            SourceResult::Failure(format!("Malformed WHOIS data: {}", e))
        }
    }
}
