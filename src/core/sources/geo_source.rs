// src/core/sources/geo_source.rs

use tracing::{debug, warn};

use super::backend_error;
use crate::core::models::{GeoData, SourceResult};

/// Parses a geo-lookup body of the form `{"target": .., "geo_data": {..}}`.
///
/// The backend reports lookup failures in-band as `geo_data: {"error": ..}`;
/// those are failures, not data.
pub fn parse_geo_body(body: serde_json::Value) -> SourceResult<GeoData> {
    let Some(geo_data) = body.get("geo_data") else {
        warn!("Geo response has no 'geo_data' field.");
        return SourceResult::Failure("Missing geo_data in response".to_string());
    };

    if let Some(reason) = backend_error(geo_data) {
        warn!(reason = %reason, "Geo lookup reported an error.");
        return SourceResult::Failure(reason);
    }
    if geo_data.is_null() {
        return SourceResult::Failure("Empty geo_data in response".to_string());
    }

    match serde_json::from_value::<GeoData>(geo_data.clone()) {
        Ok(geo) => {
            debug!(city = ?geo.city, country = ?geo.country, "Geo data parsed.");
            SourceResult::Success(geo)
        }
        Err(e) => {
            warn!(error = %e, "Geo data did not match the expected shape.");
            SourceResult::Failure(format!("Malformed geo_data: {}", e))
        }
    }
}
