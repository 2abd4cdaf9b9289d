// src/core/error.rs

use thiserror::Error;

/// Errors that surface to the caller of the engine.
///
/// Per-source failures and denials are deliberately absent: those are
/// `SourceResult` variants, absorbed by the aggregator and never raised.
#[derive(Debug, Error)]
pub enum ReconError {
    /// The target failed the hostname/IPv4 grammar check. No query was issued.
    #[error("invalid target: '{0}'")]
    InvalidTarget(String),

    /// A second engagement was requested while one is still outstanding.
    #[error("an engagement against '{0}' is already in flight")]
    EngagementInFlight(String),

    /// The orchestration could not reach the intelligence backend at all.
    #[error("uplink failure: {0}")]
    Uplink(String),

    /// A report was requested with no consolidated result held.
    #[error("no consolidated result is available to generate a report from")]
    ReportPrecondition,

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
