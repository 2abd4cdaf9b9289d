// src/core/mod.rs

/// Data structures shared across the engine: source results, per-source
/// payloads and the consolidated `AggregateResult`.
pub mod models;

pub mod error;

/// Target validation (hostname / dotted-quad grammars).
pub mod target;

/// Static advisory table for well-known ports.
pub mod knowledge_base;

/// Severity tiers by port membership, combined with the advisory table.
pub mod risk;

/// Intelligence source adapters and the trait the aggregator consumes.
pub mod sources;

/// Concurrent fan-out, per-source failure isolation and status derivation.
pub mod aggregator;

pub mod history;

/// Audit document rendering and export.
pub mod report;

/// The engagement session that owns result, status and history.
pub mod session;
