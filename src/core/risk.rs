// src/core/risk.rs

use crate::core::knowledge_base;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Ports flagged as critical by membership alone.
const CRITICAL_PORTS: &[&str] = &["21", "23", "139", "445"];
/// Ports flagged as warnings by membership alone.
const WARNING_PORTS: &[&str] = &["22", "3389", "3306", "5900", "8080"];

/// The severity bucket assigned to a discovered service port.
///
/// `Standard` is the default, unflagged tier; it is displayed as INFO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
pub enum RiskTier {
    #[strum(serialize = "CRITICAL")]
    Critical,
    #[strum(serialize = "WARNING")]
    Warning,
    #[strum(serialize = "INFO")]
    Standard,
}

/// The two independent facts known about a port: its tier and its advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub tier: RiskTier,
    pub advisory: Option<&'static str>,
}

impl Classification {
    /// A port is "flagged" in the audit matrix when it has an advisory,
    /// regardless of its tier.
    pub fn is_flagged(&self) -> bool {
        self.advisory.is_some()
    }
}

/// Derives the tier from set membership only.
pub fn tier_for(port: &str) -> RiskTier {
    if CRITICAL_PORTS.contains(&port) {
        RiskTier::Critical
    } else if WARNING_PORTS.contains(&port) {
        RiskTier::Warning
    } else {
        RiskTier::Standard
    }
}

/// Classifies a port. Pure; identical input always yields the same pair.
pub fn classify(port: &str) -> Classification {
    Classification {
        tier: tier_for(port),
        advisory: knowledge_base::get_port_advisory(port).map(|a| a.advisory),
    }
}

pub fn is_flagged(port: &str) -> bool {
    knowledge_base::get_port_advisory(port).is_some()
}
