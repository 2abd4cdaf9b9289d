// src/core/report.rs

use tracing::{debug, info};

use crate::core::error::ReconError;
use crate::core::models::{AggregateResult, AUTH_DENIED};
use crate::core::risk::{self, RiskTier};
use crate::core::target::Target;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub const PRODUCT_NAME: &str = "RECON_GUARD";
/// Placeholder for any absent geo/WHOIS field.
pub const UNKNOWN: &str = "Unknown";
/// Registrar shown when the WHOIS source supplied none.
pub const DEFAULT_REGISTRAR: &str = "DYNADOT LLC";
pub const NO_ADVISORY: &str = "No immediate advisory";

/// Serialization used when the document leaves the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Markdown => "md",
            ReportFormat::Json => "json",
        }
    }
}

/// One `Field | Data` row of the geographical intelligence table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeoRow {
    pub field: &'static str,
    pub value: String,
}

/// One row of the service vulnerability matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixRow {
    pub port: String,
    pub service: String,
    /// "FLAGGED" when the port has an advisory, "STANDARD" otherwise.
    pub risk_status: &'static str,
    pub tier: RiskTier,
    pub advisory: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsRow {
    pub record_type: &'static str,
    pub value: String,
}

/// The rendered audit artifact. Stateless: it can be regenerated at any time
/// from a held `AggregateResult`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditDocument {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub target: String,
    pub geo_intelligence: Vec<GeoRow>,
    pub vulnerability_matrix: Vec<MatrixRow>,
    pub dns_records: Vec<DnsRow>,
    pub scan_restricted: bool,
}

/// Renders the audit document for `target` from a consolidated result.
///
/// Missing data never aborts generation: absent fields degrade to
/// placeholders. The only failure is having no result at all.
pub fn render(
    target: &Target,
    result: Option<&AggregateResult>,
    generated_at: DateTime<Utc>,
) -> Result<AuditDocument, ReconError> {
    let result = result.ok_or(ReconError::ReportPrecondition)?;
    debug!(target = %target, "Rendering audit document.");

    Ok(AuditDocument {
        title: format!("{} V{} AUDIT REPORT", PRODUCT_NAME, env!("CARGO_PKG_VERSION")),
        generated_at,
        target: target.to_string(),
        geo_intelligence: geo_rows(result),
        vulnerability_matrix: matrix_rows(result),
        dns_records: dns_rows(result),
        scan_restricted: result.scan.is_denied(),
    })
}

fn geo_rows(result: &AggregateResult) -> Vec<GeoRow> {
    let geo = result.geo.clone().unwrap_or_default();

    let location = match (geo.city.as_deref(), geo.country.as_deref()) {
        (Some(city), Some(country)) => format!("{}, {}", city, country),
        (Some(only), None) | (None, Some(only)) => only.to_string(),
        (None, None) => UNKNOWN.to_string(),
    };
    let coordinates = match (geo.lat, geo.lon) {
        (Some(lat), Some(lon)) => format!("{}, {}", lat, lon),
        _ => UNKNOWN.to_string(),
    };

    vec![
        GeoRow { field: "ISP/Carrier", value: geo.isp.unwrap_or_else(|| UNKNOWN.to_string()) },
        GeoRow { field: "Location", value: location },
        GeoRow { field: "Coordinates", value: coordinates },
        GeoRow {
            field: "Registrar",
            value: result.whois.registrar.clone().unwrap_or_else(|| DEFAULT_REGISTRAR.to_string()),
        },
        GeoRow {
            field: "Expiration",
            value: result.whois.expiration_date.clone().unwrap_or_else(|| UNKNOWN.to_string()),
        },
    ]
}

fn matrix_rows(result: &AggregateResult) -> Vec<MatrixRow> {
    result.scan.ports().iter().map(|p| {
        let classification = risk::classify(&p.port);
        MatrixRow {
            port: p.port.clone(),
            service: p.service.clone(),
            risk_status: if classification.is_flagged() { "FLAGGED" } else { "STANDARD" },
            tier: classification.tier,
            advisory: classification.advisory.unwrap_or(NO_ADVISORY).to_string(),
        }
    }).collect()
}

fn dns_rows(result: &AggregateResult) -> Vec<DnsRow> {
    result.dns.records().iter()
        .map(|r| DnsRow { record_type: r.record_type(), value: r.to_string() })
        .collect()
}

/// Markdown table cells cannot contain raw pipes or newlines.
fn cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

impl AuditDocument {
    /// `Recon_Audit_<target>.md`, with every non-alphanumeric character of the
    /// target replaced by an underscore.
    pub fn file_name(&self) -> String {
        let normalized: String = self.target.chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!("Recon_Audit_{}.md", normalized)
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(out, "# {}\n", self.title);
        let _ = writeln!(out, "Generated: {}  ", self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
        let _ = writeln!(out, "Target: {}\n", self.target);

        let _ = writeln!(out, "## 1. GEOGRAPHICAL INTELLIGENCE\n");
        let _ = writeln!(out, "| Field | Data |");
        let _ = writeln!(out, "|---|---|");
        for row in &self.geo_intelligence {
            let _ = writeln!(out, "| {} | {} |", row.field, cell(&row.value));
        }

        let _ = writeln!(out, "\n## 2. SERVICE VULNERABILITY MATRIX\n");
        if self.scan_restricted {
            let _ = writeln!(out, "> Port scan restricted by the intelligence backend ({}).\n", AUTH_DENIED);
        }
        let _ = writeln!(out, "| Port | Service | Risk Status | Tier | Technical Advisory |");
        let _ = writeln!(out, "|---|---|---|---|---|");
        for row in &self.vulnerability_matrix {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                cell(&row.port), cell(&row.service), row.risk_status, row.tier, cell(&row.advisory)
            );
        }

        let _ = writeln!(out, "\n## 3. DNS RECORDS\n");
        if self.dns_records.is_empty() {
            let _ = writeln!(out, "No records");
        } else {
            let _ = writeln!(out, "| Type | Value |");
            let _ = writeln!(out, "|---|---|");
            for row in &self.dns_records {
                let _ = writeln!(out, "| {} | {} |", row.record_type, cell(&row.value));
            }
        }

        out
    }

    /// The document as bytes (Markdown, UTF-8).
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_markdown().into_bytes()
    }

    pub fn to_json(&self) -> Result<Vec<u8>, ReconError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// The document encoded in `format`.
    pub fn encode(&self, format: ReportFormat) -> Result<Vec<u8>, ReconError> {
        match format {
            ReportFormat::Markdown => Ok(self.to_bytes()),
            ReportFormat::Json => self.to_json(),
        }
    }

    /// Writes the document into `dir` as `file_name()` with the extension
    /// of `format`, creating `dir` if needed.
    pub fn export(&self, dir: &Path, format: ReportFormat) -> Result<PathBuf, ReconError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name()).with_extension(format.extension());
        std::fs::write(&path, self.encode(format)?)?;
        info!(path = %path.display(), format = ?format, "Audit document exported.");
        Ok(path)
    }
}
