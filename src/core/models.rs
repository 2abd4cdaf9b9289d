// src/core/models.rs

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use strum::Display;

// --- Source Results ---

/// The four independent intelligence providers queried per engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum SourceKind {
    #[strum(serialize = "geo")]
    Geo,
    #[strum(serialize = "dns")]
    Dns,
    #[strum(serialize = "whois")]
    Whois,
    #[strum(serialize = "scan")]
    Scan,
}

/// The outcome of one intelligence-source query. There is no partial success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SourceResult<T> {
    Success(T),
    /// Network error, non-2xx response, malformed body, timeout.
    Failure(String),
    /// The source actively refused the request (HTTP 403).
    Denied(String),
}

#[cfg(test)]
impl<T> SourceResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, SourceResult::Success(_))
    }
}

// --- Geo Models ---

/// Physical location data for a target, as reported by the geo source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoData {
    #[serde(default)]
    pub isp: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

// --- DNS Models ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailExchangeRecord {
    #[serde(default)]
    pub preference: Option<u16>,
    pub exchange: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameServerRecord {
    pub host: String,
}

/// A/MX/NS records for a target. The default (all empty) is what a failed
/// DNS source degrades to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecords {
    #[serde(rename = "A", default)]
    pub a: Vec<AddressRecord>,
    #[serde(rename = "MX", default)]
    pub mx: Vec<MailExchangeRecord>,
    #[serde(rename = "NS", default)]
    pub ns: Vec<NameServerRecord>,
}

/// One DNS record, flattened out of `DnsRecords`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DnsRecord<'a> {
    A(&'a str),
    Mx { preference: Option<u16>, exchange: &'a str },
    Ns(&'a str),
}

impl DnsRecord<'_> {
    pub fn record_type(&self) -> &'static str {
        match self {
            DnsRecord::A(_) => "A",
            DnsRecord::Mx { .. } => "MX",
            DnsRecord::Ns(_) => "NS",
        }
    }
}

impl fmt::Display for DnsRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DnsRecord::A(address) => write!(f, "{address}"),
            DnsRecord::Mx { preference: Some(p), exchange } => write!(f, "{p} {exchange}"),
            DnsRecord::Mx { preference: None, exchange } => write!(f, "{exchange}"),
            DnsRecord::Ns(host) => write!(f, "{host}"),
        }
    }
}

impl DnsRecords {
    /// All records as one sequence, A then MX then NS.
    pub fn records(&self) -> Vec<DnsRecord<'_>> {
        self.a.iter().map(|r| DnsRecord::A(&r.address))
            .chain(self.mx.iter().map(|r| DnsRecord::Mx { preference: r.preference, exchange: &r.exchange }))
            .chain(self.ns.iter().map(|r| DnsRecord::Ns(&r.host)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty() && self.mx.is_empty() && self.ns.is_empty()
    }
}

// --- WHOIS Models ---

/// Registrar information. The WHOIS backend sends some fields either as a
/// single value or as a list, so both shapes are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoisData {
    #[serde(default, deserialize_with = "first_of_one_or_many")]
    pub domain_name: Option<String>,
    #[serde(default, deserialize_with = "first_of_one_or_many")]
    pub registrar: Option<String>,
    #[serde(default, deserialize_with = "first_of_one_or_many")]
    pub creation_date: Option<String>,
    #[serde(default, deserialize_with = "first_of_one_or_many")]
    pub expiration_date: Option<String>,
    #[serde(default, deserialize_with = "first_of_one_or_many")]
    pub updated_date: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub name_servers: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub status: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub emails: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<serde_json::Value>),
    One(serde_json::Value),
}

fn value_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::Many(values)) => values,
        Some(OneOrMany::One(value)) => vec![value],
    };
    Ok(values.into_iter().filter_map(value_to_string).collect())
}

fn first_of_one_or_many<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(one_or_many(deserializer)?.into_iter().next())
}

// --- Scan Models ---

/// A discovered service. The scan backend reports ports as numbers, but they
/// are keyed as strings everywhere in the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePort {
    #[serde(deserialize_with = "port_as_string")]
    pub port: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub state: Option<String>,
}

#[cfg(test)]
impl ServicePort {
    pub fn new(port: &str, service: &str) -> Self {
        Self { port: port.to_string(), service: service.to_string(), state: None }
    }
}

fn port_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u64),
        Text(String),
    }
    Ok(match Port::deserialize(deserializer)? {
        Port::Number(n) => n.to_string(),
        Port::Text(s) => s,
    })
}

/// Marker carried by a scan that the backend refused.
pub const AUTH_DENIED: &str = "AUTH_DENIED";

/// What the scan source contributed to an engagement.
///
/// A denial is kept distinct from "no data": it serializes as
/// `{"error": "AUTH_DENIED"}` rather than as an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Ports(Vec<ServicePort>),
    Denied,
}

impl Default for ScanOutcome {
    fn default() -> Self {
        ScanOutcome::Ports(Vec::new())
    }
}

impl ScanOutcome {
    pub fn is_denied(&self) -> bool {
        matches!(self, ScanOutcome::Denied)
    }

    /// Discovered ports; empty when the scan was denied.
    pub fn ports(&self) -> &[ServicePort] {
        match self {
            ScanOutcome::Ports(ports) => ports,
            ScanOutcome::Denied => &[],
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ScanOutcomeRepr {
    Ports(Vec<ServicePort>),
    Error { error: String },
}

impl Serialize for ScanOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ScanOutcome::Ports(ports) => ports.serialize(serializer),
            ScanOutcome::Denied => ScanOutcomeRepr::Error { error: AUTH_DENIED.to_string() }.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ScanOutcome {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ScanOutcomeRepr::deserialize(deserializer)? {
            ScanOutcomeRepr::Ports(ports) => ScanOutcome::Ports(ports),
            ScanOutcomeRepr::Error { .. } => ScanOutcome::Denied,
        })
    }
}

// --- Aggregate Result ---

/// The consolidation of the four source results for one engagement.
///
/// Each field holds either the source's payload unmodified or its documented
/// default; `degraded` names the sources that were defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub geo: Option<GeoData>,
    pub dns: DnsRecords,
    pub whois: WhoisData,
    pub scan: ScanOutcome,
    #[serde(default)]
    pub degraded: Vec<SourceKind>,
}
