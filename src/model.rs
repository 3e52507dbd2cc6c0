//! Data structures describing a software security assessment.
//!
//! The types mirror the JSON produced by the assessment API and the bundled mock dataset
//! (camelCase keys).  Every struct defaults missing fields so partially completed assessments can
//! still be exported; the renderer trusts numbers to be finite and non-negative and does not
//! validate upstream integrity.
//!
//! List fields keep supplier order.  CVEs and incidents are expected newest first.

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// Complete assessment record for one software product.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub timestamp: Option<String>,
    pub product: Product,
    pub trust_score: TrustScore,
    pub vendor_info: VendorInfo,
    pub platform_support: PlatformSupport,
    pub data_handling: DataHandling,
    pub permissions: Permissions,
    pub admin_controls: AdminControls,
    pub vulnerabilities: Vulnerabilities,
    pub release_lifecycle: ReleaseLifecycle,
    pub ai_features: AiFeatures,
    pub incidents: Incidents,
    pub compliance: Compliance,
    pub sources: SourceBreakdown,
    pub alternatives: Vec<Alternative>,
}

impl Report {
    /// Decodes a report from its JSON representation.
    pub fn from_json_str(json: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decodes a report from a JSON byte stream.
    pub fn from_reader(reader: impl std::io::Read) -> Result<Self, ReportError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Encodes the report as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    pub vendor: String,
    pub category: String,
    pub description: String,
    pub usage: String,
    pub website: Option<String>,
    pub logo: Option<String>,
}

/// Overall trust rating, 0 to 100.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrustScore {
    pub score: f64,
    pub rationale: String,
    /// Confidence in the score, 0 to 100.
    pub confidence: f64,
}

/// A source backing a claim in the assessment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Citation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub url: Option<String>,
    pub verified: bool,
    pub date: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VendorInfo {
    pub company_name: String,
    pub headquarters: String,
    pub jurisdiction: String,
    /// Founding year, `0` when unknown.
    pub founded: u32,
    pub reputation: Reputation,
    pub security_track_record: String,
    pub psirt_page: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Reputation {
    pub score: f64,
    pub summary: String,
    pub sources: Vec<Citation>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlatformSupport {
    pub platforms: Vec<Platform>,
    pub version_differences: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Platform {
    pub name: String,
    pub supported: bool,
    pub versions: Option<String>,
    pub security_model: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataHandling {
    pub storage: Storage,
    pub transmission: Transmission,
    pub usage: DataUsage,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Storage {
    pub location: String,
    pub regions: Vec<String>,
    pub cloud_provider: Option<String>,
    pub encryption_at_rest: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Transmission {
    pub endpoints: Vec<String>,
    pub sub_processors: Vec<String>,
    pub encryption_in_transit: EncryptionInTransit,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EncryptionInTransit {
    pub tls: String,
    pub cert_verified: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataUsage {
    pub analytics: bool,
    pub advertising: bool,
    pub ai_training: bool,
    pub retention_policy: String,
    pub user_can_delete: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Permissions {
    pub required: Vec<Permission>,
    pub optional: Vec<Permission>,
    pub over_permissioning_risk: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Permission {
    pub name: String,
    pub risk_level: RiskLevel,
    pub justification: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdminControls {
    pub sso: bool,
    pub mfa: bool,
    pub rbac: bool,
    pub scim: bool,
    pub audit_logs: bool,
    pub data_export: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Vulnerabilities {
    pub cve_count: u32,
    pub trend_data: Vec<TrendPoint>,
    pub severity_breakdown: SeverityBreakdown,
    #[serde(rename = "recentCVEs")]
    pub recent_cves: Vec<Cve>,
    /// Listed in the CISA Known Exploited Vulnerabilities catalog.
    #[serde(rename = "cisaKEV")]
    pub cisa_kev: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrendPoint {
    pub month: String,
    pub count: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeverityBreakdown {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Cve {
    pub id: String,
    pub cvss: f64,
    pub severity: String,
    pub description: String,
    pub published_date: Option<String>,
    pub patched: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReleaseLifecycle {
    pub latest_version: String,
    pub release_frequency: String,
    pub patch_cadence: String,
    pub eol_dates: Vec<EolDate>,
    pub lts_versions: Vec<String>,
    pub version_history: Vec<VersionEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EolDate {
    pub version: String,
    pub date: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VersionEntry {
    pub version: String,
    pub release_date: String,
    pub security_fixes: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AiFeatures {
    #[serde(rename = "hasAI")]
    pub has_ai: bool,
    pub features: Vec<AiFeature>,
    pub data_used_for_training: bool,
    pub can_opt_out: bool,
    pub processing_location: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AiFeature {
    pub name: String,
    pub description: String,
    pub data_access: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Incidents {
    pub count: u32,
    pub timeline: Vec<Incident>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Incident {
    pub date: String,
    pub title: String,
    pub severity: String,
    pub description: String,
    pub impact: String,
    pub resolution: String,
    pub sources: Vec<Citation>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Compliance {
    pub certifications: Vec<String>,
    pub data_handling_summary: String,
    pub dpa: bool,
    pub sources: Vec<Citation>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SourceBreakdown {
    pub public: SourceGroup,
    pub confidential: SourceGroup,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SourceGroup {
    pub count: u32,
    pub types: Vec<SourceType>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SourceType {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Alternative {
    pub name: String,
    pub vendor: String,
    pub trust_score: f64,
    pub summary: String,
    pub why_better: Option<String>,
}
