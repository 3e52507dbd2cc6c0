//! Report sizes and the content each of them includes.
//!
//! Every export picks one [`ReportSize`].  The size decides which sections are assembled, how many
//! entries of the long lists (CVEs, incidents, version history) are kept, and whether the detailed
//! per-item listings are drawn at all.  The table is fixed at compile time; adding a size means
//! extending the enum and every `match` over it.

use std::fmt;
use std::str::FromStr;

use crate::error::{UnknownSection, UnknownTier};
use crate::model::Report;

/// Identifier of a report section as used by the size table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionId {
    Overview,
    TrustScore,
    KeyFindings,
    Security,
    Vulnerabilities,
    Privacy,
    Technical,
    Compliance,
    Sources,
    Alternatives,
}

impl SectionId {
    /// Every section identifier in presentation order.
    pub const ALL: [SectionId; 10] = [
        SectionId::Overview,
        SectionId::TrustScore,
        SectionId::KeyFindings,
        SectionId::Security,
        SectionId::Vulnerabilities,
        SectionId::Privacy,
        SectionId::Technical,
        SectionId::Compliance,
        SectionId::Sources,
        SectionId::Alternatives,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionId::Overview => "overview",
            SectionId::TrustScore => "trust-score",
            SectionId::KeyFindings => "key-findings",
            SectionId::Security => "security",
            SectionId::Vulnerabilities => "vulnerabilities",
            SectionId::Privacy => "privacy",
            SectionId::Technical => "technical",
            SectionId::Compliance => "compliance",
            SectionId::Sources => "sources",
            SectionId::Alternatives => "alternatives",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionId {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

/// Upper bound on the number of list entries kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cap {
    Limited(usize),
    Unbounded,
}

impl Cap {
    /// Number of entries kept from a list of `len` entries.
    pub fn clamp(self, len: usize) -> usize {
        match self {
            Cap::Limited(limit) => len.min(limit),
            Cap::Unbounded => len,
        }
    }

    /// Keeps the leading entries of `items` up to the cap.
    pub fn truncate<T>(self, items: &mut Vec<T>) {
        let keep = self.clamp(items.len());
        items.truncate(keep);
    }
}

impl fmt::Display for Cap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cap::Limited(limit) => write!(f, "{limit}"),
            Cap::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// Sections a size includes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionSet {
    /// Every section, including ones added later.
    All,
    Only(&'static [SectionId]),
}

impl SectionSet {
    pub fn contains(self, id: SectionId) -> bool {
        match self {
            SectionSet::All => true,
            SectionSet::Only(ids) => ids.contains(&id),
        }
    }
}

/// Content configuration of one report size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierConfig {
    pub sections: SectionSet,
    pub cve_limit: Cap,
    pub incident_limit: Cap,
    pub version_history_limit: Cap,
    pub show_detailed_metrics: bool,
}

const SMALL_SECTIONS: &[SectionId] = &[
    SectionId::Overview,
    SectionId::TrustScore,
    SectionId::KeyFindings,
];

const MEDIUM_SECTIONS: &[SectionId] = &[
    SectionId::Overview,
    SectionId::TrustScore,
    SectionId::KeyFindings,
    SectionId::Security,
    SectionId::Vulnerabilities,
];

const FULL_SECTIONS: &[SectionId] = &[
    SectionId::Overview,
    SectionId::TrustScore,
    SectionId::KeyFindings,
    SectionId::Security,
    SectionId::Vulnerabilities,
    SectionId::Privacy,
    SectionId::Technical,
    SectionId::Compliance,
    SectionId::Sources,
];

/// Named report size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReportSize {
    Small,
    Medium,
    Full,
    Enterprise,
}

impl ReportSize {
    /// All sizes from smallest to largest.
    pub const ALL: [ReportSize; 4] = [
        ReportSize::Small,
        ReportSize::Medium,
        ReportSize::Full,
        ReportSize::Enterprise,
    ];

    /// Returns the fixed configuration for this size.
    pub fn config(self) -> TierConfig {
        match self {
            ReportSize::Small => TierConfig {
                sections: SectionSet::Only(SMALL_SECTIONS),
                cve_limit: Cap::Limited(3),
                incident_limit: Cap::Limited(2),
                version_history_limit: Cap::Limited(3),
                show_detailed_metrics: false,
            },
            ReportSize::Medium => TierConfig {
                sections: SectionSet::Only(MEDIUM_SECTIONS),
                cve_limit: Cap::Limited(5),
                incident_limit: Cap::Limited(3),
                version_history_limit: Cap::Limited(5),
                show_detailed_metrics: true,
            },
            ReportSize::Full => TierConfig {
                sections: SectionSet::Only(FULL_SECTIONS),
                cve_limit: Cap::Limited(10),
                incident_limit: Cap::Limited(10),
                version_history_limit: Cap::Limited(10),
                show_detailed_metrics: true,
            },
            ReportSize::Enterprise => TierConfig {
                sections: SectionSet::All,
                cve_limit: Cap::Unbounded,
                incident_limit: Cap::Unbounded,
                version_history_limit: Cap::Unbounded,
                show_detailed_metrics: true,
            },
        }
    }

    /// Lowercase identifier, as used in file names and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            ReportSize::Small => "small",
            ReportSize::Medium => "medium",
            ReportSize::Full => "full",
            ReportSize::Enterprise => "enterprise",
        }
    }

    /// Capitalised name shown on the cover page.
    pub fn label(self) -> &'static str {
        match self {
            ReportSize::Small => "Small",
            ReportSize::Medium => "Medium",
            ReportSize::Full => "Full",
            ReportSize::Enterprise => "Enterprise",
        }
    }
}

impl fmt::Display for ReportSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportSize {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ReportSize::ALL
            .into_iter()
            .find(|size| size.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownTier(s.to_string()))
    }
}

/// Whether `size` includes the section `id`.
pub fn is_section_included(id: SectionId, size: ReportSize) -> bool {
    size.config().sections.contains(id)
}

/// Returns a copy of `report` with its long lists cut down to the limits of `size`.
///
/// Only trailing entries are dropped; the input is left untouched.
pub fn select_sections(report: &Report, size: ReportSize) -> Report {
    let config = size.config();
    let mut filtered = report.clone();
    config
        .cve_limit
        .truncate(&mut filtered.vulnerabilities.recent_cves);
    config
        .incident_limit
        .truncate(&mut filtered.incidents.timeline);
    config
        .version_history_limit
        .truncate(&mut filtered.release_lifecycle.version_history);
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_sizes_case_insensitively() {
        assert_eq!("small".parse::<ReportSize>(), Ok(ReportSize::Small));
        assert_eq!(
            "Enterprise".parse::<ReportSize>(),
            Ok(ReportSize::Enterprise)
        );
        assert_eq!(" full ".parse::<ReportSize>(), Ok(ReportSize::Full));
    }

    #[test]
    fn unknown_size_is_rejected() {
        let err = "large".parse::<ReportSize>().unwrap_err();
        assert_eq!(err, UnknownTier("large".into()));
    }

    #[test]
    fn section_ids_round_trip_through_strings() {
        for id in SectionId::ALL {
            assert_eq!(id.as_str().parse::<SectionId>(), Ok(id));
        }
        assert!("all".parse::<SectionId>().is_err());
    }

    #[test]
    fn small_excludes_vulnerabilities() {
        assert!(is_section_included(SectionId::KeyFindings, ReportSize::Small));
        assert!(!is_section_included(SectionId::Vulnerabilities, ReportSize::Small));
        assert!(is_section_included(SectionId::Vulnerabilities, ReportSize::Medium));
    }

    #[test]
    fn full_section_set_matches_its_table_row() {
        let full: Vec<SectionId> = SectionId::ALL
            .into_iter()
            .filter(|id| is_section_included(*id, ReportSize::Full))
            .collect();
        assert_eq!(
            full,
            vec![
                SectionId::Overview,
                SectionId::TrustScore,
                SectionId::KeyFindings,
                SectionId::Security,
                SectionId::Vulnerabilities,
                SectionId::Privacy,
                SectionId::Technical,
                SectionId::Compliance,
                SectionId::Sources,
            ]
        );
        assert!(is_section_included(SectionId::Alternatives, ReportSize::Enterprise));
    }

    #[test]
    fn cap_clamps_lengths() {
        assert_eq!(Cap::Limited(3).clamp(10), 3);
        assert_eq!(Cap::Limited(3).clamp(1), 1);
        assert_eq!(Cap::Unbounded.clamp(42), 42);
        assert_eq!(Cap::Unbounded.to_string(), "unbounded");
    }

    #[test]
    fn only_small_hides_detailed_metrics() {
        for size in ReportSize::ALL {
            assert_eq!(
                size.config().show_detailed_metrics,
                size != ReportSize::Small
            );
        }
    }
}
