//! Bundled assessment data.
//!
//! The Slack and GitHub records are the mock dataset the assessment UI ships with.  The stress
//! record starts from Slack and inflates every capped list, turns on the CISA KEV flag and fills
//! free text with emoji and typographic punctuation.

use std::fmt;
use std::str::FromStr;

use crate::error::ReportError;
use crate::model::{Citation, Cve, Incident, Report, VersionEntry};

const SLACK_JSON: &str = include_str!("slack.json");
const GITHUB_JSON: &str = include_str!("github.json");

/// Names of the bundled reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sample {
    Slack,
    Github,
    Stress,
}

impl Sample {
    pub const ALL: [Sample; 3] = [Sample::Slack, Sample::Github, Sample::Stress];

    pub fn as_str(self) -> &'static str {
        match self {
            Sample::Slack => "slack",
            Sample::Github => "github",
            Sample::Stress => "stress",
        }
    }

    /// Loads the report.
    pub fn load(self) -> Result<Report, ReportError> {
        match self {
            Sample::Slack => slack(),
            Sample::Github => github(),
            Sample::Stress => stress(),
        }
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sample {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sample::ALL
            .into_iter()
            .find(|sample| sample.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown sample `{s}` (expected slack, github or stress)"))
    }
}

pub fn slack() -> Result<Report, ReportError> {
    Report::from_json_str(SLACK_JSON)
}

pub fn github() -> Result<Report, ReportError> {
    Report::from_json_str(GITHUB_JSON)
}

const SEVERITIES: [(&str, f64); 4] = [
    ("Critical", 9.8),
    ("High", 7.5),
    ("Medium", 5.4),
    ("Low", 3.1),
];

const STRESS_DESCRIPTION: &str = "Messaging platform \u{2014} \u{201C}built for teams\u{201D} \
    \u{1F4AC}\u{FE0F} with end\u{2011}to\u{2011}end sync\u{2026} and \u{2018}smart\u{2019} \
    replies \u{2705}.";
const STRESS_RATIONALE: &str = "Repeated critical vulnerabilities \u{2192} exploited in the wild. ";

/// A report that exercises page breaks, list caps, the KEV escalation and text sanitization.
pub fn stress() -> Result<Report, ReportError> {
    let mut report = slack()?;
    report.id = "stress-001".to_string();
    report.product.name = "Acme \u{201C}Secure\u{201D} Chat \u{1F680}".to_string();
    report.product.description = STRESS_DESCRIPTION.to_string();
    report.trust_score.score = 34.0;
    report.trust_score.rationale = STRESS_RATIONALE.repeat(12);

    let vulns = &mut report.vulnerabilities;
    vulns.cisa_kev = true;
    vulns.cve_count = 15;
    vulns.severity_breakdown.critical = 4;
    vulns.severity_breakdown.high = 4;
    vulns.severity_breakdown.medium = 4;
    vulns.severity_breakdown.low = 3;
    vulns.recent_cves = (1..=15)
        .map(|n: u32| {
            let (severity, cvss) = SEVERITIES[(n as usize - 1) % SEVERITIES.len()];
            Cve {
                id: format!("CVE-2025-{:05}", 40000 + n),
                cvss,
                severity: severity.to_string(),
                description: format!(
                    "Entry {n}: \u{201C}crafted\u{201D} payload in the message parser allows \
                     remote code execution when previews are rendered \u{26A0}\u{FE0F}."
                ),
                published_date: Some(format!("2025-{:02}-01", (n % 12) + 1)),
                patched: n % 3 != 0,
            }
        })
        .collect();

    report.incidents.count = 12;
    report.incidents.timeline = (1..=12)
        .map(|n: u32| Incident {
            date: format!("20{:02}-06-15", 10 + n),
            title: format!("Incident {n} \u{2013} credential exposure"),
            severity: if n % 2 == 0 { "High" } else { "Medium" }.to_string(),
            description: "Tokens were written to application logs \u{1F511} and retained for \
                          longer than the documented policy."
                .to_string(),
            impact: "Limited exposure of session tokens".to_string(),
            resolution: "Tokens rotated, logging pipeline scrubbed".to_string(),
            sources: vec![Citation {
                id: format!("s{n}"),
                kind: "independent".to_string(),
                title: format!("Researcher write-up #{n}"),
                url: Some(format!("https://example.org/advisories/{n}")),
                verified: n % 2 == 0,
                date: None,
            }],
        })
        .collect();

    report.release_lifecycle.version_history = (0..14)
        .map(|n: u32| VersionEntry {
            version: format!("5.{}.0", 14 - n),
            release_date: format!("2025-{:02}-10", (n % 12) + 1),
            security_fixes: n % 4,
        })
        .collect();

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_reports_decode() {
        let slack = slack().unwrap();
        assert_eq!(slack.product.name, "Slack");
        assert_eq!(slack.trust_score.score, 78.0);
        assert_eq!(slack.vulnerabilities.recent_cves.len(), 2);
        assert!(!slack.vulnerabilities.cisa_kev);

        let github = github().unwrap();
        assert_eq!(github.product.vendor, "Microsoft");
        assert!(github.release_lifecycle.version_history.is_empty());
    }

    #[test]
    fn stress_report_exceeds_every_cap() {
        let report = stress().unwrap();
        assert_eq!(report.vulnerabilities.recent_cves.len(), 15);
        assert_eq!(report.incidents.timeline.len(), 12);
        assert_eq!(report.release_lifecycle.version_history.len(), 14);
        assert!(report.vulnerabilities.cisa_kev);
    }

    #[test]
    fn sample_names_parse() {
        assert_eq!("GitHub".parse::<Sample>(), Ok(Sample::Github));
        assert!("zoom".parse::<Sample>().is_err());
    }
}
