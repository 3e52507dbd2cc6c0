//! Section assemblers.
//!
//! Each report section is described by a [`SectionSpec`]: the tier section it belongs to, its
//! title, an extra content predicate and the procedure drawing its body.  [`draw_sections`] walks
//! the table in presentation order and skips every section the active size excludes, so an
//! excluded section emits nothing at all.

use log::debug;

use crate::cover::{format_number, score_band};
use crate::document::{Document, DrawOp, Paint, TextRun};
use crate::error::LayoutError;
use crate::fonts;
use crate::layout::LayoutEngine;
use crate::model::{Citation, Report};
use crate::sanitize::sanitize;
use crate::style::{palette, FontWeight, Rgb, Severity, TextStyle};
use crate::tier::{is_section_included, ReportSize, SectionId, TierConfig};

/// Where a rendered section begins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionMark {
    pub id: SectionId,
    pub title: String,
    /// 1-based page holding the section header.
    pub page: usize,
}

/// Inputs shared by all section assemblers.
#[derive(Clone, Copy, Debug)]
pub struct SectionContext<'a> {
    /// The report after the size filter was applied.
    pub report: &'a Report,
    /// The report as submitted, before any list was capped.
    pub source: &'a Report,
    pub size: ReportSize,
    pub tier: TierConfig,
}

impl<'a> SectionContext<'a> {
    pub fn new(report: &'a Report, size: ReportSize) -> Self {
        Self {
            report,
            source: report,
            size,
            tier: size.config(),
        }
    }

    /// Records the unfiltered report that `report` was selected from.
    pub fn with_source(mut self, source: &'a Report) -> Self {
        self.source = source;
        self
    }
}

type BodyFn = fn(&mut LayoutEngine, &SectionContext<'_>) -> Result<(), LayoutError>;

/// One entry of the section table.
pub struct SectionSpec {
    pub id: SectionId,
    pub title: &'static str,
    /// Smallest size that shows the section, overriding the tier's section set.
    min_size: Option<ReportSize>,
    applies: fn(&SectionContext<'_>) -> bool,
    body: BodyFn,
}

impl SectionSpec {
    /// Whether this section is emitted for the given context.
    pub fn is_emitted(&self, ctx: &SectionContext<'_>) -> bool {
        let included = match self.min_size {
            Some(min_size) => ctx.size >= min_size,
            None => is_section_included(self.id, ctx.size),
        };
        included && (self.applies)(ctx)
    }
}

/// Every section in presentation order.
pub static SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        id: SectionId::Overview,
        title: "Product Overview",
        min_size: None,
        applies: always,
        body: product_overview,
    },
    SectionSpec {
        id: SectionId::TrustScore,
        title: "Trust Score Analysis",
        min_size: None,
        applies: always,
        body: trust_score,
    },
    SectionSpec {
        id: SectionId::KeyFindings,
        title: "Key Findings",
        min_size: None,
        applies: always,
        body: key_findings_section,
    },
    SectionSpec {
        id: SectionId::Overview,
        title: "Vendor Information",
        min_size: None,
        applies: always,
        body: vendor_information,
    },
    SectionSpec {
        id: SectionId::Overview,
        title: "Platform Support",
        min_size: None,
        applies: always,
        body: platform_support,
    },
    SectionSpec {
        id: SectionId::Security,
        title: "Admin Controls & Security Features",
        min_size: None,
        applies: always,
        body: admin_controls,
    },
    SectionSpec {
        id: SectionId::Vulnerabilities,
        title: "Vulnerabilities & CVE Analysis",
        min_size: None,
        applies: always,
        body: vulnerabilities,
    },
    SectionSpec {
        id: SectionId::Privacy,
        title: "Data Handling & Privacy",
        min_size: None,
        applies: always,
        body: data_handling,
    },
    SectionSpec {
        id: SectionId::Privacy,
        title: "Required Permissions",
        min_size: None,
        applies: detailed_metrics,
        body: permissions,
    },
    SectionSpec {
        id: SectionId::Technical,
        title: "AI Features Analysis",
        min_size: None,
        applies: has_ai,
        body: ai_features,
    },
    SectionSpec {
        id: SectionId::Technical,
        title: "Release & Patch Management",
        min_size: None,
        applies: always,
        body: release_lifecycle,
    },
    SectionSpec {
        id: SectionId::Security,
        title: "Security Incidents",
        min_size: None,
        applies: has_incidents,
        body: incidents,
    },
    SectionSpec {
        id: SectionId::Compliance,
        title: "Compliance & Certifications",
        min_size: None,
        applies: always,
        body: compliance,
    },
    SectionSpec {
        id: SectionId::Sources,
        title: "Information Sources",
        min_size: None,
        applies: always,
        body: sources,
    },
    SectionSpec {
        id: SectionId::Alternatives,
        title: "Alternative Products",
        min_size: Some(ReportSize::Full),
        applies: has_alternatives,
        body: alternatives,
    },
];

/// Draws every section the context includes, starting at the engine's cursor.
pub fn draw_sections(
    engine: &mut LayoutEngine,
    ctx: &SectionContext<'_>,
) -> Result<Vec<SectionMark>, LayoutError> {
    let mut marks = Vec::new();
    for spec in SECTIONS.iter().filter(|spec| spec.is_emitted(ctx)) {
        let page = engine.draw_section_header(spec.title)?;
        debug!(
            "Section '{}' ({}) starts on page {page}",
            spec.title, spec.id
        );
        (spec.body)(engine, ctx)?;
        marks.push(SectionMark {
            id: spec.id,
            title: spec.title.to_string(),
            page,
        });
    }
    Ok(marks)
}

/// Titles of the sections that would be emitted, in order.
pub fn planned_titles(ctx: &SectionContext<'_>) -> Vec<&'static str> {
    SECTIONS
        .iter()
        .filter(|spec| spec.is_emitted(ctx))
        .map(|spec| spec.title)
        .collect()
}

fn always(_: &SectionContext<'_>) -> bool {
    true
}

fn detailed_metrics(ctx: &SectionContext<'_>) -> bool {
    ctx.tier.show_detailed_metrics
}

fn has_ai(ctx: &SectionContext<'_>) -> bool {
    ctx.report.ai_features.has_ai
}

fn has_incidents(ctx: &SectionContext<'_>) -> bool {
    ctx.report.incidents.count > 0
}

fn has_alternatives(ctx: &SectionContext<'_>) -> bool {
    !ctx.report.alternatives.is_empty()
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn available(value: bool) -> &'static str {
    if value {
        "Available"
    } else {
        "Not Available"
    }
}

fn or_unspecified(value: &str) -> &str {
    if value.trim().is_empty() {
        "Not specified"
    } else {
        value
    }
}

fn body() -> TextStyle {
    TextStyle::regular(10.0)
}

fn detail() -> TextStyle {
    TextStyle::regular(9.0)
}

fn label(size: f64) -> TextStyle {
    TextStyle::bold(size)
}

fn small(size: f64) -> TextStyle {
    TextStyle::regular(size).with_indent(4.0)
}

fn citation_line(citation: &Citation) -> String {
    let title = or_unspecified(&citation.title);
    match citation.url.as_deref() {
        Some(url) if !url.is_empty() => format!("{title} ({url})"),
        _ => title.to_string(),
    }
}

fn product_overview(
    engine: &mut LayoutEngine,
    ctx: &SectionContext<'_>,
) -> Result<(), LayoutError> {
    let product = &ctx.report.product;
    engine.draw_key_value("Category", or_unspecified(&product.category))?;
    if let Some(website) = product.website.as_deref().filter(|w| !w.is_empty()) {
        engine.draw_key_value("Website", website)?;
    }
    engine.draw_text(&product.description, &body(), 2.0)?;
    engine.advance(3.0)?;
    engine.draw_text("Primary Use Cases:", &label(10.0), 1.0)?;
    engine.draw_text(&product.usage, &body(), 2.0)
}

fn trust_score(engine: &mut LayoutEngine, ctx: &SectionContext<'_>) -> Result<(), LayoutError> {
    let score = &ctx.report.trust_score;
    engine.draw_key_value(
        "Trust Score",
        &format!(
            "{}/100 ({})",
            format_number(score.score),
            score_band(score.score).label()
        ),
    )?;
    engine.draw_text(&score.rationale, &body(), 2.0)?;
    engine.draw_key_value(
        "Confidence Level",
        &format!("{}%", format_number(score.confidence)),
    )
}

/// A notable point surfaced in the Key Findings section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub text: String,
}

/// Derives the key findings of a report, most severe first.
///
/// Pass the report before list capping so counts do not depend on the report size.
pub fn key_findings(report: &Report) -> Vec<Finding> {
    let mut findings = Vec::new();
    let vulns = &report.vulnerabilities;

    if vulns.cisa_kev {
        findings.push(Finding {
            severity: Severity::Danger,
            text: "Listed in the CISA Known Exploited Vulnerabilities catalog: at least one \
                   vulnerability in this product is actively exploited."
                .to_string(),
        });
    }

    let severe = &vulns.severity_breakdown;
    if severe.critical > 0 || severe.high > 0 {
        findings.push(Finding {
            severity: Severity::Warning,
            text: format!(
                "{} critical and {} high severity vulnerabilities reported",
                severe.critical, severe.high
            ),
        });
    }

    let unpatched = vulns.recent_cves.iter().filter(|cve| !cve.patched).count();
    if unpatched > 0 {
        findings.push(Finding {
            severity: Severity::Warning,
            text: format!("{unpatched} recent CVEs remain unpatched"),
        });
    }

    let trains_on_data =
        report.data_handling.usage.ai_training || report.ai_features.data_used_for_training;
    if trains_on_data && !report.ai_features.can_opt_out {
        findings.push(Finding {
            severity: Severity::Warning,
            text: "Customer data may be used for AI training without an opt-out".to_string(),
        });
    }

    let controls = &report.admin_controls;
    if !controls.sso {
        findings.push(Finding {
            severity: Severity::Info,
            text: "Single sign-on (SSO) is not available".to_string(),
        });
    }
    if !controls.mfa {
        findings.push(Finding {
            severity: Severity::Warning,
            text: "Multi-factor authentication (MFA) is not available".to_string(),
        });
    }

    if let Some(note) = report
        .permissions
        .over_permissioning_risk
        .as_deref()
        .filter(|note| !note.trim().is_empty())
    {
        findings.push(Finding {
            severity: Severity::Warning,
            text: format!("Over-permissioning: {note}"),
        });
    }

    if report.incidents.count > 0 {
        findings.push(Finding {
            severity: Severity::Info,
            text: format!("{} security incidents on record", report.incidents.count),
        });
    }

    findings
}

fn key_findings_section(
    engine: &mut LayoutEngine,
    ctx: &SectionContext<'_>,
) -> Result<(), LayoutError> {
    let findings = key_findings(ctx.source);
    if findings.is_empty() {
        return engine.draw_info_box(
            "No significant security concerns were identified.",
            Severity::Success,
        );
    }
    for finding in &findings {
        if finding.severity == Severity::Danger {
            engine.draw_info_box(&finding.text, Severity::Danger)?;
        } else {
            engine.draw_bullet(&finding.text, &body())?;
        }
    }
    engine.advance(2.0)
}

fn vendor_information(
    engine: &mut LayoutEngine,
    ctx: &SectionContext<'_>,
) -> Result<(), LayoutError> {
    let vendor = &ctx.report.vendor_info;
    engine.draw_key_value("Company", or_unspecified(&vendor.company_name))?;
    engine.draw_key_value("Headquarters", or_unspecified(&vendor.headquarters))?;
    engine.draw_key_value("Jurisdiction", or_unspecified(&vendor.jurisdiction))?;
    let founded = if vendor.founded == 0 {
        "Unknown".to_string()
    } else {
        vendor.founded.to_string()
    };
    engine.draw_key_value("Founded", &founded)?;
    engine.draw_key_value(
        "Reputation Score",
        &format!("{}/100", format_number(vendor.reputation.score)),
    )?;
    if let Some(psirt) = vendor.psirt_page.as_deref().filter(|p| !p.is_empty()) {
        engine.draw_key_value("Security Response", psirt)?;
    }
    engine.draw_text(&vendor.reputation.summary, &body(), 2.0)?;
    engine.advance(3.0)?;
    engine.draw_text("Security Track Record:", &label(10.0), 1.0)?;
    engine.draw_text(&vendor.security_track_record, &body(), 2.0)
}

fn platform_support(
    engine: &mut LayoutEngine,
    ctx: &SectionContext<'_>,
) -> Result<(), LayoutError> {
    let support = &ctx.report.platform_support;
    let supported: Vec<&str> = support
        .platforms
        .iter()
        .filter(|p| p.supported)
        .map(|p| p.name.as_str())
        .collect();
    let supported = if supported.is_empty() {
        "None listed".to_string()
    } else {
        supported.join(", ")
    };
    engine.draw_key_value("Supported Platforms", &supported)?;

    if ctx.tier.show_detailed_metrics {
        for platform in &support.platforms {
            let status = if platform.supported {
                "Supported"
            } else {
                "Not supported"
            };
            let mut details = vec![status.to_string()];
            for extra in [&platform.versions, &platform.security_model] {
                details.extend(extra.iter().filter(|text| !text.is_empty()).cloned());
            }
            engine.draw_key_value(&platform.name, &details.join(" - "))?;
        }
    }
    if let Some(differences) = support.version_differences.as_deref() {
        engine.draw_text(differences, &body(), 2.0)?;
    }
    Ok(())
}

fn admin_controls(engine: &mut LayoutEngine, ctx: &SectionContext<'_>) -> Result<(), LayoutError> {
    let controls = &ctx.report.admin_controls;
    engine.draw_key_value("Single Sign-On (SSO)", available(controls.sso))?;
    engine.draw_key_value("Multi-Factor Auth (MFA)", available(controls.mfa))?;
    engine.draw_key_value("Role-Based Access (RBAC)", available(controls.rbac))?;
    engine.draw_key_value("SCIM Provisioning", available(controls.scim))?;
    engine.draw_key_value("Audit Logs", available(controls.audit_logs))?;
    engine.draw_key_value("Data Export", available(controls.data_export))
}

/// Text of the danger box drawn for a KEV-listed product.
pub const KEV_LISTED_TEXT: &str = "CISA KEV Status: Listed in the CISA Known Exploited \
     Vulnerabilities catalog. Actively exploited vulnerabilities require immediate patching.";
/// Value of the plain row drawn when a product is not KEV-listed.
pub const KEV_NOT_LISTED_TEXT: &str = "Not listed in CISA KEV";

const HISTOGRAM_ROW: f64 = 6.0;
const HISTOGRAM_LABEL_WIDTH: f64 = 28.0;
const HISTOGRAM_BAR_HEIGHT: f64 = 4.0;
const HISTOGRAM_COUNT_GAP: f64 = 2.0;

fn vulnerabilities(engine: &mut LayoutEngine, ctx: &SectionContext<'_>) -> Result<(), LayoutError> {
    let vulns = &ctx.report.vulnerabilities;
    engine.draw_key_value("Total CVE Count", &vulns.cve_count.to_string())?;

    if vulns.cisa_kev {
        engine.draw_info_box(KEV_LISTED_TEXT, Severity::Danger)?;
    } else {
        engine.draw_key_value("CISA KEV Status", KEV_NOT_LISTED_TEXT)?;
    }

    let severity = &vulns.severity_breakdown;
    let rows = [
        ("Critical", severity.critical, palette::DANGER),
        ("High", severity.high, palette::ALERT),
        ("Medium", severity.medium, palette::WARNING),
        ("Low", severity.low, palette::SUCCESS),
    ];
    if ctx.tier.show_detailed_metrics {
        engine.advance(2.0)?;
        engine.draw_text("Severity Breakdown:", &label(10.0), 1.0)?;
        draw_histogram(engine, &rows)?;
    } else {
        for (name, count, _) in rows {
            engine.draw_key_value(&format!("{name} Severity"), &count.to_string())?;
        }
    }

    if ctx.tier.show_detailed_metrics && !vulns.recent_cves.is_empty() {
        engine.advance(3.0)?;
        engine.draw_text("Recent CVEs:", &label(11.0), 1.0)?;
        for cve in &vulns.recent_cves {
            engine.advance(2.0)?;
            engine.draw_text(
                &format!(
                    "{} - {} (CVSS: {})",
                    cve.id,
                    cve.severity,
                    format_number(cve.cvss)
                ),
                &label(9.0),
                0.5,
            )?;
            engine.draw_text(&cve.description, &TextStyle::regular(8.0), 1.0)?;
            if let Some(published) = cve.published_date.as_deref() {
                engine.draw_key_value("Published", published)?;
            }
            engine.draw_key_value("Status", if cve.patched { "Patched" } else { "Unpatched" })?;
        }
    }

    if ctx.tier.show_detailed_metrics {
        let active: Vec<String> = vulns
            .trend_data
            .iter()
            .filter(|point| point.count > 0)
            .map(|point| format!("{}: {}", point.month, point.count))
            .collect();
        if !active.is_empty() {
            engine.advance(2.0)?;
            engine.draw_key_value("CVE Trend", &active.join(", "))?;
        }
    }
    Ok(())
}

fn draw_histogram(engine: &mut LayoutEngine, rows: &[(&str, u32, Rgb)]) -> Result<(), LayoutError> {
    let max = rows
        .iter()
        .map(|(_, count, _)| *count)
        .max()
        .unwrap_or(0)
        .max(1);
    let left = engine.config().margin_left;
    let style = TextStyle::regular(9.0);
    let widest_count = rows
        .iter()
        .map(|(_, count, _)| fonts::text_width(&count.to_string(), style.size, FontWeight::Bold))
        .fold(0.0, f64::max);
    let reserved = HISTOGRAM_LABEL_WIDTH + HISTOGRAM_COUNT_GAP + widest_count;
    let bar_space = (engine.config().content_width() - reserved).max(0.0);

    for (name, count, color) in rows {
        engine.ensure_space(HISTOGRAM_ROW)?;
        let top = engine.cursor().y;
        let baseline = top + (HISTOGRAM_ROW + fonts::ascent(style.size)) / 2.0;
        engine.push(DrawOp::Text(TextRun {
            x: left,
            baseline,
            text: (*name).to_string(),
            size: style.size,
            weight: FontWeight::Regular,
            color: style.color,
        }));
        let width = bar_space * f64::from(*count) / f64::from(max);
        if width > 0.0 {
            engine.push(DrawOp::Rect {
                x: left + HISTOGRAM_LABEL_WIDTH,
                y: top + (HISTOGRAM_ROW - HISTOGRAM_BAR_HEIGHT) / 2.0,
                width,
                height: HISTOGRAM_BAR_HEIGHT,
                paint: Paint::Fill(*color),
            });
        }
        engine.push(DrawOp::Text(TextRun {
            x: left + HISTOGRAM_LABEL_WIDTH + width + HISTOGRAM_COUNT_GAP,
            baseline,
            text: count.to_string(),
            size: style.size,
            weight: FontWeight::Bold,
            color: style.color,
        }));
        engine.advance(HISTOGRAM_ROW)?;
    }
    Ok(())
}

fn data_handling(engine: &mut LayoutEngine, ctx: &SectionContext<'_>) -> Result<(), LayoutError> {
    let handling = &ctx.report.data_handling;
    let storage = &handling.storage;
    engine.draw_key_value("Data Storage Location", or_unspecified(&storage.location))?;
    let regions = storage.regions.join(", ");
    engine.draw_key_value("Storage Regions", or_unspecified(&regions))?;
    if let Some(provider) = storage.cloud_provider.as_deref() {
        engine.draw_key_value("Cloud Provider", provider)?;
    }
    engine.draw_key_value("Encryption at Rest", yes_no(storage.encryption_at_rest))?;

    let tls = &handling.transmission.encryption_in_transit;
    engine.draw_key_value("TLS Version", or_unspecified(&tls.tls))?;
    engine.draw_key_value("Certificate Verified", yes_no(tls.cert_verified))?;
    if ctx.tier.show_detailed_metrics {
        if !handling.transmission.endpoints.is_empty() {
            engine.draw_key_value("Endpoints", &handling.transmission.endpoints.join(", "))?;
        }
        if !handling.transmission.sub_processors.is_empty() {
            engine.draw_key_value(
                "Sub-processors",
                &handling.transmission.sub_processors.join(", "),
            )?;
        }
    }

    let usage = &handling.usage;
    engine.draw_key_value("Analytics Collection", yes_no(usage.analytics))?;
    engine.draw_key_value("Advertising Use", yes_no(usage.advertising))?;
    engine.draw_key_value("AI Training Use", yes_no(usage.ai_training))?;
    engine.draw_key_value("Retention Policy", or_unspecified(&usage.retention_policy))?;
    engine.draw_key_value("User Can Delete Data", yes_no(usage.user_can_delete))
}

fn permissions(engine: &mut LayoutEngine, ctx: &SectionContext<'_>) -> Result<(), LayoutError> {
    let permissions = &ctx.report.permissions;
    if permissions.required.is_empty() {
        engine.draw_text("No required permissions reported.", &body(), 2.0)?;
    }
    for permission in &permissions.required {
        engine.draw_text(
            &format!(
                "\u{2022} {} ({} risk)",
                permission.name,
                permission.risk_level.as_str().to_uppercase()
            ),
            &label(9.0),
            0.5,
        )?;
        engine.draw_text(&permission.justification, &small(8.0), 1.0)?;
    }

    if !permissions.optional.is_empty() {
        engine.advance(2.0)?;
        let names: Vec<&str> = permissions
            .optional
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        engine.draw_key_value("Optional Permissions", &names.join(", "))?;
    }

    if let Some(note) = permissions
        .over_permissioning_risk
        .as_deref()
        .filter(|note| !note.trim().is_empty())
    {
        engine.advance(2.0)?;
        let warning = format!("Over-permissioning risk: {note}");
        engine.draw_info_box(&warning, Severity::Warning)?;
    }
    Ok(())
}

fn ai_features(engine: &mut LayoutEngine, ctx: &SectionContext<'_>) -> Result<(), LayoutError> {
    let ai = &ctx.report.ai_features;
    let presence = if ai.has_ai { "Present" } else { "Not Present" };
    engine.draw_key_value("AI Features", presence)?;
    engine.draw_key_value("Data Used for Training", yes_no(ai.data_used_for_training))?;
    engine.draw_key_value("Can Opt Out", yes_no(ai.can_opt_out))?;
    engine.draw_key_value(
        "Processing Location",
        or_unspecified(&ai.processing_location),
    )?;

    if ctx.tier.show_detailed_metrics && !ai.features.is_empty() {
        engine.advance(2.0)?;
        engine.draw_text("AI Feature List:", &label(10.0), 1.0)?;
        for feature in &ai.features {
            engine.draw_text(&format!("\u{2022} {}", feature.name), &label(9.0), 0.5)?;
            engine.draw_text(&feature.description, &small(8.0), 0.5)?;
            if !feature.data_access.is_empty() {
                engine.draw_text(
                    &format!("Data access: {}", feature.data_access.join(", ")),
                    &small(8.0).with_color(palette::MUTED),
                    1.0,
                )?;
            }
        }
    }
    Ok(())
}

fn release_lifecycle(
    engine: &mut LayoutEngine,
    ctx: &SectionContext<'_>,
) -> Result<(), LayoutError> {
    let release = &ctx.report.release_lifecycle;
    engine.draw_key_value("Latest Version", or_unspecified(&release.latest_version))?;
    engine.draw_key_value(
        "Release Frequency",
        or_unspecified(&release.release_frequency),
    )?;
    engine.draw_key_value("Patch Cadence", or_unspecified(&release.patch_cadence))?;
    if !release.lts_versions.is_empty() {
        engine.draw_key_value("LTS Versions", &release.lts_versions.join(", "))?;
    }

    if !ctx.tier.show_detailed_metrics {
        return Ok(());
    }
    if !release.version_history.is_empty() {
        engine.advance(2.0)?;
        engine.draw_text("Version History:", &label(10.0), 1.0)?;
        for entry in &release.version_history {
            engine.draw_bullet(
                &format!(
                    "{} ({}) - {} security fixes",
                    entry.version, entry.release_date, entry.security_fixes
                ),
                &detail(),
            )?;
        }
    }
    if !release.eol_dates.is_empty() {
        engine.advance(2.0)?;
        engine.draw_text("End of Life:", &label(10.0), 1.0)?;
        for eol in &release.eol_dates {
            engine.draw_bullet(&format!("{}: {}", eol.version, eol.date), &detail())?;
        }
    }
    Ok(())
}

fn incidents(engine: &mut LayoutEngine, ctx: &SectionContext<'_>) -> Result<(), LayoutError> {
    let incidents = &ctx.report.incidents;
    engine.draw_key_value("Total Incidents", &incidents.count.to_string())?;
    if !ctx.tier.show_detailed_metrics {
        return Ok(());
    }

    for incident in &incidents.timeline {
        engine.advance(3.0)?;
        engine.draw_text(
            &format!("{} - {}", incident.date, incident.title),
            &label(10.0),
            0.5,
        )?;
        engine.draw_key_value("Severity", or_unspecified(&incident.severity))?;
        engine.draw_text(&incident.description, &detail(), 1.0)?;
        engine.draw_text(&format!("Impact: {}", incident.impact), &detail(), 1.0)?;
        engine.draw_text(
            &format!("Resolution: {}", incident.resolution),
            &detail(),
            1.0,
        )?;
        if !incident.sources.is_empty() {
            engine.draw_text("Sources:", &label(8.0).with_color(palette::MUTED), 0.5)?;
            for citation in &incident.sources {
                engine.draw_text(
                    &format!("\u{2022} {}", citation_line(citation)),
                    &small(8.0).with_color(palette::MUTED),
                    0.5,
                )?;
            }
        }
    }
    Ok(())
}

fn compliance(engine: &mut LayoutEngine, ctx: &SectionContext<'_>) -> Result<(), LayoutError> {
    let compliance = &ctx.report.compliance;
    if !compliance.certifications.is_empty() {
        engine.draw_text("Certifications:", &label(10.0), 1.0)?;
        engine.draw_text(&compliance.certifications.join(", "), &detail(), 2.0)?;
    }
    engine.draw_text(&compliance.data_handling_summary, &body(), 2.0)?;
    engine.draw_key_value("DPA Available", yes_no(compliance.dpa))?;

    if ctx.tier.show_detailed_metrics && !compliance.sources.is_empty() {
        engine.advance(2.0)?;
        engine.draw_text("Compliance Sources:", &label(9.0), 0.5)?;
        for citation in &compliance.sources {
            let verified = if citation.verified { " [verified]" } else { "" };
            engine.draw_text(
                &format!("\u{2022} {}{verified}", citation_line(citation)),
                &small(8.0),
                0.5,
            )?;
        }
    }
    Ok(())
}

fn sources(engine: &mut LayoutEngine, ctx: &SectionContext<'_>) -> Result<(), LayoutError> {
    let sources = &ctx.report.sources;
    engine.draw_key_value("Public Sources", &sources.public.count.to_string())?;
    engine.draw_key_value(
        "Confidential Sources",
        &sources.confidential.count.to_string(),
    )?;
    if !ctx.tier.show_detailed_metrics {
        return Ok(());
    }

    engine.advance(2.0)?;
    engine.draw_text("Public Source Types:", &label(10.0), 1.0)?;
    for kind in &sources.public.types {
        engine.draw_bullet(&format!("{}: {}", kind.kind, kind.count), &detail())?;
    }

    if ctx.size == ReportSize::Enterprise {
        engine.advance(2.0)?;
        engine.draw_text("Confidential Source Types:", &label(10.0), 1.0)?;
        for kind in &sources.confidential.types {
            engine.draw_bullet(&format!("{}: {}", kind.kind, kind.count), &detail())?;
        }
    }
    Ok(())
}

fn alternatives(engine: &mut LayoutEngine, ctx: &SectionContext<'_>) -> Result<(), LayoutError> {
    for (index, alternative) in ctx.report.alternatives.iter().enumerate() {
        if index > 0 {
            engine.draw_rule(palette::RULE)?;
        }
        engine.advance(2.0)?;
        engine.draw_text(
            &format!("{} by {}", alternative.name, alternative.vendor),
            &label(10.0),
            0.5,
        )?;
        engine.draw_key_value(
            "Trust Score",
            &format!("{}/100", format_number(alternative.trust_score)),
        )?;
        engine.draw_text(&alternative.summary, &detail(), 1.0)?;
        if let Some(why) = alternative.why_better.as_deref() {
            engine.draw_text(&format!("Why Better: {why}"), &detail(), 1.0)?;
        }
    }
    Ok(())
}

/// Whether `text` appears inside a box of the given severity on any page.
///
/// Used to tell an escalated callout apart from an ordinary row with the same words.
pub fn has_boxed_text(document: &Document, severity: Severity, text: &str) -> bool {
    let needle = sanitize(text);
    document.pages().iter().any(|page| {
        let boxes: Vec<(f64, f64)> = page
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect {
                    y,
                    height,
                    paint: Paint::Fill(color),
                    ..
                } if *color == severity.background() => Some((*y, y + height)),
                _ => None,
            })
            .collect();
        page.texts().any(|run| {
            needle.starts_with(run.text.as_str())
                && !run.text.is_empty()
                && boxes
                    .iter()
                    .any(|(top, bottom)| run.top() >= *top && run.bottom() <= *bottom)
        })
    })
}
