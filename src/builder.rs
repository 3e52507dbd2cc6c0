//! Report construction: size filter, cover, sections, footers and PDF encoding.

use chrono::{Local, NaiveDate};
use log::info;

use crate::cover::draw_cover;
use crate::document::{Document, DrawOp, TextRun};
use crate::error::ReportError;
use crate::fonts;
use crate::layout::{truncate_to_width, LayoutConfig, LayoutEngine};
use crate::model::Report;
use crate::sanitize::{report_file_name, sanitize};
use crate::sections::{draw_sections, SectionContext, SectionMark};
use crate::serialize::to_pdf_bytes;
use crate::style::{palette, FontWeight};
use crate::tier::{select_sections, ReportSize};

/// Title written on the cover, in the footer and into the PDF metadata.
pub const REPORT_TITLE: &str = "Security Assessment Report";

const FOOTER_FONT_SIZE: f64 = 8.0;
const FOOTER_RULE_GAP: f64 = 2.0;

/// A fully laid out report that has not been encoded yet.
#[derive(Clone, Debug)]
pub struct ComposedReport {
    pub document: Document,
    pub sections: Vec<SectionMark>,
}

/// A finished PDF together with its suggested file name.
#[derive(Clone, Debug)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub page_count: usize,
    pub sections: Vec<SectionMark>,
}

/// Builder for one report export.
#[derive(Clone, Debug)]
pub struct ReportBuilder<'a> {
    report: &'a Report,
    size: ReportSize,
    layout: LayoutConfig,
    generated_on: Option<NaiveDate>,
}

impl<'a> ReportBuilder<'a> {
    /// Creates a builder with the default A4 layout.
    pub fn new(report: &'a Report, size: ReportSize) -> Self {
        Self {
            report,
            size,
            layout: LayoutConfig::default(),
            generated_on: None,
        }
    }

    /// Replaces the page geometry.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Fixes the generation date shown on the cover instead of using today's date.
    pub fn with_generated_on(mut self, date: NaiveDate) -> Self {
        self.generated_on = Some(date);
        self
    }

    /// File name suggested for the download.
    pub fn file_name(&self) -> String {
        report_file_name(&self.report.product.name, self.size.as_str())
    }

    /// Lays out every page and stamps the footers.
    pub fn compose(&self) -> Result<ComposedReport, ReportError> {
        let filtered = select_sections(self.report, self.size);
        let generated_on = self
            .generated_on
            .unwrap_or_else(|| Local::now().date_naive());

        let mut engine = LayoutEngine::new(self.layout.clone())
            .map_err(|err| ReportError::generation("invalid page layout", err))?;
        draw_cover(&mut engine, &filtered, self.size, generated_on);
        engine
            .new_page()
            .map_err(|err| ReportError::generation("starting the report body", err))?;

        let ctx = SectionContext::new(&filtered, self.size)
            .with_source(self.report);
        let sections = draw_sections(&mut engine, &ctx)
            .map_err(|err| ReportError::generation("laying out report sections", err))?;

        let mut document = engine.into_document();
        stamp_footers(&mut document, &self.layout, &filtered.product.name);
        Ok(ComposedReport { document, sections })
    }

    /// Renders the report to PDF bytes.
    ///
    /// Either a complete document is returned or an error; nothing partial escapes.
    pub fn render(&self) -> Result<RenderedReport, ReportError> {
        let composed = self.compose()?;
        let title = format!("{REPORT_TITLE} - {}", sanitize(&self.report.product.name));
        let bytes = to_pdf_bytes(&composed.document, &title)
            .map_err(|err| ReportError::generation("encoding PDF", err))?;

        let rendered = RenderedReport {
            bytes,
            file_name: self.file_name(),
            page_count: composed.document.page_count(),
            sections: composed.sections,
        };
        info!(
            "Rendered {} ({} report): {} pages, {} bytes",
            rendered.file_name,
            self.size,
            rendered.page_count,
            rendered.bytes.len()
        );
        Ok(rendered)
    }

    /// Renders the report and adds a PDF outline entry per section.
    #[cfg(feature = "bookmarks")]
    pub fn render_with_bookmarks(&self) -> Result<RenderedReport, ReportError> {
        let mut rendered = self.render()?;
        rendered.bytes =
            crate::bookmarks::apply_section_bookmarks(&rendered.bytes, &rendered.sections)
                .map_err(|err| ReportError::generation("adding section bookmarks", err))?;
        Ok(rendered)
    }
}

/// Footer line of page `page` out of `total`.
pub fn footer_text(product_name: &str, page: usize, total: usize) -> String {
    format!("{REPORT_TITLE} - {product_name} - Page {page} of {total}")
}

/// Stamps every page with the centred footer once the page count is known.
///
/// Long product names are shortened so the line always fits between the margins.
fn stamp_footers(document: &mut Document, layout: &LayoutConfig, product_name: &str) {
    let total = document.page_count();
    let name = sanitize(product_name);
    let max_width = layout.content_width();
    let baseline = layout.page_height - layout.footer_offset;
    let rule_y = layout.bottom_limit() + FOOTER_RULE_GAP;

    for (index, page) in document.pages_mut().iter_mut().enumerate() {
        let mut text = footer_text(&name, index + 1, total);
        if fonts::text_width(&text, FOOTER_FONT_SIZE, FontWeight::Regular) > max_width {
            let fixed = footer_text("", index + 1, total);
            let room = max_width - fonts::text_width(&fixed, FOOTER_FONT_SIZE, FontWeight::Regular);
            let short = truncate_to_width(
                &name,
                room.max(0.0),
                FOOTER_FONT_SIZE,
                FontWeight::Regular,
            );
            text = footer_text(&short, index + 1, total);
        }
        let width = fonts::text_width(&text, FOOTER_FONT_SIZE, FontWeight::Regular);

        if index > 0 {
            page.push(DrawOp::Line {
                x1: layout.margin_left,
                y1: rule_y,
                x2: layout.page_width - layout.margin_right,
                y2: rule_y,
                color: palette::RULE,
                thickness: 0.2,
            });
        }
        page.push(DrawOp::Text(TextRun {
            x: (layout.page_width - width) / 2.0,
            baseline,
            text,
            size: FOOTER_FONT_SIZE,
            weight: FontWeight::Regular,
            color: palette::FOOTER,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 14).unwrap()
    }

    #[test]
    fn every_page_gets_numbered_footer() {
        let report = samples::stress().unwrap();
        let composed = ReportBuilder::new(&report, ReportSize::Enterprise)
            .with_generated_on(date())
            .compose()
            .unwrap();
        let total = composed.document.page_count();
        assert!(total > 2);
        for (index, page) in composed.document.pages().iter().enumerate() {
            let expected = format!("Page {} of {total}", index + 1);
            assert!(
                page.contains_text(&expected),
                "page {} lacks footer",
                index + 1
            );
        }
    }

    #[test]
    fn footer_shortens_long_names() {
        let mut report = samples::slack().unwrap();
        report.product.name = "Very Long Product Name ".repeat(12);
        let composed = ReportBuilder::new(&report, ReportSize::Small)
            .with_generated_on(date())
            .compose()
            .unwrap();
        let layout = LayoutConfig::default();
        let footer = composed
            .document
            .texts()
            .find(|run| run.text.starts_with(REPORT_TITLE) && run.text.contains("Page 1 of"))
            .expect("footer");
        assert!(footer.text.contains("..."));
        assert!(footer.x >= layout.margin_left - 1e-9);
        assert!(footer.right() <= layout.page_width - layout.margin_right + 1e-9);
    }

    #[test]
    fn body_starts_after_cover() {
        let report = samples::github().unwrap();
        let composed = ReportBuilder::new(&report, ReportSize::Medium)
            .with_generated_on(date())
            .compose()
            .unwrap();
        assert_eq!(composed.sections[0].title, "Product Overview");
        assert_eq!(composed.sections[0].page, 2);
    }

    #[test]
    fn page_budget_failure_is_generation_error() {
        let report = samples::stress().unwrap();
        let err = ReportBuilder::new(&report, ReportSize::Enterprise)
            .with_layout(LayoutConfig::default().with_max_pages(2))
            .render()
            .unwrap_err();
        assert!(matches!(err, ReportError::Generation { .. }));
        assert!(!err.is_delivery_failure());
    }

    #[test]
    fn render_suggests_file_name() {
        let report = samples::slack().unwrap();
        let rendered = ReportBuilder::new(&report, ReportSize::Full)
            .with_generated_on(date())
            .render()
            .unwrap();
        assert_eq!(rendered.file_name, "Slack_Security_Report_full.pdf");
        assert!(rendered.bytes.starts_with(b"%PDF-"));
    }
}
