//! Paginated PDF export of software security assessment reports.
//!
//! A [`ReportBuilder`] takes an assessment [`Report`] and a [`ReportSize`], trims the report to
//! what that size includes, lays out a fixed cover page followed by flowing sections, stamps
//! `Page i of N` footers and encodes the result with `printpdf`.
//!
//! ```no_run
//! use assessment_report::{deliver, DirectorySink, Report, ReportBuilder, ReportSize};
//!
//! # fn main() -> Result<(), assessment_report::ReportError> {
//! let report = Report::from_json_str(&std::fs::read_to_string("slack.json").unwrap_or_default())?;
//! let rendered = ReportBuilder::new(&report, ReportSize::Medium).render()?;
//! deliver(&rendered, &mut DirectorySink::new("reports"))?;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "bookmarks")]
pub mod bookmarks;
pub mod builder;
pub mod cover;
pub mod delivery;
pub mod document;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod model;
pub mod samples;
pub mod sanitize;
pub mod sections;
pub mod serialize;
pub mod style;
pub mod tier;

pub use builder::{ComposedReport, RenderedReport, ReportBuilder};
pub use delivery::{deliver, DirectorySink, DownloadSink, MemorySink};
pub use error::{ReportError, UnknownTier};
pub use layout::LayoutConfig;
pub use model::Report;
pub use sanitize::{report_file_name, sanitize};
pub use tier::{is_section_included, select_sections, ReportSize, SectionId};
