//! Error types for report rendering and delivery.

use std::io;

use thiserror::Error;

/// Failures raised while laying out pages.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// A size or coordinate was NaN, infinite or negative where that makes no sense.
    #[error("invalid {what}: {value}")]
    InvalidMeasurement { what: &'static str, value: f64 },

    /// The document grew past the configured page budget.
    #[error("page budget of {limit} pages exceeded")]
    PageBudgetExceeded { limit: usize },
}

/// Failures raised while encoding the laid out pages as PDF.
#[derive(Error, Debug)]
pub enum SerializeError {
    #[error("failed to register built-in font {font}")]
    Font {
        font: &'static str,
        #[source]
        source: printpdf::Error,
    },

    #[error("failed to encode PDF document")]
    Encode(#[source] printpdf::Error),

    #[error("failed to flush PDF output buffer")]
    Flush(#[source] io::Error),

    #[error("document has no pages")]
    Empty,
}

/// The underlying reason a report could not be generated.
#[derive(Error, Debug)]
pub enum GenerationErrorKind {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[cfg(feature = "bookmarks")]
    #[error(transparent)]
    Bookmarks(#[from] crate::bookmarks::BookmarkError),
}

/// Top-level error returned to callers of the report pipeline.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The report could not be rendered; nothing was produced.
    #[error("report generation failed: {context}")]
    Generation {
        context: String,
        #[source]
        source: GenerationErrorKind,
    },

    /// The report was rendered but could not be handed to the download sink.
    #[error("download failed for {file_name}")]
    Download {
        file_name: String,
        #[source]
        source: io::Error,
    },

    /// The report data could not be decoded.
    #[error("invalid report input")]
    InvalidInput(#[from] serde_json::Error),
}

impl ReportError {
    pub(crate) fn generation(
        context: impl Into<String>,
        source: impl Into<GenerationErrorKind>,
    ) -> Self {
        Self::Generation {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Whether the failure happened after a complete document was produced.
    pub fn is_delivery_failure(&self) -> bool {
        matches!(self, ReportError::Download { .. })
    }
}

/// Returned when a report size name is not one of the known tiers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown report size `{0}`; use small, medium, full or enterprise")]
pub struct UnknownTier(pub String);

/// Returned when a section identifier is not recognised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown report section `{0}`")]
pub struct UnknownSection(pub String);
