//! In-memory representation of a laid out report.
//!
//! A [`Document`] is an ordered list of [`Page`]s, each holding the drawing operations that were
//! committed to it.  All coordinates are millimetres measured from the *top-left* corner of the
//! page, which is how the layout cursor thinks about space; the serializer flips the y axis when
//! it writes PDF content streams.

use crate::fonts;
use crate::style::{FontWeight, Rgb};

/// A single run of text placed at an absolute position.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    /// Left edge of the run.
    pub x: f64,
    /// Baseline position.
    pub baseline: f64,
    pub text: String,
    /// Font size in points.
    pub size: f64,
    pub weight: FontWeight,
    pub color: Rgb,
}

impl TextRun {
    /// Top of the tallest glyph of the run.
    pub fn top(&self) -> f64 {
        self.baseline - fonts::ascent(self.size)
    }

    /// Bottom of the lowest glyph of the run.
    pub fn bottom(&self) -> f64 {
        self.baseline + fonts::descent(self.size)
    }

    /// Right edge of the run according to the font metrics.
    pub fn right(&self) -> f64 {
        self.x + fonts::text_width(&self.text, self.size, self.weight)
    }
}

/// How a closed shape is painted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Paint {
    Fill(Rgb),
    Stroke { color: Rgb, thickness: f64 },
}

/// A drawing operation committed to a page.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Text(TextRun),
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        paint: Paint,
    },
    Circle {
        cx: f64,
        cy: f64,
        radius: f64,
        paint: Paint,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Rgb,
        thickness: f64,
    },
}

impl DrawOp {
    /// Vertical extent `(top, bottom)` covered by the operation.
    pub fn vertical_extent(&self) -> (f64, f64) {
        match self {
            DrawOp::Text(run) => (run.top(), run.bottom()),
            DrawOp::Rect { y, height, .. } => (*y, y + height),
            DrawOp::Circle { cy, radius, .. } => (cy - radius, cy + radius),
            DrawOp::Line { y1, y2, .. } => (y1.min(*y2), y1.max(*y2)),
        }
    }

    /// Returns the text run if this is a text operation.
    pub fn as_text(&self) -> Option<&TextRun> {
        match self {
            DrawOp::Text(run) => Some(run),
            _ => None,
        }
    }
}

/// One page of the document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    ops: Vec<DrawOp>,
}

impl Page {
    /// Creates an empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an operation to the page.
    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    /// Returns the operations in drawing order.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Iterates over the text runs of the page.
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.ops.iter().filter_map(DrawOp::as_text)
    }

    /// Whether any text run on the page contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|run| run.text.contains(needle))
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// A complete multi-page document.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    width: f64,
    height: f64,
    pages: Vec<Page>,
}

impl Document {
    /// Creates a document with a single empty page of the given size in millimetres.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            pages: vec![Page::new()],
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn pages_mut(&mut self) -> &mut [Page] {
        &mut self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Appends an empty page and returns its 1-based number.
    pub fn add_page(&mut self) -> usize {
        self.pages.push(Page::new());
        self.pages.len()
    }

    /// Returns the page with the given 1-based number.
    pub fn page(&self, number: usize) -> Option<&Page> {
        number
            .checked_sub(1)
            .and_then(|index| self.pages.get(index))
    }

    /// Returns the last page.
    pub fn last_page_mut(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Iterates over all text runs in page order.
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.pages.iter().flat_map(Page::texts)
    }

    /// Whether any text run in the document contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|run| run.text.contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_are_one_based() {
        let mut document = Document::new(210.0, 297.0);
        assert_eq!(document.add_page(), 2);
        assert!(document.page(0).is_none());
        assert!(document.page(2).is_some());
        assert!(document.page(3).is_none());
    }

    #[test]
    fn text_extent_surrounds_baseline() {
        let op = DrawOp::Text(TextRun {
            x: 15.0,
            baseline: 50.0,
            text: "Trust".into(),
            size: 10.0,
            weight: FontWeight::Regular,
            color: Rgb::default(),
        });
        let (top, bottom) = op.vertical_extent();
        assert!(top < 50.0 && bottom > 50.0);
    }

    #[test]
    fn contains_text_searches_all_pages() {
        let mut document = Document::new(210.0, 297.0);
        document.add_page();
        document.last_page_mut().push(DrawOp::Text(TextRun {
            x: 0.0,
            baseline: 10.0,
            text: "Page two".into(),
            size: 8.0,
            weight: FontWeight::Bold,
            color: Rgb::default(),
        }));
        assert!(document.contains_text("two"));
        assert!(!document.pages()[0].contains_text("two"));
    }
}
