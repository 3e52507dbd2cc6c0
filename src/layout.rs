//! Page layout: a vertical cursor that flows content across pages.
//!
//! The [`LayoutEngine`] owns the [`Document`] being built and a [`Cursor`] pointing at the next
//! free vertical position.  Every primitive with a known height first calls
//! [`LayoutEngine::ensure_space`], which appends a page when the block would cross the bottom
//! margin.  After any primitive returns, the cursor never sits below the bottom margin.
//!
//! Text is word-wrapped against the Helvetica metrics in [`crate::fonts`] so no line runs past the
//! right margin.  Line height is `0.4 mm` per point of font size.

use std::borrow::Cow;

use log::{debug, warn};

use crate::cover::{COVER_BOTTOM, COVER_MIN_CONTENT_WIDTH};
use crate::document::{Document, DrawOp, Paint, TextRun};
use crate::error::LayoutError;
use crate::fonts;
use crate::sanitize::sanitize;
use crate::style::{palette, FontWeight, Rgb, Severity, TextStyle};

/// Line height in millimetres per point of font size.
pub const LINE_HEIGHT_FACTOR: f64 = 0.4;

/// Baseline position inside a line box, in millimetres per point of font size.
const BASELINE_FACTOR: f64 = 0.3;

/// Space checked before a section header is drawn.
pub const HEADER_RESERVE: f64 = 25.0;
/// Cursor advance caused by a section header.
pub const HEADER_ADVANCE: f64 = 16.0;
const HEADER_LEAD: f64 = 4.0;
const HEADER_BAND_HEIGHT: f64 = 10.0;
const HEADER_ACCENT_WIDTH: f64 = 3.0;
const HEADER_TEXT_INSET: f64 = 6.0;
const HEADER_FONT_SIZE: f64 = 13.0;

/// Height of one key/value row.
pub const ROW_HEIGHT: f64 = 5.0;
const KEY_VALUE_FONT_SIZE: f64 = 10.0;
const KEY_VALUE_HANGING_INDENT: f64 = 4.0;
/// Minimum share of the content width left for an inline value.
const MIN_INLINE_VALUE_SHARE: f64 = 0.35;

/// Vertical distance between info box lines.
pub const INFO_BOX_LINE_SPACING: f64 = 5.0;
/// Combined top and bottom padding of an info box.
pub const INFO_BOX_PADDING: f64 = 6.0;
/// Minimum info box height.
pub const INFO_BOX_MIN_HEIGHT: f64 = 12.0;
const INFO_BOX_GAP: f64 = 4.0;
const INFO_BOX_ACCENT_WIDTH: f64 = 2.0;
const INFO_BOX_INSET_LEFT: f64 = 6.0;
const INFO_BOX_INSET_RIGHT: f64 = 4.0;
const INFO_BOX_FONT_SIZE: f64 = 10.0;

/// Page geometry used by the layout engine.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    pub page_width: f64,
    pub page_height: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    /// Distance of the footer baseline from the bottom edge of the page.
    pub footer_offset: f64,
    /// Rendering fails once a document would need more pages than this.
    pub max_pages: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin_top: 15.0,
            margin_bottom: 15.0,
            margin_left: 15.0,
            margin_right: 15.0,
            footer_offset: 8.0,
            max_pages: 500,
        }
    }
}

impl LayoutConfig {
    /// Creates an A4 portrait configuration with 15 mm margins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size in millimetres.
    pub fn with_page_size(mut self, width: f64, height: f64) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// Sets all four margins to the same value.
    pub fn with_margins(mut self, margin: f64) -> Self {
        self.margin_top = margin;
        self.margin_bottom = margin;
        self.margin_left = margin;
        self.margin_right = margin;
        self
    }

    /// Sets the page budget.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn content_width(&self) -> f64 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Lowest position content may reach.
    pub fn bottom_limit(&self) -> f64 {
        self.page_height - self.margin_bottom
    }

    pub fn printable_height(&self) -> f64 {
        self.bottom_limit() - self.margin_top
    }

    fn validate(&self) -> Result<(), LayoutError> {
        positive("page width", self.page_width)?;
        positive("page height", self.page_height)?;
        positive("content width", self.content_width())?;
        if self.content_width() < COVER_MIN_CONTENT_WIDTH {
            return Err(LayoutError::InvalidMeasurement {
                what: "content width",
                value: self.content_width(),
            });
        }
        if self.printable_height() < INFO_BOX_MIN_HEIGHT.max(HEADER_RESERVE) {
            return Err(LayoutError::InvalidMeasurement {
                what: "printable height",
                value: self.printable_height(),
            });
        }
        if self.bottom_limit() < COVER_BOTTOM {
            return Err(LayoutError::InvalidMeasurement {
                what: "page height",
                value: self.page_height,
            });
        }
        Ok(())
    }
}

/// Position of the next block: 1-based page number and offset from the top edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cursor {
    pub page: usize,
    pub y: f64,
}

/// Height of one wrapped line at `size` points.
pub fn line_height(size: f64) -> f64 {
    size * LINE_HEIGHT_FACTOR
}

fn baseline_offset(size: f64) -> f64 {
    size * BASELINE_FACTOR
}

fn positive(what: &'static str, value: f64) -> Result<(), LayoutError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidMeasurement { what, value })
    }
}

fn non_negative(what: &'static str, value: f64) -> Result<(), LayoutError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidMeasurement { what, value })
    }
}

/// Height of an info box holding `line_count` wrapped lines.
pub fn info_box_height(line_count: usize) -> f64 {
    (line_count as f64 * INFO_BOX_LINE_SPACING + INFO_BOX_PADDING).max(INFO_BOX_MIN_HEIGHT)
}

fn char_width(ch: char, size: f64, weight: FontWeight) -> f64 {
    f64::from(fonts::char_units(ch, weight)) / 1000.0 * size * fonts::MM_PER_PT
}

/// Shortens `text` with a trailing `...` so it fits in `max_width` millimetres.
pub fn truncate_to_width(
    text: &str,
    max_width: f64,
    size: f64,
    weight: FontWeight,
) -> Cow<'_, str> {
    if fonts::text_width(text, size, weight) <= max_width {
        return Cow::Borrowed(text);
    }
    let budget = max_width - fonts::text_width("...", size, weight);
    let mut kept = String::new();
    let mut width = 0.0;
    for ch in text.chars() {
        let next = width + char_width(ch, size, weight);
        if next > budget {
            break;
        }
        kept.push(ch);
        width = next;
    }
    Cow::Owned(format!("{}...", kept.trim_end()))
}

/// Splits `text` into lines no wider than `max_width` millimetres.
///
/// Words are separated at whitespace; a word wider than a whole line is broken between
/// characters.  Blank input yields no lines.
pub fn wrap_text(text: &str, max_width: f64, size: f64, weight: FontWeight) -> Vec<String> {
    let space = fonts::text_width(" ", size, weight);
    let fits = |width: f64| width <= max_width + 1e-9;

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0;

    for word in text.split_whitespace() {
        let word_width = fonts::text_width(word, size, weight);
        if !current.is_empty() && fits(current_width + space + word_width) {
            current.push(' ');
            current.push_str(word);
            current_width += space + word_width;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if fits(word_width) {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        current_width = 0.0;
        for ch in word.chars() {
            let ch_width = char_width(ch, size, weight);
            if !current.is_empty() && !fits(current_width + ch_width) {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }
            current.push(ch);
            current_width += ch_width;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Lays out content onto pages for a single render.
#[derive(Debug)]
pub struct LayoutEngine {
    config: LayoutConfig,
    document: Document,
    cursor: Cursor,
}

impl LayoutEngine {
    /// Creates an engine with one empty page and the cursor at the top margin.
    pub fn new(config: LayoutConfig) -> Result<Self, LayoutError> {
        config.validate()?;
        let document = Document::new(config.page_width, config.page_height);
        let cursor = Cursor {
            page: 1,
            y: config.margin_top,
        };
        Ok(Self {
            config,
            document,
            cursor,
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Finishes layout and returns the document.
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Commits an operation to the current page without any space check.
    ///
    /// Meant for fixed-position content such as the cover page.
    pub fn push(&mut self, op: DrawOp) {
        self.document.last_page_mut().push(op);
    }

    /// Appends a page and moves the cursor to its top margin.
    pub fn new_page(&mut self) -> Result<(), LayoutError> {
        if self.document.page_count() >= self.config.max_pages {
            return Err(LayoutError::PageBudgetExceeded {
                limit: self.config.max_pages,
            });
        }
        let number = self.document.add_page();
        self.cursor = Cursor {
            page: number,
            y: self.config.margin_top,
        };
        debug!("Starting page {number}");
        Ok(())
    }

    fn at_page_top(&self) -> bool {
        self.cursor.y <= self.config.margin_top
    }

    /// Makes sure a block of `height` fits below the cursor, starting a new page if needed.
    ///
    /// Returns whether a page was added.  A block taller than a whole page is placed at the top
    /// of the current page when the page is still empty.
    pub fn ensure_space(&mut self, height: f64) -> Result<bool, LayoutError> {
        non_negative("block height", height)?;
        if self.cursor.y + height > self.config.bottom_limit() && !self.at_page_top() {
            self.new_page()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Moves the cursor down by `gap`, stopping at the bottom margin.
    pub fn advance(&mut self, gap: f64) -> Result<(), LayoutError> {
        non_negative("vertical gap", gap)?;
        self.cursor.y = (self.cursor.y + gap).min(self.config.bottom_limit());
        Ok(())
    }

    fn text_run(&self, x: f64, line_top: f64, text: String, style: &TextStyle) -> DrawOp {
        DrawOp::Text(TextRun {
            x,
            baseline: line_top + baseline_offset(style.size),
            text,
            size: style.size,
            weight: style.weight,
            color: style.color,
        })
    }

    /// Draws wrapped text at the cursor, then advances by `bottom_gap`.
    pub fn draw_text(
        &mut self,
        text: &str,
        style: &TextStyle,
        bottom_gap: f64,
    ) -> Result<(), LayoutError> {
        positive("font size", style.size)?;
        non_negative("indent", style.indent)?;
        let text = sanitize(text);
        let x = self.config.margin_left + style.indent;
        let width = (self.config.content_width() - style.indent).max(1.0);
        let height = line_height(style.size);

        for line in wrap_text(&text, width, style.size, style.weight) {
            self.ensure_space(height)?;
            let op = self.text_run(x, self.cursor.y, line, style);
            self.push(op);
            self.cursor.y += height;
        }

        self.advance(bottom_gap)
    }

    /// Draws a bullet item with the given style.
    pub fn draw_bullet(&mut self, text: &str, style: &TextStyle) -> Result<(), LayoutError> {
        self.draw_text(&format!("\u{2022} {text}"), style, 0.5)
    }

    /// Draws a section header band and returns the page it landed on.
    pub fn draw_section_header(&mut self, title: &str) -> Result<usize, LayoutError> {
        if !self.at_page_top() {
            self.advance(HEADER_LEAD)?;
        }
        self.ensure_space(HEADER_RESERVE)?;

        let top = self.cursor.y;
        let left = self.config.margin_left;
        self.push(DrawOp::Rect {
            x: left,
            y: top,
            width: self.config.content_width(),
            height: HEADER_BAND_HEIGHT,
            paint: Paint::Fill(palette::SECTION_BAND),
        });
        self.push(DrawOp::Rect {
            x: left,
            y: top,
            width: HEADER_ACCENT_WIDTH,
            height: HEADER_BAND_HEIGHT,
            paint: Paint::Fill(palette::PRIMARY),
        });
        self.push(DrawOp::Text(TextRun {
            x: left + HEADER_TEXT_INSET,
            baseline: top + (HEADER_BAND_HEIGHT + fonts::ascent(HEADER_FONT_SIZE)) / 2.0,
            text: sanitize(title).into_owned(),
            size: HEADER_FONT_SIZE,
            weight: FontWeight::Bold,
            color: palette::HEADING,
        }));

        self.cursor.y += HEADER_ADVANCE;
        Ok(self.cursor.page)
    }

    /// Draws a bold `key:` label followed by its value.
    ///
    /// The value wraps beside the label.  Each continuation line checks for space on its own and
    /// may move to a new page.  Labels wider than the content area wrap onto rows of their own.
    /// When the last label row leaves too little room, the value goes on the following rows with
    /// a small indent.
    pub fn draw_key_value(&mut self, key: &str, value: &str) -> Result<(), LayoutError> {
        let label = format!("{}:", sanitize(key));
        let value = sanitize(value);
        let content_width = self.config.content_width();
        let left = self.config.margin_left;
        let label_lines = wrap_text(
            &label,
            content_width,
            KEY_VALUE_FONT_SIZE,
            FontWeight::Bold,
        );
        let last_label = label_lines.last().map(String::as_str).unwrap_or_default();
        let label_width = fonts::text_width(
            &format!("{last_label} "),
            KEY_VALUE_FONT_SIZE,
            FontWeight::Bold,
        );

        let inline = content_width - label_width >= content_width * MIN_INLINE_VALUE_SHARE;
        let (value_x, value_width) = if inline {
            (left + label_width, content_width - label_width)
        } else {
            (
                left + KEY_VALUE_HANGING_INDENT,
                content_width - KEY_VALUE_HANGING_INDENT,
            )
        };
        let label_style = TextStyle::bold(KEY_VALUE_FONT_SIZE);
        let value_style = TextStyle::regular(KEY_VALUE_FONT_SIZE);
        let value_lines = wrap_text(&value, value_width, value_style.size, value_style.weight);
        let mut lines = value_lines.into_iter();

        let label_rows = label_lines.len();
        for (index, label_line) in label_lines.into_iter().enumerate() {
            self.ensure_space(ROW_HEIGHT)?;
            let row_top = self.cursor.y;
            let op = self.text_run(left, row_top, label_line, &label_style);
            self.push(op);
            if inline && index + 1 == label_rows {
                if let Some(first) = lines.next() {
                    let op = self.text_run(value_x, row_top, first, &value_style);
                    self.push(op);
                }
            }
            self.cursor.y += ROW_HEIGHT;
        }

        for line in lines {
            self.ensure_space(ROW_HEIGHT)?;
            let op = self.text_run(value_x, self.cursor.y, line, &value_style);
            self.push(op);
            self.cursor.y += ROW_HEIGHT;
        }
        Ok(())
    }

    /// Draws a shaded callout box that never splits across pages.
    ///
    /// The full height is computed from the wrapped text first and reserved in one step.  Text
    /// too long to fit on an empty page is spread over several boxes, each one page at most.
    pub fn draw_info_box(&mut self, text: &str, severity: Severity) -> Result<(), LayoutError> {
        let text = sanitize(text);
        let inner_width =
            self.config.content_width() - INFO_BOX_INSET_LEFT - INFO_BOX_INSET_RIGHT;
        let lines = wrap_text(&text, inner_width, INFO_BOX_FONT_SIZE, FontWeight::Regular);

        let max_lines = (((self.config.printable_height() - INFO_BOX_PADDING)
            / INFO_BOX_LINE_SPACING)
            .floor() as usize)
            .max(1);

        if lines.len() <= max_lines {
            return self.draw_box(&lines, severity);
        }

        warn!(
            "Info box with {} lines exceeds one page ({} lines); splitting it",
            lines.len(),
            max_lines
        );
        for chunk in lines.chunks(max_lines) {
            self.draw_box(chunk, severity)?;
        }
        Ok(())
    }

    fn draw_box(&mut self, lines: &[String], severity: Severity) -> Result<(), LayoutError> {
        let height = info_box_height(lines.len());
        self.ensure_space(height)?;

        let top = self.cursor.y;
        let left = self.config.margin_left;
        self.push(DrawOp::Rect {
            x: left,
            y: top,
            width: self.config.content_width(),
            height,
            paint: Paint::Fill(severity.background()),
        });
        self.push(DrawOp::Rect {
            x: left,
            y: top,
            width: INFO_BOX_ACCENT_WIDTH,
            height,
            paint: Paint::Fill(severity.accent()),
        });

        let text_block = lines.len() as f64 * INFO_BOX_LINE_SPACING;
        let first_line_top = top
            + (height - text_block) / 2.0
            + (INFO_BOX_LINE_SPACING - line_height(INFO_BOX_FONT_SIZE)) / 2.0;
        let style = TextStyle::regular(INFO_BOX_FONT_SIZE).with_color(severity.text());
        for (index, line) in lines.iter().enumerate() {
            let line_top = first_line_top + index as f64 * INFO_BOX_LINE_SPACING;
            let op = self.text_run(left + INFO_BOX_INSET_LEFT, line_top, line.clone(), &style);
            self.push(op);
        }

        self.cursor.y = top + height;
        self.advance(INFO_BOX_GAP)
    }

    /// Draws a thin horizontal rule across the content width.
    pub fn draw_rule(&mut self, color: Rgb) -> Result<(), LayoutError> {
        self.ensure_space(2.0)?;
        let y = self.cursor.y + 1.0;
        self.push(DrawOp::Line {
            x1: self.config.margin_left,
            y1: y,
            x2: self.config.page_width - self.config.margin_right,
            y2: y,
            color,
            thickness: 0.2,
        });
        self.advance(2.0)
    }
}
