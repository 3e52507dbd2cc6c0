//! Cover page.
//!
//! The first page is drawn at fixed coordinates and bypasses the page-break engine: its content
//! is bounded and known ahead of time.  Strings that come from the report are sanitized and, where
//! they could grow without bound, shortened to fit the page.

use chrono::NaiveDate;

use crate::document::{DrawOp, Paint, TextRun};
use crate::fonts;
use crate::layout::{truncate_to_width, LayoutEngine};
use crate::model::Report;
use crate::sanitize::sanitize;
use crate::style::{palette, FontWeight, Rgb};
use crate::tier::ReportSize;

const TITLE_BAND_HEIGHT: f64 = 62.0;
const SUBTITLE_COLOR: Rgb = Rgb(219, 234, 254);

const BADGE_TOP: f64 = 70.0;
const BADGE_HEIGHT: f64 = 8.0;
const BADGE_PADDING: f64 = 6.0;
const BADGE_FONT_SIZE: f64 = 9.0;

const SCORE_CENTER_Y: f64 = 112.0;
const SCORE_RADIUS: f64 = 22.0;

const CARD_TOP: f64 = 160.0;
const CARD_HEIGHT: f64 = 26.0;
const CARD_GAP: f64 = 6.0;

/// Lowest point the cover draws at; the page must keep it above the bottom margin.
pub const COVER_BOTTOM: f64 = CARD_TOP + CARD_HEIGHT;
/// Narrowest content area that still holds the score label beneath the circle.
pub const COVER_MIN_CONTENT_WIDTH: f64 = SCORE_RADIUS * 4.0;

/// Color band of a trust score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreBand {
    Success,
    Warning,
    Alert,
    Danger,
}

impl ScoreBand {
    pub fn color(self) -> Rgb {
        match self {
            ScoreBand::Success => palette::SUCCESS,
            ScoreBand::Warning => palette::WARNING,
            ScoreBand::Alert => palette::ALERT,
            ScoreBand::Danger => palette::DANGER,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Success => "Trusted",
            ScoreBand::Warning => "Moderate Risk",
            ScoreBand::Alert => "Elevated Risk",
            ScoreBand::Danger => "High Risk",
        }
    }
}

/// Maps a 0-100 trust score onto its color band.
pub fn score_band(score: f64) -> ScoreBand {
    if score >= 80.0 {
        ScoreBand::Success
    } else if score >= 65.0 {
        ScoreBand::Warning
    } else if score >= 40.0 {
        ScoreBand::Alert
    } else {
        ScoreBand::Danger
    }
}

/// Formats a number without a trailing `.0` for whole values.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

struct Label<'a> {
    text: &'a str,
    size: f64,
    weight: FontWeight,
    color: Rgb,
}

fn centered(center_x: f64, baseline: f64, max_width: f64, label: Label<'_>) -> DrawOp {
    let text = truncate_to_width(label.text, max_width, label.size, label.weight).into_owned();
    let width = fonts::text_width(&text, label.size, label.weight);
    DrawOp::Text(TextRun {
        x: center_x - width / 2.0,
        baseline,
        text,
        size: label.size,
        weight: label.weight,
        color: label.color,
    })
}

/// Draws the cover onto the current page of `engine`.
///
/// Must run while the engine is still on its first page.
pub fn draw_cover(
    engine: &mut LayoutEngine,
    report: &Report,
    size: ReportSize,
    generated_on: NaiveDate,
) {
    let config = engine.config().clone();
    let center = config.page_width / 2.0;
    let max_width = config.content_width();

    engine.push(DrawOp::Rect {
        x: 0.0,
        y: 0.0,
        width: config.page_width,
        height: TITLE_BAND_HEIGHT,
        paint: Paint::Fill(palette::PRIMARY_DARK),
    });
    engine.push(centered(
        center,
        26.0,
        max_width,
        Label {
            text: "Security Assessment Report",
            size: 24.0,
            weight: FontWeight::Bold,
            color: palette::WHITE,
        },
    ));

    let name = sanitize(&report.product.name);
    engine.push(centered(
        center,
        41.0,
        max_width,
        Label {
            text: &name,
            size: 20.0,
            weight: FontWeight::Bold,
            color: palette::WHITE,
        },
    ));

    let vendor = sanitize(&report.product.vendor);
    if !vendor.trim().is_empty() {
        engine.push(centered(
            center,
            52.0,
            max_width,
            Label {
                text: &format!("by {vendor}"),
                size: 12.0,
                weight: FontWeight::Regular,
                color: SUBTITLE_COLOR,
            },
        ));
    }

    let category = sanitize(&report.product.category);
    draw_category_badge(engine, &category, center, max_width);
    draw_score(engine, report, center);
    draw_cards(engine, report, size, generated_on);
}

fn draw_category_badge(engine: &mut LayoutEngine, category: &str, center: f64, max_width: f64) {
    let category = category.trim();
    if category.is_empty() {
        return;
    }
    let text = truncate_to_width(
        category,
        max_width - 2.0 * BADGE_PADDING,
        BADGE_FONT_SIZE,
        FontWeight::Bold,
    );
    let width = fonts::text_width(&text, BADGE_FONT_SIZE, FontWeight::Bold) + 2.0 * BADGE_PADDING;
    engine.push(DrawOp::Rect {
        x: center - width / 2.0,
        y: BADGE_TOP,
        width,
        height: BADGE_HEIGHT,
        paint: Paint::Fill(palette::SECTION_BAND),
    });
    engine.push(DrawOp::Text(TextRun {
        x: center - width / 2.0 + BADGE_PADDING,
        baseline: BADGE_TOP + (BADGE_HEIGHT + fonts::ascent(BADGE_FONT_SIZE)) / 2.0,
        text: text.into_owned(),
        size: BADGE_FONT_SIZE,
        weight: FontWeight::Bold,
        color: palette::PRIMARY_DARK,
    }));
}

fn draw_score(engine: &mut LayoutEngine, report: &Report, center: f64) {
    let band = score_band(report.trust_score.score);
    engine.push(DrawOp::Circle {
        cx: center,
        cy: SCORE_CENTER_Y,
        radius: SCORE_RADIUS,
        paint: Paint::Fill(band.color()),
    });
    let inner = SCORE_RADIUS * 1.6;
    engine.push(centered(
        center,
        SCORE_CENTER_Y + 3.0,
        inner,
        Label {
            text: &format_number(report.trust_score.score),
            size: 26.0,
            weight: FontWeight::Bold,
            color: palette::WHITE,
        },
    ));
    engine.push(centered(
        center,
        SCORE_CENTER_Y + 11.0,
        inner,
        Label {
            text: "Trust Score",
            size: 10.0,
            weight: FontWeight::Regular,
            color: palette::WHITE,
        },
    ));
    engine.push(centered(
        center,
        SCORE_CENTER_Y + SCORE_RADIUS + 10.0,
        COVER_MIN_CONTENT_WIDTH,
        Label {
            text: band.label(),
            size: 12.0,
            weight: FontWeight::Bold,
            color: band.color(),
        },
    ));
}

fn draw_cards(
    engine: &mut LayoutEngine,
    report: &Report,
    size: ReportSize,
    generated_on: NaiveDate,
) {
    let config = engine.config().clone();
    let card_width = (config.content_width() - 2.0 * CARD_GAP) / 3.0;
    let cards = [
        ("Report Size", size.label().to_string()),
        ("Generated", generated_on.format("%Y-%m-%d").to_string()),
        (
            "Confidence",
            format!("{}%", format_number(report.trust_score.confidence)),
        ),
    ];

    for (index, (label, value)) in cards.iter().enumerate() {
        let x = config.margin_left + index as f64 * (card_width + CARD_GAP);
        let card_center = x + card_width / 2.0;
        engine.push(DrawOp::Rect {
            x,
            y: CARD_TOP,
            width: card_width,
            height: CARD_HEIGHT,
            paint: Paint::Fill(palette::CARD),
        });
        engine.push(DrawOp::Rect {
            x,
            y: CARD_TOP,
            width: card_width,
            height: CARD_HEIGHT,
            paint: Paint::Stroke {
                color: palette::CARD_BORDER,
                thickness: 0.3,
            },
        });
        engine.push(centered(
            card_center,
            CARD_TOP + 9.0,
            card_width - 4.0,
            Label {
                text: label,
                size: 8.0,
                weight: FontWeight::Regular,
                color: palette::MUTED,
            },
        ));
        engine.push(centered(
            card_center,
            CARD_TOP + 19.0,
            card_width - 4.0,
            Label {
                text: value,
                size: 13.0,
                weight: FontWeight::Bold,
                color: palette::TEXT,
            },
        ));
    }
}
