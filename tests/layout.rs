use assessment_report::builder::REPORT_TITLE;
use assessment_report::document::{Document, DrawOp, Paint};
use assessment_report::layout::{LayoutEngine, HEADER_ADVANCE, HEADER_RESERVE, ROW_HEIGHT};
use assessment_report::samples::Sample;
use assessment_report::style::{palette, Severity, TextStyle};
use assessment_report::{LayoutConfig, ReportBuilder, ReportSize};
use chrono::NaiveDate;

const EPSILON: f64 = 1e-6;

fn compose_all() -> Vec<(Sample, ReportSize, Document)> {
    let date = NaiveDate::from_ymd_opt(2025, 11, 14).unwrap();
    let mut composed = Vec::new();
    for sample in Sample::ALL {
        let report = sample.load().unwrap();
        for size in ReportSize::ALL {
            let document = ReportBuilder::new(&report, size)
                .with_generated_on(date)
                .compose()
                .unwrap()
                .document;
            composed.push((sample, size, document));
        }
    }
    composed
}

fn is_footer(op: &DrawOp) -> bool {
    match op {
        DrawOp::Text(run) => run.color == palette::FOOTER && run.text.starts_with(REPORT_TITLE),
        DrawOp::Line { .. } => true,
        _ => false,
    }
}

#[test]
fn body_content_stays_above_bottom_margin() {
    let config = LayoutConfig::default();
    for (sample, size, document) in compose_all() {
        for (index, page) in document.pages().iter().enumerate().skip(1) {
            for op in page.ops().iter().filter(|op| !is_footer(op)) {
                let (top, bottom) = op.vertical_extent();
                assert!(
                    bottom <= config.bottom_limit() + EPSILON,
                    "{sample}/{size} page {}: {op:?} ends at {bottom}",
                    index + 1
                );
                assert!(
                    top >= config.margin_top - EPSILON,
                    "{sample}/{size} page {}: {op:?} starts at {top}",
                    index + 1
                );
            }
        }
    }
}

#[test]
fn info_boxes_are_never_split() {
    let config = LayoutConfig::default();
    let backgrounds = [
        Severity::Info,
        Severity::Success,
        Severity::Warning,
        Severity::Danger,
    ]
    .map(Severity::background);

    for (sample, size, document) in compose_all() {
        for page in document.pages().iter().skip(1) {
            for op in page.ops() {
                if let DrawOp::Rect {
                    y,
                    height,
                    paint: Paint::Fill(color),
                    ..
                } = op
                {
                    if backgrounds.contains(color) {
                        assert!(*y >= config.margin_top - EPSILON, "{sample}/{size}: {op:?}");
                        assert!(
                            y + height <= config.bottom_limit() + EPSILON,
                            "{sample}/{size}: {op:?}"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn cursor_never_passes_bottom_limit() {
    let config = LayoutConfig::default().with_max_pages(100);
    let limit = config.bottom_limit();
    let mut engine = LayoutEngine::new(config).unwrap();
    let style = TextStyle::regular(10.0);

    for round in 0..40 {
        engine
            .draw_section_header(&format!("Section {round}"))
            .unwrap();
        assert!(engine.cursor().y <= limit + EPSILON);
        engine
            .draw_text(&"wrapped paragraph text ".repeat(20), &style, 2.0)
            .unwrap();
        assert!(engine.cursor().y <= limit + EPSILON);
        engine
            .draw_key_value("Retention", &"kept for ninety days ".repeat(8))
            .unwrap();
        assert!(engine.cursor().y <= limit + EPSILON);
        engine
            .draw_info_box(&"boxed notice ".repeat(30), Severity::Warning)
            .unwrap();
        assert!(engine.cursor().y <= limit + EPSILON);
        engine.advance(1000.0).unwrap();
        assert!(engine.cursor().y <= limit + EPSILON);
    }
}

#[test]
fn letter_pages_use_their_own_geometry() {
    let report = Sample::Github.load().unwrap();
    let layout = LayoutConfig::default().with_page_size(215.9, 279.4);
    let document = ReportBuilder::new(&report, ReportSize::Full)
        .with_layout(layout.clone())
        .with_generated_on(NaiveDate::from_ymd_opt(2025, 11, 14).unwrap())
        .compose()
        .unwrap()
        .document;

    assert_eq!(document.width(), 215.9);
    assert_eq!(document.height(), 279.4);
    for page in document.pages().iter().skip(1) {
        for op in page.ops().iter().filter(|op| !is_footer(op)) {
            assert!(
                op.vertical_extent().1 <= layout.bottom_limit() + EPSILON,
                "{op:?}"
            );
        }
    }
}

#[test]
fn key_value_rows_follow_each_other() {
    let mut engine = LayoutEngine::new(LayoutConfig::default()).unwrap();
    let start = engine.cursor().y;
    engine.draw_key_value("Founded", "2009").unwrap();
    engine
        .draw_key_value("Headquarters", "San Francisco, CA")
        .unwrap();
    assert!((engine.cursor().y - (start + 2.0 * ROW_HEIGHT)).abs() < EPSILON);
}

#[test]
fn every_section_header_keeps_room_below_it() {
    let config = LayoutConfig::default();
    let room = HEADER_RESERVE - HEADER_ADVANCE;
    for (sample, size, document) in compose_all() {
        for page in document.pages().iter().skip(1) {
            for run in page.texts().filter(|run| run.color == palette::HEADING) {
                assert!(
                    run.bottom() + room <= config.bottom_limit() + EPSILON,
                    "{sample}/{size}: header `{}` is orphaned",
                    run.text
                );
            }
        }
    }
}

#[test]
fn long_platform_names_stay_inside_the_right_margin() {
    let config = LayoutConfig::default();
    let right = config.page_width - config.margin_right;
    let mut report = Sample::Slack.load().unwrap();
    let mut platform = report.platform_support.platforms[0].clone();
    platform.name = "Enterprise Grid Desktop Client For Managed Windows Workstations ".repeat(4);
    report.platform_support.platforms.push(platform);

    let document = ReportBuilder::new(&report, ReportSize::Medium)
        .with_generated_on(NaiveDate::from_ymd_opt(2025, 11, 14).unwrap())
        .compose()
        .unwrap()
        .document;
    assert!(document.contains_text("Enterprise Grid Desktop Client"));
    for (index, page) in document.pages().iter().enumerate() {
        for run in page.texts() {
            assert!(
                run.right() <= right + EPSILON,
                "page {}: `{}` ends at {}",
                index + 1,
                run.text,
                run.right()
            );
        }
    }
}

#[test]
fn cover_fits_a5_pages() {
    let layout = LayoutConfig::default().with_page_size(148.0, 210.0);
    let right = layout.page_width - layout.margin_right;
    let report = Sample::Github.load().unwrap();
    let document = ReportBuilder::new(&report, ReportSize::Full)
        .with_layout(layout.clone())
        .with_generated_on(NaiveDate::from_ymd_opt(2025, 11, 14).unwrap())
        .compose()
        .unwrap()
        .document;

    let cover = document.page(1).unwrap();
    for op in cover.ops().iter().filter(|op| !is_footer(op)) {
        assert!(
            op.vertical_extent().1 <= layout.bottom_limit() + EPSILON,
            "{op:?}"
        );
    }
    for run in cover.texts() {
        assert!(run.right() <= right + EPSILON, "`{}` overflows", run.text);
    }
}

#[test]
fn page_too_short_for_the_cover_fails_to_compose() {
    let report = Sample::Slack.load().unwrap();
    let result = ReportBuilder::new(&report, ReportSize::Small)
        .with_layout(LayoutConfig::default().with_page_size(148.0, 105.0))
        .compose();
    assert!(result.is_err());
}
