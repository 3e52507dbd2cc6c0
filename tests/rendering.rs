use assessment_report::samples;
use assessment_report::{deliver, MemorySink, RenderedReport, Report, ReportBuilder, ReportSize};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use sha2::{Digest, Sha256};

fn generated_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 14).unwrap()
}

fn render(report: &Report, size: ReportSize) -> RenderedReport {
    ReportBuilder::new(report, size)
        .with_generated_on(generated_on())
        .render()
        .expect("render sample report")
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if data[index..].starts_with(tag) {
                let mut cursor = index + tag.len();
                while cursor < data.len() {
                    let byte = data[cursor];
                    if byte == terminator {
                        break;
                    }
                    if terminator == b')' {
                        data[cursor] = b'0';
                    } else if !matches!(byte, b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t') {
                        data[cursor] = b'0';
                    }
                    cursor += 1;
                }
                index = cursor;
            } else {
                index += 1;
            }
        }
    }

    fn scrub_xml(data: &mut [u8], start: &[u8], end: &[u8]) {
        let mut offset = 0;
        while offset + start.len() < data.len() {
            if let Some(start_pos) = data[offset..]
                .windows(start.len())
                .position(|window| window == start)
            {
                let start_index = offset + start_pos + start.len();
                if let Some(end_pos) = data[start_index..]
                    .windows(end.len())
                    .position(|window| window == end)
                {
                    for byte in &mut data[start_index..start_index + end_pos] {
                        if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                            *byte = b'0';
                        }
                    }
                    offset = start_index + end_pos + end.len();
                } else {
                    break;
                }
            } else {
                break;
            }
        }
    }

    let mut normalized = bytes.to_vec();
    scrub_segment(&mut normalized, b"/CreationDate(", b')');
    scrub_segment(&mut normalized, b"/ModDate(", b')');
    scrub_segment(&mut normalized, b"/ID[", b']');
    scrub_segment(&mut normalized, b"/ID [", b']');
    scrub_segment(&mut normalized, b"/Producer(", b')');
    scrub_xml(&mut normalized, b"<xmp:CreateDate>", b"</xmp:CreateDate>");
    scrub_xml(&mut normalized, b"<xmp:ModifyDate>", b"</xmp:ModifyDate>");
    scrub_xml(
        &mut normalized,
        b"<xmp:MetadataDate>",
        b"</xmp:MetadataDate>",
    );
    scrub_xml(
        &mut normalized,
        b"<xmpMM:DocumentID>",
        b"</xmpMM:DocumentID>",
    );
    scrub_xml(
        &mut normalized,
        b"<xmpMM:InstanceID>",
        b"</xmpMM:InstanceID>",
    );
    scrub_xml(&mut normalized, b"<xmpMM:VersionID>", b"</xmpMM:VersionID>");
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    let normalized = scrub_pdf(bytes);
    let digest = Sha256::digest(&normalized);
    digest.into()
}

#[test]
fn renders_pdf_header_and_trailer() {
    let report = samples::github().unwrap();
    let rendered = render(&report, ReportSize::Small);
    assert!(rendered.bytes.starts_with(b"%PDF-"));
    assert!(rendered.bytes.windows(5).any(|window| window == b"%%EOF"));
}

#[test]
fn rendering_is_deterministic() {
    let report = samples::stress().unwrap();
    let bytes_a = render(&report, ReportSize::Enterprise).bytes;
    let bytes_b = render(&report, ReportSize::Enterprise).bytes;

    assert_eq!(bytes_a.len(), bytes_b.len(), "PDF sizes should match");

    let hash_a = normalized_hash(&bytes_a);
    let hash_b = normalized_hash(&bytes_b);

    assert_eq!(
        hash_a, hash_b,
        "PDF renders must be deterministic after metadata normalization"
    );
}

#[test]
fn sizes_produce_distinct_documents() {
    let report = samples::slack().unwrap();
    let small = render(&report, ReportSize::Small);
    let full = render(&report, ReportSize::Full);
    assert_ne!(normalized_hash(&small.bytes), normalized_hash(&full.bytes));
    assert!(full.page_count >= small.page_count);
}

#[test]
fn page_count_matches_encoded_pages() {
    for size in ReportSize::ALL {
        let report = samples::stress().unwrap();
        let rendered = render(&report, size);
        let document = lopdf::Document::load_mem(&rendered.bytes).expect("parse rendered PDF");
        assert_eq!(document.get_pages().len(), rendered.page_count, "{size}");
    }
}

#[test]
fn delivery_hands_over_file_name_and_bytes() {
    let report = samples::slack().unwrap();
    let rendered = render(&report, ReportSize::Medium);
    let mut sink = MemorySink::default();
    deliver(&rendered, &mut sink).unwrap();

    assert_eq!(sink.files.len(), 1);
    assert_eq!(sink.files[0].0, "Slack_Security_Report_medium.pdf");
    assert_eq!(sink.files[0].1, rendered.bytes);
}

#[cfg(feature = "bookmarks")]
#[test]
fn bookmarks_follow_section_order() {
    use lopdf::Object;

    let report = samples::github().unwrap();
    let rendered = ReportBuilder::new(&report, ReportSize::Enterprise)
        .with_generated_on(generated_on())
        .render_with_bookmarks()
        .expect("render with bookmarks");
    let document = lopdf::Document::load_mem(&rendered.bytes).unwrap();

    let root = document
        .trailer
        .get(b"Root")
        .unwrap()
        .as_reference()
        .unwrap();
    let catalog = document.get_dictionary(root).unwrap();
    let outlines = catalog.get(b"Outlines").unwrap().as_reference().unwrap();
    let outlines = document.get_dictionary(outlines).unwrap();

    let reference = |object: &Object| object.as_reference().ok();
    let mut titles = Vec::new();
    let mut next = outlines.get(b"First").ok().and_then(reference);
    while let Some(id) = next {
        let entry = document.get_dictionary(id).unwrap();
        if let Ok(Object::String(bytes, _)) = entry.get(b"Title") {
            titles.push(String::from_utf8_lossy(bytes).into_owned());
        }
        next = entry.get(b"Next").ok().and_then(reference);
    }

    let expected: Vec<String> = rendered
        .sections
        .iter()
        .map(|mark| mark.title.clone())
        .collect();
    assert_eq!(titles, expected);
}
