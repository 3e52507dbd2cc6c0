//! Text clean-up applied before any string is measured or drawn.
//!
//! The built-in PDF fonts only cover the Windows-1252 repertoire.  Anything outside of it would be
//! silently dropped by the PDF backend *after* layout, leaving gaps and mis-measured lines, so the
//! clean-up happens up front:
//!
//! 1. whitespace control characters become spaces, all other control characters are removed;
//! 2. typographic punctuation is folded to plain ASCII (`’` → `'`, `“` → `"`, `—` → `-`,
//!    `…` → `...`);
//! 3. symbols and pictographs (arrows, dingbats, emoji, variation selectors, joiners) are removed;
//! 4. whatever remains must be printable ASCII, Latin-1, or one of the few Windows-1252 extras the
//!    metrics know about.
//!
//! [`sanitize`] is idempotent.

use std::borrow::Cow;

use log::debug;

/// Filename used when a product name sanitizes to nothing.
pub const DEFAULT_FILE_STEM: &str = "Security_Assessment";

fn fold_punctuation(ch: char) -> Option<&'static str> {
    let folded = match ch {
        '\u{2018}' | '\u{2019}' | '\u{201a}' | '\u{201b}' | '\u{2032}' | '\u{2035}' => "'",
        '\u{201c}' | '\u{201d}' | '\u{201e}' | '\u{201f}' | '\u{2033}' | '\u{2036}' => "\"",
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}'
        | '\u{2212}' => "-",
        '\u{2026}' => "...",
        '\u{2039}' => "<",
        '\u{203a}' => ">",
        '\u{2002}'..='\u{200a}' | '\u{202f}' | '\u{205f}' | '\u{3000}' => " ",
        _ => return None,
    };
    Some(folded)
}

fn is_pictograph(ch: char) -> bool {
    matches!(ch,
        '\u{200b}'..='\u{200d}'
        | '\u{2060}'
        | '\u{feff}'
        | '\u{2190}'..='\u{21ff}'
        | '\u{2300}'..='\u{23ff}'
        | '\u{2460}'..='\u{24ff}'
        | '\u{2500}'..='\u{27bf}'
        | '\u{27f0}'..='\u{27ff}'
        | '\u{2900}'..='\u{297f}'
        | '\u{2b00}'..='\u{2bff}'
        | '\u{fe00}'..='\u{fe0f}'
        | '\u{1f000}'..='\u{1faff}'
        | '\u{e0000}'..='\u{e007f}'
        | '\u{e0100}'..='\u{e01ef}'
    )
}

fn is_renderable(ch: char) -> bool {
    matches!(ch,
        ' '..='~'
        | '\u{a0}'..='\u{ff}'
        | '\u{2022}'
        | '\u{20ac}'
        | '\u{2122}'
    )
}

/// Returns the text with every character the report fonts cannot render removed or replaced.
///
/// Borrowed input is returned unchanged when it is already clean.
pub fn sanitize(text: &str) -> Cow<'_, str> {
    if text.chars().all(|ch| is_renderable(ch) && ch != '\u{a0}') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut dropped = 0usize;
    for ch in text.chars() {
        if matches!(ch, '\t' | '\n' | '\r' | '\u{a0}') {
            out.push(' ');
        } else if let Some(folded) = fold_punctuation(ch) {
            out.push_str(folded);
        } else if ch.is_control() || is_pictograph(ch) || !is_renderable(ch) {
            dropped += 1;
        } else {
            out.push(ch);
        }
    }

    if dropped > 0 {
        debug!("Sanitization removed {dropped} unsupported character(s)");
    }

    Cow::Owned(out)
}

/// Derives a filesystem-safe download name for a report.
///
/// Runs of whitespace become a single `_`; every character outside `[A-Za-z0-9_-]` is removed.
/// The result always ends with `_Security_Report_<size>.pdf`.
pub fn report_file_name(product_name: &str, size_slug: &str) -> String {
    let stem = file_stem(product_name);
    let stem = if stem.is_empty() {
        DEFAULT_FILE_STEM.to_string()
    } else {
        stem
    };
    let size: String = size_slug
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-'))
        .collect();
    format!("{stem}_Security_Report_{size}.pdf")
}

fn file_stem(product_name: &str) -> String {
    let cleaned = sanitize(product_name);
    let mut stem = String::with_capacity(cleaned.len());
    let mut pending_gap = false;
    for ch in cleaned.chars() {
        if ch.is_whitespace() {
            pending_gap = true;
            continue;
        }
        if !(ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-')) {
            continue;
        }
        if pending_gap && !stem.is_empty() {
            stem.push('_');
        }
        pending_gap = false;
        stem.push(ch);
    }
    stem
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_is_borrowed() {
        assert!(matches!(sanitize("Plain ASCII, 100%"), Cow::Borrowed(_)));
    }

    #[test]
    fn smart_punctuation_is_folded() {
        assert_eq!(
            sanitize("\u{201c}Zero\u{2011}trust\u{201d} isn\u{2019}t magic \u{2014} ok\u{2026}"),
            "\"Zero-trust\" isn't magic - ok..."
        );
    }

    #[test]
    fn pictographs_and_controls_are_removed() {
        assert_eq!(
            sanitize("\u{26a0}\u{fe0f} Listed \u{2192} patch\u{1f512}\u{0007} now\u{2713}"),
            " Listed  patch now"
        );
    }

    #[test]
    fn whitespace_controls_become_spaces() {
        assert_eq!(sanitize("a\tb\r\nc"), "a b  c");
    }

    #[test]
    fn latin1_and_bullets_survive() {
        assert_eq!(sanitize("Zürich \u{2022} Café"), "Zürich \u{2022} Café");
    }

    #[test]
    fn sanitize_is_idempotent() {
        let samples = [
            "",
            "Slack \u{1f4ac} \u{2018}AI\u{2019}",
            "\u{2026}\u{2026}",
            "\u{00a0}\u{2003}x\u{200d}\u{1f468}",
            "\u{4e2d}\u{6587} mixed",
            "tab\tand\u{0085}next",
        ];
        for sample in samples {
            let once = sanitize(sample).into_owned();
            assert_eq!(sanitize(&once), once, "{sample:?}");
        }
    }

    #[test]
    fn file_name_collapses_whitespace() {
        assert_eq!(
            report_file_name("Microsoft  Teams (Work)", "medium"),
            "Microsoft_Teams_Work_Security_Report_medium.pdf"
        );
    }

    #[test]
    fn empty_product_name_falls_back() {
        assert_eq!(
            report_file_name("", "small"),
            "Security_Assessment_Security_Report_small.pdf"
        );
        assert_eq!(
            report_file_name(" \u{1f680} ", "full"),
            "Security_Assessment_Security_Report_full.pdf"
        );
    }

    #[test]
    fn file_name_is_restricted_to_safe_characters() {
        let name = report_file_name("../../etc/passwd; rm -rf ~ \u{e9}", "enterprise");
        let stem = name.strip_suffix(".pdf").expect("suffix");
        assert!(stem
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'));
    }
}
