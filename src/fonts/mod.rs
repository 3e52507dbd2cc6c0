//! Glyph metrics for the built-in Helvetica faces.
//!
//! Reports are drawn with the PDF standard fonts so no font files have to be shipped or located
//! on disk.  Standard fonts carry no embedded metrics, which means the layout engine has to know
//! the advance widths itself; the tables below are the Adobe Font Metrics for Helvetica and
//! Helvetica-Bold covering printable ASCII.  Latin-1 letters are measured as their unaccented
//! base letter and any other retained glyph falls back to a full em, which can only make lines
//! wrap early, never overflow.

use printpdf::BuiltinFont;

use crate::style::FontWeight;

/// Millimetres per PostScript point.
pub const MM_PER_PT: f64 = 25.4 / 72.0;

/// Helvetica ascender in 1/1000 em.
const ASCENT_UNITS: f64 = 718.0;

/// Helvetica descender (absolute value) in 1/1000 em.
const DESCENT_UNITS: f64 = 207.0;

/// Fallback advance for glyphs missing from the tables.
const FALLBACK_UNITS: u16 = 1000;

/// Advance widths of Helvetica for U+0020..=U+007E.
const REGULAR_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Advance widths of Helvetica-Bold for U+0020..=U+007E.
const BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    333, 333, 584, 584, 584, 611, 975, // ':'..'@'
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    333, 278, 333, 584, 556, 333, // '['..'`'
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // 'a'..'m'
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'n'..'z'
    389, 280, 389, 584, // '{'..'~'
];

/// Returns the built-in PDF font that renders the given weight.
pub fn builtin_font(weight: FontWeight) -> BuiltinFont {
    match weight {
        FontWeight::Regular => BuiltinFont::Helvetica,
        FontWeight::Bold => BuiltinFont::HelveticaBold,
    }
}

fn table(weight: FontWeight) -> &'static [u16; 95] {
    match weight {
        FontWeight::Regular => &REGULAR_WIDTHS,
        FontWeight::Bold => &BOLD_WIDTHS,
    }
}

/// Maps Latin-1 letters onto the ASCII letter they are drawn from.
fn base_letter(ch: char) -> Option<char> {
    let base = match ch {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ð' => 'D',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'Þ' => 'P',
        'ß' => 'B',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ð' => 'o',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'þ' => 'p',
        '\u{a0}' => ' ',
        _ => return None,
    };
    Some(base)
}

/// Advance width of a single character in 1/1000 em.
pub fn char_units(ch: char, weight: FontWeight) -> u16 {
    let ch = base_letter(ch).unwrap_or(ch);
    match ch {
        ' '..='~' => table(weight)[ch as usize - 0x20],
        '\u{2022}' => 350,
        '\u{20ac}' | '\u{a3}' | '\u{a5}' | '\u{a7}' | '\u{ab}' | '\u{bb}' => 556,
        '\u{b0}' => 400,
        '\u{b7}' => 278,
        _ => FALLBACK_UNITS,
    }
}

/// Width of `text` in millimetres when drawn at `size` points.
pub fn text_width(text: &str, size: f64, weight: FontWeight) -> f64 {
    let units: u32 = text
        .chars()
        .map(|ch| u32::from(char_units(ch, weight)))
        .sum();
    f64::from(units) / 1000.0 * size * MM_PER_PT
}

/// Distance from the baseline to the top of the tallest glyph, in millimetres.
pub fn ascent(size: f64) -> f64 {
    ASCENT_UNITS / 1000.0 * size * MM_PER_PT
}

/// Distance from the baseline to the bottom of the lowest glyph, in millimetres.
pub fn descent(size: f64) -> f64 {
    DESCENT_UNITS / 1000.0 * size * MM_PER_PT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_widths_follow_afm() {
        assert_eq!(char_units('W', FontWeight::Regular), 944);
        assert_eq!(char_units('i', FontWeight::Regular), 222);
        assert_eq!(char_units('i', FontWeight::Bold), 278);
        assert_eq!(char_units('~', FontWeight::Bold), 584);
    }

    #[test]
    fn bold_is_never_narrower() {
        for ch in ' '..='~' {
            assert!(
                char_units(ch, FontWeight::Bold) + 50 >= char_units(ch, FontWeight::Regular),
                "{ch:?}"
            );
        }
    }

    #[test]
    fn accented_letters_measure_as_base_letter() {
        assert_eq!(
            char_units('é', FontWeight::Regular),
            char_units('e', FontWeight::Regular)
        );
        assert_eq!(char_units('\u{4e2d}', FontWeight::Regular), FALLBACK_UNITS);
    }

    #[test]
    fn width_scales_with_size() {
        let small = text_width("Security", 10.0, FontWeight::Regular);
        let large = text_width("Security", 20.0, FontWeight::Regular);
        assert!((large - 2.0 * small).abs() < 1e-9);
        assert_eq!(text_width("", 10.0, FontWeight::Bold), 0.0);
    }
}
