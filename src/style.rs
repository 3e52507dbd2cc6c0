//! Colors, font weights and the report palette.
//!
//! The values here are plain data so that the layout engine and the cover composer can describe
//! their output without touching the PDF backend.  The serializer maps them onto
//! [`printpdf::Color`] at the very end of the pipeline.

/// An sRGB color with 8-bit channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Converts the color into the floating point representation used by `printpdf`.
    pub fn to_pdf_color(self) -> printpdf::Color {
        printpdf::Color::Rgb(printpdf::Rgb::new(
            f64::from(self.0) / 255.0,
            f64::from(self.1) / 255.0,
            f64::from(self.2) / 255.0,
            None,
        ))
    }
}

/// Weight of the built-in Helvetica face used for a text run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontWeight {
    /// Helvetica.
    #[default]
    Regular,
    /// Helvetica-Bold.
    Bold,
}

/// Report palette.
pub mod palette {
    use super::Rgb;

    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const TEXT: Rgb = Rgb(31, 41, 55);
    pub const MUTED: Rgb = Rgb(107, 114, 128);
    pub const FOOTER: Rgb = Rgb(128, 128, 128);
    pub const RULE: Rgb = Rgb(209, 213, 219);

    pub const PRIMARY: Rgb = Rgb(59, 130, 246);
    pub const PRIMARY_DARK: Rgb = Rgb(30, 64, 175);
    pub const SECTION_BAND: Rgb = Rgb(239, 246, 255);
    pub const HEADING: Rgb = Rgb(30, 41, 59);
    pub const CARD: Rgb = Rgb(248, 250, 252);
    pub const CARD_BORDER: Rgb = Rgb(226, 232, 240);

    pub const SUCCESS: Rgb = Rgb(34, 197, 94);
    pub const WARNING: Rgb = Rgb(234, 179, 8);
    pub const ALERT: Rgb = Rgb(249, 115, 22);
    pub const DANGER: Rgb = Rgb(239, 68, 68);
}

/// Visual severity of an info box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
}

impl Severity {
    /// Accent color used for the left bar of the box.
    pub fn accent(self) -> Rgb {
        match self {
            Severity::Info => palette::PRIMARY,
            Severity::Success => palette::SUCCESS,
            Severity::Warning => palette::WARNING,
            Severity::Danger => palette::DANGER,
        }
    }

    /// Light background fill of the box.
    pub fn background(self) -> Rgb {
        match self {
            Severity::Info => Rgb(239, 246, 255),
            Severity::Success => Rgb(240, 253, 244),
            Severity::Warning => Rgb(254, 252, 232),
            Severity::Danger => Rgb(254, 242, 242),
        }
    }

    /// Text color that stays readable on [`Severity::background`].
    pub fn text(self) -> Rgb {
        match self {
            Severity::Info => Rgb(30, 64, 175),
            Severity::Success => Rgb(22, 101, 52),
            Severity::Warning => Rgb(133, 77, 14),
            Severity::Danger => Rgb(153, 27, 27),
        }
    }
}

/// Text appearance for flowing text drawn through the layout engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in points.
    pub size: f64,
    pub weight: FontWeight,
    pub color: Rgb,
    /// Left indent in millimetres, relative to the left margin.
    pub indent: f64,
}

impl TextStyle {
    /// Regular weight text in the default body color.
    pub fn regular(size: f64) -> Self {
        Self {
            size,
            weight: FontWeight::Regular,
            color: palette::TEXT,
            indent: 0.0,
        }
    }

    /// Bold text in the default body color.
    pub fn bold(size: f64) -> Self {
        Self {
            weight: FontWeight::Bold,
            ..Self::regular(size)
        }
    }

    /// Sets the color and returns the updated style.
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Sets the indent and returns the updated style.
    pub fn with_indent(mut self, indent: f64) -> Self {
        self.indent = indent;
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::regular(10.0)
    }
}
