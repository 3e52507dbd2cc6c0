//! PDF encoding of a laid out [`Document`] using `printpdf`.
//!
//! Layout works in millimetres from the top-left corner while PDF user space starts at the
//! bottom-left, so every y coordinate is flipped against the page height here.  Text uses the
//! built-in Helvetica faces; the sanitizer has already reduced every string to characters those
//! fonts can encode.

use std::io::BufWriter;

use printpdf::utils::calculate_points_for_circle;
use printpdf::{
    CustomPdfConformance, IndirectFontRef, Line, Mm, PdfConformance, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point,
};

use crate::document::{Document, DrawOp, Paint, TextRun};
use crate::error::SerializeError;
use crate::fonts;
use crate::style::FontWeight;

const LAYER_NAME: &str = "Content";

struct FontSet {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl FontSet {
    fn load(pdf: &PdfDocumentReference) -> Result<Self, SerializeError> {
        let load = |weight: FontWeight, font: &'static str| {
            pdf.add_builtin_font(fonts::builtin_font(weight))
                .map_err(|source| SerializeError::Font { font, source })
        };
        Ok(Self {
            regular: load(FontWeight::Regular, "Helvetica")?,
            bold: load(FontWeight::Bold, "Helvetica-Bold")?,
        })
    }

    fn get(&self, weight: FontWeight) -> &IndirectFontRef {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }
}

/// Conformance profile allowing the 14 standard fonts and skipping the embedded ICC profile.
fn conformance() -> PdfConformance {
    PdfConformance::Custom(CustomPdfConformance {
        identifier: "PDF 1.3".into(),
        allows_default_fonts: true,
        requires_icc_profile: false,
        requires_xmp_metadata: false,
        ..Default::default()
    })
}

/// Encodes `document` as a PDF with the given document title.
pub fn to_pdf_bytes(document: &Document, title: &str) -> Result<Vec<u8>, SerializeError> {
    if document.page_count() == 0 {
        return Err(SerializeError::Empty);
    }
    let width = Mm(document.width());
    let height = Mm(document.height());

    let (pdf, first_page, first_layer) = PdfDocument::new(title, width, height, LAYER_NAME);
    let pdf = pdf.with_conformance(conformance());
    let fonts = FontSet::load(&pdf)?;

    for (index, page) in document.pages().iter().enumerate() {
        let layer = if index == 0 {
            pdf.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = pdf.add_page(width, height, LAYER_NAME);
            pdf.get_page(page).get_layer(layer)
        };
        let canvas = Canvas {
            layer: &layer,
            fonts: &fonts,
            page_height: document.height(),
        };
        for op in page.ops() {
            canvas.draw(op);
        }
    }

    let mut writer = BufWriter::new(Vec::new());
    pdf.save(&mut writer).map_err(SerializeError::Encode)?;
    writer
        .into_inner()
        .map_err(|err| SerializeError::Flush(err.into_error()))
}

struct Canvas<'a> {
    layer: &'a PdfLayerReference,
    fonts: &'a FontSet,
    page_height: f64,
}

impl Canvas<'_> {
    fn point(&self, x: f64, y: f64) -> Point {
        Point::new(Mm(x), Mm(self.page_height - y))
    }

    fn draw(&self, op: &DrawOp) {
        match op {
            DrawOp::Text(run) => self.text(run),
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                paint,
            } => {
                let points = vec![
                    (self.point(*x, *y), false),
                    (self.point(x + width, *y), false),
                    (self.point(x + width, y + height), false),
                    (self.point(*x, y + height), false),
                ];
                self.shape(points, *paint);
            }
            DrawOp::Circle {
                cx,
                cy,
                radius,
                paint,
            } => {
                let points =
                    calculate_points_for_circle(Mm(*radius), Mm(*cx), Mm(self.page_height - cy));
                self.shape(points, *paint);
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                color,
                thickness,
            } => {
                self.layer.set_outline_color(color.to_pdf_color());
                self.layer.set_outline_thickness(*thickness);
                self.layer.add_shape(Line {
                    points: vec![(self.point(*x1, *y1), false), (self.point(*x2, *y2), false)],
                    is_closed: false,
                    has_fill: false,
                    has_stroke: true,
                    is_clipping_path: false,
                });
            }
        }
    }

    fn text(&self, run: &TextRun) {
        self.layer.set_fill_color(run.color.to_pdf_color());
        self.layer.use_text(
            run.text.as_str(),
            run.size,
            Mm(run.x),
            Mm(self.page_height - run.baseline),
            self.fonts.get(run.weight),
        );
    }

    fn shape(&self, points: Vec<(Point, bool)>, paint: Paint) {
        let (has_fill, has_stroke) = match paint {
            Paint::Fill(color) => {
                self.layer.set_fill_color(color.to_pdf_color());
                (true, false)
            }
            Paint::Stroke { color, thickness } => {
                self.layer.set_outline_color(color.to_pdf_color());
                self.layer.set_outline_thickness(thickness);
                (false, true)
            }
        };
        self.layer.add_shape(Line {
            points,
            is_closed: true,
            has_fill,
            has_stroke,
            is_clipping_path: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{palette, Rgb};

    fn sample_document() -> Document {
        let mut document = Document::new(210.0, 297.0);
        document.last_page_mut().push(DrawOp::Rect {
            x: 15.0,
            y: 15.0,
            width: 180.0,
            height: 10.0,
            paint: Paint::Fill(palette::SECTION_BAND),
        });
        document.last_page_mut().push(DrawOp::Text(TextRun {
            x: 20.0,
            baseline: 22.0,
            text: "Product Overview".into(),
            size: 13.0,
            weight: FontWeight::Bold,
            color: Rgb(30, 41, 59),
        }));
        document.add_page();
        document.last_page_mut().push(DrawOp::Circle {
            cx: 105.0,
            cy: 110.0,
            radius: 20.0,
            paint: Paint::Fill(palette::SUCCESS),
        });
        document
    }

    #[test]
    fn produces_a_pdf_with_every_page() {
        let bytes = to_pdf_bytes(&sample_document(), "Security Assessment Report").unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let parsed = lopdf::Document::load_mem(&bytes).expect("valid pdf");
        assert_eq!(parsed.get_pages().len(), 2);
    }
}
