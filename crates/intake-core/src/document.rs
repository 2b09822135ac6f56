//! Two-page guarantee PDF.
//!
//! # Design
//! - [`layout_guarantee`] is pure: it decides every line and position, and
//!   [`render_guarantee_pdf`] only paints that layout with `printpdf`.
//! - The document is built in memory; nothing touches the filesystem.
//! - Terms that do not fit on the first page are cut and end with an
//!   ellipsis line, so the output is always two pages.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use printpdf::image_crate::{self, DynamicImage, Rgb, RgbImage};
use printpdf::{BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use tracing::warn;

use crate::error::RenderError;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const TITLE_SIZE: f32 = 18.0;
const META_SIZE: f32 = 11.0;
const BODY_SIZE: f32 = 10.0;
const BODY_LINE_MM: f32 = 5.0;
const PT_TO_MM: f32 = 0.3528;
// Average Helvetica glyph width relative to the font size.
const GLYPH_WIDTH_RATIO: f32 = 0.5;
const ELLIPSIS: &str = "...";
const TITLE: &str = "Job Guarantee Agreement";
const SIGNATURE_HEADING: &str = "Signature";

/// Inputs for the guarantee PDF.
#[derive(Debug, Clone, Default)]
pub struct GuaranteeDocument {
    /// Signer name.
    pub full_name: String,
    /// Signing timestamp as submitted.
    pub signed_at: String,
    /// Terms paragraph(s).
    pub terms_text: String,
    /// Encoded signature image (PNG, JPEG, ...), if any.
    pub signature_image: Option<Vec<u8>>,
}

/// One positioned line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    /// Text content.
    pub text: String,
    /// Font size in points.
    pub size: f32,
    /// Left edge in millimetres.
    pub x_mm: f32,
    /// Baseline in millimetres from the bottom of the page.
    pub y_mm: f32,
    /// Whether the bold face is used.
    pub bold: bool,
}

/// Box reserved for the signature image, millimetres from the bottom left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignatureBox {
    /// Left edge.
    pub x_mm: f32,
    /// Bottom edge.
    pub y_mm: f32,
    /// Maximum image width.
    pub width_mm: f32,
    /// Maximum image height.
    pub height_mm: f32,
}

/// Full layout of the two pages.
#[derive(Debug, Clone, PartialEq)]
pub struct GuaranteeLayout {
    /// Title, signer details and terms.
    pub terms_page: Vec<PlacedText>,
    /// Signature heading and repeated signer details.
    pub signature_page: Vec<PlacedText>,
    /// Area the signature image is fitted into.
    pub signature_box: SignatureBox,
    /// Whether the terms were cut to fit the first page.
    pub truncated: bool,
}

impl GuaranteeLayout {
    /// Every text line on both pages, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.terms_page
            .iter()
            .chain(&self.signature_page)
            .map(|line| line.text.as_str())
    }
}

fn line(text: impl Into<String>, size: f32, y_mm: f32, bold: bool) -> PlacedText {
    PlacedText {
        text: text.into(),
        size,
        x_mm: MARGIN_MM,
        y_mm,
        bold,
    }
}

/// Compute the page layout for `document`.
#[must_use]
pub fn layout_guarantee(document: &GuaranteeDocument) -> GuaranteeLayout {
    let signed = format_signed_at(&document.signed_at);
    let name = document.full_name.trim();

    let mut y = PAGE_HEIGHT_MM - MARGIN_MM - 5.0;
    let mut terms_page = vec![line(TITLE, TITLE_SIZE, y, true)];
    y -= 12.0;
    terms_page.push(line(format!("Signer: {name}"), META_SIZE, y, false));
    y -= 6.0;
    terms_page.push(line(format!("Signed: {signed}"), META_SIZE, y, false));
    y -= 12.0;

    let capacity = line_capacity(y);
    let mut wrapped = wrap_text(&document.terms_text, chars_per_line(BODY_SIZE));
    let truncated = wrapped.len() > capacity;
    if truncated {
        wrapped.truncate(capacity.saturating_sub(1));
        wrapped.push(ELLIPSIS.to_string());
    }
    for text in wrapped {
        terms_page.push(line(text, BODY_SIZE, y, false));
        y -= BODY_LINE_MM;
    }

    let mut y = PAGE_HEIGHT_MM - MARGIN_MM - 5.0;
    let mut signature_page = vec![line(SIGNATURE_HEADING, TITLE_SIZE, y, true)];
    y -= 10.0;
    let signature_box = SignatureBox {
        x_mm: MARGIN_MM,
        y_mm: y - 60.0,
        width_mm: 120.0,
        height_mm: 60.0,
    };
    y = signature_box.y_mm - 10.0;
    signature_page.push(line(name, META_SIZE, y, false));
    y -= 6.0;
    signature_page.push(line(signed, META_SIZE, y, false));

    GuaranteeLayout {
        terms_page,
        signature_page,
        signature_box,
        truncated,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn line_capacity(first_baseline_mm: f32) -> usize {
    let usable = (first_baseline_mm - MARGIN_MM).max(0.0);
    (usable / BODY_LINE_MM).floor() as usize + 1
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn chars_per_line(size: f32) -> usize {
    let glyph_mm = size * PT_TO_MM * GLYPH_WIDTH_RATIO;
    ((PAGE_WIDTH_MM - 2.0 * MARGIN_MM) / glyph_mm).floor().max(1.0) as usize
}

/// Greedy word wrap. Paragraph breaks are kept as blank lines and words
/// longer than a line are split.
#[must_use]
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for paragraph in text.trim().lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let word: String = word.into_iter().collect();
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }
    lines
}

/// Render `signed_at` as `Month D, YYYY HH:MM UTC`.
///
/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates; anything else is
/// returned trimmed but otherwise unchanged.
#[must_use]
pub fn format_signed_at(raw: &str) -> String {
    let raw = raw.trim();
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|stamp| stamp.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        });
    match parsed {
        Ok(stamp) => stamp.format("%B %-d, %Y %H:%M UTC").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Produce the guarantee PDF bytes.
///
/// # Errors
///
/// Returns [`RenderError::Pdf`] when the PDF writer fails. A missing or
/// undecodable signature image is not an error.
pub fn render_guarantee_pdf(document: &GuaranteeDocument) -> Result<Vec<u8>, RenderError> {
    let layout = layout_guarantee(document);

    let (pdf, terms_page, terms_layer) =
        PdfDocument::new(TITLE, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Terms");
    let regular = pdf
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|err| pdf_error("font", &err))?;
    let bold = pdf
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|err| pdf_error("font", &err))?;

    let layer = pdf.get_page(terms_page).get_layer(terms_layer);
    paint(&layer, &layout.terms_page, &regular, &bold);

    let (signature_page, signature_layer) =
        pdf.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Signature");
    let layer = pdf.get_page(signature_page).get_layer(signature_layer);
    paint(&layer, &layout.signature_page, &regular, &bold);

    match document.signature_image.as_deref() {
        Some(bytes) if !bytes.is_empty() => match image_crate::load_from_memory(bytes) {
            Ok(decoded) => place_signature(layer, &decoded, layout.signature_box),
            Err(err) => warn!(error = %err, "signature image could not be decoded; skipping"),
        },
        _ => warn!("no signature image supplied; skipping"),
    }

    pdf.save_to_bytes().map_err(|err| pdf_error("save", &err))
}

fn paint(
    layer: &PdfLayerReference,
    lines: &[PlacedText],
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    for placed in lines {
        let font = if placed.bold { bold } else { regular };
        layer.use_text(
            placed.text.clone(),
            placed.size,
            Mm(placed.x_mm),
            Mm(placed.y_mm),
            font,
        );
    }
}

/// Composite the image over a white page; PDF image XObjects carry no alpha.
fn flatten_on_white(decoded: &DynamicImage) -> RgbImage {
    let rgba = decoded.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, alpha] = rgba.get_pixel(x, y).0;
        let blend = |channel: u8| {
            let alpha = u16::from(alpha);
            let mixed = (u16::from(channel) * alpha + 255 * (255 - alpha)) / 255;
            u8::try_from(mixed).unwrap_or(u8::MAX)
        };
        Rgb([blend(r), blend(g), blend(b)])
    })
}

#[allow(clippy::cast_precision_loss)]
fn place_signature(layer: PdfLayerReference, decoded: &DynamicImage, area: SignatureBox) {
    let pixels = flatten_on_white(decoded);
    let (width, height) = pixels.dimensions();
    let width_px = width.max(1) as f32;
    let height_px = height.max(1) as f32;
    // Lowest DPI that keeps both dimensions inside the box.
    let dpi = (width_px * 25.4 / area.width_mm)
        .max(height_px * 25.4 / area.height_mm)
        .max(72.0);
    Image::from_dynamic_image(&DynamicImage::ImageRgb8(pixels)).add_to_layer(
        layer,
        ImageTransform {
            translate_x: Some(Mm(area.x_mm)),
            translate_y: Some(Mm(area.y_mm)),
            dpi: Some(dpi),
            ..ImageTransform::default()
        },
    );
}

fn pdf_error(step: &'static str, err: &impl std::fmt::Display) -> RenderError {
    RenderError::Pdf {
        step,
        message: err.to_string(),
    }
}
