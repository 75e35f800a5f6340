//! PDF sink
//!
//! Draws reports with printpdf using the builtin Helvetica fonts. printpdf
//! measures Y from the bottom edge, so every Y is flipped on the way in.

use std::borrow::Cow;
use std::io::BufWriter;

use printpdf::*;

use super::layout::{plan_table, TableMetrics, PT_TO_MM};
use super::sink::{check_page, Align, DocumentSink, TextStyle};
use super::table::Table;
use crate::config::{FontSizes, PageGeometry, ReportConfig, Spacing};
use crate::error::{RenderError, RenderResult};

// ============================================================================
// Color Constants (RGB 0-255)
// ============================================================================

const COLOR_BLACK: (u8, u8, u8) = (0, 0, 0);
const COLOR_WHITE: (u8, u8, u8) = (255, 255, 255);
const COLOR_STRIPE: (u8, u8, u8) = (245, 245, 245);

// ============================================================================
// Helpers
// ============================================================================

fn rgb_to_printpdf(color: (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        color.0 as f32 / 255.0,
        color.1 as f32 / 255.0,
        color.2 as f32 / 255.0,
        None,
    ))
}

fn pdf_error<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Pdf(e.to_string())
}

/// Approximate Helvetica advance width in 1/1000 em
///
/// Builtin fonts carry no metrics in printpdf; these classes are close enough
/// to centre short headings.
fn helvetica_advance(c: char, bold: bool) -> u32 {
    let width = match c {
        ' ' | '.' | ',' | ':' | ';' | '!' | '\'' | '|' => 278,
        'i' | 'j' | 'l' => 222,
        'f' | 't' | 'I' | '/' | '(' | ')' | '[' | ']' => 278,
        'r' => 333,
        '-' => 333,
        '0'..='9' => 556,
        'm' => 833,
        'w' => 722,
        'M' => 833,
        'W' => 944,
        '%' => 889,
        '&' => 667,
        'A'..='Z' => 667,
        _ => 556,
    };
    if bold { width + width / 18 } else { width }
}

/// Estimated rendered width of `text` in millimetres
pub fn text_width_mm(text: &str, size: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(|c| helvetica_advance(c, bold)).sum();
    units as f32 / 1000.0 * size * PT_TO_MM
}

const ELLIPSIS: &str = "...";

/// Shorten `text` with a trailing ellipsis until it fits `max_width` mm
pub fn fit_to_width(text: &str, max_width: f32, size: f32, bold: bool) -> Cow<'_, str> {
    if text_width_mm(text, size, bold) <= max_width {
        return Cow::Borrowed(text);
    }

    let budget = max_width - text_width_mm(ELLIPSIS, size, bold);
    let mut used = 0.0;
    let mut end = 0;
    for (i, c) in text.char_indices() {
        let advance = helvetica_advance(c, bold) as f32 / 1000.0 * size * PT_TO_MM;
        if used + advance > budget {
            break;
        }
        used += advance;
        end = i + c.len_utf8();
    }
    Cow::Owned(format!("{}{}", text[..end].trim_end(), ELLIPSIS))
}

// ============================================================================
// PDF Sink
// ============================================================================

/// Report sink producing a PDF document
pub struct PdfSink {
    doc: PdfDocumentReference,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    current: usize,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    geometry: PageGeometry,
    metrics: TableMetrics,
    fonts: FontSizes,
    spacing: Spacing,
    header_fill: (u8, u8, u8),
}

impl PdfSink {
    pub fn new(title: &str, config: &ReportConfig) -> RenderResult<Self> {
        let geometry = config.page;
        let (doc, page1, layer1) = PdfDocument::new(
            title,
            Mm(geometry.width),
            Mm(geometry.height),
            "Layer 1",
        );

        let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;

        Ok(Self {
            doc,
            pages: vec![(page1, layer1)],
            current: 0,
            font,
            font_bold,
            geometry,
            metrics: TableMetrics::new(&config.fonts, &config.spacing),
            fonts: config.fonts,
            spacing: config.spacing,
            header_fill: config.header_fill,
        })
    }

    fn layer(&self) -> PdfLayerReference {
        let (page, layer) = self.pages[self.current];
        self.doc.get_page(page).get_layer(layer)
    }

    fn flip(&self, y: f32) -> Mm {
        Mm(self.geometry.height - y)
    }

    /// Filled rectangle with its top-left corner at (x, y)
    fn fill_rect(&self, x: f32, y: f32, width: f32, height: f32, color: (u8, u8, u8)) {
        let layer = self.layer();
        layer.set_fill_color(rgb_to_printpdf(color));
        let rect = Rect::new(Mm(x), self.flip(y + height), Mm(x + width), self.flip(y));
        layer.add_rect(rect);
    }

    /// One grid row: optional background, then each cell's text
    fn draw_row(
        &self,
        cells: &[String],
        y: f32,
        height: f32,
        size: f32,
        bold: bool,
        text_color: (u8, u8, u8),
        fill: Option<(u8, u8, u8)>,
    ) {
        let x0 = self.geometry.left_margin;
        let content_width = self.geometry.content_width();
        let column_width = content_width / cells.len().max(1) as f32;

        if let Some(fill) = fill {
            self.fill_rect(x0, y, content_width, height, fill);
        }

        let layer = self.layer();
        layer.set_fill_color(rgb_to_printpdf(text_color));
        let font = if bold { &self.font_bold } else { &self.font };
        // Baseline sits a third of the font height below the row's vertical centre
        let baseline = y + height / 2.0 + size * PT_TO_MM / 3.0;

        let text_width = column_width - 2.0 * self.spacing.cell_padding;
        for (i, cell) in cells.iter().enumerate() {
            let x = x0 + i as f32 * column_width + self.spacing.cell_padding;
            let text = fit_to_width(cell, text_width, size, bold);
            layer.use_text(text.as_ref(), size, Mm(x), self.flip(baseline), font);
        }
    }
}

impl DocumentSink for PdfSink {
    type Output = Vec<u8>;

    fn page_geometry(&self) -> PageGeometry {
        self.geometry
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn add_page(&mut self) -> RenderResult<()> {
        let name = format!("Page {}", self.pages.len() + 1);
        let (page, layer) = self.doc.add_page(
            Mm(self.geometry.width),
            Mm(self.geometry.height),
            name,
        );
        self.pages.push((page, layer));
        self.current = self.pages.len() - 1;
        Ok(())
    }

    fn select_page(&mut self, page: usize) -> RenderResult<()> {
        check_page(page, self.pages.len())?;
        self.current = page - 1;
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) -> RenderResult<()> {
        let x = match style.align {
            Align::Left => x,
            Align::Center => x - text_width_mm(text, style.size, style.bold) / 2.0,
        };
        let font = if style.bold { &self.font_bold } else { &self.font };

        let layer = self.layer();
        layer.set_fill_color(rgb_to_printpdf(style.color));
        layer.use_text(text, style.size, Mm(x), self.flip(y), font);
        Ok(())
    }

    fn draw_table(&mut self, table: &Table, start_y: f32) -> RenderResult<f32> {
        let plan = plan_table(&self.geometry, start_y, table.rows().len(), self.metrics);

        for segment in &plan.segments {
            if segment.starts_new_page {
                self.add_page()?;
            }

            self.draw_row(
                table.header(),
                segment.header_y,
                self.metrics.header_height,
                self.fonts.table_header,
                true,
                COLOR_WHITE,
                Some(self.header_fill),
            );

            for slot in &segment.rows {
                // Striped theme: shade every other body row
                let fill = (slot.index % 2 == 1).then_some(COLOR_STRIPE);
                self.draw_row(
                    &table.rows()[slot.index],
                    slot.y,
                    self.metrics.row_height,
                    self.fonts.table_body,
                    false,
                    COLOR_BLACK,
                    fill,
                );
            }
        }

        Ok(plan.final_y)
    }

    fn finish(self) -> RenderResult<Vec<u8>> {
        let mut writer = BufWriter::new(Vec::new());
        self.doc.save(&mut writer).map_err(pdf_error)?;
        writer.into_inner().map_err(|e| RenderError::Io(e.into_error()))
    }
}
