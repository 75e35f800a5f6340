//! Document sinks
//!
//! The renderer draws through [`DocumentSink`] and never touches a concrete
//! document format. [`RecordingSink`] keeps every draw operation in memory;
//! the PDF implementation lives in [`super::pdf`].

use serde::Serialize;

use super::layout::{plan_table, TableMetrics};
use super::table::Table;
use crate::config::{PageGeometry, ReportConfig};
use crate::error::{RenderError, RenderResult};

/// Horizontal anchoring of a text run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Align {
    /// `x` is the left edge
    Left,
    /// `x` is the horizontal centre
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub color: (u8, u8, u8),
    pub align: Align,
}

impl TextStyle {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            bold: false,
            color: (0, 0, 0),
            align: Align::Left,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }
}

/// Page-oriented drawing surface
///
/// Pages are numbered from 1. Y coordinates are millimetres from the top edge.
pub trait DocumentSink {
    type Output;

    fn page_geometry(&self) -> PageGeometry;

    fn page_count(&self) -> usize;

    /// Append a blank page and make it current
    fn add_page(&mut self) -> RenderResult<()>;

    /// Make page `page` (1-based) current
    fn select_page(&mut self, page: usize) -> RenderResult<()>;

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) -> RenderResult<()>;

    /// Draw `table` starting at `start_y` and return the Y just below it
    ///
    /// Tables longer than the remaining page continue on new pages.
    fn draw_table(&mut self, table: &Table, start_y: f32) -> RenderResult<f32>;

    /// Consume the sink and produce the finished document
    fn finish(self) -> RenderResult<Self::Output>;
}

pub(crate) fn check_page(page: usize, count: usize) -> RenderResult<()> {
    if page == 0 || page > count {
        return Err(RenderError::PageOutOfRange { page, count });
    }
    Ok(())
}

// ============================================================================
// Recording Sink
// ============================================================================

/// A recorded draw call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawOp {
    Text {
        text: String,
        x: f32,
        y: f32,
        style: TextStyle,
    },
    /// The part of a table that landed on this page
    Table {
        name: String,
        header: Vec<String>,
        rows: Vec<Vec<String>>,
        y: f32,
        bottom: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordedPage {
    pub ops: Vec<DrawOp>,
}

impl RecordedPage {
    /// Text runs on this page in draw order
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                DrawOp::Table { .. } => None,
            })
            .collect()
    }

    /// Table segments on this page in draw order
    #[cfg(test)]
    pub fn tables(&self) -> Vec<&DrawOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Table { .. }))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedDocument {
    pub geometry: PageGeometry,
    pub pages: Vec<RecordedPage>,
}

impl RecordedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 1-based page number of the first text run equal to `text`
    pub fn page_of_text(&self, text: &str) -> Option<usize> {
        self.pages
            .iter()
            .position(|p| p.texts().contains(&text))
            .map(|i| i + 1)
    }

    /// Body rows of a table, joined across every page it spans
    pub fn table_rows(&self, name: &str) -> Option<Vec<Vec<String>>> {
        let mut found = false;
        let mut rows = Vec::new();
        for op in self.pages.iter().flat_map(|p| p.ops.iter()) {
            if let DrawOp::Table { name: n, rows: r, .. } = op {
                if n == name {
                    found = true;
                    rows.extend(r.iter().cloned());
                }
            }
        }
        found.then_some(rows)
    }
}

/// In-memory sink recording every draw operation
#[derive(Debug, Clone)]
pub struct RecordingSink {
    geometry: PageGeometry,
    metrics: TableMetrics,
    pages: Vec<RecordedPage>,
    current: usize,
}

impl RecordingSink {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            geometry: config.page,
            metrics: TableMetrics::new(&config.fonts, &config.spacing),
            pages: vec![RecordedPage::default()],
            current: 0,
        }
    }

    fn current_page(&mut self) -> &mut RecordedPage {
        &mut self.pages[self.current]
    }
}

impl DocumentSink for RecordingSink {
    type Output = RecordedDocument;

    fn page_geometry(&self) -> PageGeometry {
        self.geometry
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn add_page(&mut self) -> RenderResult<()> {
        self.pages.push(RecordedPage::default());
        self.current = self.pages.len() - 1;
        Ok(())
    }

    fn select_page(&mut self, page: usize) -> RenderResult<()> {
        check_page(page, self.pages.len())?;
        self.current = page - 1;
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) -> RenderResult<()> {
        self.current_page().ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            style,
        });
        Ok(())
    }

    fn draw_table(&mut self, table: &Table, start_y: f32) -> RenderResult<f32> {
        let plan = plan_table(&self.geometry, start_y, table.rows().len(), self.metrics);

        for segment in &plan.segments {
            if segment.starts_new_page {
                self.add_page()?;
            }
            let rows = segment
                .rows
                .iter()
                .map(|slot| table.rows()[slot.index].clone())
                .collect();
            self.current_page().ops.push(DrawOp::Table {
                name: table.name.clone(),
                header: table.header().to_vec(),
                rows,
                y: segment.header_y,
                bottom: segment.bottom,
            });
        }

        Ok(plan.final_y)
    }

    fn finish(self) -> RenderResult<RecordedDocument> {
        Ok(RecordedDocument {
            geometry: self.geometry,
            pages: self.pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_rows(n: usize) -> Table {
        let mut table = Table::new("Numbers", ["N"]);
        for i in 0..n {
            table.push_row(vec![i.to_string()]).unwrap();
        }
        table
    }

    #[test]
    fn test_select_page_bounds() {
        let mut sink = RecordingSink::new(&ReportConfig::default());
        sink.add_page().unwrap();
        assert!(sink.select_page(1).is_ok());
        assert!(sink.select_page(2).is_ok());
        assert!(matches!(
            sink.select_page(0),
            Err(RenderError::PageOutOfRange { page: 0, count: 2 })
        ));
        assert!(matches!(
            sink.select_page(3),
            Err(RenderError::PageOutOfRange { page: 3, count: 2 })
        ));
    }

    #[test]
    fn test_draw_text_goes_to_selected_page() {
        let mut sink = RecordingSink::new(&ReportConfig::default());
        sink.add_page().unwrap();
        sink.draw_text("second", 10.0, 20.0, TextStyle::new(10.0)).unwrap();
        sink.select_page(1).unwrap();
        sink.draw_text("first", 10.0, 20.0, TextStyle::new(10.0).centered()).unwrap();

        let doc = sink.finish().unwrap();
        assert_eq!(doc.pages[0].texts(), vec!["first"]);
        assert_eq!(doc.pages[1].texts(), vec!["second"]);
        assert_eq!(doc.page_of_text("second"), Some(2));
        assert_eq!(doc.page_of_text("missing"), None);
    }

    #[test]
    fn test_long_table_spans_pages() {
        let mut sink = RecordingSink::new(&ReportConfig::default());
        let table = table_with_rows(40);
        let final_y = sink.draw_table(&table, 15.0).unwrap();

        assert_eq!(sink.page_count(), 2);
        let doc = sink.finish().unwrap();
        assert_eq!(doc.pages[0].tables().len(), 1);
        assert_eq!(doc.pages[1].tables().len(), 1);

        let rows = doc.table_rows("Numbers").unwrap();
        assert_eq!(rows.len(), 40);
        assert_eq!(rows[39], vec!["39".to_string()]);
        assert!(final_y < doc.geometry.content_bottom());
    }

    #[test]
    fn test_table_rows_missing_table() {
        let doc = RecordingSink::new(&ReportConfig::default()).finish().unwrap();
        assert_eq!(doc.table_rows("Nope"), None);
    }
}
