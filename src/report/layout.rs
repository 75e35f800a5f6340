//! Page layout
//!
//! Tracks the vertical cursor on the current page and decides page breaks,
//! both between sections and inside tables that run past the bottom margin.
//! Coordinates are millimetres from the top-left corner of the page.

use crate::config::{FontSizes, PageGeometry, Spacing};
use crate::error::RenderResult;

use super::sink::DocumentSink;

/// Points to millimetres
pub const PT_TO_MM: f32 = 0.352_777_8;

/// Line height as a multiple of the font size
const LINE_HEIGHT_FACTOR: f32 = 1.15;

// ============================================================================
// Cursor
// ============================================================================

/// Vertical cursor over a fixed page canvas
#[derive(Debug, Clone)]
pub struct PageCursor {
    geometry: PageGeometry,
    y: f32,
}

impl PageCursor {
    /// Cursor at the top margin of the first page
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            y: geometry.top_margin,
        }
    }

    pub fn current_y(&self) -> f32 {
        self.y
    }

    pub fn advance(&mut self, delta: f32) {
        self.y += delta;
    }

    /// Move to the Y a table reported below itself
    pub fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    pub fn page_width(&self) -> f32 {
        self.geometry.width
    }

    pub fn page_height(&self) -> f32 {
        self.geometry.height
    }

    /// Start a new page when less than `min_required` is left below the cursor
    ///
    /// Returns true when a page was added.
    pub fn ensure_space<S: DocumentSink>(&mut self, sink: &mut S, min_required: f32) -> RenderResult<bool> {
        if self.page_height() - self.y >= min_required {
            return Ok(false);
        }
        sink.add_page()?;
        self.y = self.geometry.top_margin;
        tracing::debug!(pages = sink.page_count(), "started new page");
        Ok(true)
    }
}

// ============================================================================
// Table Planning
// ============================================================================

/// Row heights of a table grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableMetrics {
    pub header_height: f32,
    pub row_height: f32,
}

impl TableMetrics {
    pub fn new(fonts: &FontSizes, spacing: &Spacing) -> Self {
        Self {
            header_height: line_height(fonts.table_header) + 2.0 * spacing.cell_padding,
            row_height: line_height(fonts.table_body) + 2.0 * spacing.cell_padding,
        }
    }
}

fn line_height(font_size: f32) -> f32 {
    font_size * PT_TO_MM * LINE_HEIGHT_FACTOR
}

/// A body row placed on a page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowSlot {
    /// Index into the table's body rows
    pub index: usize,
    /// Top edge of the row
    pub y: f32,
}

/// The part of a table drawn on one page: a header followed by body rows
#[derive(Debug, Clone, PartialEq)]
pub struct TableSegment {
    pub starts_new_page: bool,
    pub header_y: f32,
    pub rows: Vec<RowSlot>,
    /// Bottom edge of the segment's last row
    pub bottom: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TablePlan {
    pub segments: Vec<TableSegment>,
    /// Y immediately below the table on its last page
    pub final_y: f32,
}

impl TablePlan {
    #[cfg(test)]
    pub fn page_breaks(&self) -> usize {
        self.segments.iter().filter(|s| s.starts_new_page).count()
    }
}

/// Place a table's header and body rows starting at `start_y`
///
/// Rows that would cross the bottom margin continue on a new page with the
/// header repeated at the top margin. A segment that cannot hold its header and
/// first row moves to the next page as a whole.
pub fn plan_table(
    geometry: &PageGeometry,
    start_y: f32,
    body_rows: usize,
    metrics: TableMetrics,
) -> TablePlan {
    let bottom_limit = geometry.content_bottom();
    let mut segments = Vec::new();
    let mut y = start_y;
    let mut at_page_top = false;
    let mut next_row = 0;

    loop {
        let header_y = y;
        let mut row_y = header_y + metrics.header_height;
        let mut rows = Vec::new();

        // A fresh page always takes at least one row so oversized rows cannot loop
        while next_row < body_rows
            && (row_y + metrics.row_height <= bottom_limit || (rows.is_empty() && at_page_top))
        {
            rows.push(RowSlot { index: next_row, y: row_y });
            row_y += metrics.row_height;
            next_row += 1;
        }

        let header_fits = row_y <= bottom_limit || at_page_top;
        let placed = !rows.is_empty() || (body_rows == 0 && header_fits);

        if placed {
            segments.push(TableSegment {
                starts_new_page: at_page_top,
                header_y,
                rows,
                bottom: row_y,
            });
            if next_row >= body_rows {
                return TablePlan { segments, final_y: row_y };
            }
        }

        y = geometry.top_margin;
        at_page_top = true;
    }
}
