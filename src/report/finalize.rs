//! Page footers
//!
//! Runs once rendering is complete and the page count is fixed.

use super::sink::{DocumentSink, TextStyle};
use crate::config::ReportConfig;
use crate::error::RenderResult;

pub fn footer_text(page: usize, total: usize) -> String {
    format!("Page {} of {}", page, total)
}

/// Stamp `Page i of n` centred near the bottom of every page, in page order
///
/// Returns the page count.
pub fn stamp_page_numbers<S: DocumentSink>(sink: &mut S, config: &ReportConfig) -> RenderResult<usize> {
    let geometry = sink.page_geometry();
    let total = sink.page_count();
    let style = TextStyle::new(config.fonts.footer).centered();
    let y = geometry.height - config.spacing.footer_offset;

    for page in 1..=total {
        sink.select_page(page)?;
        sink.draw_text(&footer_text(page, total), geometry.width / 2.0, y, style)?;
    }

    Ok(total)
}
