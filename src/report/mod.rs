//! Administrative report generation
//!
//! Aggregates the request's records, draws the report sections in a fixed
//! order onto a [`DocumentSink`], then stamps page numbers once the page count
//! is known. Any fault surfaces as a single [`ReportError::GenerationFailed`];
//! no partial document is ever returned.

pub mod aggregate;
pub mod finalize;
pub mod layout;
pub mod pdf;
pub mod sink;
pub mod table;

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::config::ReportConfig;
use crate::dates::{format_timestamp, report_file_name};
use crate::error::{RenderResult, ReportError, ReportResult};
use crate::models::ReportRequest;

pub use aggregate::{BreakdownRow, DepartmentRow, ReportStatistics};
pub use layout::PageCursor;
pub use pdf::PdfSink;
pub use sink::{DocumentSink, RecordedDocument, RecordingSink, TextStyle};
pub use table::Table;

// ============================================================================
// Response Types
// ============================================================================

/// Output of a sink-generic render
#[derive(Debug)]
pub struct RenderedReport<T> {
    pub output: T,
    pub page_count: usize,
    pub statistics: ReportStatistics,
}

/// A finished PDF report
#[derive(Debug, Serialize)]
pub struct GeneratedReport {
    pub file_name: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub statistics: ReportStatistics,
}

// ============================================================================
// Section Rendering
// ============================================================================

fn draw_header<S: DocumentSink>(
    sink: &mut S,
    cursor: &mut PageCursor,
    request: &ReportRequest,
    config: &ReportConfig,
    generated_at: &NaiveDateTime,
) -> RenderResult<()> {
    let center = cursor.page_width() / 2.0;
    let subtitle = TextStyle::new(config.fonts.subtitle).centered();

    sink.draw_text(
        &request.title,
        center,
        cursor.current_y(),
        TextStyle::new(config.fonts.title).centered(),
    )?;
    cursor.advance(config.spacing.after_title);

    let generated_on = format!("Generated on: {}", format_timestamp(generated_at));
    sink.draw_text(&generated_on, center, cursor.current_y(), subtitle)?;
    cursor.advance(config.spacing.after_generated_on);

    let period = format!("Period: {}", request.date_range);
    sink.draw_text(&period, center, cursor.current_y(), subtitle)?;
    cursor.advance(config.spacing.after_period);

    Ok(())
}

/// Section title followed by its table
fn draw_section<S: DocumentSink>(
    sink: &mut S,
    cursor: &mut PageCursor,
    table: &Table,
    config: &ReportConfig,
) -> RenderResult<()> {
    tracing::debug!(section = %table.name, rows = table.rows().len(), y = cursor.current_y(), "drawing section");

    sink.draw_text(
        &table.name,
        config.page.left_margin,
        cursor.current_y(),
        TextStyle::new(config.fonts.section).bold(),
    )?;
    cursor.advance(config.spacing.after_section_title);

    let final_y = sink.draw_table(table, cursor.current_y())?;
    cursor.set_y(final_y);
    cursor.advance(config.spacing.after_table);
    Ok(())
}

fn compose<S: DocumentSink>(
    mut sink: S,
    request: &ReportRequest,
    config: &ReportConfig,
    generated_at: &NaiveDateTime,
) -> RenderResult<RenderedReport<S::Output>> {
    let statistics = ReportStatistics::compute(request, &config.departments[..]);
    let mut cursor = PageCursor::new(sink.page_geometry());

    draw_header(&mut sink, &mut cursor, request, config, generated_at)?;

    draw_section(&mut sink, &mut cursor, &table::summary_table(&statistics)?, config)?;
    draw_section(&mut sink, &mut cursor, &table::department_table(&statistics.departments)?, config)?;

    cursor.ensure_space(&mut sink, config.spacing.page_break_threshold)?;
    draw_section(&mut sink, &mut cursor, &table::safety_table(&statistics.safety)?, config)?;

    cursor.ensure_space(&mut sink, config.spacing.page_break_threshold)?;
    draw_section(&mut sink, &mut cursor, &table::urgency_table(&statistics.urgency)?, config)?;

    let page_count = finalize::stamp_page_numbers(&mut sink, config)?;
    let output = sink.finish()?;

    Ok(RenderedReport {
        output,
        page_count,
        statistics,
    })
}

// ============================================================================
// Public Entry Points
// ============================================================================

/// Render `request` onto `sink`
pub fn render_report<S: DocumentSink>(
    sink: S,
    request: &ReportRequest,
    config: &ReportConfig,
    generated_at: NaiveDateTime,
) -> ReportResult<RenderedReport<S::Output>> {
    match compose(sink, request, config, &generated_at) {
        Ok(rendered) => {
            tracing::info!(
                title = %request.title,
                pages = rendered.page_count,
                patients = request.patients.len(),
                consultations = request.consultations.len(),
                "report rendered"
            );
            Ok(rendered)
        }
        Err(e) => {
            tracing::error!(error = %e, title = %request.title, "error generating admin report");
            Err(ReportError::GenerationFailed(e))
        }
    }
}

/// Render `request` to PDF bytes
pub fn generate_report(
    request: &ReportRequest,
    config: &ReportConfig,
    generated_at: NaiveDateTime,
) -> ReportResult<GeneratedReport> {
    let sink = PdfSink::new(&request.title, config).map_err(|e| {
        tracing::error!(error = %e, "error creating PDF document");
        ReportError::GenerationFailed(e)
    })?;
    let rendered = render_report(sink, request, config, generated_at)?;

    Ok(GeneratedReport {
        file_name: report_file_name(&config.product_name, &generated_at),
        bytes: rendered.output,
        page_count: rendered.page_count,
        statistics: rendered.statistics,
    })
}

/// Render `request` and save it under `output_dir`
///
/// The document is fully rendered in memory and written through a `.part`
/// file that is renamed into place, so a failure never leaves a partial PDF.
pub fn write_report(
    request: &ReportRequest,
    config: &ReportConfig,
    output_dir: &Path,
    generated_at: NaiveDateTime,
) -> ReportResult<(PathBuf, GeneratedReport)> {
    let report = generate_report(request, config, generated_at)?;

    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(&report.file_name);
    let partial = output_dir.join(format!("{}.part", report.file_name));

    if let Err(e) = std::fs::write(&partial, &report.bytes) {
        let _ = std::fs::remove_file(&partial);
        return Err(e.into());
    }
    if let Err(e) = std::fs::rename(&partial, &path) {
        let _ = std::fs::remove_file(&partial);
        return Err(e.into());
    }

    tracing::info!(path = %path.display(), bytes = report.bytes.len(), "report saved");
    Ok((path, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageGeometry;
    use crate::error::RenderError;
    use crate::models::{AdmissionRecord, ConsultationRecord, PatientRecord, RecordStatus};
    use chrono::NaiveDate;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 9)
            .unwrap()
            .and_hms_opt(14, 3, 0)
            .unwrap()
    }

    fn request(patients: Vec<PatientRecord>, consultations: Vec<ConsultationRecord>) -> ReportRequest {
        ReportRequest {
            title: "Administrative Report".to_string(),
            date_range: "Last 30 days".to_string(),
            patients,
            consultations,
            ..Default::default()
        }
    }

    fn scenario_b() -> ReportRequest {
        let patients = (0..10)
            .map(|_| {
                PatientRecord::new(vec![AdmissionRecord::new(RecordStatus::Active, "Internal Medicine")
                    .with_safety_type("standard")])
            })
            .collect();
        let consultations = (0..3)
            .map(|_| ConsultationRecord::new(RecordStatus::Active, "Internal Medicine", "urgent"))
            .collect();
        request(patients, consultations)
    }

    fn render(request: &ReportRequest, config: &ReportConfig) -> RenderedReport<RecordedDocument> {
        render_report(RecordingSink::new(config), request, config, generated_at()).unwrap()
    }

    fn cells(row: &[&str]) -> Vec<String> {
        row.iter().map(|c| c.to_string()).collect()
    }

    fn assert_footers(doc: &RecordedDocument) {
        let n = doc.page_count();
        for (i, page) in doc.pages.iter().enumerate() {
            let footers: Vec<_> = page
                .texts()
                .into_iter()
                .filter(|t| t.starts_with("Page "))
                .collect();
            assert_eq!(footers, vec![format!("Page {} of {}", i + 1, n)]);
        }
    }

    #[test]
    fn test_header_block() {
        let config = ReportConfig::default();
        let rendered = render(&request(vec![], vec![]), &config);
        let texts = rendered.output.pages[0].texts();
        assert_eq!(&texts[..3], &[
            "Administrative Report",
            "Generated on: 09, 01, 2025 14:03",
            "Period: Last 30 days",
        ]);
    }

    #[test]
    fn test_empty_request_scenario() {
        let config = ReportConfig::default();
        let rendered = render(&request(vec![], vec![]), &config);
        let doc = &rendered.output;

        assert_eq!(doc.table_rows("Summary Statistics").unwrap(), vec![
            cells(&["Active Patients", "0"]),
            cells(&["Active Consultations", "0"]),
            cells(&["Occupancy Rate", "0%"]),
        ]);

        let departments = doc.table_rows("Department Statistics").unwrap();
        assert_eq!(departments.len(), 10);
        assert!(departments.iter().all(|r| r[1] == "0" && r[2] == "0" && r[3] == "0%"));

        assert_eq!(doc.table_rows("Safety Admission Statistics").unwrap(), Vec::<Vec<String>>::new());
        assert_eq!(doc.table_rows("Consultation Urgency Distribution").unwrap(), Vec::<Vec<String>>::new());
        assert_footers(doc);
    }

    #[test]
    fn test_single_department_scenario() {
        let config = ReportConfig::default();
        let rendered = render(&scenario_b(), &config);
        let doc = &rendered.output;

        assert_eq!(doc.table_rows("Summary Statistics").unwrap(), vec![
            cells(&["Active Patients", "10"]),
            cells(&["Active Consultations", "3"]),
            cells(&["Occupancy Rate", "10%"]),
        ]);

        let departments = doc.table_rows("Department Statistics").unwrap();
        assert_eq!(departments[0], cells(&["Internal Medicine", "10", "3", "67%"]));
        for row in &departments[1..] {
            assert_eq!(&row[1..], &cells(&["0", "0", "0%"])[..]);
        }

        assert_eq!(
            doc.table_rows("Safety Admission Statistics").unwrap(),
            vec![cells(&["Standard", "10", "100%"])]
        );
        assert_eq!(
            doc.table_rows("Consultation Urgency Distribution").unwrap(),
            vec![cells(&["Urgent", "3", "100%"])]
        );
        assert_eq!(rendered.statistics.active_patients, 10);
    }

    #[test]
    fn test_safety_section_breaks_page_when_space_is_short() {
        // Default layout leaves about 54mm under the department table
        let config = ReportConfig::default();
        let rendered = render(&request(vec![], vec![]), &config);
        let doc = &rendered.output;

        assert_eq!(doc.page_of_text("Department Statistics"), Some(1));
        assert_eq!(doc.page_of_text("Safety Admission Statistics"), Some(2));
        assert_eq!(doc.page_of_text("Consultation Urgency Distribution"), Some(2));
        assert_eq!(rendered.page_count, 2);
    }

    #[test]
    fn test_safety_section_stays_when_space_suffices() {
        let mut config = ReportConfig::default();
        config.spacing.page_break_threshold = 50.0;
        let rendered = render(&request(vec![], vec![]), &config);
        let doc = &rendered.output;

        assert_eq!(doc.page_of_text("Safety Admission Statistics"), Some(1));
        assert_eq!(doc.page_of_text("Consultation Urgency Distribution"), Some(2));
    }

    #[test]
    fn test_section_title_drawn_after_break() {
        let config = ReportConfig::default();
        let rendered = render(&request(vec![], vec![]), &config);
        let page = &rendered.output.pages[1];

        // The new page opens with the safety title at the top margin
        match &page.ops[0] {
            sink::DrawOp::Text { text, y, style, .. } => {
                assert_eq!(text, "Safety Admission Statistics");
                assert_eq!(*y, config.page.top_margin);
                assert!(style.bold);
                assert_eq!(style.size, config.fonts.section);
            }
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_long_urgency_table_adds_pages_and_footers() {
        let consultations = (0..45)
            .map(|i| ConsultationRecord::new(RecordStatus::Pending, "Neurology", format!("level {}", i)))
            .collect();
        let config = ReportConfig::default();
        let rendered = render(&request(vec![], consultations), &config);
        let doc = &rendered.output;

        assert!(doc.page_count() >= 3);
        assert_eq!(rendered.page_count, doc.page_count());
        let rows = doc.table_rows("Consultation Urgency Distribution").unwrap();
        assert_eq!(rows.len(), 45);
        assert_eq!(rows[0], cells(&["Level 0", "1", "2%"]));
        assert_footers(doc);
    }

    #[test]
    fn test_custom_department_list() {
        let mut config = ReportConfig::default();
        config.departments = vec!["Cardiology".to_string()];
        let rendered = render(&scenario_b(), &config);
        assert_eq!(
            rendered.output.table_rows("Department Statistics").unwrap(),
            vec![cells(&["Cardiology", "0", "0", "0%"])]
        );
    }

    /// Sink whose tables always fail
    struct BrokenSink(RecordingSink);

    impl DocumentSink for BrokenSink {
        type Output = RecordedDocument;

        fn page_geometry(&self) -> PageGeometry {
            self.0.page_geometry()
        }
        fn page_count(&self) -> usize {
            self.0.page_count()
        }
        fn add_page(&mut self) -> RenderResult<()> {
            self.0.add_page()
        }
        fn select_page(&mut self, page: usize) -> RenderResult<()> {
            self.0.select_page(page)
        }
        fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) -> RenderResult<()> {
            self.0.draw_text(text, x, y, style)
        }
        fn draw_table(&mut self, _table: &Table, _start_y: f32) -> RenderResult<f32> {
            Err(RenderError::Pdf("out of ink".to_string()))
        }
        fn finish(self) -> RenderResult<RecordedDocument> {
            self.0.finish()
        }
    }

    #[test]
    fn test_failure_is_single_opaque_error() {
        let config = ReportConfig::default();
        let sink = BrokenSink(RecordingSink::new(&config));
        let err = render_report(sink, &scenario_b(), &config, generated_at()).unwrap_err();

        assert!(matches!(err, ReportError::GenerationFailed(RenderError::Pdf(_))));
        assert_eq!(err.to_string(), "Failed to generate administrative report");
    }

    #[test]
    fn test_generate_pdf_report() {
        let config = ReportConfig::default();
        let report = generate_report(&scenario_b(), &config, generated_at()).unwrap();

        assert!(report.bytes.starts_with(b"%PDF"));
        assert_eq!(report.file_name, "imd-care-admin-report-09-01-2025-1403.pdf");
        assert_eq!(report.page_count, 2);
        assert_eq!(report.statistics.urgency[0].label, "Urgent");
    }

    #[test]
    fn test_write_report_leaves_only_final_file() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("reports");
        let config = ReportConfig::default();

        let (path, report) = write_report(&scenario_b(), &config, &output_dir, generated_at()).unwrap();

        assert_eq!(path, output_dir.join("imd-care-admin-report-09-01-2025-1403.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), report.bytes);
        let entries: Vec<_> = std::fs::read_dir(&output_dir).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_failed_rename_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().to_path_buf();
        let config = ReportConfig::default();

        // A directory squatting on the final name makes the rename fail
        let target = output_dir.join("imd-care-admin-report-09-01-2025-1403.pdf");
        std::fs::create_dir(&target).unwrap();

        let err = write_report(&scenario_b(), &config, &output_dir, generated_at()).unwrap_err();
        assert!(matches!(err, ReportError::Io(_)));

        let names: Vec<String> = std::fs::read_dir(&output_dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["imd-care-admin-report-09-01-2025-1403.pdf".to_string()]);
        assert!(target.is_dir());
    }
}
