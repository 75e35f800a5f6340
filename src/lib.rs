//! IMD Care Admin Report Library
//!
//! Aggregates patient and consultation records into the administrative
//! statistics report and renders it as a paginated PDF.

pub mod config;
pub mod dates;
pub mod error;
pub mod models;
pub mod report;

pub use config::ReportConfig;
pub use error::{RenderError, ReportError, ReportResult};
pub use models::{AdmissionRecord, ConsultationRecord, DateFilter, PatientRecord, RecordStatus, ReportRequest};
pub use report::{generate_report, render_report, write_report, GeneratedReport, ReportStatistics};
