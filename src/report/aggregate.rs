//! Report statistics
//!
//! Pure counting functions over patient and consultation records. Every
//! percentage goes through [`percentage`], so an empty period shows `0%`
//! instead of NaN.

use serde::Serialize;

use crate::models::{ConsultationRecord, PatientRecord, ReportRequest};

/// Offset added to the department occupancy denominator
pub const DEPARTMENT_OCCUPANCY_OFFSET: usize = 5;

/// Group key for consultations without an urgency
pub const UNDEFINED_KEY: &str = "undefined";

// ============================================================================
// Row Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentRow {
    pub department: String,
    pub active_patients: usize,
    pub active_consultations: usize,
    pub occupancy_pct: u32,
}

/// One category of a count/percentage breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownRow {
    pub label: String,
    pub count: usize,
    pub pct: u32,
}

// ============================================================================
// Helpers
// ============================================================================

/// `round(count / denominator * 100)`, or 0 when the denominator is 0
pub fn percentage(count: usize, denominator: usize) -> u32 {
    if denominator == 0 {
        return 0;
    }
    ((count as f64 / denominator as f64) * 100.0).round() as u32
}

/// Upper-case the first character, leave the rest untouched
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Label → count tally that keeps first-seen order
#[derive(Debug, Default)]
struct OrderedTally {
    entries: Vec<(String, usize)>,
}

impl OrderedTally {
    fn add(&mut self, key: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((key.to_string(), 1)),
        }
    }

    fn into_rows(self, denominator: usize) -> Vec<BreakdownRow> {
        self.entries
            .into_iter()
            .map(|(key, count)| BreakdownRow {
                label: capitalize(&key),
                count,
                pct: percentage(count, denominator),
            })
            .collect()
    }
}

// ============================================================================
// Aggregations
// ============================================================================

/// Patients with at least one active admission
pub fn count_active_patients(patients: &[PatientRecord]) -> usize {
    patients.iter().filter(|p| p.is_active()).count()
}

pub fn count_active_consultations(consultations: &[ConsultationRecord]) -> usize {
    consultations.iter().filter(|c| c.is_active()).count()
}

/// Overall occupancy: `round(active / 100 * 100)`
///
/// Placeholder metric with no bed capacity behind it; it equals the active
/// patient count.
pub fn occupancy_rate(active_patients: usize) -> u32 {
    ((active_patients as f64 / 100.0) * 100.0).round() as u32
}

/// One row per configured department, in the given order
pub fn per_department<S: AsRef<str>>(
    departments: &[S],
    patients: &[PatientRecord],
    consultations: &[ConsultationRecord],
) -> Vec<DepartmentRow> {
    departments
        .iter()
        .map(|dept| {
            let dept = dept.as_ref();
            let active_patients = patients.iter().filter(|p| p.is_active_in(dept)).count();
            let active_consultations = consultations
                .iter()
                .filter(|c| c.is_active() && c.specialty == dept)
                .count();

            DepartmentRow {
                department: dept.to_string(),
                active_patients,
                active_consultations,
                occupancy_pct: percentage(
                    active_patients,
                    active_patients + DEPARTMENT_OCCUPANCY_OFFSET,
                ),
            }
        })
        .collect()
}

/// Group patients by the safety type of their first admission
///
/// Later admissions are never inspected. Percentages are relative to
/// `active_patients` and can exceed 100.
pub fn safety_breakdown(patients: &[PatientRecord], active_patients: usize) -> Vec<BreakdownRow> {
    let mut tally = OrderedTally::default();
    for label in patients
        .iter()
        .filter_map(|p| p.first_admission().and_then(|a| a.safety_label()))
    {
        tally.add(label);
    }
    tally.into_rows(active_patients)
}

/// Group every consultation, whatever its status, by urgency
pub fn urgency_breakdown(consultations: &[ConsultationRecord]) -> Vec<BreakdownRow> {
    let mut tally = OrderedTally::default();
    for consultation in consultations {
        tally.add(consultation.urgency.as_deref().unwrap_or(UNDEFINED_KEY));
    }
    tally.into_rows(consultations.len())
}

// ============================================================================
// Bundled Statistics
// ============================================================================

/// Every figure shown on the administrative report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportStatistics {
    pub active_patients: usize,
    pub active_consultations: usize,
    pub occupancy_rate: u32,
    pub departments: Vec<DepartmentRow>,
    pub safety: Vec<BreakdownRow>,
    pub urgency: Vec<BreakdownRow>,
}

impl ReportStatistics {
    pub fn compute<S: AsRef<str>>(request: &ReportRequest, departments: &[S]) -> Self {
        let active_patients = count_active_patients(&request.patients);

        Self {
            active_patients,
            active_consultations: count_active_consultations(&request.consultations),
            occupancy_rate: occupancy_rate(active_patients),
            departments: per_department(departments, &request.patients, &request.consultations),
            safety: safety_breakdown(&request.patients, active_patients),
            urgency: urgency_breakdown(&request.consultations),
        }
    }
}
