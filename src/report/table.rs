//! Report tables
//!
//! String grids built from the aggregated statistics.

use serde::Serialize;

use super::aggregate::{BreakdownRow, DepartmentRow, ReportStatistics};
use crate::error::{RenderError, RenderResult};

/// Header row plus body rows of equal width
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub name: String,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(name: impl Into<String>, header: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a body row; its width must match the header
    pub fn push_row(&mut self, row: Vec<String>) -> RenderResult<()> {
        if row.len() != self.header.len() {
            return Err(RenderError::RowWidth {
                table: self.name.clone(),
                expected: self.header.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    #[cfg(test)]
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn pct_cell(pct: u32) -> String {
    format!("{}%", pct)
}

// ============================================================================
// Section Tables
// ============================================================================

pub fn summary_table(stats: &ReportStatistics) -> RenderResult<Table> {
    let mut table = Table::new("Summary Statistics", ["Metric", "Value"]);
    table.push_row(vec!["Active Patients".to_string(), stats.active_patients.to_string()])?;
    table.push_row(vec![
        "Active Consultations".to_string(),
        stats.active_consultations.to_string(),
    ])?;
    table.push_row(vec!["Occupancy Rate".to_string(), pct_cell(stats.occupancy_rate)])?;
    Ok(table)
}

pub fn department_table(rows: &[DepartmentRow]) -> RenderResult<Table> {
    let mut table = Table::new(
        "Department Statistics",
        ["Department", "Active Patients", "Pending Consultations", "Occupancy"],
    );
    for row in rows {
        table.push_row(vec![
            row.department.clone(),
            row.active_patients.to_string(),
            row.active_consultations.to_string(),
            pct_cell(row.occupancy_pct),
        ])?;
    }
    Ok(table)
}

fn breakdown_table(name: &str, label_header: &str, rows: &[BreakdownRow]) -> RenderResult<Table> {
    let mut table = Table::new(name, [label_header, "Count", "Percentage"]);
    for row in rows {
        table.push_row(vec![row.label.clone(), row.count.to_string(), pct_cell(row.pct)])?;
    }
    Ok(table)
}

pub fn safety_table(rows: &[BreakdownRow]) -> RenderResult<Table> {
    breakdown_table("Safety Admission Statistics", "Safety Type", rows)
}

pub fn urgency_table(rows: &[BreakdownRow]) -> RenderResult<Table> {
    breakdown_table("Consultation Urgency Distribution", "Urgency Level", rows)
}
