//! Report request
//!
//! The single input value of one report generation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{null_as_default, ConsultationRecord, PatientRecord};
use crate::error::{ReportError, ReportResult};

/// Date window the records were selected for; display only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateFilter {
    #[serde(deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub end_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub period: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub title: String,
    /// Human-readable period shown under the title
    #[serde(default, deserialize_with = "null_as_default")]
    pub date_range: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub patients: Vec<PatientRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub consultations: Vec<ConsultationRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date_filter: DateFilter,
}

impl ReportRequest {
    pub fn from_json_str(json: &str) -> ReportResult<Self> {
        serde_json::from_str(json).map_err(ReportError::InvalidRequest)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ReportResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
