//! Patient and consultation records
//!
//! Records arrive already filtered to the requested date window. Missing or
//! `null` fields deserialize to empty defaults so a sparse record never
//! aborts a report.

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Lifecycle status shared by admissions and consultations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Active,
    Inactive,
    Discharged,
    Pending,
    Completed,
    Cancelled,
    #[default]
    #[serde(other)]
    Unknown,
}

impl RecordStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, RecordStatus::Active)
    }
}

/// A patient's stay in a department
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdmissionRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: RecordStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub department: String,
    /// Safety classification, absent for most admissions
    #[serde(default)]
    pub safety_type: Option<String>,
}

impl AdmissionRecord {
    pub fn new(status: RecordStatus, department: impl Into<String>) -> Self {
        Self {
            status,
            department: department.into(),
            safety_type: None,
        }
    }

    pub fn with_safety_type(mut self, safety_type: impl Into<String>) -> Self {
        self.safety_type = Some(safety_type.into());
        self
    }

    /// Safety type if present and non-empty
    pub fn safety_label(&self) -> Option<&str> {
        self.safety_type.as_deref().filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub admissions: Vec<AdmissionRecord>,
}

impl PatientRecord {
    pub fn new(admissions: Vec<AdmissionRecord>) -> Self {
        Self { admissions }
    }

    /// True when any admission is active
    pub fn is_active(&self) -> bool {
        self.admissions.iter().any(|a| a.status.is_active())
    }

    /// True when an admission in `department` is active
    pub fn is_active_in(&self, department: &str) -> bool {
        self.admissions
            .iter()
            .any(|a| a.status.is_active() && a.department == department)
    }

    pub fn first_admission(&self) -> Option<&AdmissionRecord> {
        self.admissions.first()
    }
}

/// A request for a specialty opinion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsultationRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: RecordStatus,
    #[serde(default, rename = "consultation_specialty", deserialize_with = "null_as_default")]
    pub specialty: String,
    /// Free-text urgency such as `routine`, `urgent` or `emergency`
    #[serde(default)]
    pub urgency: Option<String>,
}

impl ConsultationRecord {
    pub fn new(status: RecordStatus, specialty: impl Into<String>, urgency: impl Into<String>) -> Self {
        Self {
            status,
            specialty: specialty.into(),
            urgency: Some(urgency.into()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}
