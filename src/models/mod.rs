//! Data models
//!
//! Input records and the report request.

use serde::{Deserialize, Deserializer};

mod record;
mod request;

pub use record::{AdmissionRecord, ConsultationRecord, PatientRecord, RecordStatus};
pub use request::{DateFilter, ReportRequest};

/// Treat an explicit JSON `null` like an absent field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
