use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::enums::AppointmentStatus;
use super::patient::PatientSummary;

/// A scheduled clinical visit as the API returns it.
///
/// Timestamps stay wire-form strings: the server doesn't guarantee a single
/// format and the UI has to render rows whose timestamps don't parse at all.
/// `start_time`/`end_time` give the lenient parsed view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    /// Denormalized patient snapshot, present when the server joins it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<PatientSummary>,
    pub appointment_datetime: String,
    #[serde(default)]
    pub appointment_end_datetime: Option<String>,
    pub doctor_name: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub status: AppointmentStatus,
}

impl Appointment {
    /// Parsed visit start, `None` when the wire value doesn't parse.
    pub fn start_time(&self) -> Option<NaiveDateTime> {
        parse_wire_datetime(&self.appointment_datetime)
    }

    /// Parsed visit end, `None` when absent or unparseable.
    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.appointment_end_datetime
            .as_deref()
            .and_then(parse_wire_datetime)
    }

    /// Display name for the patient column: the joined snapshot when the
    /// server sent one, `Patient #<id>` otherwise.
    pub fn patient_label(&self) -> String {
        match &self.patient {
            Some(p) => p.full_name.clone(),
            None => format!("Patient #{}", self.patient_id),
        }
    }
}

/// Lenient timestamp parsing: RFC 3339 first, then the common
/// offset-less shapes the API and the edit form produce.
pub fn parse_wire_datetime(value: &str) -> Option<NaiveDateTime> {
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    None
}
