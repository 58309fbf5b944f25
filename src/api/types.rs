//! Request payloads for the clinic API mutations.
//!
//! Field presence is meaningful on update: `appointment_end_datetime` is
//! always serialized (`null` clears the stored value) while `department`
//! and `notes` are omitted entirely when absent, which the server treats
//! as "leave unchanged".

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentCreate {
    pub patient_id: i64,
    pub appointment_datetime: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_end_datetime: Option<String>,
    pub doctor_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentUpdate {
    pub appointment_datetime: String,
    /// `None` serializes as `null`, which clears the end time server-side.
    pub appointment_end_datetime: Option<String>,
    pub doctor_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
