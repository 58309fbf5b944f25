//! The staged edit draft: initialized from an appointment, mutated one
//! field at a time by the shell, validated synchronously on submit, and
//! finally assembled into an update payload.

use crate::api::AppointmentUpdate;
use crate::models::{parse_wire_datetime, Appointment};

pub const REQUIRED_MESSAGE: &str = "Required";
pub const INVALID_DATETIME_MESSAGE: &str = "Enter a valid date and time";

/// Editable fields, for shell-side field wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    AppointmentDatetime,
    AppointmentEndDatetime,
    DoctorName,
    Department,
    Notes,
}

/// Per-field validation messages. Only required fields can fail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    pub appointment_datetime: Option<String>,
    pub doctor_name: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.appointment_datetime.is_none() && self.doctor_name.is_none()
    }
}

/// The not-yet-submitted edited copy of an appointment's editable fields.
/// All strings, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentDraft {
    pub appointment_datetime: String,
    pub appointment_end_datetime: String,
    pub doctor_name: String,
    pub department: String,
    pub notes: String,
}

impl AppointmentDraft {
    /// Stage an appointment for editing: datetimes normalized to the
    /// `YYYY-MM-DDTHH:MM` editable form, absent optionals become empty.
    pub fn from_appointment(appointment: &Appointment) -> Self {
        Self {
            appointment_datetime: to_input_value(&appointment.appointment_datetime),
            appointment_end_datetime: appointment
                .appointment_end_datetime
                .as_deref()
                .map(to_input_value)
                .unwrap_or_default(),
            doctor_name: appointment.doctor_name.clone(),
            department: appointment.department.clone().unwrap_or_default(),
            notes: appointment.notes.clone().unwrap_or_default(),
        }
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::AppointmentDatetime => self.appointment_datetime = value,
            FormField::AppointmentEndDatetime => self.appointment_end_datetime = value,
            FormField::DoctorName => self.doctor_name = value,
            FormField::Department => self.department = value,
            FormField::Notes => self.notes = value,
        }
    }

    /// Synchronous validation: start time present and parseable, doctor
    /// name non-empty after trimming. Anything else is the server's call.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if self.appointment_datetime.is_empty() {
            errors.appointment_datetime = Some(REQUIRED_MESSAGE.to_string());
        } else if parse_wire_datetime(&self.appointment_datetime).is_none() {
            errors.appointment_datetime = Some(INVALID_DATETIME_MESSAGE.to_string());
        }
        if self.doctor_name.trim().is_empty() {
            errors.doctor_name = Some(REQUIRED_MESSAGE.to_string());
        }
        errors
    }

    /// Assemble the update payload. Optionals are trimmed; blank ones are
    /// submitted as absent (`null` for the end time, omitted for the rest).
    pub fn to_update_payload(&self) -> AppointmentUpdate {
        AppointmentUpdate {
            appointment_datetime: self.appointment_datetime.clone(),
            appointment_end_datetime: none_if_blank(&self.appointment_end_datetime),
            doctor_name: self.doctor_name.trim().to_string(),
            department: none_if_blank(&self.department),
            notes: none_if_blank(&self.notes),
        }
    }
}

/// Normalize a wire timestamp to the `YYYY-MM-DDTHH:MM` editable form.
/// Unparseable values become empty, same as an untouched input.
pub fn to_input_value(value: &str) -> String {
    parse_wire_datetime(value)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M").to_string())
        .unwrap_or_default()
}

fn none_if_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
