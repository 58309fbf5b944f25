//! Derived view of the appointment collection: filter by the
//! "show cancelled" toggle, sort ascending by start time, project rows for
//! display. Pure — the source collection is never mutated.

use chrono::NaiveDateTime;

use crate::models::{Appointment, AppointmentStatus};

/// Filtered + re-sorted copy of the collection.
///
/// Cancelled entries are dropped unless `show_cancelled`. Sorting is
/// ascending by parsed start time; entries whose start doesn't parse sort
/// on a sentinel key, so where they land relative to real rows is an
/// artifact, not a contract.
pub fn visible_appointments(
    collection: &[Appointment],
    show_cancelled: bool,
) -> Vec<Appointment> {
    let mut visible: Vec<Appointment> = collection
        .iter()
        .filter(|a| show_cancelled || a.status != AppointmentStatus::Cancelled)
        .cloned()
        .collect();
    visible.sort_by_key(|a| a.start_time().unwrap_or(NaiveDateTime::MIN));
    visible
}

/// Copy for the empty table body.
pub fn empty_message(show_cancelled: bool) -> &'static str {
    if show_cancelled {
        "No appointments found yet."
    } else {
        "No active appointments scheduled yet."
    }
}

// ─── Memoized projection ──────────────────────────────────────────────────────

/// Caches the last projection keyed on (cache generation, toggle) so a
/// render pass with unchanged inputs reuses the previous output.
#[derive(Default)]
pub struct ListProjection {
    cached: Option<CachedProjection>,
}

struct CachedProjection {
    generation: u64,
    show_cancelled: bool,
    rows: Vec<Appointment>,
}

impl ListProjection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(
        &mut self,
        collection: &[Appointment],
        generation: u64,
        show_cancelled: bool,
    ) -> &[Appointment] {
        let stale = !matches!(
            &self.cached,
            Some(c) if c.generation == generation && c.show_cancelled == show_cancelled
        );
        if stale {
            self.cached = Some(CachedProjection {
                generation,
                show_cancelled,
                rows: visible_appointments(collection, show_cancelled),
            });
        }
        &self
            .cached
            .as_ref()
            .expect("projection cache populated above")
            .rows
    }
}

// ─── Row presentation ─────────────────────────────────────────────────────────

/// Everything a table row displays, pre-formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct RowPresentation {
    pub patient_label: String,
    pub date_label: String,
    pub time_range: String,
    pub doctor_name: String,
    pub department: String,
    pub status: AppointmentStatus,
}

impl RowPresentation {
    pub fn from_appointment(appointment: &Appointment) -> Self {
        let (date_label, time_range) = format_date_time_cell(appointment);
        Self {
            patient_label: appointment.patient_label(),
            date_label,
            time_range,
            doctor_name: appointment.doctor_name.clone(),
            department: appointment
                .department
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| "—".to_string()),
            status: appointment.status,
        }
    }
}

/// Date + time-range labels for the "Date & Time" cell. An unparseable
/// start renders both as em-dashes; a missing/unparseable end renders only
/// the end as one.
fn format_date_time_cell(appointment: &Appointment) -> (String, String) {
    let Some(start) = appointment.start_time() else {
        return ("—".to_string(), "—".to_string());
    };
    let date_label = format_date_label(start);
    let end_label = appointment
        .end_time()
        .map(format_time_label)
        .unwrap_or_else(|| "—".to_string());
    let time_range = format!("{} - {}", format_time_label(start), end_label);
    (date_label, time_range)
}

fn format_date_label(dt: NaiveDateTime) -> String {
    dt.format("%b %-d, %Y").to_string()
}

fn format_time_label(dt: NaiveDateTime) -> String {
    dt.format("%-I:%M %p").to_string()
}
