use serde::{Deserialize, Serialize};

/// The slice of a patient record the appointment list needs — the server
/// eagerly joins this onto appointments when available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientSummary {
    pub full_name: String,
}

/// Full patient record from the read interface. Appointments only reference
/// patients; everything beyond reading is owned elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub full_name: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
}
