//! Typed async client for the clinic API.
//!
//! One method per remote operation, no retries, no request cancellation —
//! callers own the failure (and any stale response that still lands).

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config;
use crate::models::{Appointment, Patient};

use super::error::{extract_detail_message, ApiError};
use super::types::{AppointmentCreate, AppointmentUpdate};

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    timeout_secs: u64,
}

impl ApiClient {
    /// Create a client against the given base URL (e.g. `http://host/api/v1`).
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            timeout_secs,
        }
    }

    /// Client configured from `CLINIC_API_URL` (or the default local API).
    pub fn from_env() -> Self {
        Self::new(&config::api_base_url(), config::REQUEST_TIMEOUT_SECS)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Appointments ────────────────────────────────────────

    /// Full appointment snapshot, patient join included.
    pub async fn list_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        let url = format!("{}/appointments/", self.base_url);
        self.execute(self.http.get(&url)).await
    }

    pub async fn get_appointment(&self, id: i64) -> Result<Appointment, ApiError> {
        let url = format!("{}/appointments/{id}", self.base_url);
        self.execute(self.http.get(&url)).await
    }

    pub async fn create_appointment(
        &self,
        payload: &AppointmentCreate,
    ) -> Result<Appointment, ApiError> {
        let url = format!("{}/appointments/", self.base_url);
        self.execute(self.http.post(&url).json(payload)).await
    }

    pub async fn update_appointment(
        &self,
        id: i64,
        payload: &AppointmentUpdate,
    ) -> Result<Appointment, ApiError> {
        let url = format!("{}/appointments/{id}", self.base_url);
        self.execute(self.http.put(&url).json(payload)).await
    }

    /// Idempotent from the client's view; the server decides legality.
    pub async fn cancel_appointment(&self, id: i64) -> Result<Appointment, ApiError> {
        let url = format!("{}/appointments/{id}/cancel", self.base_url);
        self.execute(self.http.patch(&url)).await
    }

    pub async fn complete_appointment(&self, id: i64) -> Result<Appointment, ApiError> {
        let url = format!("{}/appointments/{id}/complete", self.base_url);
        self.execute(self.http.patch(&url)).await
    }

    // ── Patients (read interface) ───────────────────────────

    pub async fn list_patients(&self) -> Result<Vec<Patient>, ApiError> {
        let url = format!("{}/patients/", self.base_url);
        self.execute(self.http.get(&url)).await
    }

    pub async fn get_patient(&self, id: i64) -> Result<Patient, ApiError> {
        let url = format!("{}/patients/{id}", self.base_url);
        self.execute(self.http.get(&url)).await
    }

    // ── Internal ────────────────────────────────────────────

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let detail = extract_detail_message(&body);
            tracing::warn!(status = status.as_u16(), ?detail, "Clinic API rejected request");
            return Err(ApiError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn classify(&self, err: reqwest::Error) -> ApiError {
        if err.is_connect() {
            ApiError::Connection(self.base_url.clone())
        } else if err.is_timeout() {
            ApiError::Timeout(self.timeout_secs)
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}
