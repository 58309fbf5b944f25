//! In-process mock of the clinic API plus shared fixtures. Tests drive the
//! real client over a loopback socket so request verbs, payload field
//! presence, and error bodies are exercised exactly as production sends
//! them.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::models::{parse_wire_datetime, Appointment, AppointmentStatus, Patient};

// ─── Fixtures ─────────────────────────────────────────────────────────────────

pub fn sample_appointment(id: i64, status: AppointmentStatus) -> Appointment {
    sample_appointment_at(id, status, "2024-05-01T10:00:00")
}

/// Appointment fixture with a chosen start; the end is one hour later when
/// the start parses, absent otherwise.
pub fn sample_appointment_at(id: i64, status: AppointmentStatus, start: &str) -> Appointment {
    let end = parse_wire_datetime(start)
        .map(|dt| (dt + chrono::Duration::hours(1)).format("%Y-%m-%dT%H:%M:%S").to_string());
    Appointment {
        id,
        patient_id: 42,
        patient: None,
        appointment_datetime: start.to_string(),
        appointment_end_datetime: end,
        doctor_name: "Dr. Lee".into(),
        department: Some("Cardiology".into()),
        notes: None,
        status,
    }
}

// ─── Mock server ──────────────────────────────────────────────────────────────

pub struct MockClinicApi {
    addr: SocketAddr,
    state: Arc<MockState>,
}

#[derive(Default)]
struct MockState {
    appointments: Mutex<Vec<Appointment>>,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
    update_calls: AtomicUsize,
    cancel_calls: AtomicUsize,
    complete_calls: AtomicUsize,
    fail_lists: AtomicBool,
    fail_next_update: Mutex<Option<(u16, Value)>>,
    fail_next_complete: Mutex<Option<(u16, Value)>>,
}

impl MockClinicApi {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn list_calls(&self) -> usize {
        self.state.list_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.state.get_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.state.update_calls.load(Ordering::SeqCst)
    }

    pub fn cancel_calls(&self) -> usize {
        self.state.cancel_calls.load(Ordering::SeqCst)
    }

    pub fn complete_calls(&self) -> usize {
        self.state.complete_calls.load(Ordering::SeqCst)
    }

    /// Fail every list request with a 500 while set.
    pub fn fail_lists(&self, fail: bool) {
        self.state.fail_lists.store(fail, Ordering::SeqCst);
    }

    /// Reject the next update with the given status and body.
    pub fn fail_next_update(&self, status: u16, body: Value) {
        *self.state.fail_next_update.lock().unwrap() = Some((status, body));
    }

    /// Reject the next complete with the given status and body.
    pub fn fail_next_complete(&self, status: u16, body: Value) {
        *self.state.fail_next_complete.lock().unwrap() = Some((status, body));
    }

    /// Drop an appointment server-side, as if another client deleted it.
    pub fn remove_appointment(&self, id: i64) {
        self.state
            .appointments
            .lock()
            .unwrap()
            .retain(|a| a.id != id);
    }
}

pub async fn spawn_mock_api(initial: Vec<Appointment>) -> MockClinicApi {
    let state = Arc::new(MockState {
        appointments: Mutex::new(initial),
        ..Default::default()
    });

    let app = Router::new()
        .route("/appointments/", get(list_appointments).post(create_appointment))
        .route("/appointments/:id", get(get_appointment).put(update_appointment))
        .route("/appointments/:id/cancel", patch(cancel_appointment))
        .route("/appointments/:id/complete", patch(complete_appointment))
        .route("/patients/", get(list_patients))
        .route("/patients/:id", get(get_patient))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock listener");
    let addr = listener.local_addr().expect("mock listener addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock api server");
    });

    MockClinicApi { addr, state }
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"detail": "Appointment not found"})),
    )
        .into_response()
}

fn injected_failure(status: u16, body: Value) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body)).into_response()
}

async fn list_appointments(State(state): State<Arc<MockState>>) -> Response {
    state.list_calls.fetch_add(1, Ordering::SeqCst);
    if state.fail_lists.load(Ordering::SeqCst) {
        return injected_failure(500, json!({"detail": "Database unavailable"}));
    }
    let appointments = state.appointments.lock().unwrap().clone();
    Json(appointments).into_response()
}

async fn get_appointment(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
) -> Response {
    state.get_calls.fetch_add(1, Ordering::SeqCst);
    let appointments = state.appointments.lock().unwrap();
    match appointments.iter().find(|a| a.id == id) {
        Some(appointment) => Json(appointment.clone()).into_response(),
        None => not_found(),
    }
}

async fn create_appointment(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> Response {
    let mut appointments = state.appointments.lock().unwrap();
    let id = appointments.iter().map(|a| a.id).max().unwrap_or(0) + 1;
    let appointment = Appointment {
        id,
        patient_id: body["patient_id"].as_i64().unwrap_or(0),
        patient: None,
        appointment_datetime: body["appointment_datetime"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        appointment_end_datetime: body["appointment_end_datetime"]
            .as_str()
            .map(str::to_string),
        doctor_name: body["doctor_name"].as_str().unwrap_or("TBD").to_string(),
        department: body["department"].as_str().map(str::to_string),
        notes: body["notes"].as_str().map(str::to_string),
        status: AppointmentStatus::Scheduled,
    };
    appointments.push(appointment.clone());
    (StatusCode::CREATED, Json(appointment)).into_response()
}

async fn update_appointment(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    state.update_calls.fetch_add(1, Ordering::SeqCst);
    if let Some((status, body)) = state.fail_next_update.lock().unwrap().take() {
        return injected_failure(status, body);
    }

    let mut appointments = state.appointments.lock().unwrap();
    let Some(appointment) = appointments.iter_mut().find(|a| a.id == id) else {
        return not_found();
    };

    if let Some(value) = body.get("appointment_datetime").and_then(Value::as_str) {
        appointment.appointment_datetime = value.to_string();
    }
    // Present-but-null clears; an absent key leaves the stored value.
    if let Some(value) = body.get("appointment_end_datetime") {
        appointment.appointment_end_datetime = value.as_str().map(str::to_string);
    }
    if let Some(value) = body.get("doctor_name").and_then(Value::as_str) {
        appointment.doctor_name = value.to_string();
    }
    if let Some(value) = body.get("department") {
        appointment.department = value.as_str().map(str::to_string);
    }
    if let Some(value) = body.get("notes") {
        appointment.notes = value.as_str().map(str::to_string);
    }

    Json(appointment.clone()).into_response()
}

async fn cancel_appointment(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
) -> Response {
    state.cancel_calls.fetch_add(1, Ordering::SeqCst);
    let mut appointments = state.appointments.lock().unwrap();
    match appointments.iter_mut().find(|a| a.id == id) {
        Some(appointment) => {
            appointment.status = AppointmentStatus::Cancelled;
            Json(appointment.clone()).into_response()
        }
        None => not_found(),
    }
}

async fn complete_appointment(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
) -> Response {
    state.complete_calls.fetch_add(1, Ordering::SeqCst);
    if let Some((status, body)) = state.fail_next_complete.lock().unwrap().take() {
        return injected_failure(status, body);
    }
    let mut appointments = state.appointments.lock().unwrap();
    match appointments.iter_mut().find(|a| a.id == id) {
        Some(appointment) => {
            appointment.status = AppointmentStatus::Completed;
            Json(appointment.clone()).into_response()
        }
        None => not_found(),
    }
}

fn sample_patients() -> Vec<Patient> {
    vec![
        Patient {
            id: 1,
            full_name: "Avery Quinn".into(),
            first_name: Some("Avery".into()),
            last_name: Some("Quinn".into()),
            email: Some("avery.quinn@example.com".into()),
            phone_number: None,
            date_of_birth: Some("1987-03-14".into()),
        },
        Patient {
            id: 42,
            full_name: "Rowan Alvarez".into(),
            first_name: Some("Rowan".into()),
            last_name: Some("Alvarez".into()),
            email: None,
            phone_number: Some("+1-555-0142".into()),
            date_of_birth: None,
        },
    ]
}

async fn list_patients() -> Response {
    Json(sample_patients()).into_response()
}

async fn get_patient(Path(id): Path<i64>) -> Response {
    match sample_patients().into_iter().find(|p| p.id == id) {
        Some(patient) => Json(patient).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Patient not found"})),
        )
            .into_response(),
    }
}
