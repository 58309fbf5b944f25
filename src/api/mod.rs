//! Network boundary: the typed clinic API client, its request payloads,
//! and error normalization.

pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::{extract_detail_message, ApiError, GENERIC_SUBMIT_ERROR};
pub use types::{AppointmentCreate, AppointmentUpdate};
