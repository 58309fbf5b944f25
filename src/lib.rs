//! Clinicdesk — the appointment lifecycle and client-side synchronization
//! core behind a clinic staff portal. A rendering shell drives
//! [`list_page::AppointmentListPage`] and reads derived state back out;
//! the crate owns the lifecycle rules, the remote-API cache, the
//! single-overlay state machine, the edit form, and the notification
//! slots — nothing here draws pixels.

pub mod api;
pub mod appointments;
pub mod config;
pub mod form;
pub mod list_page;
pub mod list_view;
pub mod models;
pub mod notify;
pub mod overlay;

#[cfg(test)]
mod test_support;

use tracing_subscriber::EnvFilter;

/// Initialize tracing. The hosting shell calls this once at startup.
pub fn init_telemetry() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
