/// Application-level constants
pub const APP_NAME: &str = "Clinicdesk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Base URL of the clinic API when `CLINIC_API_URL` is unset.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Per-request timeout for all clinic API calls.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Clinic API base URL, overridable via the `CLINIC_API_URL` env var.
pub fn api_base_url() -> String {
    std::env::var("CLINIC_API_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
}

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,clinicdesk=debug"
}
