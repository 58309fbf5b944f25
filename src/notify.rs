//! Notification slots for the appointment list page: one success banner
//! that auto-expires 3.5 s after it was last set (newer messages replace
//! the old and restart the window — no queue), and a page-level error slot
//! that stays hidden while any overlay is open, because overlays render
//! their own inline error area.

use std::time::Duration;

use tokio::time::Instant;

/// How long a success banner stays up.
pub const SUCCESS_WINDOW: Duration = Duration::from_millis(3500);

#[derive(Debug, Default)]
pub struct NotificationManager {
    success: Option<SuccessBanner>,
    action_error: Option<String>,
}

#[derive(Debug)]
struct SuccessBanner {
    message: String,
    expires_at: Instant,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Success banner ──────────────────────────────────────

    /// Replace the success banner and restart its expiry window.
    pub fn push_success(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "Success banner set");
        self.success = Some(SuccessBanner {
            message,
            expires_at: Instant::now() + SUCCESS_WINDOW,
        });
    }

    /// The success banner, while its window lasts. Expiry is checked on
    /// read against the tokio clock, so paused-clock tests drive it.
    pub fn success_message(&mut self) -> Option<&str> {
        if let Some(banner) = &self.success {
            if Instant::now() >= banner.expires_at {
                self.success = None;
            }
        }
        self.success.as_ref().map(|b| b.message.as_str())
    }

    // ── Page-level error slot ───────────────────────────────

    pub fn set_action_error(&mut self, message: impl Into<String>) {
        self.action_error = Some(message.into());
    }

    pub fn clear_action_error(&mut self) {
        self.action_error = None;
    }

    /// The page-level error banner. Suppressed while an overlay is open.
    pub fn page_error(&self, overlay_open: bool) -> Option<&str> {
        if overlay_open {
            None
        } else {
            self.action_error.as_deref()
        }
    }
}
