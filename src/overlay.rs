//! Single-overlay interaction state machine.
//!
//! Exactly one overlay (view / edit / cancel-confirm) can be up at a time,
//! enforced structurally: the whole interaction state is one `Overlay`
//! value, each variant carrying exactly the data that mode needs. While any
//! overlay is up the background page holds a no-scroll lock; the lock is
//! released on every return to `Idle`, error paths and teardown included.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::form::{AppointmentDraft, FieldErrors};
use crate::models::Appointment;

// ─── Scroll lock ──────────────────────────────────────────────────────────────

/// UI lock the hosting shell polls to stop background scrolling while an
/// overlay is up. Owned by the state machine; the shell only reads it.
#[derive(Debug, Default)]
pub struct ScrollLock {
    locked: AtomicBool,
}

impl ScrollLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }

    fn set(&self, locked: bool) {
        self.locked.store(locked, Ordering::Relaxed);
    }
}

// ─── Overlay ──────────────────────────────────────────────────────────────────

/// The active overlay. `Editing` and `ConfirmingCancel` carry their own
/// inline submit error so a failed mutation never leaks onto the page
/// behind them.
#[derive(Debug, Clone)]
pub enum Overlay {
    Idle,
    Viewing {
        appointment: Appointment,
    },
    Editing {
        appointment: Appointment,
        draft: AppointmentDraft,
        field_errors: FieldErrors,
        submit_error: Option<String>,
    },
    ConfirmingCancel {
        appointment: Appointment,
        submit_error: Option<String>,
    },
}

impl Overlay {
    pub fn is_idle(&self) -> bool {
        matches!(self, Overlay::Idle)
    }

    /// The appointment this overlay is about, if any.
    pub fn selected_id(&self) -> Option<i64> {
        match self {
            Overlay::Idle => None,
            Overlay::Viewing { appointment }
            | Overlay::Editing { appointment, .. }
            | Overlay::ConfirmingCancel { appointment, .. } => Some(appointment.id),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Overlay::Idle => "idle",
            Overlay::Viewing { .. } => "viewing",
            Overlay::Editing { .. } => "editing",
            Overlay::ConfirmingCancel { .. } => "confirming-cancel",
        }
    }
}

// ─── State machine ────────────────────────────────────────────────────────────

pub struct OverlayState {
    overlay: Overlay,
    scroll_lock: Arc<ScrollLock>,
}

impl OverlayState {
    pub fn new(scroll_lock: Arc<ScrollLock>) -> Self {
        Self {
            overlay: Overlay::Idle,
            scroll_lock,
        }
    }

    pub fn current(&self) -> &Overlay {
        &self.overlay
    }

    pub fn is_idle(&self) -> bool {
        self.overlay.is_idle()
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.overlay.selected_id()
    }

    // ── Transitions ─────────────────────────────────────────

    /// Open the read-only detail overlay. Always legal.
    pub fn open_view(&mut self, appointment: Appointment) {
        self.transition(Overlay::Viewing { appointment });
    }

    /// Open the edit overlay with a fresh draft and cleared errors.
    /// Ignored (returns `false`) when the status forbids editing.
    pub fn open_edit(&mut self, appointment: Appointment) -> bool {
        if !appointment.status.can_edit() {
            tracing::debug!(id = appointment.id, status = %appointment.status, "Edit not permitted");
            return false;
        }
        let draft = AppointmentDraft::from_appointment(&appointment);
        self.transition(Overlay::Editing {
            appointment,
            draft,
            field_errors: FieldErrors::default(),
            submit_error: None,
        });
        true
    }

    /// Open the cancel confirmation. Ignored when the status forbids it.
    pub fn open_cancel_prompt(&mut self, appointment: Appointment) -> bool {
        if !appointment.status.can_cancel() {
            tracing::debug!(id = appointment.id, status = %appointment.status, "Cancel not permitted");
            return false;
        }
        self.transition(Overlay::ConfirmingCancel {
            appointment,
            submit_error: None,
        });
        true
    }

    /// Close whatever is open.
    pub fn close(&mut self) {
        self.transition(Overlay::Idle);
    }

    /// Force-close when the refetched collection no longer contains the
    /// selected appointment — the overlay would otherwise show a row that
    /// no longer exists.
    pub fn reconcile(&mut self, collection: &[Appointment]) {
        let Some(selected) = self.overlay.selected_id() else {
            return;
        };
        if !collection.iter().any(|a| a.id == selected) {
            tracing::debug!(id = selected, "Selected appointment gone after refetch; closing overlay");
            self.close();
        }
    }

    fn transition(&mut self, next: Overlay) {
        tracing::debug!(from = self.overlay.kind(), to = next.kind(), "Overlay transition");
        self.scroll_lock.set(!next.is_idle());
        self.overlay = next;
    }

    // ── Edit-mode accessors ─────────────────────────────────

    /// The staged draft, while editing.
    pub fn draft_mut(&mut self) -> Option<&mut AppointmentDraft> {
        match &mut self.overlay {
            Overlay::Editing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// The (id, draft) pair a submission needs, while editing.
    pub fn editing_context(&self) -> Option<(i64, &AppointmentDraft)> {
        match &self.overlay {
            Overlay::Editing {
                appointment, draft, ..
            } => Some((appointment.id, draft)),
            _ => None,
        }
    }

    pub fn set_field_errors(&mut self, errors: FieldErrors) {
        if let Overlay::Editing { field_errors, .. } = &mut self.overlay {
            *field_errors = errors;
        }
    }

    /// Attach an inline error to the open edit/cancel overlay. Returns
    /// `false` when neither is open (the caller then owns the message).
    pub fn set_submit_error(&mut self, message: String) -> bool {
        match &mut self.overlay {
            Overlay::Editing { submit_error, .. }
            | Overlay::ConfirmingCancel { submit_error, .. } => {
                *submit_error = Some(message);
                true
            }
            _ => false,
        }
    }

    pub fn clear_submit_error(&mut self) {
        if let Overlay::Editing { submit_error, .. }
        | Overlay::ConfirmingCancel { submit_error, .. } = &mut self.overlay
        {
            *submit_error = None;
        }
    }
}

impl Drop for OverlayState {
    fn drop(&mut self) {
        // Teardown counts as returning to Idle.
        self.scroll_lock.set(false);
    }
}
