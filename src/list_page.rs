//! The appointment list page model — everything the screen does short of
//! rendering: load lifecycle, the show-cancelled toggle, row actions, the
//! overlay state machine, edit submission, and the notification slots.
//!
//! Handlers run to completion; network awaits happen outside any lock so
//! other interactions stay live while a request is in flight. Nothing is
//! cancelled or reordered: a stale response is applied by the handler that
//! issued it, and the refetch after each mutation converges the UI on the
//! server's state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::appointments::AppointmentStore;
use crate::form::{FieldErrors, FormField};
use crate::list_view::{self, ListProjection, RowPresentation};
use crate::models::Appointment;
use crate::notify::NotificationManager;
use crate::overlay::{Overlay, OverlayState, ScrollLock};

pub const LOAD_ERROR_MESSAGE: &str = "Unable to fetch appointments.";
pub const UPDATED_MESSAGE: &str = "Appointment updated successfully.";
pub const CANCELLED_MESSAGE: &str = "Appointment cancelled.";
pub const COMPLETED_MESSAGE: &str = "Appointment marked completed.";

/// Load lifecycle of the page body.
#[derive(Debug, Clone, PartialEq)]
pub enum PageStatus {
    Loading,
    Ready,
    /// Terminal: the body is replaced by an error state, no stale rows.
    LoadFailed { message: String },
}

pub struct AppointmentListPage {
    store: Arc<AppointmentStore>,
    scroll_lock: Arc<ScrollLock>,
    ui: Mutex<PageUi>,
    /// Pending flag for the edit-overlay submission only.
    update_pending: AtomicBool,
    /// Pending flag for the cancel-confirmation submission only.
    cancel_pending: AtomicBool,
}

struct PageUi {
    status: PageStatus,
    show_cancelled: bool,
    /// Render snapshot of the store's canonical collection, replaced on
    /// every refetch — never edited in place.
    collection: Vec<Appointment>,
    generation: u64,
    overlay: OverlayState,
    notifications: NotificationManager,
    projection: ListProjection,
}

impl AppointmentListPage {
    pub fn new(store: Arc<AppointmentStore>) -> Self {
        let scroll_lock = Arc::new(ScrollLock::new());
        Self {
            store,
            scroll_lock: Arc::clone(&scroll_lock),
            ui: Mutex::new(PageUi {
                status: PageStatus::Loading,
                show_cancelled: false,
                collection: Vec::new(),
                generation: 0,
                overlay: OverlayState::new(scroll_lock),
                notifications: NotificationManager::new(),
                projection: ListProjection::new(),
            }),
            update_pending: AtomicBool::new(false),
            cancel_pending: AtomicBool::new(false),
        }
    }

    /// The no-scroll lock the hosting shell observes while overlays are up.
    pub fn scroll_lock(&self) -> Arc<ScrollLock> {
        Arc::clone(&self.scroll_lock)
    }

    // The UI state carries no invariant a panicked holder could half-apply,
    // so a poisoned lock continues with the inner value.
    fn ui(&self) -> MutexGuard<'_, PageUi> {
        self.ui.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Load lifecycle ──────────────────────────────────────

    /// Initial fetch. Shows the loading state until the list settles.
    pub async fn load(&self) {
        self.ui().status = PageStatus::Loading;
        self.refresh().await;
    }

    /// Refetch the collection (served from cache unless a mutation
    /// invalidated it) and reconcile dependent state. Any list failure is
    /// terminal for the page body.
    async fn refresh(&self) {
        match self.store.list().await {
            Ok(collection) => {
                let generation = self.store.generation();
                let mut ui = self.ui();
                ui.collection = collection;
                ui.generation = generation;
                ui.status = PageStatus::Ready;
                let PageUi {
                    overlay,
                    collection,
                    ..
                } = &mut *ui;
                overlay.reconcile(collection);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch appointments");
                self.ui().status = PageStatus::LoadFailed {
                    message: LOAD_ERROR_MESSAGE.to_string(),
                };
            }
        }
    }

    // ── Render state ────────────────────────────────────────

    pub fn status(&self) -> PageStatus {
        self.ui().status.clone()
    }

    pub fn show_cancelled(&self) -> bool {
        self.ui().show_cancelled
    }

    pub fn set_show_cancelled(&self, show_cancelled: bool) {
        self.ui().show_cancelled = show_cancelled;
    }

    /// The filtered + sorted collection the table renders.
    pub fn visible_appointments(&self) -> Vec<Appointment> {
        let mut ui = self.ui();
        let PageUi {
            collection,
            generation,
            show_cancelled,
            projection,
            ..
        } = &mut *ui;
        projection
            .project(collection, *generation, *show_cancelled)
            .to_vec()
    }

    /// Pre-formatted table rows.
    pub fn visible_rows(&self) -> Vec<RowPresentation> {
        self.visible_appointments()
            .iter()
            .map(RowPresentation::from_appointment)
            .collect()
    }

    /// Copy for the empty table body, matching the current toggle.
    pub fn empty_message(&self) -> &'static str {
        list_view::empty_message(self.ui().show_cancelled)
    }

    /// Snapshot of the active overlay.
    pub fn overlay(&self) -> Overlay {
        self.ui().overlay.current().clone()
    }

    pub fn success_message(&self) -> Option<String> {
        self.ui().notifications.success_message().map(str::to_string)
    }

    /// Page-level error banner; suppressed while any overlay is open.
    pub fn page_error(&self) -> Option<String> {
        let ui = self.ui();
        let overlay_open = !ui.overlay.is_idle();
        ui.notifications.page_error(overlay_open).map(str::to_string)
    }

    pub fn update_pending(&self) -> bool {
        self.update_pending.load(Ordering::SeqCst)
    }

    pub fn cancel_pending(&self) -> bool {
        self.cancel_pending.load(Ordering::SeqCst)
    }

    // ── Row actions ─────────────────────────────────────────

    /// Open the read-only detail overlay.
    pub fn open_view(&self, id: i64) -> bool {
        let mut ui = self.ui();
        let Some(appointment) = find(&ui.collection, id) else {
            return false;
        };
        ui.overlay.open_view(appointment);
        true
    }

    /// Open the edit overlay. Refused for statuses that forbid editing.
    pub fn open_edit(&self, id: i64) -> bool {
        let mut ui = self.ui();
        let Some(appointment) = find(&ui.collection, id) else {
            return false;
        };
        ui.notifications.clear_action_error();
        ui.overlay.open_edit(appointment)
    }

    /// Open the cancel confirmation. Refused for cancelled appointments.
    pub fn open_cancel_prompt(&self, id: i64) -> bool {
        let mut ui = self.ui();
        let Some(appointment) = find(&ui.collection, id) else {
            return false;
        };
        ui.notifications.clear_action_error();
        ui.overlay.open_cancel_prompt(appointment)
    }

    /// Close whatever overlay is open ("Close" / "Keep appointment").
    pub fn close_overlays(&self) {
        let mut ui = self.ui();
        ui.overlay.close();
        ui.notifications.clear_action_error();
    }

    /// Route a field edit into the staged draft.
    pub fn set_field(&self, field: FormField, value: &str) {
        if let Some(draft) = self.ui().overlay.draft_mut() {
            draft.set_field(field, value);
        }
    }

    // ── Mutations ───────────────────────────────────────────

    /// Submit the edit overlay. Validation failures never reach the
    /// network; remote failures keep the overlay open with the draft
    /// intact and the extracted message inline.
    pub async fn submit_update(&self) {
        if self.update_pending.load(Ordering::SeqCst) {
            return;
        }

        let (id, payload) = {
            let mut ui = self.ui();
            ui.overlay.clear_submit_error();
            let (id, errors, payload) = {
                let Some((id, draft)) = ui.overlay.editing_context() else {
                    return;
                };
                (id, draft.validate(), draft.to_update_payload())
            };
            if !errors.is_empty() {
                ui.overlay.set_field_errors(errors);
                return;
            }
            ui.overlay.set_field_errors(FieldErrors::default());
            (id, payload)
        };

        self.update_pending.store(true, Ordering::SeqCst);
        tracing::info!(id, "Submitting appointment update");
        match self.store.update(id, &payload).await {
            Ok(_) => {
                {
                    let mut ui = self.ui();
                    ui.notifications.push_success(UPDATED_MESSAGE);
                    ui.notifications.clear_action_error();
                    ui.overlay.close();
                }
                self.refresh().await;
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Appointment update failed");
                let message = e.user_message();
                let mut ui = self.ui();
                if !ui.overlay.set_submit_error(message.clone()) {
                    // Overlay already gone: the stale failure lands in the
                    // page slot instead.
                    ui.notifications.set_action_error(message);
                }
            }
        }
        self.update_pending.store(false, Ordering::SeqCst);
    }

    /// Confirm the cancel overlay.
    pub async fn confirm_cancel(&self) {
        if self.cancel_pending.load(Ordering::SeqCst) {
            return;
        }

        let id = {
            let mut ui = self.ui();
            ui.overlay.clear_submit_error();
            match ui.overlay.current() {
                Overlay::ConfirmingCancel { appointment, .. } => appointment.id,
                _ => return,
            }
        };

        self.cancel_pending.store(true, Ordering::SeqCst);
        tracing::info!(id, "Confirming appointment cancellation");
        match self.store.cancel(id).await {
            Ok(_) => {
                {
                    let mut ui = self.ui();
                    ui.notifications.push_success(CANCELLED_MESSAGE);
                    ui.notifications.clear_action_error();
                    ui.overlay.close();
                }
                self.refresh().await;
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Appointment cancellation failed");
                let message = e.user_message();
                let mut ui = self.ui();
                if !ui.overlay.set_submit_error(message.clone()) {
                    ui.notifications.set_action_error(message);
                }
            }
        }
        self.cancel_pending.store(false, Ordering::SeqCst);
    }

    /// One-step "Mark Completed" from the row — no confirmation overlay,
    /// independent of whatever overlay is open.
    pub async fn mark_completed(&self, id: i64) {
        {
            let mut ui = self.ui();
            ui.notifications.clear_action_error();
            let Some(appointment) = find(&ui.collection, id) else {
                return;
            };
            if !appointment.status.can_complete() {
                tracing::debug!(id, status = %appointment.status, "Complete not permitted");
                return;
            }
        }

        tracing::info!(id, "Marking appointment completed");
        match self.store.complete(id).await {
            Ok(_) => {
                self.ui().notifications.push_success(COMPLETED_MESSAGE);
                self.refresh().await;
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Mark completed failed");
                self.ui().notifications.set_action_error(e.user_message());
            }
        }
    }
}

fn find(collection: &[Appointment], id: i64) -> Option<Appointment> {
    collection.iter().find(|a| a.id == id).cloned()
}
