//! Client-side owner of the canonical appointment collection.
//!
//! `AppointmentStore` is the only writer of the cached collection: reads are
//! fetch-through, every successful mutation invalidates the collection (and
//! the per-id entry it touched) so the next read refetches the authoritative
//! state. No optimistic local mutation — callers wait for the server copy.
//! Lock guards are never held across an await point.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::api::{ApiClient, ApiError, AppointmentCreate, AppointmentUpdate, GENERIC_SUBMIT_ERROR};
use crate::models::Appointment;

pub struct AppointmentStore {
    client: ApiClient,
    cache: RwLock<CacheState>,
}

#[derive(Default)]
struct CacheState {
    collection: Option<Vec<Appointment>>,
    by_id: HashMap<i64, Appointment>,
    /// Bumped on every cache write; memoized projections key off it.
    generation: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Internal lock error")]
    LockPoisoned,
}

impl StoreError {
    /// The message a banner or inline error area should display.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Api(e) => e.user_message(),
            StoreError::LockPoisoned => GENERIC_SUBMIT_ERROR.to_string(),
        }
    }
}

impl AppointmentStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            cache: RwLock::new(CacheState::default()),
        }
    }

    /// Store against the environment-configured clinic API.
    pub fn from_env() -> Self {
        Self::new(ApiClient::from_env())
    }

    // ── Reads (fetch-through) ───────────────────────────────

    /// The appointment collection, from cache when valid.
    pub async fn list(&self) -> Result<Vec<Appointment>, StoreError> {
        let cached = {
            let cache = self.cache.read().map_err(|_| StoreError::LockPoisoned)?;
            cache.collection.clone()
        };
        if let Some(collection) = cached {
            tracing::debug!(count = collection.len(), "Appointment list served from cache");
            return Ok(collection);
        }

        let fetched = self.client.list_appointments().await?;
        {
            let mut cache = self.cache.write().map_err(|_| StoreError::LockPoisoned)?;
            for appointment in &fetched {
                cache.by_id.insert(appointment.id, appointment.clone());
            }
            cache.collection = Some(fetched.clone());
            cache.generation += 1;
        }
        tracing::debug!(count = fetched.len(), "Appointment list refetched");
        Ok(fetched)
    }

    /// A single appointment, from cache when valid.
    pub async fn get(&self, id: i64) -> Result<Appointment, StoreError> {
        let cached = {
            let cache = self.cache.read().map_err(|_| StoreError::LockPoisoned)?;
            cache.by_id.get(&id).cloned()
        };
        if let Some(appointment) = cached {
            return Ok(appointment);
        }

        let fetched = self.client.get_appointment(id).await?;
        {
            let mut cache = self.cache.write().map_err(|_| StoreError::LockPoisoned)?;
            cache.by_id.insert(id, fetched.clone());
            cache.generation += 1;
        }
        Ok(fetched)
    }

    // ── Mutations (invalidate on success) ───────────────────

    pub async fn create(&self, payload: &AppointmentCreate) -> Result<Appointment, StoreError> {
        let created = self.client.create_appointment(payload).await?;
        tracing::info!(id = created.id, "Appointment created");
        self.invalidate(created.id)?;
        Ok(created)
    }

    pub async fn update(
        &self,
        id: i64,
        payload: &AppointmentUpdate,
    ) -> Result<Appointment, StoreError> {
        let updated = self.client.update_appointment(id, payload).await?;
        tracing::info!(id, "Appointment updated");
        self.invalidate(id)?;
        Ok(updated)
    }

    pub async fn cancel(&self, id: i64) -> Result<Appointment, StoreError> {
        let cancelled = self.client.cancel_appointment(id).await?;
        tracing::info!(id, "Appointment cancelled");
        self.invalidate(id)?;
        Ok(cancelled)
    }

    pub async fn complete(&self, id: i64) -> Result<Appointment, StoreError> {
        let completed = self.client.complete_appointment(id).await?;
        tracing::info!(id, "Appointment marked completed");
        self.invalidate(id)?;
        Ok(completed)
    }

    // ── Cache control ───────────────────────────────────────

    /// Drop the cached collection and the per-id entry, forcing the next
    /// read to refetch.
    pub fn invalidate(&self, id: i64) -> Result<(), StoreError> {
        let mut cache = self.cache.write().map_err(|_| StoreError::LockPoisoned)?;
        cache.collection = None;
        cache.by_id.remove(&id);
        cache.generation += 1;
        Ok(())
    }

    /// Drop everything cached.
    pub fn invalidate_all(&self) -> Result<(), StoreError> {
        let mut cache = self.cache.write().map_err(|_| StoreError::LockPoisoned)?;
        cache.collection = None;
        cache.by_id.clear();
        cache.generation += 1;
        Ok(())
    }

    /// Monotonic cache version, for memoized consumers.
    pub fn generation(&self) -> u64 {
        self.cache.read().map(|c| c.generation).unwrap_or(0)
    }
}
