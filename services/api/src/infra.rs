use chrono::{Duration, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use mind_blown::config::SessionConfig;
use mind_blown::diagnostic::{
    DiagnosticServiceError, SessionError, SessionId, SessionRecord, SessionStore, StoreError,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local session storage. Sessions vanish on restart.
#[derive(Clone)]
pub(crate) struct InMemorySessionStore {
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
    limits: SessionConfig,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl InMemorySessionStore {
    pub(crate) fn new(limits: SessionConfig) -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            limits,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, SessionRecord>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("session store mutex poisoned".to_string()))
    }

    fn evict_idle(&self, records: &mut HashMap<SessionId, SessionRecord>) -> usize {
        let cutoff = Utc::now() - Duration::minutes(i64::from(self.limits.idle_minutes));
        let before = records.len();
        records.retain(|_, record| record.updated_at > cutoff);
        before - records.len()
    }
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, StoreError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&record.session_id) {
            return Err(StoreError::Conflict);
        }

        if guard.len() >= self.limits.max_sessions {
            let evicted = self.evict_idle(&mut guard);
            debug!(evicted, "evicted idle diagnostic sessions");
            if guard.len() >= self.limits.max_sessions {
                return Err(StoreError::Capacity(self.limits.max_sessions));
            }
        }

        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn modify(
        &self,
        id: &SessionId,
        apply: &mut dyn FnMut(&mut SessionRecord) -> Result<(), SessionError>,
    ) -> Result<SessionRecord, DiagnosticServiceError> {
        let mut guard = self.lock()?;
        let stored = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        let mut draft = stored.clone();
        apply(&mut draft)?;
        *stored = draft.clone();
        Ok(draft)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, StoreError> {
        let guard = self.lock()?;
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        guard.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }
}
