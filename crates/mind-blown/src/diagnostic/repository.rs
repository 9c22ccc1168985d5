use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::service::DiagnosticServiceError;
use super::session::{DiagnosticSession, SessionError, SessionView};

/// Identifier wrapper for quiz sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored session plus bookkeeping timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub session: DiagnosticSession,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(session_id: SessionId, now: DateTime<Utc>) -> Self {
        Self {
            session_id,
            session: DiagnosticSession::new(),
            started_at: now,
            updated_at: now,
        }
    }

    pub fn view(&self) -> SessionRecordView {
        SessionRecordView {
            session_id: self.session_id.clone(),
            started_at: self.started_at,
            updated_at: self.updated_at,
            session: self.session.view(),
        }
    }
}

/// API representation of a stored session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionRecordView {
    pub session_id: SessionId,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub session: SessionView,
}

/// Storage abstraction so the service can be exercised without a server.
pub trait SessionStore: Send + Sync {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, StoreError>;
    /// Run `apply` against the stored record while holding the store's lock. The record is
    /// written back only when `apply` succeeds, so concurrent edits cannot interleave.
    fn modify(
        &self,
        id: &SessionId,
        apply: &mut dyn FnMut(&mut SessionRecord) -> Result<(), SessionError>,
    ) -> Result<SessionRecord, DiagnosticServiceError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, StoreError>;
    fn remove(&self, id: &SessionId) -> Result<(), StoreError>;
    fn len(&self) -> Result<usize, StoreError>;

    fn is_empty(&self) -> Result<bool, StoreError> {
        self.len().map(|len| len == 0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session capacity of {0} reached")]
    Capacity(usize),
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
