use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use tracing::{debug, info};

use super::answers::{AnswerValue, Choice, QuestionKey};
use super::repository::{SessionId, SessionRecord, SessionStore, StoreError};
use super::session::{DiagnosticSession, SessionError, Stage};

/// Service wrapping the session store with the wizard operations.
pub struct DiagnosticService<S> {
    store: Arc<S>,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("session-{id:06}"))
}

impl<S> DiagnosticService<S>
where
    S: SessionStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Open a fresh session on the first question.
    pub fn start(&self) -> Result<SessionRecord, DiagnosticServiceError> {
        let record = SessionRecord::new(next_session_id(), Utc::now());
        let stored = self.store.insert(record)?;
        info!(session_id = %stored.session_id, "diagnostic session started");
        Ok(stored)
    }

    pub fn get(&self, session_id: &SessionId) -> Result<SessionRecord, DiagnosticServiceError> {
        let record = self
            .store
            .fetch(session_id)?
            .ok_or(StoreError::NotFound)?;
        Ok(record)
    }

    pub fn answer(
        &self,
        session_id: &SessionId,
        key: QuestionKey,
        value: AnswerValue,
    ) -> Result<SessionRecord, DiagnosticServiceError> {
        self.mutate(session_id, |session| {
            let next = session.answer(key, value)?;
            debug!(%key, %value, %next, "answer recorded");
            Ok(())
        })
    }

    pub fn answer_bonus(
        &self,
        session_id: &SessionId,
        value: Choice,
    ) -> Result<SessionRecord, DiagnosticServiceError> {
        self.mutate(session_id, |session| {
            let classification = session.answer_bonus(value)?;
            debug!(bonus = value.as_str(), label = %classification.label(), "bonus recorded");
            Ok(())
        })
    }

    pub fn back(&self, session_id: &SessionId) -> Result<SessionRecord, DiagnosticServiceError> {
        self.mutate(session_id, |session| {
            session.go_back();
            Ok(())
        })
    }

    pub fn reset(&self, session_id: &SessionId) -> Result<SessionRecord, DiagnosticServiceError> {
        self.mutate(session_id, |session| {
            session.reset();
            Ok(())
        })
    }

    /// Drop a session once the caller is done with it.
    pub fn finish(&self, session_id: &SessionId) -> Result<(), DiagnosticServiceError> {
        self.store.remove(session_id)?;
        info!(%session_id, "diagnostic session closed");
        Ok(())
    }

    fn mutate<F>(
        &self,
        session_id: &SessionId,
        mut apply: F,
    ) -> Result<SessionRecord, DiagnosticServiceError>
    where
        F: FnMut(&mut DiagnosticSession) -> Result<(), SessionError>,
    {
        let now = Utc::now();
        let record = self
            .store
            .modify(session_id, &mut |record: &mut SessionRecord| {
                apply(&mut record.session)?;
                record.updated_at = now;
                Ok(())
            })?;

        if record.session.stage() == Stage::Final {
            let classification = record.session.classification();
            info!(%session_id, label = %classification.label(), "diagnostic reached a result");
        }
        Ok(record)
    }
}

/// Error raised by the diagnostic service.
#[derive(Debug, thiserror::Error)]
pub enum DiagnosticServiceError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DiagnosticServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Session(SessionError::InvalidAnswer(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Session(_) => StatusCode::CONFLICT,
            Self::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            Self::Store(StoreError::Conflict) => StatusCode::CONFLICT,
            Self::Store(StoreError::Capacity(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Store(StoreError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
