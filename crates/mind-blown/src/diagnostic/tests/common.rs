use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::diagnostic::answers::{AnswerSheet, Choice, QuestionKey, Reaction};
use crate::diagnostic::repository::{SessionId, SessionRecord, SessionStore, StoreError};
use crate::diagnostic::service::{DiagnosticService, DiagnosticServiceError};
use crate::diagnostic::session::SessionError;
use crate::diagnostic::diagnostic_router;

pub(super) fn whoa_chain(q6: Choice) -> AnswerSheet {
    AnswerSheet::new()
        .with_expectation(Choice::Yes)
        .with_reaction(Reaction::Whoa)
        .with_awe_signs(Choice::Yes)
        .with_verification_urge(Choice::Yes)
        .with_function_hit(Choice::Yes)
        .with_worldview_wobble(q6)
}

pub(super) fn double_take(q1: Choice) -> AnswerSheet {
    AnswerSheet::new()
        .with_expectation(Choice::Yes)
        .with_reaction(Reaction::Double)
        .with_light_signs(q1)
}

/// Every sheet reachable by answering questions in order, including partial ones.
pub(super) fn reachable_sheets() -> Vec<AnswerSheet> {
    let mut sheets = vec![AnswerSheet::new()];
    let mut frontier = vec![(AnswerSheet::new(), QuestionKey::E)];

    while let Some((sheet, key)) = frontier.pop() {
        for option in crate::diagnostic::catalog::prompt(key).options {
            let mut next = sheet;
            next.record(key, option.value).expect("catalog options fit");
            sheets.push(next);
            if let crate::diagnostic::Next::Question(following) =
                crate::diagnostic::next_question(key, &next)
            {
                frontier.push((next, following));
            }
        }
    }

    let with_bonus: Vec<AnswerSheet> = sheets
        .iter()
        .flat_map(|sheet| {
            [Choice::Yes, Choice::No]
                .into_iter()
                .map(move |bonus| sheet.with_bonus(bonus))
        })
        .collect();
    sheets.extend(with_bonus);
    sheets
}

pub(super) fn build_service() -> (DiagnosticService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = DiagnosticService::new(store.clone());
    (service, store)
}

pub(super) fn router_with_service(service: DiagnosticService<MemoryStore>) -> axum::Router {
    diagnostic_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl SessionStore for MemoryStore {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard.contains_key(&record.session_id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn modify(
        &self,
        id: &SessionId,
        apply: &mut dyn FnMut(&mut SessionRecord) -> Result<(), SessionError>,
    ) -> Result<SessionRecord, DiagnosticServiceError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let stored = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        let mut draft = stored.clone();
        apply(&mut draft)?;
        *stored = draft.clone();
        Ok(draft)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.records.lock().expect("store mutex poisoned").len())
    }
}

pub(super) struct UnavailableStore;

impl SessionStore for UnavailableStore {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn modify(
        &self,
        _id: &SessionId,
        _apply: &mut dyn FnMut(&mut SessionRecord) -> Result<(), SessionError>,
    ) -> Result<SessionRecord, DiagnosticServiceError> {
        Err(StoreError::Unavailable("store offline".to_string()).into())
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn remove(&self, _id: &SessionId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn len(&self) -> Result<usize, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
