//! The diagnostic questionnaire: answer model, classifier, routing, pruning and progress
//! estimation, plus the session wizard and HTTP surface layered on top.
//!
//! The engine functions ([`classify`], [`next_question`], [`prune_downstream`],
//! [`worst_case_remaining`]) are pure and total over the closed answer domain.

pub mod answers;
pub mod catalog;
pub mod classifier;
pub mod flow;
pub mod progress;
pub mod pruning;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use answers::{AnswerSheet, AnswerValue, Choice, ParseAnswerError, QuestionKey, Reaction};
pub use catalog::{bonus_prompt, prompt, AnswerOption, QuestionPrompt};
pub use classifier::{classify, BlownLevel, Classification, INCOMPLETE_LABEL};
pub use flow::{answered_path, frontier, next_question, Next};
pub use progress::{worst_case_remaining, ProgressSnapshot};
pub use pruning::prune_downstream;
pub use report::{legend, share_text, LegendEntry, ResultView};
pub use repository::{SessionId, SessionRecord, SessionRecordView, SessionStore, StoreError};
pub use router::{diagnostic_router, evaluate, EvaluateRequest, EvaluateResponse};
pub use service::{DiagnosticService, DiagnosticServiceError};
pub use session::{DiagnosticSession, SessionError, SessionView, Stage};
