//! Mind-Blown Diagnostic: a branching questionnaire that grades how thoroughly a surprise
//! landed, from "Not Blown" to "Existence-Level Blown".
//!
//! The [`diagnostic`] module holds the pure decision-tree engine together with the session
//! wizard, storage seam and HTTP router built on top of it. The remaining modules carry the
//! configuration, error and logging plumbing shared with the service binary.

pub mod config;
pub mod diagnostic;
pub mod error;
pub mod telemetry;
