//! capa-core library.
//!
//! Case model, root-cause derivation, and report assembly for corrective-action
//! (CAPA) cases.
//!
//! # Layout
//!
//! - [`model`]: case details, cause taxonomy, Fishbone and Five-Why analyses,
//!   action plan.
//! - [`session`]: the single live case and its typed command surface.
//! - [`registry`]: derived root-cause lists, recomputed on every call.
//! - [`report`]: immutable snapshots, paginated layout, tabular export.
//! - [`assist`]: contract with an external text assistant.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums in the model; `anyhow::Result` at I/O
//!   boundaries (config, case files).
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod assist;
pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod registry;
pub mod report;
pub mod session;
pub mod text;

pub use session::CaseSession;
