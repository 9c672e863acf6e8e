//! # WSJF Core Library
//!
//! Scores and ranks initiatives with the Weighted Shortest Job First formula
//! and exports the ranked list as a PDF report. The CLI is a thin layer over
//! this crate.
//!
//! ## Architecture
//!
//! - **Scoring**: pure Cost of Delay and WSJF functions
//! - **Store**: in-memory initiatives, always ordered by descending WSJF
//! - **Backlog**: owns the current weights; every weight change triggers
//!   exactly one recompute of the store
//! - **Report**: snapshot-based PDF export with a plain-text fallback layout
//! - **Config**: TOML preferences (default weights, report options)
//!
//! ## Key Components
//!
//! - [`Backlog`]: entry point for add / delete / weight-change events
//! - [`InitiativeStore`]: ordered collection and recompute protocol
//! - [`ReportExporter`]: PDF rendering
//! - [`Config`]: application configuration management

pub mod backlog;
pub mod config;
pub mod error;
pub mod events;
pub mod initiative;
pub mod input;
pub mod report;
pub mod scoring;
pub mod store;

pub use backlog::Backlog;
pub use config::{Config, ReportConfig};
pub use error::{ConfigError, CoreError, ExportError, InputError, ValidationError};
pub use events::BacklogEvent;
pub use initiative::{Initiative, InitiativeDraft};
pub use input::BatchInput;
pub use report::{ExportOutcome, ReportExporter, ReportLayout, ReportOptions, ReportSnapshot};
pub use scoring::{cost_of_delay, wsjf, ScoreSet, WeightField, WeightSet};
pub use store::InitiativeStore;
