//! # Core Application Logic
//!
//! Everything here is independent of the terminal. The grid and form engines
//! turn records into text and keystrokes into edits; the scheduler and the
//! enrichment cache produce [`action::Action`]s for the main loop.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │          CORE           │
//!                    │                         │
//!                    │  • record  (accessors)  │
//!                    │  • grid    (tables)     │
//!                    │  • form    (pop-ups)    │
//!                    │  • scheduler + cache    │
//!                    └───────────┬─────────────┘
//!                                │ Action
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │                          │    LND     │
//!     │  Adapter   │ ─── commands ──────────► │  gateway   │
//!     │ (ratatui)  │                          │  (lncli)   │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`record`]: named accessors over record types
//! - [`grid`]: the virtualized table engine
//! - [`form`]: the form engine and its field editors
//! - [`scheduler`]: periodic refresh pipelines
//! - [`enrichment`]: the per-key label cache
//! - [`action`]: messages from background tasks to the main loop
//! - [`config`]: file, environment and CLI configuration

pub mod action;
pub mod config;
pub mod context;
pub mod enrichment;
pub mod form;
pub mod grid;
pub mod key;
pub mod logbook;
pub mod record;
pub mod scheduler;
