//! # TUI Components
//!
//! Presentational pieces the dispatcher composes into a screen:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ MenuBar                                                  │  1 line
//! ├───────────────────────────────┬──────────────────────────┤
//! │ NodePanel                     │ WalletPanel              │  summary header
//! ├───────────────────────────────┴──────────────────────────┤  (optional)
//! │ GridPanel                                                │
//! │                    ┌ FormPanel ┐                         │  rest
//! │                    └───────────┘                         │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Components hold borrowed props and no state of their own; the grids and
//! forms they draw are owned by the views. Each file carries its own tests,
//! rendered against a `TestBackend`.

pub mod form_panel;
pub mod grid_panel;
pub mod menu_bar;
pub mod summary;

pub use form_panel::FormPanel;
pub use grid_panel::GridPanel;
pub use menu_bar::MenuBar;
