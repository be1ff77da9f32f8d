//! Terminal UI layer for brandboard.
//!
//! Provides themes, the gate / data-entry / dashboard views, chart
//! components, and the main application event loop built on top of
//! [`ratatui`].

pub mod app;
pub mod components;
pub mod dashboard_view;
pub mod entry_view;
pub mod gate_view;
pub mod themes;

pub use board_core as core;
