//! ATV320 panel: a terminal control panel for Schneider ATV320 drives over
//! Modbus RTU.
//!
//! The crate is split the usual way: `protocol` holds the register map and
//! frame codec, `api` the register links (serial and simulated), `core` the
//! UI-independent panel state and timers, and `tui` the ratatui front end.

pub mod api;
#[doc(hidden)]
pub mod boot;
#[doc(hidden)]
pub mod cli;
pub mod config;
pub mod core;
pub mod protocol;
#[doc(hidden)]
pub mod tui;
