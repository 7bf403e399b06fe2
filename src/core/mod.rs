//! UI-independent drive control: connection ownership, command sequences,
//! polling timers and the panel state they update.

pub mod commands;
pub mod connection;
pub mod panel;
pub mod schedule;

pub use connection::{Connection, ConnectionManager};
pub use panel::{Dialog, Panel, StatusLine, Tone, NO_PORTS_PLACEHOLDER};
pub use schedule::{Schedule, Timer, TimerKind, FEEDBACK_POLL_INTERVAL, KEEP_ALIVE_INTERVAL};
