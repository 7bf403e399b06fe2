//! Operator-facing state: the connection, the status and feedback lines, the
//! setpoint buffer and any open dialog.
//!
//! Every handler runs on the UI thread. Errors the operator must acknowledge
//! become a [`Dialog`]; everything else is logged and swallowed.

use std::time::Instant;

use super::{
    commands,
    connection::ConnectionManager,
    schedule::{Schedule, TimerKind},
};
use crate::{
    api::LinkOpener,
    protocol::atv320::{speed_from_raw, Direction, KEEP_ALIVE_ADDRESS, SPEED_FEEDBACK_ADDRESS},
};

/// Placeholder shown by the selector when enumeration finds nothing.
pub const NO_PORTS_PLACEHOLDER: &str = "No Ports Available";

/// Color family of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Caution,
    Alert,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub tone: Tone,
}

impl StatusLine {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// A blocking message the operator has to dismiss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub title: String,
    pub message: String,
}

impl Dialog {
    fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    fn no_drive() -> Self {
        Self::new("Connection Error", "No drive connected.")
    }
}

pub struct Panel {
    connection: ConnectionManager,
    opener: Box<dyn LinkOpener>,
    schedule: Schedule,
    status: StatusLine,
    feedback_rpm: i32,
    setpoint: String,
    dialog: Option<Dialog>,
}

impl Panel {
    pub fn new(opener: Box<dyn LinkOpener>, now: Instant) -> Self {
        Self {
            connection: ConnectionManager::new(),
            opener,
            schedule: Schedule::start(now),
            status: StatusLine::new("Not Connected", Tone::Alert),
            feedback_rpm: 0,
            setpoint: String::new(),
            dialog: None,
        }
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn feedback_rpm(&self) -> i32 {
        self.feedback_rpm
    }

    pub fn feedback_text(&self) -> String {
        format!("Speed: {} RPM", self.feedback_rpm)
    }

    pub fn setpoint(&self) -> &str {
        &self.setpoint
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    pub fn dismiss_dialog(&mut self) {
        self.dialog = None;
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    pub fn port_name(&self) -> Option<&str> {
        self.connection.port_name()
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn set_status(&mut self, text: impl Into<String>, tone: Tone) {
        self.status = StatusLine::new(text, tone);
    }

    fn show_dialog(&mut self, dialog: Dialog) {
        log::warn!("{}: {}", dialog.title, dialog.message);
        self.dialog = Some(dialog);
    }

    /// Connect to the selected port. `None` means nothing is selected.
    pub fn connect(&mut self, selected: Option<&str>) {
        let port_name = match selected {
            Some(name) if !name.is_empty() && name != NO_PORTS_PLACEHOLDER => name,
            _ => {
                self.show_dialog(Dialog::new("Port Error", "No COM port selected"));
                return;
            }
        };

        let was_connected = self.connection.is_connected();
        match self.connection.connect(port_name, self.opener.as_ref()) {
            Ok(()) => {
                log::info!("Connected to drive on {port_name}");
                self.set_status(format!("Connected to {port_name}"), Tone::Good);
            }
            Err(err) => {
                log::error!("{err:#}");
                if was_connected {
                    self.set_status("Not Connected", Tone::Alert);
                }
                self.show_dialog(Dialog::new(
                    "Connection Error",
                    format!("Failed to connect to {port_name}"),
                ));
            }
        }
    }

    /// Stop the drive (if connected) and close the connection.
    pub fn disconnect(&mut self) {
        if !self.connection.is_connected() {
            return;
        }
        self.stop();
        self.connection.close();
        self.set_status("Not Connected", Tone::Alert);
    }

    /// Window-close path: force a stop, then release the port.
    pub fn shutdown(&mut self) {
        if self.connection.is_connected() {
            log::info!("Shutting down: stopping drive before closing the link");
            self.disconnect();
        }
    }

    pub fn run(&mut self, direction: Direction) {
        if !self.connection.is_connected() {
            self.show_dialog(Dialog::no_drive());
            return;
        }
        let Some(setpoint) = commands::parse_setpoint(&self.setpoint) else {
            self.show_dialog(Dialog::new(
                "Invalid Input",
                "Please enter a valid speed value.",
            ));
            return;
        };
        let Some(link) = self.connection.link() else {
            return;
        };

        // Failed writes are logged; the operator sees the same status either way.
        if let Err(err) = commands::run(link.as_mut(), direction, setpoint) {
            log::error!("Run {direction}: {err:#}");
        }
        log::info!("Running {direction} at {setpoint} RPM");
        let tone = match direction {
            Direction::Forward => Tone::Good,
            Direction::Reverse => Tone::Caution,
        };
        self.set_status(format!("Running {direction}"), tone);
    }

    pub fn stop(&mut self) {
        let Some(link) = self.connection.link() else {
            self.set_status("No drive connected", Tone::Alert);
            return;
        };
        if let Err(err) = commands::stop(link.as_mut()) {
            log::error!("Stop: {err:#}");
        }
        self.set_status("Drive stopped", Tone::Alert);
    }

    pub fn reset_fault(&mut self) {
        let Some(link) = self.connection.link() else {
            self.show_dialog(Dialog::no_drive());
            return;
        };
        if let Err(err) = commands::reset_fault(link.as_mut()) {
            log::error!("Fault reset: {err:#}");
        }
        log::info!("Fault reset sent");
        self.set_status("Fault reset", Tone::Info);
    }

    pub fn push_digit(&mut self, digit: char) {
        if digit.is_ascii_digit() {
            self.setpoint.push(digit);
        }
    }

    pub fn backspace(&mut self) {
        self.setpoint.pop();
    }

    pub fn clear_setpoint(&mut self) {
        self.setpoint.clear();
    }

    /// Read the speed feedback register; keep the previous value on error.
    pub fn poll_feedback(&mut self) {
        let Some(link) = self.connection.link() else {
            return;
        };
        match link.read_holding_register(SPEED_FEEDBACK_ADDRESS) {
            Ok(raw) => {
                self.feedback_rpm = speed_from_raw(raw);
                log::debug!("Speed: {} RPM", self.feedback_rpm);
            }
            Err(err) => log::warn!("Error reading speed feedback: {err:#}"),
        }
    }

    /// Harmless read so the drive does not drop the idle link.
    pub fn keep_alive(&mut self) {
        let Some(link) = self.connection.link() else {
            return;
        };
        match link.read_holding_register(KEEP_ALIVE_ADDRESS) {
            Ok(_) => log::debug!("Keep-alive signal sent"),
            Err(err) => log::warn!("Error during keep-alive: {err:#}"),
        }
    }

    /// Run every timer due at `now`. Returns what fired.
    pub fn tick(&mut self, now: Instant) -> Vec<TimerKind> {
        let due = self.schedule.take_due(now);
        for kind in &due {
            match kind {
                TimerKind::FeedbackPoll => self.poll_feedback(),
                TimerKind::KeepAlive => self.keep_alive(),
            }
        }
        due
    }
}

impl Drop for Panel {
    fn drop(&mut self) {
        self.shutdown();
    }
}
