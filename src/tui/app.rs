use chrono::{DateTime, Local};
use std::time::Instant;

use crate::{
    core::{Panel, NO_PORTS_PLACEHOLDER},
    protocol::tty::{available_ports_sorted, PortEntry},
    tui::input::Action,
};

/// Whether the event loop should keep going after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub ports: Vec<PortEntry>,
    pub selected: usize,
    pub panel: Panel,
    pub last_scan: Option<DateTime<Local>>,
    /// Line settings shown next to the port, e.g. "19200 8N1 id=1".
    pub link_label: String,
    scanner: fn() -> Vec<PortEntry>,
}

impl App {
    pub fn new(panel: Panel) -> Self {
        Self::with_scanner(panel, available_ports_sorted)
    }

    /// Create an App with a custom port source (useful for tests and simulation)
    pub fn with_scanner(panel: Panel, scanner: fn() -> Vec<PortEntry>) -> Self {
        let mut app = Self {
            ports: Vec::new(),
            selected: 0,
            panel,
            last_scan: None,
            link_label: String::new(),
            scanner,
        };
        app.rescan_ports();
        app
    }

    /// Re-scan available ports, keeping the selection on the same port if it survived.
    pub fn rescan_ports(&mut self) {
        let previous = self.selected_port_name().map(str::to_string);
        self.ports = (self.scanner)();
        self.selected = previous
            .and_then(|name| self.ports.iter().position(|p| p.port_name == name))
            .unwrap_or(0);
        self.last_scan = Some(Local::now());
        log::info!("Found {} serial port(s)", self.ports.len());
    }

    /// Move the selection to `port_name`, adding it if enumeration missed it.
    pub fn preselect(&mut self, port_name: &str) {
        match self.ports.iter().position(|p| p.port_name == port_name) {
            Some(idx) => self.selected = idx,
            None => {
                self.ports.push(PortEntry::named(port_name));
                self.selected = self.ports.len() - 1;
            }
        }
    }

    pub fn selected_port_name(&self) -> Option<&str> {
        self.ports.get(self.selected).map(|p| p.port_name.as_str())
    }

    /// Label for the selector header, mirroring an option menu's current value.
    pub fn selection_label(&self) -> &str {
        self.selected_port_name().unwrap_or(NO_PORTS_PLACEHOLDER)
    }

    pub fn next(&mut self) {
        if !self.ports.is_empty() {
            self.selected = (self.selected + 1) % self.ports.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.ports.is_empty() {
            if self.selected == 0 {
                self.selected = self.ports.len() - 1;
            } else {
                self.selected -= 1;
            }
        }
    }

    pub fn handle(&mut self, action: Action) -> Flow {
        match action {
            Action::Quit => return Flow::Quit,
            Action::MovePrev => self.prev(),
            Action::MoveNext => self.next(),
            Action::RescanPorts => self.rescan_ports(),
            Action::Connect => {
                let selected = self.selected_port_name().map(str::to_string);
                self.panel.connect(selected.as_deref());
            }
            Action::Disconnect => self.panel.disconnect(),
            Action::Run(direction) => self.panel.run(direction),
            Action::Stop => self.panel.stop(),
            Action::ResetFault => self.panel.reset_fault(),
            Action::Digit(c) => self.panel.push_digit(c),
            Action::Backspace => self.panel.backspace(),
            Action::ClearSetpoint => self.panel.clear_setpoint(),
            Action::DismissDialog => self.panel.dismiss_dialog(),
            Action::None => {}
        }
        Flow::Continue
    }

    pub fn tick(&mut self, now: Instant) {
        self.panel.tick(now);
    }
}
