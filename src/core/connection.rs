use anyhow::{Context, Result};

use crate::api::{LinkOpener, RegisterLink};

/// An open session to one drive.
pub struct Connection {
    port_name: String,
    link: Box<dyn RegisterLink>,
}

impl Connection {
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

/// Owns at most one [`Connection`].
#[derive(Default)]
pub struct ConnectionManager {
    current: Option<Connection>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `port_name`, closing any previous connection first.
    ///
    /// On failure the manager is left disconnected.
    pub fn connect(&mut self, port_name: &str, opener: &dyn LinkOpener) -> Result<()> {
        self.close();
        let link = opener
            .open(port_name)
            .with_context(|| format!("Failed to connect to {port_name}"))?;
        self.current = Some(Connection {
            port_name: port_name.to_string(),
            link,
        });
        Ok(())
    }

    /// Close the current connection, returning the port it was on.
    pub fn close(&mut self) -> Option<String> {
        let mut connection = self.current.take()?;
        connection.link.close();
        log::info!("Disconnected from {}", connection.port_name);
        Some(connection.port_name)
    }

    pub fn is_connected(&self) -> bool {
        self.current.is_some()
    }

    pub fn port_name(&self) -> Option<&str> {
        self.current.as_ref().map(Connection::port_name)
    }

    /// The open link, if any. Callers must not write through anything else.
    pub fn link(&mut self) -> Option<&mut Box<dyn RegisterLink>> {
        self.current.as_mut().map(|connection| &mut connection.link)
    }
}
