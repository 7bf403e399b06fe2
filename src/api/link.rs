use anyhow::Result;

/// Register-level access to a drive.
///
/// The panel only ever needs single-register writes and single-register
/// reads; framing and transport live behind this trait.
pub trait RegisterLink: Send {
    /// Write one holding register (function 0x06).
    fn write_register(&mut self, address: u16, value: u16) -> Result<()>;

    /// Read one holding register (function 0x03).
    fn read_holding_register(&mut self, address: u16) -> Result<u16>;

    /// Release the underlying transport. Called once before the link is dropped.
    fn close(&mut self) {}
}

/// Opens a link for a port name.
pub trait LinkOpener {
    fn open(&self, port_name: &str) -> Result<Box<dyn RegisterLink>>;
}

impl<F> LinkOpener for F
where
    F: Fn(&str) -> Result<Box<dyn RegisterLink>>,
{
    fn open(&self, port_name: &str) -> Result<Box<dyn RegisterLink>> {
        self(port_name)
    }
}
