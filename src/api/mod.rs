pub mod link;
pub mod serial;
pub mod simulated;

pub use link::{LinkOpener, RegisterLink};
pub use serial::{open_serial_port, RtuLink, SerialLink, SerialOpener, Transport};
pub use simulated::{RegisterOp, SimulatedDrive, SimulatedOpener};
