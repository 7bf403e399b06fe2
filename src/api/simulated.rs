use anyhow::{bail, Result};
use parking_lot::Mutex;
use std::{collections::BTreeMap, sync::Arc};

use super::link::{LinkOpener, RegisterLink};
use crate::protocol::atv320::{
    raw_from_speed, ControlCommand, CONTROL_WORD_ADDRESS, SPEED_FEEDBACK_ADDRESS,
    SPEED_REFERENCE_ADDRESS,
};

/// One register access seen by a [`SimulatedDrive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOp {
    Write { address: u16, value: u16 },
    Read { address: u16 },
}

#[derive(Debug, Default)]
struct DriveState {
    registers: BTreeMap<u16, u16>,
    journal: Vec<RegisterOp>,
    fail_reads: bool,
    fail_writes: bool,
    closed: bool,
}

impl DriveState {
    /// Mirror what the drive does with a control word: feedback follows the
    /// speed reference in the commanded direction.
    fn apply_control_word(&mut self, value: u16) {
        let reference = self
            .registers
            .get(&SPEED_REFERENCE_ADDRESS)
            .copied()
            .unwrap_or_default();
        let reference = i16::try_from(reference).unwrap_or(i16::MAX);
        let feedback = match ControlCommand::try_from(value) {
            Ok(ControlCommand::Forward) => Some(reference),
            Ok(ControlCommand::Reverse) => Some(reference.saturating_neg()),
            Ok(ControlCommand::Stop) | Ok(ControlCommand::ResetFault) => Some(0),
            Ok(ControlCommand::Ready) | Err(_) => None,
        };
        if let Some(speed) = feedback {
            self.registers
                .insert(SPEED_FEEDBACK_ADDRESS, raw_from_speed(speed));
        }
    }
}

/// In-memory ATV320 stand-in.
///
/// Clones share the same register file and journal, so a test can keep one
/// handle while the panel owns another.
#[derive(Debug, Clone, Default)]
pub struct SimulatedDrive {
    state: Arc<Mutex<DriveState>>,
}

impl SimulatedDrive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every access in order.
    pub fn journal(&self) -> Vec<RegisterOp> {
        self.state.lock().journal.clone()
    }

    /// Only the writes, as `(address, value)` pairs.
    pub fn writes(&self) -> Vec<(u16, u16)> {
        self.state
            .lock()
            .journal
            .iter()
            .filter_map(|op| match *op {
                RegisterOp::Write { address, value } => Some((address, value)),
                RegisterOp::Read { .. } => None,
            })
            .collect()
    }

    /// Addresses read so far.
    pub fn reads(&self) -> Vec<u16> {
        self.state
            .lock()
            .journal
            .iter()
            .filter_map(|op| match *op {
                RegisterOp::Read { address } => Some(address),
                RegisterOp::Write { .. } => None,
            })
            .collect()
    }

    pub fn clear_journal(&self) {
        self.state.lock().journal.clear();
    }

    pub fn register(&self, address: u16) -> Option<u16> {
        self.state.lock().registers.get(&address).copied()
    }

    pub fn set_register(&self, address: u16, value: u16) {
        self.state.lock().registers.insert(address, value);
    }

    /// Make every subsequent read fail (the attempt is still journaled).
    pub fn set_fail_reads(&self, fail: bool) {
        self.state.lock().fail_reads = fail;
    }

    /// Make every subsequent write fail (the attempt is still journaled).
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.lock().fail_writes = fail;
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

impl RegisterLink for SimulatedDrive {
    fn write_register(&mut self, address: u16, value: u16) -> Result<()> {
        let mut state = self.state.lock();
        state.journal.push(RegisterOp::Write { address, value });
        if state.closed {
            bail!("Simulated link is closed");
        }
        if state.fail_writes {
            bail!("Simulated write failure at register {address}");
        }
        state.registers.insert(address, value);
        if address == CONTROL_WORD_ADDRESS {
            state.apply_control_word(value);
        }
        Ok(())
    }

    fn read_holding_register(&mut self, address: u16) -> Result<u16> {
        let mut state = self.state.lock();
        state.journal.push(RegisterOp::Read { address });
        if state.closed {
            bail!("Simulated link is closed");
        }
        if state.fail_reads {
            bail!("Simulated read timeout at register {address}");
        }
        Ok(state.registers.get(&address).copied().unwrap_or_default())
    }

    fn close(&mut self) {
        self.state.lock().closed = true;
    }
}

/// Hands out links to one shared simulated drive, whatever the port name.
#[derive(Debug, Clone, Default)]
pub struct SimulatedOpener {
    drive: SimulatedDrive,
}

impl SimulatedOpener {
    pub fn new(drive: SimulatedDrive) -> Self {
        Self { drive }
    }

    pub fn drive(&self) -> &SimulatedDrive {
        &self.drive
    }
}

impl LinkOpener for SimulatedOpener {
    fn open(&self, port_name: &str) -> Result<Box<dyn RegisterLink>> {
        log::info!("Attaching simulated drive to {port_name}");
        self.drive.state.lock().closed = false;
        Ok(Box::new(self.drive.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::atv320::speed_from_raw;

    #[test]
    fn feedback_follows_direction() -> Result<()> {
        let mut drive = SimulatedDrive::new();
        drive.write_register(SPEED_REFERENCE_ADDRESS, 1200)?;
        drive.write_register(CONTROL_WORD_ADDRESS, ControlCommand::Ready.code())?;
        assert_eq!(drive.read_holding_register(SPEED_FEEDBACK_ADDRESS)?, 0);

        drive.write_register(CONTROL_WORD_ADDRESS, ControlCommand::Reverse.code())?;
        let raw = drive.read_holding_register(SPEED_FEEDBACK_ADDRESS)?;
        assert_eq!(speed_from_raw(raw), -1200);

        drive.write_register(CONTROL_WORD_ADDRESS, ControlCommand::Stop.code())?;
        assert_eq!(drive.read_holding_register(SPEED_FEEDBACK_ADDRESS)?, 0);
        Ok(())
    }

    #[test]
    fn clones_share_journal() -> Result<()> {
        let drive = SimulatedDrive::new();
        let mut link: Box<dyn RegisterLink> = Box::new(drive.clone());
        link.write_register(CONTROL_WORD_ADDRESS, 0)?;
        link.read_holding_register(CONTROL_WORD_ADDRESS)?;
        assert_eq!(
            drive.journal(),
            vec![
                RegisterOp::Write {
                    address: CONTROL_WORD_ADDRESS,
                    value: 0
                },
                RegisterOp::Read {
                    address: CONTROL_WORD_ADDRESS
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn injected_failures_are_journaled() {
        let mut drive = SimulatedDrive::new();
        drive.set_fail_reads(true);
        drive.set_fail_writes(true);
        assert!(drive.read_holding_register(SPEED_FEEDBACK_ADDRESS).is_err());
        assert!(drive.write_register(CONTROL_WORD_ADDRESS, 0).is_err());
        assert_eq!(drive.reads(), vec![SPEED_FEEDBACK_ADDRESS]);
        assert_eq!(drive.writes(), vec![(CONTROL_WORD_ADDRESS, 0)]);
        assert_eq!(drive.register(CONTROL_WORD_ADDRESS), None);
    }

    #[test]
    fn closed_link_refuses_access_until_reopened() -> Result<()> {
        let opener = SimulatedOpener::default();
        let mut link = opener.open("SIM0")?;
        link.close();
        assert!(opener.drive().is_closed());
        assert!(link.read_holding_register(CONTROL_WORD_ADDRESS).is_err());

        let mut link = opener.open("SIM0")?;
        assert_eq!(link.read_holding_register(CONTROL_WORD_ADDRESS)?, 0);
        Ok(())
    }
}
