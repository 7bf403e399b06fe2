//! Register write sequences for the four operator commands.
//!
//! Every write of a sequence is attempted even when an earlier one fails.
//! Failures are logged per write and summed up in the returned error.

use anyhow::{bail, Result};

use crate::{
    api::RegisterLink,
    protocol::atv320::{
        ControlCommand, Direction, CONTROL_WORD_ADDRESS, SPEED_REFERENCE_ADDRESS,
    },
};

/// Parse the keypad buffer into a speed reference.
pub fn parse_setpoint(text: &str) -> Option<u16> {
    text.trim().parse::<u16>().ok()
}

/// Write `(address, value)` pairs in order, continuing past failures.
fn write_sequence(link: &mut dyn RegisterLink, writes: &[(u16, u16)]) -> Result<()> {
    let mut failed = 0;
    for &(address, value) in writes {
        if let Err(err) = link.write_register(address, value) {
            log::error!("Writing {value} to register {address} failed: {err:#}");
            failed += 1;
        }
    }
    if failed > 0 {
        bail!("{failed} of {} writes failed", writes.len());
    }
    Ok(())
}

fn control(command: ControlCommand) -> (u16, u16) {
    (CONTROL_WORD_ADDRESS, command.code())
}

/// Speed reference, then ready, then the direction code.
pub fn run(link: &mut dyn RegisterLink, direction: Direction, setpoint: u16) -> Result<()> {
    write_sequence(
        link,
        &[
            (SPEED_REFERENCE_ADDRESS, setpoint),
            control(ControlCommand::Ready),
            control(direction.command()),
        ],
    )
}

pub fn stop(link: &mut dyn RegisterLink) -> Result<()> {
    write_sequence(link, &[control(ControlCommand::Stop)])
}

/// Stop first; the drive only accepts a fault reset while not running.
pub fn reset_fault(link: &mut dyn RegisterLink) -> Result<()> {
    write_sequence(
        link,
        &[control(ControlCommand::Stop), control(ControlCommand::ResetFault)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SimulatedDrive;

    #[test]
    fn setpoint_parsing() {
        assert_eq!(parse_setpoint("150"), Some(150));
        assert_eq!(parse_setpoint(" 1500 "), Some(1500));
        assert_eq!(parse_setpoint("0"), Some(0));
        assert_eq!(parse_setpoint(""), None);
        assert_eq!(parse_setpoint("15a"), None);
        assert_eq!(parse_setpoint("-5"), None);
        assert_eq!(parse_setpoint("70000"), None);
    }

    #[test]
    fn run_writes_reference_ready_direction() -> Result<()> {
        let mut drive = SimulatedDrive::new();
        run(&mut drive, Direction::Reverse, 900)?;
        assert_eq!(
            drive.writes(),
            vec![
                (SPEED_REFERENCE_ADDRESS, 900),
                (CONTROL_WORD_ADDRESS, 1),
                (CONTROL_WORD_ADDRESS, 5)
            ]
        );
        Ok(())
    }

    #[test]
    fn run_attempts_every_write_when_writes_fail() {
        let mut drive = SimulatedDrive::new();
        drive.set_fail_writes(true);
        let err = run(&mut drive, Direction::Forward, 150).unwrap_err();
        assert_eq!(err.to_string(), "3 of 3 writes failed");
        assert_eq!(
            drive.writes(),
            vec![
                (SPEED_REFERENCE_ADDRESS, 150),
                (CONTROL_WORD_ADDRESS, 1),
                (CONTROL_WORD_ADDRESS, 3)
            ]
        );
    }

    #[test]
    fn reset_attempts_both_writes_when_writes_fail() {
        let mut drive = SimulatedDrive::new();
        drive.set_fail_writes(true);
        assert!(reset_fault(&mut drive).is_err());
        assert_eq!(
            drive.writes(),
            vec![(CONTROL_WORD_ADDRESS, 0), (CONTROL_WORD_ADDRESS, 8)]
        );
    }

    #[test]
    fn reset_writes_stop_then_reset() -> Result<()> {
        let mut drive = SimulatedDrive::new();
        reset_fault(&mut drive)?;
        assert_eq!(
            drive.writes(),
            vec![(CONTROL_WORD_ADDRESS, 0), (CONTROL_WORD_ADDRESS, 8)]
        );
        Ok(())
    }
}
