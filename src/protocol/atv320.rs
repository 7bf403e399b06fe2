//! ATV320 register map and control-word command codes.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumIter};

/// Control word (CMD). Written with a [`ControlCommand`].
pub const CONTROL_WORD_ADDRESS: u16 = 8501;
/// Speed reference (LFRD) in RPM.
pub const SPEED_REFERENCE_ADDRESS: u16 = 8602;
/// Actual motor speed (RFRD) in RPM, signed.
pub const SPEED_FEEDBACK_ADDRESS: u16 = 8604;

/// Register read by the keep-alive pinger. Reading the control word has no side effect.
pub const KEEP_ALIVE_ADDRESS: u16 = CONTROL_WORD_ADDRESS;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive, Display, EnumIter,
)]
#[repr(u16)]
pub enum ControlCommand {
    Stop = 0x0000,
    Ready = 0x0001,
    Forward = 0x0003,
    Reverse = 0x0005,
    ResetFault = 0x0008,
}

impl ControlCommand {
    pub fn code(self) -> u16 {
        self.into()
    }
}

/// Direction of a run command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Direction {
    #[strum(to_string = "forward")]
    Forward,
    #[strum(to_string = "reverse")]
    Reverse,
}

impl Direction {
    pub fn command(self) -> ControlCommand {
        match self {
            Direction::Forward => ControlCommand::Forward,
            Direction::Reverse => ControlCommand::Reverse,
        }
    }
}

/// Reinterpret a raw feedback register as a signed speed (two's complement).
pub fn speed_from_raw(raw: u16) -> i32 {
    if raw > 0x7FFF {
        i32::from(raw) - 0x1_0000
    } else {
        i32::from(raw)
    }
}

/// Inverse of [`speed_from_raw`] for values in `i16` range.
pub(crate) fn raw_from_speed(speed: i16) -> u16 {
    speed as u16
}
