mod frame;
mod pull_get_holdings;
mod pull_set_holding;

pub use frame::read_response_frame;
pub use pull_get_holdings::{generate_pull_get_holdings_request, parse_pull_get_holdings};
pub use pull_set_holding::{generate_pull_set_holding_request, parse_pull_set_holding};

/// addr + func + exception code + CRC
pub const EXCEPTION_RESPONSE_LEN: usize = 5;
/// A 0x06 reply echoes the request: addr + func + register + value + CRC
pub const SET_HOLDING_RESPONSE_LEN: usize = 8;

/// addr + func + byte count + payload + CRC
pub fn get_holdings_response_len(count: u16) -> usize {
    3 + count as usize * 2 + 2
}

/// Modbus RTU CRC16, returned in wire order when written with `to_le_bytes`.
#[cfg(test)]
pub(crate) fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &byte in data {
        crc ^= byte as u16;
        for _ in 0..8 {
            if crc & 0x0001 != 0 {
                crc = (crc >> 1) ^ 0xA001;
            } else {
                crc >>= 1;
            }
        }
    }
    crc
}

/// Append the CRC to a frame body.
#[cfg(test)]
pub(crate) fn with_crc(mut body: Vec<u8>) -> Vec<u8> {
    let crc = crc16(&body);
    body.extend_from_slice(&crc.to_le_bytes());
    body
}
