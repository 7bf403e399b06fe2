use anyhow::{ensure, Result};

use rmodbus::client::ModbusRequest;

/// Build a frame to write a single holding register (function 0x06)
pub fn generate_pull_set_holding_request(
    id: u8,
    address: u16,
    value: u16,
) -> Result<(ModbusRequest, Vec<u8>)> {
    let mut request = ModbusRequest::new(id, rmodbus::ModbusProto::Rtu);
    let mut raw = Vec::with_capacity(8);
    request.generate_set_holding(address, value, &mut raw)?;
    Ok((request, raw))
}

/// Validate the echo a slave sends back after a single register write.
///
/// Exception replies are reported by `parse_ok` before the length check.
pub fn parse_pull_set_holding(request: &mut ModbusRequest, response: &[u8]) -> Result<()> {
    ensure!(
        response.len() >= super::EXCEPTION_RESPONSE_LEN,
        "Response too short (len={})",
        response.len()
    );
    request.parse_ok(response)?;
    ensure!(
        response.len() == super::SET_HOLDING_RESPONSE_LEN,
        "Unexpected write echo length {}",
        response.len()
    );
    Ok(())
}
