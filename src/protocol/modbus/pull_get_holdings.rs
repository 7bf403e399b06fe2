use anyhow::{ensure, Result};

use rmodbus::client::ModbusRequest;

pub fn generate_pull_get_holdings_request(
    id: u8,
    start_address: u16,
    count: u16,
) -> Result<(ModbusRequest, Vec<u8>)> {
    let mut request = ModbusRequest::new(id, rmodbus::ModbusProto::Rtu);
    let mut raw = Vec::with_capacity(8);
    request.generate_get_holdings(start_address, count, &mut raw)?;
    Ok((request, raw))
}

pub fn parse_pull_get_holdings(
    request: &mut ModbusRequest,
    response: &[u8],
    count: u16,
) -> Result<Vec<u16>> {
    ensure!(
        response.len() >= 5,
        "Response too short (len={}, need >=5)",
        response.len()
    );
    request.parse_ok(response)?;

    let byte_count = response[2] as usize;
    ensure!(
        byte_count == count as usize * 2 && response.len() == byte_count + 5,
        "Invalid holding register payload ({} bytes for {} registers)",
        byte_count,
        count
    );

    let values = response[3..response.len() - 2]
        .chunks_exact(2)
        .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
        .collect::<Vec<_>>();
    log::debug!("Received holding registers: {values:?}");

    Ok(values)
}
