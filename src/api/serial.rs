use anyhow::{anyhow, Context, Result};
use std::io::{Read, Write};

use super::link::{LinkOpener, RegisterLink};
use crate::{
    config::SerialSettings,
    protocol::modbus::{
        generate_pull_get_holdings_request, generate_pull_set_holding_request,
        get_holdings_response_len, parse_pull_get_holdings, parse_pull_set_holding,
        read_response_frame, SET_HOLDING_RESPONSE_LEN,
    },
};

/// Byte stream a Modbus RTU master talks over.
pub trait Transport: Read + Write + Send {
    /// Drop bytes left over from an earlier, abandoned transaction.
    fn discard_input(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Transport for Box<dyn serialport::SerialPort> {
    fn discard_input(&mut self) -> Result<()> {
        self.clear(serialport::ClearBuffer::Input)
            .map_err(|err| anyhow!("Failed to clear input buffer: {err}"))
    }
}

/// Open a serial port with the configured line settings, enabling exclusive access on Unix systems.
pub fn open_serial_port(
    port: &str,
    settings: &SerialSettings,
) -> Result<Box<dyn serialport::SerialPort>> {
    let builder = serialport::new(port, settings.baud_rate)
        .data_bits(settings.serial_data_bits()?)
        .parity(settings.parity.into())
        .stop_bits(settings.serial_stop_bits()?)
        .timeout(settings.timeout());

    #[cfg(unix)]
    {
        let mut handle = builder
            .open_native()
            .map_err(|err| anyhow!("Failed to open port {port}: {err}"))?;
        handle
            .set_exclusive(true)
            .map_err(|err| anyhow!("Failed to acquire exclusive access to {port}: {err}"))?;
        Ok(Box::new(handle))
    }

    #[cfg(not(unix))]
    {
        builder
            .open()
            .map_err(|err| anyhow!("Failed to open port {port}: {err}"))
    }
}

/// Modbus RTU master bound to one station on one transport.
///
/// Each call is a full request/response transaction; there is no pipelining
/// and no retry.
pub struct RtuLink<T: Transport> {
    transport: T,
    station_id: u8,
    port_name: String,
}

pub type SerialLink = RtuLink<Box<dyn serialport::SerialPort>>;

impl<T: Transport> RtuLink<T> {
    pub fn new(transport: T, station_id: u8, port_name: impl Into<String>) -> Self {
        Self {
            transport,
            station_id,
            port_name: port_name.into(),
        }
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    fn transact(&mut self, request: &[u8], expected_len: usize) -> Result<Vec<u8>> {
        self.transport.discard_input()?;
        self.transport
            .write_all(request)
            .and_then(|_| self.transport.flush())
            .map_err(|err| anyhow!("Failed to send request on {}: {err}", self.port_name))?;
        read_response_frame(&mut self.transport, expected_len)
    }
}

impl<T: Transport> RegisterLink for RtuLink<T> {
    fn write_register(&mut self, address: u16, value: u16) -> Result<()> {
        let (mut request, raw) =
            generate_pull_set_holding_request(self.station_id, address, value)?;
        let response = self
            .transact(&raw, SET_HOLDING_RESPONSE_LEN)
            .with_context(|| format!("write {value} to register {address}"))?;
        parse_pull_set_holding(&mut request, &response)
            .with_context(|| format!("write {value} to register {address}"))
    }

    fn read_holding_register(&mut self, address: u16) -> Result<u16> {
        let (mut request, raw) = generate_pull_get_holdings_request(self.station_id, address, 1)?;
        let response = self
            .transact(&raw, get_holdings_response_len(1))
            .with_context(|| format!("read register {address}"))?;
        let values = parse_pull_get_holdings(&mut request, &response, 1)
            .with_context(|| format!("read register {address}"))?;
        values
            .first()
            .copied()
            .ok_or_else(|| anyhow!("Empty reply reading register {address}"))
    }

    fn close(&mut self) {
        if let Err(err) = self.transport.flush() {
            log::warn!("Failed to flush {} on close: {err}", self.port_name);
        }
        log::info!("Closed Modbus link on {}", self.port_name);
    }
}

/// Opens real serial ports with fixed line settings.
pub struct SerialOpener {
    settings: SerialSettings,
}

impl SerialOpener {
    pub fn new(settings: SerialSettings) -> Self {
        Self { settings }
    }
}

impl LinkOpener for SerialOpener {
    fn open(&self, port_name: &str) -> Result<Box<dyn RegisterLink>> {
        let port = open_serial_port(port_name, &self.settings)?;
        log::info!("Opened {port_name} ({})", self.settings);
        Ok(Box::new(SerialLink::new(
            port,
            self.settings.station_id,
            port_name,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::modbus::with_crc;
    use std::{collections::VecDeque, io};

    /// Replays canned replies and records everything written.
    #[derive(Default)]
    struct ScriptedPort {
        written: Vec<u8>,
        replies: VecDeque<Vec<u8>>,
        pending: VecDeque<u8>,
        discards: usize,
    }

    impl Read for ScriptedPort {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.pending.is_empty() {
                return Err(io::Error::new(io::ErrorKind::TimedOut, "no reply"));
            }
            let n = buf.len().min(self.pending.len());
            for slot in buf.iter_mut().take(n) {
                *slot = self.pending.pop_front().unwrap_or_default();
            }
            Ok(n)
        }
    }

    impl Write for ScriptedPort {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            if let Some(reply) = self.replies.pop_front() {
                self.pending.extend(reply);
            }
            Ok(())
        }
    }

    impl Transport for ScriptedPort {
        fn discard_input(&mut self) -> Result<()> {
            self.discards += 1;
            self.pending.clear();
            Ok(())
        }
    }

    #[test]
    fn write_register_sends_frame_and_accepts_echo() -> Result<()> {
        let frame = with_crc(vec![0x01, 0x06, 0x21, 0x35, 0x00, 0x03]);
        let mut port = ScriptedPort::default();
        port.replies.push_back(frame.clone());

        let mut link = RtuLink::new(port, 1, "test");
        link.write_register(8501, 3)?;
        assert_eq!(link.transport.written, frame);
        assert_eq!(link.transport.discards, 1);
        Ok(())
    }

    #[test]
    fn read_register_decodes_value() -> Result<()> {
        let mut port = ScriptedPort::default();
        port.replies
            .push_back(with_crc(vec![0x02, 0x03, 0x02, 0xFA, 0x24]));

        let mut link = RtuLink::new(port, 2, "test");
        let raw = link.read_holding_register(8604)?;
        assert_eq!(raw, 0xFA24);
        assert_eq!(
            link.transport.written,
            with_crc(vec![0x02, 0x03, 0x21, 0x9C, 0x00, 0x01])
        );
        Ok(())
    }

    #[test]
    fn exception_reply_is_an_error() {
        let mut port = ScriptedPort::default();
        port.replies.push_back(with_crc(vec![0x01, 0x86, 0x02]));

        let mut link = RtuLink::new(port, 1, "test");
        let err = link.write_register(8602, 150).unwrap_err();
        assert!(format!("{err:#}").contains("register 8602"), "{err:#}");
    }

    #[test]
    fn silent_drive_is_an_error() {
        let mut link = RtuLink::new(ScriptedPort::default(), 1, "test");
        assert!(link.read_holding_register(8501).is_err());
    }
}
