//! Serial port enumeration for the port selector.

use serde::Serialize;
use serialport::{SerialPortInfo, SerialPortType};

cfg_if::cfg_if! {
    if #[cfg(windows)] {
        mod tty_windows;
        pub(crate) use tty_windows::sort_and_dedup_ports;
    } else {
        mod tty_unix;
        pub(crate) use tty_unix::sort_and_dedup_ports;
    }
}

/// One selectable port as shown in the selector and by `--list-ports`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortEntry {
    pub port_name: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vid: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
}

impl PortEntry {
    pub fn named(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            kind: "Unknown".to_string(),
            vid: None,
            pid: None,
            serial: None,
            product: None,
        }
    }

    /// Short description for the selector, e.g. `USB 0403:6001 FT232R`.
    pub fn describe(&self) -> String {
        match (self.vid, self.pid) {
            (Some(vid), Some(pid)) => match &self.product {
                Some(product) => format!("{} {vid:04x}:{pid:04x} {product}", self.kind),
                None => format!("{} {vid:04x}:{pid:04x}", self.kind),
            },
            _ => self.kind.clone(),
        }
    }
}

impl From<SerialPortInfo> for PortEntry {
    fn from(info: SerialPortInfo) -> Self {
        let mut entry = PortEntry::named(info.port_name);
        match info.port_type {
            SerialPortType::UsbPort(usb) => {
                entry.kind = "USB".to_string();
                entry.vid = Some(usb.vid);
                entry.pid = Some(usb.pid);
                entry.serial = usb.serial_number;
                entry.product = usb.product;
            }
            SerialPortType::PciPort => entry.kind = "PCI".to_string(),
            SerialPortType::BluetoothPort => entry.kind = "Bluetooth".to_string(),
            SerialPortType::Unknown => {}
        }
        entry
    }
}

/// Enumerate ports, deduplicated and in platform preference order.
///
/// Enumeration failures are logged and yield an empty list.
pub fn available_ports_sorted() -> Vec<PortEntry> {
    let raw_ports = match serialport::available_ports() {
        Ok(ports) => ports,
        Err(err) => {
            log::warn!("Failed to enumerate serial ports: {err}");
            Vec::new()
        }
    };
    sort_and_dedup_ports(raw_ports)
        .into_iter()
        .map(PortEntry::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serialport::UsbPortInfo;

    #[test]
    fn usb_port_is_described_with_ids() {
        let entry = PortEntry::from(SerialPortInfo {
            port_name: "/dev/ttyUSB0".to_string(),
            port_type: SerialPortType::UsbPort(UsbPortInfo {
                vid: 0x0403,
                pid: 0x6001,
                serial_number: Some("A10K".to_string()),
                manufacturer: None,
                product: Some("FT232R".to_string()),
            }),
        });
        assert_eq!(entry.port_name, "/dev/ttyUSB0");
        assert_eq!(entry.describe(), "USB 0403:6001 FT232R");
    }

    #[test]
    fn unknown_port_has_plain_description() {
        let entry = PortEntry::named("COM7");
        assert_eq!(entry.describe(), "Unknown");
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"port_name":"COM7","kind":"Unknown"}"#);
    }
}
