use serialport::{SerialPortInfo, SerialPortType};
use std::{cmp::Ordering, collections::HashSet};

fn com_index(name: &str) -> Option<u32> {
    name.to_uppercase()
        .strip_prefix("COM")
        .and_then(|n| n.parse::<u32>().ok())
}

/// Dedup by upper-cased name (and USB ids), then order by COM number.
pub(crate) fn sort_and_dedup_ports(raw_ports: Vec<SerialPortInfo>) -> Vec<SerialPortInfo> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut ports: Vec<SerialPortInfo> = Vec::new();

    for port in raw_ports.into_iter() {
        let base = port.port_name.to_uppercase();
        let key = match &port.port_type {
            SerialPortType::UsbPort(usb) => {
                format!("{base}:vid={:04x}:pid={:04x}", usb.vid, usb.pid)
            }
            _ => base,
        };
        if seen.insert(key) {
            ports.push(port);
        }
    }

    ports.sort_by(|a, b| {
        match (com_index(&a.port_name), com_index(&b.port_name)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.port_name.cmp(&b.port_name),
        }
    });

    ports
}
