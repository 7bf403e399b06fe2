use anyhow::Result;
use clap::{Arg, ArgMatches, Command};

use crate::protocol::tty::{available_ports_sorted, PortEntry};

/// Build the command line definition.
pub fn command() -> Command {
    Command::new("atv320-panel")
        .about("Terminal control panel for ATV320 drives over Modbus RTU")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("list-ports")
                .long("list-ports")
                .short('l')
                .help("List all available serial ports and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .short('j')
                .help("Output the port list in JSON format")
                .action(clap::ArgAction::SetTrue)
                .requires("list-ports"),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .short('p')
                .help("Pre-select a serial port in the panel (does not connect)")
                .value_name("PORT"),
        )
        .arg(
            Arg::new("simulate")
                .long("simulate")
                .help("Connect to an in-memory simulated drive instead of hardware")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Load serial settings from a TOML file")
                .value_name("PATH"),
        )
        .arg(
            Arg::new("baud-rate")
                .long("baud-rate")
                .help("Serial port baud rate [default: 19200]")
                .value_name("BAUD")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("data-bits")
                .long("data-bits")
                .help("Serial data bits (5-8) [default: 8]")
                .value_name("BITS")
                .value_parser(clap::value_parser!(u8)),
        )
        .arg(
            Arg::new("parity")
                .long("parity")
                .help("Serial parity: none, even, odd [default: none]")
                .value_name("PARITY"),
        )
        .arg(
            Arg::new("stop-bits")
                .long("stop-bits")
                .help("Serial stop bits (1 or 2) [default: 1]")
                .value_name("BITS")
                .value_parser(clap::value_parser!(u8)),
        )
        .arg(
            Arg::new("station-id")
                .long("station-id")
                .help("Modbus station ID of the drive [default: 1]")
                .value_name("ID")
                .value_parser(clap::value_parser!(u8)),
        )
        .arg(
            Arg::new("timeout-ms")
                .long("timeout-ms")
                .help("Response timeout in milliseconds [default: 3000]")
                .value_name("MS")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Append log output to this file instead of stderr")
                .value_name("PATH"),
        )
}

/// Parse command line arguments and return ArgMatches.
pub fn parse_args() -> ArgMatches {
    command().get_matches()
}

/// Render the port list either as pretty JSON or one line per port.
pub fn format_port_list(ports: &[PortEntry], json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(ports)?);
    }
    Ok(ports
        .iter()
        .map(|p| format!("{}\t{}", p.port_name, p.describe()))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Handle flags that print something and exit. Returns true when one ran.
pub fn run_one_shot_actions(matches: &ArgMatches) -> Result<bool> {
    if matches.get_flag("list-ports") {
        let ports = available_ports_sorted();
        log::info!("Listing {} serial port(s)", ports.len());
        let out = format_port_list(&ports, matches.get_flag("json"))?;
        if !out.is_empty() {
            println!("{out}");
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usb_port() -> PortEntry {
        let mut p = PortEntry::named("/dev/ttyUSB0");
        p.kind = "USB".to_string();
        p.vid = Some(0x0403);
        p.pid = Some(0x6001);
        p
    }

    #[test]
    fn plain_port_list_is_tab_separated() {
        let out = format_port_list(&[usb_port(), PortEntry::named("COM1")], false).unwrap();
        assert_eq!(out, "/dev/ttyUSB0\tUSB 0403:6001\nCOM1\tUnknown");
    }

    #[test]
    fn json_port_list_skips_missing_fields() {
        let out = format_port_list(&[PortEntry::named("COM1")], true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["port_name"], "COM1");
        assert!(value[0].get("vid").is_none());
    }

    #[test]
    fn command_definition_is_consistent() {
        command().debug_assert();
    }

    #[test]
    fn json_requires_list_ports() {
        assert!(command()
            .try_get_matches_from(["atv320-panel", "--json"])
            .is_err());
        assert!(command()
            .try_get_matches_from(["atv320-panel", "--list-ports", "--json"])
            .is_ok());
    }
}
