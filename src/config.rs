//! Serial line settings.
//!
//! Defaults match what the drive ships with for its Modbus port apart from
//! parity, which most USB adapters leave at none. Values come from an optional
//! TOML file and are then overridden by command line flags.

use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, str::FromStr, time::Duration};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Parity {
    None,
    Even,
    Odd,
}

impl From<Parity> for serialport::Parity {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::None => serialport::Parity::None,
            Parity::Even => serialport::Parity::Even,
            Parity::Odd => serialport::Parity::Odd,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SerialSettings {
    pub baud_rate: u32,
    pub data_bits: u8,
    pub parity: Parity,
    pub stop_bits: u8,
    /// Modbus station (slave) address of the drive.
    pub station_id: u8,
    pub timeout_ms: u64,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            baud_rate: 19200,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: 1,
            station_id: 1,
            timeout_ms: 3000,
        }
    }
}

impl SerialSettings {
    /// Parse settings from TOML text. Missing keys keep their defaults.
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: SerialSettings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Build settings from `--config` (if any) and then apply flag overrides.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let mut settings = match matches.get_one::<String>("config") {
            Some(path) => Self::load(Path::new(path))?,
            None => Self::default(),
        };

        if let Some(baud_rate) = matches.get_one::<u32>("baud-rate") {
            settings.baud_rate = *baud_rate;
        }
        if let Some(data_bits) = matches.get_one::<u8>("data-bits") {
            settings.data_bits = *data_bits;
        }
        if let Some(parity) = matches.get_one::<String>("parity") {
            settings.parity = Parity::from_str(parity)
                .with_context(|| format!("Unknown parity '{parity}' (none, even, odd)"))?;
        }
        if let Some(stop_bits) = matches.get_one::<u8>("stop-bits") {
            settings.stop_bits = *stop_bits;
        }
        if let Some(station_id) = matches.get_one::<u8>("station-id") {
            settings.station_id = *station_id;
        }
        if let Some(timeout_ms) = matches.get_one::<u64>("timeout-ms") {
            settings.timeout_ms = *timeout_ms;
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.baud_rate == 0 {
            bail!("Baud rate must be greater than zero");
        }
        self.serial_data_bits()?;
        self.serial_stop_bits()?;
        if !(1..=247).contains(&self.station_id) {
            bail!(
                "Station id {} is outside the unicast range 1..=247",
                self.station_id
            );
        }
        if self.timeout_ms == 0 {
            bail!("Timeout must be greater than zero");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn serial_data_bits(&self) -> Result<serialport::DataBits> {
        Ok(match self.data_bits {
            5 => serialport::DataBits::Five,
            6 => serialport::DataBits::Six,
            7 => serialport::DataBits::Seven,
            8 => serialport::DataBits::Eight,
            other => bail!("Unsupported data bits {other} (5-8)"),
        })
    }

    pub fn serial_stop_bits(&self) -> Result<serialport::StopBits> {
        Ok(match self.stop_bits {
            1 => serialport::StopBits::One,
            2 => serialport::StopBits::Two,
            other => bail!("Unsupported stop bits {other} (1 or 2)"),
        })
    }
}

impl std::fmt::Display for SerialSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parity = match self.parity {
            Parity::None => 'N',
            Parity::Even => 'E',
            Parity::Odd => 'O',
        };
        write!(
            f,
            "{} {}{}{} id={}",
            self.baud_rate, self.data_bits, parity, self.stop_bits, self.station_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() -> Result<()> {
        let settings = SerialSettings::default();
        settings.validate()?;
        assert_eq!(settings.to_string(), "19200 8N1 id=1");
        assert_eq!(settings.timeout(), Duration::from_secs(3));
        Ok(())
    }

    #[test]
    fn partial_toml_keeps_defaults() -> Result<()> {
        let settings = SerialSettings::from_toml("baud_rate = 9600\nparity = \"even\"\n")?;
        assert_eq!(settings.baud_rate, 9600);
        assert_eq!(settings.parity, Parity::Even);
        assert_eq!(settings.station_id, 1);
        assert_eq!(settings.stop_bits, 1);
        Ok(())
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(SerialSettings::from_toml("stop_bits = 3").is_err());
        assert!(SerialSettings::from_toml("station_id = 0").is_err());
        assert!(SerialSettings::from_toml("data_bits = 9").is_err());
        assert!(SerialSettings::from_toml("speed = 1").is_err());
    }

    #[test]
    fn flags_override_defaults() -> Result<()> {
        let matches = crate::cli::command().try_get_matches_from([
            "atv320-panel",
            "--baud-rate",
            "38400",
            "--parity",
            "EVEN",
            "--station-id",
            "5",
        ])?;
        let settings = SerialSettings::from_matches(&matches)?;
        assert_eq!(settings.baud_rate, 38400);
        assert_eq!(settings.parity, Parity::Even);
        assert_eq!(settings.station_id, 5);
        assert_eq!(settings.timeout_ms, 3000);
        Ok(())
    }

    #[test]
    fn unknown_parity_flag_is_an_error() -> Result<()> {
        let matches =
            crate::cli::command().try_get_matches_from(["atv320-panel", "--parity", "mark"])?;
        assert!(SerialSettings::from_matches(&matches).is_err());
        Ok(())
    }
}
