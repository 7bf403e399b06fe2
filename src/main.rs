use anyhow::Result;
use std::time::Instant;

use atv320_panel::{
    api::{LinkOpener, SerialOpener, SimulatedDrive, SimulatedOpener},
    boot, cli,
    config::SerialSettings,
    core::Panel,
    tui::{self, app::App},
};

fn main() -> Result<()> {
    let matches = cli::parse_args();
    boot::init_common(matches.get_one::<String>("log-file").map(String::as_str));

    if cli::run_one_shot_actions(&matches)? {
        return Ok(());
    }

    let settings = SerialSettings::from_matches(&matches)?;
    let simulate = matches.get_flag("simulate");
    log::info!("Serial settings: {settings}");

    let opener: Box<dyn LinkOpener> = if simulate {
        log::info!("Simulation mode: links go to an in-memory drive");
        Box::new(SimulatedOpener::new(SimulatedDrive::new()))
    } else {
        Box::new(SerialOpener::new(settings.clone()))
    };

    let panel = Panel::new(opener, Instant::now());
    let mut app = if simulate {
        App::with_scanner(panel, tui::simulated_scanner)
    } else {
        App::new(panel)
    };
    app.link_label = if simulate {
        "Simulated".to_string()
    } else {
        settings.to_string()
    };
    if let Some(port) = matches.get_one::<String>("port") {
        app.preselect(port);
    }

    tui::start(app)
}
