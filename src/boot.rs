use chrono::Local;
use log::LevelFilter;
use std::io::{self, Write};

use env_logger::{Builder, Target};

pub const LOG_FILE_ENV: &str = "ATV320_LOG_FILE";

/// Pick the log file: explicit flag, then environment, then a timestamped
/// file in debug builds. `None` means log to stderr.
pub fn resolve_log_file(flag: Option<&str>) -> Option<String> {
    flag.map(str::to_string)
        .or_else(|| std::env::var(LOG_FILE_ENV).ok())
        .or_else(|| {
            #[cfg(debug_assertions)]
            {
                Some(format!("./log_{}.log", Local::now().format("%Y%m%d%H%M%S")))
            }
            #[cfg(not(debug_assertions))]
            {
                None
            }
        })
}

/// Common initialization used by every entrypoint.
pub fn init_common(log_file: Option<&str>) {
    if let Some(path) = resolve_log_file(log_file) {
        if let Err(err) = init_file_logger(&path) {
            eprintln!("Failed to initialize file logger at '{path}': {err}");
            env_logger::init();
        }
    } else {
        env_logger::init();
    }
}

fn init_file_logger(path: &str) -> io::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    let mut builder = Builder::new();
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{}:{} {} [{}] - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(file)))
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    log::info!("File logger initialized at {path}");

    Ok(())
}
