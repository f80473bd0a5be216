use std::{fs::OpenOptions, path::PathBuf};

use color_eyre::eyre::Result;
use directories::ProjectDirs;
use ipcam_daynight::settings::env_name;
use tracing_error::ErrorLayer;
use tracing_subscriber::{filter::EnvFilter, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, Layer};

const LOG_FILE: &str = concat!(env!("CARGO_PKG_NAME"), ".log");

/// Logging options, read from `IPCAM_*` variables before the settings are loaded so
/// that settings errors already end up in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Full `RUST_LOG` directive, overrides `level` when set.
    directives: Option<String>,
    level: String,
    to_file: bool,
    color: bool,
    source_files: bool,
    data_dir: Option<PathBuf>,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |name: &str, default: bool| {
            lookup(&env_name(name))
                .and_then(|value| parse_flag(&value))
                .unwrap_or(default)
        };
        Self {
            directives: lookup("RUST_LOG").filter(|v| !v.trim().is_empty()),
            level: lookup(&env_name("LOGLEVEL"))
                .map(|v| v.trim().to_lowercase())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "info".to_string()),
            to_file: flag("LOG_TO_FILE", false),
            color: flag("ENV_COLOR_LOG", true),
            source_files: flag("LOG_SOURCE_FILES", false),
            data_dir: lookup(&env_name("DATA")).map(PathBuf::from),
        }
    }

    /// Both the library and the binary log under the crate name.
    pub fn filter(&self) -> String {
        match &self.directives {
            Some(directives) => directives.clone(),
            None => format!("{}={}", env!("CARGO_CRATE_NAME"), self.level),
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            dir.clone()
        } else if let Some(proj_dirs) = ProjectDirs::from("org", "ipcam", env!("CARGO_PKG_NAME")) {
            proj_dirs.data_local_dir().to_path_buf()
        } else {
            PathBuf::from(".").join(".data")
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join(LOG_FILE)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn initialize_panic_handler() -> Result<()> {
    std::panic::set_hook(Box::new(move |panic_info| {
        #[cfg(not(debug_assertions))]
        {
            use human_panic::{handle_dump, print_msg, Metadata};
            let meta = Metadata::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

            let file_path = handle_dump(&meta, panic_info);
            if let Err(err) = print_msg(file_path, &meta) {
                eprintln!("human-panic: failed to print error message to console: {}", err);
            }
        }

        log::error!("Panic occurred: {}", panic_info);

        #[cfg(debug_assertions)]
        {
            better_panic::Settings::auto()
                .most_recent_first(false)
                .lineno_suffix(true)
                .verbosity(better_panic::Verbosity::Full)
                .create_panic_handler()(panic_info);
        }

        std::process::exit(1);
    }));

    Ok(())
}

pub fn initialize_logging(config: &LogConfig) -> Result<()> {
    let filter = config.filter();
    let console = tracing_subscriber::fmt::layer()
        .with_file(config.source_files)
        .with_line_number(config.source_files)
        .with_target(false)
        .with_ansi(config.color)
        .with_filter(EnvFilter::new(&filter));
    let registry = tracing_subscriber::registry().with(console).with(ErrorLayer::default());

    if !config.to_file {
        registry.init();
        return Ok(());
    }

    std::fs::create_dir_all(config.data_dir())?;
    // keep the log of earlier runs, a restart should not wipe the switch history
    let log_file = OpenOptions::new().create(true).append(true).open(config.log_path())?;
    let file = tracing_subscriber::fmt::layer()
        .with_file(config.source_files)
        .with_line_number(config.source_files)
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(EnvFilter::new(&filter));
    registry.with(file).init();
    Ok(())
}
