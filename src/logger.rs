use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use env_logger::{Builder, Env, Target};
use log::error;

pub fn default_log_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "calicon", "calicon").map(|d| d.data_dir().join("calicon.log"))
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Installs the global logger. `RUST_LOG` wins over `verbose`. With a log file
/// the lines are appended there instead of going to stderr.
pub fn init(verbose: bool, log_file: Option<&Path>) {
    let default_level = if verbose { "debug" } else { "info" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));
    builder.format(|buf, record| writeln!(buf, "[{}] {:<5} {}", timestamp(), record.level(), record.args()));

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => {
                builder.target(Target::Pipe(Box::new(f)));
            }
            Err(e) => eprintln!("cannot open log file {}: {}, logging to stderr", path.display(), e),
        }
    }
    // A second init (tests, repeated calls) keeps the first logger.
    let _ = builder.try_init();
}

pub fn log_error(prefix: &str, e: &dyn std::error::Error) {
    error!("{}: {}", prefix, e);
}
