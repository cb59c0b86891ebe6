//! Command-line arguments and default path resolution.
//!
//! # Invariants
//! - Default output and database names share one timestamp per run.
//! - Log directory is always absolute before it reaches `init_logging`.

use chrono::{DateTime, Local};
use clap::Parser;
use std::path::{Path, PathBuf};

/// Timestamp used in generated file names; no `:` or spaces.
const STAMP_FORMAT: &str = "%Y-%m-%d_%H;%M;%S";
const OUTPUT_PREFIX: &str = "AddressBookImport";
const LOG_DIR_NAME: &str = ".addressbook/logs";

/// Import an address-book XML file into SQLite and export it as JSON.
#[derive(Debug, Parser)]
#[command(name = "addressbook")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Address-book markup to import
    #[arg(short, long, env = "ADDRESSBOOK_INPUT", default_value = "ab.xml")]
    pub input: PathBuf,

    /// JSON output file (default: ~/AddressBookImport-<timestamp>.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// SQLite database file (default: ./db-<timestamp>.sqlite)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, env = "ADDRESSBOOK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rolling log files (default: ~/.addressbook/logs)
    #[arg(long, env = "ADDRESSBOOK_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

/// Fully resolved paths for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub input: PathBuf,
    pub output: PathBuf,
    pub db: PathBuf,
    pub log_dir: PathBuf,
}

impl Args {
    /// Fills unset paths from the home directory, working directory and `now`.
    pub fn resolve(&self, now: DateTime<Local>) -> RunPaths {
        let stamp = now.format(STAMP_FORMAT).to_string();
        let home = dirs::home_dir().unwrap_or_else(current_dir);

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| home.join(format!("{OUTPUT_PREFIX}-{stamp}.json")));
        let db = self
            .db
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("db-{stamp}.sqlite")));
        let log_dir = self
            .log_dir
            .clone()
            .map(|dir| absolutize(&dir))
            .unwrap_or_else(|| home.join(LOG_DIR_NAME));

        RunPaths {
            input: self.input.clone(),
            output,
            db,
            log_dir,
        }
    }
}

/// Joins relative paths onto the working directory.
pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        current_dir().join(path)
    }
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
