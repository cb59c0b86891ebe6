//! `addressbook` command-line entry point.
//!
//! # Responsibility
//! - Resolve run paths, start logging and run one import pass.
//! - Exit non-zero only on fatal input or export failures.

mod cli;
mod output;

use addressbook_core::{
    core_version, default_log_level, init_logging, ContactStore, ImportRequest, ImportService,
};
use chrono::Local;
use clap::Parser;
use cli::{absolutize, Args};
use log::error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    let paths = args.resolve(Local::now());

    let level = args.log_level.as_deref().unwrap_or(default_log_level());
    if let Err(err) = init_logging(level, &paths.log_dir) {
        eprintln!("logging disabled: {err}");
    }

    let service = ImportService::new(ContactStore::new(&paths.db));
    let request = ImportRequest {
        input: paths.input.clone(),
        output: paths.output.clone(),
    };

    match service.run(&request) {
        Ok(report) => {
            output::print_report(&report, &absolutize(&paths.output), &absolutize(&paths.db));
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(
                "event=import_run module=cli status=error version={} error={}",
                core_version(),
                err
            );
            eprintln!("import failed: {err}");
            ExitCode::FAILURE
        }
    }
}
