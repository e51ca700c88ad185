//! Entry point for the `histnav` command.
//!
//! Loads configuration, starts file logging when `RUST_LOG` is set, then
//! runs a single history command and exits.

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use histnav::app::{App, Invocation, USAGE};
use histnav::config::Config;
use histnav::utils;

fn main() -> Result<ExitCode> {
    let config = Config::from_env_and_file()?;

    let _log_guard = if std::env::var_os("RUST_LOG").is_some() {
        utils::logger::init_logging(&config.dir)
    } else {
        None
    };

    let invocation = match Invocation::parse(std::env::args().skip(1)) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("histnav: {:#}\n\n{}", e, USAGE);
            return Ok(ExitCode::from(2));
        }
    };

    let app = App::new(&config);
    let mut out = io::stdout().lock();
    app.run(&invocation, &mut out)?;
    Ok(ExitCode::SUCCESS)
}
