//! CLI entry point for the `sort-all` tool.
//!
//! Parses the command line, installs the logger and hands every file to
//! [`sort_all::run`]. The process exits with the combined status.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use sort_all::config::Cli;

fn init_log() {
    let env = Env::default().default_filter_or("warn");
    env_logger::Builder::from_env(env).init();
}

fn main() -> ExitCode {
    init_log();
    let (config, filenames) = Cli::parse().into_parts();
    let status = sort_all::run(
        &config,
        &filenames,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
    ExitCode::from(status)
}
