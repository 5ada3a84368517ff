//! long-capture — scrolling screenshot engine.
//!
//! Wires together:
//! - Window lookup, capture and persistence (capture/)
//! - Per-platform scroll gestures (scroll/)
//! - Fingerprinting, overlap search and composition (stitch/)
//! - The scroll/capture loop that drives them (session.rs)
//! - The command-line surface (cli.rs)

pub mod capture;
pub mod cli;
pub mod config;
pub mod scroll;
pub mod session;
pub mod stitch;

use clap::Parser;
use std::process::ExitCode;

/// Entry point — called by the `long-capture` binary.
///
/// Logs go to stderr; stdout carries only requested output (paths,
/// base64, JSON) so it can be piped.
pub fn run() -> ExitCode {
    let cli = cli::Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("{}", cli::CliError::Runtime(e));
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(cli.execute()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
