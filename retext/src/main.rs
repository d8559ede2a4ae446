// retext/src/main.rs
//! ReText entry point.
//!
//! Parses the command line, installs the logger, loads the theme, and hands
//! off to the selected subcommand.

use clap::Parser;
use log::LevelFilter;
use std::process::ExitCode;

use retext::cli::Cli;
use retext::commands::error_msg;
use retext::logger;
use retext::ui::theme::{build_theme_map, ThemeStyle};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.quiet {
        Some(LevelFilter::Off)
    } else if cli.debug {
        Some(LevelFilter::Debug)
    } else {
        None
    };
    logger::init_logger(level);

    let theme_map = match build_theme_map(cli.theme.as_ref()) {
        Ok(theme) => theme,
        Err(e) => {
            let fallback = ThemeStyle::default_theme_map();
            error_msg(format!("{:#}", e), &fallback);
            return ExitCode::FAILURE;
        }
    };

    match retext::run(cli, &theme_map) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error_msg(format!("{:#}", e), &theme_map);
            ExitCode::FAILURE
        }
    }
}
