// retext/src/lib.rs
//! # ReText CLI Application
//!
//! This crate provides the command-line front end for `retext-core`: apply
//! rules to files or stdin, validate a rule configuration, export the
//! browser-side payload, and simulate the browser-side applier offline.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;

use anyhow::Result;

use crate::cli::{Cli, Commands};
use crate::commands::apply::{ApplyOptions, ApplyTarget};
use crate::commands::client::ClientOptions;
use crate::commands::{load_config, read_input};
use crate::ui::theme::ThemeMap;
use retext_core::ExtensionPoint;

/// Dispatches a parsed command line to its subcommand.
pub fn run(cli: Cli, theme_map: &ThemeMap) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Apply(cmd) => {
            let target = match &cmd.field {
                Some(identifier) => ApplyTarget::Field(ExtensionPoint::from_identifier(identifier)?),
                None => ApplyTarget::Sink(cmd.sink.into()),
            };
            let config = load_config(config_path, cli.quiet, theme_map)?;
            let opts = ApplyOptions {
                input: read_input(cmd.input.as_ref())?,
                context: cmd.context.into(),
                target,
                output_path: cmd.output,
                diff: cmd.diff,
                quiet: cli.quiet,
            };
            commands::apply::run_apply(&config, opts, theme_map)
        }
        Commands::Check(cmd) => {
            let config = load_config(config_path, cli.quiet, theme_map)?;
            commands::check::run_check(&config, cmd.strict, theme_map)
        }
        Commands::Payload(cmd) => {
            let config = load_config(config_path, cli.quiet, theme_map)?;
            commands::payload::run_payload(&config, cmd.context.into(), cmd.inline_script.as_deref(), theme_map)
        }
        Commands::Client(cmd) => {
            let payload_json = match &cmd.payload {
                Some(path) => Some(read_input(Some(path))?),
                None => None,
            };
            let config = match payload_json {
                Some(_) => Default::default(),
                None => load_config(config_path, cli.quiet, theme_map)?,
            };
            let opts = ClientOptions {
                document: read_input(cmd.input.as_ref())?,
                context: cmd.context.into(),
                payload_json,
                output_path: cmd.output,
                quiet: cli.quiet,
            };
            commands::client::run_client(&config, opts, theme_map)
        }
        Commands::Points(cmd) => commands::points::run_points(cmd.json, theme_map),
    }
}
