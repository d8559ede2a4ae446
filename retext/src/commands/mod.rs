//! Subcommand implementations and the helpers they share.

pub mod apply;
pub mod check;
pub mod client;
pub mod payload;
pub mod points;

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use retext_core::RetextConfig;

use crate::ui::output_format;
use crate::ui::theme::ThemeMap;

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_info_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_error_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Helper for printing warning messages to stderr.
pub fn warn_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_warn_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Loads the rule configuration, or an empty one when no path was given.
pub fn load_config(path: Option<&Path>, quiet: bool, theme: &ThemeMap) -> Result<RetextConfig> {
    match path {
        Some(path) => RetextConfig::load_from_file(path),
        None => {
            if !quiet {
                warn_msg("No configuration given (--config or RETEXT_CONFIG); no rules will apply.", theme);
            }
            Ok(RetextConfig::default())
        }
    }
}

/// Reads the whole input from `path`, or from stdin when `path` is `None`.
pub fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => {
            debug!("Reading input from file: {}", path.display());
            fs::read_to_string(path).with_context(|| format!("Failed to read input file {}", path.display()))
        }
        None => {
            debug!("Reading input from stdin.");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

/// Writes `content` verbatim to `path`, or to stdout.
pub fn write_output(path: Option<&PathBuf>, content: &str, quiet: bool, theme: &ThemeMap) -> Result<()> {
    match path {
        Some(path) => {
            if !quiet {
                info_msg(format!("Writing output to file: {}", path.display()), theme);
            }
            fs::write(path, content).with_context(|| format!("Failed to write output file {}", path.display()))?;
            info!("Wrote {} bytes to {}.", content.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            writer.write_all(content.as_bytes())?;
            writer.flush()?;
        }
    }
    Ok(())
}
