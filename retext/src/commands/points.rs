//! `retext points`: list the extension-point table.

use anyhow::Result;
use is_terminal::IsTerminal;
use serde_json::json;
use std::io::{self, Write};

use retext_core::EXTENSION_POINTS;

use crate::ui::output_format::write_styled;
use crate::ui::theme::{ThemeEntry, ThemeMap};

pub fn run_points(as_json: bool, theme_map: &ThemeMap) -> Result<()> {
    let stdout = io::stdout();
    let supports_color = stdout.is_terminal();
    let mut out = stdout.lock();

    if as_json {
        let table: Vec<_> = EXTENSION_POINTS
            .iter()
            .map(|(identifier, _, sink)| json!({ "identifier": identifier, "sink": sink.to_string() }))
            .collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&table)?)?;
        return Ok(());
    }

    let width = EXTENSION_POINTS
        .iter()
        .map(|(identifier, _, _)| identifier.len())
        .max()
        .unwrap_or(0);
    write_styled(&mut out, &format!("{:<width$}  sink", "identifier", width = width), ThemeEntry::Header, theme_map, supports_color)?;
    writeln!(out)?;
    for (identifier, _, sink) in EXTENSION_POINTS {
        write!(out, "{:<width$}  ", identifier, width = width)?;
        write_styled(&mut out, &sink.to_string(), ThemeEntry::RuleScope, theme_map, supports_color)?;
        writeln!(out)?;
    }
    Ok(())
}
