//! Helpers for printing themed status messages.
//!
//! Every helper takes the writer explicitly and only emits ANSI colors when
//! `supports_color` is set, so redirected output stays plain.

use owo_colors::OwoColorize;
use std::io::{self, Write};

use crate::ui::theme::{color_for, ThemeEntry, ThemeMap};

/// Writes `text` in the color configured for `entry`, or plain.
pub fn write_styled<W: Write + ?Sized>(
    writer: &mut W,
    text: &str,
    entry: ThemeEntry,
    theme_map: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    match color_for(theme_map, entry) {
        Some(color) if supports_color => write!(writer, "{}", text.color(color)),
        _ => write!(writer, "{}", text),
    }
}

fn print_message<W: Write + ?Sized>(
    writer: &mut W,
    prefix: &str,
    msg: &str,
    entry: ThemeEntry,
    theme_map: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    write_styled(writer, &format!("{}{}", prefix, msg), entry, theme_map, supports_color)?;
    writeln!(writer)
}

pub fn print_info_message<W: Write + ?Sized>(writer: &mut W, msg: &str, theme_map: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_message(writer, "", msg, ThemeEntry::Info, theme_map, supports_color)
}

pub fn print_success_message<W: Write + ?Sized>(writer: &mut W, msg: &str, theme_map: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_message(writer, "", msg, ThemeEntry::Success, theme_map, supports_color)
}

pub fn print_warn_message<W: Write + ?Sized>(writer: &mut W, msg: &str, theme_map: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_message(writer, "Warning: ", msg, ThemeEntry::Warn, theme_map, supports_color)
}

pub fn print_error_message<W: Write + ?Sized>(writer: &mut W, msg: &str, theme_map: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_message(writer, "Error: ", msg, ThemeEntry::Error, theme_map, supports_color)
}
