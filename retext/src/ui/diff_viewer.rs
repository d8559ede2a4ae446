// retext/src/ui/diff_viewer.rs
//! Unified diff output for `retext apply --diff`.
//!
//! Removed lines are printed with `-`, added lines with `+`, and unchanged
//! context lines with two spaces.

use diffy::{create_patch, Line as DiffLine};
use std::io::{self, Write};

use crate::ui::output_format::write_styled;
use crate::ui::theme::{ThemeEntry, ThemeMap};

/// Writes a line-based diff of `original` against `replaced`.
pub fn print_diff<W: Write + ?Sized>(
    original: &str,
    replaced: &str,
    writer: &mut W,
    theme_map: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    write_styled(writer, "--- Diff View ---", ThemeEntry::DiffHeader, theme_map, supports_color)?;
    writeln!(writer)?;

    let patch = create_patch(original, replaced);
    let mut changed = false;
    for hunk in patch.hunks() {
        for line in hunk.lines() {
            match line {
                DiffLine::Delete(s) => {
                    changed = true;
                    write_styled(writer, &format!("-{}", s.trim_end_matches('\n')), ThemeEntry::DiffRemoved, theme_map, supports_color)?;
                }
                DiffLine::Insert(s) => {
                    changed = true;
                    write_styled(writer, &format!("+{}", s.trim_end_matches('\n')), ThemeEntry::DiffAdded, theme_map, supports_color)?;
                }
                DiffLine::Context(s) => write!(writer, "  {}", s.trim_end_matches('\n'))?,
            }
            writeln!(writer)?;
        }
    }

    if !changed {
        writeln!(writer, "No changes.")?;
    }
    write_styled(writer, "-----------------", ThemeEntry::DiffHeader, theme_map, supports_color)?;
    writeln!(writer)
}
