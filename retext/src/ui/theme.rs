//! Module for managing the application's command-line interface (CLI) theme.
//!
//! A theme maps logical output elements to 16-color ANSI foreground colors.
//! Themes are loaded from YAML files; entries a file leaves out keep their
//! default color.

use anyhow::{Context, Result};
use owo_colors::AnsiColors;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Type alias for the theme map, providing a consistent type definition.
pub type ThemeMap = HashMap<ThemeEntry, ThemeStyle>;

/// The different logical parts of the output that can be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeEntry {
    /// Style for prominent headers or section titles.
    Header,
    /// Style for successful operation messages.
    Success,
    /// Style for general informational messages.
    Info,
    /// Style for warning messages.
    Warn,
    /// Style for error messages.
    Error,
    /// Style for lines added in a diff view.
    DiffAdded,
    /// Style for lines removed in a diff view.
    DiffRemoved,
    /// Style for the header/footer of a diff view.
    DiffHeader,
    /// Style for a rule's pattern in `check` output.
    RulePattern,
    /// Style for a rule's scope or a point's sink in listings.
    RuleScope,
}

const ALL_ENTRIES: [ThemeEntry; 10] = [
    ThemeEntry::Header,
    ThemeEntry::Success,
    ThemeEntry::Info,
    ThemeEntry::Warn,
    ThemeEntry::Error,
    ThemeEntry::DiffAdded,
    ThemeEntry::DiffRemoved,
    ThemeEntry::DiffHeader,
    ThemeEntry::RulePattern,
    ThemeEntry::RuleScope,
];

/// Represents an ANSI color that can be used in the theme.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ThemeColor {
    /// A named ANSI color (e.g., "red", "brightgreen").
    Named(String),
}

/// Error type for parsing an invalid `ThemeColor` string.
#[derive(Debug, Clone)]
pub struct ParseThemeColorError;

impl fmt::Display for ParseThemeColorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Invalid theme color; expected one of: black, red, green, yellow, blue, \
            magenta, cyan, white, brightblack, brightred, brightgreen, brightyellow, \
            brightblue, brightmagenta, brightcyan, brightwhite."
        )
    }
}

impl std::error::Error for ParseThemeColorError {}

impl FromStr for ThemeColor {
    type Err = ParseThemeColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        match ansi_for(&lower) {
            Some(_) => Ok(ThemeColor::Named(lower)),
            None => Err(ParseThemeColorError),
        }
    }
}

impl ThemeColor {
    /// Converts the color to its `owo_colors::AnsiColors` value.
    /// Unknown names fall back to white.
    pub fn to_ansi_color(&self) -> AnsiColors {
        match self {
            ThemeColor::Named(name) => ansi_for(&name.to_lowercase()).unwrap_or(AnsiColors::White),
        }
    }
}

fn ansi_for(name: &str) -> Option<AnsiColors> {
    let color = match name {
        "black" => AnsiColors::Black,
        "red" => AnsiColors::Red,
        "green" => AnsiColors::Green,
        "yellow" => AnsiColors::Yellow,
        "blue" => AnsiColors::Blue,
        "magenta" => AnsiColors::Magenta,
        "cyan" => AnsiColors::Cyan,
        "white" => AnsiColors::White,
        "brightblack" => AnsiColors::BrightBlack,
        "brightred" => AnsiColors::BrightRed,
        "brightgreen" => AnsiColors::BrightGreen,
        "brightyellow" => AnsiColors::BrightYellow,
        "brightblue" => AnsiColors::BrightBlue,
        "brightmagenta" => AnsiColors::BrightMagenta,
        "brightcyan" => AnsiColors::BrightCyan,
        "brightwhite" => AnsiColors::BrightWhite,
        _ => return None,
    };
    Some(color)
}

/// Represents the style configuration for a specific `ThemeEntry`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeStyle {
    /// An optional `ThemeColor` to apply as the foreground color.
    pub fg: Option<ThemeColor>,
}

/// Loads a theme configuration from a YAML file or returns the default theme.
pub fn build_theme_map(theme_path: Option<&PathBuf>) -> Result<ThemeMap> {
    match theme_path {
        Some(path) => ThemeStyle::load_from_file(path),
        None => Ok(ThemeStyle::default_theme_map()),
    }
}

/// The foreground color configured for `entry`, if any.
pub fn color_for(theme_map: &ThemeMap, entry: ThemeEntry) -> Option<AnsiColors> {
    theme_map
        .get(&entry)
        .and_then(|style| style.fg.as_ref())
        .map(ThemeColor::to_ansi_color)
}

impl ThemeStyle {
    /// Loads a theme from a YAML file on disk, filling gaps from the default theme.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<ThemeMap> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read theme file {}", path.display()))?;
        let mut custom: ThemeMap = serde_yaml::from_str(&text)
            .with_context(|| format!("Failed to parse theme file {}", path.display()))?;

        for (entry, style) in Self::default_theme_map() {
            custom.entry(entry).or_insert(style);
        }
        Ok(custom)
    }

    /// Returns a default theme map with predefined color mappings.
    pub fn default_theme_map() -> ThemeMap {
        let named = |name: &str| ThemeStyle {
            fg: Some(ThemeColor::Named(name.into())),
        };
        let mut default_theme = HashMap::new();
        default_theme.insert(ThemeEntry::Header, named("cyan"));
        default_theme.insert(ThemeEntry::Success, named("green"));
        default_theme.insert(ThemeEntry::Warn, named("yellow"));
        default_theme.insert(ThemeEntry::Error, named("red"));
        default_theme.insert(ThemeEntry::DiffAdded, named("green"));
        default_theme.insert(ThemeEntry::DiffRemoved, named("red"));
        default_theme.insert(ThemeEntry::DiffHeader, named("yellow"));
        default_theme.insert(ThemeEntry::RulePattern, named("brightblue"));
        default_theme.insert(ThemeEntry::RuleScope, named("brightblack"));

        for entry in ALL_ENTRIES {
            default_theme.entry(entry).or_insert_with(|| named("white"));
        }
        default_theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_named_colors() {
        assert!("red".parse::<ThemeColor>().is_ok());
        assert!("BrightGreen".parse::<ThemeColor>().is_ok());
        assert!("unknown".parse::<ThemeColor>().is_err());
    }

    #[test]
    fn default_theme_covers_every_entry() {
        let theme = ThemeStyle::default_theme_map();
        for entry in ALL_ENTRIES {
            assert!(color_for(&theme, entry).is_some(), "{:?} has no color", entry);
        }
        assert_eq!(color_for(&theme, ThemeEntry::DiffRemoved), Some(AnsiColors::Red));
    }

    #[test]
    fn custom_theme_overrides_and_keeps_defaults() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"diff_added:\n  fg: blue\n")?;
        let theme = ThemeStyle::load_from_file(file.path())?;
        assert_eq!(color_for(&theme, ThemeEntry::DiffAdded), Some(AnsiColors::Blue));
        assert_eq!(color_for(&theme, ThemeEntry::DiffRemoved), Some(AnsiColors::Red));
        Ok(())
    }
}
