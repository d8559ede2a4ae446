//! Configuration management for `retext-core`.
//!
//! This module defines the raw rule definitions and the engine settings that
//! accompany them. It handles deserialization of YAML configurations, resolves
//! file-level scope defaults into per-rule scopes, and normalizes out-of-range
//! scope values at the boundary so the engine only ever sees a valid enum.
//!
//! License: MIT OR APACHE 2.0

use anyhow::{Context as _, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::errors::{CompileError, RetextError};
use crate::rules::compiler::compile_rules_with_diagnostics;

/// Maximum allowed length for a `find` string, in bytes.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Which rendering context a rule is eligible to run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    All,
    Frontend,
    Admin,
}

impl Scope {
    /// Parses a scope as written in a configuration file.
    ///
    /// Anything that is not `all`, `frontend` or `admin` falls back to `All`.
    pub fn from_config_str(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Scope::All,
            "frontend" => Scope::Frontend,
            "admin" => Scope::Admin,
            other => {
                warn!("Unknown scope '{}' normalized to 'all'.", other);
                Scope::All
            }
        }
    }

    /// True when a rule with this scope runs in `context`.
    pub fn admits(self, context: Context) -> bool {
        match self {
            Scope::All => true,
            Scope::Frontend => context == Context::Frontend,
            Scope::Admin => context == Context::Admin,
        }
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Scope::from_config_str(&raw))
    }
}

/// The rendering context of one invocation, supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Context {
    Frontend,
    Admin,
}

impl Context {
    pub fn as_str(self) -> &'static str {
        match self {
            Context::Frontend => "frontend",
            Context::Admin => "admin",
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Context {
    type Err = RetextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "frontend" => Ok(Context::Frontend),
            "admin" => Ok(Context::Admin),
            _ => Err(RetextError::InvalidContext(s.to_string())),
        }
    }
}

/// A single find/replace rule as an operator wrote it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct RawRule {
    /// Literal text, or a regular expression when `is_regex` is set.
    pub find: String,
    /// Replacement text. Regex rules may reference capture groups (`$1`, `${name}`).
    pub replace: String,
    pub is_regex: bool,
    pub case_insensitive: bool,
    pub scope: Scope,
}

impl RawRule {
    /// Shorthand for a whole-word literal rule that applies everywhere.
    pub fn literal(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
            ..Default::default()
        }
    }

    /// Shorthand for a regex rule that applies everywhere.
    pub fn regex(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
            is_regex: true,
            ..Default::default()
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }
}

/// Settings for the markup-aware substitutor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct HtmlConfig {
    /// When set, any parse error reported for a fragment leaves it untouched.
    pub reject_on_parse_errors: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self { reject_on_parse_errors: true }
    }
}

/// Settings for the optional substitution cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 300, capacity: 512 }
    }
}

/// Container for all engine-specific configurations.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub html: HtmlConfig,
    pub cache: CacheConfig,
}

/// One rule entry as it appears on disk; `scope` may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RuleEntry {
    #[serde(alias = "from")]
    find: String,
    #[serde(alias = "to")]
    replace: String,
    is_regex: bool,
    case_insensitive: bool,
    scope: Option<Scope>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    scope: Scope,
    rules: Vec<RuleEntry>,
    engines: EngineConfig,
}

impl From<ConfigFile> for RetextConfig {
    fn from(file: ConfigFile) -> Self {
        let default_scope = file.scope;
        let rules = file
            .rules
            .into_iter()
            .map(|entry| RawRule {
                find: entry.find,
                replace: entry.replace,
                is_regex: entry.is_regex,
                case_insensitive: entry.case_insensitive,
                scope: entry.scope.unwrap_or(default_scope),
            })
            .collect();
        RetextConfig {
            rules,
            engines: file.engines,
        }
    }
}

/// Represents the top-level configuration structure for ReText.
///
/// Rule order is significant: rules are applied in sequence, each one
/// operating on the output of the previous.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "ConfigFile")]
pub struct RetextConfig {
    pub rules: Vec<RawRule>,
    pub engines: EngineConfig,
}

impl RetextConfig {
    /// Loads a configuration from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading rules from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::load_from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Loaded {} rules from file {}.", config.rules.len(), path.display());
        Ok(config)
    }

    /// Parses a configuration from YAML text.
    pub fn load_from_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            debug!("Empty configuration text, using defaults.");
            return Ok(Self::default());
        }
        let config: RetextConfig =
            serde_yml::from_str(yaml).context("Invalid ReText configuration")?;
        Ok(config)
    }

    /// Builds a configuration whose rules all share one scope.
    pub fn with_uniform_scope(rules: Vec<RawRule>, scope: Scope) -> Self {
        Self {
            rules: rules.into_iter().map(|r| r.with_scope(scope)).collect(),
            engines: EngineConfig::default(),
        }
    }

    /// Compiles every rule and returns the reasons any of them were dropped.
    ///
    /// An empty result means every rule compiles.
    pub fn validate(&self) -> Vec<CompileError> {
        let (_, errors) = compile_rules_with_diagnostics(&self.rules);
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_admits_context() {
        assert!(Scope::All.admits(Context::Frontend));
        assert!(Scope::All.admits(Context::Admin));
        assert!(Scope::Frontend.admits(Context::Frontend));
        assert!(!Scope::Frontend.admits(Context::Admin));
        assert!(!Scope::Admin.admits(Context::Frontend));
    }

    #[test]
    fn test_unknown_scope_normalizes_to_all() {
        assert_eq!(Scope::from_config_str("everywhere"), Scope::All);
        assert_eq!(Scope::from_config_str(" Admin "), Scope::Admin);
    }

    #[test]
    fn test_context_from_str() {
        assert_eq!("FRONTEND".parse::<Context>().unwrap(), Context::Frontend);
        assert!("public".parse::<Context>().is_err());
    }

    #[test]
    fn test_file_scope_is_default_for_rules() -> Result<()> {
        let yaml = r#"
scope: admin
rules:
  - find: cat
    replace: dog
  - find: bird
    replace: fish
    scope: frontend
"#;
        let config = RetextConfig::load_from_str(yaml)?;
        assert_eq!(config.rules[0].scope, Scope::Admin);
        assert_eq!(config.rules[1].scope, Scope::Frontend);
        assert!(!config.rules[0].is_regex);
        assert!(!config.rules[0].case_insensitive);
        Ok(())
    }

    #[test]
    fn test_legacy_from_to_keys() -> Result<()> {
        let config = RetextConfig::load_from_str("rules:\n  - from: a\n    to: b\n")?;
        assert_eq!(config.rules[0].find, "a");
        assert_eq!(config.rules[0].replace, "b");
        Ok(())
    }
}
