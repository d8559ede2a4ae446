//! compiler.rs - Turns raw rule definitions into validated matchers.
//!
//! Literal rules are escaped and wrapped in word-boundary anchors so they only
//! ever match whole words. Regex rules are taken verbatim. Unicode matching is
//! always on; case folding is opt-in per rule.
//!
//! A rule that fails to compile is logged and skipped. Compilation failures
//! are never fatal to the batch.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use regex::{NoExpand, Regex, RegexBuilder};
use sha2::{Digest, Sha256};
use std::borrow::Cow;

use crate::client::payload::js_to_rust_replacement;
use crate::config::{RawRule, Scope, MAX_PATTERN_LENGTH};
use crate::errors::CompileError;

/// Upper bound on the compiled size of any single rule's regex.
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// A single rule reduced to a validated pattern and its replacement.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    /// The compiled regular expression used for matching.
    pub regex: Regex,
    /// The text each match is replaced with.
    pub replace_with: String,
    /// Where this rule is allowed to run.
    pub scope: Scope,
    /// Whether `$1` / `${name}` in `replace_with` refer to capture groups.
    pub expand_captures: bool,
    /// Replace every match (`true`) or only the first one.
    pub global: bool,
    pub case_insensitive: bool,
}

impl CompiledRule {
    /// Applies this rule once to `text`.
    ///
    /// Returns `Cow::Borrowed` when nothing matched.
    pub fn replace<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let limit = if self.global { 0 } else { 1 };
        if self.expand_captures {
            self.regex.replacen(text, limit, self.replace_with.as_str())
        } else {
            self.regex.replacen(text, limit, NoExpand(&self.replace_with))
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The pattern source this rule was built from.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

/// An ordered collection of compiled rules.
///
/// Order is significant: later rules see the output of earlier ones.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
    fingerprint: String,
}

impl RuleSet {
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompiledRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Hex SHA-256 over the ordered raw definitions this set was compiled from.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Compiles a single rule definition. `index` is only used for diagnostics.
pub fn compile_rule(index: usize, raw: &RawRule) -> Result<CompiledRule, CompileError> {
    let trimmed = raw.find.trim();
    if trimmed.is_empty() {
        return Err(CompileError::EmptyFind(index));
    }
    if raw.find.len() > MAX_PATTERN_LENGTH {
        return Err(CompileError::PatternLengthExceeded(
            index,
            raw.find.len(),
            MAX_PATTERN_LENGTH,
        ));
    }

    let pattern = if raw.is_regex {
        raw.find.clone()
    } else {
        format!(r"\b{}\b", regex::escape(trimmed))
    };

    let regex = RegexBuilder::new(&pattern)
        .unicode(true)
        .case_insensitive(raw.case_insensitive)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
        .map_err(|source| CompileError::InvalidPattern {
            index,
            find: raw.find.clone(),
            source,
        })?;

    Ok(CompiledRule {
        regex,
        replace_with: raw.replace.clone(),
        scope: raw.scope,
        expand_captures: raw.is_regex,
        global: true,
        case_insensitive: raw.case_insensitive,
    })
}

/// Compiles a batch of rules, skipping (and logging) any that fail.
pub fn compile_rules(raws: &[RawRule]) -> RuleSet {
    compile_rules_with_diagnostics(raws).0
}

/// Like [`compile_rules`], but also hands back the reasons rules were dropped.
pub fn compile_rules_with_diagnostics(raws: &[RawRule]) -> (RuleSet, Vec<CompileError>) {
    debug!("Starting compilation of {} rules.", raws.len());

    let mut rules = Vec::with_capacity(raws.len());
    let mut errors = Vec::new();

    for (index, raw) in raws.iter().enumerate() {
        match compile_rule(index, raw) {
            Ok(rule) => {
                debug!(
                    target: "retext_core::compiler",
                    "Rule #{} compiled to pattern '{}'.",
                    index,
                    rule.pattern()
                );
                rules.push(rule);
            }
            Err(e) => {
                warn!(target: "retext_core::compiler", "Skipping rule: {}", e);
                errors.push(e);
            }
        }
    }

    debug!(
        "Finished compiling rules. Compiled: {}, skipped: {}.",
        rules.len(),
        errors.len()
    );

    let set = RuleSet {
        rules,
        fingerprint: fingerprint_rules(raws),
    };
    (set, errors)
}

/// Flags understood by browser-side rules.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ClientFlags {
    global: bool,
    case_insensitive: bool,
    multi_line: bool,
    dot_matches_new_line: bool,
}

fn parse_client_flags(index: usize, flags: &str) -> Result<ClientFlags, CompileError> {
    let mut parsed = ClientFlags::default();
    let mut seen: Vec<char> = Vec::with_capacity(flags.len());
    for c in flags.chars() {
        if seen.contains(&c) {
            return Err(CompileError::DuplicateFlag(index, c));
        }
        seen.push(c);
        match c {
            'g' => parsed.global = true,
            'i' => parsed.case_insensitive = true,
            'm' => parsed.multi_line = true,
            's' => parsed.dot_matches_new_line = true,
            // Unicode matching is always on.
            'u' => {}
            other => return Err(CompileError::UnsupportedFlag(index, other)),
        }
    }
    Ok(parsed)
}

/// Compiles one `{find, flags, replace}` triple from the client data contract.
///
/// `replace` uses JavaScript replacement syntax (`$&`, `$1`, `$<name>`).
pub fn compile_client_rule(
    index: usize,
    find: &str,
    flags: &str,
    replace: &str,
) -> Result<CompiledRule, CompileError> {
    if find.is_empty() {
        return Err(CompileError::EmptyFind(index));
    }
    let parsed = parse_client_flags(index, flags)?;
    let regex = RegexBuilder::new(find)
        .unicode(true)
        .case_insensitive(parsed.case_insensitive)
        .multi_line(parsed.multi_line)
        .dot_matches_new_line(parsed.dot_matches_new_line)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
        .map_err(|source| CompileError::InvalidPattern {
            index,
            find: find.to_string(),
            source,
        })?;

    Ok(CompiledRule {
        regex,
        replace_with: js_to_rust_replacement(replace),
        scope: Scope::All,
        expand_captures: true,
        global: parsed.global,
        case_insensitive: parsed.case_insensitive,
    })
}

fn fingerprint_rules(raws: &[RawRule]) -> String {
    let mut hasher = Sha256::new();
    for raw in raws {
        hasher.update(raw.find.as_bytes());
        hasher.update([0u8]);
        hasher.update(raw.replace.as_bytes());
        hasher.update([0u8, raw.is_regex as u8, raw.case_insensitive as u8]);
        hasher.update(format!("{:?}", raw.scope).as_bytes());
        hasher.update([0x1e]);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_rule_matches_whole_words_only() {
        let rule = compile_rule(0, &RawRule::literal("cat", "dog")).unwrap();
        assert!(rule.is_match("cat"));
        assert!(rule.is_match("the cat sat"));
        assert!(!rule.is_match("category"));
        assert!(!rule.is_match("bobcat"));
    }

    #[test]
    fn test_literal_rule_escapes_metacharacters() {
        let rule = compile_rule(0, &RawRule::literal("a.b", "x")).unwrap();
        assert!(rule.is_match("see a.b here"));
        assert!(!rule.is_match("see axb here"));
    }

    #[test]
    fn test_literal_replacement_is_not_expanded() {
        let rule = compile_rule(0, &RawRule::literal("price", "$1 each")).unwrap();
        assert_eq!(rule.replace("the price"), "the $1 each");
    }

    #[test]
    fn test_regex_replacement_expands_captures() {
        let rule = compile_rule(0, &RawRule::regex(r"(\d+) cats", "$1 dogs")).unwrap();
        assert_eq!(rule.replace("3 cats"), "3 dogs");
    }

    #[test]
    fn test_unicode_word_boundaries() {
        let rule = compile_rule(0, &RawRule::literal("café", "bar")).unwrap();
        assert_eq!(rule.replace("un café noir"), "un bar noir");
        assert!(!rule.is_match("cafés"));
    }

    #[test]
    fn test_case_insensitive_flag() {
        let rule = compile_rule(0, &RawRule::literal("color", "colour").case_insensitive()).unwrap();
        assert_eq!(rule.replace("Color and COLORFUL"), "colour and COLORFUL");
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let err = compile_rule(4, &RawRule::regex("(unclosed", "x")).unwrap_err();
        assert!(matches!(err, CompileError::InvalidPattern { index: 4, .. }));
    }

    #[test]
    fn test_blank_find_is_rejected() {
        let err = compile_rule(1, &RawRule::literal("   ", "x")).unwrap_err();
        assert!(matches!(err, CompileError::EmptyFind(1)));
    }

    #[test]
    fn test_overlong_find_is_rejected() {
        let find = "a".repeat(MAX_PATTERN_LENGTH + 1);
        let err = compile_rule(0, &RawRule::literal(find, "x")).unwrap_err();
        assert!(matches!(err, CompileError::PatternLengthExceeded(0, _, _)));
    }

    #[test]
    fn test_batch_skips_bad_rules_and_keeps_order() {
        let raws = vec![
            RawRule::literal("a", "1"),
            RawRule::regex("[", "2"),
            RawRule::literal("b", "3"),
        ];
        let (set, errors) = compile_rules_with_diagnostics(&raws);
        assert_eq!(set.len(), 2);
        assert_eq!(set.rules()[0].replace_with, "1");
        assert_eq!(set.rules()[1].replace_with, "3");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule_index(), 1);
    }

    #[test]
    fn test_fingerprint_tracks_rule_order() {
        let a = compile_rules(&[RawRule::literal("a", "1"), RawRule::literal("b", "2")]);
        let b = compile_rules(&[RawRule::literal("b", "2"), RawRule::literal("a", "1")]);
        let c = compile_rules(&[RawRule::literal("a", "1"), RawRule::literal("b", "2")]);
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_client_flags() {
        let first_only = compile_client_rule(0, "o", "", "0").unwrap();
        assert_eq!(first_only.replace("foo"), "f0o");
        let all = compile_client_rule(0, "o", "gi", "0").unwrap();
        assert_eq!(all.replace("fOo"), "f00");
        assert!(matches!(
            compile_client_rule(0, "o", "gy", "0"),
            Err(CompileError::UnsupportedFlag(0, 'y'))
        ));
        assert!(matches!(
            compile_client_rule(0, "o", "gg", "0"),
            Err(CompileError::DuplicateFlag(0, 'g'))
        ));
    }
}
