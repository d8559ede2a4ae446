// retext-core/src/engines/plain_text.rs
//! A `TextSubstitutor` for bare strings such as titles, menu labels and
//! translated UI strings.
//! License: MIT OR APACHE 2.0

use log::debug;
use std::borrow::Cow;

use crate::engine::TextSubstitutor;
use crate::extension_points::SinkKind;
use crate::rules::{apply_chain, ActiveRuleSet};
use crate::urlish::is_urlish;

/// Applies the active rule chain to a bare string, unless the string looks
/// like a URL, path or anchor.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextSubstitutor;

impl TextSubstitutor for PlainTextSubstitutor {
    fn sink_kind(&self) -> SinkKind {
        SinkKind::PlainText
    }

    fn substitute<'t>(&self, text: &'t str, rules: &ActiveRuleSet) -> Cow<'t, str> {
        if text.is_empty() || rules.is_empty() {
            return Cow::Borrowed(text);
        }
        if is_urlish(text) {
            debug!("Leaving URL-like value untouched ({} bytes).", text.len());
            return Cow::Borrowed(text);
        }
        apply_chain(text, rules.rules())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Context, RawRule};
    use crate::rules::{compile_rules, filter_for_context};

    fn active(rules: &[RawRule]) -> ActiveRuleSet {
        filter_for_context(Context::Frontend, &compile_rules(rules))
    }

    #[test]
    fn test_substitutes_prose() {
        let rules = active(&[RawRule::literal("cat", "dog")]);
        assert_eq!(PlainTextSubstitutor.substitute("the cat sat", &rules), "the dog sat");
    }

    #[test]
    fn test_urlish_values_pass_through() {
        let rules = active(&[RawRule::literal("cat", "dog")]);
        for input in ["https://cat.example", "/cat/food", "cat.php", "#cat"] {
            assert_eq!(PlainTextSubstitutor.substitute(input, &rules), input);
        }
    }

    #[test]
    fn test_empty_input_and_empty_rules() {
        let rules = active(&[RawRule::literal("cat", "dog")]);
        assert_eq!(PlainTextSubstitutor.substitute("", &rules), "");
        let none = ActiveRuleSet::empty(Context::Frontend);
        assert!(matches!(PlainTextSubstitutor.substitute("cat", &none), Cow::Borrowed("cat")));
    }
}
