//! Narrows a rule set to the rules eligible in one rendering context.

use log::debug;
use sha2::{Digest, Sha256};

use crate::config::Context;
use crate::rules::compiler::{CompiledRule, RuleSet};

/// The rules of a [`RuleSet`] whose scope admits one [`Context`], in their
/// original order.
///
/// Derived per context and never persisted.
#[derive(Debug, Clone)]
pub struct ActiveRuleSet {
    context: Context,
    rules: Vec<CompiledRule>,
    fingerprint: String,
}

impl ActiveRuleSet {
    /// An active set with no rules; every substitution against it is a no-op.
    pub fn empty(context: Context) -> Self {
        Self {
            context,
            rules: Vec::new(),
            fingerprint: String::new(),
        }
    }

    pub fn context(&self) -> Context {
        self.context
    }

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

    /// Identifies this exact rule list for cache keys.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Keeps the rules whose scope is `All` or equal to `context`.
pub fn filter_for_context(context: Context, rules: &RuleSet) -> ActiveRuleSet {
    let active: Vec<CompiledRule> = rules
        .iter()
        .filter(|rule| rule.scope.admits(context))
        .cloned()
        .collect();

    debug!(
        "{} of {} rules active for context '{}'.",
        active.len(),
        rules.len(),
        context
    );

    let fingerprint = if active.is_empty() {
        String::new()
    } else {
        let mut hasher = Sha256::new();
        hasher.update(rules.fingerprint().as_bytes());
        hasher.update(b":");
        hasher.update(context.as_str().as_bytes());
        hex::encode(hasher.finalize())
    };

    ActiveRuleSet {
        context,
        rules: active,
        fingerprint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RawRule, Scope};
    use crate::rules::compiler::compile_rules;

    fn mixed_rules() -> RuleSet {
        compile_rules(&[
            RawRule::literal("a", "1").with_scope(Scope::Admin),
            RawRule::literal("b", "2"),
            RawRule::literal("c", "3").with_scope(Scope::Frontend),
        ])
    }

    #[test]
    fn test_frontend_keeps_all_and_frontend() {
        let active = filter_for_context(Context::Frontend, &mixed_rules());
        let replacements: Vec<&str> = active.iter().map(|r| r.replace_with.as_str()).collect();
        assert_eq!(replacements, vec!["2", "3"]);
    }

    #[test]
    fn test_admin_keeps_all_and_admin() {
        let active = filter_for_context(Context::Admin, &mixed_rules());
        let replacements: Vec<&str> = active.iter().map(|r| r.replace_with.as_str()).collect();
        assert_eq!(replacements, vec!["1", "2"]);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let active = filter_for_context(Context::Admin, &RuleSet::default());
        assert!(active.is_empty());
        assert!(active.fingerprint().is_empty());
    }

    #[test]
    fn test_fingerprint_differs_per_context() {
        let rules = mixed_rules();
        let front = filter_for_context(Context::Frontend, &rules);
        let admin = filter_for_context(Context::Admin, &rules);
        assert_ne!(front.fingerprint(), admin.fingerprint());
    }
}
