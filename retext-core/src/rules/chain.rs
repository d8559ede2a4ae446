//! Chained, in-order application of a rule list.
//!
//! Each rule runs against the output of the rule before it, so a later rule
//! can match text that an earlier rule just inserted. Rules `a -> b` then
//! `b -> c` turn `a` into `c` in a single pass. That is the contract callers
//! get; the rules are not isolated from each other.

use log::trace;
use std::borrow::Cow;

use crate::rules::compiler::CompiledRule;

/// Runs every rule over `text` in order.
///
/// Returns `Cow::Borrowed(text)` when no rule changed anything, so callers can
/// cheaply tell whether a substitution happened.
pub fn apply_chain<'t>(text: &'t str, rules: &[CompiledRule]) -> Cow<'t, str> {
    if text.is_empty() {
        return Cow::Borrowed(text);
    }

    let mut current: Cow<'t, str> = Cow::Borrowed(text);
    for rule in rules {
        let replaced = match rule.replace(&current) {
            Cow::Owned(s) => Some(s),
            Cow::Borrowed(_) => None,
        };
        if let Some(s) = replaced {
            trace!("Rule '{}' rewrote a {}-byte segment.", rule.pattern(), current.len());
            current = Cow::Owned(s);
        }
    }

    // A rule may replace text with identical text; report that as unchanged.
    match current {
        Cow::Owned(s) if s == text => Cow::Borrowed(text),
        other => other,
    }
}
