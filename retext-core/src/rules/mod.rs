//! Rule handling: compilation, scope filtering, and chained application.
//!
//! `compiler` turns raw definitions into a [`RuleSet`], `scope` narrows a
//! rule set to the rules eligible in one rendering context, and `chain`
//! applies an ordered rule list to a string.

pub mod chain;
pub mod compiler;
pub mod scope;

pub use chain::apply_chain;
pub use compiler::{compile_rule, compile_rules, compile_rules_with_diagnostics, CompiledRule, RuleSet};
pub use scope::{filter_for_context, ActiveRuleSet};
