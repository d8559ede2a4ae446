// retext-core/src/engine.rs
//! Defines the `TextSubstitutor` trait shared by the plain-text and
//! markup-aware substitutors.
//!
//! Each extension point is bound to exactly one sink kind, and each sink kind
//! has exactly one pure `text -> text` transform implementing this trait.
//!
//! License: MIT OR APACHE 2.0

use std::borrow::Cow;

use crate::extension_points::SinkKind;
use crate::rules::ActiveRuleSet;

/// A pure, infallible text transform driven by an [`ActiveRuleSet`].
///
/// Implementations never fail: anything they cannot handle safely is returned
/// unchanged. Returning `Cow::Borrowed` signals that nothing was substituted.
pub trait TextSubstitutor: Send + Sync {
    /// The kind of sink this substitutor serves.
    fn sink_kind(&self) -> SinkKind;

    /// Applies `rules` to `text` in order, each rule seeing the previous
    /// rule's output.
    fn substitute<'t>(&self, text: &'t str, rules: &ActiveRuleSet) -> Cow<'t, str>;
}
