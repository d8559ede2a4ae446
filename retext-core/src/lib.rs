// retext-core/src/lib.rs
//! # ReText Core Library
//!
//! `retext-core` provides the platform-independent logic for site-wide find/replace
//! over rendered text. It compiles operator-defined rules into validated matchers,
//! filters them by rendering context, and applies them to plain-text and markup
//! fields without touching URLs, tag names, attributes, or script/style bodies.
//!
//! The library performs no I/O beyond optional configuration loading. Substitution
//! never fails: on any problem it returns its input unchanged.
//!
//! ## Modules
//!
//! * `config`: `RawRule`, `Scope`, `Context` and the YAML-backed `RetextConfig`.
//! * `rules`: rule compilation, context filtering, and chained application.
//! * `urlish`: the heuristic that keeps URL-like plain text out of substitution.
//! * `engine`: the `TextSubstitutor` trait.
//! * `engines`: the plain-text and markup-aware substitutors.
//! * `extension_points`: the host fields that are rewritten and how.
//! * `replacer`: `Replacer`, the per-context entry point for host fields.
//! * `cache`: an optional caller-owned cache of substitution results.
//! * `client`: the browser payload, a live document model, and the incremental applier.
//! * `headless`: one-shot substitution of a single string.
//! * `errors`: `CompileError` and `RetextError`.
//!
//! ## Usage Example
//!
//! ```rust
//! use retext_core::{Context, ExtensionPoint, RawRule, Replacer, RetextConfig, Scope};
//!
//! let config = RetextConfig::with_uniform_scope(vec![RawRule::literal("cat", "dog")], Scope::All);
//! let replacer = Replacer::new(&config, Context::Frontend);
//!
//! assert_eq!(
//!     replacer.replace_field(ExtensionPoint::Content, r#"<a href="cat.php">cat</a>"#),
//!     r#"<a href="cat.php">dog</a>"#
//! );
//! assert_eq!(replacer.replace_field(ExtensionPoint::Title, "cat.php"), "cat.php");
//! ```
//!
//! ---
//! License: MIT OR APACHE 2.0

pub mod cache;
pub mod client;
pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod extension_points;
pub mod headless;
pub mod replacer;
pub mod rules;
pub mod urlish;

/// Re-exports the configuration types.
pub use config::{
    CacheConfig, Context, EngineConfig, HtmlConfig, RawRule, RetextConfig, Scope, MAX_PATTERN_LENGTH,
};

pub use errors::{CompileError, RetextError};

pub use engine::TextSubstitutor;
pub use engines::html_text::HtmlTextSubstitutor;
pub use engines::plain_text::PlainTextSubstitutor;

pub use rules::{
    apply_chain, compile_rule, compile_rules, compile_rules_with_diagnostics, filter_for_context,
    ActiveRuleSet, CompiledRule, RuleSet,
};

pub use extension_points::{ExtensionPoint, SinkKind, EXTENSION_POINTS};
pub use replacer::Replacer;
pub use cache::SubstitutionCache;
pub use urlish::is_urlish;

/// Re-exports the browser-side contract and applier.
pub use client::{ClientPayload, ClientRule, ClientSideApplier, LiveDocument, MutationRecord};

pub use headless::headless_replace_string;
