// File: retext-core/src/replacer.rs
//! `Replacer` is the per-context entry point: it is built once for one
//! rendering context (one request or page load), owns that context's active
//! rules, and is dropped when the context ends. Nothing is shared across
//! contexts.

use log::debug;
use std::borrow::Cow;

use crate::cache::SubstitutionCache;
use crate::client::payload::ClientPayload;
use crate::config::{Context, HtmlConfig, RetextConfig};
use crate::engine::TextSubstitutor;
use crate::engines::html_text::{strip_tags, HtmlTextSubstitutor};
use crate::engines::plain_text::PlainTextSubstitutor;
use crate::extension_points::{ExtensionPoint, SinkKind};
use crate::rules::{compile_rules, filter_for_context, ActiveRuleSet, RuleSet};

/// Applies one context's active rules to host fields.
#[derive(Debug, Clone)]
pub struct Replacer {
    rules: ActiveRuleSet,
    plain: PlainTextSubstitutor,
    html: HtmlTextSubstitutor,
}

impl Replacer {
    /// Compiles `config` and keeps the rules that apply in `context`.
    pub fn new(config: &RetextConfig, context: Context) -> Self {
        let rule_set = compile_rules(&config.rules);
        Self::from_rule_set(&rule_set, context, &config.engines.html)
    }

    pub fn from_rule_set(rules: &RuleSet, context: Context, html: &HtmlConfig) -> Self {
        let active = filter_for_context(context, rules);
        if active.is_empty() {
            debug!("No rules active for '{}'; replacer is a no-op.", context);
        }
        Self {
            rules: active,
            plain: PlainTextSubstitutor,
            html: HtmlTextSubstitutor::new(html),
        }
    }

    pub fn context(&self) -> Context {
        self.rules.context()
    }

    pub fn active_rules(&self) -> &ActiveRuleSet {
        &self.rules
    }

    /// True when no rule is active; every operation then returns its input.
    pub fn is_inert(&self) -> bool {
        self.rules.is_empty()
    }

    /// Plain-text sink: URL-like values are left alone.
    pub fn replace_plain<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.plain.substitute(text, &self.rules)
    }

    /// Markup sink: only text nodes outside `<script>`/`<style>` change.
    pub fn replace_html<'t>(&self, html: &'t str) -> Cow<'t, str> {
        self.html.substitute(html, &self.rules)
    }

    /// Treats `text` as markup if stripping tags changes it, else as plain text.
    pub fn replace_detect<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if self.is_inert() {
            return Cow::Borrowed(text);
        }
        if strip_tags(text) != text {
            self.replace_html(text)
        } else {
            self.replace_plain(text)
        }
    }

    pub fn replace_sink<'t>(&self, sink: SinkKind, text: &'t str) -> Cow<'t, str> {
        match sink {
            SinkKind::PlainText => self.replace_plain(text),
            SinkKind::Html => self.replace_html(text),
            SinkKind::Detect => self.replace_detect(text),
        }
    }

    /// Runs `text` through the transform bound to `point`.
    pub fn replace_field<'t>(&self, point: ExtensionPoint, text: &'t str) -> Cow<'t, str> {
        self.replace_sink(point.sink(), text)
    }

    /// Picks the plural form when `count != 1`, then substitutes it.
    pub fn replace_plural<'t>(&self, single: &'t str, plural: &'t str, count: u64) -> Cow<'t, str> {
        let chosen = if count != 1 { plural } else { single };
        self.replace_plain(chosen)
    }

    /// Substitutes each part of a document title independently.
    pub fn replace_title_parts(&self, parts: &[String]) -> Vec<String> {
        parts
            .iter()
            .map(|part| self.replace_plain(part).into_owned())
            .collect()
    }

    /// Like [`Replacer::replace_field`], memoized in a caller-owned cache.
    ///
    /// `field_id` identifies the field instance (for example `post:42`).
    pub fn replace_field_cached(
        &self,
        cache: &mut SubstitutionCache,
        field_id: &str,
        point: ExtensionPoint,
        text: &str,
    ) -> String {
        if self.is_inert() || text.is_empty() {
            return text.to_string();
        }
        let key = format!("{}#{}", point.identifier(), field_id);
        cache.get_or_insert_with(&key, self.rules.fingerprint(), text, || {
            self.replace_field(point, text).into_owned()
        })
    }

    /// The client data contract for this context's rules.
    pub fn client_payload(&self) -> ClientPayload {
        ClientPayload::from_rules(&self.rules)
    }
}
