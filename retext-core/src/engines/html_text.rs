// retext-core/src/engines/html_text.rs
//! A `TextSubstitutor` for markup fragments such as post bodies, excerpts and
//! rendered menus.
//!
//! Only character data between tags is rewritten. Tag names, attribute
//! values, comments and doctypes are never inspected, and every byte outside
//! a rewritten text run is copied from the input unchanged: quoting, tag case,
//! self-closing slashes and omitted end tags all survive. Text inside
//! `<script>` and `<style>` is skipped, as is whitespace-only text. Character
//! references such as `&copy;` are kept as written and never matched.
//!
//! By default the fragment is first checked with a lenient HTML5 parser and
//! left alone if the parser reports any error. In fragment parsing that
//! includes document-level tags (`<html>`, `<head>`, `<body>`) and table
//! cells outside a table, so a whole page or a stray `<td>` comes back
//! unchanged. Set `engines.html.reject_on_parse_errors: false` to rewrite
//! such input anyway.
//!
//! License: MIT OR APACHE 2.0

use ego_tree::NodeRef;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Node};
use std::borrow::Cow;
use std::ops::Range;

use crate::config::HtmlConfig;
use crate::engine::TextSubstitutor;
use crate::extension_points::SinkKind;
use crate::rules::{apply_chain, ActiveRuleSet};

/// Elements whose text content is never substituted.
const NON_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements whose content is text up to the matching end tag, even if it
/// looks like markup.
const ESCAPABLE_RAW_TEXT_ELEMENTS: &[&str] = &["textarea", "title"];

/// Anything that starts like a tag, comment, doctype or processing
/// instruction, up to its closing `>` (or the end of input if unterminated).
static MARKUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[A-Za-z/!?][^>]*(?:>|\z)").expect("markup pattern is valid")
});

/// One markup token. Quoted attribute values may contain `>`.
static MARKUP_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)<!--.*?(?:-->|\z)|<[!?][^>]*(?:>|\z)|</?[A-Za-z](?:[^>"']|"[^"]*(?:"|\z)|'[^']*(?:'|\z))*(?:>|\z)"#,
    )
    .expect("markup token pattern is valid")
});

static START_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A<([A-Za-z][^\s/>]*)").expect("start tag pattern is valid"));

static CHARACTER_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#[0-9]+|#[xX][0-9A-Fa-f]+|[A-Za-z][A-Za-z0-9]*);")
        .expect("character reference pattern is valid")
});

/// True when `s` contains anything that looks like markup.
pub fn has_markup(s: &str) -> bool {
    MARKUP.is_match(s)
}

/// Removes everything that looks like markup from `s`.
pub fn strip_tags(s: &str) -> Cow<'_, str> {
    MARKUP.replace_all(s, "")
}

/// Applies the active rule chain to the text runs of a markup fragment.
#[derive(Debug, Clone, Copy)]
pub struct HtmlTextSubstitutor {
    reject_on_parse_errors: bool,
}

impl Default for HtmlTextSubstitutor {
    fn default() -> Self {
        Self::new(&HtmlConfig::default())
    }
}

impl HtmlTextSubstitutor {
    pub fn new(config: &HtmlConfig) -> Self {
        Self {
            reject_on_parse_errors: config.reject_on_parse_errors,
        }
    }

    /// A substitutor that rewrites fragments even when the parser had to
    /// recover from errors.
    pub fn lenient() -> Self {
        Self {
            reject_on_parse_errors: false,
        }
    }
}

impl TextSubstitutor for HtmlTextSubstitutor {
    fn sink_kind(&self) -> SinkKind {
        SinkKind::Html
    }

    fn substitute<'t>(&self, html: &'t str, rules: &ActiveRuleSet) -> Cow<'t, str> {
        if html.is_empty() || rules.is_empty() {
            return Cow::Borrowed(html);
        }

        // No tags at all: treat it as prose. Content fields are not URL-protected.
        if !has_markup(html) {
            return apply_chain(html, rules.rules());
        }

        if self.reject_on_parse_errors {
            let fragment = Html::parse_fragment(html);
            if !fragment.errors.is_empty() {
                debug!(
                    "Fragment reported {} parse error(s); leaving it unchanged.",
                    fragment.errors.len()
                );
                return Cow::Borrowed(html);
            }
        }

        let mut out = String::new();
        let mut copied_up_to = 0;
        let mut changed = 0usize;
        for span in text_spans(html) {
            let raw = &html[span.clone()];
            if raw.trim().is_empty() {
                continue;
            }
            if let Some(rewritten) = rewrite_text_run(raw, rules) {
                out.push_str(&html[copied_up_to..span.start]);
                out.push_str(&rewritten);
                copied_up_to = span.end;
                changed += 1;
            }
        }

        if changed == 0 {
            return Cow::Borrowed(html);
        }
        out.push_str(&html[copied_up_to..]);
        debug!("Rewrote {} text run(s) in a {}-byte fragment.", changed, html.len());
        Cow::Owned(out)
    }
}

/// Byte ranges of `html` that hold character data, in source order.
fn text_spans(html: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut pos = 0;
    while pos < html.len() {
        let Some(token) = MARKUP_TOKEN.find_at(html, pos) else {
            spans.push(pos..html.len());
            break;
        };
        if token.start() > pos {
            spans.push(pos..token.start());
        }
        pos = token.end();

        let Some(name) = START_TAG
            .captures(token.as_str())
            .and_then(|caps| caps.get(1))
            .map(|name| name.as_str().to_ascii_lowercase())
        else {
            continue;
        };
        let skipped = NON_TEXT_ELEMENTS.contains(&name.as_str());
        if !skipped && !ESCAPABLE_RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            continue;
        }
        let close = closing_tag_offset(&html[pos..], &name).map_or(html.len(), |offset| pos + offset);
        if !skipped && close > pos {
            spans.push(pos..close);
        }
        pos = close;
    }
    spans
}

/// Offset of the `</name` that ends a raw text element, matched without
/// regard to case.
fn closing_tag_offset(rest: &str, name: &str) -> Option<usize> {
    let needle = format!("</{}", name);
    rest.to_ascii_lowercase().find(&needle)
}

/// Runs the chain over one text run, leaving character references as
/// written. Returns `None` when no rule changed anything.
fn rewrite_text_run(raw: &str, rules: &ActiveRuleSet) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut changed = false;
    let mut last = 0;
    for reference in CHARACTER_REFERENCE.find_iter(raw) {
        changed |= push_substituted(&mut out, &raw[last..reference.start()], rules);
        out.push_str(reference.as_str());
        last = reference.end();
    }
    changed |= push_substituted(&mut out, &raw[last..], rules);
    changed.then_some(out)
}

fn push_substituted(out: &mut String, run: &str, rules: &ActiveRuleSet) -> bool {
    if run.is_empty() {
        return false;
    }
    match apply_chain(run, rules.rules()) {
        Cow::Borrowed(_) => {
            out.push_str(run);
            false
        }
        Cow::Owned(replaced) => {
            for c in replaced.chars() {
                match c {
                    '&' => out.push_str("&amp;"),
                    '<' => out.push_str("&lt;"),
                    _ => out.push(c),
                }
            }
            true
        }
    }
}

/// True when `node` sits beneath an element whose text must not be touched.
pub(crate) fn inside_non_text_element(node: NodeRef<'_, Node>, excluded: &[&str]) -> bool {
    node.ancestors().any(|ancestor| {
        ancestor
            .value()
            .as_element()
            .is_some_and(|element| excluded.contains(&element.name()))
    })
}
