//! The client data contract: the serialized `{find, flags, replace}` list
//! embedded in a page for the browser-side applier.
//!
//! `replace` is written in JavaScript replacement syntax (`$$`, `$&`, `$1`,
//! `$<name>`). The helpers here translate to and from the syntax the `regex`
//! crate expands (`$$`, `${0}`, `${1}`, `${name}`).

use serde::{Deserialize, Serialize};

use crate::errors::RetextError;
use crate::rules::ActiveRuleSet;

/// One rule as the browser-side applier receives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRule {
    pub find: String,
    #[serde(default)]
    pub flags: String,
    #[serde(default)]
    pub replace: String,
}

/// The full list of client rules, in application order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPayload {
    #[serde(default)]
    pub rules: Vec<ClientRule>,
}

/// Accepts `{"rules": [...]}`, a bare `[...]`, or `null`.
#[derive(Deserialize)]
#[serde(untagged)]
enum PayloadShape {
    Wrapped(ClientPayload),
    Bare(Vec<ClientRule>),
    Missing,
}

impl ClientPayload {
    /// Builds the payload for the rules active in one context.
    pub fn from_rules(active: &ActiveRuleSet) -> Self {
        let rules = active
            .iter()
            .map(|rule| {
                let mut flags = String::from("gu");
                if rule.case_insensitive {
                    flags.push('i');
                }
                ClientRule {
                    find: rule.pattern().to_string(),
                    flags,
                    replace: rust_to_js_replacement(&rule.replace_with, !rule.expand_captures),
                }
            })
            .collect();
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn to_json(&self) -> Result<String, RetextError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a payload. Blank input yields an empty payload.
    pub fn from_json(json: &str) -> Result<Self, RetextError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let payload = match serde_json::from_str::<PayloadShape>(json)? {
            PayloadShape::Wrapped(payload) => payload,
            PayloadShape::Bare(rules) => Self { rules },
            PayloadShape::Missing => Self::default(),
        };
        Ok(payload)
    }

    /// Renders `<script>var NAME = {...};</script>` with `</` escaped so the
    /// JSON cannot terminate the element early.
    pub fn to_inline_script(&self, var_name: &str) -> Result<String, RetextError> {
        let json = self.to_json()?.replace("</", r"<\/");
        Ok(format!("<script>var {} = {};</script>", var_name, json))
    }
}

/// Translates a JavaScript replacement string into `regex` crate syntax.
pub fn js_to_rust_replacement(js: &str) -> String {
    let chars: Vec<char> = js.chars().collect();
    let mut out = String::with_capacity(js.len() + 4);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.get(i).copied() {
            Some('$') => {
                out.push_str("$$");
                i += 1;
            }
            Some('&') => {
                out.push_str("${0}");
                i += 1;
            }
            Some(d) if d.is_ascii_digit() => {
                let mut end = i + 1;
                if chars.get(end).is_some_and(|c| c.is_ascii_digit()) {
                    end += 1;
                }
                let digits: String = chars[i..end].iter().collect();
                if digits.parse::<u32>().unwrap_or(0) == 0 {
                    out.push_str("$$");
                } else {
                    out.push_str("${");
                    out.push_str(&digits);
                    out.push('}');
                    i = end;
                }
            }
            Some('<') => {
                let close = chars[i + 1..].iter().position(|c| *c == '>');
                match close {
                    Some(len) if len > 0 => {
                        let name: String = chars[i + 1..i + 1 + len].iter().collect();
                        out.push_str("${");
                        out.push_str(&name);
                        out.push('}');
                        i += len + 2;
                    }
                    _ => out.push_str("$$"),
                }
            }
            _ => out.push_str("$$"),
        }
    }
    out
}

/// Translates a `regex` crate replacement string into JavaScript syntax.
///
/// With `literal` set the replacement is escaped so JavaScript inserts it
/// verbatim.
pub fn rust_to_js_replacement(rust: &str, literal: bool) -> String {
    if literal {
        return rust.replace('$', "$$");
    }

    let chars: Vec<char> = rust.chars().collect();
    let mut out = String::with_capacity(rust.len() + 4);
    let mut i = 0;
    let is_name_char = |c: &char| c.is_ascii_alphanumeric() || *c == '_';

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if c != '$' {
            out.push(c);
            continue;
        }
        let (name, consumed) = match chars.get(i) {
            Some('$') => {
                out.push_str("$$");
                i += 1;
                continue;
            }
            Some('{') => match chars[i + 1..].iter().position(|c| *c == '}') {
                Some(len) if len > 0 => (chars[i + 1..i + 1 + len].iter().collect::<String>(), len + 2),
                _ => (String::new(), 0),
            },
            Some(_) => {
                let len = chars[i..].iter().take_while(|c| is_name_char(*c)).count();
                (chars[i..i + len].iter().collect::<String>(), len)
            }
            None => (String::new(), 0),
        };
        i += consumed;

        if name.is_empty() {
            out.push_str("$$");
        } else if name == "0" {
            out.push_str("$&");
        } else if name.chars().all(|c| c.is_ascii_digit()) {
            out.push('$');
            out.push_str(&name);
        } else {
            out.push_str("$<");
            out.push_str(&name);
            out.push('>');
        }
    }
    out
}
