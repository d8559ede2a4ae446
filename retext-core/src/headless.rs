// File: retext-core/src/headless.rs

//! `headless.rs`
//! Convenience wrapper for one-shot substitution outside a host request.
//! Compiles the configuration, filters it for one context, and runs a single
//! string through the chosen sink.

use crate::config::{Context, RetextConfig};
use crate::extension_points::SinkKind;
use crate::replacer::Replacer;

/// Applies every rule active in `context` to `input`.
///
/// # Arguments
///
/// * `config` - The loaded configuration. Invalid rules are skipped, never fatal.
/// * `context` - The rendering context whose rules apply.
/// * `input` - The text to rewrite.
/// * `sink` - How `input` is treated: plain text, markup, or detected.
pub fn headless_replace_string(
    config: &RetextConfig,
    context: Context,
    input: &str,
    sink: SinkKind,
) -> String {
    let replacer = Replacer::new(config, context);
    replacer.replace_sink(sink, input).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RawRule, Scope};
    use anyhow::Result;

    #[test]
    fn test_headless_replace_plain() -> Result<()> {
        let config = RetextConfig::load_from_str(
            r#"
rules:
  - find: "color"
    replace: "colour"
    case_insensitive: true
"#,
        )?;
        let out = headless_replace_string(&config, Context::Frontend, "Color and COLORFUL", SinkKind::PlainText);
        assert_eq!(out, "colour and COLORFUL");
        Ok(())
    }

    #[test]
    fn test_headless_replace_html_keeps_attributes() {
        let config = RetextConfig::with_uniform_scope(vec![RawRule::literal("cat", "dog")], Scope::All);
        let out = headless_replace_string(
            &config,
            Context::Admin,
            r#"<a href="cat.php">cat</a>"#,
            SinkKind::Html,
        );
        assert_eq!(out, r#"<a href="cat.php">dog</a>"#);
    }

    #[test]
    fn test_headless_without_rules_is_identity() {
        let config = RetextConfig::default();
        let input = "<p>anything at all</p>";
        assert_eq!(headless_replace_string(&config, Context::Frontend, input, SinkKind::Detect), input);
    }
}
