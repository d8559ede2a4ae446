//! `retext check`: compile every rule and report the outcome.

use anyhow::{bail, Result};
use is_terminal::IsTerminal;
use log::info;
use std::io::{self, Write};

use retext_core::{compile_rule, compile_rules, filter_for_context, Context, RawRule, RetextConfig};

use crate::ui::output_format::write_styled;
use crate::ui::theme::{ThemeEntry, ThemeMap};

pub fn run_check(config: &RetextConfig, strict: bool, theme_map: &ThemeMap) -> Result<()> {
    info!("Checking {} rule(s).", config.rules.len());
    let stdout = io::stdout();
    let supports_color = stdout.is_terminal();
    let mut out = stdout.lock();

    let mut dropped = 0usize;
    for (index, raw) in config.rules.iter().enumerate() {
        match compile_rule(index, raw) {
            Ok(_) => {
                write_styled(&mut out, "  ok    ", ThemeEntry::Success, theme_map, supports_color)?;
                write!(out, "#{} ", index)?;
                write_styled(&mut out, &describe(raw), ThemeEntry::RulePattern, theme_map, supports_color)?;
                write_styled(&mut out, &format!(" [{}]", scope_label(raw)), ThemeEntry::RuleScope, theme_map, supports_color)?;
                writeln!(out)?;
            }
            Err(e) => {
                dropped += 1;
                write_styled(&mut out, "  drop  ", ThemeEntry::Error, theme_map, supports_color)?;
                writeln!(out, "{}", e)?;
            }
        }
    }

    let rule_set = compile_rules(&config.rules);
    let frontend = filter_for_context(Context::Frontend, &rule_set).len();
    let admin = filter_for_context(Context::Admin, &rule_set).len();
    writeln!(out)?;
    write_styled(&mut out, "Summary:", ThemeEntry::Header, theme_map, supports_color)?;
    writeln!(
        out,
        " {} rule(s), {} compiled, {} dropped; active in frontend: {}, admin: {}",
        config.rules.len(),
        config.rules.len() - dropped,
        dropped,
        frontend,
        admin
    )?;
    out.flush()?;

    if strict && dropped > 0 {
        bail!("{} rule(s) failed to compile", dropped);
    }
    Ok(())
}

fn describe(raw: &RawRule) -> String {
    let kind = if raw.is_regex { "regex" } else { "word" };
    let case = if raw.case_insensitive { ", ignore case" } else { "" };
    format!("{:?} -> {:?} ({}{})", raw.find, raw.replace, kind, case)
}

fn scope_label(raw: &RawRule) -> &'static str {
    match raw.scope {
        retext_core::Scope::All => "all",
        retext_core::Scope::Frontend => "frontend",
        retext_core::Scope::Admin => "admin",
    }
}
