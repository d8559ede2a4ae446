// retext-core/tests/config_integration_tests.rs
use anyhow::Result;
use std::io::Write;
use tempfile::NamedTempFile;

use retext_core::config::{Context, RawRule, RetextConfig, Scope};
use retext_core::errors::CompileError;

fn write_config(yaml: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml.as_bytes())?;
    Ok(file)
}

#[test]
fn test_load_from_file() -> Result<()> {
    let file = write_config(
        r#"
scope: frontend
rules:
  - find: "color"
    replace: "colour"
    case_insensitive: true
  - find: "(\\d+) items?"
    replace: "$1 things"
    is_regex: true
    scope: admin
"#,
    )?;
    let config = RetextConfig::load_from_file(file.path())?;
    assert_eq!(config.rules.len(), 2);

    let first = &config.rules[0];
    assert_eq!(first.find, "color");
    assert!(first.case_insensitive);
    assert!(!first.is_regex);
    assert_eq!(first.scope, Scope::Frontend);

    let second = &config.rules[1];
    assert!(second.is_regex);
    assert!(!second.case_insensitive);
    assert_eq!(second.scope, Scope::Admin);
    Ok(())
}

#[test]
fn test_from_to_aliases() -> Result<()> {
    let config = RetextConfig::load_from_str(
        r#"
rules:
  - from: cat
    to: dog
"#,
    )?;
    assert_eq!(config.rules, vec![RawRule::literal("cat", "dog")]);
    Ok(())
}

#[test]
fn test_unknown_scope_is_treated_as_all() -> Result<()> {
    let config = RetextConfig::load_from_str(
        r#"
scope: everywhere
rules:
  - find: cat
    replace: dog
  - find: bird
    replace: fish
    scope: sometimes
"#,
    )?;
    assert!(config.rules.iter().all(|r| r.scope == Scope::All));
    assert!(config.rules.iter().all(|r| r.scope.admits(Context::Admin)));
    Ok(())
}

#[test]
fn test_engine_settings_and_defaults() -> Result<()> {
    let defaults = RetextConfig::load_from_str("rules: []")?;
    assert!(defaults.engines.html.reject_on_parse_errors);
    assert_eq!(defaults.engines.cache.ttl_secs, 300);

    let tuned = RetextConfig::load_from_str(
        r#"
engines:
  html:
    reject_on_parse_errors: false
  cache:
    ttl_secs: 5
    capacity: 8
"#,
    )?;
    assert!(!tuned.engines.html.reject_on_parse_errors);
    assert_eq!(tuned.engines.cache.ttl_secs, 5);
    assert_eq!(tuned.engines.cache.capacity, 8);
    assert!(tuned.rules.is_empty());
    Ok(())
}

#[test]
fn test_empty_file_is_default_config() -> Result<()> {
    let file = write_config("   \n")?;
    let config = RetextConfig::load_from_file(file.path())?;
    assert_eq!(config, RetextConfig::default());
    Ok(())
}

#[test]
fn test_missing_file_is_an_error() {
    let result = RetextConfig::load_from_file("/definitely/not/here/retext.yaml");
    assert!(result.is_err());
}

#[test]
fn test_malformed_yaml_is_an_error() {
    assert!(RetextConfig::load_from_str("rules: [ {find: ").is_err());
}

#[test]
fn test_validate_reports_bad_rules_by_index() -> Result<()> {
    let config = RetextConfig::load_from_str(
        r#"
rules:
  - find: "   "
    replace: x
  - find: "ok"
    replace: fine
  - find: "("
    replace: x
    is_regex: true
"#,
    )?;
    let errors = config.validate();
    assert_eq!(errors.len(), 2);
    assert!(matches!(errors[0], CompileError::EmptyFind(0)));
    assert!(matches!(errors[1], CompileError::InvalidPattern { index: 2, .. }));
    Ok(())
}

#[test]
fn test_overlong_pattern_is_reported() {
    let config = RetextConfig::with_uniform_scope(vec![RawRule::literal("a".repeat(501), "b")], Scope::All);
    let errors = config.validate();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], CompileError::PatternLengthExceeded(0, 501, 500)));
}
