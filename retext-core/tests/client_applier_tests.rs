// retext-core/tests/client_applier_tests.rs
use anyhow::Result;

use retext_core::{ClientPayload, ClientRule, ClientSideApplier, Context, LiveDocument, RawRule, Replacer, RetextConfig, Scope};

fn payload(rules: &[(&str, &str, &str)]) -> ClientPayload {
    ClientPayload {
        rules: rules
            .iter()
            .map(|(find, flags, replace)| ClientRule {
                find: find.to_string(),
                flags: flags.to_string(),
                replace: replace.to_string(),
            })
            .collect(),
    }
}

fn started(source: &str, rules: &[(&str, &str, &str)]) -> (LiveDocument, ClientSideApplier) {
    let mut doc = LiveDocument::parse(source);
    let mut applier = ClientSideApplier::from_payload(&payload(rules));
    applier.start(&mut doc);
    (doc, applier)
}

#[test_log::test]
fn initial_pass_rewrites_body_text() {
    let (doc, applier) = started("<html><body><p>foo baz</p></body></html>", &[("foo", "g", "bar")]);
    assert!(applier.is_observing());
    assert!(doc.html().contains("<p>bar baz</p>"));
}

#[test_log::test]
fn every_text_run_under_an_element_is_rewritten() -> Result<()> {
    let (mut doc, mut applier) = started("<body><p>foo <b>x</b> foo</p></body>", &[("foo", "g", "bar")]);
    assert!(doc.html().contains("<p>bar <b>x</b> bar</p>"));

    let body = doc.body().expect("body");
    doc.append_html(body, "<div>foo <i>y</i> foo</div>")?;
    assert_eq!(applier.pump(&mut doc), 2);
    assert!(doc.html().contains("<div>bar <i>y</i> bar</div>"));
    Ok(())
}

#[test_log::test]
fn inserted_content_is_processed_without_rescanning_old_content() -> Result<()> {
    // The replacement still contains the find text, so a rescan would show.
    let (mut doc, mut applier) = started("<body><p>foo</p></body>", &[("foo", "g", "foo bar")]);
    let body = doc.body().expect("body");
    doc.append_html(body, "<div>foo</div>")?;

    assert_eq!(applier.pump(&mut doc), 1);
    let html = doc.html();
    assert!(html.contains("<p>foo bar</p>"));
    assert!(html.contains("<div>foo bar</div>"));
    assert!(!html.contains("foo bar bar"));
    Ok(())
}

#[test_log::test]
fn moving_processed_content_does_not_substitute_again() -> Result<()> {
    let (mut doc, mut applier) = started(
        "<body><div id=\"a\"><p id=\"p\">foo</p></div><div id=\"b\"></div></body>",
        &[("foo", "g", "foo bar")],
    );
    let p = doc.element_by_id("p").expect("p");
    let b = doc.element_by_id("b").expect("b");
    doc.move_node(p, b)?;

    assert_eq!(applier.pump(&mut doc), 0);
    assert_eq!(doc.text_content(p), "foo bar");
    Ok(())
}

#[test_log::test]
fn text_inserted_directly_under_processed_element_is_processed() -> Result<()> {
    let (mut doc, mut applier) = started("<body><p id=\"p\">foo</p></body>", &[("foo", "g", "bar")]);
    let p = doc.element_by_id("p").expect("p");
    let text = doc.append_text(p, " and foo")?;

    assert_eq!(applier.pump(&mut doc), 1);
    assert_eq!(doc.text(text), Some(" and bar"));
    assert_eq!(doc.text_content(p), "bar and bar");
    Ok(())
}

#[test_log::test]
fn mutations_are_handled_in_order_across_batches() -> Result<()> {
    let (mut doc, mut applier) = started("<body></body>", &[("one", "g", "1"), ("two", "g", "2")]);
    let body = doc.body().expect("body");
    doc.append_html(body, "<span>one</span>")?;
    doc.append_html(body, "<span>two</span>")?;
    assert_eq!(applier.pump(&mut doc), 2);

    doc.append_html(body, "<span>one two</span>")?;
    assert_eq!(applier.pump(&mut doc), 1);
    assert!(doc.html().contains("<span>1</span><span>2</span><span>1 2</span>"));
    Ok(())
}

#[test_log::test]
fn flags_and_replacement_syntax_follow_the_contract() {
    let (doc, _) = started(
        "<body><p>foo foo</p><i>Cat</i><b>ann@example</b></body>",
        &[("foo", "", "bar"), ("cat", "i", "dog"), (r"(\w+)@example", "gu", "$1 at example")],
    );
    let html = doc.html();
    assert!(html.contains("<p>bar foo</p>"));
    assert!(html.contains("<i>dog</i>"));
    assert!(html.contains("<b>ann at example</b>"));
}

#[test_log::test]
fn invalid_rules_are_skipped_individually() {
    let applier = ClientSideApplier::from_payload(&payload(&[
        ("(", "g", "x"),
        ("a", "gy", "x"),
        ("a", "gg", "x"),
        ("", "g", "x"),
        ("ok", "g", "fine"),
    ]));
    assert!(!applier.is_inert());
    assert_eq!(applier.skipped().len(), 4);
}

#[test_log::test]
fn missing_payload_leaves_document_untouched() -> Result<()> {
    for json in ["", "null", "[]", r#"{"rules": []}"#] {
        let mut doc = LiveDocument::parse("<body><p>foo</p></body>");
        let before = doc.html();
        let mut applier = ClientSideApplier::from_json(json)?;
        assert_eq!(applier.start(&mut doc), 0);
        assert!(!doc.is_observed());
        assert_eq!(doc.html(), before);
    }
    Ok(())
}

#[test_log::test]
fn server_payload_drives_the_client_the_same_way() -> Result<()> {
    let config = RetextConfig::with_uniform_scope(
        vec![
            RawRule::literal("color", "colour").case_insensitive(),
            RawRule::literal("cost", "$5"),
            RawRule::regex(r"(\d+) items?", "$1 things"),
        ],
        Scope::Frontend,
    );
    let replacer = Replacer::new(&config, Context::Frontend);
    let json = replacer.client_payload().to_json()?;

    let mut doc = LiveDocument::parse("<body><p>Color and COLORFUL</p><p>the cost: 3 items</p></body>");
    let mut applier = ClientSideApplier::from_json(&json)?;
    applier.start(&mut doc);

    let html = doc.html();
    assert!(html.contains("<p>colour and COLORFUL</p>"));
    assert!(html.contains("<p>the $5: 3 things</p>"));
    assert_eq!(replacer.replace_plain("the cost: 3 items"), "the $5: 3 things");
    Ok(())
}
