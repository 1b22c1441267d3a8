//! Integration tests for dom-assert.
//!
//! These tests drive the public API end to end: documents in, assertions
//! and selections out.

use dom_assert::prelude::*;

const MENU: &str = r#"
<html>
  <head><title>Hello</title></head>
  <body>
    <ul id="menu">
      <li class="item"><a href="/home">Home</a></li>
      <li class="item"><a href="/about">About</a></li>
      <li class="item"><a href="/blog">Blog</a></li>
      <li class="item current"><a href="/contact">Contact</a></li>
    </ul>
    <pre>  keep me  </pre>
    <div>
      trim me
    </div>
  </body>
</html>
"#;

// ============================================================================
// Counting
// ============================================================================

#[test]
fn four_items_default_expectation_passes() {
    let doc = Document::html(MENU);
    let mut ctx = AssertContext::new(&doc);
    let items = assert_select!(ctx, "li").unwrap();
    assert_eq!(items.len(), 4);
}

#[test]
fn four_items_exact_five_fails() {
    let doc = Document::html(MENU);
    let mut ctx = AssertContext::new(&doc);
    let err = assert_select!(ctx, "li", 5).unwrap_err();
    assert!(err.is_assertion_failure());
    assert!(err.message().contains("exactly 5 elements"));
    assert!(err.message().contains("found 4"));
}

#[test]
fn four_items_false_fails() {
    let doc = Document::html(MENU);
    let mut ctx = AssertContext::new(&doc);
    assert!(assert_select!(ctx, "li", false).is_err());
    assert!(assert_select!(ctx, "table", false).is_ok());
}

#[test]
fn four_items_range_passes() {
    let doc = Document::html(MENU);
    let mut ctx = AssertContext::new(&doc);
    assert!(assert_select!(ctx, "li", 2..=5).is_ok());
    let err = assert_select!(ctx, "li", 5..=9).unwrap_err();
    assert!(err.message().contains("between 5 and 9 elements"));
}

#[test]
fn true_means_at_least_one() {
    let doc = Document::html(MENU);
    let mut ctx = AssertContext::new(&doc);
    assert!(assert_select!(ctx, "li.current", true).is_ok());
    let err = assert_select!(ctx, "li.missing", true).unwrap_err();
    assert!(err.message().contains("at least 1 element"));
}

#[test]
fn options_bounds() {
    let doc = Document::html(MENU);
    let mut ctx = AssertContext::new(&doc);
    assert!(assert_select!(ctx, "li", EqualityOptions::new().minimum(3)).is_ok());
    assert!(assert_select!(ctx, "li", EqualityOptions::new().maximum(3)).is_err());
}

// ============================================================================
// Content
// ============================================================================

#[test]
fn title_text_mismatch_names_both() {
    let doc = Document::html(MENU);
    let mut ctx = AssertContext::new(&doc);
    assert!(assert_select!(ctx, "title", "Hello").is_ok());
    let err = assert_select!(ctx, "title", "Welcome").unwrap_err();
    assert!(err.message().contains("Welcome"));
    assert!(err.message().contains("Hello"));
}

#[test]
fn pattern_text_expectation() {
    let doc = Document::html(MENU);
    let mut ctx = AssertContext::new(&doc);
    let found = assert_select!(ctx, "a", Regex::new("^(Home|Blog)$").unwrap()).unwrap();
    assert_eq!(found.texts(), vec!["Home", "Blog"]);
}

#[test]
fn html_expectation() {
    let doc = Document::html(MENU);
    let mut ctx = AssertContext::new(&doc);
    let options = EqualityOptions::new().html(r#"<a href="/home">Home</a>"#);
    assert_eq!(assert_select!(ctx, "li", options).unwrap().len(), 1);
}

#[test]
fn pre_keeps_whitespace_div_is_trimmed() {
    let doc = Document::html(MENU);
    let mut ctx = AssertContext::new(&doc);
    assert!(assert_select!(ctx, "pre", "  keep me  ").is_ok());
    assert!(assert_select!(ctx, "pre", "keep me").is_err());
    assert!(assert_select!(ctx, "div", "trim me").is_ok());
}

// ============================================================================
// Substitution
// ============================================================================

#[test]
fn literal_substitution() {
    let doc = Document::html(MENU);
    let mut ctx = AssertContext::new(&doc);
    assert!(assert_select!(ctx, "a[href=?]", "/about", "About").is_ok());
    assert!(assert_select!(ctx, "a[href=?]", "/nowhere", false).is_ok());
}

#[test]
fn pattern_substitution_with_match() {
    let doc = Document::html(MENU);
    let mut ctx = AssertContext::new(&doc);
    let found = assert_select!(ctx, "a:match('href', ?)", Regex::new("^/(home|blog)$").unwrap(), 2)
        .unwrap();
    assert_eq!(found.texts(), vec!["Home", "Blog"]);
}

#[test]
fn substitution_failure_shows_presented_selector() {
    let doc = Document::html(MENU);
    let mut ctx = AssertContext::new(&doc);
    let err = assert_select!(ctx, "a[href=?]", "/x").unwrap_err();
    assert!(err.message().contains(r#"a[href=\"/x\"]"#));
}

// ============================================================================
// Scoping
// ============================================================================

#[test]
fn nested_scope_narrows_and_restores() {
    let doc = Document::html(MENU);
    let mut ctx = AssertContext::new(&doc);
    ctx.assert_select_with(args!["li.current"], |ctx, current| {
        assert_eq!(current.len(), 1);
        assert_select!(ctx, "a", 1)?;
        assert_select!(ctx, "a", "Contact")?;
        Ok(())
    })
    .unwrap();
    assert!(ctx.scope().is_none());
    assert_eq!(assert_select!(ctx, "a", 4).unwrap().len(), 4);
}

#[test]
fn explicit_root_overrides_scope() {
    let doc = Document::html(MENU);
    let mut ctx = AssertContext::new(&doc);
    let menu = assert_select!(ctx, "#menu").unwrap();
    ctx.assert_select_with(args!["li.current"], |ctx, _| {
        assert_select!(ctx, menu.clone(), "a", 4)?;
        Ok(())
    })
    .unwrap();
}

#[test]
fn failure_inside_nested_block_propagates() {
    let doc = Document::html(MENU);
    let mut ctx = AssertContext::new(&doc);
    let err = ctx
        .assert_select_with(args!["ul"], |ctx, _| {
            assert_select!(ctx, "li", 7)?;
            Ok(())
        })
        .unwrap_err();
    assert!(err.message().contains("found 4"));
    assert!(ctx.scope().is_none());
}

// ============================================================================
// Supplementary helpers
// ============================================================================

#[test]
fn css_select_returns_without_asserting() {
    let doc = Document::html(MENU);
    let ctx = AssertContext::new(&doc);
    assert!(css_select!(ctx, "table").unwrap().is_empty());
    assert_eq!(css_select!(ctx, "a[href=?]", "/blog").unwrap().len(), 1);
}

#[test]
fn not_select() {
    let doc = Document::html(MENU);
    let mut ctx = AssertContext::new(&doc);
    assert!(assert_not_select!(ctx, "li.error").is_ok());
    assert!(assert_not_select!(ctx, "a", "Shop").is_ok());
    assert!(assert_not_select!(ctx, "a", "Blog").is_err());
    let err = assert_not_select!(ctx, "a", 0).unwrap_err();
    assert!(matches!(err, SelectError::InvalidArgument { .. }));
}

#[test]
fn xml_content_type_parses_fragment() {
    let doc = Document::parse("<feed><entry>1</entry><entry>2</entry></feed>", "application/atom+xml");
    assert_eq!(doc.kind(), ContentKind::Xml);
    let mut ctx = AssertContext::new(&doc);
    assert!(assert_select!(ctx, "entry", 2).is_ok());
    assert!(assert_select!(ctx, "body", false).is_ok());
}

#[test]
fn xml_self_closing_entries_are_counted() {
    let doc = Document::parse("<feed><entry/><entry/></feed>", "application/xml");
    let mut ctx = AssertContext::new(&doc);
    assert!(assert_select!(ctx, "feed > entry", 2).is_ok());
}

#[test]
fn equal_bounds_report_exact_count() {
    let doc = Document::html(MENU);
    let mut ctx = AssertContext::new(&doc);
    let err = assert_select!(ctx, "li", EqualityOptions::new().minimum(3).maximum(3)).unwrap_err();
    assert_eq!(
        err.message(),
        "Expected exactly 3 elements matching \"li\", found 4."
    );
}

#[test]
fn body_absence_on_html_document() {
    let doc = Document::html("<p>no body tag</p>");
    let mut ctx = AssertContext::new(&doc);
    assert!(assert_select!(ctx, "body", false).is_ok());
    assert!(assert_not_select!(ctx, "body").is_ok());
    assert!(assert_select!(ctx, "body", 1).is_ok());
}

#[test]
fn invalid_selector_is_skipped_by_default() {
    let doc = Document::html(MENU);
    let mut ctx = AssertContext::new(&doc);
    let found = assert_select!(ctx, "li:::", 3).unwrap();
    assert!(found.is_empty());
    assert_eq!(ctx.skipped().len(), 1);
}

#[test]
fn config_from_yaml_applies() {
    let config = AssertConfig::from_yaml(
        "whitespace_significant: [div]\nskip_invalid_selectors: false\n",
    )
    .unwrap();
    let doc = Document::html(MENU);
    let mut ctx = AssertContext::new(&doc).with_config(config);
    assert!(assert_select!(ctx, "div", "trim me").is_err());
    assert!(assert_select!(ctx, "li:::").is_err());
}
