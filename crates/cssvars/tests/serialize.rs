//! Integration tests for minified serialization.

use cssvars::parser::parse_stylesheet;
use cssvars::serialize::{to_css, to_css_with_delimiter};

fn minify(css: &str) -> String {
    to_css(&parse_stylesheet(css).unwrap())
}

// ============================================================================
// STYLE RULES
// ============================================================================

#[test]
fn test_style_rule_is_minified() {
    assert_eq!(
        minify(".a , .b {\n  color : red ;\n  margin: 0 auto;\n}"),
        ".a,.b{color:red;margin:0 auto}"
    );
}

#[test]
fn test_empty_rules_are_dropped() {
    assert_eq!(minify(".a {} .b { c: d } .e { /* only a comment */ }"), ".b{c:d}");
}

#[test]
fn test_comments_are_dropped() {
    assert_eq!(minify("/* a */ .x { y: z } /* b */"), ".x{y:z}");
}

#[test]
fn test_display_matches_to_css() {
    let sheet = parse_stylesheet(".a { b: c }").unwrap();
    assert_eq!(sheet.to_string(), to_css(&sheet));
}

// ============================================================================
// AT-RULES
// ============================================================================

#[test]
fn test_media_and_supports() {
    assert_eq!(
        minify("@media screen and (min-width: 1px) { .a { b: c } }"),
        "@media screen and (min-width: 1px){.a{b:c}}"
    );
    assert_eq!(
        minify("@supports (display: grid) { .a { display: grid } }"),
        "@supports (display: grid){.a{display:grid}}"
    );
}

#[test]
fn test_keyframes_and_document() {
    assert_eq!(
        minify("@-webkit-keyframes spin { from { a: 0 } 50%, to { a: 1 } }"),
        "@-webkit-keyframes spin{from{a:0}50%,to{a:1}}"
    );
    assert_eq!(
        minify("@-moz-document url-prefix() { .a { b: c } }"),
        "@-moz-document url-prefix(){.a{b:c}}"
    );
}

#[test]
fn test_statements_and_declaration_at_rules() {
    insta::assert_snapshot!(
        minify("@charset \"utf-8\"; @import url(a.css); @font-face { font-family: X } @page :first { margin: 0 }"),
        @r#"@charset "utf-8";@import url(a.css);@font-face{font-family:X}@page :first{margin:0}"#
    );
    assert_eq!(
        minify("@custom-media --narrow (max-width: 30em);"),
        "@custom-media --narrow (max-width: 30em);"
    );
}

#[test]
fn test_host() {
    assert_eq!(minify("@host { :scope { a: b } }"), "@host{:scope{a:b}}");
}

// ============================================================================
// DELIMITER
// ============================================================================

#[test]
fn test_delimiter_follows_style_and_page_rules() {
    let sheet = parse_stylesheet(".a { b: c } @media print { .d { e: f } } @page { g: h }").unwrap();
    assert_eq!(
        to_css_with_delimiter(&sheet, "\n"),
        ".a{b:c}\n@media print{.d{e:f}\n}@page{g:h}\n"
    );
}

#[test]
fn test_delimiter_skips_empty_rules() {
    let sheet = parse_stylesheet(".a {} .b { c: d }").unwrap();
    assert_eq!(to_css_with_delimiter(&sheet, "|"), ".b{c:d}|");
}

// ============================================================================
// ROUND TRIP
// ============================================================================

#[test]
fn test_serialized_output_reparses_to_same_output() {
    let css = r#"
        @charset "utf-8";
        :root { --a: 1px; }
        .a, .b > c { margin: var(--a, 2px) calc(1px + 2%); content: "x;y" }
        @media (min-width: 1px) { @supports (x: y) { .c { d: e } } }
        @keyframes k { 0% { top: 0 } 100% { top: 1px } }
        @font-face { font-family: "F"; }
    "#;
    let once = minify(css);
    assert_eq!(minify(&once), once);
}
