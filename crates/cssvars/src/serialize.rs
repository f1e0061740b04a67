//! Rendering a stylesheet back to minified CSS text.
//!
//! Comments are dropped, and style or page rules left without declarations
//! produce no output at all. Declarations are joined with `;` and no
//! whitespace is added anywhere except where the syntax needs it.

use crate::stylesheet::{Declaration, Keyframe, Rule, Stylesheet};
use std::fmt;

/// Serializes a stylesheet with no separator between rules.
pub fn to_css(stylesheet: &Stylesheet) -> String {
    to_css_with_delimiter(stylesheet, "")
}

/// Serializes a stylesheet, writing `delimiter` after every rule that carries
/// selectors (style and page rules) to make the output easier to read.
pub fn to_css_with_delimiter(stylesheet: &Stylesheet, delimiter: &str) -> String {
    let mut out = String::new();
    write_rules(&mut out, &stylesheet.rules, delimiter);
    out
}

fn write_rules(out: &mut String, rules: &[Rule], delimiter: &str) {
    for rule in rules {
        let before = out.len();
        write_rule(out, rule, delimiter);
        let wrote = out.len() > before;
        if wrote && matches!(rule, Rule::Style(_) | Rule::Page(_)) {
            out.push_str(delimiter);
        }
    }
}

fn write_rule(out: &mut String, rule: &Rule, delimiter: &str) {
    match rule {
        Rule::Style(style) => {
            if style.declarations.is_empty() {
                return;
            }
            out.push_str(&style.selectors.join(","));
            write_declaration_block(out, &style.declarations);
        }
        Rule::Page(page) => {
            if page.declarations.is_empty() {
                return;
            }
            out.push_str("@page");
            if !page.selectors.is_empty() {
                out.push(' ');
                out.push_str(&page.selectors.join(", "));
            }
            write_declaration_block(out, &page.declarations);
        }
        Rule::FontFace(declarations) => {
            out.push_str("@font-face");
            write_declaration_block(out, declarations);
        }
        Rule::Media(group) => {
            out.push_str("@media ");
            out.push_str(&group.prelude);
            write_rule_block(out, &group.rules, delimiter);
        }
        Rule::Supports(group) => {
            out.push_str("@supports ");
            out.push_str(&group.prelude);
            write_rule_block(out, &group.rules, delimiter);
        }
        Rule::Host(group) => {
            out.push_str("@host");
            write_rule_block(out, &group.rules, delimiter);
        }
        Rule::Document(document) => {
            out.push('@');
            out.push_str(document.vendor.as_deref().unwrap_or_default());
            out.push_str("document ");
            out.push_str(&document.prelude);
            write_rule_block(out, &document.rules, delimiter);
        }
        Rule::Keyframes(keyframes) => {
            out.push('@');
            out.push_str(keyframes.vendor.as_deref().unwrap_or_default());
            out.push_str("keyframes ");
            out.push_str(&keyframes.name);
            out.push('{');
            for frame in &keyframes.frames {
                write_keyframe(out, frame);
            }
            out.push('}');
        }
        Rule::CustomMedia(custom) => {
            out.push_str("@custom-media ");
            out.push_str(&custom.name);
            out.push(' ');
            out.push_str(&custom.media);
            out.push(';');
        }
        Rule::Statement(statement) => {
            out.push('@');
            out.push_str(statement.kind.keyword());
            out.push(' ');
            out.push_str(&statement.value);
            out.push(';');
        }
        Rule::Comment(_) => {}
    }
}

fn write_keyframe(out: &mut String, frame: &Keyframe) {
    out.push_str(&frame.selectors.join(","));
    write_declaration_block(out, &frame.declarations);
}

fn write_rule_block(out: &mut String, rules: &[Rule], delimiter: &str) {
    out.push('{');
    write_rules(out, rules, delimiter);
    out.push('}');
}

fn write_declaration_block(out: &mut String, declarations: &[Declaration]) {
    out.push('{');
    for (i, decl) in declarations.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        out.push_str(&decl.property);
        out.push(':');
        out.push_str(&decl.value);
    }
    out.push('}');
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_css(self))
    }
}
