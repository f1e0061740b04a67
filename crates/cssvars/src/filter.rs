//! Pruning a stylesheet down to the parts that involve custom properties.
//!
//! A declaration qualifies when it defines a custom property (`--name: ...`)
//! or references one (`var(...)` in its value). The filter produces a new
//! rule list rather than editing the old one in place:
//!
//! - Style and page rules survive with only their qualifying declarations.
//! - Font-face rules survive whole if any declaration qualifies.
//! - Keyframes survive whole if any keyframe has a qualifying declaration.
//! - Grouping at-rules are filtered recursively and survive if any child rule does.
//! - Custom media, statements and comments are always kept.

use crate::stylesheet::{
    Declaration, DocumentRule, GroupRule, PageRule, Rule, StyleRule, Stylesheet,
};

/// Applies the filter to a whole stylesheet.
pub fn retain_variable_rules(stylesheet: Stylesheet) -> Stylesheet {
    let before = stylesheet.rules.len();
    let rules = filter_rules(stylesheet.rules);
    log::debug!("variable filter kept {} of {} top-level rules", rules.len(), before);
    Stylesheet::new(rules)
}

/// Filters a rule list, dropping rules with nothing variable-related left.
pub fn filter_rules(rules: Vec<Rule>) -> Vec<Rule> {
    rules.into_iter().filter_map(filter_rule).collect()
}

fn filter_rule(rule: Rule) -> Option<Rule> {
    match rule {
        Rule::Style(StyleRule {
            selectors,
            declarations,
        }) => {
            let declarations = qualifying(declarations);
            (!declarations.is_empty()).then(|| Rule::Style(StyleRule::new(selectors, declarations)))
        }
        Rule::Page(PageRule {
            selectors,
            declarations,
        }) => {
            let declarations = qualifying(declarations);
            (!declarations.is_empty()).then(|| {
                Rule::Page(PageRule {
                    selectors,
                    declarations,
                })
            })
        }
        Rule::FontFace(declarations) => declarations
            .iter()
            .any(Declaration::involves_variables)
            .then(|| Rule::FontFace(declarations)),
        Rule::Keyframes(keyframes) => keyframes
            .frames
            .iter()
            .any(|frame| frame.declarations.iter().any(Declaration::involves_variables))
            .then(|| Rule::Keyframes(keyframes)),
        Rule::Media(group) => filter_group(group).map(Rule::Media),
        Rule::Supports(group) => filter_group(group).map(Rule::Supports),
        Rule::Host(group) => filter_group(group).map(Rule::Host),
        Rule::Document(DocumentRule {
            vendor,
            prelude,
            rules,
        }) => survivors(rules).map(|rules| {
            Rule::Document(DocumentRule {
                vendor,
                prelude,
                rules,
            })
        }),
        rule @ (Rule::CustomMedia(_) | Rule::Statement(_) | Rule::Comment(_)) => Some(rule),
    }
}

fn filter_group(group: GroupRule) -> Option<GroupRule> {
    let prelude = group.prelude;
    survivors(group.rules).map(|rules| GroupRule { prelude, rules })
}

/// Filters nested rules; `None` when no rule other than a comment remains.
fn survivors(rules: Vec<Rule>) -> Option<Vec<Rule>> {
    let rules = filter_rules(rules);
    rules
        .iter()
        .any(|rule| !matches!(rule, Rule::Comment(_)))
        .then_some(rules)
}

fn qualifying(declarations: Vec<Declaration>) -> Vec<Declaration> {
    declarations
        .into_iter()
        .filter(Declaration::involves_variables)
        .collect()
}
