//! At-rule parsing.
//!
//! [`at_rule`] tries each recognised at-rule in a fixed order and takes the
//! first that matches. An at-rule nobody recognises is reported as a soft
//! mismatch, so the caller falls back to reading it as a style rule.

use crate::error::SyntaxErrorKind;
use crate::parser::declarations::declaration_block;
use crate::parser::selectors::selector_list;
use crate::parser::{close_brace, comments, fail, no_match, open_brace, rule_list, PResult};
use crate::stylesheet::{
    CustomMediaRule, DocumentRule, GroupRule, Keyframe, KeyframesRule, PageRule, Rule,
    StatementKind, StatementRule,
};

use nom::branch::alt;
use nom::bytes::complete::{tag, take_till1, take_while, take_while1};
use nom::character::complete::{char, digit1, multispace0, multispace1};
use nom::combinator::{opt, recognize};
use nom::sequence::{pair, preceded, tuple};
use phf::phf_map;

/// Single-line at-rules and the statement kind each produces.
static STATEMENT_KEYWORDS: phf::Map<&'static str, StatementKind> = phf_map! {
    "import" => StatementKind::Import,
    "charset" => StatementKind::Charset,
    "namespace" => StatementKind::Namespace,
};

/// Parses any supported at-rule.
pub fn at_rule(input: &str) -> PResult<'_, Rule> {
    let (input, _) = multispace0(input)?;
    if !input.starts_with('@') {
        return no_match(input);
    }

    alt((
        keyframes,
        supports,
        host,
        media,
        custom_media,
        page,
        document,
        font_face,
        statement,
    ))(input)
}

/// `@keyframes name { keyframe* }`, optionally vendor prefixed.
fn keyframes(input: &str) -> PResult<'_, Rule> {
    let (rest, keyword) = at_keyword(input)?;
    let Some(vendor) = keyword.strip_suffix("keyframes") else {
        return no_match(input);
    };
    let (rest, _) = multispace0(rest)?;

    let (rest, name) = match identifier(rest) {
        Ok(parsed) => parsed,
        Err(nom::Err::Error(_)) => return fail(rest, SyntaxErrorKind::KeyframesMissingName),
        Err(e) => return Err(e),
    };
    let (rest, _) = multispace0(rest)?;

    let rest = match open_brace(rest) {
        Ok((rest, _)) => rest,
        Err(nom::Err::Error(_)) => return fail(rest, SyntaxErrorKind::MissingOpenBrace),
        Err(e) => return Err(e),
    };

    let (mut rest, _) = comments(rest)?;
    let mut frames = Vec::new();
    loop {
        match keyframe(rest) {
            Ok((after, frame)) => {
                frames.push(frame);
                let (after, _) = comments(after)?;
                rest = after;
            }
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        }
    }

    let rest = match close_brace(rest) {
        Ok((rest, _)) => rest,
        Err(nom::Err::Error(_)) => return fail(rest, SyntaxErrorKind::MissingCloseBrace),
        Err(e) => return Err(e),
    };

    Ok((
        rest,
        Rule::Keyframes(KeyframesRule {
            vendor: non_empty(vendor),
            name: name.to_string(),
            frames,
        }),
    ))
}

/// `from, 50% { declarations }`
fn keyframe(input: &str) -> PResult<'_, Keyframe> {
    let (mut input, _) = multispace0(input)?;
    let mut selectors = Vec::new();
    loop {
        match keyframe_selector(input) {
            Ok((rest, selector)) => {
                selectors.push(selector.to_string());
                let (rest, _) = multispace0(rest)?;
                let (rest, _) = opt(pair(char(','), multispace0))(rest)?;
                input = rest;
            }
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        }
    }
    if selectors.is_empty() {
        return no_match(input);
    }

    let (input, declarations) = declaration_block(input)?;
    Ok((
        input,
        Keyframe {
            selectors,
            declarations,
        },
    ))
}

/// A percentage (`50%`, `12.5%`, `.5%`) or a keyword (`from`, `to`).
fn keyframe_selector(input: &str) -> PResult<'_, &str> {
    alt((
        recognize(pair(
            alt((
                recognize(tuple((digit1, char('.'), digit1))),
                recognize(pair(char('.'), digit1)),
                digit1,
            )),
            opt(char('%')),
        )),
        take_while1(|c: char| c.is_ascii_lowercase()),
    ))(input)
}

/// `@supports condition { rule* }`
fn supports(input: &str) -> PResult<'_, Rule> {
    let (rest, prelude) = prelude_after(input, "@supports")?;
    let (rest, rules) = rule_list(rest, false)?;
    Ok((rest, Rule::Supports(GroupRule { prelude, rules })))
}

/// `@host { rule* }`
fn host(input: &str) -> PResult<'_, Rule> {
    let (rest, _) = tag("@host")(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, rules) = rule_list(rest, false)?;
    Ok((
        rest,
        Rule::Host(GroupRule {
            prelude: String::new(),
            rules,
        }),
    ))
}

/// `@media query { rule* }`
fn media(input: &str) -> PResult<'_, Rule> {
    let (rest, prelude) = prelude_after(input, "@media")?;
    let (rest, rules) = rule_list(rest, false)?;
    Ok((rest, Rule::Media(GroupRule { prelude, rules })))
}

/// `@custom-media --name query;`
fn custom_media(input: &str) -> PResult<'_, Rule> {
    let (rest, (_, _, name, _, media, _)) = tuple((
        tag("@custom-media"),
        multispace1,
        recognize(pair(tag("--"), take_till1(|c: char| c.is_whitespace()))),
        multispace0,
        take_while1(|c: char| c != '{' && c != ';'),
        char(';'),
    ))(input)?;

    Ok((
        rest,
        Rule::CustomMedia(CustomMediaRule {
            name: name.trim().to_string(),
            media: media.trim().to_string(),
        }),
    ))
}

/// `@page :first { declarations }`; the selector is optional.
fn page(input: &str) -> PResult<'_, Rule> {
    let (rest, _) = tag("@page")(input)?;
    let (rest, _) = spaces(rest)?;
    let (rest, selectors) = selector_list(rest)?;
    let (rest, declarations) = declaration_block(rest)?;
    Ok((
        rest,
        Rule::Page(PageRule {
            selectors,
            declarations,
        }),
    ))
}

/// `@document url(...) { rule* }`, optionally vendor prefixed.
fn document(input: &str) -> PResult<'_, Rule> {
    let (rest, keyword) = at_keyword(input)?;
    let Some(vendor) = keyword.strip_suffix("document") else {
        return no_match(input);
    };
    let (rest, _) = spaces(rest)?;
    let (rest, prelude) = take_while1(|c: char| c != '{')(rest)?;
    let (rest, rules) = rule_list(rest, false)?;
    Ok((
        rest,
        Rule::Document(DocumentRule {
            vendor: non_empty(vendor),
            prelude: prelude.trim().to_string(),
            rules,
        }),
    ))
}

/// `@font-face { declarations }`
fn font_face(input: &str) -> PResult<'_, Rule> {
    let (rest, _) = tag("@font-face")(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, declarations) = declaration_block(rest)?;
    Ok((rest, Rule::FontFace(declarations)))
}

/// `@import ...;`, `@charset ...;` and `@namespace ...;`
fn statement(input: &str) -> PResult<'_, Rule> {
    let (rest, keyword) = at_keyword(input)?;
    let Some(kind) = STATEMENT_KEYWORDS.get(keyword).copied() else {
        return no_match(input);
    };
    let (rest, _) = multispace0(rest)?;
    let (rest, value) = take_while1(|c: char| c != ';')(rest)?;
    let (rest, _) = char(';')(rest)?;
    Ok((
        rest,
        Rule::Statement(StatementRule {
            kind,
            value: value.trim().to_string(),
        }),
    ))
}

/// `@` followed by the at-keyword, which may carry a vendor prefix.
fn at_keyword(input: &str) -> PResult<'_, &str> {
    preceded(char('@'), take_while(is_identifier_char))(input)
}

fn identifier(input: &str) -> PResult<'_, &str> {
    take_while1(is_identifier_char)(input)
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// Spaces only; newlines are left for the prelude or selector to trim.
fn spaces(input: &str) -> PResult<'_, &str> {
    take_while(|c: char| c == ' ')(input)
}

/// Matches `keyword`, then captures the prelude text up to the block's `{`.
fn prelude_after<'a>(input: &'a str, keyword: &'static str) -> PResult<'a, String> {
    let (rest, _) = tag(keyword)(input)?;
    let (rest, _) = spaces(rest)?;
    let (rest, prelude) = take_while1(|c: char| c != '{')(rest)?;
    Ok((rest, prelude.trim().to_string()))
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_at_rule_is_soft_mismatch() {
        assert!(matches!(at_rule("@layer base { }"), Err(nom::Err::Error(_))));
        assert!(matches!(at_rule(".a {}"), Err(nom::Err::Error(_))));
    }

    #[test]
    fn test_keyframe_selectors() {
        assert_eq!(keyframe_selector("12.5% {").unwrap().1, "12.5%");
        assert_eq!(keyframe_selector(".5%").unwrap().1, ".5%");
        assert_eq!(keyframe_selector("from,").unwrap().1, "from");
        assert!(keyframe_selector("{").is_err());
    }

    #[test]
    fn test_statement_keyword_lookup() {
        let (rest, rule) = at_rule("@charset \"utf-8\"; .a{}").unwrap();
        assert_eq!(rest, " .a{}");
        assert_eq!(
            rule,
            Rule::Statement(StatementRule {
                kind: StatementKind::Charset,
                value: "\"utf-8\"".to_string(),
            })
        );
    }
}
