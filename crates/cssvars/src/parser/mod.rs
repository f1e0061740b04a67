//! Recursive-descent CSS parsing.
//!
//! The grammar is deliberately loose: it only recognises enough structure to
//! rebuild the stylesheet afterwards. Selectors, at-rule preludes and
//! declaration values are captured as raw text, so CSS that is invalid but
//! structurally sound passes straight through.
//!
//! - [`parse_stylesheet`]: main entry point
//! - [`selectors`]: selector list capture and splitting
//! - [`declarations`]: declarations and declaration blocks
//! - [`at_rules`]: `@media`, `@keyframes`, `@import` and friends
//!
//! ## Example
//!
//! ```rust
//! use cssvars::parser::parse_stylesheet;
//! use cssvars::stylesheet::Rule;
//!
//! let sheet = parse_stylesheet(":root { --gap: 4px } .a, .b { margin: var(--gap) }").unwrap();
//! assert_eq!(sheet.rules.len(), 2);
//!
//! let Rule::Style(rule) = &sheet.rules[1] else { panic!("expected a style rule") };
//! assert_eq!(rule.selectors, vec![".a", ".b"]);
//! assert_eq!(rule.declarations[0].value, "var(--gap)");
//! ```

pub mod at_rules;
pub mod declarations;
pub mod selectors;

use crate::error::{CssVarsError, SyntaxErrorKind};
use crate::stylesheet::{Rule, StyleRule, Stylesheet};

use nom::bytes::complete::tag;
use nom::character::complete::{char, multispace0};
use nom::error::{ErrorKind, ParseError};
use nom::IResult;

/// Parser error carrying the position it was raised at and, for fatal
/// failures, the violated rule.
///
/// Combinators that simply do not match produce `nom::Err::Error` with
/// `kind: None`; structural violations are raised as `nom::Err::Failure`
/// so they abort the whole parse.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError<'a> {
    pub input: &'a str,
    pub kind: Option<SyntaxErrorKind>,
}

impl<'a> ParseError<&'a str> for SyntaxError<'a> {
    fn from_error_kind(input: &'a str, _kind: ErrorKind) -> Self {
        Self { input, kind: None }
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

/// Result type shared by every parser in this module.
pub type PResult<'a, T> = IResult<&'a str, T, SyntaxError<'a>>;

/// Raises a fatal error at `input`.
pub(crate) fn fail<T>(input: &str, kind: SyntaxErrorKind) -> PResult<'_, T> {
    Err(nom::Err::Failure(SyntaxError {
        input,
        kind: Some(kind),
    }))
}

/// Signals that the current alternative does not apply, without consuming input.
pub(crate) fn no_match<T>(input: &str) -> PResult<'_, T> {
    Err(nom::Err::Error(SyntaxError { input, kind: None }))
}

/// Parses a full stylesheet.
///
/// The top level is parsed in bare mode: rules follow one another with no
/// enclosing braces. Any structural violation aborts the parse with a
/// [`CssVarsError::Syntax`] locating it in `source`.
pub fn parse_stylesheet(source: &str) -> Result<Stylesheet, CssVarsError> {
    match rule_list(source, true) {
        Ok((_, rules)) => {
            log::debug!("parsed {} top-level rules", rules.len());
            Ok(Stylesheet::new(rules))
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let kind = e.kind.unwrap_or(SyntaxErrorKind::MissingSelector);
            let offset = source.len() - e.input.len();
            Err(CssVarsError::syntax_at(kind, source, offset))
        }
        Err(nom::Err::Incomplete(_)) => Err(CssVarsError::syntax_at(
            SyntaxErrorKind::MissingCloseBrace,
            source,
            source.len(),
        )),
    }
}

/// Parses a sequence of rules.
///
/// With `bare` set the list runs to the end of input; otherwise it must be
/// wrapped in `{ }` and stops at the closing brace.
pub fn rule_list(input: &str, bare: bool) -> PResult<'_, Vec<Rule>> {
    let mut input = input;
    if !bare {
        input = match open_brace(input) {
            Ok((rest, _)) => rest,
            Err(nom::Err::Error(_)) => return fail(input, SyntaxErrorKind::MissingOpenBrace),
            Err(e) => return Err(e),
        };
    }

    let (mut input, mut rules) = comments(input)?;
    while !input.is_empty() && (bare || !input.starts_with('}')) {
        let (rest, rule) = match at_rules::at_rule(input) {
            Ok(parsed) => parsed,
            Err(nom::Err::Error(_)) => style_rule(input)?,
            Err(e) => return Err(e),
        };
        rules.push(rule);

        let (rest, found) = comments(rest)?;
        rules.extend(found);
        input = rest;
    }

    if !bare {
        input = match close_brace(input) {
            Ok((rest, _)) => rest,
            Err(nom::Err::Error(_)) => return fail(input, SyntaxErrorKind::MissingCloseBrace),
            Err(e) => return Err(e),
        };
    }
    Ok((input, rules))
}

/// Parses a style rule: a selector list followed by a declaration block.
pub fn style_rule(input: &str) -> PResult<'_, Rule> {
    let (rest, selectors) = selectors::selector_list(input)?;
    if selectors.is_empty() {
        return fail(input, SyntaxErrorKind::MissingSelector);
    }
    let (rest, declarations) = declarations::declaration_block(rest)?;
    Ok((rest, Rule::Style(StyleRule::new(selectors, declarations))))
}

/// Parses a single `/* ... */` comment at the start of `input`, returning its text.
pub fn comment(input: &str) -> PResult<'_, &str> {
    let (body, _) = tag("/*")(input)?;
    match body.find("*/") {
        Some(end) => Ok((&body[end + 2..], &body[..end])),
        None => fail(input, SyntaxErrorKind::UnterminatedComment),
    }
}

/// Consumes any run of whitespace and comments, returning the comments found.
pub fn comments(input: &str) -> PResult<'_, Vec<Rule>> {
    let mut input = input;
    let mut found = Vec::new();
    loop {
        let (rest, _) = multispace0(input)?;
        input = rest;
        match comment(input) {
            Ok((rest, text)) => {
                found.push(Rule::Comment(text.to_string()));
                input = rest;
            }
            Err(nom::Err::Error(_)) => return Ok((input, found)),
            Err(e) => return Err(e),
        }
    }
}

/// `{` followed by optional whitespace.
pub(crate) fn open_brace(input: &str) -> PResult<'_, char> {
    let (input, brace) = char('{')(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, brace))
}

pub(crate) fn close_brace(input: &str) -> PResult<'_, char> {
    char('}')(input)
}

/// Removes `/* ... */` comments from captured text, leaving quoted strings alone.
pub(crate) fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                out.push(c);
                if c == '\\' {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                } else if c == q {
                    quote = None;
                }
            }
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                out.push(c);
            }
            None if c == '/' && chars.peek() == Some(&'*') => {
                chars.next();
                let mut previous = '\0';
                for inner in chars.by_ref() {
                    if previous == '*' && inner == '/' {
                        break;
                    }
                    previous = inner;
                }
            }
            None => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_comments("red /* note */ blue"), "red  blue");
        assert_eq!(strip_comments("\"/* kept */\""), "\"/* kept */\"");
        assert_eq!(strip_comments("a/**/b"), "ab");
        assert_eq!(strip_comments("a/* unterminated"), "a");
    }

    #[test]
    fn test_comments_consume_whitespace() {
        let (rest, found) = comments("  /* a */ \n /* b */ x").unwrap();
        assert_eq!(rest, "x");
        assert_eq!(
            found,
            vec![Rule::Comment(" a ".to_string()), Rule::Comment(" b ".to_string())]
        );
    }

    #[test]
    fn test_unterminated_comment_is_fatal() {
        let result = comments("/* never closed");
        assert!(matches!(
            result,
            Err(nom::Err::Failure(SyntaxError {
                kind: Some(SyntaxErrorKind::UnterminatedComment),
                ..
            }))
        ));
    }
}
