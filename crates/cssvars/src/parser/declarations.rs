//! Declaration and declaration block parsing.

use crate::error::SyntaxErrorKind;
use crate::parser::{close_brace, comments, fail, open_brace, strip_comments, PResult, SyntaxError};
use crate::stylesheet::Declaration;

use nom::bytes::complete::{take_while, take_while1};
use nom::character::complete::{char, multispace0};
use nom::combinator::{opt, recognize};
use nom::sequence::{delimited, pair};

/// Parses `{ declaration* }`.
///
/// Comments and stray semicolons between declarations are skipped.
pub fn declaration_block(input: &str) -> PResult<'_, Vec<Declaration>> {
    let mut input = match open_brace(input) {
        Ok((rest, _)) => rest,
        Err(nom::Err::Error(_)) => return fail(input, SyntaxErrorKind::MissingOpenBrace),
        Err(e) => return Err(e),
    };

    let mut declarations = Vec::new();
    loop {
        let (rest, _) = skip_filler(input)?;
        match declaration(rest) {
            Ok((rest, decl)) => {
                declarations.push(decl);
                input = rest;
            }
            Err(nom::Err::Error(_)) => {
                input = rest;
                break;
            }
            Err(e) => return Err(e),
        }
    }

    match close_brace(input) {
        Ok((rest, _)) => Ok((rest, declarations)),
        Err(nom::Err::Error(_)) => fail(input, SyntaxErrorKind::MissingCloseBrace),
        Err(e) => Err(e),
    }
}

/// Parses a single `property: value;` declaration.
///
/// Fails softly (without consuming input) when no property name is present,
/// and fatally when the property is not followed by `:`.
pub fn declaration(input: &str) -> PResult<'_, Declaration> {
    let (input, property) = property_name(input)?;
    let (input, _) = multispace0(input)?;

    let input = match char::<_, SyntaxError>(':')(input) {
        Ok((rest, _)) => rest,
        Err(_) => return fail(input, SyntaxErrorKind::MissingColon),
    };
    let (input, _) = multispace0(input)?;

    let end = value_end(input);
    let value = strip_comments(&input[..end]);
    let (input, _) = separators(&input[end..])?;

    Ok((
        input,
        Declaration::new(strip_comments(property).trim(), value.trim()),
    ))
}

/// A property name: identifier characters, a leading `*` hack, vendor dashes
/// and an optional `[attr]` suffix.
fn property_name(input: &str) -> PResult<'_, &str> {
    recognize(pair(
        take_while1(is_property_char),
        opt(delimited(
            char('['),
            take_while1(|c: char| {
                c.is_ascii_digit() || c.is_ascii_lowercase() || c == '_' || c == '-'
            }),
            char(']'),
        )),
    ))(input)
}

fn is_property_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | '#' | '/' | '*' | '\\')
}

/// Byte index where a declaration value ends.
///
/// The value runs to the first `;` outside parentheses, strings and comments,
/// or to the first `}` outside strings and comments. A backslash escapes the
/// following character.
pub(crate) fn value_end(input: &str) -> usize {
    let mut depth = 0usize;
    let mut chars = input.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' | '\'' => {
                while let Some((_, inner)) = chars.next() {
                    if inner == '\\' {
                        chars.next();
                    } else if inner == c {
                        break;
                    }
                }
            }
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                chars.next();
                let mut previous = '\0';
                for (_, inner) in chars.by_ref() {
                    if previous == '*' && inner == '/' {
                        break;
                    }
                    previous = inner;
                }
            }
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => return i,
            '}' => return i,
            _ => {}
        }
    }
    input.len()
}

/// Skips whitespace and semicolons.
fn separators(input: &str) -> PResult<'_, &str> {
    take_while(|c: char| c == ';' || c.is_whitespace())(input)
}

/// Skips any mix of whitespace, semicolons and comments.
fn skip_filler(input: &str) -> PResult<'_, ()> {
    let mut input = input;
    loop {
        let (rest, _) = separators(input)?;
        let (rest, _) = comments(rest)?;
        if rest.len() == input.len() {
            return Ok((rest, ()));
        }
        input = rest;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_end_respects_nesting() {
        assert_eq!(value_end("red; blue"), 3);
        assert_eq!(value_end("url(data:a;b) x; y"), 15);
        assert_eq!(value_end("\"a;b\"}"), 5);
        assert_eq!(value_end("a /* ; */ b}"), 11);
        assert_eq!(value_end(r"a\;b;"), 4);
        assert_eq!(value_end("no terminator"), 13);
    }

    #[test]
    fn test_property_hacks() {
        let (_, decl) = declaration("*zoom: 1;").unwrap();
        assert_eq!(decl.property, "*zoom");
        let (_, decl) = declaration("filter[ie]: none").unwrap();
        assert_eq!(decl.property, "filter[ie]");
    }
}
