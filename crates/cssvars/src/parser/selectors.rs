//! Selector list capture.
//!
//! Selectors are kept as raw text. The parser only needs to know where the
//! list ends (the first `{` outside a string) and where one selector ends and
//! the next begins.

use crate::error::SyntaxErrorKind;
use crate::parser::{fail, strip_comments, PResult};

use nom::character::complete::multispace0;

/// Parses a comma-separated selector list up to, but not including, the `{`
/// that opens its block.
///
/// Comments are removed and each selector is trimmed. Commas inside quoted
/// strings, parentheses or attribute brackets do not split. Returns an empty
/// list when there is no selector text at all; a `}` in selector position is
/// a stray closing brace and aborts the parse.
pub fn selector_list(input: &str) -> PResult<'_, Vec<String>> {
    let (input, _) = multispace0(input)?;
    if input.starts_with('}') {
        return fail(input, SyntaxErrorKind::ExtraClosingBrace);
    }

    let end = find_block_start(input);
    if end == 0 {
        return Ok((input, Vec::new()));
    }

    let raw = strip_comments(input[..end].trim());
    Ok((&input[end..], split_selectors(&raw)))
}

/// Splits a selector list on top-level commas.
pub fn split_selectors(text: &str) -> Vec<String> {
    let mut selectors = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            current.push(c);
            if c == '\\' {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                push_selector(&mut selectors, &current);
                current.clear();
                continue;
            }
            '\\' => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    push_selector(&mut selectors, &current);
    selectors
}

fn push_selector(selectors: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        selectors.push(trimmed.to_string());
    }
}

/// Byte index of the first `{` outside a quoted string, or the input length.
fn find_block_start(input: &str) -> usize {
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '{') => return i,
            (None, _) => {}
        }
    }
    input.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_respects_parens_and_strings() {
        assert_eq!(
            split_selectors(":is(.a, .b) > p, a[title=\"x,y\"], .c"),
            vec![":is(.a, .b) > p", "a[title=\"x,y\"]", ".c"]
        );
    }

    #[test]
    fn test_selector_list_stops_at_block() {
        let (rest, selectors) = selector_list("  h1 , /* x */ h2 { color: red }").unwrap();
        assert_eq!(selectors, vec!["h1", "h2"]);
        assert_eq!(rest, "{ color: red }");
    }

    #[test]
    fn test_brace_inside_string_is_not_block() {
        let (rest, selectors) = selector_list("a[title='{'] {}").unwrap();
        assert_eq!(selectors, vec!["a[title='{']"]);
        assert_eq!(rest, "{}");
    }

    #[test]
    fn test_missing_selector_is_empty() {
        let (rest, selectors) = selector_list("{ color: red }").unwrap();
        assert!(selectors.is_empty());
        assert_eq!(rest, "{ color: red }");
    }
}
