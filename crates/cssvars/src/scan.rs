//! Balanced-span scanning.
//!
//! Locates the first substring opened by a start marker and closed by a
//! matching end delimiter, skipping over nested pairs in between. This is how
//! `var(...)` and `calc(...)` argument lists are pulled out of declaration
//! values even when they contain further function calls or quoted strings.
//!
//! ```rust
//! use cssvars::scan::{balanced, Marker};
//!
//! let span = balanced(Marker::Literal("var("), ')', "calc(var(--a, max(1px, 2px)) * 2)").unwrap();
//! assert_eq!(span.pre, "calc(");
//! assert_eq!(span.body, "--a, max(1px, 2px)");
//! assert_eq!(span.post, " * 2)");
//! ```

/// The opening side of a balanced span.
#[derive(Clone, Copy, Debug)]
pub enum Marker<'p> {
    /// Matches an exact piece of text, e.g. `var(`.
    Literal(&'p str),
    /// Matches when the function returns the length of the text it accepts
    /// at the start of its input.
    Pattern(fn(&str) -> Option<usize>),
}

impl Marker<'_> {
    /// Returns the byte length of the marker if it matches at the start of `input`.
    pub fn match_at(&self, input: &str) -> Option<usize> {
        match self {
            Marker::Literal(text) => input.starts_with(text).then_some(text.len()),
            Marker::Pattern(matcher) => matcher(input).filter(|len| *len > 0),
        }
    }
}

/// A span found by [`balanced`].
///
/// `start` is the byte index of the start marker and `end` the byte index of
/// the closing delimiter, both relative to the scanned subject.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BalancedSpan<'a> {
    pub start: usize,
    pub end: usize,
    /// Text before the start marker.
    pub pre: &'a str,
    /// Text between the start marker and the closing delimiter.
    pub body: &'a str,
    /// Text after the closing delimiter.
    pub post: &'a str,
    /// The start marker exactly as it matched.
    pub opener: &'a str,
    /// The whole span, from the start marker through the closing delimiter.
    pub whole: &'a str,
}

/// Finds the first span in `subject` opened by `start` and closed by `end`.
///
/// Inside the span, further matches of `start` and bare occurrences of the
/// delimiter paired with `end` (`(` for `)`, `[` for `]`, `{` for `}`) open
/// nested levels that must close before the span does. Quoted strings are
/// skipped whole and a backslash escapes the character after it, both while
/// searching for the marker and while scanning the body.
///
/// Returns `None` when no start marker is found or the span never closes.
pub fn balanced<'a>(start: Marker<'_>, end: char, subject: &'a str) -> Option<BalancedSpan<'a>> {
    let open = opening_delimiter(end);
    let mut cursor = Cursor::new(subject);
    let mut depth = 0usize;
    let mut span_start = 0;
    let mut body_start = 0;

    while let Some(c) = cursor.peek() {
        if c == '\\' {
            cursor.skip_escape();
            continue;
        }
        if c == '"' || c == '\'' {
            cursor.skip_string(c);
            continue;
        }
        if let Some(len) = start.match_at(cursor.rest()) {
            if depth == 0 {
                span_start = cursor.pos;
                body_start = cursor.pos + len;
            }
            depth += 1;
            cursor.advance(len);
            continue;
        }
        if depth > 0 {
            if Some(c) == open {
                depth += 1;
            } else if c == end {
                depth -= 1;
                if depth == 0 {
                    let end_idx = cursor.pos;
                    let after = end_idx + c.len_utf8();
                    return Some(BalancedSpan {
                        start: span_start,
                        end: end_idx,
                        pre: &subject[..span_start],
                        body: &subject[body_start..end_idx],
                        post: &subject[after..],
                        opener: &subject[span_start..body_start],
                        whole: &subject[span_start..after],
                    });
                }
            }
        }
        cursor.advance(c.len_utf8());
    }
    None
}

/// Returns the byte index of the first match of `marker` outside quoted strings.
pub fn find(marker: Marker<'_>, subject: &str) -> Option<usize> {
    let mut cursor = Cursor::new(subject);
    while let Some(c) = cursor.peek() {
        match c {
            '\\' => cursor.skip_escape(),
            '"' | '\'' => cursor.skip_string(c),
            _ if marker.match_at(cursor.rest()).is_some() => return Some(cursor.pos),
            _ => cursor.advance(c.len_utf8()),
        }
    }
    None
}

fn opening_delimiter(end: char) -> Option<char> {
    match end {
        ')' => Some('('),
        ']' => Some('['),
        '}' => Some('{'),
        _ => None,
    }
}

/// Byte cursor over a string that always sits on a char boundary.
struct Cursor<'a> {
    subject: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(subject: &'a str) -> Self {
        Self { subject, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.subject[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self, len: usize) {
        self.pos = (self.pos + len).min(self.subject.len());
    }

    fn skip_escape(&mut self) {
        self.advance(1);
        if let Some(next) = self.peek() {
            self.advance(next.len_utf8());
        }
    }

    /// Skips a quoted string starting at the cursor. An unterminated string
    /// runs to the end of the subject.
    fn skip_string(&mut self, quote: char) {
        self.advance(quote.len_utf8());
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.skip_escape();
                continue;
            }
            self.advance(c.len_utf8());
            if c == quote {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc_start(input: &str) -> Option<usize> {
        input.starts_with("calc(").then_some(5)
    }

    #[test]
    fn test_simple_span() {
        let span = balanced(Marker::Literal("("), ')', "a(b)c").unwrap();
        assert_eq!(span.start, 1);
        assert_eq!(span.end, 3);
        assert_eq!((span.pre, span.body, span.post), ("a", "b", "c"));
    }

    #[test]
    fn test_nested_parens_are_skipped() {
        let subject = "var(--a, rgb(1, 2, 3)) tail";
        let span = balanced(Marker::Literal("var("), ')', subject).unwrap();
        assert_eq!(span.body, "--a, rgb(1, 2, 3)");
        assert_eq!(span.post, " tail");
        assert_eq!(span.whole, "var(--a, rgb(1, 2, 3))");
    }

    #[test]
    fn test_nested_start_markers_are_skipped() {
        let span = balanced(Marker::Pattern(calc_start), ')', "calc(1px + calc(2px))").unwrap();
        assert_eq!(span.body, "1px + calc(2px)");
        assert_eq!(span.opener, "calc(");
    }

    #[test]
    fn test_delimiters_in_strings_do_not_count() {
        let span = balanced(Marker::Literal("url("), ')', "url(\"a)b\") x").unwrap();
        assert_eq!(span.body, "\"a)b\"");
        assert_eq!(span.post, " x");
    }

    #[test]
    fn test_marker_inside_string_is_ignored() {
        assert!(balanced(Marker::Literal("var("), ')', "\"var(--x)\"").is_none());
        assert_eq!(find(Marker::Literal("var("), "'var(' var(--x)"), Some(7));
    }

    #[test]
    fn test_unclosed_span() {
        assert!(balanced(Marker::Literal("var("), ')', "var(--a").is_none());
        assert!(balanced(Marker::Literal("var("), ')', "no markers").is_none());
    }

    #[test]
    fn test_escaped_delimiter() {
        let span = balanced(Marker::Literal("("), ')', r"(a\)b)").unwrap();
        assert_eq!(span.body, r"a\)b");
    }
}
