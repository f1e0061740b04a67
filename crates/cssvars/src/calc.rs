//! Flattening of nested `calc()` expressions.
//!
//! Substituting variables often produces `calc()` inside `calc()`, which older
//! engines reject. They do accept plain parentheses for grouping, so every
//! nested (optionally vendor-prefixed) `calc(` is rewritten to `(`:
//!
//! ```rust
//! use cssvars::calc::flatten_nested_calc;
//!
//! assert_eq!(
//!     flatten_nested_calc("calc(1px + calc(2px + 3px))"),
//!     "calc(1px + (2px + 3px))"
//! );
//! ```

use crate::scan::{self, Marker};
use crate::stylesheet::Stylesheet;

use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::char;
use nom::combinator::{opt, recognize};
use nom::sequence::{delimited, pair};
use nom::IResult;

const CALC_START: Marker<'static> = Marker::Pattern(calc_start);

/// `calc(` with an optional vendor prefix such as `-webkit-`.
fn calc_function(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        opt(delimited(
            char('-'),
            take_while1(|c: char| c.is_ascii_lowercase()),
            char('-'),
        )),
        tag("calc("),
    ))(input)
}

fn calc_start(input: &str) -> Option<usize> {
    calc_function(input).ok().map(|(_, matched)| matched.len())
}

/// Rewrites every `calc()` in `value` so none contains another `calc()`.
///
/// Each outermost `calc(` keeps its own prefix; nested ones become bare
/// parentheses. An unterminated `calc(` and everything after it is left as is.
pub fn flatten_nested_calc(value: &str) -> String {
    let mut flattened = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(root) = scan::balanced(CALC_START, ')', rest) {
        let mut body = root.body.to_string();
        while let Some(nested) = scan::balanced(CALC_START, ')', &body) {
            body = format!("{}({}){}", nested.pre, nested.body, nested.post);
        }

        flattened.push_str(root.pre);
        flattened.push_str(root.opener);
        flattened.push_str(&body);
        flattened.push(')');
        rest = root.post;
    }

    flattened.push_str(rest);
    flattened
}

/// Flattens nested `calc()` in every declaration of the stylesheet.
pub fn fix_nested_calc(stylesheet: &mut Stylesheet) {
    stylesheet.walk_declarations_mut(|declarations| {
        for decl in declarations.iter_mut() {
            if scan::find(CALC_START, &decl.value).is_some() {
                decl.value = flatten_nested_calc(&decl.value);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_function_prefixes() {
        assert_eq!(calc_start("calc(1px)"), Some(5));
        assert_eq!(calc_start("-webkit-calc(1px)"), Some(13));
        assert_eq!(calc_start("-moz-calc("), Some(10));
        assert_eq!(calc_start("clamp("), None);
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let once = flatten_nested_calc("calc(1px + calc(2px + 3px))");
        assert_eq!(flatten_nested_calc(&once), once);
    }

    #[test]
    fn test_deeply_nested_and_prefixed() {
        assert_eq!(
            flatten_nested_calc("-webkit-calc(100% - -webkit-calc(2 * calc(1px + 1em)))"),
            "-webkit-calc(100% - (2 * (1px + 1em)))"
        );
    }

    #[test]
    fn test_multiple_calcs_and_tail() {
        assert_eq!(
            flatten_nested_calc("calc(1px + calc(2px)) calc(calc(3px)) auto"),
            "calc(1px + (2px)) calc((3px)) auto"
        );
    }

    #[test]
    fn test_unterminated_calc_is_untouched() {
        assert_eq!(flatten_nested_calc("calc(1px + calc(2px)"), "calc(1px + calc(2px)");
    }
}
