//! Error types for stylesheet parsing.
//!
//! Parse failures are fatal: a single structural violation aborts the whole
//! transform call and no partial tree is returned. Non-fatal problems found
//! while resolving `var()` references are reported as
//! [`Warning`](crate::warning::Warning)s instead.

use thiserror::Error;

/// The structural violation that stopped the parser.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// A `/*` comment was opened but never closed.
    #[error("end of comment is missing")]
    UnterminatedComment,

    /// A style rule block was found without any selector in front of it.
    #[error("selector missing")]
    MissingSelector,

    /// A declaration property was not followed by `:`.
    #[error("property missing ':'")]
    MissingColon,

    /// A block was expected but no `{` was found.
    #[error("missing '{{'")]
    MissingOpenBrace,

    /// A block was opened but its closing `}` was not found.
    #[error("missing '}}'")]
    MissingCloseBrace,

    /// `@keyframes` was not followed by an animation name.
    #[error("@keyframes missing name")]
    KeyframesMissingName,

    /// A `}` appeared where no block was open.
    #[error("extra closing bracket")]
    ExtraClosingBrace,
}

/// Errors that can occur while transforming a stylesheet.
///
/// # Examples
///
/// ```rust
/// use cssvars::parser::parse_stylesheet;
/// use cssvars::{CssVarsError, SyntaxErrorKind};
///
/// let err = parse_stylesheet(".a { color red }").unwrap_err();
/// assert!(matches!(
///     err,
///     CssVarsError::Syntax { kind: SyntaxErrorKind::MissingColon, .. }
/// ));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CssVarsError {
    /// The stylesheet text could not be parsed.
    ///
    /// `line` and `column` are 1-based and point at the text the parser was
    /// looking at when it gave up.
    #[error("CSS parse error: {kind} at {line}:{column}")]
    Syntax {
        kind: SyntaxErrorKind,
        line: usize,
        column: usize,
    },
}

impl CssVarsError {
    /// Builds a syntax error located at `offset` bytes into `source`.
    pub fn syntax_at(kind: SyntaxErrorKind, source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let consumed = &source[..offset];
        let line = consumed.matches('\n').count() + 1;
        let line_start = consumed.rfind('\n').map_or(0, |i| i + 1);
        let column = consumed[line_start..].chars().count() + 1;
        CssVarsError::Syntax { kind, line, column }
    }

    /// The kind of syntax violation, for callers that match on it.
    pub fn kind(&self) -> SyntaxErrorKind {
        match self {
            CssVarsError::Syntax { kind, .. } => *kind,
        }
    }
}
