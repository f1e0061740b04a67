//! Non-fatal diagnostics raised while resolving `var()` references.

use thiserror::Error;

/// A problem that was worked around during a transform.
///
/// Warnings never abort processing: the affected declaration is either
/// substituted on a best-effort basis or left exactly as it was written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A `var(` was opened but its argument list never closes.
    #[error("missing closing \")\" in the value \"{value}\"")]
    MissingClosingParen { value: String },

    /// `var()` was called with nothing but whitespace.
    #[error("var() must contain a non-whitespace string")]
    EmptyVar,

    /// The referenced custom property has no value and no fallback was given.
    #[error("variable \"{name}\" is undefined")]
    Undefined { name: String },

    /// The custom property refers back to itself while being expanded.
    #[error("variable \"{name}\" is part of a reference cycle")]
    Cycle { name: String },

    /// Expansion went deeper than the resolver allows.
    #[error("variable \"{name}\" exceeds the maximum var() nesting depth of {limit}")]
    DepthExceeded { name: String, limit: usize },
}

/// Collects warnings for one transform call and forwards each one to an
/// optional caller hook as it is raised.
pub struct Diagnostics<'h> {
    warnings: Vec<Warning>,
    hook: Option<Box<dyn FnMut(&Warning) + 'h>>,
}

impl<'h> Diagnostics<'h> {
    /// Creates a sink that only records warnings.
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
            hook: None,
        }
    }

    /// Creates a sink that records warnings and also passes them to `hook`.
    pub fn with_hook(hook: impl FnMut(&Warning) + 'h) -> Self {
        Self {
            warnings: Vec::new(),
            hook: Some(Box::new(hook)),
        }
    }

    /// Records a warning.
    pub fn warn(&mut self, warning: Warning) {
        log::warn!("{}", warning);
        if let Some(hook) = self.hook.as_mut() {
            hook(&warning);
        }
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Consumes the sink, returning every warning in the order raised.
    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

impl Default for Diagnostics<'_> {
    fn default() -> Self {
        Self::new()
    }
}
