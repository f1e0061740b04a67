//! `var()` substitution.
//!
//! Every `var(--name[, fallback])` in a declaration value is replaced with the
//! value of `--name` from the [`VariableMap`], or with its fallback when the
//! name is not defined. Variables defined in terms of other variables, and
//! fallbacks that contain further `var()` calls, are expanded recursively.
//!
//! A reference that cannot be resolved is never replaced with placeholder
//! text. It stays in the value exactly as written, and a declaration in which
//! nothing could be substituted is left alone entirely, so legacy engines keep
//! seeing the author's original declaration.

use crate::scan::{self, Marker};
use crate::stylesheet::{Declaration, Stylesheet, VAR_FUNCTION};
use crate::variables::VariableMap;
use crate::warning::{Diagnostics, Warning};

/// Maximum nesting of `var()` expansion before a reference is abandoned.
pub const MAX_DEPTH: usize = 32;

const VAR_START: Marker<'static> = Marker::Literal(VAR_FUNCTION);

/// Outcome of resolving one declaration value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Every reference was substituted.
    Resolved(String),
    /// Some references were substituted; the others are kept verbatim.
    Partial(String),
    /// Nothing could be substituted.
    Unresolved,
}

impl Resolution {
    /// The value to write back, if any.
    pub fn into_value(self) -> Option<String> {
        match self {
            Resolution::Resolved(value) | Resolution::Partial(value) => Some(value),
            Resolution::Unresolved => None,
        }
    }
}

/// Resolves every `var()` reference in `value`.
pub fn resolve_value(
    value: &str,
    vars: &VariableMap,
    diagnostics: &mut Diagnostics<'_>,
) -> Resolution {
    let mut resolver = Resolver {
        vars,
        diagnostics,
        expanding: Vec::new(),
    };
    let expansion = resolver.expand(value, 0);

    if expansion.unresolved == 0 {
        Resolution::Resolved(expansion.text)
    } else if expansion.substituted == 0 {
        Resolution::Unresolved
    } else {
        Resolution::Partial(expansion.text)
    }
}

/// Resolves references in every declaration of the stylesheet.
///
/// Values that resolve are overwritten in place or, with `preserve` set,
/// written to a copy of the declaration inserted right after the original.
pub fn resolve_stylesheet(
    stylesheet: &mut Stylesheet,
    vars: &VariableMap,
    preserve: bool,
    diagnostics: &mut Diagnostics<'_>,
) {
    stylesheet.walk_declarations_mut(|declarations| {
        resolve_declarations(declarations, vars, preserve, diagnostics);
    });
}

fn resolve_declarations(
    declarations: &mut Vec<Declaration>,
    vars: &VariableMap,
    preserve: bool,
    diagnostics: &mut Diagnostics<'_>,
) {
    let mut resolved = Vec::with_capacity(declarations.len());

    for mut decl in declarations.drain(..) {
        if !decl.references_variable() {
            resolved.push(decl);
            continue;
        }

        let value = resolve_value(&decl.value, vars, diagnostics)
            .into_value()
            .filter(|value| *value != decl.value);
        let Some(value) = value else {
            resolved.push(decl);
            continue;
        };

        log::trace!("{}: {} -> {}", decl.property, decl.value, value);
        if preserve {
            let copy = Declaration::new(decl.property.clone(), value);
            resolved.push(decl);
            resolved.push(copy);
        } else {
            decl.value = value;
            resolved.push(decl);
        }
    }

    *declarations = resolved;
}

/// Text produced by expanding a value, with counts of what happened to the
/// references found in it.
struct Expansion {
    text: String,
    substituted: usize,
    unresolved: usize,
}

impl Expansion {
    /// Nothing in the text could be resolved.
    fn failed(&self) -> bool {
        self.unresolved > 0 && self.substituted == 0
    }
}

struct Resolver<'v, 'd, 'h> {
    vars: &'v VariableMap,
    diagnostics: &'d mut Diagnostics<'h>,
    /// Names currently being expanded, for cycle detection.
    expanding: Vec<String>,
}

impl Resolver<'_, '_, '_> {
    fn expand(&mut self, value: &str, depth: usize) -> Expansion {
        let mut expansion = Expansion {
            text: String::with_capacity(value.len()),
            substituted: 0,
            unresolved: 0,
        };
        let mut rest = value;

        while let Some(span) = scan::balanced(VAR_START, ')', rest) {
            expansion.text.push_str(span.pre);
            match self.call(span.body, depth) {
                Some(inner) => {
                    expansion.text.push_str(&inner.text);
                    expansion.substituted += 1 + inner.substituted;
                    expansion.unresolved += inner.unresolved;
                }
                None => {
                    expansion.text.push_str(span.whole);
                    expansion.unresolved += 1;
                }
            }
            rest = span.post;
        }

        if scan::find(VAR_START, rest).is_some() {
            self.diagnostics.warn(Warning::MissingClosingParen {
                value: value.to_string(),
            });
            expansion.unresolved += 1;
        }
        expansion.text.push_str(rest);
        expansion
    }

    /// Expands the arguments of one `var()` call.
    fn call(&mut self, arguments: &str, depth: usize) -> Option<Expansion> {
        if arguments.trim().is_empty() {
            self.diagnostics.warn(Warning::EmptyVar);
            return None;
        }

        let (name, fallback) = split_arguments(arguments);
        if depth >= MAX_DEPTH {
            self.diagnostics.warn(Warning::DepthExceeded {
                name: name.to_string(),
                limit: MAX_DEPTH,
            });
            return None;
        }

        let vars = self.vars;
        if let Some(value) = vars.get(name) {
            if self.expanding.iter().any(|n| n == name) {
                self.diagnostics.warn(Warning::Cycle {
                    name: name.to_string(),
                });
            } else {
                self.expanding.push(name.to_string());
                let expansion = self.expand(value, depth + 1);
                self.expanding.pop();
                if !expansion.failed() {
                    return Some(expansion);
                }
            }
        }

        match fallback {
            Some(fallback) => Some(self.expand(fallback, depth + 1)).filter(|e| !e.failed()),
            None => {
                if !vars.contains_key(name) {
                    self.diagnostics.warn(Warning::Undefined {
                        name: name.to_string(),
                    });
                }
                None
            }
        }
    }
}

/// Splits `var()` arguments into the variable name and the fallback after
/// the first comma. An empty fallback counts as none.
fn split_arguments(arguments: &str) -> (&str, Option<&str>) {
    match arguments.split_once(',') {
        Some((name, fallback)) => {
            let fallback = fallback.trim();
            (name.trim(), (!fallback.is_empty()).then_some(fallback))
        }
        None => (arguments.trim(), None),
    }
}
