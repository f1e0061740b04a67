//! The transform pipeline.
//!
//! parse → filter (optional) → build variable map → resolve `var()` →
//! flatten nested `calc()` (optional) → serialize
//!
//! ## Example
//!
//! ```rust
//! use cssvars::{transform, TransformOptions};
//!
//! let css = ":root { --a: 1px } .x { width: var(--a) }";
//! let out = transform(css, &TransformOptions::default()).unwrap();
//! assert_eq!(out.css, ".x{width:1px}");
//! assert!(out.warnings.is_empty());
//! ```

use crate::calc::fix_nested_calc;
use crate::error::CssVarsError;
use crate::filter::retain_variable_rules;
use crate::parser::parse_stylesheet;
use crate::resolve::resolve_stylesheet;
use crate::serialize::to_css_with_delimiter;
use crate::variables::{build_variable_map, VariableSources, VariableStore};
use crate::warning::{Diagnostics, Warning};

use bitflags::bitflags;
use std::collections::BTreeMap;

bitflags! {
    /// Switches for the optional pipeline stages.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TransformFlags: u8 {
        /// Rewrite `calc()` nested inside `calc()` into parenthesized groups.
        const FIX_NESTED_CALC = 0b0001;
        /// Drop everything that neither defines nor uses a custom property.
        const ONLY_VARS = 0b0010;
        /// Keep custom property declarations and add resolved copies instead
        /// of replacing values.
        const PRESERVE = 0b0100;
        /// Read from and write to the caller's [`VariableStore`].
        const PERSIST = 0b1000;
    }
}

impl Default for TransformFlags {
    fn default() -> Self {
        TransformFlags::FIX_NESTED_CALC
    }
}

/// Settings for one transform call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOptions {
    pub flags: TransformFlags,
    /// Variable overrides. Keys may omit the `--` prefix.
    pub variables: BTreeMap<String, String>,
    /// Written after every serialized style or page rule.
    pub delimiter: String,
}

impl TransformOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fix_nested_calc(self, enabled: bool) -> Self {
        self.with_flag(TransformFlags::FIX_NESTED_CALC, enabled)
    }

    pub fn only_vars(self, enabled: bool) -> Self {
        self.with_flag(TransformFlags::ONLY_VARS, enabled)
    }

    pub fn preserve(self, enabled: bool) -> Self {
        self.with_flag(TransformFlags::PRESERVE, enabled)
    }

    pub fn persist(self, enabled: bool) -> Self {
        self.with_flag(TransformFlags::PERSIST, enabled)
    }

    /// Adds a variable override.
    pub fn variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    fn with_flag(mut self, flag: TransformFlags, enabled: bool) -> Self {
        self.flags.set(flag, enabled);
        self
    }
}

/// Result of a successful transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub css: String,
    /// Every warning raised, in order.
    pub warnings: Vec<Warning>,
}

/// Configures and runs one transform call.
///
/// ```rust
/// use cssvars::{Transformer, TransformOptions, VariableStore};
///
/// let mut store = VariableStore::new();
/// let options = TransformOptions::new().persist(true).variable("gap", "2px");
///
/// let mut seen = Vec::new();
/// let out = Transformer::new(&options)
///     .with_store(&mut store)
///     .on_warning(|w| seen.push(w.to_string()))
///     .run(".a { margin: var(--gap) var(--nope) }")
///     .unwrap();
///
/// assert_eq!(out.css, ".a{margin:2px var(--nope)}");
/// assert_eq!(seen, vec!["variable \"--nope\" is undefined"]);
/// assert_eq!(store.get("--gap"), Some("2px"));
/// ```
pub struct Transformer<'a> {
    options: &'a TransformOptions,
    store: Option<&'a mut VariableStore>,
    diagnostics: Diagnostics<'a>,
}

impl<'a> Transformer<'a> {
    pub fn new(options: &'a TransformOptions) -> Self {
        Self {
            options,
            store: None,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Supplies the persistent store. It is only touched when
    /// [`TransformFlags::PERSIST`] is set.
    pub fn with_store(mut self, store: &'a mut VariableStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Registers a callback invoked once per warning, as it is raised.
    pub fn on_warning(mut self, hook: impl FnMut(&Warning) + 'a) -> Self {
        self.diagnostics = Diagnostics::with_hook(hook);
        self
    }

    /// Runs the pipeline over `css`.
    ///
    /// A parse error aborts the call; nothing is written to the store in that case.
    pub fn run(self, css: &str) -> Result<Transformed, CssVarsError> {
        let Transformer {
            options,
            store,
            mut diagnostics,
        } = self;
        let flags = options.flags;
        let preserve = flags.contains(TransformFlags::PRESERVE);

        let mut stylesheet = parse_stylesheet(css)?;
        if flags.contains(TransformFlags::ONLY_VARS) {
            stylesheet = retain_variable_rules(stylesheet);
        }

        let store = if flags.contains(TransformFlags::PERSIST) {
            if store.is_none() {
                log::debug!("persistence requested without a variable store");
            }
            store
        } else {
            None
        };
        let vars = build_variable_map(
            &mut stylesheet,
            VariableSources {
                overrides: &options.variables,
                preserve,
                store,
            },
        );

        resolve_stylesheet(&mut stylesheet, &vars, preserve, &mut diagnostics);
        if flags.contains(TransformFlags::FIX_NESTED_CALC) {
            fix_nested_calc(&mut stylesheet);
        }

        let css = to_css_with_delimiter(&stylesheet, &options.delimiter);
        let warnings = diagnostics.into_warnings();
        log::debug!(
            "transform produced {} bytes with {} warnings",
            css.len(),
            warnings.len()
        );
        Ok(Transformed { css, warnings })
    }
}

/// Transforms `css` without a persistent store or warning callback.
pub fn transform(css: &str, options: &TransformOptions) -> Result<Transformed, CssVarsError> {
    Transformer::new(options).run(css)
}
