//! # cssvars - static CSS custom property resolution
//!
//! Rewrites a stylesheet so engines without custom property support still get
//! usable values: every `var(--name[, fallback])` is replaced with the value
//! declared on `:root` (or supplied by the caller), and the `:root` custom
//! property declarations are removed.
//!
//! - **Parsing**: loose, structure-only CSS parsing into a [`Stylesheet`]
//! - **Resolution**: recursive `var()` substitution with fallbacks, cycle and
//!   depth detection
//! - **Post-processing**: optional filtering to variable-related rules and
//!   flattening of nested `calc()`
//! - **Serialization**: minified output with an optional rule delimiter
//!
//! ## Quick Start
//!
//! ```rust
//! use cssvars::{transform, TransformOptions};
//!
//! let source = r#"
//!     :root { --accent: #c00; --gap: 4px; }
//!     .button {
//!         color: var(--accent);
//!         margin: calc(var(--gap) * 2) var(--side, 1px);
//!     }
//! "#;
//!
//! let out = transform(source, &TransformOptions::default()).expect("valid CSS");
//! assert_eq!(out.css, ".button{color:#c00;margin:calc(4px * 2) 1px}");
//! ```
//!
//! ## Variable sources
//!
//! Later sources win:
//!
//! 1. `--name: value` declarations in top-level `:root` rules
//! 2. [`TransformOptions::variables`]
//! 3. A caller-owned [`VariableStore`], when [`TransformFlags::PERSIST`] is set
//!
//! ## Diagnostics
//!
//! Problems that can be worked around (an undefined variable, a reference
//! cycle, a missing `)`) are returned as [`Warning`]s and never abort the call.
//! Only structural parse failures produce a [`CssVarsError`].

pub mod calc;
pub mod error;
pub mod filter;
pub mod parser;
pub mod resolve;
pub mod scan;
pub mod serialize;
pub mod stylesheet;
pub mod transform;
pub mod variables;
pub mod warning;

pub use error::{CssVarsError, SyntaxErrorKind};
pub use stylesheet::Stylesheet;
pub use transform::{transform, TransformFlags, TransformOptions, Transformed, Transformer};
pub use variables::VariableStore;
pub use warning::Warning;
