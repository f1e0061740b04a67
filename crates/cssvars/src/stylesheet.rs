//! Stylesheet tree produced by the parser and consumed by every later pass.
//!
//! The tree owns all of its nodes by value. Passes that restructure it
//! (filtering, variable extraction) build replacement lists and swap them in
//! rather than splicing while iterating.

/// Prefix that marks a custom property name.
pub const CUSTOM_PROPERTY_PREFIX: &str = "--";

/// Token that opens a custom property reference in a value.
pub const VAR_FUNCTION: &str = "var(";

/// A property-value pair like `color: red`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }

    /// Whether this declaration defines a custom property (`--name: ...`).
    pub fn is_custom_property(&self) -> bool {
        self.property.starts_with(CUSTOM_PROPERTY_PREFIX)
    }

    /// Whether the value contains a `var()` reference.
    pub fn references_variable(&self) -> bool {
        self.value.contains(VAR_FUNCTION)
    }

    /// Whether this declaration defines or uses a custom property.
    pub fn involves_variables(&self) -> bool {
        self.is_custom_property() || self.references_variable()
    }
}

/// `selector, selector { declarations }`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleRule {
    pub selectors: Vec<String>,
    pub declarations: Vec<Declaration>,
}

impl StyleRule {
    pub fn new(selectors: Vec<String>, declarations: Vec<Declaration>) -> Self {
        Self {
            selectors,
            declarations,
        }
    }

    /// Whether the selector list is exactly `:root`.
    pub fn is_root(&self) -> bool {
        matches!(self.selectors.as_slice(), [only] if only == ":root")
    }
}

/// An at-rule whose block holds further rules (`@media`, `@supports`, `@host`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupRule {
    /// Text between the at-keyword and the block, e.g. `screen and (min-width: 10px)`.
    /// Empty for `@host`.
    pub prelude: String,
    pub rules: Vec<Rule>,
}

/// `@document` with its optional vendor prefix, e.g. `@-moz-document`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentRule {
    pub vendor: Option<String>,
    pub prelude: String,
    pub rules: Vec<Rule>,
}

/// One step of a `@keyframes` block, e.g. `from, 50% { ... }`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keyframe {
    pub selectors: Vec<String>,
    pub declarations: Vec<Declaration>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyframesRule {
    /// Vendor prefix including both dashes, e.g. `-webkit-`.
    pub vendor: Option<String>,
    pub name: String,
    pub frames: Vec<Keyframe>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRule {
    pub selectors: Vec<String>,
    pub declarations: Vec<Declaration>,
}

/// `@custom-media --name media-query;`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomMediaRule {
    pub name: String,
    pub media: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Import,
    Charset,
    Namespace,
}

impl StatementKind {
    pub fn keyword(self) -> &'static str {
        match self {
            StatementKind::Import => "import",
            StatementKind::Charset => "charset",
            StatementKind::Namespace => "namespace",
        }
    }
}

/// A single-line at-rule without a block (`@import`, `@charset`, `@namespace`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatementRule {
    pub kind: StatementKind,
    pub value: String,
}

/// A node in the stylesheet tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rule {
    Style(StyleRule),
    Media(GroupRule),
    Supports(GroupRule),
    Document(DocumentRule),
    Host(GroupRule),
    Keyframes(KeyframesRule),
    Page(PageRule),
    FontFace(Vec<Declaration>),
    CustomMedia(CustomMediaRule),
    Statement(StatementRule),
    /// Comment text without the `/*` `*/` delimiters. Never serialized.
    Comment(String),
}

impl Rule {
    /// Calls `visit` with every declaration list owned by this rule or any
    /// rule nested inside it.
    pub fn walk_declarations_mut(&mut self, visit: &mut dyn FnMut(&mut Vec<Declaration>)) {
        match self {
            Rule::Style(StyleRule { declarations, .. })
            | Rule::Page(PageRule { declarations, .. })
            | Rule::FontFace(declarations) => visit(declarations),
            Rule::Keyframes(keyframes) => {
                for frame in &mut keyframes.frames {
                    visit(&mut frame.declarations);
                }
            }
            Rule::Media(GroupRule { rules, .. })
            | Rule::Supports(GroupRule { rules, .. })
            | Rule::Host(GroupRule { rules, .. })
            | Rule::Document(DocumentRule { rules, .. }) => {
                for rule in rules {
                    rule.walk_declarations_mut(visit);
                }
            }
            Rule::CustomMedia(_) | Rule::Statement(_) | Rule::Comment(_) => {}
        }
    }
}

/// A parsed stylesheet: the ordered top-level rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Calls `visit` with every declaration list in the tree, in document order.
    pub fn walk_declarations_mut(&mut self, mut visit: impl FnMut(&mut Vec<Declaration>)) {
        for rule in &mut self.rules {
            rule.walk_declarations_mut(&mut visit);
        }
    }
}
