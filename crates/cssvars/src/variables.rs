//! Custom property harvesting and the persistent variable store.
//!
//! Variables come from three places, applied in this order so that later
//! sources win:
//!
//! 1. `--name: value` declarations in top-level rules whose selector list is
//!    exactly `:root` (the last declaration of a name wins)
//! 2. Overrides supplied by the caller
//! 3. The contents of a [`VariableStore`], when persistence is enabled
//!
//! Overrides are persisted only for names the store does not already hold,
//! so a stored value keeps winning over later overrides until the store is
//! [`reset`](VariableStore::reset).
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use cssvars::parser::parse_stylesheet;
//! use cssvars::variables::{build_variable_map, VariableSources, VariableStore};
//!
//! let mut sheet = parse_stylesheet(":root { --a: 1 }").unwrap();
//! let mut store = VariableStore::new();
//! store.merge([("--a", "3")]);
//!
//! let overrides = BTreeMap::from([("a".to_string(), "2".to_string())]);
//! let sources = VariableSources {
//!     overrides: &overrides,
//!     preserve: false,
//!     store: Some(&mut store),
//! };
//! let map = build_variable_map(&mut sheet, sources);
//! assert_eq!(map["--a"], "3");
//! ```

use crate::stylesheet::{
    Declaration, Rule, StyleRule, Stylesheet, CUSTOM_PROPERTY_PREFIX,
};
use std::collections::{BTreeMap, HashMap};

/// Custom property name (with its `--` prefix) to value.
pub type VariableMap = HashMap<String, String>;

/// Variables that outlive a single transform call.
///
/// A store starts empty, only ever grows through [`merge`](Self::merge), and
/// is emptied by [`reset`](Self::reset). It is owned by the caller; sharing
/// one between threads requires external locking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableStore {
    variables: BTreeMap<String, String>,
}

impl VariableStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a variable. The `--` prefix is optional.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(&normalize_name(name)).map(String::as_str)
    }

    /// Adds or overwrites variables. Names are normalized to carry a `--` prefix.
    pub fn merge<I, K, V>(&mut self, variables: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (name, value) in variables {
            self.variables.insert(normalize_name(name.as_ref()), value.into());
        }
    }

    /// Removes every stored variable.
    pub fn reset(&mut self) {
        self.variables.clear();
    }

    /// Iterates stored variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Guarantees a custom property name starts with exactly one `--`.
///
/// `primary`, `-primary` and `--primary` all become `--primary`.
pub fn normalize_name(name: &str) -> String {
    format!("{}{}", CUSTOM_PROPERTY_PREFIX, name.trim().trim_start_matches('-'))
}

/// Inputs to [`build_variable_map`] beyond the stylesheet itself.
pub struct VariableSources<'a> {
    /// Caller overrides; keys need not carry the `--` prefix.
    pub overrides: &'a BTreeMap<String, String>,
    /// Keep custom property declarations in the tree instead of removing them.
    pub preserve: bool,
    /// The persistent store, present only when persistence is enabled.
    pub store: Option<&'a mut VariableStore>,
}

/// Builds the variable map for a stylesheet.
///
/// Custom property declarations are harvested from top-level `:root` rules
/// and, unless `preserve` is set, removed from them. Caller overrides are
/// then applied. With a store, overrides for names it does not hold yet are
/// written into it, and the store's full contents are applied on top. With
/// both a store and `preserve`, a `:root` rule holding the whole store is
/// appended so the output still declares it.
pub fn build_variable_map(
    stylesheet: &mut Stylesheet,
    sources: VariableSources<'_>,
) -> VariableMap {
    let mut map = VariableMap::new();

    for rule in &mut stylesheet.rules {
        let Rule::Style(style) = rule else { continue };
        if !style.is_root() {
            continue;
        }
        for decl in style.declarations.iter().filter(|d| d.is_custom_property()) {
            map.insert(decl.property.clone(), decl.value.clone());
        }
        if !sources.preserve {
            style.declarations.retain(|d| !d.is_custom_property());
        }
    }
    log::debug!("harvested {} custom properties from :root", map.len());

    let overrides: BTreeMap<String, String> = sources
        .overrides
        .iter()
        .map(|(name, value)| (normalize_name(name), value.clone()))
        .collect();
    map.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));

    let Some(store) = sources.store else {
        return map;
    };
    let unstored: Vec<(&String, String)> = overrides
        .iter()
        .filter(|(name, _)| store.get(name).is_none())
        .map(|(name, value)| (name, value.clone()))
        .collect();
    store.merge(unstored);
    map.extend(store.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    log::debug!("applied {} persisted custom properties", store.len());

    if sources.preserve && !store.is_empty() {
        let declared: Vec<Declaration> =
            store.iter().map(|(k, v)| Declaration::new(k, v)).collect();
        stylesheet
            .rules
            .push(Rule::Style(StyleRule::new(vec![":root".to_string()], declared)));
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("primary"), "--primary");
        assert_eq!(normalize_name("-primary"), "--primary");
        assert_eq!(normalize_name("--primary"), "--primary");
    }

    #[test]
    fn test_store_lifecycle() {
        let mut store = VariableStore::new();
        assert!(store.is_empty());

        store.merge([("a", "1"), ("--b", "2")]);
        store.merge([("a", "3")]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("--a"), Some("3"));
        assert_eq!(store.get("b"), Some("2"));

        store.reset();
        assert!(store.is_empty());
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn test_stored_value_beats_override() {
        let mut store = VariableStore::new();
        store.merge([("a", "3")]);

        let overrides = BTreeMap::from([
            ("a".to_string(), "2".to_string()),
            ("b".to_string(), "4".to_string()),
        ]);
        let mut sheet = Stylesheet::new(vec![Rule::Style(StyleRule::new(
            vec![":root".to_string()],
            vec![Declaration::new("--a", "1")],
        ))]);
        let map = build_variable_map(
            &mut sheet,
            VariableSources {
                overrides: &overrides,
                preserve: false,
                store: Some(&mut store),
            },
        );

        assert_eq!(map["--a"], "3");
        assert_eq!(map["--b"], "4");
        assert_eq!(store.get("a"), Some("3"));
        assert_eq!(store.get("b"), Some("4"));
    }
}
