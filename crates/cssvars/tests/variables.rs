//! Integration tests for harvesting custom properties and merging variable sources.

use std::collections::BTreeMap;

use cssvars::parser::parse_stylesheet;
use cssvars::serialize::to_css;
use cssvars::variables::{build_variable_map, VariableMap, VariableSources, VariableStore};

fn no_overrides() -> BTreeMap<String, String> {
    BTreeMap::new()
}

fn harvest(
    css: &str,
    overrides: &BTreeMap<String, String>,
    preserve: bool,
) -> (VariableMap, String) {
    let mut sheet = parse_stylesheet(css).unwrap();
    let map = build_variable_map(
        &mut sheet,
        VariableSources {
            overrides,
            preserve,
            store: None,
        },
    );
    (map, to_css(&sheet))
}

// ============================================================================
// HARVESTING
// ============================================================================

#[test]
fn test_root_declarations_are_harvested_and_removed() {
    let css = ":root { --a: 1px; color: red } .b { c: var(--a) }";
    let (map, css) = harvest(css, &no_overrides(), false);
    assert_eq!(map.len(), 1);
    assert_eq!(map["--a"], "1px");
    assert_eq!(css, ":root{color:red}.b{c:var(--a)}");
}

#[test]
fn test_last_declaration_wins() {
    let (map, _) = harvest(":root { --a: 1 } :root { --a: 2; --a: 3 }", &no_overrides(), false);
    assert_eq!(map["--a"], "3");
}

#[test]
fn test_only_exact_root_selector_counts() {
    let (map, css) = harvest(
        ":root, .x { --a: 1 } .y { --b: 2 } @media print { :root { --c: 3 } }",
        &no_overrides(),
        false,
    );
    assert!(map.is_empty());
    assert_eq!(css, ":root,.x{--a:1}.y{--b:2}@media print{:root{--c:3}}");
}

#[test]
fn test_preserve_keeps_root_declarations() {
    let (map, css) = harvest(":root { --a: 1px }", &no_overrides(), true);
    assert_eq!(map["--a"], "1px");
    assert_eq!(css, ":root{--a:1px}");
}

// ============================================================================
// OVERRIDES AND STORE
// ============================================================================

#[test]
fn test_overrides_are_normalized_and_win_over_root() {
    let overrides = BTreeMap::from([
        ("a".to_string(), "2".to_string()),
        ("--b".to_string(), "3".to_string()),
    ]);
    let (map, _) = harvest(":root { --a: 1 }", &overrides, false);
    assert_eq!(map["--a"], "2");
    assert_eq!(map["--b"], "3");
}

#[test]
fn test_preserve_without_store_appends_nothing() {
    let overrides = BTreeMap::from([("gap".to_string(), "4px".to_string())]);
    let (map, css) = harvest(".a { b: c }", &overrides, true);
    assert_eq!(map["--gap"], "4px");
    assert_eq!(css, ".a{b:c}");
}

#[test]
fn test_store_wins_over_overrides_and_root() {
    let mut store = VariableStore::new();
    store.merge([("--a", "3")]);

    let overrides = BTreeMap::from([("--a".to_string(), "2".to_string())]);
    let mut sheet = parse_stylesheet(":root { --a: 1 }").unwrap();
    let map = build_variable_map(
        &mut sheet,
        VariableSources {
            overrides: &overrides,
            preserve: false,
            store: Some(&mut store),
        },
    );

    assert_eq!(map["--a"], "3");
    assert_eq!(store.get("--a"), Some("3"));
}

#[test]
fn test_overrides_are_written_to_store() {
    let mut store = VariableStore::new();
    store.merge([("old", "0")]);

    let overrides = BTreeMap::from([("new".to_string(), "1".to_string())]);
    let mut sheet = parse_stylesheet(":root { --root-only: 5 }").unwrap();
    let map = build_variable_map(
        &mut sheet,
        VariableSources {
            overrides: &overrides,
            preserve: true,
            store: Some(&mut store),
        },
    );

    assert_eq!(map["--old"], "0");
    assert_eq!(map["--new"], "1");
    assert_eq!(map["--root-only"], "5");
    let stored: Vec<_> = store.iter().collect();
    assert_eq!(stored, vec![("--new", "1"), ("--old", "0")]);
    assert_eq!(to_css(&sheet), ":root{--root-only:5}:root{--new:1;--old:0}");
}
