//! Property-based tests for the configuration system.

use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::defaults::Defaults;
use crate::parser::ConfigParser;
use crate::tree::{flatten, unflatten};
use crate::value::{parse_bool, ConfigValue};

// Strategy for leaf values (no floats; exact equality matters here)
fn leaf_strategy() -> impl Strategy<Value = ConfigValue> {
    prop_oneof![
        Just(ConfigValue::Null),
        any::<bool>().prop_map(ConfigValue::Bool),
        (-1_000_000i64..1_000_000).prop_map(ConfigValue::Int),
        "[a-z0-9 ]{0,12}".prop_map(ConfigValue::Str),
    ]
}

// Strategy for values nesting non-empty mappings; keys never contain the
// separator, so flatten/unflatten stay mutual inverses
fn value_strategy() -> impl Strategy<Value = ConfigValue> {
    leaf_strategy().prop_recursive(3, 24, 4, |inner| {
        prop::collection::btree_map("[a-z]{1,6}", inner, 1..4).prop_map(ConfigValue::Map)
    })
}

fn nested_map_strategy() -> impl Strategy<Value = BTreeMap<String, ConfigValue>> {
    prop::collection::btree_map("[a-z]{1,6}", value_strategy(), 1..5)
}

proptest! {
    // unflatten is a left inverse of flatten
    #[test]
    fn prop_unflatten_inverts_flatten(nested in nested_map_strategy()) {
        let flat = flatten(&nested, ".");
        let rebuilt = unflatten(&flat, ".");
        prop_assert_eq!(rebuilt, nested);
    }

    // The inverse holds for any separator absent from the keys
    #[test]
    fn prop_inverse_with_slash_separator(nested in nested_map_strategy()) {
        let flat = flatten(&nested, "/");
        let rebuilt = unflatten(&flat, "/");
        prop_assert_eq!(rebuilt, nested);
    }

    // Flat keys never contain a mapping value; every leaf survives
    #[test]
    fn prop_flatten_produces_no_mappings(nested in nested_map_strategy()) {
        let flat = flatten(&nested, ".");
        for value in flat.values() {
            prop_assert!(!matches!(value, ConfigValue::Map(_)));
        }
    }

    // Every option registered under a prefix carries that prefix, and no
    // two registrations in the same call collide
    #[test]
    fn prop_registered_keys_are_prefixed(
        names in prop::collection::btree_set("[a-z_]{1,10}", 1..6),
        prefix in "[a-z_]{1,8}",
    ) {
        let defaults: Defaults = names
            .iter()
            .map(|name| (name.clone(), ConfigValue::Int(1)))
            .collect();

        let mut parser = ConfigParser::new("prop");
        let reserved = parser.specs().len();
        parser.add_args(&defaults, &prefix);

        let registered: Vec<&str> = parser.specs()[reserved..]
            .iter()
            .map(|spec| spec.name.as_str())
            .collect();
        prop_assert_eq!(registered.len(), names.len());
        for (name, flag) in names.iter().zip(&registered) {
            let expected_flag = format!("{prefix}.{name}");
            prop_assert_eq!(expected_flag.as_str(), *flag);
        }
    }

    // Boolean coercion is total over its token alphabet, in any casing
    #[test]
    fn prop_bool_tokens_parse(
        token in prop::sample::select(vec!["yes", "true", "t", "y", "1", "no", "false", "f", "n", "0"]),
        uppercase in any::<bool>(),
    ) {
        let input = if uppercase { token.to_uppercase() } else { token.to_string() };
        let parsed = parse_bool(&input).unwrap();
        let expected = matches!(token, "yes" | "true" | "t" | "y" | "1");
        prop_assert_eq!(parsed, expected);
    }
}
