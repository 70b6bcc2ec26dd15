//! Property-based tests for equality and duplication.
//!
//! Values are generated as trees over `interface {}` containers, so every
//! slice, array, map and record is well-typed whatever its elements are.
//! The properties checked:
//! 1. Equality is reflexive and symmetric.
//! 2. A duplicate equals its source.
//! 3. Mutating the source after duplication leaves the duplicate unchanged.
//! 4. Order-insensitive comparison accepts every permutation.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use meta::{array_equal, array_item_equal, duplicate, equal, Field, Type, Value};
use proptest::prelude::*;

// -- Value Strategies --

fn pair() -> Type {
    Type::named(
        "Pair",
        &Type::record([Field::new("Left", Type::any()), Field::new("right", Type::any())]),
    )
}

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::bool),
        any::<i64>().prop_map(Value::int),
        any::<u64>().prop_map(Value::uint),
        // NaN is never equal to itself
        (-1.0e9..1.0e9f64).prop_map(Value::float),
        "[a-z]{0,6}".prop_map(Value::string),
    ]
}

/// Nested values up to four levels deep.
fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5)
                .prop_map(|items| Value::slice(&Type::any(), items).unwrap()),
            prop::collection::vec(inner.clone(), 0..4)
                .prop_map(|items| Value::array(&Type::any(), items).unwrap()),
            prop::collection::vec(("[a-z]{0,3}", inner.clone()), 0..4).prop_map(|entries| {
                let entries = entries.into_iter().map(|(k, v)| (Value::string(k), v));
                Value::map(&Type::string(), &Type::any(), entries).unwrap()
            }),
            (inner.clone(), inner.clone())
                .prop_map(|(left, right)| Value::record(&pair(), vec![left, right]).unwrap()),
            inner.prop_map(|target| Value::pointer_to(target).unwrap()),
        ]
    })
}

fn ints(items: &[i64]) -> Value {
    Value::slice(&Type::int(), items.iter().copied().map(Value::int).collect()).unwrap()
}

/// A vector of small integers and a shuffled copy of it.
fn permutation_strategy() -> impl Strategy<Value = (Vec<i64>, Vec<i64>)> {
    prop::collection::vec(-8i64..8, 0..12)
        .prop_flat_map(|items| (Just(items.clone()), Just(items).prop_shuffle()))
}

// -- Properties --

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_equal_is_reflexive(value in value_strategy()) {
        prop_assert!(equal(&value, &value));
        prop_assert!(equal(&value, &value.clone()));
    }

    #[test]
    fn prop_equal_is_symmetric(a in value_strategy(), b in value_strategy()) {
        prop_assert_eq!(equal(&a, &b), equal(&b, &a));
    }

    #[test]
    fn prop_duplicate_equals_source(value in value_strategy()) {
        let copy = duplicate(&value).unwrap();
        prop_assert!(equal(&copy, &value));
        prop_assert!(equal(&value, &copy));
        prop_assert_eq!(copy.ty(), value.ty());
    }

    #[test]
    fn prop_duplicate_is_isolated(
        items in prop::collection::vec(value_strategy(), 0..5),
        extra in value_strategy(),
    ) {
        let len = items.len();
        let mut source = Value::slice(&Type::any(), items).unwrap();
        let copy = duplicate(&source).unwrap();
        let rendered = copy.to_string();

        source.push(extra).unwrap();
        if len > 0 {
            source.set_index(0, Value::string("overwritten")).unwrap();
        }

        prop_assert_eq!(copy.len(), Some(len));
        prop_assert_eq!(copy.to_string(), rendered);
        prop_assert!(!equal(&source, &copy));
    }

    #[test]
    fn prop_item_equal_accepts_permutations((items, shuffled) in permutation_strategy()) {
        let (a, b) = (ints(&items), ints(&shuffled));
        prop_assert!(array_item_equal(&a, &b));
        prop_assert!(array_item_equal(&b, &a));
        prop_assert_eq!(array_equal(&a, &b), items == shuffled);
    }

    #[test]
    fn prop_item_equal_is_symmetric(
        a in prop::collection::vec(-3i64..3, 0..6),
        b in prop::collection::vec(-3i64..3, 0..6),
    ) {
        prop_assert_eq!(
            array_item_equal(&ints(&a), &ints(&b)),
            array_item_equal(&ints(&b), &ints(&a))
        );
    }
}
