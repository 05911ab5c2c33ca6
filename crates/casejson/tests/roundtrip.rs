//! Property tests: every constructible value of each shape survives a
//! round-trip, and only discriminated unions carry the tag.

mod common;

use casejson::{DISCRIMINATOR, ShapeCategory, TaggedUnion};
use common::{Address, CustomerEvent, Lookup, Registration, Span, Wrapper};
use proptest::prelude::*;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, TaggedUnion)]
enum Tree {
    Leaf(u32),
    Node(Box<Tree>, Box<Tree>),
}

fn arb_lookup() -> impl Strategy<Value = Lookup> {
    prop_oneof![Just(Lookup::Missing), any::<u32>().prop_map(Lookup::Found)]
}

fn arb_span() -> impl Strategy<Value = Span> {
    prop_oneof![
        Just(Span::Unbounded),
        (any::<i64>(), any::<i64>()).prop_map(|(start, end)| Span::Range { start, end }),
    ]
}

fn arb_wrapper() -> impl Strategy<Value = Wrapper> {
    (any::<String>(), any::<String>())
        .prop_map(|(street, city)| Wrapper::Wrapped(Address { street, city }))
}

fn arb_registration() -> impl Strategy<Value = Registration> {
    (any::<String>(), any::<String>())
        .prop_map(|(company, number)| Registration::Registered(company, number))
}

fn arb_event() -> impl Strategy<Value = CustomerEvent> {
    prop_oneof![
        (any::<String>(), any::<String>()).prop_map(|(company_name, number)| {
            CustomerEvent::CustomerRegistered {
                company_name,
                number,
            }
        }),
        any::<String>().prop_map(CustomerEvent::CustomerDeleted),
    ]
}

fn arb_tree() -> impl Strategy<Value = Tree> {
    any::<u32>()
        .prop_map(Tree::Leaf)
        .prop_recursive(4, 32, 2, |inner| {
            (inner.clone(), inner)
                .prop_map(|(left, right)| Tree::Node(Box::new(left), Box::new(right)))
        })
}

/// Encode, check the tag placement for the union's shape, decode again.
fn roundtrip<T>(value: &T) -> Result<T, TestCaseError>
where
    T: TaggedUnion + std::fmt::Debug,
{
    let encoded = casejson::encode(value).map_err(|err| TestCaseError::fail(err.to_string()))?;
    let shape = casejson::shape_of::<T>().map_err(|err| TestCaseError::fail(err.to_string()))?;

    match (&encoded, shape) {
        (Value::Object(map), ShapeCategory::AsDiscriminatedObject) => {
            prop_assert_eq!(map.keys().next().map(String::as_str), Some(DISCRIMINATOR));
        }
        (Value::Object(map), ShapeCategory::AsNull | ShapeCategory::AsFieldObject) => {
            prop_assert!(!map.contains_key(DISCRIMINATOR));
        }
        _ => {}
    }

    let text = encoded.to_string();
    casejson::from_str(&text).map_err(|err| TestCaseError::fail(err.to_string()))
}

proptest! {
    #[test]
    fn optional_payload_roundtrip(value in arb_lookup()) {
        prop_assert_eq!(roundtrip(&value)?, value);
    }

    #[test]
    fn optional_record_roundtrip(value in arb_span()) {
        prop_assert_eq!(roundtrip(&value)?, value);
    }

    #[test]
    fn bare_value_roundtrip(value in arb_wrapper()) {
        prop_assert_eq!(roundtrip(&value)?, value);
    }

    #[test]
    fn field_object_roundtrip(value in arb_registration()) {
        prop_assert_eq!(roundtrip(&value)?, value);
    }

    #[test]
    fn discriminated_roundtrip(value in arb_event()) {
        prop_assert_eq!(roundtrip(&value)?, value);
    }

    #[test]
    fn recursive_roundtrip(value in arb_tree()) {
        prop_assert_eq!(roundtrip(&value)?, value);
    }

    #[test]
    fn builtin_roundtrip(
        option in proptest::option::of(any::<String>()),
        result in prop_oneof![
            prop::collection::vec(any::<u8>(), 0..8).prop_map(Ok::<Vec<u8>, String>),
            any::<String>().prop_map(Err::<Vec<u8>, String>),
        ],
    ) {
        prop_assert_eq!(roundtrip(&option)?, option);
        prop_assert_eq!(roundtrip(&result)?, result);
    }
}
