//! Conversion of raw JSON values into declared field types.

use std::any::type_name;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{CodecError, Result};

/// Convert an untyped value read from JSON into `T`.
///
/// Nested unions go through their own `Deserialize` impl, so a field typed as
/// another union is decoded by the same codec.
pub fn coerce<T: DeserializeOwned>(raw: Value) -> Result<T> {
    let converted = T::deserialize(&raw);
    converted.map_err(|err| CodecError::Coercion {
        target: type_name::<T>(),
        reason: err.to_string(),
        value: raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_coerce_scalars() {
        assert_eq!(coerce::<String>(Value::from("x")).unwrap(), "x");
        assert_eq!(coerce::<i64>(Value::from(-3)).unwrap(), -3);
        assert!(coerce::<bool>(Value::Bool(true)).unwrap());
        assert_eq!(coerce::<Option<u8>>(Value::Null).unwrap(), None);
    }

    #[rstest]
    #[case(Value::from("seven"), "u32")]
    #[case(Value::from(1.5), "u32")]
    #[case(Value::Null, "u32")]
    fn test_coerce_rejects_incompatible(#[case] raw: Value, #[case] target: &str) {
        match coerce::<u32>(raw.clone()).unwrap_err() {
            CodecError::Coercion {
                value,
                target: actual,
                ..
            } => {
                assert_eq!(value, raw);
                assert_eq!(actual, target);
            }
            other => panic!("Expected Coercion, got {other:?}"),
        }
    }
}
