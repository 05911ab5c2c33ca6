//! Serde adapter for union-typed fields.
//!
//! Use with `#[serde(with = "casejson::as_union")]` on a field whose type
//! implements [`TaggedUnion`] by hand; derived unions already route their
//! `Serialize`/`Deserialize` impls through these functions.

use serde::de::{DeserializeSeed, Deserializer};
use serde::ser::Serializer;
use serde::Serialize;

use crate::decode::DecodeSeed;
use crate::descriptor::TaggedUnion;
use crate::encode::Encoded;

pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: TaggedUnion,
    S: Serializer,
{
    Encoded::new(value).serialize(serializer)
}

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: TaggedUnion,
    D: Deserializer<'de>,
{
    DecodeSeed::default().deserialize(deserializer)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Envelope {
        stream: String,
        #[serde(with = "crate::as_union")]
        outcome: Result<u32, String>,
    }

    #[test]
    fn test_field_roundtrip_through_serde_with() {
        let envelope = Envelope {
            stream: "customer-1".to_string(),
            outcome: Err("rejected".to_string()),
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({
                "stream": "customer-1",
                "outcome": {"__Case": "Err", "Item0": "rejected"}
            })
        );

        let parsed: Envelope = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, envelope);
    }

    #[test]
    fn test_field_errors_surface_as_serde_errors() {
        let result: Result<Envelope, _> = serde_json::from_value(json!({
            "stream": "customer-1",
            "outcome": {"__Case": "Maybe", "Item0": 1}
        }));
        let message = result.unwrap_err().to_string();
        assert!(message.contains("unknown case `Maybe`"));
    }
}
