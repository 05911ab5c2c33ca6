//! Text, byte and value entry points.
//!
//! [`UnionCodec`] carries a [`CodecConfig`]; the free functions use the
//! default configuration.

use std::io;

use serde::Deserialize;
use serde_json::Value;

use crate::config::CodecConfig;
use crate::decode::{FieldKeysScope, RawPayload, resolve};
use crate::descriptor::TaggedUnion;
use crate::encode::Encoded;
use crate::error::Result;
use crate::plan::plan_for;

/// JSON codec for tagged unions
#[derive(Debug, Clone, Default)]
pub struct UnionCodec {
    config: CodecConfig,
}

impl UnionCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode a union value into a JSON value.
    pub fn encode<T: TaggedUnion>(&self, value: &T) -> Result<Value> {
        plan_for::<T>()?;
        Ok(serde_json::to_value(Encoded::new(value))?)
    }

    /// Decode a JSON value into the union `T`.
    pub fn decode<T: TaggedUnion>(&self, value: Value) -> Result<T> {
        let _scope = FieldKeysScope::enter(self.config.field_keys);
        let payload = RawPayload::deserialize(value)?;
        resolve(payload, self.config.field_keys)
    }

    pub fn to_vec<T: TaggedUnion>(&self, value: &T) -> Result<Vec<u8>> {
        plan_for::<T>()?;
        let encoded = Encoded::new(value);
        let bytes = if self.config.pretty {
            serde_json::to_vec_pretty(&encoded)?
        } else {
            serde_json::to_vec(&encoded)?
        };
        Ok(bytes)
    }

    pub fn to_string<T: TaggedUnion>(&self, value: &T) -> Result<String> {
        plan_for::<T>()?;
        let encoded = Encoded::new(value);
        let text = if self.config.pretty {
            serde_json::to_string_pretty(&encoded)?
        } else {
            serde_json::to_string(&encoded)?
        };
        Ok(text)
    }

    pub fn to_writer<W: io::Write, T: TaggedUnion>(&self, writer: W, value: &T) -> Result<()> {
        plan_for::<T>()?;
        let encoded = Encoded::new(value);
        if self.config.pretty {
            serde_json::to_writer_pretty(writer, &encoded)?;
        } else {
            serde_json::to_writer(writer, &encoded)?;
        }
        Ok(())
    }

    pub fn from_slice<T: TaggedUnion>(&self, bytes: &[u8]) -> Result<T> {
        let _scope = FieldKeysScope::enter(self.config.field_keys);
        let payload: RawPayload = serde_json::from_slice(bytes)?;
        resolve(payload, self.config.field_keys)
    }

    pub fn from_str<T: TaggedUnion>(&self, text: &str) -> Result<T> {
        let _scope = FieldKeysScope::enter(self.config.field_keys);
        let payload: RawPayload = serde_json::from_str(text)?;
        resolve(payload, self.config.field_keys)
    }

    pub fn from_reader<R: io::Read, T: TaggedUnion>(&self, reader: R) -> Result<T> {
        let _scope = FieldKeysScope::enter(self.config.field_keys);
        let payload: RawPayload = serde_json::from_reader(reader)?;
        resolve(payload, self.config.field_keys)
    }
}

/// Encode a union value into a JSON value.
///
/// # Errors
///
/// [`CodecError::NotAUnionType`](crate::CodecError::NotAUnionType) for an
/// unusable descriptor, or a JSON error raised by a field's own serializer.
pub fn encode<T: TaggedUnion>(value: &T) -> Result<Value> {
    UnionCodec::default().encode(value)
}

/// Decode a JSON value into the union `T`.
///
/// # Errors
///
/// Any [`CodecError`](crate::CodecError) raised while selecting, coercing or
/// constructing the case.
pub fn decode<T: TaggedUnion>(value: Value) -> Result<T> {
    UnionCodec::default().decode(value)
}

pub fn to_vec<T: TaggedUnion>(value: &T) -> Result<Vec<u8>> {
    UnionCodec::default().to_vec(value)
}

pub fn to_string<T: TaggedUnion>(value: &T) -> Result<String> {
    UnionCodec::default().to_string(value)
}

pub fn to_writer<W: io::Write, T: TaggedUnion>(writer: W, value: &T) -> Result<()> {
    UnionCodec::default().to_writer(writer, value)
}

pub fn from_slice<T: TaggedUnion>(bytes: &[u8]) -> Result<T> {
    UnionCodec::default().from_slice(bytes)
}

pub fn from_str<T: TaggedUnion>(text: &str) -> Result<T> {
    UnionCodec::default().from_str(text)
}

pub fn from_reader<R: io::Read, T: TaggedUnion>(reader: R) -> Result<T> {
    UnionCodec::default().from_reader(reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldKeys;
    use crate::error::CodecError;
    use serde_json::json;

    #[test]
    fn test_option_scenario() {
        assert_eq!(encode(&Some("x".to_string())).unwrap(), json!("x"));
        assert_eq!(encode(&None::<String>).unwrap(), json!(null));
        assert_eq!(decode::<Option<String>>(json!(null)).unwrap(), None);
        assert_eq!(
            decode::<Option<String>>(json!("x")).unwrap(),
            Some("x".to_string())
        );
    }

    #[test]
    fn test_text_roundtrip() {
        let value: std::result::Result<i32, String> = Err("nope".to_string());
        let text = to_string(&value).unwrap();
        assert_eq!(text, r#"{"__Case":"Err","Item0":"nope"}"#);
        assert_eq!(from_str::<std::result::Result<i32, String>>(&text).unwrap(), value);
    }

    #[test]
    fn test_bytes_and_io_roundtrip() {
        let value: Option<u64> = Some(42);
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &value).unwrap();
        assert_eq!(buffer, to_vec(&value).unwrap());
        assert_eq!(from_slice::<Option<u64>>(&buffer).unwrap(), value);
        assert_eq!(from_reader::<_, Option<u64>>(buffer.as_slice()).unwrap(), value);
    }

    #[test]
    fn test_pretty_output() {
        let codec = UnionCodec::new(CodecConfig::default().with_pretty(true));
        let value: std::result::Result<u8, u8> = Ok(1);
        let text = codec.to_string(&value).unwrap();
        assert!(text.contains('\n'));
        assert_eq!(codec.from_str::<std::result::Result<u8, u8>>(&text).unwrap(), value);
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let err = from_str::<Option<String>>("{\"Item0\":").unwrap_err();
        assert!(matches!(err, CodecError::Json(_)));
    }

    #[test]
    fn test_strict_codec_rejects_misplaced_keys() {
        let codec = UnionCodec::new(CodecConfig::default().with_field_keys(FieldKeys::Strict));
        let err = codec
            .decode::<std::result::Result<u8, u8>>(json!({"Item3": 1, "__Case": "Ok"}))
            .unwrap_err();
        assert!(matches!(err, CodecError::UnexpectedKey { .. }));
    }
}
