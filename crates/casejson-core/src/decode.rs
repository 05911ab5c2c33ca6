//! Union decoding.
//!
//! Decoding runs in two steps. First the input is scanned token by token into
//! a [`RawPayload`]: `null`, a bare value, or an object split into its
//! discriminator (wherever it appears) and its remaining entries in the order
//! they were read. Then the destination's plan picks the case:
//!
//! - `null` picks the only case without fields
//! - a bare value picks the only single-field case
//! - an object picks its `__Case` when present, otherwise the only case whose
//!   arity matches the number of remaining entries
//!
//! Each remaining value is then coerced into the declared field type and the
//! case is constructed.

use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::config::FieldKeys;
use crate::descriptor::{DISCRIMINATOR, Fields, TaggedUnion, field_key};
use crate::error::{CodecError, Result};
use crate::plan::{UnionPlan, plan_for};
use crate::shape::ShapeCategory;

thread_local! {
    static FIELD_KEYS: Cell<FieldKeys> = const { Cell::new(FieldKeys::Positional) };
}

/// Field key policy of the decode call running on this thread
pub(crate) fn active_field_keys() -> FieldKeys {
    FIELD_KEYS.with(Cell::get)
}

/// Applies a field key policy to every union decoded on this thread until dropped.
pub(crate) struct FieldKeysScope {
    previous: FieldKeys,
}

impl FieldKeysScope {
    pub(crate) fn enter(keys: FieldKeys) -> Self {
        let previous = FIELD_KEYS.with(|current| current.replace(keys));
        Self { previous }
    }
}

impl Drop for FieldKeysScope {
    fn drop(&mut self) {
        FIELD_KEYS.with(|current| current.set(self.previous));
    }
}

/// Untyped union payload as read from the token stream
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    Null,
    /// A scalar, or an array carried by a non-union field
    Value(Value),
    Object(RawObject),
}

/// Object payload with the discriminator split out
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawObject {
    pub discriminator: Option<String>,
    /// Remaining entries in the order they were read
    pub entries: Vec<(String, Value)>,
}

impl RawObject {
    /// Rebuild the object, discriminator first.
    pub fn into_value(self) -> Value {
        let mut map = Map::with_capacity(self.entries.len() + 1);
        if let Some(case) = self.discriminator {
            map.insert(DISCRIMINATOR.to_string(), Value::String(case));
        }
        map.extend(self.entries);
        Value::Object(map)
    }
}

impl<'de> Deserialize<'de> for RawPayload {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RawPayloadVisitor)
    }
}

struct RawPayloadVisitor;

impl<'de> Visitor<'de> for RawPayloadVisitor {
    type Value = RawPayload;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("null, a bare value, or an object of positional fields")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<RawPayload, E> {
        Ok(RawPayload::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<RawPayload, E> {
        Ok(RawPayload::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> std::result::Result<RawPayload, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawPayload::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<RawPayload, E> {
        Ok(RawPayload::Value(Value::Bool(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<RawPayload, E> {
        Ok(RawPayload::Value(Value::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<RawPayload, E> {
        Ok(RawPayload::Value(Value::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<RawPayload, E> {
        Ok(RawPayload::Value(Value::from(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<RawPayload, E> {
        Ok(RawPayload::Value(Value::String(v.to_owned())))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<RawPayload, E> {
        Ok(RawPayload::Value(Value::String(v)))
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<RawPayload, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(RawPayload::Value(Value::Array(items)))
    }

    fn visit_map<M>(self, mut map: M) -> std::result::Result<RawPayload, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut object = RawObject::default();
        while let Some(key) = map.next_key::<String>()? {
            if key == DISCRIMINATOR {
                if object.discriminator.is_some() {
                    return Err(de::Error::duplicate_field(DISCRIMINATOR));
                }
                object.discriminator = Some(map.next_value()?);
            } else {
                let value: Value = map.next_value()?;
                object.entries.push((key, value));
            }
        }
        Ok(RawPayload::Object(object))
    }
}

/// Select the case for `payload` and construct it as `T`.
pub fn resolve<T: TaggedUnion>(payload: RawPayload, keys: FieldKeys) -> Result<T> {
    let plan = plan_for::<T>()?;
    let selection = select_case(&plan, payload, keys).inspect_err(|err| {
        debug!(union = plan.name(), error = %err, "could not resolve union case");
    })?;
    trace!(
        union = plan.name(),
        case = plan.case(selection.case).map(|case| case.name),
        fields = selection.values.len(),
        "decoding union value"
    );

    let Selection {
        case,
        values,
        foreign_tag,
    } = selection;
    T::construct(case, Fields::new(plan.descriptor(), case, values)).map_err(|err| {
        match (err, foreign_tag) {
            // The tag was not one of ours and the payload did not fit either.
            (CodecError::Coercion { .. }, Some(tag)) => CodecError::UnknownCase {
                union: plan.name(),
                case: tag,
                expected: plan.case_names(),
            },
            (err, _) => err,
        }
    })
}

/// Case picked for a payload, with its raw field values
struct Selection {
    case: usize,
    values: Vec<Value>,
    /// Discriminator handed on to the payload field because it names none of our cases
    foreign_tag: Option<String>,
}

impl Selection {
    fn new(case: usize, values: Vec<Value>) -> Self {
        Self {
            case,
            values,
            foreign_tag: None,
        }
    }
}

fn select_case(plan: &UnionPlan, payload: RawPayload, keys: FieldKeys) -> Result<Selection> {
    let payload_case = plan.payload_case();
    match payload {
        RawPayload::Null => match payload_case {
            Some(case) if plan.shape() == ShapeCategory::AsBareValue => {
                Ok(Selection::new(case, vec![Value::Null]))
            }
            _ => Ok(Selection::new(plan.unique_case_with_arity(0)?, Vec::new())),
        },
        RawPayload::Value(value) => match payload_case {
            Some(case) => Ok(Selection::new(case, vec![value])),
            None => Ok(Selection::new(plan.unique_case_with_arity(1)?, vec![value])),
        },
        RawPayload::Object(object) => match payload_case {
            Some(case) => {
                let tagged_for_us = object
                    .discriminator
                    .as_deref()
                    .is_some_and(|tag| plan.case_named(tag).is_some());
                if tagged_for_us {
                    return select_from_object(plan, object, keys);
                }
                // Either the payload's own object or a nested union's tag.
                let foreign_tag = object.discriminator.clone();
                Ok(Selection {
                    case,
                    values: vec![object.into_value()],
                    foreign_tag,
                })
            }
            None => select_from_object(plan, object, keys),
        },
    }
}

fn select_from_object(plan: &UnionPlan, object: RawObject, keys: FieldKeys) -> Result<Selection> {
    let RawObject {
        discriminator,
        entries,
    } = object;

    let index = match discriminator {
        Some(name) => plan
            .case_named(&name)
            .ok_or_else(|| CodecError::UnknownCase {
                union: plan.name(),
                case: name,
                expected: plan.case_names(),
            })?,
        None => plan.unique_case_with_arity(entries.len())?,
    };

    let case = plan.case(index).ok_or_else(|| CodecError::UnknownCase {
        union: plan.name(),
        case: format!("#{index}"),
        expected: plan.case_names(),
    })?;
    if entries.len() != case.arity() {
        return Err(CodecError::ArityMismatch {
            union: plan.name(),
            case: case.name,
            expected: case.arity(),
            found: entries.len(),
        });
    }

    if keys == FieldKeys::Strict {
        for (position, (key, _)) in entries.iter().enumerate() {
            let expected = field_key(position);
            if *key != expected {
                return Err(CodecError::UnexpectedKey {
                    union: plan.name(),
                    key: key.clone(),
                    expected,
                });
            }
        }
    }

    Ok(Selection::new(
        index,
        entries.into_iter().map(|(_, value)| value).collect(),
    ))
}

/// Decode a union from any serde deserializer.
///
/// Errors surface through `D::Error`; use the functions in [`crate::codec`]
/// to keep the structured [`CodecError`].
pub struct DecodeSeed<T> {
    keys: FieldKeys,
    marker: PhantomData<fn() -> T>,
}

impl<T> DecodeSeed<T> {
    pub fn new(keys: FieldKeys) -> Self {
        Self {
            keys,
            marker: PhantomData,
        }
    }
}

impl<T> Default for DecodeSeed<T> {
    fn default() -> Self {
        Self::new(active_field_keys())
    }
}

impl<'de, T: TaggedUnion> DeserializeSeed<'de> for DecodeSeed<T> {
    type Value = T;

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<T, D::Error>
    where
        D: Deserializer<'de>,
    {
        let payload = RawPayload::deserialize(deserializer)?;
        resolve(payload, self.keys).map_err(de::Error::custom)
    }
}
