//! Union encoding.
//!
//! [`Encoded`] streams a union value into any serde [`Serializer`] using the
//! layout its plan selects:
//!
//! - `None`-like cases become `null`
//! - single-payload cases become the payload itself
//! - field-only cases become `{"Item0": .., "Item1": ..}`
//! - everything else becomes `{"__Case": "Name", "Item0": ..}`, tag first

use serde::ser::{self, SerializeMap, Serializer};
use serde::Serialize;
use tracing::trace;

use crate::descriptor::{DISCRIMINATOR, FieldWriter, TaggedUnion, field_key};
use crate::plan::{CaseLayout, plan_for};

/// Serializable view of a union value
#[derive(Debug)]
pub struct Encoded<'a, T>(pub &'a T);

impl<'a, T: TaggedUnion> Encoded<'a, T> {
    pub fn new(value: &'a T) -> Self {
        Self(value)
    }
}

impl<T: TaggedUnion> Serialize for Encoded<'_, T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let plan = plan_for::<T>().map_err(ser::Error::custom)?;
        let index = self.0.case_index();
        let case = plan.case(index).ok_or_else(|| {
            ser::Error::custom(format!(
                "case index {index} is out of range for union `{}`",
                plan.name()
            ))
        })?;
        let layout = plan.layout(index);
        trace!(union = plan.name(), case = case.name, ?layout, "encoding union value");

        match layout {
            CaseLayout::Null => serializer.serialize_none(),
            CaseLayout::Bare => {
                let mut writer = BareWriter::new(serializer);
                self.0.write_fields(&mut writer)?;
                writer.finish(case.name)
            }
            CaseLayout::Fields | CaseLayout::Discriminated => {
                let tagged = layout == CaseLayout::Discriminated;
                let len = case.arity() + usize::from(tagged);
                let mut map = serializer.serialize_map(Some(len))?;
                if tagged {
                    map.serialize_entry(DISCRIMINATOR, case.name)?;
                }
                let mut writer = MapWriter {
                    map: &mut map,
                    written: 0,
                };
                self.0.write_fields(&mut writer)?;
                if writer.written != case.arity() {
                    return Err(ser::Error::custom(format!(
                        "case `{}::{}` declares {} field(s), wrote {}",
                        plan.name(),
                        case.name,
                        case.arity(),
                        writer.written
                    )));
                }
                map.end()
            }
        }
    }
}

/// Writes the single field of a bare-value case straight to the serializer.
struct BareWriter<S: Serializer> {
    serializer: Option<S>,
    output: Option<S::Ok>,
}

impl<S: Serializer> BareWriter<S> {
    fn new(serializer: S) -> Self {
        Self {
            serializer: Some(serializer),
            output: None,
        }
    }

    fn finish(self, case: &str) -> Result<S::Ok, S::Error> {
        self.output.ok_or_else(|| {
            ser::Error::custom(format!("bare value case `{case}` wrote no field"))
        })
    }
}

impl<S: Serializer> FieldWriter for BareWriter<S> {
    type Error = S::Error;

    fn field<T>(&mut self, value: &T) -> Result<(), S::Error>
    where
        T: Serialize + ?Sized,
    {
        let serializer = self
            .serializer
            .take()
            .ok_or_else(|| ser::Error::custom("bare value case wrote more than one field"))?;
        self.output = Some(value.serialize(serializer)?);
        Ok(())
    }
}

/// Writes fields as `Item<n>` entries of an open map.
struct MapWriter<'a, M> {
    map: &'a mut M,
    written: usize,
}

impl<M: SerializeMap> FieldWriter for MapWriter<'_, M> {
    type Error = M::Error;

    fn field<T>(&mut self, value: &T) -> Result<(), M::Error>
    where
        T: Serialize + ?Sized,
    {
        self.map.serialize_entry(&field_key(self.written), value)?;
        self.written += 1;
        Ok(())
    }
}
