//! Descriptor tables for the standard library's own unions.
//!
//! `Option<T>` is the canonical optional-like union: `None` encodes as `null`
//! and `Some(x)` as `x`, which matches serde's own representation. `Result<T, E>`
//! has two single-field cases and therefore carries the discriminator.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::descriptor::{FieldSlot, FieldWriter, Fields, TaggedUnion, UnionDescriptor, VariantCase};
use crate::error::Result;

static OPTION: UnionDescriptor = UnionDescriptor {
    name: "Option",
    cases: &[
        VariantCase { name: "None", fields: &[] },
        VariantCase {
            name: "Some",
            fields: &[FieldSlot { type_name: "T" }],
        },
    ],
};

static RESULT: UnionDescriptor = UnionDescriptor {
    name: "Result",
    cases: &[
        VariantCase {
            name: "Ok",
            fields: &[FieldSlot { type_name: "T" }],
        },
        VariantCase {
            name: "Err",
            fields: &[FieldSlot { type_name: "E" }],
        },
    ],
};

impl<T> TaggedUnion for Option<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    fn descriptor() -> &'static UnionDescriptor {
        &OPTION
    }

    fn case_index(&self) -> usize {
        match self {
            None => 0,
            Some(_) => 1,
        }
    }

    fn write_fields<W: FieldWriter>(&self, writer: &mut W) -> std::result::Result<(), W::Error> {
        if let Some(value) = self {
            writer.field(value)?;
        }
        Ok(())
    }

    fn construct(case: usize, mut fields: Fields) -> Result<Self> {
        match case {
            0 => Ok(None),
            1 => Ok(Some(fields.next()?)),
            _ => Err(fields.unknown_case()),
        }
    }
}

impl<T, E> TaggedUnion for std::result::Result<T, E>
where
    T: Serialize + DeserializeOwned + 'static,
    E: Serialize + DeserializeOwned + 'static,
{
    fn descriptor() -> &'static UnionDescriptor {
        &RESULT
    }

    fn case_index(&self) -> usize {
        match self {
            Ok(_) => 0,
            Err(_) => 1,
        }
    }

    fn write_fields<W: FieldWriter>(&self, writer: &mut W) -> std::result::Result<(), W::Error> {
        match self {
            Ok(value) => writer.field(value),
            Err(error) => writer.field(error),
        }
    }

    fn construct(case: usize, mut fields: Fields) -> Result<Self> {
        match case {
            0 => Ok(Ok(fields.next()?)),
            1 => Ok(Err(fields.next()?)),
            _ => Err(fields.unknown_case()),
        }
    }
}
