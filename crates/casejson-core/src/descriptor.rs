//! Descriptor tables for tagged unions.
//!
//! Rust has no runtime reflection over enums, so every union type hands the
//! codec a static table of its cases through [`TaggedUnion`]:
//!
//! - `descriptor()` lists the cases in declaration order, each with its field slots
//! - `case_index()` and `write_fields()` take a value apart
//! - `construct()` puts one back together from positional [`Fields`]
//!
//! The table is normally generated by `#[derive(TaggedUnion)]`. Hand-written
//! implementations use struct literals so the table can live in a `static`:
//!
//! ```ignore
//! static SHAPE: UnionDescriptor = UnionDescriptor {
//!     name: "Shape",
//!     cases: &[
//!         VariantCase { name: "Point", fields: &[] },
//!         VariantCase { name: "Circle", fields: &[FieldSlot { type_name: "f64" }] },
//!     ],
//! };
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::coerce::coerce;
use crate::error::{CodecError, Result};

/// Object key recording which case a discriminated union value took.
pub const DISCRIMINATOR: &str = "__Case";

/// Positional key of the field at `index`: `Item0`, `Item1`, ...
pub fn field_key(index: usize) -> String {
    format!("Item{index}")
}

/// One declared field of a case. Fields are unnamed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSlot {
    /// Declared type, as written in the source
    pub type_name: &'static str,
}

impl FieldSlot {
    pub const fn new(type_name: &'static str) -> Self {
        Self { type_name }
    }
}

/// A named alternative of a union with its ordered field slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariantCase {
    pub name: &'static str,
    pub fields: &'static [FieldSlot],
}

impl VariantCase {
    pub const fn new(name: &'static str, fields: &'static [FieldSlot]) -> Self {
        Self { name, fields }
    }

    /// Number of fields the case declares
    pub const fn arity(&self) -> usize {
        self.fields.len()
    }
}

/// Static description of a union type: its name and its cases in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnionDescriptor {
    pub name: &'static str,
    pub cases: &'static [VariantCase],
}

impl UnionDescriptor {
    pub const fn new(name: &'static str, cases: &'static [VariantCase]) -> Self {
        Self { name, cases }
    }

    pub fn case(&self, index: usize) -> Option<&'static VariantCase> {
        self.cases.get(index)
    }

    /// Case names in declaration order
    pub fn case_names(&self) -> Vec<&'static str> {
        self.cases.iter().map(|case| case.name).collect()
    }
}

/// A closed sum type the codec can encode and decode.
///
/// Implementations must agree with their own descriptor: `case_index` returns
/// a position in `descriptor().cases`, `write_fields` hands over exactly that
/// case's fields in declaration order, and `construct` consumes them in the
/// same order.
pub trait TaggedUnion: Sized + 'static {
    /// The union's case table
    fn descriptor() -> &'static UnionDescriptor;

    /// Position of this value's case in the descriptor
    fn case_index(&self) -> usize;

    /// Hand every field of this value's case to `writer`, in declaration order.
    fn write_fields<W: FieldWriter>(&self, writer: &mut W) -> std::result::Result<(), W::Error>;

    /// Build the case at `case` from its positional field values.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Coercion`] when a field value does not fit its
    /// declared type, or [`CodecError::UnknownCase`] for an index outside the
    /// descriptor.
    fn construct(case: usize, fields: Fields) -> Result<Self>;
}

/// Sink receiving a case's fields during encoding
pub trait FieldWriter {
    type Error;

    fn field<T>(&mut self, value: &T) -> std::result::Result<(), Self::Error>
    where
        T: Serialize + ?Sized;
}

/// Positional field values for one case, consumed front to back by
/// [`TaggedUnion::construct`].
#[derive(Debug)]
pub struct Fields {
    union: &'static UnionDescriptor,
    case: usize,
    supplied: usize,
    values: std::vec::IntoIter<Value>,
}

impl Fields {
    pub fn new(union: &'static UnionDescriptor, case: usize, values: Vec<Value>) -> Self {
        Self {
            union,
            case,
            supplied: values.len(),
            values: values.into_iter(),
        }
    }

    /// Coerce the next raw value into the declared type `T`.
    ///
    /// # Errors
    ///
    /// [`CodecError::ArityMismatch`] once the values run out, otherwise any
    /// [`CodecError::Coercion`] raised while converting the value.
    #[allow(clippy::should_implement_trait)]
    pub fn next<T: DeserializeOwned>(&mut self) -> Result<T> {
        match self.values.next() {
            Some(raw) => coerce(raw),
            None => Err(CodecError::ArityMismatch {
                union: self.union.name,
                case: self.case_name(),
                expected: self
                    .union
                    .case(self.case)
                    .map_or(self.supplied + 1, VariantCase::arity),
                found: self.supplied,
            }),
        }
    }

    /// Values not yet consumed
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    /// Error for a case index the constructor does not recognise
    pub fn unknown_case(&self) -> CodecError {
        CodecError::UnknownCase {
            union: self.union.name,
            case: format!("#{}", self.case),
            expected: self.union.case_names(),
        }
    }

    fn case_name(&self) -> &'static str {
        self.union.case(self.case).map_or("?", |case| case.name)
    }
}
