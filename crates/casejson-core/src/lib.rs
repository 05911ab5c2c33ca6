//! Shape-driven JSON codec for tagged unions.
//!
//! Each union type is classified once from its case and field counts, and the
//! classification picks the JSON a hand-written API would use:
//!
//! - `Option`-like unions encode as `null` or the bare payload
//! - single-payload wrappers encode as the payload
//! - single-case records encode as `{"Item0": .., "Item1": ..}`
//! - everything else encodes as `{"__Case": "Name", "Item0": ..}`
//!
//! Decoding reverses the choice from the JSON alone plus the destination
//! type's cases.

pub mod as_union;
mod builtin;
pub mod codec;
pub mod coerce;
pub mod config;
pub mod decode;
pub mod descriptor;
pub mod encode;
pub mod error;
pub mod plan;
pub mod shape;

pub use codec::{
    UnionCodec, decode, encode, from_reader, from_slice, from_str, to_string, to_vec, to_writer,
};
pub use config::{CodecConfig, ConfigError, FieldKeys};
pub use decode::DecodeSeed;
pub use descriptor::{
    DISCRIMINATOR, FieldSlot, FieldWriter, Fields, TaggedUnion, UnionDescriptor, VariantCase,
    field_key,
};
pub use encode::Encoded;
pub use error::{CodecError, Result};
pub use plan::{CaseLayout, UnionPlan, plan_for, shape_of, validate};
pub use shape::ShapeCategory;
