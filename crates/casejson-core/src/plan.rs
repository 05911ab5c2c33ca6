//! Classified union plans and their process-wide cache.
//!
//! A [`UnionPlan`] pairs a descriptor with its [`ShapeCategory`] and the lookup
//! tables the decoder needs. Plans are derived lazily, once per union type,
//! and never invalidated: union shapes are fixed for the life of the process.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use indexmap::IndexMap;
use tracing::debug;

use crate::descriptor::{TaggedUnion, UnionDescriptor, VariantCase};
use crate::error::{CodecError, Result};
use crate::shape::ShapeCategory;

static PLANS: OnceLock<RwLock<HashMap<TypeId, Arc<UnionPlan>>>> = OnceLock::new();

/// How one case of a union is laid out on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseLayout {
    /// JSON `null`
    Null,
    /// The single field, unwrapped
    Bare,
    /// `{"Item0": .., "Item1": ..}`
    Fields,
    /// `{"__Case": "Name", "Item0": ..}`
    Discriminated,
}

/// A union descriptor together with its shape and lookup tables
#[derive(Debug)]
pub struct UnionPlan {
    descriptor: &'static UnionDescriptor,
    shape: ShapeCategory,
    by_name: IndexMap<&'static str, &'static VariantCase>,
}

impl UnionPlan {
    /// Classify a descriptor and index its cases by name.
    ///
    /// # Errors
    ///
    /// [`CodecError::NotAUnionType`] when the descriptor declares no cases or
    /// declares the same case name twice.
    pub fn build(descriptor: &'static UnionDescriptor) -> Result<Self> {
        if descriptor.cases.is_empty() {
            return Err(CodecError::NotAUnionType {
                union: descriptor.name,
                reason: "no cases declared".to_string(),
            });
        }

        let mut by_name = IndexMap::with_capacity(descriptor.cases.len());
        for case in descriptor.cases {
            if by_name.insert(case.name, case).is_some() {
                return Err(CodecError::NotAUnionType {
                    union: descriptor.name,
                    reason: format!("case `{}` is declared more than once", case.name),
                });
            }
        }

        Ok(Self {
            descriptor,
            shape: ShapeCategory::classify(descriptor.cases),
            by_name,
        })
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    pub fn descriptor(&self) -> &'static UnionDescriptor {
        self.descriptor
    }

    pub fn shape(&self) -> ShapeCategory {
        self.shape
    }

    pub fn case(&self, index: usize) -> Option<&'static VariantCase> {
        self.by_name.get_index(index).map(|(_, case)| *case)
    }

    /// Index of the case called `name`
    pub fn case_named(&self, name: &str) -> Option<usize> {
        self.by_name.get_index_of(name)
    }

    pub fn case_names(&self) -> Vec<&'static str> {
        self.by_name.keys().copied().collect()
    }

    /// Indices of every case declaring exactly `arity` fields
    pub fn cases_with_arity(&self, arity: usize) -> impl Iterator<Item = usize> + '_ {
        self.by_name
            .values()
            .enumerate()
            .filter(move |(_, case)| case.arity() == arity)
            .map(|(index, _)| index)
    }

    /// The only case declaring `arity` fields.
    ///
    /// # Errors
    ///
    /// [`CodecError::AmbiguousShape`] when no case, or more than one case,
    /// declares that many fields.
    pub fn unique_case_with_arity(&self, arity: usize) -> Result<usize> {
        let mut matches = self.cases_with_arity(arity);
        match (matches.next(), matches.next()) {
            (Some(index), None) => Ok(index),
            (None, _) => Err(CodecError::AmbiguousShape {
                union: self.name(),
                reason: format!("no case declares {arity} field(s)"),
            }),
            (Some(_), Some(_)) => Err(CodecError::AmbiguousShape {
                union: self.name(),
                reason: format!(
                    "cases {:?} all declare {arity} field(s) and no discriminator is present",
                    self.cases_with_arity(arity)
                        .filter_map(|index| self.case(index).map(|case| case.name))
                        .collect::<Vec<_>>()
                ),
            }),
        }
    }

    /// Wire layout of the case at `index`
    pub fn layout(&self, index: usize) -> CaseLayout {
        let arity = self.case(index).map_or(0, VariantCase::arity);
        match self.shape {
            ShapeCategory::AsNull => match arity {
                0 => CaseLayout::Null,
                1 => CaseLayout::Bare,
                _ => CaseLayout::Fields,
            },
            ShapeCategory::AsBareValue => CaseLayout::Bare,
            ShapeCategory::AsFieldObject => CaseLayout::Fields,
            ShapeCategory::AsDiscriminatedObject => CaseLayout::Discriminated,
        }
    }

    /// The case whose single field absorbs any non-null payload, if the shape has one.
    ///
    /// Bare-value unions and optional-like unions with a one-field branch never
    /// wrap their payload, so an object or array arriving for them is the
    /// payload itself rather than a positional field object.
    pub fn payload_case(&self) -> Option<usize> {
        match self.shape {
            ShapeCategory::AsBareValue => Some(0),
            ShapeCategory::AsNull => (0..self.by_name.len())
                .find(|index| self.layout(*index) == CaseLayout::Bare),
            _ => None,
        }
    }

    /// Check that no two discriminator-free cases encode to the same JSON shape.
    ///
    /// # Errors
    ///
    /// [`CodecError::AmbiguousShape`] naming the colliding cases.
    pub fn check_unambiguous(&self) -> Result<()> {
        let mut seen: HashMap<(CaseLayout, usize), &'static str> = HashMap::new();
        for (index, case) in self.by_name.values().enumerate() {
            let layout = self.layout(index);
            if layout == CaseLayout::Discriminated {
                continue;
            }
            let arity = if layout == CaseLayout::Fields { case.arity() } else { 0 };
            if let Some(previous) = seen.insert((layout, arity), case.name) {
                return Err(CodecError::AmbiguousShape {
                    union: self.name(),
                    reason: format!(
                        "cases `{previous}` and `{}` encode to the same {} shape",
                        case.name, self.shape
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Cached plan for `T`, built on first use.
///
/// # Errors
///
/// [`CodecError::NotAUnionType`] when `T`'s descriptor is unusable. Failed
/// builds are not cached.
pub fn plan_for<T: TaggedUnion>() -> Result<Arc<UnionPlan>> {
    let plans = PLANS.get_or_init(Default::default);
    let key = TypeId::of::<T>();

    if let Some(plan) = plans
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return Ok(Arc::clone(plan));
    }

    let plan = Arc::new(UnionPlan::build(T::descriptor())?);
    debug!(union = plan.name(), shape = %plan.shape(), "built union plan");

    let mut plans = plans.write().unwrap_or_else(PoisonError::into_inner);
    Ok(Arc::clone(plans.entry(key).or_insert(plan)))
}

/// Encoding category of `T`
pub fn shape_of<T: TaggedUnion>() -> Result<ShapeCategory> {
    plan_for::<T>().map(|plan| plan.shape())
}

/// Design-time check that `T` can be decoded without guessing.
///
/// # Errors
///
/// [`CodecError::NotAUnionType`] for an unusable descriptor, or
/// [`CodecError::AmbiguousShape`] when two cases share a discriminator-free shape.
pub fn validate<T: TaggedUnion>() -> Result<()> {
    plan_for::<T>()?.check_unambiguous()
}
