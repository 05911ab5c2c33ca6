//! Shape classification.
//!
//! A union's encoding is chosen once per type from its case count and the
//! field count of each case. Names and field types never take part, so the
//! category is a pure function of the union's static shape:
//!
//! | category                | union shape                                  | JSON                                   |
//! |-------------------------|----------------------------------------------|----------------------------------------|
//! | `AsNull`                | 2 cases, one without fields                  | `null` / bare value / positional object |
//! | `AsBareValue`           | 1 case, 1 field                              | the field itself                       |
//! | `AsFieldObject`         | 1 case, 2+ fields                            | `{"Item0": .., "Item1": ..}`           |
//! | `AsDiscriminatedObject` | anything else                                | `{"__Case": "Name", "Item0": ..}`      |

use std::fmt;

use crate::descriptor::VariantCase;

/// Encoding strategy of a union type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeCategory {
    /// Optional-like: the empty branch is `null`, the other branch is a bare
    /// value (one field) or a positional object (several fields).
    AsNull,
    /// Single-payload wrapper encoded as its payload
    AsBareValue,
    /// Single case encoded as a positional object without a tag
    AsFieldObject,
    /// General case, tagged with the discriminator key
    AsDiscriminatedObject,
}

impl ShapeCategory {
    /// Classify a union from its cases.
    pub fn classify(cases: &[VariantCase]) -> Self {
        let arities: Vec<usize> = cases.iter().map(VariantCase::arity).collect();
        Self::from_arities(&arities)
    }

    /// Classify a union from the field count of each case, in declaration order.
    pub fn from_arities(arities: &[usize]) -> Self {
        match arities {
            [first, second] if *first == 0 || *second == 0 => Self::AsNull,
            [1] => Self::AsBareValue,
            [fields] if *fields >= 2 => Self::AsFieldObject,
            _ => Self::AsDiscriminatedObject,
        }
    }

    /// Whether encoded values carry the discriminator key
    pub const fn uses_discriminator(self) -> bool {
        matches!(self, Self::AsDiscriminatedObject)
    }
}

impl fmt::Display for ShapeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AsNull => "null-or-value",
            Self::AsBareValue => "bare-value",
            Self::AsFieldObject => "field-object",
            Self::AsDiscriminatedObject => "discriminated-object",
        };
        f.write_str(name)
    }
}
