use std::fmt;
use std::hash::{Hash, Hasher};

use loam_core::TypeName;

use crate::primitive::PrimitiveKind;
use crate::well_known;

/// The inferred type of an expression.
///
/// `Dynamic` is Groovy's `def`: the value is typed at runtime. `Unknown` means inference gave up;
/// the reason is for debugging only and does not take part in equality or hashing, so every
/// `Unknown` equals every other.
#[derive(Debug, Clone)]
pub enum SemanticType {
    Known(TypeName),
    Primitive(PrimitiveKind),
    Null,
    Dynamic,
    Unknown(String),
}

impl SemanticType {
    pub fn known(name: impl Into<String>) -> Self {
        SemanticType::Known(TypeName::new(name))
    }

    pub fn unknown(reason: impl Into<String>) -> Self {
        SemanticType::Unknown(reason.into())
    }

    pub fn object() -> Self {
        Self::known(well_known::OBJECT)
    }

    pub fn string() -> Self {
        Self::known(well_known::STRING)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, SemanticType::Unknown(_))
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, SemanticType::Dynamic)
    }

    pub fn as_known(&self) -> Option<&TypeName> {
        match self {
            SemanticType::Known(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            SemanticType::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    /// The primitive a value of this type computes with: the primitive itself or the one behind a
    /// wrapper class.
    pub fn numeric_kind(&self) -> Option<PrimitiveKind> {
        let kind = match self {
            SemanticType::Primitive(kind) => Some(*kind),
            SemanticType::Known(name) => PrimitiveKind::from_boxed_name(name.as_str()),
            _ => None,
        };
        kind.filter(|kind| kind.is_numeric())
    }

    pub fn is_string_like(&self) -> bool {
        matches!(
            self.as_known().map(TypeName::as_str),
            Some(well_known::STRING) | Some(well_known::GSTRING)
        )
    }

    /// Primitives box to their wrapper; everything else is unchanged.
    pub fn boxed(self) -> Self {
        match self {
            SemanticType::Primitive(kind) => Self::known(kind.boxed_name()),
            other => other,
        }
    }

    pub fn unknown_reason(&self) -> Option<&str> {
        match self {
            SemanticType::Unknown(reason) => Some(reason),
            _ => None,
        }
    }
}

impl PartialEq for SemanticType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SemanticType::Known(a), SemanticType::Known(b)) => a == b,
            (SemanticType::Primitive(a), SemanticType::Primitive(b)) => a == b,
            (SemanticType::Null, SemanticType::Null)
            | (SemanticType::Dynamic, SemanticType::Dynamic)
            | (SemanticType::Unknown(_), SemanticType::Unknown(_)) => true,
            _ => false,
        }
    }
}

impl Eq for SemanticType {}

impl Hash for SemanticType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            SemanticType::Known(name) => name.hash(state),
            SemanticType::Primitive(kind) => kind.hash(state),
            SemanticType::Null | SemanticType::Dynamic | SemanticType::Unknown(_) => {}
        }
    }
}

impl From<PrimitiveKind> for SemanticType {
    fn from(kind: PrimitiveKind) -> Self {
        SemanticType::Primitive(kind)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::Known(name) => write!(f, "{name}"),
            SemanticType::Primitive(kind) => write!(f, "{kind}"),
            SemanticType::Null => f.write_str("null"),
            SemanticType::Dynamic => f.write_str("def"),
            SemanticType::Unknown(_) => f.write_str("<unknown>"),
        }
    }
}
