use std::fmt;
use std::sync::Arc;

use loam_core::TypeName;
use loam_types::{well_known, PrimitiveKind};

use crate::decl::TypeDecl;
use crate::solver::TypeSolver;

/// A resolved JVM type: the result of turning written or compiled type text into declarations.
#[derive(Clone)]
pub enum ResolvedType {
    Primitive(PrimitiveKind),
    Reference(ReferenceType),
    Array(Box<ResolvedType>),
    TypeVariable {
        name: String,
        bounds: Vec<ResolvedType>,
    },
    Wildcard(WildcardBound),
    Null,
    Void,
}

#[derive(Clone)]
pub struct ReferenceType {
    pub declaration: Arc<TypeDecl>,
    pub type_arguments: Vec<ResolvedType>,
}

#[derive(Clone, PartialEq)]
pub enum WildcardBound {
    Unbounded,
    Extends(Box<ResolvedType>),
    Super(Box<ResolvedType>),
}

impl ReferenceType {
    pub fn new(declaration: Arc<TypeDecl>) -> Self {
        Self {
            declaration,
            type_arguments: Vec::new(),
        }
    }

    pub fn qualified_name(&self) -> &TypeName {
        self.declaration.qualified_name()
    }

    pub fn is_raw(&self) -> bool {
        self.type_arguments.is_empty()
    }
}

impl PartialEq for ReferenceType {
    fn eq(&self, other: &Self) -> bool {
        self.qualified_name() == other.qualified_name()
            && self.type_arguments == other.type_arguments
    }
}

impl ResolvedType {
    pub fn reference(declaration: Arc<TypeDecl>) -> Self {
        ResolvedType::Reference(ReferenceType::new(declaration))
    }

    /// `java.lang.Object` as seen through `solver`, if it can find it.
    pub fn object(solver: &dyn TypeSolver) -> Option<Self> {
        solver
            .try_to_solve_type(well_known::OBJECT)
            .ok()
            .map(Self::reference)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, ResolvedType::Primitive(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, ResolvedType::Reference(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, ResolvedType::Array(_))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, ResolvedType::Void)
    }

    pub fn as_reference(&self) -> Option<&ReferenceType> {
        match self {
            ResolvedType::Reference(reference) => Some(reference),
            _ => None,
        }
    }

    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            ResolvedType::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Qualified name for references; `None` for everything else.
    pub fn qualified_name(&self) -> Option<&TypeName> {
        self.as_reference().map(ReferenceType::qualified_name)
    }

    /// The erased JVM-style name, e.g. `java.util.List` or `int[]`.
    pub fn erasure(&self) -> String {
        match self {
            ResolvedType::Primitive(kind) => kind.keyword().to_string(),
            ResolvedType::Reference(reference) => reference.qualified_name().to_string(),
            ResolvedType::Array(component) => format!("{}[]", component.erasure()),
            ResolvedType::TypeVariable { bounds, .. } => bounds
                .first()
                .map(ResolvedType::erasure)
                .unwrap_or_else(|| well_known::OBJECT.to_string()),
            ResolvedType::Wildcard(WildcardBound::Extends(bound)) => bound.erasure(),
            ResolvedType::Wildcard(_) => well_known::OBJECT.to_string(),
            ResolvedType::Null => "null".to_string(),
            ResolvedType::Void => "void".to_string(),
        }
    }

    /// Whether a value of type `other` may be assigned to a variable of this type.
    ///
    /// Covers identity, primitive widening, boxing and unboxing, subtyping through `solver`,
    /// array covariance and `null`. Type arguments are erased; type variables are treated by
    /// their bounds.
    pub fn is_assignable_by(&self, other: &ResolvedType, solver: &dyn TypeSolver) -> bool {
        if self == other {
            return true;
        }

        match (self, other) {
            (ResolvedType::Void, _) | (_, ResolvedType::Void) => false,

            (ResolvedType::Primitive(target), ResolvedType::Primitive(source)) => {
                target.is_assignable_by(*source)
            }
            (ResolvedType::Primitive(target), ResolvedType::Reference(source)) => {
                PrimitiveKind::from_boxed_name(source.qualified_name().as_str())
                    .is_some_and(|unboxed| target.is_assignable_by(unboxed))
            }
            (ResolvedType::Primitive(_), _) => false,

            (_, ResolvedType::Null) => true,

            (ResolvedType::Wildcard(bound), _) => match bound {
                WildcardBound::Extends(upper) => upper.is_assignable_by(other, solver),
                WildcardBound::Super(lower) => lower.is_assignable_by(other, solver),
                WildcardBound::Unbounded => true,
            },
            (_, ResolvedType::Wildcard(bound)) => match bound {
                WildcardBound::Extends(upper) => self.is_assignable_by(upper, solver),
                _ => self.is_object(),
            },

            (_, ResolvedType::TypeVariable { bounds, .. }) => {
                self.is_object() || bounds.iter().any(|b| self.is_assignable_by(b, solver))
            }
            (ResolvedType::TypeVariable { bounds, .. }, _) => {
                bounds.iter().all(|b| b.is_assignable_by(other, solver))
            }

            (ResolvedType::Reference(target), ResolvedType::Primitive(source)) => {
                let boxed = source.boxed_name();
                let target_name = target.qualified_name().as_str();
                if target_name == well_known::OBJECT || target_name == boxed {
                    return true;
                }
                if source.is_numeric() && target_name == well_known::NUMBER {
                    return true;
                }
                solver
                    .try_to_solve_type(boxed)
                    .ok()
                    .is_some_and(|wrapper| wrapper.is_subtype_of(target_name, solver))
            }
            (ResolvedType::Reference(target), ResolvedType::Reference(source)) => {
                let target_name = target.qualified_name().as_str();
                target_name == well_known::OBJECT
                    || source.qualified_name().as_str() == target_name
                    || source.declaration.is_subtype_of(target_name, solver)
            }
            (ResolvedType::Reference(target), ResolvedType::Array(_)) => matches!(
                target.qualified_name().as_str(),
                well_known::OBJECT | "java.lang.Cloneable" | "java.io.Serializable"
            ),

            (ResolvedType::Array(target), ResolvedType::Array(source)) => {
                match (target.as_ref(), source.as_ref()) {
                    (ResolvedType::Primitive(a), ResolvedType::Primitive(b)) => a == b,
                    (ResolvedType::Primitive(_), _) | (_, ResolvedType::Primitive(_)) => false,
                    (target, source) => target.is_assignable_by(source, solver),
                }
            }
            (ResolvedType::Array(_), _) => false,

            (ResolvedType::Null, _) => false,
        }
    }

    fn is_object(&self) -> bool {
        self.qualified_name()
            .is_some_and(|name| name.as_str() == well_known::OBJECT)
    }
}

impl PartialEq for ResolvedType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ResolvedType::Primitive(a), ResolvedType::Primitive(b)) => a == b,
            (ResolvedType::Reference(a), ResolvedType::Reference(b)) => a == b,
            (ResolvedType::Array(a), ResolvedType::Array(b)) => a == b,
            (
                ResolvedType::TypeVariable { name: a, .. },
                ResolvedType::TypeVariable { name: b, .. },
            ) => a == b,
            (ResolvedType::Wildcard(a), ResolvedType::Wildcard(b)) => a == b,
            (ResolvedType::Null, ResolvedType::Null) | (ResolvedType::Void, ResolvedType::Void) => {
                true
            }
            _ => false,
        }
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedType::Primitive(kind) => write!(f, "{kind}"),
            ResolvedType::Reference(reference) => write!(f, "{reference}"),
            ResolvedType::Array(component) => write!(f, "{component}[]"),
            ResolvedType::TypeVariable { name, .. } => f.write_str(name),
            ResolvedType::Wildcard(WildcardBound::Unbounded) => f.write_str("?"),
            ResolvedType::Wildcard(WildcardBound::Extends(bound)) => write!(f, "? extends {bound}"),
            ResolvedType::Wildcard(WildcardBound::Super(bound)) => write!(f, "? super {bound}"),
            ResolvedType::Null => f.write_str("null"),
            ResolvedType::Void => f.write_str("void"),
        }
    }
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name())?;
        if !self.type_arguments.is_empty() {
            f.write_str("<")?;
            for (idx, arg) in self.type_arguments.iter().enumerate() {
                if idx > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResolvedType({self})")
    }
}

impl fmt::Debug for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReferenceType({self})")
    }
}

impl fmt::Debug for WildcardBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WildcardBound::Unbounded => f.write_str("Unbounded"),
            WildcardBound::Extends(bound) => write!(f, "Extends({bound})"),
            WildcardBound::Super(bound) => write!(f, "Super({bound})"),
        }
    }
}
