//! Declarations with two backings: compiled class files and parsed Groovy sources.
//!
//! Every declaration kind is an enum over its backings, so callers never care where a type came
//! from. Equality is by shape (qualified name, kind and member signatures), which makes a class
//! loaded from a jar equal to the same class read from source.

mod introspected;
mod source;

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use loam_core::{AccessLevel, Name, PackageName, SymbolReference, TypeName};

use crate::solver::TypeSolver;
use crate::ty::{ReferenceType, ResolvedType};

pub use introspected::{IntrospectedField, IntrospectedMethod, IntrospectedParameter, IntrospectedType};
pub use source::{
    SourceConstructor, SourceField, SourceMethod, SourceParameter, SourceType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Trait,
}

pub enum TypeDecl {
    Introspected(IntrospectedType),
    Source(SourceType),
}

#[derive(Default)]
pub(crate) struct Members {
    pub(crate) fields: Vec<FieldDecl>,
    pub(crate) methods: Vec<MethodDecl>,
    pub(crate) constructors: Vec<ConstructorDecl>,
}

impl From<IntrospectedType> for TypeDecl {
    fn from(ty: IntrospectedType) -> Self {
        TypeDecl::Introspected(ty)
    }
}

impl From<SourceType> for TypeDecl {
    fn from(ty: SourceType) -> Self {
        TypeDecl::Source(ty)
    }
}

impl TypeDecl {
    pub fn qualified_name(&self) -> &TypeName {
        match self {
            TypeDecl::Introspected(ty) => ty.qualified_name(),
            TypeDecl::Source(ty) => ty.qualified_name(),
        }
    }

    pub fn simple_name(&self) -> &str {
        self.qualified_name().simple_name()
    }

    pub fn package(&self) -> PackageName {
        match self {
            TypeDecl::Introspected(ty) => ty.package(),
            TypeDecl::Source(ty) => ty.package(),
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            TypeDecl::Introspected(ty) => ty.kind(),
            TypeDecl::Source(ty) => ty.kind(),
        }
    }

    /// Interfaces and annotation types.
    pub fn is_interface(&self) -> bool {
        matches!(self.kind(), TypeKind::Interface | TypeKind::Annotation)
    }

    pub fn is_source(&self) -> bool {
        matches!(self, TypeDecl::Source(_))
    }

    pub fn access(&self) -> AccessLevel {
        match self {
            TypeDecl::Introspected(ty) => ty.access(),
            TypeDecl::Source(ty) => ty.access(),
        }
    }

    pub fn type_parameters(&self) -> Vec<String> {
        match self {
            TypeDecl::Introspected(ty) => ty.type_parameters(),
            TypeDecl::Source(_) => Vec::new(),
        }
    }

    fn members(&self) -> &Members {
        match self {
            TypeDecl::Introspected(ty) => ty.members(),
            TypeDecl::Source(ty) => ty.members(),
        }
    }

    /// Fields declared by this type, not inherited ones.
    pub fn fields(&self) -> &[FieldDecl] {
        &self.members().fields
    }

    pub fn methods(&self) -> &[MethodDecl] {
        &self.members().methods
    }

    pub fn constructors(&self) -> &[ConstructorDecl] {
        &self.members().constructors
    }

    /// Member types declared directly inside this type, as (simple name, qualified name).
    pub fn member_types(&self) -> Vec<(Name, TypeName)> {
        match self {
            TypeDecl::Introspected(ty) => ty.member_types(),
            TypeDecl::Source(ty) => ty.member_types(),
        }
    }

    /// The superclass and interfaces as written, with any implicit ones added. Supertypes the
    /// solver cannot find are left out.
    pub fn direct_ancestors(&self, solver: &dyn TypeSolver) -> Vec<ReferenceType> {
        match self {
            TypeDecl::Introspected(ty) => ty.direct_ancestors(solver),
            TypeDecl::Source(ty) => ty.direct_ancestors(solver),
        }
    }

    /// Every supertype, nearest first. Each type appears once, even with cyclic hierarchies.
    pub fn all_ancestors(&self, solver: &dyn TypeSolver) -> Vec<ReferenceType> {
        let mut seen: HashSet<TypeName> = HashSet::new();
        seen.insert(self.qualified_name().clone());

        let mut out = Vec::new();
        let mut queue: VecDeque<ReferenceType> = self.direct_ancestors(solver).into();
        while let Some(next) = queue.pop_front() {
            if !seen.insert(next.qualified_name().clone()) {
                continue;
            }
            queue.extend(next.declaration.direct_ancestors(solver));
            out.push(next);
        }
        out
    }

    pub fn is_subtype_of(&self, name: &str, solver: &dyn TypeSolver) -> bool {
        self.qualified_name().as_str() == name
            || self
                .all_ancestors(solver)
                .iter()
                .any(|ancestor| ancestor.qualified_name().as_str() == name)
    }

    /// A field by name: declared ones first, then non-private inherited ones.
    pub fn field(&self, name: &str, solver: &dyn TypeSolver) -> SymbolReference<FieldDecl> {
        if let Some(field) = self.fields().iter().find(|f| f.name() == name) {
            return SymbolReference::Solved(field.clone());
        }
        self.all_ancestors(solver)
            .iter()
            .find_map(|ancestor| {
                ancestor
                    .declaration
                    .fields()
                    .iter()
                    .find(|f| f.name() == name && f.access() != AccessLevel::Private)
                    .cloned()
            })
            .into()
    }

    /// Declared methods plus inherited non-private ones. An inherited method is hidden by any
    /// method with the same signature closer to this type.
    pub fn all_methods(&self, solver: &dyn TypeSolver) -> Vec<MethodDecl> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut out = Vec::new();
        for method in self.methods() {
            if seen.insert(method.signature()) {
                out.push(method.clone());
            }
        }
        for ancestor in self.all_ancestors(solver) {
            for method in ancestor.declaration.methods() {
                if method.access() == AccessLevel::Private {
                    continue;
                }
                if seen.insert(method.signature()) {
                    out.push(method.clone());
                }
            }
        }
        out
    }

    pub fn methods_named(&self, name: &str, solver: &dyn TypeSolver) -> Vec<MethodDecl> {
        self.all_methods(solver)
            .into_iter()
            .filter(|method| method.name() == name)
            .collect()
    }

    /// A member type by simple name, declared here or inherited.
    pub fn member_type(&self, name: &str, solver: &dyn TypeSolver) -> SymbolReference<Arc<TypeDecl>> {
        if let SymbolReference::Solved(found) = declared_member_type(self, name, solver) {
            return SymbolReference::Solved(found);
        }
        for ancestor in self.all_ancestors(solver) {
            if let SymbolReference::Solved(found) =
                declared_member_type(&ancestor.declaration, name, solver)
            {
                return SymbolReference::Solved(found);
            }
        }
        SymbolReference::Unsolved
    }

    fn shape(&self) -> (HashSet<String>, HashSet<String>, HashSet<String>) {
        (
            self.fields().iter().map(FieldDecl::signature).collect(),
            self.methods().iter().map(MethodDecl::signature).collect(),
            self.constructors()
                .iter()
                .map(ConstructorDecl::signature)
                .collect(),
        )
    }
}

fn declared_member_type(
    decl: &TypeDecl,
    name: &str,
    solver: &dyn TypeSolver,
) -> SymbolReference<Arc<TypeDecl>> {
    decl.member_types()
        .into_iter()
        .find(|(simple, _)| simple.as_str() == name)
        .map_or(SymbolReference::Unsolved, |(_, qualified)| {
            solver.try_to_solve_type(qualified.as_str())
        })
}

impl PartialEq for TypeDecl {
    fn eq(&self, other: &Self) -> bool {
        self.qualified_name() == other.qualified_name()
            && self.is_interface() == other.is_interface()
            && self.shape() == other.shape()
    }
}

impl fmt::Debug for TypeDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let backing = match self {
            TypeDecl::Introspected(_) => "introspected",
            TypeDecl::Source(_) => "source",
        };
        write!(f, "TypeDecl({backing} {:?} {})", self.kind(), self.qualified_name())
    }
}

#[derive(Clone)]
pub enum FieldDecl {
    Introspected(IntrospectedField),
    Source(SourceField),
}

impl FieldDecl {
    pub fn name(&self) -> &str {
        match self {
            FieldDecl::Introspected(field) => field.name(),
            FieldDecl::Source(field) => field.name(),
        }
    }

    pub fn declaring_type(&self) -> &TypeName {
        match self {
            FieldDecl::Introspected(field) => field.declaring_type(),
            FieldDecl::Source(field) => field.declaring_type(),
        }
    }

    pub fn access(&self) -> AccessLevel {
        match self {
            FieldDecl::Introspected(field) => field.access(),
            FieldDecl::Source(field) => field.access(),
        }
    }

    pub fn is_static(&self) -> bool {
        match self {
            FieldDecl::Introspected(field) => field.is_static(),
            FieldDecl::Source(field) => field.is_static(),
        }
    }

    pub fn is_final(&self) -> bool {
        match self {
            FieldDecl::Introspected(field) => field.is_final(),
            FieldDecl::Source(field) => field.is_final(),
        }
    }

    /// Declared without a type (`def x`). Only sources can do that.
    pub fn is_dynamic(&self) -> bool {
        match self {
            FieldDecl::Introspected(_) => false,
            FieldDecl::Source(field) => field.is_dynamic(),
        }
    }

    pub fn ty(&self, solver: &dyn TypeSolver) -> SymbolReference<ResolvedType> {
        match self {
            FieldDecl::Introspected(field) => field.ty(solver),
            FieldDecl::Source(field) => field.ty(solver),
        }
    }

    /// `name:ErasedSimpleType`, comparable across backings.
    pub fn signature(&self) -> String {
        let ty = match self {
            FieldDecl::Introspected(field) => field.erased_type(),
            FieldDecl::Source(field) => field.erased_type(),
        };
        format!("{}:{ty}", self.name())
    }
}

impl PartialEq for FieldDecl {
    fn eq(&self, other: &Self) -> bool {
        self.declaring_type() == other.declaring_type() && self.signature() == other.signature()
    }
}

impl fmt::Debug for FieldDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldDecl({}.{})", self.declaring_type(), self.signature())
    }
}

#[derive(Clone)]
pub enum MethodDecl {
    Introspected(IntrospectedMethod),
    Source(SourceMethod),
}

impl MethodDecl {
    pub fn name(&self) -> &str {
        match self {
            MethodDecl::Introspected(method) => method.name(),
            MethodDecl::Source(method) => method.name(),
        }
    }

    pub fn declaring_type(&self) -> &TypeName {
        match self {
            MethodDecl::Introspected(method) => method.declaring_type(),
            MethodDecl::Source(method) => method.declaring_type(),
        }
    }

    pub fn access(&self) -> AccessLevel {
        match self {
            MethodDecl::Introspected(method) => method.access(),
            MethodDecl::Source(method) => method.access(),
        }
    }

    pub fn is_static(&self) -> bool {
        match self {
            MethodDecl::Introspected(method) => method.is_static(),
            MethodDecl::Source(method) => method.is_static(),
        }
    }

    pub fn is_abstract(&self) -> bool {
        match self {
            MethodDecl::Introspected(method) => method.is_abstract(),
            MethodDecl::Source(method) => method.is_abstract(),
        }
    }

    pub fn is_varargs(&self) -> bool {
        match self {
            MethodDecl::Introspected(method) => method.is_varargs(),
            MethodDecl::Source(method) => method.is_varargs(),
        }
    }

    pub fn parameters(&self) -> Vec<ParameterDecl> {
        match self {
            MethodDecl::Introspected(method) => method.parameters(),
            MethodDecl::Source(method) => method.parameters(),
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            MethodDecl::Introspected(method) => method.arity(),
            MethodDecl::Source(method) => method.arity(),
        }
    }

    pub fn type_parameters(&self) -> Vec<String> {
        match self {
            MethodDecl::Introspected(method) => method.type_parameters(),
            MethodDecl::Source(method) => method.type_parameters(),
        }
    }

    /// Declared with `def` or no return type.
    pub fn returns_dynamic(&self) -> bool {
        match self {
            MethodDecl::Introspected(_) => false,
            MethodDecl::Source(method) => method.returns_dynamic(),
        }
    }

    pub fn return_type(&self, solver: &dyn TypeSolver) -> SymbolReference<ResolvedType> {
        match self {
            MethodDecl::Introspected(method) => method.return_type(solver),
            MethodDecl::Source(method) => method.return_type(solver),
        }
    }

    /// `name(ErasedSimple, ...)`, comparable across backings.
    pub fn signature(&self) -> String {
        erased_signature(self.name(), &self.parameters())
    }
}

impl PartialEq for MethodDecl {
    fn eq(&self, other: &Self) -> bool {
        self.declaring_type() == other.declaring_type() && self.signature() == other.signature()
    }
}

impl fmt::Debug for MethodDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodDecl({}.{})", self.declaring_type(), self.signature())
    }
}

#[derive(Clone)]
pub enum ConstructorDecl {
    Introspected(IntrospectedMethod),
    Source(SourceConstructor),
}

impl ConstructorDecl {
    pub fn declaring_type(&self) -> &TypeName {
        match self {
            ConstructorDecl::Introspected(ctor) => ctor.declaring_type(),
            ConstructorDecl::Source(ctor) => ctor.declaring_type(),
        }
    }

    pub fn access(&self) -> AccessLevel {
        match self {
            ConstructorDecl::Introspected(ctor) => ctor.access(),
            ConstructorDecl::Source(ctor) => ctor.access(),
        }
    }

    pub fn is_varargs(&self) -> bool {
        match self {
            ConstructorDecl::Introspected(ctor) => ctor.is_varargs(),
            ConstructorDecl::Source(ctor) => ctor.is_varargs(),
        }
    }

    pub fn parameters(&self) -> Vec<ParameterDecl> {
        match self {
            ConstructorDecl::Introspected(ctor) => ctor.parameters(),
            ConstructorDecl::Source(ctor) => ctor.parameters(),
        }
    }

    pub fn signature(&self) -> String {
        erased_signature("<init>", &self.parameters())
    }
}

impl PartialEq for ConstructorDecl {
    fn eq(&self, other: &Self) -> bool {
        self.declaring_type() == other.declaring_type() && self.signature() == other.signature()
    }
}

impl fmt::Debug for ConstructorDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConstructorDecl({}.{})", self.declaring_type(), self.signature())
    }
}

#[derive(Clone)]
pub enum ParameterDecl {
    Introspected(IntrospectedParameter),
    Source(SourceParameter),
}

impl ParameterDecl {
    /// Class files rarely keep parameter names; those parameters are named `arg0`, `arg1`, ...
    pub fn name(&self) -> String {
        match self {
            ParameterDecl::Introspected(param) => param.name(),
            ParameterDecl::Source(param) => param.name().to_string(),
        }
    }

    pub fn is_varargs(&self) -> bool {
        match self {
            ParameterDecl::Introspected(param) => param.is_varargs(),
            ParameterDecl::Source(param) => param.is_varargs(),
        }
    }

    /// Groovy parameters with a default value may be left out of a call.
    pub fn has_default(&self) -> bool {
        match self {
            ParameterDecl::Introspected(_) => false,
            ParameterDecl::Source(param) => param.has_default(),
        }
    }

    pub fn is_dynamic(&self) -> bool {
        match self {
            ParameterDecl::Introspected(_) => false,
            ParameterDecl::Source(param) => param.is_dynamic(),
        }
    }

    /// The parameter's type; varargs parameters are arrays.
    pub fn ty(&self, solver: &dyn TypeSolver) -> SymbolReference<ResolvedType> {
        match self {
            ParameterDecl::Introspected(param) => param.ty(solver),
            ParameterDecl::Source(param) => param.ty(solver),
        }
    }

    fn erased_type(&self) -> String {
        match self {
            ParameterDecl::Introspected(param) => param.erased_type(),
            ParameterDecl::Source(param) => param.erased_type(),
        }
    }
}

/// Parameters compare by erased type and varargs-ness. Names only count between two source
/// parameters, since class files carry none.
impl PartialEq for ParameterDecl {
    fn eq(&self, other: &Self) -> bool {
        let names_match = match (self, other) {
            (ParameterDecl::Source(a), ParameterDecl::Source(b)) => a.name() == b.name(),
            _ => true,
        };
        names_match
            && self.is_varargs() == other.is_varargs()
            && self.erased_type() == other.erased_type()
    }
}

impl fmt::Debug for ParameterDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParameterDecl({}: {})", self.name(), self.erased_type())
    }
}

fn erased_signature(name: &str, params: &[ParameterDecl]) -> String {
    let params: Vec<String> = params.iter().map(ParameterDecl::erased_type).collect();
    format!("{name}({})", params.join(", "))
}

/// The part of a bean accessor name after `get`, `is` or `set`. Groovy keeps names whose
/// second letter is upper case as they are (`aProp` -> `getaProp`) and upper-cases the first
/// letter otherwise.
pub fn accessor_suffix(property: &str) -> String {
    let mut chars = property.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if chars.next().is_some_and(char::is_uppercase) {
        return property.to_string();
    }
    let mut out: String = first.to_uppercase().collect();
    out.push_str(&property[first.len_utf8()..]);
    out
}

/// Drops the package and any enclosing types: `java.util.Map$Entry[]` and `Map.Entry[]` both
/// become `Entry[]`.
pub(crate) fn erased_simple_name(text: &str) -> String {
    let dims = text.matches("[]").count();
    let base = text.trim_end_matches("[]");
    let simple = base.rsplit(['.', '$']).next().unwrap_or(base);
    let mut out = String::with_capacity(simple.len() + dims * 2);
    out.push_str(simple);
    for _ in 0..dims {
        out.push_str("[]");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erased_names_drop_packages_and_outer_types() {
        assert_eq!(erased_simple_name("java.util.Map$Entry[][]"), "Entry[][]");
        assert_eq!(erased_simple_name("Map.Entry"), "Entry");
        assert_eq!(erased_simple_name("int"), "int");
    }

    #[test]
    fn accessor_suffixes_follow_groovy_bean_rules() {
        assert_eq!(accessor_suffix("name"), "Name");
        assert_eq!(accessor_suffix("aProp"), "aProp");
        assert_eq!(accessor_suffix("URL"), "URL");
        assert_eq!(accessor_suffix("x"), "X");
        assert_eq!(accessor_suffix(""), "");
    }
}
