use std::sync::{Arc, OnceLock};

use loam_core::{AccessLevel, Name, PackageName, QualifiedName, SymbolReference, TypeName};
use loam_hir::{ClassDecl, ClassKind, ConstructorDecl as HirConstructor, FieldDecl as HirField, MethodDecl as HirMethod, ParamDecl, TypeRef};
use loam_types::{well_known, PrimitiveKind};

use super::{accessor_suffix, erased_simple_name, ConstructorDecl, FieldDecl, Members, MethodDecl, ParameterDecl, TypeDecl, TypeKind};
use crate::import_map::{walk_member_types, ImportResolver, UnitInfo};
use crate::solver::TypeSolver;
use crate::ty::{ReferenceType, ResolvedType};

/// Where a source declaration resolves the type names it mentions.
pub(crate) struct SourceScope {
    unit: Arc<UnitInfo>,
    /// Enclosing types, innermost first.
    enclosing: Vec<TypeName>,
    /// Type parameters in scope. Source generics are erased, so these resolve to `Object`.
    type_params: Vec<Name>,
}

impl SourceScope {
    fn with_type_params(self: &Arc<Self>, extra: &[Name]) -> Arc<Self> {
        if extra.is_empty() {
            return self.clone();
        }
        let mut type_params = extra.to_vec();
        type_params.extend(self.type_params.iter().cloned());
        Arc::new(SourceScope {
            unit: self.unit.clone(),
            enclosing: self.enclosing.clone(),
            type_params,
        })
    }

    pub(crate) fn resolve_type_ref(
        &self,
        ty: &TypeRef,
        solver: &dyn TypeSolver,
    ) -> SymbolReference<ResolvedType> {
        let element = if ty.is_def() {
            ResolvedType::object(solver).into()
        } else {
            match builtin(&ty.name) {
                Some(builtin) => SymbolReference::Solved(builtin),
                None => self.resolve_name(&ty.name, solver).map(|declaration| {
                    let args: Option<Vec<ResolvedType>> = ty
                        .type_args
                        .iter()
                        .map(|arg| self.resolve_type_ref(arg, solver).ok())
                        .collect();
                    ResolvedType::Reference(ReferenceType {
                        declaration,
                        type_arguments: args.unwrap_or_default(),
                    })
                }),
            }
        };
        element.map(|element| wrap_array(element, ty.array_dims))
    }

    pub(crate) fn resolve_name(
        &self,
        name: &QualifiedName,
        solver: &dyn TypeSolver,
    ) -> SymbolReference<Arc<TypeDecl>> {
        match name.segments() {
            [] => SymbolReference::Unsolved,
            [single] => self.resolve_simple(single.as_str(), solver),
            [first, rest @ ..] => solver.try_to_solve_type(&name.to_dotted()).or_else(|| {
                self.resolve_simple(first.as_str(), solver)
                    .and_then(|outer| walk_member_types(outer, rest, solver))
            }),
        }
    }

    fn resolve_simple(&self, name: &str, solver: &dyn TypeSolver) -> SymbolReference<Arc<TypeDecl>> {
        if self.type_params.iter().any(|param| param.as_str() == name) {
            return solver.try_to_solve_type(well_known::OBJECT);
        }
        for enclosing in &self.enclosing {
            if enclosing.simple_name() == name {
                if let SymbolReference::Solved(found) = solver.try_to_solve_type(enclosing.as_str()) {
                    return SymbolReference::Solved(found);
                }
            }
            if let SymbolReference::Solved(outer) = solver.try_to_solve_type(enclosing.as_str()) {
                if let SymbolReference::Solved(found) = outer.member_type(name, solver) {
                    return SymbolReference::Solved(found);
                }
            }
        }
        ImportResolver::new(&self.unit, solver).resolve_simple(name)
    }
}

fn builtin(name: &QualifiedName) -> Option<ResolvedType> {
    let [single] = name.segments() else {
        return None;
    };
    if single.as_str() == "void" {
        return Some(ResolvedType::Void);
    }
    PrimitiveKind::from_keyword(single.as_str()).map(ResolvedType::Primitive)
}

fn wrap_array(mut ty: ResolvedType, dims: u8) -> ResolvedType {
    for _ in 0..dims {
        ty = ResolvedType::Array(Box::new(ty));
    }
    ty
}

fn erased_type_ref(ty: Option<&TypeRef>) -> String {
    match ty {
        Some(ty) if !ty.is_def() => {
            let mut text = ty.name.to_dotted();
            for _ in 0..ty.array_dims {
                text.push_str("[]");
            }
            erased_simple_name(&text)
        }
        _ => "Object".to_string(),
    }
}

/// A type declared in a parsed Groovy compilation unit.
pub struct SourceType {
    name: TypeName,
    class: Arc<ClassDecl>,
    /// Scope for the body: sees the type's own members and type parameters.
    scope: Arc<SourceScope>,
    /// Scope for the header; excludes the type itself so that resolving its supertypes never
    /// needs its supertypes.
    header_scope: Arc<SourceScope>,
    members: OnceLock<Members>,
}

impl SourceType {
    /// `enclosing` lists the outer types of a nested class, innermost first.
    pub fn new(
        class: ClassDecl,
        name: TypeName,
        unit: Arc<UnitInfo>,
        enclosing: Vec<TypeName>,
    ) -> Self {
        let header_scope = Arc::new(SourceScope {
            unit: unit.clone(),
            enclosing: enclosing.clone(),
            type_params: class.type_params.clone(),
        });
        let mut inner = Vec::with_capacity(enclosing.len() + 1);
        inner.push(name.clone());
        inner.extend(enclosing);
        let scope = Arc::new(SourceScope {
            unit,
            enclosing: inner,
            type_params: class.type_params.clone(),
        });
        Self {
            name,
            class: Arc::new(class),
            scope,
            header_scope,
            members: OnceLock::new(),
        }
    }

    pub fn class(&self) -> &ClassDecl {
        &self.class
    }

    pub fn unit(&self) -> &UnitInfo {
        &self.scope.unit
    }

    pub(crate) fn qualified_name(&self) -> &TypeName {
        &self.name
    }

    pub(crate) fn package(&self) -> PackageName {
        self.scope.unit.package.clone()
    }

    pub(crate) fn kind(&self) -> TypeKind {
        match self.class.kind {
            ClassKind::Class => TypeKind::Class,
            ClassKind::Interface => TypeKind::Interface,
            ClassKind::Enum => TypeKind::Enum,
            ClassKind::Annotation => TypeKind::Annotation,
            ClassKind::Trait => TypeKind::Trait,
        }
    }

    /// Groovy classes are public unless declared otherwise.
    pub(crate) fn access(&self) -> AccessLevel {
        self.class.modifiers.visibility.unwrap_or(AccessLevel::Public)
    }

    pub(crate) fn member_types(&self) -> Vec<(Name, TypeName)> {
        self.class
            .nested_types
            .iter()
            .map(|nested| (nested.name.clone(), self.name.nested(nested.name.as_str())))
            .collect()
    }

    pub(crate) fn direct_ancestors(&self, solver: &dyn TypeSolver) -> Vec<ReferenceType> {
        let mut out: Vec<ReferenceType> = Vec::new();
        for written in self.class.extends.iter().chain(&self.class.implements) {
            match self.header_scope.resolve_type_ref(written, solver) {
                SymbolReference::Solved(ResolvedType::Reference(reference)) => out.push(reference),
                _ => tracing::debug!(
                    target: "loam.resolve",
                    ty = %self.name,
                    ancestor = %written,
                    "skipping unresolved supertype"
                ),
            }
        }

        let kind = self.kind();
        let has_superclass = matches!(kind, TypeKind::Class) && !self.class.extends.is_empty();
        if !has_superclass {
            let implicit = match kind {
                TypeKind::Enum => well_known::ENUM,
                TypeKind::Annotation => "java.lang.annotation.Annotation",
                _ => well_known::OBJECT,
            };
            self.push_implicit(&mut out, implicit, solver);
            if kind == TypeKind::Annotation {
                self.push_implicit(&mut out, well_known::OBJECT, solver);
            }
        }
        if matches!(kind, TypeKind::Class | TypeKind::Enum) {
            self.push_implicit(&mut out, well_known::GROOVY_OBJECT, solver);
        }
        out
    }

    fn push_implicit(&self, out: &mut Vec<ReferenceType>, name: &str, solver: &dyn TypeSolver) {
        if out.iter().any(|r| r.qualified_name().as_str() == name) {
            return;
        }
        if let SymbolReference::Solved(decl) = solver.try_to_solve_type(name) {
            out.push(ReferenceType::new(decl));
        }
    }

    pub(crate) fn members(&self) -> &Members {
        self.members.get_or_init(|| self.build_members())
    }

    fn build_members(&self) -> Members {
        let mut members = Members::default();
        let is_interface = matches!(
            self.class.kind,
            ClassKind::Interface | ClassKind::Annotation
        );

        for field in &self.class.fields {
            members.fields.push(FieldDecl::Source(SourceField {
                scope: self.scope.clone(),
                declaring: self.name.clone(),
                decl: Arc::new(field.clone()),
            }));
        }

        for method in &self.class.methods {
            members.methods.push(MethodDecl::Source(SourceMethod::declared(
                &self.scope,
                &self.name,
                method,
                is_interface,
            )));
        }

        for field in self.class.fields.iter().filter(|f| f.is_property()) {
            for accessor in self.accessors(field) {
                let clashes = self.class.methods.iter().any(|m| {
                    m.name == accessor.name && m.params.len() == accessor.params.len()
                });
                if !clashes {
                    members.methods.push(MethodDecl::Source(accessor));
                }
            }
        }

        for ctor in &self.class.constructors {
            members.constructors.push(ConstructorDecl::Source(SourceConstructor {
                scope: self.scope.clone(),
                declaring: self.name.clone(),
                decl: Arc::new(ctor.clone()),
            }));
        }
        if self.class.constructors.is_empty()
            && matches!(self.class.kind, ClassKind::Class | ClassKind::Enum)
        {
            members.constructors.push(ConstructorDecl::Source(SourceConstructor {
                scope: self.scope.clone(),
                declaring: self.name.clone(),
                decl: Arc::new(HirConstructor {
                    modifiers: loam_hir::Modifiers::public(),
                    ..HirConstructor::default()
                }),
            }));
        }

        members
    }

    /// The getter, `is` getter for `boolean` and setter Groovy generates for a property.
    fn accessors(&self, field: &HirField) -> Vec<SourceMethod> {
        let capitalized = accessor_suffix(field.name.as_str());
        let is_static = field.modifiers.is_static;
        let accessor = |name: String, params: Vec<ParamDecl>, return_type: Option<TypeRef>| SourceMethod {
            scope: self.scope.clone(),
            declaring: self.name.clone(),
            name: Name::new(name),
            params: Arc::new(params),
            return_type,
            access: AccessLevel::Public,
            is_static,
            is_abstract: false,
            type_params: Vec::new(),
        };

        let mut out = vec![accessor(format!("get{capitalized}"), Vec::new(), field.ty.clone())];
        let is_boolean = field
            .ty
            .as_ref()
            .is_some_and(|ty| ty.array_dims == 0 && ty.name.to_dotted() == "boolean");
        if is_boolean {
            out.push(accessor(format!("is{capitalized}"), Vec::new(), field.ty.clone()));
        }
        if !field.modifiers.is_final {
            out.push(accessor(
                format!("set{capitalized}"),
                vec![ParamDecl::new("value", field.ty.clone())],
                Some(TypeRef::new("void")),
            ));
        }
        out
    }
}

#[derive(Clone)]
pub struct SourceField {
    scope: Arc<SourceScope>,
    declaring: TypeName,
    decl: Arc<HirField>,
}

impl SourceField {
    pub fn decl(&self) -> &HirField {
        &self.decl
    }

    pub(crate) fn name(&self) -> &str {
        self.decl.name.as_str()
    }

    pub(crate) fn declaring_type(&self) -> &TypeName {
        &self.declaring
    }

    /// Fields without a visibility keyword are properties, whose backing field is private.
    pub(crate) fn access(&self) -> AccessLevel {
        self.decl
            .modifiers
            .visibility
            .unwrap_or(AccessLevel::Private)
    }

    pub(crate) fn is_static(&self) -> bool {
        self.decl.modifiers.is_static
    }

    pub(crate) fn is_final(&self) -> bool {
        self.decl.modifiers.is_final
    }

    pub(crate) fn is_dynamic(&self) -> bool {
        self.decl.ty.as_ref().map_or(true, TypeRef::is_def)
    }

    pub(crate) fn ty(&self, solver: &dyn TypeSolver) -> SymbolReference<ResolvedType> {
        match &self.decl.ty {
            Some(ty) => self.scope.resolve_type_ref(ty, solver),
            None => ResolvedType::object(solver).into(),
        }
    }

    pub(crate) fn erased_type(&self) -> String {
        erased_type_ref(self.decl.ty.as_ref())
    }
}

/// A source method: declared, or an accessor generated for a property.
#[derive(Clone)]
pub struct SourceMethod {
    scope: Arc<SourceScope>,
    declaring: TypeName,
    name: Name,
    params: Arc<Vec<ParamDecl>>,
    return_type: Option<TypeRef>,
    access: AccessLevel,
    is_static: bool,
    is_abstract: bool,
    type_params: Vec<Name>,
}

impl SourceMethod {
    fn declared(
        scope: &Arc<SourceScope>,
        declaring: &TypeName,
        method: &HirMethod,
        in_interface: bool,
    ) -> Self {
        Self {
            scope: scope.with_type_params(&method.type_params),
            declaring: declaring.clone(),
            name: method.name.clone(),
            params: Arc::new(method.params.clone()),
            return_type: method.return_type.clone(),
            access: method.modifiers.visibility.unwrap_or(AccessLevel::Public),
            is_static: method.modifiers.is_static,
            is_abstract: method.modifiers.is_abstract || (in_interface && method.body.is_none()),
            type_params: method.type_params.clone(),
        }
    }

    pub(crate) fn name(&self) -> &str {
        self.name.as_str()
    }

    pub(crate) fn declaring_type(&self) -> &TypeName {
        &self.declaring
    }

    pub(crate) fn access(&self) -> AccessLevel {
        self.access
    }

    pub(crate) fn is_static(&self) -> bool {
        self.is_static
    }

    pub(crate) fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub(crate) fn is_varargs(&self) -> bool {
        self.params.last().is_some_and(|p| p.is_varargs)
    }

    pub(crate) fn arity(&self) -> usize {
        self.params.len()
    }

    pub(crate) fn type_parameters(&self) -> Vec<String> {
        self.type_params.iter().map(|p| p.to_string()).collect()
    }

    pub(crate) fn parameters(&self) -> Vec<ParameterDecl> {
        (0..self.params.len())
            .map(|index| {
                ParameterDecl::Source(SourceParameter {
                    scope: self.scope.clone(),
                    params: self.params.clone(),
                    index,
                })
            })
            .collect()
    }

    pub(crate) fn returns_dynamic(&self) -> bool {
        self.return_type.as_ref().map_or(true, TypeRef::is_def)
    }

    pub(crate) fn return_type(&self, solver: &dyn TypeSolver) -> SymbolReference<ResolvedType> {
        match &self.return_type {
            Some(ty) => self.scope.resolve_type_ref(ty, solver),
            None => ResolvedType::object(solver).into(),
        }
    }
}

#[derive(Clone)]
pub struct SourceConstructor {
    scope: Arc<SourceScope>,
    declaring: TypeName,
    decl: Arc<HirConstructor>,
}

impl SourceConstructor {
    pub(crate) fn declaring_type(&self) -> &TypeName {
        &self.declaring
    }

    pub(crate) fn access(&self) -> AccessLevel {
        self.decl.modifiers.visibility.unwrap_or(AccessLevel::Public)
    }

    pub(crate) fn is_varargs(&self) -> bool {
        self.decl.params.last().is_some_and(|p| p.is_varargs)
    }

    pub(crate) fn parameters(&self) -> Vec<ParameterDecl> {
        let params = Arc::new(self.decl.params.clone());
        (0..params.len())
            .map(|index| {
                ParameterDecl::Source(SourceParameter {
                    scope: self.scope.clone(),
                    params: params.clone(),
                    index,
                })
            })
            .collect()
    }
}

#[derive(Clone)]
pub struct SourceParameter {
    scope: Arc<SourceScope>,
    params: Arc<Vec<ParamDecl>>,
    index: usize,
}

impl SourceParameter {
    fn decl(&self) -> &ParamDecl {
        &self.params[self.index]
    }

    pub(crate) fn name(&self) -> &str {
        self.decl().name.as_str()
    }

    pub(crate) fn is_varargs(&self) -> bool {
        self.decl().is_varargs
    }

    pub(crate) fn has_default(&self) -> bool {
        self.decl().has_default
    }

    pub(crate) fn is_dynamic(&self) -> bool {
        self.decl().ty.as_ref().map_or(true, TypeRef::is_def)
    }

    pub(crate) fn ty(&self, solver: &dyn TypeSolver) -> SymbolReference<ResolvedType> {
        let element = match &self.decl().ty {
            Some(ty) => self.scope.resolve_type_ref(ty, solver),
            None => ResolvedType::object(solver).into(),
        };
        if self.is_varargs() {
            element.map(|element| ResolvedType::Array(Box::new(element)))
        } else {
            element
        }
    }

    pub(crate) fn erased_type(&self) -> String {
        let erased = erased_type_ref(self.decl().ty.as_ref());
        if self.is_varargs() {
            format!("{erased}[]")
        } else {
            erased
        }
    }
}
