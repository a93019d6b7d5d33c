//! The per-file resolver and the context chain lookups walk.
//!
//! A [`Context`] is a position in the scope graph. Each lookup asks the innermost scope first
//! and moves outward until some scope answers; the unit scope consults imports and the solver.

use std::sync::Arc;

use loam_core::{Name, QualifiedName, SymbolReference, TypeName};
use loam_hir::{Body, ClassDecl, CompilationUnit, ExprId, TypeRef};
use loam_types::{well_known, PrimitiveKind};

use crate::decl::{FieldDecl, MethodDecl, TypeDecl};
use crate::import_map::{walk_member_types, ImportResolver, UnitInfo};
use crate::methods::select_method;
use crate::scopes::{
    build_scopes, BodyOwner, LocalRef, ParamRef, Position, Resolution, ScopeBuildResult, ScopeData,
    ScopeId, ScopeKind,
};
use crate::solver::{CombinedTypeSolver, TypeSolver};
use crate::source_solver::SourceTypeSolver;
use crate::ty::{ReferenceType, ResolvedType};

/// Resolution state for one compilation unit.
///
/// Lookups see the unit's own types first and then everything `session` knows.
pub struct Resolver {
    unit: Arc<CompilationUnit>,
    info: Arc<UnitInfo>,
    solver: CombinedTypeSolver,
    scopes: ScopeBuildResult,
}

impl Resolver {
    pub fn new(unit: Arc<CompilationUnit>, session: Arc<dyn TypeSolver>) -> Self {
        let info = Arc::new(UnitInfo::new(&unit));
        let own: Arc<dyn TypeSolver> =
            Arc::new(SourceTypeSolver::with_label("unit", [unit.clone()]));
        let solver = CombinedTypeSolver::new([own, session]);
        let scopes = build_scopes(&unit);
        tracing::debug!(
            target: "loam.resolve",
            package = %info.package,
            scopes = scopes.scopes.len(),
            "built resolver for compilation unit"
        );
        Self {
            unit,
            info,
            solver,
            scopes,
        }
    }

    pub fn unit(&self) -> &CompilationUnit {
        &self.unit
    }

    pub fn unit_info(&self) -> &UnitInfo {
        &self.info
    }

    pub fn solver(&self) -> &dyn TypeSolver {
        &self.solver
    }

    pub fn scopes(&self) -> &ScopeBuildResult {
        &self.scopes
    }

    pub fn context(&self, scope: ScopeId) -> Context<'_> {
        Context {
            resolver: self,
            scope,
            position: None,
        }
    }

    pub fn unit_context(&self) -> Context<'_> {
        self.context(self.scopes.unit_scope)
    }

    /// The context an expression of `owner`'s body is evaluated in. Locals declared after the
    /// expression are not visible from it.
    pub fn expr_context(&self, owner: &BodyOwner, expr: ExprId) -> Option<Context<'_>> {
        let scope = self.scopes.expr_scope(owner, expr)?;
        Some(Context {
            resolver: self,
            scope,
            position: self.scopes.expr_position(owner, expr),
        })
    }

    /// The class declaration behind a qualified name declared in this unit.
    pub fn class(&self, ty: &TypeName) -> Option<&ClassDecl> {
        fn find<'a>(
            classes: &'a [ClassDecl],
            qualify: &dyn Fn(&str) -> TypeName,
            wanted: &TypeName,
        ) -> Option<&'a ClassDecl> {
            classes.iter().find_map(|class| {
                let name = qualify(class.name.as_str());
                if &name == wanted {
                    return Some(class);
                }
                find(&class.nested_types, &|simple: &str| name.nested(simple), wanted)
            })
        }

        find(&self.unit.types, &|simple: &str| self.info.package.qualify(simple), ty)
    }

    pub fn body(&self, owner: &BodyOwner) -> Option<&Body> {
        match owner {
            BodyOwner::Script => self.unit.script.as_ref(),
            BodyOwner::Method { ty, index } => self.class(ty)?.methods.get(*index)?.body.as_ref(),
            BodyOwner::Constructor { ty, index } => {
                self.class(ty)?.constructors.get(*index)?.body.as_ref()
            }
        }
    }
}

/// A value name's declaration.
#[derive(Debug, Clone)]
pub enum ValueDecl {
    Local {
        name: Name,
        local: LocalRef,
        ty: Option<TypeRef>,
        scope: ScopeId,
    },
    Parameter {
        name: Name,
        param: ParamRef,
        ty: Option<TypeRef>,
        is_varargs: bool,
        scope: ScopeId,
    },
    Field(FieldDecl),
}

impl ValueDecl {
    pub fn name(&self) -> &str {
        match self {
            ValueDecl::Local { name, .. } | ValueDecl::Parameter { name, .. } => name.as_str(),
            ValueDecl::Field(field) => field.name(),
        }
    }
}

/// What a declaration says about its value's type.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclaredType {
    /// Declared with `def` or without a type.
    Dynamic,
    Resolved(ResolvedType),
    /// Declared with a type no solver knows; carries the type as written.
    Unresolved(String),
}

#[derive(Clone, Copy)]
pub struct Context<'a> {
    resolver: &'a Resolver,
    scope: ScopeId,
    /// `None` sees every binding of the scope.
    position: Option<Position>,
}

impl<'a> Context<'a> {
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn resolver(&self) -> &'a Resolver {
        self.resolver
    }

    pub fn solver(&self) -> &'a dyn TypeSolver {
        self.resolver.solver()
    }

    fn data(&self) -> &'a ScopeData {
        self.resolver.scopes.scopes.scope(self.scope)
    }

    pub fn kind(&self) -> &'a ScopeKind {
        self.data().kind()
    }

    pub fn parent(&self) -> Option<Context<'a>> {
        self.data().parent().map(|scope| Context {
            resolver: self.resolver,
            scope,
            position: self.position,
        })
    }

    fn chain(&self) -> impl Iterator<Item = Context<'a>> {
        std::iter::successors(Some(*self), Context::parent)
    }

    /// The innermost class this context is in.
    pub fn enclosing_type(&self) -> Option<Arc<TypeDecl>> {
        self.chain().find_map(|ctx| match ctx.kind() {
            ScopeKind::Class { ty } => self.solver().try_to_solve_type(ty.as_str()).ok(),
            _ => None,
        })
    }

    /// Inside a static method, where `this` has no instance.
    pub fn is_static(&self) -> bool {
        self.chain()
            .find_map(|ctx| match ctx.kind() {
                ScopeKind::Method { is_static, .. } => Some(*is_static),
                ScopeKind::Class { .. } | ScopeKind::Constructor { .. } => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn is_script(&self) -> bool {
        self.chain()
            .any(|ctx| matches!(ctx.kind(), ScopeKind::Script))
    }

    /// Resolves a simple or dotted type name as written at this position.
    pub fn solve_type(&self, name: &str) -> SymbolReference<Arc<TypeDecl>> {
        let path = QualifiedName::from_dotted(name);
        match path.segments() {
            [] => SymbolReference::Unsolved,
            [single] => self.solve_simple_type(single.as_str()),
            [first, rest @ ..] => self.solver().try_to_solve_type(name).or_else(|| {
                self.solve_simple_type(first.as_str())
                    .and_then(|outer| walk_member_types(outer, rest, self.solver()))
            }),
        }
    }

    fn solve_simple_type(&self, name: &str) -> SymbolReference<Arc<TypeDecl>> {
        let solver = self.solver();
        for ctx in self.chain() {
            let data = ctx.data();
            if let Some(bound) = data.types().get(&Name::new(name)) {
                if let SymbolReference::Solved(found) = solver.try_to_solve_type(bound.as_str()) {
                    return SymbolReference::Solved(found);
                }
            }
            match data.kind() {
                ScopeKind::Class { ty } => {
                    if let SymbolReference::Solved(decl) = solver.try_to_solve_type(ty.as_str()) {
                        if decl.simple_name() == name {
                            return SymbolReference::Solved(decl);
                        }
                        if let SymbolReference::Solved(found) = decl.member_type(name, solver) {
                            return SymbolReference::Solved(found);
                        }
                    }
                }
                ScopeKind::Unit { .. } => {
                    return ImportResolver::new(&self.resolver.info, solver).resolve_simple(name);
                }
                _ => {}
            }
        }
        SymbolReference::Unsolved
    }

    /// Resolves a written type. `def` is `Object`; a name that does not resolve leaves the
    /// whole type unsolved, while unresolvable type arguments leave it raw.
    pub fn solve_type_ref(&self, ty: &TypeRef) -> SymbolReference<ResolvedType> {
        let element = if ty.is_def() {
            ResolvedType::object(self.solver()).into()
        } else if let Some(builtin) = builtin(&ty.name) {
            SymbolReference::Solved(builtin)
        } else {
            self.solve_type(&ty.name.to_dotted()).map(|declaration| {
                let args: Option<Vec<ResolvedType>> = ty
                    .type_args
                    .iter()
                    .map(|arg| self.solve_type_ref(arg).ok())
                    .collect();
                ResolvedType::Reference(ReferenceType {
                    declaration,
                    type_arguments: args.unwrap_or_default(),
                })
            })
        };
        element.map(|mut ty_out| {
            for _ in 0..ty.array_dims {
                ty_out = ResolvedType::Array(Box::new(ty_out));
            }
            ty_out
        })
    }

    /// Finds the declaration a value name refers to: locals and parameters, then fields of the
    /// enclosing classes (inherited ones included), then static imports.
    pub fn solve_symbol(&self, name: &str) -> SymbolReference<ValueDecl> {
        let solver = self.solver();
        let key = Name::new(name);
        for ctx in self.chain() {
            let data = ctx.data();
            let visible = data
                .values()
                .get(&key)
                .filter(|resolution| resolution.is_visible_at(self.position));
            if let Some(resolution) = visible {
                return SymbolReference::Solved(value_decl(&key, resolution, ctx.scope));
            }
            match data.kind() {
                ScopeKind::Class { ty } => {
                    let field = solver
                        .try_to_solve_type(ty.as_str())
                        .and_then(|decl| decl.field(name, solver));
                    if let SymbolReference::Solved(field) = field {
                        return SymbolReference::Solved(ValueDecl::Field(field));
                    }
                }
                ScopeKind::Unit { .. } => {
                    return self.static_import_field(name).map(ValueDecl::Field);
                }
                _ => {}
            }
        }
        SymbolReference::Unsolved
    }

    fn static_import_field(&self, name: &str) -> SymbolReference<FieldDecl> {
        let solver = self.solver();
        let imports = ImportResolver::new(&self.resolver.info, solver);
        let map = &self.resolver.info.imports;

        for import in map.static_single.iter().filter(|i| i.imported.as_str() == name) {
            let field = imports
                .resolve(&import.ty)
                .and_then(|decl| decl.field(import.member.as_str(), solver));
            if let SymbolReference::Solved(field) = field {
                if field.is_static() {
                    return SymbolReference::Solved(field);
                }
            }
        }
        for import in &map.static_star {
            let field = imports
                .resolve(&import.ty)
                .and_then(|decl| decl.field(name, solver));
            if let SymbolReference::Solved(field) = field {
                if field.is_static() {
                    return SymbolReference::Solved(field);
                }
            }
        }
        SymbolReference::Unsolved
    }

    /// Finds the method an unqualified call `name(args)` binds to: methods of the enclosing
    /// classes (inherited ones included), `groovy.lang.Script` in scripts, then static imports.
    pub fn solve_method(&self, name: &str, args: &[ResolvedType]) -> SymbolReference<MethodDecl> {
        let solver = self.solver();
        for ctx in self.chain() {
            let owner = match ctx.kind() {
                ScopeKind::Class { ty } => ty.as_str(),
                ScopeKind::Script => well_known::SCRIPT,
                ScopeKind::Unit { .. } => return self.static_import_method(name, args),
                _ => continue,
            };
            if let SymbolReference::Solved(decl) = solver.try_to_solve_type(owner) {
                let candidates = decl.methods_named(name, solver);
                if let SymbolReference::Solved(method) = select_method(&candidates, args, solver) {
                    return SymbolReference::Solved(method);
                }
            }
        }
        SymbolReference::Unsolved
    }

    fn static_import_method(&self, name: &str, args: &[ResolvedType]) -> SymbolReference<MethodDecl> {
        let solver = self.solver();
        let imports = ImportResolver::new(&self.resolver.info, solver);
        let map = &self.resolver.info.imports;

        let single = map
            .static_single
            .iter()
            .filter(|i| i.imported.as_str() == name)
            .map(|i| (&i.ty, i.member.as_str()));
        let star = map.static_star.iter().map(|i| (&i.ty, name));
        for (ty, member) in single.chain(star) {
            let SymbolReference::Solved(decl) = imports.resolve(ty) else {
                continue;
            };
            let candidates: Vec<MethodDecl> = decl
                .methods_named(member, solver)
                .into_iter()
                .filter(MethodDecl::is_static)
                .collect();
            if let SymbolReference::Solved(method) = select_method(&candidates, args, solver) {
                return SymbolReference::Solved(method);
            }
        }
        SymbolReference::Unsolved
    }

    /// The declared type of a value, resolved where the value was declared.
    pub fn declared_type(&self, value: &ValueDecl) -> DeclaredType {
        match value {
            ValueDecl::Local { ty, scope, .. } => {
                self.resolver.context(*scope).declared_type_ref(ty.as_ref(), false)
            }
            ValueDecl::Parameter {
                ty,
                scope,
                is_varargs,
                ..
            } => self
                .resolver
                .context(*scope)
                .declared_type_ref(ty.as_ref(), *is_varargs),
            ValueDecl::Field(field) => {
                if field.is_dynamic() {
                    return DeclaredType::Dynamic;
                }
                match field.ty(self.solver()) {
                    SymbolReference::Solved(ty) => DeclaredType::Resolved(ty),
                    SymbolReference::Unsolved => DeclaredType::Unresolved(field.signature()),
                }
            }
        }
    }

    fn declared_type_ref(&self, ty: Option<&TypeRef>, is_varargs: bool) -> DeclaredType {
        let Some(ty) = ty.filter(|ty| !ty.is_def()) else {
            return DeclaredType::Dynamic;
        };
        match self.solve_type_ref(ty) {
            SymbolReference::Solved(resolved) if is_varargs => {
                DeclaredType::Resolved(ResolvedType::Array(Box::new(resolved)))
            }
            SymbolReference::Solved(resolved) => DeclaredType::Resolved(resolved),
            SymbolReference::Unsolved => DeclaredType::Unresolved(ty.to_string()),
        }
    }
}

fn value_decl(name: &Name, resolution: &Resolution, scope: ScopeId) -> ValueDecl {
    match resolution {
        Resolution::Local { local, ty, .. } => ValueDecl::Local {
            name: name.clone(),
            local: local.clone(),
            ty: ty.clone(),
            scope,
        },
        Resolution::Parameter {
            param,
            ty,
            is_varargs,
        } => ValueDecl::Parameter {
            name: name.clone(),
            param: param.clone(),
            ty: ty.clone(),
            is_varargs: *is_varargs,
            scope,
        },
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
