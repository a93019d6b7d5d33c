use std::collections::HashMap;
use std::sync::Arc;

use loam_core::SymbolReference;
use loam_hir::TypeRef;
use loam_resolve::{accessor_suffix, Context, DeclaredType, ResolvedType, TypeDecl, TypeSolver};
use loam_types::{well_known, PrimitiveKind, SemanticType};

use crate::node::ExpressionNode;
use crate::registry::TypeCalculatorRegistry;

/// What calculators may ask about the world around an expression.
pub trait TypeContext {
    /// The type of a sub-expression.
    fn calculate_type(&self, node: &dyn ExpressionNode) -> SemanticType;

    /// Resolves type text as written at this position (`String`, `int`, `Map.Entry[]`).
    fn resolve_type(&self, name: &str) -> Option<SemanticType>;

    /// The type of a variable, parameter or field visible here.
    fn lookup_symbol(&self, name: &str) -> Option<SemanticType>;

    /// `None` when `receiver` has no method `name` accepting `args`.
    fn method_return_type(
        &self,
        receiver: &SemanticType,
        name: &str,
        args: &[SemanticType],
    ) -> Option<SemanticType>;

    fn field_type(&self, receiver: &SemanticType, name: &str) -> Option<SemanticType>;

    /// Whether the code is compiled with `@CompileStatic` semantics.
    fn is_static_compilation(&self) -> bool;
}

/// A [`TypeContext`] backed by the resolver: symbols, types and members come from the context
/// chain and the session's solvers.
pub struct ResolvingTypeContext<'a> {
    registry: &'a TypeCalculatorRegistry,
    context: Context<'a>,
    static_compilation: bool,
}

impl<'a> ResolvingTypeContext<'a> {
    pub fn new(registry: &'a TypeCalculatorRegistry, context: Context<'a>) -> Self {
        Self {
            registry,
            context,
            static_compilation: false,
        }
    }

    #[must_use]
    pub fn with_static_compilation(mut self, static_compilation: bool) -> Self {
        self.static_compilation = static_compilation;
        self
    }

    pub fn context(&self) -> Context<'a> {
        self.context
    }

    /// The type of `node` evaluated at this context's position.
    pub fn type_of(&self, node: &dyn ExpressionNode) -> SemanticType {
        self.registry.calculate(node, self)
    }

    fn solver(&self) -> &'a dyn TypeSolver {
        self.context.solver()
    }

    /// The declaration a receiver type dispatches to. Primitives dispatch to their wrapper.
    fn receiver_decl(&self, receiver: &SemanticType) -> Option<Arc<TypeDecl>> {
        let name = match receiver {
            SemanticType::Known(name) => name.as_str(),
            SemanticType::Primitive(kind) => kind.boxed_name(),
            _ => return None,
        };
        if name.ends_with("[]") {
            return self.solver().try_to_solve_type(well_known::OBJECT).ok();
        }
        self.solver().try_to_solve_type(name).ok()
    }

    fn argument_type(&self, arg: &SemanticType) -> ResolvedType {
        let object = || ResolvedType::object(self.solver()).unwrap_or(ResolvedType::Null);
        match arg {
            SemanticType::Primitive(kind) => ResolvedType::Primitive(*kind),
            SemanticType::Null => ResolvedType::Null,
            SemanticType::Known(name) => match TypeRef::parse(name.as_str()) {
                Some(ty) => self.context.solve_type_ref(&ty).ok().unwrap_or_else(object),
                None => object(),
            },
            SemanticType::Dynamic | SemanticType::Unknown(_) => object(),
        }
    }

    fn getter(&self, decl: &TypeDecl, property: &str) -> Option<SemanticType> {
        let solver = self.solver();
        let capitalized = accessor_suffix(property);
        let getter = format!("get{capitalized}");
        let is_getter = format!("is{capitalized}");

        let candidates = decl
            .methods_named(&getter, solver)
            .into_iter()
            .chain(decl.methods_named(&is_getter, solver))
            .filter(|method| method.arity() == 0);
        for method in candidates {
            if method.name() == is_getter
                && !matches!(
                    method.return_type(solver),
                    SymbolReference::Solved(ResolvedType::Primitive(PrimitiveKind::Boolean))
                )
            {
                continue;
            }
            if method.returns_dynamic() {
                return Some(SemanticType::Dynamic);
            }
            return Some(match method.return_type(solver) {
                SymbolReference::Solved(ty) => semantic_type(&ty),
                SymbolReference::Unsolved => SemanticType::unknown(format!(
                    "unresolved return type of {}",
                    method.signature()
                )),
            });
        }
        None
    }
}

impl TypeContext for ResolvingTypeContext<'_> {
    fn calculate_type(&self, node: &dyn ExpressionNode) -> SemanticType {
        self.registry.calculate(node, self)
    }

    fn resolve_type(&self, name: &str) -> Option<SemanticType> {
        let ty = TypeRef::parse(name)?;
        if ty.is_def() {
            return Some(SemanticType::Dynamic);
        }
        self.context
            .solve_type_ref(&ty)
            .ok()
            .map(|resolved| semantic_type(&resolved))
    }

    fn lookup_symbol(&self, name: &str) -> Option<SemanticType> {
        if name == "this" || name == "super" {
            let ty = self.context.enclosing_type().map(|decl| {
                if name == "super" {
                    decl.direct_ancestors(self.solver())
                        .into_iter()
                        .find(|ancestor| !ancestor.declaration.is_interface())
                        .map(|ancestor| SemanticType::Known(ancestor.qualified_name().clone()))
                        .unwrap_or_else(SemanticType::object)
                } else {
                    SemanticType::Known(decl.qualified_name().clone())
                }
            });
            return ty.or_else(|| {
                self.context
                    .is_script()
                    .then(|| SemanticType::known(well_known::SCRIPT))
            });
        }

        let value = self.context.solve_symbol(name).ok()?;
        Some(match self.context.declared_type(&value) {
            DeclaredType::Dynamic => SemanticType::Dynamic,
            DeclaredType::Resolved(ty) => semantic_type(&ty),
            DeclaredType::Unresolved(text) => {
                SemanticType::unknown(format!("unresolved declared type `{text}`"))
            }
        })
    }

    fn method_return_type(
        &self,
        receiver: &SemanticType,
        name: &str,
        args: &[SemanticType],
    ) -> Option<SemanticType> {
        let decl = self.receiver_decl(receiver)?;
        let solver = self.solver();
        let args: Vec<ResolvedType> = args.iter().map(|arg| self.argument_type(arg)).collect();
        let candidates = decl.methods_named(name, solver);
        let method = loam_resolve::select_method(&candidates, &args, solver).ok()?;
        if method.returns_dynamic() {
            return Some(SemanticType::Dynamic);
        }
        Some(match method.return_type(solver) {
            SymbolReference::Solved(ty) => semantic_type(&ty),
            SymbolReference::Unsolved => SemanticType::unknown(format!(
                "unresolved return type of {}",
                method.signature()
            )),
        })
    }

    fn field_type(&self, receiver: &SemanticType, name: &str) -> Option<SemanticType> {
        let decl = self.receiver_decl(receiver)?;
        let solver = self.solver();
        if receiver.as_known().is_some_and(|ty| ty.as_str().ends_with("[]")) && name == "length" {
            return Some(SemanticType::Primitive(PrimitiveKind::Int));
        }
        if let SymbolReference::Solved(field) = decl.field(name, solver) {
            if field.is_dynamic() {
                return Some(SemanticType::Dynamic);
            }
            return Some(match field.ty(solver) {
                SymbolReference::Solved(ty) => semantic_type(&ty),
                SymbolReference::Unsolved => {
                    SemanticType::unknown(format!("unresolved type of field {}", field.signature()))
                }
            });
        }
        if let Some(ty) = self.getter(&decl, name) {
            return Some(ty);
        }
        // `map.key` reads an entry.
        decl.is_subtype_of("java.util.Map", solver)
            .then_some(SemanticType::Dynamic)
    }

    fn is_static_compilation(&self) -> bool {
        self.static_compilation
    }
}

/// Converts a resolved type to the inference layer's view of it.
///
/// Type variables become their first bound (or `Object`); `void` becomes `null`, which is what a
/// call to a `void` method evaluates to in Groovy.
pub fn semantic_type(ty: &ResolvedType) -> SemanticType {
    match ty {
        ResolvedType::Primitive(kind) => SemanticType::Primitive(*kind),
        ResolvedType::Reference(reference) => SemanticType::Known(reference.qualified_name().clone()),
        ResolvedType::Array(_) => SemanticType::known(ty.erasure()),
        ResolvedType::TypeVariable { bounds, .. } => bounds
            .first()
            .map(semantic_type)
            .unwrap_or_else(SemanticType::object),
        ResolvedType::Wildcard(_) => SemanticType::object(),
        ResolvedType::Null | ResolvedType::Void => SemanticType::Null,
    }
}

/// A table-driven [`TypeContext`] for tests and hosts without a resolver.
///
/// Type names resolve through an explicit simple-name table plus primitive keywords; methods are
/// keyed by receiver type and name, ignoring arguments.
pub struct MapTypeContext<'a> {
    registry: &'a TypeCalculatorRegistry,
    symbols: HashMap<String, SemanticType>,
    types: HashMap<String, SemanticType>,
    methods: HashMap<(String, String), SemanticType>,
    fields: HashMap<(String, String), SemanticType>,
    static_compilation: bool,
}

impl<'a> MapTypeContext<'a> {
    pub fn new(registry: &'a TypeCalculatorRegistry) -> Self {
        Self {
            registry,
            symbols: HashMap::new(),
            types: HashMap::new(),
            methods: HashMap::new(),
            fields: HashMap::new(),
            static_compilation: false,
        }
    }

    #[must_use]
    pub fn symbol(mut self, name: &str, ty: SemanticType) -> Self {
        self.symbols.insert(name.to_string(), ty);
        self
    }

    /// Makes `qualified` resolvable by its simple name and by itself.
    #[must_use]
    pub fn known_type(mut self, qualified: &str) -> Self {
        let simple = qualified.rsplit('.').next().unwrap_or(qualified);
        self.types
            .insert(simple.to_string(), SemanticType::known(qualified));
        self.types
            .insert(qualified.to_string(), SemanticType::known(qualified));
        self
    }

    #[must_use]
    pub fn method(mut self, receiver: &str, name: &str, returns: SemanticType) -> Self {
        self.methods
            .insert((receiver.to_string(), name.to_string()), returns);
        self
    }

    #[must_use]
    pub fn field(mut self, receiver: &str, name: &str, ty: SemanticType) -> Self {
        self.fields
            .insert((receiver.to_string(), name.to_string()), ty);
        self
    }

    #[must_use]
    pub fn static_compilation(mut self, static_compilation: bool) -> Self {
        self.static_compilation = static_compilation;
        self
    }

    pub fn type_of(&self, node: &dyn ExpressionNode) -> SemanticType {
        self.registry.calculate(node, self)
    }

    fn receiver_key(receiver: &SemanticType) -> Option<String> {
        match receiver {
            SemanticType::Known(name) => Some(name.as_str().to_string()),
            SemanticType::Primitive(kind) => Some(kind.boxed_name().to_string()),
            _ => None,
        }
    }
}

impl TypeContext for MapTypeContext<'_> {
    fn calculate_type(&self, node: &dyn ExpressionNode) -> SemanticType {
        self.registry.calculate(node, self)
    }

    fn resolve_type(&self, name: &str) -> Option<SemanticType> {
        if name == "def" {
            return Some(SemanticType::Dynamic);
        }
        if let Some(kind) = PrimitiveKind::from_keyword(name) {
            return Some(SemanticType::Primitive(kind));
        }
        self.types.get(name).cloned()
    }

    fn lookup_symbol(&self, name: &str) -> Option<SemanticType> {
        self.symbols.get(name).cloned()
    }

    fn method_return_type(
        &self,
        receiver: &SemanticType,
        name: &str,
        _args: &[SemanticType],
    ) -> Option<SemanticType> {
        let receiver = Self::receiver_key(receiver)?;
        self.methods.get(&(receiver, name.to_string())).cloned()
    }

    fn field_type(&self, receiver: &SemanticType, name: &str) -> Option<SemanticType> {
        let receiver = Self::receiver_key(receiver)?;
        self.fields.get(&(receiver, name.to_string())).cloned()
    }

    fn is_static_compilation(&self) -> bool {
        self.static_compilation
    }
}
