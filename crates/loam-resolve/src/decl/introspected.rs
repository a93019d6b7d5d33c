use std::sync::{Arc, OnceLock};

use loam_classfile::{
    ClassStub, FieldStub, FieldType, MethodStub, ReturnType, TypeArgument, TypeParameter,
    TypeSignature,
};
use loam_core::{flags, AccessLevel, Name, PackageName, SymbolReference, TypeName};
use loam_types::PrimitiveKind;

use super::{erased_simple_name, ConstructorDecl, FieldDecl, Members, MethodDecl, ParameterDecl, TypeDecl, TypeKind};
use crate::solver::TypeSolver;
use crate::ty::{ReferenceType, ResolvedType, WildcardBound};

/// Type variable bounds are followed this many levels deep; `T extends Comparable<T>` would
/// otherwise never terminate.
const BOUND_DEPTH: u8 = 1;

pub(crate) struct ClassCtx {
    name: TypeName,
    type_params: Vec<TypeParameter>,
}

/// A type read from a compiled class file.
pub struct IntrospectedType {
    stub: Arc<ClassStub>,
    ctx: Arc<ClassCtx>,
    members: OnceLock<Members>,
}

impl IntrospectedType {
    pub fn new(stub: ClassStub) -> Self {
        let ctx = Arc::new(ClassCtx {
            name: TypeName::new(stub.source_name()),
            type_params: stub
                .signature
                .as_ref()
                .map(|sig| sig.type_parameters.clone())
                .unwrap_or_default(),
        });
        Self {
            stub: Arc::new(stub),
            ctx,
            members: OnceLock::new(),
        }
    }

    pub fn stub(&self) -> &ClassStub {
        &self.stub
    }

    pub fn internal_name(&self) -> &str {
        &self.stub.internal_name
    }

    pub(crate) fn qualified_name(&self) -> &TypeName {
        &self.ctx.name
    }

    pub(crate) fn package(&self) -> PackageName {
        match self.stub.internal_name.rsplit_once('/') {
            Some((package, _)) => PackageName::new(package.replace('/', ".")),
            None => PackageName::default_package(),
        }
    }

    pub(crate) fn kind(&self) -> TypeKind {
        let access = self.stub.access_flags;
        if access & flags::ACC_ANNOTATION != 0 {
            TypeKind::Annotation
        } else if access & flags::ACC_INTERFACE != 0 {
            TypeKind::Interface
        } else if access & flags::ACC_ENUM != 0 {
            TypeKind::Enum
        } else {
            TypeKind::Class
        }
    }

    pub(crate) fn access(&self) -> AccessLevel {
        AccessLevel::from_access_flags(self.stub.effective_access_flags())
    }

    pub(crate) fn type_parameters(&self) -> Vec<String> {
        self.ctx.type_params.iter().map(|p| p.name.clone()).collect()
    }

    pub(crate) fn member_types(&self) -> Vec<(Name, TypeName)> {
        self.stub
            .member_types()
            .map(|member| {
                let qualified = self.ctx.name.nested(&member.simple_name);
                (Name::new(member.simple_name), qualified)
            })
            .collect()
    }

    pub(crate) fn direct_ancestors(&self, solver: &dyn TypeSolver) -> Vec<ReferenceType> {
        let generics = Generics::class(&self.ctx.type_params);
        let mut out = Vec::new();

        let mut push = |resolved: SymbolReference<ResolvedType>, written: &str| match resolved {
            SymbolReference::Solved(ResolvedType::Reference(reference)) => out.push(reference),
            _ => tracing::debug!(
                target: "loam.resolve",
                ty = %self.ctx.name,
                ancestor = written,
                "skipping unresolved supertype"
            ),
        };

        match &self.stub.signature {
            Some(sig) => {
                if self.stub.super_class.is_some() {
                    let super_class = TypeSignature::Class(sig.super_class.clone());
                    push(
                        convert_signature(&super_class, &generics, solver, 0),
                        &sig.super_class.internal_name(),
                    );
                }
                for interface in &sig.interfaces {
                    let written = interface.internal_name();
                    let interface = TypeSignature::Class(interface.clone());
                    push(convert_signature(&interface, &generics, solver, 0), &written);
                }
            }
            None => {
                for internal in self.stub.super_class.iter().chain(&self.stub.interfaces) {
                    push(
                        solve_internal(internal, solver).map(ResolvedType::reference),
                        internal,
                    );
                }
            }
        }
        out
    }

    pub(crate) fn members(&self) -> &Members {
        self.members.get_or_init(|| self.build_members())
    }

    fn build_members(&self) -> Members {
        let mut members = Members::default();

        for field in &self.stub.fields {
            if field.access_flags & flags::ACC_SYNTHETIC != 0 || field.name.contains('$') {
                continue;
            }
            members.fields.push(FieldDecl::Introspected(IntrospectedField {
                class: self.ctx.clone(),
                stub: Arc::new(field.clone()),
            }));
        }

        for method in &self.stub.methods {
            if method.access_flags & (flags::ACC_SYNTHETIC | flags::ACC_BRIDGE) != 0 {
                continue;
            }
            let wrapped = IntrospectedMethod {
                class: self.ctx.clone(),
                stub: Arc::new(method.clone()),
            };
            match method.name.as_str() {
                "<clinit>" => {}
                "<init>" => members
                    .constructors
                    .push(ConstructorDecl::Introspected(wrapped)),
                name if name.contains('$') => {}
                _ => members.methods.push(MethodDecl::Introspected(wrapped)),
            }
        }

        members
    }
}

#[derive(Clone)]
pub struct IntrospectedField {
    class: Arc<ClassCtx>,
    stub: Arc<FieldStub>,
}

impl IntrospectedField {
    pub(crate) fn name(&self) -> &str {
        &self.stub.name
    }

    pub(crate) fn declaring_type(&self) -> &TypeName {
        &self.class.name
    }

    pub(crate) fn access(&self) -> AccessLevel {
        AccessLevel::from_access_flags(self.stub.access_flags)
    }

    pub(crate) fn is_static(&self) -> bool {
        self.stub.access_flags & flags::ACC_STATIC != 0
    }

    pub(crate) fn is_final(&self) -> bool {
        self.stub.access_flags & flags::ACC_FINAL != 0
    }

    pub(crate) fn ty(&self, solver: &dyn TypeSolver) -> SymbolReference<ResolvedType> {
        match &self.stub.signature {
            Some(sig) => {
                convert_signature(sig, &Generics::class(&self.class.type_params), solver, 0)
            }
            None => convert_descriptor(&self.stub.descriptor, solver),
        }
    }

    pub(crate) fn erased_type(&self) -> String {
        erased_simple_name(&self.stub.descriptor.binary_name())
    }
}

/// A method or constructor read from a class file.
#[derive(Clone)]
pub struct IntrospectedMethod {
    class: Arc<ClassCtx>,
    stub: Arc<MethodStub>,
}

impl IntrospectedMethod {
    pub(crate) fn name(&self) -> &str {
        &self.stub.name
    }

    pub(crate) fn declaring_type(&self) -> &TypeName {
        &self.class.name
    }

    pub(crate) fn access(&self) -> AccessLevel {
        AccessLevel::from_access_flags(self.stub.access_flags)
    }

    pub(crate) fn is_static(&self) -> bool {
        self.stub.access_flags & flags::ACC_STATIC != 0
    }

    pub(crate) fn is_abstract(&self) -> bool {
        self.stub.access_flags & flags::ACC_ABSTRACT != 0
    }

    pub(crate) fn is_varargs(&self) -> bool {
        self.stub.access_flags & flags::ACC_VARARGS != 0
    }

    pub(crate) fn arity(&self) -> usize {
        self.stub.descriptor.params.len()
    }

    pub(crate) fn type_parameters(&self) -> Vec<String> {
        self.method_type_params()
            .iter()
            .map(|p| p.name.clone())
            .collect()
    }

    fn method_type_params(&self) -> &[TypeParameter] {
        self.stub
            .signature
            .as_ref()
            .map(|sig| sig.type_parameters.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn parameters(&self) -> Vec<ParameterDecl> {
        (0..self.arity())
            .map(|index| {
                ParameterDecl::Introspected(IntrospectedParameter {
                    method: self.clone(),
                    index,
                })
            })
            .collect()
    }

    pub(crate) fn return_type(&self, solver: &dyn TypeSolver) -> SymbolReference<ResolvedType> {
        if let Some(sig) = &self.stub.signature {
            let generics = Generics {
                class: &self.class.type_params,
                method: &sig.type_parameters,
            };
            return match &sig.return_type {
                Some(ty) => convert_signature(ty, &generics, solver, 0),
                None => SymbolReference::Solved(ResolvedType::Void),
            };
        }
        match &self.stub.descriptor.return_type {
            ReturnType::Void => SymbolReference::Solved(ResolvedType::Void),
            ReturnType::Type(ty) => convert_descriptor(ty, solver),
        }
    }
}

#[derive(Clone)]
pub struct IntrospectedParameter {
    method: IntrospectedMethod,
    index: usize,
}

impl IntrospectedParameter {
    pub(crate) fn name(&self) -> String {
        format!("arg{}", self.index)
    }

    pub(crate) fn is_varargs(&self) -> bool {
        self.method.is_varargs() && self.index + 1 == self.method.arity()
    }

    pub(crate) fn ty(&self, solver: &dyn TypeSolver) -> SymbolReference<ResolvedType> {
        let stub = &self.method.stub;
        // Signatures of inner-class constructors omit the synthetic outer parameter, so only
        // trust them when they line up with the descriptor.
        if let Some(sig) = stub
            .signature
            .as_ref()
            .filter(|sig| sig.parameters.len() == stub.descriptor.params.len())
        {
            let generics = Generics {
                class: &self.method.class.type_params,
                method: &sig.type_parameters,
            };
            return convert_signature(&sig.parameters[self.index], &generics, solver, 0);
        }
        match stub.descriptor.params.get(self.index) {
            Some(ty) => convert_descriptor(ty, solver),
            None => SymbolReference::Unsolved,
        }
    }

    pub(crate) fn erased_type(&self) -> String {
        self.method
            .stub
            .descriptor
            .params
            .get(self.index)
            .map(|ty| erased_simple_name(&ty.binary_name()))
            .unwrap_or_default()
    }
}

struct Generics<'a> {
    class: &'a [TypeParameter],
    method: &'a [TypeParameter],
}

impl<'a> Generics<'a> {
    fn class(class: &'a [TypeParameter]) -> Self {
        Self { class, method: &[] }
    }

    fn find(&self, name: &str) -> Option<&'a TypeParameter> {
        self.method
            .iter()
            .chain(self.class)
            .find(|param| param.name == name)
    }
}

fn convert_signature(
    sig: &TypeSignature,
    generics: &Generics<'_>,
    solver: &dyn TypeSolver,
    depth: u8,
) -> SymbolReference<ResolvedType> {
    match sig {
        TypeSignature::Base(base) => PrimitiveKind::from_keyword(base.keyword())
            .map(ResolvedType::Primitive)
            .into(),
        TypeSignature::Array(component) => convert_signature(component, generics, solver, depth)
            .map(|component| ResolvedType::Array(Box::new(component))),
        TypeSignature::Class(class) => {
            solve_internal(&class.internal_name(), solver).map(|declaration| {
                let args: Option<Vec<ResolvedType>> = class
                    .type_arguments()
                    .iter()
                    .map(|arg| convert_argument(arg, generics, solver, depth).ok())
                    .collect();
                ResolvedType::Reference(ReferenceType {
                    declaration,
                    // One unresolvable argument makes the whole reference raw.
                    type_arguments: args.unwrap_or_default(),
                })
            })
        }
        TypeSignature::TypeVariable(name) => {
            let bounds = match generics.find(name) {
                Some(param) if depth < BOUND_DEPTH => param
                    .bounds()
                    .filter_map(|bound| convert_signature(bound, generics, solver, depth + 1).ok())
                    .collect(),
                _ => Vec::new(),
            };
            SymbolReference::Solved(ResolvedType::TypeVariable {
                name: name.clone(),
                bounds,
            })
        }
    }
}

fn convert_argument(
    arg: &TypeArgument,
    generics: &Generics<'_>,
    solver: &dyn TypeSolver,
    depth: u8,
) -> SymbolReference<ResolvedType> {
    match arg {
        TypeArgument::Any => SymbolReference::Solved(ResolvedType::Wildcard(WildcardBound::Unbounded)),
        TypeArgument::Exact(sig) => convert_signature(sig, generics, solver, depth),
        TypeArgument::Extends(sig) => convert_signature(sig, generics, solver, depth)
            .map(|bound| ResolvedType::Wildcard(WildcardBound::Extends(Box::new(bound)))),
        TypeArgument::Super(sig) => convert_signature(sig, generics, solver, depth)
            .map(|bound| ResolvedType::Wildcard(WildcardBound::Super(Box::new(bound)))),
    }
}

fn convert_descriptor(ty: &FieldType, solver: &dyn TypeSolver) -> SymbolReference<ResolvedType> {
    match ty {
        FieldType::Base(base) => PrimitiveKind::from_keyword(base.keyword())
            .map(ResolvedType::Primitive)
            .into(),
        FieldType::Object(internal) => solve_internal(internal, solver).map(ResolvedType::reference),
        FieldType::Array(component) => convert_descriptor(component, solver)
            .map(|component| ResolvedType::Array(Box::new(component))),
    }
}

/// Internal names use `$` for nesting, but `$` is also legal inside a simple name. Try the
/// canonical reading first, then the literal one.
fn solve_internal(internal: &str, solver: &dyn TypeSolver) -> SymbolReference<Arc<TypeDecl>> {
    let binary = internal.replace('/', ".");
    let canonical = binary.replace('$', ".");
    solver.try_to_solve_type(&canonical).or_else(|| {
        if canonical == binary {
            SymbolReference::Unsolved
        } else {
            solver.try_to_solve_type(&binary)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::MemoryTypeSolver;
    use loam_test_utils::ClassFileBuilder;
    use pretty_assertions::assert_eq;

    fn introspect(bytes: &[u8]) -> IntrospectedType {
        IntrospectedType::new(ClassStub::parse(bytes).expect("stub"))
    }

    #[test]
    fn synthetic_and_initializer_members_are_hidden() {
        let bytes = ClassFileBuilder::class("com/acme/Widget")
            .field(0x0001, "size", "I", None)
            .field(0x1000, "this$0", "Lcom/acme/Outer;", None)
            .method(0x0001, "<init>", "()V", None)
            .method(0x0008, "<clinit>", "()V", None)
            .method(0x1041, "compareTo", "(Ljava/lang/Object;)I", None)
            .method(0x0001, "grow", "(I)V", None)
            .build();
        let ty = introspect(&bytes);

        let fields: Vec<_> = ty.members().fields.iter().map(FieldDecl::signature).collect();
        let methods: Vec<_> = ty.members().methods.iter().map(MethodDecl::signature).collect();
        assert_eq!(fields, vec!["size:int".to_string()]);
        assert_eq!(methods, vec!["grow(int)".to_string()]);
        assert_eq!(ty.members().constructors.len(), 1);
    }

    #[test]
    fn generic_return_types_keep_their_arguments() {
        let object = introspect(&ClassFileBuilder::class("java/lang/Object").super_class(None).build());
        let string = introspect(&ClassFileBuilder::class("java/lang/String").build());
        let list = introspect(
            &ClassFileBuilder::interface("java/util/List")
                .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;")
                .method(0x0401, "get", "(I)Ljava/lang/Object;", Some("(I)TE;"))
                .build(),
        );
        let holder = introspect(
            &ClassFileBuilder::class("com/acme/Holder")
                .method(
                    0x0001,
                    "names",
                    "()Ljava/util/List;",
                    Some("()Ljava/util/List<Ljava/lang/String;>;"),
                )
                .build(),
        );
        let solver = MemoryTypeSolver::new()
            .with(TypeDecl::from(object))
            .with(TypeDecl::from(string))
            .with(TypeDecl::from(list));

        let names = &holder.members().methods[0];
        let ty = names.return_type(&solver).ok().expect("resolved");
        assert_eq!(ty.to_string(), "java.util.List<java.lang.String>");

        let list = solver.try_to_solve_type("java.util.List").ok().expect("list");
        let get = &list.methods()[0];
        match get.return_type(&solver).ok().expect("resolved") {
            ResolvedType::TypeVariable { name, bounds } => {
                assert_eq!(name, "E");
                assert_eq!(bounds.len(), 1);
            }
            other => panic!("expected a type variable, got {other}"),
        }
    }

    #[test]
    fn nested_class_names_use_dots() {
        let bytes = ClassFileBuilder::class("com/acme/Outer$Inner")
            .inner_class("com/acme/Outer$Inner", Some("com/acme/Outer"), Some("Inner"), 0x0009)
            .build();
        let ty = introspect(&bytes);
        assert_eq!(ty.qualified_name().as_str(), "com.acme.Outer.Inner");
        assert_eq!(ty.package().as_str(), "com.acme");
        assert_eq!(ty.access(), AccessLevel::Public);
    }
}
