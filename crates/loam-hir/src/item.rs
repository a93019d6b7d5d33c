use loam_core::{AccessLevel, Name, PackageName, QualifiedName, TextRange};

use crate::body::Body;
use crate::type_ref::TypeRef;

#[derive(Debug, Clone, Default)]
pub struct CompilationUnit {
    pub package: Option<PackageName>,
    pub imports: Vec<ImportDecl>,
    pub types: Vec<ClassDecl>,
    /// Top-level statements of a script file.
    pub script: Option<Body>,
}

impl CompilationUnit {
    pub fn new(package: Option<PackageName>) -> Self {
        Self {
            package,
            imports: Vec::new(),
            types: Vec::new(),
            script: None,
        }
    }

    pub fn package_name(&self) -> PackageName {
        self.package.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportDecl {
    /// `import a.b.C` or `import a.b.C as D`
    TypeSingle {
        ty: QualifiedName,
        alias: Option<Name>,
    },
    /// `import a.b.*` (a package) or `import a.b.C.*` (member types of `C`)
    TypeStar { qualifier: QualifiedName },
    /// `import static a.b.C.m` or `import static a.b.C.m as n`
    StaticSingle {
        ty: QualifiedName,
        member: Name,
        alias: Option<Name>,
    },
    /// `import static a.b.C.*`
    StaticStar { ty: QualifiedName },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Trait,
}

/// Declared modifiers. `visibility: None` means "no visibility keyword", which Groovy treats
/// differently per member kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub visibility: Option<AccessLevel>,
    pub is_static: bool,
    pub is_final: bool,
    pub is_abstract: bool,
}

impl Modifiers {
    pub fn public() -> Self {
        Self {
            visibility: Some(AccessLevel::Public),
            ..Self::default()
        }
    }

    pub fn private() -> Self {
        Self {
            visibility: Some(AccessLevel::Private),
            ..Self::default()
        }
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_final(mut self) -> Self {
        self.is_final = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: Name,
    pub kind: ClassKind,
    pub modifiers: Modifiers,
    pub type_params: Vec<Name>,
    /// `extends` clause; interfaces may list several.
    pub extends: Vec<TypeRef>,
    pub implements: Vec<TypeRef>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    pub constructors: Vec<ConstructorDecl>,
    pub nested_types: Vec<ClassDecl>,
    pub range: TextRange,
}

impl ClassDecl {
    pub fn new(name: impl Into<Name>) -> Self {
        Self::with_kind(name, ClassKind::Class)
    }

    pub fn with_kind(name: impl Into<Name>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            modifiers: Modifiers::default(),
            type_params: Vec::new(),
            extends: Vec::new(),
            implements: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            nested_types: Vec::new(),
            range: TextRange::default(),
        }
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, ClassKind::Interface | ClassKind::Annotation)
    }
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: Name,
    /// `None` for `def`.
    pub ty: Option<TypeRef>,
    pub modifiers: Modifiers,
    pub range: TextRange,
}

impl FieldDecl {
    pub fn new(name: impl Into<Name>, ty: Option<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty,
            modifiers: Modifiers::default(),
            range: TextRange::default(),
        }
    }

    /// A field without a visibility keyword is a Groovy property.
    pub fn is_property(&self) -> bool {
        self.modifiers.visibility.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: Name,
    /// `None` for `def`.
    pub return_type: Option<TypeRef>,
    pub params: Vec<ParamDecl>,
    pub modifiers: Modifiers,
    pub type_params: Vec<Name>,
    pub body: Option<Body>,
    pub range: TextRange,
}

impl MethodDecl {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            return_type: None,
            params: Vec::new(),
            modifiers: Modifiers::default(),
            type_params: Vec::new(),
            body: None,
            range: TextRange::default(),
        }
    }

    pub fn returning(mut self, ty: TypeRef) -> Self {
        self.return_type = Some(ty);
        self
    }

    pub fn param(mut self, param: ParamDecl) -> Self {
        self.params.push(param);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConstructorDecl {
    pub params: Vec<ParamDecl>,
    pub modifiers: Modifiers,
    pub body: Option<Body>,
    pub range: TextRange,
}

#[derive(Debug, Clone)]
pub struct ParamDecl {
    pub name: Name,
    /// `None` for untyped parameters.
    pub ty: Option<TypeRef>,
    pub has_default: bool,
    pub is_varargs: bool,
    pub range: TextRange,
}

impl ParamDecl {
    pub fn new(name: impl Into<Name>, ty: Option<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty,
            has_default: false,
            is_varargs: false,
            range: TextRange::default(),
        }
    }
}
