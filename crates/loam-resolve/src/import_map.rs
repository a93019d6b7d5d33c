use std::collections::HashMap;
use std::sync::Arc;

use loam_core::{Name, PackageName, QualifiedName, SymbolReference, TypeName};
use loam_hir::{CompilationUnit, ImportDecl};

use crate::decl::TypeDecl;
use crate::solver::TypeSolver;

/// Packages every Groovy compilation unit imports implicitly, in lookup order.
pub const DEFAULT_PACKAGES: &[&str] = &[
    "java.lang",
    "java.util",
    "java.io",
    "java.net",
    "groovy.lang",
    "groovy.util",
];

/// Classes Groovy imports implicitly on top of [`DEFAULT_PACKAGES`].
pub const DEFAULT_CLASSES: &[&str] = &["java.math.BigInteger", "java.math.BigDecimal"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportMap {
    pub type_single: Vec<TypeSingleImport>,
    pub type_star: Vec<TypeStarImport>,
    pub static_single: Vec<StaticSingleImport>,
    pub static_star: Vec<StaticStarImport>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSingleImport {
    pub path: QualifiedName,
    /// The alias if there is one, otherwise the last path segment.
    pub imported: Name,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeStarImport {
    pub path: QualifiedName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticSingleImport {
    pub ty: QualifiedName,
    pub member: Name,
    pub imported: Name,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticStarImport {
    pub ty: QualifiedName,
}

impl ImportMap {
    #[must_use]
    pub fn from_imports(imports: &[ImportDecl]) -> Self {
        let mut out = ImportMap::default();

        for import in imports {
            match import {
                ImportDecl::TypeSingle { ty, alias } => {
                    let Some(imported) = alias.clone().or_else(|| ty.last().cloned()) else {
                        continue;
                    };
                    out.type_single.push(TypeSingleImport {
                        path: ty.clone(),
                        imported,
                    });
                }
                ImportDecl::TypeStar { qualifier } => {
                    if qualifier.is_empty() {
                        continue;
                    }
                    out.type_star.push(TypeStarImport {
                        path: qualifier.clone(),
                    });
                }
                ImportDecl::StaticSingle { ty, member, alias } => {
                    out.static_single.push(StaticSingleImport {
                        ty: ty.clone(),
                        member: member.clone(),
                        imported: alias.clone().unwrap_or_else(|| member.clone()),
                    });
                }
                ImportDecl::StaticStar { ty } => {
                    out.static_star.push(StaticStarImport { ty: ty.clone() });
                }
            }
        }

        out
    }

    pub fn is_empty(&self) -> bool {
        self.type_single.is_empty()
            && self.type_star.is_empty()
            && self.static_single.is_empty()
            && self.static_star.is_empty()
    }
}

/// Per-file facts every declaration and scope of a compilation unit shares.
#[derive(Debug, Clone, Default)]
pub struct UnitInfo {
    pub package: PackageName,
    pub imports: ImportMap,
    /// Top-level types declared in the unit.
    pub declared: HashMap<Name, TypeName>,
}

impl UnitInfo {
    pub fn new(unit: &CompilationUnit) -> Self {
        let package = unit.package_name();
        let declared = unit
            .types
            .iter()
            .map(|class| (class.name.clone(), package.qualify(class.name.as_str())))
            .collect();
        Self {
            imports: ImportMap::from_imports(&unit.imports),
            package,
            declared,
        }
    }
}

/// Resolves type names against a unit's imports, its package and the implicit imports.
pub struct ImportResolver<'a> {
    unit: &'a UnitInfo,
    solver: &'a dyn TypeSolver,
}

impl<'a> ImportResolver<'a> {
    pub fn new(unit: &'a UnitInfo, solver: &'a dyn TypeSolver) -> Self {
        Self { unit, solver }
    }

    /// Resolves a simple name, in order: single-type imports, star imports, the unit's own
    /// package, the name as written, then the implicit imports.
    pub fn resolve_simple(&self, name: &str) -> SymbolReference<Arc<TypeDecl>> {
        if let Some(import) = self
            .unit
            .imports
            .type_single
            .iter()
            .find(|import| import.imported.as_str() == name)
        {
            if let SymbolReference::Solved(decl) = self.solve_qualified(&import.path) {
                return SymbolReference::Solved(decl);
            }
            tracing::debug!(
                target: "loam.resolve",
                import = %import.path,
                "single-type import does not resolve"
            );
        }

        for import in &self.unit.imports.type_star {
            let candidate = format!("{}.{name}", import.path);
            if let SymbolReference::Solved(decl) = self.solver.try_to_solve_type(&candidate) {
                return SymbolReference::Solved(decl);
            }
        }

        if let Some(declared) = self.unit.declared.get(&Name::new(name)) {
            if let SymbolReference::Solved(decl) = self.solver.try_to_solve_type(declared.as_str())
            {
                return SymbolReference::Solved(decl);
            }
        }
        if !self.unit.package.is_default() {
            let candidate = self.unit.package.qualify(name);
            if let SymbolReference::Solved(decl) = self.solver.try_to_solve_type(candidate.as_str())
            {
                return SymbolReference::Solved(decl);
            }
        }

        if let SymbolReference::Solved(decl) = self.solver.try_to_solve_type(name) {
            return SymbolReference::Solved(decl);
        }

        self.resolve_default_import(name)
    }

    fn resolve_default_import(&self, name: &str) -> SymbolReference<Arc<TypeDecl>> {
        for package in DEFAULT_PACKAGES {
            let candidate = format!("{package}.{name}");
            if let SymbolReference::Solved(decl) = self.solver.try_to_solve_type(&candidate) {
                return SymbolReference::Solved(decl);
            }
        }
        DEFAULT_CLASSES
            .iter()
            .find(|class| TypeName::new(**class).simple_name() == name)
            .map_or(SymbolReference::Unsolved, |class| {
                self.solver.try_to_solve_type(class)
            })
    }

    /// Resolves a dotted name: as a whole first, otherwise the longest prefix the solver knows
    /// followed by member types (`java.util.Map.Entry`).
    pub fn solve_qualified(&self, path: &QualifiedName) -> SymbolReference<Arc<TypeDecl>> {
        if let SymbolReference::Solved(decl) = self.solver.try_to_solve_type(&path.to_dotted()) {
            return SymbolReference::Solved(decl);
        }

        let segments = path.segments();
        for split in (1..segments.len()).rev() {
            let prefix = QualifiedName::from_segments(segments[..split].iter().cloned());
            if let SymbolReference::Solved(outer) = self.solver.try_to_solve_type(&prefix.to_dotted())
            {
                return walk_member_types(outer, &segments[split..], self.solver);
            }
        }
        SymbolReference::Unsolved
    }

    /// Resolves a name that may start with a simple type name: `Map.Entry` with `Map` imported.
    pub fn resolve(&self, path: &QualifiedName) -> SymbolReference<Arc<TypeDecl>> {
        match path.segments() {
            [] => SymbolReference::Unsolved,
            [single] => self.resolve_simple(single.as_str()),
            [first, rest @ ..] => self.solve_qualified(path).or_else(|| {
                self.resolve_simple(first.as_str())
                    .and_then(|outer| walk_member_types(outer, rest, self.solver))
            }),
        }
    }
}

pub(crate) fn walk_member_types(
    mut current: Arc<TypeDecl>,
    segments: &[Name],
    solver: &dyn TypeSolver,
) -> SymbolReference<Arc<TypeDecl>> {
    for segment in segments {
        match current.member_type(segment.as_str(), solver) {
            SymbolReference::Solved(next) => current = next,
            SymbolReference::Unsolved => return SymbolReference::Unsolved,
        }
    }
    SymbolReference::Solved(current)
}
