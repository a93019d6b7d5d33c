use std::collections::HashMap;
use std::sync::Arc;

use loam_core::{SymbolReference, TypeName};
use loam_hir::{ClassDecl, CompilationUnit};

use crate::decl::{SourceType, TypeDecl};
use crate::import_map::UnitInfo;
use crate::solver::{SolverError, TypeSolver};

/// Serves the types declared in a set of parsed compilation units, nested ones included
/// (`com.acme.Outer.Inner`).
pub struct SourceTypeSolver {
    label: String,
    types: HashMap<String, Arc<TypeDecl>>,
}

impl SourceTypeSolver {
    pub fn new(units: impl IntoIterator<Item = Arc<CompilationUnit>>) -> Self {
        Self::with_label("sources", units)
    }

    pub fn with_label(
        label: impl Into<String>,
        units: impl IntoIterator<Item = Arc<CompilationUnit>>,
    ) -> Self {
        let mut types = HashMap::new();
        for unit in units {
            let info = Arc::new(UnitInfo::new(&unit));
            for class in &unit.types {
                let name = info.package.qualify(class.name.as_str());
                index_class(&mut types, class, name, &info, Vec::new());
            }
        }
        Self {
            label: label.into(),
            types,
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

fn index_class(
    types: &mut HashMap<String, Arc<TypeDecl>>,
    class: &ClassDecl,
    name: TypeName,
    unit: &Arc<UnitInfo>,
    enclosing: Vec<TypeName>,
) {
    let mut inner_enclosing = Vec::with_capacity(enclosing.len() + 1);
    inner_enclosing.push(name.clone());
    inner_enclosing.extend(enclosing.iter().cloned());
    for nested in &class.nested_types {
        let nested_name = name.nested(nested.name.as_str());
        index_class(types, nested, nested_name, unit, inner_enclosing.clone());
    }

    let key = name.as_str().to_string();
    if types.contains_key(&key) {
        tracing::warn!(target: "loam.resolve", ty = %name, "duplicate source type; keeping the first");
        return;
    }
    let decl = SourceType::new(class.clone(), name, unit.clone(), enclosing);
    types.insert(key, Arc::new(TypeDecl::Source(decl)));
}

impl TypeSolver for SourceTypeSolver {
    fn lookup(&self, name: &str) -> Result<SymbolReference<Arc<TypeDecl>>, SolverError> {
        Ok(self.types.get(name).cloned().into())
    }

    fn describe(&self) -> String {
        format!("{}({} types)", self.label, self.types.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loam_core::PackageName;

    #[test]
    fn nested_types_are_indexed_with_dots() {
        let mut outer = ClassDecl::new("Outer");
        outer.nested_types.push(ClassDecl::new("Inner"));
        let mut unit = CompilationUnit::new(Some(PackageName::new("com.acme")));
        unit.types.push(outer);

        let solver = SourceTypeSolver::new([Arc::new(unit)]);
        assert!(solver.try_to_solve_type("com.acme.Outer").is_solved());
        assert!(solver.try_to_solve_type("com.acme.Outer.Inner").is_solved());
        assert!(!solver.try_to_solve_type("com.acme.Outer$Inner").is_solved());
    }
}
