use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use loam_core::{SymbolReference, UnsolvedSymbolError};
use thiserror::Error;

use crate::decl::TypeDecl;

/// Failures a type solver hits while looking something up. They never escape
/// [`TypeSolver::try_to_solve_type`]: a failed lookup is a miss for the caller.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read archive `{path}`: {message}")]
    Archive { path: PathBuf, message: String },
    #[error("malformed class file for `{name}`: {source}")]
    ClassFormat {
        name: String,
        #[source]
        source: loam_classfile::Error,
    },
    #[error("failed to parse `{path}`: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Finds type declarations by fully-qualified canonical name (`java.util.Map.Entry`).
pub trait TypeSolver: Send + Sync {
    /// Looks `name` up. `Ok(Unsolved)` is an ordinary miss; `Err` means this solver broke
    /// while trying.
    fn lookup(&self, name: &str) -> Result<SymbolReference<Arc<TypeDecl>>, SolverError>;

    /// Short human-readable description used in diagnostics.
    fn describe(&self) -> String;

    fn try_to_solve_type(&self, name: &str) -> SymbolReference<Arc<TypeDecl>> {
        match self.lookup(name) {
            Ok(found) => found,
            Err(err) => {
                tracing::debug!(
                    target: "loam.resolve",
                    solver = %self.describe(),
                    name,
                    error = %err,
                    "type lookup failed; treating as unsolved"
                );
                SymbolReference::Unsolved
            }
        }
    }

    fn solve_type(&self, name: &str) -> Result<Arc<TypeDecl>, UnsolvedSymbolError> {
        self.try_to_solve_type(name)
            .solved_or_err(name, self.describe())
    }
}

impl<T: TypeSolver + ?Sized> TypeSolver for Arc<T> {
    fn lookup(&self, name: &str) -> Result<SymbolReference<Arc<TypeDecl>>, SolverError> {
        (**self).lookup(name)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn try_to_solve_type(&self, name: &str) -> SymbolReference<Arc<TypeDecl>> {
        (**self).try_to_solve_type(name)
    }
}

/// Asks its children in order and remembers every answer, misses included.
///
/// The first child that solves a name wins. Children are queried without holding any cache
/// lock, so a child may itself consult this solver.
pub struct CombinedTypeSolver {
    children: Vec<Arc<dyn TypeSolver>>,
    cache: DashMap<String, SymbolReference<Arc<TypeDecl>>>,
}

impl CombinedTypeSolver {
    pub fn new(children: impl IntoIterator<Item = Arc<dyn TypeSolver>>) -> Self {
        Self {
            children: children.into_iter().collect(),
            cache: DashMap::new(),
        }
    }

    pub fn add(&mut self, child: Arc<dyn TypeSolver>) {
        self.children.push(child);
        self.cache.clear();
    }

    pub fn children(&self) -> &[Arc<dyn TypeSolver>] {
        &self.children
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

impl TypeSolver for CombinedTypeSolver {
    fn lookup(&self, name: &str) -> Result<SymbolReference<Arc<TypeDecl>>, SolverError> {
        if let Some(hit) = self.cache.get(name).map(|entry| entry.value().clone()) {
            return Ok(hit);
        }

        let found = self
            .children
            .iter()
            .map(|child| child.try_to_solve_type(name))
            .find(SymbolReference::is_solved)
            .unwrap_or(SymbolReference::Unsolved);

        if !found.is_solved() {
            tracing::trace!(target: "loam.resolve", name, "no solver knows this type");
        }
        self.cache.insert(name.to_string(), found.clone());
        Ok(found)
    }

    fn describe(&self) -> String {
        let children: Vec<String> = self.children.iter().map(|c| c.describe()).collect();
        format!("combined[{}]", children.join(", "))
    }
}

/// A fixed set of declarations, keyed by qualified name.
#[derive(Default)]
pub struct MemoryTypeSolver {
    types: HashMap<String, Arc<TypeDecl>>,
}

impl MemoryTypeSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, decl: impl Into<Arc<TypeDecl>>) {
        let decl = decl.into();
        self.types
            .insert(decl.qualified_name().as_str().to_string(), decl);
    }

    #[must_use]
    pub fn with(mut self, decl: impl Into<Arc<TypeDecl>>) -> Self {
        self.add(decl);
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeSolver for MemoryTypeSolver {
    fn lookup(&self, name: &str) -> Result<SymbolReference<Arc<TypeDecl>>, SolverError> {
        Ok(self.types.get(name).cloned().into())
    }

    fn describe(&self) -> String {
        format!("memory({} types)", self.types.len())
    }
}
