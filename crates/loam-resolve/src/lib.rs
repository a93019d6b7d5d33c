//! Symbol resolution for Groovy.
//!
//! Types are found through a chain of [`TypeSolver`]s (sources, class directories, archives,
//! the platform) and come back as [`TypeDecl`]s that may be backed by a class file or by a
//! parsed source. Names inside a file resolve through a [`Context`] chain built from the file's
//! scope graph.

pub mod decl;
pub mod methods;

mod context;
mod import_map;
mod scopes;
mod solver;
mod source_solver;
mod ty;

pub use context::{Context, DeclaredType, Resolver, ValueDecl};
pub use decl::{
    accessor_suffix, ConstructorDecl, FieldDecl, MethodDecl, ParameterDecl, TypeDecl, TypeKind,
};
pub use import_map::{
    ImportMap, ImportResolver, StaticSingleImport, StaticStarImport, TypeSingleImport,
    TypeStarImport, UnitInfo, DEFAULT_CLASSES, DEFAULT_PACKAGES,
};
pub use methods::{select_constructor, select_method};
pub use scopes::{
    build_scopes, BodyOwner, LocalRef, ParamRef, Position, Resolution, ScopeBuildResult,
    ScopeData, ScopeGraph, ScopeId, ScopeKind,
};
pub use solver::{CombinedTypeSolver, MemoryTypeSolver, SolverError, TypeSolver};
pub use source_solver::SourceTypeSolver;
pub use ty::{ReferenceType, ResolvedType, WildcardBound};
