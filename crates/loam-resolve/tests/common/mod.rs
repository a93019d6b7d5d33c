#![allow(dead_code)]

use std::sync::Arc;

use loam_classfile::ClassStub;
use loam_core::PackageName;
use loam_hir::{ClassDecl, CompilationUnit, ImportDecl};
use loam_resolve::decl::IntrospectedType;
use loam_resolve::{MemoryTypeSolver, TypeDecl, TypeSolver};
use loam_test_utils::mini_jdk;

pub fn introspect(bytes: &[u8]) -> TypeDecl {
    TypeDecl::from(IntrospectedType::new(
        ClassStub::parse(bytes).expect("fixture class parses"),
    ))
}

pub fn jdk() -> MemoryTypeSolver {
    let mut solver = MemoryTypeSolver::new();
    for (_, bytes) in mini_jdk() {
        solver.add(introspect(&bytes));
    }
    solver
}

pub fn jdk_solver() -> Arc<dyn TypeSolver> {
    Arc::new(jdk())
}

pub fn unit(package: &str, imports: Vec<ImportDecl>, types: Vec<ClassDecl>) -> Arc<CompilationUnit> {
    let package = (!package.is_empty()).then(|| PackageName::new(package));
    let mut unit = CompilationUnit::new(package);
    unit.imports = imports;
    unit.types = types;
    Arc::new(unit)
}
