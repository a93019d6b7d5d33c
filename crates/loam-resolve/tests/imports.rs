mod common;

use std::sync::Arc;

use loam_core::{Name, QualifiedName, TypeName};
use loam_hir::{ClassDecl, ImportDecl};
use loam_resolve::{CombinedTypeSolver, Resolver, SourceTypeSolver, TypeSolver};
use pretty_assertions::assert_eq;

fn library() -> Arc<dyn TypeSolver> {
    let stuff = common::unit("com.acme.stuff", Vec::new(), vec![ClassDecl::new("List")]);
    let wild = common::unit(
        "com.wild",
        Vec::new(),
        vec![ClassDecl::new("List"), ClassDecl::new("Helper")],
    );
    let local = common::unit("com.acme", Vec::new(), vec![ClassDecl::new("Map")]);
    let sources: Arc<dyn TypeSolver> =
        Arc::new(SourceTypeSolver::with_label("library", [stuff, wild, local]));
    Arc::new(CombinedTypeSolver::new([sources, common::jdk_solver()]))
}

fn resolver(imports: Vec<ImportDecl>, types: Vec<ClassDecl>) -> Resolver {
    Resolver::new(common::unit("com.acme", imports, types), library())
}

fn single(path: &str, alias: Option<&str>) -> ImportDecl {
    ImportDecl::TypeSingle {
        ty: QualifiedName::from_dotted(path),
        alias: alias.map(Name::new),
    }
}

fn star(path: &str) -> ImportDecl {
    ImportDecl::TypeStar {
        qualifier: QualifiedName::from_dotted(path),
    }
}

fn solved_name(resolver: &Resolver, name: &str) -> Option<String> {
    resolver
        .unit_context()
        .solve_type(name)
        .ok()
        .map(|decl| decl.qualified_name().to_string())
}

#[test]
fn single_imports_beat_star_imports_beat_defaults() {
    let with_single = resolver(
        vec![star("com.wild"), single("com.acme.stuff.List", None)],
        Vec::new(),
    );
    assert_eq!(
        solved_name(&with_single, "List").as_deref(),
        Some("com.acme.stuff.List")
    );

    let with_star = resolver(vec![star("com.wild")], Vec::new());
    assert_eq!(solved_name(&with_star, "List").as_deref(), Some("com.wild.List"));

    let plain = resolver(Vec::new(), Vec::new());
    assert_eq!(solved_name(&plain, "List").as_deref(), Some("java.util.List"));
    assert_eq!(solved_name(&plain, "String").as_deref(), Some("java.lang.String"));
    assert_eq!(
        solved_name(&plain, "BigDecimal").as_deref(),
        Some("java.math.BigDecimal")
    );
    assert_eq!(
        solved_name(&plain, "Closure").as_deref(),
        Some("groovy.lang.Closure")
    );
}

#[test]
fn aliases_hide_the_original_simple_name() {
    let resolver = resolver(vec![single("com.wild.Helper", Some("H"))], Vec::new());
    assert_eq!(solved_name(&resolver, "H").as_deref(), Some("com.wild.Helper"));
    assert_eq!(solved_name(&resolver, "Helper"), None);
}

#[test]
fn same_package_types_beat_default_imports() {
    let resolver = resolver(Vec::new(), Vec::new());
    assert_eq!(solved_name(&resolver, "Map").as_deref(), Some("com.acme.Map"));
}

#[test]
fn qualified_and_nested_names_resolve() {
    let mut outer = ClassDecl::new("Outer");
    outer.nested_types.push(ClassDecl::new("Inner"));
    let resolver = resolver(vec![single("java.util.Map", None)], vec![outer]);

    assert_eq!(
        solved_name(&resolver, "java.util.regex.Matcher").as_deref(),
        Some("java.util.regex.Matcher")
    );
    assert_eq!(
        solved_name(&resolver, "Map.Entry").as_deref(),
        Some("java.util.Map.Entry")
    );
    assert_eq!(
        solved_name(&resolver, "Outer.Inner").as_deref(),
        Some("com.acme.Outer.Inner")
    );

    let class_scope = resolver.scopes().class_scopes[&TypeName::new("com.acme.Outer")];
    let inside = resolver.context(class_scope);
    assert_eq!(
        inside.solve_type("Inner").ok().map(|d| d.qualified_name().to_string()),
        Some("com.acme.Outer.Inner".to_string())
    );
    assert!(!resolver.unit_context().solve_type("Inner").is_solved());
}
