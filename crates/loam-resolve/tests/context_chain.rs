mod common;

use std::sync::Arc;

use loam_core::{Name, QualifiedName, SymbolReference, TextRange};
use loam_hir::{
    BodyBuilder, ClassDecl, CompilationUnit, Expr, ExprId, FieldDecl, ImportDecl, LiteralKind,
    Local, MethodDecl, Modifiers, ParamDecl, Stmt, TypeRef,
};
use loam_resolve::{BodyOwner, DeclaredType, ResolvedType, Resolver, ValueDecl};
use loam_types::PrimitiveKind;
use pretty_assertions::assert_eq;

struct Calculator {
    resolver: Resolver,
    outer_x: ExprId,
    inner_x: ExprId,
}

fn calculator() -> Calculator {
    let mut b = BodyBuilder::new();
    let outer_x = b.name("x");
    let outer_stmt = b.expr_stmt(outer_x);
    let one = b.int(1);
    let (_, decl) = b.declare("x", Some(TypeRef::new("int")), Some(one));
    let decl_stmt = b.expr_stmt(decl);
    let inner_x = b.name("x");
    let inner_stmt = b.expr_stmt(inner_x);
    let inner_block = b.block(vec![decl_stmt, inner_stmt]);
    let root = b.block(vec![outer_stmt, inner_block]);

    let mut compute = MethodDecl::new("compute")
        .param(ParamDecl::new("x", Some(TypeRef::new("String"))));
    compute.body = Some(b.finish(root));

    let mut twice = MethodDecl::new("twice")
        .returning(TypeRef::new("int"))
        .param(ParamDecl::new("v", Some(TypeRef::new("int"))));
    twice.modifiers = Modifiers::default().with_static();

    let mut class = ClassDecl::new("Calculator");
    class
        .fields
        .push(FieldDecl::new("count", Some(TypeRef::new("int"))));
    class.fields.push(FieldDecl::new("memo", None));
    class.methods.push(compute);
    class.methods.push(twice);

    let unit = common::unit(
        "com.acme",
        vec![
            ImportDecl::StaticSingle {
                ty: QualifiedName::from_dotted("java.lang.Math"),
                member: Name::new("max"),
                alias: None,
            },
            ImportDecl::StaticStar {
                ty: QualifiedName::from_dotted("java.lang.Math"),
            },
        ],
        vec![class],
    );
    Calculator {
        resolver: Resolver::new(unit, common::jdk_solver()),
        outer_x,
        inner_x,
    }
}

fn compute_owner() -> BodyOwner {
    BodyOwner::Method {
        ty: "com.acme.Calculator".into(),
        index: 0,
    }
}

fn int() -> ResolvedType {
    ResolvedType::Primitive(PrimitiveKind::Int)
}

#[test]
fn block_locals_shadow_parameters() {
    let calc = calculator();
    let owner = compute_owner();

    let inner = calc.resolver.expr_context(&owner, calc.inner_x).expect("inner scope");
    let SymbolReference::Solved(local) = inner.solve_symbol("x") else {
        panic!("x should resolve in the inner block");
    };
    assert!(matches!(local, ValueDecl::Local { .. }));
    assert_eq!(inner.declared_type(&local), DeclaredType::Resolved(int()));

    let outer = calc.resolver.expr_context(&owner, calc.outer_x).expect("outer scope");
    let SymbolReference::Solved(param) = outer.solve_symbol("x") else {
        panic!("x should resolve to the parameter");
    };
    assert!(matches!(param, ValueDecl::Parameter { .. }));
    match outer.declared_type(&param) {
        DeclaredType::Resolved(ty) => assert_eq!(ty.to_string(), "java.lang.String"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn fields_and_static_imports_are_found_outside_the_body() {
    let calc = calculator();
    let ctx = calc
        .resolver
        .expr_context(&compute_owner(), calc.inner_x)
        .expect("scope");

    let SymbolReference::Solved(count) = ctx.solve_symbol("count") else {
        panic!("count is a field");
    };
    assert_eq!(count.name(), "count");
    assert_eq!(ctx.declared_type(&count), DeclaredType::Resolved(int()));

    let SymbolReference::Solved(memo) = ctx.solve_symbol("memo") else {
        panic!("memo is a field");
    };
    assert_eq!(ctx.declared_type(&memo), DeclaredType::Dynamic);

    let SymbolReference::Solved(pi) = ctx.solve_symbol("PI") else {
        panic!("PI comes from the static star import");
    };
    assert_eq!(
        ctx.declared_type(&pi),
        DeclaredType::Resolved(ResolvedType::Primitive(PrimitiveKind::Double))
    );

    assert!(!ctx.solve_symbol("nope").is_solved());
}

#[test]
fn methods_resolve_through_classes_and_static_imports() {
    let calc = calculator();
    let ctx = calc
        .resolver
        .expr_context(&compute_owner(), calc.inner_x)
        .expect("scope");
    let solver = ctx.solver();
    let long = ResolvedType::Primitive(PrimitiveKind::Long);
    let string = ResolvedType::reference(solver.solve_type("java.lang.String").expect("string"));

    let twice = ctx.solve_method("twice", &[int()]).ok().expect("twice");
    assert_eq!(twice.declaring_type().as_str(), "com.acme.Calculator");
    assert_eq!(twice.return_type(solver).ok(), Some(int()));

    let max = ctx.solve_method("max", &[int(), int()]).ok().expect("max(int, int)");
    assert_eq!(max.return_type(solver).ok(), Some(int()));

    let widened = ctx.solve_method("max", &[long.clone(), int()]).ok().expect("max(long, long)");
    assert_eq!(widened.return_type(solver).ok(), Some(long));

    assert!(!ctx.solve_method("max", &[string.clone(), string]).is_solved());

    let to_string = ctx.solve_method("toString", &[]).ok().expect("inherited");
    assert_eq!(to_string.declaring_type().as_str(), "java.lang.Object");
    assert!(!ctx.is_static());
}

#[test]
fn script_locals_closures_and_script_methods() {
    let mut b = BodyBuilder::new();
    let one = b.int(1);
    let (_, decl) = b.declare("total", None, Some(one));
    let decl_stmt = b.expr_stmt(decl);
    let hi = b.string("hi");
    let call = b.call(None, "println", vec![hi]);
    let call_stmt = b.expr_stmt(call);

    let s = b.alloc_local(Local {
        name: Name::new("s"),
        ty: Some(TypeRef::new("String")),
        range: TextRange::default(),
    });
    let s_use = b.name("s");
    let s_stmt = b.expr_stmt(s_use);
    let closure_body = b.block(vec![s_stmt]);
    let closure = b.alloc_expr(Expr::Closure {
        params: vec![s],
        body: closure_body,
        range: TextRange::default(),
    });
    let closure_stmt = b.expr_stmt(closure);

    let item = b.alloc_local(Local {
        name: Name::new("item"),
        ty: None,
        range: TextRange::default(),
    });
    let items = b.name("total");
    let item_use = b.name("item");
    let item_stmt = b.expr_stmt(item_use);
    let loop_body = b.block(vec![item_stmt]);
    let for_in = b.alloc_stmt(Stmt::ForIn {
        local: item,
        iterable: items,
        body: loop_body,
        range: TextRange::default(),
    });
    let root = b.block(vec![decl_stmt, call_stmt, closure_stmt, for_in]);

    let mut unit = CompilationUnit::new(None);
    unit.script = Some(b.finish(root));
    let resolver = Resolver::new(Arc::new(unit), common::jdk_solver());
    let owner = BodyOwner::Script;

    let at_call = resolver.expr_context(&owner, call).expect("call scope");
    assert!(at_call.is_script());
    let string = ResolvedType::reference(
        at_call.solver().solve_type("java.lang.String").expect("string"),
    );
    let println = at_call.solve_method("println", &[string]).ok().expect("println");
    assert_eq!(println.declaring_type().as_str(), "groovy.lang.Script");

    let in_closure = resolver.expr_context(&owner, s_use).expect("closure scope");
    let s_decl = in_closure.solve_symbol("s").ok().expect("closure parameter");
    match in_closure.declared_type(&s_decl) {
        DeclaredType::Resolved(ty) => assert_eq!(ty.to_string(), "java.lang.String"),
        other => panic!("unexpected {other:?}"),
    }
    let total = in_closure.solve_symbol("total").ok().expect("script local");
    assert_eq!(in_closure.declared_type(&total), DeclaredType::Dynamic);

    let in_loop = resolver.expr_context(&owner, item_use).expect("loop scope");
    assert!(in_loop.solve_symbol("item").is_solved());
    let at_iterable = resolver.expr_context(&owner, items).expect("iterable scope");
    assert!(!at_iterable.solve_symbol("item").is_solved());
}

#[test]
fn unresolved_declared_types_keep_their_text() {
    let mut b = BodyBuilder::new();
    let (_, decl) = b.declare("w", Some(TypeRef::new("com.nowhere.Widget")), None);
    let decl_stmt = b.expr_stmt(decl);
    let w = b.name("w");
    let w_stmt = b.expr_stmt(w);
    let root = b.block(vec![decl_stmt, w_stmt]);
    let mut unit = CompilationUnit::new(None);
    unit.script = Some(b.finish(root));
    let resolver = Resolver::new(Arc::new(unit), common::jdk_solver());

    let ctx = resolver.expr_context(&BodyOwner::Script, w).expect("scope");
    let value = ctx.solve_symbol("w").ok().expect("local");
    assert_eq!(
        ctx.declared_type(&value),
        DeclaredType::Unresolved("com.nowhere.Widget".to_string())
    );
}

#[test]
fn locals_are_visible_only_after_their_declaration() {
    let mut b = BodyBuilder::new();
    let before = b.name("x");
    let before_stmt = b.expr_stmt(before);
    let self_ref = b.name("x");
    let (_, decl) = b.declare("x", Some(TypeRef::new("int")), Some(self_ref));
    let decl_stmt = b.expr_stmt(decl);
    let after = b.name("x");
    let after_stmt = b.expr_stmt(after);
    let root = b.block(vec![before_stmt, decl_stmt, after_stmt]);

    let mut compute = MethodDecl::new("compute")
        .param(ParamDecl::new("x", Some(TypeRef::new("String"))));
    compute.body = Some(b.finish(root));
    let mut class = ClassDecl::new("Calculator");
    class.methods.push(compute);
    let unit = common::unit("com.acme", Vec::new(), vec![class]);
    let resolver = Resolver::new(unit, common::jdk_solver());
    let owner = compute_owner();

    let resolve = |expr: ExprId| {
        resolver
            .expr_context(&owner, expr)
            .expect("scope")
            .solve_symbol("x")
            .ok()
            .expect("x")
    };
    assert!(matches!(resolve(before), ValueDecl::Parameter { .. }));
    assert!(matches!(resolve(self_ref), ValueDecl::Parameter { .. }));
    assert!(matches!(resolve(after), ValueDecl::Local { .. }));
}

#[test]
fn declarations_in_unbraced_branches_stay_in_the_branch() {
    let mut b = BodyBuilder::new();
    let condition = b.literal(LiteralKind::Boolean, "true");
    let one = b.int(1);
    let (_, in_then) = b.declare("y", None, Some(one));
    let then_stmt = b.expr_stmt(in_then);
    let if_stmt = b.alloc_stmt(Stmt::If {
        condition,
        then_branch: then_stmt,
        else_branch: None,
        range: TextRange::default(),
    });

    let condition = b.literal(LiteralKind::Boolean, "false");
    let two = b.int(2);
    let (_, in_loop) = b.declare("z", None, Some(two));
    let loop_stmt = b.expr_stmt(in_loop);
    let while_stmt = b.alloc_stmt(Stmt::While {
        condition,
        body: loop_stmt,
        range: TextRange::default(),
    });

    let y = b.name("y");
    let y_stmt = b.expr_stmt(y);
    let z = b.name("z");
    let z_stmt = b.expr_stmt(z);
    let root = b.block(vec![if_stmt, while_stmt, y_stmt, z_stmt]);
    let mut unit = CompilationUnit::new(None);
    unit.script = Some(b.finish(root));
    let resolver = Resolver::new(Arc::new(unit), common::jdk_solver());
    let owner = BodyOwner::Script;

    let root_scope = resolver.scopes().body_scopes[&owner];
    let branch_scope = resolver.scopes().stmt_scope(&owner, then_stmt).expect("branch");
    assert_ne!(branch_scope, root_scope);
    assert_eq!(resolver.scopes().scopes.scope(branch_scope).parent(), Some(root_scope));

    for name_use in [y, z] {
        let ctx = resolver.expr_context(&owner, name_use).expect("scope");
        assert!(!ctx.solve_symbol("y").is_solved());
        assert!(!ctx.solve_symbol("z").is_solved());
    }
}
