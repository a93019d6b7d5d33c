use std::sync::Arc;

use loam_classpath::ResolverSession;
use loam_core::{Name, PackageName, TextRange};
use loam_hir::{
    BinaryOp, BodyBuilder, ClassDecl, CompilationUnit, Expr, ExprId, FieldDecl, LiteralKind,
    MethodDecl, TypeRef, UnaryOp,
};
use loam_infer::{
    infer_expr_type, ExpressionNode, NodeKind, SemanticType, TypeCalculator,
    TypeCalculatorRegistry, TypeContext,
};
use loam_resolve::{BodyOwner, Resolver};
use loam_types::PrimitiveKind;
use pretty_assertions::assert_eq;

fn script(build: impl FnOnce(&mut BodyBuilder) -> Vec<ExprId>) -> (Resolver, Vec<ExprId>) {
    let mut b = BodyBuilder::new();
    let exprs = build(&mut b);
    let stmts = exprs.iter().map(|expr| b.expr_stmt(*expr)).collect();
    let root = b.block(stmts);
    let mut unit = CompilationUnit::new(None);
    unit.script = Some(b.finish(root));
    let session = ResolverSession::builder().build();
    (session.resolver(Arc::new(unit)), exprs)
}

fn infer(resolver: &Resolver, expr: ExprId) -> SemanticType {
    let registry = TypeCalculatorRegistry::with_builtins();
    infer_expr_type(&registry, resolver, &BodyOwner::Script, expr, false)
}

fn infer_static(resolver: &Resolver, expr: ExprId) -> SemanticType {
    let registry = TypeCalculatorRegistry::with_builtins();
    infer_expr_type(&registry, resolver, &BodyOwner::Script, expr, true)
}

fn prim(kind: PrimitiveKind) -> SemanticType {
    SemanticType::Primitive(kind)
}

fn known(name: &str) -> SemanticType {
    SemanticType::known(name)
}

fn lit(b: &mut BodyBuilder, kind: LiteralKind) -> ExprId {
    b.literal(kind, "0")
}

fn safe_call(b: &mut BodyBuilder, receiver: ExprId, name: &str) -> ExprId {
    b.alloc_expr(Expr::MethodCall {
        receiver: Some(receiver),
        name: Name::new(name),
        args: Vec::new(),
        safe: true,
        spread: false,
        range: TextRange::default(),
    })
}

#[test]
fn literals_and_collections() {
    let (resolver, exprs) = script(|b| {
        let int = b.int(1);
        let decimal = lit(b, LiteralKind::BigDecimal);
        let string = b.string("s");
        let null = lit(b, LiteralKind::Null);
        let boolean = lit(b, LiteralKind::Boolean);
        let plain = b.alloc_expr(Expr::GString {
            parts: Vec::new(),
            range: TextRange::default(),
        });
        let part = b.name("x");
        let interpolated = b.alloc_expr(Expr::GString {
            parts: vec![part],
            range: TextRange::default(),
        });
        let one = b.int(1);
        let list = b.alloc_expr(Expr::List {
            elements: vec![one],
            range: TextRange::default(),
        });
        let key = b.string("a");
        let value = b.int(1);
        let map = b.alloc_expr(Expr::Map {
            entries: vec![(key, value)],
            range: TextRange::default(),
        });
        let (from, to) = (b.int(1), b.int(3));
        let ints = b.alloc_expr(Expr::Range {
            from,
            to,
            exclusive: false,
            range: TextRange::default(),
        });
        let (from, to) = (b.string("a"), b.string("c"));
        let strings = b.alloc_expr(Expr::Range {
            from,
            to,
            exclusive: true,
            range: TextRange::default(),
        });
        let closure_body = b.block(Vec::new());
        let closure = b.alloc_expr(Expr::Closure {
            params: Vec::new(),
            body: closure_body,
            range: TextRange::default(),
        });
        vec![
            int, decimal, string, null, boolean, plain, interpolated, list, map, ints, strings,
            closure,
        ]
    });

    let types: Vec<SemanticType> = exprs.iter().map(|expr| infer(&resolver, *expr)).collect();
    assert_eq!(
        types,
        vec![
            prim(PrimitiveKind::Int),
            known("java.math.BigDecimal"),
            SemanticType::string(),
            SemanticType::Null,
            prim(PrimitiveKind::Boolean),
            SemanticType::string(),
            known("groovy.lang.GString"),
            known("java.util.List"),
            known("java.util.LinkedHashMap"),
            known("groovy.lang.IntRange"),
            known("groovy.lang.Range"),
            known("groovy.lang.Closure"),
        ]
    );
}

#[test]
fn operators() {
    let (resolver, exprs) = script(|b| {
        let (one, two) = (b.int(1), lit(b, LiteralKind::Long));
        let widening = b.binary(BinaryOp::Plus, one, two);
        let (one, two) = (b.int(1), b.int(2));
        let division = b.binary(BinaryOp::Divide, one, two);
        let (half, two) = (lit(b, LiteralKind::Double), b.int(2));
        let floating = b.binary(BinaryOp::Multiply, half, two);
        let (a, one) = (b.string("a"), b.int(1));
        let concat = b.binary(BinaryOp::Plus, a, one);
        let (one, two) = (b.int(1), b.int(2));
        let less = b.binary(BinaryOp::Less, one, two);
        let (one, two) = (b.int(1), b.int(2));
        let compare = b.binary(BinaryOp::Compare, one, two);
        let (a, pattern) = (b.string("abc"), b.string("b"));
        let find = b.binary(BinaryOp::Find, a, pattern);
        let (two, three) = (b.int(2), b.int(3));
        let power = b.binary(BinaryOp::Power, two, three);
        let (one, two) = (b.int(1), b.int(2));
        let shift = b.binary(BinaryOp::ShiftLeft, one, two);
        let (t, f) = (lit(b, LiteralKind::Boolean), lit(b, LiteralKind::Boolean));
        let and = b.binary(BinaryOp::BitAnd, t, f);
        let (list, zero) = (b.name("items"), b.int(0));
        let subscript = b.binary(BinaryOp::Subscript, list, zero);
        let (target, value) = (b.name("target"), b.string("v"));
        let assign = b.binary(BinaryOp::Assign, target, value);
        vec![
            widening, division, floating, concat, less, compare, find, power, shift, and,
            subscript, assign,
        ]
    });

    let types: Vec<SemanticType> = exprs.iter().map(|expr| infer(&resolver, *expr)).collect();
    assert_eq!(
        types,
        vec![
            prim(PrimitiveKind::Long),
            known("java.math.BigDecimal"),
            prim(PrimitiveKind::Double),
            SemanticType::string(),
            prim(PrimitiveKind::Boolean),
            prim(PrimitiveKind::Int),
            known("java.util.regex.Matcher"),
            known("java.lang.Number"),
            prim(PrimitiveKind::Int),
            prim(PrimitiveKind::Boolean),
            SemanticType::Dynamic,
            SemanticType::string(),
        ]
    );
}

#[test]
fn unary_operators() {
    let (resolver, exprs) = script(|b| {
        let unary = |b: &mut BodyBuilder, op: UnaryOp, operand: ExprId| {
            b.alloc_expr(Expr::Unary {
                op,
                operand,
                range: TextRange::default(),
            })
        };
        let one = b.int(1);
        let minus = unary(b, UnaryOp::Minus, one);
        let x = b.name("x");
        let not = unary(b, UnaryOp::Not, x);
        let regex = b.string("a+");
        let pattern = unary(b, UnaryOp::BitNot, regex);
        let long = lit(b, LiteralKind::Long);
        let increment = unary(b, UnaryOp::PostIncrement, long);
        vec![minus, not, pattern, increment]
    });

    let types: Vec<SemanticType> = exprs.iter().map(|expr| infer(&resolver, *expr)).collect();
    assert_eq!(
        types,
        vec![
            prim(PrimitiveKind::Int),
            prim(PrimitiveKind::Boolean),
            known("java.util.regex.Pattern"),
            prim(PrimitiveKind::Long),
        ]
    );
}

#[test]
fn method_calls_resolve_through_the_platform() {
    let (resolver, exprs) = script(|b| {
        let abc = b.string("abc");
        let length = b.call(Some(abc), "length", Vec::new());
        let abc = b.string("abc");
        let safe_length = safe_call(b, abc, "length");
        let abc = b.string("abc");
        let upper = b.call(Some(abc), "toUpperCase", Vec::new());
        let chained = b.call(Some(upper), "trim", Vec::new());
        let math = b.name("Math");
        let (one, two) = (b.int(1), b.int(2));
        let max_int = b.call(Some(math), "max", vec![one, two]);
        let math = b.name("Math");
        let (one, two) = (lit(b, LiteralKind::Long), b.int(2));
        let max_long = b.call(Some(math), "max", vec![one, two]);
        let abc = b.string("abc");
        let one = b.int(1);
        let substring = b.call(Some(abc), "substring", vec![one]);
        let new_list = b.alloc_expr(Expr::New {
            ty: TypeRef::new("ArrayList"),
            args: Vec::new(),
            range: TextRange::default(),
        });
        let one = b.int(1);
        let list = b.alloc_expr(Expr::List {
            elements: vec![one],
            range: TextRange::default(),
        });
        let spread = b.alloc_expr(Expr::MethodCall {
            receiver: Some(list),
            name: Name::new("intValue"),
            args: Vec::new(),
            safe: false,
            spread: true,
            range: TextRange::default(),
        });
        vec![
            length, safe_length, chained, max_int, max_long, substring, new_list, spread,
        ]
    });

    let types: Vec<SemanticType> = exprs.iter().map(|expr| infer(&resolver, *expr)).collect();
    assert_eq!(
        types,
        vec![
            prim(PrimitiveKind::Int),
            known("java.lang.Integer"),
            SemanticType::string(),
            prim(PrimitiveKind::Int),
            prim(PrimitiveKind::Long),
            SemanticType::string(),
            known("java.util.ArrayList"),
            known("java.util.List"),
        ]
    );
}

#[test]
fn missing_members_depend_on_compilation_mode() {
    let (resolver, exprs) = script(|b| {
        let abc = b.string("abc");
        let method = b.call(Some(abc), "frobnicate", Vec::new());
        let abc = b.string("abc");
        let property = b.property(abc, "bogus");
        vec![method, property]
    });

    for expr in exprs {
        assert_eq!(infer(&resolver, expr), SemanticType::Dynamic);
        assert!(infer_static(&resolver, expr).is_unknown());
    }
}

#[test]
fn calls_without_a_receiver_are_unknown() {
    let (resolver, exprs) = script(|b| {
        let hi = b.string("hi");
        vec![b.call(None, "println", vec![hi])]
    });
    let ty = infer(&resolver, exprs[0]);
    assert!(ty.is_unknown());
    assert_eq!(
        ty.unknown_reason(),
        Some("call to `println` without an explicit receiver")
    );
}

#[test]
fn constructor_of_unknown_type_is_unknown() {
    let (resolver, exprs) = script(|b| {
        vec![b.alloc_expr(Expr::New {
            ty: TypeRef::new("com.nowhere.Widget"),
            args: Vec::new(),
            range: TextRange::default(),
        })]
    });
    assert!(infer(&resolver, exprs[0]).is_unknown());
}

#[test]
fn properties_use_fields_then_getters() {
    let (resolver, exprs) = script(|b| {
        let abc = b.string("abc");
        let empty = b.property(abc, "empty");
        let abc = b.string("abc");
        let class = b.property(abc, "class");
        let math = b.name("Math");
        let pi = b.property(math, "PI");
        let key = b.string("a");
        let value = b.int(1);
        let map = b.alloc_expr(Expr::Map {
            entries: vec![(key, value)],
            range: TextRange::default(),
        });
        let entry = b.property(map, "a");
        let abc = b.string("abc");
        let safe_empty = b.alloc_expr(Expr::Property {
            receiver: abc,
            name: Name::new("empty"),
            safe: true,
            spread: false,
            attribute: false,
            range: TextRange::default(),
        });
        vec![empty, class, pi, entry, safe_empty]
    });

    let types: Vec<SemanticType> = exprs.iter().map(|expr| infer(&resolver, *expr)).collect();
    assert_eq!(
        types,
        vec![
            prim(PrimitiveKind::Boolean),
            known("java.lang.Class"),
            prim(PrimitiveKind::Double),
            SemanticType::Dynamic,
            known("java.lang.Boolean"),
        ]
    );
}

#[test]
fn declarations_and_variables() {
    let (resolver, exprs) = script(|b| {
        let one = b.int(1);
        let (_, untyped_one) = b.declare("x", None, Some(one));
        let (_, string_decl) = b.declare("s", Some(TypeRef::new("String")), None);
        let (_, bare) = b.declare("y", Some(TypeRef::new("def")), None);
        let (_, nowhere) = b.declare("w", Some(TypeRef::new("com.nowhere.Widget")), None);
        let two = b.int(2);
        let (_, typed) = b.declare("n", Some(TypeRef::new("int")), Some(two));
        let x = b.name("x");
        let n = b.name("n");
        let s = b.name("s");
        let class_ref = b.name("String");
        let missing = b.name("nope");
        let this = b.name("this");
        vec![
            untyped_one, string_decl, bare, nowhere, typed, x, n, s, class_ref, missing, this,
        ]
    });

    let types: Vec<SemanticType> = exprs.iter().map(|expr| infer(&resolver, *expr)).collect();
    assert_eq!(types[0], prim(PrimitiveKind::Int));
    assert_eq!(types[1], SemanticType::string());
    assert_eq!(types[2], SemanticType::Dynamic);
    assert!(types[3].is_unknown());
    assert_eq!(types[4], prim(PrimitiveKind::Int));
    assert_eq!(types[5], SemanticType::Dynamic);
    assert_eq!(types[6], prim(PrimitiveKind::Int));
    assert_eq!(types[7], SemanticType::string());
    assert_eq!(types[8], known("java.lang.Class"));
    assert!(types[9].is_unknown());
    assert_eq!(types[10], known("groovy.lang.Script"));

    assert_eq!(infer_static(&resolver, exprs[2]), SemanticType::object());
    assert_eq!(infer_static(&resolver, exprs[5]), SemanticType::object());
    assert_eq!(infer_static(&resolver, exprs[0]), prim(PrimitiveKind::Int));
}

#[test]
fn ternary_and_elvis_join_their_branches() {
    let (resolver, exprs) = script(|b| {
        let (cond, a, one) = (lit(b, LiteralKind::Boolean), b.string("a"), b.int(1));
        let mixed = b.alloc_expr(Expr::Ternary {
            condition: cond,
            then_expr: a,
            else_expr: one,
            range: TextRange::default(),
        });
        let (cond, one, two) = (lit(b, LiteralKind::Boolean), b.int(1), lit(b, LiteralKind::Long));
        let numeric = b.alloc_expr(Expr::Ternary {
            condition: cond,
            then_expr: one,
            else_expr: two,
            range: TextRange::default(),
        });
        let (value, fallback) = (lit(b, LiteralKind::Null), b.string("x"));
        let elvis = b.alloc_expr(Expr::Elvis {
            value,
            fallback,
            range: TextRange::default(),
        });
        vec![mixed, numeric, elvis]
    });

    assert!(infer(&resolver, exprs[0]).is_unknown());
    assert_eq!(infer(&resolver, exprs[1]), prim(PrimitiveKind::Long));
    assert_eq!(infer(&resolver, exprs[2]), SemanticType::string());
}

#[test]
fn casts_take_the_target_type() {
    let (resolver, exprs) = script(|b| {
        let x = b.string("x");
        let cast = b.alloc_expr(Expr::Cast {
            expr: x,
            ty: TypeRef::new("Object"),
            coerce: false,
            range: TextRange::default(),
        });
        let one = b.int(1);
        let coerce = b.alloc_expr(Expr::Cast {
            expr: one,
            ty: TypeRef::new("String"),
            coerce: true,
            range: TextRange::default(),
        });
        let one = b.int(1);
        let unresolved = b.alloc_expr(Expr::Cast {
            expr: one,
            ty: TypeRef::new("Nowhere"),
            coerce: true,
            range: TextRange::default(),
        });
        vec![cast, coerce, unresolved]
    });

    assert_eq!(infer(&resolver, exprs[0]), SemanticType::object());
    assert_eq!(infer(&resolver, exprs[1]), SemanticType::string());
    assert!(infer(&resolver, exprs[2]).is_unknown());
}

#[test]
fn members_of_the_enclosing_class() {
    let mut b = BodyBuilder::new();
    let this = b.name("this");
    let count = b.property(this, "count");
    let this = b.name("this");
    let label = b.call(Some(this), "label", Vec::new());
    let this = b.name("this");
    let title = b.property(this, "title");
    let bare_count = b.name("count");
    let this_expr = b.name("this");
    let exprs = vec![count, label, title, bare_count, this_expr];
    let stmts = exprs.iter().map(|expr| b.expr_stmt(*expr)).collect();
    let root = b.block(stmts);

    let mut describe = MethodDecl::new("describe");
    describe.body = Some(b.finish(root));
    let mut widget = ClassDecl::new("Widget");
    widget
        .fields
        .push(FieldDecl::new("count", Some(TypeRef::new("int"))));
    widget
        .methods
        .push(MethodDecl::new("label").returning(TypeRef::new("String")));
    widget
        .methods
        .push(MethodDecl::new("getTitle").returning(TypeRef::new("StringBuilder")));
    widget.methods.push(describe);

    let mut unit = CompilationUnit::new(Some(PackageName::new("com.acme")));
    unit.types.push(widget);
    let resolver = ResolverSession::builder().build().resolver(Arc::new(unit));
    let owner = BodyOwner::Method {
        ty: "com.acme.Widget".into(),
        index: 2,
    };
    let registry = TypeCalculatorRegistry::with_builtins();

    let types: Vec<SemanticType> = exprs
        .iter()
        .map(|expr| infer_expr_type(&registry, &resolver, &owner, *expr, false))
        .collect();
    assert_eq!(
        types,
        vec![
            prim(PrimitiveKind::Int),
            SemanticType::string(),
            known("java.lang.StringBuilder"),
            prim(PrimitiveKind::Int),
            known("com.acme.Widget"),
        ]
    );
}

#[test]
fn getters_follow_groovy_bean_naming() {
    let mut b = BodyBuilder::new();
    let this = b.name("this");
    let a_prop = b.property(this, "aProp");
    let this = b.name("this");
    let url = b.property(this, "URL");
    let this = b.name("this");
    let wrong_case = b.property(this, "AProp");
    let exprs = vec![a_prop, url, wrong_case];
    let stmts = exprs.iter().map(|expr| b.expr_stmt(*expr)).collect();
    let root = b.block(stmts);

    let mut run = MethodDecl::new("run");
    run.body = Some(b.finish(root));
    let mut bean = ClassDecl::new("Bean");
    bean.methods
        .push(MethodDecl::new("getaProp").returning(TypeRef::new("StringBuilder")));
    bean.methods
        .push(MethodDecl::new("getURL").returning(TypeRef::new("String")));
    bean.methods.push(run);

    let mut unit = CompilationUnit::new(Some(PackageName::new("com.acme")));
    unit.types.push(bean);
    let resolver = ResolverSession::builder().build().resolver(Arc::new(unit));
    let owner = BodyOwner::Method {
        ty: "com.acme.Bean".into(),
        index: 2,
    };
    let registry = TypeCalculatorRegistry::with_builtins();

    let ty = |expr: ExprId, static_compilation| {
        infer_expr_type(&registry, &resolver, &owner, expr, static_compilation)
    };
    assert_eq!(ty(exprs[0], false), known("java.lang.StringBuilder"));
    assert_eq!(ty(exprs[1], false), SemanticType::string());
    assert!(ty(exprs[2], true).is_unknown());
}

struct Money;

impl TypeCalculator for Money {
    fn id(&self) -> &str {
        "money"
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Constant
    }

    fn priority(&self) -> i32 {
        10
    }

    fn calculate(&self, node: &dyn ExpressionNode, _ctx: &dyn TypeContext) -> Option<SemanticType> {
        (node.as_constant()? == loam_infer::ConstantKind::String).then(|| known("com.acme.Money"))
    }
}

#[test]
fn higher_priority_calculators_run_first() {
    let (resolver, exprs) = script(|b| vec![b.string("1.00"), b.int(1)]);
    let mut registry = TypeCalculatorRegistry::with_builtins();
    registry.register(Arc::new(Money)).unwrap();
    assert_eq!(registry.dispatch_order(NodeKind::Constant)[0], "money");

    let infer = |expr| infer_expr_type(&registry, &resolver, &BodyOwner::Script, expr, false);
    assert_eq!(infer(exprs[0]), known("com.acme.Money"));
    assert_eq!(infer(exprs[1]), prim(PrimitiveKind::Int));
}

#[test]
fn builtin_ids_are_unique() {
    let builtins = loam_infer::calculators::builtin_calculators();
    let ids: std::collections::HashSet<&str> =
        builtins.iter().map(|calculator| calculator.id()).collect();
    assert_eq!(ids.len(), builtins.len());

    let registry = TypeCalculatorRegistry::with_builtins();
    assert_eq!(registry.len(), builtins.len());
}
