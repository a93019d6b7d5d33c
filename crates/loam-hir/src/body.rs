use std::fmt;

use loam_core::{Name, TextRange};

use crate::type_ref::TypeRef;

macro_rules! arena_id {
    ($name:ident) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub(crate) fn from_raw(raw: u32) -> Self {
                $name(raw)
            }

            #[must_use]
            pub fn idx(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl<T> std::ops::Index<$name> for Arena<T> {
            type Output = T;

            fn index(&self, index: $name) -> &Self::Output {
                &self.data[index.idx()]
            }
        }
    };
}

arena_id!(ExprId);
arena_id!(StmtId);
arena_id!(LocalId);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arena<T> {
    data: Vec<T>,
}

impl<T> Arena<T> {
    pub fn alloc(&mut self, value: T) -> u32 {
        let idx = self.data.len() as u32;
        self.data.push(value);
        idx
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.data.iter().enumerate().map(|(i, v)| (i as u32, v))
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Arena { data: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    pub root: StmtId,
    pub stmts: Arena<Stmt>,
    pub exprs: Arena<Expr>,
    pub locals: Arena<Local>,
}

impl Body {
    #[must_use]
    pub fn empty(range: TextRange) -> Self {
        let mut builder = BodyBuilder::new();
        let root = builder.block_at(Vec::new(), range);
        builder.finish(root)
    }

    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id]
    }

    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id]
    }

    pub fn local(&self, id: LocalId) -> &Local {
        &self.locals[id]
    }
}

/// A local variable, loop variable or closure parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Local {
    pub name: Name,
    /// `None` for `def` and untyped closure parameters.
    pub ty: Option<TypeRef>,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Block {
        statements: Vec<StmtId>,
        range: TextRange,
    },
    /// Expression statement; local declarations are `Expr::Declaration` statements.
    Expr {
        expr: ExprId,
        range: TextRange,
    },
    Return {
        expr: Option<ExprId>,
        range: TextRange,
    },
    If {
        condition: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
        range: TextRange,
    },
    While {
        condition: ExprId,
        body: StmtId,
        range: TextRange,
    },
    /// `for (x in xs)`
    ForIn {
        local: LocalId,
        iterable: ExprId,
        body: StmtId,
        range: TextRange,
    },
    Empty {
        range: TextRange,
    },
}

impl Stmt {
    pub fn range(&self) -> TextRange {
        match self {
            Stmt::Block { range, .. }
            | Stmt::Expr { range, .. }
            | Stmt::Return { range, .. }
            | Stmt::If { range, .. }
            | Stmt::While { range, .. }
            | Stmt::ForIn { range, .. }
            | Stmt::Empty { range } => *range,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Integer,
    Long,
    BigInteger,
    Float,
    Double,
    BigDecimal,
    String,
    Boolean,
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Plus,
    Minus,
    Multiply,
    Divide,
    Remainder,
    Power,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    /// `<=>`
    Compare,
    LogicalAnd,
    LogicalOr,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    /// `=~`
    Find,
    /// `==~`
    Match,
    In,
    InstanceOf,
    /// `a[b]`
    Subscript,
    Assign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Minus,
    Plus,
    BitNot,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal {
        kind: LiteralKind,
        value: String,
        range: TextRange,
    },
    /// `"a ${b}"`; `parts` are the interpolated expressions.
    GString {
        parts: Vec<ExprId>,
        range: TextRange,
    },
    Name {
        name: Name,
        range: TextRange,
    },
    /// `a.b`, `a?.b`, `a*.b`, `a.@b`
    Property {
        receiver: ExprId,
        name: Name,
        safe: bool,
        spread: bool,
        attribute: bool,
        range: TextRange,
    },
    /// `m(x)` (no receiver) or `a.m(x)`, `a?.m(x)`, `a*.m(x)`
    MethodCall {
        receiver: Option<ExprId>,
        name: Name,
        args: Vec<ExprId>,
        safe: bool,
        spread: bool,
        range: TextRange,
    },
    New {
        ty: TypeRef,
        args: Vec<ExprId>,
        range: TextRange,
    },
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
        range: TextRange,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
        range: TextRange,
    },
    Ternary {
        condition: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
        range: TextRange,
    },
    /// `a ?: b`
    Elvis {
        value: ExprId,
        fallback: ExprId,
        range: TextRange,
    },
    List {
        elements: Vec<ExprId>,
        range: TextRange,
    },
    Map {
        entries: Vec<(ExprId, ExprId)>,
        range: TextRange,
    },
    /// `a..b`, `a..<b`
    Range {
        from: ExprId,
        to: ExprId,
        exclusive: bool,
        range: TextRange,
    },
    /// `(T) e` or `e as T`
    Cast {
        expr: ExprId,
        ty: TypeRef,
        coerce: bool,
        range: TextRange,
    },
    Closure {
        params: Vec<LocalId>,
        body: StmtId,
        range: TextRange,
    },
    /// `int x = 1`, `def y`
    Declaration {
        local: LocalId,
        initializer: Option<ExprId>,
        range: TextRange,
    },
    Missing {
        range: TextRange,
    },
}

impl Expr {
    #[must_use]
    pub fn range(&self) -> TextRange {
        match self {
            Expr::Literal { range, .. }
            | Expr::GString { range, .. }
            | Expr::Name { range, .. }
            | Expr::Property { range, .. }
            | Expr::MethodCall { range, .. }
            | Expr::New { range, .. }
            | Expr::Binary { range, .. }
            | Expr::Unary { range, .. }
            | Expr::Ternary { range, .. }
            | Expr::Elvis { range, .. }
            | Expr::List { range, .. }
            | Expr::Map { range, .. }
            | Expr::Range { range, .. }
            | Expr::Cast { range, .. }
            | Expr::Closure { range, .. }
            | Expr::Declaration { range, .. }
            | Expr::Missing { range } => *range,
        }
    }
}

/// Incremental construction of a [`Body`] for parser adapters and tests.
///
/// Nodes built without an explicit range get an empty range at offset 0.
#[derive(Debug, Default)]
pub struct BodyBuilder {
    stmts: Arena<Stmt>,
    exprs: Arena<Expr>,
    locals: Arena<Local>,
}

impl BodyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        ExprId::from_raw(self.exprs.alloc(expr))
    }

    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        StmtId::from_raw(self.stmts.alloc(stmt))
    }

    pub fn alloc_local(&mut self, local: Local) -> LocalId {
        LocalId::from_raw(self.locals.alloc(local))
    }

    pub fn literal(&mut self, kind: LiteralKind, value: &str) -> ExprId {
        self.alloc_expr(Expr::Literal {
            kind,
            value: value.to_string(),
            range: TextRange::default(),
        })
    }

    pub fn int(&mut self, value: i64) -> ExprId {
        self.literal(LiteralKind::Integer, &value.to_string())
    }

    pub fn string(&mut self, value: &str) -> ExprId {
        self.literal(LiteralKind::String, value)
    }

    pub fn name(&mut self, name: &str) -> ExprId {
        self.alloc_expr(Expr::Name {
            name: Name::from(name),
            range: TextRange::default(),
        })
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.alloc_expr(Expr::Binary {
            op,
            lhs,
            rhs,
            range: TextRange::default(),
        })
    }

    pub fn call(&mut self, receiver: Option<ExprId>, name: &str, args: Vec<ExprId>) -> ExprId {
        self.alloc_expr(Expr::MethodCall {
            receiver,
            name: Name::from(name),
            args,
            safe: false,
            spread: false,
            range: TextRange::default(),
        })
    }

    pub fn property(&mut self, receiver: ExprId, name: &str) -> ExprId {
        self.alloc_expr(Expr::Property {
            receiver,
            name: Name::from(name),
            safe: false,
            spread: false,
            attribute: false,
            range: TextRange::default(),
        })
    }

    /// Declares a local and returns it together with the `Declaration` expression.
    pub fn declare(
        &mut self,
        name: &str,
        ty: Option<TypeRef>,
        initializer: Option<ExprId>,
    ) -> (LocalId, ExprId) {
        let local = self.alloc_local(Local {
            name: Name::from(name),
            ty,
            range: TextRange::default(),
        });
        let expr = self.alloc_expr(Expr::Declaration {
            local,
            initializer,
            range: TextRange::default(),
        });
        (local, expr)
    }

    pub fn expr_stmt(&mut self, expr: ExprId) -> StmtId {
        self.alloc_stmt(Stmt::Expr {
            expr,
            range: TextRange::default(),
        })
    }

    pub fn block(&mut self, statements: Vec<StmtId>) -> StmtId {
        self.block_at(statements, TextRange::default())
    }

    pub fn block_at(&mut self, statements: Vec<StmtId>, range: TextRange) -> StmtId {
        self.alloc_stmt(Stmt::Block { statements, range })
    }

    pub fn finish(self, root: StmtId) -> Body {
        Body {
            root,
            stmts: self.stmts,
            exprs: self.exprs,
            locals: self.locals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_links_declarations_to_locals() {
        let mut b = BodyBuilder::new();
        let one = b.int(1);
        let (local, decl) = b.declare("x", Some(TypeRef::new("int")), Some(one));
        let stmt = b.expr_stmt(decl);
        let root = b.block(vec![stmt]);
        let body = b.finish(root);

        assert_eq!(body.local(local).name.as_str(), "x");
        match body.expr(decl) {
            Expr::Declaration { initializer, .. } => assert_eq!(*initializer, Some(one)),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(body.stmt(body.root), Stmt::Block { statements, .. } if statements.len() == 1));
    }

    #[test]
    fn ids_debug_print_with_their_kind() {
        assert_eq!(format!("{:?}", ExprId::from_raw(3)), "ExprId(3)");
        assert_eq!(format!("{:?}", LocalId::from_raw(0)), "LocalId(0)");
    }
}
