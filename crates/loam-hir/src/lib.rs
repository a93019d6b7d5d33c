//! High-level intermediate representation (HIR) for Groovy sources.
//!
//! Parser adapters fill these structures in; the resolver and the inference layer only ever read
//! them. The item tree ([`CompilationUnit`] and friends) is enough to build source-backed
//! declarations and scope graphs; [`Body`] holds statements and expressions in arenas.

mod body;
mod item;
mod type_ref;

pub use body::{
    Arena, BinaryOp, Body, BodyBuilder, Expr, ExprId, LiteralKind, Local, LocalId, Stmt, StmtId,
    UnaryOp,
};
pub use item::{
    ClassDecl, ClassKind, CompilationUnit, ConstructorDecl, FieldDecl, ImportDecl, MethodDecl,
    Modifiers, ParamDecl,
};
pub use type_ref::TypeRef;
