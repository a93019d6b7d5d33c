//! Expression type inference for Groovy.
//!
//! A [`TypeCalculatorRegistry`] maps [`ExpressionNode`]s to [`SemanticType`]s by dispatching
//! on the node's [`NodeKind`] to registered [`TypeCalculator`]s. Calculators ask a
//! [`TypeContext`] about the surrounding code; [`ResolvingTypeContext`] answers from a
//! `loam-resolve` [`Context`](loam_resolve::Context). Inference never fails: what cannot be
//! typed is [`SemanticType::Unknown`].
//!
//! ```ignore
//! let registry = TypeCalculatorRegistry::with_builtins();
//! let ty = infer_expr_type(&registry, &resolver, &BodyOwner::Script, expr, false);
//! ```

pub mod calculators;

mod context;
mod hir_node;
mod node;
mod registry;

pub use context::{semantic_type, MapTypeContext, ResolvingTypeContext, TypeContext};
pub use hir_node::{infer_expr_type, HirExpr};
pub use node::{
    BinaryOperator, BinaryView, CastView, ConstantKind, ConstructorCallView, DeclarationView,
    ExpressionNode, MethodCallView, Node, NodeKind, PropertyView, RangeView, TernaryView,
    UnaryOperator, UnaryView,
};
pub use registry::{RegisterError, TypeCalculator, TypeCalculatorRegistry};

pub use loam_types::{lub, lub_all, SemanticType};
